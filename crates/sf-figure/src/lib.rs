//! Reactive plotting engine for slidefig.
//!
//! A [`PlotSurface`] holds symbolic curves and the parameter sliders they
//! depend on. Curves are compiled once to numeric functions and re-sampled
//! whenever something they depend on changes:
//!
//! - a parameter value (drag, typed text, reset),
//! - the visible x range (host pan/zoom, throttled),
//! - the curve's own definition or overrides.
//!
//! Sampling covers the visible x range, widened to any per-curve domain
//! override, at the curve's resolution or the surface default. All trace
//! writes of one surface render land in a single [`FigureWidget`] redraw.
//!
//! # Example
//!
//! ```
//! use sf_controls::ParamConfig;
//! use sf_expr::Expr;
//! use sf_figure::{PlotOptions, PlotSurface, SurfaceOptions};
//!
//! let opts = SurfaceOptions::new()
//!     .with_sampling_points(3)
//!     .with_x_range(0.0, 2.0)
//!     .unwrap();
//! let mut surface = PlotSurface::with_options(opts).unwrap();
//! surface.add_param("a", ParamConfig::new().value(0.5)).unwrap();
//!
//! let (a, x) = (Expr::sym("a"), Expr::sym("x"));
//! surface
//!     .plot("x", a * x, PlotOptions::new().id("line").parameters(["a"]))
//!     .unwrap();
//! surface.set_param_value("a", 1.0).unwrap();
//!
//! let trace = surface.figure().traces()[0].clone();
//! assert_eq!(trace.y, vec![0.0, 1.0, 2.0]);
//! ```

pub mod curve;
pub mod display;
pub mod error;
pub mod figure;
pub mod layout;
pub mod options;
pub mod surface;
pub mod throttle;
pub mod trace;

pub use curve::{Curve, CurveMut, CurveUpdate, Override, RawRange};
pub use display::SingleShotDisplay;
pub use error::{FigureError, FigureResult};
pub use figure::{Axis, AxisLayout, FigureLayout, FigureWidget, LayoutUpdate};
pub use layout::LayoutNode;
pub use options::SurfaceOptions;
pub use surface::{AUTO_ID_CAP, PlotOptions, PlotSurface};
pub use throttle::Throttle;
pub use trace::{Trace, TraceId, TraceMode};
