//! The figure-level container: curves, parameter controls and viewport.

use crate::curve::{
    Curve, CurveDef, CurveMut, CurveUpdate, Override, ParamMap, RawRange, Scene, resolve_range,
};
use crate::display::SingleShotDisplay;
use crate::error::{FigureError, FigureResult};
use crate::figure::{Axis, FigureWidget, LayoutUpdate};
use crate::layout::LayoutNode;
use crate::options::SurfaceOptions;
use crate::throttle::Throttle;
use crate::trace::{TraceId, TraceMode};
use sf_controls::{ListenerId, ParamChange, ParamConfig, ParameterControl};
use sf_core::{Clock, Interval, MonotonicClock, Real};
use sf_expr::{
    CachedCompiler, CompileError, Expr, ExprCoercion, NumericCompiler, RawValue, Symbol,
    ValueCoercion,
};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Number of automatically generated curve ids (`f_0` .. `f_99`).
pub const AUTO_ID_CAP: usize = 100;

const DEFAULT_COOLDOWN: Duration = Duration::from_millis(500);

/// Surface events are logged at `debug` when the surface was built with
/// `debug: true`, else at `trace`.
macro_rules! surface_event {
    ($enabled:expr, $($arg:tt)+) => {
        if $enabled {
            ::tracing::debug!($($arg)+)
        } else {
            ::tracing::trace!($($arg)+)
        }
    };
}

/// Arguments of [`PlotSurface::plot`] beyond the variable and expression.
#[derive(Debug, Clone, Default)]
pub struct PlotOptions {
    /// Parameter order for the compiled function. `None` means no parameters
    /// for a new curve and "keep" for an existing one.
    pub parameters: Option<Vec<Symbol>>,
    pub id: Option<String>,
    pub x_domain: Override<RawRange>,
    pub sampling_points: Override<RawValue>,
}

impl PlotOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn parameters<S: Into<Symbol>>(mut self, params: impl IntoIterator<Item = S>) -> Self {
        self.parameters = Some(params.into_iter().map(Into::into).collect());
        self
    }

    pub fn x_domain(mut self, domain: impl Into<RawRange>) -> Self {
        self.x_domain = Override::Value(domain.into());
        self
    }

    pub fn default_x_domain(mut self) -> Self {
        self.x_domain = Override::FigureDefault;
        self
    }

    pub fn sampling_points(mut self, n: impl Into<RawValue>) -> Self {
        self.sampling_points = Override::Value(n.into());
        self
    }

    pub fn default_sampling_points(mut self) -> Self {
        self.sampling_points = Override::FigureDefault;
        self
    }
}

/// Interactive plot of symbolic expressions driven by parameter sliders.
///
/// The surface owns a [`FigureWidget`], the curves drawn on it and the
/// parameter controls they read. Anything that changes what a curve would
/// sample (a parameter value, the viewport, a curve definition) re-renders
/// the affected curves before returning.
pub struct PlotSurface {
    figure: FigureWidget,
    curves: HashMap<String, Curve>,
    curve_order: Vec<String>,
    params: ParamMap,
    param_order: Vec<Symbol>,
    sampling_points: usize,
    x_range: Interval,
    y_range: Interval,
    throttle: Throttle,
    clock: Arc<dyn Clock>,
    compiler: Arc<dyn NumericCompiler>,
    coercion: Arc<dyn ValueCoercion>,
    display: SingleShotDisplay,
    debug: bool,
}

impl PlotSurface {
    /// Surface with default options: 500 samples, x in `[-4, 4]`, y in `[-3, 3]`.
    pub fn new() -> Self {
        Self::build(SurfaceOptions::default(), DEFAULT_COOLDOWN)
    }

    pub fn with_options(options: SurfaceOptions) -> FigureResult<Self> {
        options.validate()?;
        let cooldown = options.cooldown()?;
        Ok(Self::build(options, cooldown))
    }

    fn build(options: SurfaceOptions, cooldown: Duration) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(MonotonicClock::new());
        let mut figure = FigureWidget::new(options.x_range, options.y_range, options.figure_height);
        figure.set_title(options.title);
        Self {
            figure,
            curves: HashMap::new(),
            curve_order: Vec::new(),
            params: ParamMap::new(),
            param_order: Vec::new(),
            sampling_points: options.sampling_points,
            x_range: options.x_range,
            y_range: options.y_range,
            throttle: Throttle::new(cooldown, clock.now()),
            clock,
            compiler: Arc::new(CachedCompiler::default()),
            coercion: Arc::new(ExprCoercion),
            display: SingleShotDisplay::new(),
            debug: options.debug,
        }
    }

    /// Use another time source. The relayout cooldown restarts from its
    /// current time.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.throttle.rearm(clock.now());
        self.clock = clock;
        self
    }

    pub fn with_compiler(mut self, compiler: Arc<dyn NumericCompiler>) -> Self {
        self.compiler = compiler;
        self
    }

    pub fn with_coercion(mut self, coercion: Arc<dyn ValueCoercion>) -> Self {
        self.coercion = coercion;
        self
    }

    // ---- curves ----

    /// Plot `expression` over `variable`, or redefine the curve named by
    /// `options.id` if it exists.
    ///
    /// Without an id the first free `f_0` .. `f_99` is used. A new curve's
    /// label is its id; an existing curve keeps its label. The parameter
    /// list of an existing curve cannot change.
    pub fn plot(
        &mut self,
        variable: impl Into<Symbol>,
        expression: impl Into<Expr>,
        options: PlotOptions,
    ) -> FigureResult<CurveMut<'_>> {
        let variable = variable.into();
        let expression = expression.into();
        let PlotOptions {
            parameters,
            id,
            x_domain,
            sampling_points,
        } = options;
        let id = match id {
            Some(id) => id,
            None => self.next_auto_id()?,
        };

        if let Some(existing) = self.curves.get(&id) {
            if let Some(requested) = &parameters {
                if requested.as_slice() != existing.parameters() {
                    return Err(FigureError::ParameterMismatch {
                        id,
                        existing: join_symbols(existing.parameters()),
                        requested: join_symbols(requested),
                    });
                }
            }
            let update = CurveUpdate {
                variable: Some(variable),
                expression: Some(expression),
                label: None,
                x_domain,
                sampling_points,
            };
            self.curve_mut(&id)?.update(update)?;
            surface_event!(self.debug, curve = %id, "curve updated");
            return self.curve_mut(&id);
        }

        let parameters = parameters.unwrap_or_default();
        if let Some(missing) = parameters.iter().find(|p| !self.params.contains_key(*p)) {
            return Err(FigureError::UnknownParameter(missing.to_string()));
        }
        let def = CurveDef {
            label: id.clone(),
            id: id.clone(),
            variable,
            expression,
            parameters,
            x_domain: into_option(x_domain),
            sampling_points: into_option(sampling_points),
        };

        let trace = self.figure.add_trace();
        let created = Curve::create(
            def,
            trace,
            Scene {
                figure: &mut self.figure,
                params: &self.params,
                default_samples: self.sampling_points,
                compiler: self.compiler.as_ref(),
                coercion: self.coercion.as_ref(),
            },
        );
        match created {
            Ok(curve) => {
                self.curves.insert(id.clone(), curve);
                self.curve_order.push(id.clone());
                surface_event!(self.debug, curve = %id, trace = trace.index(), "curve created");
                self.curve_mut(&id)
            }
            Err(err) => {
                self.figure.pop_trace(trace);
                Err(err)
            }
        }
    }

    /// Plot with the expression's free symbols (other than `variable`) as
    /// parameters, in first-occurrence order. Missing parameters are
    /// registered with default settings.
    pub fn plot_auto(
        &mut self,
        variable: impl Into<Symbol>,
        expression: impl Into<Expr>,
        options: PlotOptions,
    ) -> FigureResult<CurveMut<'_>> {
        let variable = variable.into();
        let expression = expression.into();
        let parameters: Vec<Symbol> = expression
            .free_symbols()
            .map_err(CompileError::from)?
            .into_iter()
            .filter(|s| *s != variable)
            .collect();
        for p in &parameters {
            if !self.params.contains_key(p) {
                self.add_param(p.clone(), ParamConfig::default())?;
            }
        }
        self.plot(
            variable,
            expression,
            PlotOptions {
                parameters: Some(parameters),
                ..options
            },
        )
    }

    pub fn curve(&self, id: &str) -> Option<&Curve> {
        self.curves.get(id)
    }

    pub fn curve_mut(&mut self, id: &str) -> FigureResult<CurveMut<'_>> {
        let curve = self
            .curves
            .get_mut(id)
            .ok_or_else(|| FigureError::UnknownCurve(id.to_string()))?;
        Ok(CurveMut::new(
            curve,
            Scene {
                figure: &mut self.figure,
                params: &self.params,
                default_samples: self.sampling_points,
                compiler: self.compiler.as_ref(),
                coercion: self.coercion.as_ref(),
            },
        ))
    }

    /// Curves in registration order.
    pub fn curves(&self) -> impl Iterator<Item = &Curve> + '_ {
        self.curve_order.iter().filter_map(|id| self.curves.get(id))
    }

    pub fn curve_count(&self) -> usize {
        self.curves.len()
    }

    /// Add a fixed set of points drawn as markers. The trace is never
    /// re-sampled; it keeps its data across renders and viewport changes.
    pub fn add_scatter(
        &mut self,
        name: impl Into<String>,
        xs: Vec<Real>,
        ys: Vec<Real>,
    ) -> FigureResult<TraceId> {
        if xs.len() != ys.len() {
            return Err(FigureError::InvalidOption {
                what: "scatter x and y must have the same length",
            });
        }
        let name = name.into();
        let points = xs.len();
        let id = self.figure.batch_update(|figure| {
            let id = figure.add_trace();
            figure.update_trace(id, |t| {
                t.name = name.clone();
                t.mode = TraceMode::Markers;
                t.x = xs;
                t.y = ys;
            });
            id
        });
        surface_event!(self.debug, scatter = %name, trace = id.index(), points, "scatter added");
        Ok(id)
    }

    fn next_auto_id(&self) -> FigureResult<String> {
        (0..AUTO_ID_CAP)
            .map(|n| format!("f_{n}"))
            .find(|id| !self.curves.contains_key(id))
            .ok_or(FigureError::ResourceExhausted { cap: AUTO_ID_CAP })
    }

    // ---- parameters ----

    /// Register a slider for `id`, labelled with the symbol name.
    ///
    /// Registering an id twice replaces the old control in place: its
    /// listeners are dropped with it and the panel keeps one slider.
    pub fn add_param(&mut self, id: impl Into<Symbol>, config: ParamConfig) -> FigureResult<()> {
        let id = id.into();
        let control = ParameterControl::new(id.as_str(), config)?;
        if self.params.insert(id.clone(), control).is_some() {
            warn!(param = %id, "parameter registered twice; replacing previous control");
            self.render()?;
        } else {
            self.param_order.push(id.clone());
            surface_event!(self.debug, param = %id, value = config.value, "parameter added");
        }
        Ok(())
    }

    pub fn param(&self, id: &str) -> Option<&ParameterControl> {
        self.params.get(id)
    }

    /// Controls in registration order.
    pub fn params(&self) -> impl Iterator<Item = (&Symbol, &ParameterControl)> + '_ {
        self.param_order
            .iter()
            .filter_map(|id| self.params.get_key_value(id))
    }

    pub fn set_param_value(&mut self, id: &str, value: f64) -> FigureResult<Option<ParamChange>> {
        let change = param_entry(&mut self.params, id)?.set_value(value);
        self.after_param_change(id, change)
    }

    pub fn drag_param(&mut self, id: &str, position: f64) -> FigureResult<Option<ParamChange>> {
        let change = param_entry(&mut self.params, id)?.drag(position);
        self.after_param_change(id, change)
    }

    pub fn release_param(&mut self, id: &str) -> FigureResult<Option<ParamChange>> {
        let change = param_entry(&mut self.params, id)?.release();
        self.after_param_change(id, change)
    }

    /// Text typed into a slider's entry box. Bad input reverts the text and
    /// is not an error.
    pub fn submit_param_text(&mut self, id: &str, text: &str) -> FigureResult<Option<ParamChange>> {
        let change = param_entry(&mut self.params, id)?.submit_text(text, self.coercion.as_ref());
        self.after_param_change(id, change)
    }

    pub fn reset_param(&mut self, id: &str) -> FigureResult<Option<ParamChange>> {
        let change = param_entry(&mut self.params, id)?.reset();
        self.after_param_change(id, change)
    }

    pub fn set_param_live_update(&mut self, id: &str, live: bool) -> FigureResult<Option<ParamChange>> {
        let change = param_entry(&mut self.params, id)?.set_live_update(live);
        self.after_param_change(id, change)
    }

    /// New slider bounds. A value that no longer fits is pulled to the
    /// nearest bound and the curves re-render.
    pub fn set_param_bounds(
        &mut self,
        id: &str,
        min: f64,
        max: f64,
    ) -> FigureResult<Option<ParamChange>> {
        let change = param_entry(&mut self.params, id)?.set_bounds(min, max)?;
        self.after_param_change(id, change)
    }

    pub fn set_param_step(&mut self, id: &str, step: f64) -> FigureResult<()> {
        param_entry(&mut self.params, id)?.set_step(step)?;
        Ok(())
    }

    pub fn toggle_param_settings(&mut self, id: &str) -> FigureResult<bool> {
        let control = param_entry(&mut self.params, id)?;
        control.toggle_settings();
        Ok(control.settings_open())
    }

    pub fn subscribe_param<F>(&mut self, id: &str, listener: F) -> FigureResult<ListenerId>
    where
        F: FnMut(&ParamChange) + Send + 'static,
    {
        Ok(param_entry(&mut self.params, id)?.subscribe(listener))
    }

    fn after_param_change(
        &mut self,
        id: &str,
        change: Option<ParamChange>,
    ) -> FigureResult<Option<ParamChange>> {
        if let Some(c) = &change {
            surface_event!(self.debug, param = id, old = c.old, new = c.new, source = ?c.source, "parameter changed");
            self.render()?;
        }
        Ok(change)
    }

    // ---- viewport ----

    /// Host-side pan/zoom: record the visible range, then run the throttled
    /// viewport callback. Returns whether curves were re-rendered.
    pub fn relayout(&mut self, axis: Axis, range: Interval) -> FigureResult<bool> {
        let old = self.figure.apply_relayout(axis, range);
        self.on_viewport_change(axis, old, range)
    }

    /// Viewport-change callback.
    ///
    /// Events closer than the cooldown to the last accepted one (or to
    /// surface construction) are dropped, not deferred.
    pub fn on_viewport_change(&mut self, axis: Axis, old: Interval, new: Interval) -> FigureResult<bool> {
        if !self.throttle.try_accept(self.clock.now()) {
            trace!(path = axis.range_path(), %new, "viewport change throttled");
            return Ok(false);
        }
        surface_event!(self.debug, path = axis.range_path(), %old, %new, "viewport changed");
        self.render()?;
        Ok(true)
    }

    /// Re-sample every curve in registration order as one figure redraw.
    ///
    /// Every curve is attempted; the first failure is returned.
    pub fn render(&mut self) -> FigureResult<()> {
        let Self {
            figure,
            curves,
            curve_order,
            params,
            sampling_points,
            debug,
            ..
        } = self;
        surface_event!(*debug, curves = curve_order.len(), "render");
        figure.batch_update(|fig| {
            let mut first_err = None;
            for id in curve_order.iter() {
                let Some(curve) = curves.get(id) else { continue };
                if let Err(err) = curve.draw(fig, params, *sampling_points) {
                    debug!(curve = %id, error = %err, "curve render failed");
                    first_err.get_or_insert(err);
                }
            }
            first_err.map_or(Ok(()), Err)
        })
    }

    /// Configured default x range.
    pub fn x_range(&self) -> Interval {
        self.x_range
    }

    pub fn y_range(&self) -> Interval {
        self.y_range
    }

    /// Visible x range, which differs from [`PlotSurface::x_range`] after
    /// the user pans or zooms.
    pub fn current_x_range(&self) -> Interval {
        self.figure.x_range()
    }

    pub fn current_y_range(&self) -> Interval {
        self.figure.y_range()
    }

    /// Set the x range on the figure and as the new default, then re-render.
    pub fn set_x_range(&mut self, range: impl Into<RawRange>) -> FigureResult<()> {
        let range = resolve_range(self.coercion.as_ref(), "x_range", &range.into())?;
        self.figure.set_range(Axis::X, range);
        self.x_range = range;
        self.render()
    }

    pub fn set_y_range(&mut self, range: impl Into<RawRange>) -> FigureResult<()> {
        let range = resolve_range(self.coercion.as_ref(), "y_range", &range.into())?;
        self.figure.set_range(Axis::Y, range);
        self.y_range = range;
        Ok(())
    }

    pub fn title(&self) -> Option<&str> {
        self.figure.layout().title.as_deref()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.figure.set_title(Some(title.into()));
    }

    pub fn clear_title(&mut self) {
        self.figure.set_title(None);
    }

    /// Edit axis titles, legend visibility or figure height in one redraw.
    /// Ranges go through [`Self::set_x_range`] and [`Self::set_y_range`].
    pub fn update_layout(&mut self, update: LayoutUpdate) -> FigureResult<bool> {
        if update.height == Some(0) {
            return Err(FigureError::InvalidOption {
                what: "figure height must be positive",
            });
        }
        let changed = self.figure.update_layout(update);
        if changed {
            surface_event!(self.debug, "layout updated");
        }
        Ok(changed)
    }

    pub fn sampling_points(&self) -> usize {
        self.sampling_points
    }

    /// Default resolution for curves without their own override.
    pub fn set_sampling_points(&mut self, n: impl Into<RawValue>) -> FigureResult<()> {
        self.sampling_points = self.coercion.coerce_count(&n.into())?;
        self.render()
    }

    // ---- host interface ----

    pub fn figure(&self) -> &FigureWidget {
        &self.figure
    }

    pub fn display(&self) -> &SingleShotDisplay {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut SingleShotDisplay {
        &mut self.display
    }

    /// Plot area beside the parameter panel.
    pub fn layout(&self) -> LayoutNode {
        LayoutNode::plot_with_panel(&self.param_order)
    }

    /// Hand the layout tree to a host. Allowed once per surface.
    pub fn show(&mut self) -> FigureResult<LayoutNode> {
        let tree = self.layout();
        let tree = self.display.show(|| tree)?;
        self.render()?;
        Ok(tree)
    }
}

impl Default for PlotSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PlotSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlotSurface")
            .field("curves", &self.curve_order)
            .field("params", &self.param_order)
            .field("sampling_points", &self.sampling_points)
            .field("x_range", &self.x_range)
            .field("y_range", &self.y_range)
            .field("current_x_range", &self.figure.x_range())
            .field("displayed", &self.display.has_been_displayed())
            .finish_non_exhaustive()
    }
}

fn param_entry<'m>(params: &'m mut ParamMap, id: &str) -> FigureResult<&'m mut ParameterControl> {
    params
        .get_mut(id)
        .ok_or_else(|| FigureError::UnknownParameter(id.to_string()))
}

fn into_option<T>(value: Override<T>) -> Option<T> {
    match value {
        Override::Value(v) => Some(v),
        Override::Unchanged | Override::FigureDefault => None,
    }
}

fn join_symbols(symbols: &[Symbol]) -> String {
    symbols
        .iter()
        .map(Symbol::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_ids_fill_lowest_gap() {
        let mut s = PlotSurface::new();
        s.plot("x", Expr::sym("x"), PlotOptions::new()).unwrap();
        s.plot("x", Expr::sym("x"), PlotOptions::new().id("f_2")).unwrap();
        let id = s.plot("x", Expr::sym("x"), PlotOptions::new()).unwrap().id().to_string();
        assert_eq!(id, "f_1");
        assert_eq!(s.next_auto_id().unwrap(), "f_3");
    }

    #[test]
    fn unknown_parameter_creates_no_trace() {
        let mut s = PlotSurface::new();
        let err = s
            .plot("x", Expr::sym("a") * Expr::sym("x"), PlotOptions::new().parameters(["a"]))
            .unwrap_err();
        assert_eq!(err, FigureError::UnknownParameter("a".into()));
        assert!(s.figure().traces().is_empty());
    }

    #[test]
    fn failed_creation_rolls_back_trace() {
        let mut s = PlotSurface::new();
        s.plot("x", Expr::sym("x"), PlotOptions::new().id("ok")).unwrap();
        let err = s
            .plot("x", Expr::sym("x"), PlotOptions::new().id("bad").x_domain((3, 1)))
            .unwrap_err();
        assert!(matches!(err, FigureError::Range(_)));
        assert_eq!(s.figure().traces().len(), 1);
        assert!(s.curve("bad").is_none());
    }

    #[test]
    fn duplicate_param_replaces_in_place() {
        let mut s = PlotSurface::new();
        s.add_param("a", ParamConfig::new().value(0.5)).unwrap();
        s.add_param("b", ParamConfig::new()).unwrap();
        s.subscribe_param("a", |_| {}).unwrap();
        s.add_param("a", ParamConfig::new().value(-0.5)).unwrap();

        let ids: Vec<_> = s.params().map(|(id, _)| id.as_str().to_string()).collect();
        assert_eq!(ids, ["a", "b"]);
        let a = s.param("a").unwrap();
        assert_eq!(a.value(), -0.5);
        assert_eq!(a.listener_count(), 0);
        assert_eq!(s.layout().sliders().len(), 2);
    }

    #[test]
    fn parameter_list_is_fixed() {
        let mut s = PlotSurface::new();
        s.add_param("a", ParamConfig::new()).unwrap();
        s.add_param("b", ParamConfig::new()).unwrap();
        s.plot("x", Expr::sym("a") * Expr::sym("x"), PlotOptions::new().id("q").parameters(["a"]))
            .unwrap();
        let err = s
            .plot("x", Expr::sym("b") * Expr::sym("x"), PlotOptions::new().id("q").parameters(["b"]))
            .unwrap_err();
        assert!(matches!(err, FigureError::ParameterMismatch { .. }));
        // Omitting the list keeps it.
        s.plot("x", Expr::sym("a") + Expr::sym("x"), PlotOptions::new().id("q"))
            .unwrap();
        assert_eq!(s.curve("q").unwrap().parameters(), &[Symbol::from("a")]);
    }

    #[test]
    fn title_round_trips() {
        let mut s = PlotSurface::with_options(SurfaceOptions::new().with_title("waves")).unwrap();
        assert_eq!(s.title(), Some("waves"));
        s.set_title("fourier");
        assert_eq!(s.title(), Some("fourier"));
        s.clear_title();
        assert_eq!(s.title(), None);
    }

    #[test]
    fn scatter_lengths_must_match() {
        let mut s = PlotSurface::new();
        let err = s.add_scatter("obs", vec![0.0, 1.0], vec![1.0]).unwrap_err();
        assert!(matches!(err, FigureError::InvalidOption { .. }));
        assert!(s.figure().traces().is_empty());
    }

    #[test]
    fn layout_update_rejects_zero_height() {
        let mut s = PlotSurface::new();
        let before = s.figure().redraw_count();
        let err = s
            .update_layout(LayoutUpdate::new().x_title("t").height(0))
            .unwrap_err();
        assert!(matches!(err, FigureError::InvalidOption { .. }));
        assert_eq!(s.figure().layout().x_axis.title, "x");
        assert_eq!(s.figure().redraw_count(), before);
    }

    #[test]
    fn y_range_does_not_resample() {
        let mut s = PlotSurface::new();
        s.plot("x", Expr::sym("x"), PlotOptions::new()).unwrap();
        let before = s.figure().trace(s.curve("f_0").unwrap().trace_id()).unwrap().clone();
        s.set_y_range((-1, 1)).unwrap();
        let after = s.figure().trace(s.curve("f_0").unwrap().trace_id()).unwrap();
        assert_eq!(&before, after);
        assert_eq!(s.current_y_range().as_tuple(), (-1.0, 1.0));
    }
}
