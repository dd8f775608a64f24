//! Parameter controls for slidefig.
//!
//! A [`ParameterControl`] is the state behind one slider in a figure's
//! parameter panel: a bounded scalar that can be dragged, typed into, reset
//! to its default, and re-bounded from a settings panel. Every value change
//! produces a [`ParamChange`] which is returned to the caller and broadcast
//! to subscribed listeners.
//!
//! # Invariants
//!
//! - Value updates (drag, text, programmatic, reset) always land in
//!   `[min, max]`; out-of-range input is clamped, never rejected.
//! - Malformed text input never surfaces an error: the displayed text
//!   reverts to the current value.
//! - Editing the bounds does not move the current value.

pub mod config;
pub mod error;
pub mod event;
pub mod format;
pub mod slider;

pub use config::ParamConfig;
pub use error::{ControlError, ControlResult};
pub use event::{ChangeSource, ListenerId, ParamChange};
pub use format::format_significant;
pub use slider::ParameterControl;
