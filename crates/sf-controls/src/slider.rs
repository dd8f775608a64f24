//! Bounded scalar slider with text entry, reset and a settings panel.

use crate::config::{ParamConfig, validate_bounds, validate_step};
use crate::error::ControlResult;
use crate::event::{ChangeSource, Listener, ListenerId, ParamChange};
use crate::format::format_significant;
use sf_expr::{RawValue, ValueCoercion};
use std::fmt;
use tracing::debug;

/// Significant digits shown in the text field.
const DISPLAY_DIGITS: usize = 4;

/// State of one parameter slider.
///
/// All value-changing transitions return `Some(ParamChange)` when the value
/// actually changed and `None` otherwise. Listeners registered with
/// [`ParameterControl::subscribe`] see the same changes.
pub struct ParameterControl {
    label: String,
    value: f64,
    default: f64,
    min: f64,
    max: f64,
    step: f64,
    live_update: bool,
    /// Drag position not yet committed (non-live mode).
    pending: Option<f64>,
    text: String,
    settings_open: bool,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
}

impl ParameterControl {
    /// Create a control. The initial value is clamped into the bounds and
    /// becomes the reset default.
    pub fn new(label: impl Into<String>, config: ParamConfig) -> ControlResult<Self> {
        config.validate()?;
        let value = config.value.clamp(config.min, config.max);
        Ok(Self {
            label: label.into(),
            value,
            default: value,
            min: config.min,
            max: config.max,
            step: config.step,
            live_update: config.live_update,
            pending: None,
            text: format_significant(value, DISPLAY_DIGITS),
            settings_open: false,
            listeners: Vec::new(),
            next_listener: 0,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn default_value(&self) -> f64 {
        self.default
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn live_update(&self) -> bool {
        self.live_update
    }

    /// Text currently shown in the entry field.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Slider position: the pending drag position if any, else the value.
    pub fn position(&self) -> f64 {
        self.pending.unwrap_or(self.value)
    }

    pub fn settings_open(&self) -> bool {
        self.settings_open
    }

    pub fn toggle_settings(&mut self) {
        self.settings_open = !self.settings_open;
    }

    /// Current configuration, usable to rebuild an equivalent control.
    pub fn config(&self) -> ParamConfig {
        ParamConfig {
            value: self.value,
            min: self.min,
            max: self.max,
            step: self.step,
            live_update: self.live_update,
        }
    }

    /// Slider drag. In live mode the value commits immediately; otherwise the
    /// position is held until [`ParameterControl::release`].
    pub fn drag(&mut self, position: f64) -> Option<ParamChange> {
        if !position.is_finite() {
            return None;
        }
        let position = self.clamp(position);
        if self.live_update {
            self.commit(position, ChangeSource::Drag)
        } else {
            self.pending = Some(position);
            None
        }
    }

    /// End of a drag gesture: commits any held position.
    pub fn release(&mut self) -> Option<ParamChange> {
        let position = self.pending.take()?;
        self.commit(position, ChangeSource::Drag)
    }

    /// Set the value from code. Clamped into bounds; non-finite input is ignored.
    pub fn set_value(&mut self, value: f64) -> Option<ParamChange> {
        if !value.is_finite() {
            return None;
        }
        let value = self.clamp(value);
        self.commit(value, ChangeSource::Programmatic)
    }

    /// Free-text entry: coerce (allowing truncation), clamp, commit.
    ///
    /// On coercion failure the text reverts to the current value and `None`
    /// is returned; the error is not propagated.
    pub fn submit_text(
        &mut self,
        text: &str,
        coercion: &dyn ValueCoercion,
    ) -> Option<ParamChange> {
        // Echo of our own formatting (or raw repr) is not new input.
        if text == self.text || text == self.value.to_string() {
            return None;
        }
        match coercion.coerce_real(&RawValue::from(text), true) {
            Ok(v) if v.is_finite() => {
                let v = self.clamp(v);
                let change = self.commit(v, ChangeSource::Text);
                // Clamping can leave the value unchanged while the text differs.
                self.text = format_significant(self.value, DISPLAY_DIGITS);
                change
            }
            Ok(_) => {
                self.revert_text();
                None
            }
            Err(err) => {
                debug!(label = %self.label, input = text, error = %err, "rejected parameter text");
                self.revert_text();
                None
            }
        }
    }

    /// Restore the value captured at construction, clamped to the current
    /// bounds.
    pub fn reset(&mut self) -> Option<ParamChange> {
        self.pending = None;
        let default = self.clamp(self.default);
        self.commit(default, ChangeSource::Reset)
    }

    /// New slider bounds.
    ///
    /// A value that still fits is left alone. A value outside the new range
    /// is pulled to the nearest bound and reported as a
    /// [`ChangeSource::Bounds`] change. A held drag position is clamped too,
    /// and a later `reset` clamps the default.
    pub fn set_bounds(&mut self, min: f64, max: f64) -> ControlResult<Option<ParamChange>> {
        validate_bounds(min, max)?;
        self.min = min;
        self.max = max;
        self.pending = self.pending.map(|p| self.clamp(p));
        let value = self.clamp(self.value);
        Ok(self.commit(value, ChangeSource::Bounds))
    }

    pub fn set_min(&mut self, min: f64) -> ControlResult<Option<ParamChange>> {
        self.set_bounds(min, self.max)
    }

    pub fn set_max(&mut self, max: f64) -> ControlResult<Option<ParamChange>> {
        self.set_bounds(self.min, max)
    }

    pub fn set_step(&mut self, step: f64) -> ControlResult<()> {
        validate_step(step)?;
        self.step = step;
        Ok(())
    }

    /// Switch live updates. Turning them on commits a held drag position.
    pub fn set_live_update(&mut self, live: bool) -> Option<ParamChange> {
        self.live_update = live;
        if live { self.release() } else { None }
    }

    /// Register a change listener.
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&ParamChange) + Send + 'static,
    {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn clamp(&self, v: f64) -> f64 {
        // Not f64::clamp: bounds edited to min == max must not panic, and
        // min <= max is already guaranteed.
        v.max(self.min).min(self.max)
    }

    fn revert_text(&mut self) {
        self.text = format_significant(self.value, DISPLAY_DIGITS);
    }

    fn commit(&mut self, new: f64, source: ChangeSource) -> Option<ParamChange> {
        let old = self.value;
        self.value = new;
        self.text = format_significant(new, DISPLAY_DIGITS);
        if old == new {
            return None;
        }
        let change = ParamChange { old, new, source };
        for (_, listener) in &mut self.listeners {
            listener(&change);
        }
        Some(change)
    }
}

impl fmt::Debug for ParameterControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterControl")
            .field("label", &self.label)
            .field("value", &self.value)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("step", &self.step)
            .field("live_update", &self.live_update)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sf_expr::ExprCoercion;
    use std::sync::{Arc, Mutex};

    fn control(value: f64, min: f64, max: f64) -> ParameterControl {
        ParameterControl::new("a", ParamConfig::new().value(value).range(min, max)).unwrap()
    }

    #[test]
    fn construction_clamps_and_captures_default() {
        let c = control(5.0, 0.0, 1.0);
        assert_eq!(c.value(), 1.0);
        assert_eq!(c.default_value(), 1.0);
        assert_eq!(c.text(), "1");
    }

    #[test]
    fn drag_commits_in_live_mode() {
        let mut c = control(0.5, 0.0, 1.0);
        let change = c.drag(0.8).unwrap();
        assert_eq!((change.old, change.new), (0.5, 0.8));
        assert_eq!(change.source, ChangeSource::Drag);
        assert_eq!(c.text(), "0.8");
    }

    #[test]
    fn drag_holds_until_release_when_not_live() {
        let mut c = ParameterControl::new(
            "a",
            ParamConfig::new().value(0.5).range(0.0, 1.0).live_update(false),
        )
        .unwrap();
        assert!(c.drag(0.7).is_none());
        assert_eq!(c.value(), 0.5);
        assert_eq!(c.position(), 0.7);
        let change = c.release().unwrap();
        assert_eq!(change.new, 0.7);
        assert!(c.release().is_none());
    }

    #[test]
    fn text_input_is_clamped() {
        let mut c = control(0.5, 0.0, 1.0);
        let change = c.submit_text("3", &ExprCoercion).unwrap();
        assert_eq!(change.new, 1.0);
        assert_eq!(change.source, ChangeSource::Text);
        assert_eq!(c.text(), "1");
    }

    #[test]
    fn text_input_accepts_expressions_and_prefixes() {
        let mut c = control(0.0, -10.0, 10.0);
        c.submit_text("pi/2", &ExprCoercion).unwrap();
        assert!((c.value() - std::f64::consts::FRAC_PI_2).abs() < 1e-15);
        assert_eq!(c.text(), "1.571");

        c.submit_text("2.5xyz", &ExprCoercion).unwrap();
        assert_eq!(c.value(), 2.5);
    }

    #[test]
    fn malformed_text_reverts_silently() {
        let mut c = control(0.25, 0.0, 1.0);
        assert!(c.submit_text("hello", &ExprCoercion).is_none());
        assert!(c.submit_text("*", &ExprCoercion).is_none());
        assert_eq!(c.value(), 0.25);
        assert_eq!(c.text(), "0.25");
    }

    #[test]
    fn echoed_text_is_ignored() {
        let mut c = control(0.25, 0.0, 1.0);
        let seen = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&seen);
        c.subscribe(move |_| *counter.lock().unwrap() += 1);
        assert!(c.submit_text("0.25", &ExprCoercion).is_none());
        assert_eq!(*seen.lock().unwrap(), 0);
    }

    #[test]
    fn reset_restores_default() {
        let mut c = control(0.5, 0.0, 1.0);
        c.set_value(0.9);
        let change = c.reset().unwrap();
        assert_eq!(change.source, ChangeSource::Reset);
        assert_eq!(c.value(), 0.5);
        assert!(c.reset().is_none());
    }

    #[test]
    fn bounds_change_keeps_a_value_that_still_fits() {
        let mut c = control(0.4, 0.0, 1.0);
        let seen = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&seen);
        c.subscribe(move |_| *counter.lock().unwrap() += 1);

        assert_eq!(c.set_bounds(0.0, 0.5).unwrap(), None);
        assert_eq!(c.value(), 0.4);
        assert_eq!(*seen.lock().unwrap(), 0);
        c.set_value(0.8);
        assert_eq!(c.value(), 0.5);
    }

    #[test]
    fn bounds_change_pulls_value_inside() {
        let mut c = control(0.9, 0.0, 1.0);
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        c.subscribe(move |ch| sink.lock().unwrap().push(*ch));

        let change = c.set_bounds(0.0, 0.5).unwrap().unwrap();
        assert_eq!((change.old, change.new), (0.9, 0.5));
        assert_eq!(change.source, ChangeSource::Bounds);
        assert_eq!(c.value(), 0.5);
        assert_eq!(c.text(), "0.5");
        assert_eq!(*log.lock().unwrap(), vec![change]);

        let change = c.set_max(0.3).unwrap().unwrap();
        assert_eq!((change.old, change.new), (0.5, 0.3));
        assert_eq!(c.bounds(), (0.0, 0.3));

        assert!(c.set_min(0.6).is_err());
        assert!(c.set_bounds(2.0, 1.0).is_err());
        assert_eq!(c.bounds(), (0.0, 0.3));
        assert_eq!(c.value(), 0.3);
        assert!(c.set_step(-1.0).is_err());
    }

    #[test]
    fn bounds_change_clamps_held_drag_and_reset() {
        let mut c = ParameterControl::new(
            "a",
            ParamConfig::new().value(0.9).range(0.0, 1.0).live_update(false),
        )
        .unwrap();
        c.drag(0.8);
        c.set_bounds(0.0, 0.3).unwrap();
        assert_eq!(c.position(), 0.3);
        assert_eq!(c.value(), 0.3);
        // The held position now equals the clamped value.
        assert!(c.release().is_none());

        c.set_bounds(0.0, 0.2).unwrap();
        c.set_bounds(0.0, 1.0).unwrap();
        c.set_value(0.1);
        c.set_bounds(0.0, 0.5).unwrap();
        // The captured default (0.9) no longer fits.
        assert_eq!(c.reset().unwrap().new, 0.5);
    }

    #[test]
    fn listeners_see_every_change() {
        let mut c = control(0.0, -1.0, 1.0);
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        let id = c.subscribe(move |ch| sink.lock().unwrap().push(ch.source));

        c.drag(0.1);
        c.submit_text("0.2", &ExprCoercion);
        c.set_value(0.3);
        c.reset();
        c.set_value(0.0); // no change, no event

        assert_eq!(
            *log.lock().unwrap(),
            vec![
                ChangeSource::Drag,
                ChangeSource::Text,
                ChangeSource::Programmatic,
                ChangeSource::Reset
            ]
        );
        assert!(c.unsubscribe(id));
        assert!(!c.unsubscribe(id));
        assert_eq!(c.listener_count(), 0);
    }

    #[test]
    fn settings_toggle() {
        let mut c = control(0.0, -1.0, 1.0);
        assert!(!c.settings_open());
        c.toggle_settings();
        assert!(c.settings_open());
    }
}
