//! One-shot display guard.

use crate::error::{FigureError, FigureResult};

/// Allows a payload to be produced for display exactly once.
#[derive(Debug, Default, Clone)]
pub struct SingleShotDisplay {
    displayed: bool,
}

impl SingleShotDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce the display payload. Fails with
    /// [`FigureError::AlreadyDisplayed`] on every call after the first; the
    /// payload closure is not invoked in that case.
    pub fn show<P>(&mut self, payload: impl FnOnce() -> P) -> FigureResult<P> {
        if self.displayed {
            return Err(FigureError::AlreadyDisplayed);
        }
        self.displayed = true;
        Ok(payload())
    }

    pub fn has_been_displayed(&self) -> bool {
        self.displayed
    }

    /// Clear the displayed flag.
    ///
    /// Escape hatch only. Showing the same surface twice gives two host
    /// views over one figure, and they will fight over the viewport.
    pub fn reset_display_state(&mut self) {
        self.displayed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_show_fails_without_running_payload() {
        let mut display = SingleShotDisplay::new();
        assert_eq!(display.show(|| 1).unwrap(), 1);
        let mut ran = false;
        let err = display.show(|| ran = true).unwrap_err();
        assert_eq!(err, FigureError::AlreadyDisplayed);
        assert!(!ran);
        assert!(display.has_been_displayed());
    }

    #[test]
    fn reset_allows_another_show() {
        let mut display = SingleShotDisplay::new();
        display.show(|| ()).unwrap();
        display.reset_display_state();
        assert!(!display.has_been_displayed());
        assert!(display.show(|| ()).is_ok());
    }
}
