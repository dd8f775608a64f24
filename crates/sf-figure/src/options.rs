//! Surface construction options.

use crate::error::{FigureError, FigureResult};
use serde::{Deserialize, Serialize};
use sf_core::Interval;
use std::time::Duration;

const DEFAULT_X_RANGE: Interval = Interval::const_new(-4.0, 4.0);
const DEFAULT_Y_RANGE: Interval = Interval::const_new(-3.0, 3.0);

/// Options for [`crate::PlotSurface::with_options`].
///
/// Every field has a default, so a partial YAML/JSON document is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceOptions {
    /// Default number of samples per curve.
    pub sampling_points: usize,
    pub x_range: Interval,
    pub y_range: Interval,
    /// Minimum spacing of accepted viewport-change events, in seconds.
    pub relayout_cooldown_s: f64,
    /// Log surface events at `debug` instead of `trace`.
    pub debug: bool,
    pub title: Option<String>,
    /// Figure height in pixels.
    pub figure_height: u32,
}

impl Default for SurfaceOptions {
    fn default() -> Self {
        Self {
            sampling_points: 500,
            x_range: DEFAULT_X_RANGE,
            y_range: DEFAULT_Y_RANGE,
            relayout_cooldown_s: 0.5,
            debug: false,
            title: None,
            figure_height: 600,
        }
    }
}

impl SurfaceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sampling_points(mut self, n: usize) -> Self {
        self.sampling_points = n;
        self
    }

    pub fn with_x_range(mut self, min: f64, max: f64) -> FigureResult<Self> {
        self.x_range = Interval::named("x_range", min, max)?;
        Ok(self)
    }

    pub fn with_y_range(mut self, min: f64, max: f64) -> FigureResult<Self> {
        self.y_range = Interval::named("y_range", min, max)?;
        Ok(self)
    }

    pub fn with_cooldown(mut self, seconds: f64) -> Self {
        self.relayout_cooldown_s = seconds;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Check values serde cannot: positive sampling and a usable cooldown.
    pub fn validate(&self) -> FigureResult<()> {
        if self.sampling_points == 0 {
            return Err(FigureError::InvalidOption {
                what: "sampling_points must be positive",
            });
        }
        self.cooldown()?;
        if self.figure_height == 0 {
            return Err(FigureError::InvalidOption {
                what: "figure_height must be positive",
            });
        }
        Ok(())
    }

    pub(crate) fn cooldown(&self) -> FigureResult<Duration> {
        Duration::try_from_secs_f64(self.relayout_cooldown_s).map_err(|_| {
            FigureError::InvalidOption {
                what: "relayout_cooldown_s must be finite and non-negative",
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let opts = SurfaceOptions::default();
        assert_eq!(opts.sampling_points, 500);
        assert_eq!(opts.x_range.as_tuple(), (-4.0, 4.0));
        assert_eq!(opts.y_range.as_tuple(), (-3.0, 3.0));
        assert_eq!(opts.cooldown().unwrap(), Duration::from_millis(500));
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn rejects_bad_values() {
        assert!(SurfaceOptions::new().with_sampling_points(0).validate().is_err());
        assert!(SurfaceOptions::new().with_cooldown(-1.0).validate().is_err());
        assert!(SurfaceOptions::new().with_cooldown(f64::NAN).validate().is_err());
        assert!(matches!(
            SurfaceOptions::new().with_x_range(1.0, 1.0),
            Err(FigureError::Range(_))
        ));
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let opts: SurfaceOptions =
            serde_yaml::from_str("sampling_points: 64\nx_range: [0.0, 1.0]\n").unwrap();
        assert_eq!(opts.sampling_points, 64);
        assert_eq!(opts.x_range.as_tuple(), (0.0, 1.0));
        assert_eq!(opts.y_range.as_tuple(), (-3.0, 3.0));
        assert!(!opts.debug);
    }

    #[test]
    fn yaml_with_inverted_range_is_rejected() {
        let res: Result<SurfaceOptions, _> = serde_yaml::from_str("x_range: [2.0, -2.0]\n");
        assert!(res.is_err());
    }
}
