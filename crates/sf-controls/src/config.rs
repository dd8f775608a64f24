//! Construction parameters for a parameter control.

use crate::error::{ControlError, ControlResult};
use serde::{Deserialize, Serialize};

/// Initial value, bounds and step of a parameter control.
///
/// Defaults: value `0.0`, bounds `[-1, 1]`, step `0.01`, live updates on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParamConfig {
    pub value: f64,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub live_update: bool,
}

impl Default for ParamConfig {
    fn default() -> Self {
        Self {
            value: 0.0,
            min: -1.0,
            max: 1.0,
            step: 0.01,
            live_update: true,
        }
    }
}

impl ParamConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(mut self, value: f64) -> Self {
        self.value = value;
        self
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    pub fn live_update(mut self, live: bool) -> Self {
        self.live_update = live;
        self
    }

    /// Check bounds and step.
    pub fn validate(&self) -> ControlResult<()> {
        validate_bounds(self.min, self.max)?;
        validate_step(self.step)?;
        if !self.value.is_finite() {
            return Err(ControlError::InvalidArg {
                what: "value must be finite",
            });
        }
        Ok(())
    }
}

pub(crate) fn validate_bounds(min: f64, max: f64) -> ControlResult<()> {
    if !min.is_finite() || !max.is_finite() {
        return Err(ControlError::InvalidArg {
            what: "bounds must be finite",
        });
    }
    if min > max {
        return Err(ControlError::InvalidBounds { min, max });
    }
    Ok(())
}

pub(crate) fn validate_step(step: f64) -> ControlResult<()> {
    if !(step.is_finite() && step > 0.0) {
        return Err(ControlError::InvalidArg {
            what: "step must be positive",
        });
    }
    Ok(())
}
