//! Error types for parameter control operations.

use thiserror::Error;

/// Result type for parameter control operations.
pub type ControlResult<T> = Result<T, ControlError>;

/// Errors that can occur when configuring a parameter control.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    /// Invalid argument provided to a control function.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Bounds with `min > max`.
    #[error("Invalid bounds: min ({min}) must not exceed max ({max})")]
    InvalidBounds { min: f64, max: f64 },
}
