//! Error types for figure, curve and surface operations.

use sf_controls::ControlError;
use sf_core::CoreError;
use sf_expr::{CoerceError, CompileError, EvalError};
use thiserror::Error;

/// Result type for figure operations.
pub type FigureResult<T> = Result<T, FigureError>;

/// Errors raised synchronously by surface and curve operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FigureError {
    /// An interval with `min >= max` (or non-finite bounds).
    #[error("Range error: {0}")]
    Range(#[from] CoreError),

    /// A raw value could not be converted to the requested numeric kind.
    #[error("Coercion error: {0}")]
    Coercion(#[from] CoerceError),

    /// The numeric compiler rejected an expression.
    #[error("Compilation error: {0}")]
    Compilation(#[from] CompileError),

    /// A compiled function was called with the wrong parameter count.
    #[error("Evaluation error: {0}")]
    Evaluation(#[from] EvalError),

    /// Invalid parameter control configuration.
    #[error("Control error: {0}")]
    Control(#[from] ControlError),

    /// Automatic curve identifiers are used up.
    #[error("No available f_n identifiers (max {cap} reached)")]
    ResourceExhausted { cap: usize },

    /// A one-shot display surface was shown twice.
    #[error("Display surface has already been displayed; it supports one-time display only")]
    AlreadyDisplayed,

    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    #[error("Unknown curve: {0}")]
    UnknownCurve(String),

    /// A curve's parameter list is fixed at creation.
    #[error("Curve '{id}' has parameters [{existing}], got [{requested}]")]
    ParameterMismatch {
        id: String,
        existing: String,
        requested: String,
    },

    #[error("Invalid option: {what}")]
    InvalidOption { what: &'static str },
}
