use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Invalid range for {what}: min ({min}) must be less than max ({max})")]
    InvalidRange {
        what: &'static str,
        min: f64,
        max: f64,
    },

    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },
}
