use sf_expr::ParseError;
use sf_figure::FigureError;
use std::path::PathBuf;
use thiserror::Error;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Invalid expression: {0}")]
    Expression(#[from] ParseError),

    #[error("Invalid parameter '{spec}': {message}")]
    Parameter { spec: String, message: String },

    #[error(transparent)]
    Figure(#[from] FigureError),

    #[error("Failed to read config file: {path}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),

    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
}

