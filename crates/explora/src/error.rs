//! Error types for report construction and rendering.
//!
//! Configuration problems surface at construction time; everything the
//! classifier cannot make sense of degrades to `unknown` instead of erroring.

use thiserror::Error;

/// The main error type for report building.
#[derive(Error, Debug)]
pub enum ReportError {
    /// A verbosity value outside the supported range was supplied.
    #[error("Verbosity for '{parameter}' must be one of [0, 1, 2], not {value}")]
    InvalidVerbosity {
        parameter: &'static str,
        value: i32,
    },

    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// A rendering routine was given nothing to work with.
    #[error("No columns to analyze for {0}")]
    EmptySelection(String),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;
