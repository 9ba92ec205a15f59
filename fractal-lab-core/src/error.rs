use thiserror::Error;

/// Errors originating from parameter construction and parsing.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("invalid color: {0:?} (expected six hex digits, optionally prefixed with '#')")]
    InvalidColor(String),

    #[error("{field} out of range: {value} (must be within {min}..={max})")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}
