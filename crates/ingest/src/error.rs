//! Ingestion errors.

use std::path::PathBuf;

/// Errors raised while reading or converting fill sources.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// The source file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The payload is not valid JSON for the expected shape.
    #[error("invalid fill payload: {0}")]
    Json(#[from] serde_json::Error),
    /// A string-encoded decimal did not parse to a finite number.
    #[error("invalid number in field `{field}`: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
}

/// Parse a string-encoded decimal, rejecting NaN and infinities.
pub(crate) fn parse_decimal(field: &'static str, value: &str) -> Result<f64, IngestError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| IngestError::InvalidNumber {
            field,
            value: value.to_string(),
        })
}
