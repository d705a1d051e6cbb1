//! Error types for telemetry record decoding.

use thiserror::Error;

/// Why a raw telemetry record could not be turned into a reading.
///
/// A bad record is dropped on its own; it never fails the batch it came in.
#[derive(Debug, Error)]
pub enum RecordError {
    /// Payload is not JSON or is missing required fields.
    #[error("Malformed record: {0}")]
    Json(#[from] serde_json::Error),

    /// Timestamp is neither RFC 3339 nor epoch milliseconds in range.
    #[error("Invalid timestamp: {0}")]
    Timestamp(String),

    /// I/O element key is not an integer parameter id.
    #[error("Invalid parameter id: {0}")]
    ParameterId(String),

    /// I/O element value is not numeric.
    #[error("Invalid value for parameter {id}: {value}")]
    Value { id: u32, value: String },
}
