//! Error handling for snapshot ingestion
//!
//! Ingestion is the only fallible boundary in the crate. Malformed or
//! incomplete *data* inside a well-formed snapshot never surfaces as an
//! error: missing datasets resolve to empty slices, unparseable scalars
//! coerce to safe defaults, and unknown entity keys produce empty views.

use thiserror::Error;

/// Errors raised while loading a snapshot payload
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("snapshot payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("snapshot root must be a JSON object, found {0}")]
    NotAnObject(&'static str),

    #[error("failed to read snapshot payload: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for ingestion
pub type SnapshotResult<T> = Result<T, SnapshotError>;
