//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.
//!
//! Unresolved references are deliberately absent here: they are substituted
//! with sentinel names and never surface as errors.

use thiserror::Error;

/// Errors raised by the aggregation handlers
#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("Failed to allocate {requested} slots for {what}")]
    AllocationFailed { what: &'static str, requested: usize },
}

/// Errors that can occur while replaying a trace through the callbacks
#[derive(Error, Debug)]
pub enum ReaderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid trace format: {0}")]
    InvalidFormat(String),

    #[error("Callback aborted the stream: {0}")]
    Callback(#[from] AggregateError),
}

/// Errors that can occur during one aggregation session
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Reading definitions failed: {0}")]
    Definitions(#[source] ReaderError),

    #[error("Reading events failed: {0}")]
    Events(#[source] ReaderError),

    #[error(transparent)]
    Aggregate(#[from] AggregateError),
}

/// Errors that can occur while rendering output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}
