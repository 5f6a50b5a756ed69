//! Trip export error types.

/// Errors that can occur when writing the trips document.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Nothing to write
    #[error("no trips to export")]
    NoTrips,

    /// Output file could not be written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Document could not be serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
