//! Survey input error types.

/// Errors that can occur when reading survey data.
#[derive(Debug, thiserror::Error)]
pub enum SurveyError {
    /// CSV could not be read or a row could not be decoded
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the header row
    #[error("missing column: {0}")]
    MissingColumn(&'static str),

    /// A location field is not valid JSON
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A location entry is not a `lat,lon` pair
    #[error("invalid coordinate string: {0:?}")]
    BadCoordinate(String),
}
