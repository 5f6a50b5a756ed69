//! OTP client error types.

use super::convert::ConversionError;

/// Errors from a single OTP `/plan` request.
///
/// These never leave the client: the retry loop in
/// [`OtpClient::plan_route`](super::OtpClient::plan_route) decides which
/// ones are worth another attempt and turns the rest into `None`.
#[derive(Debug, thiserror::Error)]
pub enum OtpError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Rate limited by the server
    #[error("rate limited by OTP server")]
    RateLimited,

    /// Server returned a non-success status
    #[error("OTP request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    /// Response body was not the expected JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// The plan has itineraries but not the fields we need
    #[error("malformed plan: {0}")]
    MalformedPlan(#[from] ConversionError),

    /// Invalid client configuration
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl OtpError {
    /// Whether another attempt at the same request could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            OtpError::Http(_) | OtpError::RateLimited | OtpError::Status { .. } | OtpError::Json { .. }
        )
    }
}
