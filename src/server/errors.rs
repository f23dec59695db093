//! Errors shown to HTTP clients.
use derive_more::Display;
use serde::Serialize;

/// Fixed, client-facing error messages. Details stay in the logs.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum HTTPError {
    /// The content service call failed.
    #[display(fmt = "Failed to fetch content list")]
    UpstreamError,
}

/// JSON body of an error response: `{"error": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Client-facing message.
    pub error: String,
}

impl From<HTTPError> for ErrorResponse {
    fn from(value: HTTPError) -> Self {
        Self {
            error: value.to_string(),
        }
    }
}
