//! Response and error-response types shared between adapters and transport.

use serde::Serialize;

/// A raw provider response: undecoded bytes plus the HTTP status code.
/// Each adapter owns the unwrapping of its provider's envelope shape.
#[derive(Clone, Debug)]
pub struct Response {
    /// Raw response body
    pub response: bytes::Bytes,
    /// HTTP status code
    pub status_code: u16,
}

/// Provider error detail normalized at the adapter boundary.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ErrorResponse {
    /// HTTP status code of the failed call
    pub status_code: u16,
    /// Provider error code, or [`crate::consts::NO_ERROR_CODE`]
    pub code: String,
    /// Provider error message, or [`crate::consts::NO_ERROR_MESSAGE`]
    pub message: String,
    /// Longer human-readable detail when the provider nests one
    pub reason: Option<String>,
}

impl ErrorResponse {
    /// The best available human-readable description of the failure.
    pub fn best_detail(&self) -> String {
        self.reason.clone().unwrap_or_else(|| self.message.clone())
    }
}
