//! Client-side API error types

use thiserror::Error;

/// Errors that can occur when talking to the project store API
#[derive(Debug, Error)]
pub enum ApiError {
    /// Could not reach the server
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Request timed out
    #[error("request timed out after {0}ms")]
    Timeout(u64),

    /// Response body could not be decoded
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// Server reported the project was not found (404)
    #[error("not found: {0}")]
    NotFound(String),

    /// Server reported a conflict or invalid payload (400)
    #[error("conflict: {0}")]
    Conflict(String),

    /// Server reported the backing store unavailable (503)
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// Any other non-success status
    #[error("server error [{status}]: {message}")]
    Server { status: u16, message: String },
}

impl ApiError {
    /// Map a non-success HTTP status plus server message to the taxonomy
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            404 => ApiError::NotFound(message),
            400 => ApiError::Conflict(message),
            503 => ApiError::StoreUnavailable(message),
            _ => ApiError::Server { status, message },
        }
    }
}
