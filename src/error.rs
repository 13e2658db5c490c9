//! Error taxonomy for backend requests.

use thiserror::Error;

/// Everything that can go wrong talking to the backend.
///
/// The UI treats all variants the same way (see [`crate::report`]); the split exists so
/// logs and tests can tell them apart.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    /// The request never produced a response (connect, timeout, I/O).
    #[error("Request failed: {0}")]
    Network(String),

    /// The backend answered with a non-success status code.
    #[error("HTTP error! status: {status}")]
    Http { status: u16 },

    /// The response body could not be decoded.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// The backend accepted the query but reported that processing failed.
    #[error("Query failed: {0}")]
    Backend(String),
}

impl ClientError {
    /// Classify a reqwest error. Decode failures are parse errors, everything else is a
    /// network failure. Status codes are checked on the response, not here.
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Parse(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Parse(err.to_string())
    }
}
