/**
 * Client Error Types
 *
 * Errors raised by the desktop client when talking to the REST backend or to
 * the local session file.
 *
 * # Error Categories
 *
 * - `Network` - the request never got a response (connection refused, timeout)
 * - `Server` - the backend answered with a non-2xx status
 * - `Decode` - the response body was not the JSON we expected
 * - `Storage` - the session file could not be read or written
 * - `Validation` - input rejected before any request was made
 *
 * Poll loops log and swallow these; only sends and form submissions surface
 * them to the user.
 */
use thiserror::Error;

use crate::shared::ValidationError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Transport-level failure
    #[error("Network error: {message}")]
    Network { message: String },

    /// Non-success HTTP status
    #[error("Server error {status}: {body}")]
    Server { status: u16, body: String },

    /// Malformed or unexpected response body
    #[error("Decode error: {message}")]
    Decode { message: String },

    /// Session file I/O or (de)serialization
    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ClientError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn server(status: u16, body: impl Into<String>) -> Self {
        Self::Server {
            status,
            body: body.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Whether the failure happened before reaching the backend
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Network { .. })
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::decode(err.to_string())
        } else if let Some(status) = err.status() {
            Self::server(status.as_u16(), err.to_string())
        } else {
            Self::network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::decode(format!("JSON error: {}", err))
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::storage(err.to_string())
    }
}
