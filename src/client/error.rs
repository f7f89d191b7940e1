//! Backend client error types

use thiserror::Error;

/// Errors that can occur when talking to the hotel backend
///
/// Cloneable so one failed in-flight request can be reported to every page
/// that was waiting on it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The backend rejected the session token (HTTP 401 on a data request)
    #[error("Session is no longer valid")]
    Unauthorized,

    /// The backend answered with an error; `message` is its body verbatim
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Request timeout")]
    Timeout,

    #[error("Backend unavailable")]
    Unavailable,

    /// The page that started the request went away first
    #[error("Request cancelled")]
    Cancelled,

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Invalid response: {0}")]
    Decode(String),
}

impl ClientError {
    /// HTTP status carried by the error, if the backend answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Unauthorized => Some(401),
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClientError::Timeout
        } else if e.is_connect() {
            ClientError::Unavailable
        } else if e.is_decode() {
            ClientError::Decode(e.to_string())
        } else {
            ClientError::Request(e.to_string())
        }
    }
}

/// Result type alias for backend calls
pub type ClientResult<T> = Result<T, ClientError>;

/// Human-readable message from an error response body
///
/// JSON bodies contribute their `message` (or `error`) field; anything else is
/// passed through as-is.
pub(crate) fn error_message(status: u16, body: &str) -> String {
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(body) {
        for field in ["message", "error"] {
            if let Some(serde_json::Value::String(message)) = map.get(field) {
                return message.clone();
            }
        }
    }

    let body = body.trim();
    if body.is_empty() {
        format!("Request failed with status {}", status)
    } else {
        body.to_string()
    }
}
