//! Session store error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised when writing the session
///
/// Reads never fail; a store that cannot be read behaves as empty.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Session file could not be written
    #[error("Failed to write session file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Session record could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Lock poisoned by a panicking writer
    #[error("Lock error: {0}")]
    Lock(String),
}

/// Result type alias for session operations
pub type SessionResult<T> = Result<T, SessionError>;
