//! Unified error types for siteasset.
//!
//! Display strings carry a stable code prefix so that transport layers and
//! logs can match on the failure class.

use rmcp::model::{ErrorCode, ErrorData as McpError};
use tokio_rusqlite::rusqlite;

use crate::asset::data_url::DataUrlError;

/// Unified error types for siteasset.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reference string does not match `asset:<kind>[-<size>]:<locator>`.
    #[error("MALFORMED_REFERENCE: {0}")]
    MalformedReference(String),

    /// Invalid input parameters (e.g., empty site locator).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Stored or supplied `data:` URL could not be decoded.
    #[error("DECODE_ERROR: {0}")]
    Decode(#[from] DataUrlError),

    /// Database operation failed.
    #[error("CACHE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("CACHE_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// Reading a static asset failed for a reason other than absence.
    #[error("IO_ERROR: {0}")]
    Io(#[from] std::io::Error),
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::MalformedReference(msg) => (-32602, msg.clone()),
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::Decode(e) => (-32602, e.to_string()),
            Error::Database(e) => (-32002, e.to_string()),
            Error::MigrationFailed(msg) => (-32002, msg.clone()),
            Error::Io(e) => (-32603, e.to_string()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}
