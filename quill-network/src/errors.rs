// src/errors.rs

//! Error types for ledger access.
//!
//! [`LedgerError`] is what a [`LedgerClient`](crate::LedgerClient) reports
//! for a single call. [`NetworkError`] is what the components built on it
//! return, tagged with the operation that failed.

use quill_core::ErrorKind;
use thiserror::Error;

/// Failure of a single ledger call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Request never completed (connection, timeout, HTTP status)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Node answered with a JSON-RPC error object
    #[error("RPC error ({code}): {message}")]
    Rpc {
        /// JSON-RPC error code
        code: i64,
        /// Error message from the node
        message: String,
    },

    /// Response carried neither a result nor an error
    #[error("Empty response")]
    EmptyResponse,

    /// Result could not be interpreted
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for LedgerError {
    fn from(err: reqwest::Error) -> Self {
        LedgerError::Transport(err.to_string())
    }
}

/// Main error type for network operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    /// Read-only query failed
    #[error("Query failed: {0}")]
    Query(LedgerError),

    /// Either transaction count query failed while resolving a nonce
    #[error("Nonce query failed: {0}")]
    NonceQuery(LedgerError),

    /// Ledger did not accept the transaction
    #[error("Broadcast failed: {0}")]
    Broadcast(LedgerError),

    /// Endpoint URL or client settings rejected
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

impl NetworkError {
    /// Taxonomy category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            NetworkError::Query(_) | NetworkError::NonceQuery(_) => ErrorKind::Query,
            NetworkError::Broadcast(_) => ErrorKind::Broadcast,
            NetworkError::InvalidEndpoint(_) => ErrorKind::Validation,
        }
    }
}

/// Result type alias for network operations
pub type Result<T> = std::result::Result<T, NetworkError>;
