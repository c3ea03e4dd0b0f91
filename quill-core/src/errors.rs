// src/errors.rs

//! Error types for ledger values and transactions.
//!
//! Also defines [`ErrorKind`], the category every error in the workspace
//! reports through its `kind()` method. The HTTP layer and the send state
//! machine only look at the category.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error category shared by every crate in the workspace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Filesystem or keystore persistence failed
    Storage,
    /// A value could not be serialized or deserialized
    Encoding,
    /// Mnemonic or key derivation failed
    Derivation,
    /// A read-only ledger query failed
    Query,
    /// A transaction could not be signed
    Signing,
    /// The ledger rejected or never received a transaction
    Broadcast,
    /// User input was rejected
    Validation,
}

impl ErrorKind {
    /// Stable lowercase name used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Storage => "storage",
            ErrorKind::Encoding => "encoding",
            ErrorKind::Derivation => "derivation",
            ErrorKind::Query => "query",
            ErrorKind::Signing => "signing",
            ErrorKind::Broadcast => "broadcast",
            ErrorKind::Validation => "validation",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main error type for core operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Amount string is not a non-negative decimal number
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Address string is malformed or fails its checksum
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Transaction is missing a required field
    #[error("Incomplete transaction: {0}")]
    IncompleteTransaction(String),

    /// Signing failed or the key does not control the sender
    #[error("Signing error: {0}")]
    Signing(String),

    /// Signed transaction is internally inconsistent
    #[error("Encode error: {0}")]
    Encode(String),
}

impl CoreError {
    /// Taxonomy category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::InvalidAmount(_)
            | CoreError::InvalidAddress(_)
            | CoreError::IncompleteTransaction(_) => ErrorKind::Validation,
            CoreError::Signing(_) => ErrorKind::Signing,
            CoreError::Encode(_) => ErrorKind::Encoding,
        }
    }
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::InvalidAmount("abc".to_string());
        assert_eq!(format!("{}", err), "Invalid amount: abc");
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(CoreError::InvalidAddress("x".into()).kind(), ErrorKind::Validation);
        assert_eq!(CoreError::Signing("x".into()).kind(), ErrorKind::Signing);
        assert_eq!(CoreError::Encode("x".into()).kind(), ErrorKind::Encoding);
    }

    #[test]
    fn test_kind_wire_name() {
        assert_eq!(ErrorKind::Broadcast.to_string(), "broadcast");
        assert_eq!(
            serde_json::to_string(&ErrorKind::Validation).unwrap(),
            "\"validation\""
        );
    }
}
