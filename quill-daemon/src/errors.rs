// src/errors.rs

//! Error types for daemon operations.

use crate::session::SendPhase;
use quill_core::{CoreError, ErrorKind};
use quill_network::NetworkError;
use quill_wallet::WalletError;
use thiserror::Error;

/// Main error type for daemon operations
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Wallet storage or derivation error
    #[error(transparent)]
    Wallet(#[from] WalletError),

    /// Amount, address or signing error
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Ledger error
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// Action not allowed in the current send phase
    #[error("Cannot {action} while send is {phase}")]
    InvalidTransition {
        /// Phase the request was in
        phase: SendPhase,
        /// Rejected action
        action: &'static str,
    },

    /// Send request failed its precondition
    #[error("Invalid send request: {0}")]
    InvalidRequest(String),

    /// No stored wallet has this address
    #[error("Unknown wallet: {0}")]
    UnknownWallet(String),

    /// Blocking worker task failed
    #[error("Worker task failed: {0}")]
    Task(String),

    /// RPC server error
    #[error("RPC error: {0}")]
    Rpc(String),
}

impl ServiceError {
    /// Taxonomy category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Wallet(e) => e.kind(),
            ServiceError::Core(e) => e.kind(),
            ServiceError::Network(e) => e.kind(),
            ServiceError::Config(_)
            | ServiceError::InvalidTransition { .. }
            | ServiceError::InvalidRequest(_)
            | ServiceError::UnknownWallet(_) => ErrorKind::Validation,
            ServiceError::Task(_) | ServiceError::Rpc(_) => ErrorKind::Storage,
        }
    }
}

impl From<tokio::task::JoinError> for ServiceError {
    fn from(err: tokio::task::JoinError) -> Self {
        ServiceError::Task(err.to_string())
    }
}

/// Result type alias for daemon operations
pub type Result<T> = std::result::Result<T, ServiceError>;
