// src/errors.rs

//! Error types for wallet operations.

use quill_core::ErrorKind;
use quill_crypto::CryptoError;
use thiserror::Error;

/// Main error type for wallet operations
#[derive(Debug, Error)]
pub enum WalletError {
    /// Storage root could not be created or resolved
    #[error("Directory error: {0}")]
    Directory(String),

    /// Keystore or metadata could not be serialized
    #[error("Encode error: {0}")]
    Encode(String),

    /// A file could not be durably written
    #[error("Write error: {0}")]
    Write(String),

    /// A file could not be read
    #[error("Read error: {0}")]
    Read(String),

    /// A file's contents could not be parsed
    #[error("Decode error: {0}")]
    Decode(String),

    /// Unsupported entropy size
    #[error("Unsupported entropy size: {0} bits")]
    Entropy(usize),

    /// Mnemonic malformed or derivation path invalid
    #[error("Derivation error: {0}")]
    Derivation(String),

    /// Keystore exposes no address
    #[error("Keystore has no address")]
    NoAddress,

    /// Keystore could not be encrypted
    #[error("Keystore error: {0}")]
    Keystore(String),

    /// Passphrase does not open the keystore
    #[error("Invalid password")]
    InvalidPassword,

    /// Display name rejected
    #[error("Invalid wallet name: {0}")]
    InvalidName(String),

    /// Address already has a stored wallet
    #[error("Wallet already exists: {0}")]
    WalletExists(String),

    /// No wallet stored for the address
    #[error("Wallet not found: {0}")]
    WalletNotFound(String),
}

impl WalletError {
    /// Taxonomy category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            WalletError::Directory(_)
            | WalletError::Write(_)
            | WalletError::Read(_)
            | WalletError::Keystore(_) => ErrorKind::Storage,
            WalletError::Encode(_) | WalletError::Decode(_) => ErrorKind::Encoding,
            WalletError::Derivation(_) | WalletError::NoAddress => ErrorKind::Derivation,
            WalletError::Entropy(_)
            | WalletError::InvalidPassword
            | WalletError::InvalidName(_)
            | WalletError::WalletExists(_)
            | WalletError::WalletNotFound(_) => ErrorKind::Validation,
        }
    }
}

impl From<CryptoError> for WalletError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::InvalidEntropy(bits) => WalletError::Entropy(bits),
            CryptoError::InvalidMnemonic(_)
            | CryptoError::DerivationError(_)
            | CryptoError::InvalidKey(_) => WalletError::Derivation(err.to_string()),
            other => WalletError::Keystore(other.to_string()),
        }
    }
}

/// Result type alias for wallet operations
pub type Result<T> = std::result::Result<T, WalletError>;
