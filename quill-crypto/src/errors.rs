// src/errors.rs

//! Error types for cryptographic operations.
//!
//! Every primitive in this crate reports failures through [`CryptoError`].
//! Messages never contain secret material.

use thiserror::Error;

/// Main error type for cryptographic operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Invalid key format or size
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Unsupported entropy size for mnemonic generation
    #[error("Unsupported entropy size: {0} bits (expected 128, 160, 192, 224 or 256)")]
    InvalidEntropy(usize),

    /// Mnemonic phrase could not be parsed
    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    /// HD derivation failed (bad path or derivation math)
    #[error("Derivation error: {0}")]
    DerivationError(String),

    /// Signature generation failed
    #[error("Signature error: {0}")]
    SignatureError(String),

    /// Passphrase key derivation failed
    #[error("Key derivation function error: {0}")]
    KdfError(String),

    /// Encryption failed
    #[error("Encryption error: {0}")]
    EncryptionError(String),

    /// Decryption failed (wrong passphrase or tampered ciphertext)
    #[error("Decryption error: {0}")]
    DecryptionError(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for cryptographic operations
pub type Result<T> = std::result::Result<T, CryptoError>;
