// src/lib.rs

//! # Quill Crypto
//!
//! Cryptographic primitives for the Quill wallet.
//!
//! The arithmetic lives in audited crates; this crate wraps it behind a
//! small, typed surface:
//!
//! - **Hashing**: Keccak-256 (`sha3`)
//! - **Mnemonics**: BIP-39 phrase generation and seed stretching (`bip39`)
//! - **HD derivation**: BIP-32 secp256k1 child keys (`bip32`)
//! - **Signing**: recoverable ECDSA over secp256k1 (`k256`)
//! - **Encryption**: Argon2id passphrase stretching + AES-256-GCM
//!
//! ## Example Usage
//!
//! ```rust
//! use quill_crypto::{hd, mnemonic};
//!
//! let phrase = mnemonic::generate_mnemonic(256).unwrap();
//! assert_eq!(phrase.word_count(), 24);
//!
//! let seed = phrase.to_seed("").unwrap();
//! let key = hd::derive_secret_key(&seed[..], "m/44'/60'/0'/0/0").unwrap();
//! assert_eq!(key.address().len(), 20);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod errors;
pub mod hash;
pub mod keys;
pub mod mnemonic;
pub mod hd;
pub mod encryption;

// Re-export commonly used types
pub use crate::errors::{CryptoError, Result};
pub use crate::encryption::KdfParams;
pub use crate::keys::{RecoverableSignature, SecretKey};
pub use crate::mnemonic::Mnemonic;

/// Keccak-256 output size
pub const HASH_SIZE: usize = 32;

/// Account address size
pub const ADDRESS_SIZE: usize = 20;

/// secp256k1 private key size
pub const PRIVATE_KEY_SIZE: usize = 32;

/// BIP-39 seed size
pub const SEED_SIZE: usize = 64;

/// AES-256 key size
pub const AES_KEY_SIZE: usize = 32;

/// AES-GCM nonce size
pub const AES_NONCE_SIZE: usize = 12;

/// Argon2id salt size
pub const SALT_SIZE: usize = 32;
