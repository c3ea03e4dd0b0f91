// src/lib.rs

//! # Quill Wallet
//!
//! Wallet identity for the Quill wallet.
//!
//! This module provides:
//! - **Key Derivation**: BIP-39 mnemonics and BIP-32 child addresses
//! - **Keystore**: the wallet seed encrypted under the user's passphrase
//! - **Secret Store**: keystore files and the ordered wallet list on disk
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use quill_wallet::{KeyDerivationService, SecretStore};
//! use std::sync::Arc;
//!
//! let store = Arc::new(SecretStore::open(SecretStore::default_root().unwrap()).unwrap());
//! let service = KeyDerivationService::new(store.clone());
//!
//! // Show `created.mnemonic` to the user once
//! let created = service.create_wallet("Alice", "correct horse").unwrap();
//!
//! let wallets = store.list_wallets().unwrap();
//! assert_eq!(wallets.last().unwrap().address, created.address);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod errors;
pub mod keystore;
pub mod store;
pub mod derivation;

// Re-export commonly used types
pub use crate::errors::{WalletError, Result};
pub use crate::keystore::Keystore;
pub use crate::store::{SecretStore, WalletMetadata};
pub use crate::derivation::{CreatedWallet, KeyDerivationService};

/// Keystore file format version
pub const KEYSTORE_VERSION: u32 = 1;

/// Default data directory name under the user's home
pub const DATA_DIR: &str = ".quill-wallet";

/// Keystore subdirectory of the store root
pub const KEYSTORE_DIR: &str = "keystore";

/// Journal subdirectory of the store root
pub const JOURNAL_DIR: &str = "journal";

/// Wallet metadata file name
pub const METADATA_FILE: &str = "walletsMetadata.json";

/// Default BIP-32 prefix (Ethereum mainnet accounts)
pub const DEFAULT_DERIVATION_PATH: &str = "m/44'/60'/0'/0";

/// Default mnemonic entropy (24 words)
pub const DEFAULT_ENTROPY_BITS: usize = 256;
