// src/lib.rs

//! # Quill Core
//!
//! Ledger types for the Quill wallet: checksummed addresses, wei amounts,
//! and the build → sign → encode path for value transfers.
//!
//! ## Transactions
//!
//! Transfers are EIP-155 legacy transactions. A [`TransactionBuilder`]
//! resolves user input into a [`ResolvedTransaction`]; signing consumes
//! it and yields a [`SignedTransaction`] whose RLP encoding is what the
//! ledger accepts.
//!
//! ## Example Usage
//!
//! ```rust
//! use quill_core::{Address, SecretKey, TransactionBuilder};
//!
//! let key = SecretKey::from_bytes(&[0x46; 32]).unwrap();
//! let from = Address::from(key.address());
//! let to: Address = "0x3535353535353535353535353535353535353535".parse().unwrap();
//!
//! let signed = TransactionBuilder::new()
//!     .from(from)
//!     .to(to)
//!     .value_eth("0.25")
//!     .nonce(0)
//!     .build()
//!     .unwrap()
//!     .sign(&key)
//!     .unwrap();
//!
//! let raw = signed.encode().unwrap();
//! assert!(!raw.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod errors;
pub mod transaction;
pub mod transaction_builder;
pub mod types;

// Re-export crypto for convenience
pub use quill_crypto;

// Re-export commonly used types
pub use crate::errors::{CoreError, ErrorKind, Result};
pub use crate::transaction::{ResolvedTransaction, SignedTransaction};
pub use crate::transaction_builder::TransactionBuilder;
pub use crate::types::{format_balance, format_ether, parse_ether, Address, TxHash, Wei};
pub use quill_crypto::SecretKey;

/// Ethereum mainnet chain id
pub const DEFAULT_CHAIN_ID: u64 = 1;

/// Default gas limit for a transfer
pub const DEFAULT_GAS_LIMIT: u64 = 78_423;

/// Default gas price (20 gwei)
pub const DEFAULT_GAS_PRICE_WEI: Wei = 20_000_000_000;
