// src/lib.rs

//! # Quill Network
//!
//! Ledger access for the Quill wallet.
//!
//! This module provides:
//! - **Ledger Client**: the [`LedgerClient`] trait and its HTTP JSON-RPC
//!   implementation
//! - **Nonce Resolution**: next nonce from pending and latest counts
//! - **Balance Query**: read-only account state
//! - **Broadcast Gateway**: single-attempt submission of signed transactions
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use quill_network::{BalanceQuery, JsonRpcClient, NonceResolver};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = Arc::new(
//!         JsonRpcClient::new("http://127.0.0.1:8545", Duration::from_secs(30)).unwrap(),
//!     );
//!     let address = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266".parse().unwrap();
//!
//!     let balance = BalanceQuery::new(client.clone()).get_balance(&address).await.unwrap();
//!     let nonce = NonceResolver::new(client).resolve_nonce(&address).await.unwrap();
//!     println!("{} wei, next nonce {}", balance, nonce);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod errors;
pub mod client;
pub mod nonce;
pub mod balance;
pub mod gateway;
#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export commonly used types
pub use crate::errors::{LedgerError, NetworkError, Result};
pub use crate::client::{BlockTag, JsonRpcClient, LedgerClient};
pub use crate::nonce::NonceResolver;
pub use crate::balance::BalanceQuery;
pub use crate::gateway::BroadcastGateway;
#[cfg(any(test, feature = "mock"))]
pub use crate::mock::MockLedger;

/// JSON-RPC protocol version
pub const JSONRPC_VERSION: &str = "2.0";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
