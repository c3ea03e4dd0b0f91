// src/lib.rs

//! # Quill Daemon
//!
//! Wallet daemon that orchestrates the Quill crates behind an HTTP API.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           Quill Daemon                  │
//! ├─────────────────────────────────────────┤
//! │  HTTP API  │  WalletService │  Config   │
//! ├────────────┴────────────────┴───────────┤
//! │  Nonce · Broadcast · Balance            │
//! │         (quill-network)                 │
//! ├─────────────────────────────────────────┤
//! │  Secret Store  │ Transactions           │
//! │ (quill-wallet) │ (quill-core)           │
//! ├─────────────────────────────────────────┤
//! │         Cryptography Layer              │
//! │         (quill-crypto)                  │
//! └─────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod errors;
pub mod config;
pub mod session;
pub mod service;
pub mod rpc;

// Re-export commonly used types
pub use crate::errors::{ServiceError, Result};
pub use crate::config::DaemonConfig;
pub use crate::session::{BalanceState, SendPhase, SendRequest, WalletSession};
pub use crate::service::{ServiceStatus, WalletService};
pub use crate::rpc::RpcServer;

/// Daemon version
pub const DAEMON_VERSION: &str = env!("CARGO_PKG_VERSION");
