// src/gateway.rs

//! Submission of signed transactions.

use crate::client::LedgerClient;
use crate::errors::{NetworkError, Result};
use quill_core::TxHash;
use std::sync::Arc;
use tracing::{info, warn};

/// Submits signed transactions to the ledger
///
/// Each call is a single attempt. A failed broadcast is reported, never
/// retried, since a retry with the same nonce may double-submit.
#[derive(Clone)]
pub struct BroadcastGateway {
    client: Arc<dyn LedgerClient>,
}

impl BroadcastGateway {
    /// Creates a gateway over `client`
    pub fn new(client: Arc<dyn LedgerClient>) -> Self {
        Self { client }
    }

    /// Submits raw wire bytes and returns the transaction id
    pub async fn send(&self, raw: &[u8]) -> Result<TxHash> {
        match self.client.send_raw_transaction(raw).await {
            Ok(hash) => {
                info!(tx = %hash, bytes = raw.len(), "Transaction broadcast");
                Ok(hash)
            }
            Err(e) => {
                warn!(error = %e, "Broadcast rejected");
                Err(NetworkError::Broadcast(e))
            }
        }
    }
}
