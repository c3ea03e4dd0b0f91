// src/nonce.rs

//! Next-nonce resolution for a sending address.

use crate::client::{BlockTag, LedgerClient};
use crate::errors::{NetworkError, Result};
use quill_core::Address;
use std::sync::Arc;
use tracing::debug;

/// Resolves the nonce for an address's next transaction
///
/// Queries the pending-pool and latest-block transaction counts at the
/// same time and takes the larger, so transactions still in the pool are
/// not reused. Either query failing fails the resolution; there is no
/// fallback to zero.
#[derive(Clone)]
pub struct NonceResolver {
    client: Arc<dyn LedgerClient>,
}

impl NonceResolver {
    /// Creates a resolver over `client`
    pub fn new(client: Arc<dyn LedgerClient>) -> Self {
        Self { client }
    }

    /// Returns `max(pending count, latest count)` for `address`
    pub async fn resolve_nonce(&self, address: &Address) -> Result<u64> {
        let (pending, latest) = tokio::try_join!(
            self.client.transaction_count(address, BlockTag::Pending),
            self.client.transaction_count(address, BlockTag::Latest),
        )
        .map_err(NetworkError::NonceQuery)?;

        let nonce = pending.max(latest);
        debug!(%address, pending, latest, nonce, "Resolved nonce");
        Ok(nonce)
    }
}
