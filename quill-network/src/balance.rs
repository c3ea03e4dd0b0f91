// src/balance.rs

//! Read-only balance and transaction count queries. Nothing is cached.

use crate::client::{BlockTag, LedgerClient};
use crate::errors::{NetworkError, Result};
use quill_core::{Address, Wei};
use std::sync::Arc;
use tracing::debug;

/// Read-only account queries
#[derive(Clone)]
pub struct BalanceQuery {
    client: Arc<dyn LedgerClient>,
}

impl BalanceQuery {
    /// Creates a query handle over `client`
    pub fn new(client: Arc<dyn LedgerClient>) -> Self {
        Self { client }
    }

    /// Current balance of `address` in wei
    pub async fn get_balance(&self, address: &Address) -> Result<Wei> {
        let balance = self.client.balance(address).await.map_err(NetworkError::Query)?;
        debug!(%address, balance = %balance, "Fetched balance");
        Ok(balance)
    }

    /// Transaction count of `address` as of `tag`
    pub async fn get_transaction_count(&self, address: &Address, tag: BlockTag) -> Result<u64> {
        self.client
            .transaction_count(address, tag)
            .await
            .map_err(NetworkError::Query)
    }
}
