// src/mock.rs

//! Scripted in-memory ledger for tests.
//!
//! Unknown accounts have zero balance and zero transaction count. Every
//! failure is opt-in. Accepted broadcasts are recorded and answered with
//! the Keccak-256 hash of the raw bytes.

use crate::client::{BlockTag, LedgerClient};
use crate::errors::LedgerError;
use async_trait::async_trait;
use quill_core::quill_crypto::hash::keccak_hash;
use quill_core::{Address, TxHash, Wei};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

#[derive(Debug, Default)]
struct MockState {
    balances: HashMap<Address, Wei>,
    counts: HashMap<(Address, BlockTag), u64>,
    balance_error: Option<String>,
    count_errors: HashMap<BlockTag, String>,
    broadcast_error: Option<String>,
    latency: Option<Duration>,
    attempts: usize,
    sent: Vec<Vec<u8>>,
}

/// In-memory [`LedgerClient`]
#[derive(Debug, Default)]
pub struct MockLedger {
    state: Mutex<MockState>,
}

impl MockLedger {
    /// Creates an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the balance of `address`
    pub fn set_balance(&self, address: Address, balance: Wei) {
        self.state().balances.insert(address, balance);
    }

    /// Sets the transaction count of `address` at `tag`
    pub fn set_transaction_count(&self, address: Address, tag: BlockTag, count: u64) {
        self.state().counts.insert((address, tag), count);
    }

    /// Makes every balance query fail with `message`
    pub fn fail_balance(&self, message: &str) {
        self.state().balance_error = Some(message.to_string());
    }

    /// Makes transaction count queries at `tag` fail with `message`
    pub fn fail_transaction_count(&self, tag: BlockTag, message: &str) {
        self.state().count_errors.insert(tag, message.to_string());
    }

    /// Makes every broadcast fail with `message`
    pub fn fail_broadcast(&self, message: &str) {
        self.state().broadcast_error = Some(message.to_string());
    }

    /// Delays every call by `latency`
    pub fn set_latency(&self, latency: Duration) {
        self.state().latency = Some(latency);
    }

    /// Raw transactions accepted so far, in order
    pub fn sent_transactions(&self) -> Vec<Vec<u8>> {
        self.state().sent.clone()
    }

    /// Broadcast calls made, accepted or not
    pub fn broadcast_attempts(&self) -> usize {
        self.state().attempts
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    async fn delay(&self) {
        let latency = self.state().latency;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }
}

fn scripted(message: &str) -> LedgerError {
    LedgerError::Rpc {
        code: -32000,
        message: message.to_string(),
    }
}

#[async_trait]
impl LedgerClient for MockLedger {
    async fn balance(&self, address: &Address) -> Result<Wei, LedgerError> {
        self.delay().await;
        let state = self.state();
        if let Some(message) = &state.balance_error {
            return Err(scripted(message));
        }
        Ok(state.balances.get(address).copied().unwrap_or(0))
    }

    async fn transaction_count(&self, address: &Address, tag: BlockTag) -> Result<u64, LedgerError> {
        self.delay().await;
        let state = self.state();
        if let Some(message) = state.count_errors.get(&tag) {
            return Err(scripted(message));
        }
        Ok(state.counts.get(&(*address, tag)).copied().unwrap_or(0))
    }

    async fn send_raw_transaction(&self, raw: &[u8]) -> Result<TxHash, LedgerError> {
        self.delay().await;
        let mut state = self.state();
        state.attempts += 1;
        if let Some(message) = &state.broadcast_error {
            return Err(scripted(message));
        }
        state.sent.push(raw.to_vec());
        Ok(TxHash(keccak_hash(raw)))
    }
}
