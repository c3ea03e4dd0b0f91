// src/transaction_builder.rs

//! Builder that turns user input into a [`ResolvedTransaction`].

use crate::errors::{CoreError, Result};
use crate::transaction::ResolvedTransaction;
use crate::types::{parse_ether, Address, Wei};
use crate::{DEFAULT_CHAIN_ID, DEFAULT_GAS_LIMIT, DEFAULT_GAS_PRICE_WEI};

/// Builder for value-transfer transactions
///
/// Gas limit, gas price and chain id start at the mainnet defaults. The
/// sender, recipient, amount and nonce must be set before [`build`].
///
/// # Example
/// ```
/// use quill_core::{Address, TransactionBuilder};
///
/// let from: Address = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266".parse().unwrap();
/// let to: Address = "0x70997970c51812dc3a010c7d01b50e0d17dc79c8".parse().unwrap();
///
/// let tx = TransactionBuilder::new()
///     .from(from)
///     .to(to)
///     .value_eth("1.5")
///     .nonce(7)
///     .build()
///     .unwrap();
///
/// assert_eq!(tx.value_wei, 1_500_000_000_000_000_000);
/// assert_eq!(tx.gas_limit, 78_423);
/// ```
///
/// [`build`]: TransactionBuilder::build
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    from: Option<Address>,
    to: Option<Address>,
    value: Option<String>,
    gas_limit: u64,
    gas_price_wei: Wei,
    chain_id: u64,
    nonce: Option<u64>,
}

impl Default for TransactionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionBuilder {
    /// Creates a builder with default gas and chain settings
    pub fn new() -> Self {
        Self {
            from: None,
            to: None,
            value: None,
            gas_limit: DEFAULT_GAS_LIMIT,
            gas_price_wei: DEFAULT_GAS_PRICE_WEI,
            chain_id: DEFAULT_CHAIN_ID,
            nonce: None,
        }
    }

    /// Sets the sender
    pub fn from(mut self, from: Address) -> Self {
        self.from = Some(from);
        self
    }

    /// Sets the recipient
    pub fn to(mut self, to: Address) -> Self {
        self.to = Some(to);
        self
    }

    /// Sets the amount as a decimal ETH string; parsed in [`build`](Self::build)
    pub fn value_eth(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Overrides the gas limit
    pub fn gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = gas_limit;
        self
    }

    /// Overrides the gas price
    pub fn gas_price_wei(mut self, gas_price_wei: Wei) -> Self {
        self.gas_price_wei = gas_price_wei;
        self
    }

    /// Overrides the chain id
    pub fn chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = chain_id;
        self
    }

    /// Sets the sender's nonce
    pub fn nonce(mut self, nonce: u64) -> Self {
        self.nonce = Some(nonce);
        self
    }

    /// Builds the resolved transaction
    ///
    /// # Returns
    /// [`CoreError::InvalidAmount`] if the amount does not parse,
    /// [`CoreError::IncompleteTransaction`] if a required field is unset.
    pub fn build(self) -> Result<ResolvedTransaction> {
        let missing = |field: &str| CoreError::IncompleteTransaction(format!("{} not set", field));

        let value = self.value.ok_or_else(|| missing("value"))?;
        let value_wei = parse_ether(&value)?;

        Ok(ResolvedTransaction {
            from: self.from.ok_or_else(|| missing("sender"))?,
            to: self.to.ok_or_else(|| missing("recipient"))?,
            value_wei,
            gas_limit: self.gas_limit,
            gas_price_wei: self.gas_price_wei,
            chain_id: self.chain_id,
            nonce: self.nonce.ok_or_else(|| missing("nonce"))?,
        })
    }
}
