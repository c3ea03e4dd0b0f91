// src/session.rs

//! Per-wallet view state: balance and the send state machine.
//!
//! ```text
//! idle ──start──▶ triggered ──confirm──▶ in-progress ──▶ success
//!   ▲                 │                              └──▶ failed
//!   └────dismiss──────┴──────────────dismiss─────────────────┘
//! ```
//!
//! `confirm` only leaves `triggered` when the request passes validation:
//! recipient non-empty and a valid address, amount a positive number no
//! larger than the displayed balance. A rejected confirm stays in
//! `triggered` so the user can correct the input.

use crate::errors::{Result, ServiceError};
use quill_core::{format_balance, parse_ether, Address, ErrorKind, TxHash, Wei};
use quill_wallet::WalletMetadata;
use serde::Serialize;
use std::fmt;

/// Balance request state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum BalanceState {
    /// Query outstanding
    InProgress,
    /// Formatted ETH balance
    Success(String),
    /// Query failed; balance unavailable
    Failed(String),
}

impl BalanceState {
    /// Displayed balance, if known
    pub fn balance(&self) -> Option<&str> {
        match self {
            BalanceState::Success(value) => Some(value),
            _ => None,
        }
    }
}

/// Phase of a send request, without its data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SendPhase {
    /// No send started
    Idle,
    /// User intends to send; collecting input
    Triggered,
    /// Resolve, sign and broadcast running
    InProgress,
    /// Ledger accepted the transaction
    Success,
    /// Send failed
    Failed,
}

impl fmt::Display for SendPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SendPhase::Idle => "idle",
            SendPhase::Triggered => "triggered",
            SendPhase::InProgress => "in progress",
            SendPhase::Success => "successful",
            SendPhase::Failed => "failed",
        })
    }
}

/// One send attempt
///
/// The password is never stored here; it travels with the confirm call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendRequest {
    /// Current phase
    pub phase: SendPhase,
    /// Recipient, once confirmed
    pub recipient: Option<Address>,
    /// Amount in ETH as entered, once confirmed
    pub amount: Option<String>,
    /// Transaction id on success
    pub tx_hash: Option<TxHash>,
    /// Failure message
    pub error: Option<String>,
    /// Failure category
    pub error_kind: Option<ErrorKind>,
}

impl SendRequest {
    fn with_phase(phase: SendPhase) -> Self {
        Self {
            phase,
            recipient: None,
            amount: None,
            tx_hash: None,
            error: None,
            error_kind: None,
        }
    }

    /// Whether the attempt has ended
    pub fn is_terminal(&self) -> bool {
        matches!(self.phase, SendPhase::Success | SendPhase::Failed)
    }
}

impl Default for SendRequest {
    fn default() -> Self {
        Self::with_phase(SendPhase::Idle)
    }
}

/// View state of one wallet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WalletSession {
    /// Display name
    pub name: String,
    /// Primary address
    pub address: Address,
    /// Block explorer page
    pub link: String,
    /// Balance request state
    pub balance: BalanceState,
    /// Current send attempt
    pub send: SendRequest,
}

impl WalletSession {
    /// Creates a session with the balance pending and no send started
    pub fn new(metadata: &WalletMetadata, link: String) -> Self {
        Self {
            name: metadata.name.clone(),
            address: metadata.address,
            link,
            balance: BalanceState::InProgress,
            send: SendRequest::default(),
        }
    }

    /// Marks a balance query as outstanding
    pub fn balance_requested(&mut self) {
        self.balance = BalanceState::InProgress;
    }

    /// Records a balance query outcome
    pub fn balance_received(&mut self, result: std::result::Result<Wei, String>) {
        self.balance = match result {
            Ok(wei) => BalanceState::Success(format_balance(wei)),
            Err(e) => BalanceState::Failed(e),
        };
    }

    /// `idle → triggered`
    ///
    /// A no-op while already triggered. From a finished attempt it starts a
    /// fresh one. Rejected while a send is in progress.
    pub fn start_send(&mut self) -> Result<()> {
        match self.send.phase {
            SendPhase::InProgress => Err(ServiceError::InvalidTransition {
                phase: SendPhase::InProgress,
                action: "start a send",
            }),
            SendPhase::Triggered => Ok(()),
            SendPhase::Idle | SendPhase::Success | SendPhase::Failed => {
                self.send = SendRequest::with_phase(SendPhase::Triggered);
                Ok(())
            }
        }
    }

    /// Checks a send request against the displayed balance
    ///
    /// # Returns
    /// The parsed recipient and amount in wei
    pub fn validate_send(&self, recipient: &str, amount: &str) -> Result<(Address, Wei)> {
        let recipient = recipient.trim();
        if recipient.is_empty() {
            return Err(ServiceError::InvalidRequest("recipient is empty".to_string()));
        }
        let recipient: Address = recipient.parse()?;

        let value = parse_ether(amount)?;
        if value == 0 {
            return Err(ServiceError::InvalidRequest("amount must be positive".to_string()));
        }

        let balance = self
            .balance
            .balance()
            .ok_or_else(|| ServiceError::InvalidRequest("balance unavailable".to_string()))?;
        if value > parse_ether(balance)? {
            return Err(ServiceError::InvalidRequest(format!(
                "amount {} exceeds balance {}",
                amount.trim(),
                balance
            )));
        }

        Ok((recipient, value))
    }

    /// Whether `confirm` would accept this input
    pub fn is_send_request_valid(&self, recipient: &str, amount: &str) -> bool {
        self.validate_send(recipient, amount).is_ok()
    }

    /// `triggered → in-progress`, after validation
    pub fn begin_send(&mut self, recipient: &str, amount: &str) -> Result<(Address, Wei)> {
        if self.send.phase != SendPhase::Triggered {
            return Err(ServiceError::InvalidTransition {
                phase: self.send.phase,
                action: "confirm a send",
            });
        }

        let (to, value) = self.validate_send(recipient, amount)?;
        self.send.phase = SendPhase::InProgress;
        self.send.recipient = Some(to);
        self.send.amount = Some(amount.trim().to_string());
        Ok((to, value))
    }

    /// `in-progress → success | failed`
    pub fn finish_send(&mut self, result: &Result<TxHash>) -> Result<()> {
        if self.send.phase != SendPhase::InProgress {
            return Err(ServiceError::InvalidTransition {
                phase: self.send.phase,
                action: "finish a send",
            });
        }

        match result {
            Ok(hash) => {
                self.send.phase = SendPhase::Success;
                self.send.tx_hash = Some(*hash);
            }
            Err(e) => {
                self.send.phase = SendPhase::Failed;
                self.send.error = Some(e.to_string());
                self.send.error_kind = Some(e.kind());
            }
        }
        Ok(())
    }

    /// Returns to `idle` from a finished or merely triggered request
    pub fn dismiss(&mut self) -> Result<()> {
        if self.send.phase == SendPhase::InProgress {
            return Err(ServiceError::InvalidTransition {
                phase: SendPhase::InProgress,
                action: "dismiss",
            });
        }
        self.send = SendRequest::default();
        Ok(())
    }
}
