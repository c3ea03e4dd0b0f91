// src/service.rs

//! Wallet orchestration.
//!
//! [`WalletService`] ties the secret store, key derivation and ledger
//! access together behind the operations the UI calls. CPU-bound work
//! (key derivation, keystore unlock, signing) runs on blocking worker
//! threads. Sends from one address are serialized, and the nonce is
//! resolved inside that critical section so two sends never share one.

use crate::config::DaemonConfig;
use crate::errors::{Result, ServiceError};
use crate::session::WalletSession;
use quill_core::{Address, TransactionBuilder, TxHash, Wei};
use quill_network::{BalanceQuery, BroadcastGateway, JsonRpcClient, LedgerClient, NonceResolver};
use quill_wallet::{CreatedWallet, KeyDerivationService, SecretStore, WalletMetadata};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};
use zeroize::Zeroizing;

/// Daemon status summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceStatus {
    /// Daemon version
    pub version: String,
    /// Configured chain id
    pub chain_id: u64,
    /// Number of stored wallets
    pub wallet_count: usize,
}

type Sessions = Arc<Mutex<HashMap<Address, WalletSession>>>;

/// Wallet operations for the UI
pub struct WalletService {
    config: DaemonConfig,
    store: Arc<SecretStore>,
    derivation: KeyDerivationService,
    balances: BalanceQuery,
    pipeline: SendPipeline,
    sessions: Sessions,
    send_locks: Mutex<HashMap<Address, Arc<tokio::sync::Mutex<()>>>>,
}

/// Components a send needs, owned so it can run on its own task
#[derive(Clone)]
struct SendPipeline {
    store: Arc<SecretStore>,
    nonces: NonceResolver,
    gateway: BroadcastGateway,
    gas_limit: u64,
    gas_price_wei: Wei,
    chain_id: u64,
}

impl WalletService {
    /// Creates a service talking to the configured JSON-RPC endpoint
    pub fn from_config(config: DaemonConfig) -> Result<Self> {
        let client = JsonRpcClient::new(&config.ledger.endpoint, config.ledger.timeout())?;
        Self::new(config, Arc::new(client))
    }

    /// Creates a service over an arbitrary ledger client
    pub fn new(config: DaemonConfig, client: Arc<dyn LedgerClient>) -> Result<Self> {
        config.validate()?;

        let store = Arc::new(SecretStore::open(&config.data_dir)?);
        let derivation = KeyDerivationService::new(store.clone())
            .with_kdf(config.wallet.kdf)
            .with_derivation_path(config.wallet.derivation_path.clone())
            .with_entropy_bits(config.wallet.entropy_bits);

        info!(
            data_dir = %config.data_dir.display(),
            chain_id = config.ledger.chain_id,
            "Wallet service initialized"
        );

        let pipeline = SendPipeline {
            store: store.clone(),
            nonces: NonceResolver::new(client.clone()),
            gateway: BroadcastGateway::new(client.clone()),
            gas_limit: config.transaction.gas_limit,
            gas_price_wei: config.transaction.gas_price_wei,
            chain_id: config.ledger.chain_id,
        };

        Ok(Self {
            store,
            derivation,
            balances: BalanceQuery::new(client),
            pipeline,
            sessions: Arc::new(Mutex::new(HashMap::new())),
            send_locks: Mutex::new(HashMap::new()),
            config,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &DaemonConfig {
        &self.config
    }

    /// Version, chain id and wallet count
    pub async fn status(&self) -> Result<ServiceStatus> {
        Ok(ServiceStatus {
            version: crate::DAEMON_VERSION.to_string(),
            chain_id: self.config.ledger.chain_id,
            wallet_count: self.list_wallets().await?.len(),
        })
    }

    /// Stored wallets in display order
    pub async fn list_wallets(&self) -> Result<Vec<WalletMetadata>> {
        let store = self.store.clone();
        Ok(tokio::task::spawn_blocking(move || store.list_wallets()).await??)
    }

    /// Creates and stores a wallet with the configured path and entropy
    ///
    /// The returned mnemonic is the only copy of the recovery phrase.
    pub async fn create_wallet(&self, name: &str, password: &str) -> Result<CreatedWallet> {
        let derivation = self.derivation.clone();
        let name = name.to_string();
        let password = Zeroizing::new(password.to_string());

        let created = tokio::task::spawn_blocking(move || {
            derivation.create_wallet(&name, &password)
        })
        .await??;

        // Drop any stale view so the next read starts fresh
        self.sessions_guard().remove(&created.address);
        Ok(created)
    }

    /// Current view state of a wallet
    pub async fn session(&self, address: &Address) -> Result<WalletSession> {
        self.ensure_session(address).await?;
        self.with_session(address, |session| Ok(session.clone()))
    }

    /// Balance of `address` straight from the ledger
    pub async fn get_balance(&self, address: &Address) -> Result<Wei> {
        Ok(self.balances.get_balance(address).await?)
    }

    /// Re-queries the balance and records the outcome in the session
    ///
    /// A failed query is not an error here: the session shows the balance
    /// as unavailable until the next refresh succeeds.
    pub async fn refresh_balance(&self, address: &Address) -> Result<WalletSession> {
        self.ensure_session(address).await?;
        self.with_session(address, |session| {
            session.balance_requested();
            Ok(())
        })?;

        let result = self.get_balance(address).await.map_err(|e| {
            warn!(%address, error = %e, "Balance unavailable");
            e.to_string()
        });

        self.with_session(address, |session| {
            session.balance_received(result);
            Ok(session.clone())
        })
    }

    /// `idle → triggered`
    pub async fn start_send(&self, address: &Address) -> Result<WalletSession> {
        self.ensure_session(address).await?;
        self.with_session(address, |session| {
            session.start_send()?;
            Ok(session.clone())
        })
    }

    /// `triggered → in-progress → success | failed`
    ///
    /// Returns `Err` only when the request is rejected before it starts
    /// (wrong phase or invalid input). Once in progress, every outcome is
    /// recorded in the returned session. The send runs on its own task, so
    /// dropping this future does not stop it or leave the session in
    /// progress.
    pub async fn confirm_send(
        &self,
        address: &Address,
        recipient: &str,
        amount: &str,
        password: &str,
    ) -> Result<WalletSession> {
        self.ensure_session(address).await?;
        let (to, _) = self.with_session(address, |session| session.begin_send(recipient, amount))?;

        let from = *address;
        let amount = amount.trim().to_string();
        let password = Zeroizing::new(password.to_string());
        let pipeline = self.pipeline.clone();
        let sessions = self.sessions.clone();
        let lock = self.send_lock(address);

        let task = tokio::spawn(async move {
            let result = {
                let _guard = lock.lock().await;
                pipeline.execute(from, to, &amount, password).await
            };

            match &result {
                Ok(hash) => info!(%from, %to, tx = %hash, "Send succeeded"),
                Err(e) => warn!(%from, %to, error = %e, "Send failed"),
            }

            update_session(&sessions, &from, |session| {
                session.finish_send(&result)?;
                Ok(session.clone())
            })
        });

        task.await?
    }

    /// Returns a finished or triggered request to `idle`
    pub async fn dismiss_send(&self, address: &Address) -> Result<WalletSession> {
        self.ensure_session(address).await?;
        self.with_session(address, |session| {
            session.dismiss()?;
            Ok(session.clone())
        })
    }

    async fn ensure_session(&self, address: &Address) -> Result<()> {
        if self.sessions_guard().contains_key(address) {
            return Ok(());
        }

        let metadata = self
            .list_wallets()
            .await?
            .into_iter()
            .find(|w| w.address == *address)
            .ok_or_else(|| ServiceError::UnknownWallet(address.to_string()))?;

        let link = self.config.explorer_link(address);
        self.sessions_guard()
            .entry(*address)
            .or_insert_with(|| WalletSession::new(&metadata, link));
        Ok(())
    }

    fn with_session<T>(
        &self,
        address: &Address,
        f: impl FnOnce(&mut WalletSession) -> Result<T>,
    ) -> Result<T> {
        update_session(&self.sessions, address, f)
    }

    fn send_lock(&self, address: &Address) -> Arc<tokio::sync::Mutex<()>> {
        self.send_locks
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entry(*address)
            .or_default()
            .clone()
    }

    fn sessions_guard(&self) -> MutexGuard<'_, HashMap<Address, WalletSession>> {
        self.sessions.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SendPipeline {
    /// Resolve nonce → build → unlock and sign → broadcast
    ///
    /// Caller holds the sender's send lock.
    async fn execute(
        &self,
        from: Address,
        to: Address,
        amount: &str,
        password: Zeroizing<String>,
    ) -> Result<TxHash> {
        let nonce = self.nonces.resolve_nonce(&from).await?;
        let transaction = TransactionBuilder::new()
            .from(from)
            .to(to)
            .value_eth(amount)
            .gas_limit(self.gas_limit)
            .gas_price_wei(self.gas_price_wei)
            .chain_id(self.chain_id)
            .nonce(nonce)
            .build()?;

        let store = self.store.clone();
        let raw = tokio::task::spawn_blocking(move || -> Result<Vec<u8>> {
            let keystore = store.load_keystore(&from)?;
            let key = keystore.private_key(&from, &password)?;
            let signed = transaction.sign(&key)?;
            Ok(signed.encode()?)
        })
        .await??;

        Ok(self.gateway.send(&raw).await?)
    }
}

fn update_session<T>(
    sessions: &Mutex<HashMap<Address, WalletSession>>,
    address: &Address,
    f: impl FnOnce(&mut WalletSession) -> Result<T>,
) -> Result<T> {
    let mut sessions = sessions.lock().unwrap_or_else(|e| e.into_inner());
    let session = sessions
        .get_mut(address)
        .ok_or_else(|| ServiceError::UnknownWallet(address.to_string()))?;
    f(session)
}
