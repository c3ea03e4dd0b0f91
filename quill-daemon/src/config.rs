// src/config.rs

//! Daemon configuration.

use crate::errors::{Result, ServiceError};
use quill_core::{Wei, DEFAULT_CHAIN_ID, DEFAULT_GAS_LIMIT, DEFAULT_GAS_PRICE_WEI};
use quill_crypto::mnemonic::SUPPORTED_ENTROPY_BITS;
use quill_crypto::KdfParams;
use quill_network::DEFAULT_TIMEOUT_SECS;
use quill_wallet::{SecretStore, DATA_DIR, DEFAULT_DERIVATION_PATH, DEFAULT_ENTROPY_BITS};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Complete daemon configuration
///
/// Every section falls back to its defaults when absent from the file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    /// Secret store root
    pub data_dir: PathBuf,

    /// Ledger endpoint configuration
    pub ledger: LedgerConfig,

    /// RPC server configuration
    pub rpc: RpcConfig,

    /// Wallet creation configuration
    pub wallet: WalletConfig,

    /// Transaction fee configuration
    pub transaction: TransactionConfig,

    /// Block explorer base URL for wallet links
    pub explorer_url: String,
}

/// Ledger endpoint configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// JSON-RPC endpoint URL
    pub endpoint: String,

    /// EIP-155 chain id
    pub chain_id: u64,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// RPC server configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RpcConfig {
    /// RPC listen address
    pub listen_addr: SocketAddr,

    /// Enable RPC server
    pub enabled: bool,
}

/// Wallet creation configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletConfig {
    /// BIP-32 prefix for new wallets
    pub derivation_path: String,

    /// Mnemonic entropy for new wallets
    pub entropy_bits: usize,

    /// Argon2id parameters for new keystores
    pub kdf: KdfParams,
}

/// Transaction fee configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionConfig {
    /// Gas limit for transfers
    pub gas_limit: u64,

    /// Gas price in wei
    pub gas_price_wei: Wei,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            data_dir: SecretStore::default_root().unwrap_or_else(|_| PathBuf::from(DATA_DIR)),
            ledger: LedgerConfig::default(),
            rpc: RpcConfig::default(),
            wallet: WalletConfig::default(),
            transaction: TransactionConfig::default(),
            explorer_url: "https://etherscan.io".to_string(),
        }
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8545".to_string(),
            chain_id: DEFAULT_CHAIN_ID,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 9000)),
            enabled: true,
        }
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            derivation_path: DEFAULT_DERIVATION_PATH.to_string(),
            entropy_bits: DEFAULT_ENTROPY_BITS,
            kdf: KdfParams::default(),
        }
    }
}

impl Default for TransactionConfig {
    fn default() -> Self {
        Self {
            gas_limit: DEFAULT_GAS_LIMIT,
            gas_price_wei: DEFAULT_GAS_PRICE_WEI,
        }
    }
}

impl LedgerConfig {
    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl DaemonConfig {
    /// Loads configuration from file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ServiceError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ServiceError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| ServiceError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)
            .map_err(|e| ServiceError::Config(format!("Failed to write {}: {}", path.display(), e)))
    }

    /// Rejects settings no wallet operation could succeed with
    pub fn validate(&self) -> Result<()> {
        if self.ledger.chain_id == 0 {
            return Err(ServiceError::Config("chain_id must be non-zero".to_string()));
        }
        if self.ledger.timeout_secs == 0 {
            return Err(ServiceError::Config("timeout_secs must be non-zero".to_string()));
        }
        if !SUPPORTED_ENTROPY_BITS.contains(&self.wallet.entropy_bits) {
            return Err(ServiceError::Config(format!(
                "entropy_bits {} not one of {:?}",
                self.wallet.entropy_bits, SUPPORTED_ENTROPY_BITS
            )));
        }
        quill_crypto::hd::parse_path(&self.wallet.derivation_path)
            .map_err(|e| ServiceError::Config(e.to_string()))?;
        if self.transaction.gas_limit < quill_core::transaction::INTRINSIC_GAS {
            return Err(ServiceError::Config(format!(
                "gas_limit {} below {}",
                self.transaction.gas_limit,
                quill_core::transaction::INTRINSIC_GAS
            )));
        }
        Ok(())
    }

    /// Explorer page for `address`
    pub fn explorer_link(&self, address: &quill_core::Address) -> String {
        format!("{}/address/{}", self.explorer_url.trim_end_matches('/'), address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = DaemonConfig::default();
        assert_eq!(config.ledger.chain_id, 1);
        assert_eq!(config.ledger.timeout_secs, 30);
        assert_eq!(config.rpc.listen_addr.to_string(), "127.0.0.1:9000");
        assert!(config.rpc.enabled);
        assert_eq!(config.wallet.derivation_path, "m/44'/60'/0'/0");
        assert_eq!(config.wallet.entropy_bits, 256);
        assert_eq!(config.transaction.gas_limit, 78_423);
        assert_eq!(config.transaction.gas_price_wei, 20_000_000_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");

        let mut config = DaemonConfig::default();
        config.ledger.chain_id = 11155111;
        config.explorer_url = "https://sepolia.etherscan.io".to_string();
        config.save_to_file(&path).unwrap();

        assert_eq!(DaemonConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, r#"{"ledger": {"endpoint": "https://node.example"}}"#).unwrap();

        let config = DaemonConfig::from_file(&path).unwrap();
        assert_eq!(config.ledger.endpoint, "https://node.example");
        assert_eq!(config.ledger.chain_id, 1);
        assert_eq!(config.transaction.gas_limit, 78_423);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = DaemonConfig::default();
        config.wallet.entropy_bits = 100;
        assert!(matches!(config.validate(), Err(ServiceError::Config(_))));

        let mut config = DaemonConfig::default();
        config.ledger.chain_id = 0;
        assert!(config.validate().is_err());

        let mut config = DaemonConfig::default();
        config.wallet.derivation_path = "bogus".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_explorer_link() {
        let config = DaemonConfig::default();
        let address = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266".parse().unwrap();
        assert_eq!(
            config.explorer_link(&address),
            "https://etherscan.io/address/0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        );
    }

    #[test]
    fn test_missing_file() {
        let result = DaemonConfig::from_file(Path::new("/nonexistent/config.json"));
        assert!(matches!(result, Err(ServiceError::Config(_))));
    }
}
