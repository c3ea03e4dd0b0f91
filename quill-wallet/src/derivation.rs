// src/derivation.rs

//! Wallet creation: mnemonic generation, keystore derivation and
//! persistence through the [`SecretStore`].

use crate::errors::{Result, WalletError};
use crate::keystore::Keystore;
use crate::store::SecretStore;
use crate::{DEFAULT_DERIVATION_PATH, DEFAULT_ENTROPY_BITS};
use quill_core::Address;
use quill_crypto::mnemonic::{self, Mnemonic};
use quill_crypto::KdfParams;
use std::sync::Arc;
use tracing::info;

/// A freshly created wallet
///
/// The mnemonic is the only copy of the recovery phrase; it is zeroized on
/// drop and must be shown to the user exactly once.
#[derive(Debug)]
pub struct CreatedWallet {
    /// Primary address
    pub address: Address,
    /// Recovery phrase
    pub mnemonic: Mnemonic,
}

/// Generates mnemonics, derives keystores and stores new wallets
#[derive(Debug, Clone)]
pub struct KeyDerivationService {
    store: Arc<SecretStore>,
    kdf: KdfParams,
    derivation_path: String,
    entropy_bits: usize,
}

impl KeyDerivationService {
    /// Creates a service writing to `store` with default settings
    pub fn new(store: Arc<SecretStore>) -> Self {
        Self {
            store,
            kdf: KdfParams::default(),
            derivation_path: DEFAULT_DERIVATION_PATH.to_string(),
            entropy_bits: DEFAULT_ENTROPY_BITS,
        }
    }

    /// Sets the Argon2id parameters for new keystores
    pub fn with_kdf(mut self, kdf: KdfParams) -> Self {
        self.kdf = kdf;
        self
    }

    /// Sets the default derivation prefix
    pub fn with_derivation_path(mut self, path: impl Into<String>) -> Self {
        self.derivation_path = path.into();
        self
    }

    /// Sets the default mnemonic entropy size
    pub fn with_entropy_bits(mut self, bits: usize) -> Self {
        self.entropy_bits = bits;
        self
    }

    /// The store new wallets are written to
    pub fn store(&self) -> &Arc<SecretStore> {
        &self.store
    }

    /// Generates a mnemonic from `bits_of_entropy` bits of OS randomness
    ///
    /// Fails with [`WalletError::Entropy`] unless the size is one of
    /// 128, 160, 192, 224 or 256.
    pub fn generate_mnemonic(bits_of_entropy: usize) -> Result<Mnemonic> {
        Ok(mnemonic::generate_mnemonic(bits_of_entropy)?)
    }

    /// Derives an encrypted keystore from a mnemonic
    pub fn derive_keystore(
        &self,
        mnemonic: &Mnemonic,
        passphrase: &str,
        derivation_path: &str,
    ) -> Result<Keystore> {
        let keystore = Keystore::from_mnemonic(mnemonic, passphrase, derivation_path, &self.kdf)?;
        if keystore.addresses().is_empty() {
            return Err(WalletError::NoAddress);
        }
        Ok(keystore)
    }

    /// Creates and stores a wallet with the configured path and entropy
    pub fn create_wallet(&self, name: &str, passphrase: &str) -> Result<CreatedWallet> {
        let path = self.derivation_path.clone();
        self.create_wallet_with(name, passphrase, &path, self.entropy_bits)
    }

    /// Creates and stores a wallet
    ///
    /// Generate, derive, persist. The mnemonic is returned only after the
    /// wallet is durably stored; on any failure it is dropped unseen.
    pub fn create_wallet_with(
        &self,
        name: &str,
        passphrase: &str,
        derivation_path: &str,
        entropy_bits: usize,
    ) -> Result<CreatedWallet> {
        let name = name.trim();
        if name.is_empty() {
            return Err(WalletError::InvalidName("name is empty".to_string()));
        }

        let mnemonic = Self::generate_mnemonic(entropy_bits)?;
        let keystore = self.derive_keystore(&mnemonic, passphrase, derivation_path)?;
        let address = keystore.address();

        self.store.store_wallet(&keystore, name)?;
        info!(%address, "Wallet created");

        Ok(CreatedWallet { address, mnemonic })
    }
}
