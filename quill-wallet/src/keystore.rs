// src/keystore.rs

//! Encrypted keystore for HD wallets.
//!
//! A keystore holds the wallet's BIP-39 seed sealed under the user's
//! passphrase (Argon2id + AES-256-GCM) together with the addresses already
//! derived from it. Child keys are re-derived from the seed on demand, so
//! the file never contains a private key.

use crate::errors::{Result, WalletError};
use quill_core::Address;
use quill_crypto::encryption::{self, KdfParams, SealedData};
use quill_crypto::mnemonic::Mnemonic;
use quill_crypto::{hd, CryptoError, SecretKey};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use zeroize::Zeroizing;

const KDF_NAME: &str = "argon2id";
const CIPHER_NAME: &str = "aes-256-gcm";

/// An address derived from the keystore seed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedAddress {
    /// Full derivation path (`<prefix>/<index>`)
    pub path: String,
    /// Address at that path
    pub address: Address,
}

/// Parameters and ciphertext of the sealed seed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoSection {
    kdf: String,
    kdf_params: KdfParams,
    salt: String,
    cipher: String,
    ciphertext: String,
}

/// Encrypted keystore
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keystore {
    /// Keystore version
    version: u32,

    /// Primary address (index 0)
    address: Address,

    /// Derivation prefix; address `i` lives at `<prefix>/<i>`
    prefix_path: String,

    /// Every derived address, in index order
    addresses: Vec<DerivedAddress>,

    /// Sealed seed
    crypto: CryptoSection,
}

impl Keystore {
    /// Derives a keystore from a mnemonic
    ///
    /// # Arguments
    /// * `mnemonic` - Validated BIP-39 phrase
    /// * `passphrase` - Encrypts the seed; also required to sign
    /// * `prefix_path` - Derivation prefix such as `m/44'/60'/0'/0`
    /// * `kdf` - Argon2id cost parameters
    ///
    /// # Returns
    /// A keystore exposing the address at `<prefix_path>/0`
    pub fn from_mnemonic(
        mnemonic: &Mnemonic,
        passphrase: &str,
        prefix_path: &str,
        kdf: &KdfParams,
    ) -> Result<Self> {
        hd::parse_path(prefix_path)?;
        let prefix_path = prefix_path.trim_end_matches('/').to_string();

        let seed = mnemonic.to_seed("")?;
        let path = hd::child_path(&prefix_path, 0);
        let address = Address::from(hd::derive_secret_key(&seed[..], &path)?.address());

        let sealed = encryption::seal_with_passphrase(&seed[..], passphrase, address.as_bytes(), kdf)?;

        Ok(Self {
            version: crate::KEYSTORE_VERSION,
            address,
            prefix_path,
            addresses: vec![DerivedAddress { path, address }],
            crypto: CryptoSection {
                kdf: KDF_NAME.to_string(),
                kdf_params: *kdf,
                salt: hex::encode(&sealed.salt),
                cipher: CIPHER_NAME.to_string(),
                ciphertext: hex::encode(&sealed.ciphertext),
            },
        })
    }

    /// Primary address
    pub fn address(&self) -> Address {
        self.address
    }

    /// All derived addresses, in index order
    pub fn addresses(&self) -> Vec<Address> {
        self.addresses.iter().map(|d| d.address).collect()
    }

    /// Derivation prefix
    pub fn prefix_path(&self) -> &str {
        &self.prefix_path
    }

    /// Derives and records the next address
    ///
    /// Only this in-memory copy changes; pass it to
    /// [`SecretStore::update_keystore`](crate::SecretStore::update_keystore)
    /// to keep the address across reloads.
    pub fn derive_child(&mut self, passphrase: &str) -> Result<Address> {
        let seed = self.open_seed(passphrase)?;
        let index = u32::try_from(self.addresses.len())
            .map_err(|_| WalletError::Derivation("address index overflow".to_string()))?;

        let path = hd::child_path(&self.prefix_path, index);
        let address = Address::from(hd::derive_secret_key(&seed[..], &path)?.address());

        self.addresses.push(DerivedAddress { path, address });
        Ok(address)
    }

    /// Unlocks the signing key for `address`
    ///
    /// Fails with [`WalletError::WalletNotFound`] if the address was never
    /// derived from this keystore, [`WalletError::InvalidPassword`] if the
    /// passphrase does not open it.
    pub fn private_key(&self, address: &Address, passphrase: &str) -> Result<SecretKey> {
        let derived = self
            .addresses
            .iter()
            .find(|d| d.address == *address)
            .ok_or_else(|| WalletError::WalletNotFound(address.to_string()))?;

        let seed = self.open_seed(passphrase)?;
        let key = hd::derive_secret_key(&seed[..], &derived.path)?;

        if Address::from(key.address()) != *address {
            return Err(WalletError::Derivation(format!(
                "{} does not derive {}",
                derived.path, address
            )));
        }

        Ok(key)
    }

    /// Checks that `passphrase` opens the keystore
    pub fn verify_password(&self, passphrase: &str) -> Result<()> {
        self.open_seed(passphrase).map(|_| ())
    }

    /// Serializes to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| WalletError::Encode(e.to_string()))
    }

    /// Parses and validates keystore JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let keystore: Self =
            serde_json::from_str(json).map_err(|e| WalletError::Decode(e.to_string()))?;
        keystore.validate()?;
        Ok(keystore)
    }

    /// Loads keystore from file
    ///
    /// # Arguments
    /// * `path` - File path to load from
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .map_err(|e| WalletError::Read(format!("{}: {}", path.display(), e)))?;

        Self::from_json(&json)
    }

    fn validate(&self) -> Result<()> {
        if self.version != crate::KEYSTORE_VERSION {
            return Err(WalletError::Decode(format!("unsupported version {}", self.version)));
        }
        if self.crypto.kdf != KDF_NAME || self.crypto.cipher != CIPHER_NAME {
            return Err(WalletError::Decode(format!(
                "unsupported scheme {}/{}",
                self.crypto.kdf, self.crypto.cipher
            )));
        }

        let primary = self.addresses.first().ok_or(WalletError::NoAddress)?;
        if primary.address != self.address {
            return Err(WalletError::Decode("primary address mismatch".to_string()));
        }
        Ok(())
    }

    fn open_seed(&self, passphrase: &str) -> Result<Zeroizing<Vec<u8>>> {
        let sealed = SealedData {
            salt: hex::decode(&self.crypto.salt).map_err(|e| WalletError::Decode(e.to_string()))?,
            ciphertext: hex::decode(&self.crypto.ciphertext)
                .map_err(|e| WalletError::Decode(e.to_string()))?,
        };

        encryption::open_with_passphrase(
            &sealed,
            passphrase,
            self.address.as_bytes(),
            &self.crypto.kdf_params,
        )
        .map_err(|e| match e {
            CryptoError::DecryptionError(_) => WalletError::InvalidPassword,
            other => WalletError::from(other),
        })
    }
}
