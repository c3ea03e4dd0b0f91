// src/store.rs

//! On-disk secret store: keystore files plus the wallet metadata list.
//!
//! Layout under the store root:
//!
//! ```text
//! <root>/keystore/<address>.json     encrypted keystore, one per wallet
//! <root>/walletsMetadata.json        [{name, address}], display order
//! <root>/journal/<address>.pending   marker for an unfinished store_wallet
//! ```
//!
//! Every file is replaced atomically (temp file, fsync, rename). A wallet
//! is written keystore first, metadata second; the journal marker brackets
//! the pair so [`SecretStore::open`] can discard a keystore whose metadata
//! entry never landed.

use crate::errors::{Result, WalletError};
use crate::keystore::Keystore;
use quill_core::Address;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// Display entry for a stored wallet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletMetadata {
    /// User-chosen display name
    pub name: String,
    /// Primary address of the wallet's keystore
    pub address: Address,
}

/// Outcome of startup reconciliation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Markers whose wallet was fully stored
    pub completed: usize,
    /// Orphaned keystores removed
    pub discarded: usize,
}

/// Keystore files and wallet metadata under one root directory
///
/// One writer at a time; readers overlap when no write is in progress.
#[derive(Debug)]
pub struct SecretStore {
    root: PathBuf,
    lock: RwLock<()>,
}

impl SecretStore {
    /// Opens (creating if needed) the store rooted at `root`
    ///
    /// Initializes the metadata file to an empty list on first use and
    /// reconciles any journal markers left by an interrupted write.
    pub fn open<P: Into<PathBuf>>(root: P) -> Result<Self> {
        let store = Self {
            root: root.into(),
            lock: RwLock::new(()),
        };

        for dir in [store.root.clone(), store.keystore_dir(), store.journal_dir()] {
            fs::create_dir_all(&dir)
                .map_err(|e| WalletError::Directory(format!("{}: {}", dir.display(), e)))?;
        }

        {
            let _guard = store.write_guard()?;
            store.ensure_metadata()?;
            let report = store.reconcile()?;
            if report != ReconcileReport::default() {
                info!(
                    completed = report.completed,
                    discarded = report.discarded,
                    "Reconciled interrupted wallet writes"
                );
            }
        }

        debug!(root = %store.root.display(), "Secret store opened");
        Ok(store)
    }

    /// Default store root (`~/.quill-wallet`)
    pub fn default_root() -> Result<PathBuf> {
        let home = directories::UserDirs::new()
            .ok_or_else(|| WalletError::Directory("Cannot find home directory".to_string()))?;

        Ok(home.home_dir().join(crate::DATA_DIR))
    }

    /// Store root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the keystore file for `address`
    pub fn keystore_path(&self, address: &Address) -> PathBuf {
        self.keystore_dir().join(format!("{}.json", address))
    }

    /// Persists a keystore and appends its metadata entry
    ///
    /// The wallet is keyed by the keystore's primary address. Fails with
    /// [`WalletError::WalletExists`] before touching disk if that address
    /// is already stored.
    pub fn store_wallet(&self, keystore: &Keystore, name: &str) -> Result<()> {
        let address = keystore.address();
        let _guard = self.write_guard()?;

        let mut wallets = self.read_metadata()?;
        if wallets.iter().any(|w| w.address == address) {
            return Err(WalletError::WalletExists(address.to_string()));
        }

        let entry = WalletMetadata {
            name: name.to_string(),
            address,
        };
        wallets.push(entry);
        self.persist_wallet(&keystore.to_json()?, &wallets)?;

        info!(%address, "Wallet stored");
        Ok(())
    }

    /// Rewrites the keystore of an already stored wallet
    ///
    /// Used after [`Keystore::derive_child`] so new addresses survive a
    /// reload. Metadata is left untouched.
    pub fn update_keystore(&self, keystore: &Keystore) -> Result<()> {
        let address = keystore.address();
        let _guard = self.write_guard()?;

        if !self.read_metadata()?.iter().any(|w| w.address == address) {
            return Err(WalletError::WalletNotFound(address.to_string()));
        }

        write_atomic(&self.keystore_path(&address), keystore.to_json()?.as_bytes())?;
        debug!(%address, addresses = keystore.addresses().len(), "Keystore updated");
        Ok(())
    }

    /// Writes marker, keystore, then metadata; undoes the keystore if the
    /// metadata write fails. `wallets` ends with the new entry. Caller holds
    /// the write lock.
    fn persist_wallet(&self, keystore_json: &str, wallets: &[WalletMetadata]) -> Result<()> {
        let entry = wallets
            .last()
            .ok_or_else(|| WalletError::Encode("no wallet entry to persist".to_string()))?;
        let marker_json =
            serde_json::to_vec(entry).map_err(|e| WalletError::Encode(e.to_string()))?;

        let marker = self.marker_path(&entry.address);
        let keystore_path = self.keystore_path(&entry.address);

        write_atomic(&marker, &marker_json)?;

        if let Err(e) = write_atomic(&keystore_path, keystore_json.as_bytes()) {
            remove_if_exists(&marker);
            return Err(e);
        }

        if let Err(e) = self.write_metadata(wallets) {
            warn!(address = %entry.address, error = %e, "Metadata write failed, removing keystore");
            remove_if_exists(&keystore_path);
            remove_if_exists(&marker);
            return Err(e);
        }

        remove_if_exists(&marker);
        Ok(())
    }

    /// Lists stored wallets in insertion order
    pub fn list_wallets(&self) -> Result<Vec<WalletMetadata>> {
        let _guard = self.read_guard()?;
        self.read_metadata()
    }

    /// Loads the keystore for `address`
    pub fn load_keystore(&self, address: &Address) -> Result<Keystore> {
        let _guard = self.read_guard()?;

        let path = self.keystore_path(address);
        if !path.exists() {
            return Err(WalletError::WalletNotFound(address.to_string()));
        }
        Keystore::load_from_file(path)
    }

    /// Whether a keystore file exists for `address`
    pub fn has_keystore(&self, address: &Address) -> bool {
        let _guard = self.lock.read().unwrap_or_else(|e| e.into_inner());
        self.keystore_path(address).exists()
    }

    fn keystore_dir(&self) -> PathBuf {
        self.root.join(crate::KEYSTORE_DIR)
    }

    fn journal_dir(&self) -> PathBuf {
        self.root.join(crate::JOURNAL_DIR)
    }

    fn metadata_path(&self) -> PathBuf {
        self.root.join(crate::METADATA_FILE)
    }

    fn marker_path(&self, address: &Address) -> PathBuf {
        self.journal_dir().join(format!("{}.pending", address))
    }

    fn read_guard(&self) -> Result<RwLockReadGuard<'_, ()>> {
        self.lock
            .read()
            .map_err(|_| WalletError::Read("Lock poisoned".to_string()))
    }

    fn write_guard(&self) -> Result<RwLockWriteGuard<'_, ()>> {
        self.lock
            .write()
            .map_err(|_| WalletError::Write("Lock poisoned".to_string()))
    }

    fn ensure_metadata(&self) -> Result<()> {
        if !self.metadata_path().exists() {
            self.write_metadata(&[])?;
            debug!("Initialized empty wallet metadata");
        }
        Ok(())
    }

    fn read_metadata(&self) -> Result<Vec<WalletMetadata>> {
        let path = self.metadata_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let json = fs::read_to_string(&path)
            .map_err(|e| WalletError::Read(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&json).map_err(|e| WalletError::Decode(format!("{}: {}", path.display(), e)))
    }

    fn write_metadata(&self, wallets: &[WalletMetadata]) -> Result<()> {
        let json = serde_json::to_vec_pretty(wallets).map_err(|e| WalletError::Encode(e.to_string()))?;
        write_atomic(&self.metadata_path(), &json)
    }

    /// Resolves journal markers. Caller holds the write lock.
    fn reconcile(&self) -> Result<ReconcileReport> {
        let dir = self.journal_dir();
        let entries = fs::read_dir(&dir)
            .map_err(|e| WalletError::Read(format!("{}: {}", dir.display(), e)))?;

        let stored = self.read_metadata()?;
        let mut report = ReconcileReport::default();

        for entry in entries {
            let path = entry
                .map_err(|e| WalletError::Read(format!("{}: {}", dir.display(), e)))?
                .path();
            if path.extension().and_then(|e| e.to_str()) != Some("pending") {
                continue;
            }

            let pending: Option<WalletMetadata> = fs::read(&path)
                .ok()
                .and_then(|bytes| serde_json::from_slice(&bytes).ok());

            // An unreadable marker still names its wallet in the file stem
            let address = match pending {
                Some(p) => Some(p.address),
                None => {
                    warn!(path = %path.display(), "Unreadable journal marker");
                    path.file_stem()
                        .and_then(|stem| stem.to_str())
                        .and_then(|stem| stem.parse::<Address>().ok())
                }
            };

            match address {
                Some(address) if stored.iter().any(|w| w.address == address) => {
                    report.completed += 1;
                }
                Some(address) => {
                    warn!(%address, "Discarding keystore without metadata entry");
                    remove_if_exists(&self.keystore_path(&address));
                    report.discarded += 1;
                }
                None => {}
            }
            remove_if_exists(&path);
        }

        Ok(report)
    }
}

/// Replaces `path` with `bytes` via a synced sibling temp file
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let write_err = |e: std::io::Error| WalletError::Write(format!("{}: {}", path.display(), e));
    let dir = path
        .parent()
        .ok_or_else(|| WalletError::Directory(format!("{} has no parent", path.display())))?;

    let mut file = NamedTempFile::new_in(dir).map_err(write_err)?;
    file.write_all(bytes).map_err(write_err)?;
    file.as_file().sync_all().map_err(write_err)?;
    file.persist(path).map_err(|e| write_err(e.error))?;

    Ok(())
}

fn remove_if_exists(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %path.display(), error = %e, "Failed to remove file");
        }
    }
}
