// tests/integration.rs

//! Create → persist → reopen → unlock across the public API.

use quill_core::Address;
use quill_crypto::KdfParams;
use quill_wallet::{KeyDerivationService, SecretStore, WalletError};
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

fn service(root: &std::path::Path) -> KeyDerivationService {
    let store = Arc::new(SecretStore::open(root).unwrap());
    KeyDerivationService::new(store).with_kdf(KdfParams::insecure_fast())
}

#[test]
fn test_created_wallet_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let created = service(temp_dir.path()).create_wallet("Alice", "pw").unwrap();

    let store = SecretStore::open(temp_dir.path()).unwrap();
    let wallets = store.list_wallets().unwrap();
    assert_eq!(wallets.len(), 1);
    assert_eq!(wallets[0].name, "Alice");
    assert_eq!(wallets[0].address, created.address);

    let keystore = store.load_keystore(&created.address).unwrap();
    let key = keystore.private_key(&created.address, "pw").unwrap();
    assert_eq!(Address::from(key.address()), created.address);

    assert!(matches!(
        keystore.private_key(&created.address, "wrong"),
        Err(WalletError::InvalidPassword)
    ));
}

#[test]
fn test_keystore_file_named_by_address() {
    let temp_dir = TempDir::new().unwrap();
    let created = service(temp_dir.path()).create_wallet("Bob", "pw").unwrap();

    let expected = temp_dir
        .path()
        .join("keystore")
        .join(format!("{}.json", created.address));
    assert!(expected.is_file());

    let contents = std::fs::read_to_string(expected).unwrap();
    for word in created.mnemonic.words() {
        assert!(!contents.contains(&format!("\"{}\"", word)));
    }
}

#[test]
fn test_concurrent_creation() {
    let temp_dir = TempDir::new().unwrap();
    let service = service(temp_dir.path());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let service = service.clone();
            thread::spawn(move || service.create_wallet(&format!("w{}", i), "pw").unwrap().address)
        })
        .collect();

    let mut created: Vec<Address> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let mut listed: Vec<Address> = service
        .store()
        .list_wallets()
        .unwrap()
        .into_iter()
        .map(|w| w.address)
        .collect();

    created.sort();
    listed.sort();
    assert_eq!(created, listed);
}
