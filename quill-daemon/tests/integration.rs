// tests/integration.rs

//! Wallet lifecycle through the service and the HTTP API.

use quill_core::{Address, ErrorKind, TransactionBuilder, TxHash, Wei};
use quill_crypto::KdfParams;
use quill_daemon::rpc::{CreateWalletResponse, ErrorResponse};
use quill_daemon::{
    BalanceState, DaemonConfig, RpcServer, SendPhase, ServiceError, WalletService,
};
use quill_network::{BlockTag, MockLedger};
use quill_wallet::{SecretStore, WalletMetadata};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::oneshot;

const RECIPIENT: &str = "0x70997970c51812dc3a010c7d01b50e0d17dc79c8";
const ETH: Wei = 1_000_000_000_000_000_000;

fn config(dir: &TempDir) -> DaemonConfig {
    let mut config = DaemonConfig::default();
    config.data_dir = dir.path().to_path_buf();
    config.wallet.kdf = KdfParams::insecure_fast();
    config.wallet.entropy_bits = 128;
    config
}

#[tokio::test]
async fn test_send_broadcasts_expected_transaction() {
    let dir = TempDir::new().unwrap();
    let ledger = Arc::new(MockLedger::new());
    let service = WalletService::new(config(&dir), ledger.clone()).unwrap();
    let from = service.create_wallet("Alice", "pw").await.unwrap().address;

    ledger.set_balance(from, 2 * ETH);
    ledger.set_transaction_count(from, BlockTag::Pending, 5);
    ledger.set_transaction_count(from, BlockTag::Latest, 3);

    service.refresh_balance(&from).await.unwrap();
    service.start_send(&from).await.unwrap();
    let session = service.confirm_send(&from, RECIPIENT, "1.0", "pw").await.unwrap();
    assert_eq!(session.send.phase, SendPhase::Success);

    // Signing is deterministic, so the expected bytes can be rebuilt
    let store = SecretStore::open(dir.path()).unwrap();
    let key = store.load_keystore(&from).unwrap().private_key(&from, "pw").unwrap();
    let expected = TransactionBuilder::new()
        .from(from)
        .to(RECIPIENT.parse().unwrap())
        .value_eth("1.0")
        .nonce(5)
        .build()
        .unwrap()
        .sign(&key)
        .unwrap();

    assert_eq!(expected.recover_sender().unwrap(), from);
    assert_eq!(ledger.sent_transactions(), vec![expected.encode().unwrap()]);
    assert_eq!(session.send.tx_hash, Some(expected.hash().unwrap()));
}

#[tokio::test]
async fn test_broadcast_failure_is_retained() {
    let dir = TempDir::new().unwrap();
    let ledger = Arc::new(MockLedger::new());
    let service = WalletService::new(config(&dir), ledger.clone()).unwrap();
    let from = service.create_wallet("Alice", "pw").await.unwrap().address;

    ledger.set_balance(from, 2 * ETH);
    ledger.fail_broadcast("nonce too low");
    service.refresh_balance(&from).await.unwrap();
    service.start_send(&from).await.unwrap();

    let session = service.confirm_send(&from, RECIPIENT, "1", "pw").await.unwrap();
    assert_eq!(session.send.phase, SendPhase::Failed);
    assert_eq!(session.send.error_kind, Some(ErrorKind::Broadcast));
    assert!(session.send.error.as_deref().unwrap().contains("nonce too low"));

    // No automatic retry
    assert_eq!(ledger.broadcast_attempts(), 1);
    assert_eq!(service.session(&from).await.unwrap().send.phase, SendPhase::Failed);
}

#[tokio::test]
async fn test_one_send_in_flight_per_wallet() {
    let dir = TempDir::new().unwrap();
    let ledger = Arc::new(MockLedger::new());
    let service = Arc::new(WalletService::new(config(&dir), ledger.clone()).unwrap());
    let from = service.create_wallet("Alice", "pw").await.unwrap().address;

    ledger.set_balance(from, 2 * ETH);
    service.refresh_balance(&from).await.unwrap();
    service.start_send(&from).await.unwrap();
    ledger.set_latency(Duration::from_millis(200));

    let first = {
        let service = service.clone();
        tokio::spawn(async move { service.confirm_send(&from, RECIPIENT, "1", "pw").await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    let second = service.confirm_send(&from, RECIPIENT, "1", "pw").await;
    assert!(matches!(
        second,
        Err(ServiceError::InvalidTransition { phase: SendPhase::InProgress, .. })
    ));
    assert!(service.dismiss_send(&from).await.is_err());

    let first = first.await.unwrap().unwrap();
    assert_eq!(first.send.phase, SendPhase::Success);
    assert_eq!(ledger.broadcast_attempts(), 1);
}

#[tokio::test]
async fn test_wallets_are_independent() {
    let dir = TempDir::new().unwrap();
    let ledger = Arc::new(MockLedger::new());
    let service = WalletService::new(config(&dir), ledger.clone()).unwrap();
    let alice = service.create_wallet("Alice", "pw-a").await.unwrap().address;
    let bob = service.create_wallet("Bob", "pw-b").await.unwrap().address;

    ledger.set_balance(alice, 3 * ETH);
    ledger.set_balance(bob, ETH);
    service.refresh_balance(&alice).await.unwrap();
    service.refresh_balance(&bob).await.unwrap();
    service.start_send(&alice).await.unwrap();

    let bob_session = service.session(&bob).await.unwrap();
    assert_eq!(bob_session.send.phase, SendPhase::Idle);
    assert_eq!(bob_session.balance, BalanceState::Success("1.0".to_string()));

    let names: Vec<String> = service
        .list_wallets()
        .await
        .unwrap()
        .into_iter()
        .map(|w| w.name)
        .collect();
    assert_eq!(names, vec!["Alice", "Bob"]);
}

async fn spawn_server(dir: &TempDir, ledger: Arc<MockLedger>) -> (String, oneshot::Sender<()>) {
    let service = Arc::new(WalletService::new(config(dir), ledger).unwrap());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        RpcServer::new(addr, service)
            .serve(listener, async move {
                let _ = rx.await;
            })
            .await
            .unwrap();
    });

    (format!("http://{}", addr), tx)
}

#[tokio::test]
async fn test_http_send_flow() {
    let dir = TempDir::new().unwrap();
    let ledger = Arc::new(MockLedger::new());
    let (base, _shutdown) = spawn_server(&dir, ledger.clone()).await;
    let http = reqwest::Client::new();

    let banner = http.get(&base).send().await.unwrap().text().await.unwrap();
    assert_eq!(banner, "Quill Wallet Daemon");

    let created: CreateWalletResponse = http
        .post(format!("{}/wallets", base))
        .json(&json!({"name": "Alice", "password": "pw"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(created.mnemonic.split_whitespace().count(), 12);

    let wallets: Vec<WalletMetadata> = http
        .get(format!("{}/wallets", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(wallets.len(), 1);
    assert_eq!(wallets[0].address, created.address);

    let wallet_url = format!("{}/wallets/{}", base, created.address);
    ledger.set_balance(created.address, 2 * ETH);

    let response = http.post(format!("{}/balance", wallet_url)).send().await.unwrap();
    let session: serde_json::Value = response.json().await.unwrap();
    assert_eq!(session["balance"], json!({"state": "success", "value": "2.0"}));

    let response = http.post(format!("{}/send", wallet_url)).send().await.unwrap();
    let session: serde_json::Value = response.json().await.unwrap();
    assert_eq!(session["send"]["phase"], "triggered");

    let response = http
        .post(format!("{}/send/confirm", wallet_url))
        .json(&json!({"recipient": RECIPIENT, "amount": "1.0", "password": "pw"}))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let session: serde_json::Value = response.json().await.unwrap();
    assert_eq!(session["send"]["phase"], "success");

    let hash: TxHash = session["send"]["tx_hash"].as_str().unwrap().parse().unwrap();
    assert_eq!(
        hash,
        TxHash(quill_crypto::hash::keccak_hash(&ledger.sent_transactions()[0]))
    );

    let response = http.post(format!("{}/send/dismiss", wallet_url)).send().await.unwrap();
    let session: serde_json::Value = response.json().await.unwrap();
    assert_eq!(session["send"]["phase"], "idle");
}

#[tokio::test]
async fn test_http_errors() {
    let dir = TempDir::new().unwrap();
    let ledger = Arc::new(MockLedger::new());
    let (base, _shutdown) = spawn_server(&dir, ledger.clone()).await;
    let http = reqwest::Client::new();

    let unknown = Address::from_bytes([9; 20]);
    let response = http.get(format!("{}/wallets/{}", base, unknown)).send().await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    let body: ErrorResponse = response.json().await.unwrap();
    assert!(!body.success);
    assert_eq!(body.kind, ErrorKind::Validation);

    let response = http.get(format!("{}/wallets/not-an-address", base)).send().await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);

    let created: CreateWalletResponse = http
        .post(format!("{}/wallets", base))
        .json(&json!({"name": "Alice", "password": "pw"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let wallet_url = format!("{}/wallets/{}", base, created.address);

    // Confirm before start
    let response = http
        .post(format!("{}/send/confirm", wallet_url))
        .json(&json!({"recipient": RECIPIENT, "amount": "1", "password": "pw"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::CONFLICT);

    // Balance unavailable, then confirm has nothing to check against
    ledger.fail_balance("node down");
    let session: serde_json::Value = http
        .post(format!("{}/balance", wallet_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(session["balance"]["state"], "failed");

    http.post(format!("{}/send", wallet_url)).send().await.unwrap();
    let response = http
        .post(format!("{}/send/confirm", wallet_url))
        .json(&json!({"recipient": RECIPIENT, "amount": "1", "password": "pw"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: ErrorResponse = response.json().await.unwrap();
    assert_eq!(body.kind, ErrorKind::Validation);
    assert!(body.error.contains("balance unavailable"));
}
