// tests/integration.rs

//! JSON-RPC client against a local stand-in node.

use axum::{extract::State, routing::post, Json, Router};
use quill_core::{Address, TxHash};
use quill_network::{
    BalanceQuery, BlockTag, BroadcastGateway, JsonRpcClient, LedgerClient, LedgerError,
    NetworkError, NonceResolver,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct NodeState {
    requests: Mutex<Vec<Value>>,
}

async fn handle(State(state): State<Arc<NodeState>>, Json(request): Json<Value>) -> Json<Value> {
    state.requests.lock().unwrap().push(request.clone());
    let id = request["id"].clone();
    let params = &request["params"];

    let body = match request["method"].as_str().unwrap_or_default() {
        "eth_getBalance" => json!({"jsonrpc": "2.0", "id": id, "result": "0x1bc16d674ec80000"}),
        "eth_getTransactionCount" => {
            let count = if params[1] == "pending" { "0x5" } else { "0x3" };
            json!({"jsonrpc": "2.0", "id": id, "result": count})
        }
        "eth_sendRawTransaction" if params[0] == "0xdeadbeef" => json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": {"code": -32000, "message": "invalid sender"}
        }),
        "eth_sendRawTransaction" => json!({
            "jsonrpc": "2.0",
            "id": id,
            "result": format!("0x{}", "ab".repeat(32))
        }),
        _ => json!({"jsonrpc": "2.0", "id": id}),
    };
    Json(body)
}

async fn spawn_node() -> (String, Arc<NodeState>) {
    let state = Arc::new(NodeState::default());
    let app = Router::new().route("/", post(handle)).with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/", addr), state)
}

fn account() -> Address {
    "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266".parse().unwrap()
}

fn client(endpoint: &str) -> Arc<JsonRpcClient> {
    Arc::new(JsonRpcClient::new(endpoint, Duration::from_secs(5)).unwrap())
}

#[tokio::test]
async fn test_balance_over_json_rpc() {
    let (endpoint, state) = spawn_node().await;
    let query = BalanceQuery::new(client(&endpoint));

    let balance = query.get_balance(&account()).await.unwrap();
    assert_eq!(balance, 2_000_000_000_000_000_000);

    let requests = state.requests.lock().unwrap();
    assert_eq!(requests[0]["method"], "eth_getBalance");
    assert_eq!(requests[0]["params"][0], "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
    assert_eq!(requests[0]["params"][1], "latest");
}

#[tokio::test]
async fn test_nonce_over_json_rpc() {
    let (endpoint, state) = spawn_node().await;
    let resolver = NonceResolver::new(client(&endpoint));

    assert_eq!(resolver.resolve_nonce(&account()).await.unwrap(), 5);

    let requests = state.requests.lock().unwrap();
    let mut tags: Vec<String> = requests
        .iter()
        .map(|r| r["params"][1].as_str().unwrap().to_string())
        .collect();
    tags.sort();
    assert_eq!(tags, vec!["latest", "pending"]);
}

#[tokio::test]
async fn test_broadcast_over_json_rpc() {
    let (endpoint, state) = spawn_node().await;
    let gateway = BroadcastGateway::new(client(&endpoint));

    let hash = gateway.send(&[0x01, 0x02]).await.unwrap();
    assert_eq!(hash, TxHash([0xab; 32]));
    assert_eq!(state.requests.lock().unwrap()[0]["params"][0], "0x0102");
}

#[tokio::test]
async fn test_broadcast_rpc_error() {
    let (endpoint, _state) = spawn_node().await;
    let gateway = BroadcastGateway::new(client(&endpoint));

    let result = gateway.send(&[0xde, 0xad, 0xbe, 0xef]).await;
    match result {
        Err(NetworkError::Broadcast(LedgerError::Rpc { code, message })) => {
            assert_eq!(code, -32000);
            assert_eq!(message, "invalid sender");
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_node() {
    // Bind then drop so nothing listens on the port
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let endpoint = format!("http://{}/", listener.local_addr().unwrap());
    drop(listener);

    let client = client(&endpoint);
    let result = client.transaction_count(&account(), BlockTag::Latest).await;
    assert!(matches!(result, Err(LedgerError::Transport(_))));

    let result = NonceResolver::new(client).resolve_nonce(&account()).await;
    assert!(matches!(result, Err(NetworkError::NonceQuery(_))));
}
