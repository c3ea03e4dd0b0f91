// src/client.rs

//! Ledger client abstraction and its JSON-RPC implementation.

use crate::errors::{LedgerError, NetworkError};
use async_trait::async_trait;
use quill_core::{Address, TxHash, Wei};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

/// Block a transaction count is read at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockTag {
    /// Last mined block
    Latest,
    /// Mined block plus the node's pending pool
    Pending,
}

impl BlockTag {
    /// JSON-RPC tag string
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockTag::Latest => "latest",
            BlockTag::Pending => "pending",
        }
    }
}

/// Read and submit operations against one ledger endpoint
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Balance of `address` at the latest block
    async fn balance(&self, address: &Address) -> Result<Wei, LedgerError>;

    /// Number of transactions sent from `address` as of `tag`
    async fn transaction_count(&self, address: &Address, tag: BlockTag) -> Result<u64, LedgerError>;

    /// Submits signed wire bytes, returning the transaction hash
    async fn send_raw_transaction(&self, raw: &[u8]) -> Result<TxHash, LedgerError>;
}

#[derive(Serialize)]
struct JsonRpcRequest<'a, P> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: P,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<JsonRpcErrorObject>,
}

#[derive(Deserialize)]
struct JsonRpcErrorObject {
    code: i64,
    message: String,
}

/// HTTP JSON-RPC 2.0 client
#[derive(Debug)]
pub struct JsonRpcClient {
    inner: reqwest::Client,
    url: Url,
    next_id: AtomicU64,
}

impl JsonRpcClient {
    /// Creates a client for `endpoint` with a per-request timeout
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, NetworkError> {
        let url = Url::parse(endpoint).map_err(|e| NetworkError::InvalidEndpoint(format!("{}: {}", endpoint, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(NetworkError::InvalidEndpoint(format!(
                "unsupported scheme '{}'",
                url.scheme()
            )));
        }

        let inner = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NetworkError::InvalidEndpoint(e.to_string()))?;

        Ok(Self {
            inner,
            url,
            next_id: AtomicU64::new(1),
        })
    }

    /// Endpoint URL
    pub fn url(&self) -> &Url {
        &self.url
    }

    async fn request<P: Serialize + Send, R: DeserializeOwned>(
        &self,
        method: &str,
        params: P,
    ) -> Result<R, LedgerError> {
        let payload = JsonRpcRequest {
            jsonrpc: crate::JSONRPC_VERSION,
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        debug!(method, id = payload.id, "JSON-RPC request");
        let response = self.inner.post(self.url.clone()).json(&payload).send().await?;
        if !response.status().is_success() {
            return Err(LedgerError::Transport(format!(
                "HTTP status {} from {}",
                response.status(),
                self.url
            )));
        }

        let response: JsonRpcResponse = response.json().await?;
        if let Some(error) = response.error {
            return Err(LedgerError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        let result = response.result.ok_or(LedgerError::EmptyResponse)?;
        serde_json::from_value(result).map_err(|e| LedgerError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl LedgerClient for JsonRpcClient {
    async fn balance(&self, address: &Address) -> Result<Wei, LedgerError> {
        let quantity: String = self
            .request("eth_getBalance", (address.to_string(), BlockTag::Latest.as_str()))
            .await?;
        parse_quantity(&quantity)
    }

    async fn transaction_count(&self, address: &Address, tag: BlockTag) -> Result<u64, LedgerError> {
        let quantity: String = self
            .request("eth_getTransactionCount", (address.to_string(), tag.as_str()))
            .await?;
        let count = parse_quantity(&quantity)?;
        u64::try_from(count).map_err(|_| LedgerError::InvalidResponse(format!("count {} overflows", quantity)))
    }

    async fn send_raw_transaction(&self, raw: &[u8]) -> Result<TxHash, LedgerError> {
        let hash: String = self
            .request("eth_sendRawTransaction", [format!("0x{}", hex::encode(raw))])
            .await?;
        hash.parse()
            .map_err(|e: quill_core::CoreError| LedgerError::InvalidResponse(e.to_string()))
    }
}

/// Parses a JSON-RPC hex quantity (`"0x1bc16d674ec80000"`)
pub fn parse_quantity(quantity: &str) -> Result<u128, LedgerError> {
    let digits = quantity
        .strip_prefix("0x")
        .ok_or_else(|| LedgerError::InvalidResponse(format!("quantity '{}' lacks 0x prefix", quantity)))?;
    if digits.is_empty() {
        return Err(LedgerError::InvalidResponse("empty quantity".to_string()));
    }

    u128::from_str_radix(digits, 16)
        .map_err(|e| LedgerError::InvalidResponse(format!("quantity '{}': {}", quantity, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("0x0").unwrap(), 0);
        assert_eq!(parse_quantity("0x1bc16d674ec80000").unwrap(), 2_000_000_000_000_000_000);
        assert!(parse_quantity("0x").is_err());
        assert!(parse_quantity("12").is_err());
        assert!(parse_quantity("0xzz").is_err());
    }

    #[test]
    fn test_block_tags() {
        assert_eq!(BlockTag::Latest.as_str(), "latest");
        assert_eq!(BlockTag::Pending.as_str(), "pending");
    }

    #[test]
    fn test_invalid_endpoint() {
        let timeout = Duration::from_secs(1);
        assert!(matches!(
            JsonRpcClient::new("not a url", timeout),
            Err(NetworkError::InvalidEndpoint(_))
        ));
        assert!(matches!(
            JsonRpcClient::new("ftp://node.example", timeout),
            Err(NetworkError::InvalidEndpoint(_))
        ));
        assert!(JsonRpcClient::new("http://127.0.0.1:8545", timeout).is_ok());
    }

    #[test]
    fn test_request_shape() {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: 7,
            method: "eth_getTransactionCount",
            params: ("0xabc", "pending"),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "jsonrpc": "2.0",
                "id": 7,
                "method": "eth_getTransactionCount",
                "params": ["0xabc", "pending"]
            })
        );
    }
}
