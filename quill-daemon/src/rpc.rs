// src/rpc.rs

//! HTTP API for the wallet UI, using Axum.

use crate::errors::ServiceError;
use crate::service::{ServiceStatus, WalletService};
use crate::session::WalletSession;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use quill_core::{Address, ErrorKind};
use quill_wallet::WalletMetadata;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

/// RPC server state
#[derive(Clone)]
pub struct RpcState {
    /// Wallet service
    pub service: Arc<WalletService>,
}

/// RPC server
pub struct RpcServer {
    /// Listen address
    listen_addr: SocketAddr,

    /// Server state
    state: RpcState,
}

impl RpcServer {
    /// Creates a new RPC server
    pub fn new(listen_addr: SocketAddr, service: Arc<WalletService>) -> Self {
        Self {
            listen_addr,
            state: RpcState { service },
        }
    }

    /// Route table
    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(root))
            .route("/status", get(get_status))
            .route("/wallets", get(list_wallets).post(create_wallet))
            .route("/wallets/:address", get(get_wallet))
            .route("/wallets/:address/balance", post(refresh_balance))
            .route("/wallets/:address/send", post(start_send))
            .route("/wallets/:address/send/confirm", post(confirm_send))
            .route("/wallets/:address/send/dismiss", post(dismiss_send))
            .with_state(self.state.clone())
    }

    /// Binds the listen address and serves until `shutdown` resolves
    pub async fn start<F>(self, shutdown: F) -> crate::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = tokio::net::TcpListener::bind(self.listen_addr)
            .await
            .map_err(|e| ServiceError::Rpc(format!("Failed to bind {}: {}", self.listen_addr, e)))?;
        self.serve(listener, shutdown).await
    }

    /// Serves on an already bound listener until `shutdown` resolves
    pub async fn serve<F>(self, listener: tokio::net::TcpListener, shutdown: F) -> crate::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router();
        let local = listener.local_addr().map_err(|e| ServiceError::Rpc(e.to_string()))?;

        tracing::info!("RPC server listening on {}", local);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| ServiceError::Rpc(format!("{}", e)))?;

        tracing::info!("RPC server stopped");
        Ok(())
    }
}

/// Error body returned by every failing route
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always false
    pub success: bool,
    /// Human readable message
    pub error: String,
    /// Taxonomy category
    pub kind: ErrorKind,
}

/// Service error rendered as an HTTP response
#[derive(Debug)]
pub struct ApiError(ServiceError);

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            ServiceError::UnknownWallet(_) => StatusCode::NOT_FOUND,
            ServiceError::InvalidTransition { .. } => StatusCode::CONFLICT,
            err => match err.kind() {
                ErrorKind::Validation | ErrorKind::Encoding => StatusCode::BAD_REQUEST,
                ErrorKind::Query | ErrorKind::Broadcast => StatusCode::BAD_GATEWAY,
                ErrorKind::Storage | ErrorKind::Derivation | ErrorKind::Signing => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            success: false,
            error: self.0.to_string(),
            kind: self.0.kind(),
        };
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

fn parse_address(address: &str) -> std::result::Result<Address, ApiError> {
    address
        .parse()
        .map_err(|e: quill_core::CoreError| ApiError(ServiceError::Core(e)))
}

// RPC handlers

async fn root() -> &'static str {
    "Quill Wallet Daemon"
}

async fn get_status(State(state): State<RpcState>) -> ApiResult<ServiceStatus> {
    Ok(Json(state.service.status().await?))
}

async fn list_wallets(State(state): State<RpcState>) -> ApiResult<Vec<WalletMetadata>> {
    Ok(Json(state.service.list_wallets().await?))
}

async fn create_wallet(
    State(state): State<RpcState>,
    Json(req): Json<CreateWalletRequest>,
) -> ApiResult<CreateWalletResponse> {
    let created = state.service.create_wallet(&req.name, &req.password).await?;
    Ok(Json(CreateWalletResponse {
        address: created.address,
        mnemonic: created.mnemonic.as_str().to_string(),
    }))
}

async fn get_wallet(
    State(state): State<RpcState>,
    Path(address): Path<String>,
) -> ApiResult<WalletSession> {
    let address = parse_address(&address)?;
    Ok(Json(state.service.session(&address).await?))
}

async fn refresh_balance(
    State(state): State<RpcState>,
    Path(address): Path<String>,
) -> ApiResult<WalletSession> {
    let address = parse_address(&address)?;
    Ok(Json(state.service.refresh_balance(&address).await?))
}

async fn start_send(
    State(state): State<RpcState>,
    Path(address): Path<String>,
) -> ApiResult<WalletSession> {
    let address = parse_address(&address)?;
    Ok(Json(state.service.start_send(&address).await?))
}

async fn confirm_send(
    State(state): State<RpcState>,
    Path(address): Path<String>,
    Json(req): Json<ConfirmSendRequest>,
) -> ApiResult<WalletSession> {
    let address = parse_address(&address)?;
    let session = state
        .service
        .confirm_send(&address, &req.recipient, &req.amount, &req.password)
        .await?;
    Ok(Json(session))
}

async fn dismiss_send(
    State(state): State<RpcState>,
    Path(address): Path<String>,
) -> ApiResult<WalletSession> {
    let address = parse_address(&address)?;
    Ok(Json(state.service.dismiss_send(&address).await?))
}

// Request/Response types

/// Body of `POST /wallets`
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateWalletRequest {
    /// Display name
    pub name: String,
    /// Keystore password
    pub password: String,
}

/// Response of `POST /wallets`
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateWalletResponse {
    /// Primary address
    pub address: Address,
    /// Recovery phrase, returned only here
    pub mnemonic: String,
}

/// Body of `POST /wallets/:address/send/confirm`
#[derive(Debug, Serialize, Deserialize)]
pub struct ConfirmSendRequest {
    /// Recipient address
    pub recipient: String,
    /// Amount in ETH
    pub amount: String,
    /// Keystore password
    pub password: String,
}
