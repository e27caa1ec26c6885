//! Axum HTTP handlers for the JSON-RPC endpoint and dev helpers

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::MutexGuard;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::state::{LedgerState, SharedLedger};
use crate::types::*;

/// Shared application state
pub type AppState = SharedLedger;

/// Error type for the non-RPC endpoints
pub enum ApiError {
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, message).into_response()
    }
}

fn lock(state: &AppState) -> Result<MutexGuard<'_, LedgerState>, RpcError> {
    state
        .lock()
        .map_err(|_| RpcError::server("ledger state poisoned"))
}

fn params<T: DeserializeOwned>(value: Value) -> Result<T, RpcError> {
    serde_json::from_value(value).map_err(|e| RpcError::invalid_params(e.to_string()))
}

fn to_value<T: serde::Serialize>(value: T) -> Result<Value, RpcError> {
    serde_json::to_value(value).map_err(|e| RpcError::server(e.to_string()))
}

/// Route one JSON-RPC call to the ledger state
pub fn dispatch(state: &AppState, method: &str, raw_params: Value) -> Result<Value, RpcError> {
    match method {
        "eth_accounts" => to_value(lock(state)?.accounts()),
        "eth_requestAccounts" => to_value(lock(state)?.request_accounts()?),
        "eth_sendTransaction" => {
            let (tx,): (SendTransactionParams,) = params(raw_params)?;
            to_value(lock(state)?.send_transaction(tx)?)
        }
        "ledger_addToBlockchain" => {
            let (contract, record): (String, RecordParams) = params(raw_params)?;
            to_value(lock(state)?.add_record(&contract, record)?)
        }
        "ledger_getReceipt" => {
            let (hash,): (String,) = params(raw_params)?;
            to_value(lock(state)?.receipt(&hash))
        }
        "ledger_getAllTransactions" => {
            let (contract,): (String,) = params(raw_params)?;
            to_value(lock(state)?.confirmed_entries(&contract)?)
        }
        "ledger_getTransactionCount" => {
            let (contract,): (String,) = params(raw_params)?;
            let count = lock(state)?.confirmed_count(&contract)?;
            to_value(format!("{:#x}", count))
        }
        other => Err(RpcError::method_not_found(other)),
    }
}

/// POST /rpc
/// JSON-RPC 2.0 endpoint; errors travel in the response body with HTTP 200
pub async fn rpc_handler(
    State(state): State<AppState>,
    Json(request): Json<RpcRequest>,
) -> Json<RpcResponse> {
    log::debug!("RPC {} (id={})", request.method, request.id);

    let response = match dispatch(&state, &request.method, request.params) {
        Ok(result) => RpcResponse::success(request.id, result),
        Err(error) => {
            log::warn!("RPC {} failed: {}", request.method, error);
            RpcResponse::failure(request.id, error)
        }
    };

    Json(response)
}

// ============================================================================
// DEV HELPER ENDPOINTS
// ============================================================================

/// POST /dev/mine
/// Confirm every pending ledger write in a new block
pub async fn mine_handler(State(state): State<AppState>) -> Result<Json<MineResponse>, ApiError> {
    let mined = state
        .lock()
        .map_err(|_| ApiError::Internal("ledger state poisoned".to_string()))?
        .mine(unix_now());
    Ok(Json(mined))
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}

pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
