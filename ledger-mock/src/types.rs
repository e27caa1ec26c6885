//! JSON-RPC wire types
//!
//! Field names and hex-quantity encodings match what wallet clients send.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// EIP-1193 "user rejected the request"
pub const USER_REJECTED: i64 = 4001;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const SERVER_ERROR: i64 = -32000;

#[derive(Debug, Clone, Deserialize)]
pub struct RpcRequest {
    #[serde(default)]
    pub id: Value,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct RpcResponse {
    pub jsonrpc: &'static str,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl RpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Value, error: RpcError) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(error),
        }
    }
}

/// JSON-RPC error object, also the error type of every ledger operation
#[derive(Debug, Clone, Serialize, Deserialize, Error, PartialEq, Eq)]
#[error("{message} (code {code})")]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

impl RpcError {
    pub fn user_rejected() -> Self {
        Self {
            code: USER_REJECTED,
            message: "User rejected the request.".to_string(),
        }
    }

    pub fn method_not_found(method: &str) -> Self {
        Self {
            code: METHOD_NOT_FOUND,
            message: format!("Method not found: {}", method),
        }
    }

    pub fn invalid_params(msg: impl Into<String>) -> Self {
        Self {
            code: INVALID_PARAMS,
            message: msg.into(),
        }
    }

    pub fn server(msg: impl Into<String>) -> Self {
        Self {
            code: SERVER_ERROR,
            message: msg.into(),
        }
    }
}

/// `eth_sendTransaction` params object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendTransactionParams {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub gas: Option<String>,
    pub value: String,
}

/// `ledger_addToBlockchain` record argument
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordParams {
    pub from: String,
    pub to: String,
    pub amount: String,
    pub message: String,
    pub keyword: String,
}

/// Confirmed ledger entry as served by `ledger_getAllTransactions`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LedgerEntryResponse {
    pub sender: String,
    pub receiver: String,
    pub timestamp: String,
    pub message: String,
    pub keyword: String,
    pub amount: String,
}

/// `ledger_getReceipt` result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptResponse {
    pub hash: String,
    pub confirmed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_number: Option<String>,
}

/// `POST /dev/mine` result
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MineResponse {
    pub confirmed: usize,
    pub block_number: u64,
}
