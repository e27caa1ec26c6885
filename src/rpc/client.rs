use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;

use super::types::{RpcRequest, RpcResponse, USER_REJECTED_CODE};
use crate::error::StoreError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Failure of a single JSON-RPC call, before it is classified as a
/// wallet or ledger error
#[derive(Error, Debug)]
pub enum RpcCallError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("decode error: {0}")]
    Decode(String),
}

impl RpcCallError {
    pub fn is_user_rejection(&self) -> bool {
        matches!(self, RpcCallError::Rpc { code, .. } if *code == USER_REJECTED_CODE)
    }

    /// Classify a failure on a wallet method
    pub fn into_wallet_error(self) -> StoreError {
        if self.is_user_rejection() {
            StoreError::AuthorizationDenied(self.to_string())
        } else {
            StoreError::Provider(self.to_string())
        }
    }

    /// Classify a failure on a ledger contract method
    pub fn into_ledger_error(self) -> StoreError {
        if self.is_user_rejection() {
            StoreError::AuthorizationDenied(self.to_string())
        } else {
            StoreError::Ledger(self.to_string())
        }
    }
}

/// Minimal JSON-RPC 2.0 client over HTTP
pub struct JsonRpcClient {
    http: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl JsonRpcClient {
    pub fn new(url: &str) -> Result<Self, StoreError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| StoreError::Provider(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            url: url.to_string(),
            next_id: AtomicU64::new(1),
        })
    }

    /// Invoke `method` with positional `params` and decode the result
    pub async fn call<P, R>(&self, method: &str, params: P) -> Result<R, RpcCallError>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = RpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };
        log::debug!("→ {} (id={})", method, id);

        let response = self
            .http
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| RpcCallError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(RpcCallError::Transport(format!(
                "{} returned HTTP {}",
                self.url,
                response.status()
            )));
        }

        let body: RpcResponse = response
            .json()
            .await
            .map_err(|e| RpcCallError::Decode(e.to_string()))?;

        if let Some(error) = body.error {
            log::debug!("← {} (id={}) error {}", method, id, error.code);
            return Err(RpcCallError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        serde_json::from_value(body.result)
            .map_err(|e| RpcCallError::Decode(format!("{}: {}", method, e)))
    }
}
