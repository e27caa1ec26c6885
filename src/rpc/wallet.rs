use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

use super::client::JsonRpcClient;
use super::types::SendTransactionParams;
use crate::error::StoreError;
use crate::provider::WalletProvider;
use crate::types::TransferRequest;

/// Wallet reached through `eth_*` JSON-RPC methods
pub struct RpcWalletProvider {
    client: Arc<JsonRpcClient>,
}

impl RpcWalletProvider {
    pub fn new(client: Arc<JsonRpcClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl WalletProvider for RpcWalletProvider {
    async fn list_authorized_accounts(&self) -> Result<Vec<String>, StoreError> {
        self.client
            .call("eth_accounts", json!([]))
            .await
            .map_err(|e| e.into_wallet_error())
    }

    async fn request_authorization(&self) -> Result<Vec<String>, StoreError> {
        self.client
            .call("eth_requestAccounts", json!([]))
            .await
            .map_err(|e| e.into_wallet_error())
    }

    async fn submit_transfer(&self, request: TransferRequest) -> Result<String, StoreError> {
        let params = SendTransactionParams {
            from: request.from,
            to: request.to,
            gas: request.gas_limit_hex,
            value: request.value_hex,
        };
        self.client
            .call("eth_sendTransaction", [params])
            .await
            .map_err(|e| e.into_wallet_error())
    }
}
