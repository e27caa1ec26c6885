// JSON-RPC backends
// Wallet and ledger capabilities served by a node over HTTP

pub mod client;
pub mod ledger;
pub mod types;
pub mod wallet;

pub use client::{JsonRpcClient, RpcCallError};
pub use ledger::{RpcLedgerContract, RpcPendingWrite};
pub use wallet::RpcWalletProvider;

use std::sync::Arc;

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::provider::WalletBackend;

/// Build wallet and ledger backends sharing one RPC connection
pub fn rpc_backend(config: &StoreConfig) -> Result<WalletBackend, StoreError> {
    let client = Arc::new(JsonRpcClient::new(&config.rpc_url)?);
    Ok(WalletBackend::new(
        Arc::new(RpcWalletProvider::new(client.clone())),
        Arc::new(RpcLedgerContract::new(client, config)),
    ))
}
