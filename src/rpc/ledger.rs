use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

use super::client::JsonRpcClient;
use super::types::{LedgerRecordParams, Receipt, WireLedgerEntry};
use crate::amount::{parse_quantity, to_quantity};
use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::provider::{LedgerContract, PendingWrite};
use crate::types::LedgerEntry;

/// Ledger contract bound to a fixed address, signing with the wallet's
/// first authorized account
pub struct RpcLedgerContract {
    client: Arc<JsonRpcClient>,
    contract_address: String,
    poll_interval: Duration,
    max_attempts: u32,
}

impl RpcLedgerContract {
    pub fn new(client: Arc<JsonRpcClient>, config: &StoreConfig) -> Self {
        Self {
            client,
            contract_address: config.contract_address.clone(),
            poll_interval: config.confirmation_poll_interval,
            // Always poll at least once
            max_attempts: config.confirmation_max_attempts.max(1),
        }
    }

    async fn signer(&self) -> Result<String, StoreError> {
        let accounts: Vec<String> = self
            .client
            .call("eth_accounts", json!([]))
            .await
            .map_err(|e| e.into_wallet_error())?;

        accounts
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Provider("no signer account authorized".to_string()))
    }
}

#[async_trait]
impl LedgerContract for RpcLedgerContract {
    async fn get_all_transactions(&self) -> Result<Vec<LedgerEntry>, StoreError> {
        let wire: Vec<WireLedgerEntry> = self
            .client
            .call("ledger_getAllTransactions", [&self.contract_address])
            .await
            .map_err(|e| e.into_ledger_error())?;

        wire.into_iter().map(LedgerEntry::try_from).collect()
    }

    async fn get_transaction_count(&self) -> Result<u64, StoreError> {
        let raw: String = self
            .client
            .call("ledger_getTransactionCount", [&self.contract_address])
            .await
            .map_err(|e| e.into_ledger_error())?;

        let count = parse_quantity(&raw)
            .map_err(|e| StoreError::Ledger(format!("bad transaction count: {}", e)))?;
        u64::try_from(count).map_err(|_| StoreError::Ledger(format!("count {} too large", raw)))
    }

    async fn add_to_blockchain(
        &self,
        to: &str,
        amount_fixed_point: u128,
        message: &str,
        keyword: &str,
    ) -> Result<Box<dyn PendingWrite>, StoreError> {
        let record = LedgerRecordParams {
            from: self.signer().await?,
            to: to.to_string(),
            amount: to_quantity(amount_fixed_point),
            message: message.to_string(),
            keyword: keyword.to_string(),
        };

        let hash: String = self
            .client
            .call(
                "ledger_addToBlockchain",
                (&self.contract_address, record),
            )
            .await
            .map_err(|e| e.into_ledger_error())?;

        Ok(Box::new(RpcPendingWrite {
            client: self.client.clone(),
            hash,
            poll_interval: self.poll_interval,
            max_attempts: self.max_attempts,
        }))
    }
}

/// Ledger write awaiting confirmation; polls `ledger_getReceipt`
pub struct RpcPendingWrite {
    client: Arc<JsonRpcClient>,
    hash: String,
    poll_interval: Duration,
    max_attempts: u32,
}

#[async_trait]
impl PendingWrite for RpcPendingWrite {
    fn hash(&self) -> &str {
        &self.hash
    }

    async fn wait(&self) -> Result<(), StoreError> {
        for attempt in 1..=self.max_attempts {
            let receipt: Option<Receipt> = self
                .client
                .call("ledger_getReceipt", [&self.hash])
                .await
                .map_err(|e| e.into_ledger_error())?;

            match receipt {
                Some(receipt) if receipt.confirmed => {
                    log::debug!(
                        "Write {} confirmed in block {}",
                        self.hash,
                        receipt.block_number.as_deref().unwrap_or("?")
                    );
                    return Ok(());
                }
                Some(_) => log::debug!("Write {} pending (attempt {})", self.hash, attempt),
                None => log::debug!("Write {} not yet known (attempt {})", self.hash, attempt),
            }

            if attempt < self.max_attempts {
                tokio::time::sleep(self.poll_interval).await;
            }
        }

        Err(StoreError::ConfirmationTimeout(format!(
            "{} not confirmed after {} attempts",
            self.hash, self.max_attempts
        )))
    }
}
