// JSON-RPC request/response types

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::amount::parse_quantity;
use crate::error::StoreError;
use crate::types::LedgerEntry;

/// EIP-1193 "user rejected the request"
pub const USER_REJECTED_CODE: i64 = 4001;

#[derive(Debug, Serialize)]
pub struct RpcRequest<'a, P> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    pub params: P,
}

#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub result: Value,
    #[serde(default)]
    pub error: Option<RpcErrorObject>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
}

/// Params object of `eth_sendTransaction`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendTransactionParams {
    pub from: String,
    pub to: String,
    pub gas: String,   // hex quantity
    pub value: String, // hex quantity
}

/// Record argument of `ledger_addToBlockchain`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerRecordParams {
    pub from: String,
    pub to: String,
    pub amount: String, // hex quantity
    pub message: String,
    pub keyword: String,
}

/// Ledger entry as returned by `ledger_getAllTransactions`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireLedgerEntry {
    pub sender: String,
    pub receiver: String,
    pub timestamp: String, // hex quantity, unix seconds
    pub message: String,
    pub keyword: String,
    pub amount: String, // hex quantity, fixed-point
}

impl TryFrom<WireLedgerEntry> for LedgerEntry {
    type Error = StoreError;

    fn try_from(wire: WireLedgerEntry) -> Result<Self, Self::Error> {
        let timestamp = parse_quantity(&wire.timestamp)
            .map_err(|e| StoreError::Ledger(format!("bad timestamp: {}", e)))?;
        let timestamp_seconds = u64::try_from(timestamp)
            .map_err(|_| StoreError::Ledger(format!("timestamp {} too large", wire.timestamp)))?;
        let amount_fixed_point = parse_quantity(&wire.amount)
            .map_err(|e| StoreError::Ledger(format!("bad amount: {}", e)))?;

        Ok(LedgerEntry {
            sender: wire.sender,
            receiver: wire.receiver,
            timestamp_seconds,
            message: wire.message,
            keyword: wire.keyword,
            amount_fixed_point,
        })
    }
}

/// Result of `ledger_getReceipt`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub hash: String,
    pub confirmed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_number: Option<String>,
}
