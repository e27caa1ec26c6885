//! In-memory wallet and ledger state
//!
//! Dev accounts start funded and unauthorized. Ledger writes stay pending
//! until mined; only confirmed records are visible to reads.

use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::types::*;

/// 10^18, one whole unit in the ledger's fixed-point scale
pub const UNIT: u128 = 1_000_000_000_000_000_000;

pub type SharedLedger = Arc<Mutex<LedgerState>>;

#[derive(Debug, Clone)]
pub struct MockConfig {
    /// Accounts the wallet can authorize, first one is primary
    pub accounts: Vec<String>,
    /// Starting balance of every dev account (fixed-point)
    pub initial_balance: u128,
    /// Address the ledger contract is deployed at
    pub contract_address: String,
    /// Answer `eth_requestAccounts` with a user rejection
    pub reject_authorization: bool,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            accounts: vec![
                "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".to_string(),
                "0x70997970C51812dc3A010C7d01b50e0d17dc79C8".to_string(),
            ],
            initial_balance: 10_000 * UNIT,
            contract_address: "0x5FbDB2315678afecb367f032d93F642f64180aa3".to_string(),
            reject_authorization: false,
        }
    }
}

#[derive(Debug, Clone)]
enum RecordStatus {
    Pending,
    Confirmed { block_number: u64, timestamp: u64 },
}

#[derive(Debug, Clone)]
struct LedgerRecord {
    hash: String,
    params: RecordParams,
    status: RecordStatus,
}

#[derive(Debug)]
pub struct LedgerState {
    config: MockConfig,
    authorized: bool,
    balances: HashMap<String, u128>,
    records: Vec<LedgerRecord>,
    transfer_count: u64,
    nonce: u64,
    block_number: u64,
}

impl LedgerState {
    pub fn new(config: MockConfig) -> Self {
        let balances = config
            .accounts
            .iter()
            .map(|a| (a.to_lowercase(), config.initial_balance))
            .collect();

        Self {
            config,
            authorized: false,
            balances,
            records: Vec::new(),
            transfer_count: 0,
            nonce: 0,
            block_number: 0,
        }
    }

    pub fn shared(config: MockConfig) -> SharedLedger {
        Arc::new(Mutex::new(Self::new(config)))
    }

    // ============================================================================
    // Wallet
    // ============================================================================

    /// `eth_accounts`: empty until the user authorizes
    pub fn accounts(&self) -> Vec<String> {
        if self.authorized {
            self.config.accounts.clone()
        } else {
            Vec::new()
        }
    }

    /// `eth_requestAccounts`
    pub fn request_accounts(&mut self) -> Result<Vec<String>, RpcError> {
        if self.config.reject_authorization {
            log::info!("🚫 Authorization rejected");
            return Err(RpcError::user_rejected());
        }
        if !self.authorized {
            log::info!("🔓 Accounts authorized: {:?}", self.config.accounts);
        }
        self.authorized = true;
        Ok(self.config.accounts.clone())
    }

    pub fn balance_of(&self, address: &str) -> u128 {
        self.balances
            .get(&address.to_lowercase())
            .copied()
            .unwrap_or(0)
    }

    pub fn transfer_count(&self) -> u64 {
        self.transfer_count
    }

    /// `eth_sendTransaction`: move value between accounts
    pub fn send_transaction(&mut self, params: SendTransactionParams) -> Result<String, RpcError> {
        self.require_authorized(&params.from)?;
        if !is_address(&params.to) {
            return Err(RpcError::invalid_params(format!(
                "invalid recipient address: {}",
                params.to
            )));
        }
        let value = parse_quantity(&params.value)?;

        let from = params.from.to_lowercase();
        let balance = self.balance_of(&from);
        if balance < value {
            return Err(RpcError::server(format!(
                "insufficient funds: balance {} < value {}",
                balance, value
            )));
        }

        self.balances.insert(from, balance - value);
        *self.balances.entry(params.to.to_lowercase()).or_insert(0) += value;
        self.transfer_count += 1;

        let hash = self.next_hash("transfer", &params.from, &params.to, &params.value);
        log::info!("💸 Transfer {} -> {} ({}): {}", params.from, params.to, params.value, hash);
        Ok(hash)
    }

    // ============================================================================
    // Ledger contract
    // ============================================================================

    /// `ledger_addToBlockchain`: queue a record until the next mine
    pub fn add_record(&mut self, contract: &str, params: RecordParams) -> Result<String, RpcError> {
        self.require_contract(contract)?;
        self.require_authorized(&params.from)?;
        parse_quantity(&params.amount)?;

        let hash = self.next_hash("record", &params.from, &params.to, &params.amount);
        log::info!("📝 Record queued: {}", hash);
        self.records.push(LedgerRecord {
            hash: hash.clone(),
            params,
            status: RecordStatus::Pending,
        });
        Ok(hash)
    }

    /// `ledger_getReceipt`: `None` for unknown hashes
    pub fn receipt(&self, hash: &str) -> Option<ReceiptResponse> {
        self.records
            .iter()
            .find(|r| r.hash.eq_ignore_ascii_case(hash))
            .map(|r| match r.status {
                RecordStatus::Pending => ReceiptResponse {
                    hash: r.hash.clone(),
                    confirmed: false,
                    block_number: None,
                },
                RecordStatus::Confirmed { block_number, .. } => ReceiptResponse {
                    hash: r.hash.clone(),
                    confirmed: true,
                    block_number: Some(format!("{:#x}", block_number)),
                },
            })
    }

    /// `ledger_getAllTransactions`: confirmed records in insertion order
    pub fn confirmed_entries(&self, contract: &str) -> Result<Vec<LedgerEntryResponse>, RpcError> {
        self.require_contract(contract)?;
        Ok(self
            .records
            .iter()
            .filter_map(|r| match r.status {
                RecordStatus::Confirmed { timestamp, .. } => Some(LedgerEntryResponse {
                    sender: r.params.from.clone(),
                    receiver: r.params.to.clone(),
                    timestamp: format!("{:#x}", timestamp),
                    message: r.params.message.clone(),
                    keyword: r.params.keyword.clone(),
                    amount: r.params.amount.clone(),
                }),
                RecordStatus::Pending => None,
            })
            .collect())
    }

    /// `ledger_getTransactionCount`
    pub fn confirmed_count(&self, contract: &str) -> Result<u64, RpcError> {
        self.require_contract(contract)?;
        Ok(self
            .records
            .iter()
            .filter(|r| matches!(r.status, RecordStatus::Confirmed { .. }))
            .count() as u64)
    }

    pub fn pending_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r.status, RecordStatus::Pending))
            .count()
    }

    /// Confirm every pending record in a new block stamped `timestamp`
    pub fn mine(&mut self, timestamp: u64) -> MineResponse {
        self.block_number += 1;
        let block_number = self.block_number;

        let mut confirmed = 0;
        for record in &mut self.records {
            if matches!(record.status, RecordStatus::Pending) {
                record.status = RecordStatus::Confirmed {
                    block_number,
                    timestamp,
                };
                confirmed += 1;
            }
        }

        if confirmed > 0 {
            log::info!("⛏️  Block {} confirmed {} record(s)", block_number, confirmed);
        }

        MineResponse {
            confirmed,
            block_number,
        }
    }

    // ============================================================================
    // Helpers
    // ============================================================================

    fn require_authorized(&self, from: &str) -> Result<(), RpcError> {
        let known = self
            .config
            .accounts
            .iter()
            .any(|a| a.eq_ignore_ascii_case(from));
        if !self.authorized || !known {
            return Err(RpcError::server(format!(
                "account {} is not authorized",
                from
            )));
        }
        Ok(())
    }

    fn require_contract(&self, contract: &str) -> Result<(), RpcError> {
        if !self.config.contract_address.eq_ignore_ascii_case(contract) {
            return Err(RpcError::server(format!("no contract at {}", contract)));
        }
        Ok(())
    }

    fn next_hash(&mut self, kind: &str, from: &str, to: &str, value: &str) -> String {
        self.nonce += 1;
        let mut hasher = Sha256::new();
        hasher.update(kind.as_bytes());
        hasher.update(from.to_lowercase().as_bytes());
        hasher.update(to.to_lowercase().as_bytes());
        hasher.update(value.as_bytes());
        hasher.update(self.nonce.to_be_bytes());
        format!("0x{}", hex::encode(hasher.finalize()))
    }
}

/// `0x` followed by 40 hex digits
pub fn is_address(value: &str) -> bool {
    match value.strip_prefix("0x") {
        Some(digits) => digits.len() == 40 && hex::decode(digits).is_ok(),
        None => false,
    }
}

/// Decode a `0x`-prefixed hex quantity
pub fn parse_quantity(value: &str) -> Result<u128, RpcError> {
    value
        .strip_prefix("0x")
        .filter(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_hexdigit()))
        .and_then(|digits| u128::from_str_radix(digits, 16).ok())
        .ok_or_else(|| RpcError::invalid_params(format!("invalid hex quantity: {}", value)))
}
