//! Capabilities consumed by the store
//!
//! The wallet (account authorization and signing) and the ledger contract
//! (append-only transfer records) are external systems. The store only talks
//! to them through these traits, so tests can swap in mocks and alternative
//! wallet back ends can be plugged in.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::StoreError;
use crate::types::{LedgerEntry, TransferRequest};

/// Account authorization and value transfers
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Accounts the user already authorized; never prompts
    async fn list_authorized_accounts(&self) -> Result<Vec<String>, StoreError>;

    /// Ask the user to authorize accounts; may be denied
    async fn request_authorization(&self) -> Result<Vec<String>, StoreError>;

    /// Submit a value transfer, returning its hash
    async fn submit_transfer(&self, request: TransferRequest) -> Result<String, StoreError>;
}

/// Remote record store holding transfer history
#[async_trait]
pub trait LedgerContract: Send + Sync {
    async fn get_all_transactions(&self) -> Result<Vec<LedgerEntry>, StoreError>;

    async fn get_transaction_count(&self) -> Result<u64, StoreError>;

    /// Record a transfer; the returned handle resolves once it is durable
    async fn add_to_blockchain(
        &self,
        to: &str,
        amount_fixed_point: u128,
        message: &str,
        keyword: &str,
    ) -> Result<Box<dyn PendingWrite>, StoreError>;
}

/// Handle for a submitted ledger write
#[async_trait]
pub trait PendingWrite: Send + Sync {
    fn hash(&self) -> &str;

    /// Suspend until the write is confirmed
    async fn wait(&self) -> Result<(), StoreError>;
}

/// Blocking notice shown to the user (e.g. "install a wallet")
pub trait UserNotice: Send + Sync {
    fn alert(&self, message: &str);
}

/// Notice sink that only logs; used when no UI is attached
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotice;

impl UserNotice for LogNotice {
    fn alert(&self, message: &str) {
        log::warn!("🔔 {}", message);
    }
}

/// Wallet and ledger reachable through the same injected provider
#[derive(Clone)]
pub struct WalletBackend {
    pub wallet: Arc<dyn WalletProvider>,
    pub ledger: Arc<dyn LedgerContract>,
}

impl WalletBackend {
    pub fn new(wallet: Arc<dyn WalletProvider>, ledger: Arc<dyn LedgerContract>) -> Self {
        Self { wallet, ledger }
    }
}
