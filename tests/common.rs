//! Common test utilities for store integration tests
//!
//! This module provides shared test infrastructure including:
//! - In-memory wallet and ledger capabilities with failure switches
//! - A notice sink that records blocking alerts
//! - Test environment setup on a temporary data directory
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

use wallet_tx_store::{
    LedgerContract, LedgerEntry, LocalStorage, PendingWrite, StoreConfig, StoreError,
    TransferRequest, UserNotice, WalletBackend, WalletProvider, WalletTransactionStore,
};

pub const TEST_ACCOUNT: &str = "0xABC0000000000000000000000000000000000001";
pub const RECIPIENT: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";

pub fn init_logger() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init()
        .ok();
}

// ============================================================================
// Wallet
// ============================================================================

pub struct MockWallet {
    authorized: Mutex<Vec<String>>,
    grant: Vec<String>,
    deny_authorization: bool,
    pub reject_transfers: AtomicBool,
    pub transfers: Mutex<Vec<TransferRequest>>,
    pub list_calls: AtomicUsize,
}

impl MockWallet {
    /// Wallet with nothing authorized yet that grants `TEST_ACCOUNT` on request
    pub fn new() -> Self {
        Self {
            authorized: Mutex::new(Vec::new()),
            grant: vec![TEST_ACCOUNT.to_string()],
            deny_authorization: false,
            reject_transfers: AtomicBool::new(false),
            transfers: Mutex::new(Vec::new()),
            list_calls: AtomicUsize::new(0),
        }
    }

    pub fn already_authorized(accounts: &[&str]) -> Self {
        let wallet = Self::new();
        *wallet.authorized.lock().unwrap() = accounts.iter().map(|a| a.to_string()).collect();
        wallet
    }

    pub fn denying() -> Self {
        Self {
            deny_authorization: true,
            ..Self::new()
        }
    }

    pub fn transfer_count(&self) -> usize {
        self.transfers.lock().unwrap().len()
    }
}

#[async_trait]
impl WalletProvider for MockWallet {
    async fn list_authorized_accounts(&self) -> Result<Vec<String>, StoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.authorized.lock().unwrap().clone())
    }

    async fn request_authorization(&self) -> Result<Vec<String>, StoreError> {
        if self.deny_authorization {
            return Err(StoreError::AuthorizationDenied(
                "User rejected the request.".to_string(),
            ));
        }
        *self.authorized.lock().unwrap() = self.grant.clone();
        Ok(self.grant.clone())
    }

    async fn submit_transfer(&self, request: TransferRequest) -> Result<String, StoreError> {
        if self.reject_transfers.load(Ordering::SeqCst) {
            return Err(StoreError::Provider("insufficient funds".to_string()));
        }
        let mut transfers = self.transfers.lock().unwrap();
        transfers.push(request);
        Ok(format!("0xtransfer{}", transfers.len()))
    }
}

// ============================================================================
// Ledger
// ============================================================================

#[derive(Default)]
pub struct LedgerBook {
    pub entries: Vec<LedgerEntry>,
    pub writes: usize,
}

pub struct MockLedger {
    pub book: Arc<Mutex<LedgerBook>>,
    pub fail_reads: AtomicBool,
    pub fail_confirmation: AtomicBool,
    pub history_reads: AtomicUsize,
    pub count_reads: AtomicUsize,
    confirmation_delay: Duration,
    /// Per-write delays, consumed in write order before the default applies
    queued_delays: Mutex<VecDeque<Duration>>,
}

impl MockLedger {
    pub fn new() -> Self {
        Self::with_entries(Vec::new())
    }

    pub fn with_entries(entries: Vec<LedgerEntry>) -> Self {
        Self {
            book: Arc::new(Mutex::new(LedgerBook {
                entries,
                writes: 0,
            })),
            fail_reads: AtomicBool::new(false),
            fail_confirmation: AtomicBool::new(false),
            history_reads: AtomicUsize::new(0),
            count_reads: AtomicUsize::new(0),
            confirmation_delay: Duration::from_millis(20),
            queued_delays: Mutex::new(VecDeque::new()),
        }
    }

    /// Confirm the next writes after these delays, in order
    pub fn with_confirmation_delays(self, delays: &[Duration]) -> Self {
        self.queued_delays.lock().unwrap().extend(delays.iter().copied());
        self
    }

    pub fn entry_count(&self) -> usize {
        self.book.lock().unwrap().entries.len()
    }

    pub fn writes(&self) -> usize {
        self.book.lock().unwrap().writes
    }

    fn check_reads(&self) -> Result<(), StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Ledger("execution reverted".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerContract for MockLedger {
    async fn get_all_transactions(&self) -> Result<Vec<LedgerEntry>, StoreError> {
        self.history_reads.fetch_add(1, Ordering::SeqCst);
        self.check_reads()?;
        Ok(self.book.lock().unwrap().entries.clone())
    }

    async fn get_transaction_count(&self) -> Result<u64, StoreError> {
        self.count_reads.fetch_add(1, Ordering::SeqCst);
        self.check_reads()?;
        Ok(self.book.lock().unwrap().entries.len() as u64)
    }

    async fn add_to_blockchain(
        &self,
        to: &str,
        amount_fixed_point: u128,
        message: &str,
        keyword: &str,
    ) -> Result<Box<dyn PendingWrite>, StoreError> {
        let writes = {
            let mut book = self.book.lock().unwrap();
            book.writes += 1;
            book.writes
        };
        let delay = self
            .queued_delays
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(self.confirmation_delay);

        Ok(Box::new(MockPendingWrite {
            hash: format!("0xrecord{}", writes),
            entry: LedgerEntry {
                sender: TEST_ACCOUNT.to_string(),
                receiver: to.to_string(),
                timestamp_seconds: 1_700_000_000 + writes as u64,
                message: message.to_string(),
                keyword: keyword.to_string(),
                amount_fixed_point,
            },
            book: self.book.clone(),
            fail: self.fail_confirmation.load(Ordering::SeqCst),
            delay,
        }))
    }
}

pub struct MockPendingWrite {
    hash: String,
    entry: LedgerEntry,
    book: Arc<Mutex<LedgerBook>>,
    fail: bool,
    delay: Duration,
}

#[async_trait]
impl PendingWrite for MockPendingWrite {
    fn hash(&self) -> &str {
        &self.hash
    }

    async fn wait(&self) -> Result<(), StoreError> {
        tokio::time::sleep(self.delay).await;
        if self.fail {
            return Err(StoreError::Ledger("transaction reverted".to_string()));
        }
        self.book.lock().unwrap().entries.push(self.entry.clone());
        Ok(())
    }
}

pub fn ledger_entry(sender: &str, message: &str, amount_fixed_point: u128) -> LedgerEntry {
    LedgerEntry {
        sender: sender.to_string(),
        receiver: RECIPIENT.to_string(),
        timestamp_seconds: 1_700_000_000,
        message: message.to_string(),
        keyword: "test".to_string(),
        amount_fixed_point,
    }
}

// ============================================================================
// Notice
// ============================================================================

#[derive(Default)]
pub struct RecordingNotice {
    pub alerts: Mutex<Vec<String>>,
}

impl RecordingNotice {
    pub fn count(&self) -> usize {
        self.alerts.lock().unwrap().len()
    }
}

impl UserNotice for RecordingNotice {
    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }
}

// ============================================================================
// Environment
// ============================================================================

/// Store wired to mocks on a temporary data directory
pub struct TestEnvironment {
    pub temp_dir: TempDir,
    pub wallet: Arc<MockWallet>,
    pub ledger: Arc<MockLedger>,
    pub notice: Arc<RecordingNotice>,
    pub store: Arc<WalletTransactionStore>,
}

impl TestEnvironment {
    pub fn new(wallet: MockWallet, ledger: MockLedger) -> Self {
        init_logger();
        let temp_dir = TempDir::new().expect("temp dir");
        let wallet = Arc::new(wallet);
        let ledger = Arc::new(ledger);
        let notice = Arc::new(RecordingNotice::default());

        let backend = WalletBackend::new(wallet.clone(), ledger.clone());
        let store = Arc::new(
            WalletTransactionStore::new_with_storage(
                StoreConfig::default(),
                LocalStorage::new_with_base_dir(temp_dir.path().to_path_buf()),
                Some(backend),
            )
            .with_notice(notice.clone()),
        );

        Self {
            temp_dir,
            wallet,
            ledger,
            notice,
            store,
        }
    }

    pub fn storage(&self) -> LocalStorage {
        LocalStorage::new_with_base_dir(self.temp_dir.path().to_path_buf())
    }
}

/// Store without any wallet provider, plus its notice sink
pub fn store_without_provider() -> (TempDir, WalletTransactionStore, Arc<RecordingNotice>) {
    init_logger();
    let temp_dir = TempDir::new().expect("temp dir");
    let notice = Arc::new(RecordingNotice::default());
    let store = WalletTransactionStore::new_with_storage(
        StoreConfig::default(),
        LocalStorage::new_with_base_dir(temp_dir.path().to_path_buf()),
        None,
    )
    .with_notice(notice.clone());
    (temp_dir, store, notice)
}
