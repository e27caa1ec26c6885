//! Wallet Transaction Store - Application Context
//!
//! Owns the account, the send form, the loading flag, the cached ledger
//! tally and the transaction history. Constructed once at startup and shared
//! by handle (`Arc`) with every consumer; each mutation publishes a fresh
//! snapshot to subscribers.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

use crate::amount::{parse_amount, to_quantity};
use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::provider::{LogNotice, UserNotice, WalletBackend};
use crate::storage::{LocalStorage, TRANSACTION_COUNT_KEY};
use crate::types::{
    FormField, SendReceipt, StoreSnapshot, Transaction, TransferRequest,
};

/// Notice shown when no wallet provider is injected
pub const INSTALL_WALLET_NOTICE: &str = "Please install a browser wallet (e.g. MetaMask)";

pub struct WalletTransactionStore {
    config: StoreConfig,
    storage: LocalStorage,
    backend: Option<WalletBackend>,
    notice: Arc<dyn UserNotice>,
    state: watch::Sender<StoreSnapshot>,
    /// Sends currently awaiting ledger confirmation
    confirmations_in_flight: AtomicUsize,
}

impl WalletTransactionStore {
    // ============================================================================
    // Constructor
    // ============================================================================

    /// Create the store; `backend` is `None` when no wallet is installed
    pub fn new(config: StoreConfig, backend: Option<WalletBackend>) -> Self {
        let storage = LocalStorage::new_with_base_dir(config.data_dir.clone());
        Self::new_with_storage(config, storage, backend)
    }

    /// Create the store with custom storage (for testing)
    pub fn new_with_storage(
        config: StoreConfig,
        storage: LocalStorage,
        backend: Option<WalletBackend>,
    ) -> Self {
        let initial = StoreSnapshot {
            transaction_count: load_cached_count(&storage),
            ..Default::default()
        };
        let (state, _) = watch::channel(initial);

        if backend.is_none() {
            log::warn!("No wallet provider injected; wallet operations are unavailable");
        }

        Self {
            config,
            storage,
            backend,
            notice: Arc::new(LogNotice),
            state,
            confirmations_in_flight: AtomicUsize::new(0),
        }
    }

    /// Route blocking notices to a UI instead of the log
    pub fn with_notice(mut self, notice: Arc<dyn UserNotice>) -> Self {
        self.notice = notice;
        self
    }

    // ============================================================================
    // State access
    // ============================================================================

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        self.state.borrow().clone()
    }

    /// Receiver notified after every state change
    pub fn subscribe(&self) -> watch::Receiver<StoreSnapshot> {
        self.state.subscribe()
    }

    pub fn account(&self) -> Option<String> {
        self.state.borrow().account.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    // ============================================================================
    // Form
    // ============================================================================

    /// Merge one field into the form; no validation
    pub fn update_form_field(&self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        self.state.send_modify(|state| state.form_data.set(field, value));
    }

    // ============================================================================
    // Connection
    // ============================================================================

    /// On-load sequence: re-derive the account, then refresh the ledger tally
    ///
    /// Both steps always run; the first failure is returned.
    pub async fn load(&self) -> Result<(), StoreError> {
        let connection = self.check_existing_connection().await;
        let count = self.refresh_transaction_count().await;
        connection?;
        count?;
        Ok(())
    }

    /// Pick up an account the user already authorized, without prompting
    pub async fn check_existing_connection(&self) -> Result<Option<String>, StoreError> {
        let backend = self.require_backend()?;

        let accounts = backend
            .wallet
            .list_authorized_accounts()
            .await
            .map_err(|e| {
                log::error!("Failed to list authorized accounts: {}", e);
                e
            })?;
        log::debug!("Authorized accounts: {:?}", accounts);

        let Some(account) = accounts.into_iter().next() else {
            log::info!("No authorized accounts found");
            return Ok(None);
        };

        self.set_account(&account);

        if let Err(e) = self.refresh_transaction_history().await {
            log::warn!("History refresh after reconnect failed: {}", e);
        }

        Ok(Some(account))
    }

    /// Prompt the user to authorize an account
    pub async fn connect_wallet(&self) -> Result<String, StoreError> {
        let backend = self.require_backend()?;

        let accounts = backend.wallet.request_authorization().await.map_err(|e| {
            log::error!("Wallet authorization failed: {}", e);
            e
        })?;

        let account = accounts.into_iter().next().ok_or_else(|| {
            log::error!("Wallet authorized no accounts");
            StoreError::AuthorizationDenied("no accounts were authorized".to_string())
        })?;

        self.set_account(&account);
        Ok(account)
    }

    // ============================================================================
    // Ledger reads
    // ============================================================================

    /// Fetch the ledger tally and write it to the durable cache
    pub async fn refresh_transaction_count(&self) -> Result<u64, StoreError> {
        let Some(backend) = self.backend.as_ref() else {
            log::debug!("Wallet provider not present, skipping count refresh");
            return Err(StoreError::WalletUnavailable);
        };

        let count = backend.ledger.get_transaction_count().await.map_err(|e| {
            log::error!("Failed to read transaction count: {}", e);
            e
        })?;

        self.storage
            .set_item(TRANSACTION_COUNT_KEY, &count.to_string())
            .map_err(|e| {
                log::error!("Failed to cache transaction count: {}", e);
                StoreError::from(e)
            })?;

        self.state
            .send_modify(|state| state.transaction_count = Some(count));
        log::debug!("Transaction count: {}", count);
        Ok(count)
    }

    /// Rebuild the history from the ledger, replacing the list wholesale
    ///
    /// Returns the number of transactions loaded. The list is left untouched
    /// on any failure.
    pub async fn refresh_transaction_history(&self) -> Result<usize, StoreError> {
        let Some(backend) = self.backend.as_ref() else {
            log::info!("Wallet provider not present, skipping history refresh");
            return Err(StoreError::WalletUnavailable);
        };

        let entries = backend.ledger.get_all_transactions().await.map_err(|e| {
            log::error!("Failed to read transactions: {}", e);
            e
        })?;

        let transactions = entries
            .into_iter()
            .map(Transaction::from_ledger_entry)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| {
                log::error!("Failed to convert ledger entries: {}", e);
                e
            })?;

        let loaded = transactions.len();
        self.state
            .send_modify(|state| state.transactions = transactions);
        log::info!("📜 Loaded {} transactions", loaded);

        Ok(loaded)
    }

    // ============================================================================
    // Send
    // ============================================================================

    /// Transfer the form amount and record it on the ledger
    ///
    /// The loading flag is raised while the ledger write awaits
    /// confirmation and stays raised until no send is left waiting. The form
    /// is not reset.
    pub async fn send_transaction(&self) -> Result<SendReceipt, StoreError> {
        let backend = self.require_backend()?;

        let result = self.run_send(backend).await;
        if let Err(e) = &result {
            log::error!("❌ Send failed ({}): {}", e.kind(), e);
        }
        result
    }

    async fn run_send(&self, backend: &WalletBackend) -> Result<SendReceipt, StoreError> {
        let (form, account, previous_count) = {
            let state = self.state.borrow();
            (
                state.form_data.clone(),
                state.account.clone(),
                state.transaction_count,
            )
        };

        let from = account.ok_or_else(|| {
            StoreError::Provider("no connected account; connect the wallet first".to_string())
        })?;
        let amount = parse_amount(&form.amount)?;

        let transfer_hash = backend
            .wallet
            .submit_transfer(TransferRequest {
                from,
                to: form.address_to.clone(),
                gas_limit_hex: self.config.gas_limit_hex(),
                value_hex: to_quantity(amount),
            })
            .await?;
        log::info!("💸 Transfer submitted: {}", transfer_hash);

        let pending = backend
            .ledger
            .add_to_blockchain(&form.address_to, amount, &form.message, &form.keyword)
            .await?;
        let record_hash = pending.hash().to_string();

        {
            let _loading = LoadingGuard::raise(&self.state, &self.confirmations_in_flight);
            log::info!("⏳ Loading - {}", record_hash);
            pending.wait().await?;
            log::info!("✓ Success - {}", record_hash);
        }

        // The write is durable at this point; a failed tally read is not a failed send
        let transaction_count = match self.refresh_transaction_count().await {
            Ok(count) => Some(count),
            Err(e) => {
                log::warn!("Send confirmed but count refresh failed: {}", e);
                None
            }
        };

        if transaction_count.is_some() && transaction_count != previous_count {
            if let Err(e) = self.check_existing_connection().await {
                log::warn!("Reload after count change failed: {}", e);
            }
        }

        Ok(SendReceipt {
            transfer_hash,
            record_hash,
            transaction_count,
        })
    }

    // ============================================================================
    // Helpers
    // ============================================================================

    fn require_backend(&self) -> Result<&WalletBackend, StoreError> {
        self.backend.as_ref().ok_or_else(|| {
            self.notice.alert(INSTALL_WALLET_NOTICE);
            StoreError::WalletUnavailable
        })
    }

    fn set_account(&self, account: &str) {
        log::info!("🔗 Connected account: {}", account);
        self.state
            .send_modify(|state| state.account = Some(account.to_string()));
    }
}

/// Raises the loading flag for its lifetime
///
/// Guards nest: the flag drops only when the last live guard goes away. The
/// counter is updated under the watch lock so a raise and a release never
/// interleave.
struct LoadingGuard<'a> {
    state: &'a watch::Sender<StoreSnapshot>,
    in_flight: &'a AtomicUsize,
}

impl<'a> LoadingGuard<'a> {
    fn raise(state: &'a watch::Sender<StoreSnapshot>, in_flight: &'a AtomicUsize) -> Self {
        state.send_modify(|s| {
            in_flight.fetch_add(1, Ordering::SeqCst);
            s.is_loading = true;
        });
        Self { state, in_flight }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let in_flight = self.in_flight;
        self.state.send_modify(|s| {
            if in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
                s.is_loading = false;
            }
        });
    }
}

fn load_cached_count(storage: &LocalStorage) -> Option<u64> {
    match storage.get_item(TRANSACTION_COUNT_KEY) {
        Ok(Some(raw)) => match raw.trim().parse() {
            Ok(count) => Some(count),
            Err(_) => {
                log::warn!("Ignoring unparsable cached transaction count '{}'", raw);
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            log::warn!("Failed to read cached transaction count: {}", e);
            None
        }
    }
}
