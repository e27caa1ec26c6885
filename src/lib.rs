//! Wallet Transaction Store
//!
//! Application core of a wallet transaction viewer: connect a wallet, send a
//! value transfer carrying a message and keyword, and browse the transfers
//! recorded by a ledger contract.
//!
//! # Architecture
//!
//! - **WalletTransactionStore**: owns account, send form, loading flag,
//!   cached ledger tally and history; publishes snapshots on every change
//! - **Capabilities**: `WalletProvider` and `LedgerContract` traits; JSON-RPC
//!   implementations live in [`rpc`]
//! - **LocalStorage**: durable cache for the ledger tally
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use wallet_tx_store::{rpc, FormField, StoreConfig, WalletTransactionStore};
//!
//! let config = StoreConfig::from_env();
//! let backend = rpc::rpc_backend(&config)?;
//! let store = Arc::new(WalletTransactionStore::new(config, Some(backend)));
//!
//! store.load().await?;
//! store.connect_wallet().await?;
//! store.update_form_field(FormField::AddressTo, "0x70997970C51812dc3A010C7d01b50e0d17dc79C8");
//! store.update_form_field(FormField::Amount, "0.0001");
//! store.update_form_field(FormField::Message, "coffee");
//! let receipt = store.send_transaction().await?;
//! ```

// Public modules
pub mod amount;
pub mod config;
pub mod display;
pub mod error;
pub mod provider;
pub mod rpc;
pub mod storage;
pub mod store;
pub mod types;

// Re-exports for convenience
pub use amount::{format_amount, parse_amount};
pub use config::StoreConfig;
pub use display::{latest_first, shorten_address};
pub use error::{AmountError, StorageError, StoreError};
pub use provider::{
    LedgerContract, LogNotice, PendingWrite, UserNotice, WalletBackend, WalletProvider,
};
pub use storage::LocalStorage;
pub use store::WalletTransactionStore;
pub use types::{
    FormData, FormField, LedgerEntry, SendReceipt, StoreSnapshot, Transaction, TransferRequest,
};

// Common result type
pub type Result<T> = std::result::Result<T, StoreError>;
