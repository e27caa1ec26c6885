//! Durable local storage
//!
//! - File-backed key/value map standing in for browser local storage
//! - Well-known keys used by the store

mod local_storage;

pub use local_storage::LocalStorage;

/// Key under which the ledger's transaction tally is cached
pub const TRANSACTION_COUNT_KEY: &str = "transactionCount";
