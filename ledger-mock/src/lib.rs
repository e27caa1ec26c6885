//! Ledger Mock Server Library
//!
//! Development node that plays both the injected wallet and the ledger
//! contract over a single JSON-RPC endpoint. Ships as a standalone binary
//! and as a library for in-process tests.

pub mod handlers;
pub mod miner;
pub mod server;
pub mod state;
pub mod types;

// Re-export commonly used types
pub use miner::{spawn_miner, MinerHandle};
pub use server::{create_router, run_server, spawn_local};
pub use state::{LedgerState, MockConfig, SharedLedger};
pub use types::*;
