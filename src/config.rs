//! Store configuration from environment variables
//!
//! Controls the JSON-RPC endpoint, the ledger contract binding, the gas
//! hint attached to value transfers and where the durable cache lives.
//! Defaults target a local development node.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::amount::to_quantity;

/// Gas limit for a plain value transfer (0x5208)
pub const DEFAULT_GAS_LIMIT: u64 = 21_000;

#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// JSON-RPC endpoint shared by the wallet and the ledger contract
    pub rpc_url: String,
    /// Network address the ledger contract is bound to
    pub contract_address: String,
    /// Gas-limit hint sent with every value transfer
    pub gas_limit: u64,
    /// Directory holding the durable local storage file
    pub data_dir: PathBuf,
    /// Delay between confirmation polls
    pub confirmation_poll_interval: Duration,
    /// Polls before a pending write is reported as timed out
    pub confirmation_max_attempts: u32,
}

impl StoreConfig {
    /// Load configuration from environment variables (and `.env` if present)
    ///
    /// Environment variables:
    /// - `LEDGER_RPC_URL`: JSON-RPC endpoint (default `http://localhost:8545`)
    /// - `LEDGER_CONTRACT_ADDRESS`: contract address
    /// - `TRANSFER_GAS_LIMIT`: gas-limit hint in decimal (default 21000)
    /// - `STORE_DATA_DIR`: durable storage directory (default `./data`)
    /// - `CONFIRMATION_POLL_MS`: receipt poll interval (default 2000)
    /// - `CONFIRMATION_MAX_ATTEMPTS`: receipt polls before giving up (default 60)
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        let defaults = Self::default();

        let rpc_url = env::var("LEDGER_RPC_URL").unwrap_or(defaults.rpc_url);
        log::info!("📡 Ledger RPC URL: {}", rpc_url);

        let contract_address =
            env::var("LEDGER_CONTRACT_ADDRESS").unwrap_or(defaults.contract_address);
        log::info!("📜 Ledger contract: {}", contract_address);

        let gas_limit = parse_var("TRANSFER_GAS_LIMIT", defaults.gas_limit);

        let data_dir = env::var("STORE_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let poll_ms = parse_var(
            "CONFIRMATION_POLL_MS",
            defaults.confirmation_poll_interval.as_millis() as u64,
        );

        let mut confirmation_max_attempts = parse_var(
            "CONFIRMATION_MAX_ATTEMPTS",
            defaults.confirmation_max_attempts,
        );
        if confirmation_max_attempts == 0 {
            log::warn!("⚠️  CONFIRMATION_MAX_ATTEMPTS must be at least 1, using 1");
            confirmation_max_attempts = 1;
        }

        Self {
            rpc_url,
            contract_address,
            gas_limit,
            data_dir,
            confirmation_poll_interval: Duration::from_millis(poll_ms),
            confirmation_max_attempts,
        }
    }

    /// Gas-limit hint as a hex quantity ("0x5208" by default)
    pub fn gas_limit_hex(&self) -> String {
        to_quantity(self.gas_limit as u128)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            contract_address: "0x5FbDB2315678afecb367f032d93F642f64180aa3".to_string(),
            gas_limit: DEFAULT_GAS_LIMIT,
            data_dir: PathBuf::from("./data"),
            confirmation_poll_interval: Duration::from_millis(2000),
            confirmation_max_attempts: 60,
        }
    }
}

fn parse_var<T: std::str::FromStr + std::fmt::Display>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                log::warn!("⚠️  Invalid {} '{}', using {}", name, raw, default);
                default
            }
        },
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_gas_limit_hex() {
        let config = StoreConfig::default();
        assert_eq!(config.gas_limit_hex(), "0x5208");
    }

    #[test]
    fn test_invalid_numeric_var_falls_back() {
        env::set_var("WTS_TEST_BOGUS_NUMBER", "not-a-number");
        assert_eq!(parse_var("WTS_TEST_BOGUS_NUMBER", 7u32), 7);
        env::set_var("WTS_TEST_BOGUS_NUMBER", " 42 ");
        assert_eq!(parse_var("WTS_TEST_BOGUS_NUMBER", 7u32), 42);
        env::remove_var("WTS_TEST_BOGUS_NUMBER");
    }

    #[test]
    fn test_zero_confirmation_attempts_clamped() {
        env::set_var("CONFIRMATION_MAX_ATTEMPTS", "0");
        let config = StoreConfig::from_env();
        env::remove_var("CONFIRMATION_MAX_ATTEMPTS");
        assert_eq!(config.confirmation_max_attempts, 1);
    }
}
