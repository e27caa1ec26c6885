//! Ledger Mock Server
//!
//! A lightweight development node answering wallet (`eth_*`) and ledger
//! contract (`ledger_*`) JSON-RPC calls from in-memory state.

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

use ledger_mock::state::UNIT;
use ledger_mock::miner::parse_mine_interval;
use ledger_mock::{run_server, spawn_miner, LedgerState, MockConfig};

#[derive(Debug)]
struct Config {
    mock: MockConfig,

    // Server
    server_host: String,
    server_port: u16,

    // Mining
    auto_mine: Option<Duration>,
}

impl Config {
    fn from_env() -> Result<Self> {
        dotenv::dotenv().ok(); // Load .env file if present

        let defaults = MockConfig::default();

        let accounts = env::var("DEV_ACCOUNTS")
            .map(|raw| {
                raw.split(',')
                    .map(|a| a.trim().to_string())
                    .filter(|a| !a.is_empty())
                    .collect::<Vec<_>>()
            })
            .unwrap_or(defaults.accounts);

        let initial_balance = match env::var("DEV_BALANCE") {
            Ok(raw) => {
                let whole: u128 = raw.trim().parse().context("Invalid DEV_BALANCE")?;
                whole.checked_mul(UNIT).context("DEV_BALANCE too large")?
            }
            Err(_) => defaults.initial_balance,
        };

        let contract_address =
            env::var("CONTRACT_ADDRESS").unwrap_or(defaults.contract_address);

        let reject_authorization = env::var("REJECT_AUTHORIZATION")
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8545".to_string())
            .parse()
            .context("Invalid SERVER_PORT")?;

        let auto_mine = env::var("AUTO_MINE_MS")
            .ok()
            .map(|raw| parse_mine_interval(&raw))
            .transpose()?;

        Ok(Self {
            mock: MockConfig {
                accounts,
                initial_balance,
                contract_address,
                reject_authorization,
            },
            server_host,
            server_port,
            auto_mine,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting Ledger Mock Server...");

    let config = Config::from_env().context("Failed to load configuration")?;

    log::info!("Dev accounts: {:?}", config.mock.accounts);
    log::info!("Contract address: {}", config.mock.contract_address);
    log::info!(
        "Server will listen on {}:{}",
        config.server_host,
        config.server_port
    );

    let state = LedgerState::shared(config.mock);

    let miner = config
        .auto_mine
        .map(|interval| spawn_miner(state.clone(), interval));

    let result = run_server(state, config.server_host, config.server_port)
        .await
        .context("Server error");

    if let Some(miner) = miner {
        miner.shutdown().await;
    }

    result
}
