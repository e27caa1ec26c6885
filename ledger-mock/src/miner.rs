//! Background miner
//!
//! Confirms pending ledger writes on a fixed interval until shut down.

use anyhow::{bail, Context, Result};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::handlers::unix_now;
use crate::state::SharedLedger;

/// Handle to a running miner; dropping it stops the loop too
pub struct MinerHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl MinerHandle {
    /// Signal the miner to stop and wait for it
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.task.await {
            log::error!("Miner task failed: {}", e);
        }
    }
}

/// Shortest tick the miner runs at; `tokio::time::interval` rejects zero
pub const MIN_MINE_INTERVAL: Duration = Duration::from_millis(1);

/// Parse an `AUTO_MINE_MS` value; zero is rejected, leave it unset to disable
pub fn parse_mine_interval(raw: &str) -> Result<Duration> {
    let millis: u64 = raw.trim().parse().context("Invalid AUTO_MINE_MS")?;
    if millis == 0 {
        bail!("AUTO_MINE_MS must be greater than 0 (unset it to disable auto-mining)");
    }
    Ok(Duration::from_millis(millis))
}

/// Spawn a miner confirming pending writes every `interval`
pub fn spawn_miner(state: SharedLedger, interval: Duration) -> MinerHandle {
    let interval = if interval < MIN_MINE_INTERVAL {
        log::warn!("Mine interval {:?} too short, using {:?}", interval, MIN_MINE_INTERVAL);
        MIN_MINE_INTERVAL
    } else {
        interval
    };
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    log::info!("⛏️  Auto-mining every {}ms", interval.as_millis());

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match state.lock() {
                        Ok(mut ledger) => {
                            if ledger.pending_count() > 0 {
                                ledger.mine(unix_now());
                            }
                        }
                        Err(_) => {
                            log::error!("Ledger state poisoned, miner stopping");
                            break;
                        }
                    }
                }
                _ = shutdown_rx.changed() => {
                    log::info!("Miner shutting down");
                    break;
                }
            }
        }
    });

    MinerHandle { shutdown_tx, task }
}
