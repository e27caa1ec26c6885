//! Store driven over JSON-RPC against an in-process ledger-mock node

mod common;

use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

use ledger_mock::{spawn_local, spawn_miner, LedgerState, MockConfig};
use wallet_tx_store::rpc::rpc_backend;
use wallet_tx_store::{FormField, LocalStorage, StoreConfig, StoreError, WalletTransactionStore};

async fn start_node(mock: MockConfig) -> anyhow::Result<(StoreConfig, ledger_mock::SharedLedger)> {
    common::init_logger();
    let state = LedgerState::shared(mock.clone());
    let (addr, _server) = spawn_local(state.clone()).await?;

    let config = StoreConfig {
        rpc_url: format!("http://{}/rpc", addr),
        contract_address: mock.contract_address,
        confirmation_poll_interval: Duration::from_millis(25),
        confirmation_max_attempts: 200,
        ..Default::default()
    };
    Ok((config, state))
}

fn build_store(config: StoreConfig, dir: &TempDir) -> anyhow::Result<Arc<WalletTransactionStore>> {
    let backend = rpc_backend(&config)?;
    let storage = LocalStorage::new_with_base_dir(dir.path().to_path_buf());
    Ok(Arc::new(WalletTransactionStore::new_with_storage(
        config,
        storage,
        Some(backend),
    )))
}

#[tokio::test]
async fn test_connect_send_and_browse_history() -> anyhow::Result<()> {
    let mock = MockConfig::default();
    let recipient = mock.accounts[1].clone();
    let (config, state) = start_node(mock).await?;
    let miner = spawn_miner(state.clone(), Duration::from_millis(50));
    let dir = TempDir::new()?;
    let store = build_store(config, &dir)?;

    // Nothing authorized yet: load finds no account
    store.load().await?;
    assert_eq!(store.account(), None);
    assert_eq!(store.snapshot().transaction_count, Some(0));

    let account = store.connect_wallet().await?;
    assert_eq!(account, MockConfig::default().accounts[0]);

    store.update_form_field(FormField::AddressTo, recipient.as_str());
    store.update_form_field(FormField::Amount, "1000.5");
    store.update_form_field(FormField::Message, "invoice #42");
    store.update_form_field(FormField::Keyword, "invoice");

    let receipt = store.send_transaction().await?;
    assert_eq!(receipt.transaction_count, Some(1));
    assert!(receipt.transfer_hash.starts_with("0x"));
    assert!(!store.is_loading());

    let snapshot = store.snapshot();
    assert_eq!(snapshot.transactions.len(), 1);
    let tx = &snapshot.transactions[0];
    assert_eq!(tx.address_to, recipient);
    assert_eq!(tx.message, "invoice #42");
    assert_eq!(tx.amount_wei, 1_000_500_000_000_000_000_000);
    assert!((tx.amount - 1000.5).abs() < 1e-9);

    // A new session re-derives the account and reloads history from the node
    let reopened = build_store(store.config().clone(), &dir)?;
    assert_eq!(reopened.snapshot().transaction_count, Some(1));
    reopened.load().await?;
    assert_eq!(reopened.account(), Some(account));
    assert_eq!(reopened.snapshot().transactions.len(), 1);

    miner.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn test_rejected_authorization_over_rpc() -> anyhow::Result<()> {
    let (config, _state) = start_node(MockConfig {
        reject_authorization: true,
        ..Default::default()
    })
    .await?;
    let dir = TempDir::new()?;
    let store = build_store(config, &dir)?;

    let err = store.connect_wallet().await.unwrap_err();
    assert!(matches!(err, StoreError::AuthorizationDenied(_)));
    assert_eq!(store.account(), None);
    Ok(())
}

#[tokio::test]
async fn test_unmined_write_times_out() -> anyhow::Result<()> {
    let (mut config, _state) = start_node(MockConfig::default()).await?;
    config.confirmation_max_attempts = 3;
    let dir = TempDir::new()?;
    let store = build_store(config, &dir)?;

    store.connect_wallet().await?;
    store.update_form_field(FormField::AddressTo, MockConfig::default().accounts[1].as_str());
    store.update_form_field(FormField::Amount, "0.0001");

    // No miner running: the write never confirms
    let err = store.send_transaction().await.unwrap_err();
    assert!(matches!(err, StoreError::ConfirmationTimeout(_)));
    assert!(!store.is_loading());
    Ok(())
}

#[tokio::test]
async fn test_insufficient_funds_is_a_provider_error() -> anyhow::Result<()> {
    let (config, state) = start_node(MockConfig::default()).await?;
    let dir = TempDir::new()?;
    let store = build_store(config, &dir)?;

    store.connect_wallet().await?;
    store.update_form_field(FormField::AddressTo, MockConfig::default().accounts[1].as_str());
    store.update_form_field(FormField::Amount, "1000000");

    let err = store.send_transaction().await.unwrap_err();
    assert!(matches!(err, StoreError::Provider(_)));
    assert_eq!(state.lock().unwrap().pending_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_zero_attempt_budget_still_polls_once() -> anyhow::Result<()> {
    let mock = MockConfig::default();
    let recipient = mock.accounts[1].clone();
    let (mut config, state) = start_node(mock).await?;
    config.confirmation_max_attempts = 0;
    state.lock().unwrap().request_accounts()?;

    let backend = rpc_backend(&config)?;
    let pending = backend
        .ledger
        .add_to_blockchain(&recipient, 1, "rent", "house")
        .await?;
    state.lock().unwrap().mine(1_700_000_000);

    pending.wait().await?;
    assert_eq!(backend.ledger.get_transaction_count().await?, 1);
    Ok(())
}
