//! Error types for wallet transaction store operations

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("No wallet provider available. Please install a browser wallet")]
    WalletUnavailable,

    #[error("Authorization denied: {0}")]
    AuthorizationDenied(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Ledger error: {0}")]
    Ledger(String),

    #[error("Confirmation timeout: {0}")]
    ConfirmationTimeout(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,

    #[error("invalid character '{0}' in amount")]
    InvalidCharacter(char),

    #[error("too many decimal places ({0}), at most 18 are allowed")]
    TooManyDecimals(usize),

    #[error("amount overflows the ledger's fixed-point range")]
    Overflow,

    #[error("invalid hex quantity: {0}")]
    InvalidQuantity(String),
}

impl StoreError {
    /// Short machine-readable kind, handy for UI feedback and log fields
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::WalletUnavailable => "wallet_unavailable",
            StoreError::AuthorizationDenied(_) => "authorization_denied",
            StoreError::Provider(_) => "provider_error",
            StoreError::Ledger(_) => "ledger_error",
            StoreError::ConfirmationTimeout(_) => "confirmation_timeout",
            StoreError::InvalidAmount(_) => "invalid_amount",
            StoreError::Storage(_) => "storage_error",
        }
    }
}
