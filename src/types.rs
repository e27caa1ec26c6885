//! Store state, form fields and ledger records

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::amount::to_display_decimal;
use crate::error::StoreError;

/// Editable fields of the send form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    AddressTo,
    Amount,
    Keyword,
    Message,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::AddressTo,
        FormField::Amount,
        FormField::Keyword,
        FormField::Message,
    ];

    /// Name used by form inputs
    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::AddressTo => "addressTo",
            FormField::Amount => "amount",
            FormField::Keyword => "keyword",
            FormField::Message => "message",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| format!("Unknown form field: {}", s))
    }
}

/// Draft transfer as typed by the user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormData {
    pub address_to: String,
    /// Decimal text, parsed only when sending
    pub amount: String,
    pub keyword: String,
    pub message: String,
}

impl FormData {
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::AddressTo => &self.address_to,
            FormField::Amount => &self.amount,
            FormField::Keyword => &self.keyword,
            FormField::Message => &self.message,
        }
    }

    /// Replace one field, leaving the others untouched
    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let slot = match field {
            FormField::AddressTo => &mut self.address_to,
            FormField::Amount => &mut self.amount,
            FormField::Keyword => &mut self.keyword,
            FormField::Message => &mut self.message,
        };
        *slot = value.into();
    }
}

/// Raw entry as returned by the ledger contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub sender: String,
    pub receiver: String,
    pub timestamp_seconds: u64,
    pub message: String,
    pub keyword: String,
    pub amount_fixed_point: u128,
}

/// History entry ready for display
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub address_from: String,
    pub address_to: String,
    /// Locale display string; not suitable for sorting
    pub timestamp: String,
    pub message: String,
    pub keyword: String,
    /// Human decimal (`amount_wei * 10^-18`)
    pub amount: f64,
    pub amount_wei: u128,
}

impl Transaction {
    /// Convert a ledger entry, rendering its timestamp in the local time zone
    pub fn from_ledger_entry(entry: LedgerEntry) -> Result<Self, StoreError> {
        let timestamp = format_timestamp(entry.timestamp_seconds, &Local).ok_or_else(|| {
            StoreError::Ledger(format!(
                "timestamp {} is out of range",
                entry.timestamp_seconds
            ))
        })?;

        Ok(Self {
            address_from: entry.sender,
            address_to: entry.receiver,
            timestamp,
            message: entry.message,
            keyword: entry.keyword,
            amount: to_display_decimal(entry.amount_fixed_point),
            amount_wei: entry.amount_fixed_point,
        })
    }
}

/// Render ledger seconds as `M/D/YYYY, h:mm:ss AM` in the given zone
pub fn format_timestamp<Tz>(seconds: u64, tz: &Tz) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let seconds = i64::try_from(seconds).ok()?;
    let utc = DateTime::from_timestamp(seconds, 0)?;
    Some(
        utc.with_timezone(tz)
            .format("%-m/%-d/%Y, %-I:%M:%S %p")
            .to_string(),
    )
}

/// Value transfer handed to the wallet provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub from: String,
    pub to: String,
    pub gas_limit_hex: String,
    pub value_hex: String,
}

/// Read-only view of the store handed to consumers
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    pub account: Option<String>,
    pub form_data: FormData,
    pub is_loading: bool,
    pub transaction_count: Option<u64>,
    pub transactions: Vec<Transaction>,
}

/// Outcome of a confirmed send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendReceipt {
    /// Hash returned by the wallet for the value transfer
    pub transfer_hash: String,
    /// Hash of the ledger record write
    pub record_hash: String,
    /// Ledger tally after confirmation, `None` if the read failed
    pub transaction_count: Option<u64>,
}
