//! Fixed-point amount codec
//!
//! Ledger amounts are integers scaled by 10^18. Users type decimal text
//! ("0.0001", "1000.5"); the wire carries `0x`-prefixed hex quantities.

use crate::error::AmountError;

/// Number of fractional digits in the ledger's native unit
pub const DECIMALS: usize = 18;

/// 10^18, one whole unit expressed in the ledger's native unit
pub const UNIT: u128 = 1_000_000_000_000_000_000;

/// Parse decimal text into the ledger's fixed-point representation
///
/// Accepts digits with at most one decimal point. Trailing fractional zeros
/// do not count against the 18-digit limit ("1.0000000000000000000" is fine).
pub fn parse_amount(input: &str) -> Result<u128, AmountError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AmountError::Empty);
    }

    let (whole, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));

    if let Some(c) = whole
        .chars()
        .chain(fraction.chars())
        .find(|c| !c.is_ascii_digit())
    {
        return Err(AmountError::InvalidCharacter(c));
    }

    if whole.is_empty() && fraction.is_empty() {
        return Err(AmountError::Empty);
    }

    let fraction = fraction.trim_end_matches('0');
    if fraction.len() > DECIMALS {
        return Err(AmountError::TooManyDecimals(fraction.len()));
    }

    let whole_value: u128 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| AmountError::Overflow)?
    };

    let fraction_value: u128 = if fraction.is_empty() {
        0
    } else {
        // Right-pad to 18 digits: "5" -> 500000000000000000
        format!("{:0<width$}", fraction, width = DECIMALS)
            .parse()
            .map_err(|_| AmountError::Overflow)?
    };

    whole_value
        .checked_mul(UNIT)
        .and_then(|v| v.checked_add(fraction_value))
        .ok_or(AmountError::Overflow)
}

/// Render a fixed-point amount as exact decimal text
pub fn format_amount(value: u128) -> String {
    let whole = value / UNIT;
    let fraction = value % UNIT;
    if fraction == 0 {
        return whole.to_string();
    }
    let digits = format!("{:0width$}", fraction, width = DECIMALS);
    format!("{}.{}", whole, digits.trim_end_matches('0'))
}

/// Display decimal used by history cards (`value * 10^-18`)
pub fn to_display_decimal(value: u128) -> f64 {
    value as f64 * 1e-18
}

/// Encode as a `0x`-prefixed hex quantity
pub fn to_quantity(value: u128) -> String {
    format!("{:#x}", value)
}

/// Decode a `0x`-prefixed hex quantity
pub fn parse_quantity(input: &str) -> Result<u128, AmountError> {
    let digits = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .ok_or_else(|| AmountError::InvalidQuantity(input.to_string()))?;

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(AmountError::InvalidQuantity(input.to_string()));
    }

    u128::from_str_radix(digits, 16).map_err(|_| AmountError::Overflow)
}
