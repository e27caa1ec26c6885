//! Presentation helpers shared by history views

use crate::types::Transaction;

/// "0x1234567890abcdef" -> "0x123...cdef"
pub fn shorten_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() < 10 {
        return address.to_string();
    }
    let head: String = chars[..5].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

/// History in render order (newest record first), without touching the store's list
pub fn latest_first(transactions: &[Transaction]) -> Vec<&Transaction> {
    transactions.iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shorten_address() {
        assert_eq!(
            shorten_address("0xAbC0000000000000000000000000000000001234"),
            "0xAbC...1234"
        );
        assert_eq!(shorten_address("0xabc"), "0xabc");
    }

    #[test]
    fn test_latest_first_keeps_source_order() {
        let make = |message: &str| Transaction {
            address_from: "0xa".into(),
            address_to: "0xb".into(),
            timestamp: String::new(),
            message: message.into(),
            keyword: String::new(),
            amount: 0.0,
            amount_wei: 0,
        };
        let history = vec![make("first"), make("second")];

        let ordered = latest_first(&history);
        assert_eq!(ordered[0].message, "second");
        assert_eq!(ordered[1].message, "first");
        assert_eq!(history[0].message, "first");
    }
}
