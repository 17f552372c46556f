//! Utility functions for the faucet core
//!
//! Address predicates and conversions between decimal strings and on-chain units.

use crate::shared::constants::ETH_ADDRESS;
use crate::shared::error::FaucetError;
use chrono::Utc;
use ethers::types::{Address, U256};
use ethers::utils::{format_units, parse_units, to_checksum};

/// Current time in milliseconds since the Unix epoch
pub fn current_timestamp_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Validate Ethereum address format
///
/// Mixed-case input must carry a correct EIP-55 checksum; all-lower and
/// all-upper hex is accepted as is.
pub fn validate_ethereum_address(address: &str) -> Result<Address, FaucetError> {
    if address.is_empty() {
        return Err(FaucetError::validation("Address is required"));
    }

    // The 0x prefix is optional
    let hex_part = address.strip_prefix("0x").unwrap_or(address);

    if hex_part.len() != 40 || !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(FaucetError::validation("Invalid address"));
    }

    let prefixed = format!("0x{hex_part}");
    let parsed: Address = prefixed
        .parse()
        .map_err(|_| FaucetError::validation("Invalid address"))?;

    let has_lower = hex_part.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = hex_part.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper && to_checksum(&parsed, None) != prefixed {
        return Err(FaucetError::validation("Invalid address checksum"));
    }

    Ok(parsed)
}

pub fn is_valid_ethereum_address(address: &str) -> bool {
    validate_ethereum_address(address).is_ok()
}

/// The zero address is how the token list spells native ETH
pub fn is_eth_address(address: &str) -> bool {
    let hex_part = address.strip_prefix("0x").unwrap_or(address);
    hex_part.eq_ignore_ascii_case(&ETH_ADDRESS[2..])
}

/// Format raw on-chain units as a decimal string without trailing zeros.
///
/// `1500000000000000000` with 18 decimals becomes `"1.5"`, zero becomes `"0"`.
/// Returns `"0"` if the decimals are out of range.
pub fn format_balance(amount: U256, decimals: u8) -> String {
    match format_units(amount, decimals as u32) {
        Ok(value) => trim_decimal(&value),
        Err(_) => "0".to_string(),
    }
}

fn trim_decimal(value: &str) -> String {
    if !value.contains('.') {
        return value.to_string();
    }
    let trimmed = value.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Parse a user-entered decimal amount into on-chain units
pub fn parse_amount(amount: &str, decimals: u8) -> Result<U256, FaucetError> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Err(FaucetError::validation("Amount is required"));
    }
    if amount.starts_with('-') {
        return Err(FaucetError::validation("Amount must not be negative"));
    }

    let (whole, fraction) = match amount.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (amount, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return Err(FaucetError::validation("Invalid amount"));
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit()) {
        return Err(FaucetError::validation("Invalid amount"));
    }
    if fraction.len() > decimals as usize {
        return Err(FaucetError::validation(format!(
            "Amount has more than {} decimal places",
            decimals
        )));
    }

    let normalized = if whole.is_empty() {
        format!("0{}", amount)
    } else {
        amount.to_string()
    };
    Ok(parse_units(normalized, decimals as u32)?.into())
}

/// Hex quantity as expected by JSON-RPC params (`0x`-prefixed, no leading zeros)
pub fn to_quantity(value: U256) -> String {
    format!("0x{:x}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_ethereum_address() {
        // Valid addresses
        assert!(is_valid_ethereum_address("0x742d35cc6634c0532925a3b8d4c9db96c4b4d8b6"));
        assert!(is_valid_ethereum_address(ETH_ADDRESS));

        let parsed: Address = "0x57ab1e0003f623289cd798b1824be09a793e4bec".parse().unwrap();
        let checksummed = to_checksum(&parsed, None);
        assert!(is_valid_ethereum_address(&checksummed));

        // The prefix is optional
        let bare = validate_ethereum_address("742d35cc6634c0532925a3b8d4c9db96c4b4d8b6").unwrap();
        assert_eq!(bare, "0x742d35cc6634c0532925a3b8d4c9db96c4b4d8b6".parse::<Address>().unwrap());
        assert!(is_valid_ethereum_address(&checksummed[2..]));

        // Invalid addresses
        assert!(!is_valid_ethereum_address("0x")); // Prefix only
        assert!(!is_valid_ethereum_address("0X742d35cc6634c0532925a3b8d4c9db96c4b4d8b6")); // Upper-case prefix
        assert!(!is_valid_ethereum_address("742d35cc6634c0532925a3b8d4c9db96c4b4d8b")); // Too short, no 0x
        assert!(!is_valid_ethereum_address("0x742d35cc6634c0532925a3b8d4c9db96c4b4d8b")); // Too short
        assert!(!is_valid_ethereum_address("0x742d35cc6634c0532925a3b8d4c9db96c4b4d8bg")); // Invalid char

        // Bad checksum: flip the case of the first letter
        let flipped: String = {
            let mut done = false;
            checksummed
                .chars()
                .enumerate()
                .map(|(i, c)| {
                    if i > 1 && !done && c.is_ascii_alphabetic() {
                        done = true;
                        if c.is_ascii_uppercase() { c.to_ascii_lowercase() } else { c.to_ascii_uppercase() }
                    } else {
                        c
                    }
                })
                .collect()
        };
        assert!(!is_valid_ethereum_address(&flipped));
    }

    #[test]
    fn test_empty_address_is_required() {
        let err = validate_ethereum_address("").unwrap_err();
        assert_eq!(err.user_message(), "Address is required");
    }

    #[test]
    fn test_is_eth_address() {
        assert!(is_eth_address("0x0000000000000000000000000000000000000000"));
        assert!(!is_eth_address("0x57aB1E0003F623289CD798B1824Be09a793e4Bec"));
        assert!(is_eth_address("0000000000000000000000000000000000000000"));
        assert!(!is_eth_address("0x"));
    }

    #[test]
    fn test_format_balance_trims_trailing_zeros() {
        let one_and_half = U256::from(1_500_000_000_000_000_000u64);
        assert_eq!(format_balance(one_and_half, 18), "1.5");
        assert_eq!(format_balance(U256::zero(), 18), "0");
        assert_eq!(format_balance(U256::from(100_000_000u64), 6), "100");
        assert_eq!(format_balance(U256::from(1u64), 18), "0.000000000000000001");
        assert_eq!(format_balance(U256::from(42u64), 0), "42");
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1.5", 18).unwrap(), U256::from(1_500_000_000_000_000_000u64));
        assert_eq!(parse_amount("100", 6).unwrap(), U256::from(100_000_000u64));
        assert_eq!(parse_amount(".5", 1).unwrap(), U256::from(5u64));
        assert_eq!(parse_amount(" 2 ", 0).unwrap(), U256::from(2u64));

        assert!(parse_amount("", 18).is_err());
        assert!(parse_amount("-1", 18).is_err());
        assert!(parse_amount("1.2.3", 18).is_err());
        assert!(parse_amount("abc", 18).is_err());
        assert!(parse_amount("0.123", 2).is_err());
        assert!(parse_amount(".", 18).is_err());
    }

    #[test]
    fn test_to_quantity() {
        assert_eq!(to_quantity(U256::zero()), "0x0");
        assert_eq!(to_quantity(U256::from(86_400u64)), "0x15180");
        assert_eq!(
            to_quantity(U256::from(1_000_000_000_000_000_000u64)),
            "0xde0b6b3a7640000"
        );
    }
}
