//! Token and ether amount conversions.

use alloy::primitives::utils::{format_units, parse_units, ParseUnits};
use alloy::primitives::U256;
use eyre::{bail, Result, WrapErr};

/// Solids uses the ERC-20 default.
pub const SOLIDS_DECIMALS: u8 = 18;
pub const ETHER_DECIMALS: u8 = 18;

/// Parse a human-readable amount such as `"1.5"` into base units.
pub fn parse_amount(text: &str, decimals: u8) -> Result<U256> {
    let parsed = parse_units(text.trim(), decimals)
        .wrap_err_with(|| format!("Invalid amount {:?}", text))?;
    match parsed {
        ParseUnits::U256(value) => Ok(value),
        ParseUnits::I256(_) => bail!("Amount must not be negative: {:?}", text),
    }
}

/// Render base units with `decimals` fractional digits.
pub fn format_amount(value: U256, decimals: u8) -> Result<String> {
    format_units(value, decimals).wrap_err("Failed to format amount")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(
            parse_amount("1.5", 18).unwrap(),
            U256::from(1_500_000_000_000_000_000u128)
        );
        assert_eq!(parse_amount(" 5 ", 18).unwrap(), U256::from(5u128 * 10u128.pow(18)));
        assert_eq!(parse_amount("100", 0).unwrap(), U256::from(100));
    }

    #[test]
    fn test_parse_amount_rejects_garbage() {
        assert!(parse_amount("five", 18).is_err());
        assert!(parse_amount("-1", 18).is_err());
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(
            format_amount(U256::from(1_500_000_000_000_000_000u128), 18).unwrap(),
            "1.500000000000000000"
        );
    }
}
