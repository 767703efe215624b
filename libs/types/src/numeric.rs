//! Unsigned fixed-width amounts and prices
//!
//! Token amounts are counted in base units (the token's smallest
//! denomination) and prices in quote base units per base-asset base unit.
//! All arithmetic is checked: an overflow is a failure, never a wrap.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Token amount in base units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(u128);

impl Amount {
    pub const ZERO: Amount = Amount(0);
    pub const MAX: Amount = Amount(u128::MAX);

    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    pub fn checked_sub(self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Amount)
    }

    /// Quote cost of this many base units at `price`
    ///
    /// Returns `None` on overflow.
    pub fn checked_cost(self, price: Price) -> Option<Amount> {
        self.0.checked_mul(price.0).map(Amount)
    }

    pub fn min(self, other: Amount) -> Amount {
        Amount(self.0.min(other.0))
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        Self(value)
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self(value as u128)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Limit price: quote base units per base-asset base unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(u128);

impl Price {
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl From<u64> for Price {
    fn from(value: u64) -> Self {
        Self(value as u128)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors converting between human and base units
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NumericError {
    #[error("invalid decimal: {0}")]
    Parse(String),

    #[error("amount must not be negative")]
    Negative,

    #[error("too many fractional digits: {scale} > {decimals}")]
    ExcessPrecision { scale: u32, decimals: u32 },

    #[error("amount does not fit in base units")]
    Overflow,
}

/// Largest precision representable in `u128` base units
pub const MAX_DECIMALS: u32 = 38;

/// Convert a human-readable decimal ("1000", "0.25") into base units.
///
/// `decimals` is the token precision (18 for most ERC20 tokens).
pub fn parse_units(text: &str, decimals: u32) -> Result<Amount, NumericError> {
    if decimals > MAX_DECIMALS {
        return Err(NumericError::Overflow);
    }

    let value = Decimal::from_str(text.trim())
        .map_err(|e| NumericError::Parse(e.to_string()))?
        .normalize();

    if value.is_sign_negative() && !value.is_zero() {
        return Err(NumericError::Negative);
    }

    let scale = value.scale();
    if scale > decimals {
        return Err(NumericError::ExcessPrecision { scale, decimals });
    }

    let mantissa = value.mantissa().unsigned_abs();
    10u128
        .checked_pow(decimals - scale)
        .and_then(|factor| mantissa.checked_mul(factor))
        .map(Amount)
        .ok_or(NumericError::Overflow)
}

/// Render base units as a human-readable decimal without trailing zeros.
pub fn format_units(amount: Amount, decimals: u32) -> String {
    let Some(factor) = 10u128.checked_pow(decimals) else {
        return amount.to_string();
    };
    let whole = amount.0 / factor;
    let frac = amount.0 % factor;
    if frac == 0 {
        return whole.to_string();
    }
    let digits = format!("{:0width$}", frac, width = decimals as usize);
    format!("{}.{}", whole, digits.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_add_overflow() {
        assert_eq!(Amount::MAX.checked_add(Amount::new(1)), None);
        assert_eq!(Amount::new(2).checked_add(Amount::new(3)), Some(Amount::new(5)));
    }

    #[test]
    fn test_checked_sub_underflow() {
        assert_eq!(Amount::new(2).checked_sub(Amount::new(3)), None);
        assert_eq!(Amount::new(3).checked_sub(Amount::new(3)), Some(Amount::ZERO));
    }

    #[test]
    fn test_checked_cost() {
        assert_eq!(Amount::new(10).checked_cost(Price::new(10)), Some(Amount::new(100)));
        assert_eq!(Amount::MAX.checked_cost(Price::new(2)), None);
    }

    #[test]
    fn test_parse_units_whole_tokens() {
        let amount = parse_units("1000", 18).unwrap();
        assert_eq!(amount, Amount::new(1_000 * 10u128.pow(18)));
    }

    #[test]
    fn test_parse_units_fraction() {
        assert_eq!(parse_units("0.25", 2).unwrap(), Amount::new(25));
        assert_eq!(parse_units("1.50", 1).unwrap(), Amount::new(15));
    }

    #[test]
    fn test_parse_units_rejects_negative() {
        assert_eq!(parse_units("-1", 18), Err(NumericError::Negative));
    }

    #[test]
    fn test_parse_units_rejects_excess_precision() {
        assert_eq!(
            parse_units("0.001", 2),
            Err(NumericError::ExcessPrecision { scale: 3, decimals: 2 })
        );
    }

    #[test]
    fn test_parse_units_rejects_garbage() {
        assert!(matches!(parse_units("ten", 18), Err(NumericError::Parse(_))));
    }

    #[test]
    fn test_format_units() {
        assert_eq!(format_units(Amount::new(1_500), 3), "1.5");
        assert_eq!(format_units(Amount::new(2_000), 3), "2");
        assert_eq!(format_units(Amount::new(5), 3), "0.005");
        assert_eq!(format_units(Amount::new(42), 0), "42");
    }

    #[test]
    fn test_amount_serialization_is_transparent() {
        let json = serde_json::to_string(&Amount::new(100)).unwrap();
        assert_eq!(json, "100");
    }

    mod fuzz {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Invariant: cost overflows exactly when the u128 product does.
            #[test]
            fn fuzz_checked_cost_matches_checked_mul(amount in any::<u128>(), price in any::<u128>()) {
                prop_assert_eq!(
                    Amount::new(amount).checked_cost(Price::new(price)).map(|a| a.value()),
                    amount.checked_mul(price)
                );
            }

            /// Invariant: rendering then parsing at the same precision is lossless.
            #[test]
            fn fuzz_format_then_parse_is_lossless(amount in any::<u64>(), decimals in 0u32..=18) {
                let amount = Amount::from(amount);
                let text = format_units(amount, decimals);
                prop_assert_eq!(parse_units(&text, decimals), Ok(amount));
            }
        }
    }
}
