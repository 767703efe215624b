//! Identifier types for exchange entities
//!
//! Addresses follow the 20-byte account model of the host chain. Order and
//! trade identifiers are plain counters allocated by the contract, so their
//! numeric order is their creation order.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Maximum ticker width in bytes (a `bytes32` slot on chain).
pub const MAX_TICKER_LEN: usize = 32;

/// 20-byte account or contract address.
///
/// Displays as lower-case `0x`-prefixed hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address([u8; 20]);

impl Address {
    /// Address whose low 8 bytes hold `value` (big-endian), rest zero.
    ///
    /// Handy for deterministic test accounts.
    pub fn from_low_u64(value: u64) -> Self {
        let mut bytes = [0u8; 20];
        bytes[12..].copy_from_slice(&value.to_be_bytes());
        Self(bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// Error parsing an [`Address`] from text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressParseError {
    #[error("invalid hex in address: {0}")]
    InvalidHex(String),

    #[error("address must be 20 bytes, got {0}")]
    InvalidLength(usize),
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        let raw = hex::decode(digits).map_err(|e| AddressParseError::InvalidHex(e.to_string()))?;
        let bytes: [u8; 20] = raw
            .as_slice()
            .try_into()
            .map_err(|_| AddressParseError::InvalidLength(raw.len()))?;
        Ok(Self(bytes))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Short symbolic token identifier (e.g. "DAI", "ZRX")
///
/// Non-empty and at most [`MAX_TICKER_LEN`] bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Ticker(String);

impl Ticker {
    /// Create a ticker from a literal
    ///
    /// # Panics
    /// Panics if the ticker is empty or wider than 32 bytes
    pub fn new(symbol: impl Into<String>) -> Self {
        let s = symbol.into();
        assert!(Self::is_valid(&s), "Ticker must be 1..=32 bytes");
        Self(s)
    }

    /// Try to create a ticker, returning None if invalid
    pub fn try_new(symbol: impl Into<String>) -> Option<Self> {
        let s = symbol.into();
        Self::is_valid(&s).then_some(Self(s))
    }

    fn is_valid(s: &str) -> bool {
        !s.is_empty() && s.len() <= MAX_TICKER_LEN
    }

    /// Get the symbol string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Ticker {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ticker::try_new(s).ok_or_else(|| serde::de::Error::custom("ticker must be 1..=32 bytes"))
    }
}

/// Unique identifier for a limit order
///
/// Allocated sequentially by the contract; also the order's creation
/// sequence number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(u64);

impl OrderId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// The identifier allocated after this one
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a trade (one match step)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TradeId(u64);

impl TradeId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for TradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_display_and_parse() {
        let addr = Address::from_low_u64(0xabcd);
        let text = addr.to_string();
        assert_eq!(text, "0x000000000000000000000000000000000000abcd");
        assert_eq!(text.parse::<Address>().unwrap(), addr);
    }

    #[test]
    fn test_address_parse_without_prefix_and_upper_case() {
        let addr: Address = "00000000000000000000000000000000000000FF".parse().unwrap();
        assert_eq!(addr, Address::from_low_u64(255));
    }

    #[test]
    fn test_address_parse_rejects_bad_length() {
        let err = "0xabcd".parse::<Address>().unwrap_err();
        assert_eq!(err, AddressParseError::InvalidLength(2));
    }

    #[test]
    fn test_address_parse_rejects_bad_hex() {
        assert!(matches!(
            "0xzz".parse::<Address>(),
            Err(AddressParseError::InvalidHex(_))
        ));
    }

    #[test]
    fn test_address_serialization() {
        let addr = Address::from_low_u64(7);
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, "\"0x0000000000000000000000000000000000000007\"");
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }

    #[test]
    fn test_ticker_creation() {
        let ticker = Ticker::new("DAI");
        assert_eq!(ticker.as_str(), "DAI");
        assert_eq!(ticker.to_string(), "DAI");
    }

    #[test]
    fn test_ticker_try_new_bounds() {
        assert!(Ticker::try_new("").is_none());
        assert!(Ticker::try_new("A".repeat(32)).is_some());
        assert!(Ticker::try_new("A".repeat(33)).is_none());
    }

    #[test]
    #[should_panic(expected = "Ticker must be 1..=32 bytes")]
    fn test_ticker_invalid_panics() {
        Ticker::new("");
    }

    #[test]
    fn test_ticker_deserialize_validates() {
        let ok: Ticker = serde_json::from_str("\"ZRX\"").unwrap();
        assert_eq!(ok, Ticker::new("ZRX"));
        assert!(serde_json::from_str::<Ticker>("\"\"").is_err());
    }

    #[test]
    fn test_order_id_sequence() {
        let first = OrderId::new(0);
        assert_eq!(first.next(), OrderId::new(1));
        assert!(first < first.next());
    }
}
