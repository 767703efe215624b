//! Exchange configuration
//!
//! Deployment parameters that are fixed for the lifetime of a contract.

use dex_types::ids::{Address, Ticker};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::ConfigError;

/// Default quote asset
pub const DEFAULT_QUOTE_TICKER: &str = "DAI";

/// Default token precision (ERC20 convention)
pub const DEFAULT_TOKEN_DECIMALS: u32 = 18;

/// Configuration for a [`crate::dex::Dex`] instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DexConfig {
    /// Address of the exchange contract (custodian of deposited tokens)
    pub address: Address,
    /// Account allowed to register tokens
    pub admin: Address,
    /// Ticker every price is denominated in
    #[serde(default = "default_quote_ticker")]
    pub quote_ticker: Ticker,
    /// Precision used when rendering amounts for humans
    #[serde(default = "default_token_decimals")]
    pub token_decimals: u32,
}

fn default_quote_ticker() -> Ticker {
    Ticker::new(DEFAULT_QUOTE_TICKER)
}

fn default_token_decimals() -> u32 {
    DEFAULT_TOKEN_DECIMALS
}

impl DexConfig {
    /// Config with the default quote asset and precision
    pub fn new(address: Address, admin: Address) -> Self {
        Self {
            address,
            admin,
            quote_ticker: default_quote_ticker(),
            token_decimals: DEFAULT_TOKEN_DECIMALS,
        }
    }

    pub fn with_quote_ticker(mut self, quote_ticker: Ticker) -> Self {
        self.quote_ticker = quote_ticker;
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}
