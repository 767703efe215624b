//! Contract-specific error types
//!
//! Every failure aborts the whole call: no state written by a failing
//! operation survives it.

use dex_types::ids::{Address, Ticker};
use dex_types::numeric::Amount;
use thiserror::Error;

/// Failures reported by an external token contract
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token balance too low: required {required}, available {available}")]
    InsufficientBalance { required: Amount, available: Amount },

    #[error("token allowance too low: required {required}, approved {approved}")]
    InsufficientAllowance { required: Amount, approved: Amount },

    #[error("token transfer rejected: {reason}")]
    Rejected { reason: String },
}

/// Exchange contract errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DexError {
    #[error("Token does not exist: {ticker}")]
    UnknownToken { ticker: Ticker },

    #[error("Token already registered: {ticker}")]
    DuplicateToken { ticker: Ticker },

    #[error("Cannot trade the quote asset: {ticker}")]
    QuoteAssetNotTradable { ticker: Ticker },

    #[error("Insufficient balance for {trader} in {ticker}: required {required}, available {available}")]
    InsufficientBalance {
        trader: Address,
        ticker: Ticker,
        required: Amount,
        available: Amount,
    },

    #[error("Insufficient quote balance for {trader}: required {required}, available {available}")]
    InsufficientQuoteBalance {
        trader: Address,
        required: Amount,
        available: Amount,
    },

    #[error("Token transfer failed: {0}")]
    TransferFailed(#[from] TokenError),

    #[error("Unauthorized: caller is not admin")]
    Unauthorized,

    #[error("Amount must be positive")]
    InvalidAmount,

    #[error("Price must be positive")]
    InvalidPrice,

    #[error("Arithmetic overflow in balance calculation")]
    Overflow,

    #[error("Reentrancy detected")]
    Reentrancy,
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}
