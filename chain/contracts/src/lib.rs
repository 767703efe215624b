//! Exchange contract logic
//!
//! An order-book exchange for ERC20-style tokens settled against a single
//! quote asset. Traders deposit tokens into custody, rest limit orders, and
//! take liquidity with market orders; every trade moves ledger balances
//! between the two counterparties without touching the token contracts.
//!
//! # Modules
//! - `token`: Token contract interface and an in-memory implementation
//! - `registry`: Admin-curated list of tradable tokens
//! - `vault`: Custody ledger, deposits and withdrawals
//! - `orderbook`: Price-time ordered resting orders per ticker and side
//! - `matching`: Market order walk and staged settlement
//! - `dex`: The exchange contract itself
//! - `host`: Thread-safe handle that serializes calls
//! - `events`: Contract events
//! - `errors`: Contract-specific error types
//! - `security`: Reentrancy guard, access control
//! - `config`: Deployment parameters

pub mod config;
pub mod dex;
pub mod errors;
pub mod events;
pub mod host;
pub mod matching;
pub mod orderbook;
pub mod registry;
pub mod security;
pub mod token;
pub mod vault;

pub use config::DexConfig;
pub use dex::Dex;
pub use errors::DexError;
pub use host::{Caller, SharedDex};
