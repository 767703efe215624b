//! Types library for the token exchange
//!
//! Value types shared by the exchange contract and its hosts. Everything
//! here is plain data: no I/O, no interior mutability.
//!
//! # Modules
//! - `ids`: Identifiers (Address, Ticker, OrderId, TradeId)
//! - `numeric`: Unsigned fixed-width amounts and prices, unit conversion
//! - `order`: Order side and resting limit order
//! - `trade`: Executed match step

pub mod ids;
pub mod numeric;
pub mod order;
pub mod trade;
