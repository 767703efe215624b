//! Order types
//!
//! A limit order rests in the book until it is completely filled. Market
//! orders are never materialized as `Order` values; they only consume
//! resting orders.

use crate::ids::{Address, OrderId, Ticker};
use crate::numeric::{Amount, Price};
use serde::{Deserialize, Serialize};

/// Order side (buyer or seller)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy order (bid)
    BUY,
    /// Sell order (ask)
    SELL,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::BUY => Side::SELL,
            Side::SELL => Side::BUY,
        }
    }
}

/// Resting limit order
///
/// `filled` only ever grows, and never past `amount`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Identifier and creation sequence number
    pub id: OrderId,
    pub trader: Address,
    /// Base asset
    pub ticker: Ticker,
    pub side: Side,
    /// Original size
    pub amount: Amount,
    /// Cumulative matched size
    pub filled: Amount,
    pub price: Price,
    pub created_at: i64, // Unix seconds
}

impl Order {
    /// Create a new unfilled order
    pub fn new(
        id: OrderId,
        trader: Address,
        ticker: Ticker,
        side: Side,
        amount: Amount,
        price: Price,
        created_at: i64,
    ) -> Self {
        Self {
            id,
            trader,
            ticker,
            side,
            amount,
            filled: Amount::ZERO,
            price,
            created_at,
        }
    }

    /// Size still available to match
    pub fn remaining(&self) -> Amount {
        self.amount.checked_sub(self.filled).unwrap_or(Amount::ZERO)
    }

    /// Check if order is completely filled
    pub fn is_filled(&self) -> bool {
        self.filled == self.amount
    }

    /// Record a fill of `quantity`
    ///
    /// # Panics
    /// Panics if the fill would exceed the order amount
    pub fn fill(&mut self, quantity: Amount) {
        let new_filled = self
            .filled
            .checked_add(quantity)
            .filter(|filled| *filled <= self.amount);
        match new_filled {
            Some(filled) => self.filled = filled,
            None => panic!("Fill would exceed order amount"),
        }
    }
}
