//! Trade execution types
//!
//! One `Trade` is recorded per match step between a market order and a
//! resting limit order.

use crate::ids::{Address, OrderId, Ticker, TradeId};
use crate::numeric::{Amount, Price};
use crate::order::Side;
use serde::{Deserialize, Serialize};

/// Executed match step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub trade_id: TradeId,
    /// Resting order that was (partially) consumed
    pub order_id: OrderId,
    pub ticker: Ticker,
    /// Owner of the resting order
    pub maker: Address,
    /// Sender of the market order
    pub taker: Address,
    /// Side of the market order
    pub taker_side: Side,
    /// Base units exchanged
    pub amount: Amount,
    /// Execution price (the resting order's price)
    pub price: Price,
    pub executed_at: i64, // Unix seconds
}

impl Trade {
    /// Quote units paid by the buyer (amount × price)
    pub fn quote_value(&self) -> Option<Amount> {
        self.amount.checked_cost(self.price)
    }

    /// Account receiving the base asset
    pub fn buyer(&self) -> Address {
        match self.taker_side {
            Side::BUY => self.taker,
            Side::SELL => self.maker,
        }
    }

    /// Account receiving the quote asset
    pub fn seller(&self) -> Address {
        match self.taker_side {
            Side::BUY => self.maker,
            Side::SELL => self.taker,
        }
    }
}
