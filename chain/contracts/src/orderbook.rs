//! Order book: resting limit orders per (ticker, side)
//!
//! Each side is a `Vec<Order>` kept in price-time priority, best first:
//! - BUY: highest price first
//! - SELL: lowest price first
//! - Equal prices: earlier order first
//!
//! Insertion is a linear scan from the head. Books are small; the scan keeps
//! the stored order identical to the order `get_orders` reports.

use dex_types::ids::Ticker;
use dex_types::numeric::Amount;
use dex_types::order::{Order, Side};
use std::collections::HashMap;

/// One side of one ticker's book
#[derive(Debug, Clone)]
pub struct BookSide {
    side: Side,
    orders: Vec<Order>,
}

impl BookSide {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            orders: Vec::new(),
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Insert before the first order with strictly worse price.
    ///
    /// Returns the position the order landed at.
    pub fn insert(&mut self, order: Order) -> usize {
        debug_assert_eq!(order.side, self.side);
        let position = self
            .orders
            .iter()
            .position(|resting| self.ranks_before(&order, resting))
            .unwrap_or(self.orders.len());
        self.orders.insert(position, order);
        position
    }

    /// `true` if `incoming` has strictly better price than `resting`
    fn ranks_before(&self, incoming: &Order, resting: &Order) -> bool {
        match self.side {
            Side::BUY => incoming.price > resting.price,
            Side::SELL => incoming.price < resting.price,
        }
    }

    /// Orders in book order, best first
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Record `quantity` matched against the order at `index`
    pub fn fill(&mut self, index: usize, quantity: Amount) {
        if let Some(order) = self.orders.get_mut(index) {
            order.fill(quantity);
        }
    }

    /// Drop the leading run of fully filled orders.
    ///
    /// Matching consumes orders from the head, so exhausted orders always
    /// form a prefix. Returns how many were removed.
    pub fn prune_filled(&mut self) -> usize {
        let exhausted = self
            .orders
            .iter()
            .take_while(|order| order.is_filled())
            .count();
        self.orders.drain(..exhausted);
        exhausted
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Best (first) price on this side
    pub fn best(&self) -> Option<&Order> {
        self.orders.first()
    }
}

/// All books, keyed by (ticker, side)
#[derive(Debug, Clone, Default)]
pub struct OrderBook {
    sides: HashMap<(Ticker, Side), BookSide>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, order: Order) -> usize {
        self.side_mut(&order.ticker, order.side).insert(order)
    }

    pub fn side(&self, ticker: &Ticker, side: Side) -> Option<&BookSide> {
        self.sides.get(&(ticker.clone(), side))
    }

    pub fn side_mut(&mut self, ticker: &Ticker, side: Side) -> &mut BookSide {
        self.sides
            .entry((ticker.clone(), side))
            .or_insert_with(|| BookSide::new(side))
    }

    /// Snapshot of one side in book order
    pub fn orders(&self, ticker: &Ticker, side: Side) -> Vec<Order> {
        self.side(ticker, side)
            .map(|book| book.orders().to_vec())
            .unwrap_or_default()
    }
}
