//! Contract events
//!
//! Events are immutable records emitted by contract operations, for
//! consumption by off-chain observers. Core logic never reads them back.

use dex_types::ids::{Address, Ticker};
use dex_types::numeric::Amount;
use dex_types::order::Order;
use dex_types::trade::Trade;
use serde::{Deserialize, Serialize};

/// Token registered by the admin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAdded {
    pub ticker: Ticker,
    pub contract: Address,
}

/// Tokens pulled into custody and credited
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deposited {
    pub trader: Address,
    pub ticker: Ticker,
    pub amount: Amount,
    pub balance: Amount,
}

/// Ledger debited and tokens returned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Withdrawn {
    pub trader: Address,
    pub ticker: Ticker,
    pub amount: Amount,
    pub balance: Amount,
}

/// Limit order placed in the book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCreated {
    pub order: Order,
}

/// Enum wrapper for all contract events, enabling uniform handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DexEvent {
    TokenAdded(TokenAdded),
    Deposited(Deposited),
    Withdrawn(Withdrawn),
    OrderCreated(OrderCreated),
    /// One match step of a market order
    NewTrade(Trade),
}

#[cfg(test)]
mod tests {
    use super::*;
    use dex_types::ids::OrderId;
    use dex_types::numeric::Price;
    use dex_types::order::Side;

    #[test]
    fn test_deposited_serialization() {
        let event = DexEvent::Deposited(Deposited {
            trader: Address::from_low_u64(1),
            ticker: Ticker::new("DAI"),
            amount: Amount::new(100),
            balance: Amount::new(100),
        });
        let json = serde_json::to_string(&event).unwrap();
        let deser: DexEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, deser);
    }

    #[test]
    fn test_order_created_serialization() {
        let event = DexEvent::OrderCreated(OrderCreated {
            order: Order::new(
                OrderId::new(4),
                Address::from_low_u64(2),
                Ticker::new("BAT"),
                Side::SELL,
                Amount::new(10),
                Price::new(3),
                1_708_123_456,
            ),
        });
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"SELL\""));
        let deser: DexEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, deser);
    }
}
