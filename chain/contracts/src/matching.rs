//! Market order matching
//!
//! A market order walks the opposite side of the book from its head and
//! takes liquidity at each resting order's own price until it is satisfied
//! or the book runs out. Per step:
//! - fill = min(remaining, resting.amount - resting.filled)
//! - cost = fill × resting.price
//! - quote moves buyer -> seller, base moves seller -> buyer
//!
//! Matching is split in two phases. `match_market_order` only reads the
//! book and stages balances in a [`Settlement`]; `apply_fills` writes the
//! fills back once the whole walk has succeeded.

use dex_types::ids::{Address, OrderId, Ticker};
use dex_types::numeric::{Amount, Price};
use dex_types::order::Side;
use dex_types::trade::Trade;
use tracing::debug;

use crate::errors::DexError;
use crate::orderbook::BookSide;
use crate::vault::Settlement;

/// One settled step against a resting order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fill {
    /// Position of the resting order in its book side
    pub index: usize,
    pub order_id: OrderId,
    pub maker: Address,
    pub amount: Amount,
    pub price: Price,
}

/// Result of a market order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketOrderOutcome {
    /// One trade per match step, in execution order
    pub trades: Vec<Trade>,
    /// Base units matched
    pub filled: Amount,
    /// Base units the book could not absorb
    pub unfilled: Amount,
}

impl MarketOrderOutcome {
    pub fn is_complete(&self) -> bool {
        self.unfilled.is_zero()
    }
}

/// The taker side of a market order
#[derive(Debug, Clone, Copy)]
pub struct Taker<'a> {
    pub trader: &'a Address,
    pub ticker: &'a Ticker,
    pub side: Side,
    pub amount: Amount,
}

/// Walk `book` (the side opposite the taker) and stage every step.
///
/// Any step that cannot be paid for fails the whole walk; the caller drops
/// the settlement in that case.
pub fn match_market_order(
    book: &BookSide,
    settlement: &mut Settlement<'_>,
    quote: &Ticker,
    taker: Taker<'_>,
) -> Result<Vec<Fill>, DexError> {
    debug_assert_eq!(book.side(), taker.side.opposite());

    let mut remaining = taker.amount;
    let mut fills = Vec::new();

    for (index, resting) in book.orders().iter().enumerate() {
        if remaining.is_zero() {
            break;
        }
        let available = resting.remaining();
        if available.is_zero() {
            continue;
        }

        let quantity = remaining.min(available);
        let cost = quantity
            .checked_cost(resting.price)
            .ok_or(DexError::Overflow)?;

        let (buyer, seller) = match taker.side {
            Side::BUY => (taker.trader, &resting.trader),
            Side::SELL => (&resting.trader, taker.trader),
        };
        settlement.transfer(buyer, seller, quote, cost)?;
        settlement.transfer(seller, buyer, taker.ticker, quantity)?;

        debug!(
            order_id = %resting.id,
            maker = %resting.trader,
            taker = %taker.trader,
            amount = %quantity,
            price = %resting.price,
            "Matched resting order"
        );

        fills.push(Fill {
            index,
            order_id: resting.id,
            maker: resting.trader,
            amount: quantity,
            price: resting.price,
        });
        remaining = remaining.checked_sub(quantity).unwrap_or(Amount::ZERO);
    }

    Ok(fills)
}

/// Write staged fills into the book and prune exhausted orders.
///
/// Returns the number of orders removed.
pub fn apply_fills(book: &mut BookSide, fills: &[Fill]) -> usize {
    for fill in fills {
        book.fill(fill.index, fill.amount);
    }
    book.prune_filled()
}

/// Total base units across `fills`
pub fn filled_amount(fills: &[Fill]) -> Amount {
    fills
        .iter()
        .fold(Amount::ZERO, |acc, fill| acc.checked_add(fill.amount).unwrap_or(Amount::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vault::Vault;
    use dex_types::order::Order;

    fn addr(n: u64) -> Address {
        Address::from_low_u64(n)
    }

    fn resting(id: u64, trader: u64, side: Side, price: u64, amount: u64) -> Order {
        Order::new(
            OrderId::new(id),
            addr(trader),
            Ticker::new("REP"),
            side,
            Amount::from(amount),
            Price::from(price),
            0,
        )
    }

    fn tickers() -> (Ticker, Ticker) {
        (Ticker::new("DAI"), Ticker::new("REP"))
    }

    /// Trader 1 makes asks and holds REP, trader 2 takes and holds DAI.
    fn ask_book() -> (BookSide, Vault) {
        let (dai, rep) = tickers();
        let mut book = BookSide::new(Side::SELL);
        book.insert(resting(0, 1, Side::SELL, 12, 5));
        book.insert(resting(1, 1, Side::SELL, 10, 5));

        let mut vault = Vault::new(addr(0xde));
        vault.set_balance(addr(1), &rep, Amount::from(10u64));
        vault.set_balance(addr(2), &dai, Amount::from(1_000u64));
        (book, vault)
    }

    #[test]
    fn test_buy_walks_asks_best_price_first() {
        let (dai, rep) = tickers();
        let (book, vault) = ask_book();
        let buyer = addr(2);

        let mut settlement = vault.settlement(&dai);
        let fills = match_market_order(
            &book,
            &mut settlement,
            &dai,
            Taker {
                trader: &buyer,
                ticker: &rep,
                side: Side::BUY,
                amount: Amount::from(7u64),
            },
        )
        .unwrap();

        assert_eq!(fills.len(), 2);
        assert_eq!(fills[0].price, Price::from(10u64));
        assert_eq!(fills[0].amount, Amount::from(5u64));
        assert_eq!(fills[1].price, Price::from(12u64));
        assert_eq!(fills[1].amount, Amount::from(2u64));
        assert_eq!(filled_amount(&fills), Amount::from(7u64));

        // 5 × 10 + 2 × 12
        assert_eq!(settlement.balance_of(&buyer, &dai), Amount::from(926u64));
        assert_eq!(settlement.balance_of(&buyer, &rep), Amount::from(7u64));
        assert_eq!(settlement.balance_of(&addr(1), &dai), Amount::from(74u64));
        assert_eq!(settlement.balance_of(&addr(1), &rep), Amount::from(3u64));
    }

    #[test]
    fn test_buy_stops_when_book_exhausted() {
        let (dai, rep) = tickers();
        let (book, vault) = ask_book();
        let buyer = addr(2);

        let mut settlement = vault.settlement(&dai);
        let fills = match_market_order(
            &book,
            &mut settlement,
            &dai,
            Taker {
                trader: &buyer,
                ticker: &rep,
                side: Side::BUY,
                amount: Amount::from(50u64),
            },
        )
        .unwrap();

        assert_eq!(filled_amount(&fills), Amount::from(10u64));
    }

    #[test]
    fn test_buy_without_quote_fails() {
        let (dai, rep) = tickers();
        let (book, vault) = ask_book();
        let broke = addr(3);

        let mut settlement = vault.settlement(&dai);
        let err = match_market_order(
            &book,
            &mut settlement,
            &dai,
            Taker {
                trader: &broke,
                ticker: &rep,
                side: Side::BUY,
                amount: Amount::from(1u64),
            },
        )
        .unwrap_err();

        assert_eq!(
            err,
            DexError::InsufficientQuoteBalance {
                trader: broke,
                required: Amount::from(10u64),
                available: Amount::ZERO,
            }
        );
    }

    #[test]
    fn test_unbacked_maker_fails_settlement() {
        let (dai, rep) = tickers();
        let (book, mut vault) = ask_book();
        // Maker withdrew the REP backing its asks
        vault.set_balance(addr(1), &rep, Amount::from(2u64));
        let buyer = addr(2);

        let mut settlement = vault.settlement(&dai);
        let err = match_market_order(
            &book,
            &mut settlement,
            &dai,
            Taker {
                trader: &buyer,
                ticker: &rep,
                side: Side::BUY,
                amount: Amount::from(5u64),
            },
        )
        .unwrap_err();

        assert!(matches!(err, DexError::InsufficientBalance { .. }));
    }

    #[test]
    fn test_apply_fills_prunes_exhausted() {
        let (dai, rep) = tickers();
        let (mut book, vault) = ask_book();
        let buyer = addr(2);

        let fills = {
            let mut settlement = vault.settlement(&dai);
            match_market_order(
                &book,
                &mut settlement,
                &dai,
                Taker {
                    trader: &buyer,
                    ticker: &rep,
                    side: Side::BUY,
                    amount: Amount::from(7u64),
                },
            )
            .unwrap()
        };

        assert_eq!(apply_fills(&mut book, &fills), 1);
        assert_eq!(book.len(), 1);
        let best = book.best().unwrap();
        assert_eq!(best.id, OrderId::new(0));
        assert_eq!(best.filled, Amount::from(2u64));
    }
}
