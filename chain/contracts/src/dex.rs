//! Exchange contract
//!
//! `Dex` ties the registry, the vault and the order book together and is
//! the only entry point callers use. Every operation takes the caller
//! explicitly (the chain's `msg.sender`) and either completes or fails
//! without changing state.
//!
//! Placement only checks balances; it reserves nothing. A trader may rest
//! several orders that together exceed what they hold. Settlement re-checks
//! both counterparties, so an unbacked order makes the market order that
//! reaches it fail instead of driving a balance negative.

use chrono::Utc;
use dex_types::ids::{Address, OrderId, Ticker, TradeId};
use dex_types::numeric::{format_units, Amount, Price};
use dex_types::order::{Order, Side};
use dex_types::trade::Trade;
use std::sync::Arc;
use tracing::info;

use crate::config::DexConfig;
use crate::errors::DexError;
use crate::events::{Deposited, DexEvent, OrderCreated, TokenAdded, Withdrawn};
use crate::matching::{self, MarketOrderOutcome, Taker};
use crate::orderbook::OrderBook;
use crate::registry::{TokenInfo, TokenRegistry};
use crate::security::AccessControl;
use crate::token::Erc20;
use crate::vault::Vault;

#[derive(Debug)]
pub struct Dex {
    config: DexConfig,
    access_control: AccessControl,
    registry: TokenRegistry,
    vault: Vault,
    books: OrderBook,
    next_order_id: OrderId,
    next_trade_id: TradeId,
    /// Emitted events log (append-only)
    events: Vec<DexEvent>,
}

impl Dex {
    pub fn new(config: DexConfig) -> Self {
        info!(
            address = %config.address,
            admin = %config.admin,
            quote = %config.quote_ticker,
            "Exchange deployed"
        );
        Self {
            access_control: AccessControl::new(config.admin),
            registry: TokenRegistry::new(config.quote_ticker.clone()),
            vault: Vault::new(config.address),
            books: OrderBook::new(),
            next_order_id: OrderId::new(0),
            next_trade_id: TradeId::new(0),
            events: Vec::new(),
            config,
        }
    }

    /// Address of the exchange contract
    pub fn address(&self) -> Address {
        self.config.address
    }

    pub fn quote_ticker(&self) -> &Ticker {
        self.registry.quote()
    }

    // ───────────────────────── Token Registry ─────────────────────────

    /// Register a token. Admin-only.
    pub fn add_token(&mut self, caller: &Address, ticker: Ticker, contract: Arc<dyn Erc20>) -> Result<(), DexError> {
        self.only_admin(caller)?;
        let token = self.registry.register(ticker, contract)?;
        let event = TokenAdded {
            ticker: token.ticker.clone(),
            contract: token.address(),
        };
        info!(ticker = %event.ticker, contract = %event.contract, "Token registered");
        self.events.push(DexEvent::TokenAdded(event));
        Ok(())
    }

    /// Registered tokens, in registration order
    pub fn tokens(&self) -> Vec<TokenInfo> {
        self.registry.tokens()
    }

    // ───────────────────────── Ledger ─────────────────────────

    /// Pull `amount` of `ticker` from the caller into custody.
    ///
    /// The caller must first approve this contract's address on the token.
    pub fn deposit(&mut self, caller: &Address, ticker: &Ticker, amount: Amount) -> Result<Amount, DexError> {
        let token = self.registry.resolve(ticker)?;
        let balance = self.vault.deposit(*caller, token, amount)?;
        self.events.push(DexEvent::Deposited(Deposited {
            trader: *caller,
            ticker: ticker.clone(),
            amount,
            balance,
        }));
        Ok(balance)
    }

    /// Return `amount` of `ticker` from the ledger to the caller.
    pub fn withdraw(&mut self, caller: &Address, ticker: &Ticker, amount: Amount) -> Result<Amount, DexError> {
        let token = self.registry.resolve(ticker)?;
        let balance = self.vault.withdraw(*caller, token, amount)?;
        self.events.push(DexEvent::Withdrawn(Withdrawn {
            trader: *caller,
            ticker: ticker.clone(),
            amount,
            balance,
        }));
        Ok(balance)
    }

    /// Ledger balance; zero for unknown traders and tickers
    pub fn balance_of(&self, trader: &Address, ticker: &Ticker) -> Amount {
        self.vault.balance_of(trader, ticker)
    }

    /// `true` if the ledger owes no more of `ticker` than the contract holds
    pub fn is_solvent(&self, ticker: &Ticker) -> Result<bool, DexError> {
        let token = self.registry.resolve(ticker)?;
        let owed = self.vault.total(ticker).ok_or(DexError::Overflow)?;
        Ok(owed <= token.contract.balance_of(&self.config.address))
    }

    // ───────────────────────── Order Book ─────────────────────────

    /// Rest a limit order in the book and return its id.
    ///
    /// SELL requires `amount` of the base asset; BUY requires
    /// `amount × price` of the quote asset. Nothing is reserved.
    pub fn place_limit_order(
        &mut self,
        caller: &Address,
        ticker: &Ticker,
        amount: Amount,
        price: Price,
        side: Side,
    ) -> Result<OrderId, DexError> {
        self.registry.resolve_tradable(ticker)?;
        if amount.is_zero() {
            return Err(DexError::InvalidAmount);
        }
        if price.is_zero() {
            return Err(DexError::InvalidPrice);
        }

        match side {
            Side::SELL => {
                let available = self.vault.balance_of(caller, ticker);
                if available < amount {
                    return Err(DexError::InsufficientBalance {
                        trader: *caller,
                        ticker: ticker.clone(),
                        required: amount,
                        available,
                    });
                }
            }
            Side::BUY => {
                let cost = amount.checked_cost(price).ok_or(DexError::Overflow)?;
                let available = self.vault.balance_of(caller, self.registry.quote());
                if available < cost {
                    return Err(DexError::InsufficientQuoteBalance {
                        trader: *caller,
                        required: cost,
                        available,
                    });
                }
            }
        }

        let order_id = self.next_order_id;
        self.next_order_id = order_id.next();
        let order = Order::new(order_id, *caller, ticker.clone(), side, amount, price, now());

        let position = self.books.insert(order.clone());
        info!(
            order_id = %order_id,
            trader = %caller,
            ticker = %ticker,
            ?side,
            amount = %amount,
            price = %price,
            position,
            "Limit order created"
        );
        self.events.push(DexEvent::OrderCreated(OrderCreated { order }));
        Ok(order_id)
    }

    /// Snapshot of one side of a ticker's book, best first
    pub fn get_orders(&self, ticker: &Ticker, side: Side) -> Result<Vec<Order>, DexError> {
        self.registry.resolve(ticker)?;
        Ok(self.books.orders(ticker, side))
    }

    // ───────────────────────── Matching ─────────────────────────

    /// Match `amount` immediately against the opposite side of the book.
    ///
    /// Whatever the book cannot absorb is left unmatched; that is still a
    /// success. A SELL must hold the full `amount` up front. A BUY must be
    /// able to pay each step as it is reached.
    pub fn place_market_order(
        &mut self,
        caller: &Address,
        ticker: &Ticker,
        amount: Amount,
        side: Side,
    ) -> Result<MarketOrderOutcome, DexError> {
        self.registry.resolve_tradable(ticker)?;
        if amount.is_zero() {
            return Err(DexError::InvalidAmount);
        }

        if side == Side::SELL {
            let available = self.vault.balance_of(caller, ticker);
            if available < amount {
                return Err(DexError::InsufficientBalance {
                    trader: *caller,
                    ticker: ticker.clone(),
                    required: amount,
                    available,
                });
            }
        }

        let quote = self.registry.quote();
        let (fills, changes) = match self.books.side(ticker, side.opposite()) {
            Some(book) => {
                let mut settlement = self.vault.settlement(quote);
                let taker = Taker {
                    trader: caller,
                    ticker,
                    side,
                    amount,
                };
                let fills = matching::match_market_order(book, &mut settlement, quote, taker)?;
                (fills, settlement.into_changes())
            }
            None => (Vec::new(), Default::default()),
        };

        // Every step settled: commit ledger and book together
        self.vault.commit(changes);
        let pruned = matching::apply_fills(self.books.side_mut(ticker, side.opposite()), &fills);

        let executed_at = now();
        let mut trades = Vec::with_capacity(fills.len());
        for fill in &fills {
            let trade = Trade {
                trade_id: self.next_trade_id,
                order_id: fill.order_id,
                ticker: ticker.clone(),
                maker: fill.maker,
                taker: *caller,
                taker_side: side,
                amount: fill.amount,
                price: fill.price,
                executed_at,
            };
            self.next_trade_id = self.next_trade_id.next();
            self.events.push(DexEvent::NewTrade(trade.clone()));
            trades.push(trade);
        }

        let filled = matching::filled_amount(&fills);
        let unfilled = amount.checked_sub(filled).unwrap_or(Amount::ZERO);
        info!(
            trader = %caller,
            ticker = %ticker,
            ?side,
            requested = %self.format_amount(amount),
            filled = %self.format_amount(filled),
            trades = trades.len(),
            pruned,
            "Market order executed"
        );

        Ok(MarketOrderOutcome {
            trades,
            filled,
            unfilled,
        })
    }

    // ───────────────────────── Access Control ─────────────────────────

    /// Transfer admin to a new address.
    pub fn set_admin(&mut self, caller: &Address, new_admin: Address) -> Result<(), DexError> {
        if !self.access_control.transfer_admin(caller, new_admin) {
            return Err(DexError::Unauthorized);
        }
        info!(admin = %new_admin, "Admin transferred");
        Ok(())
    }

    pub fn admin(&self) -> Address {
        self.access_control.admin()
    }

    // ───────────────────────── Events ─────────────────────────

    /// Get all emitted events.
    pub fn events(&self) -> &[DexEvent] {
        &self.events
    }

    /// Drain all events (consume and clear).
    pub fn drain_events(&mut self) -> Vec<DexEvent> {
        std::mem::take(&mut self.events)
    }

    // ───────────────────────── Internal ─────────────────────────

    fn only_admin(&self, caller: &Address) -> Result<(), DexError> {
        if !self.access_control.is_admin(caller) {
            return Err(DexError::Unauthorized);
        }
        Ok(())
    }

    fn format_amount(&self, amount: Amount) -> String {
        format_units(amount, self.config.token_decimals)
    }
}

fn now() -> i64 {
    Utc::now().timestamp()
}
