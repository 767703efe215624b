//! Shared contract host
//!
//! A chain executes one transaction at a time against contract state. The
//! host reproduces that for in-process users: [`SharedDex`] serializes
//! every call through one lock, and a [`Caller`] binds the sender so call
//! sites read like transactions.
//!
//! Token contracts are called while the lock is held. A token whose
//! transfer hook calls back into the same `SharedDex` would deadlock; the
//! exchange does not support such tokens.

use dex_types::ids::{Address, OrderId, Ticker};
use dex_types::numeric::{Amount, Price};
use dex_types::order::{Order, Side};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::dex::Dex;
use crate::errors::DexError;
use crate::events::DexEvent;
use crate::matching::MarketOrderOutcome;
use crate::registry::TokenInfo;
use crate::token::Erc20;

/// Thread-safe handle to a single exchange instance
#[derive(Debug, Clone)]
pub struct SharedDex {
    inner: Arc<Mutex<Dex>>,
}

impl SharedDex {
    pub fn new(dex: Dex) -> Self {
        Self {
            inner: Arc::new(Mutex::new(dex)),
        }
    }

    /// Calls run to completion or return an error before any write, so
    /// state behind a poisoned lock is still consistent.
    fn lock(&self) -> MutexGuard<'_, Dex> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Bind a sender address
    pub fn caller(&self, address: Address) -> Caller {
        Caller {
            dex: self.clone(),
            address,
        }
    }

    pub fn tokens(&self) -> Vec<TokenInfo> {
        self.lock().tokens()
    }

    pub fn balance_of(&self, trader: &Address, ticker: &Ticker) -> Amount {
        self.lock().balance_of(trader, ticker)
    }

    pub fn get_orders(&self, ticker: &Ticker, side: Side) -> Result<Vec<Order>, DexError> {
        self.lock().get_orders(ticker, side)
    }

    pub fn is_solvent(&self, ticker: &Ticker) -> Result<bool, DexError> {
        self.lock().is_solvent(ticker)
    }

    pub fn events(&self) -> Vec<DexEvent> {
        self.lock().events().to_vec()
    }

    pub fn drain_events(&self) -> Vec<DexEvent> {
        self.lock().drain_events()
    }
}

/// A sender bound to a [`SharedDex`]
#[derive(Debug, Clone)]
pub struct Caller {
    dex: SharedDex,
    address: Address,
}

impl Caller {
    pub fn address(&self) -> Address {
        self.address
    }

    pub fn add_token(&self, ticker: Ticker, contract: Arc<dyn Erc20>) -> Result<(), DexError> {
        self.dex.lock().add_token(&self.address, ticker, contract)
    }

    pub fn deposit(&self, ticker: &Ticker, amount: Amount) -> Result<Amount, DexError> {
        self.dex.lock().deposit(&self.address, ticker, amount)
    }

    pub fn withdraw(&self, ticker: &Ticker, amount: Amount) -> Result<Amount, DexError> {
        self.dex.lock().withdraw(&self.address, ticker, amount)
    }

    pub fn place_limit_order(
        &self,
        ticker: &Ticker,
        amount: Amount,
        price: Price,
        side: Side,
    ) -> Result<OrderId, DexError> {
        self.dex
            .lock()
            .place_limit_order(&self.address, ticker, amount, price, side)
    }

    pub fn place_market_order(
        &self,
        ticker: &Ticker,
        amount: Amount,
        side: Side,
    ) -> Result<MarketOrderOutcome, DexError> {
        self.dex
            .lock()
            .place_market_order(&self.address, ticker, amount, side)
    }

    pub fn set_admin(&self, new_admin: Address) -> Result<(), DexError> {
        self.dex.lock().set_admin(&self.address, new_admin)
    }

    /// Ledger balance of this caller
    pub fn balance(&self, ticker: &Ticker) -> Amount {
        self.dex.balance_of(&self.address, ticker)
    }
}
