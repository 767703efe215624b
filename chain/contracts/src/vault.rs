//! Vault: custodial balance ledger
//!
//! Tracks what each trader holds inside the exchange, per ticker:
//! - Deposit pulls tokens into custody, then credits the ledger
//! - Withdraw debits the ledger, then pushes tokens back out
//! - Trade settlement only moves ledger balances, never tokens
//!
//! Trade settlement is staged in a [`Settlement`] overlay and committed in
//! one step, so a market order that fails halfway leaves no trace.

use dex_types::ids::{Address, Ticker};
use dex_types::numeric::Amount;
use std::collections::HashMap;
use tracing::{info, warn};

use crate::errors::DexError;
use crate::registry::Token;
use crate::security::ReentrancyGuard;

/// Custodial ledger.
///
/// Balances are stored as `HashMap<Address, HashMap<Ticker, Amount>>`; a
/// missing entry reads as zero.
#[derive(Debug)]
pub struct Vault {
    /// Address holding the custodied tokens (the exchange contract)
    custodian: Address,
    /// Balances: trader -> (ticker -> amount)
    balances: HashMap<Address, HashMap<Ticker, Amount>>,
    /// Held across every outbound token call. Stays locked if a token
    /// call unwinds, so the vault refuses all further custody calls.
    reentrancy_guard: ReentrancyGuard,
}

impl Vault {
    pub fn new(custodian: Address) -> Self {
        Self {
            custodian,
            balances: HashMap::new(),
            reentrancy_guard: ReentrancyGuard::new(),
        }
    }

    // ───────────────────────── Deposit / Withdraw ─────────────────────────

    /// Pull `amount` of `token` from `trader` into custody and credit it.
    ///
    /// The trader must have approved the custodian for at least `amount`.
    /// Returns the new ledger balance.
    pub fn deposit(&mut self, trader: Address, token: &Token, amount: Amount) -> Result<Amount, DexError> {
        self.check_reentrancy()?;
        let result = self.deposit_inner(trader, token, amount);
        self.reentrancy_guard.release();
        result
    }

    fn deposit_inner(&mut self, trader: Address, token: &Token, amount: Amount) -> Result<Amount, DexError> {
        if amount.is_zero() {
            return Err(DexError::InvalidAmount);
        }

        let new_balance = self
            .balance_of(&trader, &token.ticker)
            .checked_add(amount)
            .ok_or(DexError::Overflow)?;

        token
            .contract
            .transfer_from(&self.custodian, &trader, &self.custodian, amount)
            .map_err(|e| {
                warn!(trader = %trader, ticker = %token.ticker, error = %e, "Deposit transfer failed");
                DexError::TransferFailed(e)
            })?;

        self.set_balance(trader, &token.ticker, new_balance);
        info!(trader = %trader, ticker = %token.ticker, amount = %amount, "Deposit credited");
        Ok(new_balance)
    }

    /// Debit `amount` from `trader` and push the tokens back to them.
    ///
    /// The ledger is debited before the outbound transfer; if the transfer
    /// fails the debit is reverted. Returns the new ledger balance.
    pub fn withdraw(&mut self, trader: Address, token: &Token, amount: Amount) -> Result<Amount, DexError> {
        self.check_reentrancy()?;
        let result = self.withdraw_inner(trader, token, amount);
        self.reentrancy_guard.release();
        result
    }

    fn withdraw_inner(&mut self, trader: Address, token: &Token, amount: Amount) -> Result<Amount, DexError> {
        if amount.is_zero() {
            return Err(DexError::InvalidAmount);
        }

        let previous = self.balance_of(&trader, &token.ticker);
        let new_balance = previous
            .checked_sub(amount)
            .ok_or_else(|| DexError::InsufficientBalance {
                trader,
                ticker: token.ticker.clone(),
                required: amount,
                available: previous,
            })?;
        self.set_balance(trader, &token.ticker, new_balance);

        if let Err(e) = token.contract.transfer(&self.custodian, &trader, amount) {
            warn!(trader = %trader, ticker = %token.ticker, error = %e, "Withdrawal transfer failed");
            self.set_balance(trader, &token.ticker, previous);
            return Err(DexError::TransferFailed(e));
        }

        info!(trader = %trader, ticker = %token.ticker, amount = %amount, "Withdrawal sent");
        Ok(new_balance)
    }

    // ───────────────────────── Balance Queries ─────────────────────────

    /// Get balance for a specific trader and ticker.
    pub fn balance_of(&self, trader: &Address, ticker: &Ticker) -> Amount {
        self.balances
            .get(trader)
            .and_then(|assets| assets.get(ticker))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    /// Sum of every trader's balance in `ticker`; `None` on overflow
    pub fn total(&self, ticker: &Ticker) -> Option<Amount> {
        self.balances
            .values()
            .filter_map(|assets| assets.get(ticker))
            .try_fold(Amount::ZERO, |acc, amount| acc.checked_add(*amount))
    }

    // ───────────────────────── Settlement ─────────────────────────

    /// Start staging trade settlement against the current balances.
    ///
    /// Shortfalls in `quote` are reported as `InsufficientQuoteBalance`.
    pub fn settlement<'a>(&'a self, quote: &'a Ticker) -> Settlement<'a> {
        Settlement {
            vault: self,
            quote,
            pending: HashMap::new(),
        }
    }

    /// Apply staged balances produced by [`Settlement::into_changes`].
    pub fn commit(&mut self, changes: SettlementChanges) {
        for ((trader, ticker), amount) in changes.0 {
            self.set_balance(trader, &ticker, amount);
        }
    }

    pub(crate) fn set_balance(&mut self, trader: Address, ticker: &Ticker, amount: Amount) {
        self.balances
            .entry(trader)
            .or_default()
            .insert(ticker.clone(), amount);
    }

    fn check_reentrancy(&mut self) -> Result<(), DexError> {
        if !self.reentrancy_guard.acquire() {
            return Err(DexError::Reentrancy);
        }
        Ok(())
    }
}

/// Staged ledger transfers on top of a borrowed [`Vault`].
///
/// Reads see staged values first. Nothing reaches the vault until the
/// changes are committed.
#[derive(Debug)]
pub struct Settlement<'a> {
    vault: &'a Vault,
    quote: &'a Ticker,
    pending: HashMap<(Address, Ticker), Amount>,
}

/// Final balances of every entry touched by a [`Settlement`]
#[derive(Debug, Default)]
pub struct SettlementChanges(HashMap<(Address, Ticker), Amount>);

impl SettlementChanges {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> Settlement<'a> {
    pub fn balance_of(&self, trader: &Address, ticker: &Ticker) -> Amount {
        self.pending
            .get(&(*trader, ticker.clone()))
            .copied()
            .unwrap_or_else(|| self.vault.balance_of(trader, ticker))
    }

    /// Move `amount` of `ticker` from `from` to `to`.
    ///
    /// Fails without staging anything if `from` cannot cover it.
    pub fn transfer(&mut self, from: &Address, to: &Address, ticker: &Ticker, amount: Amount) -> Result<(), DexError> {
        let available = self.balance_of(from, ticker);
        let debited = available
            .checked_sub(amount)
            .ok_or_else(|| self.shortfall(from, ticker, amount, available))?;

        if from == to {
            return Ok(());
        }

        let credited = self
            .balance_of(to, ticker)
            .checked_add(amount)
            .ok_or(DexError::Overflow)?;

        self.pending.insert((*from, ticker.clone()), debited);
        self.pending.insert((*to, ticker.clone()), credited);
        Ok(())
    }

    pub fn into_changes(self) -> SettlementChanges {
        SettlementChanges(self.pending)
    }

    fn shortfall(&self, trader: &Address, ticker: &Ticker, required: Amount, available: Amount) -> DexError {
        if ticker == self.quote {
            DexError::InsufficientQuoteBalance {
                trader: *trader,
                required,
                available,
            }
        } else {
            DexError::InsufficientBalance {
                trader: *trader,
                ticker: ticker.clone(),
                required,
                available,
            }
        }
    }
}
