//! External token contracts
//!
//! The exchange only ever talks to token contracts through [`Erc20`]. The
//! caller identity that a chain would supply implicitly (`msg.sender`) is
//! passed explicitly as the first address argument.

use dex_types::ids::Address;
use dex_types::numeric::Amount;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::errors::TokenError;

/// ERC20-style token contract
///
/// Calls are synchronous. Implementations use interior mutability because a
/// single contract is shared by every party holding a reference to it.
pub trait Erc20: fmt::Debug + Send + Sync {
    /// Address of the token contract itself
    fn address(&self) -> Address;

    fn balance_of(&self, owner: &Address) -> Amount;

    /// Move `amount` from `sender` to `recipient`
    fn transfer(&self, sender: &Address, recipient: &Address, amount: Amount) -> Result<(), TokenError>;

    /// Move `amount` from `owner` to `recipient` on behalf of `spender`,
    /// consuming `spender`'s allowance
    fn transfer_from(
        &self,
        spender: &Address,
        owner: &Address,
        recipient: &Address,
        amount: Amount,
    ) -> Result<(), TokenError>;

    /// Let `spender` move up to `amount` of `owner`'s tokens
    fn approve(&self, owner: &Address, spender: &Address, amount: Amount) -> Result<(), TokenError>;

    fn allowance(&self, owner: &Address, spender: &Address) -> Amount;
}

#[derive(Debug, Default)]
struct MockTokenState {
    balances: HashMap<Address, Amount>,
    allowances: HashMap<(Address, Address), Amount>,
    reject_transfers: Option<String>,
}

/// In-memory ERC20 token used to seed balances in tests and simulations.
#[derive(Debug)]
pub struct MockToken {
    address: Address,
    state: Mutex<MockTokenState>,
}

impl MockToken {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            state: Mutex::new(MockTokenState::default()),
        }
    }

    /// Mint `amount` to `to`
    pub fn faucet(&self, to: &Address, amount: Amount) -> Result<(), TokenError> {
        let mut state = self.state();
        let balance = state.balances.entry(*to).or_default();
        *balance = balance.checked_add(amount).ok_or_else(|| TokenError::Rejected {
            reason: "supply overflow".to_string(),
        })?;
        Ok(())
    }

    /// Make every subsequent transfer fail with `reason` (`None` restores
    /// normal behaviour)
    pub fn set_reject_transfers(&self, reason: Option<&str>) {
        self.state().reject_transfers = reason.map(str::to_string);
    }

    fn state(&self) -> MutexGuard<'_, MockTokenState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MockTokenState {
    fn check_not_rejected(&self) -> Result<(), TokenError> {
        match &self.reject_transfers {
            Some(reason) => Err(TokenError::Rejected {
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }

    fn move_balance(&mut self, from: &Address, to: &Address, amount: Amount) -> Result<(), TokenError> {
        let available = self.balances.get(from).copied().unwrap_or_default();
        let debited = available
            .checked_sub(amount)
            .ok_or(TokenError::InsufficientBalance {
                required: amount,
                available,
            })?;
        if from == to {
            return Ok(());
        }

        let credited = self
            .balances
            .get(to)
            .copied()
            .unwrap_or_default()
            .checked_add(amount)
            .ok_or_else(|| TokenError::Rejected {
                reason: "balance overflow".to_string(),
            })?;
        self.balances.insert(*from, debited);
        self.balances.insert(*to, credited);
        Ok(())
    }
}

impl Erc20 for MockToken {
    fn address(&self) -> Address {
        self.address
    }

    fn balance_of(&self, owner: &Address) -> Amount {
        self.state().balances.get(owner).copied().unwrap_or_default()
    }

    fn transfer(&self, sender: &Address, recipient: &Address, amount: Amount) -> Result<(), TokenError> {
        let mut state = self.state();
        state.check_not_rejected()?;
        state.move_balance(sender, recipient, amount)
    }

    fn transfer_from(
        &self,
        spender: &Address,
        owner: &Address,
        recipient: &Address,
        amount: Amount,
    ) -> Result<(), TokenError> {
        let mut state = self.state();
        state.check_not_rejected()?;

        let approved = state
            .allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or_default();
        let remaining = approved
            .checked_sub(amount)
            .ok_or(TokenError::InsufficientAllowance {
                required: amount,
                approved,
            })?;

        state.move_balance(owner, recipient, amount)?;
        state.allowances.insert((*owner, *spender), remaining);
        Ok(())
    }

    fn approve(&self, owner: &Address, spender: &Address, amount: Amount) -> Result<(), TokenError> {
        self.state().allowances.insert((*owner, *spender), amount);
        Ok(())
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.state()
            .allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or_default()
    }
}
