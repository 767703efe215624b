//! Shared security primitives for contract modules
//!
//! Provides the guards used by the vault and the exchange facade.

use dex_types::ids::Address;

/// Lock held while a custody call is talking to a token contract.
///
/// Nested entry is already ruled out by `&mut self`, so in practice the
/// guard never refuses a call that started cleanly. What it catches is a
/// token call that unwinds: `release` is skipped, the guard stays locked,
/// and every later custody call fails with `DexError::Reentrancy` instead
/// of running against a half-finished ledger update.
#[derive(Debug, Clone, Default)]
pub struct ReentrancyGuard {
    locked: bool,
}

impl ReentrancyGuard {
    /// Create a new unlocked guard.
    pub fn new() -> Self {
        Self { locked: false }
    }

    /// Acquire the guard. Returns `true` if successfully acquired.
    /// Returns `false` if already locked (reentrancy attempt).
    pub fn acquire(&mut self) -> bool {
        if self.locked {
            return false;
        }
        self.locked = true;
        true
    }

    /// Release the guard.
    pub fn release(&mut self) {
        self.locked = false;
    }

    /// Check if currently locked.
    pub fn is_locked(&self) -> bool {
        self.locked
    }
}

/// Single-admin access control.
///
/// The admin is fixed at construction and can only be changed by the
/// current admin.
#[derive(Debug, Clone)]
pub struct AccessControl {
    admin: Address,
}

impl AccessControl {
    /// Create access control with an initial admin.
    pub fn new(admin: Address) -> Self {
        Self { admin }
    }

    /// Check if a caller is admin.
    pub fn is_admin(&self, caller: &Address) -> bool {
        *caller == self.admin
    }

    /// Transfer admin to a new address.
    pub fn transfer_admin(&mut self, current_admin: &Address, new_admin: Address) -> bool {
        if !self.is_admin(current_admin) {
            return false;
        }
        self.admin = new_admin;
        true
    }

    /// Get the current admin identifier.
    pub fn admin(&self) -> Address {
        self.admin
    }
}
