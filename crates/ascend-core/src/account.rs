//! The external point account.
//!
//! Talent points belong to the character-stat subsystem, not to the
//! engine. The engine reads the balance on every ledger access and writes
//! through on every mutation via the [`PointAccount`] trait.

use std::collections::BTreeMap;
use std::sync::Mutex;

use ascend_types::PlayerId;

use crate::error::AccountError;

/// A store of spendable talent points owned outside the engine.
///
/// Implementations must be safe to call from several threads. The engine
/// serializes calls for the same player, so an implementation only needs
/// to guard its own storage.
pub trait PointAccount: Send + Sync {
    /// Current balance for `player`. Unknown players have zero.
    fn balance(&self, player: PlayerId) -> u32;

    /// Add `points` to the player's balance.
    ///
    /// # Errors
    ///
    /// Returns an [`AccountError`] if the credit cannot be applied.
    fn credit(&self, player: PlayerId, points: u32) -> Result<(), AccountError>;

    /// Take `points` from the player's balance.
    ///
    /// Returns `false`, leaving the balance unchanged, when the balance
    /// does not cover `points`.
    fn debit(&self, player: PlayerId, points: u32) -> bool;
}

/// A [`PointAccount`] held in memory, for hosts without a stat subsystem
/// and for tests.
#[derive(Debug, Default)]
pub struct InMemoryPointAccount {
    balances: Mutex<BTreeMap<PlayerId, u32>>,
}

impl InMemoryPointAccount {
    /// Create an account with no balances.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the balance for `player`.
    pub fn set_balance(&self, player: PlayerId, points: u32) {
        if let Ok(mut balances) = self.balances.lock() {
            balances.insert(player, points);
        }
    }
}

impl PointAccount for InMemoryPointAccount {
    fn balance(&self, player: PlayerId) -> u32 {
        self.balances
            .lock()
            .map(|balances| balances.get(&player).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    fn credit(&self, player: PlayerId, points: u32) -> Result<(), AccountError> {
        let mut balances = self.balances.lock().map_err(|_poisoned| AccountError::Unavailable {
            reason: String::from("balance table lock poisoned"),
        })?;
        let balance = balances.entry(player).or_insert(0);
        *balance = balance
            .checked_add(points)
            .ok_or(AccountError::Overflow { player })?;
        Ok(())
    }

    fn debit(&self, player: PlayerId, points: u32) -> bool {
        let Ok(mut balances) = self.balances.lock() else {
            return false;
        };
        let Some(balance) = balances.get_mut(&player) else {
            return points == 0;
        };
        match balance.checked_sub(points) {
            Some(remaining) => {
                *balance = remaining;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn unknown_player_has_zero() {
        let account = InMemoryPointAccount::new();
        assert_eq!(account.balance(PlayerId::new()), 0);
    }

    #[test]
    fn credit_then_debit() {
        let account = InMemoryPointAccount::new();
        let player = PlayerId::new();
        account.credit(player, 5).unwrap();
        assert!(account.debit(player, 3));
        assert_eq!(account.balance(player), 2);
    }

    #[test]
    fn overdraw_is_refused_without_change() {
        let account = InMemoryPointAccount::new();
        let player = PlayerId::new();
        account.set_balance(player, 2);
        assert!(!account.debit(player, 3));
        assert_eq!(account.balance(player), 2);
    }

    #[test]
    fn credit_overflow_is_an_error() {
        let account = InMemoryPointAccount::new();
        let player = PlayerId::new();
        account.set_balance(player, u32::MAX);
        assert_eq!(
            account.credit(player, 1).unwrap_err(),
            AccountError::Overflow { player }
        );
        assert_eq!(account.balance(player), u32::MAX);
    }
}
