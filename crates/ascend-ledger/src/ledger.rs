//! The per-player investment ledger.
//!
//! A [`PlayerLedger`] records how many points a player has available, which
//! talents they have learned at which level, and how much they have put
//! into each branch.
//!
//! # Design
//!
//! - **All or nothing**: every mutation computes its new values with
//!   checked arithmetic first and commits only when all of them succeed.
//! - **Sparse levels**: a talent at level 0 is absent from the level map.
//! - **Dense branches**: every known branch is present, defaulting to 0.
//! - **Mirror**: `available_points` mirrors an external account and is
//!   overwritten by [`PlayerLedger::sync_available`] on every access.

use std::collections::BTreeMap;

use ascend_types::{BranchId, PlayerTalentRecord, TalentId};
use tracing::debug;

use crate::LedgerError;

/// One player's talent investment record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerLedger {
    /// Unspent points (cached mirror of the external account).
    available_points: u32,
    /// Talent id to level; only nonzero levels are present.
    talents: BTreeMap<TalentId, u32>,
    /// Branch id to points invested; every known branch is present.
    branch_points: BTreeMap<BranchId, u32>,
    /// Sum of all investments.
    total_points_spent: u32,
}

impl PlayerLedger {
    /// Create an empty ledger with no known branches.
    pub const fn new() -> Self {
        Self {
            available_points: 0,
            talents: BTreeMap::new(),
            branch_points: BTreeMap::new(),
            total_points_spent: 0,
        }
    }

    /// Create an empty ledger with every branch in `branches` at 0.
    pub fn with_branches(branches: impl IntoIterator<Item = BranchId>) -> Self {
        Self {
            branch_points: branches.into_iter().map(|b| (b, 0)).collect(),
            ..Self::new()
        }
    }

    /// Make sure `branch` has an entry, adding it at 0 if missing.
    pub fn ensure_branch(&mut self, branch: &BranchId) {
        if !self.branch_points.contains_key(branch) {
            self.branch_points.insert(branch.clone(), 0);
        }
    }

    /// Unspent points.
    pub const fn available_points(&self) -> u32 {
        self.available_points
    }

    /// Points currently invested across all talents.
    pub const fn total_points_spent(&self) -> u32 {
        self.total_points_spent
    }

    /// Learned talents and their levels.
    pub const fn talents(&self) -> &BTreeMap<TalentId, u32> {
        &self.talents
    }

    /// Points invested per branch.
    pub const fn branches(&self) -> &BTreeMap<BranchId, u32> {
        &self.branch_points
    }

    /// Points invested in `branch` (0 if unknown).
    pub fn branch_points(&self, branch: &str) -> u32 {
        self.branch_points.get(branch).copied().unwrap_or(0)
    }

    /// Current level of `talent` (0 if never learned).
    pub fn level_of(&self, talent: &str) -> u32 {
        self.talents.get(talent).copied().unwrap_or(0)
    }

    /// Overwrite the cached balance with the external account's balance.
    pub const fn sync_available(&mut self, balance: u32) {
        self.available_points = balance;
    }

    /// Add `points` to the available balance, returning the new balance.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::ArithmeticOverflow`] if the balance would
    /// overflow; the ledger is unchanged.
    pub fn credit(&mut self, points: u32) -> Result<u32, LedgerError> {
        self.available_points = self.available_points.checked_add(points).ok_or_else(|| {
            LedgerError::ArithmeticOverflow {
                context: format!("crediting {points} points"),
            }
        })?;
        Ok(self.available_points)
    }

    /// Move `points` from available to spent.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InsufficientPoints`] if the balance is too
    /// low, or [`LedgerError::ArithmeticOverflow`] if the spent total would
    /// overflow. Either way the ledger is unchanged.
    pub fn spend(&mut self, points: u32) -> Result<(), LedgerError> {
        let (available, spent) = self.after_spend(points)?;
        self.available_points = available;
        self.total_points_spent = spent;
        Ok(())
    }

    /// Learn one level of `talent` in `branch` for `cost` points.
    ///
    /// Spends the points, raises the level by one, and adds the cost to the
    /// branch, returning the new level. Either all three happen or none do.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InsufficientPoints`] or
    /// [`LedgerError::ArithmeticOverflow`]; the ledger is unchanged and the
    /// talent keeps its old level.
    pub fn learn(
        &mut self,
        talent: &TalentId,
        branch: &BranchId,
        cost: u32,
    ) -> Result<u32, LedgerError> {
        let (available, spent) = self.after_spend(cost)?;
        let level = self.level_of(talent.as_str()).checked_add(1).ok_or_else(|| {
            LedgerError::ArithmeticOverflow {
                context: format!("level of {talent}"),
            }
        })?;
        let invested = self
            .branch_points(branch.as_str())
            .checked_add(cost)
            .ok_or_else(|| LedgerError::ArithmeticOverflow {
                context: format!("points invested in {branch}"),
            })?;

        self.available_points = available;
        self.total_points_spent = spent;
        self.talents.insert(talent.clone(), level);
        self.branch_points.insert(branch.clone(), invested);
        Ok(level)
    }

    /// Refund every invested point and forget every level.
    ///
    /// Returns the refunded amount; 0 means there was nothing to refund.
    /// Branch entries are kept at 0.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::ArithmeticOverflow`] if the refunded balance
    /// would not fit; the ledger is unchanged.
    pub fn reset_all(&mut self) -> Result<u32, LedgerError> {
        let refund = self.total_points_spent;
        self.available_points = self.available_points.checked_add(refund).ok_or_else(|| {
            LedgerError::ArithmeticOverflow {
                context: format!("refunding {refund} points"),
            }
        })?;
        self.talents.clear();
        for invested in self.branch_points.values_mut() {
            *invested = 0;
        }
        self.total_points_spent = 0;
        Ok(refund)
    }

    /// The branch with strictly the most points invested.
    ///
    /// Returns `None` when nothing is invested. Ties above zero go to the
    /// lexicographically smallest branch id.
    pub fn main_specialization(&self) -> Option<&BranchId> {
        let mut best: Option<(&BranchId, u32)> = None;
        for (branch, &points) in &self.branch_points {
            if points == 0 {
                continue;
            }
            match best {
                Some((_, top)) if points <= top => {}
                _ => best = Some((branch, points)),
            }
        }
        best.map(|(branch, _)| branch)
    }

    /// Snapshot the ledger into its persisted form.
    pub fn to_record(&self) -> PlayerTalentRecord {
        PlayerTalentRecord {
            available_points: self.available_points,
            total_points_spent: self.total_points_spent,
            talents: self.talents.clone(),
            branch_points: self.branch_points.clone(),
        }
    }

    /// Restore a ledger from its persisted form.
    ///
    /// Zero-level talent entries are dropped. The branch totals must add up
    /// to the recorded spent total; the per-talent cost check needs the
    /// definitions and is left to [`crate::conservation::verify_ledger`].
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::CorruptRecord`] if the branch totals disagree
    /// with `total_points_spent`.
    pub fn from_record(record: PlayerTalentRecord) -> Result<Self, LedgerError> {
        let branch_total: u64 = record.branch_points.values().map(|&p| u64::from(p)).sum();
        if branch_total != u64::from(record.total_points_spent) {
            debug!(
                branch_total,
                total_points_spent = record.total_points_spent,
                "Rejecting ledger record with inconsistent branch totals"
            );
            return Err(LedgerError::CorruptRecord {
                reason: format!(
                    "branch points sum to {branch_total} but total spent is {}",
                    record.total_points_spent
                ),
            });
        }

        Ok(Self {
            available_points: record.available_points,
            talents: record
                .talents
                .into_iter()
                .filter(|(_, level)| *level > 0)
                .collect(),
            branch_points: record.branch_points,
            total_points_spent: record.total_points_spent,
        })
    }

    /// Compute the balance and spent total after spending `points`.
    fn after_spend(&self, points: u32) -> Result<(u32, u32), LedgerError> {
        let available = self.available_points.checked_sub(points).ok_or(
            LedgerError::InsufficientPoints {
                requested: points,
                available: self.available_points,
            },
        )?;
        let spent = self.total_points_spent.checked_add(points).ok_or_else(|| {
            LedgerError::ArithmeticOverflow {
                context: format!("spending {points} points"),
            }
        })?;
        Ok((available, spent))
    }
}
