//! The talent journal: an append-only log of point movements.
//!
//! Every learn, reset, and grant the engine commits is recorded here, along
//! with any desync it detects. Entries are never modified. A player's
//! entries leave the journal only through [`TalentJournal::remove_player`],
//! once they have been archived elsewhere, so the journal holds the history
//! of players currently in play.

use chrono::Utc;

use ascend_types::{BranchId, PlayerId, TalentId, TalentTransaction, TransactionId, TransactionKind};

use crate::LedgerError;

/// Append-only log of [`TalentTransaction`] entries.
#[derive(Debug, Default)]
pub struct TalentJournal {
    /// Entries in the order they were recorded.
    entries: Vec<TalentTransaction>,
}

impl TalentJournal {
    /// Create a new empty journal.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Return the number of entries.
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return whether the journal has no entries.
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every entry still held, oldest first.
    pub fn all_entries(&self) -> &[TalentTransaction] {
        &self.entries
    }

    /// Return the entries for one player, in insertion order.
    pub fn entries_for(&self, player: PlayerId) -> Vec<&TalentTransaction> {
        self.entries.iter().filter(|e| e.player == player).collect()
    }

    /// Record a learned talent level.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::ZeroQuantity`] if `points` is zero.
    pub fn record_learn(
        &mut self,
        player: PlayerId,
        talent: &TalentId,
        branch: &BranchId,
        points: u32,
        level: u32,
    ) -> Result<&TalentTransaction, LedgerError> {
        self.append(
            player,
            TransactionKind::Learn,
            Some((talent, branch)),
            points,
            Some(level),
        )
    }

    /// Record a full reset refunding `points`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::ZeroQuantity`] if `points` is zero.
    pub fn record_reset(
        &mut self,
        player: PlayerId,
        points: u32,
    ) -> Result<&TalentTransaction, LedgerError> {
        self.append(player, TransactionKind::Reset, None, points, None)
    }

    /// Record points granted to the player's account.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::ZeroQuantity`] if `points` is zero.
    pub fn record_grant(
        &mut self,
        player: PlayerId,
        points: u32,
    ) -> Result<&TalentTransaction, LedgerError> {
        self.append(player, TransactionKind::Grant, None, points, None)
    }

    /// Record an external debit the internal ledger failed to match.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::ZeroQuantity`] if `points` is zero.
    pub fn record_desync(
        &mut self,
        player: PlayerId,
        talent: &TalentId,
        branch: &BranchId,
        points: u32,
    ) -> Result<&TalentTransaction, LedgerError> {
        self.append(
            player,
            TransactionKind::Desync,
            Some((talent, branch)),
            points,
            None,
        )
    }

    /// Drop every entry for `player` and return how many were dropped.
    ///
    /// Entries for other players keep their order.
    pub fn remove_player(&mut self, player: PlayerId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.player != player);
        before.saturating_sub(self.entries.len())
    }

    /// Net points a player has invested according to this journal.
    ///
    /// Learns count positive and resets negative. Grants and desyncs move
    /// no points into talents and are ignored.
    pub fn net_points_spent(&self, player: PlayerId) -> i64 {
        self.entries
            .iter()
            .filter(|e| e.player == player)
            .fold(0_i64, |net, e| match e.kind {
                TransactionKind::Learn => net.saturating_add(i64::from(e.points)),
                TransactionKind::Reset => net.saturating_sub(i64::from(e.points)),
                TransactionKind::Grant | TransactionKind::Desync => net,
            })
    }

    fn append(
        &mut self,
        player: PlayerId,
        kind: TransactionKind,
        target: Option<(&TalentId, &BranchId)>,
        points: u32,
        resulting_level: Option<u32>,
    ) -> Result<&TalentTransaction, LedgerError> {
        if points == 0 {
            return Err(LedgerError::ZeroQuantity);
        }

        self.entries.push(TalentTransaction {
            id: TransactionId::new(),
            player,
            kind,
            talent: target.map(|(t, _)| t.clone()),
            branch: target.map(|(_, b)| b.clone()),
            points,
            resulting_level,
            created_at: Utc::now(),
        });

        self.entries.last().ok_or(LedgerError::InternalError(
            "failed to retrieve entry after append",
        ))
    }
}
