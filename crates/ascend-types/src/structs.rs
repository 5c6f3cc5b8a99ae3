//! Serializable records shared across the workspace.
//!
//! These are plain data carriers: the invariants that relate their fields
//! are enforced by the crates that produce them (`ascend-tree`,
//! `ascend-ledger`), not here.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::TransactionKind;
use crate::ids::{BranchId, PlayerId, TalentId, TransactionId};

// ---------------------------------------------------------------------------
// Prerequisite
// ---------------------------------------------------------------------------

/// A requirement that another talent in the same tree reach a level.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Prerequisite {
    /// The talent that must be learned.
    pub talent: TalentId,
    /// The minimum level the required talent must have.
    pub level: u32,
}

impl Prerequisite {
    /// Create a prerequisite on `talent` at `level`.
    pub fn new(talent: impl Into<TalentId>, level: u32) -> Self {
        Self {
            talent: talent.into(),
            level,
        }
    }
}

// ---------------------------------------------------------------------------
// Branch summary
// ---------------------------------------------------------------------------

/// Aggregate view of one player's progress in one branch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct BranchSummary {
    /// Number of talents in the branch with a nonzero level.
    pub learned_count: u32,
    /// Number of talents defined in the branch.
    pub total_count: u32,
    /// Points invested in the branch's talents.
    pub points_invested: u32,
}

// ---------------------------------------------------------------------------
// Persisted player record
// ---------------------------------------------------------------------------

/// The persisted form of a player's talent ledger.
///
/// `available_points` is a redundant cache; the authoritative balance
/// lives in the external point account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PlayerTalentRecord {
    /// Cached unspent point balance.
    pub available_points: u32,
    /// Total points currently invested across all talents.
    pub total_points_spent: u32,
    /// Talent id to level. Zero levels are omitted.
    pub talents: BTreeMap<TalentId, u32>,
    /// Branch id to points invested. Every known branch is present.
    pub branch_points: BTreeMap<BranchId, u32>,
}

// ---------------------------------------------------------------------------
// Journal transaction
// ---------------------------------------------------------------------------

/// One entry in the append-only talent journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TalentTransaction {
    /// Unique transaction identifier.
    pub id: TransactionId,
    /// The player whose points moved.
    pub player: PlayerId,
    /// What kind of movement this was.
    pub kind: TransactionKind,
    /// The talent involved, for learns and desyncs.
    pub talent: Option<TalentId>,
    /// The branch involved, for learns and desyncs.
    pub branch: Option<BranchId>,
    /// Number of points moved (always positive).
    pub points: u32,
    /// The talent level after a learn.
    pub resulting_level: Option<u32>,
    /// Real-world timestamp.
    pub created_at: DateTime<Utc>,
}
