//! Per-player talent point ledger for the Ascend engine.
//!
//! Every talent point a player owns is either *available* or *invested*.
//! Points move from available to invested only by learning a talent level,
//! and move back only by a full reset. Nothing in this crate creates or
//! destroys points except [`PlayerLedger::credit`], which mirrors grants
//! made to the external point account.
//!
//! # Architecture
//!
//! - [`ledger`] -- The [`PlayerLedger`] struct: balance, levels, branch totals.
//! - [`journal`] -- The [`TalentJournal`]: append-only log of point movements.
//! - [`conservation`] -- Invariant verification and anomaly reporting.
//!
//! # Conservation Law
//!
//! For every ledger at every point in time:
//!
//! ```text
//! total_points_spent == sum(branch_points)
//! total_points_spent == sum(level[t] * points_per_level[t])
//! ```
//!
//! A violation produces a [`LedgerAnomaly`]. The ledger never panics; it
//! returns errors.
//!
//! # Usage
//!
//! ```
//! use ascend_ledger::PlayerLedger;
//! use ascend_ledger::conservation::{verify_ledger, ConservationResult};
//! use ascend_types::{BranchId, TalentId};
//!
//! let combat = BranchId::from("combat");
//! let mut ledger = PlayerLedger::with_branches([combat.clone()]);
//! ledger.credit(5).ok();
//!
//! let cleave = TalentId::from("cleave");
//! assert_eq!(ledger.learn(&cleave, &combat, 2).ok(), Some(1));
//! assert_eq!(ledger.available_points(), 3);
//!
//! let result = verify_ledger(&ledger, |_| Some(2));
//! assert_eq!(result, ConservationResult::Balanced);
//! ```

pub mod conservation;
pub mod journal;
pub mod ledger;

// Re-export primary types at crate root.
pub use conservation::ConservationResult;
pub use journal::TalentJournal;
pub use ledger::PlayerLedger;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when mutating a ledger or journal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// The available balance does not cover the requested amount.
    #[error("insufficient points: requested {requested} but only {available} available")]
    InsufficientPoints {
        /// Points the operation needed.
        requested: u32,
        /// Points available at the time of the request.
        available: u32,
    },

    /// A counter would overflow.
    #[error("arithmetic overflow in ledger: {context}")]
    ArithmeticOverflow {
        /// Description of what was being computed.
        context: String,
    },

    /// Journal entries must move at least one point.
    #[error("journal entry must move a non-zero number of points")]
    ZeroQuantity,

    /// An internal error that should not occur in normal operation.
    #[error("internal ledger error: {0}")]
    InternalError(&'static str),

    /// A persisted record does not satisfy the ledger invariants.
    #[error("corrupt ledger record: {reason}")]
    CorruptRecord {
        /// Description of the violated invariant.
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// Anomaly type
// ---------------------------------------------------------------------------

/// A conservation law violation detected in a player's ledger.
///
/// Carries the three totals that must agree so the log line explains which
/// side drifted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerAnomaly {
    /// The ledger's maintained `total_points_spent`.
    pub total_points_spent: u32,
    /// Sum of all branch investments.
    pub branch_total: u64,
    /// Sum of `level * points_per_level` over learned talents.
    pub talent_total: u64,
    /// Human-readable description of the anomaly.
    pub message: String,
}

impl core::fmt::Display for LedgerAnomaly {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.message)
    }
}
