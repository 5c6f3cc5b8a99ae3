//! Error types for the progression engine.
//!
//! [`ProgressionError`] is what every engine operation returns. Each variant
//! carries a human-readable message through `Display` and a stable
//! [`reason_code`](ProgressionError::reason_code) the presentation layer can
//! switch on without parsing text.

use ascend_ledger::LedgerError;
use ascend_types::{BranchId, PlayerId, Prerequisite, TalentId};

/// Failure reported by an external [`PointAccount`](crate::PointAccount).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountError {
    /// Crediting would overflow the stored balance.
    #[error("point balance overflow for player {player}")]
    Overflow {
        /// The player whose balance would overflow.
        player: PlayerId,
    },

    /// The account backend refused or failed the operation.
    #[error("point account unavailable: {reason}")]
    Unavailable {
        /// Description of the backend failure.
        reason: String,
    },
}

/// Failure reported by a [`LedgerStore`](crate::LedgerStore).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A record could not be encoded or decoded.
    #[error("ledger record serialization failed: {source}")]
    Serialization {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// The backing storage failed.
    #[error("ledger store backend failed: {reason}")]
    Backend {
        /// Description of the backend failure.
        reason: String,
    },
}

/// Errors returned by [`ProgressionEngine`](crate::ProgressionEngine)
/// operations.
#[derive(Debug, thiserror::Error)]
pub enum ProgressionError {
    /// No loaded branch defines the talent.
    #[error("talent {talent} does not exist")]
    UnknownTalent {
        /// The requested talent id.
        talent: TalentId,
    },

    /// The talent is already at its maximum level.
    #[error("talent {talent} is already at its maximum level {max_level}")]
    MaxLevelReached {
        /// The requested talent id.
        talent: TalentId,
        /// The talent's maximum level.
        max_level: u32,
    },

    /// The talent's prerequisites are not satisfied.
    #[error("talent {talent} requires {}", format_unmet(.unmet))]
    PrerequisiteNotMet {
        /// The requested talent id.
        talent: TalentId,
        /// Prerequisites the player has not yet reached.
        unmet: Vec<Prerequisite>,
    },

    /// The player's point account could not cover the cost. Nothing changed.
    #[error("talent {talent} costs {cost} points but only {available} are available")]
    InsufficientPoints {
        /// The requested talent id.
        talent: TalentId,
        /// Points required for the next level.
        cost: u32,
        /// Points available when the request was made.
        available: u32,
    },

    /// The external account was debited but the internal ledger rejected
    /// the matching update.
    #[error("ledger desync on talent {talent} in branch {branch}: {source}")]
    LedgerDesync {
        /// The talent being learned.
        talent: TalentId,
        /// The talent's branch.
        branch: BranchId,
        /// Points already taken from the account.
        debited: u32,
        /// The ledger failure.
        source: LedgerError,
    },

    /// The ledger was cleared but the account refused the refund credit.
    #[error("refund of {refund} points failed after reset: {source}")]
    RefundFailed {
        /// Points that should have been credited.
        refund: u32,
        /// The account failure.
        source: AccountError,
    },

    /// A direct account operation failed.
    #[error("point account error: {source}")]
    Account {
        /// The underlying account error.
        #[from]
        source: AccountError,
    },

    /// Persisting or restoring a ledger record failed.
    #[error("ledger store error: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: StoreError,
    },

    /// A ledger operation failed outside a learn transaction.
    #[error("ledger error: {source}")]
    Ledger {
        /// The underlying ledger error.
        #[from]
        source: LedgerError,
    },

    /// A lock guarding engine state was poisoned by a panicking thread.
    #[error("engine state poisoned: {context}")]
    StatePoisoned {
        /// Which piece of state was poisoned.
        context: &'static str,
    },
}

impl ProgressionError {
    /// Stable machine-readable reason for the failure.
    pub const fn reason_code(&self) -> &'static str {
        match self {
            Self::UnknownTalent { .. } => "unknown_talent",
            Self::MaxLevelReached { .. } => "max_level_reached",
            Self::PrerequisiteNotMet { .. } => "prerequisite_not_met",
            Self::InsufficientPoints { .. } => "insufficient_points",
            Self::LedgerDesync { .. } => "ledger_desync",
            Self::RefundFailed { .. } => "refund_failed",
            Self::Account { .. } => "account_error",
            Self::Store { .. } => "store_error",
            Self::Ledger { .. } => "ledger_error",
            Self::StatePoisoned { .. } => "state_poisoned",
        }
    }

    /// Whether the failure is an ordinary player-facing rejection.
    ///
    /// Rejections leave all state untouched. Everything else indicates a
    /// fault in the engine or one of its collaborators.
    pub const fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::UnknownTalent { .. }
                | Self::MaxLevelReached { .. }
                | Self::PrerequisiteNotMet { .. }
                | Self::InsufficientPoints { .. }
        )
    }
}

fn format_unmet(unmet: &[Prerequisite]) -> String {
    unmet
        .iter()
        .map(|p| format!("{} at level {}", p.talent, p.level))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prerequisite_message_lists_each_requirement() {
        let err = ProgressionError::PrerequisiteNotMet {
            talent: TalentId::from("whirlwind"),
            unmet: vec![Prerequisite::new("cleave", 2), Prerequisite::new("toughness", 1)],
        };
        assert_eq!(
            err.to_string(),
            "talent whirlwind requires cleave at level 2, toughness at level 1"
        );
        assert_eq!(err.reason_code(), "prerequisite_not_met");
        assert!(err.is_rejection());
    }

    #[test]
    fn faults_are_not_rejections() {
        let err = ProgressionError::LedgerDesync {
            talent: TalentId::from("cleave"),
            branch: BranchId::from("combat"),
            debited: 2,
            source: LedgerError::InsufficientPoints {
                requested: 2,
                available: 0,
            },
        };
        assert_eq!(err.reason_code(), "ledger_desync");
        assert!(!err.is_rejection());
        assert!(err.to_string().contains("cleave"));
    }

    #[test]
    fn account_errors_convert() {
        let err: ProgressionError = AccountError::Unavailable {
            reason: String::from("offline"),
        }
        .into();
        assert_eq!(err.reason_code(), "account_error");
    }
}
