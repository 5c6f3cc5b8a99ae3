//! Error types for talent definitions and trees.
//!
//! Every variant names the talent it concerns so load-time failures can be
//! reported per definition without aborting the rest of the batch.

use ascend_types::{BranchId, TalentId};

/// Errors raised while constructing, registering, or validating talents.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// A definition declared a different branch than the tree it was
    /// registered into.
    #[error("talent {talent} declares branch {actual} but was registered into branch {expected}")]
    BranchMismatch {
        /// The offending talent.
        talent: TalentId,
        /// The branch of the receiving tree.
        expected: BranchId,
        /// The branch the definition declared.
        actual: BranchId,
    },

    /// A talent with this id is already registered.
    #[error("duplicate talent id: {0}")]
    DuplicateId(TalentId),

    /// No talent with this id exists in the tree.
    #[error("talent not found: {0}")]
    NotFound(TalentId),

    /// The definition's fields violate a construction rule.
    #[error("invalid definition for talent {talent}: {reason}")]
    InvalidDefinition {
        /// The offending talent (may be empty if the id itself was missing).
        talent: TalentId,
        /// Description of the violated rule.
        reason: String,
    },

    /// A prerequisite names a talent that is not in the same tree.
    #[error("talent {talent} requires unknown talent {missing}")]
    UnknownPrerequisite {
        /// The talent declaring the prerequisite.
        talent: TalentId,
        /// The prerequisite id that could not be resolved.
        missing: TalentId,
    },

    /// The talent lies on a prerequisite cycle and can never be learned.
    #[error("talent {talent} is on a prerequisite cycle: {}", format_cycle(.cycle))]
    PrerequisiteCycle {
        /// The talent on the cycle.
        talent: TalentId,
        /// The cycle, starting and ending at `talent`.
        cycle: Vec<TalentId>,
    },
}

impl TreeError {
    /// Return the talent this error concerns.
    pub const fn talent(&self) -> &TalentId {
        match self {
            Self::BranchMismatch { talent, .. }
            | Self::InvalidDefinition { talent, .. }
            | Self::UnknownPrerequisite { talent, .. }
            | Self::PrerequisiteCycle { talent, .. } => talent,
            Self::DuplicateId(talent) | Self::NotFound(talent) => talent,
        }
    }
}

fn format_cycle(cycle: &[TalentId]) -> String {
    cycle
        .iter()
        .map(TalentId::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_message_lists_path() {
        let err = TreeError::PrerequisiteCycle {
            talent: TalentId::from("a"),
            cycle: vec![TalentId::from("a"), TalentId::from("b"), TalentId::from("a")],
        };
        assert_eq!(
            err.to_string(),
            "talent a is on a prerequisite cycle: a -> b -> a"
        );
    }

    #[test]
    fn talent_accessor_covers_tuple_variants() {
        let err = TreeError::DuplicateId(TalentId::from("cleave"));
        assert_eq!(err.talent().as_str(), "cleave");
    }
}
