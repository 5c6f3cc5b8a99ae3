//! Enumeration types for the Ascend talent engine.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Talent kind
// ---------------------------------------------------------------------------

/// How a learned talent manifests in play.
///
/// The engine computes effect values the same way for every kind; the
/// distinction only matters to downstream consumers (stat aggregation,
/// trigger dispatch, ability bars).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum TalentKind {
    /// Triggered effect that fires on its own under some condition.
    Passive,
    /// Ability the player activates explicitly.
    Active,
    /// Flat or scaling bonus folded into character attributes.
    AttributeBonus,
}

// ---------------------------------------------------------------------------
// Prerequisite mode
// ---------------------------------------------------------------------------

/// How a talent's prerequisite list is combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum PrerequisiteMode {
    /// Every prerequisite must be met.
    #[default]
    All,
    /// At least one prerequisite must be met. A talent with no
    /// prerequisites is always satisfied.
    Any,
}

// ---------------------------------------------------------------------------
// Talent state
// ---------------------------------------------------------------------------

/// Progress of one player on one talent node.
///
/// The only forward transition is a learn; the only backward transition is
/// a full reset, which returns every node to `Locked` or `Learnable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(tag = "state")]
#[ts(export, export_to = "bindings/")]
pub enum TalentState {
    /// Level 0 and prerequisites are not met.
    Locked,
    /// Level 0 and prerequisites are met.
    Learnable,
    /// Learned, but below the maximum level.
    Partial {
        /// Current level, in `1..max_level`.
        level: u32,
    },
    /// At the maximum level.
    Maxed {
        /// Current (maximum) level.
        level: u32,
    },
}

impl TalentState {
    /// Return the level this state represents (0 for unlearned states).
    pub const fn level(self) -> u32 {
        match self {
            Self::Locked | Self::Learnable => 0,
            Self::Partial { level } | Self::Maxed { level } => level,
        }
    }
}

// ---------------------------------------------------------------------------
// Journal transaction kind
// ---------------------------------------------------------------------------

/// Category of a talent journal transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum TransactionKind {
    /// Points moved from the account into a talent level.
    Learn,
    /// Every invested point returned to the account.
    Reset,
    /// Points granted to the account from outside the talent system.
    Grant,
    /// The account was debited but the internal ledger refused the learn.
    Desync,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_prerequisite_mode_is_all() {
        assert_eq!(PrerequisiteMode::default(), PrerequisiteMode::All);
    }

    #[test]
    fn state_levels() {
        assert_eq!(TalentState::Locked.level(), 0);
        assert_eq!(TalentState::Learnable.level(), 0);
        assert_eq!(TalentState::Partial { level: 2 }.level(), 2);
        assert_eq!(TalentState::Maxed { level: 5 }.level(), 5);
    }

    #[test]
    fn state_serializes_with_tag() {
        let json = serde_json::to_string(&TalentState::Partial { level: 1 }).ok();
        assert_eq!(json.as_deref(), Some(r#"{"state":"Partial","level":1}"#));
    }
}
