//! Shared type definitions for the Ascend talent progression engine.
//!
//! Every crate in the workspace speaks in these types. Records that the
//! presentation layer consumes are exported to `TypeScript` via `ts-rs`.
//!
//! # Modules
//!
//! - [`ids`] -- UUID wrappers for runtime entities and string keys for
//!   authored content (talents, branches)
//! - [`enums`] -- Talent kinds, prerequisite modes, talent states, journal kinds
//! - [`structs`] -- Prerequisites, branch summaries, persisted records, journal entries

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{PrerequisiteMode, TalentKind, TalentState, TransactionKind};
pub use ids::{BranchId, PlayerId, TalentId, TransactionId};
pub use structs::{BranchSummary, PlayerTalentRecord, Prerequisite, TalentTransaction};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation for the presentation layer.

    #[test]
    fn export_bindings() {
        // Files are written to `bindings/` relative to the crate root.
        use ts_rs::TS;

        // IDs
        let _ = crate::ids::PlayerId::export_all();
        let _ = crate::ids::TransactionId::export_all();
        let _ = crate::ids::TalentId::export_all();
        let _ = crate::ids::BranchId::export_all();

        // Enums
        let _ = crate::enums::TalentKind::export_all();
        let _ = crate::enums::PrerequisiteMode::export_all();
        let _ = crate::enums::TalentState::export_all();
        let _ = crate::enums::TransactionKind::export_all();

        // Structs
        let _ = crate::structs::Prerequisite::export_all();
        let _ = crate::structs::BranchSummary::export_all();
        let _ = crate::structs::PlayerTalentRecord::export_all();
        let _ = crate::structs::TalentTransaction::export_all();
    }

    #[test]
    fn record_round_trips_through_json() {
        use crate::{BranchId, PlayerTalentRecord, TalentId};

        let mut record = PlayerTalentRecord {
            available_points: 3,
            total_points_spent: 4,
            ..PlayerTalentRecord::default()
        };
        record.talents.insert(TalentId::from("cleave"), 2);
        record.branch_points.insert(BranchId::from("combat"), 4);
        record.branch_points.insert(BranchId::from("arcane"), 0);

        let json = serde_json::to_string(&record).unwrap_or_default();
        let back: Option<PlayerTalentRecord> = serde_json::from_str(&json).ok();
        assert_eq!(back, Some(record));
    }
}
