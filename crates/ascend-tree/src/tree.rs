//! Per-branch talent trees.
//!
//! A [`TalentTree`] exclusively owns the definitions of one branch. It
//! answers eligibility and aggregation questions against a player's level
//! map without ever mutating that map: the player's investment lives in
//! the ledger, the tree only describes what is possible.

use std::collections::BTreeMap;

use ascend_types::{BranchId, BranchSummary, TalentId, TalentState};

use crate::definition::TalentDefinition;
use crate::error::TreeError;

/// Slot reported for talents the tree does not know.
pub const UNKNOWN_SLOT: i32 = -1;

/// The talent definitions of one branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TalentTree {
    /// Branch id, fixed at construction.
    branch: BranchId,
    /// Definitions keyed by talent id.
    talents: BTreeMap<TalentId, TalentDefinition>,
}

impl TalentTree {
    /// Create an empty tree for `branch`.
    pub fn new(branch: impl Into<BranchId>) -> Self {
        Self {
            branch: branch.into(),
            talents: BTreeMap::new(),
        }
    }

    /// The branch this tree holds.
    pub const fn branch(&self) -> &BranchId {
        &self.branch
    }

    /// Number of talents in the tree.
    pub fn len(&self) -> usize {
        self.talents.len()
    }

    /// Whether the tree holds no talents.
    pub fn is_empty(&self) -> bool {
        self.talents.is_empty()
    }

    /// Iterate the definitions in id order.
    pub fn iter(&self) -> impl Iterator<Item = &TalentDefinition> {
        self.talents.values()
    }

    /// Whether a talent with `id` is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.talents.contains_key(id)
    }

    /// Add a definition to the tree.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::BranchMismatch`] if the definition belongs to a
    /// different branch, or [`TreeError::DuplicateId`] if its id is taken.
    pub fn register(&mut self, definition: TalentDefinition) -> Result<(), TreeError> {
        if definition.branch() != &self.branch {
            return Err(TreeError::BranchMismatch {
                talent: definition.id().clone(),
                expected: self.branch.clone(),
                actual: definition.branch().clone(),
            });
        }
        if self.talents.contains_key(definition.id()) {
            return Err(TreeError::DuplicateId(definition.id().clone()));
        }
        self.talents.insert(definition.id().clone(), definition);
        Ok(())
    }

    /// Remove a definition, returning it if it was present.
    ///
    /// Used by load-time validation to drop talents that can never be
    /// learned.
    pub fn remove(&mut self, id: &str) -> Option<TalentDefinition> {
        self.talents.remove(id)
    }

    /// Look up a definition.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NotFound`] if `id` is not in the tree.
    pub fn get(&self, id: &str) -> Result<&TalentDefinition, TreeError> {
        self.talents
            .get(id)
            .ok_or_else(|| TreeError::NotFound(TalentId::from(id)))
    }

    /// Check whether the next level of `id` is eligible.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NotFound`] if `id` is not in the tree.
    pub fn can_learn(
        &self,
        id: &str,
        current_levels: &BTreeMap<TalentId, u32>,
    ) -> Result<bool, TreeError> {
        let definition = self.get(id)?;
        let current = current_levels.get(id).copied().unwrap_or(0);
        Ok(current
            .checked_add(1)
            .is_some_and(|target| definition.is_eligible(current_levels, target)))
    }

    /// Classify a player's progress on `id`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NotFound`] if `id` is not in the tree.
    pub fn talent_state(
        &self,
        id: &str,
        current_levels: &BTreeMap<TalentId, u32>,
    ) -> Result<TalentState, TreeError> {
        let definition = self.get(id)?;
        let level = current_levels.get(id).copied().unwrap_or(0);
        let state = if level >= definition.max_level() {
            TalentState::Maxed { level }
        } else if level > 0 {
            TalentState::Partial { level }
        } else if definition.is_eligible(current_levels, 1) {
            TalentState::Learnable
        } else {
            TalentState::Locked
        };
        Ok(state)
    }

    /// Return the ids whose next level is currently eligible.
    pub fn learnable(&self, current_levels: &BTreeMap<TalentId, u32>) -> Vec<&TalentId> {
        self.talents
            .iter()
            .filter(|(id, definition)| {
                let current = current_levels.get(*id).copied().unwrap_or(0);
                current
                    .checked_add(1)
                    .is_some_and(|target| definition.is_eligible(current_levels, target))
            })
            .map(|(id, _)| id)
            .collect()
    }

    /// Aggregate a player's progress across this branch.
    pub fn branch_summary(&self, current_levels: &BTreeMap<TalentId, u32>) -> BranchSummary {
        let mut summary = BranchSummary {
            total_count: u32::try_from(self.talents.len()).unwrap_or(u32::MAX),
            ..BranchSummary::default()
        };
        for (id, definition) in &self.talents {
            let level = current_levels.get(id).copied().unwrap_or(0);
            if level > 0 {
                summary.learned_count = summary.learned_count.saturating_add(1);
                summary.points_invested = summary
                    .points_invested
                    .saturating_add(definition.total_cost(level));
            }
        }
        summary
    }

    /// Return the configured layout slot of `id`, or [`UNKNOWN_SLOT`].
    pub fn layout_slot(&self, id: &str) -> i32 {
        self.talents
            .get(id)
            .map_or(UNKNOWN_SLOT, TalentDefinition::layout_slot)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ascend_types::TalentKind;

    use super::*;

    /// A (max 3, cost 1), B (max 1, cost 2, needs A >= 2).
    fn two_node_tree() -> TalentTree {
        let mut tree = TalentTree::new("combat");
        tree.register(
            TalentDefinition::builder("a", "combat", TalentKind::AttributeBonus)
                .max_level(3)
                .layout_slot(11)
                .build()
                .unwrap(),
        )
        .unwrap();
        tree.register(
            TalentDefinition::builder("b", "combat", TalentKind::Active)
                .tier(2)
                .points_per_level(2)
                .prerequisite("a", 2)
                .layout_slot(21)
                .build()
                .unwrap(),
        )
        .unwrap();
        tree
    }

    fn levels(pairs: &[(&str, u32)]) -> BTreeMap<TalentId, u32> {
        pairs
            .iter()
            .map(|(id, level)| (TalentId::from(*id), *level))
            .collect()
    }

    #[test]
    fn register_rejects_branch_mismatch() {
        let mut tree = TalentTree::new("combat");
        let def = TalentDefinition::builder("fireball", "arcane", TalentKind::Active)
            .build()
            .unwrap();
        let err = tree.register(def).unwrap_err();
        assert!(matches!(err, TreeError::BranchMismatch { .. }));
        assert!(tree.is_empty());
    }

    #[test]
    fn register_rejects_duplicates() {
        let mut tree = two_node_tree();
        let dup = TalentDefinition::builder("a", "combat", TalentKind::Passive)
            .build()
            .unwrap();
        assert_eq!(
            tree.register(dup),
            Err(TreeError::DuplicateId(TalentId::from("a")))
        );
        assert_eq!(tree.len(), 2);
        // The original definition survives.
        assert_eq!(tree.get("a").unwrap().max_level(), 3);
    }

    #[test]
    fn get_unknown_is_not_found() {
        let tree = two_node_tree();
        assert_eq!(
            tree.get("missing").unwrap_err(),
            TreeError::NotFound(TalentId::from("missing"))
        );
    }

    #[test]
    fn can_learn_follows_prerequisites_and_cap() {
        let tree = two_node_tree();
        assert!(tree.can_learn("a", &levels(&[])).unwrap());
        assert!(!tree.can_learn("b", &levels(&[("a", 1)])).unwrap());
        assert!(tree.can_learn("b", &levels(&[("a", 2)])).unwrap());
        assert!(!tree.can_learn("a", &levels(&[("a", 3)])).unwrap());
        assert!(tree.can_learn("missing", &levels(&[])).is_err());
    }

    #[test]
    fn talent_states() {
        let tree = two_node_tree();
        assert_eq!(tree.talent_state("a", &levels(&[])).unwrap(), TalentState::Learnable);
        assert_eq!(tree.talent_state("b", &levels(&[])).unwrap(), TalentState::Locked);
        assert_eq!(
            tree.talent_state("a", &levels(&[("a", 2)])).unwrap(),
            TalentState::Partial { level: 2 }
        );
        assert_eq!(
            tree.talent_state("a", &levels(&[("a", 3)])).unwrap(),
            TalentState::Maxed { level: 3 }
        );
    }

    #[test]
    fn learnable_lists_eligible_next_levels() {
        let tree = two_node_tree();
        let none: Vec<&str> = tree
            .learnable(&levels(&[]))
            .into_iter()
            .map(TalentId::as_str)
            .collect();
        assert_eq!(none, vec!["a"]);

        let both: Vec<&str> = tree
            .learnable(&levels(&[("a", 2)]))
            .into_iter()
            .map(TalentId::as_str)
            .collect();
        assert_eq!(both, vec!["a", "b"]);

        let capped: Vec<&str> = tree
            .learnable(&levels(&[("a", 3), ("b", 1)]))
            .into_iter()
            .map(TalentId::as_str)
            .collect();
        assert!(capped.is_empty());
    }

    #[test]
    fn branch_summary_aggregates() {
        let tree = two_node_tree();
        let summary = tree.branch_summary(&levels(&[("a", 2), ("b", 1), ("elsewhere", 9)]));
        assert_eq!(
            summary,
            BranchSummary {
                learned_count: 2,
                total_count: 2,
                points_invested: 4,
            }
        );
    }

    #[test]
    fn layout_slot_or_unknown() {
        let tree = two_node_tree();
        assert_eq!(tree.layout_slot("a"), 11);
        assert_eq!(tree.layout_slot("b"), 21);
        assert_eq!(tree.layout_slot("missing"), UNKNOWN_SLOT);
    }
}
