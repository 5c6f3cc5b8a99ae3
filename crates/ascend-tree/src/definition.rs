//! Talent definitions and their validating builder.
//!
//! A [`TalentDefinition`] is the immutable description of one learnable
//! node: what it costs, how far it goes, what it requires, and how its
//! effects scale. Definitions are only obtainable through
//! [`TalentDefinitionBuilder`], which rejects malformed input before it can
//! reach a tree.
//!
//! # Effect Formula
//!
//! ```text
//! effect_value(effect, level) = base[effect] + scaling[effect] * level
//! ```
//!
//! Effects without a base entry resolve to zero at every level. Values use
//! [`Decimal`] so designer-authored coefficients such as `0.05` stay exact.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use ascend_types::{BranchId, Prerequisite, PrerequisiteMode, TalentId, TalentKind};

use crate::error::TreeError;

/// Lowest tier a talent may occupy.
pub const MIN_TIER: u8 = 1;

/// Highest tier a talent may occupy.
pub const MAX_TIER: u8 = 5;

// ---------------------------------------------------------------------------
// TalentDefinition
// ---------------------------------------------------------------------------

/// Immutable description of one learnable talent node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TalentDefinition {
    id: TalentId,
    name: String,
    description: String,
    kind: TalentKind,
    branch: BranchId,
    tier: u8,
    max_level: u32,
    points_per_level: u32,
    layout_slot: i32,
    prerequisites: Vec<Prerequisite>,
    prerequisite_mode: PrerequisiteMode,
    base_effects: BTreeMap<String, Decimal>,
    scaling: BTreeMap<String, Decimal>,
}

impl TalentDefinition {
    /// Start building a definition for `id` in `branch`.
    pub fn builder(
        id: impl Into<TalentId>,
        branch: impl Into<BranchId>,
        kind: TalentKind,
    ) -> TalentDefinitionBuilder {
        TalentDefinitionBuilder::new(id, branch, kind)
    }

    /// The talent's unique id.
    pub const fn id(&self) -> &TalentId {
        &self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// How the talent manifests in play.
    pub const fn kind(&self) -> TalentKind {
        self.kind
    }

    /// The branch this talent belongs to.
    pub const fn branch(&self) -> &BranchId {
        &self.branch
    }

    /// Presentation tier, in `MIN_TIER..=MAX_TIER`.
    pub const fn tier(&self) -> u8 {
        self.tier
    }

    /// Highest learnable level (at least 1).
    pub const fn max_level(&self) -> u32 {
        self.max_level
    }

    /// Points charged for each level (at least 1).
    pub const fn points_per_level(&self) -> u32 {
        self.points_per_level
    }

    /// Opaque slot consumed by the presentation layer.
    pub const fn layout_slot(&self) -> i32 {
        self.layout_slot
    }

    /// Declared prerequisites.
    pub fn prerequisites(&self) -> &[Prerequisite] {
        &self.prerequisites
    }

    /// How the prerequisites are combined.
    pub const fn prerequisite_mode(&self) -> PrerequisiteMode {
        self.prerequisite_mode
    }

    /// Names of every effect with a base value.
    pub fn effect_names(&self) -> impl Iterator<Item = &str> {
        self.base_effects.keys().map(String::as_str)
    }

    /// Compute the value of `effect` at `level`.
    ///
    /// Returns zero for effects without a base value. Saturates instead of
    /// overflowing.
    pub fn effect_value(&self, effect: &str, level: u32) -> Decimal {
        let Some(base) = self.base_effects.get(effect) else {
            return Decimal::ZERO;
        };
        let coefficient = self.scaling.get(effect).copied().unwrap_or(Decimal::ZERO);
        base.saturating_add(coefficient.saturating_mul(Decimal::from(level)))
    }

    /// Total points invested in this talent at `level`.
    pub const fn total_cost(&self, level: u32) -> u32 {
        self.points_per_level.saturating_mul(level)
    }

    /// Check whether a player with `current_levels` may hold this talent at
    /// `target_level`.
    ///
    /// Fails when `target_level` exceeds the cap; otherwise defers to the
    /// prerequisite mode.
    pub fn is_eligible(&self, current_levels: &BTreeMap<TalentId, u32>, target_level: u32) -> bool {
        if target_level > self.max_level {
            return false;
        }
        match self.prerequisite_mode {
            PrerequisiteMode::All => self
                .prerequisites
                .iter()
                .all(|p| prerequisite_met(p, current_levels)),
            PrerequisiteMode::Any => {
                self.prerequisites.is_empty()
                    || self
                        .prerequisites
                        .iter()
                        .any(|p| prerequisite_met(p, current_levels))
            }
        }
    }

    /// Return the prerequisites not met by `current_levels`.
    pub fn unmet_prerequisites(
        &self,
        current_levels: &BTreeMap<TalentId, u32>,
    ) -> Vec<Prerequisite> {
        self.prerequisites
            .iter()
            .filter(|p| !prerequisite_met(p, current_levels))
            .cloned()
            .collect()
    }
}

fn prerequisite_met(prerequisite: &Prerequisite, current_levels: &BTreeMap<TalentId, u32>) -> bool {
    current_levels
        .get(&prerequisite.talent)
        .copied()
        .unwrap_or(0)
        >= prerequisite.level
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for validated [`TalentDefinition`] values.
///
/// # Examples
///
/// ```
/// use ascend_tree::TalentDefinition;
/// use ascend_types::TalentKind;
/// use rust_decimal::Decimal;
///
/// let cleave = TalentDefinition::builder("cleave", "combat", TalentKind::Active)
///     .name("Cleave")
///     .tier(2)
///     .max_level(3)
///     .points_per_level(2)
///     .prerequisite("power_strike", 1)
///     .effect("damage", Decimal::new(10, 0), Decimal::new(5, 0))
///     .build();
///
/// assert!(cleave.is_ok());
/// ```
#[derive(Debug)]
pub struct TalentDefinitionBuilder {
    id: TalentId,
    branch: BranchId,
    kind: TalentKind,
    name: Option<String>,
    description: String,
    tier: u8,
    max_level: u32,
    points_per_level: u32,
    layout_slot: i32,
    prerequisites: Vec<Prerequisite>,
    prerequisite_mode: PrerequisiteMode,
    base_effects: BTreeMap<String, Decimal>,
    scaling: BTreeMap<String, Decimal>,
}

impl TalentDefinitionBuilder {
    /// Start a builder with tier 1, max level 1, cost 1, and slot 0.
    pub fn new(id: impl Into<TalentId>, branch: impl Into<BranchId>, kind: TalentKind) -> Self {
        Self {
            id: id.into(),
            branch: branch.into(),
            kind,
            name: None,
            description: String::new(),
            tier: MIN_TIER,
            max_level: 1,
            points_per_level: 1,
            layout_slot: 0,
            prerequisites: Vec::new(),
            prerequisite_mode: PrerequisiteMode::All,
            base_effects: BTreeMap::new(),
            scaling: BTreeMap::new(),
        }
    }

    /// Set the display name (defaults to the id).
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the display description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the presentation tier.
    #[must_use]
    pub const fn tier(mut self, tier: u8) -> Self {
        self.tier = tier;
        self
    }

    /// Set the level cap.
    #[must_use]
    pub const fn max_level(mut self, max_level: u32) -> Self {
        self.max_level = max_level;
        self
    }

    /// Set the per-level cost.
    #[must_use]
    pub const fn points_per_level(mut self, points: u32) -> Self {
        self.points_per_level = points;
        self
    }

    /// Set the presentation layout slot.
    #[must_use]
    pub const fn layout_slot(mut self, slot: i32) -> Self {
        self.layout_slot = slot;
        self
    }

    /// Require `talent` at `level` or higher.
    #[must_use]
    pub fn prerequisite(mut self, talent: impl Into<TalentId>, level: u32) -> Self {
        self.prerequisites.push(Prerequisite::new(talent, level));
        self
    }

    /// Set how prerequisites are combined.
    #[must_use]
    pub const fn prerequisite_mode(mut self, mode: PrerequisiteMode) -> Self {
        self.prerequisite_mode = mode;
        self
    }

    /// Declare an effect with a base value and a per-level coefficient.
    #[must_use]
    pub fn effect(mut self, effect: impl Into<String>, base: Decimal, per_level: Decimal) -> Self {
        let effect = effect.into();
        self.scaling.insert(effect.clone(), per_level);
        self.base_effects.insert(effect, base);
        self
    }

    /// Validate inputs and produce a [`TalentDefinition`].
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidDefinition`] when the id or branch is
    /// empty, the tier is outside `MIN_TIER..=MAX_TIER`, the level cap or
    /// cost is zero, a prerequisite requires level 0, names the talent
    /// itself, or appears twice.
    pub fn build(self) -> Result<TalentDefinition, TreeError> {
        let invalid = |reason: String| TreeError::InvalidDefinition {
            talent: self.id.clone(),
            reason,
        };

        if self.id.is_empty() {
            return Err(invalid(String::from("id must not be empty")));
        }
        if self.branch.is_empty() {
            return Err(invalid(String::from("branch must not be empty")));
        }
        if !(MIN_TIER..=MAX_TIER).contains(&self.tier) {
            return Err(invalid(format!(
                "tier {} outside {MIN_TIER}..={MAX_TIER}",
                self.tier
            )));
        }
        if self.max_level == 0 {
            return Err(invalid(String::from("max level must be at least 1")));
        }
        if self.points_per_level == 0 {
            return Err(invalid(String::from("points per level must be at least 1")));
        }

        let mut seen = std::collections::BTreeSet::new();
        for prerequisite in &self.prerequisites {
            if prerequisite.talent == self.id {
                return Err(invalid(String::from("talent cannot require itself")));
            }
            if prerequisite.level == 0 {
                return Err(invalid(format!(
                    "prerequisite {} must require level 1 or higher",
                    prerequisite.talent
                )));
            }
            if !seen.insert(&prerequisite.talent) {
                return Err(invalid(format!(
                    "prerequisite {} listed more than once",
                    prerequisite.talent
                )));
            }
        }

        let name = self.name.clone().unwrap_or_else(|| self.id.to_string());

        Ok(TalentDefinition {
            id: self.id,
            name,
            description: self.description,
            kind: self.kind,
            branch: self.branch,
            tier: self.tier,
            max_level: self.max_level,
            points_per_level: self.points_per_level,
            layout_slot: self.layout_slot,
            prerequisites: self.prerequisites,
            prerequisite_mode: self.prerequisite_mode,
            base_effects: self.base_effects,
            scaling: self.scaling,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn levels(pairs: &[(&str, u32)]) -> BTreeMap<TalentId, u32> {
        pairs
            .iter()
            .map(|(id, level)| (TalentId::from(*id), *level))
            .collect()
    }

    fn fireball() -> TalentDefinition {
        TalentDefinition::builder("fireball", "arcane", TalentKind::Active)
            .max_level(5)
            .points_per_level(2)
            .effect("damage", dec!(20), dec!(4.5))
            .build()
            .unwrap()
    }

    // -----------------------------------------------------------------------
    // Effects and cost
    // -----------------------------------------------------------------------

    #[test]
    fn effect_scales_linearly() {
        let def = fireball();
        assert_eq!(def.effect_value("damage", 0), dec!(20));
        assert_eq!(def.effect_value("damage", 1), dec!(24.5));
        assert_eq!(def.effect_value("damage", 4), dec!(38));
    }

    #[test]
    fn unknown_effect_is_zero_at_every_level() {
        let def = fireball();
        assert_eq!(def.effect_value("healing", 0), Decimal::ZERO);
        assert_eq!(def.effect_value("healing", 5), Decimal::ZERO);
    }

    #[test]
    fn total_cost_is_monotonic() {
        let def = fireball();
        assert_eq!(def.total_cost(0), 0);
        assert_eq!(def.total_cost(1), 2);
        assert_eq!(def.total_cost(5), 10);
        assert!(def.total_cost(3) <= def.total_cost(4));
    }

    #[test]
    fn name_defaults_to_id() {
        assert_eq!(fireball().name(), "fireball");
    }

    // -----------------------------------------------------------------------
    // Eligibility
    // -----------------------------------------------------------------------

    #[test]
    fn target_above_cap_is_ineligible() {
        let def = fireball();
        assert!(def.is_eligible(&BTreeMap::new(), 5));
        assert!(!def.is_eligible(&BTreeMap::new(), 6));
    }

    #[test]
    fn all_mode_requires_every_prerequisite() {
        let def = TalentDefinition::builder("meteor", "arcane", TalentKind::Active)
            .prerequisite("fireball", 3)
            .prerequisite("focus", 1)
            .build()
            .unwrap();

        assert!(!def.is_eligible(&levels(&[("fireball", 3)]), 1));
        assert!(!def.is_eligible(&levels(&[("fireball", 2), ("focus", 1)]), 1));
        assert!(def.is_eligible(&levels(&[("fireball", 3), ("focus", 1)]), 1));
    }

    #[test]
    fn any_mode_requires_one_prerequisite() {
        let def = TalentDefinition::builder("meteor", "arcane", TalentKind::Active)
            .prerequisite("fireball", 3)
            .prerequisite("focus", 1)
            .prerequisite_mode(PrerequisiteMode::Any)
            .build()
            .unwrap();

        assert!(!def.is_eligible(&BTreeMap::new(), 1));
        assert!(def.is_eligible(&levels(&[("focus", 1)]), 1));
    }

    #[test]
    fn any_mode_without_prerequisites_is_satisfied() {
        let def = TalentDefinition::builder("spark", "arcane", TalentKind::Passive)
            .prerequisite_mode(PrerequisiteMode::Any)
            .build()
            .unwrap();
        assert!(def.is_eligible(&BTreeMap::new(), 1));
    }

    #[test]
    fn unmet_prerequisites_lists_only_missing() {
        let def = TalentDefinition::builder("meteor", "arcane", TalentKind::Active)
            .prerequisite("fireball", 3)
            .prerequisite("focus", 1)
            .build()
            .unwrap();
        let unmet = def.unmet_prerequisites(&levels(&[("focus", 2)]));
        assert_eq!(unmet, vec![Prerequisite::new("fireball", 3)]);
    }

    // -----------------------------------------------------------------------
    // Builder validation
    // -----------------------------------------------------------------------

    #[test]
    fn rejects_tier_out_of_range() {
        let low = TalentDefinition::builder("a", "b", TalentKind::Passive).tier(0).build();
        let high = TalentDefinition::builder("a", "b", TalentKind::Passive).tier(6).build();
        assert!(matches!(low, Err(TreeError::InvalidDefinition { .. })));
        assert!(matches!(high, Err(TreeError::InvalidDefinition { .. })));
    }

    #[test]
    fn rejects_zero_cap_and_cost() {
        let cap = TalentDefinition::builder("a", "b", TalentKind::Passive).max_level(0).build();
        let cost = TalentDefinition::builder("a", "b", TalentKind::Passive)
            .points_per_level(0)
            .build();
        assert!(cap.is_err());
        assert!(cost.is_err());
    }

    #[test]
    fn rejects_empty_identifiers() {
        assert!(TalentDefinition::builder("", "b", TalentKind::Passive).build().is_err());
        assert!(TalentDefinition::builder("a", "", TalentKind::Passive).build().is_err());
    }

    #[test]
    fn rejects_bad_prerequisites() {
        let own = TalentDefinition::builder("a", "b", TalentKind::Passive)
            .prerequisite("a", 1)
            .build();
        let zero = TalentDefinition::builder("a", "b", TalentKind::Passive)
            .prerequisite("c", 0)
            .build();
        let twice = TalentDefinition::builder("a", "b", TalentKind::Passive)
            .prerequisite("c", 1)
            .prerequisite("c", 2)
            .build();
        assert!(own.is_err());
        assert!(zero.is_err());
        assert!(twice.is_err());
    }
}
