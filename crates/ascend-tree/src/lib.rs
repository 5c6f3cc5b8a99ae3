//! Talent definitions and per-branch talent trees for the Ascend engine.
//!
//! This crate describes what a player *could* learn. It owns no player
//! state: every query takes the player's current level map by reference
//! and answers without side effects.
//!
//! # Modules
//!
//! - [`definition`] -- [`TalentDefinition`] and its validating
//!   [`TalentDefinitionBuilder`]
//! - [`tree`] -- [`TalentTree`]: registration, lookup, eligibility,
//!   branch aggregation, layout addressing
//! - [`validation`] -- unknown-prerequisite and cycle detection run at load
//! - [`error`] -- [`TreeError`]
//!
//! # Usage
//!
//! ```
//! use std::collections::BTreeMap;
//!
//! use ascend_tree::{TalentDefinition, TalentTree};
//! use ascend_types::{TalentId, TalentKind};
//!
//! let mut tree = TalentTree::new("combat");
//! let toughness = TalentDefinition::builder("toughness", "combat", TalentKind::AttributeBonus)
//!     .max_level(3)
//!     .build()
//!     .ok();
//! if let Some(def) = toughness {
//!     tree.register(def).ok();
//! }
//!
//! let levels: BTreeMap<TalentId, u32> = BTreeMap::new();
//! assert_eq!(tree.can_learn("toughness", &levels).ok(), Some(true));
//! ```

pub mod definition;
pub mod error;
pub mod tree;
pub mod validation;

// Re-export primary types at crate root.
pub use definition::{MAX_TIER, MIN_TIER, TalentDefinition, TalentDefinitionBuilder};
pub use error::TreeError;
pub use tree::{TalentTree, UNKNOWN_SLOT};
pub use validation::validate;
