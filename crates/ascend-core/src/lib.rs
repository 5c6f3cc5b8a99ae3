//! The Ascend talent progression engine.
//!
//! Players earn talent points in an external account and invest them into
//! talents organized in per-branch trees. This crate ties the pieces
//! together: it loads the talent catalog, keeps one ledger per player in
//! sync with the account, enforces prerequisites and level caps, and
//! persists ledgers when players leave.
//!
//! # Modules
//!
//! - [`engine`] -- [`ProgressionEngine`]: learn, reset, grant, queries
//! - [`catalog`] -- [`TalentCatalog`] and the [`LoadReport`] from loading it
//! - [`account`] -- the [`PointAccount`] trait and an in-memory account
//! - [`store`] -- the [`LedgerStore`] trait and an in-memory store
//! - [`config`] -- [`EngineConfig`] loaded from YAML
//! - [`telemetry`] -- tracing subscriber setup
//! - [`error`] -- [`ProgressionError`] and collaborator errors
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//!
//! use ascend_core::{EngineConfig, InMemoryLedgerStore, InMemoryPointAccount, ProgressionEngine};
//! use ascend_tree::TalentDefinition;
//! use ascend_types::{PlayerId, TalentKind};
//!
//! let engine = ProgressionEngine::new(
//!     EngineConfig::default(),
//!     Arc::new(InMemoryPointAccount::new()),
//!     Arc::new(InMemoryLedgerStore::new()),
//! );
//! let toughness = TalentDefinition::builder("toughness", "combat", TalentKind::AttributeBonus)
//!     .max_level(3)
//!     .build();
//! if let Ok(def) = toughness {
//!     engine.load(vec![def]).ok();
//! }
//!
//! let player = PlayerId::new();
//! engine.grant_points(player, 2).ok();
//! assert!(engine.learn(player, "toughness").is_ok());
//! assert_eq!(engine.get_ledger(player).map(|l| l.available_points()).ok(), Some(1));
//! ```

pub mod account;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod store;
pub mod telemetry;

// Re-export primary types at crate root.
pub use account::{InMemoryPointAccount, PointAccount};
pub use catalog::{LoadReport, TalentCatalog};
pub use config::{ConfigError, EngineConfig, LedgerConfig, LoggingConfig};
pub use engine::{LearnOutcome, ProgressionEngine, ResetOutcome};
pub use error::{AccountError, ProgressionError, StoreError};
pub use store::{InMemoryLedgerStore, LedgerStore};
pub use telemetry::init_tracing;
