//! The progression engine: learn, reset, and grant against per-player
//! ledgers kept in sync with an external point account.
//!
//! # Locking
//!
//! - The catalog sits behind an [`RwLock`]: read by every operation,
//!   written only by [`ProgressionEngine::load`].
//! - The ledger cache is a [`Mutex`] around a map of per-player handles. It
//!   is held only long enough to look up, insert, or remove a handle, and
//!   never while waiting on a player lock or calling the store.
//! - Each player's ledger has its own [`Mutex`], held for the whole of an
//!   operation including the account and store calls. A new player's slot
//!   is inserted empty and restored from the store under this lock, so a
//!   slow store only stalls that player. Operations for the same player
//!   are serialized; different players proceed in parallel.
//! - The journal [`Mutex`] is taken last, for single appends or reads.
//!
//! Locks are taken in the order catalog, player, journal.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard};

use ascend_ledger::conservation::{ConservationResult, verify_ledger};
use ascend_ledger::{LedgerError, PlayerLedger, TalentJournal};
use ascend_tree::{TalentDefinition, UNKNOWN_SLOT};
use ascend_types::{
    BranchId, BranchSummary, PlayerId, TalentId, TalentState, TalentTransaction,
};
use rust_decimal::Decimal;
use tracing::{debug, error, info, warn};

use crate::account::PointAccount;
use crate::catalog::{LoadReport, TalentCatalog};
use crate::config::EngineConfig;
use crate::error::ProgressionError;
use crate::store::LedgerStore;

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Result of a successful learn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LearnOutcome {
    /// The learned talent.
    pub talent: TalentId,
    /// The talent's branch.
    pub branch: BranchId,
    /// The talent's level after learning.
    pub level: u32,
    /// Points spent on this level.
    pub points_spent: u32,
    /// Points left in the account.
    pub available_points: u32,
    /// The talent's state after learning.
    pub state: TalentState,
}

/// Result of a successful reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    /// Invested points were returned to the account.
    Refunded(u32),
    /// Nothing was invested; nothing changed.
    NothingToRefund,
}

impl ResetOutcome {
    /// Points returned by the reset.
    pub const fn refunded(self) -> u32 {
        match self {
            Self::Refunded(points) => points,
            Self::NothingToRefund => 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Player slots
// ---------------------------------------------------------------------------

/// A cached ledger.
///
/// `loaded` stays false until the first operation restores the ledger from
/// the store. `evicted` is set when the player is unloaded or the restore
/// fails, so an operation that fetched the handle just before retries
/// against a fresh one instead of mutating a ledger nobody will save.
#[derive(Debug)]
struct PlayerSlot {
    ledger: PlayerLedger,
    loaded: bool,
    evicted: bool,
}

impl PlayerSlot {
    fn pending(branches: &[BranchId]) -> Self {
        Self {
            ledger: PlayerLedger::with_branches(branches.iter().cloned()),
            loaded: false,
            evicted: false,
        }
    }
}

type SlotHandle = Arc<Mutex<PlayerSlot>>;

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Talent progression for every player in one game instance.
pub struct ProgressionEngine {
    config: EngineConfig,
    account: Arc<dyn PointAccount>,
    store: Arc<dyn LedgerStore>,
    catalog: RwLock<TalentCatalog>,
    ledgers: Mutex<BTreeMap<PlayerId, SlotHandle>>,
    journal: Mutex<TalentJournal>,
}

impl std::fmt::Debug for ProgressionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressionEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ProgressionEngine {
    /// Create an engine with an empty catalog.
    ///
    /// Branches listed in `config.branches` exist from the start.
    pub fn new(
        config: EngineConfig,
        account: Arc<dyn PointAccount>,
        store: Arc<dyn LedgerStore>,
    ) -> Self {
        let (catalog, _) = TalentCatalog::build(&config.branches, Vec::new());
        Self {
            config,
            account,
            store,
            catalog: RwLock::new(catalog),
            ledgers: Mutex::new(BTreeMap::new()),
            journal: Mutex::new(TalentJournal::new()),
        }
    }

    /// The configuration the engine was built with.
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Replace the catalog with `definitions`.
    ///
    /// Rejected definitions are skipped and listed in the report; the rest
    /// load. Cached ledgers are kept and pick up new branches on their
    /// next access.
    pub fn load(
        &self,
        definitions: impl IntoIterator<Item = TalentDefinition>,
    ) -> Result<LoadReport, ProgressionError> {
        let (catalog, report) = TalentCatalog::build(&self.config.branches, definitions);
        *self
            .catalog
            .write()
            .map_err(|_poisoned| poisoned("talent catalog"))? = catalog;

        info!(
            loaded = report.loaded,
            branches = report.branches,
            skipped = report.skipped.len(),
            "Talent catalog loaded"
        );
        Ok(report)
    }

    // -----------------------------------------------------------------------
    // Catalog queries
    // -----------------------------------------------------------------------

    /// A copy of the definition for `talent`, if loaded.
    pub fn talent(&self, talent: &str) -> Result<Option<TalentDefinition>, ProgressionError> {
        Ok(self.read_catalog()?.find(talent).cloned())
    }

    /// The layout slot of `talent`, or [`UNKNOWN_SLOT`] if it is not loaded.
    pub fn layout_slot(&self, talent: &str) -> Result<i32, ProgressionError> {
        Ok(self
            .read_catalog()?
            .tree_of(talent)
            .map_or(UNKNOWN_SLOT, |tree| tree.layout_slot(talent)))
    }

    /// Ids of all loaded branches.
    pub fn branches(&self) -> Result<Vec<BranchId>, ProgressionError> {
        Ok(self.read_catalog()?.branches().cloned().collect())
    }

    // -----------------------------------------------------------------------
    // Ledger access
    // -----------------------------------------------------------------------

    /// A snapshot of the player's ledger, with available points refreshed
    /// from the account.
    pub fn get_ledger(&self, player: PlayerId) -> Result<PlayerLedger, ProgressionError> {
        let catalog = self.read_catalog()?;
        self.with_ledger(player, &catalog, |ledger| Ok(ledger.clone()))
    }

    /// Learn the next level of `talent` for `player`.
    ///
    /// Checks run in order: the talent exists, it is below its maximum
    /// level, its prerequisites are met, and the account covers the cost.
    /// A failed check changes nothing. Once the account is debited, a
    /// ledger failure is reported as [`ProgressionError::LedgerDesync`].
    pub fn learn(&self, player: PlayerId, talent: &str) -> Result<LearnOutcome, ProgressionError> {
        let catalog = self.read_catalog()?;
        let (Some(tree), Some(definition)) = (catalog.tree_of(talent), catalog.find(talent)) else {
            debug!(player = %player, talent, "Rejected learn of unknown talent");
            return Err(ProgressionError::UnknownTalent {
                talent: TalentId::from(talent),
            });
        };

        self.with_ledger(player, &catalog, |ledger| {
            let current = ledger.level_of(talent);
            if current >= definition.max_level() {
                debug!(player = %player, talent, level = current, "Rejected learn at max level");
                return Err(ProgressionError::MaxLevelReached {
                    talent: definition.id().clone(),
                    max_level: definition.max_level(),
                });
            }

            if !tree.can_learn(talent, ledger.talents()).unwrap_or(false) {
                debug!(player = %player, talent, "Rejected learn with unmet prerequisites");
                return Err(ProgressionError::PrerequisiteNotMet {
                    talent: definition.id().clone(),
                    unmet: definition.unmet_prerequisites(ledger.talents()),
                });
            }

            let cost = definition.points_per_level();
            if !self.account.debit(player, cost) {
                debug!(
                    player = %player,
                    talent,
                    points = cost,
                    "Rejected learn without enough points"
                );
                return Err(ProgressionError::InsufficientPoints {
                    talent: definition.id().clone(),
                    cost,
                    available: ledger.available_points(),
                });
            }

            let level = match ledger.learn(definition.id(), definition.branch(), cost) {
                Ok(level) => level,
                Err(source) => {
                    error!(
                        player = %player,
                        talent,
                        branch = %definition.branch(),
                        points = cost,
                        error = %source,
                        "LEDGER_DESYNC: account debited but ledger rejected the learn"
                    );
                    self.append_journal(|journal| {
                        journal
                            .record_desync(player, definition.id(), definition.branch(), cost)
                            .map(|_| ())
                    });
                    return Err(ProgressionError::LedgerDesync {
                        talent: definition.id().clone(),
                        branch: definition.branch().clone(),
                        debited: cost,
                        source,
                    });
                }
            };

            self.append_journal(|journal| {
                journal
                    .record_learn(player, definition.id(), definition.branch(), cost, level)
                    .map(|_| ())
            });
            self.check_invariants(player, ledger, &catalog);

            info!(
                player = %player,
                talent,
                branch = %definition.branch(),
                level,
                points = cost,
                "Talent learned"
            );

            let state = tree
                .talent_state(talent, ledger.talents())
                .unwrap_or(TalentState::Partial { level });
            Ok(LearnOutcome {
                talent: definition.id().clone(),
                branch: definition.branch().clone(),
                level,
                points_spent: cost,
                available_points: ledger.available_points(),
                state,
            })
        })
    }

    /// Refund every invested point and clear every level for `player`.
    ///
    /// The ledger is cleared first and the account credited second. If the
    /// credit fails the ledger stays cleared and
    /// [`ProgressionError::RefundFailed`] is returned.
    pub fn reset_all(&self, player: PlayerId) -> Result<ResetOutcome, ProgressionError> {
        let catalog = self.read_catalog()?;
        self.with_ledger(player, &catalog, |ledger| {
            let refund = ledger.reset_all()?;
            if refund == 0 {
                debug!(player = %player, "Reset with nothing invested");
                return Ok(ResetOutcome::NothingToRefund);
            }

            if let Err(source) = self.account.credit(player, refund) {
                error!(
                    player = %player,
                    points = refund,
                    error = %source,
                    "REFUND_FAILED: ledger cleared but account credit failed"
                );
                return Err(ProgressionError::RefundFailed { refund, source });
            }

            self.append_journal(|journal| journal.record_reset(player, refund).map(|_| ()));
            self.check_invariants(player, ledger, &catalog);
            info!(player = %player, points = refund, "Talents reset");
            Ok(ResetOutcome::Refunded(refund))
        })
    }

    /// Credit `points` to the player's account and return the new balance.
    pub fn grant_points(&self, player: PlayerId, points: u32) -> Result<u32, ProgressionError> {
        let catalog = self.read_catalog()?;
        self.with_ledger(player, &catalog, |ledger| {
            if points > 0 {
                self.account.credit(player, points)?;
                self.append_journal(|journal| journal.record_grant(player, points).map(|_| ()));
                info!(player = %player, points, "Talent points granted");
            }
            let balance = self.account.balance(player);
            ledger.sync_available(balance);
            Ok(balance)
        })
    }

    // -----------------------------------------------------------------------
    // Player queries
    // -----------------------------------------------------------------------

    /// The player's progress on `talent`.
    pub fn talent_state(
        &self,
        player: PlayerId,
        talent: &str,
    ) -> Result<TalentState, ProgressionError> {
        let catalog = self.read_catalog()?;
        let Some(tree) = catalog.tree_of(talent) else {
            return Err(ProgressionError::UnknownTalent {
                talent: TalentId::from(talent),
            });
        };
        self.with_ledger(player, &catalog, |ledger| {
            tree.talent_state(talent, ledger.talents())
                .map_err(|_not_found| ProgressionError::UnknownTalent {
                    talent: TalentId::from(talent),
                })
        })
    }

    /// Every talent whose next level the player could learn now, ignoring
    /// cost.
    pub fn learnable_talents(&self, player: PlayerId) -> Result<Vec<TalentId>, ProgressionError> {
        let catalog = self.read_catalog()?;
        self.with_ledger(player, &catalog, |ledger| {
            Ok(catalog
                .trees()
                .flat_map(|tree| tree.learnable(ledger.talents()))
                .cloned()
                .collect())
        })
    }

    /// The player's progress in `branch`. Unknown branches are empty.
    pub fn branch_summary(
        &self,
        player: PlayerId,
        branch: &str,
    ) -> Result<BranchSummary, ProgressionError> {
        let catalog = self.read_catalog()?;
        let Some(tree) = catalog.tree(branch) else {
            return Ok(BranchSummary::default());
        };
        self.with_ledger(player, &catalog, |ledger| Ok(tree.branch_summary(ledger.talents())))
    }

    /// The branch the player has invested most in, if any.
    pub fn main_specialization(
        &self,
        player: PlayerId,
    ) -> Result<Option<BranchId>, ProgressionError> {
        let catalog = self.read_catalog()?;
        self.with_ledger(player, &catalog, |ledger| {
            Ok(ledger.main_specialization().cloned())
        })
    }

    /// Sum of `effect` over every talent the player has learned.
    pub fn effect_total(
        &self,
        player: PlayerId,
        effect: &str,
    ) -> Result<Decimal, ProgressionError> {
        let catalog = self.read_catalog()?;
        self.with_ledger(player, &catalog, |ledger| {
            Ok(ledger
                .talents()
                .iter()
                .filter_map(|(id, &level)| {
                    catalog
                        .find(id.as_str())
                        .map(|definition| definition.effect_value(effect, level))
                })
                .fold(Decimal::ZERO, Decimal::saturating_add))
        })
    }

    /// Journal entries for `player` since they were last loaded, oldest
    /// first. Earlier entries were archived to the store on unload.
    pub fn journal_for(
        &self,
        player: PlayerId,
    ) -> Result<Vec<TalentTransaction>, ProgressionError> {
        Ok(self
            .lock_journal()?
            .entries_for(player)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Check the player's ledger against the loaded definitions.
    pub fn verify_player(&self, player: PlayerId) -> Result<ConservationResult, ProgressionError> {
        let catalog = self.read_catalog()?;
        self.with_ledger(player, &catalog, |ledger| {
            Ok(verify_ledger(ledger, |id| catalog.cost_of(id)))
        })
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Save the player's ledger, archive their journal entries to the
    /// store, and evict them from the cache.
    ///
    /// Returns `false` if the player was not cached. If saving or archiving
    /// fails the player stays cached and their journal is kept.
    pub fn unload_player(&self, player: PlayerId) -> Result<bool, ProgressionError> {
        let Some(handle) = self.lock_cache()?.get(&player).cloned() else {
            return Ok(false);
        };

        let mut slot = lock_slot(&handle)?;
        if slot.evicted {
            return Ok(false);
        }
        if slot.loaded {
            self.store.save(player, &slot.ledger.to_record())?;
            self.archive_journal(player)?;
        }
        slot.evicted = true;
        drop(slot);

        self.forget(player, &handle)?;
        debug!(player = %player, "Player ledger unloaded");
        Ok(true)
    }

    /// Save every cached ledger. Returns the number saved.
    pub fn save_all(&self) -> Result<usize, ProgressionError> {
        let handles: Vec<(PlayerId, SlotHandle)> = self
            .lock_cache()?
            .iter()
            .map(|(player, handle)| (*player, Arc::clone(handle)))
            .collect();

        let mut saved: usize = 0;
        for (player, handle) in handles {
            let slot = lock_slot(&handle)?;
            if slot.evicted || !slot.loaded {
                continue;
            }
            self.store.save(player, &slot.ledger.to_record())?;
            saved = saved.saturating_add(1);
        }
        info!(saved, "Saved player ledgers");
        Ok(saved)
    }

    /// Number of players with a cached ledger.
    pub fn cached_players(&self) -> Result<usize, ProgressionError> {
        Ok(self.lock_cache()?.len())
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn read_catalog(&self) -> Result<RwLockReadGuard<'_, TalentCatalog>, ProgressionError> {
        self.catalog
            .read()
            .map_err(|_poisoned| poisoned("talent catalog"))
    }

    fn lock_cache(
        &self,
    ) -> Result<MutexGuard<'_, BTreeMap<PlayerId, SlotHandle>>, ProgressionError> {
        self.ledgers
            .lock()
            .map_err(|_poisoned| poisoned("ledger cache"))
    }

    fn lock_journal(&self) -> Result<MutexGuard<'_, TalentJournal>, ProgressionError> {
        self.journal
            .lock()
            .map_err(|_poisoned| poisoned("talent journal"))
    }

    /// Run `op` on the player's ledger under the player lock, after
    /// restoring it on first access and refreshing branches and available
    /// points.
    fn with_ledger<T>(
        &self,
        player: PlayerId,
        catalog: &TalentCatalog,
        op: impl FnOnce(&mut PlayerLedger) -> Result<T, ProgressionError>,
    ) -> Result<T, ProgressionError> {
        loop {
            let handle = self.handle(player)?;
            let mut slot = lock_slot(&handle)?;
            if slot.evicted {
                drop(slot);
                self.forget(player, &handle)?;
                continue;
            }

            if !slot.loaded {
                match self.restore(player) {
                    Ok(ledger) => {
                        slot.ledger = ledger;
                        slot.loaded = true;
                    }
                    Err(err) => {
                        slot.evicted = true;
                        drop(slot);
                        self.forget(player, &handle)?;
                        return Err(err);
                    }
                }
            }

            let ledger = &mut slot.ledger;
            for branch in catalog.branches() {
                ledger.ensure_branch(branch);
            }
            ledger.sync_available(self.account.balance(player));
            return op(ledger);
        }
    }

    /// Fetch the player's handle, inserting an unloaded slot on first
    /// access.
    fn handle(&self, player: PlayerId) -> Result<SlotHandle, ProgressionError> {
        let mut ledgers = self.lock_cache()?;
        let handle = ledgers
            .entry(player)
            .or_insert_with(|| Arc::new(Mutex::new(PlayerSlot::pending(&self.config.branches))));
        Ok(Arc::clone(handle))
    }

    /// Drop `handle` from the cache unless it was already replaced.
    fn forget(&self, player: PlayerId, handle: &SlotHandle) -> Result<(), ProgressionError> {
        let mut ledgers = self.lock_cache()?;
        if ledgers
            .get(&player)
            .is_some_and(|cached| Arc::ptr_eq(cached, handle))
        {
            ledgers.remove(&player);
        }
        Ok(())
    }

    /// Load the player's saved ledger, or start an empty one.
    fn restore(&self, player: PlayerId) -> Result<PlayerLedger, ProgressionError> {
        let Some(record) = self.store.load(player)? else {
            debug!(player = %player, "Player ledger created");
            return Ok(PlayerLedger::with_branches(
                self.config.branches.iter().cloned(),
            ));
        };

        let mut ledger = PlayerLedger::from_record(record)?;
        for branch in &self.config.branches {
            ledger.ensure_branch(branch);
        }
        debug!(player = %player, "Player ledger restored");
        Ok(ledger)
    }

    /// Hand the player's journal entries to the store, then drop them from
    /// the in-memory journal. Called under the player lock, so no entry for
    /// this player can be appended in between.
    fn archive_journal(&self, player: PlayerId) -> Result<(), ProgressionError> {
        let entries: Vec<TalentTransaction> = self
            .lock_journal()?
            .entries_for(player)
            .into_iter()
            .cloned()
            .collect();
        if entries.is_empty() {
            return Ok(());
        }

        self.store.archive_journal(player, &entries)?;
        let archived = self.lock_journal()?.remove_player(player);
        debug!(player = %player, entries = archived, "Player journal archived");
        Ok(())
    }

    fn check_invariants(
        &self,
        player: PlayerId,
        ledger: &PlayerLedger,
        catalog: &TalentCatalog,
    ) {
        if !self.config.ledger.verify_after_mutation {
            return;
        }
        let result = verify_ledger(ledger, |id| catalog.cost_of(id));
        if let ConservationResult::Anomaly(anomaly) = result {
            error!(
                player = %player,
                total_points_spent = anomaly.total_points_spent,
                branch_total = anomaly.branch_total,
                talent_total = anomaly.talent_total,
                "{anomaly}"
            );
        }
    }

    /// Append to the journal. Failures are logged; the journal never
    /// blocks a committed operation.
    fn append_journal(&self, append: impl FnOnce(&mut TalentJournal) -> Result<(), LedgerError>) {
        match self.journal.lock() {
            Ok(mut journal) => {
                if let Err(err) = append(&mut journal) {
                    warn!(error = %err, "Failed to append talent journal entry");
                }
            }
            Err(_poisoned) => warn!("Talent journal lock poisoned; entry dropped"),
        }
    }
}

fn lock_slot(handle: &SlotHandle) -> Result<MutexGuard<'_, PlayerSlot>, ProgressionError> {
    handle.lock().map_err(|_poisoned| poisoned("player ledger"))
}

const fn poisoned(context: &'static str) -> ProgressionError {
    ProgressionError::StatePoisoned { context }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ascend_types::TalentKind;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::account::InMemoryPointAccount;
    use crate::store::InMemoryLedgerStore;

    fn engine_with(account: &Arc<InMemoryPointAccount>) -> ProgressionEngine {
        let engine = ProgressionEngine::new(
            EngineConfig::default(),
            Arc::clone(account) as Arc<dyn PointAccount>,
            Arc::new(InMemoryLedgerStore::new()),
        );
        let toughness = TalentDefinition::builder("toughness", "combat", TalentKind::AttributeBonus)
            .max_level(3)
            .layout_slot(4)
            .effect("max_health", dec!(10), dec!(5))
            .build()
            .unwrap();
        let cleave = TalentDefinition::builder("cleave", "combat", TalentKind::Active)
            .points_per_level(2)
            .prerequisite("toughness", 2)
            .effect("max_health", dec!(0), dec!(1))
            .build()
            .unwrap();
        engine.load(vec![toughness, cleave]).unwrap();
        engine
    }

    #[test]
    fn ledger_mirrors_account_balance() {
        let account = Arc::new(InMemoryPointAccount::new());
        let engine = engine_with(&account);
        let player = PlayerId::new();
        account.set_balance(player, 7);

        let ledger = engine.get_ledger(player).unwrap();
        assert_eq!(ledger.available_points(), 7);
        assert_eq!(ledger.branch_points("combat"), 0);
        assert_eq!(engine.cached_players().unwrap(), 1);
    }

    #[test]
    fn learn_reports_new_state() {
        let account = Arc::new(InMemoryPointAccount::new());
        let engine = engine_with(&account);
        let player = PlayerId::new();
        account.set_balance(player, 10);

        let outcome = engine.learn(player, "toughness").unwrap();
        assert_eq!(outcome.level, 1);
        assert_eq!(outcome.available_points, 9);
        assert_eq!(outcome.state, TalentState::Partial { level: 1 });
        assert_eq!(account.balance(player), 9);
    }

    #[test]
    fn unknown_talent_is_rejected() {
        let account = Arc::new(InMemoryPointAccount::new());
        let engine = engine_with(&account);
        let err = engine.learn(PlayerId::new(), "fireball").unwrap_err();
        assert_eq!(err.reason_code(), "unknown_talent");
    }

    #[test]
    fn effect_total_sums_learned_talents() {
        let account = Arc::new(InMemoryPointAccount::new());
        let engine = engine_with(&account);
        let player = PlayerId::new();
        account.set_balance(player, 10);
        engine.learn(player, "toughness").unwrap();
        engine.learn(player, "toughness").unwrap();
        engine.learn(player, "cleave").unwrap();

        // toughness: 10 + 5*2 = 20; cleave: 0 + 1*1 = 1.
        assert_eq!(engine.effect_total(player, "max_health").unwrap(), dec!(21));
        assert_eq!(engine.effect_total(player, "armor").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn layout_slot_falls_back_for_unknown_talents() {
        let account = Arc::new(InMemoryPointAccount::new());
        let engine = engine_with(&account);
        assert_eq!(engine.layout_slot("toughness").unwrap(), 4);
        assert_eq!(engine.layout_slot("nope").unwrap(), UNKNOWN_SLOT);
    }

    #[test]
    fn zero_grant_only_reports_balance() {
        let account = Arc::new(InMemoryPointAccount::new());
        let engine = engine_with(&account);
        let player = PlayerId::new();
        account.set_balance(player, 3);
        assert_eq!(engine.grant_points(player, 0).unwrap(), 3);
        assert!(engine.journal_for(player).unwrap().is_empty());
    }

    #[test]
    fn reset_outcome_refunded_amount() {
        assert_eq!(ResetOutcome::Refunded(7).refunded(), 7);
        assert_eq!(ResetOutcome::NothingToRefund.refunded(), 0);
    }
}
