//! The loaded talent catalog: one [`TalentTree`] per branch plus an index
//! from talent id to branch.
//!
//! A catalog is built in one pass from a list of definitions and never
//! mutated afterwards. Reloading builds a new catalog and swaps it in.

use std::collections::BTreeMap;

use ascend_tree::{TalentDefinition, TalentTree, TreeError, validate};
use ascend_types::{BranchId, TalentId};
use tracing::warn;

/// Outcome of building a catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Number of talents that made it into the catalog.
    pub loaded: usize,
    /// Number of branches in the catalog, including empty configured ones.
    pub branches: usize,
    /// Definitions that were rejected, one error per dropped talent.
    pub skipped: Vec<TreeError>,
}

impl LoadReport {
    /// Whether every definition loaded.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }

    /// Ids of the rejected talents, in rejection order.
    pub fn skipped_ids(&self) -> Vec<&TalentId> {
        self.skipped.iter().map(TreeError::talent).collect()
    }
}

/// All loaded talent trees.
#[derive(Debug, Clone, Default)]
pub struct TalentCatalog {
    trees: BTreeMap<BranchId, TalentTree>,
    index: BTreeMap<TalentId, BranchId>,
}

impl TalentCatalog {
    /// Build a catalog from `definitions`.
    ///
    /// Every branch in `branches` gets a tree even if no definition names
    /// it. Definitions whose id is already taken, in any branch, are
    /// skipped. The prerequisite graph is then validated per tree: talents
    /// no learn order can unlock, because of unknown prerequisites or a
    /// cycle, are dropped. An ANY talent survives as long as one of its
    /// alternatives can be unlocked. Validation repeats until nothing more
    /// is dropped so that dependents of dropped talents go too.
    pub fn build(
        branches: &[BranchId],
        definitions: impl IntoIterator<Item = TalentDefinition>,
    ) -> (Self, LoadReport) {
        let mut catalog = Self::default();
        let mut report = LoadReport::default();

        for branch in branches {
            catalog
                .trees
                .entry(branch.clone())
                .or_insert_with(|| TalentTree::new(branch.clone()));
        }

        for definition in definitions {
            if let Err(err) = catalog.register(definition) {
                warn!(talent = %err.talent(), error = %err, "Skipping talent definition");
                report.skipped.push(err);
            }
        }

        loop {
            let errors: Vec<TreeError> = catalog.trees.values().flat_map(validate).collect();
            if errors.is_empty() {
                break;
            }
            for err in errors {
                if catalog.remove(err.talent()).is_some() {
                    warn!(talent = %err.talent(), error = %err, "Dropping unlearnable talent");
                    report.skipped.push(err);
                }
            }
        }

        report.loaded = catalog.index.len();
        report.branches = catalog.trees.len();
        (catalog, report)
    }

    fn register(&mut self, definition: TalentDefinition) -> Result<(), TreeError> {
        if self.index.contains_key(definition.id()) {
            return Err(TreeError::DuplicateId(definition.id().clone()));
        }
        let id = definition.id().clone();
        let branch = definition.branch().clone();
        self.trees
            .entry(branch.clone())
            .or_insert_with(|| TalentTree::new(branch.clone()))
            .register(definition)?;
        self.index.insert(id, branch);
        Ok(())
    }

    fn remove(&mut self, id: &TalentId) -> Option<TalentDefinition> {
        let branch = self.index.remove(id)?;
        self.trees.get_mut(&branch)?.remove(id.as_str())
    }

    /// Number of talents across all branches.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the catalog holds no talents.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Branch ids in order.
    pub fn branches(&self) -> impl Iterator<Item = &BranchId> {
        self.trees.keys()
    }

    /// All trees in branch order.
    pub fn trees(&self) -> impl Iterator<Item = &TalentTree> {
        self.trees.values()
    }

    /// The tree for `branch`.
    pub fn tree(&self, branch: &str) -> Option<&TalentTree> {
        self.trees.get(branch)
    }

    /// The tree containing talent `id`.
    pub fn tree_of(&self, id: &str) -> Option<&TalentTree> {
        self.index.get(id).and_then(|branch| self.trees.get(branch))
    }

    /// Look up a talent in whichever branch defines it.
    pub fn find(&self, id: &str) -> Option<&TalentDefinition> {
        self.tree_of(id).and_then(|tree| tree.get(id).ok())
    }

    /// Per-level cost of `id`, or `None` if it is not loaded.
    pub fn cost_of(&self, id: &TalentId) -> Option<u32> {
        self.find(id.as_str()).map(TalentDefinition::points_per_level)
    }
}
