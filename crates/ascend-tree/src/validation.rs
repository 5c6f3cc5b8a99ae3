//! Load-time validation of the prerequisite graph.
//!
//! A talent is sound when some learn order starting from the empty level
//! map unlocks it. ALL talents need every prerequisite unlocked first; ANY
//! talents need one of them, so an ANY talent may list a missing talent or
//! sit on a loop as long as another alternative is reachable. Talents that
//! can never be unlocked are reported with the defect that blocks them: a
//! prerequisite the tree does not contain, or a chain of prerequisites
//! that loops back on itself.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use ascend_types::{PrerequisiteMode, TalentId};

use crate::definition::TalentDefinition;
use crate::error::TreeError;
use crate::tree::TalentTree;

/// Find every talent in `tree` that no learn order can unlock, and why.
///
/// Unknown prerequisites are reported first. An ALL talent gets one error
/// per missing id; an ANY talent only when every alternative is missing.
/// Each unreachable talent that lies on a cycle of unreachable talents is
/// then reported once with one cycle through it. Talents that are blocked
/// only because they depend on a reported talent get no error of their
/// own; they surface once the reported ones are removed. An empty result
/// means every talent is reachable.
pub fn validate(tree: &TalentTree) -> Vec<TreeError> {
    let reachable = reachable(tree);
    let blocked: Vec<&TalentDefinition> = tree
        .iter()
        .filter(|definition| !reachable.contains(definition.id()))
        .collect();
    let mut errors = Vec::new();

    for definition in &blocked {
        let prerequisites = definition.prerequisites();
        let missing: Vec<&TalentId> = prerequisites
            .iter()
            .map(|prerequisite| &prerequisite.talent)
            .filter(|talent| !tree.contains(talent.as_str()))
            .collect();
        let all_missing = missing.len() == prerequisites.len();
        if definition.prerequisite_mode() == PrerequisiteMode::Any && !all_missing {
            continue;
        }
        errors.extend(missing.into_iter().map(|missing| TreeError::UnknownPrerequisite {
            talent: definition.id().clone(),
            missing: missing.clone(),
        }));
    }

    for definition in &blocked {
        if let Some(cycle) = cycle_through(tree, definition.id(), &reachable) {
            errors.push(TreeError::PrerequisiteCycle {
                talent: definition.id().clone(),
                cycle,
            });
        }
    }

    errors
}

/// Talents unlockable from the empty level map, found by repeatedly
/// unlocking whatever the current set satisfies until nothing changes.
fn reachable(tree: &TalentTree) -> BTreeSet<TalentId> {
    let mut reached: BTreeSet<TalentId> = BTreeSet::new();
    loop {
        let before = reached.len();
        for definition in tree.iter() {
            if reached.contains(definition.id()) {
                continue;
            }
            let prerequisites = definition.prerequisites();
            let unlocked = match definition.prerequisite_mode() {
                PrerequisiteMode::All => prerequisites
                    .iter()
                    .all(|prerequisite| reached.contains(&prerequisite.talent)),
                PrerequisiteMode::Any => {
                    prerequisites.is_empty()
                        || prerequisites
                            .iter()
                            .any(|prerequisite| reached.contains(&prerequisite.talent))
                }
            };
            if unlocked {
                reached.insert(definition.id().clone());
            }
        }
        if reached.len() == before {
            return reached;
        }
    }
}

/// Breadth-first search along prerequisite edges from `start`, returning a
/// cycle `start -> ... -> start` if one exists. Edges into reachable
/// talents are skipped: a loop through an unlockable alternative does not
/// block anything.
fn cycle_through(
    tree: &TalentTree,
    start: &TalentId,
    reachable: &BTreeSet<TalentId>,
) -> Option<Vec<TalentId>> {
    // parent[n] = the talent whose prerequisite list led to n.
    let mut parent: BTreeMap<&TalentId, &TalentId> = BTreeMap::new();
    let mut queue: VecDeque<&TalentId> = VecDeque::new();
    queue.push_back(start);

    while let Some(node) = queue.pop_front() {
        let Ok(definition) = tree.get(node.as_str()) else {
            continue;
        };
        for prerequisite in definition.prerequisites() {
            let next = &prerequisite.talent;
            if reachable.contains(next) || parent.contains_key(next) {
                continue;
            }
            parent.insert(next, node);
            if next == start {
                return Some(reconstruct(&parent, start));
            }
            queue.push_back(next);
        }
    }

    None
}

fn reconstruct(parent: &BTreeMap<&TalentId, &TalentId>, start: &TalentId) -> Vec<TalentId> {
    let mut reversed = Vec::new();
    let mut current = parent.get(start).copied();
    // Each step moves one edge closer to `start`; the bound guards
    // against a malformed parent map.
    for _ in 0..=parent.len() {
        match current {
            Some(node) if node != start => {
                reversed.push(node.clone());
                current = parent.get(node).copied();
            }
            _ => break,
        }
    }

    let mut cycle = Vec::with_capacity(reversed.len().saturating_add(2));
    cycle.push(start.clone());
    cycle.extend(reversed.into_iter().rev());
    cycle.push(start.clone());
    cycle
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use ascend_types::TalentKind;

    use super::*;

    fn tree_of(edges: &[(&str, &[&str])]) -> TalentTree {
        let all: Vec<(&str, PrerequisiteMode, &[&str])> = edges
            .iter()
            .map(|(id, requires)| (*id, PrerequisiteMode::All, *requires))
            .collect();
        tree_with_modes(&all)
    }

    fn tree_with_modes(edges: &[(&str, PrerequisiteMode, &[&str])]) -> TalentTree {
        let mut tree = TalentTree::new("arcane");
        for (id, mode, requires) in edges {
            let mut builder = TalentDefinition::builder(*id, "arcane", TalentKind::Passive)
                .prerequisite_mode(*mode);
            for r in *requires {
                builder = builder.prerequisite(*r, 1);
            }
            tree.register(builder.build().unwrap()).unwrap();
        }
        tree
    }

    #[test]
    fn acyclic_tree_is_valid() {
        let tree = tree_of(&[("a", &[]), ("b", &["a"]), ("c", &["a", "b"])]);
        assert!(validate(&tree).is_empty());
    }

    #[test]
    fn unknown_prerequisite_reported() {
        let tree = tree_of(&[("a", &[]), ("b", &["ghost"])]);
        assert_eq!(
            validate(&tree),
            vec![TreeError::UnknownPrerequisite {
                talent: TalentId::from("b"),
                missing: TalentId::from("ghost"),
            }]
        );
    }

    #[test]
    fn two_node_cycle_reports_both() {
        let tree = tree_of(&[("a", &["b"]), ("b", &["a"]), ("c", &[])]);
        let errors = validate(&tree);
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors.first(),
            Some(&TreeError::PrerequisiteCycle {
                talent: TalentId::from("a"),
                cycle: vec![TalentId::from("a"), TalentId::from("b"), TalentId::from("a")],
            })
        );
        assert_eq!(errors.get(1).map(TreeError::talent), Some(&TalentId::from("b")));
    }

    #[test]
    fn longer_cycle_path_is_ordered() {
        let tree = tree_of(&[("a", &["b"]), ("b", &["c"]), ("c", &["a"])]);
        let errors = validate(&tree);
        assert_eq!(errors.len(), 3);
        let Some(TreeError::PrerequisiteCycle { cycle, .. }) = errors.first() else {
            panic!("expected a cycle error");
        };
        let path: Vec<&str> = cycle.iter().map(TalentId::as_str).collect();
        assert_eq!(path, vec!["a", "b", "c", "a"]);
    }

    #[test]
    fn dependent_of_cycle_is_not_itself_cyclic() {
        // d needs a, a <-> b loop. Only a and b are on the cycle.
        let tree = tree_of(&[("a", &["b"]), ("b", &["a"]), ("d", &["a"])]);
        let cyclic: Vec<String> = validate(&tree)
            .iter()
            .map(|e| e.talent().to_string())
            .collect();
        assert_eq!(cyclic, vec!["a", "b"]);
    }

    #[test]
    fn any_talent_tolerates_one_unknown_alternative() {
        let tree = tree_with_modes(&[
            ("c", PrerequisiteMode::All, &[]),
            ("x", PrerequisiteMode::Any, &["ghost", "c"]),
        ]);
        assert!(validate(&tree).is_empty());
    }

    #[test]
    fn any_talent_with_every_alternative_unknown_is_reported() {
        let tree = tree_with_modes(&[("x", PrerequisiteMode::Any, &["ghost", "phantom"])]);
        let missing: Vec<String> = validate(&tree)
            .iter()
            .map(|e| match e {
                TreeError::UnknownPrerequisite { missing, .. } => missing.to_string(),
                other => panic!("unexpected error {other:?}"),
            })
            .collect();
        assert_eq!(missing, vec!["ghost", "phantom"]);
    }

    #[test]
    fn loop_with_a_reachable_way_in_is_valid() {
        // a needs b or c, b needs a. c unlocks a, which then unlocks b.
        let tree = tree_with_modes(&[
            ("c", PrerequisiteMode::All, &[]),
            ("a", PrerequisiteMode::Any, &["b", "c"]),
            ("b", PrerequisiteMode::All, &["a"]),
            ("x", PrerequisiteMode::Any, &["ghost", "c"]),
        ]);
        assert!(validate(&tree).is_empty());
    }

    #[test]
    fn any_loop_without_a_way_in_is_a_cycle() {
        let tree = tree_with_modes(&[
            ("a", PrerequisiteMode::Any, &["b", "ghost"]),
            ("b", PrerequisiteMode::All, &["a"]),
        ]);
        let errors = validate(&tree);
        assert_eq!(errors.len(), 2);
        assert!(
            errors
                .iter()
                .all(|e| matches!(e, TreeError::PrerequisiteCycle { .. }))
        );
    }
}
