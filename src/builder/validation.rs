//! Structural validation of a state table.
//!
//! Uses Stillwater's `Validation` so a single build reports every broken
//! reference in the table, not just the first one.

use crate::builder::error::HierarchyViolation;
use crate::builder::rule::Rule;
use crate::builder::table::{StateNode, StateTable};
use crate::core::{get_path, Event, State};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

type Check = Validation<(), NonEmptyVec<HierarchyViolation>>;

/// Validate every node of `table`, accumulating all violations.
pub fn validate_table<S, E, D, P>(table: &StateTable<S, E, D, P>, max_depth: usize) -> Check
where
    S: State,
    E: Event,
{
    let mut checks: Vec<Check> = vec![check_initial_state(table)];

    for (index, node) in table.nodes.iter().enumerate() {
        checks.push(check_unique(table, index, node));
        checks.push(check_parent(table, node));
        checks.push(check_initial_substate(table, node));
        checks.push(check_depth(table, node, max_depth));

        for rule in &node.rules {
            checks.push(check_target(table, node, rule));
        }
    }

    // Accumulate ALL failures using all_vec
    Validation::all_vec(checks).map(|_| ())
}

fn fail_if(condition: bool, violation: impl FnOnce() -> HierarchyViolation) -> Check {
    if condition {
        Validation::fail(violation())
    } else {
        Validation::success(())
    }
}

fn check_initial_state<S: State, E, D, P>(table: &StateTable<S, E, D, P>) -> Check {
    let initial = &table.initial;

    if !table.contains(initial) {
        return Validation::fail(HierarchyViolation::UnknownInitialState {
            state: initial.name().to_string(),
        });
    }

    match table.parent_of(initial) {
        Some(parent) => Validation::fail(HierarchyViolation::InitialStateHasParent {
            state: initial.name().to_string(),
            parent: parent.name().to_string(),
        }),
        None => Validation::success(()),
    }
}

fn check_unique<S: State, E, D, P>(
    table: &StateTable<S, E, D, P>,
    index: usize,
    node: &StateNode<S, E, D, P>,
) -> Check {
    let declared_before = table.nodes[..index]
        .iter()
        .any(|other| other.state == node.state);

    fail_if(declared_before, || HierarchyViolation::DuplicateState {
        state: node.state.name().to_string(),
    })
}

fn check_parent<S: State, E, D, P>(
    table: &StateTable<S, E, D, P>,
    node: &StateNode<S, E, D, P>,
) -> Check {
    match &node.parent {
        Some(parent) => fail_if(!table.contains(parent), || {
            HierarchyViolation::UnknownParent {
                state: node.state.name().to_string(),
                parent: parent.name().to_string(),
            }
        }),
        None => fail_if(node.state != table.initial, || {
            HierarchyViolation::DetachedRoot {
                state: node.state.name().to_string(),
            }
        }),
    }
}

fn check_initial_substate<S: State, E, D, P>(
    table: &StateTable<S, E, D, P>,
    node: &StateNode<S, E, D, P>,
) -> Check {
    let Some(substate) = &node.initial else {
        return Validation::success(());
    };

    if !table.contains(substate) {
        return Validation::fail(HierarchyViolation::UnknownInitialSubstate {
            state: node.state.name().to_string(),
            substate: substate.name().to_string(),
        });
    }

    let is_child = table.parent_of(substate).as_ref() == Some(&node.state);
    fail_if(!is_child, || HierarchyViolation::InitialSubstateNotChild {
        state: node.state.name().to_string(),
        substate: substate.name().to_string(),
    })
}

fn check_depth<S: State, E, D, P>(
    table: &StateTable<S, E, D, P>,
    node: &StateNode<S, E, D, P>,
    max_depth: usize,
) -> Check {
    match get_path(&node.state, max_depth, |state| table.parent_of(state)) {
        Ok(_) => Validation::success(()),
        Err(_) => Validation::fail(HierarchyViolation::DepthExceeded {
            state: node.state.name().to_string(),
            max_depth,
        }),
    }
}

fn check_target<S: State, E: Event, D, P>(
    table: &StateTable<S, E, D, P>,
    node: &StateNode<S, E, D, P>,
    rule: &Rule<S, E, D, P>,
) -> Check {
    match &rule.target {
        Some(target) => fail_if(!table.contains(target), || {
            HierarchyViolation::UnknownTarget {
                state: node.state.name().to_string(),
                event: rule.event.name().to_string(),
                target: target.name().to_string(),
            }
        }),
        None => Validation::success(()),
    }
}
