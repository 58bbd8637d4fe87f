//! Property-based tests for the hierarchical state machine.
//!
//! These tests use proptest to generate random state trees and event
//! sequences and check that the engine's invariants hold for all of them.

use chrono::Utc;
use proptest::prelude::*;
use strata::core::{
    find_least_common_ancestor, get_path, Event, Guard, State, TransitionHistory,
    TransitionRecord, DEFAULT_MAX_DEPTH,
};
use strata::machine::{Hierarchy, HookContext, Machine};
use strata::HandleResult;

const NAMES: [&str; 12] = [
    "N0", "N1", "N2", "N3", "N4", "N5", "N6", "N7", "N8", "N9", "N10", "N11",
];

#[derive(Clone, Copy, PartialEq, Debug)]
struct N(usize);

impl State for N {
    fn name(&self) -> &str {
        NAMES[self.0]
    }
}

/// Transition to `target`, requested by the state `up` levels above the leaf
/// (or the root, if the leaf is shallower).
#[derive(Debug)]
struct Goto {
    up: usize,
    target: usize,
    external: bool,
}

impl Event for Goto {
    fn name(&self) -> &str {
        "Goto"
    }
}

/// Random tree where node 0 is the root and every other node's parent has a
/// lower index. A composite state's initial substate is its first child.
struct Tree {
    parents: Vec<Option<usize>>,
    active: Vec<N>,
    balanced: bool,
}

impl Tree {
    fn new(parents: Vec<Option<usize>>) -> Self {
        Self {
            parents,
            active: Vec::new(),
            balanced: true,
        }
    }

    fn parent_of(&self, state: &N) -> Option<N> {
        self.parents[state.0].map(N)
    }

    fn first_child(&self, state: &N) -> Option<N> {
        (0..self.parents.len())
            .find(|&i| self.parents[i] == Some(state.0))
            .map(N)
    }

    fn path(&self, state: &N) -> Vec<N> {
        get_path(state, DEFAULT_MAX_DEPTH, |s| self.parent_of(s)).unwrap()
    }
}

impl Hierarchy for Tree {
    type State = N;
    type Event = Goto;
    type Payload = ();

    fn initial_state(&self) -> Option<N> {
        Some(N(0))
    }

    fn parent(&self, state: &N) -> Option<N> {
        self.parent_of(state)
    }

    fn initial_substate(&self, state: &N) -> Option<N> {
        self.first_child(state)
    }

    fn handle_event(
        &mut self,
        state: &N,
        event: &Goto,
        _payload: Option<&()>,
        ctx: &mut HookContext<'_, Self>,
    ) -> HandleResult<N> {
        let mut distance = 0;
        let mut cursor = ctx.current().copied();
        while let Some(active) = cursor {
            if active == *state {
                break;
            }
            distance += 1;
            cursor = self.parent_of(&active);
        }

        if distance >= event.up || self.parents[state.0].is_none() {
            HandleResult::Transition {
                target: N(event.target % self.parents.len()),
                external: event.external,
            }
        } else {
            HandleResult::NotHandled
        }
    }

    fn on_enter(&mut self, state: &N, _ctx: &mut HookContext<'_, Self>) {
        self.active.push(*state);
    }

    fn on_exit(&mut self, state: &N, _ctx: &mut HookContext<'_, Self>) {
        if self.active.pop() != Some(*state) {
            self.balanced = false;
        }
    }
}

prop_compose! {
    fn arbitrary_tree()(picks in prop::collection::vec(any::<prop::sample::Index>(), 0..11))
        -> Vec<Option<usize>>
    {
        let mut parents = vec![None];
        for (offset, pick) in picks.iter().enumerate() {
            parents.push(Some(pick.index(offset + 1)));
        }
        parents
    }
}

prop_compose! {
    fn arbitrary_goto()(up in 0..4usize, target in 0..12usize, external in any::<bool>()) -> Goto {
        Goto { up, target, external }
    }
}

proptest! {
    #[test]
    fn machine_rests_in_a_leaf(
        parents in arbitrary_tree(),
        events in prop::collection::vec(arbitrary_goto(), 0..20),
    ) {
        let mut machine = Machine::new(Tree::new(parents));
        machine.initialize().unwrap();

        for event in events {
            machine.handle(event).unwrap();
            let current = *machine.current_state().unwrap();
            prop_assert_eq!(machine.hierarchy().first_child(&current), None);
        }
    }

    #[test]
    fn active_states_match_current_path(
        parents in arbitrary_tree(),
        events in prop::collection::vec(arbitrary_goto(), 1..20),
    ) {
        let mut machine = Machine::new(Tree::new(parents));

        for event in events {
            machine.handle(event).unwrap();

            let tree = machine.hierarchy();
            let current = *machine.current_state().unwrap();
            prop_assert!(tree.balanced);
            prop_assert_eq!(&tree.active, &tree.path(&current));
        }
    }

    #[test]
    fn version_counts_transitions(
        parents in arbitrary_tree(),
        events in prop::collection::vec(arbitrary_goto(), 0..20),
    ) {
        let mut machine = Machine::new(Tree::new(parents));
        let count = events.len() as u64;

        for event in events {
            let report = machine.handle(event).unwrap();
            prop_assert_eq!(report.transitions, 1);
        }

        prop_assert_eq!(machine.version(), count);
    }

    #[test]
    fn is_in_matches_ancestry(
        parents in arbitrary_tree(),
        events in prop::collection::vec(arbitrary_goto(), 0..10),
    ) {
        let size = parents.len();
        let mut machine = Machine::new(Tree::new(parents));
        machine.initialize().unwrap();

        for event in events {
            machine.handle(event).unwrap();
        }

        let current = *machine.current_state().unwrap();
        let path = machine.hierarchy().path(&current);
        for index in 0..size {
            prop_assert_eq!(machine.is_in(&N(index)), path.contains(&N(index)));
        }
    }

    #[test]
    fn lca_is_deepest_shared_ancestor(
        parents in arbitrary_tree(),
        a in 0..12usize,
        b in 0..12usize,
    ) {
        let tree = Tree::new(parents);
        let size = tree.parents.len();
        let path_a = tree.path(&N(a % size));
        let path_b = tree.path(&N(b % size));

        let lca = find_least_common_ancestor(&path_a, &path_b).unwrap();
        let depth = path_a.iter().position(|s| *s == lca).unwrap();

        prop_assert_eq!(path_b.get(depth), Some(&lca));
        match (path_a.get(depth + 1), path_b.get(depth + 1)) {
            (Some(x), Some(y)) => prop_assert_ne!(x, y),
            _ => {}
        }
    }

    #[test]
    fn guard_is_deterministic(value in any::<u32>(), payload in any::<Option<u32>>()) {
        let guard = Guard::new(|v: &u32, p: Option<&u32>| p.map_or(*v % 2 == 0, |p| p > v));
        let result1 = guard.check(&value, payload.as_ref());
        let result2 = guard.check(&value, payload.as_ref());
        prop_assert_eq!(result1, result2);
    }

    #[test]
    fn history_respects_limit(limit in 1..10usize, count in 0..30usize) {
        let mut history = TransitionHistory::with_limit(limit);

        for version in 0..count {
            history.record(TransitionRecord {
                event: "Goto".to_string(),
                source: N(0),
                target: N(version % 12),
                from: N(0),
                to: N(version % 12),
                external: false,
                version: version as u64 + 1,
                timestamp: Utc::now(),
            });
        }

        prop_assert_eq!(history.len(), count.min(limit));
        if let Some(last) = history.records().back() {
            prop_assert_eq!(last.version, count as u64);
        }
    }
}
