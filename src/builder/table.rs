//! Table-driven hierarchy.
//!
//! Each declared state owns one [`StateNode`]: its parent, initial substate,
//! rules and hooks. The table also owns the client data `D` that hooks,
//! actions and guards work on.

use crate::builder::rule::Rule;
use crate::core::{Event, HandleResult, State};
use crate::machine::{Context, Hierarchy, HookContext};

/// Enter/exit hook of a table state.
pub type Hook<S, E, D, P> = Box<dyn for<'c> FnMut(&mut D, &mut Context<'c, S, E, P>) + Send>;

/// Fallback handler consulted when none of a state's rules fire.
pub type Handler<S, E, D, P> =
    Box<dyn for<'c> FnMut(&mut D, &E, Option<&P>, &mut Context<'c, S, E, P>) -> HandleResult<S> + Send>;

/// Everything the table knows about one state.
pub struct StateNode<S, E, D, P> {
    pub(crate) state: S,
    pub(crate) parent: Option<S>,
    pub(crate) initial: Option<S>,
    pub(crate) rules: Vec<Rule<S, E, D, P>>,
    pub(crate) fallback: Option<Handler<S, E, D, P>>,
    pub(crate) on_enter: Option<Hook<S, E, D, P>>,
    pub(crate) on_exit: Option<Hook<S, E, D, P>>,
}

impl<S, E, D, P> StateNode<S, E, D, P> {
    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn parent(&self) -> Option<&S> {
        self.parent.as_ref()
    }

    pub fn initial(&self) -> Option<&S> {
        self.initial.as_ref()
    }

    pub fn rules(&self) -> &[Rule<S, E, D, P>] {
        &self.rules
    }
}

/// [`Hierarchy`] implementation backed by a list of [`StateNode`]s.
///
/// Built and validated by [`MachineBuilder`](crate::builder::MachineBuilder).
pub struct StateTable<S, E, D = (), P = ()> {
    pub(crate) initial: S,
    pub(crate) nodes: Vec<StateNode<S, E, D, P>>,
    pub(crate) data: D,
}

impl<S: State, E, D, P> StateTable<S, E, D, P> {
    /// Client data shared by hooks, actions and guards.
    pub fn data(&self) -> &D {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut D {
        &mut self.data
    }

    pub fn into_data(self) -> D {
        self.data
    }

    pub fn nodes(&self) -> &[StateNode<S, E, D, P>] {
        &self.nodes
    }

    pub fn contains(&self, state: &S) -> bool {
        self.node(state).is_some()
    }

    pub(crate) fn node(&self, state: &S) -> Option<&StateNode<S, E, D, P>> {
        self.nodes.iter().find(|node| node.state == *state)
    }

    pub(crate) fn parent_of(&self, state: &S) -> Option<S> {
        self.node(state).and_then(|node| node.parent.clone())
    }
}

impl<S, E, D, P> Hierarchy for StateTable<S, E, D, P>
where
    S: State,
    E: Event + PartialEq,
{
    type State = S;
    type Event = E;
    type Payload = P;

    fn initial_state(&self) -> Option<S> {
        Some(self.initial.clone())
    }

    fn parent(&self, state: &S) -> Option<S> {
        self.parent_of(state)
    }

    fn initial_substate(&self, state: &S) -> Option<S> {
        self.node(state).and_then(|node| node.initial.clone())
    }

    fn handle_event(
        &mut self,
        state: &S,
        event: &E,
        payload: Option<&P>,
        ctx: &mut HookContext<'_, Self>,
    ) -> HandleResult<S> {
        let Self { nodes, data, .. } = self;
        let Some(node) = nodes.iter_mut().find(|node| node.state == *state) else {
            return HandleResult::NotHandled;
        };

        for rule in node.rules.iter_mut() {
            if rule.matches(data, event, payload) {
                return rule.fire(data, payload, ctx);
            }
        }

        match node.fallback.as_mut() {
            Some(handler) => handler(data, event, payload, ctx),
            None => HandleResult::NotHandled,
        }
    }

    fn on_enter(&mut self, state: &S, ctx: &mut HookContext<'_, Self>) {
        let Self { nodes, data, .. } = self;
        let hook = nodes
            .iter_mut()
            .find(|node| node.state == *state)
            .and_then(|node| node.on_enter.as_mut());

        if let Some(hook) = hook {
            hook(data, ctx);
        }
    }

    fn on_exit(&mut self, state: &S, ctx: &mut HookContext<'_, Self>) {
        let Self { nodes, data, .. } = self;
        let hook = nodes
            .iter_mut()
            .find(|node| node.state == *state)
            .and_then(|node| node.on_exit.as_mut());

        if let Some(hook) = hook {
            hook(data, ctx);
        }
    }
}
