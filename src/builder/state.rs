//! Builder for declaring one state of a table-driven hierarchy.

use crate::builder::error::BuildError;
use crate::builder::rule::{Rule, RuleBuilder};
use crate::builder::table::{Handler, Hook, StateNode};
use crate::core::HandleResult;
use crate::machine::Context;

/// Builder for a single state with a fluent API.
///
/// Rules are tried in declaration order; the fallback handler, if any, runs
/// only when no rule fires.
///
/// # Example
///
/// ```rust
/// use strata::builder::StateBuilder;
///
/// let connecting = StateBuilder::<&str, &str>::new("Connecting")
///     .parent("Online")
///     .transition("Established", "Connected")
///     .external_transition("Retry", "Connecting")
///     .consume("KeepAlive");
/// ```
pub struct StateBuilder<S, E, D = (), P = ()> {
    state: S,
    parent: Option<S>,
    initial: Option<S>,
    rules: Vec<Rule<S, E, D, P>>,
    fallback: Option<Handler<S, E, D, P>>,
    on_enter: Option<Hook<S, E, D, P>>,
    on_exit: Option<Hook<S, E, D, P>>,
}

impl<S, E, D, P> StateBuilder<S, E, D, P> {
    /// Start declaring `state`.
    pub fn new(state: S) -> Self {
        Self {
            state,
            parent: None,
            initial: None,
            rules: Vec::new(),
            fallback: None,
            on_enter: None,
            on_exit: None,
        }
    }

    /// Set the parent state. States without a parent are roots.
    pub fn parent(mut self, parent: S) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Set the initial substate, making this a composite state.
    pub fn initial(mut self, substate: S) -> Self {
        self.initial = Some(substate);
        self
    }

    pub fn on_enter<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut D, &mut Context<'_, S, E, P>) + Send + 'static,
    {
        self.on_enter = Some(Box::new(hook));
        self
    }

    pub fn on_exit<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut D, &mut Context<'_, S, E, P>) + Send + 'static,
    {
        self.on_exit = Some(Box::new(hook));
        self
    }

    /// Internal transition to `target` on `event`.
    pub fn transition(self, event: E, target: S) -> Self {
        self.push_rule(event, Some(target), false)
    }

    /// External transition to `target` on `event`.
    pub fn external_transition(self, event: E, target: S) -> Self {
        self.push_rule(event, Some(target), true)
    }

    /// Consume `event` without changing state.
    pub fn consume(self, event: E) -> Self {
        self.push_rule(event, None, false)
    }

    /// Add a rule using a builder.
    /// Returns an error if the builder fails validation.
    pub fn rule(mut self, builder: RuleBuilder<S, E, D, P>) -> Result<Self, BuildError> {
        let rule = builder.build()?;
        self.rules.push(rule);
        Ok(self)
    }

    /// Set the fallback handler.
    pub fn handler<F>(mut self, handler: F) -> Self
    where
        F: FnMut(&mut D, &E, Option<&P>, &mut Context<'_, S, E, P>) -> HandleResult<S>
            + Send
            + 'static,
    {
        self.fallback = Some(Box::new(handler));
        self
    }

    pub(crate) fn build(self) -> StateNode<S, E, D, P> {
        StateNode {
            state: self.state,
            parent: self.parent,
            initial: self.initial,
            rules: self.rules,
            fallback: self.fallback,
            on_enter: self.on_enter,
            on_exit: self.on_exit,
        }
    }

    fn push_rule(mut self, event: E, target: Option<S>, external: bool) -> Self {
        self.rules.push(Rule {
            event,
            target,
            external,
            guard: None,
            action: None,
        });
        self
    }
}
