//! Event rules attached to a state in a table-driven hierarchy.

use crate::builder::error::BuildError;
use crate::core::{Guard, HandleResult};
use crate::machine::Context;

/// Side effect run when a rule fires, before the transition (if any).
pub type Action<S, E, D, P> =
    Box<dyn for<'c> FnMut(&mut D, Option<&P>, &mut Context<'c, S, E, P>) + Send>;

/// A state's reaction to one event.
///
/// A rule fires when the dispatched event equals `event` and the guard, if
/// any, accepts the client data and payload. Without a target it consumes
/// the event; with a target it requests a transition.
pub struct Rule<S, E, D, P = ()> {
    pub(crate) event: E,
    pub(crate) target: Option<S>,
    pub(crate) external: bool,
    pub(crate) guard: Option<Guard<D, P>>,
    pub(crate) action: Option<Action<S, E, D, P>>,
}

impl<S: Clone, E: PartialEq, D, P> Rule<S, E, D, P> {
    pub fn event(&self) -> &E {
        &self.event
    }

    pub fn target(&self) -> Option<&S> {
        self.target.as_ref()
    }

    pub fn is_external(&self) -> bool {
        self.external
    }

    /// Check if this rule applies to the event (pure).
    pub fn matches(&self, data: &D, event: &E, payload: Option<&P>) -> bool {
        if self.event != *event {
            return false;
        }

        self.guard
            .as_ref()
            .is_none_or(|guard| guard.check(data, payload))
    }

    pub(crate) fn fire(
        &mut self,
        data: &mut D,
        payload: Option<&P>,
        ctx: &mut Context<'_, S, E, P>,
    ) -> HandleResult<S> {
        if let Some(action) = self.action.as_mut() {
            action(data, payload, ctx);
        }

        match &self.target {
            Some(target) => HandleResult::Transition {
                target: target.clone(),
                external: self.external,
            },
            None => HandleResult::Handled,
        }
    }
}

/// Builder for constructing rules with a fluent API.
///
/// # Example
///
/// ```rust
/// use strata::builder::RuleBuilder;
///
/// struct Conn {
///     retries: u32,
/// }
///
/// let rule = RuleBuilder::<&str, &str, Conn>::new()
///     .on("Timeout")
///     .to("Reconnecting")
///     .when(|conn: &Conn| conn.retries < 3)
///     .run(|conn: &mut Conn, _payload, _ctx| conn.retries += 1)
///     .build()
///     .unwrap();
///
/// assert_eq!(rule.target(), Some(&"Reconnecting"));
/// assert!(rule.matches(&Conn { retries: 0 }, &"Timeout", None));
/// assert!(!rule.matches(&Conn { retries: 3 }, &"Timeout", None));
/// ```
pub struct RuleBuilder<S, E, D, P = ()> {
    event: Option<E>,
    target: Option<S>,
    external: bool,
    guard: Option<Guard<D, P>>,
    action: Option<Action<S, E, D, P>>,
}

impl<S, E, D, P> RuleBuilder<S, E, D, P> {
    /// Create a new rule builder.
    pub fn new() -> Self {
        Self {
            event: None,
            target: None,
            external: false,
            guard: None,
            action: None,
        }
    }

    /// Set the event the rule reacts to (required).
    pub fn on(mut self, event: E) -> Self {
        self.event = Some(event);
        self
    }

    /// Set the transition target. Without one the rule only consumes.
    pub fn to(mut self, target: S) -> Self {
        self.target = Some(target);
        self
    }

    /// Make the transition external.
    pub fn external(mut self) -> Self {
        self.external = true;
        self
    }

    /// Add a guard (optional).
    pub fn guard(mut self, guard: Guard<D, P>) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Add a guard over the client data using a closure (optional).
    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&D) -> bool + Send + Sync + 'static,
    {
        self.guard = Some(Guard::on_data(predicate));
        self
    }

    /// Set the action run when the rule fires (optional).
    pub fn run<F>(mut self, action: F) -> Self
    where
        F: FnMut(&mut D, Option<&P>, &mut Context<'_, S, E, P>) + Send + 'static,
    {
        self.action = Some(Box::new(action));
        self
    }

    /// Build the rule.
    pub fn build(self) -> Result<Rule<S, E, D, P>, BuildError> {
        let event = self.event.ok_or(BuildError::MissingEvent)?;

        Ok(Rule {
            event,
            target: self.target,
            external: self.external,
            guard: self.guard,
            action: self.action,
        })
    }
}

impl<S, E, D, P> Default for RuleBuilder<S, E, D, P> {
    fn default() -> Self {
        Self::new()
    }
}
