//! Builder API for table-driven hierarchies.
//!
//! Instead of implementing [`Hierarchy`](crate::machine::Hierarchy) by hand,
//! a client can declare its states, their parents and their transition rules
//! with fluent builders. The resulting [`StateTable`] is validated as a whole
//! before the machine is handed out.

pub mod error;
pub mod machine;
pub mod macros;
pub mod rule;
pub mod state;
pub mod table;
mod validation;

pub use error::{BuildError, HierarchyViolation};
pub use machine::MachineBuilder;
pub use rule::{Action, Rule, RuleBuilder};
pub use state::StateBuilder;
pub use table::{Handler, Hook, StateNode, StateTable};

/// Start a rule that transitions to `target` on `event` only while
/// `predicate` holds for the client data.
///
/// # Example
///
/// ```
/// use strata::builder::{guarded_transition, StateBuilder};
///
/// let idle = StateBuilder::<&str, &str, u32>::new("Idle")
///     .rule(guarded_transition("Start", "Busy", |jobs: &u32| *jobs > 0))
///     .unwrap();
/// ```
pub fn guarded_transition<S, E, D, P, F>(event: E, target: S, predicate: F) -> RuleBuilder<S, E, D, P>
where
    F: Fn(&D) -> bool + Send + Sync + 'static,
{
    RuleBuilder::new().on(event).to(target).when(predicate)
}
