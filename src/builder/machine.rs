//! Builder for constructing table-driven state machines.

use crate::builder::error::BuildError;
use crate::builder::state::StateBuilder;
use crate::builder::table::StateTable;
use crate::builder::validation::validate_table;
use crate::core::{Event, State};
use crate::machine::{Machine, MachineConfig};
use stillwater::validation::Validation;

/// Builder for constructing state machines with a fluent API.
///
/// # Example
///
/// ```rust
/// use strata::builder::{MachineBuilder, StateBuilder};
/// use strata::{event_enum, state_enum};
///
/// state_enum! {
///     enum Door {
///         Installed,
///         Closed,
///         Locked,
///         Open,
///     }
/// }
///
/// event_enum! {
///     enum Action {
///         Lock,
///         Unlock,
///         Push,
///     }
/// }
///
/// let mut machine = MachineBuilder::<Door, Action>::new()
///     .name("door")
///     .initial(Door::Installed)
///     .state(StateBuilder::new(Door::Installed).initial(Door::Closed))
///     .state(
///         StateBuilder::new(Door::Closed)
///             .parent(Door::Installed)
///             .transition(Action::Lock, Door::Locked)
///             .transition(Action::Push, Door::Open),
///     )
///     .state(
///         StateBuilder::new(Door::Locked)
///             .parent(Door::Installed)
///             .transition(Action::Unlock, Door::Closed),
///     )
///     .state(
///         StateBuilder::new(Door::Open)
///             .parent(Door::Installed)
///             .transition(Action::Push, Door::Closed),
///     )
///     .build()
///     .unwrap();
///
/// machine.handle(Action::Lock).unwrap();
/// let report = machine.handle(Action::Push).unwrap();
///
/// assert_eq!(report.unhandled, 1);
/// assert_eq!(machine.current_state(), Some(&Door::Locked));
/// assert!(machine.is_in(&Door::Installed));
/// ```
pub struct MachineBuilder<S, E, D = (), P = ()> {
    initial: Option<S>,
    states: Vec<StateBuilder<S, E, D, P>>,
    data: D,
    config: MachineConfig,
}

impl<S, E, D, P> MachineBuilder<S, E, D, P>
where
    S: State,
    E: Event + PartialEq,
{
    /// Create a builder around client data.
    pub fn with_data(data: D) -> Self {
        Self {
            initial: None,
            states: Vec::new(),
            data,
            config: MachineConfig::default(),
        }
    }

    /// Create a builder with default client data.
    pub fn new() -> Self
    where
        D: Default,
    {
        Self::with_data(D::default())
    }

    /// Set the initial state (required). It must be the hierarchy root.
    pub fn initial(mut self, state: S) -> Self {
        self.initial = Some(state);
        self
    }

    /// Declare a state.
    pub fn state(mut self, state: StateBuilder<S, E, D, P>) -> Self {
        self.states.push(state);
        self
    }

    /// Declare multiple states at once.
    pub fn states(mut self, states: Vec<StateBuilder<S, E, D, P>>) -> Self {
        self.states.extend(states);
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: MachineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    /// Keep a transition history, bounded by `limit` when given.
    pub fn record_history(mut self, limit: Option<usize>) -> Self {
        self.config = self.config.with_history(limit);
        self
    }

    /// Build the state machine.
    /// Returns an error if required fields are missing or the table is
    /// inconsistent; all table violations are reported together.
    pub fn build(self) -> Result<Machine<StateTable<S, E, D, P>>, BuildError> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;

        if self.states.is_empty() {
            return Err(BuildError::NoStates);
        }

        self.config.validate()?;

        let table = StateTable {
            initial,
            nodes: self.states.into_iter().map(StateBuilder::build).collect(),
            data: self.data,
        };

        if let Validation::Failure(violations) = validate_table(&table, self.config.max_depth) {
            return Err(BuildError::InvalidHierarchy(
                violations.iter().cloned().collect(),
            ));
        }

        Ok(Machine::with_config(table, self.config)?)
    }
}

impl<S, E, D, P> Default for MachineBuilder<S, E, D, P>
where
    S: State,
    E: Event + PartialEq,
    D: Default,
{
    fn default() -> Self {
        Self::new()
    }
}
