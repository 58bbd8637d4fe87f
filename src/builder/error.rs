//! Build errors for state tables and rules.

use crate::machine::ConfigError;
use thiserror::Error;

/// Errors that can occur when building a machine or one of its rules.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("No states defined. Add at least one state")]
    NoStates,

    #[error("Rule event not specified. Call .on(event)")]
    MissingEvent,

    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),

    #[error("Invalid state hierarchy: {0:?}")]
    InvalidHierarchy(Vec<HierarchyViolation>),
}

/// A single problem found while validating a state table.
///
/// Validation collects every violation instead of stopping at the first.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HierarchyViolation {
    #[error("State '{state}' is declared more than once")]
    DuplicateState { state: String },

    #[error("Initial state '{state}' is not declared")]
    UnknownInitialState { state: String },

    #[error("Initial state '{state}' has parent '{parent}'")]
    InitialStateHasParent { state: String, parent: String },

    #[error("State '{state}' has no parent but is not the initial state")]
    DetachedRoot { state: String },

    #[error("State '{state}' has undeclared parent '{parent}'")]
    UnknownParent { state: String, parent: String },

    #[error("State '{state}' has undeclared initial substate '{substate}'")]
    UnknownInitialSubstate { state: String, substate: String },

    #[error("Initial substate '{substate}' of '{state}' is not its direct child")]
    InitialSubstateNotChild { state: String, substate: String },

    #[error("Rule for '{event}' in state '{state}' targets undeclared state '{target}'")]
    UnknownTarget {
        state: String,
        event: String,
        target: String,
    },

    #[error("State '{state}' is nested deeper than {max_depth} levels (parent cycle?)")]
    DepthExceeded { state: String, max_depth: usize },
}
