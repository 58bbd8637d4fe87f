//! Errors raised by the running machine.

use crate::core::PathError;
use thiserror::Error;

/// Configuration errors detected while initializing or handling events.
///
/// All of these indicate a misconfigured hierarchy. The first one raised
/// poisons the machine; see [`MachineError::Poisoned`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MachineError {
    #[error("No initial state declared")]
    MissingInitialState,

    #[error("Initial state '{state}' has parent '{parent}'; it must be the hierarchy root")]
    InitialStateHasParent { state: String, parent: String },

    #[error(transparent)]
    Path(#[from] PathError),

    #[error("Entering initial substate '{substate}' of '{state}' exceeds max depth {max_depth}")]
    DescentTooDeep {
        state: String,
        substate: String,
        max_depth: usize,
    },

    #[error("State machine '{name}' is unusable after an earlier configuration error")]
    Poisoned { name: String },
}
