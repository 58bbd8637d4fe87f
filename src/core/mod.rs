//! Core hierarchical state machine types and logic.
//!
//! This module contains the pure part of the engine:
//! - `State` and `Event` traits
//! - Root-first paths and least-common-ancestor lookup
//! - Transition planning (which states to exit and enter)
//! - Handler results, guards and transition history
//!
//! Nothing here calls client hooks. The imperative shell lives in
//! [`crate::machine`].

mod error;
mod guard;
mod history;
mod path;
mod plan;
mod result;
mod state;

pub use error::PathError;
pub use guard::Guard;
pub use history::{TransitionHistory, TransitionRecord};
pub use path::{find_least_common_ancestor, get_path, DEFAULT_MAX_DEPTH};
pub use plan::{plan_transition, TransitionPlan};
pub use result::HandleResult;
pub use state::{Event, State};
