//! Errors raised by the pure hierarchy computations.

use thiserror::Error;

/// Errors that can occur while walking a state hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// The parent chain did not reach a root within `max_depth` states.
    /// Either the hierarchy is deeper than allowed or the parents form a cycle.
    #[error("Path from state '{state}' exceeds max depth {max_depth} (parent cycle?)")]
    MaxDepthExceeded { state: String, max_depth: usize },
}
