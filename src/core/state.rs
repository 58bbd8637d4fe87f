//! Core `State` and `Event` traits.
//!
//! States and events are opaque to the engine. The hierarchy between states
//! is described externally by the client, so these traits only ask for what
//! the engine needs to compare, clone and log them.

use std::fmt::Debug;

/// Trait for hierarchical state machine states.
///
/// A state carries no structure of its own. Its parent and initial substate
/// are answered by the owning [`Hierarchy`](crate::machine::Hierarchy).
///
/// # Required Traits
///
/// - `Clone`: the engine keeps the current state and computed paths
/// - `PartialEq`: paths are compared element by element to find the LCA
/// - `Debug`: states must be debuggable for diagnostics
///
/// # Example
///
/// ```rust
/// use strata::core::State;
///
/// #[derive(Clone, PartialEq, Debug)]
/// enum Link {
///     Offline,
///     Online,
///     Connecting,
///     Connected,
/// }
///
/// impl State for Link {
///     fn name(&self) -> &str {
///         match self {
///             Self::Offline => "Offline",
///             Self::Online => "Online",
///             Self::Connecting => "Connecting",
///             Self::Connected => "Connected",
///         }
///     }
/// }
///
/// assert_eq!(Link::Connecting.name(), "Connecting");
/// ```
pub trait State: Clone + PartialEq + Debug {
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;
}

/// Trait for events delivered to a state machine.
///
/// Events are moved into the engine's queue and lent to handlers, so no
/// `Clone` bound is needed.
pub trait Event: Debug {
    /// Get the event's name for display/logging.
    fn name(&self) -> &str;
}
