//! Outcome of offering an event to a single state.

/// What a state's handler did with an event.
///
/// `NotHandled` passes the event on to the parent state. `Handled` consumes it
/// without touching the active state. `Transition` consumes it and asks the
/// engine to move to `target`; `external` forces the exit and re-entry of the
/// source or target when it is also the least common ancestor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HandleResult<S> {
    /// The state ignores this event.
    NotHandled,

    /// The event was consumed, no transition.
    Handled,

    /// The event was consumed and the machine should move to `target`.
    Transition { target: S, external: bool },
}

impl<S> HandleResult<S> {
    /// Internal (local) transition to `target`.
    pub fn transition(target: S) -> Self {
        Self::Transition {
            target,
            external: false,
        }
    }

    /// External transition to `target`.
    pub fn external(target: S) -> Self {
        Self::Transition {
            target,
            external: true,
        }
    }

    pub fn is_handled(&self) -> bool {
        !matches!(self, Self::NotHandled)
    }

    pub fn is_transition(&self) -> bool {
        matches!(self, Self::Transition { .. })
    }

    pub fn is_external(&self) -> bool {
        matches!(self, Self::Transition { external: true, .. })
    }

    pub fn target(&self) -> Option<&S> {
        match self {
            Self::Transition { target, .. } => Some(target),
            _ => None,
        }
    }
}
