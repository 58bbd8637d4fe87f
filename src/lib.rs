//! Strata: a hierarchical state machine engine
//!
//! Strata dispatches events through a tree of states. An event is offered to
//! the current leaf first and bubbles up through its ancestors until some
//! state handles it. Transitions run the exit hooks up to the least common
//! ancestor of source and target, then the enter hooks down to the target,
//! and finally follow initial substates until a leaf is reached.
//!
//! Like Stillwater's "pure core, imperative shell", the path and transition
//! arithmetic in [`core`] is side-effect free, while [`machine`] owns the
//! mutable state and calls client hooks.
//!
//! # Core Concepts
//!
//! - **Hierarchy**: the client describes parents, initial substates and event
//!   handling through the [`Hierarchy`] trait
//! - **Re-entrancy**: hooks post events through a [`Context`]; they are
//!   queued and handled in FIFO order, never nested
//! - **Builders**: [`builder::MachineBuilder`] produces a validated,
//!   table-driven hierarchy without implementing the trait by hand
//!
//! # Example
//!
//! ```rust
//! use strata::builder::{MachineBuilder, StateBuilder};
//! use strata::{event_enum, state_enum};
//!
//! state_enum! {
//!     enum Phone {
//!         Powered,
//!         Idle,
//!         Ringing,
//!         Talking,
//!     }
//! }
//!
//! event_enum! {
//!     enum Call {
//!         Incoming,
//!         Answer,
//!         HangUp,
//!     }
//! }
//!
//! let mut phone = MachineBuilder::<Phone, Call>::new()
//!     .initial(Phone::Powered)
//!     .state(
//!         StateBuilder::new(Phone::Powered)
//!             .initial(Phone::Idle)
//!             .transition(Call::HangUp, Phone::Idle),
//!     )
//!     .state(
//!         StateBuilder::new(Phone::Idle)
//!             .parent(Phone::Powered)
//!             .transition(Call::Incoming, Phone::Ringing),
//!     )
//!     .state(
//!         StateBuilder::new(Phone::Ringing)
//!             .parent(Phone::Powered)
//!             .transition(Call::Answer, Phone::Talking),
//!     )
//!     .state(StateBuilder::new(Phone::Talking).parent(Phone::Powered))
//!     .build()
//!     .unwrap();
//!
//! phone.handle(Call::Incoming).unwrap();
//! phone.handle(Call::Answer).unwrap();
//! assert_eq!(phone.current_state(), Some(&Phone::Talking));
//!
//! // Talking does not handle HangUp; its parent does.
//! phone.handle(Call::HangUp).unwrap();
//! assert_eq!(phone.current_state(), Some(&Phone::Idle));
//! assert_eq!(phone.version(), 3);
//! ```

pub mod builder;
pub mod core;
pub mod machine;

// Re-export commonly used types
pub use crate::core::{Event, Guard, HandleResult, State, TransitionHistory, TransitionRecord};
pub use crate::machine::{Context, DispatchReport, Hierarchy, Machine, MachineConfig, MachineError};

/// Everything needed to implement a [`Hierarchy`] or build a table.
pub mod prelude {
    pub use crate::builder::{guarded_transition, MachineBuilder, RuleBuilder, StateBuilder};
    pub use crate::core::{Event, Guard, HandleResult, State};
    pub use crate::machine::{Context, Hierarchy, HookContext, Machine, MachineConfig};
    pub use crate::{event_enum, state_enum};
}
