//! The contract between the engine and the client that owns it.

use crate::core::{Event, HandleResult, State};
use crate::machine::context::Context;

/// Context type seen by the hooks of hierarchy `H`.
pub type HookContext<'a, H> = Context<
    'a,
    <H as Hierarchy>::State,
    <H as Hierarchy>::Event,
    <H as Hierarchy>::Payload,
>;

/// Client side of a hierarchical state machine.
///
/// The lookups (`initial_state`, `parent`, `initial_substate`) must be pure
/// and stable for the lifetime of the machine. Handlers and hooks may mutate
/// the client and post further events through the [`Context`], but they
/// never change the machine's current state directly.
///
/// Implementing this trait with a `match` over a state enum is the most
/// direct way to describe a hierarchy. [`StateTable`](crate::builder::StateTable)
/// is a table-driven implementation assembled with the builder API.
///
/// # Example
///
/// ```rust
/// use strata::core::{Event, HandleResult, State};
/// use strata::machine::{Hierarchy, HookContext, Machine};
///
/// #[derive(Clone, Copy, PartialEq, Debug)]
/// enum Light { Powered, Off, On }
///
/// impl State for Light {
///     fn name(&self) -> &str {
///         match self {
///             Self::Powered => "Powered",
///             Self::Off => "Off",
///             Self::On => "On",
///         }
///     }
/// }
///
/// #[derive(Debug)]
/// struct Toggle;
///
/// impl Event for Toggle {
///     fn name(&self) -> &str { "Toggle" }
/// }
///
/// struct Lamp;
///
/// impl Hierarchy for Lamp {
///     type State = Light;
///     type Event = Toggle;
///     type Payload = ();
///
///     fn initial_state(&self) -> Option<Light> {
///         Some(Light::Powered)
///     }
///
///     fn parent(&self, state: &Light) -> Option<Light> {
///         match state {
///             Light::Powered => None,
///             Light::Off | Light::On => Some(Light::Powered),
///         }
///     }
///
///     fn initial_substate(&self, state: &Light) -> Option<Light> {
///         match state {
///             Light::Powered => Some(Light::Off),
///             _ => None,
///         }
///     }
///
///     fn handle_event(
///         &mut self,
///         state: &Light,
///         _event: &Toggle,
///         _payload: Option<&()>,
///         _ctx: &mut HookContext<'_, Self>,
///     ) -> HandleResult<Light> {
///         match state {
///             Light::Off => HandleResult::transition(Light::On),
///             Light::On => HandleResult::transition(Light::Off),
///             Light::Powered => HandleResult::NotHandled,
///         }
///     }
/// }
///
/// let mut machine = Machine::new(Lamp);
/// machine.handle(Toggle).unwrap();
/// assert_eq!(machine.current_state(), Some(&Light::On));
/// assert!(machine.is_in(&Light::Powered));
/// ```
pub trait Hierarchy: Sized {
    type State: State;
    type Event: Event;
    type Payload;

    /// The hierarchy root the machine starts in. `None` is a configuration
    /// error reported by [`Machine::initialize`](crate::machine::Machine::initialize).
    fn initial_state(&self) -> Option<Self::State>;

    /// Parent of `state`, `None` for the root.
    fn parent(&self, state: &Self::State) -> Option<Self::State>;

    /// Substate entered automatically after `state`, `None` for leaves.
    fn initial_substate(&self, state: &Self::State) -> Option<Self::State>;

    /// Offer `event` to `state`.
    fn handle_event(
        &mut self,
        state: &Self::State,
        event: &Self::Event,
        payload: Option<&Self::Payload>,
        ctx: &mut HookContext<'_, Self>,
    ) -> HandleResult<Self::State>;

    /// Called right after `state` became current.
    fn on_enter(&mut self, _state: &Self::State, _ctx: &mut HookContext<'_, Self>) {}

    /// Called right before the machine leaves `state`.
    fn on_exit(&mut self, _state: &Self::State, _ctx: &mut HookContext<'_, Self>) {}

    fn state_name<'a>(&'a self, state: &'a Self::State) -> &'a str {
        state.name()
    }

    fn event_name<'a>(&'a self, event: &'a Self::Event) -> &'a str {
        event.name()
    }
}
