//! Hierarchical state machine engine.
//!
//! This module is the imperative shell around [`crate::core`]: it owns the
//! current state, the FIFO of deferred events and the version counter, and
//! calls the client's hooks in the order the transition plan dictates.
//!
//! # Re-entrancy
//!
//! Hooks and handlers never run nested inside one another. Events posted
//! through the [`Context`] while an event is in flight are queued and
//! drained, in arrival order, before [`Machine::handle`] returns.

mod config;
mod context;
mod error;
mod hierarchy;

pub use config::{ConfigError, MachineConfig};
pub use context::{Context, Deferred};
pub use error::MachineError;
pub use hierarchy::{Hierarchy, HookContext};

use crate::core::{
    get_path, plan_transition, HandleResult, PathError, TransitionHistory, TransitionRecord,
};
use chrono::Utc;
use std::collections::VecDeque;

/// Summary of one call to [`Machine::handle`], including the events it
/// drained from the queue.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Events taken from the queue and offered to the hierarchy
    pub dispatched: usize,
    /// Events consumed without a transition
    pub handled: usize,
    /// Events no state handled
    pub unhandled: usize,
    /// Transitions performed
    pub transitions: usize,
}

enum Dispatch {
    Unhandled,
    Handled,
    Transitioned,
}

impl DispatchReport {
    fn record(&mut self, dispatch: Dispatch) {
        self.dispatched += 1;
        match dispatch {
            Dispatch::Unhandled => self.unhandled += 1,
            Dispatch::Handled => self.handled += 1,
            Dispatch::Transitioned => self.transitions += 1,
        }
    }
}

/// Event-driven hierarchical state machine.
///
/// The machine is created inert. [`initialize`](Self::initialize), or the
/// first [`handle`](Self::handle), enters the hierarchy root and follows the
/// initial substates down to a leaf. At rest the current state is always a
/// leaf.
pub struct Machine<H: Hierarchy> {
    hierarchy: H,
    config: MachineConfig,
    current: Option<H::State>,
    queue: VecDeque<Deferred<H::Event, H::Payload>>,
    version: u64,
    initialized: bool,
    poisoned: bool,
    history: Option<TransitionHistory<H::State>>,
}

impl<H: Hierarchy> Machine<H> {
    /// Create a machine with the default configuration.
    pub fn new(hierarchy: H) -> Self {
        Self::build(hierarchy, MachineConfig::default())
    }

    /// Create a machine with a validated configuration.
    pub fn with_config(hierarchy: H, config: MachineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(hierarchy, config))
    }

    fn build(hierarchy: H, config: MachineConfig) -> Self {
        let history = config.record_history.then(|| match config.history_limit {
            Some(limit) => TransitionHistory::with_limit(limit),
            None => TransitionHistory::new(),
        });

        Self {
            hierarchy,
            config,
            current: None,
            queue: VecDeque::new(),
            version: 0,
            initialized: false,
            poisoned: false,
            history,
        }
    }

    /// Enter the initial state and descend to a leaf.
    ///
    /// Calling this again is a no-op. Events posted by enter hooks are
    /// handled before it returns.
    pub fn initialize(&mut self) -> Result<(), MachineError> {
        self.ensure_usable()?;
        if self.initialized {
            return Ok(());
        }

        let result = self.start().and_then(|()| self.drain().map(|_| ()));
        self.poison_on_error(result)
    }

    /// Deliver an event without payload.
    pub fn handle(&mut self, event: H::Event) -> Result<DispatchReport, MachineError> {
        self.submit(Deferred {
            event,
            payload: None,
        })
    }

    /// Deliver an event with a payload.
    ///
    /// The payload is lent to each handler the event is offered to and
    /// dropped once the event has been dispatched.
    pub fn handle_with(
        &mut self,
        event: H::Event,
        payload: H::Payload,
    ) -> Result<DispatchReport, MachineError> {
        self.submit(Deferred {
            event,
            payload: Some(payload),
        })
    }

    /// Whether `state` is the current state or one of its ancestors.
    pub fn is_in(&self, state: &H::State) -> bool {
        let mut cursor = self.current.clone();
        let mut depth = 0;

        while let Some(active) = cursor {
            if &active == state {
                return true;
            }
            depth += 1;
            if depth >= self.config.max_depth {
                break;
            }
            cursor = self.hierarchy.parent(&active);
        }

        false
    }

    pub fn current_state(&self) -> Option<&H::State> {
        self.current.as_ref()
    }

    /// Number of transitions performed so far.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    pub fn history(&self) -> Option<&TransitionHistory<H::State>> {
        self.history.as_ref()
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn hierarchy(&self) -> &H {
        &self.hierarchy
    }

    /// Mutable access to the client, e.g. to update data read by guards.
    pub fn hierarchy_mut(&mut self) -> &mut H {
        &mut self.hierarchy
    }

    pub fn into_hierarchy(self) -> H {
        self.hierarchy
    }

    fn submit(
        &mut self,
        deferred: Deferred<H::Event, H::Payload>,
    ) -> Result<DispatchReport, MachineError> {
        self.initialize()?;

        tracing::trace!(
            "[{}] queue {} ({} pending)",
            self.config.name,
            self.hierarchy.event_name(&deferred.event),
            self.queue.len()
        );
        self.queue.push_back(deferred);

        let result = self.drain();
        self.poison_on_error(result)
    }

    fn ensure_usable(&self) -> Result<(), MachineError> {
        if self.poisoned {
            return Err(MachineError::Poisoned {
                name: self.config.name.clone(),
            });
        }
        Ok(())
    }

    fn poison_on_error<T>(&mut self, result: Result<T, MachineError>) -> Result<T, MachineError> {
        if let Err(err) = &result {
            tracing::error!("[{}] configuration error: {}", self.config.name, err);
            self.poisoned = true;
            self.queue.clear();
        }
        result
    }

    fn start(&mut self) -> Result<(), MachineError> {
        debug_assert!(self.current.is_none());

        let initial = self
            .hierarchy
            .initial_state()
            .ok_or(MachineError::MissingInitialState)?;

        if let Some(parent) = self.hierarchy.parent(&initial) {
            return Err(MachineError::InitialStateHasParent {
                state: self.hierarchy.state_name(&initial).to_string(),
                parent: self.hierarchy.state_name(&parent).to_string(),
            });
        }

        tracing::debug!(
            "[{}] initializing in {}",
            self.config.name,
            self.hierarchy.state_name(&initial)
        );

        self.initialized = true;
        self.enter_state(initial);
        self.follow_initial_substates()
    }

    fn drain(&mut self) -> Result<DispatchReport, MachineError> {
        let mut report = DispatchReport::default();

        while let Some(Deferred { event, payload }) = self.queue.pop_front() {
            let dispatch = self.dispatch(&event, payload.as_ref())?;
            report.record(dispatch);
        }

        Ok(report)
    }

    // Offer the event to the current state and its ancestors until one
    // handles it.
    fn dispatch(
        &mut self,
        event: &H::Event,
        payload: Option<&H::Payload>,
    ) -> Result<Dispatch, MachineError> {
        let mut cursor = self.current.clone();
        let mut depth = 0;

        while let Some(state) = cursor {
            depth += 1;
            if depth > self.config.max_depth {
                return Err(PathError::MaxDepthExceeded {
                    state: self.current_name(),
                    max_depth: self.config.max_depth,
                }
                .into());
            }

            let result = {
                let mut ctx = Context::new(self.current.as_ref(), self.version, &mut self.queue);
                self.hierarchy.handle_event(&state, event, payload, &mut ctx)
            };

            match result {
                HandleResult::NotHandled => cursor = self.hierarchy.parent(&state),
                HandleResult::Handled => {
                    tracing::debug!(
                        "[{}] {} handled by {}",
                        self.config.name,
                        self.hierarchy.event_name(event),
                        self.hierarchy.state_name(&state)
                    );
                    return Ok(Dispatch::Handled);
                }
                HandleResult::Transition { target, external } => {
                    self.transition(event, &state, &target, external)?;
                    return Ok(Dispatch::Transitioned);
                }
            }
        }

        tracing::debug!(
            "[{}] unhandled event {} in {}",
            self.config.name,
            self.hierarchy.event_name(event),
            self.current_name()
        );
        Ok(Dispatch::Unhandled)
    }

    fn transition(
        &mut self,
        event: &H::Event,
        source: &H::State,
        target: &H::State,
        external: bool,
    ) -> Result<(), MachineError> {
        let hierarchy = &self.hierarchy;
        let plan = plan_transition(
            self.current.as_ref(),
            source,
            target,
            external,
            self.config.max_depth,
            |state| hierarchy.parent(state),
        )?;

        tracing::debug!(
            "[{}] {}: {} -> {}{}",
            self.config.name,
            self.hierarchy.event_name(event),
            self.hierarchy.state_name(source),
            self.hierarchy.state_name(target),
            if external { " (external)" } else { "" }
        );

        let from = self.current.clone();

        for state in &plan.exits {
            debug_assert_eq!(self.current.as_ref(), Some(state));
            self.exit_current_state();
        }

        self.version += 1;

        for state in plan.entries {
            self.enter_state(state);
        }

        self.follow_initial_substates()?;

        if self.history.is_some() {
            let event_name = self.hierarchy.event_name(event).to_string();
            if let (Some(history), Some(from), Some(to)) =
                (self.history.as_mut(), from, self.current.clone())
            {
                history.record(TransitionRecord {
                    event: event_name,
                    source: source.clone(),
                    target: target.clone(),
                    from,
                    to,
                    external,
                    version: self.version,
                    timestamp: Utc::now(),
                });
            }
        }

        Ok(())
    }

    // Enter initial substates until a leaf. The depth of every entered state
    // counts against max_depth, starting from the depth of the current one.
    fn follow_initial_substates(&mut self) -> Result<(), MachineError> {
        let max_depth = self.config.max_depth;
        let mut depth = match &self.current {
            Some(state) => {
                let hierarchy = &self.hierarchy;
                get_path(state, max_depth, |s| hierarchy.parent(s))?.len()
            }
            None => return Ok(()),
        };

        while let Some(substate) = self
            .current
            .as_ref()
            .and_then(|state| self.hierarchy.initial_substate(state))
        {
            if depth >= max_depth {
                return Err(MachineError::DescentTooDeep {
                    state: self.current_name(),
                    substate: self.hierarchy.state_name(&substate).to_string(),
                    max_depth,
                });
            }

            depth += 1;
            self.enter_state(substate);
        }

        Ok(())
    }

    fn enter_state(&mut self, state: H::State) {
        tracing::trace!(
            "[{}] enter {}",
            self.config.name,
            self.hierarchy.state_name(&state)
        );

        self.current = Some(state.clone());
        let mut ctx = Context::new(self.current.as_ref(), self.version, &mut self.queue);
        self.hierarchy.on_enter(&state, &mut ctx);
    }

    fn exit_current_state(&mut self) {
        let Some(state) = self.current.clone() else {
            return;
        };

        tracing::trace!(
            "[{}] exit {}",
            self.config.name,
            self.hierarchy.state_name(&state)
        );

        let mut ctx = Context::new(self.current.as_ref(), self.version, &mut self.queue);
        self.hierarchy.on_exit(&state, &mut ctx);
        self.current = self.hierarchy.parent(&state);
    }

    fn current_name(&self) -> String {
        self.current
            .as_ref()
            .map(|state| self.hierarchy.state_name(state).to_string())
            .unwrap_or_else(|| "<none>".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Event, State};

    #[derive(Clone, Copy, PartialEq, Debug)]
    enum Node {
        Root,
        Idle,
        Busy,
        Orphan,
    }

    impl State for Node {
        fn name(&self) -> &str {
            match self {
                Self::Root => "Root",
                Self::Idle => "Idle",
                Self::Busy => "Busy",
                Self::Orphan => "Orphan",
            }
        }
    }

    #[derive(Debug, PartialEq)]
    enum Signal {
        Start,
        Stop,
        Noise,
        Echo,
    }

    impl Event for Signal {
        fn name(&self) -> &str {
            match self {
                Self::Start => "Start",
                Self::Stop => "Stop",
                Self::Noise => "Noise",
                Self::Echo => "Echo",
            }
        }
    }

    #[derive(Default)]
    struct Worker {
        initial: Option<Node>,
        entered: Vec<Node>,
        echoes: Vec<u32>,
        // Idle's initial substate points back at Root when set
        cyclic: bool,
    }

    impl Worker {
        fn rooted() -> Self {
            Self {
                initial: Some(Node::Root),
                ..Self::default()
            }
        }
    }

    impl Hierarchy for Worker {
        type State = Node;
        type Event = Signal;
        type Payload = u32;

        fn initial_state(&self) -> Option<Node> {
            self.initial
        }

        fn parent(&self, state: &Node) -> Option<Node> {
            match state {
                Node::Root => None,
                Node::Idle | Node::Busy => Some(Node::Root),
                Node::Orphan => Some(Node::Busy),
            }
        }

        fn initial_substate(&self, state: &Node) -> Option<Node> {
            match state {
                Node::Root => Some(Node::Idle),
                Node::Idle if self.cyclic => Some(Node::Root),
                _ => None,
            }
        }

        fn handle_event(
            &mut self,
            state: &Node,
            event: &Signal,
            payload: Option<&u32>,
            ctx: &mut HookContext<'_, Self>,
        ) -> HandleResult<Node> {
            match (state, event) {
                (Node::Idle, Signal::Start) => HandleResult::transition(Node::Busy),
                (Node::Busy, Signal::Stop) => {
                    ctx.post_with(Signal::Echo, 99);
                    HandleResult::transition(Node::Idle)
                }
                (Node::Root, Signal::Echo) => {
                    self.echoes.extend(payload.copied());
                    HandleResult::Handled
                }
                _ => HandleResult::NotHandled,
            }
        }

        fn on_enter(&mut self, state: &Node, _ctx: &mut HookContext<'_, Self>) {
            self.entered.push(*state);
        }
    }

    #[test]
    fn new_machine_is_inert() {
        let machine = Machine::new(Worker::rooted());
        assert!(!machine.is_initialized());
        assert_eq!(machine.current_state(), None);
        assert_eq!(machine.version(), 0);
        assert!(!machine.is_in(&Node::Root));
    }

    #[test]
    fn initialize_descends_to_leaf() {
        let mut machine = Machine::new(Worker::rooted());
        machine.initialize().unwrap();

        assert_eq!(machine.current_state(), Some(&Node::Idle));
        assert_eq!(machine.hierarchy().entered, vec![Node::Root, Node::Idle]);
        assert_eq!(machine.version(), 0);
    }

    #[test]
    fn initialize_is_idempotent() {
        let mut machine = Machine::new(Worker::rooted());
        machine.initialize().unwrap();
        machine.initialize().unwrap();

        assert_eq!(machine.hierarchy().entered, vec![Node::Root, Node::Idle]);
    }

    #[test]
    fn missing_initial_state_is_an_error_and_poisons() {
        let mut machine = Machine::new(Worker::default());

        assert_eq!(machine.initialize(), Err(MachineError::MissingInitialState));
        assert!(machine.is_poisoned());
        assert!(matches!(
            machine.handle(Signal::Start),
            Err(MachineError::Poisoned { .. })
        ));
    }

    #[test]
    fn initial_state_with_parent_is_rejected() {
        let mut machine = Machine::new(Worker {
            initial: Some(Node::Idle),
            ..Worker::default()
        });

        assert_eq!(
            machine.initialize(),
            Err(MachineError::InitialStateHasParent {
                state: "Idle".to_string(),
                parent: "Root".to_string(),
            })
        );
    }

    #[test]
    fn cyclic_initial_substates_are_detected() {
        let mut machine = Machine::new(Worker {
            cyclic: true,
            ..Worker::rooted()
        });

        assert!(matches!(
            machine.initialize(),
            Err(MachineError::DescentTooDeep { .. })
        ));
    }

    #[test]
    fn handle_initializes_implicitly() {
        let mut machine = Machine::new(Worker::rooted());
        let report = machine.handle(Signal::Start).unwrap();

        assert_eq!(machine.current_state(), Some(&Node::Busy));
        assert_eq!(report.transitions, 1);
        assert_eq!(machine.version(), 1);
    }

    #[test]
    fn unhandled_event_is_reported_not_failed() {
        let mut machine = Machine::new(Worker::rooted());
        let report = machine.handle(Signal::Noise).unwrap();

        assert_eq!(report.dispatched, 1);
        assert_eq!(report.unhandled, 1);
        assert_eq!(machine.current_state(), Some(&Node::Idle));
        assert_eq!(machine.version(), 0);
    }

    #[test]
    fn posted_events_are_drained_with_payload() {
        let mut machine = Machine::new(Worker::rooted());
        machine.handle(Signal::Start).unwrap();

        let report = machine.handle(Signal::Stop).unwrap();

        assert_eq!(report.dispatched, 2);
        assert_eq!(report.transitions, 1);
        assert_eq!(report.handled, 1);
        assert_eq!(machine.hierarchy().echoes, vec![99]);
        assert_eq!(machine.current_state(), Some(&Node::Idle));
    }

    #[test]
    fn handle_with_lends_payload() {
        let mut machine = Machine::new(Worker::rooted());
        machine.handle_with(Signal::Echo, 5).unwrap();

        assert_eq!(machine.hierarchy().echoes, vec![5]);
    }

    #[test]
    fn is_in_checks_ancestors() {
        let mut machine = Machine::new(Worker::rooted());
        machine.initialize().unwrap();

        assert!(machine.is_in(&Node::Idle));
        assert!(machine.is_in(&Node::Root));
        assert!(!machine.is_in(&Node::Busy));
        assert!(!machine.is_in(&Node::Orphan));
    }

    #[test]
    fn history_records_transitions_when_enabled() {
        let config = MachineConfig::named("worker").with_history(Some(8));
        let mut machine = Machine::with_config(Worker::rooted(), config).unwrap();

        machine.handle(Signal::Start).unwrap();
        machine.handle(Signal::Stop).unwrap();

        let history = machine.history().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history.records()[0].event, "Start");
        assert_eq!(history.records()[0].version, 1);
        assert_eq!(history.records()[1].version, 2);
        assert_eq!(
            history.get_path(),
            vec![&Node::Idle, &Node::Busy, &Node::Idle]
        );
    }

    #[test]
    fn history_is_off_by_default() {
        let mut machine = Machine::new(Worker::rooted());
        machine.handle(Signal::Start).unwrap();
        assert!(machine.history().is_none());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = MachineConfig::default().with_max_depth(0);
        assert!(matches!(
            Machine::with_config(Worker::rooted(), config),
            Err(ConfigError::ZeroMaxDepth)
        ));
    }
}
