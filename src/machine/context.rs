//! Context handed to client hooks and handlers.

use std::collections::VecDeque;

/// An event waiting in the machine's FIFO.
#[derive(Debug)]
pub struct Deferred<E, P> {
    pub event: E,
    pub payload: Option<P>,
}

/// View of the running machine given to hooks and handlers.
///
/// Posting an event from inside a hook never dispatches it immediately. It is
/// appended to the machine's queue and handled after the current event, its
/// transition and any earlier queued events have completed.
pub struct Context<'a, S, E, P> {
    current: Option<&'a S>,
    version: u64,
    queue: &'a mut VecDeque<Deferred<E, P>>,
}

impl<'a, S, E, P> Context<'a, S, E, P> {
    pub(crate) fn new(
        current: Option<&'a S>,
        version: u64,
        queue: &'a mut VecDeque<Deferred<E, P>>,
    ) -> Self {
        Self {
            current,
            version,
            queue,
        }
    }

    /// Queue an event without payload.
    pub fn post(&mut self, event: E) {
        self.queue.push_back(Deferred {
            event,
            payload: None,
        });
    }

    /// Queue an event with a payload.
    pub fn post_with(&mut self, event: E, payload: P) {
        self.queue.push_back(Deferred {
            event,
            payload: Some(payload),
        });
    }

    /// Number of events waiting behind the one being handled.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// The machine's current state at the time the hook runs.
    ///
    /// Inside an enter hook this is the state being entered; inside an exit
    /// hook it is the state being exited.
    pub fn current(&self) -> Option<&S> {
        self.current
    }

    /// Transition counter. Exit hooks observe the value from before the
    /// transition, enter hooks the value after it.
    pub fn version(&self) -> u64 {
        self.version
    }
}
