//! Guard predicates for table-driven event rules.
//!
//! Guards are pure boolean functions over the client's data and the event
//! payload. A rule whose guard rejects the event does not fire, and the next
//! rule (or the parent state) gets a chance to handle it.

/// Pure predicate that decides whether a rule may fire.
///
/// # Example
///
/// ```rust
/// use strata::core::Guard;
///
/// struct Session {
///     retries: u32,
/// }
///
/// let may_retry = Guard::new(|s: &Session, _payload: Option<&()>| s.retries < 3);
///
/// assert!(may_retry.check(&Session { retries: 1 }, None));
/// assert!(!may_retry.check(&Session { retries: 3 }, None));
/// ```
pub struct Guard<D, P = ()> {
    predicate: Box<dyn Fn(&D, Option<&P>) -> bool + Send + Sync>,
}

impl<D, P> Guard<D, P> {
    /// Create a guard from a pure predicate function.
    ///
    /// The predicate must be deterministic and free of side effects; it may
    /// be evaluated for events that end up handled by another rule.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&D, Option<&P>) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
        }
    }

    /// Guard that only looks at the client data.
    pub fn on_data<F>(predicate: F) -> Self
    where
        F: Fn(&D) -> bool + Send + Sync + 'static,
    {
        Self::new(move |data, _| predicate(data))
    }

    /// Check if the guard allows the rule to fire.
    pub fn check(&self, data: &D, payload: Option<&P>) -> bool {
        (self.predicate)(data, payload)
    }
}

impl<D, P> std::fmt::Debug for Guard<D, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Guard(..)")
    }
}
