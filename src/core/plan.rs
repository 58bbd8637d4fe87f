//! Pure transition planning.
//!
//! A plan lists the states to exit (innermost first) and the states to enter
//! (outermost first) to move from the current configuration to a target.
//! Initial-substate descent below the target is not part of the plan; the
//! engine performs it after the entries because it depends on the client's
//! answers at that point.

use super::error::PathError;
use super::path::{find_least_common_ancestor, get_path};
use super::state::State;

/// Exit and entry sequence for one transition.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionPlan<S> {
    /// The state neither exited nor entered, after the external adjustment.
    /// `None` means the whole active configuration is left.
    pub lca: Option<S>,
    /// States to exit, starting with the current leaf.
    pub exits: Vec<S>,
    /// States to enter, ending with the transition target.
    pub entries: Vec<S>,
}

/// Compute the plan for moving from `current` to `target`.
///
/// `source` is the state whose handler requested the transition. It is the
/// current state or one of its ancestors. With `external` set, an LCA equal
/// to `source` or `target` is moved one level up so that state is exited and
/// re-entered.
///
/// Nothing is mutated, so a [`PathError`] leaves the caller untouched.
///
/// # Example
///
/// ```rust
/// use strata::core::{plan_transition, State};
///
/// #[derive(Clone, PartialEq, Debug)]
/// enum S { A, B, C }
///
/// impl State for S {
///     fn name(&self) -> &str {
///         match self {
///             Self::A => "A",
///             Self::B => "B",
///             Self::C => "C",
///         }
///     }
/// }
///
/// let parent = |s: &S| match s {
///     S::A => None,
///     _ => Some(S::A),
/// };
///
/// let plan = plan_transition(Some(&S::B), &S::B, &S::C, false, 16, parent).unwrap();
/// assert_eq!(plan.lca, Some(S::A));
/// assert_eq!(plan.exits, vec![S::B]);
/// assert_eq!(plan.entries, vec![S::C]);
/// ```
pub fn plan_transition<S, F>(
    current: Option<&S>,
    source: &S,
    target: &S,
    external: bool,
    max_depth: usize,
    parent: F,
) -> Result<TransitionPlan<S>, PathError>
where
    S: State,
    F: Fn(&S) -> Option<S>,
{
    let source_path = get_path(source, max_depth, &parent)?;
    let target_path = get_path(target, max_depth, &parent)?;

    let mut lca = find_least_common_ancestor(&source_path, &target_path);
    if external {
        if let Some(common) = &lca {
            if common == source || common == target {
                lca = parent(common);
            }
        }
    }

    let exits = match current {
        Some(state) => {
            let current_path = get_path(state, max_depth, &parent)?;
            let keep = position_after(&current_path, lca.as_ref());
            current_path[keep..].iter().rev().cloned().collect()
        }
        None => Vec::new(),
    };

    let start = position_after(&target_path, lca.as_ref());
    let entries = target_path[start..].to_vec();

    Ok(TransitionPlan { lca, exits, entries })
}

// Index just past `lca` in `path`, or 0 when it is absent.
fn position_after<S: PartialEq>(path: &[S], lca: Option<&S>) -> usize {
    lca.and_then(|common| path.iter().position(|s| s == common))
        .map_or(0, |index| index + 1)
}
