//! Root-first state paths and least-common-ancestor lookup.

use super::error::PathError;
use super::state::State;

/// Default bound on hierarchy depth, counting the state itself.
pub const DEFAULT_MAX_DEPTH: usize = 16;

/// Build the path from the hierarchy root down to `state`.
///
/// Parents are read with `parent` until a root is reached. The returned
/// vector is root-first and ends with `state`. A chain longer than
/// `max_depth` states is reported as [`PathError::MaxDepthExceeded`] rather
/// than truncated.
///
/// # Example
///
/// ```rust
/// use strata::core::{get_path, State};
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
///     S::B => Some(S::A),
///     S::C => Some(S::B),
/// };
///
/// let path = get_path(&S::C, 16, parent).unwrap();
/// assert_eq!(path, vec![S::A, S::B, S::C]);
/// ```
pub fn get_path<S, F>(state: &S, max_depth: usize, parent: F) -> Result<Vec<S>, PathError>
where
    S: State,
    F: Fn(&S) -> Option<S>,
{
    let mut path = vec![state.clone()];
    let mut cursor = parent(state);

    while let Some(next) = cursor {
        if path.len() >= max_depth {
            return Err(PathError::MaxDepthExceeded {
                state: state.name().to_string(),
                max_depth,
            });
        }
        cursor = parent(&next);
        path.push(next);
    }

    path.reverse();
    Ok(path)
}

/// Find the deepest state shared by two root-first paths.
///
/// Returns `None` when the paths differ at the root, which only happens when
/// the states live in disjoint hierarchies.
pub fn find_least_common_ancestor<S: State>(a: &[S], b: &[S]) -> Option<S> {
    a.iter()
        .zip(b.iter())
        .take_while(|(x, y)| x == y)
        .last()
        .map(|(x, _)| x.clone())
}
