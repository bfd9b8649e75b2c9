//! The active configuration of an instance.

use super::hierarchy::Hierarchy;
use super::state::State;
use serde::{Deserialize, Serialize};

/// Root-to-leaf path of the currently active states.
///
/// Index `n` holds the active state at depth `n`, so per-level questions
/// ("which child of X is active?") are answered by looking one slot further.
/// The path is empty until the owning instance is initialized.
///
/// # Example
///
/// ```rust
/// use chartwell::core::ActiveConfiguration;
/// use chartwell::state_enum;
///
/// state_enum! {
///     enum Level { Root, Outer, Inner }
/// }
///
/// let config = ActiveConfiguration::from_path(vec![Level::Root, Level::Outer, Level::Inner]);
/// assert_eq!(config.leaf(), Some(Level::Inner));
/// assert_eq!(config.active_child(Level::Outer), Some(Level::Inner));
/// assert_eq!(config.active_child(Level::Inner), None);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct ActiveConfiguration<S: State> {
    path: Vec<S>,
}

impl<S: State> Default for ActiveConfiguration<S> {
    fn default() -> Self {
        Self { path: Vec::new() }
    }
}

impl<S: State> ActiveConfiguration<S> {
    /// Wrap a path without checking it; see [`is_consistent_with`](Self::is_consistent_with).
    pub fn from_path(path: Vec<S>) -> Self {
        Self { path }
    }

    pub fn as_slice(&self) -> &[S] {
        &self.path
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = S> + '_ {
        self.path.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Innermost active state.
    pub fn leaf(&self) -> Option<S> {
        self.path.last().copied()
    }

    /// Active state at `depth` (0 is the root).
    pub fn at_depth(&self, depth: usize) -> Option<S> {
        self.path.get(depth).copied()
    }

    pub fn contains(&self, state: S) -> bool {
        self.path.contains(&state)
    }

    /// Active child of `parent`, or `None` if `parent` is inactive or the leaf.
    pub fn active_child(&self, parent: S) -> Option<S> {
        let index = self.path.iter().position(|s| *s == parent)?;
        self.path.get(index + 1).copied()
    }

    /// True when the path starts at the root, follows parent/child links and
    /// ends at a leaf.
    pub fn is_consistent_with(&self, hierarchy: &Hierarchy<S>) -> bool {
        let Some((&first, _)) = self.path.split_first() else {
            return false;
        };
        first == hierarchy.root()
            && self
                .path
                .windows(2)
                .all(|pair| hierarchy.parent(pair[1]) == Some(pair[0]))
            && self.leaf().is_some_and(|leaf| hierarchy.is_leaf(leaf))
    }

    pub fn into_vec(self) -> Vec<S> {
        self.path
    }
}
