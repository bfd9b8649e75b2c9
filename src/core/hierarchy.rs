//! The static state tree.
//!
//! A hierarchy is built once from flat declarations and then only queried.
//! Every query walks parent links, so its cost is bounded by the depth of the
//! modeled tree rather than by anything that happens at runtime.

use super::error::DefinitionError;
use super::state::State;
use super::validation::{accumulate, check, from_result, Check};
use std::collections::{HashMap, HashSet};

/// Flat declaration of one state, as handed to [`Hierarchy::from_declarations`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateDecl<S> {
    pub id: S,
    /// `None` only for the root.
    pub parent: Option<S>,
    /// Child entered by default; required when the state has children.
    pub initial: Option<S>,
}

#[derive(Clone, Debug)]
struct StateNode<S> {
    parent: Option<S>,
    children: Vec<S>,
    initial: Option<S>,
    depth: usize,
}

/// Immutable tree of states with exactly one root.
///
/// Queries on ids that were never declared return `None`, `false` or an
/// empty slice.
///
/// # Example
///
/// ```rust
/// use chartwell::core::{Hierarchy, StateDecl};
/// use chartwell::state_enum;
///
/// state_enum! {
///     enum Node { Root, Left, LeftLeaf, Right }
/// }
///
/// let hierarchy = Hierarchy::from_declarations(&[
///     StateDecl { id: Node::Root, parent: None, initial: Some(Node::Left) },
///     StateDecl { id: Node::Left, parent: Some(Node::Root), initial: Some(Node::LeftLeaf) },
///     StateDecl { id: Node::LeftLeaf, parent: Some(Node::Left), initial: None },
///     StateDecl { id: Node::Right, parent: Some(Node::Root), initial: None },
/// ])
/// .unwrap();
///
/// assert_eq!(hierarchy.least_common_ancestor(Node::LeftLeaf, Node::Right), Some(Node::Root));
/// assert!(hierarchy.is_ancestor(Node::Left, Node::LeftLeaf));
/// ```
#[derive(Clone, Debug)]
pub struct Hierarchy<S: State> {
    root: S,
    nodes: HashMap<S, StateNode<S>>,
    order: Vec<S>,
}

impl<S: State> Hierarchy<S> {
    /// Build the tree, reporting every structural violation found.
    ///
    /// Rejected: duplicate ids, zero or several roots, parents that were
    /// never declared, composite states without a valid initial child,
    /// initial children on leaves, and parent cycles.
    pub fn from_declarations(declarations: &[StateDecl<S>]) -> Result<Self, Vec<DefinitionError>> {
        let mut checks: Vec<Check> = Vec::new();

        let mut seen = HashSet::new();
        for decl in declarations {
            let fresh = seen.insert(decl.id);
            checks.push(check(fresh, || DefinitionError::DuplicateState {
                state: decl.id.name().to_string(),
            }));
        }

        let roots: Vec<S> = declarations
            .iter()
            .filter(|decl| decl.parent.is_none())
            .map(|decl| decl.id)
            .collect();
        checks.push(check(!roots.is_empty(), || DefinitionError::NoRoot));
        checks.push(check(roots.len() <= 1, || DefinitionError::MultipleRoots {
            roots: roots.iter().map(|s| s.name().to_string()).collect(),
        }));

        let mut children: HashMap<S, Vec<S>> = HashMap::new();
        for decl in declarations {
            if let Some(parent) = decl.parent {
                checks.push(check(seen.contains(&parent), || {
                    DefinitionError::UnknownParent {
                        state: decl.id.name().to_string(),
                        parent: parent.name().to_string(),
                    }
                }));
                children.entry(parent).or_default().push(decl.id);
            }
        }

        for decl in declarations {
            let kids = children.get(&decl.id).map(Vec::as_slice).unwrap_or(&[]);
            let verdict = match (kids.is_empty(), decl.initial) {
                (false, None) => Err(DefinitionError::MissingInitialChild {
                    state: decl.id.name().to_string(),
                }),
                (_, Some(initial)) if !kids.contains(&initial) => {
                    Err(DefinitionError::InvalidInitialChild {
                        state: decl.id.name().to_string(),
                        initial: initial.name().to_string(),
                    })
                }
                _ => Ok(()),
            };
            checks.push(from_result(verdict));
        }

        accumulate(checks)?;

        // Structure is sane; now every parent chain must end at the root.
        let parents: HashMap<S, Option<S>> = declarations
            .iter()
            .map(|decl| (decl.id, decl.parent))
            .collect();
        let limit = declarations.len();
        let mut depths: HashMap<S, usize> = HashMap::new();
        let mut cycle_checks: Vec<Check> = Vec::new();
        for decl in declarations {
            let mut current = decl.id;
            let mut depth = 0;
            while let Some(Some(parent)) = parents.get(&current) {
                current = *parent;
                depth += 1;
                if depth > limit {
                    break;
                }
            }
            cycle_checks.push(check(depth <= limit, || DefinitionError::Cycle {
                state: decl.id.name().to_string(),
            }));
            depths.insert(decl.id, depth);
        }
        accumulate(cycle_checks)?;

        let nodes = declarations
            .iter()
            .map(|decl| {
                let node = StateNode {
                    parent: decl.parent,
                    children: children.remove(&decl.id).unwrap_or_default(),
                    initial: decl.initial,
                    depth: depths.get(&decl.id).copied().unwrap_or_default(),
                };
                (decl.id, node)
            })
            .collect();

        Ok(Self {
            root: roots[0],
            nodes,
            order: declarations.iter().map(|decl| decl.id).collect(),
        })
    }

    pub fn root(&self) -> S {
        self.root
    }

    /// Number of states in the tree.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, state: S) -> bool {
        self.nodes.contains_key(&state)
    }

    /// All states in declaration order.
    pub fn states(&self) -> impl Iterator<Item = S> + '_ {
        self.order.iter().copied()
    }

    pub fn parent(&self, state: S) -> Option<S> {
        self.nodes.get(&state).and_then(|node| node.parent)
    }

    /// Children in declaration order.
    pub fn children(&self, state: S) -> &[S] {
        self.nodes
            .get(&state)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn initial_child(&self, state: S) -> Option<S> {
        self.nodes.get(&state).and_then(|node| node.initial)
    }

    /// Distance from the root; the root itself is at depth 0.
    pub fn depth(&self, state: S) -> Option<usize> {
        self.nodes.get(&state).map(|node| node.depth)
    }

    pub fn is_leaf(&self, state: S) -> bool {
        self.nodes
            .get(&state)
            .is_some_and(|node| node.children.is_empty())
    }

    pub fn is_composite(&self, state: S) -> bool {
        self.nodes
            .get(&state)
            .is_some_and(|node| !node.children.is_empty())
    }

    /// `state` followed by each of its ancestors up to the root.
    pub fn ancestors(&self, state: S) -> Ancestors<'_, S> {
        Ancestors {
            hierarchy: self,
            next: self.contains(state).then_some(state),
        }
    }

    /// True when `ancestor` is a proper ancestor of `descendant`.
    pub fn is_ancestor(&self, ancestor: S, descendant: S) -> bool {
        self.ancestors(descendant).skip(1).any(|s| s == ancestor)
    }

    /// Deepest state that is `a` or an ancestor of `a`, and likewise for `b`.
    pub fn least_common_ancestor(&self, a: S, b: S) -> Option<S> {
        let (mut a, mut b) = (a, b);
        let mut depth_a = self.depth(a)?;
        let mut depth_b = self.depth(b)?;
        while depth_a > depth_b {
            a = self.parent(a)?;
            depth_a -= 1;
        }
        while depth_b > depth_a {
            b = self.parent(b)?;
            depth_b -= 1;
        }
        while a != b {
            a = self.parent(a)?;
            b = self.parent(b)?;
        }
        Some(a)
    }

    /// Root-to-`state` path, inclusive at both ends.
    pub fn path(&self, state: S) -> Vec<S> {
        let mut path: Vec<S> = self.ancestors(state).collect();
        path.reverse();
        path
    }

    /// States entered below `state` by following initial children to a leaf.
    pub fn initial_descent(&self, state: S) -> Vec<S> {
        let mut descent = Vec::new();
        let mut current = state;
        while let Some(child) = self.initial_child(current) {
            descent.push(child);
            current = child;
        }
        descent
    }

    /// Leaf reached by entering `state` and descending through initial children.
    pub fn default_leaf(&self, state: S) -> S {
        self.initial_descent(state).last().copied().unwrap_or(state)
    }
}

/// Iterator returned by [`Hierarchy::ancestors`].
pub struct Ancestors<'a, S: State> {
    hierarchy: &'a Hierarchy<S>,
    next: Option<S>,
}

impl<S: State> Iterator for Ancestors<'_, S> {
    type Item = S;

    fn next(&mut self) -> Option<S> {
        let current = self.next?;
        self.next = self.hierarchy.parent(current);
        Some(current)
    }
}
