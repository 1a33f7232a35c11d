//! Traversals over a [`Hierarchy`].
//!
//! Both walks exclude the starting node and pair every visited node with its
//! ancestors from the starting node down. Paths are built top-down while
//! descending, each step owning its own copy.

use tracing::instrument;

use crate::arena::{Hierarchy, NodeId};
use crate::hooks::NodeHooks;

/// Sibling order used at every level of a walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    /// Declared sibling order
    #[default]
    Forward,
    /// Reversed sibling order
    Inverse,
}

/// A visited node together with the nodes leading to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkStep {
    /// Ancestors from the walk's starting node down, excluding `node`
    pub path: Vec<NodeId>,
    pub node: NodeId,
}

impl WalkStep {
    /// Number of levels below the starting node.
    pub fn depth(&self) -> usize {
        self.path.len()
    }
}

fn ordered<H: NodeHooks>(tree: &Hierarchy<H>, id: NodeId, direction: Direction) -> Vec<NodeId> {
    let mut children = tree.children(id).to_vec();
    if direction == Direction::Inverse {
        children.reverse();
    }
    children
}

/// Lazy depth-first walk, same order as [`Hierarchy::walk_tree`].
pub struct DepthFirst<'a, H> {
    tree: &'a Hierarchy<H>,
    direction: Direction,
    stack: Vec<WalkStep>,
}

impl<'a, H: NodeHooks> DepthFirst<'a, H> {
    fn new(tree: &'a Hierarchy<H>, start: NodeId, direction: Direction) -> Self {
        let mut iter = Self {
            tree,
            direction,
            stack: Vec::new(),
        };
        if tree.contains(start) {
            iter.push_children(start, Vec::new());
        }
        iter
    }

    fn push_children(&mut self, id: NodeId, mut path: Vec<NodeId>) {
        path.push(id);
        // Push children in reverse order so the first one pops first
        for child in ordered(self.tree, id, self.direction).into_iter().rev() {
            self.stack.push(WalkStep {
                path: path.clone(),
                node: child,
            });
        }
    }
}

impl<H: NodeHooks> Iterator for DepthFirst<'_, H> {
    type Item = WalkStep;

    fn next(&mut self) -> Option<Self::Item> {
        let step = self.stack.pop()?;
        self.push_children(step.node, step.path.clone());
        Some(step)
    }
}

/// Children before their parent, siblings in declared order, start node last.
pub struct PostOrderIterator<'a, H> {
    tree: &'a Hierarchy<H>,
    stack: Vec<(NodeId, bool)>,
}

impl<'a, H: NodeHooks> PostOrderIterator<'a, H> {
    fn new(tree: &'a Hierarchy<H>, start: NodeId) -> Self {
        let mut stack = Vec::new();
        if tree.contains(start) {
            stack.push((start, false));
        }
        Self { tree, stack }
    }
}

impl<H: NodeHooks> Iterator for PostOrderIterator<'_, H> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current, visited)) = self.stack.pop() {
            if visited {
                return Some(current);
            }
            self.stack.push((current, true));
            for &child in self.tree.children(current).iter().rev() {
                self.stack.push((child, false));
            }
        }
        None
    }
}

impl<H: NodeHooks> Hierarchy<H> {
    pub fn iter_depth_first(&self, start: NodeId, direction: Direction) -> DepthFirst<'_, H> {
        DepthFirst::new(self, start, direction)
    }

    pub fn iter_postorder(&self, start: NodeId) -> PostOrderIterator<'_, H> {
        PostOrderIterator::new(self, start)
    }

    /// Level-grouped walk: all direct children of `start` first, then the
    /// level-grouped walk of each child in turn.
    #[instrument(level = "trace", skip(self))]
    pub fn walk_base(&self, start: NodeId, direction: Direction) -> Vec<WalkStep> {
        let mut steps = Vec::new();
        if self.contains(start) {
            self.walk_base_into(start, &[], direction, &mut steps);
        }
        steps
    }

    fn walk_base_into(&self, id: NodeId, path: &[NodeId], direction: Direction, steps: &mut Vec<WalkStep>) {
        let mut here = path.to_vec();
        here.push(id);

        let children = ordered(self, id, direction);
        for &child in &children {
            steps.push(WalkStep {
                path: here.clone(),
                node: child,
            });
        }
        for &child in &children {
            self.walk_base_into(child, &here, direction, steps);
        }
    }

    /// Depth-first walk: each child immediately followed by its own subtree.
    #[instrument(level = "trace", skip(self))]
    pub fn walk_tree(&self, start: NodeId, direction: Direction) -> Vec<WalkStep> {
        self.iter_depth_first(start, direction).collect()
    }
}
