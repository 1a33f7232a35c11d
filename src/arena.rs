use generational_arena::{Arena, Index};
use std::fmt;
use tracing::{debug, instrument};

use crate::config::Settings;
use crate::errors::{Holder, NodeError, NodeResult};
use crate::hooks::{unique_name, NodeHooks, Plain};

/// Handle of a node stored in a [`Hierarchy`].
///
/// Handles stay valid until the node is destroyed; afterwards the slot's
/// generation no longer matches and every lookup treats the handle as null.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) Index);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (slot, generation) = self.0.into_raw_parts();
        write!(f, "NodeId({slot}:{generation})")
    }
}

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug)]
pub struct HierarchyNode<H> {
    /// Unique among siblings, free-form on roots
    name: String,
    /// Index of parent node in the arena, None for root nodes
    parent: Option<NodeId>,
    /// Ordered child indices; this order is the sibling order
    children: Vec<NodeId>,
    /// Caller extension state
    hooks: H,
}

impl<H> HierarchyNode<H> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }
}

/// One step of a [`Hierarchy::child_at`] path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStep<'a> {
    /// Position among the children; negative counts from the end (`-1` is the last child)
    Index(isize),
    /// Exact child name
    Name(&'a str),
}

impl From<isize> for PathStep<'_> {
    fn from(index: isize) -> Self {
        PathStep::Index(index)
    }
}

impl From<i32> for PathStep<'_> {
    fn from(index: i32) -> Self {
        PathStep::Index(isize::try_from(index).unwrap_or(isize::MIN))
    }
}

impl From<usize> for PathStep<'_> {
    fn from(index: usize) -> Self {
        // too large to address any child
        PathStep::Index(isize::try_from(index).unwrap_or(isize::MAX))
    }
}

impl<'a> From<&'a str> for PathStep<'a> {
    fn from(name: &'a str) -> Self {
        PathStep::Name(name)
    }
}

impl<'a> From<&'a String> for PathStep<'a> {
    fn from(name: &'a String) -> Self {
        PathStep::Name(name.as_str())
    }
}

/// Position at which `attach_child_at` inserts into a sequence of `len` children.
///
/// Non-negative indices are clamped to `len`. Negative indices count from
/// the end: `-1` appends, `-2` inserts before the last child, and anything
/// beyond `-len` inserts at the front.
pub fn insert_position(index: isize, len: usize) -> usize {
    if index >= 0 {
        (index as usize).min(len)
    } else {
        let back = index.unsigned_abs();
        if back > len {
            0
        } else {
            len - back + 1
        }
    }
}

/// Position selected by a lookup index among `len` children, `None` if out of bounds.
pub fn lookup_position(index: isize, len: usize) -> Option<usize> {
    if index >= 0 {
        let index = index as usize;
        (index < len).then_some(index)
    } else {
        let back = index.unsigned_abs();
        (back <= len).then(|| len - back)
    }
}

/// Arena-based forest of named, ordered nodes.
///
/// Uses generational arena for memory-safe node references and O(1) lookups.
/// Any number of roots may live in one hierarchy; nodes start out as roots
/// and only become children through [`Hierarchy::attach_child`].
#[derive(Debug)]
pub struct Hierarchy<H = Plain> {
    /// Arena storage for all tree nodes
    arena: Arena<HierarchyNode<H>>,
    settings: Settings,
}

impl<H: NodeHooks> Default for Hierarchy<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: NodeHooks> Hierarchy<H> {
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            arena: Arena::new(),
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Creates a standalone root node carrying `hooks`.
    #[instrument(level = "trace", skip(self, hooks))]
    pub fn create_with(&mut self, name: impl Into<String> + fmt::Debug, hooks: H) -> NodeId {
        NodeId(self.arena.insert(HierarchyNode {
            name: name.into(),
            parent: None,
            children: Vec::new(),
            hooks,
        }))
    }

    /// Creates a standalone root node with default hooks.
    pub fn create(&mut self, name: impl Into<String> + fmt::Debug) -> NodeId
    where
        H: Default,
    {
        self.create_with(name, H::default())
    }

    /// Creates a standalone root node named after the configured default name.
    pub fn create_default(&mut self) -> NodeId
    where
        H: Default,
    {
        let name = self.settings.default_name.clone();
        self.create_with(name, H::default())
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.contains(id.0)
    }

    /// Number of live nodes across all trees.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Every live node without a parent.
    pub fn roots(&self) -> Vec<NodeId> {
        self.arena
            .iter()
            .filter(|(_, node)| node.parent.is_none())
            .map(|(idx, _)| NodeId(idx))
            .collect()
    }

    pub fn get_node(&self, id: NodeId) -> Option<&HierarchyNode<H>> {
        self.arena.get(id.0)
    }

    pub fn hooks_mut(&mut self, id: NodeId) -> Option<&mut H> {
        self.arena.get_mut(id.0).map(|node| &mut node.hooks)
    }

    fn live(&self, id: NodeId) -> NodeResult<&HierarchyNode<H>> {
        self.arena.get(id.0).ok_or(NodeError::NullNode)
    }

    fn live_mut(&mut self, id: NodeId) -> NodeResult<&mut HierarchyNode<H>> {
        self.arena.get_mut(id.0).ok_or(NodeError::NullNode)
    }

    /// Appends `node` as the last child of `parent`.
    pub fn attach_child(&mut self, parent: NodeId, node: NodeId) -> NodeResult<()> {
        self.attach_child_at(parent, node, -1)
    }

    /// Attaches the root `node` under `parent` at `index` (see [`insert_position`]).
    ///
    /// The node is renamed against its new siblings, then `on_parent_changed`
    /// fires on the node and `on_child_added` on the parent.
    #[instrument(level = "trace", skip(self))]
    pub fn attach_child_at(&mut self, parent: NodeId, node: NodeId, index: isize) -> NodeResult<()> {
        let len = self.live(parent)?.children.len();
        let child = self.live(node)?;

        if let Some(holder) = child.parent {
            return Err(NodeError::AlreadyParented {
                name: child.name.clone(),
                holder: if holder == parent { Holder::Caller } else { Holder::Other },
            });
        }
        // node is a root here, so parent lies inside node's tree only if node is parent's root
        if self.root(parent) == Some(node) {
            return Err(NodeError::CycleDetected {
                parent: self.arena[parent.0].name.clone(),
                child: child.name.clone(),
            });
        }

        let position = insert_position(index, len);
        debug!("Attaching {} under {} at {}", node, parent, position);

        self.live_mut(node)?.parent = Some(parent);
        self.live_mut(parent)?.children.insert(position, node);

        let name = self.arena[node.0].name.clone();
        self.rename(node, &name)?;

        self.live_mut(node)?.hooks.on_parent_changed(node, Some(parent));
        self.live_mut(parent)?.hooks.on_child_added(parent, node);
        Ok(())
    }

    /// Detaches `node` from `parent`; the node becomes a root again.
    #[instrument(level = "trace", skip(self))]
    pub fn detach_child(&mut self, parent: NodeId, node: NodeId) -> NodeResult<()> {
        self.live(parent)?;
        let child = self.live(node)?;
        if child.parent != Some(parent) {
            return Err(NodeError::NotAChild(child.name.clone()));
        }
        debug!("Detaching {} from {}", node, parent);

        self.live_mut(node)?.parent = None;
        self.live_mut(parent)?.children.retain(|&c| c != node);

        self.live_mut(node)?.hooks.on_parent_changed(node, None);
        self.live_mut(parent)?.hooks.on_child_removed(parent, node);
        Ok(())
    }

    /// Detaches `node` from its own parent.
    pub fn remove(&mut self, node: NodeId) -> NodeResult<()> {
        let child = self.live(node)?;
        match child.parent {
            Some(parent) => self.detach_child(parent, node),
            None => Err(NodeError::NoParent(child.name.clone())),
        }
    }

    /// Moves the child `node` of `parent` to `index` in the sibling order.
    ///
    /// `index` is a plain position in the sequence after the node is taken
    /// out, so it must be lower than the number of children.
    #[instrument(level = "trace", skip(self))]
    pub fn move_child(&mut self, parent: NodeId, node: NodeId, index: usize) -> NodeResult<()> {
        let len = self.live(parent)?.children.len();
        let child = self.live(node)?;
        if child.parent != Some(parent) {
            return Err(NodeError::NotAChild(child.name.clone()));
        }
        if index >= len {
            return Err(NodeError::IndexOutOfRange { index, len });
        }
        debug!("Moving {} to {} under {}", node, index, parent);

        let children = &mut self.live_mut(parent)?.children;
        children.retain(|&c| c != node);
        children.insert(index, node);
        Ok(())
    }

    /// Moves `node` to `index` among its own siblings.
    pub fn move_to(&mut self, node: NodeId, index: usize) -> NodeResult<()> {
        let child = self.live(node)?;
        match child.parent {
            Some(parent) => self.move_child(parent, node, index),
            None => Err(NodeError::NoParent(child.name.clone())),
        }
    }

    /// Tears down the subtree rooted at `node`, children first.
    ///
    /// Every node of the subtree gets `on_pre_destroy`, is detached from its
    /// parent and has its slot freed. Handles into the subtree are null afterwards.
    #[instrument(level = "debug", skip(self))]
    pub fn destroy(&mut self, node: NodeId) -> NodeResult<()> {
        self.live(node)?;
        let doomed: Vec<NodeId> = self.iter_postorder(node).collect();
        debug!("Destroying {} nodes below and including {}", doomed.len(), node);

        for id in doomed {
            self.live_mut(id)?.hooks.on_pre_destroy(id);
            if let Some(parent) = self.arena[id.0].parent {
                self.detach_child(parent, id)?;
            }
            self.arena.remove(id.0);
        }
        Ok(())
    }

    /// Renames `node`, suffixing `name` with 1, 2, ... while a sibling already uses it.
    #[instrument(level = "trace", skip(self))]
    pub fn rename(&mut self, node: NodeId, name: &str) -> NodeResult<()> {
        let committed = match self.live(node)?.parent {
            None => name.to_string(),
            Some(parent) => {
                let siblings = &self.live(parent)?.children;
                unique_name(name, |candidate| {
                    siblings
                        .iter()
                        .filter(|&&s| s != node)
                        .any(|s| self.arena.get(s.0).is_some_and(|s| s.name == candidate))
                })
            }
        };
        if committed != name {
            debug!("Name '{}' taken among siblings, using '{}'", name, committed);
        }

        let entry = self.live_mut(node)?;
        entry.name = committed;
        entry.hooks.on_renamed(node, &entry.name);
        Ok(())
    }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.get_node(id).map(|n| n.name.as_str())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get_node(id).and_then(|n| n.parent)
    }

    /// Children in sibling order; empty for null handles.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get_node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn child_count(&self, id: NodeId) -> usize {
        self.children(id).len()
    }

    /// Position among the parent's children, `None` for roots.
    pub fn index(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn root(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.get_node(id).map(|_| id)?;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        Some(current)
    }

    /// Ancestors ordered from the root down, excluding `id` itself.
    pub fn path_from_root(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            path.push(parent);
            current = parent;
        }
        path.reverse();
        path
    }

    /// Number of ancestors.
    pub fn depth(&self, id: NodeId) -> usize {
        self.path_from_root(id).len()
    }

    /// Resolves a multi-level path of indices and/or names below `id`.
    ///
    /// Each step selects a child of the node reached so far. An empty path
    /// selects nothing and, like any unmatched step, yields `None`.
    pub fn child_at<'a, I>(&self, id: NodeId, path: I) -> Option<NodeId>
    where
        I: IntoIterator,
        I::Item: Into<PathStep<'a>>,
    {
        let mut current = self.get_node(id).map(|_| id)?;
        let mut found = None;
        for step in path {
            let children = self.children(current);
            current = match step.into() {
                PathStep::Index(index) => children[lookup_position(index, children.len())?],
                PathStep::Name(name) => *children
                    .iter()
                    .find(|&&c| self.name(c) == Some(name))?,
            };
            found = Some(current);
        }
        found
    }
}
