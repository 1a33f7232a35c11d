//! Linear hierarchy: each link has at most one parent (previous link) and
//! at most one child (next link). Names are unique along the whole chain.

use generational_arena::Arena;
use itertools::Itertools;
use std::fmt;
use tracing::{debug, instrument};

use crate::arena::NodeId;
use crate::config::Settings;
use crate::errors::{Holder, NodeError, NodeResult};
use crate::hooks::{unique_name, NodeHooks, Plain};

pub const CHAIN_NODE_LABEL: &str = "ChainNode";

/// Which part of the chain [`Chain::path`] collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainSide {
    /// Links before the node, starting from the first link
    ToStart,
    /// Links after the node, up to the last link
    ToEnd,
}

#[derive(Debug)]
pub struct ChainLink<H> {
    name: String,
    parent: Option<NodeId>,
    child: Option<NodeId>,
    hooks: H,
}

impl<H> ChainLink<H> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn child(&self) -> Option<NodeId> {
        self.child
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }
}

#[derive(Debug)]
pub struct Chain<H = Plain> {
    arena: Arena<ChainLink<H>>,
    settings: Settings,
}

impl<H: NodeHooks> Default for Chain<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: NodeHooks> Chain<H> {
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

    #[instrument(level = "trace", skip(self, hooks))]
    pub fn create_with(&mut self, name: impl Into<String> + fmt::Debug, hooks: H) -> NodeId {
        NodeId(self.arena.insert(ChainLink {
            name: name.into(),
            parent: None,
            child: None,
            hooks,
        }))
    }

    pub fn create(&mut self, name: impl Into<String> + fmt::Debug) -> NodeId
    where
        H: Default,
    {
        self.create_with(name, H::default())
    }

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

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn get_link(&self, id: NodeId) -> Option<&ChainLink<H>> {
        self.arena.get(id.0)
    }

    pub fn hooks_mut(&mut self, id: NodeId) -> Option<&mut H> {
        self.arena.get_mut(id.0).map(|link| &mut link.hooks)
    }

    fn live(&self, id: NodeId) -> NodeResult<&ChainLink<H>> {
        self.arena.get(id.0).ok_or(NodeError::NullNode)
    }

    fn live_mut(&mut self, id: NodeId) -> NodeResult<&mut ChainLink<H>> {
        self.arena.get_mut(id.0).ok_or(NodeError::NullNode)
    }

    /// Connects the first link `child` of another chain after `node`.
    ///
    /// Every link of the joined chain is renamed, head first, so names stay
    /// unique along the combined chain.
    #[instrument(level = "trace", skip(self))]
    pub fn attach_child(&mut self, node: NodeId, child: NodeId) -> NodeResult<()> {
        let link = self.live(node)?;
        let next = self.live(child)?;

        if let Some(holder) = next.parent {
            return Err(NodeError::AlreadyParented {
                name: next.name.clone(),
                holder: if holder == node { Holder::Caller } else { Holder::Other },
            });
        }
        if link.child.is_some() {
            return Err(NodeError::ChildOccupied(link.name.clone()));
        }
        if self.start(node) == Some(child) {
            return Err(NodeError::CycleDetected {
                parent: link.name.clone(),
                child: next.name.clone(),
            });
        }
        debug!("Chaining {} after {}", child, node);

        self.live_mut(child)?.parent = Some(node);
        self.live_mut(node)?.child = Some(child);

        let joined: Vec<NodeId> = std::iter::once(child).chain(self.following(child)).collect();
        for link in joined {
            let name = self.arena[link.0].name.clone();
            self.rename(link, &name)?;
        }

        self.live_mut(child)?.hooks.on_parent_changed(child, Some(node));
        self.live_mut(node)?.hooks.on_child_added(node, child);
        Ok(())
    }

    /// Disconnects `node` from the link before it.
    #[instrument(level = "trace", skip(self))]
    pub fn remove_parent(&mut self, node: NodeId) -> NodeResult<()> {
        let link = self.live(node)?;
        let parent = link.parent.ok_or_else(|| NodeError::NoParent(link.name.clone()))?;
        self.unlink(parent, node)
    }

    /// Disconnects the link after `node`.
    #[instrument(level = "trace", skip(self))]
    pub fn remove_child(&mut self, node: NodeId) -> NodeResult<()> {
        let link = self.live(node)?;
        let child = link.child.ok_or_else(|| NodeError::NoChild(link.name.clone()))?;
        self.unlink(node, child)
    }

    fn unlink(&mut self, parent: NodeId, child: NodeId) -> NodeResult<()> {
        debug!("Unlinking {} from {}", child, parent);
        self.live_mut(child)?.parent = None;
        self.live_mut(parent)?.child = None;

        self.live_mut(child)?.hooks.on_parent_changed(child, None);
        self.live_mut(parent)?.hooks.on_child_removed(parent, child);
        Ok(())
    }

    /// Renames `node` so that no other link of its chain shares the name.
    #[instrument(level = "trace", skip(self))]
    pub fn rename(&mut self, node: NodeId, name: &str) -> NodeResult<()> {
        self.live(node)?;
        let others: Vec<NodeId> = self
            .start(node)
            .into_iter()
            .flat_map(|start| std::iter::once(start).chain(self.following(start)))
            .filter(|&link| link != node)
            .collect();

        let committed = unique_name(name, |candidate| {
            others.iter().any(|&link| self.name(link) == Some(candidate))
        });
        if committed != name {
            debug!("Name '{}' taken in chain, using '{}'", name, committed);
        }

        let link = self.live_mut(node)?;
        link.name = committed;
        link.hooks.on_renamed(node, &link.name);
        Ok(())
    }

    /// Destroys `node` and every link after it, last link first.
    #[instrument(level = "debug", skip(self))]
    pub fn destroy(&mut self, node: NodeId) -> NodeResult<()> {
        self.live(node)?;
        let mut doomed = vec![node];
        doomed.extend(self.following(node));

        for &id in doomed.iter().rev() {
            self.live_mut(id)?.hooks.on_pre_destroy(id);
            if self.arena[id.0].parent.is_some() {
                self.remove_parent(id)?;
            }
            self.arena.remove(id.0);
        }
        Ok(())
    }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.get_link(id).map(|l| l.name.as_str())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get_link(id).and_then(|l| l.parent)
    }

    pub fn child(&self, id: NodeId) -> Option<NodeId> {
        self.get_link(id).and_then(|l| l.child)
    }

    /// Distance from the first link of the chain.
    pub fn index(&self, id: NodeId) -> Option<usize> {
        self.get_link(id)?;
        Some(self.path(id, ChainSide::ToStart).len())
    }

    pub fn start(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.get_link(id).map(|_| id)?;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        Some(current)
    }

    pub fn end(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.get_link(id).map(|_| id)?;
        while let Some(child) = self.child(current) {
            current = child;
        }
        Some(current)
    }

    /// Link `offset` steps away: forward for positive offsets, backward for negative.
    pub fn chain_at(&self, id: NodeId, offset: isize) -> Option<NodeId> {
        let mut current = self.get_link(id).map(|_| id)?;
        for _ in 0..offset.unsigned_abs() {
            current = if offset >= 0 {
                self.child(current)?
            } else {
                self.parent(current)?
            };
        }
        Some(current)
    }

    /// Link named `name` anywhere in the chain containing `id`.
    pub fn find(&self, id: NodeId, name: &str) -> Option<NodeId> {
        let start = self.start(id)?;
        std::iter::once(start)
            .chain(self.following(start))
            .find(|&link| self.name(link) == Some(name))
    }

    /// Links before or after `id`, always listed start-first.
    pub fn path(&self, id: NodeId, side: ChainSide) -> Vec<NodeId> {
        match side {
            ChainSide::ToStart => {
                let mut path = Vec::new();
                let mut current = self.parent(id);
                while let Some(link) = current {
                    path.push(link);
                    current = self.parent(link);
                }
                path.reverse();
                path
            }
            ChainSide::ToEnd => self.following(id),
        }
    }

    pub fn following(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut current = self.child(id);
        while let Some(link) = current {
            path.push(link);
            current = self.child(link);
        }
        path
    }

    /// Single-line form: `<ChainNode:index:'name'>`.
    pub fn describe(&self, id: NodeId) -> String {
        match (self.get_link(id), self.index(id)) {
            (Some(link), Some(index)) => format!(
                "<{}:{}:'{}'>",
                link.hooks.label().unwrap_or(CHAIN_NODE_LABEL),
                index,
                link.name
            ),
            _ => "<null>".to_string(),
        }
    }

    /// The link followed by one indented line per following link.
    pub fn describe_chain(&self, id: NodeId) -> String {
        let indent = &self.settings.render.indent;
        std::iter::once(self.describe(id))
            .chain(
                self.following(id)
                    .into_iter()
                    .map(|link| format!("{}{}", indent, self.describe(link))),
            )
            .join("\n")
    }

    /// Links before `id`, start first, joined by the configured separator.
    pub fn describe_path(&self, id: NodeId) -> String {
        self.path(id, ChainSide::ToStart)
            .into_iter()
            .map(|link| self.describe(link))
            .join(&self.settings.render.path_separator)
    }
}
