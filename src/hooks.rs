//! Extension points fired by structural changes.
//!
//! Every node owns one value implementing [`NodeHooks`]. The hierarchy calls
//! into it after a change has been fully applied, handing over only the ids
//! involved. Hooks never see the hierarchy itself, so they cannot observe a
//! half-applied mutation or re-enter the structure during teardown.

use crate::arena::NodeId;

pub trait NodeHooks {
    /// Kind shown by `describe`; `None` keeps the structure's own label.
    fn label(&self) -> Option<&str> {
        None
    }

    /// The parent of `node` was set or cleared.
    fn on_parent_changed(&mut self, _node: NodeId, _parent: Option<NodeId>) {}

    /// `child` has just been attached under `node`.
    fn on_child_added(&mut self, _node: NodeId, _child: NodeId) {}

    /// `child` has just been detached from `node`.
    fn on_child_removed(&mut self, _node: NodeId, _child: NodeId) {}

    /// The name of `node` was committed, possibly with a uniqueness suffix.
    fn on_renamed(&mut self, _node: NodeId, _name: &str) {}

    /// `node` is about to be detached and freed.
    fn on_pre_destroy(&mut self, _node: NodeId) {}
}

/// No-op hooks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Plain;

impl NodeHooks for Plain {}

/// Picks the first free name among `requested`, `requested1`, `requested2`, ...
///
/// `taken` reports whether a candidate collides with another node.
pub(crate) fn unique_name(requested: &str, mut taken: impl FnMut(&str) -> bool) -> String {
    let mut candidate = requested.to_string();
    let mut count = 0usize;
    while taken(&candidate) {
        count += 1;
        candidate = format!("{requested}{count}");
    }
    candidate
}
