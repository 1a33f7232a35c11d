//! In-memory hierarchies of named nodes.
//!
//! [`Hierarchy`] holds ordered trees: every node has at most one parent and
//! an ordered list of children whose names are unique among siblings.
//! [`Chain`] is the linear special case where every link has at most one
//! child and names are unique along the whole chain.
//!
//! Nodes live in a generational arena and are addressed by [`NodeId`]
//! handles; a destroyed node's handle is rejected as a null node.

pub mod arena;
pub mod chain;
pub mod config;
pub mod errors;
pub mod hooks;
pub mod tree_traits;
pub mod util;
pub mod walk;

pub use arena::{insert_position, lookup_position, Hierarchy, HierarchyNode, NodeId, PathStep};
pub use chain::{Chain, ChainLink, ChainSide};
pub use config::{RenderConfig, Settings};
pub use errors::{Holder, NodeError, NodeResult};
pub use hooks::{NodeHooks, Plain};
pub use tree_traits::TreeNodeConvert;
pub use walk::{Direction, WalkStep};
