use itertools::Itertools;
use termtree::Tree;
use tracing::instrument;

use crate::arena::{Hierarchy, NodeId};
use crate::chain::Chain;
use crate::hooks::NodeHooks;
use crate::walk::Direction;

pub const TREE_NODE_LABEL: &str = "TreeNode";

/// Box-drawing rendering of a structure below a given node.
pub trait TreeNodeConvert {
    fn to_tree_string(&self, start: NodeId) -> Tree<String>;
}

impl<H: NodeHooks> Hierarchy<H> {
    /// Single-line form: `<TreeNode:'name'>`, or the hook label in place of `TreeNode`.
    pub fn describe(&self, id: NodeId) -> String {
        match self.get_node(id) {
            Some(node) => format!(
                "<{}:'{}'>",
                node.hooks().label().unwrap_or(TREE_NODE_LABEL),
                node.name()
            ),
            None => "<null>".to_string(),
        }
    }

    fn describe_marked(&self, id: NodeId) -> String {
        let marker = if self.child_count(id) > 0 {
            self.settings().render.children_marker.as_str()
        } else {
            ""
        };
        format!("{}{}", self.describe(id), marker)
    }

    /// The node followed by its depth-first walk, one indented line per descendant.
    #[instrument(level = "debug", skip(self))]
    pub fn describe_subtree(&self, id: NodeId) -> String {
        let indent = &self.settings().render.indent;
        let mut lines = vec![self.describe_marked(id)];
        for step in self.iter_depth_first(id, Direction::Forward) {
            lines.push(format!("{}{}", indent.repeat(step.depth()), self.describe_marked(step.node)));
        }
        lines.join("\n")
    }

    /// Ancestors of `id`, root first, joined by the configured separator.
    pub fn describe_path(&self, id: NodeId) -> String {
        self.describe_path_with(id, &self.settings().render.path_separator)
    }

    pub fn describe_path_with(&self, id: NodeId, separator: &str) -> String {
        self.path_from_root(id)
            .into_iter()
            .map(|ancestor| self.describe(ancestor))
            .join(separator)
    }
}

impl<H: NodeHooks> TreeNodeConvert for Hierarchy<H> {
    fn to_tree_string(&self, start: NodeId) -> Tree<String> {
        fn build_tree<H: NodeHooks>(tree: &Hierarchy<H>, id: NodeId, parent_tree: &mut Tree<String>) {
            for &child in tree.children(id) {
                let mut child_tree = Tree::new(tree.describe(child));
                build_tree(tree, child, &mut child_tree);
                parent_tree.push(child_tree);
            }
        }

        let mut root = Tree::new(self.describe(start));
        build_tree(self, start, &mut root);
        root
    }
}

impl<H: NodeHooks> TreeNodeConvert for Chain<H> {
    /// Each following link nests under the previous one.
    fn to_tree_string(&self, start: NodeId) -> Tree<String> {
        let mut links: Vec<Tree<String>> = std::iter::once(start)
            .chain(self.following(start))
            .map(|link| Tree::new(self.describe(link)))
            .collect();

        let mut tail = links.pop().unwrap_or_else(|| Tree::new(self.describe(start)));
        while let Some(mut previous) = links.pop() {
            previous.push(tail);
            tail = previous;
        }
        tail
    }
}
