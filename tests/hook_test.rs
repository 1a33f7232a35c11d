//! Order and payload of the extension hooks fired by structural changes.

use std::cell::RefCell;
use std::rc::Rc;

use nodeclass::util::testing;
use nodeclass::{Chain, Hierarchy, NodeHooks, NodeId};

type Log = Rc<RefCell<Vec<String>>>;

#[derive(Debug, Clone)]
struct Recorder {
    tag: &'static str,
    log: Log,
}

impl Recorder {
    fn record(&self, event: String) {
        self.log.borrow_mut().push(format!("{}:{}", self.tag, event));
    }
}

impl NodeHooks for Recorder {
    fn on_parent_changed(&mut self, _node: NodeId, parent: Option<NodeId>) {
        self.record(format!("parent_changed({})", parent.is_some()));
    }

    fn on_child_added(&mut self, _node: NodeId, _child: NodeId) {
        self.record("child_added".into());
    }

    fn on_child_removed(&mut self, _node: NodeId, _child: NodeId) {
        self.record("child_removed".into());
    }

    fn on_renamed(&mut self, _node: NodeId, name: &str) {
        self.record(format!("renamed({name})"));
    }

    fn on_pre_destroy(&mut self, _node: NodeId) {
        self.record("pre_destroy".into());
    }
}

fn recorder(log: &Log, tag: &'static str) -> Recorder {
    Recorder {
        tag,
        log: Rc::clone(log),
    }
}

fn drain(log: &Log) -> Vec<String> {
    log.borrow_mut().drain(..).collect()
}

#[test]
fn given_attach_when_hooks_fire_then_rename_precedes_parent_and_child_events() {
    testing::init_test_setup();
    let log = Log::default();
    let mut tree: Hierarchy<Recorder> = Hierarchy::new();
    let root = tree.create_with("root", recorder(&log, "root"));
    let first = tree.create_with("n", recorder(&log, "first"));
    let second = tree.create_with("n", recorder(&log, "second"));

    tree.attach_child(root, first).unwrap();
    tree.attach_child(root, second).unwrap();
    assert_eq!(
        drain(&log),
        [
            "first:renamed(n)",
            "first:parent_changed(true)",
            "root:child_added",
            "second:renamed(n1)",
            "second:parent_changed(true)",
            "root:child_added",
        ]
    );

    tree.remove(first).unwrap();
    assert_eq!(drain(&log), ["first:parent_changed(false)", "root:child_removed"]);
}

#[test]
fn given_failed_attach_when_hooks_checked_then_none_fired() {
    let log = Log::default();
    let mut tree: Hierarchy<Recorder> = Hierarchy::new();
    let root = tree.create_with("root", recorder(&log, "root"));
    let child = tree.create_with("child", recorder(&log, "child"));
    tree.attach_child(root, child).unwrap();
    drain(&log);

    assert!(tree.attach_child(root, child).is_err());
    assert!(tree.attach_child(child, root).is_err());
    assert!(drain(&log).is_empty());
}

#[test]
fn given_subtree_when_destroying_then_teardown_runs_bottom_up() {
    let log = Log::default();
    let mut tree: Hierarchy<Recorder> = Hierarchy::new();
    let root = tree.create_with("root", recorder(&log, "root"));
    let mid = tree.create_with("mid", recorder(&log, "mid"));
    let leaf = tree.create_with("leaf", recorder(&log, "leaf"));
    tree.attach_child(root, mid).unwrap();
    tree.attach_child(mid, leaf).unwrap();
    drain(&log);

    tree.destroy(mid).unwrap();
    assert_eq!(
        drain(&log),
        [
            "leaf:pre_destroy",
            "leaf:parent_changed(false)",
            "mid:child_removed",
            "mid:pre_destroy",
            "mid:parent_changed(false)",
            "root:child_removed",
        ]
    );
    assert!(tree.children(root).is_empty());
}

#[test]
fn given_hooks_state_when_accessed_then_mutable_through_hierarchy() {
    let log = Log::default();
    let mut tree: Hierarchy<Recorder> = Hierarchy::new();
    let node = tree.create_with("node", recorder(&log, "node"));
    tree.hooks_mut(node).unwrap().tag = "renamed-tag";
    tree.rename(node, "other").unwrap();
    assert_eq!(drain(&log), ["renamed-tag:renamed(other)"]);
    assert_eq!(tree.get_node(node).unwrap().hooks().tag, "renamed-tag");
}

#[test]
fn given_chain_when_linking_then_hooks_fire() {
    let log = Log::default();
    let mut chain: Chain<Recorder> = Chain::new();
    let a = chain.create_with("a", recorder(&log, "a"));
    let b = chain.create_with("a", recorder(&log, "b"));

    chain.attach_child(a, b).unwrap();
    assert_eq!(
        drain(&log),
        ["b:renamed(a1)", "b:parent_changed(true)", "a:child_added"]
    );

    chain.remove_child(a).unwrap();
    assert_eq!(drain(&log), ["b:parent_changed(false)", "a:child_removed"]);
}
