use nodeclass::util::testing;
use nodeclass::{Direction, Hierarchy, NodeId, WalkStep};
use rstest::{fixture, rstest};

// R
// ├── A
// │   ├── a1
// │   │   └── x
// │   └── a2
// ├── B
// │   └── b1
// └── C
#[fixture]
fn tree() -> (Hierarchy, NodeId) {
    testing::init_test_setup();
    let mut tree = Hierarchy::new();
    let r = tree.create("R");
    for name in ["A", "B", "C"] {
        let node = tree.create(name);
        tree.attach_child(r, node).unwrap();
    }
    let a = tree.child_at(r, ["A"]).unwrap();
    let b = tree.child_at(r, ["B"]).unwrap();
    for name in ["a1", "a2"] {
        let node = tree.create(name);
        tree.attach_child(a, node).unwrap();
    }
    let a1 = tree.child_at(a, [0]).unwrap();
    let x = tree.create("x");
    tree.attach_child(a1, x).unwrap();
    let b1 = tree.create("b1");
    tree.attach_child(b, b1).unwrap();
    (tree, r)
}

fn visited(tree: &Hierarchy, steps: &[WalkStep]) -> Vec<String> {
    steps
        .iter()
        .map(|s| tree.name(s.node).unwrap().to_string())
        .collect()
}

fn path_names(tree: &Hierarchy, step: &WalkStep) -> Vec<String> {
    step.path
        .iter()
        .map(|&id| tree.name(id).unwrap().to_string())
        .collect()
}

#[rstest]
#[case(Direction::Forward, ["A", "a1", "x", "a2", "B", "b1", "C"])]
#[case(Direction::Inverse, ["C", "B", "b1", "A", "a2", "a1", "x"])]
fn given_tree_when_walking_depth_first_then_subtrees_follow_their_root(
    tree: (Hierarchy, NodeId),
    #[case] direction: Direction,
    #[case] expected: [&str; 7],
) {
    let (tree, r) = tree;
    let steps = tree.walk_tree(r, direction);
    assert_eq!(visited(&tree, &steps), expected);
}

#[rstest]
#[case(Direction::Forward, ["A", "B", "C", "a1", "a2", "x", "b1"])]
#[case(Direction::Inverse, ["C", "B", "A", "b1", "a2", "a1", "x"])]
fn given_tree_when_walking_base_then_direct_children_come_first(
    tree: (Hierarchy, NodeId),
    #[case] direction: Direction,
    #[case] expected: [&str; 7],
) {
    let (tree, r) = tree;
    let steps = tree.walk_base(r, direction);
    assert_eq!(visited(&tree, &steps), expected);
}

#[rstest]
fn given_tree_when_walking_then_paths_run_from_start_down(tree: (Hierarchy, NodeId)) {
    let (tree, r) = tree;
    for steps in [tree.walk_tree(r, Direction::Forward), tree.walk_base(r, Direction::Forward)] {
        for step in &steps {
            let name = tree.name(step.node).unwrap();
            let expected: &[&str] = match name {
                "A" | "B" | "C" => &["R"],
                "a1" | "a2" => &["R", "A"],
                "x" => &["R", "A", "a1"],
                "b1" => &["R", "B"],
                other => panic!("unexpected node {other}"),
            };
            assert_eq!(path_names(&tree, step), expected);
            assert_eq!(step.depth(), expected.len());
            assert_eq!(tree.parent(step.node), step.path.last().copied());
        }
    }
}

#[rstest]
fn given_subtree_start_when_walking_then_paths_begin_at_start(tree: (Hierarchy, NodeId)) {
    let (tree, r) = tree;
    let a = tree.child_at(r, ["A"]).unwrap();
    let steps = tree.walk_tree(a, Direction::Forward);
    assert_eq!(visited(&tree, &steps), ["a1", "x", "a2"]);
    assert!(steps.iter().all(|s| s.path[0] == a));
    assert!(steps.iter().all(|s| s.node != a));
}

#[rstest]
fn given_leaf_when_walking_then_empty(tree: (Hierarchy, NodeId)) {
    let (tree, r) = tree;
    let c = tree.child_at(r, [-1]).unwrap();
    assert!(tree.walk_tree(c, Direction::Forward).is_empty());
    assert!(tree.walk_base(c, Direction::Inverse).is_empty());
}

#[rstest]
fn given_tree_when_iterating_lazily_then_matches_walk_tree(tree: (Hierarchy, NodeId)) {
    let (tree, r) = tree;
    let lazy: Vec<WalkStep> = tree.iter_depth_first(r, Direction::Inverse).collect();
    assert_eq!(lazy, tree.walk_tree(r, Direction::Inverse));
    assert_eq!(tree.iter_depth_first(r, Direction::Forward).take(2).count(), 2);
}

#[rstest]
fn given_tree_when_iterating_postorder_then_children_precede_parents(tree: (Hierarchy, NodeId)) {
    let (tree, r) = tree;
    let order: Vec<&str> = tree.iter_postorder(r).map(|id| tree.name(id).unwrap()).collect();
    assert_eq!(order, ["x", "a1", "a2", "A", "b1", "B", "C", "R"]);
}

#[rstest]
fn given_destroyed_start_when_walking_then_empty(tree: (Hierarchy, NodeId)) {
    let (mut tree, r) = tree;
    let b = tree.child_at(r, ["B"]).unwrap();
    tree.destroy(b).unwrap();
    assert!(tree.walk_tree(b, Direction::Forward).is_empty());
    assert!(tree.walk_base(b, Direction::Forward).is_empty());
    assert_eq!(tree.iter_postorder(b).count(), 0);
}
