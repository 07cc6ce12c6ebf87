use phylayout::layout::{Layout, LayoutConfig, Point};
use phylayout::model::node::BranchLength;
use phylayout::model::{NodeIndex, PhyloTree};
use phylayout::newick::parse_str;
use phylayout::LayoutError;

const EPSILON: f64 = 1e-9;

const SCENARIO: &str = "((A,B),((C,D),(E,(F,G))));";

fn find(tree: &PhyloTree, name: &str) -> NodeIndex {
    tree.nodes()
        .iter()
        .find(|n| n.name() == Some(name))
        .map(|n| n.index())
        .unwrap_or_else(|| panic!("no node named {name}"))
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

/// Checks the structural layout properties that hold for every tree and config.
fn assert_layout_invariants(tree: &PhyloTree, layout: &Layout) {
    // Leaves fill the rows 0..n exactly, in leaf order
    assert_eq!(layout.leaf_order().len(), tree.num_leaves());
    for (slot, &leaf) in layout.leaf_order().iter().enumerate() {
        assert!(tree.node(leaf).is_leaf());
        assert_eq!(layout.position(leaf).y, slot as f64);
    }

    for node in tree.nodes() {
        let position = layout.position(node.index());
        assert!(position.x >= 0.0);

        // Internal y is the mean of the direct children
        if node.is_internal() {
            let children = node.children();
            let mean = children.iter().map(|&c| layout.position(c).y).sum::<f64>()
                / children.len() as f64;
            assert!((position.y - mean).abs() < EPSILON);
        }
    }

    let max_leaf_x = layout
        .leaf_order()
        .iter()
        .map(|&leaf| layout.position(leaf).x)
        .fold(0.0, f64::max);
    assert_eq!(layout.max_leaf_x(), max_leaf_x);
}

// ============= Scenario Tests =============
#[test]
fn test_scenario_unit_steps() {
    init_tracing();
    let tree = parse_str(SCENARIO).unwrap();
    let layout = Layout::compute(&tree, LayoutConfig::cladogram()).unwrap();
    assert_layout_invariants(&tree, &layout);

    let root = tree.root().index();
    let a = find(&tree, "A");
    let ab = tree.parent(a).unwrap();
    assert_eq!(layout.position(root).x, 0.0);
    assert_eq!(layout.position(ab).x, 1.0);
    assert_eq!(layout.position(a).x, 2.0);
    assert_eq!(layout.position(find(&tree, "B")).x, 2.0);
    assert_eq!(layout.position(find(&tree, "G")).x, 4.0);
    assert_eq!(layout.max_leaf_x(), 4.0);

    for (y, name) in ["A", "B", "C", "D", "E", "F", "G"].iter().enumerate() {
        assert_eq!(layout.position(find(&tree, name)).y, y as f64);
    }

    // Ladder: (F,G) at 5.5, (E,(F,G)) at 4.75, ((C,D),..) at 3.625
    let fg = tree.parent(find(&tree, "F")).unwrap();
    let efg = tree.parent(fg).unwrap();
    let cdefg = tree.parent(efg).unwrap();
    assert_eq!(layout.position(ab).y, 0.5);
    assert_eq!(layout.position(fg).y, 5.5);
    assert_eq!(layout.position(efg).y, 4.75);
    assert_eq!(layout.position(cdefg).y, 3.625);
    assert_eq!(layout.position(root).y, 2.0625);
}

#[test]
fn test_unit_steps_ignore_branch_lengths() {
    let tree = parse_str("((A:0.3,B:7):2,(C:1,(D:0.1,E:0.2):0.4):1.5,F:9);").unwrap();
    let layout = Layout::compute(&tree, LayoutConfig::cladogram()).unwrap();
    assert_layout_invariants(&tree, &layout);

    for node in tree.nodes() {
        if let Some(parent) = tree.parent(node.index()) {
            let step = layout.position(node.index()).x - layout.position(parent).x;
            assert_eq!(step, 1.0);
        }
    }
}

#[test]
fn test_branch_length_steps() {
    let tree = parse_str("((A:0.3,B:7):2,(C:1,(D:0.1,E:0.2):0.4):1.5,F:9):4;").unwrap();
    let layout = Layout::compute(&tree, LayoutConfig::phylogram()).unwrap();
    assert_layout_invariants(&tree, &layout);

    for node in tree.nodes() {
        if let Some(parent) = tree.parent(node.index()) {
            let step = layout.position(node.index()).x - layout.position(parent).x;
            let length = node.branch_length().unwrap().value();
            assert!((step - length).abs() < EPSILON);
        }
    }

    // Root branch length is ignored
    assert_eq!(layout.position(tree.root().index()).x, 0.0);
    assert_eq!(layout.max_leaf_x(), 9.0);
    assert!((layout.position(find(&tree, "E")).x - 2.1).abs() < EPSILON);
}

#[test]
fn test_missing_branch_length_is_zero_step() {
    let tree = parse_str("((A:1,B):2,C);").unwrap();
    let layout = Layout::compute(&tree, LayoutConfig::phylogram()).unwrap();

    let a = find(&tree, "A");
    let ab = tree.parent(a).unwrap();
    assert_eq!(layout.position(ab).x, 2.0);
    assert_eq!(layout.position(a).x, 3.0);
    // Missing lengths contribute nothing, also when siblings have lengths
    assert_eq!(layout.position(find(&tree, "B")).x, 2.0);
    assert_eq!(layout.position(find(&tree, "C")).x, 0.0);
}

#[test]
fn test_all_lengths_missing_collapses_to_root() {
    let tree = parse_str(SCENARIO).unwrap();
    let layout = Layout::compute(&tree, LayoutConfig::phylogram()).unwrap();
    assert_layout_invariants(&tree, &layout);

    assert!(layout.positions().iter().all(|p| p.x == 0.0));
    assert_eq!(layout.max_leaf_x(), 0.0);
}

// ============= Edge Case Tests =============
#[test]
fn test_single_node_tree() {
    let tree = parse_str("A:3;").unwrap();
    let layout = Layout::compute(&tree, LayoutConfig::default()).unwrap();

    assert_eq!(layout.position(0), Point::ORIGIN);
    assert_eq!(layout.leaf_order(), &[0]);
    assert_eq!(layout.max_leaf_x(), 0.0);
}

#[test]
fn test_empty_tree_is_error() {
    let tree = PhyloTree::new();
    let err = Layout::compute(&tree, LayoutConfig::default()).unwrap_err();
    assert_eq!(err, LayoutError::EmptyTree);
}

#[test]
fn test_unrooted_construction_is_error() {
    let mut tree = PhyloTree::new();
    tree.add_named_leaf("A", Some(BranchLength::new(1.0)));
    let err = Layout::compute(&tree, LayoutConfig::default()).unwrap_err();
    assert_eq!(err, LayoutError::EmptyTree);
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "invalid tree")]
fn test_unattached_node_rejected_in_debug() {
    let mut tree = PhyloTree::new();
    let a = tree.add_named_leaf("A", None);
    let b = tree.add_named_leaf("B", None);
    tree.add_named_leaf("orphan", None);
    tree.add_root(vec![a, b], None);
    assert!(!tree.is_valid());

    let _ = Layout::compute(&tree, LayoutConfig::default());
}

#[test]
fn test_multifurcation_mean_of_direct_children() {
    let tree = parse_str("((A,B,C,D),E);").unwrap();
    let layout = Layout::compute(&tree, LayoutConfig::cladogram()).unwrap();

    let abcd = tree.parent(find(&tree, "A")).unwrap();
    assert_eq!(layout.position(abcd).y, 1.5);
    assert_eq!(layout.position(tree.root().index()).y, 2.75);
}

#[test]
fn test_try_position_and_index() {
    let tree = parse_str("(A,B);").unwrap();
    let layout = Layout::compute(&tree, LayoutConfig::cladogram()).unwrap();

    let b = find(&tree, "B");
    assert_eq!(layout.try_position(b), Some(Point::new(1.0, 1.0)));
    assert_eq!(layout[b], Point::new(1.0, 1.0));
    assert_eq!(layout.try_position(99), None);
}

// ============= Config Tests =============
#[test]
fn test_reverse_order() {
    let tree = parse_str(SCENARIO).unwrap();
    let config = LayoutConfig::cladogram().with_reverse(true);
    let layout = Layout::compute(&tree, config).unwrap();
    assert_layout_invariants(&tree, &layout);

    assert_eq!(layout.position(find(&tree, "A")).y, 6.0);
    assert_eq!(layout.position(find(&tree, "G")).y, 0.0);

    let names: Vec<&str> = layout
        .leaf_order()
        .iter()
        .map(|&leaf| tree.node(leaf).name().unwrap())
        .collect();
    assert_eq!(names, vec!["G", "F", "E", "D", "C", "B", "A"]);
}

#[test]
fn test_aligned_label_x() {
    let tree = parse_str("((A:1,B:2):1,C:0.5);").unwrap();
    let aligned = Layout::compute(&tree, LayoutConfig::default().with_aligned_labels(true)).unwrap();
    let unaligned = Layout::compute(&tree, LayoutConfig::default()).unwrap();

    for &leaf in aligned.leaf_order() {
        assert_eq!(aligned.label_x(leaf, true), aligned.max_leaf_x());
        assert_eq!(aligned.label_position(leaf).x, 3.0);
        assert_eq!(unaligned.label_position(leaf).x, unaligned.position(leaf).x);
    }

    // Branch endpoints stay at the leaf's own x
    assert_eq!(aligned.positions(), unaligned.positions());

    // Internal labels never move
    let ab = tree.parent(find(&tree, "A")).unwrap();
    assert_eq!(aligned.label_x(ab, true), 1.0);
}

#[test]
fn test_idempotent() {
    let tree = parse_str("((A:0.3,B:7):2,(C:1,(D:0.1,E:0.2):0.4):1.5,F:9);").unwrap();
    let config = LayoutConfig::default().with_aligned_labels(true);

    let first = Layout::compute(&tree, config).unwrap();
    let second = Layout::compute(&tree, config).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_config_defaults_and_builders() {
    let config = LayoutConfig::default();
    assert!(config.use_branch_length);
    assert!(!config.align_leaf_labels);
    assert!(!config.reverse);

    let config = LayoutConfig::phylogram()
        .with_branch_length(false)
        .with_aligned_labels(true)
        .with_reverse(true);
    assert_eq!(
        config,
        LayoutConfig {
            use_branch_length: false,
            align_leaf_labels: true,
            reverse: true,
        }
    );
    assert_eq!(LayoutConfig::cladogram().use_branch_length, false);
}

#[test]
fn test_config_from_json() {
    let config: LayoutConfig = serde_json::from_str(r#"{"align_leaf_labels": true}"#).unwrap();
    assert_eq!(config, LayoutConfig::default().with_aligned_labels(true));

    let config: LayoutConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config, LayoutConfig::default());

    let json = serde_json::to_string(&LayoutConfig::cladogram()).unwrap();
    let back: LayoutConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, LayoutConfig::cladogram());
}

#[test]
fn test_layout_keeps_config_and_root() {
    let tree = parse_str(SCENARIO).unwrap();
    let config = LayoutConfig::cladogram().with_reverse(true);
    let layout = Layout::compute(&tree, config).unwrap();

    assert_eq!(layout.config(), config);
    assert_eq!(layout.root(), tree.root().index());
    assert_eq!(layout.num_nodes(), tree.num_nodes());
    assert_eq!(layout.num_leaves(), 7);
    assert_eq!(layout.parent(layout.root()), None);
}
