use phylayout::clade_index::{CladeIndex, NameMatching};
use phylayout::model::{NodeIndex, PhyloTree};
use phylayout::newick::parse_str;
use phylayout::LayoutError;

fn find(tree: &PhyloTree, name: &str) -> NodeIndex {
    tree.nodes()
        .iter()
        .find(|n| n.name() == Some(name))
        .map(|n| n.index())
        .unwrap_or_else(|| panic!("no node named {name}"))
}

fn names(tree: &PhyloTree, nodes: &[NodeIndex]) -> Vec<String> {
    nodes
        .iter()
        .map(|&n| tree.node(n).name().unwrap_or("").to_string())
        .collect()
}

fn scenario() -> PhyloTree {
    parse_str("((A,B),((C,D),(E,(F,G)))cg);").unwrap()
}

// ============= Resolve Tests =============
#[test]
fn test_siblings_resolve_to_parent() {
    let tree = scenario();
    let index = CladeIndex::new(&tree);

    let entry = index.resolve(["A", "B"]).unwrap();
    assert_eq!(entry.ancestor(), tree.parent(find(&tree, "A")).unwrap());
    assert_eq!(names(&tree, entry.leaves()), vec!["A", "B"]);
    assert_eq!(entry.num_requested(), 2);
    assert!(entry.is_exact());
}

#[test]
fn test_single_name_resolves_to_leaf() {
    let tree = scenario();
    let index = CladeIndex::new(&tree);

    let entry = index.resolve(["E"]).unwrap();
    assert_eq!(entry.ancestor(), find(&tree, "E"));
    assert_eq!(entry.leaves(), &[find(&tree, "E")]);
    assert!(entry.is_exact());
}

#[test]
fn test_non_monophyletic_request() {
    let tree = scenario();
    let index = CladeIndex::new(&tree);

    let entry = index.resolve(["C", "G"]).unwrap();
    assert_eq!(entry.ancestor(), find(&tree, "cg"));
    assert_eq!(names(&tree, entry.leaves()), vec!["C", "D", "E", "F", "G"]);
    assert_eq!(entry.num_requested(), 2);
    assert!(!entry.is_exact());

    let entry = index.resolve(["A", "G"]).unwrap();
    assert_eq!(entry.ancestor(), tree.root().index());
    assert_eq!(entry.leaves().len(), 7);
}

#[test]
fn test_request_order_and_repeats_do_not_matter() {
    let tree = scenario();
    let index = CladeIndex::new(&tree);

    let forward = index.resolve(["F", "G", "E"]).unwrap();
    let backward = index.resolve(vec!["E".to_string(), "G".to_string(), "F".to_string(), "G".to_string()]).unwrap();
    assert_eq!(forward, backward);
    assert_eq!(backward.num_requested(), 3);
    assert!(backward.is_exact());
}

// ============= Error Tests =============
#[test]
fn test_not_found_lists_sorted_names() {
    let tree = scenario();
    let index = CladeIndex::new(&tree);

    let err = index.resolve(["Z", "A", "X", "Z"]).unwrap_err();
    assert_eq!(
        err,
        LayoutError::NotFound {
            names: vec!["X".to_string(), "Z".to_string()]
        }
    );
    assert_eq!(err.to_string(), "Not found in tree: X, Z");
}

#[test]
fn test_empty_query() {
    let tree = scenario();
    let index = CladeIndex::new(&tree);

    let err = index.resolve(Vec::<&str>::new()).unwrap_err();
    assert_eq!(err, LayoutError::EmptyQuery);
}

#[test]
fn test_ambiguous_name() {
    let tree = parse_str("((A,B),(A,C));").unwrap();
    let index = CladeIndex::new(&tree);

    let err = index.resolve(["A", "B"]).unwrap_err();
    assert_eq!(err, LayoutError::ambiguous("A", 2));
    assert_eq!(index.leaves_named("A").len(), 2);
}

#[test]
fn test_missing_names_reported_before_ambiguity() {
    let tree = parse_str("((A,B),(A,C));").unwrap();
    let index = CladeIndex::new(&tree);

    let err = index.resolve(["A", "Q"]).unwrap_err();
    assert!(matches!(err, LayoutError::NotFound { .. }));
}

#[test]
fn test_all_matches_includes_duplicates() {
    let tree = parse_str("((A,B),(A,C));").unwrap();
    let index = CladeIndex::new(&tree);

    let entry = index.resolve_with(["A"], NameMatching::AllMatches).unwrap();
    assert_eq!(entry.ancestor(), tree.root().index());
    assert_eq!(entry.num_requested(), 2);
    assert_eq!(names(&tree, entry.leaves()), vec!["A", "B", "A", "C"]);
    assert!(!entry.is_exact());
}

// ============= Node Lookup Tests =============
#[test]
fn test_find_node_includes_internal_names() {
    let tree = scenario();
    let index = CladeIndex::new(&tree);

    assert_eq!(index.find_node("cg").unwrap(), find(&tree, "cg"));
    assert_eq!(index.find_node("D").unwrap(), find(&tree, "D"));
    assert_eq!(
        index.find_node("nope").unwrap_err(),
        LayoutError::not_found(["nope"])
    );
    assert!(index.leaves_named("cg").is_empty());
}

#[test]
fn test_common_ancestor() {
    let tree = scenario();
    let index = CladeIndex::new(&tree);

    let c = find(&tree, "C");
    let f = find(&tree, "F");
    let cg = find(&tree, "cg");
    assert_eq!(index.common_ancestor(c, f), cg);
    assert_eq!(index.common_ancestor(f, c), cg);
    assert_eq!(index.common_ancestor(cg, f), cg);
    assert_eq!(index.common_ancestor(f, f), f);
}

#[test]
fn test_single_leaf_tree() {
    let tree = parse_str("A;").unwrap();
    let index = CladeIndex::new(&tree);

    let entry = index.resolve(["A"]).unwrap();
    assert_eq!(entry.ancestor(), 0);
    assert!(entry.is_exact());
}
