//! Trait for constructing phylogenetic trees during parsing.
//!
//! The [`TreeBuilder`] trait decouples parsers from concrete tree representations.
//! Parsers call builder methods as they read Newick syntax, and the
//! builder assembles whatever tree structure it wants.
//!
//! # Built-in implementation
//! * [`PhyloTreeBuilder`] - Builds [`PhyloTree`], the arena tree used by the layout engine
//!
//! # Custom implementations
//! You can implement [`TreeBuilder`] to construct your own tree representation,
//! allowing you to reuse the parsing logic without adopting this library's tree model.
//!
//! # Builder lifecycle
//! A builder can construct multiple trees sequentially:
//!
//! ```text
//! Empty ──→ init_next() ──→ Building ──→ add_*/set_* ──→ finish_tree() ──→ Empty
//!   ↑                                                                       │
//!   └───────────────────────────────────────────────────────────────────────┘
//! ```
use crate::model::node::BranchLength;
use crate::model::tree::{NodeIndex, PhyloTree};

// =#========================================================================#=
// TREE BUILDER (trait)
// =#========================================================================#=
/// Abstraction for constructing trees during parsing.
///
/// Parsers are generic over this trait, calling its methods as they encounter
/// leaves and internal nodes in the input. This allows the same parser
/// to build different tree representations.
///
/// The parser drives the lifecycle:
/// 1. [`init_next`](Self::init_next) -> prepare for a new tree
/// 2. [`add_leaf`](Self::add_leaf), [`add_internal`](Self::add_internal)
///    -> build structure bottom-up
/// 3. [`set_node_name`](Self::set_node_name),
///    [`set_confidence`](Self::set_confidence) -> attach internal labels
/// 4. [`set_root`](Self::set_root) -> declare the outermost node as root
/// 5. [`finish_tree`](Self::finish_tree) -> finalize and return the tree
pub trait TreeBuilder {
    /// The type used to identify nodes during construction.
    ///
    /// Returned by the `add_*` methods, then passed to subsequent calls to
    /// connect parent-child relationships.
    type NodeIdx: Copy;

    /// The tree type produced by this builder.
    type Tree;

    /// Prepares the builder for constructing a new tree.
    ///
    /// # Arguments
    /// * `num_nodes` - Expected number of nodes (hint for allocation)
    fn init_next(&mut self, num_nodes: usize);

    /// Adds a leaf node to the tree under construction.
    ///
    /// # Arguments
    /// * `name` - Leaf label, `None` if the input has none
    /// * `branch_len` - Branch length to parent, if specified (non-negative)
    fn add_leaf(&mut self, name: Option<String>, branch_len: Option<f64>) -> Self::NodeIdx;

    /// Adds an internal node with the given children (in input order).
    ///
    /// # Arguments
    /// * `children` - Indices returned by previous `add_*` calls
    /// * `branch_len` - Branch length to parent, if specified (non-negative)
    fn add_internal(&mut self, children: Vec<Self::NodeIdx>, branch_len: Option<f64>)
    -> Self::NodeIdx;

    /// Names a node (used for labelled internal nodes).
    fn set_node_name(&mut self, node: Self::NodeIdx, name: String);

    /// Attaches a confidence value to a node.
    fn set_confidence(&mut self, node: Self::NodeIdx, confidence: f64);

    /// Declares `node` as the root, completing the tree structure.
    fn set_root(&mut self, node: Self::NodeIdx);

    /// Sets the name of the currently constructed tree.
    fn set_name(&mut self, tree_name: String);

    /// Finalizes the building process and returns the resulting tree,
    /// or `None` if no tree was under construction.
    fn finish_tree(&mut self) -> Option<Self::Tree>;
}

// =#========================================================================#=
// PHYLO TREE BUILDER
// =#========================================================================#=
/// [TreeBuilder] producing [PhyloTree].
#[derive(Debug, Default)]
pub struct PhyloTreeBuilder {
    current_tree: Option<PhyloTree>,
}

impl PhyloTreeBuilder {
    /// Creates a new, empty builder.
    pub fn new() -> Self {
        Self { current_tree: None }
    }

    fn tree(&mut self) -> &mut PhyloTree {
        self.current_tree.get_or_insert_with(PhyloTree::new)
    }
}

impl TreeBuilder for PhyloTreeBuilder {
    type NodeIdx = NodeIndex;
    type Tree = PhyloTree;

    fn init_next(&mut self, num_nodes: usize) {
        self.current_tree = Some(PhyloTree::with_capacity(num_nodes));
    }

    fn add_leaf(&mut self, name: Option<String>, branch_len: Option<f64>) -> NodeIndex {
        self.tree().add_leaf(name, branch_len.map(BranchLength::new))
    }

    fn add_internal(&mut self, children: Vec<NodeIndex>, branch_len: Option<f64>) -> NodeIndex {
        self.tree()
            .add_internal_node(children, branch_len.map(BranchLength::new))
    }

    fn set_node_name(&mut self, node: NodeIndex, name: String) {
        self.tree().node_mut(node).set_name(name);
    }

    fn set_confidence(&mut self, node: NodeIndex, confidence: f64) {
        self.tree().node_mut(node).set_confidence(confidence);
    }

    fn set_root(&mut self, node: NodeIndex) {
        self.tree().set_root(node);
    }

    fn set_name(&mut self, tree_name: String) {
        self.tree().set_name(tree_name);
    }

    fn finish_tree(&mut self) -> Option<PhyloTree> {
        self.current_tree.take()
    }
}
