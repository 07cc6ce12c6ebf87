//! Data model for rooted phylogenetic trees.
//!
//! # Tree representation
//! Trees are represented by [PhyloTree], which uses the arena pattern to store
//! [Node]s referenced by [NodeIndex]. Nodes may have any number of ordered
//! children; a node without children is a leaf. Parents are kept in an
//! index table on the tree, not on the nodes.
//!
//! # Building trees
//! Trees are either assembled directly via the `add_*` methods of
//! [PhyloTree], or during parsing via the [TreeBuilder] trait, which
//! decouples parsers from concrete tree types:
//!
//! - [PhyloTreeBuilder] → [PhyloTree]

pub mod node;
pub mod tree;
pub mod tree_builder;

pub use node::BranchLength;
pub use node::Node;
pub use tree::NodeIndex;
pub use tree::PhyloTree;
pub use tree_builder::PhyloTreeBuilder;
pub use tree_builder::TreeBuilder;
