//! Node module for phylogenetic tree representation.

use crate::model::tree::NodeIndex;
use std::ops::Deref;

// =#========================================================================#=
// NODE
// =#========================================================================#=
/// Represents a node (vertex) in a phylogenetic tree.
///
/// A node is a leaf if it has no children. Any node may carry a name, but
/// typical input only names leaves. Names are not required to be unique.
///
/// # Invariants
/// - `index` is index in arena and thus the stable identity of the node
/// - `children` are in input order; order determines vertical stacking
/// - `branch_length` is non-negative (enforced by [BranchLength]); might not be set
/// - Parents are not stored on nodes, see [`PhyloTree::parent()`](crate::model::PhyloTree::parent)
#[derive(PartialEq, Debug, Clone)]
pub struct Node {
    /// Index of this node in the tree arena
    index: NodeIndex,
    /// Indices of child nodes, in input order
    children: Vec<NodeIndex>,
    /// Optional name (label)
    name: Option<String>,
    /// Distance to parent node (optional, non-negative if present)
    branch_length: Option<BranchLength>,
    /// Support value of the clade below this node (display only)
    confidence: Option<f64>,
}

impl Node {
    /// Creates a new leaf node.
    ///
    /// # Arguments
    /// * `index` - The unique index of this node in the tree (arena)
    /// * `name` - Optional leaf name
    /// * `branch_length` - Distance to parent node (non-negative)
    pub fn new_leaf(
        index: NodeIndex,
        name: Option<String>,
        branch_length: Option<BranchLength>,
    ) -> Self {
        Node {
            index,
            children: Vec::new(),
            name,
            branch_length,
            confidence: None,
        }
    }

    /// Creates a new internal node (also used for the root).
    ///
    /// # Arguments
    /// * `index` - The unique index of this node in the tree (arena)
    /// * `children` - Child indices in input order
    /// * `branch_length` - Distance to parent node (non-negative)
    pub fn new_internal(
        index: NodeIndex,
        children: Vec<NodeIndex>,
        branch_length: Option<BranchLength>,
    ) -> Self {
        Node {
            index,
            children,
            name: None,
            branch_length,
            confidence: None,
        }
    }

    /// Attaches a name to this node.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Attaches a confidence value to this node.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Returns the index of this node.
    pub fn index(&self) -> NodeIndex {
        self.index
    }

    /// Returns the children of this node in input order (empty for leaves).
    pub fn children(&self) -> &[NodeIndex] {
        &self.children
    }

    /// Returns `true` if this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns `true` if this node has at least one child.
    pub fn is_internal(&self) -> bool {
        !self.children.is_empty()
    }

    /// Returns the name of this node, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Sets the name of this node.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// Returns whether this node has a [BranchLength].
    pub fn has_branch_length(&self) -> bool {
        self.branch_length.is_some()
    }

    /// Returns the length of the incoming branch, if set.
    pub fn branch_length(&self) -> Option<BranchLength> {
        self.branch_length
    }

    /// Returns the confidence value, if set.
    pub fn confidence(&self) -> Option<f64> {
        self.confidence
    }

    /// Sets the confidence value of this node.
    pub fn set_confidence(&mut self, confidence: f64) {
        self.confidence = Some(confidence);
    }
}

// =#========================================================================#=
// BRANCH LENGTH
// =#========================================================================#=
/// Branch length in a phylogenetic tree, enforced non-negative.
///
/// Represents the evolutionary distance between a node and its parent.
/// The value is guaranteed to be non-negative and finite.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct BranchLength(f64);

impl BranchLength {
    /// Creates a new branch length.
    ///
    /// # Arguments
    /// * `length` - The branch length value (must be non-negative)
    ///
    /// # Panics
    /// Panics if `length` is negative or not finite.
    pub fn new(length: f64) -> Self {
        assert!(length >= 0.0, "Branch length must be non-negative, got {}", length);
        assert!(length.is_finite(), "Branch length must be finite, got {}", length);
        BranchLength(length)
    }

    /// Creates a new branch length, or `None` if `length` is negative or not finite.
    pub fn try_new(length: f64) -> Option<Self> {
        (length >= 0.0 && length.is_finite()).then_some(BranchLength(length))
    }

    /// Returns the raw value.
    pub fn value(self) -> f64 {
        self.0
    }
}

impl Deref for BranchLength {
    type Target = f64;
    fn deref(&self) -> &f64 {
        &self.0
    }
}
