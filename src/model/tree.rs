//! Provides the arena tree representation.
//!
//! Provides core data structures for representing phylogenetic trees:
//! * [PhyloTree] - Main tree structure using the arena pattern
//!   for efficient memory layout; rooted and multifurcating.
//! * [NodeIndex] as type used to index nodes in tree
//! * [PreOrderIter] and [PostOrderIter] for stack-based traversals

use crate::model::node::{BranchLength, Node};
use std::fmt;

/// Index of a node in a tree (arena).
pub type NodeIndex = usize;

/// *During construction only*, index for unset root.
const NO_ROOT_SET_INDEX: NodeIndex = usize::MAX;

// =$========================================================================$=
// TREE
// =$========================================================================$=
/// A rooted phylogenetic tree represented using the arena pattern on [Node].
///
/// Nodes are stored in a contiguous vector and referenced by [NodeIndex].
/// Aim is to avoid referencing troubles (no parent back-references on nodes)
/// as well as to provide cheap snapshot copies and cache locality for
/// traversal operations.
///
/// # Structure
/// - All nodes (root, internal, and leaves) are stored in the arena.
/// - Index of root is maintained.
/// - Parent of each node is kept in a separate index table, filled in when
///   a node is attached as child.
/// - No assumption on order of indices is maintained
///   (e.g. leaves must not be first `n` indices).
/// - Child order is preserved from input.
/// - Branch lengths are optional, but if provided must be non-negative.
///
/// # Construction
/// Add nodes bottom-up: leaves first, then internal nodes with the indices
/// of their children, finally the root via [`PhyloTree::add_root()`] (or
/// [`PhyloTree::set_root()`] for a tree consisting of a single leaf).
/// Test validity with [`PhyloTree::is_valid()`].
///
/// ```
/// use phylayout::model::PhyloTree;
/// use phylayout::model::node::BranchLength;
///
/// let mut tree = PhyloTree::new();
/// let a = tree.add_named_leaf("A", Some(BranchLength::new(1.0)));
/// let b = tree.add_named_leaf("B", Some(BranchLength::new(2.0)));
/// let c = tree.add_named_leaf("C", None);
/// let root = tree.add_root(vec![a, b, c], None);
///
/// assert_eq!(tree.num_leaves(), 3);
/// assert_eq!(tree.parent(b), Some(root));
/// assert!(tree.is_valid());
/// ```
#[derive(Debug, Clone)]
pub struct PhyloTree {
    /// Nodes of this tree (arena pattern)
    nodes: Vec<Node>,

    /// Parent index per node, parallel to `nodes`
    parents: Vec<Option<NodeIndex>>,

    /// Index of the root of this tree
    root_index: NodeIndex,

    /// Name of tree; optional
    name: Option<String>,
}

impl Default for PhyloTree {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// New, Construction (pub)
// ============================================================================
impl PhyloTree {
    /// Creates a new empty tree.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a new empty tree with capacity for `num_nodes` nodes.
    pub fn with_capacity(num_nodes: usize) -> Self {
        PhyloTree {
            nodes: Vec::with_capacity(num_nodes),
            parents: Vec::with_capacity(num_nodes),
            root_index: NO_ROOT_SET_INDEX,
            name: None,
        }
    }

    /// Attaches a name to this tree.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Adds a leaf to the tree, assigning a unique index, which gets returned.
    ///
    /// # Arguments
    /// * `name` - Optional name of the leaf
    /// * `branch_length` - Length of incoming branch, i.e. distance to parent
    pub fn add_leaf(
        &mut self,
        name: Option<String>,
        branch_length: Option<BranchLength>,
    ) -> NodeIndex {
        let index = self.nodes.len();
        self.nodes.push(Node::new_leaf(index, name, branch_length));
        self.parents.push(None);
        index
    }

    /// Adds a named leaf to the tree; shorthand for [`add_leaf`](Self::add_leaf).
    pub fn add_named_leaf(
        &mut self,
        name: impl Into<String>,
        branch_length: Option<BranchLength>,
    ) -> NodeIndex {
        self.add_leaf(Some(name.into()), branch_length)
    }

    /// Adds an internal node to the tree, assigning a unique index, which gets returned.
    ///
    /// # Arguments
    /// * `children` - Child indices in display order
    /// * `branch_length` - Length of incoming branch, i.e. distance to parent
    ///
    /// # Panics
    /// Panics if `children` is empty, if a child index is out of bounds,
    /// or if a child already has a parent.
    pub fn add_internal_node(
        &mut self,
        children: Vec<NodeIndex>,
        branch_length: Option<BranchLength>,
    ) -> NodeIndex {
        assert!(!children.is_empty(), "Internal node needs at least one child");
        let index = self.nodes.len();
        for &child in &children {
            assert!(
                self.parents[child].is_none(),
                "Node {child} already has parent {:?}",
                self.parents[child]
            );
            self.parents[child] = Some(index);
        }
        self.nodes
            .push(Node::new_internal(index, children, branch_length));
        self.parents.push(None);
        index
    }

    /// Adds a root to the tree, assigning a unique index, which gets returned.
    ///
    /// # Arguments
    /// * `children` - Child indices in display order
    /// * `branch_length` - Optional length of incoming edge (kept, but ignored by layout)
    pub fn add_root(
        &mut self,
        children: Vec<NodeIndex>,
        branch_length: Option<BranchLength>,
    ) -> NodeIndex {
        let index = self.add_internal_node(children, branch_length);
        self.root_index = index;
        index
    }

    /// Declares an existing node as root, e.g. a single leaf forming the whole tree.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds or the node has a parent.
    pub fn set_root(&mut self, index: NodeIndex) {
        assert!(
            self.parents[index].is_none(),
            "Root {index} must not have a parent"
        );
        self.root_index = index;
    }

    /// Returns reference to name of this tree, or `None` if not set.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Set a name for this tree.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }
}

// ============================================================================
// Getters / Accessors (pub)
// ============================================================================
impl PhyloTree {
    /// Returns whether root of tree has been set.
    pub fn is_root_set(&self) -> bool {
        self.root_index != NO_ROOT_SET_INDEX
    }

    /// Returns whether this tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns a reference to the root node.
    ///
    /// # Panics
    /// Panics if the root hasn't been set and thus tree hasn't been fully constructed yet.
    pub fn root(&self) -> &Node {
        &self[self.root_index]
    }

    /// Returns the index of the root, or `None` if not set yet.
    pub fn root_index(&self) -> Option<NodeIndex> {
        self.is_root_set().then_some(self.root_index)
    }

    /// Returns a reference to the node at the given index.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn node(&self, index: NodeIndex) -> &Node {
        &self[index]
    }

    /// Returns a mutable reference to the node at the given index,
    /// e.g. to set names or confidence values after construction.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn node_mut(&mut self, index: NodeIndex) -> &mut Node {
        &mut self.nodes[index]
    }

    /// Returns all nodes in arena order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Returns the index of the parent of `index`, or `None` for the root
    /// (and for nodes not attached yet).
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn parent(&self, index: NodeIndex) -> Option<NodeIndex> {
        self.parents[index]
    }

    /// Returns the children of `index` in input order.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn children(&self, index: NodeIndex) -> &[NodeIndex] {
        self.nodes[index].children()
    }

    /// Returns the number of nodes in this tree.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of leaves in this tree.
    pub fn num_leaves(&self) -> usize {
        self.nodes.iter().filter(|&n| n.is_leaf()).count()
    }

    /// Returns the number of internal nodes (including the root) in this tree.
    pub fn num_internal(&self) -> usize {
        self.nodes.iter().filter(|&n| n.is_internal()).count()
    }

    /// Returns leaf indices in left-to-right (depth-first, child order) order.
    pub fn leaves(&self) -> Vec<NodeIndex> {
        self.pre_order_iter()
            .filter(|n| n.is_leaf())
            .map(|n| n.index())
            .collect()
    }

    /// Returns the number of edges between `index` and the root.
    pub fn depth(&self, index: NodeIndex) -> usize {
        let mut depth = 0;
        let mut current = index;
        while let Some(parent) = self.parents[current] {
            depth += 1;
            current = parent;
        }
        depth
    }

    /// Returns the sum of all branch lengths in the tree (missing count as zero).
    pub fn total_branch_length(&self) -> f64 {
        self.nodes
            .iter()
            .filter_map(|n| n.branch_length())
            .map(|bl| *bl)
            .sum::<f64>()
    }

    /// Checks if all non-root nodes have branch lengths set.
    pub fn nodes_have_branch_lengths(&self) -> bool {
        self.nodes
            .iter()
            .all(|n| n.index() == self.root_index || n.has_branch_length())
    }

    /// Gives every unnamed internal node the name `"{prefix}{k}"`,
    /// with `k` counting from 1 in pre-order over internal nodes.
    ///
    /// Numbering counts all internal nodes, named or not, so the generated
    /// name of a node does not depend on which other nodes were named.
    ///
    /// # Returns
    /// Indices of the nodes that received a generated name.
    pub fn assign_internal_names(&mut self, prefix: &str) -> Vec<NodeIndex> {
        let internal: Vec<NodeIndex> = self
            .pre_order_iter()
            .filter(|n| n.is_internal())
            .map(|n| n.index())
            .collect();

        let mut renamed = Vec::new();
        for (k, index) in internal.into_iter().enumerate() {
            let node = &mut self.nodes[index];
            if node.name().is_none() {
                node.set_name(format!("{prefix}{}", k + 1));
                renamed.push(index);
            }
        }
        renamed
    }

    /// Validates the tree structure and all index references.
    ///
    /// Checks:
    /// - Root index is set, within bounds and has no parent
    /// - All node indices match their position in the arena
    /// - All child indices are valid and the parent table points back
    /// - Every node is reachable from the root exactly once
    ///
    /// # Returns
    /// `true` if tree is valid, `false` otherwise
    pub fn is_valid(&self) -> bool {
        if !self.is_root_set() || self.root_index >= self.nodes.len() {
            return false;
        }

        if self.parents[self.root_index].is_some() {
            return false;
        }

        for (index, node) in self.nodes.iter().enumerate() {
            if node.index() != index {
                return false;
            }

            for &child in node.children() {
                if child >= self.nodes.len() || self.parents[child] != Some(index) {
                    return false;
                }
            }

            if index != self.root_index {
                match self.parents[index] {
                    None => return false,
                    Some(parent) => {
                        if !self.nodes[parent].children().contains(&index) {
                            return false;
                        }
                    }
                }
            }
        }

        // Parent table is consistent, so reachability boils down to the count
        self.pre_order_iter().count() == self.nodes.len()
    }
}

impl std::ops::Index<NodeIndex> for PhyloTree {
    type Output = Node;

    fn index(&self, index: NodeIndex) -> &Self::Output {
        &self.nodes[index]
    }
}

// ============================================================================
// Printing (pub)
// ============================================================================
/// Visual representation of the tree, one node per line.
///
/// # Example Output
/// ```text
/// Tree with 3 leaves (5 nodes total):
/// [4] Internal (no branch)
///   ├─ [2] Internal "N_2" (branch: 0.300)
///   │  ├─ [0] Leaf "A" (branch: 0.100)
///   │  └─ [1] Leaf "B" (branch: 0.200)
///   └─ [3] Leaf "C" (branch: 0.400)
/// ```
impl fmt::Display for PhyloTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Tree with {} leaves ({} nodes total):",
            self.num_leaves(),
            self.nodes.len()
        )?;

        if !self.is_root_set() {
            return writeln!(f, "(No root set)");
        }

        // (index, prefix, is_last, is_root), popped in pre-order
        let mut stack = vec![(self.root_index, String::new(), true, true)];
        while let Some((index, prefix, is_last, is_root)) = stack.pop() {
            let node = &self.nodes[index];
            Self::fmt_node(f, node, &prefix, is_last, is_root)?;

            let child_prefix = if is_root {
                "  ".to_string()
            } else {
                format!("{}{}  ", prefix, if is_last { " " } else { "│" })
            };
            let children = node.children();
            for (k, &child) in children.iter().enumerate().rev() {
                stack.push((child, child_prefix.clone(), k + 1 == children.len(), false));
            }
        }
        Ok(())
    }
}

impl PhyloTree {
    /// Helper function to print a single node line.
    fn fmt_node(
        f: &mut fmt::Formatter<'_>,
        node: &Node,
        prefix: &str,
        is_last: bool,
        is_root: bool,
    ) -> fmt::Result {
        let connector = if is_root {
            ""
        } else if is_last {
            "└─ "
        } else {
            "├─ "
        };
        let kind = if node.is_leaf() { "Leaf" } else { "Internal" };
        let name = node
            .name()
            .map(|n| format!(" \"{n}\""))
            .unwrap_or_default();
        let branch = match node.branch_length() {
            Some(bl) => format!("(branch: {:.3})", *bl),
            None => "(no branch)".to_string(),
        };

        writeln!(f, "{prefix}{connector}[{}] {kind}{name} {branch}", node.index())
    }
}

// =$========================================================================$=
// ITERATORS
// =$========================================================================$=
impl PhyloTree {
    /// Returns an iterator over the tree in post-order (children before parents).
    ///
    /// Children are visited in input order. This is useful for aggregating
    /// data from leaves upward, e.g. vertical coordinates.
    pub fn post_order_iter(&self) -> PostOrderIter<'_> {
        PostOrderIter::new(self, self.root_index())
    }

    /// Returns an iterator over the tree in pre-order (parents before children).
    ///
    /// Children are visited in input order. This is useful for propagating
    /// data from root to leaves, e.g. horizontal coordinates.
    pub fn pre_order_iter(&self) -> PreOrderIter<'_> {
        PreOrderIter::new(self, self.root_index())
    }

    /// Returns an iterator over `index` and all its descendants in pre-order.
    ///
    /// # Panics
    /// Panics (on first call to `next`) if `index` is out of bounds.
    pub fn descendants(&self, index: NodeIndex) -> PreOrderIter<'_> {
        PreOrderIter::new(self, Some(index))
    }
}

/// Iterator for post-order traversal (children before parents).
///
/// This iterator uses a stack-based approach to traverse the tree without recursion.
/// Each node is visited after all its descendants have been visited.
#[derive(Debug)]
pub struct PostOrderIter<'a> {
    tree: &'a PhyloTree,
    stack: Vec<(NodeIndex, bool)>, // (index, children_visited)
}

impl<'a> PostOrderIter<'a> {
    fn new(tree: &'a PhyloTree, start: Option<NodeIndex>) -> Self {
        PostOrderIter {
            tree,
            stack: start.map(|s| (s, false)).into_iter().collect(),
        }
    }
}

impl<'a> Iterator for PostOrderIter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((index, children_visited)) = self.stack.pop() {
            let node = &self.tree[index];

            if children_visited || node.is_leaf() {
                return Some(node);
            }

            self.stack.push((index, true));

            // Push children in reverse, so first child is processed first
            for &child in node.children().iter().rev() {
                self.stack.push((child, false));
            }
        }
        None
    }
}

/// Iterator for pre-order traversal (parents before children).
///
/// This iterator uses a stack-based approach to traverse the tree without recursion.
/// Each node is visited before any of its descendants.
#[derive(Debug)]
pub struct PreOrderIter<'a> {
    tree: &'a PhyloTree,
    stack: Vec<NodeIndex>,
}

impl<'a> PreOrderIter<'a> {
    fn new(tree: &'a PhyloTree, start: Option<NodeIndex>) -> Self {
        PreOrderIter {
            tree,
            stack: start.into_iter().collect(),
        }
    }
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.stack.pop()?;
        let node = &self.tree[index];

        // Push children in reverse, so first child is processed first
        self.stack.extend(node.children().iter().rev());

        Some(node)
    }
}
