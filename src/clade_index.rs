//! Name-based addressing of clades.
//!
//! A [CladeIndex] is built once per tree and resolves a set of leaf names to
//! their most recent common ancestor (MRCA) together with every leaf spanned
//! by that ancestor. The entry reports whether the names form an exact clade
//! (monophyletic) or only a part of one.
//!
//! # Example
//! ```
//! use phylayout::clade_index::CladeIndex;
//! use phylayout::newick;
//!
//! let tree = newick::parse_str("((A,B),((C,D),(E,(F,G))));").unwrap();
//! let index = CladeIndex::new(&tree);
//!
//! let entry = index.resolve(["E", "G"]).unwrap();
//! assert_eq!(entry.leaves().len(), 3); // E, F, G
//! assert!(!entry.is_exact());
//! ```

use crate::error::{LayoutError, Result};
use crate::model::{NodeIndex, PhyloTree};
use std::collections::HashMap;

/// How requested names are matched against leaf names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameMatching {
    /// Every name must match exactly one leaf; duplicates are an error.
    #[default]
    Exact,
    /// Every leaf carrying a requested name is included.
    AllMatches,
}

// =#========================================================================#=
// CLADE ENTRY
// =#========================================================================#=
/// Result of resolving a set of names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CladeEntry {
    ancestor: NodeIndex,
    leaves: Vec<NodeIndex>,
    num_requested: usize,
}

impl CladeEntry {
    /// Returns the most recent common ancestor of the requested leaves.
    pub fn ancestor(&self) -> NodeIndex {
        self.ancestor
    }

    /// Returns all leaves below the ancestor, left to right.
    ///
    /// A superset of the requested leaves unless the entry [is exact](Self::is_exact).
    pub fn leaves(&self) -> &[NodeIndex] {
        &self.leaves
    }

    /// Returns the number of distinct leaves matched by the request.
    pub fn num_requested(&self) -> usize {
        self.num_requested
    }

    /// Returns whether the requested leaves are exactly the leaves below the ancestor.
    pub fn is_exact(&self) -> bool {
        self.leaves.len() == self.num_requested
    }
}

// =#========================================================================#=
// CLADE INDEX
// =#========================================================================#=
/// Lookup tables to resolve names to nodes and clades of one tree.
///
/// Borrows nothing from the tree; rebuild it when the tree changes.
#[derive(Debug, Clone)]
pub struct CladeIndex {
    leaf_names: HashMap<String, Vec<NodeIndex>>,
    node_names: HashMap<String, Vec<NodeIndex>>,
    parents: Vec<Option<NodeIndex>>,
    depths: Vec<usize>,
    /// Leaves in depth-first order
    leaf_order: Vec<NodeIndex>,
    /// First and last slot in `leaf_order` below each node
    leaf_spans: Vec<(usize, usize)>,
}

impl CladeIndex {
    /// Builds the index for `tree` in linear time.
    pub fn new(tree: &PhyloTree) -> Self {
        let num_nodes = tree.num_nodes();
        let mut leaf_names: HashMap<String, Vec<NodeIndex>> = HashMap::new();
        let mut node_names: HashMap<String, Vec<NodeIndex>> = HashMap::new();
        let mut parents = vec![None; num_nodes];
        let mut depths = vec![0; num_nodes];
        let mut leaf_order = Vec::with_capacity(tree.num_leaves());
        let mut leaf_spans = vec![(0, 0); num_nodes];

        let root = tree.root_index();
        for node in tree.pre_order_iter() {
            let index = node.index();
            if Some(index) != root {
                parents[index] = tree.parent(index);
            }
            if let Some(parent) = parents[index] {
                depths[index] = depths[parent] + 1;
            }
            if let Some(name) = node.name() {
                node_names.entry(name.to_string()).or_default().push(index);
                if node.is_leaf() {
                    leaf_names.entry(name.to_string()).or_default().push(index);
                }
            }
            if node.is_leaf() {
                leaf_spans[index] = (leaf_order.len(), leaf_order.len());
                leaf_order.push(index);
            }
        }

        for node in tree.post_order_iter() {
            let children = node.children();
            if let (Some(first), Some(last)) = (children.first(), children.last()) {
                leaf_spans[node.index()] = (leaf_spans[*first].0, leaf_spans[*last].1);
            }
        }

        tracing::debug!(
            target: "phylayout::clade_index",
            num_nodes,
            num_leaf_names = leaf_names.len(),
            "built clade index"
        );

        CladeIndex {
            leaf_names,
            node_names,
            parents,
            depths,
            leaf_order,
            leaf_spans,
        }
    }

    /// Resolves leaf names to their clade, requiring each name to match
    /// exactly one leaf.
    ///
    /// # Errors
    /// * [LayoutError::EmptyQuery] if `names` is empty
    /// * [LayoutError::NotFound] listing every name without a leaf
    /// * [LayoutError::AmbiguousName] if a name matches several leaves
    pub fn resolve<I, S>(&self, names: I) -> Result<CladeEntry>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.resolve_with(names, NameMatching::Exact)
    }

    /// Resolves leaf names to their clade with the given [NameMatching].
    ///
    /// # Errors
    /// As [resolve](Self::resolve); [LayoutError::AmbiguousName] only with
    /// [NameMatching::Exact].
    pub fn resolve_with<I, S>(&self, names: I, matching: NameMatching) -> Result<CladeEntry>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut missing = Vec::new();
        let mut ambiguous = None;
        let mut matched = Vec::new();
        let mut num_names = 0;

        for name in names {
            num_names += 1;
            let name = name.as_ref();
            match self.leaf_names.get(name) {
                None => missing.push(name.to_string()),
                Some(leaves) if matching == NameMatching::Exact && leaves.len() > 1 => {
                    ambiguous.get_or_insert_with(|| LayoutError::ambiguous(name, leaves.len()));
                }
                Some(leaves) => matched.extend_from_slice(leaves),
            }
        }

        if num_names == 0 {
            return Err(LayoutError::EmptyQuery);
        }
        if !missing.is_empty() {
            return Err(LayoutError::not_found(missing));
        }
        if let Some(err) = ambiguous {
            return Err(err);
        }

        matched.sort_unstable();
        matched.dedup();
        let ancestor = matched
            .iter()
            .copied()
            .reduce(|a, b| self.common_ancestor(a, b))
            .ok_or(LayoutError::EmptyQuery)?;

        let (first, last) = self.leaf_spans[ancestor];
        let entry = CladeEntry {
            ancestor,
            leaves: self.leaf_order[first..=last].to_vec(),
            num_requested: matched.len(),
        };

        tracing::trace!(
            target: "phylayout::clade_index",
            ancestor,
            num_requested = entry.num_requested,
            num_spanned = entry.leaves.len(),
            "resolved clade"
        );

        Ok(entry)
    }

    /// Finds the node (leaf or internal) carrying `name`.
    ///
    /// # Errors
    /// * [LayoutError::NotFound] if no node has this name
    /// * [LayoutError::AmbiguousName] if several nodes have it
    pub fn find_node(&self, name: &str) -> Result<NodeIndex> {
        match self.node_names.get(name).map(Vec::as_slice) {
            None | Some([]) => Err(LayoutError::not_found([name])),
            Some([index]) => Ok(*index),
            Some(nodes) => Err(LayoutError::ambiguous(name, nodes.len())),
        }
    }

    /// Returns all leaves named `name`, left to right.
    pub fn leaves_named(&self, name: &str) -> &[NodeIndex] {
        self.leaf_names.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns the most recent common ancestor of two nodes.
    ///
    /// Lifts the deeper node to the depth of the other, then lifts both
    /// until they meet.
    pub fn common_ancestor(&self, a: NodeIndex, b: NodeIndex) -> NodeIndex {
        let (mut a, mut b) = (a, b);
        while self.depths[a] > self.depths[b] {
            a = self.parent_of(a);
        }
        while self.depths[b] > self.depths[a] {
            b = self.parent_of(b);
        }
        while a != b {
            a = self.parent_of(a);
            b = self.parent_of(b);
        }
        a
    }

    /// Parent of a node with positive depth.
    fn parent_of(&self, node: NodeIndex) -> NodeIndex {
        match self.parents[node] {
            Some(parent) => parent,
            None => unreachable!("node {node} at depth {} has no parent", self.depths[node]),
        }
    }
}
