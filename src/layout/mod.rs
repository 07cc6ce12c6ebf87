//! Rectangular layout of a [PhyloTree].
//!
//! [Layout::compute] assigns every node a [Point]:
//! * **y** - leaves get the integer slots `0..leaf_count` in depth-first
//!   (child order) traversal; an internal node sits at the mean of its
//!   *direct* children's y, so ladder-shaped trees render as a staircase.
//! * **x** - cumulative branch length from the root (`x_root = 0`), or one
//!   unit per edge when branch lengths are ignored. An edge without branch
//!   length contributes zero when branch lengths are used; this policy is
//!   per edge, not per tree.
//!
//! The result is immutable. Changing the tree or the [LayoutConfig] means
//! computing a new [Layout]; older results stay valid for their snapshot.
//! Geometry queries used by annotations live in [geometry].
//!
//! # Example
//! ```
//! use phylayout::layout::{Layout, LayoutConfig};
//! use phylayout::newick;
//!
//! let tree = newick::parse_str("((A,B),((C,D),(E,(F,G))));").unwrap();
//! let layout = Layout::compute(&tree, LayoutConfig::cladogram()).unwrap();
//!
//! let root = tree.root().index();
//! assert_eq!(layout.position(root).x, 0.0);
//! assert_eq!(layout.num_leaves(), 7);
//! assert_eq!(layout.max_leaf_x(), 4.0);
//! ```

pub mod geometry;

pub use geometry::{
    BranchAnchor, BranchSegment, HighlightExtent, Point, Rect, SegmentKind,
};

use crate::error::{LayoutError, Result};
use crate::model::{Node, NodeIndex, PhyloTree};
use serde::{Deserialize, Serialize};

/// Horizontal step per edge when branch lengths are ignored.
const UNIT_STEP: f64 = 1.0;

/// Horizontal step of an edge without branch length when branch lengths are used.
const MISSING_BRANCH_STEP: f64 = 0.0;

// =#========================================================================#=
// LAYOUT CONFIG
// =#========================================================================#=
/// Options controlling the layout.
///
/// Deserializable with missing fields falling back to their defaults, e.g.
/// `{"align_leaf_labels": true}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Place nodes by cumulative branch length (`true`, default) or by
    /// unit steps per edge (`false`, i.e. `--ignore_branch_length`).
    pub use_branch_length: bool,
    /// Put all leaf labels at the x of the rightmost leaf (default `false`).
    pub align_leaf_labels: bool,
    /// Stack leaves in reverse traversal order (default `false`).
    pub reverse: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            use_branch_length: true,
            align_leaf_labels: false,
            reverse: false,
        }
    }
}

impl LayoutConfig {
    /// Default configuration, placing nodes by branch length.
    pub fn phylogram() -> Self {
        Self::default()
    }

    /// Configuration ignoring branch lengths (one unit per edge).
    pub fn cladogram() -> Self {
        Self::default().with_branch_length(false)
    }

    /// Sets whether branch lengths determine x positions.
    pub fn with_branch_length(mut self, use_branch_length: bool) -> Self {
        self.use_branch_length = use_branch_length;
        self
    }

    /// Sets whether leaf labels are aligned at the rightmost leaf.
    pub fn with_aligned_labels(mut self, align_leaf_labels: bool) -> Self {
        self.align_leaf_labels = align_leaf_labels;
        self
    }

    /// Sets whether leaves are stacked in reverse order.
    pub fn with_reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    /// Horizontal distance between `node` and its parent.
    fn step(&self, node: &Node) -> f64 {
        if !self.use_branch_length {
            return UNIT_STEP;
        }
        match node.branch_length() {
            Some(length) => {
                debug_assert!(*length >= 0.0, "negative branch length at node {}", node.index());
                *length
            }
            None => MISSING_BRANCH_STEP,
        }
    }
}

// =#========================================================================#=
// LAYOUT
// =#========================================================================#=
/// Coordinates for every node of a tree plus the per-node data needed by
/// geometry queries.
///
/// Indexed by the [NodeIndex] of the tree it was computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    config: LayoutConfig,
    root: NodeIndex,
    positions: Vec<Point>,
    parents: Vec<Option<NodeIndex>>,
    is_leaf: Vec<bool>,
    /// Leaves sorted by ascending y, so `leaf_order[y] == leaf`
    leaf_order: Vec<NodeIndex>,
    /// First and last slot in `leaf_order` of the leaves below each node
    leaf_spans: Vec<(usize, usize)>,
    /// Largest x among each node and its descendants
    max_x_below: Vec<f64>,
    max_leaf_x: f64,
}

impl Layout {
    /// Computes the layout of `tree`.
    ///
    /// # Errors
    /// [LayoutError::EmptyTree] if the tree has no nodes or no root.
    ///
    /// # Panics
    /// In debug builds, if the tree fails [PhyloTree::is_valid], e.g. has a
    /// node that is not attached below the root.
    pub fn compute(tree: &PhyloTree, config: LayoutConfig) -> Result<Self> {
        let root = match tree.root_index() {
            Some(root) if !tree.is_empty() => root,
            _ => return Err(LayoutError::EmptyTree),
        };
        debug_assert!(
            tree.is_valid(),
            "layout of an invalid tree (unattached nodes or broken parent table)"
        );

        let num_nodes = tree.num_nodes();
        let mut positions = vec![Point::ORIGIN; num_nodes];
        let mut dfs_leaves = Vec::new();

        // Top-down: x, and leaves in traversal order
        for node in tree.pre_order_iter() {
            let index = node.index();
            if let Some(parent) = tree.parent(index).filter(|_| index != root) {
                positions[index].x = positions[parent].x + config.step(node);
            }
            if node.is_leaf() {
                dfs_leaves.push(index);
            }
        }

        let num_leaves = dfs_leaves.len();
        let leaf_order: Vec<NodeIndex> = if config.reverse {
            dfs_leaves.into_iter().rev().collect()
        } else {
            dfs_leaves
        };

        let mut leaf_spans = vec![(0, 0); num_nodes];
        for (slot, &leaf) in leaf_order.iter().enumerate() {
            positions[leaf].y = slot as f64;
            leaf_spans[leaf] = (slot, slot);
        }

        // Bottom-up: internal y as mean of direct children, spans, depth below
        let mut max_x_below = vec![0.0; num_nodes];
        let mut is_leaf = vec![false; num_nodes];
        for node in tree.post_order_iter() {
            let index = node.index();
            let children = node.children();
            if children.is_empty() {
                is_leaf[index] = true;
                max_x_below[index] = positions[index].x;
                continue;
            }

            let mut y_sum = 0.0;
            let mut span = (usize::MAX, 0);
            let mut max_x = positions[index].x;
            for &child in children {
                y_sum += positions[child].y;
                span.0 = span.0.min(leaf_spans[child].0);
                span.1 = span.1.max(leaf_spans[child].1);
                max_x = max_x.max(max_x_below[child]);
            }
            positions[index].y = y_sum / children.len() as f64;
            leaf_spans[index] = span;
            max_x_below[index] = max_x;
        }

        // x is non-negative, so 0.0 is a safe start even for zero-step trees
        let max_leaf_x = leaf_order
            .iter()
            .map(|&leaf| positions[leaf].x)
            .fold(0.0, f64::max);

        let parents = (0..num_nodes)
            .map(|index| if index == root { None } else { tree.parent(index) })
            .collect();

        tracing::debug!(
            target: "phylayout::layout",
            num_nodes,
            num_leaves,
            max_leaf_x,
            use_branch_length = config.use_branch_length,
            "computed layout"
        );

        Ok(Layout {
            config,
            root,
            positions,
            parents,
            is_leaf,
            leaf_order,
            leaf_spans,
            max_x_below,
            max_leaf_x,
        })
    }

    /// Returns the configuration this layout was computed with.
    pub fn config(&self) -> LayoutConfig {
        self.config
    }

    /// Returns the index of the root node.
    pub fn root(&self) -> NodeIndex {
        self.root
    }

    /// Returns the position of `node`.
    ///
    /// # Panics
    /// Panics if `node` is out of bounds.
    pub fn position(&self, node: NodeIndex) -> Point {
        self.positions[node]
    }

    /// Returns the position of `node`, or `None` if it is out of bounds.
    pub fn try_position(&self, node: NodeIndex) -> Option<Point> {
        self.positions.get(node).copied()
    }

    /// Returns the positions of all nodes, indexed by [NodeIndex].
    pub fn positions(&self) -> &[Point] {
        &self.positions
    }

    /// Returns the leaves in ascending y, so `leaf_order()[y]` is the leaf at slot `y`.
    pub fn leaf_order(&self) -> &[NodeIndex] {
        &self.leaf_order
    }

    /// Returns the number of leaves.
    pub fn num_leaves(&self) -> usize {
        self.leaf_order.len()
    }

    /// Returns the number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.positions.len()
    }

    /// Returns the maximum x over all leaves.
    pub fn max_leaf_x(&self) -> f64 {
        self.max_leaf_x
    }

    /// Returns the parent of `node`, or `None` for the root.
    pub fn parent(&self, node: NodeIndex) -> Option<NodeIndex> {
        self.parents[node]
    }

    /// Returns whether `node` is a leaf.
    pub fn is_leaf(&self, node: NodeIndex) -> bool {
        self.is_leaf[node]
    }
}

impl std::ops::Index<NodeIndex> for Layout {
    type Output = Point;

    fn index(&self, index: NodeIndex) -> &Self::Output {
        &self.positions[index]
    }
}
