//! Geometry derived from a [Layout].
//!
//! All queries are pure reads of the layout: they take `&self`, allocate
//! at most their return value and never change coordinates. Node indices
//! out of bounds panic like slice indexing.
//!
//! Leaves occupy unit-high rows, so clade rectangles and the plot
//! [extent](Layout::extent) are padded by half a row above and below.

use crate::layout::Layout;
use crate::model::NodeIndex;
use serde::{Deserialize, Serialize};

/// Vertical padding around the leaf rows of a clade.
const ROW_PADDING: f64 = 0.5;

// =#========================================================================#=
// POINT & RECT
// =#========================================================================#=
/// A position in layout coordinates.
///
/// x grows from the root towards the leaves, y grows with leaf slot.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// The origin `(0, 0)`, position of every root.
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the point halfway between `self` and `other`.
    pub fn midpoint(&self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}

/// Axis-aligned rectangle in layout coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Rect {
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Returns whether `point` lies inside or on the border.
    pub fn contains(&self, point: Point) -> bool {
        (self.x_min..=self.x_max).contains(&point.x) && (self.y_min..=self.y_max).contains(&point.y)
    }
}

// =#========================================================================#=
// ANCHORS, EXTENTS, SEGMENTS
// =#========================================================================#=
/// Position along the incoming branch of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BranchAnchor {
    /// Start of the branch, at the parent's x
    Left,
    /// Midpoint of the branch
    #[default]
    Center,
    /// End of the branch, at the node itself
    Right,
}

/// Horizontal reach of a clade highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightExtent {
    /// Up to the deepest descendant (or the aligned label column)
    #[default]
    Branch,
    /// Up to the right edge of the plot
    Full,
}

/// Kind of a line segment drawn for a branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    /// At the parent's x, from the parent's y to the child's y
    Vertical,
    /// At the child's y, from the parent's x to the child's x
    Horizontal,
    /// From an aligned leaf to the label column, usually drawn dashed
    AlignConnector,
}

/// A straight line segment belonging to the branch above `node`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchSegment {
    pub node: NodeIndex,
    pub kind: SegmentKind,
    pub start: Point,
    pub end: Point,
}

// =#========================================================================#=
// QUERIES
// =#========================================================================#=
impl Layout {
    /// Returns the leaves below `node` in ascending y (the leaf itself for a leaf).
    pub fn clade_leaves(&self, node: NodeIndex) -> &[NodeIndex] {
        let (first, last) = self.leaf_spans[node];
        &self.leaf_order[first..=last]
    }

    /// Returns `(y_min, y_max)` over the leaves below `node`.
    pub fn clade_span(&self, node: NodeIndex) -> (f64, f64) {
        let (first, last) = self.leaf_spans[node];
        (self.positions[self.leaf_order[first]].y, self.positions[self.leaf_order[last]].y)
    }

    /// Returns the box around the clade of `node`.
    ///
    /// x reaches from the node to its deepest descendant, or to the label
    /// column when leaf labels are aligned. y is the [clade span](Self::clade_span).
    pub fn clade_bounds(&self, node: NodeIndex) -> Rect {
        let (y_min, y_max) = self.clade_span(node);
        let x_max = if self.config.align_leaf_labels {
            self.max_leaf_x
        } else {
            self.max_x_below[node]
        };
        Rect::new(self.positions[node].x, x_max, y_min, y_max)
    }

    /// Returns the positions from `node` up to the root (node first, root last).
    pub fn path_to_root(&self, node: NodeIndex) -> Vec<Point> {
        let mut path = vec![self.positions[node]];
        let mut current = node;
        while let Some(parent) = self.parents[current] {
            path.push(self.positions[parent]);
            current = parent;
        }
        path
    }

    /// Returns the x at which the label of `node` starts.
    ///
    /// Aligned leaves use the label column at [max_leaf_x](Self::max_leaf_x),
    /// everything else its own x.
    pub fn label_x(&self, node: NodeIndex, align: bool) -> f64 {
        if align && self.is_leaf[node] {
            self.max_leaf_x
        } else {
            self.positions[node].x
        }
    }

    /// Returns the label position of `node` using the configured alignment.
    pub fn label_position(&self, node: NodeIndex) -> Point {
        Point::new(
            self.label_x(node, self.config.align_leaf_labels),
            self.positions[node].y,
        )
    }

    /// Returns the point at `anchor` on the incoming branch of `node`.
    ///
    /// The root has no incoming branch, so all anchors give its own position.
    pub fn branch_anchor(&self, node: NodeIndex, anchor: BranchAnchor) -> Point {
        let position = self.positions[node];
        let Some(parent) = self.parents[node] else {
            return position;
        };
        let parent_x = self.positions[parent].x;
        match anchor {
            BranchAnchor::Left => Point::new(parent_x, position.y),
            BranchAnchor::Center => Point::new((parent_x + position.x) / 2.0, position.y),
            BranchAnchor::Right => position,
        }
    }

    /// Returns the highlight rectangle of the clade of `node`.
    ///
    /// Starts at the midpoint of the incoming branch and covers the leaf
    /// rows with half a row of padding.
    pub fn highlight_rect(&self, node: NodeIndex, extent: HighlightExtent) -> Rect {
        let bounds = self.clade_bounds(node);
        let x_min = self.branch_anchor(node, BranchAnchor::Center).x;
        let x_max = match extent {
            HighlightExtent::Branch => bounds.x_max,
            HighlightExtent::Full => self.extent().x_max,
        };
        Rect::new(
            x_min,
            x_max,
            bounds.y_min - ROW_PADDING,
            bounds.y_max + ROW_PADDING,
        )
    }

    /// Returns the line segments of all branches.
    ///
    /// Every non-root node contributes a vertical and a horizontal segment,
    /// aligned leaves additionally an [AlignConnector](SegmentKind::AlignConnector).
    pub fn branch_segments(&self) -> Vec<BranchSegment> {
        let mut segments = Vec::with_capacity(2 * self.num_nodes() + self.num_leaves());
        for (node, parent) in self.parents.iter().enumerate() {
            let Some(parent) = *parent else {
                continue;
            };
            let from = self.positions[parent];
            let to = self.positions[node];
            let corner = Point::new(from.x, to.y);

            segments.push(BranchSegment {
                node,
                kind: SegmentKind::Vertical,
                start: from,
                end: corner,
            });
            segments.push(BranchSegment {
                node,
                kind: SegmentKind::Horizontal,
                start: corner,
                end: to,
            });
            if self.config.align_leaf_labels && self.is_leaf[node] {
                segments.push(BranchSegment {
                    node,
                    kind: SegmentKind::AlignConnector,
                    start: to,
                    end: Point::new(self.max_leaf_x, to.y),
                });
            }
        }
        segments
    }

    /// Returns the bounding box of the plot: x over `0..=max_leaf_x`,
    /// y over all leaf rows with half a row of padding.
    pub fn extent(&self) -> Rect {
        Rect::new(
            0.0,
            self.max_leaf_x,
            -ROW_PADDING,
            self.num_leaves() as f64 - ROW_PADDING,
        )
    }

    /// Returns where a marker on `node` is drawn: its own position, with
    /// leaves moved to the label column when aligned.
    pub fn marker_position(&self, node: NodeIndex) -> Point {
        self.label_position(node)
    }
}
