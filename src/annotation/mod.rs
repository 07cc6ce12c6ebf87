//! Per-node styling and decorations, kept next to a [Layout].
//!
//! An [AnnotationStore] records what a renderer should draw on top of the
//! tree: label and line styles, highlighted clades, markers, links between
//! branches, clade labels and free text. Records are keyed by [NodeIndex]
//! and never change coordinates; the `resolved_*` methods combine them with
//! a [Layout] into concrete positions.
//!
//! Nodes are usually addressed by name through a
//! [CladeIndex](crate::clade_index::CladeIndex) first:
//! ```
//! use phylayout::annotation::{AnnotationStore, HighlightStyle};
//! use phylayout::clade_index::CladeIndex;
//! use phylayout::layout::{Layout, LayoutConfig};
//! use phylayout::newick;
//!
//! let tree = newick::parse_str("((A,B),((C,D),(E,(F,G))));").unwrap();
//! let layout = Layout::compute(&tree, LayoutConfig::cladogram()).unwrap();
//! let clade = CladeIndex::new(&tree).resolve(["C", "D"]).unwrap();
//!
//! let mut store = AnnotationStore::new();
//! store.add_highlight(clade.ancestor(), HighlightStyle::new("salmon"));
//!
//! let (rect, _) = store.resolved_highlights(&layout)[0];
//! assert_eq!((rect.y_min, rect.y_max), (1.5, 3.5));
//! ```

pub mod style;

pub use crate::layout::{BranchAnchor, HighlightExtent};
pub use style::{
    ArrowStyle, CladeLabel, Color, FontStyle, HighlightStyle, LabelStyle, LineDash, LineStyle,
    LinkStyle, MarkerShape, MarkerStyle, TextOrientation, TextStyle, VerticalPosition,
};

use crate::layout::{Layout, Point, Rect};
use crate::model::{NodeIndex, PhyloTree};
use std::collections::HashMap;

// =#========================================================================#=
// RECORDS
// =#========================================================================#=
#[derive(Debug, Clone, PartialEq)]
pub struct Highlight {
    pub node: NodeIndex,
    pub style: HighlightStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub node: NodeIndex,
    pub style: MarkerStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub from: NodeIndex,
    pub to: NodeIndex,
    pub style: LinkStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CladeAnnotation {
    pub node: NodeIndex,
    pub label: CladeLabel,
}

/// Where free text is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextPlacement {
    /// Centered on the node
    Node,
    /// Along the incoming branch of the node
    Branch {
        anchor: BranchAnchor,
        vertical: VerticalPosition,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextAnnotation {
    pub node: NodeIndex,
    pub text: String,
    pub placement: TextPlacement,
    pub style: TextStyle,
}

impl TextAnnotation {
    /// Returns the reference point of the text in `layout`.
    pub fn position(&self, layout: &Layout) -> Point {
        match self.placement {
            TextPlacement::Node => layout.position(self.node),
            TextPlacement::Branch { anchor, .. } => layout.branch_anchor(self.node, anchor),
        }
    }
}

// =#========================================================================#=
// RESOLVED RECORDS
// =#========================================================================#=
/// A marker at a concrete position.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMarker<'a> {
    pub node: NodeIndex,
    pub position: Point,
    pub style: &'a MarkerStyle,
}

/// A link between two concrete points.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLink<'a> {
    pub from: Point,
    pub to: Point,
    pub style: &'a LinkStyle,
}

/// A clade bracket: a vertical line at `x` over `y_min..=y_max`.
///
/// `x` is where the leaf labels of the clade start; the renderer adds the
/// width of the label text.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCladeLabel<'a> {
    pub node: NodeIndex,
    pub x: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub label: &'a CladeLabel,
}

// =#========================================================================#=
// ANNOTATION STORE
// =#========================================================================#=
/// Collection of annotation records for one tree.
#[derive(Debug, Clone, Default)]
pub struct AnnotationStore {
    default_label_style: LabelStyle,
    default_line_style: LineStyle,
    label_styles: HashMap<NodeIndex, LabelStyle>,
    line_styles: HashMap<NodeIndex, LineStyle>,
    highlights: Vec<Highlight>,
    markers: Vec<Marker>,
    links: Vec<Link>,
    clade_labels: Vec<CladeAnnotation>,
    texts: Vec<TextAnnotation>,
}

// ============================================================================
// Construction & recording (pub)
// ============================================================================
impl AnnotationStore {
    /// Creates an empty store with default label and line styles.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the label style of nodes without an override.
    pub fn with_default_label_style(mut self, style: LabelStyle) -> Self {
        self.default_label_style = style;
        self
    }

    /// Sets the line style of branches without an override.
    pub fn with_default_line_style(mut self, style: LineStyle) -> Self {
        self.default_line_style = style;
        self
    }

    /// Overrides the label style of `node`.
    pub fn set_label_style(&mut self, node: NodeIndex, style: LabelStyle) {
        self.label_styles.insert(node, style);
    }

    /// Overrides the style of the branch from `node` to its parent, and with
    /// `descendants` also of every branch below `node`.
    pub fn set_line_style(
        &mut self,
        tree: &PhyloTree,
        node: NodeIndex,
        style: LineStyle,
        descendants: bool,
    ) {
        if descendants {
            for descendant in tree.descendants(node) {
                self.line_styles.insert(descendant.index(), style.clone());
            }
        } else {
            self.line_styles.insert(node, style);
        }
    }

    pub fn add_highlight(&mut self, node: NodeIndex, style: HighlightStyle) {
        self.highlights.push(Highlight { node, style });
    }

    pub fn add_marker(&mut self, node: NodeIndex, style: MarkerStyle) {
        self.markers.push(Marker { node, style });
    }

    pub fn add_link(&mut self, from: NodeIndex, to: NodeIndex, style: LinkStyle) {
        self.links.push(Link { from, to, style });
    }

    pub fn add_clade_label(&mut self, node: NodeIndex, label: CladeLabel) {
        self.clade_labels.push(CladeAnnotation { node, label });
    }

    /// Adds text centered on `node`.
    pub fn add_text_on_node(&mut self, node: NodeIndex, text: impl Into<String>, style: TextStyle) {
        self.texts.push(TextAnnotation {
            node,
            text: text.into(),
            placement: TextPlacement::Node,
            style,
        });
    }

    /// Adds text along the incoming branch of `node`.
    pub fn add_text_on_branch(
        &mut self,
        node: NodeIndex,
        text: impl Into<String>,
        anchor: BranchAnchor,
        vertical: VerticalPosition,
        style: TextStyle,
    ) {
        self.texts.push(TextAnnotation {
            node,
            text: text.into(),
            placement: TextPlacement::Branch { anchor, vertical },
            style,
        });
    }
}

// ============================================================================
// Readers (pub)
// ============================================================================
impl AnnotationStore {
    /// Returns the label style of `node`, its override or the default.
    pub fn label_style(&self, node: NodeIndex) -> &LabelStyle {
        self.label_styles
            .get(&node)
            .unwrap_or(&self.default_label_style)
    }

    /// Returns the style of the branch above `node`, its override or the default.
    pub fn line_style(&self, node: NodeIndex) -> &LineStyle {
        self.line_styles
            .get(&node)
            .unwrap_or(&self.default_line_style)
    }

    pub fn highlights(&self) -> &[Highlight] {
        &self.highlights
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn clade_labels(&self) -> &[CladeAnnotation] {
        &self.clade_labels
    }

    pub fn texts(&self) -> &[TextAnnotation] {
        &self.texts
    }

    /// Returns whether no record has been added.
    pub fn is_empty(&self) -> bool {
        self.label_styles.is_empty()
            && self.line_styles.is_empty()
            && self.highlights.is_empty()
            && self.markers.is_empty()
            && self.links.is_empty()
            && self.clade_labels.is_empty()
            && self.texts.is_empty()
    }
}

// ============================================================================
// Resolution against a layout (pub)
// ============================================================================
impl AnnotationStore {
    /// Returns the rectangle of every highlight with its style.
    pub fn resolved_highlights(&self, layout: &Layout) -> Vec<(Rect, &HighlightStyle)> {
        self.highlights
            .iter()
            .map(|h| (layout.highlight_rect(h.node, h.style.extent), &h.style))
            .collect()
    }

    /// Returns one marker per marked node, expanding markers with the
    /// `descendants` flag to the node and all its descendants (pre-order).
    pub fn resolved_markers(&self, tree: &PhyloTree, layout: &Layout) -> Vec<ResolvedMarker<'_>> {
        let mut resolved = Vec::with_capacity(self.markers.len());
        for marker in &self.markers {
            let style = &marker.style;
            if style.descendants {
                resolved.extend(tree.descendants(marker.node).map(|d| ResolvedMarker {
                    node: d.index(),
                    position: layout.marker_position(d.index()),
                    style,
                }));
            } else {
                resolved.push(ResolvedMarker {
                    node: marker.node,
                    position: layout.marker_position(marker.node),
                    style,
                });
            }
        }
        resolved
    }

    /// Returns the end points of every link at their branch anchors.
    pub fn resolved_links(&self, layout: &Layout) -> Vec<ResolvedLink<'_>> {
        self.links
            .iter()
            .map(|link| ResolvedLink {
                from: layout.branch_anchor(link.from, link.style.from_anchor),
                to: layout.branch_anchor(link.to, link.style.to_anchor),
                style: &link.style,
            })
            .collect()
    }

    /// Returns the bracket of every clade label.
    pub fn resolved_clade_labels(&self, layout: &Layout) -> Vec<ResolvedCladeLabel<'_>> {
        self.clade_labels
            .iter()
            .map(|annotation| {
                let (y_min, y_max) = layout.clade_span(annotation.node);
                let x = if annotation.label.align {
                    layout.extent().x_max
                } else {
                    layout
                        .clade_leaves(annotation.node)
                        .iter()
                        .map(|&leaf| layout.label_position(leaf).x)
                        .fold(f64::NEG_INFINITY, f64::max)
                };
                ResolvedCladeLabel {
                    node: annotation.node,
                    x,
                    y_min,
                    y_max,
                    label: &annotation.label,
                }
            })
            .collect()
    }
}

// =#========================================================================#=
// BRANCH VALUE LABELS
// =#========================================================================#=
/// Per-node value shown as text on branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchValue {
    /// Branch length; the root is skipped
    Length,
    /// Confidence (support) value, including the root
    Confidence,
}

/// Text for one branch, positioned at `anchor` of the branch above `node`.
#[derive(Debug, Clone, PartialEq)]
pub struct BranchValueLabel {
    pub node: NodeIndex,
    pub text: String,
    pub anchor: BranchAnchor,
    pub position: Point,
}

/// Formats a branch value: integral values without decimals, others with two.
///
/// ```
/// use phylayout::annotation::format_branch_value;
///
/// assert_eq!(format_branch_value(95.0), "95");
/// assert_eq!(format_branch_value(0.1234), "0.12");
/// ```
pub fn format_branch_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

/// Creates a label for every node carrying the requested `value`, in pre-order.
///
/// Labels sit at the center of the branch. The root has no branch, so its
/// confidence is placed at its right anchor (the node itself).
///
/// # Arguments
/// * `formatter` - Turns a value into text, e.g. [format_branch_value]
pub fn branch_value_labels<F>(
    tree: &PhyloTree,
    layout: &Layout,
    value: BranchValue,
    formatter: F,
) -> Vec<BranchValueLabel>
where
    F: Fn(f64) -> String,
{
    let root = layout.root();
    tree.pre_order_iter()
        .filter_map(|node| {
            let index = node.index();
            let number = match value {
                BranchValue::Length if index == root => None,
                BranchValue::Length => node.branch_length().map(|length| length.value()),
                BranchValue::Confidence => node.confidence(),
            }?;
            let anchor = if index == root {
                BranchAnchor::Right
            } else {
                BranchAnchor::Center
            };
            Some(BranchValueLabel {
                node: index,
                text: formatter(number),
                anchor,
                position: layout.branch_anchor(index, anchor),
            })
        })
        .collect()
}
