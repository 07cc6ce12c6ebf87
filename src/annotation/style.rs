//! Style records attached to nodes.
//!
//! Every record is a closed struct with documented defaults. All of them
//! deserialize with missing fields taking their default, so a renderer can
//! load partial styles, e.g. `{"color": "red"}` for a [LineStyle].
//!
//! The values are not interpreted here: colors are passed through as
//! strings, sizes are in the renderer's units.

use crate::layout::{BranchAnchor, HighlightExtent};
use serde::{Deserialize, Serialize};
use std::fmt;

// =#========================================================================#=
// COLOR
// =#========================================================================#=
/// A color understood by the renderer, e.g. `"red"` or `"#1f77b4"`.
///
/// Defaults to `"black"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(String);

impl Color {
    pub fn new(color: impl Into<String>) -> Self {
        Self(color.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new("black")
    }
}

impl From<&str> for Color {
    fn from(color: &str) -> Self {
        Self::new(color)
    }
}

impl From<String> for Color {
    fn from(color: String) -> Self {
        Self(color)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =#========================================================================#=
// ENUMS
// =#========================================================================#=
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
    Bold,
    BoldItalic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineDash {
    #[default]
    Solid,
    Dashed,
    Dotted,
    DashDot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerShape {
    #[default]
    Circle,
    Square,
    Diamond,
    Plus,
    Cross,
    Star,
    TriangleUp,
    TriangleDown,
    TriangleLeft,
    TriangleRight,
}

/// Arrow heads of a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrowStyle {
    /// Plain line
    None,
    /// Head at the target
    #[default]
    Forward,
    /// Head at the source
    Backward,
    /// Heads at both ends
    Both,
}

/// Vertical placement of text relative to a branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerticalPosition {
    /// Above the branch
    #[default]
    Top,
    /// On the branch
    Center,
    /// Below the branch
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextOrientation {
    #[default]
    Horizontal,
    /// Rotated by a quarter turn clockwise
    Vertical,
}

// =#========================================================================#=
// STYLE RECORDS
// =#========================================================================#=
/// Style of a node label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelStyle {
    /// Default `"black"`
    pub color: Color,
    /// Default [FontStyle::Normal]
    pub font_style: FontStyle,
    /// Default `12.0`; a size of zero hides the label
    pub size: f64,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            color: Color::default(),
            font_style: FontStyle::default(),
            size: 12.0,
        }
    }
}

impl LabelStyle {
    pub fn with_color(mut self, color: impl Into<Color>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_font_style(mut self, font_style: FontStyle) -> Self {
        self.font_style = font_style;
        self
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    /// Returns whether the label is drawn at all.
    pub fn is_visible(&self) -> bool {
        self.size > 0.0
    }
}

/// Style of the branch from a node to its parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineStyle {
    /// Default `"black"`
    pub color: Color,
    /// Default `1.0`
    pub width: f64,
    /// Default [LineDash::Solid]
    pub dash: LineDash,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: Color::default(),
            width: 1.0,
            dash: LineDash::default(),
        }
    }
}

impl LineStyle {
    pub fn with_color(mut self, color: impl Into<Color>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    pub fn with_dash(mut self, dash: LineDash) -> Self {
        self.dash = dash;
        self
    }
}

/// Style of a clade highlight rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightStyle {
    /// Default `"lightgrey"`
    pub color: Color,
    /// Opacity in `0..=1`, default `0.5`
    pub alpha: f64,
    /// Default [HighlightExtent::Branch]
    pub extent: HighlightExtent,
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self {
            color: Color::new("lightgrey"),
            alpha: 0.5,
            extent: HighlightExtent::default(),
        }
    }
}

impl HighlightStyle {
    pub fn new(color: impl Into<Color>) -> Self {
        Self {
            color: color.into(),
            ..Self::default()
        }
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_extent(mut self, extent: HighlightExtent) -> Self {
        self.extent = extent;
        self
    }
}

/// Style of a node marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerStyle {
    /// Default [MarkerShape::Circle]
    pub shape: MarkerShape,
    /// Default `"black"`
    pub color: Color,
    /// Default `6.0`
    pub size: f64,
    /// Also mark every descendant of the node, default `false`
    pub descendants: bool,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            shape: MarkerShape::default(),
            color: Color::default(),
            size: 6.0,
            descendants: false,
        }
    }
}

impl MarkerStyle {
    pub fn new(shape: MarkerShape) -> Self {
        Self {
            shape,
            ..Self::default()
        }
    }

    pub fn with_color(mut self, color: impl Into<Color>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    pub fn with_descendants(mut self, descendants: bool) -> Self {
        self.descendants = descendants;
        self
    }
}

/// Style of a link between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkStyle {
    /// Default `"red"`
    pub color: Color,
    /// Default [LineDash::Dashed]
    pub dash: LineDash,
    /// Default [ArrowStyle::Forward]
    pub arrow: ArrowStyle,
    /// Bend of the connecting arc, `0.0` (default) is a straight line;
    /// the sign picks the side
    pub curvature: f64,
    /// Where the link leaves the source branch, default [BranchAnchor::Center]
    pub from_anchor: BranchAnchor,
    /// Where the link enters the target branch, default [BranchAnchor::Center]
    pub to_anchor: BranchAnchor,
}

impl Default for LinkStyle {
    fn default() -> Self {
        Self {
            color: Color::new("red"),
            dash: LineDash::Dashed,
            arrow: ArrowStyle::default(),
            curvature: 0.0,
            from_anchor: BranchAnchor::Center,
            to_anchor: BranchAnchor::Center,
        }
    }
}

impl LinkStyle {
    pub fn with_color(mut self, color: impl Into<Color>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_arrow(mut self, arrow: ArrowStyle) -> Self {
        self.arrow = arrow;
        self
    }

    pub fn with_curvature(mut self, curvature: f64) -> Self {
        self.curvature = curvature;
        self
    }

    pub fn with_anchors(mut self, from_anchor: BranchAnchor, to_anchor: BranchAnchor) -> Self {
        self.from_anchor = from_anchor;
        self.to_anchor = to_anchor;
        self
    }
}

/// Style of free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    /// Default `"black"`
    pub color: Color,
    /// Default `8.0`
    pub size: f64,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            color: Color::default(),
            size: 8.0,
        }
    }
}

/// A bracket with text next to a clade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CladeLabel {
    pub text: String,
    /// Default size `10.0`, black
    pub text_style: TextStyle,
    /// Default [TextOrientation::Horizontal]
    pub orientation: TextOrientation,
    /// Style of the bracket line, default solid black
    pub line: LineStyle,
    /// Place the bracket at the label column of the whole tree instead of
    /// right after the clade, default `false`
    pub align: bool,
}

impl Default for CladeLabel {
    fn default() -> Self {
        Self {
            text: String::new(),
            text_style: TextStyle {
                size: 10.0,
                ..TextStyle::default()
            },
            orientation: TextOrientation::default(),
            line: LineStyle::default(),
            align: false,
        }
    }
}

impl CladeLabel {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_align(mut self, align: bool) -> Self {
        self.align = align;
        self
    }

    pub fn with_orientation(mut self, orientation: TextOrientation) -> Self {
        self.orientation = orientation;
        self
    }
}
