//! Phylayout is a library to lay out rooted phylogenetic trees as
//! rectangular phylograms and cladograms.
//!
//! This crate computes render-ready coordinates and geometry; drawing the
//! result is left to a renderer. Core functionality provided:
//! - Tree model: [PhyloTree] uses the arena pattern, so nodes are referenced
//!   by [NodeIndex] only. Nodes may have any number of ordered children and
//!   optional name, branch length and confidence. See [crate::model].
//! - Newick reader: multifurcating trees, quoted labels, comments, internal
//!   labels and confidence values. Any [TreeBuilder](model::TreeBuilder)
//!   can be fed. See [crate::newick].
//! - Layout: [Layout::compute] places leaves on consecutive rows and
//!   ancestors at the mean of their children; x follows cumulative branch
//!   length or unit steps per edge. See [crate::layout].
//! - Geometry: clade spans and bounds, branch anchors, highlight rectangles,
//!   branch segments and plot extent as pure queries on a [Layout].
//! - Clade index: [CladeIndex] resolves leaf names to their most recent
//!   common ancestor.
//! - Annotations: [AnnotationStore] keeps styles, highlights, markers, links
//!   and texts per node next to the layout.
//!
//! Limitations:
//! - Only rectangular layouts of rooted trees
//! - Text metrics, figure sizes and output formats belong to the renderer
//!
//! # Usage
//! ```
//! use phylayout::{CladeIndex, Layout, LayoutConfig};
//!
//! let tree = phylayout::parse_newick_str("((A:1,B:2):1,(C:0.5,D:1.5):2);").unwrap();
//! let layout = Layout::compute(&tree, LayoutConfig::default().with_aligned_labels(true)).unwrap();
//!
//! let clade = CladeIndex::new(&tree).resolve(["A", "B"]).unwrap();
//! assert!(clade.is_exact());
//! assert_eq!(layout.position(clade.ancestor()).x, 1.0);
//! assert_eq!(layout.max_leaf_x(), 3.5);
//!
//! // Aligned labels all start in the column of the rightmost leaf
//! let a = clade.leaves()[0];
//! assert_eq!(layout.label_position(a).x, 3.5);
//! ```
//!
//! # Logging
//! The crate emits [tracing] events (`debug` per layout and index, `trace`
//! per tree and clade) but installs no subscriber.

pub mod annotation;
pub mod clade_index;
pub mod error;
pub mod layout;
pub mod model;
pub mod newick;
pub mod parser;

pub use annotation::AnnotationStore;
pub use clade_index::{CladeEntry, CladeIndex, NameMatching};
pub use error::LayoutError;
pub use layout::{Layout, LayoutConfig, Point, Rect};
pub use model::{NodeIndex, PhyloTree};

use crate::parser::parsing_error::ParsingError;
use std::path::Path;

// ============================================================================
// Quick Newick API
// ============================================================================
/// Parse a Newick string using default settings, returning a [PhyloTree].
///
/// See [`newick::parse_str`] for full documentation of this convenience function.
pub fn parse_newick_str<S: AsRef<str>>(newick: S) -> Result<PhyloTree, ParsingError> {
    newick::parse_str(newick)
}

/// Parse a file containing a semicolon-separated list of Newick strings
/// using default settings, returning a vector of [PhyloTree].
///
/// See [`newick::parse_file`] for full documentation of this convenience function.
pub fn parse_newick_file<P: AsRef<Path>>(path: P) -> Result<Vec<PhyloTree>, ParsingError> {
    newick::parse_file(path)
}
