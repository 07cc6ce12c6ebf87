//! Newick reader for phylogenetic trees.
//!
//! This module provides [`NewickParser`] to parse Newick format strings
//! into tree structures. The parser is generic over a [`TreeBuilder`](crate::model::TreeBuilder),
//! so the same reader can feed any tree representation.
//!
//! # Quick API
//! For simple use cases with default settings:
//! * [`parse_str`] - parses a single string, returns a [`PhyloTree`]
//! * [`parse_all`] - parses all trees of a string
//! * [`parse_file`] - parses all trees of a file
//!
//! # Full API
//! For more control, configure a [`NewickParser`] and provide a [`ByteParser`]:
//! * [`NewickParser::parse_str`] - parse a single tree
//! * [`NewickParser::parse_all`] - parse all trees until EOF
//! * [`NewickParser::into_iter`] - obtain an iterator over trees
//!
//! # Format
//! The Newick format has the following grammar:
//! * `tree ::= node ';'`
//! * `node ::= leaf | internal_node`
//! * `internal_node ::= '(' node (',' node)* ')' [label] [branch_length]`
//! * `leaf ::= [label] [branch_length]`
//! * `branch_length ::= ':' number`
//!
//! Furthermore:
//! * Whitespace can occur between elements,
//!   just not within an unquoted label or a branch_length
//! * Labels may be quoted with single quotes; `''` inside quotes is a literal quote
//! * Comments are square brackets and can occur anywhere where whitespace is allowed;
//!   extended annotations like `[&rate=0.5]` are treated as comments
//! * Unquoted numeric labels of internal nodes are read as confidence values
//! * Branch lengths must be non-negative

mod defs;
mod parser;

pub use self::parser::{NewickIterator, NewickParser};

use crate::model::PhyloTree;
use crate::parser::byte_parser::ByteParser;
use crate::parser::ParsingError;
use std::path::Path;

// ============================================================================
// QUICK PARSING API (pub)
// ============================================================================
/// Parses a single Newick string to obtain a [`PhyloTree`].
///
/// Only whitespace and comments may follow the terminating `;`.
///
/// # Example
/// ```
/// use phylayout::newick::parse_str;
///
/// let tree = parse_str("(Fratercula_cirrhata,(Fratercula_arctica,Fratercula_corniculata));").unwrap();
/// assert_eq!(tree.num_leaves(), 3);
/// ```
pub fn parse_str<S: AsRef<str>>(newick: S) -> Result<PhyloTree, ParsingError> {
    let mut newick_parser = NewickParser::new_phylo_defaults();
    let mut byte_parser = ByteParser::for_str(newick.as_ref());
    let tree = newick_parser.parse_str(&mut byte_parser)?;

    byte_parser.skip_comment_and_whitespace()?;
    if !byte_parser.is_eof() {
        return Err(ParsingError::invalid_newick_string(
            &byte_parser,
            "Unexpected content after end of tree".to_string(),
        ));
    }

    Ok(tree)
}

/// Parses a string containing a semicolon-separated list of Newick trees.
///
/// # Example
/// ```
/// use phylayout::newick::parse_all;
///
/// let trees = parse_all("(A,B);\n[second] ((A,B),C);").unwrap();
/// assert_eq!(trees.len(), 2);
/// ```
pub fn parse_all<S: AsRef<str>>(newick: S) -> Result<Vec<PhyloTree>, ParsingError> {
    let mut newick_parser = NewickParser::new_phylo_defaults();
    newick_parser.parse_all(ByteParser::for_str(newick.as_ref()))
}

/// Parses a file containing a semicolon-separated list of Newick trees.
///
/// # Errors
/// [`ParsingError`] if file reading fails or the Newick format is invalid.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Vec<PhyloTree>, ParsingError> {
    let contents = std::fs::read(path)?;
    let mut newick_parser = NewickParser::new_phylo_defaults();
    newick_parser.parse_all(ByteParser::for_vec(contents))
}
