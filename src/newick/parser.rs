//! Structs and logic to parse Newick strings.
//!
//! This module provides the [NewickParser] struct, which offers methods
//! to parse single or multiple trees, as well as lazy parsing via a
//! [NewickIterator].

use crate::model::tree_builder::TreeBuilder;
use crate::model::PhyloTreeBuilder;
use crate::newick::defs::{DEFAULT_NUM_NODES_GUESS, NEWICK_LABEL_DELIMITERS};
use crate::parser::byte_parser::ByteParser;
use crate::parser::parsing_error::ParsingError;

// =#========================================================================#=
// NEWICK PARSER
// =#========================================================================#=
/// Parser for single/multiple Newick format phylogenetic trees.
///
/// Generic over [TreeBuilder] (construction). Nodes may have any number of
/// children, which are handed to the builder in input order.
///
/// # Labels
/// * Leaf labels become node names; a missing label gives an unnamed leaf.
/// * Unquoted internal labels that parse as a number become the node's
///   confidence (bootstrap support). All other internal labels, including
///   quoted numbers like `'95'`, become the node's name.
///
/// # Parsing
/// * [`parse_str`](Self::parse_str) - Parse single tree
/// * [`parse_all`](Self::parse_all) - Parse all trees eagerly
/// * [`into_iter`](Self::into_iter) - Parse trees lazily
///
/// # Example
/// ```
/// use phylayout::newick::NewickParser;
/// use phylayout::parser::ByteParser;
///
/// let input = "((A_meleagrides:1.0,A_vulturinum:1.0)95:0.5,N_meleagris:1.5,G_plumifera:1.5);";
/// let mut byte_parser = ByteParser::for_str(input);
/// let mut newick_parser = NewickParser::default();
///
/// let tree = newick_parser.parse_str(&mut byte_parser).unwrap();
/// assert_eq!(tree.num_leaves(), 4);
/// assert_eq!(tree.root().children().len(), 3);
/// ```
#[derive(Debug)]
pub struct NewickParser<T: TreeBuilder> {
    know_num_nodes: bool,
    num_nodes: usize,
    tree_builder: T,
}

// ============================================================================
// Construction & Configuration, Deconstruction (pub)
// ============================================================================
impl<T: TreeBuilder> NewickParser<T> {
    /// Creates a new [NewickParser] with the given tree builder.
    pub fn new(tree_builder: T) -> Self {
        Self {
            know_num_nodes: false,
            num_nodes: DEFAULT_NUM_NODES_GUESS,
            tree_builder,
        }
    }

    /// Sets the expected number of nodes in each parsed tree.
    ///
    /// This allows pre-allocation of data structures.
    /// If not set, the parser counts nodes of the first tree and reuses that.
    pub fn with_num_nodes(mut self, num_nodes: usize) -> Self {
        self.num_nodes = num_nodes;
        self.know_num_nodes = true;
        self
    }

    /// Consumes the parser and returns the tree builder.
    pub fn into_builder(self) -> T {
        self.tree_builder
    }
}

impl NewickParser<PhyloTreeBuilder> {
    /// Creates a new [NewickParser] for [PhyloTree](crate::model::PhyloTree)
    /// with default settings.
    pub fn new_phylo_defaults() -> Self {
        Self::new(PhyloTreeBuilder::new())
    }
}

impl Default for NewickParser<PhyloTreeBuilder> {
    fn default() -> Self {
        Self::new_phylo_defaults()
    }
}

// ============================================================================
// API Parsing (pub)
// ============================================================================
impl<T: TreeBuilder> NewickParser<T> {
    /// Consumes the parser and returns an iterator over trees from the byte parser.
    ///
    /// The parser can be retrieved again via [NewickIterator::into_parser].
    pub fn into_iter(self, byte_parser: ByteParser) -> NewickIterator<T> {
        NewickIterator {
            byte_parser,
            parser: self,
            done: false,
        }
    }

    /// Parses all Newick trees from the byte parser until EOF.
    ///
    /// # Arguments
    /// * `byte_parser` - Input containing only Newick strings,
    ///   except for whitespace and `[...]` comments.
    ///
    /// # Returns
    /// * `Ok(Vec<T::Tree>)` - All parsed trees (possibly none)
    /// * `Err(ParsingError)` - If any tree fails to parse
    pub fn parse_all(&mut self, mut byte_parser: ByteParser) -> Result<Vec<T::Tree>, ParsingError> {
        let mut trees = Vec::new();
        loop {
            byte_parser.skip_comment_and_whitespace()?;
            if byte_parser.is_eof() {
                break;
            }
            trees.push(self.parse_str(&mut byte_parser)?);
        }
        tracing::debug!(target: "phylayout::newick", num_trees = trees.len(), "parsed all trees");
        Ok(trees)
    }

    /// Parses a single Newick tree from the given [ByteParser],
    /// leaving the parser right after the terminating `;`.
    ///
    /// # Returns
    /// * `Ok(T::Tree)` - The parsed phylogenetic tree
    /// * `Err(ParsingError)` - If the Newick format is invalid
    pub fn parse_str(&mut self, parser: &mut ByteParser) -> Result<T::Tree, ParsingError> {
        self.tree_builder.init_next(self.num_nodes);

        // If number of nodes not known yet, reset it to 0,
        // so actual count can now be tracked
        if !self.know_num_nodes {
            self.num_nodes = 0;
        }

        self.parse_root(parser)?;

        // Having parsed a full tree, the number of nodes is now known
        self.know_num_nodes = true;

        tracing::trace!(target: "phylayout::newick", position = parser.position(), "parsed tree");

        self.tree_builder.finish_tree().ok_or_else(|| {
            ParsingError::invalid_newick_string(parser, "Tree builder produced no tree".to_string())
        })
    }
}

// ============================================================================
// Parsing
// ============================================================================
impl<T: TreeBuilder> NewickParser<T> {
    /// Parses the whole tree `node ;` and declares its outermost node as root:
    /// - Skips leading comments and whitespace
    /// - The root may be a single leaf (`A;`)
    /// - The root may carry a label and branch length, both kept
    fn parse_root(&mut self, parser: &mut ByteParser) -> Result<(), ParsingError> {
        parser.skip_comment_and_whitespace()?;
        if parser.is_eof() {
            return Err(ParsingError::empty_input(parser));
        }

        let root_index = self.parse_node(parser)?;

        // Consume the terminating semicolon
        parser.skip_comment_and_whitespace()?;
        if !parser.consume_if(b';') {
            if parser.is_eof() {
                return Err(ParsingError::unexpected_eof(parser));
            }
            let next_char = parser.peek().map(char::from);
            return Err(ParsingError::invalid_newick_string(
                parser,
                format!("Expected ';' at end of tree but found {:?}", next_char),
            ));
        }

        self.tree_builder.set_root(root_index);

        Ok(())
    }

    /// Parses a node with its whole subtree and returns its index:
    /// - `(` opens an internal node, anything else starts a leaf
    /// - Nesting is tracked on an explicit stack of open child lists,
    ///   so arbitrarily deep (e.g. ladder-shaped) trees do not recurse
    fn parse_node(&mut self, parser: &mut ByteParser) -> Result<T::NodeIdx, ParsingError> {
        // Children read so far for every internal node whose `)` is still ahead
        let mut open: Vec<Vec<T::NodeIdx>> = Vec::new();

        loop {
            parser.skip_comment_and_whitespace()?;
            if !self.know_num_nodes {
                self.num_nodes += 1;
            }
            if parser.consume_if(b'(') {
                open.push(Vec::new());
                continue;
            }

            let mut node = self.parse_leaf(parser)?;

            // Attach the finished node and close internal nodes until a sibling follows
            loop {
                let Some(mut children) = open.pop() else {
                    return Ok(node);
                };
                children.push(node);

                parser.skip_comment_and_whitespace()?;
                if parser.consume_if(b',') {
                    open.push(children);
                    break;
                }
                if parser.consume_if(b')') {
                    node = self.finish_internal_node(parser, children)?;
                    continue;
                }
                if parser.is_eof() {
                    return Err(ParsingError::unexpected_eof(parser));
                }
                let next_char = parser.peek().map(char::from);
                return Err(ParsingError::invalid_newick_string(
                    parser,
                    format!("Expected ',' or ')' after child but found {:?}", next_char),
                ));
            }
        }
    }

    /// Completes an internal node after its closing `)`, adds it to tree,
    /// and returns its index:
    /// - `[label][:branch_length]`
    fn finish_internal_node(
        &mut self,
        parser: &mut ByteParser,
        children: Vec<T::NodeIdx>,
    ) -> Result<T::NodeIdx, ParsingError> {
        parser.skip_comment_and_whitespace()?;
        let quoted = parser.peek_is(b'\'');
        let label = parser.parse_label(NEWICK_LABEL_DELIMITERS)?;
        let branch_length = self.parse_branch_length(parser)?;

        let index = self.tree_builder.add_internal(children, branch_length);
        self.add_internal_label(index, label, quoted);

        Ok(index)
    }

    /// Parses leaf node and adds it to tree:
    /// - `[label][:branch_length]`
    /// - Expects parser at start of label
    fn parse_leaf(&mut self, parser: &mut ByteParser) -> Result<T::NodeIdx, ParsingError> {
        let label = parser.parse_label(NEWICK_LABEL_DELIMITERS)?;
        let branch_length = self.parse_branch_length(parser)?;
        let name = if label.is_empty() { None } else { Some(label) };

        Ok(self.tree_builder.add_leaf(name, branch_length))
    }

    /// Hands an internal label to the builder, as confidence if it is an
    /// unquoted number and as name otherwise.
    fn add_internal_label(&mut self, index: T::NodeIdx, label: String, quoted: bool) {
        if label.is_empty() {
            return;
        }
        if quoted {
            self.tree_builder.set_node_name(index, label);
            return;
        }
        match label.parse::<f64>() {
            Ok(confidence) if confidence.is_finite() => {
                self.tree_builder.set_confidence(index, confidence);
            }
            _ => self.tree_builder.set_node_name(index, label),
        }
    }

    /// Parses optional branch length `[:number]`:
    /// - Skips comments/whitespace before and after `:`
    /// - Supports scientific notation (e.g., `1.5e-10`)
    ///
    /// # Returns
    /// - `Ok(Some(branch_length))` if found a non-negative branch length
    /// - `Ok(None)` if no branch length found
    /// - [ParsingError] if the value is not a finite, non-negative number
    fn parse_branch_length(&mut self, parser: &mut ByteParser) -> Result<Option<f64>, ParsingError> {
        // Parse: Whitespace/Comments : Whitespace/Comments
        parser.skip_comment_and_whitespace()?;
        if !parser.consume_if(b':') {
            return Ok(None);
        }
        parser.skip_comment_and_whitespace()?;

        // Find end of branch length substring
        let mut branch_length_str = String::new();
        while let Some(b) = parser.peek() {
            // Valid characters for a float: digits, '.', '-', '+', 'e', 'E'
            if b.is_ascii_digit() || b == b'.' || b == b'-' || b == b'+' || b == b'e' || b == b'E' {
                branch_length_str.push(char::from(b));
                parser.next_byte();
            } else {
                break; // Hit a delimiter like ',', ')', ';', or whitespace
            }
        }

        let value: f64 = match branch_length_str.parse() {
            Ok(value) if f64::is_finite(value) => value,
            _ => return Err(ParsingError::invalid_branch_length(parser, branch_length_str)),
        };
        if value < 0.0 {
            return Err(ParsingError::negative_branch_length(parser, value));
        }

        Ok(Some(value))
    }
}

// =#========================================================================#=
// NEWICK ITERATOR (lazy parser)
// =#========================================================================#=
/// Iterator to parse Newick trees.
///
/// Created by [NewickParser::into_iter()].
/// Yields `Result<T::Tree, ParsingError>` for each tree and stops after the
/// first error.
#[derive(Debug)]
pub struct NewickIterator<T: TreeBuilder> {
    parser: NewickParser<T>,
    byte_parser: ByteParser,
    done: bool,
}

impl<T: TreeBuilder> NewickIterator<T> {
    /// Consumes the iterator and returns the underlying [NewickParser].
    pub fn into_parser(self) -> NewickParser<T> {
        self.parser
    }
}

impl<T: TreeBuilder> Iterator for NewickIterator<T> {
    type Item = Result<T::Tree, ParsingError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        // Skip whitespace and check EOF before each tree
        if let Err(e) = self.byte_parser.skip_comment_and_whitespace() {
            self.done = true;
            return Some(Err(e));
        }
        if self.byte_parser.is_eof() {
            self.done = true;
            return None;
        }

        let result = self.parser.parse_str(&mut self.byte_parser);
        if result.is_err() {
            self.done = true;
        }
        Some(result)
    }
}
