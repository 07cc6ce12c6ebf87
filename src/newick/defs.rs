//! Constants for the Newick reader.

/// Newick label delimiters: parentheses, comma, colon, semicolon, whitespace, comment start
pub(crate) const NEWICK_LABEL_DELIMITERS: &[u8] = b"([,:; \n\t\r)]";

/// Default guess for number of nodes, when unknown
pub(crate) const DEFAULT_NUM_NODES_GUESS: usize = 20;
