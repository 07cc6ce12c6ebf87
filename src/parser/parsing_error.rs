//! Error types for the Newick reader.
//!
//! This module provides [ParsingError] and [ParsingErrorType] for representing
//! and reporting errors that occur while reading Newick strings.

use crate::parser::byte_parser::ByteParser;
use std::fmt;

/// Default length of context provided by error from parser
const DEFAULT_CONTEXT_LENGTH: usize = 50;

// =#========================================================================#=
// PARSING ERROR TYPE
// =#========================================================================#=
/// Error types that can occur while reading Newick strings.
#[derive(PartialEq, Debug, Clone)]
pub enum ParsingErrorType {
    IoError(String),
    /// Input contains nothing but whitespace and comments
    EmptyInput,
    UnexpectedEOF,
    UnclosedComment,
    UnclosedQuote,
    InvalidNewickString(String),
    InvalidBranchLength(String),
    NegativeBranchLength(f64),
}

impl fmt::Display for ParsingErrorType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParsingErrorType::IoError(msg) => write!(f, "IO error - {msg}"),
            ParsingErrorType::EmptyInput => write!(f, "Input contains no tree"),
            ParsingErrorType::UnexpectedEOF => write!(f, "Unexpected end of input"),
            ParsingErrorType::UnclosedComment => write!(f, "Unclosed comment"),
            ParsingErrorType::UnclosedQuote => write!(f, "Unclosed quoted label"),
            ParsingErrorType::InvalidNewickString(msg) => {
                write!(f, "Invalid newick string: {msg}")
            }
            ParsingErrorType::InvalidBranchLength(value) => {
                write!(f, "Invalid branch length: {value}")
            }
            ParsingErrorType::NegativeBranchLength(value) => {
                write!(f, "Negative branch length: {value}")
            }
        }
    }
}

// =#========================================================================#=
// PARSING ERROR
// =#========================================================================#=
/// Parsing error with contextual information (position and upcoming bytes).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{kind} at position {position}{}", format_context(.context))]
pub struct ParsingError {
    kind: ParsingErrorType,
    position: usize,
    context: String,
}

fn format_context(context: &str) -> String {
    if context.is_empty() {
        String::new()
    } else {
        format!("\n  Context (next {} bytes): {}", context.len(), context)
    }
}

impl ParsingError {
    /// Create a ParsingError from an error type and parser state
    pub fn from_parser(kind: ParsingErrorType, parser: &ByteParser) -> Self {
        Self {
            kind,
            position: parser.position(),
            context: parser.get_context_as_string(DEFAULT_CONTEXT_LENGTH),
        }
    }

    /// Convenience constructor for EmptyInput
    pub fn empty_input(parser: &ByteParser) -> Self {
        Self::from_parser(ParsingErrorType::EmptyInput, parser)
    }

    /// Convenience constructor for UnexpectedEOF
    pub fn unexpected_eof(parser: &ByteParser) -> Self {
        Self::from_parser(ParsingErrorType::UnexpectedEOF, parser)
    }

    /// Convenience constructor for UnclosedComment
    pub fn unclosed_comment(parser: &ByteParser) -> Self {
        Self::from_parser(ParsingErrorType::UnclosedComment, parser)
    }

    /// Convenience constructor for UnclosedQuote
    pub fn unclosed_quote(parser: &ByteParser) -> Self {
        Self::from_parser(ParsingErrorType::UnclosedQuote, parser)
    }

    /// Convenience constructor for InvalidNewickString
    pub fn invalid_newick_string(parser: &ByteParser, msg: String) -> Self {
        Self::from_parser(ParsingErrorType::InvalidNewickString(msg), parser)
    }

    /// Convenience constructor for InvalidBranchLength
    pub fn invalid_branch_length(parser: &ByteParser, value: String) -> Self {
        Self::from_parser(ParsingErrorType::InvalidBranchLength(value), parser)
    }

    /// Convenience constructor for NegativeBranchLength
    pub fn negative_branch_length(parser: &ByteParser, value: f64) -> Self {
        Self::from_parser(ParsingErrorType::NegativeBranchLength(value), parser)
    }

    /// Create a ParsingError without parser context
    pub fn without_context(kind: ParsingErrorType) -> Self {
        Self {
            kind,
            position: 0,
            context: String::new(),
        }
    }

    /// Get the error kind
    pub fn kind(&self) -> &ParsingErrorType {
        &self.kind
    }

    /// Get the position where the error occurred
    pub fn position(&self) -> usize {
        self.position
    }

    /// Get the input following the error position
    pub fn context(&self) -> &str {
        &self.context
    }
}

impl From<std::io::Error> for ParsingError {
    fn from(err: std::io::Error) -> Self {
        Self::without_context(ParsingErrorType::IoError(err.to_string()))
    }
}
