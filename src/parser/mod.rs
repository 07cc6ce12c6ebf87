//! Low-level parsing infrastructure.
//!
//! This module provides the byte-level scanner used by the
//! [Newick reader](crate::newick) together with its error type.

pub mod byte_parser;
pub mod parsing_error;

pub use byte_parser::ByteParser;
pub use parsing_error::{ParsingError, ParsingErrorType};
