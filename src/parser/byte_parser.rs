//! Low-level byte-by-byte parser for ASCII text.
//!
//! This module provides [ByteParser] for reading text-based tree formats with
//! support for peeking, consuming, comment skipping and quote-aware label
//! parsing. Used as the foundation of the Newick reader.

use crate::parser::parsing_error::ParsingError;

// =#========================================================================#=
// BYTE PARSER
// =#========================================================================#=
/// A byte-by-byte parser over an in-memory input.
///
/// # Features
/// - Whitespace and `[...]` comment skipping
/// - Quote-aware label parsing (single quotes, `''` escapes)
/// - Context extraction for error reporting
///
/// # Example
/// ```
/// use phylayout::parser::byte_parser::{ByteParser, ConsumeMode};
///
/// let mut parser = ByteParser::for_str("  [comment] ('Wilson''s storm-petrel',B);");
/// parser.skip_comment_and_whitespace().unwrap();
/// assert!(parser.consume_if(b'('));
/// assert_eq!(parser.parse_label(b",").unwrap(), "Wilson's storm-petrel");
///
/// parser.consume_until(b';', ConsumeMode::Exclusive);
/// assert_eq!(parser.peek(), Some(b';'));
/// ```
#[derive(Debug, Clone)]
pub struct ByteParser {
    data: Vec<u8>,
    position: usize,
}

impl ByteParser {
    /// Creates a new `ByteParser` from a byte slice by copying it into a Vec.
    pub fn for_bytes(input: &[u8]) -> Self {
        Self::for_vec(input.to_vec())
    }

    /// Creates a new `ByteParser` from a string slice by copying it into a Vec.
    pub fn for_str(input: &str) -> Self {
        Self::for_vec(input.as_bytes().to_vec())
    }

    /// Creates a new `ByteParser` taking ownership of `data`.
    pub fn for_vec(data: Vec<u8>) -> Self {
        Self { data, position: 0 }
    }

    /// Peeks at the current byte without consuming it.
    ///
    /// # Returns
    /// * `Some(u8)` - The current byte if available
    /// * `None` - If at end of data (EOF)
    #[inline(always)]
    pub fn peek(&self) -> Option<u8> {
        self.data.get(self.position).copied()
    }

    /// Gets the current byte and advances the position (consumes it).
    ///
    /// # Returns
    /// * `Some(u8)` - The current byte if available
    /// * `None` - If at end of data (EOF)
    #[inline(always)]
    pub fn next_byte(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.position += 1;
        Some(byte)
    }

    /// Skips (consumes) all consecutive whitespace characters.
    ///
    /// Whitespace includes: space (' '), tab ('\t'), newline ('\n'), and carriage return ('\r').
    pub fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek() {
            if b == b' ' || b == b'\t' || b == b'\n' || b == b'\r' {
                self.position += 1;
            } else {
                break;
            }
        }
    }

    /// Skips (consumes) a comment `[...]` if present.
    ///
    /// # Returns
    /// * `Ok(true)` - A comment was found and consumed
    /// * `Ok(false)` - No comment at current position
    /// * `Err(ParsingError)` - Comment was opened but never closed
    pub fn skip_comment(&mut self) -> Result<bool, ParsingError> {
        if self.consume_if(b'[') {
            if !self.consume_until(b']', ConsumeMode::Inclusive) {
                return Err(ParsingError::unclosed_comment(self));
            }
            return Ok(true);
        }

        Ok(false)
    }

    /// Skips (consumes) all consecutive whitespace and comments.
    ///
    /// # Errors
    /// Returns an error if an unclosed comment is encountered.
    pub fn skip_comment_and_whitespace(&mut self) -> Result<(), ParsingError> {
        self.skip_whitespace();

        while self.skip_comment()? {
            self.skip_whitespace();
        }

        Ok(())
    }

    /// Checks if the current byte equals `ch`.
    pub fn peek_is(&self, ch: u8) -> bool {
        self.peek() == Some(ch)
    }

    /// Consumes the current byte if it equals `ch`.
    ///
    /// # Returns
    /// `true` if the byte was matched and consumed, `false` otherwise
    pub fn consume_if(&mut self, ch: u8) -> bool {
        if self.peek_is(ch) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    /// Consumes bytes until the target byte is found.
    ///
    /// # Arguments
    /// * `target` - The byte to search for
    /// * `mode` - Whether to consume the target byte (`Inclusive`) or stop before it (`Exclusive`)
    ///
    /// # Returns
    /// `true` if the target was found, `false` if EOF was reached first
    pub fn consume_until(&mut self, target: u8, mode: ConsumeMode) -> bool {
        while let Some(b) = self.peek() {
            if b == target {
                if mode == ConsumeMode::Inclusive {
                    self.position += 1;
                }
                return true;
            }
            self.position += 1;
        }
        false
    }

    /// Returns whether the end of data (EOF) has been reached.
    pub fn is_eof(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Returns the current byte offset in the input.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns up to `k` bytes from the current position for error context.
    pub fn get_context(&self, k: usize) -> &[u8] {
        let start = self.position.min(self.data.len());
        let end = (start + k).min(self.data.len());
        &self.data[start..end]
    }

    /// Returns a string from up to `k` bytes from the current position for error context.
    ///
    /// Invalid UTF-8 sequences are replaced with the Unicode replacement character.
    pub fn get_context_as_string(&self, k: usize) -> String {
        String::from_utf8_lossy(self.get_context(k)).into_owned()
    }

    /// Parses a label (quoted or unquoted) with the given delimiter set.
    ///
    /// Leading whitespace and comments are skipped. Returns an empty string
    /// if a delimiter follows immediately.
    ///
    /// # Errors
    /// Returns an error if a comment or quoted label is not closed.
    pub fn parse_label(&mut self, delimiters: &[u8]) -> Result<String, ParsingError> {
        self.skip_comment_and_whitespace()?;

        if self.peek() == Some(b'\'') {
            self.parse_quoted_label()
        } else {
            Ok(self.parse_unquoted_label(delimiters))
        }
    }

    /// Parses a quoted label enclosed in single quotes with escape support.
    ///
    /// Assumes the opening quote has not been consumed yet. Single quotes within
    /// the label are escaped by doubling them (e.g., `'Wilson''s'` becomes `Wilson's`).
    ///
    /// # Errors
    /// Returns an error if the closing quote is missing.
    pub fn parse_quoted_label(&mut self) -> Result<String, ParsingError> {
        self.position += 1; // consume opening '

        let mut label = Vec::new();
        loop {
            match self.next_byte() {
                Some(b'\'') => {
                    // Doubled quote is an escaped quote, single one closes
                    if self.consume_if(b'\'') {
                        label.push(b'\'');
                    } else {
                        break;
                    }
                }
                Some(b) => label.push(b),
                None => return Err(ParsingError::unclosed_quote(self)),
            }
        }

        Ok(String::from_utf8_lossy(&label).into_owned())
    }

    /// Parses an unquoted label until any of the given delimiters or EOF is encountered.
    pub fn parse_unquoted_label(&mut self, delimiters: &[u8]) -> String {
        let start = self.position;
        while let Some(b) = self.peek() {
            if delimiters.contains(&b) {
                break;
            }
            self.position += 1;
        }

        String::from_utf8_lossy(&self.data[start..self.position]).into_owned()
    }
}

/// Specifies whether to consume or leave the target when using `consume_until`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ConsumeMode {
    /// Consume the target byte along with everything before it.
    Inclusive,

    /// Stop before the target byte without consuming it.
    Exclusive,
}
