//! Character scanner for the query grammar.
//!
//! The grammar is whitespace-sensitive and needs backtracking, so instead of producing a token
//! stream the scanner exposes a cursor that grammar rules can advance, inspect and rewind.

/// Returns true for characters that separate conditions and query groups.
///
/// Only ASCII whitespace and vertical tab count; other Unicode spaces such as U+3000 belong to
/// the surrounding term.
pub fn is_space(ch: char) -> bool {
    ch.is_ascii_whitespace() || ch == '\u{0B}'
}

/// Returns true for characters allowed in field identifiers (`[A-Za-z0-9_.]`).
pub fn is_identifier_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '.'
}

/// Returns true for characters allowed in unquoted conditions.
pub fn is_raw_char(ch: char) -> bool {
    !is_space(ch) && ch != ':'
}

/// Cursor over a query string with byte-offset positions.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    /// The original input string.
    input: &'a str,
    /// Current byte position in input.
    position: usize,
}

impl<'a> Scanner<'a> {
    /// Creates a new scanner at the start of `input`.
    pub fn new(input: &'a str) -> Self {
        Self { input, position: 0 }
    }

    /// Current byte position.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Rewinds (or advances) to a position previously returned by [`Self::position`].
    pub fn reset(&mut self, position: usize) {
        self.position = position;
    }

    /// The unconsumed part of the input.
    pub fn rest(&self) -> &'a str {
        &self.input[self.position..]
    }

    /// Returns true once all input has been consumed.
    pub fn at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Returns the next character without consuming it.
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Consumes and returns the next character.
    pub fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += ch.len_utf8();
        Some(ch)
    }

    /// Consumes `literal` if the input continues with it.
    pub fn eat(&mut self, literal: &str) -> bool {
        if self.rest().starts_with(literal) {
            self.position += literal.len();
            true
        } else {
            false
        }
    }

    /// Consumes the longest run of characters satisfying `pred` and returns it.
    pub fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.position;
        let len = self
            .rest()
            .find(|ch: char| !pred(ch))
            .unwrap_or(self.rest().len());
        self.position += len;
        &self.input[start..self.position]
    }
}
