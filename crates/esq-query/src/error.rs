//! Error types for query parsing and translation.
//!
//! Parsing fails with a [`SyntaxError`] when the input does not match the grammar. A
//! [`ContractViolation`] means the translation rules met a tree they cannot handle, which is a
//! defect rather than a problem with the input.

use std::fmt;

use thiserror::Error;

use crate::{
    parser::{RESERVED_AND, expect, leading_token},
    scanner::is_space,
};

/// A grammar alternative attempted at the furthest failure position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expectation {
    /// What the parser was looking for, e.g. `':'` or `identifier`.
    pub expected: &'static str,
    /// Grammar rules active when the alternative was attempted, outermost first.
    pub rules: Vec<&'static str>,
}

/// The input does not match the query grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    /// Byte position of the furthest point the parser reached.
    pub position: usize,
    /// Alternatives attempted at `position`.
    pub expected: Vec<Expectation>,
    /// The original input string.
    pub input: String,
}

impl SyntaxError {
    /// Creates a syntax error at `position` of `input`.
    pub fn new(position: usize, expected: Vec<Expectation>, input: &str) -> Self {
        Self {
            position,
            expected,
            input: input.to_string(),
        }
    }

    /// Character column of the failure position.
    pub fn column(&self) -> usize {
        self.input
            .get(..self.position)
            .map_or(0, |head| head.chars().count())
    }

    /// The remaining input from the failure position on.
    fn rest(&self) -> &str {
        self.input.get(self.position..).unwrap_or_default()
    }

    /// Describes what the parser found at the failure position.
    pub fn found(&self) -> String {
        match self.rest().chars().next() {
            Some(ch) if is_space(ch) => String::from("whitespace"),
            Some(ch) => format!("{ch:?}"),
            None => String::from("end of input"),
        }
    }

    /// Distinct expected alternatives, in the order they were attempted.
    pub fn alternatives(&self) -> Vec<&'static str> {
        let mut alternatives = Vec::new();
        for expectation in &self.expected {
            if !alternatives.contains(&expectation.expected) {
                alternatives.push(expectation.expected);
            }
        }
        alternatives
    }

    /// Returns the error message without context.
    pub fn message(&self) -> String {
        format!(
            "expected {}, found {}",
            join_alternatives(&self.alternatives()),
            self.found()
        )
    }

    /// Returns a suggestion for common mistakes.
    pub fn suggestion(&self) -> Option<&'static str> {
        let rest = self.rest();
        let attempted = |what: &str| self.expected.iter().any(|e| e.expected == what);

        if self.input.chars().all(is_space) {
            Some("enter at least one search term, e.g. 'title: rust'")
        } else if attempted(expect::RAW_CONDITION) && leading_token(rest) == RESERVED_AND {
            Some("'and' is reserved; quote it (\"and\") to search for the literal word")
        } else if rest.chars().all(is_space) && self.ends_with_and() {
            Some("'and' needs a condition after it; quote it (\"and\") to search for the word")
        } else if self.position == 0 && rest.starts_with(is_space) {
            Some("remove the whitespace before the query")
        } else if attempted(expect::NO_COLON) {
            Some("field names may only contain letters, digits, '_' and '.'")
        } else {
            None
        }
    }

    /// Returns true if the last token before the failure position is a bare `and`.
    fn ends_with_and(&self) -> bool {
        let head = self.input.get(..self.position).unwrap_or_default();
        head.trim_end_matches(is_space).rsplit(is_space).next() == Some(RESERVED_AND)
    }

    /// Renders the attempted alternatives as a tree of grammar rules.
    ///
    /// The first line is the error message; below it every rule path that was active at the
    /// failure position is listed, with the alternatives attempted by its innermost rule.
    pub fn ascii_tree(&self) -> String {
        let mut root = CauseNode::default();
        for expectation in &self.expected {
            root.insert(&expectation.rules, expectation.expected);
        }

        let mut out = format!("{} at column {}\n", self.message(), self.column());
        root.render(&mut out, "");
        out
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "query syntax error: {}", self.message())?;
        writeln!(f, "  {}", self.input)?;
        write!(f, "  {}^", " ".repeat(self.column()))?;
        if let Some(suggestion) = self.suggestion() {
            write!(f, "\nhint: {suggestion}")?;
        }
        Ok(())
    }
}

impl std::error::Error for SyntaxError {}

/// Joins alternatives as `a, b or c`.
fn join_alternatives(alternatives: &[&str]) -> String {
    match alternatives {
        [] => String::from("a valid query"),
        [only] => (*only).to_string(),
        [init @ .., last] => format!("{} or {}", init.join(", "), last),
    }
}

/// One grammar rule in the rendered expectation tree.
#[derive(Default)]
struct CauseNode {
    /// Nested rules, in the order they were first seen.
    children: Vec<(&'static str, Self)>,
    /// Alternatives attempted directly by this rule.
    expected: Vec<&'static str>,
}

impl CauseNode {
    /// Records `expected` under the rule path `rules`.
    fn insert(&mut self, rules: &[&'static str], expected: &'static str) {
        let Some((head, tail)) = rules.split_first() else {
            if !self.expected.contains(&expected) {
                self.expected.push(expected);
            }
            return;
        };

        let index = match self.children.iter().position(|(name, _)| name == head) {
            Some(index) => index,
            None => {
                self.children.push((head, Self::default()));
                self.children.len() - 1
            }
        };
        self.children[index].1.insert(tail, expected);
    }

    /// Appends the children of this node to `out`, one line per rule.
    fn render(&self, out: &mut String, indent: &str) {
        let count = self.children.len();
        for (i, (name, child)) in self.children.iter().enumerate() {
            let (branch, continuation) = if i + 1 == count {
                ("└─ ", "   ")
            } else {
                ("├─ ", "│  ")
            };
            out.push_str(indent);
            out.push_str(branch);
            out.push_str(name);
            if !child.expected.is_empty() {
                out.push_str(": expected ");
                out.push_str(&join_alternatives(&child.expected));
            }
            out.push('\n');
            child.render(out, &format!("{indent}{continuation}"));
        }
    }
}

/// An internal invariant was broken while building or evaluating a query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractViolation {
    /// A term match reached evaluation without a field.
    #[error("term match on {values:?} has no field at evaluation time")]
    UnsetField {
        /// Values of the offending term match.
        values: Vec<String>,
    },

    /// A syntax tree node that the grammar guarantees to be non-empty was empty.
    #[error("syntax tree contains an empty {node} node")]
    EmptyNode {
        /// Label of the empty node.
        node: &'static str,
    },

    /// Field distribution was asked to spread conditions over zero fields.
    #[error("field distribution requires at least one field")]
    NoFields,
}

/// A unified error type for query translation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The input does not match the grammar.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// An internal invariant was broken.
    #[error("internal query error: {0}")]
    Contract(#[from] ContractViolation),
}

impl QueryError {
    /// Returns the error message without context.
    pub fn message(&self) -> String {
        match self {
            Self::Syntax(err) => err.message(),
            Self::Contract(err) => err.to_string(),
        }
    }

    /// Returns a suggestion for common errors.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::Syntax(err) => err.suggestion(),
            Self::Contract(_) => None,
        }
    }

    /// Returns the syntax error, if this is one.
    pub fn as_syntax(&self) -> Option<&SyntaxError> {
        match self {
            Self::Syntax(err) => Some(err),
            Self::Contract(_) => None,
        }
    }
}
