//! Concrete syntax tree.
//!
//! The tree mirrors the grammar one node per labeled rule. Every repetition is stored as a
//! vector which the parser guarantees to be non-empty; the simplifier still checks this and
//! reports a contract violation instead of producing a partial query.

use std::{fmt, ops::Range};

/// Byte range of a node in the input.
pub type Span = Range<usize>;

/// The whole input: space-separated query groups (`and_queries`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxTree {
    /// Query groups, in input order.
    pub groups: Vec<QueryGroup>,
    /// Location in the input.
    pub span: Span,
}

/// One query group: an optional field prefix and its conditions (`and_query`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryGroup {
    /// Explicit `field,field:` prefix, if any.
    pub fields: Option<FieldList>,
    /// Conditions of the group.
    pub conditions: AndConditions,
    /// Location in the input.
    pub span: Span,
}

/// Comma-separated field names before a colon (`field_list`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldList {
    /// Field names, in input order.
    pub fields: Vec<FieldName>,
    /// Location in the input.
    pub span: Span,
}

/// A single field identifier (`field`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldName {
    /// The identifier.
    pub name: String,
    /// Location in the input.
    pub span: Span,
}

/// Or-groups joined by the keyword `and` (`and_conditions`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AndConditions {
    /// The or-groups, in input order.
    pub groups: Vec<OrConditions>,
    /// Location in the input.
    pub span: Span,
}

/// Conditions joined by whitespace or the keyword `or` (`or_conditions`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrConditions {
    /// The conditions, in input order.
    pub conditions: Vec<Condition>,
    /// Location in the input.
    pub span: Span,
}

/// A literal search term (`condition`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// An unquoted token.
    Raw {
        /// The token text.
        text: String,
        /// Location in the input.
        span: Span,
    },
    /// A quoted string (`str`), with escapes already resolved.
    Quoted {
        /// The string content without quotes.
        text: String,
        /// The quote character used, `"` or `'`.
        quote: char,
        /// Location in the input, including the quotes.
        span: Span,
    },
}

impl Condition {
    /// The search term, whether it was quoted or not.
    pub fn text(&self) -> &str {
        match self {
            Self::Raw { text, .. } | Self::Quoted { text, .. } => text,
        }
    }

    /// Location in the input.
    pub fn span(&self) -> &Span {
        match self {
            Self::Raw { span, .. } | Self::Quoted { span, .. } => span,
        }
    }
}

impl SyntaxTree {
    /// Formats the tree with one labeled node per line.
    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "and_queries {:?}", self.span)?;
        for group in &self.groups {
            writeln!(f, "  and_query {:?}", group.span)?;
            if let Some(list) = &group.fields {
                writeln!(f, "    field_list {:?}", list.span)?;
                for field in &list.fields {
                    writeln!(f, "      field {:?} {:?}", field.name, field.span)?;
                }
            }
            writeln!(f, "    and_conditions {:?}", group.conditions.span)?;
            for or_group in &group.conditions.groups {
                writeln!(f, "      or_conditions {:?}", or_group.span)?;
                for condition in &or_group.conditions {
                    match condition {
                        Condition::Raw { text, span } => {
                            writeln!(f, "        condition {text:?} {span:?}")?;
                        }
                        Condition::Quoted { text, quote, span } => {
                            writeln!(f, "        condition str({quote}) {text:?} {span:?}")?;
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f)
    }
}
