//! Query mini-language parsing and boolean query document generation for esq.
//!
//! The language searches fields of a document index:
//!
//! - **Fields**: `title: rust` - search the `title` field
//! - **Multiple fields**: `title,body: rust` - match in either field
//! - **OR**: `title: rust go` or `title: rust or go` - any of the terms
//! - **AND**: `title: rust and async` - both terms; `and` binds looser than `or`
//! - **Quoting**: `title: "and"`, `title: 'it\'s'` - literal terms
//! - **Groups**: `title: rust tags: async` - space-separated groups are always ANDed
//!
//! A group without a field prefix searches the default fields.
//!
//! Translation runs in three stages: [`parse_syntax`] produces a [`SyntaxTree`], a
//! [`Simplifier`] rewrites it into a [`SearchQuery`] of [`QueryNode`]s, and
//! [`SearchQuery::eval`] produces the [`QueryDocument`].
//!
//! # Example
//!
//! ```
//! use esq_query::QueryParser;
//!
//! let document = QueryParser::new(["title", "body"])
//!     .translate("title: rust async and tokio")
//!     .unwrap();
//! assert_eq!(document.size, 50);
//! ```

#![warn(missing_docs)]

mod ast;
mod document;
mod error;
mod parser;
mod pipeline;
mod query;
mod scanner;
mod simplify;
mod syntax;

pub use ast::{QueryNode, TermMatch, distribute};
pub use document::{BoolClause, Clause, Pagination, QueryDocument};
pub use error::{ContractViolation, Expectation, QueryError, SyntaxError};
pub use parser::{expect, parse_syntax};
pub use pipeline::{DEFAULT_FIELDS, QueryParser};
pub use query::SearchQuery;
pub use simplify::Simplifier;
pub use syntax::{
    AndConditions, Condition, FieldList, FieldName, OrConditions, QueryGroup, Span, SyntaxTree,
};
