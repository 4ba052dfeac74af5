//! The query document produced by evaluation.
//!
//! The types serialize to the search engine's bool/terms JSON shape:
//!
//! ```json
//! {
//!   "from": 0,
//!   "size": 50,
//!   "query": { "bool": { "must": [ { "terms": { "title": ["rust"] } } ] } }
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Pagination applied at the document root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Offset of the first hit.
    pub from: usize,
    /// Maximum number of hits.
    pub size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self { from: 0, size: 50 }
    }
}

/// A complete query document, ready for serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryDocument {
    /// Offset of the first hit.
    pub from: usize,
    /// Maximum number of hits.
    pub size: usize,
    /// The query clause.
    pub query: Clause,
}

impl QueryDocument {
    /// Serializes the document as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Serializes the document as single-line JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// A single query clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Clause {
    /// `{"terms": {field: [values]}}`: the field contains any of the values.
    Terms(BTreeMap<String, Vec<String>>),
    /// `{"bool": {...}}`: a boolean combination of clauses.
    Bool(BoolClause),
}

/// The body of a `bool` clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoolClause {
    /// Every clause must match.
    Must(Vec<Clause>),
    /// At least one clause must match.
    Should(Vec<Clause>),
}

impl Clause {
    /// Creates a terms clause for a single field.
    pub fn terms(field: impl Into<String>, values: Vec<String>) -> Self {
        Self::Terms(BTreeMap::from([(field.into(), values)]))
    }
}
