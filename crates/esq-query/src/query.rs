//! The translated query root.

use std::{fmt, mem};

use crate::{
    ast::QueryNode,
    document::{Pagination, QueryDocument},
    error::QueryError,
};

/// A translated query: the root node plus document-level pagination.
///
/// After parsing the root is always a conjunction of the query groups. Callers may append
/// further clauses (for example a tenant filter) before evaluating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Root query node.
    root: QueryNode,
    /// Pagination emitted at the document root.
    pagination: Pagination,
}

impl SearchQuery {
    /// Creates a query with default pagination.
    pub fn new(root: QueryNode) -> Self {
        Self {
            root,
            pagination: Pagination::default(),
        }
    }

    /// Replaces the pagination.
    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = pagination;
        self
    }

    /// The root node.
    pub fn root(&self) -> &QueryNode {
        &self.root
    }

    /// The pagination emitted with the document.
    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    /// Adds a clause that must match.
    ///
    /// Appends to the root conjunction. Any other root is first wrapped in a new conjunction
    /// together with `node`, so the existing clause is kept.
    pub fn add_must_condition(&mut self, node: QueryNode) {
        match &mut self.root {
            QueryNode::Conjunction(clauses) => clauses.push(node),
            _ => self.promote(QueryNode::Conjunction, node),
        }
    }

    /// Adds a clause of which at least one must match.
    ///
    /// Appends to a root disjunction. Any other root is first wrapped in a new disjunction
    /// together with `node`.
    pub fn add_should_condition(&mut self, node: QueryNode) {
        match &mut self.root {
            QueryNode::Disjunction(clauses) => clauses.push(node),
            _ => self.promote(QueryNode::Disjunction, node),
        }
    }

    /// Replaces the root with `container([root, node])`.
    fn promote(&mut self, container: fn(Vec<QueryNode>) -> QueryNode, node: QueryNode) {
        let current = mem::replace(&mut self.root, QueryNode::Conjunction(Vec::new()));
        self.root = container(vec![current, node]);
    }

    /// Evaluates the query into a document.
    pub fn eval(&self) -> Result<QueryDocument, QueryError> {
        Ok(QueryDocument {
            from: self.pagination.from,
            size: self.pagination.size,
            query: self.root.eval()?,
        })
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "SearchQuery(from={}, size={})",
            self.pagination.from, self.pagination.size
        )?;
        for line in self.root.to_string().lines() {
            writeln!(f, "  {line}")?;
        }
        Ok(())
    }
}
