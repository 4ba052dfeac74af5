//! Syntax tree simplification.
//!
//! Rewrites a [`SyntaxTree`] into a [`SearchQuery`] in one bottom-up pass:
//!
//! 1. Conditions and field names become plain strings; quoting is dropped.
//! 2. Each or-group becomes a [`TermMatch`](crate::TermMatch) over its values, field unset.
//! 3. Each query group spreads its or-groups over its fields (or the default fields when it
//!    has no prefix) with [`distribute`].
//! 4. The groups are joined in a root conjunction, whatever their number.

use log::debug;

use crate::{
    ast::{QueryNode, distribute},
    error::{ContractViolation, QueryError},
    query::SearchQuery,
    syntax::{FieldList, OrConditions, QueryGroup, SyntaxTree},
};

/// Converts syntax trees into query ASTs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Simplifier {
    /// Fields used by groups without an explicit `field:` prefix.
    default_fields: Vec<String>,
}

impl Simplifier {
    /// Creates a simplifier that falls back to `default_fields`.
    pub fn new<I, S>(default_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            default_fields: default_fields.into_iter().map(Into::into).collect(),
        }
    }

    /// The fallback fields.
    pub fn default_fields(&self) -> &[String] {
        &self.default_fields
    }

    /// Simplifies a syntax tree into a query with default pagination.
    pub fn simplify(&self, tree: &SyntaxTree) -> Result<SearchQuery, QueryError> {
        if tree.groups.is_empty() {
            return Err(ContractViolation::EmptyNode {
                node: "and_queries",
            }
            .into());
        }

        let groups = tree
            .groups
            .iter()
            .map(|group| self.group(group))
            .collect::<Result<Vec<_>, _>>()?;

        debug!("simplified {} query group(s)", groups.len());
        Ok(SearchQuery::new(QueryNode::Conjunction(groups)))
    }

    /// Simplifies one query group by distributing its conditions over its fields.
    fn group(&self, group: &QueryGroup) -> Result<QueryNode, ContractViolation> {
        if group.conditions.groups.is_empty() {
            return Err(ContractViolation::EmptyNode {
                node: "and_conditions",
            });
        }

        let conditions = group
            .conditions
            .groups
            .iter()
            .map(term_match)
            .collect::<Result<Vec<_>, _>>()?;

        match &group.fields {
            Some(list) => distribute(&field_names(list)?, &conditions),
            None => distribute(&self.default_fields, &conditions),
        }
    }
}

/// Collects the names of a field list.
fn field_names(list: &FieldList) -> Result<Vec<String>, ContractViolation> {
    if list.fields.is_empty() {
        return Err(ContractViolation::EmptyNode { node: "field_list" });
    }
    Ok(list.fields.iter().map(|field| field.name.clone()).collect())
}

/// Turns an or-group into a term match with its field unset.
fn term_match(group: &OrConditions) -> Result<QueryNode, ContractViolation> {
    if group.conditions.is_empty() {
        return Err(ContractViolation::EmptyNode {
            node: "or_conditions",
        });
    }
    Ok(QueryNode::terms(
        group.conditions.iter().map(|condition| condition.text()),
    ))
}
