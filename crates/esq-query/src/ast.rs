//! Query abstract syntax tree.
//!
//! A closed set of boolean query nodes built by the simplifier and evaluated into a
//! [`Clause`].

use std::fmt;

use crate::{
    document::{BoolClause, Clause},
    error::{ContractViolation, QueryError},
};

/// Matches when `field` contains any of `values`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermMatch {
    /// The field to match; assigned by field distribution before evaluation.
    pub field: Option<String>,
    /// Accepted values.
    pub values: Vec<String>,
}

/// A query node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryNode {
    /// A terms match on one field.
    TermMatch(TermMatch),

    /// Conjunction: all clauses must match.
    Conjunction(Vec<Self>),

    /// Disjunction: at least one clause must match.
    Disjunction(Vec<Self>),
}

impl QueryNode {
    /// Creates a term match whose field is not yet known.
    pub fn terms<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::TermMatch(TermMatch {
            field: None,
            values: values.into_iter().map(Into::into).collect(),
        })
    }

    /// Creates a term match on `field`.
    pub fn field_terms<I, S>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::TermMatch(TermMatch {
            field: Some(field.into()),
            values: values.into_iter().map(Into::into).collect(),
        })
    }

    /// Returns a copy of this node with every term match assigned to `field`.
    ///
    /// The original is left untouched, so one condition can be spread across several fields
    /// without the copies sharing a term match.
    pub fn with_field(&self, field: &str) -> Self {
        match self {
            Self::TermMatch(term) => Self::TermMatch(TermMatch {
                field: Some(field.to_string()),
                values: term.values.clone(),
            }),
            Self::Conjunction(clauses) => {
                Self::Conjunction(clauses.iter().map(|c| c.with_field(field)).collect())
            }
            Self::Disjunction(clauses) => {
                Self::Disjunction(clauses.iter().map(|c| c.with_field(field)).collect())
            }
        }
    }

    /// Evaluates the node into a query clause.
    ///
    /// A conjunction or disjunction with a single clause evaluates to that clause. Evaluation
    /// is pure; calling it repeatedly yields identical clauses.
    pub fn eval(&self) -> Result<Clause, QueryError> {
        match self {
            Self::TermMatch(term) => {
                let field = term
                    .field
                    .as_ref()
                    .ok_or_else(|| ContractViolation::UnsetField {
                        values: term.values.clone(),
                    })?;
                Ok(Clause::terms(field.clone(), term.values.clone()))
            }
            Self::Conjunction(clauses) => eval_bool(clauses, BoolClause::Must),
            Self::Disjunction(clauses) => eval_bool(clauses, BoolClause::Should),
        }
    }

    /// Formats the node as a tree structure with the given indentation level.
    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let prefix = "  ".repeat(indent);
        match self {
            Self::TermMatch(TermMatch { field, values }) => match field {
                Some(field) => writeln!(f, "{prefix}TermMatch({field:?}, {values:?})"),
                None => writeln!(f, "{prefix}TermMatch(?, {values:?})"),
            },
            Self::Conjunction(clauses) => {
                writeln!(f, "{prefix}Conjunction")?;
                for clause in clauses {
                    clause.fmt_tree(f, indent + 1)?;
                }
                Ok(())
            }
            Self::Disjunction(clauses) => {
                writeln!(f, "{prefix}Disjunction")?;
                for clause in clauses {
                    clause.fmt_tree(f, indent + 1)?;
                }
                Ok(())
            }
        }
    }
}

/// Evaluates a boolean node, unwrapping it when it holds a single clause.
fn eval_bool(
    clauses: &[QueryNode],
    occur: fn(Vec<Clause>) -> BoolClause,
) -> Result<Clause, QueryError> {
    if let [only] = clauses {
        return only.eval();
    }
    let evaluated = clauses
        .iter()
        .map(QueryNode::eval)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Clause::Bool(occur(evaluated)))
}

impl fmt::Display for QueryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, 0)
    }
}

/// Spreads `conditions` over `fields`.
///
/// Builds one conjunction per field, holding a copy of every condition assigned to that field,
/// and joins the conjunctions in a disjunction:
/// `(f1 ∋ c1 ∧ f1 ∋ c2) ∨ (f2 ∋ c1 ∧ f2 ∋ c2)`.
pub fn distribute(
    fields: &[String],
    conditions: &[QueryNode],
) -> Result<QueryNode, ContractViolation> {
    if fields.is_empty() {
        return Err(ContractViolation::NoFields);
    }

    let per_field = fields
        .iter()
        .map(|field| {
            QueryNode::Conjunction(conditions.iter().map(|c| c.with_field(field)).collect())
        })
        .collect();

    Ok(QueryNode::Disjunction(per_field))
}
