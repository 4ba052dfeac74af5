//! End-to-end translation: query string to query document.

use log::{debug, trace};

use crate::{
    document::{Pagination, QueryDocument},
    error::QueryError,
    parser::parse_syntax,
    query::SearchQuery,
    simplify::Simplifier,
    syntax::SyntaxTree,
};

/// Fields searched by groups without a `field:` prefix when none are configured.
pub const DEFAULT_FIELDS: &[&str] = &["title", "body"];

/// Translates query strings using fixed default fields and pagination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParser {
    /// Simplifier carrying the default fields.
    simplifier: Simplifier,
    /// Pagination applied to every query.
    pagination: Pagination,
}

impl Default for QueryParser {
    fn default() -> Self {
        Self::new(DEFAULT_FIELDS.iter().copied())
    }
}

impl QueryParser {
    /// Creates a parser that falls back to `default_fields`.
    pub fn new<I, S>(default_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            simplifier: Simplifier::new(default_fields),
            pagination: Pagination::default(),
        }
    }

    /// Sets the pagination applied to parsed queries.
    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = pagination;
        self
    }

    /// The fallback fields.
    pub fn default_fields(&self) -> &[String] {
        self.simplifier.default_fields()
    }

    /// Parses and simplifies `input` into a query.
    pub fn parse(&self, input: &str) -> Result<SearchQuery, QueryError> {
        debug!("parsing query {input:?}");
        let tree = parse_syntax(input)?;
        self.simplify(&tree)
    }

    /// Simplifies an already parsed syntax tree into a query with this parser's pagination.
    pub fn simplify(&self, tree: &SyntaxTree) -> Result<SearchQuery, QueryError> {
        let query = self.simplifier.simplify(tree)?;
        trace!("query:\n{query}");
        Ok(query.with_pagination(self.pagination))
    }

    /// Parses `input` and evaluates it into a document.
    pub fn translate(&self, input: &str) -> Result<QueryDocument, QueryError> {
        self.parse(input)?.eval()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::{ast::QueryNode, error::SyntaxError};

    fn translate(input: &str, defaults: &[&str]) -> Value {
        let document = QueryParser::new(defaults.iter().copied())
            .translate(input)
            .unwrap();
        serde_json::to_value(document).unwrap()
    }

    #[test]
    fn single_term_has_no_bool_wrapper() {
        assert_eq!(
            translate("title: foo", &["f1", "f2"]),
            json!({
                "from": 0,
                "size": 50,
                "query": { "terms": { "title": ["foo"] } }
            })
        );
    }

    #[test]
    fn field_distribution_document() {
        assert_eq!(
            translate("field1,field2: a b and c", &["f1", "f2"]),
            json!({
                "from": 0,
                "size": 50,
                "query": { "bool": { "should": [
                    { "bool": { "must": [
                        { "terms": { "field1": ["a", "b"] } },
                        { "terms": { "field1": ["c"] } }
                    ] } },
                    { "bool": { "must": [
                        { "terms": { "field2": ["a", "b"] } },
                        { "terms": { "field2": ["c"] } }
                    ] } }
                ] } }
            })
        );
    }

    #[test]
    fn default_fields_distribute_like_explicit() {
        assert_eq!(
            translate("foo and bar", &["f1", "f2"]),
            translate("f1,f2: foo and bar", &["x"])
        );
    }

    #[test]
    fn top_level_groups_are_anded() {
        assert_eq!(
            translate("a:1 b:2", &["f"]),
            json!({
                "from": 0,
                "size": 50,
                "query": { "bool": { "must": [
                    { "terms": { "a": ["1"] } },
                    { "terms": { "b": ["2"] } }
                ] } }
            })
        );
    }

    #[test]
    fn top_level_and_ignores_inner_operators() {
        assert_eq!(
            translate("a: x y b: z and w", &["f"]),
            json!({
                "from": 0,
                "size": 50,
                "query": { "bool": { "must": [
                    { "terms": { "a": ["x", "y"] } },
                    { "bool": { "must": [
                        { "terms": { "b": ["z"] } },
                        { "terms": { "b": ["w"] } }
                    ] } }
                ] } }
            })
        );
    }

    #[test]
    fn quoted_and_is_a_value() {
        assert_eq!(
            translate("title: \"and\"", &["f"]),
            json!({
                "from": 0,
                "size": 50,
                "query": { "terms": { "title": ["and"] } }
            })
        );
    }

    #[test]
    fn bare_and_is_a_syntax_error() {
        let err = QueryParser::default().translate("title: and").unwrap_err();
        assert!(matches!(err, QueryError::Syntax(SyntaxError { position: 7, .. })));
    }

    #[test]
    fn full_width_space_is_part_of_the_value() {
        assert_eq!(
            translate("title: わろてんか\u{3000}5分", &["f"]),
            json!({
                "from": 0,
                "size": 50,
                "query": { "terms": { "title": ["わろてんか\u{3000}5分"] } }
            })
        );
        assert_eq!(
            translate("a\u{3000}and\u{3000}b", &["f"]),
            json!({
                "from": 0,
                "size": 50,
                "query": { "terms": { "f": ["a\u{3000}and\u{3000}b"] } }
            })
        );
    }

    #[test]
    fn escaped_quote_value() {
        assert_eq!(
            translate(r"title: 'it\'s'", &["f"]),
            json!({
                "from": 0,
                "size": 50,
                "query": { "terms": { "title": ["it's"] } }
            })
        );
    }

    #[test]
    fn custom_pagination() {
        let document = QueryParser::default()
            .with_pagination(Pagination { from: 100, size: 25 })
            .translate("title: foo")
            .unwrap();
        assert_eq!(document.from, 100);
        assert_eq!(document.size, 25);
    }

    #[test]
    fn default_parser_uses_default_fields() {
        let parser = QueryParser::default();
        assert_eq!(parser.default_fields(), ["title", "body"]);
        assert_eq!(
            serde_json::to_value(parser.translate("foo").unwrap()).unwrap(),
            json!({
                "from": 0,
                "size": 50,
                "query": { "bool": { "should": [
                    { "terms": { "title": ["foo"] } },
                    { "terms": { "body": ["foo"] } }
                ] } }
            })
        );
    }

    #[test]
    fn appended_filter_after_parse() {
        let parser = QueryParser::new(["f"]);
        let mut query = parser.parse("title: foo").unwrap();
        let filter = parser.parse("tenant: acme").unwrap();
        query.add_must_condition(filter.root().clone());

        assert_eq!(
            serde_json::to_value(query.eval().unwrap()).unwrap(),
            json!({
                "from": 0,
                "size": 50,
                "query": { "bool": { "must": [
                    { "terms": { "title": ["foo"] } },
                    { "terms": { "tenant": ["acme"] } }
                ] } }
            })
        );
    }

    #[test]
    fn translation_is_repeatable() {
        let query = QueryParser::new(["f1", "f2"])
            .parse("a b and c x: 'y z'")
            .unwrap();
        let first = query.eval().unwrap().to_json().unwrap();
        let second = query.eval().unwrap().to_json().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn simplify_parsed_tree_matches_parse() {
        let parser =
            QueryParser::new(["f1", "f2"]).with_pagination(Pagination { from: 3, size: 4 });
        let tree = parse_syntax("title: a b and c d").unwrap();
        let query = parser.simplify(&tree).unwrap();
        assert_eq!(query, parser.parse("title: a b and c d").unwrap());
        assert_eq!(query.pagination(), Pagination { from: 3, size: 4 });
    }

    #[test]
    fn parse_root_is_conjunction() {
        let query = QueryParser::default().parse("title: foo").unwrap();
        assert!(matches!(query.root(), QueryNode::Conjunction(groups) if groups.len() == 1));
    }
}
