//! Grammar parser.
//!
//! Parses a query string into a [`SyntaxTree`] using backtracking recursive descent. Each rule
//! either succeeds and consumes input, or fails and leaves the cursor where it started.
//!
//! # Grammar
//!
//! ```text
//! and_queries    → query (WS query)* WS?
//! query          → field? and_conditions
//! field          → multi_field ":" WS?
//! multi_field    → identifier ("," identifier)*
//! and_conditions → or_conditions (AND_OP or_conditions)*
//! or_conditions  → condition (OR_OP condition)*
//! condition      → (quoted_string | raw_condition) !":"
//! raw_condition  → [^:\s]+ except the word "and"
//! quoted_string  → '"' ("\" any | !'"' any)* '"' | "'" ("\" any | !"'" any)* "'"
//! identifier     → [A-Za-z0-9_.]+
//! AND_OP         → WS "and" WS
//! OR_OP          → WS "or" WS | WS
//! ```
//!
//! # Precedence
//!
//! `and` binds looser than `or`, the reverse of most query languages. Whitespace between two
//! conditions is already an implicit `or`, so `a b and c` reads as `(a or b) and c`.
//!
//! # Failures
//!
//! The parser remembers the furthest position any rule reached and every alternative attempted
//! there, together with the stack of rules that attempted it.

use log::trace;

use crate::{
    error::{Expectation, SyntaxError},
    scanner::{Scanner, is_identifier_char, is_raw_char, is_space},
    syntax::{AndConditions, Condition, FieldList, FieldName, OrConditions, QueryGroup, SyntaxTree},
};

/// Labels for the alternatives recorded in a [`SyntaxError`].
pub mod expect {
    /// A field identifier.
    pub const IDENTIFIER: &str = "identifier";
    /// The colon ending a field prefix.
    pub const COLON: &str = "':'";
    /// The comma between field names.
    pub const COMMA: &str = "','";
    /// Whitespace between conditions or groups.
    pub const WHITESPACE: &str = "whitespace";
    /// The `and` keyword.
    pub const AND: &str = "'and'";
    /// The `or` keyword.
    pub const OR: &str = "'or'";
    /// An opening double quote.
    pub const DOUBLE_QUOTE: &str = "'\"'";
    /// An opening single quote.
    pub const SINGLE_QUOTE: &str = "\"'\"";
    /// The double quote closing a string.
    pub const CLOSING_DOUBLE_QUOTE: &str = "closing '\"'";
    /// The single quote closing a string.
    pub const CLOSING_SINGLE_QUOTE: &str = "closing \"'\"";
    /// Any character after a backslash.
    pub const ESCAPED_CHAR: &str = "escaped character";
    /// An unquoted condition.
    pub const RAW_CONDITION: &str = "raw condition";
    /// Anything but a colon directly after a condition.
    pub const NO_COLON: &str = "no ':' after condition";
    /// The end of the input.
    pub const END_OF_INPUT: &str = "end of input";
}

/// The word that separates or-groups and cannot be used as an unquoted condition.
pub const RESERVED_AND: &str = "and";

/// Returns the unquoted token at the start of `rest`.
pub fn leading_token(rest: &str) -> &str {
    let end = rest.find(|ch: char| !is_raw_char(ch)).unwrap_or(rest.len());
    &rest[..end]
}

/// Backtracking parser with furthest-failure tracking.
struct Parser<'a> {
    /// Cursor over the input.
    scanner: Scanner<'a>,
    /// Rules currently being parsed, outermost first.
    rules: Vec<&'static str>,
    /// Furthest position at which an alternative failed.
    furthest: usize,
    /// Alternatives attempted at `furthest`.
    expected: Vec<Expectation>,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given input.
    fn new(input: &'a str) -> Self {
        Self {
            scanner: Scanner::new(input),
            rules: Vec::new(),
            furthest: 0,
            expected: Vec::new(),
        }
    }

    /// Runs `body` as the named rule, rewinding the cursor if it fails.
    fn rule<T>(
        &mut self,
        name: &'static str,
        body: impl FnOnce(&mut Self) -> Option<T>,
    ) -> Option<T> {
        let start = self.scanner.position();
        self.rules.push(name);
        let result = body(self);
        self.rules.pop();
        if result.is_none() {
            self.scanner.reset(start);
        }
        result
    }

    /// Records that `what` was expected at the current position, and fails.
    fn expected<T>(&mut self, what: &'static str) -> Option<T> {
        let position = self.scanner.position();
        if position > self.furthest {
            self.furthest = position;
            self.expected.clear();
        }
        if position == self.furthest {
            let expectation = Expectation {
                expected: what,
                rules: self.rules.clone(),
            };
            if !self.expected.contains(&expectation) {
                self.expected.push(expectation);
            }
        }
        None
    }

    /// Consumes `literal`, recording `label` as expected if it is absent.
    fn literal(&mut self, literal: &str, label: &'static str) -> bool {
        if self.scanner.eat(literal) {
            return true;
        }
        self.expected::<()>(label);
        false
    }

    /// Consumes one or more whitespace characters.
    fn space(&mut self) -> bool {
        if !self.scanner.eat_while(is_space).is_empty() {
            return true;
        }
        self.expected::<()>(expect::WHITESPACE);
        false
    }

    /// Parses `item (separator item)*`.
    ///
    /// A separator that is not followed by another item is given back, so the caller can try
    /// it as something else.
    fn separated<T>(
        &mut self,
        mut item: impl FnMut(&mut Self) -> Option<T>,
        mut separator: impl FnMut(&mut Self) -> bool,
    ) -> Option<Vec<T>> {
        let mut items = vec![item(self)?];
        loop {
            let checkpoint = self.scanner.position();
            if !separator(self) {
                break;
            }
            match item(self) {
                Some(next) => items.push(next),
                None => {
                    self.scanner.reset(checkpoint);
                    break;
                }
            }
        }
        Some(items)
    }

    /// Parses: and_queries → query (WS query)* WS?
    fn and_queries(&mut self) -> Option<SyntaxTree> {
        self.rule("and_queries", |p| {
            let start = p.scanner.position();
            let groups = p.separated(Self::query, Self::space)?;
            let end = p.scanner.position();

            p.space();
            if !p.scanner.at_end() {
                return p.expected(expect::END_OF_INPUT);
            }

            Some(SyntaxTree {
                groups,
                span: start..end,
            })
        })
    }

    /// Parses: query → field? and_conditions
    fn query(&mut self) -> Option<QueryGroup> {
        self.rule("and_query", |p| {
            let start = p.scanner.position();
            let fields = p.field();
            let conditions = p.and_conditions()?;
            Some(QueryGroup {
                fields,
                conditions,
                span: start..p.scanner.position(),
            })
        })
    }

    /// Parses: field → multi_field ":" WS?
    fn field(&mut self) -> Option<FieldList> {
        self.rule("field", |p| {
            let start = p.scanner.position();
            let fields = p.multi_field()?;
            if !p.literal(":", expect::COLON) {
                return None;
            }
            let span = start..p.scanner.position();
            p.space();
            Some(FieldList { fields, span })
        })
    }

    /// Parses: multi_field → identifier ("," identifier)*
    fn multi_field(&mut self) -> Option<Vec<FieldName>> {
        self.rule("multi_field", |p| {
            p.separated(Self::identifier, |p| p.literal(",", expect::COMMA))
        })
    }

    /// Parses: identifier → [A-Za-z0-9_.]+
    fn identifier(&mut self) -> Option<FieldName> {
        let start = self.scanner.position();
        let name = self.scanner.eat_while(is_identifier_char);
        if name.is_empty() {
            return self.expected(expect::IDENTIFIER);
        }
        Some(FieldName {
            name: name.to_string(),
            span: start..self.scanner.position(),
        })
    }

    /// Parses: and_conditions → or_conditions (AND_OP or_conditions)*
    fn and_conditions(&mut self) -> Option<AndConditions> {
        self.rule("and_conditions", |p| {
            let start = p.scanner.position();
            let groups = p.separated(Self::or_conditions, Self::and_op)?;
            Some(AndConditions {
                groups,
                span: start..p.scanner.position(),
            })
        })
    }

    /// Parses: or_conditions → condition (OR_OP condition)*
    fn or_conditions(&mut self) -> Option<OrConditions> {
        self.rule("or_conditions", |p| {
            let start = p.scanner.position();
            let conditions = p.separated(Self::condition, Self::or_op)?;
            Some(OrConditions {
                conditions,
                span: start..p.scanner.position(),
            })
        })
    }

    /// Parses: AND_OP → WS "and" WS
    fn and_op(&mut self) -> bool {
        self.rule("and_op", |p| {
            (p.space() && p.literal(RESERVED_AND, expect::AND) && p.space()).then_some(())
        })
        .is_some()
    }

    /// Parses: OR_OP → WS "or" WS | WS
    fn or_op(&mut self) -> bool {
        self.rule("or_op", |p| {
            let start = p.scanner.position();
            if p.space() && p.literal("or", expect::OR) && p.space() {
                return Some(());
            }
            p.scanner.reset(start);
            p.space().then_some(())
        })
        .is_some()
    }

    /// Parses: condition → (quoted_string | raw_condition) !":"
    fn condition(&mut self) -> Option<Condition> {
        self.rule("condition", |p| {
            let condition = match p.quoted_string() {
                Some(quoted) => quoted,
                None => p.raw_condition()?,
            };
            if p.scanner.peek() == Some(':') {
                return p.expected(expect::NO_COLON);
            }
            Some(condition)
        })
    }

    /// Parses: raw_condition → [^:\s]+ except the word "and"
    fn raw_condition(&mut self) -> Option<Condition> {
        self.rule("raw_condition", |p| {
            let start = p.scanner.position();
            let text = p.scanner.eat_while(is_raw_char);
            if text.is_empty() || text == RESERVED_AND {
                p.scanner.reset(start);
                return p.expected(expect::RAW_CONDITION);
            }
            Some(Condition::Raw {
                text: text.to_string(),
                span: start..p.scanner.position(),
            })
        })
    }

    /// Parses a single- or double-quoted string, resolving backslash escapes.
    ///
    /// A backslash is dropped and the character after it is taken verbatim, so `\'` yields `'`
    /// and `\\` yields `\`.
    fn quoted_string(&mut self) -> Option<Condition> {
        self.rule("quoted_string", |p| {
            let start = p.scanner.position();
            let (quote, closing) = if p.literal("\"", expect::DOUBLE_QUOTE) {
                ('"', expect::CLOSING_DOUBLE_QUOTE)
            } else if p.literal("'", expect::SINGLE_QUOTE) {
                ('\'', expect::CLOSING_SINGLE_QUOTE)
            } else {
                return None;
            };

            let mut text = String::new();
            loop {
                match p.scanner.advance() {
                    Some('\\') => match p.scanner.advance() {
                        Some(ch) => text.push(ch),
                        None => return p.expected(expect::ESCAPED_CHAR),
                    },
                    Some(ch) if ch == quote => break,
                    Some(ch) => text.push(ch),
                    None => return p.expected(closing),
                }
            }

            Some(Condition::Quoted {
                text,
                quote,
                span: start..p.scanner.position(),
            })
        })
    }
}

/// Parses a query string into a concrete syntax tree.
///
/// The whole input must match; there is no partial result on failure.
pub fn parse_syntax(input: &str) -> Result<SyntaxTree, SyntaxError> {
    let mut parser = Parser::new(input);
    match parser.and_queries() {
        Some(tree) => {
            trace!("syntax tree:\n{tree}");
            Ok(tree)
        }
        None => Err(SyntaxError::new(parser.furthest, parser.expected, input)),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;

    /// A group reduced to its field names and or-groups of condition texts.
    type GroupShape = (Option<Vec<String>>, Vec<Vec<String>>);

    fn shape(input: &str) -> Vec<GroupShape> {
        let tree = parse_syntax(input).unwrap();
        tree.groups
            .iter()
            .map(|group| {
                let fields = group
                    .fields
                    .as_ref()
                    .map(|list| list.fields.iter().map(|f| f.name.clone()).collect());
                let conditions = group
                    .conditions
                    .groups
                    .iter()
                    .map(|or| or.conditions.iter().map(|c| c.text().to_string()).collect())
                    .collect();
                (fields, conditions)
            })
            .collect()
    }

    fn fields(names: &[&str]) -> Option<Vec<String>> {
        Some(names.iter().map(|s| s.to_string()).collect())
    }

    fn conds(groups: &[&[&str]]) -> Vec<Vec<String>> {
        groups
            .iter()
            .map(|g| g.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn single_field_single_term() {
        assert_eq!(
            shape("title: foo"),
            vec![(fields(&["title"]), conds(&[&["foo"]]))]
        );
    }

    #[test]
    fn space_after_colon_is_optional() {
        assert_eq!(shape("title:foo"), shape("title: foo"));
    }

    #[test]
    fn whitespace_is_or() {
        assert_eq!(
            shape("title: a b c"),
            vec![(fields(&["title"]), conds(&[&["a", "b", "c"]]))]
        );
    }

    #[test]
    fn or_keyword_is_or() {
        assert_eq!(shape("title: a or b"), shape("title: a b"));
    }

    #[test]
    fn and_binds_looser_than_or() {
        assert_eq!(
            shape("title: a b and c"),
            vec![(fields(&["title"]), conds(&[&["a", "b"], &["c"]]))]
        );
    }

    #[test]
    fn multiple_fields() {
        assert_eq!(
            shape("field1,field2: a b and c"),
            vec![(fields(&["field1", "field2"]), conds(&[&["a", "b"], &["c"]]))]
        );
    }

    #[test]
    fn identifiers_allow_dots_and_underscores() {
        assert_eq!(
            shape("meta.author_name: x"),
            vec![(fields(&["meta.author_name"]), conds(&[&["x"]]))]
        );
    }

    #[test]
    fn no_field_prefix() {
        assert_eq!(
            shape("foo and bar"),
            vec![(None, conds(&[&["foo"], &["bar"]]))]
        );
    }

    #[test]
    fn groups_split_at_next_field() {
        assert_eq!(
            shape("a:1 b:2"),
            vec![
                (fields(&["a"]), conds(&[&["1"]])),
                (fields(&["b"]), conds(&[&["2"]]))
            ]
        );
    }

    #[test]
    fn unprefixed_group_before_field_group() {
        assert_eq!(
            shape("foo bar title: baz"),
            vec![
                (None, conds(&[&["foo", "bar"]])),
                (fields(&["title"]), conds(&[&["baz"]]))
            ]
        );
    }

    #[test]
    fn trailing_whitespace_accepted() {
        assert_eq!(shape("title: foo  "), shape("title: foo"));
    }

    #[test]
    fn multibyte_terms() {
        assert_eq!(
            shape("title,subtitle: わろてんか and 5分"),
            vec![(
                fields(&["title", "subtitle"]),
                conds(&[&["わろてんか"], &["5分"]])
            )]
        );
    }

    #[test]
    fn ideographic_space_stays_in_term() {
        assert_eq!(
            shape("title: わろてんか\u{3000}5分"),
            vec![(fields(&["title"]), conds(&[&["わろてんか\u{3000}5分"]]))]
        );
        assert_eq!(
            shape("a\u{3000}and\u{3000}b"),
            vec![(None, conds(&[&["a\u{3000}and\u{3000}b"]]))]
        );
    }

    #[test]
    fn non_breaking_space_stays_in_term() {
        assert_eq!(
            shape("title: a\u{A0}b"),
            vec![(fields(&["title"]), conds(&[&["a\u{A0}b"]]))]
        );
    }

    #[test]
    fn vertical_tab_separates_terms() {
        assert_eq!(
            shape("title: a\u{0B}b"),
            vec![(fields(&["title"]), conds(&[&["a", "b"]]))]
        );
    }

    #[test]
    fn words_starting_with_and_are_terms() {
        assert_eq!(
            shape("title: android"),
            vec![(fields(&["title"]), conds(&[&["android"]]))]
        );
    }

    #[test]
    fn or_without_following_condition_is_a_term() {
        assert_eq!(
            shape("title: a or"),
            vec![(fields(&["title"]), conds(&[&["a", "or"]]))]
        );
    }

    #[test]
    fn double_quoted_and() {
        let tree = parse_syntax("title: \"and\"").unwrap();
        let condition = &tree.groups[0].conditions.groups[0].conditions[0];
        assert_eq!(
            condition,
            &Condition::Quoted {
                text: "and".into(),
                quote: '"',
                span: 7..12,
            }
        );
    }

    #[test]
    fn quoted_string_keeps_whitespace() {
        assert_eq!(
            shape("title: 'hello world' x"),
            vec![(fields(&["title"]), conds(&[&["hello world", "x"]]))]
        );
    }

    #[test]
    fn escaped_quote() {
        assert_eq!(
            shape(r"title: 'it\'s'"),
            vec![(fields(&["title"]), conds(&[&["it's"]]))]
        );
    }

    #[test]
    fn escaped_backslash() {
        assert_eq!(
            shape(r#"title: "a\\b""#),
            vec![(fields(&["title"]), conds(&[&[r"a\b"]]))]
        );
    }

    #[test]
    fn escape_takes_next_char_verbatim() {
        assert_eq!(
            shape(r#"title: "\n""#),
            vec![(fields(&["title"]), conds(&[&["n"]]))]
        );
    }

    #[test]
    fn other_quote_needs_no_escape() {
        assert_eq!(
            shape(r#"title: "it's""#),
            vec![(fields(&["title"]), conds(&[&["it's"]]))]
        );
    }

    #[test]
    fn empty_quoted_string() {
        assert_eq!(
            shape("title: ''"),
            vec![(fields(&["title"]), conds(&[&[""]]))]
        );
    }

    #[test]
    fn unterminated_quote_falls_back_to_raw() {
        assert_eq!(
            shape("title: \"foo"),
            vec![(fields(&["title"]), conds(&[&["\"foo"]]))]
        );
    }

    #[test]
    fn spans_cover_nodes() {
        let tree = parse_syntax("title: foo bar").unwrap();
        assert_eq!(tree.span, 0..14);
        let group = &tree.groups[0];
        assert_eq!(group.fields.as_ref().unwrap().span, 0..6);
        assert_eq!(group.conditions.span, 7..14);
        assert_eq!(group.conditions.groups[0].conditions[1].span(), &(11..14));
    }

    #[test]
    fn error_bare_and_is_reserved() {
        let err = parse_syntax("title: and").unwrap_err();
        assert_eq!(err.position, 7);
        assert!(err.alternatives().contains(&expect::RAW_CONDITION));
        assert!(err.suggestion().unwrap().contains("reserved"));
    }

    #[test]
    fn error_double_and_pins_second_and() {
        // The first "and" is taken as the operator; the second then fails as a condition.
        let err = parse_syntax("a and and b").unwrap_err();
        assert_eq!(err.position, 6);
        assert_eq!(
            err.alternatives(),
            vec![
                expect::DOUBLE_QUOTE,
                expect::SINGLE_QUOTE,
                expect::RAW_CONDITION
            ]
        );
        assert!(
            err.expected
                .iter()
                .all(|e| e.rules.contains(&"and_conditions"))
        );
    }

    #[test]
    fn error_empty_input() {
        let err = parse_syntax("").unwrap_err();
        assert_eq!(err.position, 0);
        assert_eq!(err.found(), "end of input");
        let alternatives = err.alternatives();
        assert!(alternatives.contains(&expect::IDENTIFIER));
        assert!(alternatives.contains(&expect::RAW_CONDITION));
    }

    #[test]
    fn error_field_without_value() {
        let err = parse_syntax("title:").unwrap_err();
        assert_eq!(err.position, 6);
        assert!(err.alternatives().contains(&expect::RAW_CONDITION));
    }

    #[test]
    fn error_leading_whitespace() {
        let err = parse_syntax(" title: foo").unwrap_err();
        assert_eq!(err.position, 0);
        assert_eq!(err.found(), "whitespace");
    }

    #[test]
    fn error_quoted_condition_followed_by_colon() {
        let err = parse_syntax("\"x\":y").unwrap_err();
        assert_eq!(err.position, 3);
        assert!(err.alternatives().contains(&expect::NO_COLON));
    }

    #[test]
    fn error_records_rule_stack() {
        let err = parse_syntax("title: and").unwrap_err();
        let raw = err
            .expected
            .iter()
            .find(|e| e.expected == expect::RAW_CONDITION)
            .unwrap();
        assert_eq!(
            raw.rules,
            vec![
                "and_queries",
                "and_query",
                "and_conditions",
                "or_conditions",
                "condition",
                "raw_condition"
            ]
        );
    }

    #[test]
    fn leading_token_stops_at_separators() {
        assert_eq!(leading_token("and b"), "and");
        assert_eq!(leading_token("and:x"), "and");
        assert_eq!(leading_token("android"), "android");
        assert_eq!(leading_token(""), "");
    }

    #[test]
    fn performance_many_queries() {
        let queries = [
            "title: foo",
            "title,body: a b and c",
            "a:1 b:2 c:3",
            "foo bar and baz",
            "title: 'it\\'s' \"and\" or x",
            "f1,f2,f3,f4: a b c and d e and f",
        ];

        let start = Instant::now();
        for _ in 0..1000 {
            for query in &queries {
                parse_syntax(query).unwrap();
            }
        }
        let elapsed = start.elapsed();

        assert!(
            elapsed.as_millis() < 1000,
            "Parsing 6,000 queries took {:?}, expected < 1s",
            elapsed
        );
    }
}
