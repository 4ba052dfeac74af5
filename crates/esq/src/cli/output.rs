//! Query input and terminal output helpers for CLI commands.

use std::{
    io::{self, IsTerminal, Read},
    process::ExitCode,
};

pub use esq_highlight::{dim, header, subheader, success, warning};
use esq_highlight::{Highlighter, error};
use esq_query::{QueryDocument, QueryError};

use crate::cli::args::QueryArgs;

/// Returns the query text: the arguments joined by spaces, or stdin when there are none.
pub fn read_query(args: &QueryArgs) -> Result<String, ExitCode> {
    if !args.query.is_empty() {
        return Ok(args.query.join(" "));
    }

    let mut stdin = io::stdin();
    if stdin.is_terminal() {
        eprintln!("error: no query given");
        eprintln!("pass the query as arguments or pipe it on stdin");
        return Err(ExitCode::FAILURE);
    }

    let mut input = String::new();
    stdin.read_to_string(&mut input).map_err(|e| {
        eprintln!("error: failed to read query from stdin: {e}");
        ExitCode::FAILURE
    })?;
    Ok(strip_trailing_newline(input))
}

/// Removes one trailing line ending, as left by `echo` or a heredoc.
fn strip_trailing_newline(mut input: String) -> String {
    if input.ends_with('\n') {
        input.pop();
        if input.ends_with('\r') {
            input.pop();
        }
    }
    input
}

/// Prints a translation error to stderr.
///
/// Syntax errors get the caret report followed by the tree of attempted alternatives.
pub fn report_query_error(err: &QueryError) -> ExitCode {
    let styled = io::stderr().is_terminal();
    let label = if styled {
        error("error:")
    } else {
        String::from("error:")
    };

    match err.as_syntax() {
        Some(syntax) => {
            eprintln!("{label} {syntax}");
            eprintln!();
            eprint!("{}", syntax.ascii_tree());
        }
        None => eprintln!("{label} {err}"),
    }
    ExitCode::FAILURE
}

/// Serializes a document, highlighting it when stdout is a terminal.
pub fn render_document(document: &QueryDocument, compact: bool) -> Result<String, ExitCode> {
    let json = if compact {
        document.to_json()
    } else {
        document.to_json_pretty()
    }
    .map_err(|e| {
        eprintln!("error: failed to serialize JSON: {e}");
        ExitCode::FAILURE
    })?;

    Ok(highlighted(&json, "json"))
}

/// Highlights `content` with the named syntax when stdout is a terminal.
pub fn highlighted(content: &str, syntax: &str) -> String {
    if io::stdout().is_terminal() {
        Highlighter::new().highlight(content, syntax)
    } else {
        content.to_string()
    }
}

/// Styles `text` with `style` only when stdout is a terminal.
pub fn styled(text: &str, style: fn(&str) -> String) -> String {
    if io::stdout().is_terminal() {
        style(text)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_one_line_ending() {
        assert_eq!(strip_trailing_newline("a: b\n".into()), "a: b");
        assert_eq!(strip_trailing_newline("a: b\r\n".into()), "a: b");
        assert_eq!(strip_trailing_newline("a: b\n\n".into()), "a: b\n");
        assert_eq!(strip_trailing_newline("a: b".into()), "a: b");
    }

    #[test]
    fn joins_arguments() {
        let args = QueryArgs {
            query: vec!["title:".into(), "rust".into(), "async".into()],
            ..QueryArgs::default()
        };
        assert_eq!(read_query(&args).unwrap(), "title: rust async");
    }
}
