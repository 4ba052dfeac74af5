//! Implementation of `esq inspect`.

use std::process::ExitCode;

use esq_highlight::indent_content;
use esq_query::{QueryError, parse_syntax};

use crate::cli::{
    args::InspectCommand,
    context::CommandContext,
    output::{header, read_query, render_document, report_query_error, styled},
};

/// Prints every translation stage for a query.
pub fn run(ctx: &CommandContext, cmd: &InspectCommand) -> ExitCode {
    let input = match read_query(&cmd.query) {
        Ok(input) => input,
        Err(code) => return code,
    };
    let parser = ctx.query_parser(&cmd.query);

    let tree = match parse_syntax(&input) {
        Ok(tree) => tree,
        Err(e) => return report_query_error(&QueryError::from(e)),
    };
    println!("{}", styled("Syntax tree:", header));
    println!("{}", indent_content(&tree.to_string()));
    println!();

    let query = match parser.simplify(&tree) {
        Ok(query) => query,
        Err(e) => return report_query_error(&e),
    };
    println!("{}", styled("Query:", header));
    println!("{}", indent_content(&query.to_string()));
    println!();

    let document = match query.eval() {
        Ok(document) => document,
        Err(e) => return report_query_error(&e),
    };
    println!("{}", styled("Document:", header));
    match render_document(&document, false) {
        Ok(rendered) => {
            println!("{}", indent_content(&rendered));
            ExitCode::SUCCESS
        }
        Err(code) => code,
    }
}
