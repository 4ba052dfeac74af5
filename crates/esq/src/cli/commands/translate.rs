//! Implementation of `esq translate`.

use std::process::ExitCode;

use esq_query::{QueryError, QueryParser, SearchQuery};
use log::debug;

use crate::cli::{
    args::TranslateCommand,
    context::CommandContext,
    output::{read_query, render_document, report_query_error},
};

/// Translates a query and prints the JSON document.
pub fn run(ctx: &CommandContext, cmd: &TranslateCommand) -> ExitCode {
    let input = match read_query(&cmd.query) {
        Ok(input) => input,
        Err(code) => return code,
    };
    let parser = ctx.query_parser(&cmd.query);

    let document = match build_query(&parser, &input, cmd).and_then(|query| query.eval()) {
        Ok(document) => document,
        Err(e) => return report_query_error(&e),
    };

    match render_document(&document, cmd.compact) {
        Ok(rendered) => {
            println!("{rendered}");
            ExitCode::SUCCESS
        }
        Err(code) => code,
    }
}

/// Parses the main query and appends the `--must` and `--should` queries to its root.
fn build_query(
    parser: &QueryParser,
    input: &str,
    cmd: &TranslateCommand,
) -> Result<SearchQuery, QueryError> {
    let mut query = parser.parse(input)?;
    for extra in &cmd.must {
        debug!("adding must query {extra:?}");
        query.add_must_condition(parser.parse(extra)?.root().clone());
    }
    for extra in &cmd.should {
        debug!("adding should query {extra:?}");
        query.add_should_condition(parser.parse(extra)?.root().clone());
    }
    Ok(query)
}
