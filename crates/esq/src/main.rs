//! esq: translate a small search query language into bool/terms query documents.
//!
//! ```text
//! $ esq translate 'title,body: rust and tokio'
//! ```

#![warn(missing_docs)]

mod cli;

use std::process::ExitCode;

use clap::Parser;

use crate::cli::{args::Cli, commands, logger::init_logger};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.verbose);
    commands::run(cli.command)
}
