//! Implementation of `esq config`.

use std::process::ExitCode;

use esq_config::is_global_config;

use crate::cli::{
    context::CommandContext,
    output::{dim, highlighted, styled, subheader, warning},
};

/// Shows effective configuration settings and validation warnings.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let config = &ctx.config;

    let settings = match config.settings_to_toml() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if config.sources.is_empty() {
        println!("{}", styled("# no configuration files found, using defaults", dim));
    } else {
        println!("{}", styled("# merged from (highest precedence first):", dim));
        for path in &config.sources {
            let scope = if is_global_config(path) { " (global)" } else { "" };
            println!(
                "{}",
                styled(&format!("#   {}{scope}", path.display()), dim)
            );
        }
    }
    println!();

    print!("{}", highlighted(&settings, "toml"));

    let warnings = config.validate();
    if !warnings.is_empty() {
        println!();
        println!("{}", styled(&format!("Warnings ({}):", warnings.len()), subheader));
        for w in &warnings {
            println!("  - {}", styled(&w.to_string(), warning));
        }
    }

    ExitCode::SUCCESS
}
