//! Implementation of `esq init`.

use std::{fs, process::ExitCode};

use esq_config::{CONFIG_FILENAME, global_template, local_template, require_global_config_path};
use esq_highlight::indent_content;
use log::info;

use crate::cli::{
    args::InitCommand,
    context::CommandContext,
    output::{highlighted, styled, subheader, success},
};

/// Initializes a `.esq.toml` configuration file.
pub fn run(ctx: &CommandContext, cmd: &InitCommand) -> ExitCode {
    let cwd = &ctx.cwd;

    let global_path = require_global_config_path();
    let is_home_dir = global_path
        .as_ref()
        .ok()
        .and_then(|p| p.parent())
        .is_some_and(|home| home == cwd);

    let use_global = cmd.global || is_home_dir;

    let config_path = if use_global {
        match global_path {
            Ok(path) => path,
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        cwd.join(CONFIG_FILENAME)
    };

    if config_path.exists() && !cmd.force {
        eprintln!(
            "error: configuration file already exists: {}",
            config_path.display()
        );
        eprintln!("use --force to overwrite");
        return ExitCode::FAILURE;
    }

    let template = if use_global {
        global_template()
    } else {
        local_template()
    };

    if let Err(e) = fs::write(&config_path, &template) {
        eprintln!("error: failed to write {}: {e}", config_path.display());
        return ExitCode::FAILURE;
    }
    info!("wrote {} template", if use_global { "global" } else { "local" });

    println!(
        "{}",
        styled(&format!("Created {}", config_path.display()), success)
    );
    println!();
    println!("{}", styled("Configuration written:", subheader));
    println!("{}", indent_content(&highlighted(&template, "toml")));

    ExitCode::SUCCESS
}
