//! Shared context for running CLI commands.

use std::{
    env,
    path::{Path, PathBuf},
    process::ExitCode,
};

use esq_config::Config;
use esq_query::{Pagination, QueryParser};
use log::warn;

use crate::cli::args::QueryArgs;

/// Command execution context built once per CLI invocation.
pub struct CommandContext {
    /// Current working directory.
    pub cwd: PathBuf,
    /// Loaded configuration (may be default if no config files found).
    pub config: Config,
}

impl CommandContext {
    /// Loads the current directory and configuration.
    pub fn load() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        let config = load_config_or_failure(&cwd)?;
        Ok(Self { cwd, config })
    }

    /// Loads only the current directory, skipping configuration parsing.
    ///
    /// Used for `init`, which should work even when an existing config file is invalid.
    pub fn load_cwd_only() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        Ok(Self {
            cwd,
            config: Config::default(),
        })
    }

    /// Builds a query parser from the configuration, with command-line overrides applied.
    ///
    /// Configuration warnings are logged, since they explain most surprising translations.
    pub fn query_parser(&self, args: &QueryArgs) -> QueryParser {
        for warning in self.config.validate() {
            warn!("{warning}");
        }

        let fields = if args.fields.is_empty() {
            &self.config.query.default_fields
        } else {
            &args.fields
        };
        let pagination = Pagination {
            from: args.from.unwrap_or(self.config.page.from),
            size: args.size.unwrap_or(self.config.page.size),
        };

        QueryParser::new(fields.iter().map(String::as_str)).with_pagination(pagination)
    }
}

/// Returns the current working directory or exits with a consistent error.
fn current_dir_or_failure() -> Result<PathBuf, ExitCode> {
    env::current_dir().map_err(|e| {
        eprintln!("error: could not determine current directory: {e}");
        ExitCode::FAILURE
    })
}

/// Loads configuration from the provided directory or exits with an error.
fn load_config_or_failure(cwd: &Path) -> Result<Config, ExitCode> {
    Config::load(cwd).map_err(|e| {
        eprintln!("error: failed to load configuration: {e}");
        ExitCode::FAILURE
    })
}

#[cfg(test)]
mod tests {
    use esq_config::QuerySettings;

    use super::*;

    fn context(fields: &[&str], page: Pagination) -> CommandContext {
        CommandContext {
            cwd: PathBuf::from("/"),
            config: Config {
                query: QuerySettings {
                    default_fields: fields.iter().map(|s| (*s).to_string()).collect(),
                },
                page,
                ..Config::default()
            },
        }
    }

    #[test]
    fn parser_uses_config_defaults() {
        let ctx = context(&["name"], Pagination { from: 5, size: 7 });
        let parser = ctx.query_parser(&QueryArgs::default());
        assert_eq!(parser.default_fields(), ["name"]);

        let document = parser.translate("foo").unwrap();
        assert_eq!(document.from, 5);
        assert_eq!(document.size, 7);
    }

    #[test]
    fn flags_override_config() {
        let ctx = context(&["name"], Pagination { from: 5, size: 7 });
        let args = QueryArgs {
            fields: vec!["a".into(), "b".into()],
            size: Some(1),
            ..QueryArgs::default()
        };
        let parser = ctx.query_parser(&args);
        assert_eq!(parser.default_fields(), ["a", "b"]);

        let document = parser.translate("foo").unwrap();
        assert_eq!(document.from, 5);
        assert_eq!(document.size, 1);
    }
}
