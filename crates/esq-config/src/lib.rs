//! Configuration system for esq.
//!
//! esq uses TOML configuration files named `.esq.toml`. Configuration is resolved by walking up
//! the directory tree from the current working directory, collecting any `.esq.toml` files
//! found, then loading `~/.esq.toml` as the global config with lowest precedence.
//!
//! ```toml
//! [query]
//! default_fields = ["title", "body"]
//!
//! [page]
//! from = 0
//! size = 50
//! ```

#![warn(missing_docs)]

mod discovery;
mod error;
mod merge;
mod parse;
mod templates;
#[cfg(test)]
mod test_support;
mod validate;

use std::path::{Path, PathBuf};

pub use discovery::{
    CONFIG_FILENAME, discover_configs, global_config_path, is_global_config,
    require_global_config_path,
};
pub use error::ConfigError;
use esq_query::{DEFAULT_FIELDS, Pagination};
pub use merge::merge_configs;
pub use parse::{
    ParsedConfig, RawConfig, RawPageSettings, RawQuerySettings, parse_config_file,
    parse_config_str,
};
use serde::{Deserialize, Serialize};
pub use templates::{global_template, local_template};
pub use validate::ConfigWarning;
use validate::validate_config;

/// Top-level merged configuration for esq.
///
/// This represents the fully resolved configuration after merging all discovered `.esq.toml`
/// files according to precedence rules.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Query translation settings.
    pub query: QuerySettings,
    /// Pagination emitted at the root of every query document.
    pub page: Pagination,
    /// Files the configuration was merged from, highest precedence first.
    pub sources: Vec<PathBuf>,
}

impl Config {
    /// Loads configuration by discovering and merging all relevant `.esq.toml` files.
    ///
    /// Files are discovered and parsed from `cwd` up to the first `root = true` file, then
    /// `~/.esq.toml`, and merged so that the file closest to `cwd` wins.
    ///
    /// Returns `Ok(Config::default())` if no configuration files are found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        Ok(merge_configs(&discover_configs(cwd)?))
    }

    /// Loads configuration from a specific list of config file paths.
    ///
    /// Files should be provided in precedence order: highest precedence first.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        let parsed = files
            .iter()
            .map(|path| ParsedConfig::read(path))
            .collect::<Result<Vec<_>, ConfigError>>()?;
        Ok(merge_configs(&parsed))
    }

    /// Validates the configuration and returns any warnings.
    ///
    /// This checks for:
    /// - An empty default field list
    /// - Default field names that cannot appear in a query
    /// - Duplicate default fields
    /// - A page size of zero
    pub fn validate(&self) -> Vec<ConfigWarning> {
        validate_config(self)
    }

    /// Serializes the effective settings to TOML format.
    ///
    /// The output has the same layout as a `.esq.toml` file. `root` is omitted since it only
    /// affects discovery.
    pub fn settings_to_toml(&self) -> Result<String, ConfigError> {
        let serializable = SerializableSettings {
            query: &self.query,
            page: &self.page,
        };
        Ok(toml::to_string_pretty(&serializable)?)
    }
}

/// Query translation settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct QuerySettings {
    /// Fields searched by groups without a `field:` prefix.
    pub default_fields: Vec<String>,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            default_fields: DEFAULT_FIELDS.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

/// Internal struct for TOML serialization of settings.
#[derive(Serialize)]
struct SerializableSettings<'a> {
    /// Query translation settings.
    query: &'a QuerySettings,
    /// Pagination settings.
    page: &'a Pagination,
}
