//! Configuration file discovery.
//!
//! Every `.esq.toml` between the working directory and the first `root = true` file applies,
//! closest first. Without a root file the global `~/.esq.toml` applies last. Each file is read
//! and parsed exactly once here, so the result feeds straight into merging.

use std::path::{Path, PathBuf};

use directories::BaseDirs;
use log::debug;

use crate::{ConfigError, parse::ParsedConfig};

/// The configuration filename.
pub const CONFIG_FILENAME: &str = ".esq.toml";

/// Discovers and parses the configuration files that apply to `cwd`.
///
/// Returns them in precedence order: closest to `cwd` first, global last. Any file that cannot
/// be read or parsed is an error, since it could be the one that sets `root = true`.
pub fn discover_configs(cwd: &Path) -> Result<Vec<ParsedConfig>, ConfigError> {
    discover_with_global(cwd, global_config_path().as_deref())
}

/// Walks up from `cwd`, then falls back to the config at `global`.
fn discover_with_global(
    cwd: &Path,
    global: Option<&Path>,
) -> Result<Vec<ParsedConfig>, ConfigError> {
    let mut configs = Vec::new();

    for dir in cwd.ancestors() {
        let path = dir.join(CONFIG_FILENAME);
        if !path.is_file() {
            continue;
        }
        let parsed = ParsedConfig::read(&path)?;
        let is_root = parsed.config.is_root();
        configs.push(parsed);
        if is_root {
            debug!("{} is a root config; skipping parents", path.display());
            return Ok(configs);
        }
    }

    if let Some(global) = global
        && global.is_file()
        && !configs.iter().any(|parsed| parsed.path == global)
    {
        configs.push(ParsedConfig::read(global)?);
    }

    debug!("discovered {} config file(s) from {}", configs.len(), cwd.display());
    Ok(configs)
}

/// Returns the path to the global configuration file (`~/.esq.toml`).
///
/// Returns `None` if the home directory cannot be determined.
pub fn global_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(CONFIG_FILENAME))
}

/// Like [`global_config_path`], but reports a missing home directory as an error.
pub fn require_global_config_path() -> Result<PathBuf, ConfigError> {
    global_config_path().ok_or(ConfigError::NoHomeDirectory)
}

/// Checks if a path is the global configuration file.
pub fn is_global_config(path: &Path) -> bool {
    global_config_path().is_some_and(|global| path == global)
}
