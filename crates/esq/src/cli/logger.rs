//! Logger setup for the `esq` binary.

use env_logger::{Builder, Env};

/// Maps the number of `-v` flags to a default log filter.
fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Installs the global logger, writing to stderr.
///
/// `RUST_LOG` overrides the filter derived from `verbose`.
pub fn init_logger(verbose: u8) {
    Builder::from_env(Env::default().default_filter_or(default_filter(verbose)))
        .format_timestamp(None)
        .format_target(false)
        .init();
}
