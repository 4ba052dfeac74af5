//! Configuration merging.
//!
//! Merges multiple `RawConfig` files into a single resolved `Config`, applying precedence
//! rules.

use esq_query::Pagination;

use crate::{
    Config, QuerySettings,
    parse::{ParsedConfig, RawPageSettings, RawQuerySettings},
};

/// Merges multiple configuration files into a single resolved `Config`.
///
/// Configs should be provided in precedence order: highest precedence first (closest to CWD),
/// lowest precedence last (global config).
///
/// Merge rules:
/// - Scalar settings: first defined value wins (highest precedence)
/// - `default_fields`: replaced as a whole; lists are never concatenated
pub fn merge_configs(configs: &[ParsedConfig]) -> Config {
    if configs.is_empty() {
        return Config::default();
    }

    let query = merge_query_settings(configs);
    let page = merge_page_settings(configs);
    let sources = configs.iter().map(|c| c.path.clone()).collect();

    Config {
        query,
        page,
        sources,
    }
}

/// Merges query settings, taking the first defined value for each field.
fn merge_query_settings(configs: &[ParsedConfig]) -> QuerySettings {
    let mut result = QuerySettings::default();

    // Lowest precedence first, so higher precedence overwrites
    for parsed in configs.iter().rev() {
        if let Some(ref query) = parsed.config.query {
            apply_raw_query(&mut result, query);
        }
    }

    result
}

/// Applies raw query settings to result, overwriting any present values.
fn apply_raw_query(result: &mut QuerySettings, raw: &RawQuerySettings) {
    if let Some(ref v) = raw.default_fields {
        result.default_fields.clone_from(v);
    }
}

/// Merges page settings, taking the first defined value for each field.
fn merge_page_settings(configs: &[ParsedConfig]) -> Pagination {
    let mut result = Pagination::default();

    for parsed in configs.iter().rev() {
        if let Some(ref page) = parsed.config.page {
            apply_raw_page(&mut result, page);
        }
    }

    result
}

/// Applies raw page settings to result, overwriting any present values.
fn apply_raw_page(result: &mut Pagination, raw: &RawPageSettings) {
    if let Some(v) = raw.from {
        result.from = v;
    }
    if let Some(v) = raw.size {
        result.size = v;
    }
}
