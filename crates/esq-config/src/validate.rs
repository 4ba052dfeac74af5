//! Configuration validation.
//!
//! Validates a loaded configuration and reports warnings for potential issues.

use std::fmt;

use crate::Config;

/// A non-fatal warning about the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// No default fields are configured, so queries without a `field:` prefix fail.
    NoDefaultFields,
    /// A default field name could never be written in a query.
    InvalidFieldName {
        /// The offending field name.
        field: String,
    },
    /// A default field is listed more than once.
    DuplicateField {
        /// The repeated field name.
        field: String,
    },
    /// Page size is zero, so every query returns no hits.
    ZeroPageSize,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoDefaultFields => write!(
                f,
                "no default fields configured; queries without a 'field:' prefix will fail"
            ),
            Self::InvalidFieldName { field } => {
                write!(
                    f,
                    "default field '{field}' is not a valid identifier (letters, digits, '_' and '.')"
                )
            }
            Self::DuplicateField { field } => {
                write!(f, "default field '{field}' is listed more than once")
            }
            Self::ZeroPageSize => write!(f, "page size is 0; queries will return no hits"),
        }
    }
}

/// Validates the configuration and returns any warnings.
pub fn validate_config(config: &Config) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();

    let fields = &config.query.default_fields;
    if fields.is_empty() {
        warnings.push(ConfigWarning::NoDefaultFields);
    }

    for (i, field) in fields.iter().enumerate() {
        if !is_identifier(field) {
            warnings.push(ConfigWarning::InvalidFieldName {
                field: field.clone(),
            });
        }
        // Report each duplicate once, at its first repeat
        if fields[..i].iter().filter(|seen| *seen == field).count() == 1 {
            warnings.push(ConfigWarning::DuplicateField {
                field: field.clone(),
            });
        }
    }

    if config.page.size == 0 {
        warnings.push(ConfigWarning::ZeroPageSize);
    }

    warnings
}

/// Checks that `name` matches the query language's identifier rule: `[A-Za-z0-9_.]+`.
fn is_identifier(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}
