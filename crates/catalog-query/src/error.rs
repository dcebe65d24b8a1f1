//! Error types for the catalog query engine.
//!
//! Only construction can fail. Decoding a parameter map and evaluating a
//! query never return an error: bad user input falls back to defaults and
//! empty results are ordinary [`ResultPage`](crate::ResultPage)s.

use thiserror::Error;

/// Errors raised while building filters, configurations or engines.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Filter kind token not recognized.
    #[error("unknown filter kind '{0}'. Expected one of: equals, oneOf, numericRange, substring")]
    UnknownFilterKind(String),

    /// Filter value shape does not match its kind.
    #[error("filter on '{field}' has kind '{kind}' but its value is not {expected}")]
    FilterShapeMismatch {
        field: String,
        kind: &'static str,
        expected: &'static str,
    },

    /// Filter value has the right shape but cannot be used.
    #[error("invalid value for filter '{field}': {reason}")]
    InvalidFilterValue { field: String, reason: String },

    /// Page size must be at least one.
    #[error("page size must be at least 1, got {0}")]
    InvalidPageSize(usize),

    /// Filter field collides with a reserved parameter key.
    #[error("'{0}' is a reserved parameter key and cannot be used as a filter field")]
    ReservedFilterField(String),

    /// Two filter declarations name the same field.
    #[error("filter field '{0}' is declared more than once")]
    DuplicateFilterField(String),

    /// Two sort rules share a key.
    #[error("sort key '{0}' is declared more than once")]
    DuplicateSortKey(String),

    /// Any other inconsistency in a catalog configuration.
    #[error("invalid catalog configuration: {0}")]
    InvalidConfig(String),

    /// Configuration JSON could not be parsed.
    #[error("failed to parse catalog configuration as JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration YAML could not be parsed.
    #[error("failed to parse catalog configuration as YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
