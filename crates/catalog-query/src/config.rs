//! Per-catalog configuration.
//!
//! One engine serves every catalog view; what differs between venues,
//! events, sponsors and transactions is declared here: page size, the
//! fields free-text search looks at, which parameter keys are filters and
//! how their values parse, and which sort keys exist.
//!
//! Configurations are built in code with [`CatalogConfig::builder`] or
//! loaded from YAML/JSON:
//!
//! ```
//! use catalog_query::CatalogConfig;
//!
//! let config = CatalogConfig::from_yaml_str(r#"
//! page_size: 6
//! searchable_fields: [name, location, description]
//! filters:
//!   - { field: category, kind: equals }
//!   - { field: capacity, kind: numericRange }
//! sorts:
//!   - key: price-low
//!     order: [{ field: price, dir: asc }]
//!   - key: rating
//!     order: [{ field: rating, dir: desc }, { field: name }]
//! "#).unwrap();
//!
//! assert_eq!(config.page_size, 6);
//! assert!(config.default_sort.is_newest());
//! ```

use serde::{Deserialize, Serialize};

use crate::comparator::Comparator;
use crate::error::{CatalogError, Result};
use crate::paginate::Paginator;
use crate::predicate::FilterKind;
use crate::sort::{SortEngine, SortKey, SortRule};
use crate::state::RESERVED_KEYS;

/// Declares a filterable field and how its parameter value is read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterDecl {
    pub field: String,
    pub kind: FilterKind,
}

/// Everything that varies between catalog views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub page_size: usize,
    #[serde(default)]
    pub searchable_fields: Vec<String>,
    #[serde(default)]
    pub filters: Vec<FilterDecl>,
    #[serde(default)]
    pub sorts: Vec<SortRule>,
    #[serde(default)]
    pub default_sort: SortKey,
}

impl CatalogConfig {
    /// Starts a configuration with the given page size.
    pub fn builder(page_size: usize) -> CatalogConfigBuilder {
        CatalogConfigBuilder {
            config: CatalogConfig {
                page_size,
                searchable_fields: Vec::new(),
                filters: Vec::new(),
                sorts: Vec::new(),
                default_sort: SortKey::newest(),
            },
        }
    }

    /// Parses and validates a YAML configuration.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: CatalogConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: CatalogConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the configuration for inconsistencies.
    pub fn validate(&self) -> Result<()> {
        Paginator::new(self.page_size)?;

        for (i, decl) in self.filters.iter().enumerate() {
            if decl.field.is_empty() {
                return Err(CatalogError::InvalidConfig(
                    "filter field names must not be empty".to_string(),
                ));
            }
            if RESERVED_KEYS.contains(&decl.field.as_str()) {
                return Err(CatalogError::ReservedFilterField(decl.field.clone()));
            }
            if self.filters[..i].iter().any(|d| d.field == decl.field) {
                return Err(CatalogError::DuplicateFilterField(decl.field.clone()));
            }
        }

        self.sort_engine().map(|_| ())
    }

    /// The declared kind of a filter field.
    pub fn filter_kind(&self, field: &str) -> Option<FilterKind> {
        self.filters
            .iter()
            .find(|decl| decl.field == field)
            .map(|decl| decl.kind)
    }

    /// Returns `true` if `key` is selectable in this catalog.
    pub fn is_sort_key(&self, key: &SortKey) -> bool {
        key.is_newest() || self.sorts.iter().any(|rule| rule.key == *key)
    }

    pub(crate) fn sort_engine(&self) -> Result<SortEngine> {
        SortEngine::new(&self.sorts, self.default_sort.clone())
    }
}

/// Builder for [`CatalogConfig`].
#[derive(Debug, Clone)]
pub struct CatalogConfigBuilder {
    config: CatalogConfig,
}

impl CatalogConfigBuilder {
    /// Sets the fields free-text search matches against.
    pub fn search_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.searchable_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Declares a filterable field.
    pub fn filter(mut self, field: impl Into<String>, kind: FilterKind) -> Self {
        self.config.filters.push(FilterDecl {
            field: field.into(),
            kind,
        });
        self
    }

    /// Declares a sort key.
    pub fn sort(mut self, key: impl Into<SortKey>, comparator: Comparator) -> Self {
        self.config.sorts.push(SortRule::new(key, comparator));
        self
    }

    /// Sets the key used when none or an unknown one is requested.
    pub fn default_sort(mut self, key: impl Into<SortKey>) -> Self {
        self.config.default_sort = key.into();
        self
    }

    /// Validates and returns the configuration.
    pub fn build(self) -> Result<CatalogConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
