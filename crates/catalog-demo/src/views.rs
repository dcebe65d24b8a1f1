//! Preset catalog views.
//!
//! Each dashboard page is one [`CatalogConfig`] loaded from the YAML
//! preset embedded next to this crate.

use anyhow::{Context, Result};
use catalog_query::CatalogConfig;
use clap::ValueEnum;

/// The catalogs the dashboard lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CatalogName {
    Venues,
    Events,
    Sponsors,
    Transactions,
}

impl CatalogName {
    pub fn as_str(self) -> &'static str {
        match self {
            CatalogName::Venues => "venues",
            CatalogName::Events => "events",
            CatalogName::Sponsors => "sponsors",
            CatalogName::Transactions => "transactions",
        }
    }

    fn preset(self) -> &'static str {
        match self {
            CatalogName::Venues => include_str!("../views/venues.yaml"),
            CatalogName::Events => include_str!("../views/events.yaml"),
            CatalogName::Sponsors => include_str!("../views/sponsors.yaml"),
            CatalogName::Transactions => include_str!("../views/transactions.yaml"),
        }
    }

    /// Loads the view configuration, optionally overriding its page size.
    pub fn config(self, page_size: Option<usize>) -> Result<CatalogConfig> {
        let mut config = CatalogConfig::from_yaml_str(self.preset())
            .with_context(|| format!("invalid {} view preset", self.as_str()))?;
        if let Some(page_size) = page_size {
            config.page_size = page_size;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_query::{FilterKind, SortKey};

    #[test]
    fn every_preset_is_valid() {
        for name in CatalogName::value_variants() {
            let config = name.config(None).unwrap();
            assert!(config.page_size > 0, "{}", name.as_str());
        }
    }

    #[test]
    fn venue_preset_matches_listing_page() {
        let config = CatalogName::Venues.config(None).unwrap();
        assert_eq!(config.page_size, 6);
        assert_eq!(config.filter_kind("capacity"), Some(FilterKind::NumericRange));
        assert_eq!(config.filter_kind("location"), Some(FilterKind::Substring));
        for key in ["price-low", "price-high", "rating", "capacity", "newest"] {
            assert!(config.is_sort_key(&SortKey::from(key)), "{}", key);
        }
    }

    #[test]
    fn page_size_override() {
        let config = CatalogName::Sponsors.config(Some(3)).unwrap();
        assert_eq!(config.page_size, 3);
        assert_eq!(config.default_sort.as_str(), "contribution");
    }
}
