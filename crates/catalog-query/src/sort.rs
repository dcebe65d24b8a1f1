//! Sort keys and the sort engine.
//!
//! A [`SortKey`] is the token a view puts in its `sortBy` parameter
//! (`price-low`, `rating`, ...). The [`SortEngine`] maps each known key to
//! exactly one [`Comparator`] and sorts stably, so records the comparator
//! considers equal keep their input order and page boundaries do not move
//! between evaluations of the same data.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::comparator::{Comparator, OrderBy};
use crate::error::{CatalogError, Result};
use crate::value::Value;

/// Token selecting one comparator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortKey(String);

impl SortKey {
    /// The built-in key: original collection order.
    pub const NEWEST: &'static str = "newest";

    /// Creates a sort key from a token.
    pub fn new(key: impl Into<String>) -> Self {
        SortKey(key.into())
    }

    /// The built-in `newest` key.
    pub fn newest() -> Self {
        SortKey::new(Self::NEWEST)
    }

    /// Returns the token.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for the built-in `newest` key.
    pub fn is_newest(&self) -> bool {
        self.0 == Self::NEWEST
    }
}

impl Default for SortKey {
    fn default() -> Self {
        SortKey::newest()
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SortKey {
    fn from(s: &str) -> Self {
        SortKey::new(s)
    }
}

impl From<String> for SortKey {
    fn from(s: String) -> Self {
        SortKey(s)
    }
}

/// One sort option as declared in a catalog configuration.
///
/// An empty `order` declares another name for original order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortRule {
    pub key: SortKey,
    #[serde(default)]
    pub order: Vec<OrderBy>,
}

impl SortRule {
    /// Declares `key` as sorting with `comparator`.
    pub fn new(key: impl Into<SortKey>, comparator: Comparator) -> Self {
        SortRule {
            key: key.into(),
            order: comparator.keys().to_vec(),
        }
    }

    /// The comparator this rule selects.
    pub fn comparator(&self) -> Comparator {
        Comparator::new(self.order.clone())
    }
}

/// Resolves sort keys to comparators and sorts stably.
#[derive(Debug, Clone)]
pub struct SortEngine {
    rules: Vec<(SortKey, Comparator)>,
    default_key: SortKey,
    default_comparator: Comparator,
}

impl SortEngine {
    /// Builds an engine from declared rules.
    ///
    /// `newest` is always available as the identity comparator unless a
    /// rule redefines it. Fails on duplicate keys or a `default_key` that
    /// names no rule.
    pub fn new(rules: &[SortRule], default_key: SortKey) -> Result<Self> {
        let mut resolved: Vec<(SortKey, Comparator)> = Vec::with_capacity(rules.len() + 1);
        for rule in rules {
            if resolved.iter().any(|(key, _)| *key == rule.key) {
                return Err(CatalogError::DuplicateSortKey(rule.key.to_string()));
            }
            resolved.push((rule.key.clone(), rule.comparator()));
        }
        if !resolved.iter().any(|(key, _)| key.is_newest()) {
            resolved.push((SortKey::newest(), Comparator::identity()));
        }
        let default_comparator = resolved
            .iter()
            .find(|(key, _)| *key == default_key)
            .map(|(_, comparator)| comparator.clone())
            .ok_or_else(|| {
                CatalogError::InvalidConfig(format!(
                    "default sort '{}' is not a declared sort key",
                    default_key
                ))
            })?;
        Ok(SortEngine {
            rules: resolved,
            default_key,
            default_comparator,
        })
    }

    /// The key used when a requested key is unknown.
    pub fn default_key(&self) -> &SortKey {
        &self.default_key
    }

    /// Returns `true` if `key` names a declared comparator.
    pub fn is_known(&self, key: &SortKey) -> bool {
        self.rules.iter().any(|(k, _)| k == key)
    }

    /// All selectable keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &SortKey> {
        self.rules.iter().map(|(key, _)| key)
    }

    /// Resolves a key, falling back to the default for unknown keys.
    pub fn resolve(&self, key: &SortKey) -> (&SortKey, &Comparator) {
        self.rules
            .iter()
            .find(|(k, _)| k == key)
            .map(|(key, comparator)| (key, comparator))
            .unwrap_or((&self.default_key, &self.default_comparator))
    }

    /// Stably sorts `records` by the comparator `key` resolves to.
    pub fn apply<T, F>(&self, records: &mut [&T], key: &SortKey, accessor: F)
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        let (resolved, comparator) = self.resolve(key);
        if resolved != key {
            tracing::debug!(requested = %key, using = %resolved, "unknown sort key, using default");
        }
        if comparator.is_identity() {
            return;
        }
        records.sort_by(|a, b| comparator.compare(*a, *b, &accessor));
    }
}

impl Default for SortEngine {
    fn default() -> Self {
        SortEngine {
            rules: vec![(SortKey::newest(), Comparator::identity())],
            default_key: SortKey::newest(),
            default_comparator: Comparator::identity(),
        }
    }
}
