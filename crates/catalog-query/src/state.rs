//! Serializable query state.
//!
//! [`QueryState`] is the bookmarkable description of a catalog view:
//! search text, active filters, sort key and page. It is an immutable
//! value: every `with_*` method returns a new state.
//!
//! # Parameter map
//!
//! | Key | Value | Omitted when |
//! |-----|-------|--------------|
//! | `search` | raw text | empty |
//! | `sortBy` | sort key token | unset |
//! | `page` | decimal page number | page 1 |
//! | *filter field* | see [`FilterSpec::encode_value`] | no filter on the field |
//!
//! Decoding is total. Unknown keys are ignored, and malformed page
//! numbers, unknown sort keys and unreadable filter values fall back to
//! their defaults, because the parameter map comes from a user-editable
//! URL.

use std::collections::BTreeMap;

use crate::config::CatalogConfig;
use crate::predicate::FilterSpec;
use crate::sort::SortKey;

/// Flat string-keyed parameters, ordered by key.
pub type ParamMap = BTreeMap<String, String>;

/// Parameter key for the search text.
pub const SEARCH_KEY: &str = "search";
/// Parameter key for the sort key.
pub const SORT_KEY: &str = "sortBy";
/// Parameter key for the page number.
pub const PAGE_KEY: &str = "page";
/// Keys that cannot name a filter field.
pub const RESERVED_KEYS: [&str; 3] = [SEARCH_KEY, SORT_KEY, PAGE_KEY];

/// Search, filters, sort and page of one catalog view.
///
/// Holds at most one filter per field and never holds an absent filter.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState {
    search_text: String,
    filters: BTreeMap<String, FilterSpec>,
    sort_key: Option<SortKey>,
    page: usize,
}

impl Default for QueryState {
    fn default() -> Self {
        QueryState {
            search_text: String::new(),
            filters: BTreeMap::new(),
            sort_key: None,
            page: 1,
        }
    }
}

impl QueryState {
    /// Empty search, no filters, default sort, page 1.
    pub fn new() -> Self {
        QueryState::default()
    }

    /// The search text as entered.
    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    /// Active filters ordered by field.
    pub fn filters(&self) -> impl Iterator<Item = &FilterSpec> {
        self.filters.values()
    }

    /// The filter on `field`, if any.
    pub fn filter(&self, field: &str) -> Option<&FilterSpec> {
        self.filters.get(field)
    }

    /// The explicitly chosen sort key; `None` means the catalog default.
    pub fn sort_key(&self) -> Option<&SortKey> {
        self.sort_key.as_ref()
    }

    /// The requested page, at least 1.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Returns `true` if nothing differs from [`QueryState::new`].
    pub fn is_default(&self) -> bool {
        *self == QueryState::default()
    }

    /// Replaces the search text.
    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    /// Sets the filter on `spec.field()`, replacing any previous one.
    ///
    /// An absent spec (the `all` sentinel) removes the field's filter.
    pub fn with_filter(mut self, spec: FilterSpec) -> Self {
        if spec.is_absent() {
            self.filters.remove(spec.field());
        } else {
            self.filters.insert(spec.field().to_string(), spec);
        }
        self
    }

    /// Removes the filter on `field`.
    pub fn without_filter(mut self, field: &str) -> Self {
        self.filters.remove(field);
        self
    }

    /// Chooses a sort key.
    pub fn with_sort(mut self, key: impl Into<SortKey>) -> Self {
        self.sort_key = Some(key.into());
        self
    }

    /// Returns to the catalog's default sort.
    pub fn without_sort(mut self) -> Self {
        self.sort_key = None;
        self
    }

    /// Requests a page; values below 1 become 1.
    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page.max(1);
        self
    }

    /// The following page.
    pub fn next_page(self) -> Self {
        let page = self.page.saturating_add(1);
        self.with_page(page)
    }

    /// The preceding page, staying at 1.
    pub fn previous_page(self) -> Self {
        let page = self.page.saturating_sub(1);
        self.with_page(page)
    }

    /// Drops search text and filters and returns to page 1; keeps the sort.
    pub fn reset_filters(self) -> Self {
        QueryState {
            sort_key: self.sort_key,
            ..QueryState::default()
        }
    }

    /// Emits one entry per non-default field.
    pub fn encode(&self) -> ParamMap {
        let mut params = ParamMap::new();
        if !self.search_text.is_empty() {
            params.insert(SEARCH_KEY.to_string(), self.search_text.clone());
        }
        for spec in self.filters.values() {
            params.insert(spec.field().to_string(), spec.encode_value());
        }
        if let Some(key) = &self.sort_key {
            params.insert(SORT_KEY.to_string(), key.to_string());
        }
        if self.page > 1 {
            params.insert(PAGE_KEY.to_string(), self.page.to_string());
        }
        params
    }

    /// Reads a parameter map. Never fails.
    pub fn decode(params: &ParamMap, config: &CatalogConfig) -> Self {
        let mut state = QueryState::default();

        for (key, raw) in params {
            match key.as_str() {
                SEARCH_KEY => state.search_text = raw.clone(),
                SORT_KEY => {
                    let key = SortKey::new(raw.as_str());
                    if config.is_sort_key(&key) {
                        state.sort_key = Some(key);
                    } else {
                        tracing::trace!(raw = %raw, "unknown sort key, using default");
                    }
                }
                PAGE_KEY => {
                    state.page = match raw.trim().parse::<usize>() {
                        Ok(page) => page.max(1),
                        Err(_) => {
                            tracing::trace!(raw = %raw, "malformed page, using 1");
                            1
                        }
                    };
                }
                field => match config.filter_kind(field) {
                    Some(kind) => match FilterSpec::parse(field, kind, raw) {
                        Ok(Some(spec)) => {
                            state.filters.insert(field.to_string(), spec);
                        }
                        Ok(None) => {}
                        Err(err) => {
                            tracing::trace!(key = %field, raw = %raw, error = %err, "dropping unreadable filter");
                        }
                    },
                    None => tracing::trace!(key = %field, "ignoring unknown parameter"),
                },
            }
        }

        state
    }

    /// Renders the state as a query string (without the leading `?`).
    pub fn to_query_string(&self) -> String {
        self.encode()
            .iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(key),
                    urlencoding::encode(value)
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Reads a query string, with or without a leading `?`. Never fails.
    pub fn from_query_string(query: &str, config: &CatalogConfig) -> Self {
        QueryState::decode(&parse_query_string(query), config)
    }
}

/// Splits a form-encoded query string into a parameter map.
///
/// `+` reads as a space. Pairs that do not percent-decode to UTF-8 are
/// skipped; a repeated key keeps its last value.
pub fn parse_query_string(query: &str) -> ParamMap {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut params = ParamMap::new();

    for pair in query.split('&').filter(|pair| !pair.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        match (form_decode(key), form_decode(value)) {
            (Some(key), Some(value)) => {
                params.insert(key, value);
            }
            _ => tracing::trace!(pair = %pair, "skipping undecodable query pair"),
        }
    }

    params
}

fn form_decode(raw: &str) -> Option<String> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced).ok().map(|s| s.into_owned())
}
