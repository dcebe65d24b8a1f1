//! Single-field edits to a query state.
//!
//! A view changes one thing at a time: the search box, one filter, the
//! sort selector or the pager. Changing anything but the page sends the
//! user back to page 1, since the old page number no longer refers to the
//! same records.

use anyhow::{anyhow, bail, Context, Result};
use catalog_query::{CatalogConfig, FilterSpec, QueryState, PAGE_KEY, SEARCH_KEY, SORT_KEY};

/// Parses a `key=value` edit.
pub fn parse_assignment(raw: &str) -> Result<(String, String)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("expected key=value, got '{}'", raw))?;
    let key = key.trim();
    if key.is_empty() {
        bail!("missing key in '{}'", raw);
    }
    Ok((key.to_string(), value.to_string()))
}

/// Applies one edit. Unlike decoding, edits are strict: an unknown key or
/// an unreadable value is an error the user should see.
pub fn apply_edit(
    state: QueryState,
    key: &str,
    value: &str,
    config: &CatalogConfig,
) -> Result<QueryState> {
    let edited = match key {
        PAGE_KEY => {
            let page = value
                .trim()
                .parse::<usize>()
                .with_context(|| format!("invalid page '{}'", value))?;
            return Ok(state.with_page(page));
        }
        SEARCH_KEY => state.with_search(value),
        SORT_KEY if value.trim().is_empty() => state.without_sort(),
        SORT_KEY => {
            let key = value.trim().into();
            if !config.is_sort_key(&key) {
                bail!("unknown sort key '{}'", value);
            }
            state.with_sort(key)
        }
        field => {
            let kind = config
                .filter_kind(field)
                .ok_or_else(|| anyhow!("'{}' is not a filter of this catalog", field))?;
            match FilterSpec::parse(field, kind, value)? {
                Some(spec) => state.with_filter(spec),
                None => state.without_filter(field),
            }
        }
    };
    tracing::debug!(key, value, "applied edit");
    Ok(edited.with_page(1))
}
