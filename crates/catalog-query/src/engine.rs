//! Query orchestration: filter, then sort, then paginate.
//!
//! Sorting runs over the filtered subset only, so tie-breaks and page
//! windows are computed over the records that are actually shown.

use crate::accessor::FieldAccessor;
use crate::config::CatalogConfig;
use crate::error::Result;
use crate::filter::FilterEngine;
use crate::paginate::{Paginator, ResultPage};
use crate::sort::SortEngine;
use crate::state::{ParamMap, QueryState};
use crate::value::Value;

/// A validated catalog configuration ready to evaluate queries.
///
/// Build one per catalog view and reuse it; evaluation does no I/O and
/// keeps no state between calls.
#[derive(Debug, Clone)]
pub struct CatalogQueryEngine {
    config: CatalogConfig,
    sorter: SortEngine,
    paginator: Paginator,
}

impl CatalogQueryEngine {
    /// Validates `config` and prepares its sort rules.
    pub fn new(config: CatalogConfig) -> Result<Self> {
        config.validate()?;
        let sorter = config.sort_engine()?;
        let paginator = Paginator::new(config.page_size)?;
        Ok(CatalogQueryEngine {
            config,
            sorter,
            paginator,
        })
    }

    /// The validated configuration this engine evaluates with.
    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Reads a parameter map against this catalog's declarations.
    pub fn decode(&self, params: &ParamMap) -> QueryState {
        QueryState::decode(params, &self.config)
    }

    /// Reads a query string against this catalog's declarations.
    pub fn decode_query_string(&self, query: &str) -> QueryState {
        QueryState::from_query_string(query, &self.config)
    }

    /// Evaluates `state` over `records` using a field accessor function.
    ///
    /// Fails only if a filter in `state` cannot be compiled, which cannot
    /// happen for states built from validated [`FilterSpec`](crate::FilterSpec)s.
    pub fn evaluate_with<'a, T, F>(
        &self,
        records: &'a [T],
        state: &QueryState,
        accessor: F,
    ) -> Result<ResultPage<&'a T>>
    where
        for<'b> F: Fn(&'b T, &str) -> Value<'b>,
    {
        let filter = FilterEngine::new(
            state.filters(),
            state.search_text(),
            &self.config.searchable_fields,
        )?;
        let mut matched = filter.apply(records, &accessor);

        let sort_key = state.sort_key().unwrap_or(&self.config.default_sort);
        self.sorter.apply(&mut matched, sort_key, &accessor);

        let page = self.paginator.paginate(matched, state.page());

        tracing::debug!(
            records = records.len(),
            total_items = page.total_items,
            total_pages = page.total_pages,
            page = page.page,
            sort_key = %sort_key,
            filters = filter.active_filters(),
            "evaluated catalog query"
        );

        Ok(page)
    }

    /// Evaluates `state` over records that expose their own fields.
    pub fn evaluate<'a, T>(&self, records: &'a [T], state: &QueryState) -> Result<ResultPage<&'a T>>
    where
        T: FieldAccessor,
    {
        self.evaluate_with(records, state, T::accessor)
    }
}

/// One-shot evaluation with a configuration that has not been prepared.
///
/// ```
/// use catalog_query::{evaluate, CatalogConfig, Comparator, QueryState};
/// use serde_json::json;
///
/// let records = vec![
///     json!({ "name": "A", "price": 100 }),
///     json!({ "name": "B", "price": 50 }),
///     json!({ "name": "C", "price": 200 }),
/// ];
/// let config = CatalogConfig::builder(2)
///     .sort("price-low", Comparator::ascending("price"))
///     .build()
///     .unwrap();
///
/// let page = evaluate(&records, &QueryState::new().with_sort("price-low"), &config).unwrap();
/// assert_eq!(page.items[0]["name"], "B");
/// assert_eq!(page.total_pages, 2);
/// ```
pub fn evaluate<'a, T>(
    records: &'a [T],
    state: &QueryState,
    config: &CatalogConfig,
) -> Result<ResultPage<&'a T>>
where
    T: FieldAccessor,
{
    CatalogQueryEngine::new(config.clone())?.evaluate(records, state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparator::Comparator;
    use crate::predicate::{FilterKind, FilterSpec};
    use crate::value::Number;

    struct Item {
        name: &'static str,
        category: &'static str,
        price: i64,
    }

    fn accessor<'a>(item: &'a Item, field: &str) -> Value<'a> {
        match field {
            "name" => Value::String(item.name),
            "category" => Value::String(item.category),
            "price" => Value::Number(Number::I64(item.price)),
            _ => Value::None,
        }
    }

    fn items() -> Vec<Item> {
        vec![
            Item { name: "A", category: "runway", price: 100 },
            Item { name: "B", category: "showroom", price: 50 },
            Item { name: "C", category: "runway", price: 200 },
        ]
    }

    fn engine() -> CatalogQueryEngine {
        let config = CatalogConfig::builder(2)
            .search_fields(["name"])
            .filter("category", FilterKind::Equals)
            .sort("price-low", Comparator::ascending("price"))
            .build()
            .unwrap();
        CatalogQueryEngine::new(config).unwrap()
    }

    fn names(page: &ResultPage<&Item>) -> Vec<&'static str> {
        page.items.iter().map(|item| item.name).collect()
    }

    #[test]
    fn sorts_then_pages() {
        let items = items();
        let engine = engine();
        let state = QueryState::new().with_sort("price-low");

        let first = engine.evaluate_with(&items, &state, accessor).unwrap();
        assert_eq!(names(&first), ["B", "A"]);
        assert_eq!(first.total_pages, 2);

        let second = engine
            .evaluate_with(&items, &state.clone().next_page(), accessor)
            .unwrap();
        assert_eq!(names(&second), ["C"]);
    }

    #[test]
    fn search_narrows_before_paging() {
        let items = items();
        let state = QueryState::new().with_search("b");
        let page = engine().evaluate_with(&items, &state, accessor).unwrap();
        assert_eq!(names(&page), ["B"]);
        assert_eq!(page.total_items, 1);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn filter_then_sort() {
        let items = items();
        let state = QueryState::new()
            .with_filter(FilterSpec::equals("category", "Runway").unwrap())
            .with_sort("price-low");
        let page = engine().evaluate_with(&items, &state, accessor).unwrap();
        assert_eq!(names(&page), ["A", "C"]);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn page_past_the_end() {
        let items = items();
        let page = engine()
            .evaluate_with(&items, &QueryState::new().with_page(99), accessor)
            .unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.page, 99);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.total_items, 3);
    }

    #[test]
    fn decoded_state_evaluates() {
        let items = items();
        let engine = engine();
        let state = engine.decode_query_string("?category=all&sortBy=price-low&page=abc");
        let page = engine.evaluate_with(&items, &state, accessor).unwrap();
        assert_eq!(names(&page), ["B", "A"]);
    }

    #[test]
    fn default_sort_applies_when_unset() {
        let config = CatalogConfig::builder(5)
            .sort("price-low", Comparator::ascending("price"))
            .default_sort("price-low")
            .build()
            .unwrap();
        let engine = CatalogQueryEngine::new(config).unwrap();
        let items = items();

        let page = engine.evaluate_with(&items, &QueryState::new(), accessor).unwrap();
        assert_eq!(names(&page), ["B", "A", "C"]);

        let page = engine
            .evaluate_with(&items, &QueryState::new().with_sort("newest"), accessor)
            .unwrap();
        assert_eq!(names(&page), ["A", "B", "C"]);
    }

    #[test]
    fn invalid_config_rejected() {
        let mut config = CatalogConfig::builder(2).build().unwrap();
        config.page_size = 0;
        assert!(CatalogQueryEngine::new(config).is_err());
    }
}
