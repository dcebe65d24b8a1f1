//! End-to-end scenarios over JSON records.

use catalog_query::{
    evaluate, CatalogConfig, CatalogQueryEngine, Comparator, FilterKind, FilterSpec, ParamMap,
    QueryState,
};
use serde_json::{json, Value as JsonValue};

fn records() -> Vec<JsonValue> {
    vec![
        json!({ "name": "A", "price": 100 }),
        json!({ "name": "B", "price": 50 }),
        json!({ "name": "C", "price": 200 }),
    ]
}

fn config() -> CatalogConfig {
    CatalogConfig::builder(2)
        .search_fields(["name"])
        .filter("category", FilterKind::Equals)
        .sort("price-low", Comparator::ascending("price"))
        .build()
        .unwrap()
}

fn names(items: &[&JsonValue]) -> Vec<String> {
    items
        .iter()
        .map(|record| record["name"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[test]
fn first_page_sorted_by_price() {
    let state = QueryState::new().with_sort("price-low");
    let records = records();
    let page = evaluate(&records, &state, &config()).unwrap();
    assert_eq!(names(&page.items), ["B", "A"]);
    assert_eq!(page.total_pages, 2);
}

#[test]
fn second_page_holds_the_rest() {
    let state = QueryState::new().with_sort("price-low").with_page(2);
    let records = records();
    let page = evaluate(&records, &state, &config()).unwrap();
    assert_eq!(names(&page.items), ["C"]);
}

#[test]
fn search_matches_name() {
    let state = QueryState::new().with_search("b");
    let records = records();
    let page = evaluate(&records, &state, &config()).unwrap();
    assert_eq!(names(&page.items), ["B"]);
    assert_eq!(page.total_items, 1);
    assert_eq!(page.total_pages, 1);
}

#[test]
fn all_sentinel_is_no_filter() {
    let records = records();
    let engine = CatalogQueryEngine::new(config()).unwrap();

    let unfiltered = engine.evaluate(&records, &QueryState::new()).unwrap();

    let mut params = ParamMap::new();
    params.insert("category".into(), "all".into());
    let decoded = engine.evaluate(&records, &engine.decode(&params)).unwrap();

    let programmatic = QueryState::new().with_filter(FilterSpec::equals("category", "all").unwrap());
    let built = engine.evaluate(&records, &programmatic).unwrap();

    assert_eq!(decoded, unfiltered);
    assert_eq!(built, unfiltered);
}

#[test]
fn page_past_the_end_is_reported_as_requested() {
    let state = QueryState::new().with_page(99);
    let records = records();
    let page = evaluate(&records, &state, &config()).unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.page, 99);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.total_items, 3);
    assert_eq!(page.clamped_page(), 2);
}

#[test]
fn malformed_page_decodes_to_one() {
    let mut params = ParamMap::new();
    params.insert("page".into(), "abc".into());
    assert_eq!(QueryState::decode(&params, &config()).page(), 1);
}

#[test]
fn edit_then_reencode_lifecycle() {
    let engine = CatalogQueryEngine::new(config()).unwrap();
    let records = records();

    let state = engine.decode_query_string("?sortBy=price-low&page=2");
    let edited = state
        .with_search("a")
        .with_page(1);
    assert_eq!(edited.to_query_string(), "search=a&sortBy=price-low");

    let page = engine.evaluate(&records, &edited).unwrap();
    assert_eq!(names(&page.items), ["A"]);
    assert!(!page.has_next());
}

#[test]
fn records_missing_fields_sort_last_and_fail_filters() {
    let records = vec![
        json!({ "name": "NoPrice" }),
        json!({ "name": "Cheap", "price": 10, "category": "runway" }),
        json!({ "name": "Dear", "price": 90, "category": "runway" }),
    ];
    let config = CatalogConfig::builder(10)
        .filter("category", FilterKind::Equals)
        .sort("price-high", Comparator::descending("price"))
        .build()
        .unwrap();

    let sorted = evaluate(&records, &QueryState::new().with_sort("price-high"), &config).unwrap();
    assert_eq!(names(&sorted.items), ["Dear", "Cheap", "NoPrice"]);

    let filtered = evaluate(
        &records,
        &QueryState::new().with_filter(FilterSpec::equals("category", "runway").unwrap()),
        &config,
    )
    .unwrap();
    assert_eq!(filtered.total_items, 2);
}

#[test]
fn result_page_serializes_for_views() {
    let records = records();
    let page = evaluate(&records, &QueryState::new(), &config()).unwrap();
    let json = serde_json::to_value(&page).unwrap();
    assert_eq!(
        json,
        json!({
            "items": [{ "name": "A", "price": 100 }, { "name": "B", "price": 50 }],
            "page": 1,
            "pageSize": 2,
            "totalItems": 3,
            "totalPages": 2,
        })
    );
}
