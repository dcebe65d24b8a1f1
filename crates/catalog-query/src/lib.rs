//! Catalog query engine for in-memory record collections.
//!
//! One engine serves every list view of a catalog (venues, events,
//! sponsors, transactions): free-text search, field filters, a named sort
//! and a page window, all carried by a [`QueryState`] that encodes to and
//! from a flat parameter map so any view can be bookmarked.
//!
//! # Quick Start
//!
//! ```rust
//! use catalog_query::{
//!     CatalogConfig, CatalogQueryEngine, Comparator, FieldAccessor, FilterKind, Number,
//!     QueryState, Value,
//! };
//!
//! struct Venue {
//!     name: String,
//!     category: String,
//!     price: u32,
//! }
//!
//! impl FieldAccessor for Venue {
//!     fn field_value(&self, field: &str) -> Value<'_> {
//!         match field {
//!             "name" => Value::String(&self.name),
//!             "category" => Value::String(&self.category),
//!             "price" => Value::Number(Number::from(self.price)),
//!             _ => Value::None,
//!         }
//!     }
//! }
//!
//! let venues = vec![
//!     Venue { name: "Grand Palais".into(), category: "runway".into(), price: 9000 },
//!     Venue { name: "Atelier Nord".into(), category: "showroom".into(), price: 1200 },
//!     Venue { name: "Quai Ouest".into(), category: "runway".into(), price: 4000 },
//! ];
//!
//! let engine = CatalogQueryEngine::new(
//!     CatalogConfig::builder(6)
//!         .search_fields(["name"])
//!         .filter("category", FilterKind::Equals)
//!         .sort("price-low", Comparator::ascending("price"))
//!         .build()
//!         .unwrap(),
//! )
//! .unwrap();
//!
//! let state = engine.decode_query_string("?category=runway&sortBy=price-low");
//! let page = engine.evaluate(&venues, &state).unwrap();
//!
//! assert_eq!(page.total_items, 2);
//! assert_eq!(page.items[0].name, "Quai Ouest");
//! assert_eq!(state.to_query_string(), "category=runway&sortBy=price-low");
//! ```
//!
//! # Pipeline
//!
//! ```text
//! records ─▶ filter (all filters ∧ search) ─▶ stable sort ─▶ page window
//! ```
//!
//! | Filter kind | Parameter value | Matches when |
//! |-------------|-----------------|--------------|
//! | `equals` | `runway` | field equals the text, case-insensitive |
//! | `oneOf` | `gold,platinum` | field is one of the members, case-insensitive |
//! | `numericRange` | `500-2000`, `2000+`, `-500` | `min <= field < max` |
//! | `substring` | `paris` | field contains the text, case-insensitive |
//!
//! The value `all` (or an empty value) means "no filter" for every kind.
//!
//! # Determinism
//!
//! Evaluation is a pure function of records, state and configuration.
//! Sorting is stable and every comparator is a total order, so the same
//! inputs always produce the same pages.

mod accessor;
mod comparator;
mod config;
mod engine;
mod error;
mod filter;
mod paginate;
mod predicate;
mod sort;
mod state;
mod value;

pub use accessor::FieldAccessor;
pub use comparator::{compare_values, Comparator, Dir, OrderBy};
pub use config::{CatalogConfig, CatalogConfigBuilder, FilterDecl};
pub use engine::{evaluate, CatalogQueryEngine};
pub use error::{CatalogError, Result};
pub use filter::FilterEngine;
pub use paginate::{Paginator, ResultPage};
pub use predicate::{
    contains, equals, in_range, one_of, FilterKind, FilterSpec, FilterValue, NumericRange,
    Predicate, ALL_SENTINEL,
};
pub use sort::{SortEngine, SortKey, SortRule};
pub use state::{
    parse_query_string, ParamMap, QueryState, PAGE_KEY, RESERVED_KEYS, SEARCH_KEY, SORT_KEY,
};
pub use value::{fold, Number, Value};
