//! Derive macro for `catalog-query` records.
//!
//! - [`Catalog`] - Generate a `FieldAccessor` implementation and field name
//!   constants from struct field annotations

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod catalog;

/// Derives `catalog_query::FieldAccessor` for a record struct.
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `String` | Text field (`String`, `&str`, anything that derefs to `str`) |
/// | `Number` | Numeric field (any integer or float type) |
/// | `Bool` | Boolean field |
/// | `optional` | The field is an `Option<_>`; `None` reads as missing |
/// | `skip` | Exclude this field from queries |
/// | `rename = "..."` | Use a custom name in queries |
///
/// Fields without a `#[catalog(...)]` type are not queryable.
///
/// # Generated Code
///
/// 1. Field name constants (e.g., `Venue::NAME`, `Venue::PRICE_PER_DAY`)
/// 2. `CATALOG_FIELDS`, every queryable name in declaration order
/// 3. Implementation of `FieldAccessor::field_value()`
///
/// # Example
///
/// ```ignore
/// use catalog_macros::Catalog;
/// use catalog_query::{CatalogConfig, CatalogQueryEngine, Comparator, QueryState};
///
/// #[derive(Catalog)]
/// struct Venue {
///     #[catalog(String)]
///     name: String,
///
///     #[catalog(Number, rename = "pricePerDay")]
///     price_per_day: u32,
///
///     #[catalog(Number, optional)]
///     rating: Option<f32>,
///
///     #[catalog(skip)]
///     internal_id: u64,
/// }
///
/// let venues = vec![
///     Venue { name: "Grand Palais".into(), price_per_day: 9000, rating: Some(4.9), internal_id: 1 },
///     Venue { name: "Atelier Nord".into(), price_per_day: 1200, rating: None, internal_id: 2 },
/// ];
///
/// let engine = CatalogQueryEngine::new(
///     CatalogConfig::builder(10)
///         .sort("price-low", Comparator::ascending(Venue::PRICE_PER_DAY))
///         .build()?,
/// )?;
/// let page = engine.evaluate(&venues, &QueryState::new().with_sort("price-low"))?;
/// assert_eq!(page.items[0].name, "Atelier Nord");
/// ```
#[proc_macro_derive(Catalog, attributes(catalog))]
pub fn catalog_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    catalog::catalog_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
