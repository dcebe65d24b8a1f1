//! Composition of active filters and free-text search.
//!
//! ```text
//! match = (every active filter predicate matches)
//!       ∧ (search text is empty, OR some searchable field contains it)
//! ```
//!
//! Absent filters (the `all` sentinel) are dropped before composition.
//! Filtering never reorders: survivors keep their input order.

use crate::error::Result;
use crate::predicate::{contains, FilterSpec, Predicate};
use crate::value::{fold, Value};

/// A compiled conjunction of filter predicates plus an optional search
/// disjunction over configured fields.
#[derive(Debug, Clone, Default)]
pub struct FilterEngine {
    predicates: Vec<Predicate>,
    search: Option<Search>,
}

#[derive(Debug, Clone)]
struct Search {
    needle: String,
    fields: Vec<String>,
}

impl FilterEngine {
    /// Compiles the active filters and the search term.
    ///
    /// Whitespace-only search text is treated as empty. Fails on the first
    /// filter whose value does not fit its kind.
    pub fn new<'s, I>(filters: I, search_text: &str, search_fields: &[String]) -> Result<Self>
    where
        I: IntoIterator<Item = &'s FilterSpec>,
    {
        let predicates = filters
            .into_iter()
            .filter(|spec| !spec.is_absent())
            .map(Predicate::build)
            .collect::<Result<Vec<_>>>()?;

        let needle = search_text.trim();
        let search = (!needle.is_empty()).then(|| Search {
            needle: fold(needle),
            fields: search_fields.to_vec(),
        });

        Ok(FilterEngine { predicates, search })
    }

    /// Number of active filter predicates, not counting search.
    pub fn active_filters(&self) -> usize {
        self.predicates.len()
    }

    /// Returns `true` if nothing would be excluded.
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty() && self.search.is_none()
    }

    /// Tests one record.
    pub fn matches<T, F>(&self, record: &T, accessor: F) -> bool
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        let filters_pass = self
            .predicates
            .iter()
            .all(|p| p.matches(&accessor(record, p.field())));

        if !filters_pass {
            return false;
        }

        match &self.search {
            None => true,
            Some(search) => search
                .fields
                .iter()
                .any(|field| contains(&accessor(record, field), &search.needle)),
        }
    }

    /// Returns references to matching records in input order.
    pub fn apply<'a, T, F>(&self, records: &'a [T], accessor: F) -> Vec<&'a T>
    where
        for<'b> F: Fn(&'b T, &str) -> Value<'b>,
    {
        records
            .iter()
            .filter(|record| self.matches(*record, &accessor))
            .collect()
    }

    /// Counts matching records.
    pub fn count<T, F>(&self, records: &[T], accessor: F) -> usize
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        records
            .iter()
            .filter(|record| self.matches(*record, &accessor))
            .count()
    }
}
