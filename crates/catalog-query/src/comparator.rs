//! Comparator library.
//!
//! A [`Comparator`] is an ordered list of [`OrderBy`] keys: the first key
//! decides, later keys break ties, and an empty list is the identity
//! comparator that leaves input order alone under a stable sort.
//!
//! [`compare_values`] is a total order, so sorting with any comparator is
//! deterministic. Missing values (`None`, `NaN`) always sort last
//! regardless of direction.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dir {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Dir {
    /// Applies this direction to an ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }

    /// Returns the display name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl std::fmt::Display for Dir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single sort key: a field and a direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    /// The field to sort by.
    pub field: String,
    /// The sort direction.
    #[serde(default)]
    pub dir: Dir,
}

impl OrderBy {
    /// Ascending ordering on `field`.
    pub fn asc(field: impl Into<String>) -> Self {
        OrderBy {
            field: field.into(),
            dir: Dir::Asc,
        }
    }

    /// Descending ordering on `field`.
    pub fn desc(field: impl Into<String>) -> Self {
        OrderBy {
            field: field.into(),
            dir: Dir::Desc,
        }
    }

    /// Compares two values under this key. Missing values sort last in
    /// both directions.
    pub fn compare(&self, a: &Value<'_>, b: &Value<'_>) -> Ordering {
        match (a.is_missing(), b.is_missing()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => self.dir.apply(compare_values(a, b)),
        }
    }
}

/// Total order over present values.
///
/// Strings compare case-insensitively first, then by exact bytes so that
/// distinct strings never tie. Numbers compare as `f64` (integers beyond
/// 2^53 lose precision). Values of different types are ordered
/// number < string < bool.
pub fn compare_values(a: &Value<'_>, b: &Value<'_>) -> Ordering {
    match (a, b) {
        (Value::String(a), Value::String(b)) => {
            let folded = a
                .chars()
                .flat_map(char::to_lowercase)
                .cmp(b.chars().flat_map(char::to_lowercase));
            folded.then_with(|| a.cmp(b))
        }
        (Value::Number(a), Value::Number(b)) => a.to_f64().total_cmp(&b.to_f64()),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn type_rank(value: &Value<'_>) -> u8 {
    match value {
        Value::Number(_) => 0,
        Value::String(_) => 1,
        Value::Bool(_) => 2,
        Value::None => 3,
    }
}

/// A composite ordering over records.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Comparator {
    keys: Vec<OrderBy>,
}

impl Comparator {
    /// Builds a comparator from ordered keys.
    pub fn new(keys: Vec<OrderBy>) -> Self {
        Comparator { keys }
    }

    /// Keeps the original collection order.
    pub fn identity() -> Self {
        Comparator::default()
    }

    /// Numeric ascending on `field` (`price-low`).
    pub fn ascending(field: impl Into<String>) -> Self {
        Comparator::new(vec![OrderBy::asc(field)])
    }

    /// Numeric descending on `field` (`price-high`, `capacity`).
    pub fn descending(field: impl Into<String>) -> Self {
        Comparator::new(vec![OrderBy::desc(field)])
    }

    /// Descending on `field` with ties broken by `tie_break` ascending
    /// (`rating`, ties by name).
    pub fn descending_then(field: impl Into<String>, tie_break: impl Into<String>) -> Self {
        Comparator::new(vec![OrderBy::desc(field), OrderBy::asc(tie_break)])
    }

    /// Adds a further tie-break key.
    pub fn then(mut self, key: OrderBy) -> Self {
        self.keys.push(key);
        self
    }

    /// The keys in priority order.
    pub fn keys(&self) -> &[OrderBy] {
        &self.keys
    }

    /// Returns `true` if this comparator never reorders.
    pub fn is_identity(&self) -> bool {
        self.keys.is_empty()
    }

    /// Compares two records key by key.
    pub fn compare<T, F>(&self, a: &T, b: &T, accessor: &F) -> Ordering
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        for key in &self.keys {
            let ordering = key.compare(&accessor(a, &key.field), &accessor(b, &key.field));
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}
