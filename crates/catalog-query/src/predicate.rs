//! Filter specifications and the predicate library.
//!
//! A [`FilterSpec`] names a field, a [`FilterKind`] and a [`FilterValue`]
//! whose shape must match the kind. [`Predicate::build`] turns a spec into
//! a compiled test; the free functions ([`equals`], [`one_of`],
//! [`in_range`], [`contains`]) are the tests themselves.
//!
//! | Kind | Value | Matches when |
//! |------|-------|--------------|
//! | `equals` | `Text` | field equals text (case-insensitive for strings; the filter text is trimmed, the field is not) |
//! | `oneOf` | `Set` | folded field text is a member of the set (members trimmed and folded) |
//! | `numericRange` | `Range` | `min <= field < max` |
//! | `substring` | `Text` | folded field text contains folded text |
//!
//! A value equal to the `all` sentinel, an empty text, an empty set or a
//! range with no bounds is *absent*: the filter is skipped rather than
//! matching nothing.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};
use crate::state::RESERVED_KEYS;
use crate::value::{fold, Value};

/// Sentinel filter value meaning "no filter on this field".
pub const ALL_SENTINEL: &str = "all";

/// The kind of test a filter performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FilterKind {
    /// Exact match.
    Equals,
    /// Membership in a set of allowed values.
    OneOf,
    /// Half-open numeric interval `[min, max)`.
    NumericRange,
    /// Case-insensitive substring match.
    Substring,
}

impl FilterKind {
    /// Returns the canonical token of this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            FilterKind::Equals => "equals",
            FilterKind::OneOf => "oneOf",
            FilterKind::NumericRange => "numericRange",
            FilterKind::Substring => "substring",
        }
    }

    fn expected_shape(self) -> &'static str {
        match self {
            FilterKind::Equals | FilterKind::Substring => "a text value",
            FilterKind::OneOf => "a set of values",
            FilterKind::NumericRange => "a numeric range",
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterKind {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "equals" | "eq" => Ok(FilterKind::Equals),
            "oneOf" | "one_of" | "in" => Ok(FilterKind::OneOf),
            "numericRange" | "numeric_range" | "range" => Ok(FilterKind::NumericRange),
            "substring" | "contains" => Ok(FilterKind::Substring),
            other => Err(CatalogError::UnknownFilterKind(other.to_string())),
        }
    }
}

impl TryFrom<String> for FilterKind {
    type Error = CatalogError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<FilterKind> for String {
    fn from(kind: FilterKind) -> Self {
        kind.as_str().to_string()
    }
}

/// Half-open numeric interval `[min, max)`; either bound may be open.
///
/// Contiguous buckets such as `0-500`, `500-2000` and `2000+` therefore
/// neither overlap nor leave a gap at their shared boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NumericRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl NumericRange {
    /// Creates a range with the given bounds.
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        NumericRange { min, max }
    }

    /// Range with only a lower bound (`min+`).
    pub fn at_least(min: f64) -> Self {
        NumericRange::new(Some(min), None)
    }

    /// Range with only an upper bound (`-max`).
    pub fn below(max: f64) -> Self {
        NumericRange::new(None, Some(max))
    }

    /// Range with both bounds (`min-max`).
    pub fn between(min: f64, max: f64) -> Self {
        NumericRange::new(Some(min), Some(max))
    }

    /// Returns `true` if neither bound is set.
    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Returns `true` if `x` lies in `[min, max)`. `NaN` is never contained.
    pub fn contains(&self, x: f64) -> bool {
        if x.is_nan() {
            return false;
        }
        self.min.map_or(true, |min| x >= min) && self.max.map_or(true, |max| x < max)
    }

    /// Parses the bucket syntax: `min-max`, `min+` or `-max`.
    ///
    /// Returns `None` for anything else.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if let Some(min) = raw.strip_suffix('+') {
            return parse_bound(min).map(NumericRange::at_least);
        }
        if let Some(max) = raw.strip_prefix('-').and_then(parse_bound) {
            return Some(NumericRange::below(max));
        }
        // The separator is the first '-' after the leading character, so a
        // negative lower bound keeps its sign.
        let split_at = raw
            .char_indices()
            .skip(1)
            .find(|(_, c)| *c == '-')
            .map(|(i, _)| i);
        match split_at {
            Some(i) => {
                let min = parse_bound(&raw[..i])?;
                let max = parse_bound(&raw[i + 1..])?;
                Some(NumericRange::between(min, max))
            }
            None => None,
        }
    }

    fn validate(&self, field: &str) -> Result<()> {
        let invalid = |reason: String| CatalogError::InvalidFilterValue {
            field: field.to_string(),
            reason,
        };
        for bound in [self.min, self.max].into_iter().flatten() {
            if !bound.is_finite() {
                return Err(invalid(format!("range bound {} is not finite", bound)));
            }
        }
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min >= max {
                return Err(invalid(format!(
                    "range lower bound {} must be below upper bound {}",
                    min, max
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for NumericRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (Some(min), Some(max)) => write!(f, "{}-{}", min, max),
            (Some(min), None) => write!(f, "{}+", min),
            (None, Some(max)) => write!(f, "-{}", max),
            (None, None) => Ok(()),
        }
    }
}

fn parse_bound(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// The operand of a filter. Its shape must match the filter's kind.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// Operand of `equals` and `substring`.
    Text(String),
    /// Operand of `oneOf`; members are stored case-folded.
    Set(BTreeSet<String>),
    /// Operand of `numericRange`.
    Range(NumericRange),
}

impl FilterValue {
    fn shape(&self) -> &'static str {
        match self {
            FilterValue::Text(_) => "text",
            FilterValue::Set(_) => "set",
            FilterValue::Range(_) => "range",
        }
    }

    fn fits(&self, kind: FilterKind) -> bool {
        matches!(
            (kind, self),
            (FilterKind::Equals | FilterKind::Substring, FilterValue::Text(_))
                | (FilterKind::OneOf, FilterValue::Set(_))
                | (FilterKind::NumericRange, FilterValue::Range(_))
        )
    }

    /// Returns `true` if this value is the "no filter" sentinel.
    pub fn is_absent(&self) -> bool {
        match self {
            FilterValue::Text(text) => is_sentinel(text),
            FilterValue::Set(set) => set.is_empty() || set.contains(ALL_SENTINEL),
            FilterValue::Range(range) => range.is_unbounded(),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::Text(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::Text(s)
    }
}

impl From<NumericRange> for FilterValue {
    fn from(range: NumericRange) -> Self {
        FilterValue::Range(range)
    }
}

impl From<BTreeSet<String>> for FilterValue {
    fn from(set: BTreeSet<String>) -> Self {
        FilterValue::Set(set)
    }
}

fn is_sentinel(text: &str) -> bool {
    let text = text.trim();
    text.is_empty() || text.eq_ignore_ascii_case(ALL_SENTINEL)
}

/// One field-scoped filter condition.
///
/// Construction validates that the value's shape matches the kind, so a
/// `FilterSpec` that exists is always buildable into a [`Predicate`].
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    field: String,
    kind: FilterKind,
    value: FilterValue,
}

impl FilterSpec {
    /// Creates a filter, rejecting a value whose shape does not fit `kind`.
    pub fn new(
        field: impl Into<String>,
        kind: FilterKind,
        value: impl Into<FilterValue>,
    ) -> Result<Self> {
        let field = field.into();
        if RESERVED_KEYS.contains(&field.as_str()) {
            return Err(CatalogError::ReservedFilterField(field));
        }
        let value = match value.into() {
            FilterValue::Set(set) => {
                FilterValue::Set(set.iter().map(|m| fold(m.trim())).collect())
            }
            other => other,
        };

        if !value.fits(kind) {
            return Err(CatalogError::FilterShapeMismatch {
                field,
                kind: kind.as_str(),
                expected: kind.expected_shape(),
            });
        }

        match &value {
            FilterValue::Set(set) => {
                if let Some(bad) = set.iter().find(|m| m.is_empty() || m.contains(',')) {
                    return Err(CatalogError::InvalidFilterValue {
                        field,
                        reason: format!("set member '{}' must be non-blank and free of commas", bad),
                    });
                }
            }
            FilterValue::Range(range) => range.validate(&field)?,
            FilterValue::Text(_) => {}
        }

        Ok(FilterSpec { field, kind, value })
    }

    /// Equality filter.
    pub fn equals(field: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        FilterSpec::new(field, FilterKind::Equals, FilterValue::Text(value.into()))
    }

    /// Membership filter.
    pub fn one_of<I, S>(field: impl Into<String>, members: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set = members.into_iter().map(Into::into).collect::<BTreeSet<_>>();
        FilterSpec::new(field, FilterKind::OneOf, FilterValue::Set(set))
    }

    /// Numeric range filter.
    pub fn range(field: impl Into<String>, range: NumericRange) -> Result<Self> {
        FilterSpec::new(field, FilterKind::NumericRange, FilterValue::Range(range))
    }

    /// Substring filter.
    pub fn substring(field: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        FilterSpec::new(field, FilterKind::Substring, FilterValue::Text(value.into()))
    }

    /// Parses a raw parameter value for a filter of the given kind.
    ///
    /// Returns `Ok(None)` for the absent sentinel and an error for a value
    /// that cannot be read as `kind`.
    pub fn parse(field: &str, kind: FilterKind, raw: &str) -> Result<Option<Self>> {
        if is_sentinel(raw) {
            return Ok(None);
        }
        let value = match kind {
            FilterKind::Equals | FilterKind::Substring => FilterValue::Text(raw.to_string()),
            FilterKind::OneOf => FilterValue::Set(
                raw.split(',')
                    .map(str::trim)
                    .filter(|m| !m.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
            FilterKind::NumericRange => {
                let range =
                    NumericRange::parse(raw).ok_or_else(|| CatalogError::InvalidFilterValue {
                        field: field.to_string(),
                        reason: format!("'{}' is not a range (expected min-max, min+ or -max)", raw),
                    })?;
                FilterValue::Range(range)
            }
        };
        let spec = FilterSpec::new(field, kind, value)?;
        Ok(if spec.is_absent() { None } else { Some(spec) })
    }

    /// The field this filter tests.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The kind of test.
    pub fn kind(&self) -> FilterKind {
        self.kind
    }

    /// The operand.
    pub fn value(&self) -> &FilterValue {
        &self.value
    }

    /// Returns `true` if this filter is the "no filter" sentinel.
    pub fn is_absent(&self) -> bool {
        self.value.is_absent()
    }

    /// Renders the operand as a parameter value; inverse of [`FilterSpec::parse`].
    pub fn encode_value(&self) -> String {
        match &self.value {
            FilterValue::Text(text) => text.clone(),
            FilterValue::Set(set) => set.iter().map(String::as_str).collect::<Vec<_>>().join(","),
            FilterValue::Range(range) => range.to_string(),
        }
    }
}

/// A compiled filter test over one field.
#[derive(Debug, Clone)]
pub struct Predicate {
    field: String,
    test: Test,
}

#[derive(Debug, Clone)]
enum Test {
    Equals(String),
    OneOf(BTreeSet<String>),
    Range(NumericRange),
    Contains(String),
}

impl Predicate {
    /// Compiles a filter spec. Fails if the value does not fit the kind.
    pub fn build(spec: &FilterSpec) -> Result<Self> {
        let test = match (spec.kind, &spec.value) {
            (FilterKind::Equals, FilterValue::Text(text)) => Test::Equals(text.trim().to_string()),
            (FilterKind::Substring, FilterValue::Text(text)) => Test::Contains(fold(text)),
            (FilterKind::OneOf, FilterValue::Set(set)) => Test::OneOf(set.clone()),
            (FilterKind::NumericRange, FilterValue::Range(range)) => Test::Range(*range),
            (kind, value) => {
                tracing::trace!(field = %spec.field, %kind, shape = value.shape(), "filter shape mismatch");
                return Err(CatalogError::FilterShapeMismatch {
                    field: spec.field.clone(),
                    kind: kind.as_str(),
                    expected: kind.expected_shape(),
                });
            }
        };
        Ok(Predicate {
            field: spec.field.clone(),
            test,
        })
    }

    /// The field this predicate reads.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Evaluates the predicate against a field value.
    pub fn matches(&self, value: &Value<'_>) -> bool {
        match &self.test {
            Test::Equals(expected) => equals(value, expected),
            Test::OneOf(allowed) => one_of(value, allowed),
            Test::Range(range) => in_range(value, range),
            Test::Contains(needle) => contains(value, needle),
        }
    }
}

/// `value == expected`, case-insensitive for strings.
///
/// Numbers compare numerically against `expected` parsed as a number;
/// booleans against `true`/`false`. Missing values never match.
pub fn equals(value: &Value<'_>, expected: &str) -> bool {
    match value {
        Value::String(s) => fold(s) == fold(expected),
        Value::Number(n) => expected
            .parse::<f64>()
            .map_or(false, |e| n.to_f64() == e),
        Value::Bool(b) => expected
            .to_ascii_lowercase()
            .parse::<bool>()
            .map_or(false, |e| *b == e),
        Value::None => false,
    }
}

/// Folded field text is one of `allowed` (members already folded).
pub fn one_of(value: &Value<'_>, allowed: &BTreeSet<String>) -> bool {
    value
        .folded_text()
        .map_or(false, |text| allowed.contains(text.as_ref()))
}

/// Numeric field lies in `[min, max)`. Non-numeric values never match.
pub fn in_range(value: &Value<'_>, range: &NumericRange) -> bool {
    value.as_number().map_or(false, |n| range.contains(n.to_f64()))
}

/// Folded field text contains `needle` (already folded).
pub fn contains(value: &Value<'_>, needle: &str) -> bool {
    value
        .folded_text()
        .map_or(false, |text| text.contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Number;

    #[test]
    fn kind_tokens() {
        assert_eq!("equals".parse::<FilterKind>().unwrap(), FilterKind::Equals);
        assert_eq!("oneOf".parse::<FilterKind>().unwrap(), FilterKind::OneOf);
        assert_eq!(
            "numeric_range".parse::<FilterKind>().unwrap(),
            FilterKind::NumericRange
        );
        assert_eq!(FilterKind::Substring.to_string(), "substring");

        let err = "between".parse::<FilterKind>().unwrap_err();
        assert!(matches!(err, CatalogError::UnknownFilterKind(k) if k == "between"));
    }

    #[test]
    fn equals_is_case_insensitive_for_strings() {
        assert!(equals(&Value::String("Fashion Show"), "fashion show"));
        assert!(!equals(&Value::String("Fashion Show"), "fashion"));
        assert!(equals(&Value::Number(Number::I64(500)), "500"));
        assert!(equals(&Value::Number(Number::F64(2.5)), "2.5"));
        assert!(!equals(&Value::Number(Number::I64(500)), "five hundred"));
        assert!(equals(&Value::Bool(true), "TRUE"));
        assert!(!equals(&Value::None, "anything"));
    }

    #[test]
    fn one_of_uses_folded_text() {
        let spec = FilterSpec::one_of("city", ["Paris", "Milan"]).unwrap();
        let predicate = Predicate::build(&spec).unwrap();
        assert!(predicate.matches(&Value::String("PARIS")));
        assert!(predicate.matches(&Value::String("milan")));
        assert!(!predicate.matches(&Value::String("London")));
        assert!(!predicate.matches(&Value::None));
    }

    #[test]
    fn range_upper_bound_is_exclusive() {
        let range = NumericRange::between(0.0, 500.0);
        assert!(in_range(&Value::Number(Number::I64(0)), &range));
        assert!(in_range(&Value::Number(Number::I64(499)), &range));
        assert!(!in_range(&Value::Number(Number::I64(500)), &range));
        assert!(!in_range(&Value::String("100"), &range));
        assert!(!in_range(&Value::Number(Number::F64(f64::NAN)), &range));

        let open = NumericRange::at_least(2000.0);
        assert!(in_range(&Value::Number(Number::U64(2000)), &open));
        assert!(in_range(&Value::Number(Number::U64(90_000)), &open));
    }

    #[test]
    fn contiguous_buckets_are_exclusive() {
        let buckets = [
            NumericRange::below(500.0),
            NumericRange::between(500.0, 2000.0),
            NumericRange::at_least(2000.0),
        ];
        for capacity in [0.0, 499.99, 500.0, 1999.0, 2000.0, 10_000.0] {
            let hits = buckets.iter().filter(|b| b.contains(capacity)).count();
            assert_eq!(hits, 1, "capacity {} matched {} buckets", capacity, hits);
        }
    }

    #[test]
    fn range_syntax() {
        assert_eq!(
            NumericRange::parse("0-500"),
            Some(NumericRange::between(0.0, 500.0))
        );
        assert_eq!(
            NumericRange::parse("2000+"),
            Some(NumericRange::at_least(2000.0))
        );
        assert_eq!(NumericRange::parse("-500"), Some(NumericRange::below(500.0)));
        assert_eq!(
            NumericRange::parse("-10-10"),
            Some(NumericRange::between(-10.0, 10.0))
        );
        assert_eq!(NumericRange::parse("--5"), Some(NumericRange::below(-5.0)));
        assert_eq!(NumericRange::parse("abc"), None);
        assert_eq!(NumericRange::parse("500"), None);
        assert_eq!(NumericRange::parse("1-2-3"), None);

        assert_eq!(NumericRange::between(0.0, 500.0).to_string(), "0-500");
        assert_eq!(NumericRange::at_least(2000.0).to_string(), "2000+");
        assert_eq!(NumericRange::below(2.5).to_string(), "-2.5");
    }

    #[test]
    fn substring_folds_both_sides() {
        let spec = FilterSpec::substring("location", "PARIS").unwrap();
        let predicate = Predicate::build(&spec).unwrap();
        assert!(predicate.matches(&Value::String("Le Marais, Paris")));
        assert!(!predicate.matches(&Value::String("Milan")));
        assert!(!predicate.matches(&Value::None));
    }

    #[test]
    fn shape_mismatch_fails_fast() {
        let err = FilterSpec::new("price", FilterKind::NumericRange, "cheap").unwrap_err();
        assert!(matches!(
            err,
            CatalogError::FilterShapeMismatch { kind: "numericRange", .. }
        ));

        let err = FilterSpec::new("tag", FilterKind::OneOf, "runway").unwrap_err();
        assert!(matches!(err, CatalogError::FilterShapeMismatch { .. }));
    }

    #[test]
    fn invalid_values_rejected() {
        assert!(FilterSpec::range("price", NumericRange::between(10.0, 10.0)).is_err());
        assert!(FilterSpec::range("price", NumericRange::at_least(f64::INFINITY)).is_err());
        assert!(FilterSpec::one_of("tag", ["a,b"]).is_err());
        assert!(FilterSpec::one_of("tag", [""]).is_err());
        assert!(FilterSpec::one_of("tag", [" "]).is_err());
        assert!(FilterSpec::one_of("tag", ["gold", "\t"]).is_err());
    }

    #[test]
    fn set_members_are_trimmed() {
        let spec = FilterSpec::one_of("tier", [" Gold ", "silver"]).unwrap();
        assert_eq!(spec.encode_value(), "gold,silver");

        let spec = FilterSpec::parse("tier", FilterKind::OneOf, " ,Gold , ").unwrap().unwrap();
        assert_eq!(spec.encode_value(), "gold");

        assert_eq!(FilterSpec::parse("tier", FilterKind::OneOf, " , ").unwrap(), None);
    }

    #[test]
    fn reserved_fields_rejected() {
        for field in ["search", "sortBy", "page"] {
            let err = FilterSpec::equals(field, "runway").unwrap_err();
            assert!(matches!(err, CatalogError::ReservedFilterField(f) if f == field));
        }
        assert!(FilterSpec::parse("page", FilterKind::Equals, "runway").is_err());
    }

    #[test]
    fn equals_compares_record_text_exactly() {
        assert!(equals(&Value::String("Runway"), "runway"));
        assert!(!equals(&Value::String(" runway "), "runway"));
    }

    #[test]
    fn sentinels_are_absent() {
        assert!(FilterSpec::equals("category", "all").unwrap().is_absent());
        assert!(FilterSpec::equals("category", "All").unwrap().is_absent());
        assert!(FilterSpec::equals("category", "").unwrap().is_absent());
        assert!(FilterSpec::one_of("category", Vec::<String>::new())
            .unwrap()
            .is_absent());
        assert!(FilterSpec::range("price", NumericRange::default())
            .unwrap()
            .is_absent());
        assert!(!FilterSpec::equals("category", "runway").unwrap().is_absent());
    }

    #[test]
    fn parse_raw_values() {
        assert_eq!(
            FilterSpec::parse("category", FilterKind::Equals, "all").unwrap(),
            None
        );
        let spec = FilterSpec::parse("capacity", FilterKind::NumericRange, "500-2000")
            .unwrap()
            .unwrap();
        assert_eq!(
            spec.value(),
            &FilterValue::Range(NumericRange::between(500.0, 2000.0))
        );
        assert_eq!(spec.encode_value(), "500-2000");

        let spec = FilterSpec::parse("tier", FilterKind::OneOf, "Gold,silver")
            .unwrap()
            .unwrap();
        assert_eq!(spec.encode_value(), "gold,silver");

        assert!(FilterSpec::parse("capacity", FilterKind::NumericRange, "lots").is_err());
    }
}
