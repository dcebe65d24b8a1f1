//! Runtime value types extracted from records.
//!
//! The [`Value`] enum is what a [`FieldAccessor`](crate::FieldAccessor)
//! hands back for a logical field name. It borrows string data from the
//! record so filtering and sorting never copy record contents.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

/// Runtime value of one record field, borrowed from the record.
///
/// # Example
///
/// ```
/// use catalog_query::{Value, Number};
///
/// struct Venue {
///     name: String,
///     capacity: u32,
/// }
///
/// fn accessor<'a>(venue: &'a Venue, field: &str) -> Value<'a> {
///     match field {
///         "name" => Value::String(&venue.name),
///         "capacity" => Value::Number(Number::from(venue.capacity)),
///         _ => Value::None,
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    /// String value (borrowed).
    String(&'a str),
    /// Numeric value.
    Number(Number),
    /// Boolean value.
    Bool(bool),
    /// Field missing, null, or not queryable.
    None,
}

impl<'a> Value<'a> {
    /// Returns `true` if this is a `None` value.
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Returns `true` if the value should sort as missing.
    ///
    /// `NaN` numbers count as missing: they have no position in a numeric
    /// order.
    pub fn is_missing(&self) -> bool {
        match self {
            Value::None => true,
            Value::Number(n) => n.to_f64().is_nan(),
            _ => false,
        }
    }

    /// Extracts the string value, if present.
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Extracts the number value, if present.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extracts the boolean value, if present.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Case-folded text form used by substring and membership matching.
    ///
    /// Numbers and booleans are rendered with their display form so a
    /// search for `"500"` finds a capacity of 500. `None` has no text.
    pub fn folded_text(&self) -> Option<Cow<'a, str>> {
        match self {
            Value::String(s) => Some(Cow::Owned(fold(s))),
            Value::Number(n) => Some(Cow::Owned(n.to_string())),
            Value::Bool(b) => Some(Cow::Borrowed(if *b { "true" } else { "false" })),
            Value::None => None,
        }
    }
}

/// Case-folds text for comparison.
pub fn fold(s: &str) -> String {
    s.to_lowercase()
}

/// Numeric value preserving the width it was read with.
///
/// Comparisons between variants go through `f64`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 64-bit floating point.
    F64(f64),
}

impl Number {
    /// Converts the number to f64 for comparison.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F64(n) => n,
        }
    }

    /// Compares two numbers, handling mixed types.
    ///
    /// Returns `None` only when a `NaN` is involved.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::I64(a), Number::I64(b)) => Some(a.cmp(&b)),
            (Number::U64(a), Number::U64(b)) => Some(a.cmp(&b)),
            (Number::F64(a), Number::F64(b)) => a.partial_cmp(&b),
            _ => self.to_f64().partial_cmp(&other.to_f64()),
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(*other)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::I64(n) => write!(f, "{}", n),
            Number::U64(n) => write!(f, "{}", n),
            Number::F64(n) => write!(f, "{}", n),
        }
    }
}

macro_rules! number_from {
    ($variant:ident as $target:ty: $($source:ty),*) => {
        $(
            impl From<$source> for Number {
                fn from(n: $source) -> Self {
                    Number::$variant(n as $target)
                }
            }
        )*
    };
}

number_from!(I64 as i64: i8, i16, i32, i64, isize);
number_from!(U64 as u64: u8, u16, u32, u64, usize);
number_from!(F64 as f64: f32, f64);
