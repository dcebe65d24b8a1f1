//! Field access for records.
//!
//! [`FieldAccessor`] is the single point where the engine touches a
//! concrete record shape. It is usually derived with `#[derive(Catalog)]`
//! from `catalog-macros`, implemented by hand, or provided by the JSON
//! implementations below for records that arrive as loosely-typed objects.

use serde_json::{Map, Value as JsonValue};

use crate::value::{Number, Value};

/// Records that expose their fields to the query engine by logical name.
///
/// Implementations must never panic on an unknown or absent field: they
/// return [`Value::None`] so partially-populated records simply fail to
/// match filters and sort last.
///
/// # Manual Implementation
///
/// ```
/// use catalog_query::{FieldAccessor, Value, Number};
///
/// struct Sponsor {
///     name: String,
///     budget: u64,
/// }
///
/// impl FieldAccessor for Sponsor {
///     fn field_value(&self, field: &str) -> Value<'_> {
///         match field {
///             "name" => Value::String(&self.name),
///             "budget" => Value::Number(Number::from(self.budget)),
///             _ => Value::None,
///         }
///     }
/// }
/// ```
pub trait FieldAccessor {
    /// Returns the value of a field, or [`Value::None`] if it is missing.
    fn field_value(&self, field: &str) -> Value<'_>;

    /// Function form of [`field_value`](Self::field_value), suitable for
    /// the closure-taking engine methods.
    fn accessor<'a>(record: &'a Self, field: &str) -> Value<'a>
    where
        Self: Sized,
    {
        record.field_value(field)
    }
}

impl<T: FieldAccessor + ?Sized> FieldAccessor for &T {
    fn field_value(&self, field: &str) -> Value<'_> {
        (**self).field_value(field)
    }
}

impl FieldAccessor for Map<String, JsonValue> {
    fn field_value(&self, field: &str) -> Value<'_> {
        self.get(field).map(json_value).unwrap_or(Value::None)
    }
}

impl FieldAccessor for JsonValue {
    fn field_value(&self, field: &str) -> Value<'_> {
        match self {
            JsonValue::Object(map) => map.field_value(field),
            _ => Value::None,
        }
    }
}

/// Maps a scalar JSON value onto a [`Value`]; arrays, objects and null
/// are not queryable.
fn json_value(value: &JsonValue) -> Value<'_> {
    match value {
        JsonValue::String(s) => Value::String(s),
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Number(Number::I64(i))
            } else if let Some(u) = n.as_u64() {
                Value::Number(Number::U64(u))
            } else {
                n.as_f64()
                    .map(|f| Value::Number(Number::F64(f)))
                    .unwrap_or(Value::None)
            }
        }
        JsonValue::Null | JsonValue::Array(_) | JsonValue::Object(_) => Value::None,
    }
}
