//! Dynamic field value type.

use ordered_float::OrderedFloat;
use std::cmp::Ordering;
use std::fmt;

/// The value of one payload field, as seen by indexes and queries.
///
/// Values are hashable so they can key an index bucket, and compare by
/// structural equality. Integers that fit in an `i64` are always
/// [`Value::Integer`]; [`Value::Unsigned`] only holds values above
/// `i64::MAX`, so each integer has exactly one representation. Floats are
/// wrapped in [`OrderedFloat`], which makes `0.0` and `-0.0` equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Signed integer (full i64 range).
    Integer(i64),
    /// Unsigned integer above `i64::MAX`.
    Unsigned(u64),
    /// Floating point number.
    Float(OrderedFloat<f64>),
    /// Text string (UTF-8).
    Text(String),
    /// Array of values.
    Array(Vec<Value>),
    /// Map of key-value pairs, sorted by key.
    Map(Vec<(Value, Value)>),
}

impl Value {
    /// Creates a map value with keys sorted, so equal maps compare equal
    /// regardless of construction order.
    pub fn map(mut pairs: Vec<(Value, Value)>) -> Self {
        pairs.sort_by(|a, b| a.0.sort_key().cmp(&b.0.sort_key()));
        Value::Map(pairs)
    }

    /// Converts a JSON value.
    pub fn from_json(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::from_number(&n),
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(entries) => Value::map(
                entries
                    .into_iter()
                    .map(|(k, v)| (Value::Text(k), Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    fn from_number(n: &serde_json::Number) -> Self {
        if let Some(i) = n.as_i64() {
            Value::Integer(i)
        } else if let Some(u) = n.as_u64() {
            Value::Unsigned(u)
        } else {
            // Every non-integer JSON number is a finite f64.
            Value::from(n.as_f64().unwrap_or_default())
        }
    }

    /// Orders two values of the same scalar kind.
    ///
    /// Booleans, integers, floats and text are orderable. [`Value::Integer`]
    /// and [`Value::Unsigned`] order against each other; floats only order
    /// against floats, so `compare` returns `Equal` exactly when the values
    /// are `==`. Any other pairing (including null) is incomparable.
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            (Value::Unsigned(a), Value::Unsigned(b)) => Some(a.cmp(b)),
            (Value::Integer(_), Value::Unsigned(_)) => Some(Ordering::Less),
            (Value::Unsigned(_), Value::Integer(_)) => Some(Ordering::Greater),
            (Value::Float(a), Value::Float(b)) => Some(a.cmp(b)),
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Returns true if [`Value::compare`] can order this value against
    /// another value of the same kind.
    pub fn is_orderable(&self) -> bool {
        matches!(
            self,
            Value::Bool(_)
                | Value::Integer(_)
                | Value::Unsigned(_)
                | Value::Float(_)
                | Value::Text(_)
        )
    }

    /// Returns a short name for the kind of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Integer(_) | Value::Unsigned(_) => "integer",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
        }
    }

    fn sort_key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Integer(n) => write!(f, "{n}"),
            Value::Unsigned(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{:?}", x.0),
            Value::Text(s) => write!(f, "{s:?}"),
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Map(pairs) => {
                f.write_str("{")?;
                for (i, (k, v)) in pairs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(i64::from(n))
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        match i64::try_from(n) {
            Ok(i) => Value::Integer(i),
            Err(_) => Value::Unsigned(n),
        }
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(OrderedFloat(x))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<()> for Value {
    fn from((): ()) -> Self {
        Value::Null
    }
}
