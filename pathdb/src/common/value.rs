use crate::collection::Document;
use itertools::Itertools;
use std::cmp::Ordering;
use std::fmt::{Debug, Display, Formatter};

/// Compare two floats for equality, treating NaN as equal to itself.
#[inline]
fn num_eq_float(a: f64, b: f64) -> bool {
    if a.is_nan() && b.is_nan() {
        true
    } else {
        a == b
    }
}

/// Represents a value stored in the document tree.
///
/// The tree is a recursive variant: scalars, arrays and [Document] maps. A
/// `Document` nested inside another document is how sub-collections are
/// represented, so every collection in the store is ultimately a
/// `Value::Document` whose members are documents.
///
/// # Characteristics
/// - **JSON-shaped**: (de)serializes untagged, so `{"a": [1, "x", null]}` maps
///   onto `Document`/`Array`/`I64`/`String`/`Null` directly
/// - **Numeric equality across types**: `I64(25) == F64(25.0)`
/// - **Structural clone**: `clone()` is a deep copy, NaN included
///
/// # Usage
/// ```text
/// let v: Value = 42.into();
/// let s = Value::from("hello");
/// let d = doc!{ name: "Alice", tags: ["a", "b"] };
/// ```
#[derive(Clone, Default, serde::Deserialize, serde::Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Represents a null value.
    #[default]
    Null,
    /// Represents a boolean value.
    Bool(bool),
    /// Represents a signed 64-bit integer value.
    I64(i64),
    /// Represents a 64-bit floating point value.
    F64(f64),
    /// Represents a string value.
    String(String),
    /// Represents an array value.
    Array(Vec<Value>),
    /// Represents a nested document (or a sub-collection).
    Document(Document),
}

/// Structural equality: NaN equals NaN. The `==` and `!=` query filters
/// compare numbers by IEEE rules instead.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::I64(a), Value::I64(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Document(a), Value::Document(b)) => a == b,
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => num_eq_float(a, b),
                _ => false,
            },
        }
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(v) => write!(f, "{}", v),
            Value::I64(v) => write!(f, "{}", v),
            Value::F64(v) => write!(f, "{}", v),
            Value::String(v) => write!(f, "{:?}", v),
            Value::Array(items) => write!(f, "[{}]", items.iter().join(", ")),
            Value::Document(doc) => write!(f, "{}", doc),
        }
    }
}

impl Value {
    /// Creates a new [Value] from anything implementing `Into<Value>`.
    pub fn from<T: Into<Value>>(value: T) -> Value {
        value.into()
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::I64(_) | Value::F64(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    pub fn is_document(&self) -> bool {
        matches!(self, Value::Document(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I64(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the numeric value as `f64`, converting integers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::I64(v) => Some(*v as f64),
            Value::F64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Value::Document(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_document_mut(&mut self) -> Option<&mut Document> {
        match self {
            Value::Document(v) => Some(v),
            _ => None,
        }
    }

    /// Compares two values the way range filters do.
    ///
    /// Only numbers with numbers, strings with strings and booleans with
    /// booleans are comparable. NaN compares with nothing.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::I64(a), Value::I64(b)) => Some(a.cmp(b)),
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => a.partial_cmp(&b),
                _ => None,
            },
        }
    }

    /// Returns the string form used for `in` membership checks.
    ///
    /// Strings are taken verbatim and arrays join their elements with `,`.
    /// Numbers use their shortest form (`25`, not `25.0`) and switch to
    /// exponent notation below `1e-6` or from `1e21` on (`1e+21`, `1.5e-7`).
    pub fn to_filter_string(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(v) => v.to_string(),
            Value::I64(v) => v.to_string(),
            Value::F64(v) => number_string(*v),
            Value::String(v) => v.clone(),
            Value::Array(items) => items.iter().map(Value::to_filter_string).join(","),
            Value::Document(doc) => doc.to_string(),
        }
    }

    /// Converts a `serde_json::Value` into a [Value].
    ///
    /// Integers that fit in `i64` stay integers, every other number becomes
    /// `F64`. Object key order is preserved.
    pub fn from_json(json: serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(v) => Value::Bool(v),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::I64(i),
                None => Value::F64(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(map) => {
                let mut doc = Document::with_capacity(map.len());
                for (key, value) in map {
                    doc.put(key, Value::from_json(value));
                }
                Value::Document(doc)
            }
        }
    }

    /// Converts this value into a `serde_json::Value`.
    ///
    /// Non-finite floats have no JSON representation and become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(v) => serde_json::Value::Bool(*v),
            Value::I64(v) => serde_json::Value::from(*v),
            Value::F64(v) => serde_json::Number::from_f64(*v)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(v) => serde_json::Value::String(v.clone()),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Document(doc) => doc.to_json(),
        }
    }
}

fn number_string(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if !(1e-6..1e21).contains(&magnitude) {
        let formatted = format!("{:e}", value);
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => formatted,
        };
    }
    value.to_string()
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::I64(value as i64)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::I64(value as i64)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::I64(value)
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        i64::try_from(value)
            .map(Value::I64)
            .unwrap_or(Value::F64(value as f64))
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::F64(value as f64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::F64(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<Document> for Value {
    fn from(value: Document) -> Self {
        Value::Document(value)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

impl<T> From<Vec<T>> for Value
where
    T: Into<Value>,
{
    fn from(value: Vec<T>) -> Self {
        Value::Array(value.into_iter().map(Into::into).collect())
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        Value::from_json(value)
    }
}

/// Creates a [Value] from an expression.
#[macro_export]
macro_rules! val {
    ($value:expr) => {
        $crate::common::Value::from($value)
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc;
    use serde_json::json;

    #[test]
    fn test_numeric_equality_across_types() {
        assert_eq!(Value::I64(25), Value::F64(25.0));
        assert_ne!(Value::I64(25), Value::F64(25.5));
        assert_ne!(Value::I64(1), Value::String("1".to_string()));
    }

    #[test]
    fn test_nan_equals_itself() {
        assert_eq!(Value::F64(f64::NAN), Value::F64(f64::NAN));
    }

    #[test]
    fn test_compare_numbers_and_strings() {
        assert_eq!(Value::I64(1).compare(&Value::F64(2.5)), Some(Ordering::Less));
        assert_eq!(
            Value::from("b").compare(&Value::from("a")),
            Some(Ordering::Greater)
        );
        assert_eq!(Value::Bool(false).compare(&Value::Bool(true)), Some(Ordering::Less));
    }

    #[test]
    fn test_compare_mixed_types_is_none() {
        assert_eq!(Value::I64(1).compare(&Value::from("1")), None);
        assert_eq!(Value::Null.compare(&Value::Null), None);
        assert_eq!(Value::F64(f64::NAN).compare(&Value::I64(0)), None);
    }

    #[test]
    fn test_filter_string() {
        assert_eq!(Value::I64(25).to_filter_string(), "25");
        assert_eq!(Value::F64(25.0).to_filter_string(), "25");
        assert_eq!(Value::F64(2.5).to_filter_string(), "2.5");
        assert_eq!(Value::F64(1e21).to_filter_string(), "1e+21");
        assert_eq!(Value::F64(-1.5e22).to_filter_string(), "-1.5e+22");
        assert_eq!(Value::F64(1e20).to_filter_string(), "100000000000000000000");
        assert_eq!(Value::F64(0.000001).to_filter_string(), "0.000001");
        assert_eq!(Value::F64(1.5e-7).to_filter_string(), "1.5e-7");
        assert_eq!(Value::F64(-0.0).to_filter_string(), "0");
        assert_eq!(Value::F64(f64::INFINITY).to_filter_string(), "Infinity");
        assert_eq!(Value::F64(f64::NAN).to_filter_string(), "NaN");
        assert_eq!(Value::Bool(true).to_filter_string(), "true");
        assert_eq!(Value::from("abc").to_filter_string(), "abc");
        assert_eq!(val!(vec![1, 2]).to_filter_string(), "1,2");
    }

    #[test]
    fn test_from_json_keeps_shape_and_order() {
        let value = Value::from_json(json!({"z": 1, "a": [true, null, 1.5], "m": {"k": "v"}}));
        let doc = value.as_document().unwrap();
        assert_eq!(doc.keys().collect::<Vec<_>>(), vec!["z", "a", "m"]);
        assert_eq!(doc.get("z"), Some(&Value::I64(1)));
        assert_eq!(
            doc.get("a"),
            Some(&Value::Array(vec![Value::Bool(true), Value::Null, Value::F64(1.5)]))
        );
        assert_eq!(doc.get("m"), Some(&Value::Document(doc! { k: "v" })));
    }

    #[test]
    fn test_to_json_round_trip() {
        let original = json!({"a": 1, "b": [1, 2, {"c": "d"}], "e": null});
        assert_eq!(Value::from_json(original.clone()).to_json(), original);
    }

    #[test]
    fn test_to_json_drops_non_finite() {
        assert_eq!(Value::F64(f64::INFINITY).to_json(), serde_json::Value::Null);
    }

    #[test]
    fn test_clone_is_independent() {
        let original = val!(doc! { deep: { key: "value" } });
        let mut copy = original.clone();
        copy.as_document_mut()
            .unwrap()
            .get_mut("deep")
            .and_then(Value::as_document_mut)
            .unwrap()
            .put("key", "change");
        assert_ne!(copy, original);
        assert_eq!(original, val!(doc! { deep: { key: "value" } }));
    }

    #[test]
    fn test_option_and_vec_conversions() {
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::from("x"));
        assert_eq!(
            Value::from(vec![1.0, 0.0]),
            Value::Array(vec![Value::F64(1.0), Value::F64(0.0)])
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from("a").to_string(), "\"a\"");
        assert_eq!(val!(vec![1, 2]).to_string(), "[1, 2]");
        assert_eq!(Value::Null.to_string(), "null");
    }
}
