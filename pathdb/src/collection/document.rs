use crate::common::Value;
use crate::FIELD_SEPARATOR;
use indexmap::map::{IntoIter, Iter};
use indexmap::IndexMap;
use smallvec::SmallVec;
use std::fmt::{Debug, Display, Formatter};

/// An insertion-ordered map of field names to [Value]s.
///
/// Documents are the only container in the store. A collection is a document
/// whose members are documents keyed by id, a record is a document of fields,
/// and a field holding a document may itself be a sub-collection. Key order is
/// preserved so document ids come back in the order they were inserted.
///
/// Nested values can be read with a dot-separated field path through
/// [`Document::resolve`]. Plain [`Document::get`] never interprets dots.
#[derive(Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(transparent)]
pub struct Document {
    data: IndexMap<String, Value>,
}

impl Document {
    /// Creates a new empty document.
    pub fn new() -> Self {
        Document {
            data: IndexMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Document {
            data: IndexMap::with_capacity(capacity),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Associates `value` with `key`, returning the previous value if any.
    ///
    /// Replacing an existing key keeps its original position.
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.data.insert(key.into(), value.into())
    }

    /// Returns the top-level value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.data.get_mut(key)
    }

    /// Returns the nested document stored under `key`, if the value is one.
    pub fn get_document(&self, key: &str) -> Option<&Document> {
        self.data.get(key).and_then(Value::as_document)
    }

    pub fn get_document_mut(&mut self, key: &str) -> Option<&mut Document> {
        self.data.get_mut(key).and_then(Value::as_document_mut)
    }

    /// Removes `key`, keeping the order of the remaining keys.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.data.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.data.values()
    }

    pub fn iter(&self) -> Iter<'_, String, Value> {
        self.data.iter()
    }

    /// Shallow merge: every top-level key of `other` overwrites the same key
    /// here. Nested documents are replaced, not merged.
    pub fn merge(&mut self, other: Document) {
        for (key, value) in other.data {
            self.data.insert(key, value);
        }
    }

    /// Resolves a dot-separated field path.
    ///
    /// Documents are entered by key and arrays by a non-negative numeric
    /// segment (`"items.0.name"`). Anything else, including an empty segment
    /// or an out of range index, resolves to `None`.
    pub fn resolve(&self, field_path: &str) -> Option<&Value> {
        let splits: SmallVec<[&str; 8]> = field_path.split(FIELD_SEPARATOR).collect();
        let (first, rest) = splits.split_first()?;
        if first.is_empty() {
            return None;
        }
        Self::recursive_get(self.data.get(*first), rest)
    }

    fn recursive_get<'a>(value: Option<&'a Value>, splits: &[&str]) -> Option<&'a Value> {
        let value = value?;
        let (key, rest) = match splits.split_first() {
            None => return Some(value),
            Some(split) => split,
        };

        if key.is_empty() {
            return None;
        }

        match value {
            Value::Document(doc) => Self::recursive_get(doc.data.get(*key), rest),
            Value::Array(items) => {
                let index = key.parse::<usize>().ok()?;
                Self::recursive_get(items.get(index), rest)
            }
            _ => None,
        }
    }

    /// Builds a document from a JSON object. Any other JSON value yields `None`.
    pub fn from_json(json: serde_json::Value) -> Option<Document> {
        match Value::from_json(json) {
            Value::Document(doc) => Some(doc),
            _ => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        let map = self
            .data
            .iter()
            .map(|(key, value)| (key.clone(), value.to_json()))
            .collect::<serde_json::Map<_, _>>();
        serde_json::Value::Object(map)
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl Debug for Document {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl IntoIterator for Document {
    type Item = (String, Value);
    type IntoIter = IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = (&'a String, &'a Value);
    type IntoIter = Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Document {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Document {
            data: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

#[inline]
pub fn normalize(value: &str) -> String {
    value.trim_matches('"').to_string()
}

/// Creates a [Document] with JSON-like syntax.
///
/// ```rust,ignore
/// let doc = doc! {
///     name: "Charlie",
///     "first.name": "quoted keys keep their dots",
///     address: { city: "Berlin" },
///     tags: ["admin", "user"],
///     score: (base * 2),
/// };
/// ```
#[macro_export]
macro_rules! doc {
    ({}) => {
        $crate::collection::Document::new()
    };

    () => {
        $crate::collection::Document::new()
    };

    ({ $($key:tt : $value:tt),* $(,)? }) => {
        $crate::doc!($($key : $value),*)
    };

    ($($key:tt : $value:tt),* $(,)?) => {
        {
            let mut doc = $crate::collection::Document::new();
            $(
                doc.put($crate::collection::normalize(stringify!($key)), $crate::doc_value!($value));
            )*
            doc
        }
    };
}

/// Converts one value position of the [doc!] macro.
#[macro_export]
macro_rules! doc_value {
    ({ $($key:tt : $value:tt),* $(,)? }) => {
        $crate::common::Value::Document($crate::doc!{ $($key : $value),* })
    };

    ([ $($value:tt),* $(,)? ]) => {
        $crate::common::Value::Array(vec![$($crate::doc_value!($value)),*])
    };

    ($value:expr) => {
        $crate::common::Value::from($value)
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn set_up() -> Document {
        doc! {
            score: 1034,
            location: {
                state: "NY",
                address: {
                    line1: "40",
                    house: ["1", "2", "3"],
                    zip: 10001,
                },
            },
            category: ["food", "produce", "grocery"],
            obj_array: [
                { value: 1 },
                { value: 2 },
            ],
            "dotted.key": true,
        }
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("\"a.b\""), "a.b");
        assert_eq!(normalize("plain"), "plain");
    }

    #[test]
    fn test_empty_document() {
        let doc = doc! {};
        assert!(doc.is_empty());
        assert_eq!(doc.size(), 0);
    }

    #[test]
    fn test_put_keeps_insertion_order() {
        let mut doc = Document::new();
        doc.put("b", 1);
        doc.put("a", 2);
        doc.put("c", 3);
        doc.put("a", 4);
        assert_eq!(doc.keys().collect::<Vec<_>>(), vec!["b", "a", "c"]);
        assert_eq!(doc.get("a"), Some(&Value::I64(4)));
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut doc = doc! { a: 1, b: 2, c: 3 };
        assert_eq!(doc.remove("b"), Some(Value::I64(2)));
        assert_eq!(doc.keys().collect::<Vec<_>>(), vec!["a", "c"]);
        assert_eq!(doc.remove("missing"), None);
    }

    #[test]
    fn test_get_does_not_split_dots() {
        let doc = set_up();
        assert_eq!(doc.get("dotted.key"), Some(&Value::Bool(true)));
        assert_eq!(doc.get("location.state"), None);
    }

    #[test]
    fn test_resolve_nested_document() {
        let doc = set_up();
        assert_eq!(doc.resolve("score"), Some(&Value::I64(1034)));
        assert_eq!(doc.resolve("location.state"), Some(&Value::from("NY")));
        assert_eq!(doc.resolve("location.address.zip"), Some(&Value::I64(10001)));
    }

    #[test]
    fn test_resolve_array_index() {
        let doc = set_up();
        assert_eq!(doc.resolve("category.1"), Some(&Value::from("produce")));
        assert_eq!(doc.resolve("location.address.house.2"), Some(&Value::from("3")));
        assert_eq!(doc.resolve("obj_array.1.value"), Some(&Value::I64(2)));
    }

    #[test]
    fn test_resolve_misses() {
        let doc = set_up();
        assert_eq!(doc.resolve(""), None);
        assert_eq!(doc.resolve("missing"), None);
        assert_eq!(doc.resolve("score.inner"), None);
        assert_eq!(doc.resolve("category.9"), None);
        assert_eq!(doc.resolve("category.-1"), None);
        assert_eq!(doc.resolve("category.first"), None);
        assert_eq!(doc.resolve("location..state"), None);
        assert_eq!(doc.resolve(".score"), None);
    }

    #[test]
    fn test_merge_is_shallow() {
        let mut doc = doc! { a: 1, nested: { x: 1, y: 2 } };
        doc.merge(doc! { b: 2, nested: { x: 9 } });
        assert_eq!(doc, doc! { a: 1, nested: { x: 9 }, b: 2 });
    }

    #[test]
    fn test_equality_ignores_order() {
        assert_eq!(doc! { a: 1, b: 2 }, doc! { b: 2, a: 1 });
    }

    #[test]
    fn test_from_json() {
        let doc = Document::from_json(json!({"name": "Alice", "tags": ["x"]})).unwrap();
        assert_eq!(doc, doc! { name: "Alice", tags: ["x"] });
        assert!(Document::from_json(json!([1, 2])).is_none());
        assert!(Document::from_json(json!("text")).is_none());
    }

    #[test]
    fn test_serde_round_trip() {
        let doc = set_up();
        let text = serde_json::to_string(&doc).unwrap();
        let back: Document = serde_json::from_str(&text).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_display_is_json() {
        let doc = doc! { a: 1, b: "x" };
        assert_eq!(doc.to_string(), r#"{"a":1,"b":"x"}"#);
    }

    #[test]
    fn test_from_iterator() {
        let doc: Document = vec![("a", 1), ("b", 2)].into_iter().collect();
        assert_eq!(doc.get("b"), Some(&Value::I64(2)));
    }

    #[test]
    fn test_get_document() {
        let mut doc = set_up();
        assert!(doc.get_document("location").is_some());
        assert!(doc.get_document("score").is_none());
        doc.get_document_mut("location").unwrap().put("state", "CA");
        assert_eq!(doc.resolve("location.state"), Some(&Value::from("CA")));
    }
}
