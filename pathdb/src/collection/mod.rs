mod document;

pub use document::*;

use crate::common::Value;

/// Returns true when `value` can be read as a collection: a document whose
/// members are all documents or `Null`.
pub fn is_valid_collection(value: &Value) -> bool {
    match value {
        Value::Document(members) => is_collection_shaped(members),
        _ => false,
    }
}

fn is_collection_shaped(members: &Document) -> bool {
    members
        .values()
        .all(|member| matches!(member, Value::Null | Value::Document(_)))
}
