use crate::common::Value;
use crate::database::DatabaseDocument;
use std::cmp::Ordering;

/// Result ordering: one field, ascending unless `descending` is set.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct QueryOrderBy {
    pub field: String,
    pub descending: bool,
}

impl QueryOrderBy {
    pub fn new(field: impl Into<String>, descending: bool) -> Self {
        QueryOrderBy {
            field: field.into(),
            descending,
        }
    }

    pub fn ascending(field: impl Into<String>) -> Self {
        QueryOrderBy::new(field, false)
    }

    pub fn descending(field: impl Into<String>) -> Self {
        QueryOrderBy::new(field, true)
    }
}

fn type_rank(value: Option<&Value>) -> u8 {
    match value {
        None => 0,
        Some(Value::Null) => 1,
        Some(Value::Bool(_)) => 2,
        Some(Value::I64(_)) | Some(Value::F64(_)) => 3,
        Some(Value::String(_)) => 4,
        Some(Value::Array(_)) => 5,
        Some(Value::Document(_)) => 6,
    }
}

/// Total order used for sorting: absent < null < bool < number < string <
/// array < document. NaN sorts before every other number. Documents compare
/// equal to each other.
pub fn total_cmp(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let rank = type_rank(a).cmp(&type_rank(b));
    if rank != Ordering::Equal {
        return rank;
    }
    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::I64(x)), Some(Value::I64(y))) => x.cmp(y),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Array(x)), Some(Value::Array(y))) => {
            for (left, right) in x.iter().zip(y.iter()) {
                let ordering = total_cmp(Some(left), Some(right));
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            x.len().cmp(&y.len())
        }
        (Some(x), Some(y)) if x.is_number() => {
            let (x, y) = (x.as_f64().unwrap_or(f64::NAN), y.as_f64().unwrap_or(f64::NAN));
            match (x.is_nan(), y.is_nan()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                (false, false) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            }
        }
        _ => Ordering::Equal,
    }
}

/// Sorts `items` in place by the value at `order_by.field` (a dot path).
///
/// The sort is stable in both directions: records with equal keys keep their
/// relative order.
pub fn sort_by_property(items: &mut [DatabaseDocument], order_by: &QueryOrderBy) {
    items.sort_by(|a, b| {
        let left = a.data.resolve(&order_by.field);
        let right = b.data.resolve(&order_by.field);
        if order_by.descending {
            total_cmp(right, left)
        } else {
            total_cmp(left, right)
        }
    });
}
