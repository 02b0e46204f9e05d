use crate::collection::Document;
use crate::common::Value;
use crate::errors::{ErrorKind, StoreError};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Comparison operator of a [QueryFilter].
///
/// Serialized as its wire string (`"=="`, `"array-contains"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum FilterOp {
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Lte,
    #[serde(rename = "in")]
    In,
    #[serde(rename = "array-contains")]
    ArrayContains,
}

impl FilterOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOp::Eq => "==",
            FilterOp::Ne => "!=",
            FilterOp::Gt => ">",
            FilterOp::Gte => ">=",
            FilterOp::Lt => "<",
            FilterOp::Lte => "<=",
            FilterOp::In => "in",
            FilterOp::ArrayContains => "array-contains",
        }
    }

    pub fn parse(op: &str) -> Option<FilterOp> {
        match op.trim() {
            "==" => Some(FilterOp::Eq),
            "!=" => Some(FilterOp::Ne),
            ">" => Some(FilterOp::Gt),
            ">=" => Some(FilterOp::Gte),
            "<" => Some(FilterOp::Lt),
            "<=" => Some(FilterOp::Lte),
            "in" => Some(FilterOp::In),
            "array-contains" => Some(FilterOp::ArrayContains),
            _ => None,
        }
    }
}

impl Display for FilterOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FilterOp {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterOp::parse(s).ok_or_else(|| {
            log::error!("Unknown filter operator {}", s);
            StoreError::new(
                &format!("Unknown filter operator {}", s),
                ErrorKind::InvalidOperation,
            )
        })
    }
}

/// A single `field op value` condition evaluated against a record.
///
/// `field_path` is dot-separated and resolved with [`Document::resolve`].
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct QueryFilter {
    pub field_path: String,
    pub op: FilterOp,
    pub value: Value,
}

impl QueryFilter {
    pub fn new(field_path: impl Into<String>, op: FilterOp, value: impl Into<Value>) -> Self {
        QueryFilter {
            field_path: field_path.into(),
            op,
            value: value.into(),
        }
    }

    /// Evaluates this filter against `record`.
    ///
    /// The comparison operators never match an array filter value. An absent
    /// field fails every operator except `!=`. Ordered operators only compare
    /// numbers with numbers, strings with strings and booleans with booleans.
    pub fn matches(&self, record: &Document) -> bool {
        let resolved = record.resolve(&self.field_path);
        match self.op {
            FilterOp::In => self.matches_in(resolved),
            FilterOp::ArrayContains => match resolved {
                Some(Value::Array(items)) => items.contains(&self.value),
                _ => false,
            },
            _ if self.value.is_array() => false,
            FilterOp::Eq => filter_equals(resolved, &self.value),
            FilterOp::Ne => !filter_equals(resolved, &self.value),
            FilterOp::Gt => self.compare_with(resolved, |o| o.is_gt()),
            FilterOp::Gte => self.compare_with(resolved, |o| o.is_ge()),
            FilterOp::Lt => self.compare_with(resolved, |o| o.is_lt()),
            FilterOp::Lte => self.compare_with(resolved, |o| o.is_le()),
        }
    }

    fn compare_with(
        &self,
        resolved: Option<&Value>,
        accept: impl Fn(std::cmp::Ordering) -> bool,
    ) -> bool {
        resolved
            .and_then(|value| value.compare(&self.value))
            .map(accept)
            .unwrap_or(false)
    }

    fn matches_in(&self, resolved: Option<&Value>) -> bool {
        let (Some(candidates), Some(value)) = (self.value.as_array(), resolved) else {
            return false;
        };
        let needle = value.to_filter_string();
        candidates
            .iter()
            .any(|candidate| candidate.to_filter_string() == needle)
    }
}

impl Display for QueryFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.field_path, self.op, self.value)
    }
}

/// Equality of `==` and `!=`. Numbers compare by IEEE rules, so NaN never
/// equals anything, itself included. An absent field equals nothing.
fn filter_equals(resolved: Option<&Value>, expected: &Value) -> bool {
    match (resolved, expected) {
        (None, _) => false,
        (Some(Value::I64(a)), Value::I64(b)) => a == b,
        (Some(value), expected) if value.is_number() && expected.is_number() => {
            value.as_f64() == expected.as_f64()
        }
        (Some(value), expected) => value == expected,
    }
}

/// Returns true when every filter matches `record`. An empty list matches
/// everything.
pub fn all_filters_match(filters: &[QueryFilter], record: &Document) -> bool {
    filters.iter().all(|filter| filter.matches(record))
}
