use crate::common::Value;

use super::{FilterOp, QueryFilter};

/// Starts a filter on `field_name`.
///
/// ```rust,ignore
/// let adults = field("age").gte(18);
/// let staff = field("tags").array_contains("staff");
/// ```
pub fn field(field_name: &str) -> FluentFilter {
    FluentFilter {
        field_name: field_name.to_string(),
    }
}

pub struct FluentFilter {
    field_name: String,
}

impl FluentFilter {
    #[inline]
    pub fn eq<T: Into<Value>>(self, value: T) -> QueryFilter {
        self.with(FilterOp::Eq, value.into())
    }

    #[inline]
    pub fn ne<T: Into<Value>>(self, value: T) -> QueryFilter {
        self.with(FilterOp::Ne, value.into())
    }

    #[inline]
    pub fn gt<T: Into<Value>>(self, value: T) -> QueryFilter {
        self.with(FilterOp::Gt, value.into())
    }

    #[inline]
    pub fn gte<T: Into<Value>>(self, value: T) -> QueryFilter {
        self.with(FilterOp::Gte, value.into())
    }

    #[inline]
    pub fn lt<T: Into<Value>>(self, value: T) -> QueryFilter {
        self.with(FilterOp::Lt, value.into())
    }

    #[inline]
    pub fn lte<T: Into<Value>>(self, value: T) -> QueryFilter {
        self.with(FilterOp::Lte, value.into())
    }

    /// Matches when the field's string form equals one of `values`.
    pub fn in_array<T: Into<Value>>(self, values: Vec<T>) -> QueryFilter {
        self.with(FilterOp::In, Value::from(values))
    }

    pub fn array_contains<T: Into<Value>>(self, value: T) -> QueryFilter {
        self.with(FilterOp::ArrayContains, value.into())
    }

    fn with(self, op: FilterOp, value: Value) -> QueryFilter {
        QueryFilter {
            field_path: self.field_name,
            op,
            value,
        }
    }
}
