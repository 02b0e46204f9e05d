//! Query filters and ordering.
//!
//! Filters are created with the fluent API or directly:
//! - `field("age").gt(30)`, `field("name").eq("Alice")`
//! - `field("role").in_array(vec!["admin", "owner"])`
//! - `field("tags").array_contains("staff")`
//! - `QueryFilter::new("age", FilterOp::Gte, 18)`
//!
//! A list of filters is a conjunction. Results are ordered afterwards with a
//! [QueryOrderBy].

mod filter;
mod fluent;
mod order;

pub use filter::*;
pub use fluent::*;
pub use order::*;
