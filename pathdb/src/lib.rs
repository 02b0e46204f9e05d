#![allow(clippy::module_inception)]
//! # PathDB - Path-Addressed Document Store
//!
//! PathDB stores JSON-like documents in a hierarchy of collections and
//! documents, addressed by slash-separated paths such as
//! `restaurants/luigi/reviews/r1`. Odd segment counts name collections, even
//! segment counts name documents.
//!
//! ## Key Features
//!
//! - **Two backends behind one trait**: an in-memory engine over a single
//!   document tree, and a remote backend that forwards to an external document
//!   database through a [`store::remote::DocumentDriver`]
//! - **Collection queries**: field filters, ordering by a field path and limits
//! - **Collection groups**: query every collection with a given id, at any depth
//! - **Vector search**: nearest neighbours by euclidean, cosine or dot product
//!   distance
//! - **Transactions**: handler based, retried by remote drivers
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pathdb::database_builder::DatabaseBuilder;
//! use pathdb::database::{Database, GetCollectionRequest};
//! use pathdb::filter::field;
//! use serde_json::json;
//!
//! let db = DatabaseBuilder::new().open_in_memory_json(json!({
//!     "users": { "alice": { "age": 30 }, "bob": { "age": 12 } }
//! }))?;
//!
//! let adults = db
//!     .get_collection(GetCollectionRequest::new("users").filter(field("age").gte(18)))
//!     .await?;
//! assert_eq!(adults.len(), 1);
//! ```
//!
//! ## Module Organization
//!
//! - [`collection`] - Documents and collection shape checks
//! - [`common`] - Values and logging
//! - [`database`] - The store contract and its request types
//! - [`database_builder`] - Builder for database handles
//! - [`database_config`] - Logging and query defaults
//! - [`errors`] - Error types and result definitions
//! - [`filter`] - Query filters and ordering
//! - [`path`] - Path classification and manipulation
//! - [`store`] - Storage backends
//! - [`transaction`] - Transaction handles
//! - [`vector`] - Distance measures and nearest-neighbour ranking

pub mod collection;
pub mod common;
pub mod database;
pub mod database_builder;
pub mod database_config;
pub mod errors;
pub mod filter;
pub mod path;
pub mod store;
pub mod transaction;
pub mod vector;

pub use database::Database;
pub use database_builder::DatabaseBuilder;
pub use database_config::DatabaseConfig;
pub use transaction::DatabaseTransaction;

/// Separates the segments of a store path.
pub const PATH_SEPARATOR: &str = "/";

/// Separates the segments of a field path inside a document.
pub const FIELD_SEPARATOR: &str = ".";

/// Log target used when no logger name is configured.
pub const DEFAULT_LOGGER_NAME: &str = "pathdb";

/// Result count of vector queries that do not set a limit.
pub const DEFAULT_VECTOR_LIMIT: usize = 10;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc;

    // takes effect for every unit test in the crate
    #[ctor::ctor]
    fn init() {
        colog::init();
    }

    #[test]
    fn test_separators_address_nested_fields() {
        let db = DatabaseBuilder::new()
            .open_in_memory(doc! { users: { alice: { address: { city: "Oslo" } } } })
            .unwrap();
        let record_path = ["users", "alice"].join(PATH_SEPARATOR);
        assert!(path::is_document_path(&record_path));

        let field_path = ["address", "city"].join(FIELD_SEPARATOR);
        let snapshot = db.snapshot();
        let alice = snapshot.get_document("users").and_then(|u| u.get_document("alice"));
        assert_eq!(
            alice.and_then(|a| a.resolve(&field_path)),
            Some(&common::Value::from("Oslo"))
        );
    }

    #[test]
    fn test_default_config_uses_crate_defaults() {
        let config = DatabaseConfig::default();
        assert_eq!(config.logger_name(), DEFAULT_LOGGER_NAME);
        assert_eq!(config.vector_limit(None), DEFAULT_VECTOR_LIMIT);
        assert_eq!(config.vector_limit(Some(0)), DEFAULT_VECTOR_LIMIT);
        assert_eq!(config.vector_limit(Some(3)), 3);
    }
}
