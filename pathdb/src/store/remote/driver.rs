use crate::collection::Document;
use crate::errors::StoreResult;
use crate::filter::{QueryFilter, QueryOrderBy};
use crate::vector::DistanceMeasure;
use async_trait::async_trait;
use std::future::Future;

/// Field a driver writes the computed distance into for nearest-neighbour
/// queries.
pub const DISTANCE_RESULT_FIELD: &str = "vector_distance";

/// What a [DriverQuery] runs against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryTarget {
    /// The members of the collection at this path.
    Collection(String),
    /// Every collection with this id, at any depth.
    CollectionGroup(String),
}

/// A structured query handed to the driver.
#[derive(Debug, Clone, PartialEq)]
pub struct DriverQuery {
    pub target: QueryTarget,
    pub filters: Vec<QueryFilter>,
    pub order_by: Option<QueryOrderBy>,
    /// Already normalized: `Some(0)` never reaches the driver.
    pub limit: Option<usize>,
}

impl DriverQuery {
    pub fn new(target: QueryTarget) -> Self {
        DriverQuery {
            target,
            filters: Vec::new(),
            order_by: None,
            limit: None,
        }
    }
}

/// The nearest-neighbour part of a vector query.
#[derive(Debug, Clone, PartialEq)]
pub struct NearestQuery {
    pub vector_field: String,
    pub query_vector: Vec<f64>,
    pub distance_measure: DistanceMeasure,
    pub limit: usize,
    pub distance_result_field: String,
}

/// A document as returned by the driver. `data` is `None` when nothing
/// exists at `path`.
#[derive(Debug, Clone, PartialEq)]
pub struct DriverSnapshot {
    pub path: String,
    pub data: Option<Document>,
}

impl DriverSnapshot {
    pub fn new(path: impl Into<String>, data: Option<Document>) -> Self {
        DriverSnapshot {
            path: path.into(),
            data,
        }
    }

    /// The last segment of the path.
    pub fn id(&self) -> &str {
        crate::path::document_id(&self.path).unwrap_or_default()
    }
}

/// Contract of an external document database.
///
/// [`crate::store::remote::RemoteDatabase`] translates every store call into
/// these operations. Errors are returned unchanged to the caller.
#[async_trait]
pub trait DocumentDriver: Send + Sync + 'static {
    type Transaction: DriverTransaction + 'static;

    /// Adds `data` under a driver generated id and returns the full path.
    async fn add_document(&self, collection_path: &str, data: Document) -> StoreResult<String>;

    /// Writes `data` at `path`. With `merge` the fields are merged into an
    /// existing document instead of replacing it.
    async fn set_document(&self, path: &str, data: Document, merge: bool) -> StoreResult<()>;

    async fn get_document(&self, path: &str) -> StoreResult<DriverSnapshot>;

    async fn run_query(&self, query: DriverQuery) -> StoreResult<Vec<DriverSnapshot>>;

    /// Runs a nearest-neighbour query. Each returned document carries its
    /// distance in `nearest.distance_result_field`.
    async fn find_nearest(
        &self,
        query: DriverQuery,
        nearest: NearestQuery,
    ) -> StoreResult<Vec<DriverSnapshot>>;

    async fn list_document_ids(&self, collection_path: &str) -> StoreResult<Vec<String>>;

    /// Runs `body` in a driver transaction, committing its staged writes when
    /// it returns `Ok`. On contention the driver may call `body` again.
    async fn run_transaction<T, F, Fut>(&self, body: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: Fn(Self::Transaction) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = StoreResult<T>> + Send + 'static;
}

/// Transaction handle of a [DocumentDriver]. Reads go to the driver, writes
/// are staged until commit.
#[async_trait]
pub trait DriverTransaction: Send + Sync {
    async fn get_document(&self, path: &str) -> StoreResult<DriverSnapshot>;

    async fn run_query(&self, query: DriverQuery) -> StoreResult<Vec<DriverSnapshot>>;

    /// Stages the creation of a new document. Fails at commit if it exists.
    fn create(&self, path: &str, data: Document) -> StoreResult<()>;

    fn set(&self, path: &str, data: Document, merge: bool) -> StoreResult<()>;

    /// Stages an update of an existing document.
    fn update(&self, path: &str, data: Document) -> StoreResult<()>;
}
