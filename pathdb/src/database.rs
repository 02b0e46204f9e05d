use crate::collection::Document;
use crate::errors::StoreResult;
use crate::filter::{QueryFilter, QueryOrderBy};
use crate::transaction::DatabaseTransaction;
use crate::vector::DistanceMeasure;
use async_trait::async_trait;
use std::fmt::{Debug, Formatter};
use std::future::Future;
use std::sync::Arc;

/// A record together with the path it was read from.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DatabaseDocument<T = Document> {
    pub path: String,
    pub data: T,
}

impl<T> DatabaseDocument<T> {
    pub fn new(path: impl Into<String>, data: T) -> Self {
        DatabaseDocument {
            path: path.into(),
            data,
        }
    }
}

/// Maps each result of a collection query to the caller's type.
pub type DocumentTransform<R> = Arc<dyn Fn(DatabaseDocument) -> R + Send + Sync>;

fn identity() -> DocumentTransform<DatabaseDocument> {
    Arc::new(|document| document)
}

/// Query over the direct members of one collection.
///
/// ```rust,ignore
/// let request = GetCollectionRequest::new("restaurants/r1/promotions")
///     .filter(field("active").eq(true))
///     .order_by(QueryOrderBy::descending("discount"))
///     .limit(5)
///     .transform(|doc| doc.path);
/// let paths: Vec<String> = db.get_collection(request).await?;
/// ```
pub struct GetCollectionRequest<R = DatabaseDocument> {
    pub collection_path: String,
    pub filters: Vec<QueryFilter>,
    pub order_by: Option<QueryOrderBy>,
    /// `None` or `Some(0)` returns every match.
    pub limit: Option<usize>,
    pub transform: DocumentTransform<R>,
}

impl GetCollectionRequest {
    pub fn new(collection_path: impl Into<String>) -> Self {
        GetCollectionRequest {
            collection_path: collection_path.into(),
            filters: Vec::new(),
            order_by: None,
            limit: None,
            transform: identity(),
        }
    }
}

impl<R> GetCollectionRequest<R> {
    pub fn filter(mut self, filter: QueryFilter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn filters(mut self, filters: impl IntoIterator<Item = QueryFilter>) -> Self {
        self.filters.extend(filters);
        self
    }

    pub fn order_by(mut self, order_by: QueryOrderBy) -> Self {
        self.order_by = Some(order_by);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Replaces the result mapping.
    pub fn transform<R2>(
        self,
        transform: impl Fn(DatabaseDocument) -> R2 + Send + Sync + 'static,
    ) -> GetCollectionRequest<R2> {
        GetCollectionRequest {
            collection_path: self.collection_path,
            filters: self.filters,
            order_by: self.order_by,
            limit: self.limit,
            transform: Arc::new(transform),
        }
    }
}

impl<R> Clone for GetCollectionRequest<R> {
    fn clone(&self) -> Self {
        GetCollectionRequest {
            collection_path: self.collection_path.clone(),
            filters: self.filters.clone(),
            order_by: self.order_by.clone(),
            limit: self.limit,
            transform: self.transform.clone(),
        }
    }
}

impl<R> Debug for GetCollectionRequest<R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GetCollectionRequest")
            .field("collection_path", &self.collection_path)
            .field("filters", &self.filters)
            .field("order_by", &self.order_by)
            .field("limit", &self.limit)
            .finish()
    }
}

/// Query over every collection named `collection_id`, at any depth.
pub struct GetCollectionGroupRequest<R = DatabaseDocument> {
    pub collection_id: String,
    pub filters: Vec<QueryFilter>,
    pub order_by: Option<QueryOrderBy>,
    pub limit: Option<usize>,
    pub transform: DocumentTransform<R>,
}

impl GetCollectionGroupRequest {
    pub fn new(collection_id: impl Into<String>) -> Self {
        GetCollectionGroupRequest {
            collection_id: collection_id.into(),
            filters: Vec::new(),
            order_by: None,
            limit: None,
            transform: identity(),
        }
    }
}

impl<R> GetCollectionGroupRequest<R> {
    pub fn filter(mut self, filter: QueryFilter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn filters(mut self, filters: impl IntoIterator<Item = QueryFilter>) -> Self {
        self.filters.extend(filters);
        self
    }

    pub fn order_by(mut self, order_by: QueryOrderBy) -> Self {
        self.order_by = Some(order_by);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn transform<R2>(
        self,
        transform: impl Fn(DatabaseDocument) -> R2 + Send + Sync + 'static,
    ) -> GetCollectionGroupRequest<R2> {
        GetCollectionGroupRequest {
            collection_id: self.collection_id,
            filters: self.filters,
            order_by: self.order_by,
            limit: self.limit,
            transform: Arc::new(transform),
        }
    }
}

impl<R> Clone for GetCollectionGroupRequest<R> {
    fn clone(&self) -> Self {
        GetCollectionGroupRequest {
            collection_id: self.collection_id.clone(),
            filters: self.filters.clone(),
            order_by: self.order_by.clone(),
            limit: self.limit,
            transform: self.transform.clone(),
        }
    }
}

impl<R> Debug for GetCollectionGroupRequest<R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GetCollectionGroupRequest")
            .field("collection_id", &self.collection_id)
            .field("filters", &self.filters)
            .field("order_by", &self.order_by)
            .field("limit", &self.limit)
            .finish()
    }
}

/// Nearest-neighbour search over the members of one collection.
#[derive(Debug, Clone, PartialEq)]
pub struct FindNearestVectorsInCollectionRequest {
    pub collection_path: String,
    pub vector_field: String,
    pub query_vector: Vec<f64>,
    pub distance_measure: DistanceMeasure,
    pub filters: Vec<QueryFilter>,
    /// `None` or `Some(0)` falls back to the configured default.
    pub limit: Option<usize>,
}

impl FindNearestVectorsInCollectionRequest {
    pub fn new(
        collection_path: impl Into<String>,
        vector_field: impl Into<String>,
        query_vector: Vec<f64>,
        distance_measure: DistanceMeasure,
    ) -> Self {
        FindNearestVectorsInCollectionRequest {
            collection_path: collection_path.into(),
            vector_field: vector_field.into(),
            query_vector,
            distance_measure,
            filters: Vec::new(),
            limit: None,
        }
    }

    pub fn filter(mut self, filter: QueryFilter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Nearest-neighbour search over every collection named `collection_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct FindNearestVectorsInCollectionGroupRequest {
    pub collection_id: String,
    pub vector_field: String,
    pub query_vector: Vec<f64>,
    pub distance_measure: DistanceMeasure,
    pub filters: Vec<QueryFilter>,
    pub limit: Option<usize>,
}

impl FindNearestVectorsInCollectionGroupRequest {
    pub fn new(
        collection_id: impl Into<String>,
        vector_field: impl Into<String>,
        query_vector: Vec<f64>,
        distance_measure: DistanceMeasure,
    ) -> Self {
        FindNearestVectorsInCollectionGroupRequest {
            collection_id: collection_id.into(),
            vector_field: vector_field.into(),
            query_vector,
            distance_measure,
            filters: Vec::new(),
            limit: None,
        }
    }

    pub fn filter(mut self, filter: QueryFilter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// One hit of a vector search. Lower `distance` means more similar.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VectorSearchResult {
    pub path: String,
    pub data: Document,
    pub distance: f64,
}

/// The path-addressed document store.
///
/// Both backends implement this trait: [`crate::store::memory::MemoryDatabase`]
/// keeps the whole tree in memory and [`crate::store::remote::RemoteDatabase`]
/// forwards every call to a [`crate::store::remote::DocumentDriver`]. Code
/// written against the trait behaves the same on either.
///
/// Invalid paths and missing nodes are reported by value (`None`, `false`, an
/// empty list). `Err` is reserved for backend failures and for errors returned
/// by a transaction handler.
#[async_trait]
pub trait Database: Send + Sync {
    type Transaction: DatabaseTransaction + 'static;

    /// Adds `data` as a new document of `collection_path` and returns its path,
    /// or `None` when the collection cannot be resolved.
    async fn create_record(
        &self,
        collection_path: &str,
        data: Document,
    ) -> StoreResult<Option<String>>;

    /// Merges `data` into the document at `path`, creating it if needed.
    async fn set_record(&self, path: &str, data: Document) -> StoreResult<bool>;

    /// Reads the document at `path`. `data` is `None` when nothing is there.
    async fn get_record(&self, path: &str) -> StoreResult<DatabaseDocument<Option<Document>>>;

    async fn get_collection<R>(&self, request: GetCollectionRequest<R>) -> StoreResult<Vec<R>>
    where
        R: Send + 'static;

    async fn get_collection_group<R>(
        &self,
        request: GetCollectionGroupRequest<R>,
    ) -> StoreResult<Vec<R>>
    where
        R: Send + 'static;

    async fn find_nearest_vectors_in_collection(
        &self,
        request: FindNearestVectorsInCollectionRequest,
    ) -> StoreResult<Vec<VectorSearchResult>>;

    async fn find_nearest_vectors_in_collection_group(
        &self,
        request: FindNearestVectorsInCollectionGroupRequest,
    ) -> StoreResult<Vec<VectorSearchResult>>;

    /// Lists the ids of a collection in insertion order.
    async fn get_document_ids(&self, collection_path: &str) -> StoreResult<Vec<String>>;

    /// Runs `handler` inside a transaction and returns its result.
    ///
    /// The handler **must be idempotent**: a remote backend may call it more
    /// than once when concurrent writes force a retry. The in-memory backend
    /// calls it exactly once and gives no isolation.
    async fn run_transaction<T, F, Fut>(&self, handler: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: Fn(Self::Transaction) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = StoreResult<T>> + Send + 'static;
}
