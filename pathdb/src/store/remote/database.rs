use crate::collection::Document;
use crate::common::{Logger, Value};
use crate::database::{
    Database, DatabaseDocument, FindNearestVectorsInCollectionGroupRequest,
    FindNearestVectorsInCollectionRequest, GetCollectionGroupRequest, GetCollectionRequest,
    VectorSearchResult,
};
use crate::database_config::DatabaseConfig;
use crate::errors::{ErrorKind, StoreError, StoreResult};
use crate::filter::{QueryFilter, QueryOrderBy};
use crate::path;
use crate::store::remote::driver::{
    DocumentDriver, DriverQuery, DriverSnapshot, NearestQuery, QueryTarget,
    DISTANCE_RESULT_FIELD,
};
use crate::store::remote::transaction::RemoteTransaction;
use crate::vector::DistanceMeasure;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;

/// [Database] backed by an external document database.
///
/// Every call is translated into [DocumentDriver] operations. Paths are
/// checked first where the in-memory engine would answer by value, so the
/// driver never sees a malformed document or collection path. Driver errors
/// are passed through unchanged.
pub struct RemoteDatabase<D: DocumentDriver> {
    driver: Arc<D>,
    config: DatabaseConfig,
    logger: Logger,
}

impl<D: DocumentDriver> Clone for RemoteDatabase<D> {
    fn clone(&self) -> Self {
        RemoteDatabase {
            driver: self.driver.clone(),
            config: self.config.clone(),
            logger: self.logger.clone(),
        }
    }
}

impl<D: DocumentDriver> RemoteDatabase<D> {
    pub fn new(driver: D, config: DatabaseConfig) -> Self {
        let logger = config.logger();
        RemoteDatabase {
            driver: Arc::new(driver),
            config,
            logger,
        }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    async fn nearest(
        &self,
        target: QueryTarget,
        filters: Vec<QueryFilter>,
        vector_field: String,
        query_vector: Vec<f64>,
        distance_measure: DistanceMeasure,
        limit: Option<usize>,
    ) -> StoreResult<Vec<VectorSearchResult>> {
        let query = DriverQuery {
            target,
            filters,
            order_by: None,
            limit: None,
        };
        let nearest = NearestQuery {
            vector_field,
            query_vector,
            distance_measure,
            limit: self.config.vector_limit(limit),
            distance_result_field: DISTANCE_RESULT_FIELD.to_string(),
        };
        let snapshots = self.driver.find_nearest(query, nearest).await?;
        snapshots
            .into_iter()
            .filter_map(|snapshot| snapshot.data.map(|data| (snapshot.path, data)))
            .map(|(path, data)| into_vector_result(path, data))
            .collect()
    }
}

/// Builds the driver query of a request. A limit of zero means no limit.
pub(crate) fn driver_query(
    target: QueryTarget,
    filters: Vec<QueryFilter>,
    order_by: Option<QueryOrderBy>,
    limit: Option<usize>,
) -> DriverQuery {
    DriverQuery {
        target,
        filters,
        order_by,
        limit: limit.filter(|limit| *limit > 0),
    }
}

/// Turns driver snapshots into records, dropping the ones without data.
pub(crate) fn into_documents<R>(
    snapshots: Vec<DriverSnapshot>,
    transform: impl Fn(DatabaseDocument) -> R,
) -> Vec<R> {
    snapshots
        .into_iter()
        .filter_map(|snapshot| {
            snapshot
                .data
                .map(|data| transform(DatabaseDocument::new(snapshot.path, data)))
        })
        .collect()
}

fn into_vector_result(path: String, mut data: Document) -> StoreResult<VectorSearchResult> {
    let distance = data
        .remove(DISTANCE_RESULT_FIELD)
        .as_ref()
        .and_then(Value::as_f64)
        .ok_or_else(|| {
            log::error!("Driver returned {} without a distance", path);
            StoreError::new(
                &format!("Driver returned {} without a distance", path),
                ErrorKind::BackendError,
            )
        })?;
    Ok(VectorSearchResult {
        path,
        data,
        distance,
    })
}

#[async_trait]
impl<D: DocumentDriver> Database for RemoteDatabase<D> {
    type Transaction = RemoteTransaction<D::Transaction>;

    /// Returns the full path the driver assigned to the new document.
    async fn create_record(
        &self,
        collection_path: &str,
        data: Document,
    ) -> StoreResult<Option<String>> {
        if !path::is_collection_path(collection_path) {
            self.logger
                .warn(format_args!("Invalid collection path {}", collection_path));
            return Ok(None);
        }
        let created = self.driver.add_document(collection_path, data).await?;
        self.logger.debug(format_args!("Created record {}", created));
        Ok(Some(created))
    }

    async fn set_record(&self, path: &str, data: Document) -> StoreResult<bool> {
        if !path::is_document_path(path) {
            self.logger.warn(format_args!("Invalid document path {}", path));
            return Ok(false);
        }
        self.driver.set_document(path, data, true).await?;
        Ok(true)
    }

    async fn get_record(&self, path: &str) -> StoreResult<DatabaseDocument<Option<Document>>> {
        if !path::is_document_path(path) {
            return Ok(DatabaseDocument::new(path, None));
        }
        let snapshot = self.driver.get_document(path).await?;
        Ok(DatabaseDocument::new(snapshot.path, snapshot.data))
    }

    async fn get_collection<R>(&self, request: GetCollectionRequest<R>) -> StoreResult<Vec<R>>
    where
        R: Send + 'static,
    {
        if !path::is_collection_path(&request.collection_path) {
            self.logger.warn(format_args!(
                "Invalid collection path {}",
                request.collection_path
            ));
            return Ok(Vec::new());
        }
        let query = driver_query(
            QueryTarget::Collection(request.collection_path),
            request.filters,
            request.order_by,
            request.limit,
        );
        let snapshots = self.driver.run_query(query).await?;
        Ok(into_documents(snapshots, |document| (request.transform)(document)))
    }

    async fn get_collection_group<R>(
        &self,
        request: GetCollectionGroupRequest<R>,
    ) -> StoreResult<Vec<R>>
    where
        R: Send + 'static,
    {
        let query = driver_query(
            QueryTarget::CollectionGroup(request.collection_id),
            request.filters,
            request.order_by,
            request.limit,
        );
        let snapshots = self.driver.run_query(query).await?;
        Ok(into_documents(snapshots, |document| (request.transform)(document)))
    }

    async fn find_nearest_vectors_in_collection(
        &self,
        request: FindNearestVectorsInCollectionRequest,
    ) -> StoreResult<Vec<VectorSearchResult>> {
        if !path::is_collection_path(&request.collection_path) {
            self.logger.warn(format_args!(
                "Invalid collection path {}",
                request.collection_path
            ));
            return Ok(Vec::new());
        }
        self.nearest(
            QueryTarget::Collection(request.collection_path),
            request.filters,
            request.vector_field,
            request.query_vector,
            request.distance_measure,
            request.limit,
        )
        .await
    }

    async fn find_nearest_vectors_in_collection_group(
        &self,
        request: FindNearestVectorsInCollectionGroupRequest,
    ) -> StoreResult<Vec<VectorSearchResult>> {
        self.nearest(
            QueryTarget::CollectionGroup(request.collection_id),
            request.filters,
            request.vector_field,
            request.query_vector,
            request.distance_measure,
            request.limit,
        )
        .await
    }

    async fn get_document_ids(&self, collection_path: &str) -> StoreResult<Vec<String>> {
        if !path::is_collection_path(collection_path) {
            return Ok(Vec::new());
        }
        self.driver.list_document_ids(collection_path).await
    }

    async fn run_transaction<T, F, Fut>(&self, handler: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: Fn(Self::Transaction) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = StoreResult<T>> + Send + 'static,
    {
        let logger = self.logger.clone();
        let result = self
            .driver
            .run_transaction(move |transaction| {
                handler(RemoteTransaction::new(transaction, logger.clone()))
            })
            .await;
        if let Err(err) = &result {
            self.logger.error(format_args!("Transaction failed: {}", err));
        }
        result
    }
}
