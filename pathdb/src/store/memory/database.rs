use crate::collection::Document;
use crate::common::Logger;
use crate::database::{
    Database, DatabaseDocument, FindNearestVectorsInCollectionGroupRequest,
    FindNearestVectorsInCollectionRequest, GetCollectionGroupRequest, GetCollectionRequest,
    VectorSearchResult,
};
use crate::database_config::DatabaseConfig;
use crate::errors::StoreResult;
use crate::store::memory::group::query_collection_group;
use crate::store::memory::transaction::MemoryTransaction;
use crate::store::memory::tree::DocumentTree;
use crate::vector::rank_nearest;
use async_trait::async_trait;
use std::future::Future;

/// In-memory implementation of [Database].
///
/// The whole tree lives in memory and every query is a linear scan. Its
/// results match what a remote backend returns for the same data, which makes
/// it a drop-in replacement in tests. Clones share the same tree.
///
/// Nothing here ever returns `Err` on its own: invalid paths give `None`,
/// `false` or an empty list. Only a transaction handler can fail a call.
#[derive(Clone)]
pub struct MemoryDatabase {
    tree: DocumentTree,
    config: DatabaseConfig,
    logger: Logger,
}

impl MemoryDatabase {
    pub fn new(root: Document, config: DatabaseConfig) -> Self {
        let logger = config.logger();
        logger.debug(format_args!(
            "Opening in-memory database with {} top-level collections",
            root.size()
        ));
        MemoryDatabase {
            tree: DocumentTree::new(root),
            config,
            logger,
        }
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Returns a copy of the whole tree.
    pub fn snapshot(&self) -> Document {
        self.tree.snapshot()
    }
}

pub(crate) fn collection_query<R>(tree: &DocumentTree, request: GetCollectionRequest<R>) -> Vec<R> {
    tree.query_collection(
        &request.collection_path,
        &request.filters,
        request.order_by.as_ref(),
        request.limit,
    )
    .into_iter()
    .map(|document| (request.transform)(document))
    .collect()
}

#[async_trait]
impl Database for MemoryDatabase {
    type Transaction = MemoryTransaction;

    async fn create_record(
        &self,
        collection_path: &str,
        data: Document,
    ) -> StoreResult<Option<String>> {
        let created = self.tree.create(collection_path, data);
        match &created {
            Some(path) => self.logger.debug(format_args!("Created record {}", path)),
            None => self.logger.warn(format_args!(
                "Cannot create record in {}: collection not found",
                collection_path
            )),
        }
        Ok(created)
    }

    async fn set_record(&self, path: &str, data: Document) -> StoreResult<bool> {
        let stored = self.tree.set(path, data);
        if !stored {
            self.logger
                .warn(format_args!("Cannot set record {}: parent not found", path));
        }
        Ok(stored)
    }

    async fn get_record(&self, path: &str) -> StoreResult<DatabaseDocument<Option<Document>>> {
        Ok(DatabaseDocument::new(path, self.tree.get(path)))
    }

    async fn get_collection<R>(&self, request: GetCollectionRequest<R>) -> StoreResult<Vec<R>>
    where
        R: Send + 'static,
    {
        Ok(collection_query(&self.tree, request))
    }

    async fn get_collection_group<R>(
        &self,
        request: GetCollectionGroupRequest<R>,
    ) -> StoreResult<Vec<R>>
    where
        R: Send + 'static,
    {
        let results = query_collection_group(
            &self.tree,
            &request.collection_id,
            &request.filters,
            request.order_by.as_ref(),
            request.limit,
        );
        self.logger.debug(format_args!(
            "Collection group {} matched {} documents",
            request.collection_id,
            results.len()
        ));
        Ok(results
            .into_iter()
            .map(|document| (request.transform)(document))
            .collect())
    }

    async fn find_nearest_vectors_in_collection(
        &self,
        request: FindNearestVectorsInCollectionRequest,
    ) -> StoreResult<Vec<VectorSearchResult>> {
        let candidates =
            self.tree
                .query_collection(&request.collection_path, &request.filters, None, None);
        Ok(rank_nearest(
            candidates,
            &request.vector_field,
            &request.query_vector,
            request.distance_measure,
            self.config.vector_limit(request.limit),
        ))
    }

    async fn find_nearest_vectors_in_collection_group(
        &self,
        request: FindNearestVectorsInCollectionGroupRequest,
    ) -> StoreResult<Vec<VectorSearchResult>> {
        let candidates = query_collection_group(
            &self.tree,
            &request.collection_id,
            &request.filters,
            None,
            None,
        );
        Ok(rank_nearest(
            candidates,
            &request.vector_field,
            &request.query_vector,
            request.distance_measure,
            self.config.vector_limit(request.limit),
        ))
    }

    async fn get_document_ids(&self, collection_path: &str) -> StoreResult<Vec<String>> {
        Ok(self.tree.document_ids(collection_path))
    }

    async fn run_transaction<T, F, Fut>(&self, handler: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: Fn(Self::Transaction) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = StoreResult<T>> + Send + 'static,
    {
        let transaction = MemoryTransaction::new(self.tree.clone(), self.logger.clone());
        let result = handler(transaction).await;
        if let Err(err) = &result {
            self.logger
                .error(format_args!("Transaction handler failed: {}", err));
        }
        result
    }
}
