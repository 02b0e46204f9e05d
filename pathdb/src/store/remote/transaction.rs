use crate::collection::Document;
use crate::common::Logger;
use crate::database::{DatabaseDocument, GetCollectionRequest};
use crate::errors::StoreResult;
use crate::path;
use crate::store::remote::database::{driver_query, into_documents};
use crate::store::remote::driver::{DriverTransaction, QueryTarget};
use crate::transaction::DatabaseTransaction;
use async_trait::async_trait;

/// Transaction handle of [`crate::store::remote::RemoteDatabase`], wrapping
/// the driver's own transaction. Writes are staged by the driver; a write to
/// a malformed document path is refused with `Ok(false)` before it is staged.
pub struct RemoteTransaction<X: DriverTransaction> {
    inner: X,
    logger: Logger,
}

impl<X: DriverTransaction> RemoteTransaction<X> {
    pub(crate) fn new(inner: X, logger: Logger) -> Self {
        RemoteTransaction { inner, logger }
    }

    pub fn driver_transaction(&self) -> &X {
        &self.inner
    }

    fn check_document_path(&self, path: &str) -> bool {
        let valid = path::is_document_path(path);
        if !valid {
            self.logger
                .warn(format_args!("Invalid document path {} in transaction", path));
        }
        valid
    }
}

#[async_trait]
impl<X: DriverTransaction> DatabaseTransaction for RemoteTransaction<X> {
    async fn get_collection<R>(&self, request: GetCollectionRequest<R>) -> StoreResult<Vec<R>>
    where
        R: Send + 'static,
    {
        if !path::is_collection_path(&request.collection_path) {
            self.logger.warn(format_args!(
                "Invalid collection path {} in transaction",
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
        let snapshots = self.inner.run_query(query).await?;
        Ok(into_documents(snapshots, |document| (request.transform)(document)))
    }

    async fn get_record(&self, path: &str) -> StoreResult<DatabaseDocument<Option<Document>>> {
        if !path::is_document_path(path) {
            return Ok(DatabaseDocument::new(path, None));
        }
        let snapshot = self.inner.get_document(path).await?;
        Ok(DatabaseDocument::new(snapshot.path, snapshot.data))
    }

    fn create_record(&self, document_path: &str, data: Document) -> StoreResult<bool> {
        if !self.check_document_path(document_path) {
            return Ok(false);
        }
        self.inner.create(document_path, data)?;
        Ok(true)
    }

    fn set_record(&self, path: &str, data: Document) -> StoreResult<bool> {
        if !self.check_document_path(path) {
            return Ok(false);
        }
        self.inner.set(path, data, true)?;
        Ok(true)
    }

    fn update_record(&self, path: &str, data: Document) -> StoreResult<bool> {
        if !self.check_document_path(path) {
            return Ok(false);
        }
        self.inner.update(path, data)?;
        Ok(true)
    }
}
