use crate::collection::Document;
use crate::database::{DatabaseDocument, GetCollectionRequest};
use crate::errors::StoreResult;
use async_trait::async_trait;

/// The handle a transaction handler works with.
///
/// Reads are asynchronous. Writes are synchronous: a remote backend stages
/// them and commits when the handler returns `Ok`, the in-memory backend
/// applies them at once. Each write returns whether it was accepted; an
/// invalid path yields `Ok(false)`.
///
/// Handlers receiving this type may run more than once on a remote backend
/// and must be idempotent.
#[async_trait]
pub trait DatabaseTransaction: Send + Sync {
    async fn get_collection<R>(&self, request: GetCollectionRequest<R>) -> StoreResult<Vec<R>>
    where
        R: Send + 'static;

    async fn get_record(&self, path: &str) -> StoreResult<DatabaseDocument<Option<Document>>>;

    /// Creates the document at `document_path`. Unlike
    /// [`crate::database::Database::create_record`] the caller picks the id.
    fn create_record(&self, document_path: &str, data: Document) -> StoreResult<bool>;

    /// Merges `data` into the document at `path`, creating it if needed.
    fn set_record(&self, path: &str, data: Document) -> StoreResult<bool>;

    /// Updates fields of an existing document.
    fn update_record(&self, path: &str, data: Document) -> StoreResult<bool>;
}
