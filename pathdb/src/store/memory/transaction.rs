use crate::collection::Document;
use crate::common::Logger;
use crate::database::{DatabaseDocument, GetCollectionRequest};
use crate::errors::StoreResult;
use crate::store::memory::database::collection_query;
use crate::store::memory::tree::DocumentTree;
use crate::transaction::DatabaseTransaction;
use async_trait::async_trait;

/// Transaction handle of [`crate::store::memory::MemoryDatabase`].
///
/// Works directly on the shared tree: writes are visible at once, to this
/// handle and to every other one, and are not rolled back when the handler
/// fails.
#[derive(Clone)]
pub struct MemoryTransaction {
    tree: DocumentTree,
    logger: Logger,
}

impl MemoryTransaction {
    pub(crate) fn new(tree: DocumentTree, logger: Logger) -> Self {
        MemoryTransaction { tree, logger }
    }
}

#[async_trait]
impl DatabaseTransaction for MemoryTransaction {
    async fn get_collection<R>(&self, request: GetCollectionRequest<R>) -> StoreResult<Vec<R>>
    where
        R: Send + 'static,
    {
        Ok(collection_query(&self.tree, request))
    }

    async fn get_record(&self, path: &str) -> StoreResult<DatabaseDocument<Option<Document>>> {
        Ok(DatabaseDocument::new(path, self.tree.get(path)))
    }

    fn create_record(&self, document_path: &str, data: Document) -> StoreResult<bool> {
        let created = self.tree.create_at(document_path, data).is_some();
        if !created {
            self.logger.warn(format_args!(
                "Cannot create record {} in transaction",
                document_path
            ));
        }
        Ok(created)
    }

    fn set_record(&self, path: &str, data: Document) -> StoreResult<bool> {
        Ok(self.tree.set(path, data))
    }

    fn update_record(&self, path: &str, data: Document) -> StoreResult<bool> {
        Ok(self.tree.set(path, data))
    }
}
