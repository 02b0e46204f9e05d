use async_trait::async_trait;
use parking_lot::Mutex;
use pathdb::collection::Document;
use pathdb::common::Value;
use pathdb::database::DatabaseDocument;
use pathdb::errors::{ErrorKind, StoreError, StoreResult};
use pathdb::store::memory::{query_collection_group, DocumentTree};
use pathdb::store::remote::{
    DocumentDriver, DriverQuery, DriverSnapshot, DriverTransaction, NearestQuery, QueryTarget,
};
use pathdb::vector::rank_nearest;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A [DocumentDriver] over an in-memory tree that records every call.
///
/// Transactions stage their writes and apply them on commit. With
/// [FakeDriver::with_conflicts] the first attempts are thrown away as if
/// another writer had won, so the body runs again.
pub struct FakeDriver {
    tree: DocumentTree,
    calls: Arc<Mutex<Vec<String>>>,
    next_id: AtomicUsize,
    conflicts: usize,
    failure: Mutex<Option<StoreError>>,
}

impl FakeDriver {
    pub fn new(root: Document) -> Self {
        FakeDriver {
            tree: DocumentTree::new(root),
            calls: Arc::new(Mutex::new(Vec::new())),
            next_id: AtomicUsize::new(1),
            conflicts: 0,
            failure: Mutex::new(None),
        }
    }

    /// Discards the first `conflicts` transaction attempts.
    pub fn with_conflicts(mut self, conflicts: usize) -> Self {
        self.conflicts = conflicts;
        self
    }

    /// Makes the next driver call fail with `error`.
    pub fn fail_next(&self, error: StoreError) {
        *self.failure.lock() = Some(error);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn tree(&self) -> &DocumentTree {
        &self.tree
    }

    fn record(&self, call: String) -> StoreResult<()> {
        self.calls.lock().push(call);
        match self.failure.lock().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

fn query_snapshots(tree: &DocumentTree, query: &DriverQuery) -> Vec<DriverSnapshot> {
    let documents = match &query.target {
        QueryTarget::Collection(path) => {
            tree.query_collection(path, &query.filters, query.order_by.as_ref(), query.limit)
        }
        QueryTarget::CollectionGroup(id) => query_collection_group(
            tree,
            id,
            &query.filters,
            query.order_by.as_ref(),
            query.limit,
        ),
    };
    documents
        .into_iter()
        .map(|document| DriverSnapshot::new(document.path, Some(document.data)))
        .collect()
}

fn not_found(path: &str) -> StoreError {
    StoreError::new(&format!("No parent collection for {}", path), ErrorKind::NotFound)
}

#[async_trait]
impl DocumentDriver for FakeDriver {
    type Transaction = FakeTransaction;

    async fn add_document(&self, collection_path: &str, data: Document) -> StoreResult<String> {
        self.record(format!("add_document {}", collection_path))?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let path = format!("{}/auto-{}", collection_path, id);
        self.tree
            .create_at(&path, data)
            .ok_or_else(|| not_found(collection_path))
    }

    async fn set_document(&self, path: &str, data: Document, merge: bool) -> StoreResult<()> {
        self.record(format!("set_document {} merge={}", path, merge))?;
        let stored = if merge {
            self.tree.set(path, data)
        } else {
            self.tree.create_at(path, data).is_some()
        };
        if stored {
            Ok(())
        } else {
            Err(not_found(path))
        }
    }

    async fn get_document(&self, path: &str) -> StoreResult<DriverSnapshot> {
        self.record(format!("get_document {}", path))?;
        Ok(DriverSnapshot::new(path, self.tree.get(path)))
    }

    async fn run_query(&self, query: DriverQuery) -> StoreResult<Vec<DriverSnapshot>> {
        self.record(format!("run_query {:?} limit={:?}", query.target, query.limit))?;
        Ok(query_snapshots(&self.tree, &query))
    }

    async fn find_nearest(
        &self,
        query: DriverQuery,
        nearest: NearestQuery,
    ) -> StoreResult<Vec<DriverSnapshot>> {
        self.record(format!(
            "find_nearest {:?} {} limit={}",
            query.target,
            nearest.distance_measure.name(),
            nearest.limit
        ))?;
        let candidates = query_snapshots(&self.tree, &query)
            .into_iter()
            .filter_map(|snapshot| snapshot.data.map(|data| DatabaseDocument::new(snapshot.path, data)))
            .collect();
        let ranked = rank_nearest(
            candidates,
            &nearest.vector_field,
            &nearest.query_vector,
            nearest.distance_measure,
            nearest.limit,
        );
        Ok(ranked
            .into_iter()
            .map(|result| {
                let mut data = result.data;
                data.put(
                    nearest.distance_result_field.clone(),
                    Value::F64(result.distance),
                );
                DriverSnapshot::new(result.path, Some(data))
            })
            .collect())
    }

    async fn list_document_ids(&self, collection_path: &str) -> StoreResult<Vec<String>> {
        self.record(format!("list_document_ids {}", collection_path))?;
        Ok(self.tree.document_ids(collection_path))
    }

    async fn run_transaction<T, F, Fut>(&self, body: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: Fn(Self::Transaction) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = StoreResult<T>> + Send + 'static,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            self.record(format!("run_transaction attempt={}", attempt))?;
            let transaction = FakeTransaction::new(self.tree.clone());
            let staged = transaction.staged.clone();
            let value = body(transaction).await?;
            if attempt <= self.conflicts {
                continue;
            }
            let writes = std::mem::take(&mut *staged.lock());
            commit(&self.tree, writes)?;
            return Ok(value);
        }
    }
}

/// A write waiting for commit.
#[derive(Debug, Clone, PartialEq)]
pub enum StagedWrite {
    Create(String, Document),
    Set(String, Document, bool),
    Update(String, Document),
}

fn commit(tree: &DocumentTree, writes: Vec<StagedWrite>) -> StoreResult<()> {
    for write in writes {
        match write {
            StagedWrite::Create(path, data) => {
                if tree.get(&path).is_some() {
                    return Err(StoreError::new(
                        &format!("Document {} already exists", path),
                        ErrorKind::TransactionAborted,
                    ));
                }
                tree.create_at(&path, data).ok_or_else(|| not_found(&path))?;
            }
            StagedWrite::Set(path, data, merge) => {
                let stored = if merge {
                    tree.set(&path, data)
                } else {
                    tree.create_at(&path, data).is_some()
                };
                if !stored {
                    return Err(not_found(&path));
                }
            }
            StagedWrite::Update(path, data) => {
                if tree.get(&path).is_none() {
                    return Err(StoreError::new(
                        &format!("Document {} does not exist", path),
                        ErrorKind::TransactionAborted,
                    ));
                }
                tree.set(&path, data);
            }
        }
    }
    Ok(())
}

/// Transaction of [FakeDriver]. Reads see committed data only.
pub struct FakeTransaction {
    tree: DocumentTree,
    staged: Arc<Mutex<Vec<StagedWrite>>>,
}

impl FakeTransaction {
    fn new(tree: DocumentTree) -> Self {
        FakeTransaction {
            tree,
            staged: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn staged(&self) -> Vec<StagedWrite> {
        self.staged.lock().clone()
    }
}

#[async_trait]
impl DriverTransaction for FakeTransaction {
    async fn get_document(&self, path: &str) -> StoreResult<DriverSnapshot> {
        Ok(DriverSnapshot::new(path, self.tree.get(path)))
    }

    async fn run_query(&self, query: DriverQuery) -> StoreResult<Vec<DriverSnapshot>> {
        Ok(query_snapshots(&self.tree, &query))
    }

    fn create(&self, path: &str, data: Document) -> StoreResult<()> {
        self.staged
            .lock()
            .push(StagedWrite::Create(path.to_string(), data));
        Ok(())
    }

    fn set(&self, path: &str, data: Document, merge: bool) -> StoreResult<()> {
        self.staged
            .lock()
            .push(StagedWrite::Set(path.to_string(), data, merge));
        Ok(())
    }

    fn update(&self, path: &str, data: Document) -> StoreResult<()> {
        self.staged
            .lock()
            .push(StagedWrite::Update(path.to_string(), data));
        Ok(())
    }
}
