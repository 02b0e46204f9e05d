use crate::collection::{is_valid_collection, Document};
use crate::common::Value;
use crate::database::DatabaseDocument;
use crate::filter::{all_filters_match, sort_by_property, QueryFilter, QueryOrderBy};
use crate::path::{self, PathKind};
use crate::PATH_SEPARATOR;
use parking_lot::RwLock;
use std::sync::Arc;

/// The in-memory document tree.
///
/// Cloning a `DocumentTree` yields another handle on the same tree. The lock
/// only keeps concurrent handles memory safe: nothing here is isolated or
/// transactional, and no guard outlives a call.
///
/// Every read hands out deep copies, so mutating a returned document never
/// reaches the tree.
#[derive(Clone, Default)]
pub struct DocumentTree {
    inner: Arc<DocumentTreeInner>,
}

impl DocumentTree {
    pub fn new(root: Document) -> Self {
        DocumentTree {
            inner: Arc::new(DocumentTreeInner {
                root: RwLock::new(root),
            }),
        }
    }

    /// Returns a copy of the document at `path`, or `None` when `path` is not
    /// a document path or nothing document-shaped lives there.
    pub fn get(&self, path: &str) -> Option<Document> {
        self.inner.get(path)
    }

    /// Adds `data` to the collection at `collection_path` under a generated id
    /// and returns `"{last_segment}/{id}"`.
    ///
    /// The id is `"{last_segment}_{member_count + 1}"`. The returned path is
    /// not prefixed with the parents of the collection.
    pub fn create(&self, collection_path: &str, data: Document) -> Option<String> {
        self.inner.create(collection_path, data)
    }

    /// Stores `data` at `document_path` under the parent collection, replacing
    /// whatever was there, and returns the path.
    pub fn create_at(&self, document_path: &str, data: Document) -> Option<String> {
        self.inner.create_at(document_path, data)
    }

    /// Merges `data` into the document at `path`, or inserts it when there is
    /// no document yet. Fails when the parent collection does not exist.
    pub fn set(&self, path: &str, data: Document) -> bool {
        self.inner.set(path, data)
    }

    /// Lists the member ids of a collection in insertion order, `Null`
    /// members included.
    pub fn document_ids(&self, collection_path: &str) -> Vec<String> {
        self.inner.document_ids(collection_path)
    }

    /// Filters, sorts and truncates the members of a collection.
    pub fn query_collection(
        &self,
        collection_path: &str,
        filters: &[QueryFilter],
        order_by: Option<&QueryOrderBy>,
        limit: Option<usize>,
    ) -> Vec<DatabaseDocument> {
        let matches = self.inner.collect_matches(collection_path, filters);
        order_and_limit(matches, order_by, limit)
    }

    /// Runs `reader` against the root while holding the read lock.
    pub(crate) fn read<R>(&self, reader: impl FnOnce(&Document) -> R) -> R {
        let root = self.inner.root.read();
        reader(&root)
    }

    /// Returns a copy of the whole tree.
    pub fn snapshot(&self) -> Document {
        self.inner.root.read().clone()
    }
}

/// Sorts `values` when an order is given, then keeps the first `limit`.
/// A limit of `None` or `Some(0)` keeps everything.
pub(crate) fn order_and_limit(
    mut values: Vec<DatabaseDocument>,
    order_by: Option<&QueryOrderBy>,
    limit: Option<usize>,
) -> Vec<DatabaseDocument> {
    if let Some(order_by) = order_by {
        sort_by_property(&mut values, order_by);
    }
    if let Some(limit) = limit.filter(|limit| *limit > 0) {
        values.truncate(limit);
    }
    values
}

#[derive(Default)]
struct DocumentTreeInner {
    root: RwLock<Document>,
}

impl DocumentTreeInner {
    fn get(&self, path: &str) -> Option<Document> {
        let segments = segments_of(path, PathKind::Document)?;
        let root = self.root.read();
        node(&root, &segments)
            .and_then(Value::as_document)
            .cloned()
    }

    fn create(&self, collection_path: &str, data: Document) -> Option<String> {
        let segments = segments_of(collection_path, PathKind::Collection)?;
        let last_segment = *segments.last()?;

        let mut root = self.root.write();
        let collection = node_mut(&mut root, &segments)?.as_document_mut()?;
        let id = format!("{}_{}", last_segment, collection.size() + 1);
        let created = path::database_path(last_segment, &id);
        collection.put(id, data);
        Some(created)
    }

    fn create_at(&self, document_path: &str, data: Document) -> Option<String> {
        let segments = segments_of(document_path, PathKind::Document)?;
        let (id, parent) = segments.split_last()?;

        let mut root = self.root.write();
        let collection = node_mut(&mut root, parent)?.as_document_mut()?;
        collection.put(*id, data);
        Some(segments.join(PATH_SEPARATOR))
    }

    fn set(&self, path: &str, data: Document) -> bool {
        let Some(segments) = segments_of(path, PathKind::Document) else {
            return false;
        };
        let Some((id, parent)) = segments.split_last() else {
            return false;
        };

        let mut root = self.root.write();
        let Some(collection) = node_mut(&mut root, parent).and_then(Value::as_document_mut)
        else {
            return false;
        };

        match collection.get_document_mut(id) {
            Some(existing) => existing.merge(data),
            None => {
                collection.put(*id, data);
            }
        }
        true
    }

    fn document_ids(&self, collection_path: &str) -> Vec<String> {
        let Some(segments) = segments_of(collection_path, PathKind::Collection) else {
            return Vec::new();
        };
        let root = self.root.read();
        match collection_node(&root, &segments) {
            Some(collection) => collection.keys().map(str::to_string).collect(),
            None => Vec::new(),
        }
    }

    fn collect_matches(
        &self,
        collection_path: &str,
        filters: &[QueryFilter],
    ) -> Vec<DatabaseDocument> {
        let Some(segments) = segments_of(collection_path, PathKind::Collection) else {
            return Vec::new();
        };
        let base = segments.join(PATH_SEPARATOR);

        let root = self.root.read();
        let Some(collection) = collection_node(&root, &segments) else {
            return Vec::new();
        };

        collection
            .iter()
            .filter_map(|(id, member)| member.as_document().map(|data| (id, data)))
            .filter(|(_, data)| all_filters_match(filters, data))
            .map(|(id, data)| {
                DatabaseDocument::new(path::database_path(&base, id), data.clone())
            })
            .collect()
    }
}

fn segments_of(path: &str, kind: PathKind) -> Option<path::Segments<'_>> {
    let segments = path::segments(path)?;
    let is_document = segments.len() % 2 == 0;
    match (kind, is_document) {
        (PathKind::Document, true) | (PathKind::Collection, false) => Some(segments),
        _ => None,
    }
}

/// Walks `segments` from the root, entering one document per segment.
fn node<'a>(root: &'a Document, segments: &[&str]) -> Option<&'a Value> {
    let (first, rest) = segments.split_first()?;
    let mut current = root.get(first)?;
    for segment in rest {
        current = current.as_document()?.get(segment)?;
    }
    Some(current)
}

/// The collection at `segments`, if the node there is a valid collection.
fn collection_node<'a>(root: &'a Document, segments: &[&str]) -> Option<&'a Document> {
    node(root, segments)
        .filter(|value| is_valid_collection(value))
        .and_then(Value::as_document)
}

fn node_mut<'a>(root: &'a mut Document, segments: &[&str]) -> Option<&'a mut Value> {
    let (first, rest) = segments.split_first()?;
    let mut current = root.get_mut(first)?;
    for segment in rest {
        current = current.as_document_mut()?.get_mut(segment)?;
    }
    Some(current)
}
