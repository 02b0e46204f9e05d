//! Slash-separated paths addressing collections and documents.
//!
//! A path alternates collection and document segments:
//! `users/alice/orders/o1` is a document path (even number of segments),
//! `users/alice/orders` is a collection path (odd number). The input is
//! trimmed first. A path with any empty segment (`"/a"`, `"a/"`, `"a//b"`) or
//! an empty string is neither.
//!
//! None of these functions fail: an invalid path yields `false` or `None`.
use crate::PATH_SEPARATOR;
use smallvec::SmallVec;

pub(crate) type Segments<'a> = SmallVec<[&'a str; 8]>;

/// The kind of entity a path addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    Document,
    Collection,
}

/// Splits a trimmed path into segments, or `None` when the path is empty or
/// has an empty segment.
pub(crate) fn segments(path: &str) -> Option<Segments<'_>> {
    let path = path.trim();
    if path.is_empty() {
        return None;
    }
    let segments: Segments<'_> = path.split(PATH_SEPARATOR).collect();
    if segments.iter().any(|segment| segment.is_empty()) {
        return None;
    }
    Some(segments)
}

pub fn classify(path: &str) -> Option<PathKind> {
    let segments = segments(path)?;
    if segments.len() % 2 == 0 {
        Some(PathKind::Document)
    } else {
        Some(PathKind::Collection)
    }
}

pub fn is_document_path(path: &str) -> bool {
    classify(path) == Some(PathKind::Document)
}

pub fn is_collection_path(path: &str) -> bool {
    classify(path) == Some(PathKind::Collection)
}

/// Returns the last segment of `path`, or `None` for an empty path.
///
/// No validation beyond that: `document_id("users")` is `"users"`.
pub fn document_id(path: &str) -> Option<&str> {
    let path = path.trim();
    if path.is_empty() {
        return None;
    }
    path.rsplit(PATH_SEPARATOR).next()
}

/// Returns the collection containing the entity at `path`.
///
/// For a document that is the collection it lives in. For a collection it is
/// the collection two levels up, which a top-level collection does not have.
pub fn parent_collection_path(path: &str) -> Option<String> {
    let segments = segments(path)?;
    let parent = match segments.len() % 2 {
        0 => segments[..segments.len() - 1].join(PATH_SEPARATOR),
        _ => {
            if segments.len() < 3 {
                return None;
            }
            segments[..segments.len() - 2].join(PATH_SEPARATOR)
        }
    };
    if is_collection_path(&parent) {
        Some(parent)
    } else {
        None
    }
}

/// Returns the document owning the entity at `path`, if there is one.
pub fn parent_document_path(path: &str) -> Option<String> {
    let segments = segments(path)?;
    let drop = match segments.len() % 2 {
        0 => 2,
        _ => 1,
    };
    if segments.len() <= drop {
        return None;
    }
    Some(segments[..segments.len() - drop].join(PATH_SEPARATOR))
}

/// Joins a collection path and a document id. Neither side is validated.
pub fn database_path(collection_id: &str, document_id: &str) -> String {
    format!("{}{}{}", collection_id, PATH_SEPARATOR, document_id)
}

/// Returns the top-level collection name of a document path.
pub fn oldest_parent_name(path: &str) -> Option<&str> {
    if !is_document_path(path) {
        return None;
    }
    path.trim().split(PATH_SEPARATOR).next()
}
