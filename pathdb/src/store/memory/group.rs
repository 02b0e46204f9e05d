use crate::collection::{is_valid_collection, Document};
use crate::common::Value;
use crate::database::DatabaseDocument;
use crate::filter::{all_filters_match, QueryFilter, QueryOrderBy};
use crate::path;
use crate::store::memory::tree::{order_and_limit, DocumentTree};

/// Depth-first search for every collection named `target`.
///
/// `visitor` receives the full path and the data of each non-null member of
/// a matching collection. A matched collection is not searched any further,
/// so a same-named collection nested inside one of its documents is never
/// reported. Siblings of a match are still searched.
pub fn find_collections_by_name<F>(root: &Document, target: &str, visitor: &mut F)
where
    F: FnMut(String, &Document),
{
    visit(root, "", target, visitor);
}

fn visit<F>(node: &Document, parent_path: &str, target: &str, visitor: &mut F)
where
    F: FnMut(String, &Document),
{
    if !parent_path.is_empty() && path::classify(parent_path).is_none() {
        return;
    }

    for (key, value) in node.iter() {
        let Value::Document(child) = value else {
            continue;
        };

        let expected_path = if parent_path.is_empty() {
            key.clone()
        } else {
            path::database_path(parent_path, key)
        };

        if key == target
            && path::is_collection_path(&expected_path)
            && is_valid_collection(value)
        {
            for (id, member) in child.iter() {
                if let Value::Document(member) = member {
                    visitor(path::database_path(&expected_path, id), member);
                }
            }
            continue;
        }

        visit(child, &expected_path, target, visitor);
    }
}

/// Runs a collection group query against `tree`.
///
/// Filters are applied while walking, so only matching documents are copied.
pub fn query_collection_group(
    tree: &DocumentTree,
    collection_id: &str,
    filters: &[QueryFilter],
    order_by: Option<&QueryOrderBy>,
    limit: Option<usize>,
) -> Vec<DatabaseDocument> {
    let matches = tree.read(|root| {
        let mut matches = Vec::new();
        find_collections_by_name(root, collection_id, &mut |path, data| {
            if all_filters_match(filters, data) {
                matches.push(DatabaseDocument::new(path, data.clone()));
            }
        });
        matches
    });
    order_and_limit(matches, order_by, limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc;
    use crate::filter::field;

    fn root() -> Document {
        doc! {
            reviews: {
                top: { stars: 1 },
            },
            restaurants: {
                r1: {
                    name: "Chez",
                    reviews: {
                        a: {
                            stars: 5,
                            reviews: { nested: { stars: 2 } },
                        },
                        gone: (Value::Null),
                    },
                },
                r2: {
                    reviews: { b: { stars: 4 } },
                    menus: { m1: { reviews: { c: { stars: 3 } } } },
                },
            },
            users: {
                u1: {
                    reviews: { d: { stars: 2 } },
                    settings: { reviews: "on" },
                },
            },
            posts: {
                reviews: { title: "a document whose id is reviews" },
            },
        }
    }

    fn collect(root: &Document, target: &str) -> Vec<String> {
        let mut paths = Vec::new();
        find_collections_by_name(root, target, &mut |path, _| paths.push(path));
        paths
    }

    #[test]
    fn test_finds_collections_at_every_depth() {
        let paths = collect(&root(), "reviews");
        assert_eq!(
            paths,
            vec![
                "reviews/top",
                "restaurants/r1/reviews/a",
                "restaurants/r2/reviews/b",
                "restaurants/r2/menus/m1/reviews/c",
                "users/u1/reviews/d",
            ]
        );
    }

    #[test]
    fn test_does_not_descend_into_matched_collection() {
        let paths = collect(&root(), "reviews");
        assert!(!paths.iter().any(|path| path.contains("nested")));
    }

    #[test]
    fn test_document_named_like_target_is_not_a_match() {
        let paths = collect(&root(), "reviews");
        assert!(!paths.iter().any(|path| path.starts_with("posts")));
    }

    #[test]
    fn test_invalid_shape_is_not_a_match() {
        let root = doc! {
            shops: {
                s1: { reviews: { x: { stars: 1 }, y: 2 } },
            },
        };
        assert!(collect(&root, "reviews").is_empty());
    }

    #[test]
    fn test_unknown_name_finds_nothing() {
        assert!(collect(&root(), "comments").is_empty());
    }

    #[test]
    fn test_malformed_key_stops_the_walk() {
        let root = doc! {
            "bad//key": { c: { reviews: { x: { stars: 1 } } } },
        };
        assert!(collect(&root, "reviews").is_empty());
    }

    #[test]
    fn test_query_collection_group() {
        let tree = DocumentTree::new(root());
        let order = QueryOrderBy::descending("stars");
        let results =
            query_collection_group(&tree, "reviews", &[field("stars").gte(2)], Some(&order), None);
        let paths: Vec<_> = results.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "restaurants/r1/reviews/a",
                "restaurants/r2/reviews/b",
                "restaurants/r2/menus/m1/reviews/c",
                "users/u1/reviews/d",
            ]
        );
    }

    #[test]
    fn test_query_collection_group_limit() {
        let tree = DocumentTree::new(root());
        let results = query_collection_group(&tree, "reviews", &[], None, Some(2));
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].data, doc! { stars: 1 });
    }
}
