use pathdb::collection::Document;
use pathdb::database::DatabaseDocument;
use pathdb::errors::StoreResult;
use pathdb::store::memory::MemoryDatabase;
use pathdb::DatabaseBuilder;
use serde_json::json;

/// Fixture tree shared by the integration tests.
///
/// `restaurants/*/reviews` and `users/*/reviews` are both `reviews` groups;
/// `restaurants/luigi/reviews/r1/replies/reviews` is nested inside a match and
/// must never be reached by a group query. `users/ghost` is a null member.
pub fn sample_tree() -> serde_json::Value {
    json!({
        "users": {
            "alice": {
                "name": "Alice",
                "age": 30,
                "tags": ["admin", "beta"],
                "address": { "city": "Oslo", "zip": 150 },
                "reviews": {
                    "ur1": { "stars": 4, "text": "ok", "embedding": [0.5, 0.5] }
                }
            },
            "bob": {
                "name": "Bob",
                "age": 17,
                "tags": ["beta"],
                "address": { "city": "Bergen", "zip": 5003 }
            },
            "carol": {
                "name": "Carol",
                "age": 45,
                "tags": [],
                "address": { "city": "Oslo", "zip": 151 }
            },
            "ghost": null
        },
        "restaurants": {
            "luigi": {
                "name": "Luigi",
                "cuisine": "italian",
                "promotions": {
                    "p1": { "title": "lunch", "discount": 25, "active": true },
                    "p2": { "title": "dinner", "discount": 2500, "active": false },
                    "p3": { "title": "brunch", "discount": 25, "active": true }
                },
                "reviews": {
                    "r1": {
                        "stars": 5,
                        "text": "great",
                        "embedding": [1.0, 0.0],
                        "replies": {
                            "x1": {
                                "reviews": {
                                    "deep": { "stars": 1, "embedding": [1.0, 0.0] }
                                }
                            }
                        }
                    },
                    "r2": { "stars": 2, "text": "cold", "embedding": [0.0, 1.0] }
                }
            },
            "sushi": {
                "name": "Sushi Bar",
                "cuisine": "japanese",
                "reviews": {
                    "r3": { "stars": 4, "text": "fresh", "embedding": [0.9, 0.1] },
                    "r4": { "stars": 3, "text": "fine", "embedding": "not a vector" }
                }
            }
        },
        "items": {
            "a": { "label": "a", "vec": [1.0, 0.0, 0.0] },
            "b": { "label": "b", "vec": [0.0, 1.0, 0.0] },
            "c": { "label": "c", "vec": [0.7, 0.7, 0.0] },
            "d": { "label": "d", "vec": [0.0, 0.0, 0.0] },
            "e": { "label": "e", "vec": [1.0, 0.0] }
        }
    })
}

/// The fixture as a [Document].
pub fn sample_document() -> Document {
    Document::from_json(sample_tree()).unwrap_or_default()
}

/// Opens an in-memory database over the fixture with default settings.
pub fn create_test_database() -> StoreResult<MemoryDatabase> {
    DatabaseBuilder::new().open_in_memory_json(sample_tree())
}

/// Paths of `documents`, in order.
pub fn paths(documents: &[DatabaseDocument]) -> Vec<String> {
    documents.iter().map(|document| document.path.clone()).collect()
}
