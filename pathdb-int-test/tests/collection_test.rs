use pathdb::common::Value;
use pathdb::database::{Database, GetCollectionRequest};
use pathdb::doc;
use pathdb::filter::{field, QueryOrderBy};
use pathdb_int_test::test_util::{create_test_database, paths};

#[ctor::ctor]
fn init() {
    colog::init();
}

#[tokio::test]
async fn test_get_collection_returns_members_in_order() {
    let db = create_test_database().unwrap();
    let users = db.get_collection(GetCollectionRequest::new("users")).await.unwrap();
    assert_eq!(paths(&users), vec!["users/alice", "users/bob", "users/carol"]);
}

#[tokio::test]
async fn test_filter_on_number() {
    let db = create_test_database().unwrap();
    let adults = db
        .get_collection(GetCollectionRequest::new("users").filter(field("age").gte(18)))
        .await
        .unwrap();
    assert_eq!(paths(&adults), vec!["users/alice", "users/carol"]);
}

#[tokio::test]
async fn test_filters_are_conjunctive() {
    let db = create_test_database().unwrap();
    let request = GetCollectionRequest::new("users")
        .filter(field("address.city").eq("Oslo"))
        .filter(field("age").lt(40));
    let users = db.get_collection(request).await.unwrap();
    assert_eq!(paths(&users), vec!["users/alice"]);
}

#[tokio::test]
async fn test_filter_on_nested_field_and_arrays() {
    let db = create_test_database().unwrap();
    let beta = db
        .get_collection(
            GetCollectionRequest::new("users").filter(field("tags").array_contains("beta")),
        )
        .await
        .unwrap();
    assert_eq!(paths(&beta), vec!["users/alice", "users/bob"]);

    let named = db
        .get_collection(
            GetCollectionRequest::new("users").filter(field("name").in_array(vec!["Bob", "Carol"])),
        )
        .await
        .unwrap();
    assert_eq!(paths(&named), vec!["users/bob", "users/carol"]);
}

#[tokio::test]
async fn test_not_equal_includes_missing_field() {
    let db = create_test_database().unwrap();
    let users = db
        .get_collection(GetCollectionRequest::new("users").filter(field("nickname").ne("Al")))
        .await
        .unwrap();
    assert_eq!(users.len(), 3);
}

#[tokio::test]
async fn test_order_by_and_limit() {
    let db = create_test_database().unwrap();
    let request = GetCollectionRequest::new("restaurants/luigi/promotions")
        .order_by(QueryOrderBy::descending("discount"))
        .limit(2);
    let promotions = db.get_collection(request).await.unwrap();
    assert_eq!(
        paths(&promotions),
        vec![
            "restaurants/luigi/promotions/p2",
            "restaurants/luigi/promotions/p1"
        ]
    );
}

#[tokio::test]
async fn test_order_by_is_stable() {
    let db = create_test_database().unwrap();
    let request = GetCollectionRequest::new("restaurants/luigi/promotions")
        .order_by(QueryOrderBy::ascending("discount"));
    let promotions = db.get_collection(request).await.unwrap();
    assert_eq!(
        paths(&promotions),
        vec![
            "restaurants/luigi/promotions/p1",
            "restaurants/luigi/promotions/p3",
            "restaurants/luigi/promotions/p2"
        ]
    );
}

#[tokio::test]
async fn test_limit_zero_returns_everything() {
    let db = create_test_database().unwrap();
    let users = db
        .get_collection(GetCollectionRequest::new("users").limit(0))
        .await
        .unwrap();
    assert_eq!(users.len(), 3);
}

#[tokio::test]
async fn test_transform() {
    let db = create_test_database().unwrap();
    let request = GetCollectionRequest::new("users")
        .order_by(QueryOrderBy::ascending("age"))
        .transform(|document| document.data.get("name").cloned().unwrap_or_default());
    let names: Vec<Value> = db.get_collection(request).await.unwrap();
    assert_eq!(
        names,
        vec![Value::from("Bob"), Value::from("Alice"), Value::from("Carol")]
    );
}

#[tokio::test]
async fn test_invalid_collections_are_empty() {
    let db = create_test_database().unwrap();
    for path in ["", "users/alice", "missing", "users/alice/name", "/users"] {
        let results = db.get_collection(GetCollectionRequest::new(path)).await.unwrap();
        assert!(results.is_empty(), "{} should be empty", path);
    }
}

#[tokio::test]
async fn test_get_record() {
    let db = create_test_database().unwrap();
    let record = db.get_record("users/alice").await.unwrap();
    assert_eq!(record.path, "users/alice");
    let data = record.data.unwrap();
    assert_eq!(data.resolve("address.city"), Some(&Value::from("Oslo")));

    assert_eq!(db.get_record("users/nobody").await.unwrap().data, None);
    assert_eq!(db.get_record("users").await.unwrap().data, None);
    assert_eq!(db.get_record("users/ghost").await.unwrap().data, None);
}

#[tokio::test]
async fn test_set_record_merges_and_creates() {
    let db = create_test_database().unwrap();
    assert!(db.set_record("users/bob", doc! { age: 18 }).await.unwrap());
    let bob = db.get_record("users/bob").await.unwrap().data.unwrap();
    assert_eq!(bob.get("age"), Some(&Value::from(18)));
    assert_eq!(bob.get("name"), Some(&Value::from("Bob")));

    assert!(db.set_record("users/dave", doc! { name: "Dave" }).await.unwrap());
    assert_eq!(
        db.get_record("users/dave").await.unwrap().data,
        Some(doc! { name: "Dave" })
    );

    assert!(!db.set_record("nowhere/x", doc! { a: 1 }).await.unwrap());
    assert!(!db.set_record("users", doc! { a: 1 }).await.unwrap());
}

#[tokio::test]
async fn test_create_record() {
    let db = create_test_database().unwrap();
    let created = db
        .create_record("restaurants/luigi/promotions", doc! { title: "happy hour", discount: 10 })
        .await
        .unwrap();
    assert_eq!(created.as_deref(), Some("promotions/promotions_4"));

    let stored = db
        .get_record("restaurants/luigi/promotions/promotions_4")
        .await
        .unwrap();
    assert_eq!(stored.data.and_then(|d| d.get("discount").cloned()), Some(Value::from(10)));

    assert_eq!(db.create_record("missing", doc! {}).await.unwrap(), None);
    assert_eq!(db.create_record("users/alice", doc! {}).await.unwrap(), None);
}

#[tokio::test]
async fn test_get_document_ids() {
    let db = create_test_database().unwrap();
    assert_eq!(
        db.get_document_ids("users").await.unwrap(),
        vec!["alice", "bob", "carol", "ghost"]
    );
    assert!(db.get_document_ids("users/alice").await.unwrap().is_empty());
    assert!(db.get_document_ids("missing").await.unwrap().is_empty());
}
