use pathdb::common::Value;
use pathdb::database::{Database, GetCollectionRequest};
use pathdb::errors::{ErrorKind, StoreError};
use pathdb::filter::field;
use pathdb::{doc, DatabaseTransaction};
use pathdb_int_test::test_util::create_test_database;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[ctor::ctor]
fn init() {
    colog::init();
}

#[tokio::test]
async fn test_read_modify_write() {
    let db = create_test_database().unwrap();
    let total = db
        .run_transaction(|tx| async move {
            let alice = tx.get_record("users/alice").await?;
            let age = alice
                .data
                .and_then(|data| data.get("age").and_then(Value::as_i64))
                .unwrap_or_default();
            tx.update_record("users/alice", doc! { age: (age + 1) })?;
            Ok::<i64, StoreError>(age + 1)
        })
        .await
        .unwrap();
    assert_eq!(total, 31);

    let alice = db.get_record("users/alice").await.unwrap().data.unwrap();
    assert_eq!(alice.get("age"), Some(&Value::from(31)));
    assert_eq!(alice.get("name"), Some(&Value::from("Alice")));
}

#[tokio::test]
async fn test_create_with_explicit_id() {
    let db = create_test_database().unwrap();
    let created = db
        .run_transaction(|tx| async move {
            tx.create_record("users/dave", doc! { name: "Dave", age: 52 })
        })
        .await
        .unwrap();
    assert!(created);
    assert_eq!(
        db.get_document_ids("users").await.unwrap(),
        vec!["alice", "bob", "carol", "ghost", "dave"]
    );
}

#[tokio::test]
async fn test_query_inside_transaction() {
    let db = create_test_database().unwrap();
    let count = db
        .run_transaction(|tx| async move {
            let oslo = tx
                .get_collection(
                    GetCollectionRequest::new("users").filter(field("address.city").eq("Oslo")),
                )
                .await?;
            for user in &oslo {
                tx.set_record(&user.path, doc! { region: "east" })?;
            }
            Ok::<usize, StoreError>(oslo.len())
        })
        .await
        .unwrap();
    assert_eq!(count, 2);

    let east = db
        .get_collection(GetCollectionRequest::new("users").filter(field("region").eq("east")))
        .await
        .unwrap();
    assert_eq!(east.len(), 2);
}

#[tokio::test]
async fn test_handler_runs_once() {
    let db = create_test_database().unwrap();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    db.run_transaction(move |_tx| {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<(), StoreError>(())
        }
    })
    .await
    .unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_handler_error_is_returned() {
    let db = create_test_database().unwrap();
    let result = db
        .run_transaction(|_tx| async move {
            Err::<(), StoreError>(StoreError::new("insufficient stock", ErrorKind::TransactionAborted))
        })
        .await;
    let err = result.unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::TransactionAborted);
    assert_eq!(err.message(), "insufficient stock");
}

#[tokio::test]
async fn test_invalid_paths_are_refused() {
    let db = create_test_database().unwrap();
    let (created, updated) = db
        .run_transaction(|tx| async move {
            let created = tx.create_record("users", doc! { a: 1 })?;
            let updated = tx.update_record("nowhere/x", doc! { a: 1 })?;
            Ok::<(bool, bool), StoreError>((created, updated))
        })
        .await
        .unwrap();
    assert!(!created);
    assert!(!updated);
}
