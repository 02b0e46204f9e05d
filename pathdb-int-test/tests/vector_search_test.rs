use pathdb::database::{
    Database, FindNearestVectorsInCollectionGroupRequest, FindNearestVectorsInCollectionRequest,
    VectorSearchResult,
};
use pathdb::filter::field;
use pathdb::vector::DistanceMeasure;
use pathdb::DatabaseBuilder;
use pathdb_int_test::test_util::{create_test_database, sample_tree};

#[ctor::ctor]
fn init() {
    colog::init();
}

fn result_paths(results: &[VectorSearchResult]) -> Vec<&str> {
    results.iter().map(|result| result.path.as_str()).collect()
}

#[tokio::test]
async fn test_euclidean() {
    let db = create_test_database().unwrap();
    let request = FindNearestVectorsInCollectionRequest::new(
        "items",
        "vec",
        vec![1.0, 0.0, 0.0],
        DistanceMeasure::Euclidean,
    );
    let results = db.find_nearest_vectors_in_collection(request).await.unwrap();
    assert_eq!(result_paths(&results), vec!["items/a", "items/c", "items/d", "items/b"]);
    assert_eq!(results[0].distance, 0.0);
    assert!((results[1].distance - 0.58f64.sqrt()).abs() < 1e-9);
}

#[tokio::test]
async fn test_cosine_ranks_zero_vector_last() {
    let db = create_test_database().unwrap();
    let request = FindNearestVectorsInCollectionRequest::new(
        "items",
        "vec",
        vec![1.0, 0.0, 0.0],
        DistanceMeasure::Cosine,
    );
    let results = db.find_nearest_vectors_in_collection(request).await.unwrap();
    assert_eq!(result_paths(&results), vec!["items/a", "items/c", "items/b", "items/d"]);
    assert_eq!(results[3].distance, 2.0);
}

#[tokio::test]
async fn test_dot_product() {
    let db = create_test_database().unwrap();
    let request = FindNearestVectorsInCollectionRequest::new(
        "items",
        "vec",
        vec![1.0, 0.0, 0.0],
        DistanceMeasure::DotProduct,
    )
    .limit(2);
    let results = db.find_nearest_vectors_in_collection(request).await.unwrap();
    assert_eq!(result_paths(&results), vec!["items/a", "items/c"]);
    assert_eq!(results[0].distance, -1.0);
}

#[tokio::test]
async fn test_wrong_dimension_is_skipped() {
    let db = create_test_database().unwrap();
    let request = FindNearestVectorsInCollectionRequest::new(
        "items",
        "vec",
        vec![1.0, 0.0],
        DistanceMeasure::Euclidean,
    );
    let results = db.find_nearest_vectors_in_collection(request).await.unwrap();
    assert_eq!(result_paths(&results), vec!["items/e"]);
}

#[tokio::test]
async fn test_empty_query_vector() {
    let db = create_test_database().unwrap();
    let request =
        FindNearestVectorsInCollectionRequest::new("items", "vec", vec![], DistanceMeasure::Cosine);
    let results = db.find_nearest_vectors_in_collection(request).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_default_limit_from_config() {
    let db = DatabaseBuilder::new()
        .default_vector_limit(1)
        .open_in_memory_json(sample_tree())
        .unwrap();
    let request = FindNearestVectorsInCollectionRequest::new(
        "items",
        "vec",
        vec![0.0, 1.0, 0.0],
        DistanceMeasure::Euclidean,
    );
    let results = db.find_nearest_vectors_in_collection(request).await.unwrap();
    assert_eq!(result_paths(&results), vec!["items/b"]);
}

#[tokio::test]
async fn test_collection_group_search() {
    let db = create_test_database().unwrap();
    let request = FindNearestVectorsInCollectionGroupRequest::new(
        "reviews",
        "embedding",
        vec![1.0, 0.0],
        DistanceMeasure::Euclidean,
    );
    let results = db
        .find_nearest_vectors_in_collection_group(request)
        .await
        .unwrap();
    assert_eq!(
        result_paths(&results),
        vec![
            "restaurants/luigi/reviews/r1",
            "restaurants/sushi/reviews/r3",
            "users/alice/reviews/ur1",
            "restaurants/luigi/reviews/r2",
        ]
    );
}

#[tokio::test]
async fn test_collection_group_search_with_filter() {
    let db = create_test_database().unwrap();
    let request = FindNearestVectorsInCollectionGroupRequest::new(
        "reviews",
        "embedding",
        vec![0.0, 1.0],
        DistanceMeasure::Cosine,
    )
    .filter(field("stars").gte(3));
    let results = db
        .find_nearest_vectors_in_collection_group(request)
        .await
        .unwrap();
    assert_eq!(
        result_paths(&results),
        vec![
            "users/alice/reviews/ur1",
            "restaurants/sushi/reviews/r3",
            "restaurants/luigi/reviews/r1",
        ]
    );
    assert!(results.iter().all(|result| result.data.get("stars").is_some()));
}
