use pathdb::collection::Document;
use pathdb::database::{Database, FindNearestVectorsInCollectionRequest, GetCollectionRequest};
use pathdb::doc;
use pathdb::errors::StoreResult;
use pathdb::filter::{field, QueryOrderBy};
use pathdb::vector::DistanceMeasure;
use pathdb::DatabaseBuilder;

#[tokio::main]
async fn main() -> StoreResult<()> {
    println!("Starting stress test...");
    let db = DatabaseBuilder::new()
        .log_level_name("WARN")
        .open_in_memory(doc! { records: {} })?;

    let count = 100_000;
    let start = std::time::Instant::now();
    for i in 0..count {
        let mut record = Document::new();
        record.put("seq", i as i64);
        record.put("processed", i % 3 == 0);
        record.put("embedding", vec![(i % 7) as f64, (i % 11) as f64]);
        db.set_record(&format!("records/r{}", i), record).await?;
    }
    println!("Inserted {} records in {:?}", count, start.elapsed());

    let start = std::time::Instant::now();
    let processed = db
        .get_collection(
            GetCollectionRequest::new("records")
                .filter(field("processed").eq(true))
                .order_by(QueryOrderBy::descending("seq"))
                .limit(100),
        )
        .await?;
    println!("Queried {} processed records in {:?}", processed.len(), start.elapsed());

    let start = std::time::Instant::now();
    let nearest = db
        .find_nearest_vectors_in_collection(
            FindNearestVectorsInCollectionRequest::new(
                "records",
                "embedding",
                vec![3.0, 5.0],
                DistanceMeasure::Euclidean,
            )
            .limit(10),
        )
        .await?;
    println!("Found {} nearest records in {:?}", nearest.len(), start.elapsed());

    Ok(())
}
