mod common;

use docret_core::{DistanceMetric, Embedder, Error, VectorIndex};
use docret_embed::HashEmbedder;
use docret_vector::LanceIndex;
use tempfile::TempDir;

use common::{sample_chunks, seed_table};

#[test]
fn search_returns_nearest_first_with_metadata() {
    let tmp = TempDir::new().expect("tmp");
    let embedder = HashEmbedder::new(64);
    seed_table(tmp.path(), "documents", &sample_chunks(), &embedder).expect("seed");

    let index = LanceIndex::open(tmp.path(), "documents", DistanceMetric::L2).expect("open");
    assert_eq!(index.dim(), Some(64));
    assert_eq!(index.len().expect("len"), 3);

    let query = embedder.embed_query("purifying water by boiling for one minute").expect("query");
    let hits = index.search_by_vector(&query, 2).expect("search");
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].chunk.id, "survival:1");
    assert!(hits[0].score.abs() < 1e-4, "exact match has ~zero distance, got {}", hits[0].score);
    assert!(hits[0].score <= hits[1].score, "distances ascend");
    assert_eq!(hits[0].chunk.metadata.get("source").and_then(|v| v.as_str()), Some("survival.pdf"));
}

#[test]
fn metadata_survives_round_trip_through_table() {
    let tmp = TempDir::new().expect("tmp");
    let embedder = HashEmbedder::new(32);
    seed_table(tmp.path(), "documents", &sample_chunks(), &embedder).expect("seed");
    let index = LanceIndex::open(tmp.path(), "documents", DistanceMetric::Cosine).expect("open");

    let query = embedder.embed_query("how to start a fire with flint and steel").expect("query");
    let top = index.search_by_vector(&query, 1).expect("search").remove(0);
    assert_eq!(top.chunk.page().and_then(serde_json::Value::as_i64), Some(12));

    let garden = embedder.embed_query("planting potatoes in raised garden beds").expect("query");
    let top = index.search_by_vector(&garden, 1).expect("search").remove(0);
    assert!(top.chunk.metadata.is_empty(), "rows without metadata come back empty");
}

#[test]
fn k_larger_than_table_returns_every_row() {
    let tmp = TempDir::new().expect("tmp");
    let embedder = HashEmbedder::new(32);
    seed_table(tmp.path(), "documents", &sample_chunks(), &embedder).expect("seed");
    let index = LanceIndex::open(tmp.path(), "documents", DistanceMetric::L2).expect("open");
    let query = embedder.embed_query("fire").expect("query");
    assert_eq!(index.search_by_vector(&query, 50).expect("search").len(), 3);
}

#[test]
fn empty_table_yields_no_hits() {
    let tmp = TempDir::new().expect("tmp");
    let embedder = HashEmbedder::new(16);
    seed_table(tmp.path(), "documents", &[], &embedder).expect("seed");
    let index = LanceIndex::open(tmp.path(), "documents", DistanceMetric::L2).expect("open");
    let query = embedder.embed_query("anything").expect("query");
    assert!(index.is_empty().expect("is_empty"));
    assert!(index.search_by_vector(&query, 5).expect("search").is_empty());
}

#[test]
fn missing_directory_is_an_index_load_error() {
    let tmp = TempDir::new().expect("tmp");
    let missing = tmp.path().join("nope");
    assert!(matches!(LanceIndex::open(&missing, "documents", DistanceMetric::L2), Err(Error::IndexLoad { .. })));
}

#[test]
fn missing_table_is_an_index_load_error() {
    let tmp = TempDir::new().expect("tmp");
    let embedder = HashEmbedder::new(16);
    seed_table(tmp.path(), "other", &sample_chunks(), &embedder).expect("seed");
    match LanceIndex::open(tmp.path(), "documents", DistanceMetric::L2) {
        Err(Error::IndexLoad { message, .. }) => assert!(message.contains("documents"), "{message}"),
        Err(other) => panic!("expected IndexLoad, got {other}"),
        Ok(_) => panic!("opening a missing table must fail"),
    }
}

#[test]
fn query_dimension_mismatch_is_reported() {
    let tmp = TempDir::new().expect("tmp");
    let embedder = HashEmbedder::new(16);
    seed_table(tmp.path(), "documents", &sample_chunks(), &embedder).expect("seed");
    let index = LanceIndex::open(tmp.path(), "documents", DistanceMetric::L2).expect("open");
    let wrong = HashEmbedder::new(8).embed_query("fire").expect("query");
    assert!(matches!(index.search_by_vector(&wrong, 3), Err(Error::Search(_))));
}

#[test]
fn json_null_metadata_reads_as_empty() {
    use arrow_array::types::Float32Type;
    use arrow_array::{FixedSizeListArray, RecordBatch, RecordBatchIterator, StringArray};
    use docret_vector::schema::build_chunk_schema;
    use std::sync::Arc;

    let tmp = TempDir::new().expect("tmp");
    let embedder = HashEmbedder::new(8);
    let vector = embedder.embed_query("rain barrel").expect("vector");
    let schema = build_chunk_schema(8);
    let batch = RecordBatch::try_new(schema.clone(), vec![
        Arc::new(StringArray::from(vec!["rain:0"])),
        Arc::new(StringArray::from(vec!["collecting rain in a barrel"])),
        Arc::new(StringArray::from(vec![Some("null")])),
        Arc::new(FixedSizeListArray::from_iter_primitive::<Float32Type, _, _>(
            vec![Some(vector.iter().map(|&x| Some(x)).collect::<Vec<_>>())],
            8,
        )),
    ])
    .expect("batch");
    let rt = tokio::runtime::Runtime::new().expect("rt");
    rt.block_on(async {
        let db = lancedb::connect(&tmp.path().to_string_lossy()).execute().await.expect("connect");
        let reader = Box::new(RecordBatchIterator::new(vec![Ok(batch)].into_iter(), schema));
        db.create_table("documents", reader).execute().await.expect("create");
    });

    let index = LanceIndex::open(tmp.path(), "documents", DistanceMetric::L2).expect("open");
    let hits = index.search_by_vector(&vector, 1).expect("search");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].chunk.id, "rain:0");
    assert!(hits[0].chunk.metadata.is_empty());
}
