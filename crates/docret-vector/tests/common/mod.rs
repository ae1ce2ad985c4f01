use arrow_array::RecordBatchIterator;
use std::path::Path;

use docret_core::{DocumentChunk, Embedder};
use docret_vector::schema::{build_chunk_schema, chunk_batch};

/// Create `table` under `dir` holding `chunks` embedded with `embedder`.
pub fn seed_table(dir: &Path, table: &str, chunks: &[DocumentChunk], embedder: &dyn Embedder) -> anyhow::Result<()> {
    let vectors = embedder.embed(chunks)?;
    let dim = i32::try_from(embedder.dim())?;
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let db = lancedb::connect(&dir.to_string_lossy()).execute().await?;
        let schema = build_chunk_schema(dim);
        let batches = if chunks.is_empty() { vec![] } else { vec![Ok(chunk_batch(chunks, &vectors, dim)?)] };
        let reader = Box::new(RecordBatchIterator::new(batches.into_iter(), schema));
        db.create_table(table, reader).execute().await?;
        anyhow::Ok(())
    })
}

pub fn sample_chunks() -> Vec<DocumentChunk> {
    vec![
        DocumentChunk::new("how to start a fire with flint and steel")
            .with_id("survival:0")
            .with_metadata("source", "survival.pdf")
            .with_metadata("page", 12),
        DocumentChunk::new("purifying water by boiling for one minute")
            .with_id("survival:1")
            .with_metadata("source", "survival.pdf"),
        DocumentChunk::new("planting potatoes in raised garden beds").with_id("garden:0"),
    ]
}
