#![allow(dead_code)]

use arrow_array::RecordBatchIterator;
use std::path::Path;

use docret_core::{DistanceMetric, DocumentChunk, Embedder, Result, ScoredChunk, VectorIndex};
use docret_embed::HashEmbedder;
use docret_retriever::DocumentRetriever;
use docret_vector::schema::{build_chunk_schema, chunk_batch};
use docret_vector::MemoryIndex;

/// Index that ignores the query and replays fixed hits, for exact-output checks.
pub struct FixedIndex {
    pub hits: Vec<ScoredChunk>,
    pub metric: DistanceMetric,
}

impl VectorIndex for FixedIndex {
    fn metric(&self) -> DistanceMetric { self.metric }
    fn dim(&self) -> Option<usize> { None }
    fn len(&self) -> Result<usize> { Ok(self.hits.len()) }
    fn search_by_vector(&self, _query: &[f32], k: usize) -> Result<Vec<ScoredChunk>> {
        Ok(self.hits.iter().take(k).cloned().collect())
    }
}

pub fn fixed_retriever(hits: Vec<(DocumentChunk, f32)>) -> DocumentRetriever {
    let hits = hits.into_iter().map(|(c, s)| ScoredChunk::new(c, s)).collect();
    DocumentRetriever::new(Box::new(HashEmbedder::new(8)), Box::new(FixedIndex { hits, metric: DistanceMetric::L2 }))
}

pub fn homestead_chunks() -> Vec<DocumentChunk> {
    vec![
        DocumentChunk::new("how to start a fire with flint and steel")
            .with_metadata("source", "survival.pdf")
            .with_metadata("page", 12),
        DocumentChunk::new("purifying water by boiling for one minute").with_metadata("source", "survival.pdf"),
        DocumentChunk::new("planting potatoes in raised garden beds").with_metadata("page", 4),
        DocumentChunk::new("storing firewood off the ground to keep it dry"),
        DocumentChunk::new("building a rainwater collection barrel"),
    ]
}

pub fn memory_retriever(chunks: Vec<DocumentChunk>, metric: DistanceMetric) -> DocumentRetriever {
    let embedder = HashEmbedder::new(64);
    let index = MemoryIndex::build(&embedder, chunks, metric).expect("build memory index");
    DocumentRetriever::new(Box::new(embedder), Box::new(index))
}

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
