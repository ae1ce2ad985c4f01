//! In-memory exhaustive index.
//!
//! Holds `(chunk, vector)` pairs and scores every entry per query. Ties keep
//! insertion order, so repeated queries return identical results.

use docret_core::{DistanceMetric, DocumentChunk, Embedder, Error, Result, ScoredChunk, VectorIndex};

#[derive(Debug, Default)]
pub struct MemoryIndex {
    entries: Vec<(DocumentChunk, Vec<f32>)>,
    metric: DistanceMetric,
    dim: Option<usize>,
}

impl MemoryIndex {
    pub fn new(metric: DistanceMetric) -> Self {
        Self { entries: Vec::new(), metric, dim: None }
    }

    /// Embed `chunks` with `embedder` and index them.
    pub fn build(embedder: &dyn Embedder, chunks: Vec<DocumentChunk>, metric: DistanceMetric) -> Result<Self> {
        let vectors = embedder.embed(&chunks)?;
        let mut index = Self::new(metric);
        for (chunk, vector) in chunks.into_iter().zip(vectors) {
            index.insert(chunk, vector)?;
        }
        Ok(index)
    }

    pub fn insert(&mut self, chunk: DocumentChunk, vector: Vec<f32>) -> Result<()> {
        match self.dim {
            Some(d) if d != vector.len() => {
                return Err(Error::InvalidArgument(format!("vector has {} dimensions, index stores {d}", vector.len())));
            }
            None => self.dim = Some(vector.len()),
            _ => {}
        }
        self.entries.push((chunk, vector));
        Ok(())
    }
}

impl VectorIndex for MemoryIndex {
    fn metric(&self) -> DistanceMetric { self.metric }

    fn dim(&self) -> Option<usize> { self.dim }

    fn len(&self) -> Result<usize> { Ok(self.entries.len()) }

    fn search_by_vector(&self, query: &[f32], k: usize) -> Result<Vec<ScoredChunk>> {
        if let Some(d) = self.dim.filter(|d| *d != query.len()) {
            return Err(Error::search(format!("query vector has {} dimensions but the index stores {d}", query.len())));
        }
        let mut scored: Vec<ScoredChunk> = self
            .entries
            .iter()
            .map(|(chunk, vector)| ScoredChunk::new(chunk.clone(), self.metric.distance(vector, query)))
            .collect();
        scored.sort_by(|a, b| a.score.total_cmp(&b.score));
        scored.truncate(k);
        Ok(scored)
    }
}
