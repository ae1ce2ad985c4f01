use crate::error::{Error, Result};
use crate::score::DistanceMetric;
use crate::types::{DocumentChunk, ScoredChunk};

/// Text-to-vector capability.
pub trait Embedder: Send + Sync {
    /// Identifier of the loaded model, e.g. `sentence-transformers/all-MiniLM-L6-v2`.
    fn model_id(&self) -> &str;
    fn dim(&self) -> usize;
    /// One vector per input text, in input order.
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Embed the `content` of each chunk, preserving order.
    fn embed(&self, documents: &[DocumentChunk]) -> Result<Vec<Vec<f32>>> {
        let texts: Vec<String> = documents.iter().map(|d| d.content.clone()).collect();
        let vectors = self.embed_batch(&texts)?;
        if vectors.len() != texts.len() {
            return Err(Error::model(
                self.model_id(),
                format!("expected {} embeddings, model returned {}", texts.len(), vectors.len()),
            ));
        }
        Ok(vectors)
    }

    fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[text.to_string()])?
            .into_iter()
            .next()
            .ok_or_else(|| Error::model(self.model_id(), "no embedding returned for query"))
    }
}

/// Nearest-neighbour index over previously embedded chunks.
pub trait VectorIndex: Send + Sync {
    fn metric(&self) -> DistanceMetric;
    /// Vector dimensionality, when known.
    fn dim(&self) -> Option<usize>;
    fn len(&self) -> Result<usize>;
    /// Top `k` chunks by native distance, closest first.
    fn search_by_vector(&self, query: &[f32], k: usize) -> Result<Vec<ScoredChunk>>;

    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}
