use std::path::Path;

use docret_core::config::{EmbedderSettings, RetrieverSettings};
use docret_core::{DetailedResult, DistanceMetric, DocumentChunk, Embedder, Error, Result, ScoredChunk, VectorIndex};
use docret_embed::load_embedder;
use docret_vector::LanceIndex;

use crate::context::format_context;
use crate::display::render_results;

pub const DEFAULT_K: usize = 5;
pub const DEFAULT_CONTEXT_K: usize = 3;
pub const DEFAULT_THRESHOLD: f32 = 0.5;
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Query-time interface over a pre-built vector index.
///
/// Every query embeds the query text once, runs one nearest-neighbour search
/// and keeps the index's ordering. The embedder must be the model the index
/// was built with; this is not checked.
pub struct DocumentRetriever {
    embedder: Box<dyn Embedder>,
    index: Box<dyn VectorIndex>,
}

impl DocumentRetriever {
    pub fn new(embedder: Box<dyn Embedder>, index: Box<dyn VectorIndex>) -> Self {
        if let Some(index_dim) = index.dim().filter(|d| *d != embedder.dim()) {
            tracing::warn!(
                model = embedder.model_id(),
                model_dim = embedder.dim(),
                index_dim,
                "embedding dimension differs from the index; queries will fail"
            );
        }
        Self { embedder, index }
    }

    /// Open the LanceDB index at `index_dir` (table `documents`, L2 distance)
    /// with embeddings from `model_name`.
    pub fn open(index_dir: impl AsRef<Path>, model_name: &str) -> Result<Self> {
        let settings = RetrieverSettings {
            index_dir: index_dir.as_ref().to_string_lossy().to_string(),
            embedding: EmbedderSettings::for_model(model_name),
            ..RetrieverSettings::default()
        };
        Self::from_settings(&settings, Path::new("."))
    }

    /// Open from configuration; relative `index_dir` resolves against `base`.
    pub fn from_settings(settings: &RetrieverSettings, base: &Path) -> Result<Self> {
        let embedder = load_embedder(&settings.embedding)?;
        let path = settings.index_path(base);
        let index = LanceIndex::open(&path, &settings.table, settings.metric)?;
        tracing::info!(path = %path.display(), model = embedder.model_id(), "retriever ready");
        Ok(Self::new(embedder, Box::new(index)))
    }

    pub fn embedder(&self) -> &dyn Embedder { self.embedder.as_ref() }

    pub fn metric(&self) -> DistanceMetric { self.index.metric() }

    /// Top `k` chunks, best first.
    pub fn search_documents(&self, query: &str, k: usize) -> Result<Vec<DocumentChunk>> {
        Ok(self.search(query, k)?.into_iter().map(|hit| hit.chunk).collect())
    }

    /// Top `k` chunks with their native distance (lower is better).
    pub fn search_with_scores(&self, query: &str, k: usize) -> Result<Vec<ScoredChunk>> {
        self.search(query, k)
    }

    /// Top `k` chunks with a relevance score (higher is better, nominally `[0, 1]`).
    pub fn search_with_relevance_scores(&self, query: &str, k: usize) -> Result<Vec<ScoredChunk>> {
        let metric = self.metric();
        let hits = self.search(query, k)?;
        Ok(hits
            .into_iter()
            .map(|mut hit| {
                let distance = hit.score;
                hit.score = metric.relevance(distance);
                if !(0.0..=1.0).contains(&hit.score) {
                    tracing::warn!(distance, relevance = hit.score, %metric, "relevance score outside [0, 1]");
                }
                hit
            })
            .collect())
    }

    /// Ranked records built from [`Self::search_with_scores`].
    pub fn detailed_search(&self, query: &str, k: usize) -> Result<Vec<DetailedResult>> {
        Ok(self
            .search_with_scores(query, k)?
            .into_iter()
            .enumerate()
            .map(|(i, hit)| DetailedResult::from_scored(i + 1, hit))
            .collect())
    }

    /// Up to `max_results` candidates whose distance is at most `threshold`.
    /// May return fewer than `max_results`, including none.
    pub fn filter_by_score_threshold(&self, query: &str, threshold: f32, max_results: usize) -> Result<Vec<ScoredChunk>> {
        if !threshold.is_finite() {
            return Err(Error::InvalidArgument(format!("threshold must be a finite number, got {threshold}")));
        }
        if max_results == 0 {
            return Err(Error::InvalidArgument("max_results must be at least 1".to_string()));
        }
        let mut hits = self.search_with_scores(query, max_results)?;
        hits.retain(|hit| hit.score <= threshold);
        Ok(hits)
    }

    /// The top `k` chunks joined into one context block for a prompt.
    pub fn get_context_for_llm(&self, query: &str, k: usize) -> Result<String> {
        Ok(format_context(&self.search_documents(query, k)?))
    }

    /// Print [`Self::detailed_search`] results to stdout.
    pub fn search_and_print_results(&self, query: &str, k: usize) -> Result<()> {
        let results = self.detailed_search(query, k)?;
        print!("{}", render_results(query, k, &results));
        Ok(())
    }

    fn search(&self, query: &str, k: usize) -> Result<Vec<ScoredChunk>> {
        if k == 0 {
            return Err(Error::InvalidArgument("k must be at least 1".to_string()));
        }
        let vector = self.embedder.embed_query(query)?;
        let hits = self.index.search_by_vector(&vector, k)?;
        tracing::debug!(query_len = query.len(), k, hits = hits.len(), "search");
        Ok(hits)
    }
}
