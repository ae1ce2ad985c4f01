//! Retrieval over a pre-built vector index.
//!
//! [`DocumentRetriever`] pairs an [`Embedder`](docret_core::Embedder) with a
//! [`VectorIndex`](docret_core::VectorIndex) and offers plain, scored,
//! relevance-scored, threshold-filtered and formatted searches, plus a
//! context block for language-model prompts.

pub mod context;
pub mod display;
pub mod retriever;

pub use context::format_context;
pub use display::render_results;
pub use retriever::{
    DocumentRetriever, DEFAULT_CONTEXT_K, DEFAULT_K, DEFAULT_MAX_RESULTS, DEFAULT_THRESHOLD,
};
