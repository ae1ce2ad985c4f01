//! Domain types shared by the embedder, the index backends and the retriever.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::score::round_score;

pub type Metadata = BTreeMap<String, Value>;

pub const UNKNOWN_SOURCE: &str = "Unknown";
pub const UNKNOWN_PAGE: &str = "N/A";

/// A unit of previously indexed text.
///
/// - `id`: identifier assigned by the ingestion step (may be empty)
/// - `content`: the text payload that was embedded
/// - `metadata`: free-form key/value pairs, typically `source` and `page`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentChunk {
    #[serde(default)]
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub metadata: Metadata,
}

impl DocumentChunk {
    pub fn new(content: impl Into<String>) -> Self {
        Self { content: content.into(), ..Self::default() }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn source(&self) -> Option<&Value> {
        self.metadata.get("source")
    }

    pub fn page(&self) -> Option<&Value> {
        self.metadata.get("page")
    }
}

/// A chunk paired with a score from one query.
///
/// Whether `score` is a distance (lower is better) or a relevance
/// (higher is better) depends on the operation that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub chunk: DocumentChunk,
    pub score: f32,
}

impl ScoredChunk {
    pub fn new(chunk: DocumentChunk, score: f32) -> Self {
        Self { chunk, score }
    }
}

/// Flattened, display-ready view of a [`ScoredChunk`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedResult {
    /// 1-based position in the returned ordering.
    pub rank: usize,
    pub content: String,
    /// Score rounded to four decimal places.
    pub score: f32,
    pub metadata: Metadata,
    pub source: String,
    pub page: String,
}

impl DetailedResult {
    pub fn from_scored(rank: usize, hit: ScoredChunk) -> Self {
        let source = metadata_text(hit.chunk.source()).unwrap_or_else(|| UNKNOWN_SOURCE.to_string());
        let page = metadata_text(hit.chunk.page()).unwrap_or_else(|| UNKNOWN_PAGE.to_string());
        Self {
            rank,
            content: hit.chunk.content,
            score: round_score(hit.score, 4),
            metadata: hit.chunk.metadata,
            source,
            page,
        }
    }
}

// Strings are taken verbatim; other JSON values use their JSON text.
fn metadata_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
