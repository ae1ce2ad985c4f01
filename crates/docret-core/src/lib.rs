#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod config;
pub mod error;
pub mod score;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use score::DistanceMetric;
pub use traits::{Embedder, VectorIndex};
pub use types::{DetailedResult, DocumentChunk, Metadata, ScoredChunk};
