//! Text embedding backends.
//!
//! [`SentenceEmbedder`] runs a local BERT-family sentence-transformer with
//! candle; [`HashEmbedder`] is a deterministic stand-in that needs no model
//! files. [`load_embedder`] picks one from settings.

pub mod device;
pub mod hash;
pub mod model_dir;
pub mod pool;
pub mod sentence;
pub mod tokenize;

use docret_core::config::EmbedderSettings;
use docret_core::{Embedder, Error, Result};

pub use hash::{HashEmbedder, DEFAULT_HASH_DIM};
pub use pool::masked_mean_l2;
pub use sentence::SentenceEmbedder;

/// Load the embedder named by `settings.model`.
///
/// `hash` or `hash:<dim>` selects [`HashEmbedder`], as does
/// `APP_USE_FAKE_EMBEDDINGS=1`; anything else is loaded as a sentence-transformer.
pub fn load_embedder(settings: &EmbedderSettings) -> Result<Box<dyn Embedder>> {
    if let Some(dim) = hash_dim(&settings.model)? {
        return Ok(Box::new(HashEmbedder::new(dim)));
    }
    if use_fake_embeddings() {
        tracing::info!(model = %settings.model, "APP_USE_FAKE_EMBEDDINGS set, using HashEmbedder");
        return Ok(Box::new(HashEmbedder::default()));
    }
    Ok(Box::new(SentenceEmbedder::load(settings)?))
}

fn use_fake_embeddings() -> bool {
    std::env::var("APP_USE_FAKE_EMBEDDINGS").ok().map(|v| v == "1" || v.eq_ignore_ascii_case("true")).unwrap_or(false)
}

fn hash_dim(model: &str) -> Result<Option<usize>> {
    match model.split_once(':') {
        None if model == "hash" => Ok(Some(DEFAULT_HASH_DIM)),
        Some(("hash", dim)) => match dim.parse::<usize>() {
            Ok(d) if d > 0 => Ok(Some(d)),
            _ => Err(Error::model(model, "hash embedder dimension must be a positive integer")),
        },
        _ => Ok(None),
    }
}
