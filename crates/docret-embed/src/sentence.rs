use anyhow::{anyhow, Context};
use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

use candle_core::{Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig, DTYPE};
use docret_core::config::EmbedderSettings;
use docret_core::{Embedder, Error, Result};
use tokenizers::Tokenizer;

use crate::device::select_device;
use crate::model_dir::resolve_model_dir;
use crate::pool::masked_mean_l2;
use crate::tokenize::{configure_tokenizer, tokenize_batch};

/// BERT-family sentence-transformer (mean pooling + L2 normalization),
/// e.g. `sentence-transformers/all-MiniLM-L6-v2`.
///
/// The model is loaded once in [`SentenceEmbedder::load`] and held for the
/// lifetime of the value.
pub struct SentenceEmbedder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    model_id: String,
    dim: usize,
}

impl SentenceEmbedder {
    pub fn load(settings: &EmbedderSettings) -> Result<Self> {
        let model_id = settings.model.clone();
        let models_dir = settings.models_path();
        let dir = resolve_model_dir(&model_id, &models_dir).ok_or_else(|| {
            Error::model(&model_id, format!("model files not found (searched {} and APP_MODEL_DIR)", models_dir.display()))
        })?;
        Self::load_from_dir(&model_id, &dir, settings.max_len).map_err(|e| Error::model(&model_id, format!("{e:#}")))
    }

    fn load_from_dir(model_id: &str, dir: &Path, max_len: usize) -> anyhow::Result<Self> {
        let started = Instant::now();
        let device = select_device();
        tracing::info!(model = model_id, dir = %dir.display(), "loading embedding model");

        let tokenizer_path = dir.join("tokenizer.json");
        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow!("Failed to load tokenizer from {}: {}", tokenizer_path.display(), e))?;
        let pad_id = tokenizer.token_to_id("[PAD]").unwrap_or(0);

        let config_path = dir.join("config.json");
        let raw = std::fs::read_to_string(&config_path).with_context(|| format!("reading {}", config_path.display()))?;
        let config: BertConfig = serde_json::from_str(&raw).with_context(|| format!("parsing {}", config_path.display()))?;
        let shape: serde_json::Value = serde_json::from_str(&raw)?;
        let dim = shape["hidden_size"].as_u64().ok_or_else(|| anyhow!("config.json has no hidden_size"))? as usize;
        let positions = shape["max_position_embeddings"].as_u64().map_or(512, |p| p as usize);

        let max_len = configure_tokenizer(&mut tokenizer, max_len.min(positions), pad_id)?;

        let weights = load_weights(dir, &device)?;
        let vb = VarBuilder::from_tensors(weights, DTYPE, &device);
        let model = BertModel::load(vb, &config)?;

        tracing::info!(model = model_id, dim, max_len, elapsed_ms = started.elapsed().as_millis() as u64, "embedding model loaded");
        Ok(Self { model, tokenizer, device, model_id: model_id.to_string(), dim })
    }

    fn forward_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        let (input_ids, attention_mask) = tokenize_batch(&self.tokenizer, texts, &self.device)?;
        let token_type_ids = input_ids.zeros_like()?;
        let hidden = self.model.forward(&input_ids, &token_type_ids, Some(&attention_mask))?;
        let pooled = masked_mean_l2(&hidden, &attention_mask)?;
        Ok(pooled.to_device(&Device::Cpu)?.to_vec2::<f32>()?)
    }
}

fn load_weights(dir: &Path, device: &Device) -> anyhow::Result<HashMap<String, Tensor>> {
    let safetensors = dir.join("model.safetensors");
    if safetensors.is_file() {
        return Ok(candle_core::safetensors::load(&safetensors, device)?);
    }
    let pickle = dir.join("pytorch_model.bin");
    if pickle.is_file() {
        let weights = candle_core::pickle::read_all(&pickle)?;
        return Ok(weights.into_iter().collect());
    }
    Err(anyhow!("no model.safetensors or pytorch_model.bin in {}", dir.display()))
}

impl Embedder for SentenceEmbedder {
    fn model_id(&self) -> &str { &self.model_id }

    fn dim(&self) -> usize { self.dim }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() { return Ok(Vec::new()); }
        let started = Instant::now();
        let vectors = self.forward_batch(texts).map_err(|e| Error::model(&self.model_id, format!("inference failed: {e:#}")))?;
        tracing::debug!(batch = texts.len(), elapsed_ms = started.elapsed().as_millis() as u64, "embedded batch");
        Ok(vectors)
    }
}
