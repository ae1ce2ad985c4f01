use anyhow::{anyhow, Result};
use candle_core::{Device, Tensor};
use tokenizers::{PaddingParams, PaddingStrategy, PostProcessor, Tokenizer, TruncationParams};

/// Truncate inputs to `max_len` tokens, special tokens included, and pad each
/// batch to its longest row with `pad_id`.
///
/// Truncation happens before the post-processor runs, so `[CLS] ... [SEP]`
/// framing survives on long inputs. `max_len` is raised to leave room for at
/// least one content token.
pub fn configure_tokenizer(tokenizer: &mut Tokenizer, max_len: usize, pad_id: u32) -> Result<usize> {
    let added = tokenizer.get_post_processor().map_or(0, |pp| pp.added_tokens(false));
    let max_len = max_len.max(added + 1);
    tokenizer
        .with_truncation(Some(TruncationParams { max_length: max_len, ..Default::default() }))
        .map_err(|e| anyhow!("Invalid truncation for max_len {}: {}", max_len, e))?;
    let pad_token = tokenizer.id_to_token(pad_id).unwrap_or_else(|| "[PAD]".to_string());
    tokenizer.with_padding(Some(PaddingParams {
        strategy: PaddingStrategy::BatchLongest,
        pad_id,
        pad_token,
        ..Default::default()
    }));
    Ok(max_len)
}

/// Tokenize a batch with a tokenizer prepared by [`configure_tokenizer`].
/// Returns `(input_ids, attention_mask)`, both `[B, T]` u32.
pub fn tokenize_batch(tokenizer: &Tokenizer, texts: &[String], device: &Device) -> Result<(Tensor, Tensor)> {
    let inputs: Vec<&str> = texts.iter().map(String::as_str).collect();
    let encodings = tokenizer.encode_batch(inputs, true).map_err(|e| anyhow!("Tokenization failed: {}", e))?;
    let seq_len = encodings.first().map_or(0, |enc| enc.len());
    if seq_len == 0 {
        return Err(anyhow!("Tokenization produced no tokens"));
    }
    let mut flat_ids = Vec::with_capacity(encodings.len() * seq_len);
    let mut flat_mask = Vec::with_capacity(encodings.len() * seq_len);
    for enc in &encodings {
        if enc.len() != seq_len {
            return Err(anyhow!("Tokenizer is not padding batches ({} vs {} tokens)", enc.len(), seq_len));
        }
        flat_ids.extend_from_slice(enc.get_ids());
        flat_mask.extend_from_slice(enc.get_attention_mask());
    }
    let input_ids = Tensor::from_vec(flat_ids, (encodings.len(), seq_len), device)?;
    let attention_mask = Tensor::from_vec(flat_mask, (encodings.len(), seq_len), device)?;
    Ok((input_ids, attention_mask))
}
