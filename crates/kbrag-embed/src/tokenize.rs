use anyhow::{anyhow, Result};
use candle_core::{Device, Tensor};
use tokenizers::Tokenizer;

/// BERT `[PAD]` id in the MiniLM vocabulary.
pub const PAD_ID: u32 = 0;

/// Tokenize a batch into `(input_ids, attention_mask)`, both `[B, T]` u32.
///
/// Each sequence is truncated to `max_len`; `T` is the longest remaining
/// sequence, shorter ones are padded with [`PAD_ID`] and a zero mask.
pub fn tokenize_batch(tokenizer: &Tokenizer, texts: &[String], max_len: usize, device: &Device) -> Result<(Tensor, Tensor)> {
    let inputs: Vec<&str> = texts.iter().map(String::as_str).collect();
    let encodings = tokenizer.encode_batch(inputs, true).map_err(|e| anyhow!("Tokenization failed: {}", e))?;
    let width = encodings.iter().map(|e| e.get_ids().len().min(max_len)).max().unwrap_or(0).max(1);

    let mut ids = Vec::with_capacity(texts.len() * width);
    let mut mask = Vec::with_capacity(texts.len() * width);
    for enc in &encodings {
        let len = enc.get_ids().len().min(width);
        ids.extend_from_slice(&enc.get_ids()[..len]);
        mask.extend_from_slice(&enc.get_attention_mask()[..len]);
        ids.extend(std::iter::repeat(PAD_ID).take(width - len));
        mask.extend(std::iter::repeat(0u32).take(width - len));
    }
    let input_ids = Tensor::from_vec(ids, (texts.len(), width), device)?;
    let attention_mask = Tensor::from_vec(mask, (texts.len(), width), device)?;
    Ok((input_ids, attention_mask))
}
