use std::collections::HashMap;
use std::path::Path;

use anyhow::{anyhow, Result};
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use kbrag_core::traits::Embedder;
use tokenizers::Tokenizer;
use tracing::{debug, info};

use crate::device::select_device;
use crate::pool::masked_mean_l2;
use crate::tokenize::tokenize_batch;

pub const MINILM_DIM: usize = 384;
pub const MINILM_MAX_LEN: usize = 256;
const BATCH_SIZE: usize = 32;

/// `sentence-transformers/all-MiniLM-L6-v2` running on candle.
pub struct MiniLmEmbedder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
}

impl MiniLmEmbedder {
    /// Load tokenizer, config and weights from a local model directory.
    pub fn load(model_dir: &Path) -> Result<Self> {
        let device = select_device();
        info!("loading MiniLM from {}", model_dir.display());

        let tokenizer_path = model_dir.join("tokenizer.json");
        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow!("Failed to load tokenizer from {}: {}", tokenizer_path.display(), e))?;

        let config_path = model_dir.join("config.json");
        let config: BertConfig = serde_json::from_str(&std::fs::read_to_string(&config_path)?)?;

        let vb = load_weights(model_dir, &device)?;
        let model = BertModel::load(vb, &config)?;
        info!("MiniLM loaded");
        Ok(Self { model, tokenizer, device })
    }

    fn embed_chunk(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let (input_ids, attention_mask) = tokenize_batch(&self.tokenizer, texts, MINILM_MAX_LEN, &self.device)?;
        let token_type_ids = input_ids.zeros_like()?;
        let hidden = self.model.forward(&input_ids, &token_type_ids, Some(&attention_mask))?;
        let pooled = masked_mean_l2(&hidden, &attention_mask)?;
        Ok(pooled.to_device(&Device::Cpu)?.to_vec2::<f32>()?)
    }
}

fn load_weights(model_dir: &Path, device: &Device) -> Result<VarBuilder<'static>> {
    let safetensors = model_dir.join("model.safetensors");
    if safetensors.exists() {
        debug!("weights: {}", safetensors.display());
        // SAFETY: the file is mapped read-only and not modified while the model lives.
        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[safetensors], DType::F32, device)? };
        return Ok(vb);
    }
    let pickle = model_dir.join("pytorch_model.bin");
    debug!("weights: {}", pickle.display());
    let weights: HashMap<String, Tensor> = candle_core::pickle::read_all(&pickle)?.into_iter().collect();
    Ok(VarBuilder::from_tensors(weights, DType::F32, device))
}

impl Embedder for MiniLmEmbedder {
    fn dim(&self) -> usize {
        MINILM_DIM
    }

    fn max_len(&self) -> usize {
        MINILM_MAX_LEN
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut out = Vec::with_capacity(texts.len());
        for batch in texts.chunks(BATCH_SIZE) {
            out.extend(self.embed_chunk(batch)?);
        }
        debug!("embedded {} texts", out.len());
        Ok(out)
    }
}
