use std::hash::{Hash, Hasher};

use anyhow::Result;
use kbrag_core::traits::Embedder;
use kbrag_core::types::l2_normalize;
use twox_hash::XxHash64;

/// Deterministic bag-of-tokens embedder.
///
/// Each lowercased alphanumeric token is hashed into one of `dim` buckets, so
/// texts sharing words end up close together. No model files needed; used in
/// tests and when `use_fake_embeddings` is on.
pub struct HashEmbedder {
    dim: usize,
}

impl HashEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim: dim.max(1) }
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0f32; self.dim];
        let tokens = text
            .split_whitespace()
            .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
            .filter(|t| !t.is_empty());
        for token in tokens {
            let mut hasher = XxHash64::with_seed(0);
            token.hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h % self.dim as u64) as usize;
            let weight = 0.5 + ((h >> 32) as u32) as f32 / u32::MAX as f32;
            v[idx] += weight;
        }
        l2_normalize(&mut v);
        v
    }
}

impl Embedder for HashEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn max_len(&self) -> usize {
        usize::MAX
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }
}
