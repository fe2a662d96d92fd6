//! kbrag-embed
//!
//! Embedding backends behind [`kbrag_core::traits::Embedder`]: the candle
//! MiniLM model for real use and [`HashEmbedder`] for tests and offline runs.

use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};
use tracing::info;

use kbrag_core::config::Settings;
use kbrag_core::traits::Embedder;

pub mod device;
pub mod hash;
pub mod minilm;
pub mod pool;
pub mod tokenize;

pub use hash::HashEmbedder;
pub use minilm::{MiniLmEmbedder, MINILM_DIM, MINILM_MAX_LEN};
pub use pool::masked_mean_l2;

const MODEL_DIR_CANDIDATES: &[&str] = &["models/all-MiniLM-L6-v2", "../models/all-MiniLM-L6-v2"];

pub fn get_default_embedder(settings: &Settings) -> Result<Box<dyn Embedder>> {
    if settings.use_fake_embeddings {
        info!("using HashEmbedder (use_fake_embeddings)");
        return Ok(Box::new(HashEmbedder::new(MINILM_DIM)));
    }
    let model_dir = resolve_model_dir(settings.model_dir_path().as_deref())?;
    Ok(Box::new(MiniLmEmbedder::load(&model_dir)?))
}

/// Configured directory if it exists, else the first existing default location.
pub fn resolve_model_dir(configured: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = configured {
        if dir.exists() {
            return Ok(dir.to_path_buf());
        }
        return Err(anyhow!("Configured model_dir {} does not exist", dir.display()));
    }
    MODEL_DIR_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
        .ok_or_else(|| anyhow!("Could not locate the all-MiniLM-L6-v2 model directory; set APP_MODEL_DIR or APP_USE_FAKE_EMBEDDINGS=1"))
}
