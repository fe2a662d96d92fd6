//! Indexing a folder into one collection and nearest-chunk search over it.

use anyhow::{bail, Result};
use std::path::Path;
use tracing::{debug, info};

use kbrag_core::chunker::{chunk_text, ChunkingConfig};
use kbrag_core::collection::{resolve_collection_name, CollectionName};
use kbrag_core::collector::{collect_files, doc_id};
use kbrag_core::config::Settings;
use kbrag_core::traits::{Embedder, VectorIndex};
use kbrag_core::types::{chunk_id, l2_normalize, IndexEntry, SearchHit};
use kbrag_embed::get_default_embedder;
use kbrag_vector::LanceCollection;

/// One collection plus the embedder that fills and queries it.
pub struct RagStore<VI: VectorIndex = LanceCollection> {
    collection: CollectionName,
    embedder: Box<dyn Embedder>,
    index: VI,
    chunking: ChunkingConfig,
}

impl RagStore<LanceCollection> {
    /// Resolve and validate the collection name, then open it on disk.
    ///
    /// An invalid name fails before the embedder is loaded or `persist_dir`
    /// is touched.
    pub fn open(settings: &Settings, collection: Option<&str>) -> Result<Self> {
        let name = resolve_collection_name(collection, settings)?;
        let embedder = get_default_embedder(settings)?;
        let index = LanceCollection::open(&settings.persist_dir_path(), &name, embedder.dim())?;
        Ok(Self::new(name, embedder, index))
    }
}

impl<VI: VectorIndex> RagStore<VI> {
    pub fn new(collection: CollectionName, embedder: Box<dyn Embedder>, index: VI) -> Self {
        Self { collection, embedder, index, chunking: ChunkingConfig::default() }
    }

    pub fn with_chunking(mut self, chunking: ChunkingConfig) -> Self {
        self.chunking = chunking;
        self
    }

    pub fn collection(&self) -> &CollectionName {
        &self.collection
    }

    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = self.embedder.embed_batch(texts)?;
        if vectors.len() != texts.len() {
            bail!("embedder returned {} vectors for {} texts", vectors.len(), texts.len());
        }
        for v in &mut vectors {
            l2_normalize(v);
        }
        Ok(vectors)
    }

    /// Chunk, embed and upsert every text file under `root`.
    /// Returns the number of chunks written.
    pub fn index_folder(&self, root: &Path) -> Result<usize> {
        let mut ids = Vec::new();
        let mut texts = Vec::new();
        let mut sources = Vec::new();
        let mut files = 0usize;

        for (path, content) in collect_files(root) {
            let doc = doc_id(root, &path);
            let chunks = chunk_text(&content, &self.chunking);
            debug!("{}: {} chunks", doc, chunks.len());
            files += 1;
            for (ordinal, text) in chunks.into_iter().enumerate() {
                ids.push(chunk_id(&doc, ordinal));
                texts.push(text);
                sources.push(doc.clone());
            }
        }

        if texts.is_empty() {
            info!("No chunks found under {} ({} files)", root.display(), files);
            return Ok(0);
        }

        let vectors = self.embed(&texts)?;
        let entries: Vec<IndexEntry> = ids
            .into_iter()
            .zip(sources)
            .zip(texts)
            .zip(vectors)
            .map(|(((id, source), text), vector)| IndexEntry { id, source: Some(source), text, vector })
            .collect();
        self.index.upsert(&entries)?;

        info!(
            "Indexed {} chunks from {} files into '{}'",
            entries.len(),
            files,
            self.collection
        );
        Ok(entries.len())
    }

    /// The `k` chunks closest to `query`, in index order.
    pub fn search(&self, query: &str, k: usize) -> Result<Vec<SearchHit>> {
        if k == 0 {
            return Ok(Vec::new());
        }
        let mut vectors = self.embed(&[query.to_string()])?;
        let vector = vectors.pop().unwrap_or_default();
        self.index.query(&vector, k)
    }

    pub fn count(&self) -> Result<usize> {
        self.index.count()
    }
}
