#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use kbrag_core::collection::validate_collection_name;
use kbrag_core::traits::{Embedder, VectorIndex};
use kbrag_core::types::{IndexEntry, SearchHit};
use kbrag_embed::HashEmbedder;
use kbrag_store::RagStore;
use kbrag_vector::MemoryIndex;

pub const DIM: usize = 64;

#[derive(Clone, Default)]
pub struct Calls(Arc<AtomicUsize>);

impl Calls {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
    fn bump(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct CountingEmbedder {
    inner: HashEmbedder,
    pub calls: Calls,
}

impl Embedder for CountingEmbedder {
    fn dim(&self) -> usize {
        self.inner.dim()
    }
    fn max_len(&self) -> usize {
        self.inner.max_len()
    }
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        self.calls.bump();
        self.inner.embed_batch(texts)
    }
}

pub struct CountingIndex {
    inner: MemoryIndex,
    pub upserts: Calls,
    pub queries: Calls,
}

impl VectorIndex for CountingIndex {
    fn upsert(&self, entries: &[IndexEntry]) -> anyhow::Result<()> {
        self.upserts.bump();
        self.inner.upsert(entries)
    }
    fn query(&self, vector: &[f32], k: usize) -> anyhow::Result<Vec<SearchHit>> {
        self.queries.bump();
        self.inner.query(vector, k)
    }
    fn count(&self) -> anyhow::Result<usize> {
        self.inner.count()
    }
}

/// Index whose every operation fails with a recognizable message.
pub struct BrokenIndex;

impl VectorIndex for BrokenIndex {
    fn upsert(&self, _: &[IndexEntry]) -> anyhow::Result<()> {
        anyhow::bail!("disk on fire")
    }
    fn query(&self, _: &[f32], _: usize) -> anyhow::Result<Vec<SearchHit>> {
        anyhow::bail!("disk on fire")
    }
    fn count(&self) -> anyhow::Result<usize> {
        anyhow::bail!("disk on fire")
    }
}

pub struct Counted {
    pub store: RagStore<CountingIndex>,
    pub embeds: Calls,
    pub upserts: Calls,
    pub queries: Calls,
}

pub fn counted_store() -> Counted {
    let embeds = Calls::default();
    let upserts = Calls::default();
    let queries = Calls::default();
    let embedder = CountingEmbedder { inner: HashEmbedder::new(DIM), calls: embeds.clone() };
    let index = CountingIndex { inner: MemoryIndex::new(), upserts: upserts.clone(), queries: queries.clone() };
    let name = validate_collection_name("kb_store").unwrap();
    Counted { store: RagStore::new(name, Box::new(embedder), index), embeds, upserts, queries }
}

pub fn memory_store() -> RagStore<MemoryIndex> {
    let name = validate_collection_name("kb_store").unwrap();
    RagStore::new(name, Box::new(HashEmbedder::new(DIM)), MemoryIndex::new())
}

pub fn broken_store() -> RagStore<BrokenIndex> {
    let name = validate_collection_name("kb_store").unwrap();
    RagStore::new(name, Box::new(HashEmbedder::new(DIM)), BrokenIndex)
}

pub fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}
