use crate::types::{IndexEntry, SearchHit};

pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    fn max_len(&self) -> usize;
    /// Embed every text of the batch; the output has one vector per input, in order.
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;
}

/// Persistent storage of one collection's entries.
pub trait VectorIndex: Send + Sync {
    /// Insert or overwrite by `IndexEntry::id`; never creates duplicates.
    fn upsert(&self, entries: &[IndexEntry]) -> anyhow::Result<()>;
    /// The `k` entries nearest to `vector`, closest first.
    fn query(&self, vector: &[f32], k: usize) -> anyhow::Result<Vec<SearchHit>>;
    fn count(&self) -> anyhow::Result<usize>;
}

impl<T: VectorIndex + ?Sized> VectorIndex for Box<T> {
    fn upsert(&self, entries: &[IndexEntry]) -> anyhow::Result<()> {
        (**self).upsert(entries)
    }
    fn query(&self, vector: &[f32], k: usize) -> anyhow::Result<Vec<SearchHit>> {
        (**self).query(vector, k)
    }
    fn count(&self) -> anyhow::Result<usize> {
        (**self).count()
    }
}
