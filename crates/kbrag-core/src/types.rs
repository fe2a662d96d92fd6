//! Domain types shared by the embedders, the vector indexes and the store.

use serde::{Deserialize, Serialize};

pub type ChunkId = String;

/// Build the identifier of the `ordinal`-th chunk of `doc_id`.
///
/// Ordinals are per document, so the order in which documents are walked
/// never changes an identifier.
pub fn chunk_id(doc_id: &str, ordinal: usize) -> ChunkId {
    format!("{doc_id}::chunk::{ordinal}")
}

/// A row handed to a [`VectorIndex`](crate::traits::VectorIndex) for upsert.
///
/// - `id`: chunk identifier, the upsert key
/// - `source`: root-relative path of the document the chunk came from
/// - `text`: the raw chunk text
/// - `vector`: unit-length embedding of `text`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub id: ChunkId,
    pub source: Option<String>,
    pub text: String,
    pub vector: Vec<f32>,
}

/// A nearest-neighbour result.
///
/// `distance` is whatever the index measures; lower is always closer. The
/// serialized shape is the `{id, source, text, distance}` object returned by
/// the `kb_search` tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: ChunkId,
    pub source: Option<String>,
    pub text: String,
    pub distance: f32,
}

/// Scale `v` to unit L2 norm in place. Zero vectors are left untouched.
pub fn l2_normalize(v: &mut [f32]) {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}
