//! Retrieval-only answers: the matching chunks, numbered, with their sources.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use kbrag_core::traits::VectorIndex;
use kbrag_core::types::SearchHit;

use crate::store::RagStore;

pub const NOTHING_FOUND: &str = "Nothing found in the knowledge base";

const CONTEXT_HEADER: &str = "Found relevant fragments. Below is the context (with sources). \
                              If you want a coherent final answer, connect an LLM on top of this.\n\n";

const SEPARATOR: &str = "\n\n---\n\n";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    pub id: String,
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f32>,
}

impl Citation {
    pub fn from_hit(hit: &SearchHit) -> Self {
        Self { id: hit.id.clone(), source: hit.source.clone(), distance: Some(hit.distance) }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub answer: String,
    pub citations: Vec<Citation>,
}

fn render_hit(n: usize, hit: &SearchHit) -> String {
    format!(
        "[{}] source={} id={} dist={:.4}\n{}",
        n,
        hit.source.as_deref().unwrap_or("-"),
        hit.id,
        hit.distance,
        hit.text
    )
}

pub fn answer_with_citations<VI: VectorIndex>(store: &RagStore<VI>, question: &str, k: usize) -> Result<Answer> {
    let hits = store.search(question, k)?;
    if hits.is_empty() {
        return Ok(Answer { answer: NOTHING_FOUND.to_string(), citations: Vec::new() });
    }

    let context = hits
        .iter()
        .enumerate()
        .map(|(i, h)| render_hit(i + 1, h))
        .collect::<Vec<_>>()
        .join(SEPARATOR);

    Ok(Answer {
        answer: format!("{CONTEXT_HEADER}{context}"),
        citations: hits.iter().map(Citation::from_hit).collect(),
    })
}
