//! Tool-using answers through an external agent.
//!
//! No model client ships with this crate. An [`Agent`] implementation is
//! plugged in by the caller; without one, [`answer_with_tools`] reports that
//! and still returns the retrieval citations.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::warn;

use kbrag_core::traits::VectorIndex;

use crate::answer::Citation;
use crate::tools::{KbTools, ToolHost};

pub const SYSTEM_PROMPT: &str = "You are an AI agent with tools.

Goals:
- Answer the user's question using the knowledge base.
- Use tools when needed (kb_search, read_file, kb_index).
- Produce a coherent final answer.
- Add citations using chunk ids returned by kb_search.

Rules:
- If the KB may be empty, call kb_index first.
- Prefer kb_search first. Use read_file only when you need more context from a specific file.
- In the final answer, include citations inline like: (cite: <chunk_id>).
- Never invent citations. Only use ids you have actually seen in tool output.
";

pub const NO_AGENT: &str = "No language model is configured; ask_llm needs an agent backend.";

/// A model runtime that can call the knowledge-base tools.
pub trait Agent: Send + Sync {
    /// Run `question` to a final answer, calling tools on `tools` as needed.
    fn run(&self, system_prompt: &str, question: &str, tools: &dyn ToolHost) -> Result<String>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "text", rename_all = "snake_case")]
pub enum AgentOutcome {
    Answered(String),
    Unavailable(String),
    Failed(String),
}

impl AgentOutcome {
    pub fn text(&self) -> &str {
        match self {
            Self::Answered(t) | Self::Unavailable(t) | Self::Failed(t) => t,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentAnswer {
    pub outcome: AgentOutcome,
    pub citations: Vec<Citation>,
}

impl AgentAnswer {
    pub fn answer(&self) -> &str {
        self.outcome.text()
    }
}

/// Ask `agent` (if any), then attach citations from a plain top-`k` search.
///
/// Neither an agent failure nor a failing citation search is an error here;
/// both are reported through the returned value. A failed citation search is
/// logged and yields an empty citation list instead of propagating.
pub fn answer_with_tools<VI: VectorIndex>(
    agent: Option<&dyn Agent>,
    tools: &KbTools<VI>,
    question: &str,
    k: usize,
) -> AgentAnswer {
    let outcome = match agent {
        None => AgentOutcome::Unavailable(NO_AGENT.to_string()),
        Some(agent) => match agent.run(SYSTEM_PROMPT, question, tools) {
            Ok(text) => AgentOutcome::Answered(text),
            Err(e) => {
                warn!("agent failed: {:#}", e);
                AgentOutcome::Failed(format!("Agent failed: {e:#}"))
            }
        },
    };

    let citations = match tools.kb_search(question, k) {
        Ok(hits) => hits
            .iter()
            .map(|h| Citation { id: h.id.clone(), source: h.source.clone(), distance: None })
            .collect(),
        Err(e) => {
            warn!("citation search failed: {:#}", e);
            Vec::new()
        }
    };

    AgentAnswer { outcome, citations }
}
