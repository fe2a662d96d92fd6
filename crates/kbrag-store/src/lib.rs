//! Retrieval over a knowledge-base folder.
//!
//! [`RagStore`] indexes a folder into a vector collection and answers
//! nearest-chunk queries. [`KbTools`] wraps it as the three agent tools
//! (`kb_index`, `kb_search`, `read_file`), and [`answer`] / [`agent`] build
//! the `ask` and `ask_llm` responses on top.

pub mod agent;
pub mod answer;
pub mod store;
pub mod tools;

pub use agent::{answer_with_tools, Agent, AgentAnswer, AgentOutcome};
pub use answer::{answer_with_citations, Answer, Citation};
pub use store::RagStore;
pub use tools::{tool_specs, IndexReport, KbTools, ReadFileError, ReadFileResult, ToolError, ToolHost, ToolSpec};
