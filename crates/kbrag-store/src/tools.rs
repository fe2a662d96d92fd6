//! The knowledge-base tool surface handed to agents.
//!
//! Each tool returns plain serializable values; [`KbTools::dispatch`] routes a
//! named call with JSON arguments and returns JSON, which is what an agent
//! runtime exchanges with the model.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use kbrag_core::collector::decode_lossy;
use kbrag_core::traits::VectorIndex;
use kbrag_core::types::SearchHit;
use kbrag_vector::LanceCollection;

use crate::store::RagStore;

pub const DEFAULT_TOP_K: usize = 5;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("unknown tool '{0}'")]
    UnknownTool(String),
    #[error("invalid arguments for {tool}: {source}")]
    InvalidArguments {
        tool: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexReport {
    pub indexed_chunks: usize,
    pub kb_root: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadFileError {
    PathOutsideKb,
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReadFileResult {
    Found { path: String, content: String },
    Error { error: ReadFileError },
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    /// JSON schema of the arguments object.
    pub parameters: Value,
}

/// Something an agent can list and call tools on.
pub trait ToolHost {
    fn specs(&self) -> Vec<ToolSpec>;
    fn call(&self, name: &str, args: Value) -> Result<Value>;
}

#[derive(Deserialize)]
struct SearchArgs {
    query: String,
    #[serde(default)]
    k: Option<usize>,
}

#[derive(Deserialize)]
struct ReadArgs {
    path: String,
}

fn parse_args<T: for<'de> Deserialize<'de>>(tool: &'static str, args: Value) -> Result<T> {
    serde_json::from_value(args).map_err(|source| ToolError::InvalidArguments { tool, source }.into())
}

/// Resolve `.` and `..` without touching the filesystem. `..` never climbs
/// above a root, and is kept when there is nothing left to pop in a relative
/// path.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for c in path.components() {
        match c {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Descriptions of the tools served by [`KbTools::dispatch`].
pub fn tool_specs() -> Vec<ToolSpec> {
    vec![
        ToolSpec {
            name: "kb_index",
            description: "Index all files in the knowledge base folder into the vector store.",
            parameters: json!({ "type": "object", "properties": {} }),
        },
        ToolSpec {
            name: "kb_search",
            description: "Semantic search over the knowledge base. Returns the top-k chunks with \
                          id (chunk id), source (relative path), text and distance.",
            parameters: json!({
                "type": "object",
                "properties": {
                    "query": { "type": "string" },
                    "k": { "type": "integer", "minimum": 0, "default": DEFAULT_TOP_K }
                },
                "required": ["query"]
            }),
        },
        ToolSpec {
            name: "read_file",
            description: "Read a file from the knowledge base by relative path.",
            parameters: json!({
                "type": "object",
                "properties": { "path": { "type": "string" } },
                "required": ["path"]
            }),
        },
    ]
}

pub struct KbTools<VI: VectorIndex = LanceCollection> {
    store: RagStore<VI>,
    kb_root: PathBuf,
    default_k: usize,
}

impl<VI: VectorIndex> KbTools<VI> {
    pub fn new(store: RagStore<VI>, kb_root: impl Into<PathBuf>) -> Self {
        Self { store, kb_root: kb_root.into(), default_k: DEFAULT_TOP_K }
    }

    /// `k` used by `kb_search` calls that do not pass one.
    pub fn with_default_k(mut self, k: usize) -> Self {
        self.default_k = k;
        self
    }

    pub fn store(&self) -> &RagStore<VI> {
        &self.store
    }

    pub fn kb_root(&self) -> &Path {
        &self.kb_root
    }

    /// Index every file under the knowledge-base root.
    pub fn kb_index(&self) -> Result<IndexReport> {
        let indexed_chunks = self.store.index_folder(&self.kb_root)?;
        Ok(IndexReport { indexed_chunks, kb_root: self.kb_root.display().to_string() })
    }

    pub fn kb_search(&self, query: &str, k: usize) -> Result<Vec<SearchHit>> {
        self.store.search(query, k)
    }

    /// Read a file by root-relative path, refusing anything that resolves
    /// outside the knowledge-base root.
    pub fn read_file(&self, path: &str) -> Result<ReadFileResult> {
        let outside = Ok(ReadFileResult::Error { error: ReadFileError::PathOutsideKb });

        let rel = normalize_lexically(Path::new(path));
        let rel = rel.to_string_lossy();
        let safe_rel = rel.trim_start_matches(['/', '\\']);

        let abs_root = normalize_lexically(&std::path::absolute(&self.kb_root)?);
        let full = normalize_lexically(&abs_root.join(safe_rel));
        if !full.starts_with(&abs_root) {
            debug!("read_file refused {:?}: outside {}", path, abs_root.display());
            return outside;
        }

        if !full.is_file() {
            return Ok(ReadFileResult::Error { error: ReadFileError::NotFound });
        }

        // A symlink inside the root may still point elsewhere.
        let real = fs::canonicalize(&full)?;
        if !real.starts_with(fs::canonicalize(&abs_root)?) {
            warn!("read_file refused {:?}: resolves to {}", path, real.display());
            return outside;
        }

        let content = decode_lossy(&fs::read(&real)?);
        Ok(ReadFileResult::Found { path: safe_rel.replace('\\', "/"), content })
    }

    /// Run the tool called `name` with JSON `args`.
    pub fn dispatch(&self, name: &str, args: Value) -> Result<Value> {
        debug!("tool call {} {}", name, args);
        match name {
            "kb_index" => Ok(serde_json::to_value(self.kb_index()?)?),
            "kb_search" => {
                let args: SearchArgs = parse_args("kb_search", args)?;
                let hits = self.kb_search(&args.query, args.k.unwrap_or(self.default_k))?;
                Ok(serde_json::to_value(hits)?)
            }
            "read_file" => {
                let args: ReadArgs = parse_args("read_file", args)?;
                Ok(serde_json::to_value(self.read_file(&args.path)?)?)
            }
            other => Err(ToolError::UnknownTool(other.to_string()).into()),
        }
    }
}

impl<VI: VectorIndex> ToolHost for KbTools<VI> {
    fn specs(&self) -> Vec<ToolSpec> {
        tool_specs()
    }

    fn call(&self, name: &str, args: Value) -> Result<Value> {
        self.dispatch(name, args)
    }
}
