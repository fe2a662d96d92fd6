//! Vector storage for embedded chunks.
//!
//! [`LanceCollection`] keeps one collection in a LanceDB table on disk;
//! [`MemoryIndex`] is the in-process equivalent. Both implement
//! [`kbrag_core::traits::VectorIndex`].
//!
//! LanceDB is async; `LanceCollection` owns a current-thread tokio runtime
//! and blocks on it, so its methods must not be called from inside another
//! tokio runtime.

use anyhow::{bail, Context, Result};
use std::path::Path;
use tokio::runtime::Runtime;
use tracing::info;

use kbrag_core::collection::CollectionName;
use kbrag_core::traits::VectorIndex;
use kbrag_core::types::{IndexEntry, SearchHit};

pub mod memory;
pub mod schema;
pub mod search;
pub mod table;
pub mod writer;

pub use memory::MemoryIndex;

pub struct LanceCollection {
    rt: Runtime,
    table: lancedb::Table,
    name: CollectionName,
    dim: i32,
}

impl LanceCollection {
    /// Open `collection` under `persist_dir`, creating the directory and the
    /// table as needed.
    pub fn open(persist_dir: &Path, collection: &CollectionName, dim: usize) -> Result<Self> {
        std::fs::create_dir_all(persist_dir)
            .with_context(|| format!("creating {}", persist_dir.display()))?;
        let dim = i32::try_from(dim).context("embedding dimension out of range")?;
        let rt = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
        let uri = persist_dir.to_string_lossy().to_string();
        let table = rt.block_on(async {
            let conn = table::open_db(&uri).await?;
            table::open_collection(&conn, collection.as_str(), dim).await
        })?;
        info!("Opened collection '{}' at {}", collection, persist_dir.display());
        Ok(Self { rt, table, name: collection.clone(), dim })
    }

    pub fn name(&self) -> &CollectionName {
        &self.name
    }
}

impl VectorIndex for LanceCollection {
    fn upsert(&self, entries: &[IndexEntry]) -> Result<()> {
        self.rt.block_on(writer::upsert(&self.table, entries, self.dim))
    }

    fn query(&self, vector: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        if vector.len() != self.dim as usize {
            bail!("query vector is {}-d, collection '{}' expects {}", vector.len(), self.name, self.dim);
        }
        if k == 0 || self.count()? == 0 {
            return Ok(Vec::new());
        }
        self.rt.block_on(search::nearest(&self.table, vector, k))
    }

    fn count(&self) -> Result<usize> {
        Ok(self.rt.block_on(self.table.count_rows(None))?)
    }
}
