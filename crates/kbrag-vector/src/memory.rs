//! In-memory index for tests and throwaway runs.
//!
//! Brute-force squared-L2 search over a `BTreeMap` keyed by id. Nothing is
//! persisted; dropping the index drops its contents.

use anyhow::{bail, Result};
use std::collections::BTreeMap;
use std::sync::RwLock;

use kbrag_core::traits::VectorIndex;
use kbrag_core::types::{IndexEntry, SearchHit};

#[derive(Default)]
pub struct MemoryIndex {
    entries: RwLock<BTreeMap<String, IndexEntry>>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

impl VectorIndex for MemoryIndex {
    fn upsert(&self, entries: &[IndexEntry]) -> Result<()> {
        let Ok(mut map) = self.entries.write() else {
            bail!("memory index lock poisoned");
        };
        for e in entries {
            map.insert(e.id.clone(), e.clone());
        }
        Ok(())
    }

    fn query(&self, vector: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        let Ok(map) = self.entries.read() else {
            bail!("memory index lock poisoned");
        };
        let mut hits: Vec<SearchHit> = map
            .values()
            .filter(|e| e.vector.len() == vector.len())
            .map(|e| SearchHit {
                id: e.id.clone(),
                source: e.source.clone(),
                text: e.text.clone(),
                distance: squared_l2(&e.vector, vector),
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance).then_with(|| a.id.cmp(&b.id)));
        hits.truncate(k);
        Ok(hits)
    }

    fn count(&self) -> Result<usize> {
        match self.entries.read() {
            Ok(map) => Ok(map.len()),
            Err(_) => bail!("memory index lock poisoned"),
        }
    }
}
