use anyhow::{bail, Result};
use arrow_array::{types::Float32Type, FixedSizeListArray, RecordBatch, RecordBatchIterator, StringArray};
use lancedb::Table;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

use kbrag_core::types::IndexEntry;

use crate::schema::build_arrow_schema;

/// Keep only the last occurrence of every id, preserving order otherwise.
fn dedup_last(entries: &[IndexEntry]) -> Vec<&IndexEntry> {
    let mut seen = HashSet::new();
    let mut out: Vec<&IndexEntry> = entries.iter().rev().filter(|e| seen.insert(e.id.as_str())).collect();
    out.reverse();
    out
}

pub fn entries_to_record_batch(entries: &[&IndexEntry], dim: i32) -> Result<RecordBatch> {
    if let Some(bad) = entries.iter().find(|e| e.vector.len() != dim as usize) {
        bail!("entry '{}' has a {}-d vector, collection expects {}", bad.id, bad.vector.len(), dim);
    }
    let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
    let sources: Vec<Option<&str>> = entries.iter().map(|e| e.source.as_deref()).collect();
    let texts: Vec<&str> = entries.iter().map(|e| e.text.as_str()).collect();
    let vectors = FixedSizeListArray::from_iter_primitive::<Float32Type, _, _>(
        entries.iter().map(|e| Some(e.vector.iter().copied().map(Some))),
        dim,
    );
    Ok(RecordBatch::try_new(
        build_arrow_schema(dim),
        vec![
            Arc::new(StringArray::from(ids)),
            Arc::new(StringArray::from(sources)),
            Arc::new(StringArray::from(texts)),
            Arc::new(vectors),
        ],
    )?)
}

/// Insert new ids and overwrite existing ones in a single merge.
pub async fn upsert(table: &Table, entries: &[IndexEntry], dim: i32) -> Result<()> {
    let entries = dedup_last(entries);
    if entries.is_empty() {
        return Ok(());
    }
    let batch = entries_to_record_batch(&entries, dim)?;
    let schema = batch.schema();
    let reader = Box::new(RecordBatchIterator::new(vec![Ok(batch)].into_iter(), schema));
    let mut mi = table.merge_insert(&["id"]);
    mi.when_matched_update_all(None).when_not_matched_insert_all();
    let _ = mi.execute(reader).await?;
    debug!("Upserted {} entries into '{}'", entries.len(), table.name());
    Ok(())
}
