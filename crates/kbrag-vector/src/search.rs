use anyhow::{anyhow, Result};
use arrow_array::{Array, Float32Array, RecordBatch, StringArray};
use futures::TryStreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::{DistanceType, Table};

use kbrag_core::types::SearchHit;

fn string_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray> {
    batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<StringArray>())
        .ok_or_else(|| anyhow!("{} column missing from search results", name))
}

fn hits_from_batch(batch: &RecordBatch) -> Result<Vec<SearchHit>> {
    let ids = string_column(batch, "id")?;
    let sources = string_column(batch, "source")?;
    let texts = string_column(batch, "text")?;
    let distances = batch
        .column_by_name("_distance")
        .and_then(|c| c.as_any().downcast_ref::<Float32Array>())
        .ok_or_else(|| anyhow!("_distance column missing from search results"))?;

    Ok((0..batch.num_rows())
        .map(|i| SearchHit {
            id: ids.value(i).to_string(),
            source: (!sources.is_null(i)).then(|| sources.value(i).to_string()),
            text: texts.value(i).to_string(),
            distance: distances.value(i),
        })
        .collect())
}

/// Exhaustive L2 search, closest first.
pub async fn nearest(table: &Table, vector: &[f32], k: usize) -> Result<Vec<SearchHit>> {
    let mut stream = table
        .vector_search(vector.to_vec())?
        .distance_type(DistanceType::L2)
        .limit(k)
        .execute()
        .await?;
    let mut hits = Vec::new();
    while let Some(batch) = stream.try_next().await? {
        hits.extend(hits_from_batch(&batch)?);
    }
    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance).then_with(|| a.id.cmp(&b.id)));
    hits.truncate(k);
    Ok(hits)
}
