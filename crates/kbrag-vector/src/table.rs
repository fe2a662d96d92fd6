//! LanceDB connection and table housekeeping.
use anyhow::{bail, Result};
use arrow_array::RecordBatchIterator;
use lancedb::{connect, Connection, Table};
use std::sync::Arc;
use tracing::info;

use crate::schema::{build_arrow_schema, vector_dim};

pub async fn open_db(uri: &str) -> Result<Connection> {
    Ok(connect(uri).execute().await?)
}

/// Create `name` with `schema` and zero rows unless it already exists.
/// Returns whether the table was created.
pub async fn ensure_table(conn: &Connection, name: &str, schema: Arc<arrow_schema::Schema>) -> Result<bool> {
    let names = conn.table_names().execute().await?;
    if names.iter().any(|n| n == name) {
        return Ok(false);
    }
    let iter = RecordBatchIterator::new(vec![].into_iter(), schema.clone());
    conn.create_table(name, Box::new(iter)).execute().await?;
    Ok(true)
}

/// Open (creating if absent) the collection table and check that its vector
/// width matches the embedder in use.
pub async fn open_collection(conn: &Connection, name: &str, dim: i32) -> Result<Table> {
    if ensure_table(conn, name, build_arrow_schema(dim)).await? {
        info!("Created collection '{}' ({}-d vectors)", name, dim);
    }
    let table = conn.open_table(name).execute().await?;
    match vector_dim(&table.schema().await?) {
        Some(n) if n == dim => Ok(table),
        Some(n) => bail!("collection '{}' stores {}-d vectors but the embedder produces {}-d", name, n, dim),
        None => bail!("table '{}' has no vector column", name),
    }
}
