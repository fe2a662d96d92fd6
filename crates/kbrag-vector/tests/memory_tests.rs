use kbrag_core::traits::VectorIndex;
use kbrag_core::types::IndexEntry;
use kbrag_vector::MemoryIndex;

fn entry(id: &str, vector: Vec<f32>) -> IndexEntry {
    IndexEntry { id: id.to_string(), source: Some(format!("{id}.md")), text: format!("text of {id}"), vector }
}

#[test]
fn empty_index_returns_nothing() {
    let idx = MemoryIndex::new();
    assert_eq!(idx.count().unwrap(), 0);
    assert!(idx.query(&[1.0, 0.0], 5).unwrap().is_empty());
}

#[test]
fn upsert_is_idempotent() {
    let idx = MemoryIndex::new();
    let batch = vec![entry("a", vec![1.0, 0.0]), entry("b", vec![0.0, 1.0])];
    idx.upsert(&batch).unwrap();
    idx.upsert(&batch).unwrap();
    assert_eq!(idx.count().unwrap(), 2);
}

#[test]
fn query_sorted_ascending_with_id_tiebreak() {
    let idx = MemoryIndex::new();
    idx.upsert(&[entry("c", vec![0.0, 1.0]), entry("b", vec![1.0, 0.0]), entry("a", vec![0.0, 1.0])])
        .unwrap();

    let hits = idx.query(&[0.0, 1.0], 10).unwrap();
    let ids: Vec<&str> = hits.iter().map(|h| h.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "c", "b"]);
    assert_eq!(hits[0].distance, 0.0);
    assert!((hits[2].distance - 2.0).abs() < 1e-6);
    assert_eq!(hits[0].source.as_deref(), Some("a.md"));

    assert_eq!(idx.query(&[0.0, 1.0], 1).unwrap().len(), 1);
    assert!(idx.query(&[0.0, 1.0], 0).unwrap().is_empty());
}
