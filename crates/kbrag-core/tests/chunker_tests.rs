use kbrag_core::chunker::{chunk_text, normalize_text, ChunkingConfig, DEFAULT_MAX_CHARS, DEFAULT_OVERLAP};
use kbrag_core::error::Error;

fn cfg(max_chars: usize, overlap: usize) -> ChunkingConfig {
    ChunkingConfig::new(max_chars, overlap).expect("valid chunking config")
}

/// Chunk 0 plus the non-overlapping suffix of every later chunk.
fn reassemble(chunks: &[String], overlap: usize) -> String {
    let mut out = String::new();
    for (i, c) in chunks.iter().enumerate() {
        if i == 0 { out.push_str(c); } else { out.extend(c.chars().skip(overlap)); }
    }
    out
}

fn assert_chunk_properties(text: &str, max_chars: usize, overlap: usize) {
    let chunks = chunk_text(text, &cfg(max_chars, overlap));
    let normalized = normalize_text(text);
    for c in &chunks { assert!(c.chars().count() <= max_chars, "chunk longer than {max_chars}: {c:?}"); }
    for pair in chunks.windows(2) {
        let prev: Vec<char> = pair[0].chars().collect();
        let next: Vec<char> = pair[1].chars().collect();
        assert_eq!(prev.len(), max_chars, "only the final chunk may be short");
        assert_eq!(&prev[prev.len() - overlap..], &next[..overlap], "overlap region differs");
    }
    assert_eq!(reassemble(&chunks, overlap), normalized, "chunks must rebuild the normalized text");
}

#[test]
fn defaults_match_documented_values() {
    let c = ChunkingConfig::default();
    assert_eq!((c.max_chars(), c.overlap()), (DEFAULT_MAX_CHARS, DEFAULT_OVERLAP));
    assert_eq!((DEFAULT_MAX_CHARS, DEFAULT_OVERLAP), (1200, 200));
}

#[test]
fn empty_and_whitespace_only_yield_no_chunks() {
    let c = ChunkingConfig::default();
    assert!(chunk_text("", &c).is_empty());
    assert!(chunk_text("   \n\n\n\n  ", &c).is_empty());
}

#[test]
fn collapses_blank_runs_and_trims() {
    let chunks = chunk_text("  Alpha beta.\n\n\nGamma.\n\n\n\n\nDelta\n ", &ChunkingConfig::default());
    assert_eq!(chunks, vec!["Alpha beta.\n\nGamma.\n\nDelta".to_string()]);
}

#[test]
fn two_newlines_are_kept() {
    assert_eq!(normalize_text("a\n\nb"), "a\n\nb");
    assert_eq!(normalize_text("a\n\n\nb"), "a\n\nb");
}

#[test]
fn windows_advance_by_max_minus_overlap() {
    let chunks = chunk_text("abcdefghij", &cfg(4, 1));
    assert_eq!(chunks, vec!["abcd", "defg", "ghij"]);
}

#[test]
fn window_reaching_end_stops_the_loop() {
    // Second window "efgh" ends exactly at the text end, so no trailing "h" chunk.
    let chunks = chunk_text("abcdefgh", &cfg(4, 0));
    assert_eq!(chunks, vec!["abcd", "efgh"]);
}

#[test]
fn text_shorter_than_window_is_one_chunk() {
    assert_eq!(chunk_text("short", &ChunkingConfig::default()), vec!["short"]);
}

#[test]
fn properties_hold_for_varied_inputs() {
    let long_ascii: String = (0..5000).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
    let paragraphs = "Lorem ipsum dolor sit amet.\n\n\n\nConsectetur adipiscing elit.\n".repeat(80);
    let multibyte = "Ünïcödé ✓ 日本語テキスト — ".repeat(120);
    for text in [long_ascii.as_str(), paragraphs.as_str(), multibyte.as_str(), "x"] {
        for (m, o) in [(1200, 200), (50, 10), (7, 6), (3, 0), (1, 0)] {
            assert_chunk_properties(text, m, o);
        }
    }
}

#[test]
fn multibyte_text_is_split_on_char_boundaries() {
    let chunks = chunk_text("ééééé", &cfg(2, 1));
    assert_eq!(chunks, vec!["éé", "éé", "éé", "éé"]);
}

#[test]
fn degenerate_configs_are_rejected() {
    for (m, o) in [(0, 0), (10, 10), (10, 11)] {
        match ChunkingConfig::new(m, o) {
            Err(Error::InvalidChunking { max_chars, overlap }) => assert_eq!((max_chars, overlap), (m, o)),
            other => panic!("expected InvalidChunking for ({m}, {o}), got {other:?}"),
        }
    }
}
