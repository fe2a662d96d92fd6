//! Fixed-size character windows with overlap.
//!
//! Text is normalized first (runs of three or more newlines become a single
//! blank line, surrounding whitespace is trimmed), then cut into windows of
//! `max_chars` characters where each window starts `max_chars - overlap`
//! characters after the previous one. Sizes are counted in `char`s, so a
//! window never splits a UTF-8 sequence.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Error, Result};

pub const DEFAULT_MAX_CHARS: usize = 1200;
pub const DEFAULT_OVERLAP: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkingConfig {
    max_chars: usize,
    overlap: usize,
}

impl ChunkingConfig {
    pub fn new(max_chars: usize, overlap: usize) -> Result<Self> {
        if max_chars == 0 || overlap >= max_chars {
            return Err(Error::InvalidChunking { max_chars, overlap });
        }
        Ok(Self { max_chars, overlap })
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    fn step(&self) -> usize {
        self.max_chars - self.overlap
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self { max_chars: DEFAULT_MAX_CHARS, overlap: DEFAULT_OVERLAP }
    }
}

fn blank_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n{3,}").expect("static regex"))
}

/// Collapse 3+ consecutive newlines to two and trim the result.
pub fn normalize_text(text: &str) -> Cow<'_, str> {
    match blank_run().replace_all(text, "\n\n") {
        Cow::Borrowed(s) => Cow::Borrowed(s.trim()),
        Cow::Owned(s) => Cow::Owned(s.trim().to_string()),
    }
}

pub fn chunk_text(text: &str, config: &ChunkingConfig) -> Vec<String> {
    let text = normalize_text(text);
    if text.is_empty() {
        return Vec::new();
    }

    // Byte offset of every char boundary, including the end of the string.
    let bounds: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let total = bounds.len() - 1;

    let mut chunks = Vec::with_capacity(total / config.step() + 1);
    let mut start = 0usize;
    loop {
        let end = (start + config.max_chars).min(total);
        chunks.push(text[bounds[start]..bounds[end]].to_string());
        if end == total {
            break;
        }
        start += config.step();
    }
    chunks
}
