//! Best-effort sweep of a knowledge-base folder.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::{DirEntry, WalkDir};

pub const TEXT_EXTENSIONS: &[&str] = &["md", "txt", "py", "go", "js", "ts", "json", "yaml", "yml"];

pub fn is_text_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .is_some_and(|ext| TEXT_EXTENSIONS.contains(&ext.as_str()))
}

/// Decode as UTF-8, dropping any byte sequence that is not valid.
pub fn decode_lossy(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        out.push_str(chunk.valid());
    }
    out
}

fn is_file_or_file_link(e: &DirEntry) -> bool {
    e.file_type().is_file() || (e.path_is_symlink() && e.path().is_file())
}

/// Lazily yield `(path, content)` for every recognized text file under `root`.
///
/// Entries are visited in file-name order. Symlinks to regular files are
/// read through; directory symlinks are not descended. Anything that cannot
/// be walked or read is skipped.
pub fn collect_files(root: &Path) -> impl Iterator<Item = (PathBuf, String)> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(err) => {
                debug!("skipping unreadable entry: {}", err);
                None
            }
        })
        .filter(|e| is_file_or_file_link(e) && is_text_file(e.path()))
        .filter_map(|e| match fs::read(e.path()) {
            Ok(bytes) => Some((e.into_path(), decode_lossy(&bytes))),
            Err(err) => {
                debug!("skipping {}: {}", e.path().display(), err);
                None
            }
        })
}

/// Root-relative, `/`-separated identifier of `path`.
pub fn doc_id(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
