//! Collection names.
//!
//! LanceDB (like most vector stores) rejects odd table names with a low-level
//! error deep inside the first write. Names are checked up front instead, and
//! [`CollectionName`] can only be obtained through [`validate_collection_name`].

use std::fmt;

use crate::config::Settings;
use crate::error::{Error, NameRule, Result};

pub const MIN_LEN: usize = 3;
pub const MAX_LEN: usize = 512;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionName(String);

impl CollectionName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CollectionName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')
}

pub fn validate_collection_name(name: &str) -> Result<CollectionName> {
    let name = name.trim();
    let fail = |rule| Err(Error::InvalidCollectionName { name: name.to_string(), rule });

    let len = name.chars().count();
    if !(MIN_LEN..=MAX_LEN).contains(&len) {
        return fail(NameRule::Length(len));
    }
    if let Some(bad) = name.chars().find(|c| !is_allowed(*c)) {
        return fail(NameRule::Charset(bad));
    }
    // Charset check above guarantees ASCII, so byte access is safe here.
    if !name.as_bytes()[0].is_ascii_alphanumeric() {
        return fail(NameRule::Start);
    }
    if !name.as_bytes()[name.len() - 1].is_ascii_alphanumeric() {
        return fail(NameRule::End);
    }
    if name.contains("..") {
        return fail(NameRule::DoubleDot);
    }
    Ok(CollectionName(name.to_string()))
}

/// Pick the collection: explicit argument, else configured value (which
/// itself defaults to [`DEFAULT_COLLECTION`](crate::config::DEFAULT_COLLECTION)),
/// then validate. Never falls back to another name on failure.
pub fn resolve_collection_name(explicit: Option<&str>, settings: &Settings) -> Result<CollectionName> {
    validate_collection_name(explicit.unwrap_or(&settings.collection))
}
