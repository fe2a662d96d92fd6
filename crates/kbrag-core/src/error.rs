use std::fmt;

use thiserror::Error;

/// The specific collection-name rule a candidate violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameRule {
    /// Length (in characters) outside `3..=512`.
    Length(usize),
    /// A character outside `[A-Za-z0-9._-]`.
    Charset(char),
    /// First character is not ASCII alphanumeric.
    Start,
    /// Last character is not ASCII alphanumeric.
    End,
    /// Contains the substring `..`.
    DoubleDot,
}

impl fmt::Display for NameRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Length(len) => write!(f, "length {len} is outside 3..=512"),
            Self::Charset(c) => write!(f, "character {c:?} is not one of [A-Za-z0-9._-]"),
            Self::Start => f.write_str("must start with an alphanumeric character"),
            Self::End => f.write_str("must end with an alphanumeric character"),
            Self::DoubleDot => f.write_str("must not contain '..'"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid collection name {name:?}: {rule}")]
    InvalidCollectionName { name: String, rule: NameRule },

    #[error("Invalid chunking parameters: max_chars={max_chars}, overlap={overlap} (need max_chars > overlap)")]
    InvalidChunking { max_chars: usize, overlap: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
