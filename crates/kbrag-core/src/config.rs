//! Lightweight configuration loader and path helpers.
//!
//! Uses Figment to merge built-in defaults + `config.toml` +
//! `config.<env>.toml` + `APP_*` env vars, and extracts the typed
//! [`Settings`] the store and the CLI run on.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::error::Error;

pub const DEFAULT_COLLECTION: &str = "kb_store";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Folder indexed by `kb_index` and sandboxing `read_file`.
    pub kb_root: String,
    /// Directory holding the LanceDB database.
    pub persist_dir: String,
    /// Collection (table) name, validated before use.
    pub collection: String,
    /// Local directory of the sentence-transformer model.
    pub model_dir: Option<String>,
    #[serde(deserialize_with = "figment::util::bool_from_str_or_int")]
    pub use_fake_embeddings: bool,
    pub top_k: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            kb_root: "kb".to_string(),
            persist_dir: "data/lancedb".to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            model_dir: None,
            use_fake_embeddings: false,
            top_k: 5,
        }
    }
}

impl Settings {
    pub fn kb_root_path(&self) -> PathBuf {
        expand_path(&self.kb_root)
    }

    pub fn persist_dir_path(&self) -> PathBuf {
        expand_path(&self.persist_dir)
    }

    pub fn model_dir_path(&self) -> Option<PathBuf> {
        self.model_dir.as_deref().map(expand_path)
    }
}

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_"));

        let config = Self { figment };
        config.validate_for_env(&env_name)?;
        Ok(config)
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    pub fn settings(&self) -> anyhow::Result<Settings> {
        self.figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to read settings: {}", e))
    }

    fn validate_for_env(&self, env: &str) -> anyhow::Result<()> {
        let settings = self.settings()?;
        match env {
            "prod" | "production" if settings.use_fake_embeddings => Err(Error::InvalidConfig(
                "use_fake_embeddings must be off in production".to_string(),
            )
            .into()),
            _ => Ok(()),
        }
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}
