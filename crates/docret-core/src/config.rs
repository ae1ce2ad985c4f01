//! Lightweight configuration loader and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars
//! (nested keys separated by `__`, e.g. `APP_RETRIEVER__INDEX_DIR`).
//! Provides helpers to expand `~` and `${VAR}` and to resolve relative paths
//! against a known base directory.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::score::DistanceMetric;

pub const DEFAULT_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";

pub struct Config {
    figment: Figment,
    env_name: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_for_env(Path::new("."), &env_name)
    }

    /// Load `config.toml` and the file for `env_name` from `base`.
    pub fn load_for_env(base: &Path, env_name: &str) -> Result<Self> {
        let mut figment = Figment::new()
            .merge(Serialized::defaults(Defaults::default()))
            .merge(Toml::file(base.join("config.toml")));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file(base.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(base.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(base.join("config.test.toml"))),
            other => tracing::warn!(env = other, "unknown RUST_ENV, using config.toml only"),
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment, env_name: env_name.to_string() };
        config.validate()?;
        Ok(config)
    }

    pub fn env_name(&self) -> &str {
        &self.env_name
    }

    pub fn get<T>(&self, key: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| Error::InvalidConfig(format!("Failed to get '{}': {}", key, e)))
    }

    pub fn retriever(&self) -> Result<RetrieverSettings> {
        self.get("retriever")
    }

    fn validate(&self) -> Result<()> {
        let settings = self.retriever()?;
        if settings.default_k == 0 {
            return Err(Error::InvalidConfig("retriever.default_k must be at least 1".to_string()));
        }
        if settings.embedding.model.trim().is_empty() {
            return Err(Error::InvalidConfig("retriever.embedding.model must not be empty".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Serialize)]
struct Defaults {
    retriever: RetrieverSettings,
}

/// Settings for opening a retriever over an existing index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrieverSettings {
    pub index_dir: String,
    pub table: String,
    pub metric: DistanceMetric,
    pub default_k: usize,
    pub embedding: EmbedderSettings,
}

impl Default for RetrieverSettings {
    fn default() -> Self {
        Self {
            index_dir: "./vectorstore".to_string(),
            table: "documents".to_string(),
            metric: DistanceMetric::default(),
            default_k: 5,
            embedding: EmbedderSettings::default(),
        }
    }
}

impl RetrieverSettings {
    pub fn index_path(&self, base: &Path) -> PathBuf {
        resolve_with_base(base, &self.index_dir)
    }
}

/// Which embedding model to load and where to find it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedderSettings {
    /// Must be the model that built the index.
    pub model: String,
    pub models_dir: String,
    /// Token limit per input; longer texts are truncated.
    pub max_len: usize,
}

impl Default for EmbedderSettings {
    fn default() -> Self {
        Self { model: DEFAULT_MODEL.to_string(), models_dir: "./models".to_string(), max_len: 256 }
    }
}

impl EmbedderSettings {
    pub fn for_model(model: impl Into<String>) -> Self {
        Self { model: model.into(), ..Self::default() }
    }

    pub fn models_path(&self) -> PathBuf {
        expand_path(&self.models_dir)
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

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
