use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants;
use crate::error::{PipelineError, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source_url: String,
    /// Directory receiving the local raw artifact
    pub artifact_dir: PathBuf,
    /// Rows per chunk for both streaming the source and re-reading the artifact
    pub chunk_rows: usize,
    pub log_dir: String,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Filesystem backend: each bucket is a subdirectory of this root
    pub root: PathBuf,
    /// HTTP backend: objects are PUT to `{endpoint}/{bucket}/{key}`
    pub endpoint: Option<String>,
    /// Bearer token for the HTTP backend. Only read from the environment.
    #[serde(skip)]
    pub token: Option<String>,
    pub transformed_bucket: String,
    pub raw_bucket: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Filesystem,
    Http,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_url: constants::DEFAULT_SOURCE_URL.to_string(),
            artifact_dir: PathBuf::from("data"),
            chunk_rows: constants::DEFAULT_CHUNK_ROWS,
            log_dir: "logs".to_string(),
            storage: StorageConfig::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Filesystem,
            root: PathBuf::from("buckets"),
            endpoint: None,
            token: None,
            transformed_bucket: constants::DEFAULT_TRANSFORMED_BUCKET.to_string(),
            raw_bucket: constants::DEFAULT_RAW_BUCKET.to_string(),
        }
    }
}

impl Config {
    /// Load from a TOML file if present, then apply `REDFIN_*` environment overrides.
    pub fn load(config_path: &Path) -> Result<Self> {
        let config = if config_path.exists() {
            let content = fs::read_to_string(config_path).map_err(|e| {
                PipelineError::Config(format!(
                    "Failed to read config file '{}': {}",
                    config_path.display(),
                    e
                ))
            })?;
            toml::from_str(&content)?
        } else {
            tracing::debug!(
                "Config file {} not found, using defaults",
                config_path.display()
            );
            Config::default()
        };

        let config = config.with_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (the process environment in production).
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("REDFIN_SOURCE_URL") {
            self.source_url = v;
        }
        if let Some(v) = lookup("REDFIN_ARTIFACT_DIR") {
            self.artifact_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("REDFIN_CHUNK_ROWS") {
            self.chunk_rows = v.parse().map_err(|_| {
                PipelineError::Config(format!("REDFIN_CHUNK_ROWS is not a positive integer: {}", v))
            })?;
        }
        if let Some(v) = lookup("REDFIN_TRANSFORMED_BUCKET") {
            self.storage.transformed_bucket = v;
        }
        if let Some(v) = lookup("REDFIN_RAW_BUCKET") {
            self.storage.raw_bucket = v;
        }
        if let Some(v) = lookup("REDFIN_STORAGE_ROOT") {
            self.storage.root = PathBuf::from(v);
        }
        if let Some(v) = lookup("REDFIN_STORAGE_ENDPOINT") {
            self.storage.endpoint = Some(v);
            self.storage.backend = StorageBackend::Http;
        }
        if let Some(v) = lookup("REDFIN_STORAGE_TOKEN") {
            self.storage.token = Some(v);
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunk_rows == 0 {
            return Err(PipelineError::Config("chunk_rows must be greater than zero".into()));
        }
        if self.storage.transformed_bucket.is_empty() || self.storage.raw_bucket.is_empty() {
            return Err(PipelineError::Config("bucket names must not be empty".into()));
        }
        if self.storage.transformed_bucket == self.storage.raw_bucket {
            return Err(PipelineError::Config(
                "transformed and raw buckets must be distinct".into(),
            ));
        }
        if self.storage.backend == StorageBackend::Http && self.storage.endpoint.is_none() {
            return Err(PipelineError::Config(
                "http storage backend requires storage.endpoint".into(),
            ));
        }
        Ok(())
    }
}
