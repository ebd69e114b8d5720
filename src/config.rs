//! Application configuration file support.
//!
//! Reads `adx.toml` from standard locations, with serde defaults so a
//! missing file or a partial one still yields a runnable configuration.
//! Environment variables override the file for deployment tweaks.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub ingest: IngestSettings,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Ingest pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestSettings {
    /// Directory the mirror sync fills and the combiner reads.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,
    /// Batch size for the grouping pass.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("data/source_cache")
}

fn default_batch_size() -> usize {
    50_000
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            batch_size: default_batch_size(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            ingest: IngestSettings::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file {}", path.as_ref().display()))?;
        let config: AppConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.as_ref().display()))?;
        Ok(config)
    }

    /// Load configuration from the first `adx.toml` found in standard
    /// locations, falling back to defaults when none exists. Environment
    /// overrides are applied last.
    pub fn load() -> Result<Self> {
        let search_paths = [PathBuf::from("adx.toml"), PathBuf::from("../adx.toml")];

        let mut config = None;
        for path in &search_paths {
            if path.exists() {
                config = Some(Self::from_file(path)?);
                break;
            }
        }
        let mut config = config.unwrap_or_default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("ADX_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("ADX_PORT") {
            self.server.port = port
                .parse()
                .context("ADX_PORT must be a valid port number")?;
        }
        if let Ok(dir) = std::env::var("ADX_CACHE_DIR") {
            self.ingest.cache_dir = PathBuf::from(dir);
        }
        Ok(())
    }
}
