use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct MemgraphConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub retrieval: RetrievalConfig,
    pub discovery: DiscoveryConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub transport: String,
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RetrievalConfig {
    pub default_limit: usize,
}

/// Background discovery settings.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DiscoveryConfig {
    pub enabled: bool,
    /// Seconds between the end of one cycle and the start of the next.
    pub interval_secs: u64,
    /// Seconds to wait after a failed cycle.
    pub error_backoff_secs: u64,
    /// Nodes pulled per cycle for pair scoring.
    pub sample_size: usize,
    /// Distinct pairs scored per cycle.
    pub max_pairs: usize,
    /// Pairs scoring strictly above this are reported.
    pub score_threshold: f64,
    /// Write discovered relationships to the store instead of only logging them.
    pub persist_relationships: bool,
    /// Nodes pulled per cycle for project clustering.
    pub summary_sample_size: usize,
    pub summary_min_group_size: usize,
    /// Fixed seed for pair sampling. Random when unset.
    pub seed: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: "stdio".into(),
            host: "127.0.0.1".into(),
            port: 8080,
            log_level: "info".into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let db_path = default_memgraph_dir()
            .join("memory_graph.db")
            .to_string_lossy()
            .into_owned();
        Self { db_path }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { default_limit: 10 }
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 300,
            error_backoff_secs: 60,
            sample_size: 50,
            max_pairs: 10,
            score_threshold: 0.3,
            persist_relationships: true,
            summary_sample_size: 100,
            summary_min_group_size: 3,
            seed: None,
        }
    }
}

impl DiscoveryConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn error_backoff(&self) -> Duration {
        Duration::from_secs(self.error_backoff_secs)
    }

    /// Zero-length sleeps would turn the scheduler into a busy loop.
    fn validate(&self) -> Result<()> {
        if self.interval_secs == 0 {
            anyhow::bail!("discovery.interval_secs must be at least 1");
        }
        if self.error_backoff_secs == 0 {
            anyhow::bail!("discovery.error_backoff_secs must be at least 1");
        }
        Ok(())
    }
}

/// Returns `~/.memgraph/`
pub fn default_memgraph_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".memgraph")
}

/// Returns the default config file path: `~/.memgraph/config.toml`
pub fn default_config_path() -> PathBuf {
    default_memgraph_dir().join("config.toml")
}

impl MemgraphConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            MemgraphConfig::default()
        };

        config.apply_env_overrides()?;
        config.discovery.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides (MEMGRAPH_DB, MEMGRAPH_LOG_LEVEL,
    /// MEMGRAPH_DISCOVERY_ENABLED, MEMGRAPH_DISCOVERY_INTERVAL).
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("MEMGRAPH_DB") {
            self.storage.db_path = val;
        }
        if let Ok(val) = std::env::var("MEMGRAPH_LOG_LEVEL") {
            self.server.log_level = val;
        }
        if let Ok(val) = std::env::var("MEMGRAPH_DISCOVERY_ENABLED") {
            self.discovery.enabled = parse_bool(&val)
                .with_context(|| format!("invalid MEMGRAPH_DISCOVERY_ENABLED: {val}"))?;
        }
        if let Ok(val) = std::env::var("MEMGRAPH_DISCOVERY_INTERVAL") {
            self.discovery.interval_secs = val
                .parse()
                .with_context(|| format!("invalid MEMGRAPH_DISCOVERY_INTERVAL: {val}"))?;
        }
        Ok(())
    }

    /// Resolve the database path, expanding `~` if needed.
    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }
}

fn parse_bool(val: &str) -> Result<bool> {
    match val.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("expected a boolean, got {other:?}"),
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
