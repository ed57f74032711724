//! Daemon configuration loaded from `FLEET_*` environment variables via
//! `envy`.
//!
//!   - `FLEET_BACKEND`            (default `memory`; `file`, `dual-memory`, `redis`)
//!   - `FLEET_DATA_DIR`           (default `./data`)
//!   - `FLEET_DOCUMENT_URL`       (default `redis://127.0.0.1:6379/0`)
//!   - `FLEET_LOG_URL`            (default `redis://127.0.0.1:6379/1`)
//!   - `FLEET_KEY_PREFIX`         (default `fleet`)
//!   - `FLEET_POLL_INTERVAL_MS`   (default `1000`)
//!   - `FLEET_INGEST_INTERVAL_MS` (default `5000`)

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use fleet_common::store_keys::{DEFAULT_PREFIX, validate_prefix};
use serde::Deserialize;

pub const ENV_PREFIX: &str = "FLEET_";

/// Where entity state is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum Backend {
    /// Process memory, lost on exit.
    #[default]
    Memory,
    /// One JSON snapshot per collection under the data directory.
    File,
    /// Document and log ports backed by process memory.
    DualMemory,
    /// Document hash and history list on Redis.
    Redis,
}

impl Backend {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::File => "file",
            Self::DualMemory => "dual-memory",
            Self::Redis => "redis",
        }
    }
}

impl TryFrom<String> for Backend {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "file" => Ok(Self::File),
            "dual-memory" => Ok(Self::DualMemory),
            "redis" => Ok(Self::Redis),
            other => Err(format!(
                "unknown backend {other:?}, expected memory, file, dual-memory or redis"
            )),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: Backend,

    /// Directory holding `<collection>.json` snapshots for the file backend.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Redis URL of the document store.
    #[serde(default = "default_document_url")]
    pub document_url: String,

    /// Redis URL of the history log store.
    #[serde(default = "default_log_url")]
    pub log_url: String,

    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_ingest_interval_ms")]
    pub ingest_interval_ms: u64,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_document_url() -> String {
    "redis://127.0.0.1:6379/0".to_string()
}

fn default_log_url() -> String {
    "redis://127.0.0.1:6379/1".to_string()
}

fn default_key_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_ingest_interval_ms() -> u64 {
    5000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            data_dir: default_data_dir(),
            document_url: default_document_url(),
            log_url: default_log_url(),
            key_prefix: default_key_prefix(),
            poll_interval_ms: default_poll_interval_ms(),
            ingest_interval_ms: default_ingest_interval_ms(),
        }
    }
}

impl Config {
    /// Load and validate from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or the result is
    /// invalid.
    pub fn from_env() -> Result<Self> {
        let config: Self = envy::prefixed(ENV_PREFIX)
            .from_env()
            .context("failed to load config from FLEET_* env vars")?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate from explicit `(name, value)` pairs, names carrying
    /// the `FLEET_` prefix.
    ///
    /// # Errors
    ///
    /// Same as [`Config::from_env`].
    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config: Self = envy::prefixed(ENV_PREFIX)
            .from_iter(vars)
            .context("failed to parse FLEET_* variables")?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns an error for a zero interval, a malformed key prefix, or an
    /// empty data directory when the file backend is selected.
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_ms == 0 {
            bail!("FLEET_POLL_INTERVAL_MS must be greater than zero");
        }
        if self.ingest_interval_ms == 0 {
            bail!("FLEET_INGEST_INTERVAL_MS must be greater than zero");
        }
        validate_prefix(&self.key_prefix)
            .map_err(|reason| anyhow::anyhow!("invalid FLEET_KEY_PREFIX: {reason}"))?;
        if self.backend == Backend::File && self.data_dir.as_os_str().is_empty() {
            bail!("FLEET_DATA_DIR must be set for the file backend");
        }
        Ok(())
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    #[must_use]
    pub fn ingest_interval(&self) -> Duration {
        Duration::from_millis(self.ingest_interval_ms)
    }
}
