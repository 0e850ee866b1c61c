//! Deployment configuration.
//!
//! Selects the one active storage backend and its connection settings. Read
//! from a TOML file; `EQUINE_*` environment variables override file values:
//!
//! ```toml
//! backend = "sqlite"          # memory | sqlite | remote
//! log_filter = "equine_core=debug"
//!
//! [sqlite]
//! path = "equine-clinic.db"
//! seed = true
//!
//! [remote]
//! url = "https://project.example.co"
//! api_key = "..."
//! timeout_secs = 30
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::db::DEFAULT_DB_FILE;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse TOML content.
    #[error("failed to parse config TOML: {source}")]
    Toml {
        #[from]
        source: toml::de::Error,
    },

    /// Parsed, but unusable.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Which persistence backend is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Memory,
    #[default]
    Sqlite,
    Remote,
}

impl Backend {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Some(Self::Memory),
            "sqlite" => Some(Self::Sqlite),
            "remote" => Some(Self::Remote),
            _ => None,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ClinicConfig {
    #[serde(default)]
    pub backend: Backend,

    #[serde(default)]
    pub sqlite: SqliteConfig,

    #[serde(default)]
    pub remote: RemoteConfig,

    /// `tracing` filter directive; `RUST_LOG` wins when set.
    #[serde(default)]
    pub log_filter: Option<String>,
}

/// Local embedded store settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SqliteConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,

    /// Load the sample rows into an empty database.
    #[serde(default = "default_true")]
    pub seed: bool,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            seed: true,
        }
    }
}

/// Hosted backend settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteConfig {
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl RemoteConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl ClinicConfig {
    /// Load configuration from a TOML file, then apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Toml`] if it is not valid TOML, or
    /// [`ConfigError::Invalid`] if the result fails [`validate`](Self::validate).
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string. No environment overrides.
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Defaults plus environment overrides, for running without a file.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `EQUINE_BACKEND`, `EQUINE_DB_PATH`, `EQUINE_REMOTE_URL`,
    /// `EQUINE_REMOTE_KEY` and `EQUINE_LOG`.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(val) = lookup("EQUINE_BACKEND") {
            self.backend = Backend::parse(&val)
                .ok_or_else(|| ConfigError::Invalid(format!("unknown backend '{val}'")))?;
        }
        if let Some(val) = lookup("EQUINE_DB_PATH") {
            self.sqlite.path = PathBuf::from(val);
        }
        if let Some(val) = lookup("EQUINE_REMOTE_URL") {
            self.remote.url = Some(val);
        }
        if let Some(val) = lookup("EQUINE_REMOTE_KEY") {
            self.remote.api_key = Some(val);
        }
        if let Some(val) = lookup("EQUINE_LOG") {
            self.log_filter = Some(val);
        }
        Ok(())
    }

    /// A remote backend needs both URL and key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend == Backend::Remote {
            let missing = |v: &Option<String>| v.as_deref().map_or(true, |s| s.trim().is_empty());
            if missing(&self.remote.url) {
                return Err(ConfigError::Invalid("remote backend requires remote.url".into()));
            }
            if missing(&self.remote.api_key) {
                return Err(ConfigError::Invalid(
                    "remote backend requires remote.api_key".into(),
                ));
            }
        }
        if self.remote.timeout_secs == 0 {
            return Err(ConfigError::Invalid("remote.timeout_secs must be positive".into()));
        }
        Ok(())
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from(DEFAULT_DB_FILE)
}

fn default_true() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    30
}
