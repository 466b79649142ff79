//! Journal configuration — TOML file with environment overrides.
//!
//! Every key is optional:
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:8000/api"
//! timeout_secs = 30
//!
//! [log]
//! filter = "info"
//! file = "/tmp/journal.log"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ENV_API_URL: &str = "JOURNAL_API_URL";
pub const ENV_LOG: &str = "JOURNAL_LOG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Backend connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".into(),
            timeout_secs: 30,
        }
    }
}

/// Logging settings shared by both binaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive.
    pub filter: String,
    /// Log file for the TUI. Defaults to `journal.log` in the config dir.
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".into(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JournalConfig {
    pub api: ApiConfig,
    pub log: LogConfig,
}

impl JournalConfig {
    /// Parse a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load a config file. A missing file yields defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Load from `explicit` or the default location, then apply env overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = explicit
            .map(Path::to_path_buf)
            .unwrap_or_else(|| config_dir().join("config.toml"));
        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Override values from the environment. `lookup` is injectable for tests.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.api.base_url = url;
        }
        if let Some(filter) = lookup(ENV_LOG).filter(|v| !v.trim().is_empty()) {
            self.log.filter = filter;
        }
    }

    /// The TUI log file, resolved against the config dir.
    pub fn log_file(&self) -> PathBuf {
        self.log
            .file
            .clone()
            .unwrap_or_else(|| config_dir().join("journal.log"))
    }
}

/// `<platform config dir>/trade-journal`, or `./.trade-journal` when the
/// platform has none.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("trade-journal"))
        .unwrap_or_else(|| PathBuf::from(".trade-journal"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_default() {
        let config = JournalConfig::from_toml("").unwrap();
        assert_eq!(config, JournalConfig::default());
        assert_eq!(config.api.timeout_secs, 30);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = JournalConfig::from_toml(
            r#"
            [api]
            base_url = "https://journal.example.com/api"
            "#,
        )
        .unwrap();
        assert_eq!(config.api.base_url, "https://journal.example.com/api");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.log.filter, "info");
    }

    #[test]
    fn bad_toml_is_an_error() {
        let err = JournalConfig::from_toml("[api]\ntimeout_secs = \"soon\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_default() {
        let config = JournalConfig::from_file(Path::new("/nonexistent/journal/config.toml")).unwrap();
        assert_eq!(config, JournalConfig::default());
    }

    #[test]
    fn file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[log]\nfilter = \"debug\"\nfile = \"/tmp/j.log\"\n").unwrap();
        let config = JournalConfig::from_file(&path).unwrap();
        assert_eq!(config.log.filter, "debug");
        assert_eq!(config.log_file(), PathBuf::from("/tmp/j.log"));
    }

    #[test]
    fn env_overrides() {
        let mut config = JournalConfig::default();
        config.apply_env_overrides(|key| match key {
            ENV_API_URL => Some("http://10.0.0.5:9000/api".into()),
            ENV_LOG => Some("   ".into()),
            _ => None,
        });
        assert_eq!(config.api.base_url, "http://10.0.0.5:9000/api");
        assert_eq!(config.log.filter, "info");
    }
}
