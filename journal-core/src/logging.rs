//! `tracing` subscriber setup for the binaries.
//!
//! `RUST_LOG` wins when set; otherwise the configured filter applies. The CLI
//! logs to stderr. The TUI owns the terminal, so it logs to a file instead.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
pub enum LogError {
    #[error("open log file {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("install subscriber: {0}")]
    Init(String),
}

/// `RUST_LOG` if present and valid, else `fallback`, else `info`.
pub fn env_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Log to stderr.
pub fn init_stderr(filter: &str) -> Result<(), LogError> {
    tracing_subscriber::registry()
        .with(env_filter(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| LogError::Init(e.to_string()))
}

/// Append plain-text logs to `path`, creating parent directories.
pub fn init_file(path: &Path, filter: &str) -> Result<(), LogError> {
    let open_err = |source| LogError::Open {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(open_err)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(open_err)?;

    tracing_subscriber::registry()
        .with(env_filter(filter))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .try_init()
        .map_err(|e| LogError::Init(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_fallback_still_builds_a_filter() {
        // Must not panic on a malformed directive.
        let _ = env_filter("=[not a filter");
    }

    #[test]
    fn file_logger_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("journal.log");
        // Another test may already have installed a global subscriber; the
        // file is opened before that matters.
        let _ = init_file(&path, "debug");
        assert!(path.exists());
    }
}
