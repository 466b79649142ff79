//! UI state persistence — JSON save/load across restarts.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::app::{AppState, Overlay, Panel};

/// Serializable subset of app state that persists across restarts.
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    pub active_panel: Panel,
    pub welcome_dismissed: bool,
    /// Prefilled into the login overlay.
    pub last_email: Option<String>,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            active_panel: Panel::Entry,
            welcome_dismissed: false,
            last_email: None,
        }
    }
}

/// Load persisted state from disk. Returns defaults if file is missing or corrupt.
pub fn load(path: &Path) -> PersistedState {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "ignoring corrupt UI state");
            PersistedState::default()
        }),
        Err(_) => PersistedState::default(),
    }
}

/// Save persisted state to disk. Creates parent directories if needed.
pub fn save(path: &Path, state: &PersistedState) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn extract(app: &AppState) -> PersistedState {
    let email = app.login.email.trim();
    PersistedState {
        active_panel: app.active_panel,
        welcome_dismissed: app.overlay != Overlay::Welcome,
        last_email: (!email.is_empty()).then(|| email.to_string()),
    }
}

pub fn apply(app: &mut AppState, state: PersistedState) {
    app.active_panel = state.active_panel;
    if !state.welcome_dismissed {
        app.overlay = Overlay::Welcome;
    }
    if let Some(email) = state.last_email {
        app.login.email = email;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::harness;

    #[test]
    fn roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ui").join("state.json");

        let state = PersistedState {
            active_panel: Panel::Analytics,
            welcome_dismissed: true,
            last_email: Some("trader@example.com".into()),
        };
        save(&path, &state).unwrap();
        let loaded = load(&path);

        assert_eq!(loaded.active_panel, Panel::Analytics);
        assert!(loaded.welcome_dismissed);
        assert_eq!(loaded.last_email.as_deref(), Some("trader@example.com"));
    }

    #[test]
    fn missing_file_returns_defaults() {
        let loaded = load(Path::new("/nonexistent/path/state.json"));
        assert_eq!(loaded.active_panel, Panel::Entry);
        assert!(!loaded.welcome_dismissed);
    }

    #[test]
    fn corrupt_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "not valid json {{{").unwrap();
        assert!(!load(&path).welcome_dismissed);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, r#"{"active_panel":"Trades"}"#).unwrap();
        let loaded = load(&path);
        assert_eq!(loaded.active_panel, Panel::Trades);
        assert!(loaded.last_email.is_none());
    }

    #[test]
    fn apply_then_extract() {
        let mut h = harness();
        apply(&mut h.app, PersistedState::default());
        assert_eq!(h.app.overlay, Overlay::Welcome);

        h.app.overlay = Overlay::None;
        h.app.active_panel = Panel::Help;
        h.app.login.email = "  t@x.io ".into();
        let out = extract(&h.app);
        assert!(out.welcome_dismissed);
        assert_eq!(out.active_panel, Panel::Help);
        assert_eq!(out.last_email.as_deref(), Some("t@x.io"));
    }
}
