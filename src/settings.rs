//! Persisted user preferences.
//!
//! Only the theme is stored, in `~/.config/ops-slip/settings.json` (macOS:
//! `~/Library/Application Support/ops-slip/settings.json`). The directory
//! can be overridden with `OPS_SLIP_CONFIG_DIR`.
//!
//! The store is passed to whoever needs it; nothing reads the file behind
//! the caller's back. It is read once on startup and written on every
//! change.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub theme: Theme,
}

/// File-backed settings service.
pub struct SettingsStore {
    path: PathBuf,
    current: Settings,
}

impl SettingsStore {
    /// Open the store at the platform config location and load it.
    pub fn open_default() -> Result<Self> {
        Ok(Self::open(default_dir()?.join(SETTINGS_FILE)))
    }

    /// Open the store at an explicit file path and load it.
    ///
    /// A missing or unreadable file yields defaults.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let current = load_from(&path);
        log::info!(
            "[SETTINGS] Loaded from {} (theme={})",
            path.display(),
            current.theme
        );
        Self { path, current }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn theme(&self) -> Theme {
        self.current.theme
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<()> {
        self.current.theme = theme;
        self.save()
    }

    /// Flip between light and dark and persist. Returns the new theme.
    pub fn toggle_theme(&mut self) -> Result<Theme> {
        let next = self.current.theme.toggled();
        self.set_theme(next)?;
        log::info!("[SETTINGS] Theme set to: {}", next);
        Ok(next)
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::Settings(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }
        let json = serde_json::to_string_pretty(&self.current)
            .map_err(|e| Error::Settings(format!("Failed to serialize settings: {}", e)))?;
        std::fs::write(&self.path, json).map_err(|e| {
            Error::Settings(format!("Failed to write {}: {}", self.path.display(), e))
        })
    }
}

fn default_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("OPS_SLIP_CONFIG_DIR") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir.trim()));
        }
    }
    dirs::config_dir()
        .map(|c| c.join("ops-slip"))
        .ok_or_else(|| Error::Settings("Could not determine config directory".to_string()))
}

fn load_from(path: &Path) -> Settings {
    match std::fs::read_to_string(path) {
        Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            log::warn!(
                "[SETTINGS] Ignoring unparsable {}: {}",
                path.display(),
                e
            );
            Settings::default()
        }),
        Err(_) => Settings::default(),
    }
}
