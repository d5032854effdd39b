use crate::input::DEFAULT_BASE_URL;
use crate::playback::DEFAULT_SPEED;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Persisted user preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub service_url: String,
    pub speed: u8,
    /// Start playing as soon as steps arrive
    pub autoplay: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_BASE_URL.to_string(),
            speed: DEFAULT_SPEED,
            autoplay: true,
        }
    }
}

impl AppSettings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("algoviz").join("settings.json"))
    }

    /// Settings from the user config dir, or defaults
    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|contents| serde_json::from_str(&contents).map_err(|e| e.to_string()))
        {
            Ok(settings) => settings,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring unreadable settings");
                Self::default()
            }
        }
    }

    pub fn save(&self) {
        if let Some(path) = Self::config_path() {
            self.save_to(&path);
        }
    }

    pub fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = fs::write(path, json) {
                    warn!(path = %path.display(), error = %e, "Failed to save settings");
                }
            }
            Err(e) => warn!(error = %e, "Failed to encode settings"),
        }
    }
}
