use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use crate::playback::{PlaybackConfig, DEFAULT_STEP_INTERVAL_MS};

const APP_DIR: &str = "vehicle-tracker";

/// Directory holding settings and the window layout
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(APP_DIR))
}

/// Persistent application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Route file loaded at startup instead of the built-in route
    pub route_file: Option<PathBuf>,
    /// Day list loaded at startup instead of the built-in list
    pub days_file: Option<PathBuf>,
    pub step_interval_ms: u64,
    /// Battery level shown in the vehicle info panel
    pub battery_percent: u8,
    pub show_track: bool,
    pub show_controls: bool,
    pub show_map: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            route_file: None,
            days_file: None,
            step_interval_ms: DEFAULT_STEP_INTERVAL_MS,
            battery_percent: 16,
            show_track: true,
            show_controls: true,
            show_map: true,
        }
    }
}

impl AppSettings {
    fn config_path() -> Option<PathBuf> {
        config_dir().map(|p| p.join("settings.json"))
    }

    /// Load settings from the user config directory, falling back to defaults
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path).unwrap_or_else(|e| {
                warn!("Ignoring unreadable settings: {:#}", e);
                Self::default()
            }),
            _ => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let settings: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(settings.sanitized())
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path().context("No config directory on this platform")?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        debug!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Playback config seeded from the saved interval
    pub fn playback_config(&self) -> PlaybackConfig {
        PlaybackConfig::with_step_interval(self.step_interval_ms)
    }

    fn sanitized(mut self) -> Self {
        self.battery_percent = self.battery_percent.min(100);
        self.step_interval_ms = self.playback_config().step_interval_ms;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("vehicle-tracker-test-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let path = temp_path("partial.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{"show_track": false}"#).unwrap();

        let settings = AppSettings::load_from(&path).unwrap();
        assert!(!settings.show_track);
        assert_eq!(settings.step_interval_ms, 1000);
        assert_eq!(settings.battery_percent, 16);
        assert!(settings.route_file.is_none());
    }

    #[test]
    fn test_out_of_range_values_are_sanitized() {
        let path = temp_path("sanitize.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{"step_interval_ms": 10, "battery_percent": 250}"#).unwrap();

        let settings = AppSettings::load_from(&path).unwrap();
        assert_eq!(settings.step_interval_ms, 200);
        assert_eq!(settings.battery_percent, 100);
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("nested/settings.json");
        let settings = AppSettings {
            route_file: Some(PathBuf::from("/data/route.csv")),
            step_interval_ms: 600,
            show_map: false,
            ..AppSettings::default()
        };
        settings.save_to(&path).unwrap();
        assert_eq!(AppSettings::load_from(&path).unwrap(), settings);
    }

    #[test]
    fn test_garbage_file_is_error() {
        let path = temp_path("garbage.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not json").unwrap();
        assert!(AppSettings::load_from(&path).is_err());
    }
}
