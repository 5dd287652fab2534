//! Persisted user settings, stored as JSON in the OS config directory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{AppError, Result};
use crate::model::quake::MIN_MAGNITUDE;

const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Quiet period before a changed time window is applied.
    pub quiet_period_ms: u64,
    /// `error`, `warn`, `info`, `debug` or `trace`.
    pub log_level: String,
    pub default_min_magnitude: f64,
    /// Catalogue opened on startup, if any.
    pub last_events_file: Option<PathBuf>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            quiet_period_ms: 200,
            log_level: "info".into(),
            default_min_magnitude: MIN_MAGNITUDE,
            last_events_file: None,
        }
    }
}

impl AppSettings {
    pub fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.quiet_period_ms)
    }

    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }

    /// Directory holding the settings file.
    pub fn config_dir() -> Result<PathBuf> {
        directories::ProjectDirs::from("is", "quake-timewindow", "QuakeTimeWindow")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or(AppError::NoConfigDir)
    }

    /// Load settings from the config directory, falling back to defaults
    /// when the file is missing or unreadable.
    pub fn load() -> Self {
        match Self::config_dir() {
            Ok(dir) => Self::load_from(&dir.join(SETTINGS_FILE)),
            Err(e) => {
                log::warn!("{e}; using default settings");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                log::warn!("failed to read settings {}: {e}", path.display());
                return Self::default();
            }
        };
        serde_json::from_str(&contents).unwrap_or_else(|e| {
            log::warn!("ignoring malformed settings {}: {e}", path.display());
            Self::default()
        })
    }

    pub fn save(&self) -> Result<()> {
        let dir = Self::config_dir()?;
        std::fs::create_dir_all(&dir).map_err(|e| AppError::io(&dir, e))?;
        self.save_to(&dir.join(SETTINGS_FILE))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|source| AppError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(|e| AppError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("quake-timewindow-{}-{name}", std::process::id()))
    }

    #[test]
    fn missing_file_gives_defaults() {
        let settings = AppSettings::load_from(&temp_path("does-not-exist.json"));
        assert_eq!(settings, AppSettings::default());
        assert_eq!(settings.quiet_period(), Duration::from_millis(200));
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let path = temp_path("partial-settings.json");
        std::fs::write(&path, r#"{ "quiet_period_ms": 350, "log_level": "debug" }"#).unwrap();
        let settings = AppSettings::load_from(&path);
        assert_eq!(settings.quiet_period_ms, 350);
        assert_eq!(settings.level_filter(), log::LevelFilter::Debug);
        assert_eq!(settings.default_min_magnitude, MIN_MAGNITUDE);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn malformed_file_gives_defaults() {
        let path = temp_path("bad-settings.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(AppSettings::load_from(&path), AppSettings::default());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn save_then_load() {
        let path = temp_path("saved-settings.json");
        let settings = AppSettings {
            last_events_file: Some(PathBuf::from("/data/quakes.json")),
            ..Default::default()
        };
        settings.save_to(&path).unwrap();
        assert_eq!(AppSettings::load_from(&path), settings);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn unknown_level_falls_back_to_info() {
        let settings = AppSettings {
            log_level: "chatty".into(),
            ..Default::default()
        };
        assert_eq!(settings.level_filter(), log::LevelFilter::Info);
    }
}
