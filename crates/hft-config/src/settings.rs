//! Designer preferences with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::schema::SchemaVersion;

const SETTINGS_FILE: &str = "settings.ron";
const APP_NAME: &str = "hft-designer";

/// Preferences of the designer tool itself, separate from the documents it edits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Form version used when none is given on the command line.
    pub default_schema: SchemaVersion,
    /// Log filter (e.g., "debug", "info,hft_config=trace").
    pub log_level: String,
    /// Directory that exported payloads are written into.
    pub export_dir: PathBuf,
    /// Directory for JSON log files in debug builds.
    pub log_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_schema: SchemaVersion::V3,
            log_level: "info".to_string(),
            export_dir: PathBuf::from("."),
            log_dir: None,
        }
    }
}

/// Platform settings directory, e.g. `~/.config/hft-designer` on Linux.
pub fn default_settings_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join(APP_NAME))
}

impl Settings {
    /// Path of the settings file inside `settings_dir`.
    pub fn file_in(settings_dir: &Path) -> PathBuf {
        settings_dir.join(SETTINGS_FILE)
    }

    /// Load settings from the given directory, or create a default settings file.
    ///
    /// Runs before logging is initialized, so the outcome is left for the
    /// caller to report.
    pub fn load_or_create(settings_dir: &Path) -> Result<Self, ConfigError> {
        let path = Self::file_in(settings_dir);

        if path.exists() {
            let contents = std::fs::read_to_string(&path).map_err(ConfigError::ReadError)?;
            ron::from_str(&contents).map_err(ConfigError::SettingsParseError)
        } else {
            let settings = Settings::default();
            settings.save(settings_dir)?;
            Ok(settings)
        }
    }

    /// Save settings to the given directory as `settings.ron`.
    pub fn save(&self, settings_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(settings_dir).map_err(ConfigError::WriteError)?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(2)
            .enumerate_arrays(false);
        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SettingsSerializeError)?;

        std::fs::write(Self::file_in(settings_dir), serialized)
            .map_err(ConfigError::WriteError)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_serialize() {
        let ron_str =
            ron::ser::to_string_pretty(&Settings::default(), ron::ser::PrettyConfig::new())
                .unwrap();
        assert!(ron_str.contains("default_schema: 3"));
        assert!(ron_str.contains("log_level: \"info\""));
    }

    #[test]
    fn test_missing_field_uses_default() {
        let settings: Settings = ron::from_str("(log_level: \"debug\")").unwrap();
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.default_schema, SchemaVersion::V3);
        assert_eq!(settings.export_dir, PathBuf::from("."));
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Settings, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_invalid_schema_rejected() {
        let result: Result<Settings, _> = ron::from_str("(default_schema: 7)");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_or_create_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_or_create(dir.path()).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(dir.path().join(SETTINGS_FILE).exists());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            default_schema: SchemaVersion::V1,
            log_level: "debug".to_string(),
            export_dir: PathBuf::from("exports"),
            log_dir: Some(PathBuf::from("logs")),
        };
        settings.save(dir.path()).unwrap();
        assert_eq!(Settings::load_or_create(dir.path()).unwrap(), settings);
    }

    #[test]
    fn test_corrupt_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), "{{not valid}}").unwrap();
        assert!(matches!(
            Settings::load_or_create(dir.path()),
            Err(ConfigError::SettingsParseError(_))
        ));
    }
}
