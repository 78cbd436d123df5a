use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::ConfigError;

pub const DEFAULT_LOG_FILTER: &str = "osk_manager=info";
pub const DEFAULT_EXPORT_FORMAT: &str = "txt";
const EXPORT_FORMATS: [&str; 2] = ["txt", "doc"];

/// Per-user preferences of the CLI. Domain state lives elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Directory holding `oskMenagerData.json`. Defaults to `<home>/data`.
    pub data_dir: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    /// Where reports and backups are written. Defaults to `~/Documents/OSK`.
    pub export_dir: Option<PathBuf>,

    #[serde(default = "Config::default_export_format_value")]
    pub default_export_format: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,

    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            export_dir: None,
            default_export_format: Self::default_export_format_value(),
            log_filter: None,
            ui_color_enabled: Self::default_ui_color_enabled(),
        }
    }
}

impl Config {
    pub const KEYS: [&'static str; 5] = [
        "data_dir",
        "export_dir",
        "default_export_format",
        "log_filter",
        "ui_color_enabled",
    ];

    pub fn default_export_format_value() -> String {
        DEFAULT_EXPORT_FORMAT.into()
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn resolve_data_dir(&self, home: &Path) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| home.join("data"))
    }

    pub fn resolve_export_dir(&self) -> PathBuf {
        if let Some(path) = &self.export_dir {
            return path.clone();
        }

        let base = dirs::document_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        base.join("OSK")
    }

    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }

    /// Current value of `key` rendered for display.
    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        let value = match key {
            "data_dir" => display_path(self.data_dir.as_deref()),
            "export_dir" => display_path(self.export_dir.as_deref()),
            "default_export_format" => self.default_export_format.clone(),
            "log_filter" => self.log_filter().to_string(),
            "ui_color_enabled" => self.ui_color_enabled.to_string(),
            other => return Err(ConfigError::UnknownKey(other.into())),
        };
        Ok(value)
    }

    /// Parses and assigns `value`; `default` or an empty value resets optional keys.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let trimmed = value.trim();
        let reset = trimmed.is_empty() || trimmed.eq_ignore_ascii_case("default");
        let invalid = || ConfigError::InvalidValue {
            key: key.into(),
            value: value.into(),
        };
        match key {
            "data_dir" => self.data_dir = (!reset).then(|| PathBuf::from(trimmed)),
            "export_dir" => self.export_dir = (!reset).then(|| PathBuf::from(trimmed)),
            "default_export_format" => {
                let format = trimmed.to_ascii_lowercase();
                if reset {
                    self.default_export_format = Self::default_export_format_value();
                } else if EXPORT_FORMATS.contains(&format.as_str()) {
                    self.default_export_format = format;
                } else {
                    return Err(invalid());
                }
            }
            "log_filter" => self.log_filter = (!reset).then(|| trimmed.to_string()),
            "ui_color_enabled" => {
                self.ui_color_enabled = match trimmed.to_ascii_lowercase().as_str() {
                    "true" | "on" | "yes" | "1" => true,
                    "false" | "off" | "no" | "0" => false,
                    _ => return Err(invalid()),
                }
            }
            other => return Err(ConfigError::UnknownKey(other.into())),
        }
        Ok(())
    }
}

fn display_path(path: Option<&Path>) -> String {
    path.map(|p| p.display().to_string())
        .unwrap_or_else(|| "(default)".into())
}
