//! TOML-based application configuration.
//!
//! Stored at `~/.config/zerohour/config.toml`. Holds the undo grace
//! window, the refresh interval, and date rendering preferences.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::ConfigError;

/// UI preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    /// strftime format used when rendering target and ended dates.
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Seconds between a delete request and permanent removal, during
    /// which undo is possible.
    #[serde(default = "default_grace_secs")]
    pub grace_secs: u64,
    /// Refresh interval for the watch loop, in seconds.
    #[serde(default = "default_tick_secs")]
    pub tick_secs: u64,
    #[serde(default)]
    pub ui: UiConfig,
}

fn default_grace_secs() -> u64 {
    5
}
fn default_tick_secs() -> u64 {
    1
}
fn default_date_format() -> String {
    // "May 1, 2030" -- the original's locale-formatted date
    "%B %-d, %Y".into()
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            date_format: default_date_format(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grace_secs: default_grace_secs(),
            tick_secs: default_tick_secs(),
            ui: UiConfig::default(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        data_dir()
            .map(|dir| dir.join("config.toml"))
            .map_err(|e| ConfigError::LoadFailed {
                path: PathBuf::from("config.toml"),
                message: e.to_string(),
            })
    }

    /// Load from disk, writing the defaults out on first run.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be parsed, or
    /// if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Load from disk, returning defaults on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Persist to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Get a value as a string by key.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "grace_secs" => Some(self.grace_secs.to_string()),
            "tick_secs" => Some(self.tick_secs.to_string()),
            "ui.date_format" => Some(self.ui.date_format.clone()),
            _ => None,
        }
    }

    /// Set a value by key. Does not save; callers persist explicitly.
    ///
    /// # Errors
    /// Returns an error if the key is unknown or the value cannot be
    /// parsed for it.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "grace_secs" => {
                self.grace_secs = parse_u64(key, value)?;
            }
            "tick_secs" => {
                self.tick_secs = parse_u64(key, value)?;
            }
            "ui.date_format" => {
                self.ui.date_format = value.to_string();
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("'{value}' is not a non-negative integer"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let parsed: Config = toml::from_str("grace_secs = 10").unwrap();
        assert_eq!(parsed.grace_secs, 10);
        assert_eq!(parsed.tick_secs, 1);
        assert_eq!(parsed.ui.date_format, "%B %-d, %Y");
    }

    #[test]
    fn get_and_set_cover_the_known_keys() {
        let mut cfg = Config::default();
        assert_eq!(cfg.get("grace_secs").as_deref(), Some("5"));
        assert_eq!(cfg.get("tick_secs").as_deref(), Some("1"));
        assert!(cfg.get("ui.date_format").is_some());
        assert!(cfg.get("nope").is_none());

        cfg.set("grace_secs", "8").unwrap();
        assert_eq!(cfg.grace_secs, 8);
        cfg.set("ui.date_format", "%Y-%m-%d").unwrap();
        assert_eq!(cfg.ui.date_format, "%Y-%m-%d");
    }

    #[test]
    fn set_rejects_unknown_key_and_bad_value() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("nope", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            cfg.set("grace_secs", "soon"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
