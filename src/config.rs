//! Application configuration
//!
//! A small toml file controls loop timing, sampling intervals and the
//! demo totals. Missing file or missing keys fall back to defaults that
//! match the original demo constants.

use std::fs;
use std::path::Path;
use std::time::Duration;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TaskmonError};

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "taskmon.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub demo: DemoConfig,
}

/// Loop timing and sampling cadence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneralConfig {
    /// Base tick of the render loop, milliseconds.
    pub tick_ms: u64,
    /// Minimum interval between system metric samples, seconds.
    pub perf_interval_secs: f64,
    /// Minimum interval between per-app history samples, seconds.
    pub app_history_interval_secs: f64,
}

/// Fixed totals for the simulated machine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DemoConfig {
    /// Physical memory of the simulated machine, MB.
    pub memory_total_mb: u64,
    /// Disk capacity of the simulated machine, MB.
    pub disk_total_mb: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            tick_ms: 100,
            perf_interval_secs: 1.0,
            app_history_interval_secs: 2.0,
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            memory_total_mb: 16 * 1024,
            disk_total_mb: 500 * 1024,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            demo: DemoConfig::default(),
        }
    }
}

impl Config {
    /// Load from the default location, falling back to defaults when the
    /// file does not exist or fails to parse.
    pub fn load() -> Self {
        match Self::load_from(CONFIG_FILE) {
            Ok(config) => config,
            Err(TaskmonError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Config::default()
            }
            Err(e) => {
                warn!("could not load {}: {}; using defaults", CONFIG_FILE, e);
                Config::default()
            }
        }
    }

    /// Load and parse a specific config file.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        toml::from_str(&text).map_err(|e| TaskmonError::Configuration(e.to_string()))
    }

    /// Write the configuration to `path`.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let text =
            toml::to_string_pretty(self).map_err(|e| TaskmonError::Configuration(e.to_string()))?;
        fs::write(path, text)?;
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.general.tick_ms)
    }

    pub fn perf_interval(&self) -> Duration {
        Duration::from_secs_f64(self.general.perf_interval_secs)
    }

    pub fn app_history_interval(&self) -> Duration {
        Duration::from_secs_f64(self.general.app_history_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_demo_constants() {
        let config = Config::default();
        assert_eq!(config.general.tick_ms, 100);
        assert_eq!(config.perf_interval(), Duration::from_secs(1));
        assert_eq!(config.app_history_interval(), Duration::from_secs(2));
        assert_eq!(config.demo.memory_total_mb, 16384);
        assert_eq!(config.demo.disk_total_mb, 512_000);
    }

    #[test]
    fn test_parse_partial_file_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [general]
            perf_interval_secs = 0.5
            "#,
        )
        .unwrap();
        assert_eq!(config.general.perf_interval_secs, 0.5);
        assert_eq!(config.general.tick_ms, 100);
        assert_eq!(config.demo.memory_total_mb, 16384);
    }

    #[test]
    fn test_round_trip() {
        let config = Config {
            general: GeneralConfig {
                tick_ms: 50,
                perf_interval_secs: 2.0,
                app_history_interval_secs: 4.0,
            },
            demo: DemoConfig {
                memory_total_mb: 8192,
                disk_total_mb: 256_000,
            },
        };
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_invalid_toml_is_configuration_error() {
        let err = toml::from_str::<Config>("general = 5").unwrap_err();
        assert!(!err.to_string().is_empty());
    }
}
