//! Configuration file handling.
//!
//! Settings come from three layers, later ones winning: built-in defaults,
//! `church-portal.toml` (or `--config FILE`), then command-line flags.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "church-portal.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Content API connection.
    #[serde(default)]
    pub api: ApiConfig,

    /// Terminal UI behaviour.
    #[serde(default)]
    pub ui: UiConfig,

    /// Log output.
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every endpoint is resolved against.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

fn default_timeout() -> u64 {
    15
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Event-loop tick (redraw + input poll) in milliseconds.
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,

    /// Seconds each carousel slide stays on screen.
    #[serde(default = "default_carousel_interval")]
    pub carousel_interval_seconds: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            carousel_interval_seconds: default_carousel_interval(),
        }
    }
}

fn default_tick_rate() -> u64 {
    100
}

fn default_carousel_interval() -> u64 {
    7
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// File that receives log output; the TUI owns stdout.
    #[serde(default = "default_log_file")]
    pub file: PathBuf,

    /// Default level when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: default_log_file(),
            level: default_log_level(),
        }
    }
}

fn default_log_file() -> PathBuf {
    PathBuf::from("church-portal.log")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from `dir/church-portal.toml`.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let path = dir.join(DEFAULT_CONFIG_FILE);

        if path.exists() {
            Ok(Some(Self::load(&path)?))
        } else {
            Ok(None)
        }
    }

    /// Resolve the configuration for this run: an explicit `--config` must
    /// exist, otherwise the working-directory file is optional.
    pub fn resolve(args: &crate::cli::Args) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::load_from_dir(Path::new("."))?.unwrap_or_default(),
        };
        config.merge_with_args(args);
        Ok(config)
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// Only flags the user actually passed override the file.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(url) = &args.api_url {
            self.api.base_url = url.clone();
        }
        if let Some(timeout) = args.timeout {
            self.api.timeout_seconds = timeout;
        }
        if args.verbose {
            self.log.level = args.log_level().as_str().to_ascii_lowercase();
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_seconds.max(1))
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.ui.tick_rate_ms.max(10))
    }

    pub fn carousel_interval(&self) -> Duration {
        Duration::from_secs(self.ui.carousel_interval_seconds.max(1))
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:8000/api");
        assert_eq!(config.carousel_interval(), Duration::from_secs(7));
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_parse_partial_config() {
        let toml_content = r#"
[api]
base_url = "https://gereja.example/api"

[ui]
carousel_interval_seconds = 10
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.api.base_url, "https://gereja.example/api");
        assert_eq!(config.api.timeout_seconds, 15, "unset keys keep defaults");
        assert_eq!(config.ui.carousel_interval_seconds, 10);
        assert_eq!(config.ui.tick_rate_ms, 100);
    }

    #[test]
    fn test_default_toml_round_trips() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[api]"));
        assert!(toml_str.contains("[ui]"));
        assert!(toml_str.contains("[log]"));
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn cli_flags_override_file() {
        let mut config = Config::default();
        let args = crate::cli::Args::try_parse_from([
            "church-portal",
            "--api-url",
            "https://override.example/api",
            "--timeout",
            "3",
            "-v",
        ])
        .unwrap();

        config.merge_with_args(&args);
        assert_eq!(config.api.base_url, "https://override.example/api");
        assert_eq!(config.request_timeout(), Duration::from_secs(3));
        assert_eq!(config.log.level, "debug");
    }

    #[test]
    fn load_from_dir_is_optional_but_strict() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load_from_dir(dir.path()).unwrap().is_none());

        std::fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "[api]\ntimeout_seconds = 30\n")
            .unwrap();
        let config = Config::load_from_dir(dir.path()).unwrap().unwrap();
        assert_eq!(config.api.timeout_seconds, 30);

        std::fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "[api\n").unwrap();
        assert!(Config::load_from_dir(dir.path()).is_err());
    }
}
