//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `irispanel.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::str::FromStr;

use serde::Deserialize;

use irispanel_app::panel::PageMode;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Gate controller device settings.
    pub device: DeviceConfig,
    /// Panel behaviour.
    pub panel: PanelConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Where to find the device.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Base URL of the gate controller (e.g. `http://192.168.1.123`).
    pub url: String,
}

/// Panel behaviour toggles.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Which page variant to drive.
    pub mode: Mode,
    /// Skip confirmation prompts (non-interactive use).
    pub assume_yes: bool,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Page variant, as spelled in config and environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    #[default]
    Home,
    StatusOnly,
}

impl Mode {
    /// Map to the application-layer page mode.
    #[must_use]
    pub fn page_mode(self) -> PageMode {
        match self {
            Self::Home => PageMode::Home,
            Self::StatusOnly => PageMode::StatusOnly,
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "home" => Ok(Self::Home),
            "status-only" => Ok(Self::StatusOnly),
            other => Err(format!("unknown mode: {other}")),
        }
    }
}

impl Config {
    /// Load configuration from `irispanel.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("irispanel.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("IRISPANEL_DEVICE_URL") {
            self.device.url = val;
        }
        if let Ok(val) = std::env::var("IRISPANEL_MODE") {
            if let Ok(mode) = val.parse() {
                self.panel.mode = mode;
            }
        }
        if let Ok(val) = std::env::var("IRISPANEL_ASSUME_YES") {
            self.panel.assume_yes = matches!(val.as_str(), "1" | "true" | "yes");
        }
        if let Ok(val) = std::env::var("IRISPANEL_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.device.url.is_empty() {
            return Err(ConfigError::Validation(
                "device url must not be empty".to_string(),
            ));
        }
        if !self.device.url.starts_with("http") {
            return Err(ConfigError::Validation(format!(
                "device url must be http(s), got {:?}",
                self.device.url
            )));
        }
        Ok(())
    }

    /// Base URL of the device.
    #[must_use]
    pub fn device_url(&self) -> &str {
        &self.device.url
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            // The firmware announces itself over mDNS.
            url: "http://irisgate.local".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "irispanel=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.device.url, "http://irisgate.local");
        assert_eq!(config.panel.mode, Mode::Home);
        assert!(!config.panel.assume_yes);
        assert_eq!(config.logging.filter, "irispanel=info");
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.panel.mode, Mode::Home);
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [device]
            url = 'http://192.168.1.123'

            [panel]
            mode = 'status-only'
            assume_yes = true

            [logging]
            filter = 'debug'
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.device.url, "http://192.168.1.123");
        assert_eq!(config.panel.mode, Mode::StatusOnly);
        assert!(config.panel.assume_yes);
        assert_eq!(config.logging.filter, "debug");
    }

    #[test]
    fn should_parse_partial_toml_with_defaults() {
        let toml = "
            [panel]
            mode = 'status-only'
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.panel.mode, Mode::StatusOnly);
        assert_eq!(config.device.url, "http://irisgate.local");
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.device.url, "http://irisgate.local");
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }

    #[test]
    fn should_reject_empty_device_url() {
        let mut config = Config::default();
        config.device.url = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_non_http_device_url() {
        let mut config = Config::default();
        config.device.url = "ftp://device".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_accept_default_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn should_parse_mode_from_str() {
        assert_eq!("home".parse::<Mode>().unwrap(), Mode::Home);
        assert_eq!("status-only".parse::<Mode>().unwrap(), Mode::StatusOnly);
        assert!("garden".parse::<Mode>().is_err());
    }

    #[test]
    fn should_map_modes_to_page_modes() {
        assert_eq!(Mode::Home.page_mode(), PageMode::Home);
        assert_eq!(Mode::StatusOnly.page_mode(), PageMode::StatusOnly);
    }
}
