/// Application configuration
///
/// Read from a TOML file in the user's config directory:
/// - Linux: ~/.config/place-reporter/config.toml
/// - macOS: ~/Library/Application Support/place-reporter/config.toml
/// - Windows: %APPDATA%\place-reporter\config.toml
///
/// Every key is optional. A missing or broken file falls back to defaults.

use reqwest::Url;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::services::CaptureOptions;

/// Overrides the config file location
pub const CONFIG_PATH_ENV: &str = "PLACE_REPORTER_CONFIG";
/// Overrides `api.base_url`
pub const API_URL_ENV: &str = "PLACE_REPORTER_API_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid URL {0:?}: must be an http or https address")]
    InvalidUrl(String),
    #[error("camera quality {0} is outside (0, 1]")]
    InvalidQuality(f32),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub location: LocationConfig,
    pub camera: CameraConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Address of the records API, without the `/api/places` suffix
    pub base_url: String,
    /// Whole-request timeout in seconds; unset waits for the server indefinitely
    pub timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            timeout_secs: None,
        }
    }
}

/// Where position fixes come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationMode {
    /// One-shot HTTP lookup (IP geolocation)
    Lookup,
    /// Always the configured coordinates
    Fixed,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    /// `false` answers every permission request with "denied"
    pub enabled: bool,
    pub mode: LocationMode,
    pub lookup_url: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            mode: LocationMode::Lookup,
            lookup_url: "http://ip-api.com/json".to_string(),
            latitude: 0.0,
            longitude: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// `false` answers every permission request with "denied"
    pub enabled: bool,
    pub allow_editing: bool,
    pub quality: f32,
    pub base64: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        let options = CaptureOptions::default();
        Self {
            enabled: true,
            allow_editing: options.allow_editing,
            quality: options.quality,
            base64: options.want_base64,
        }
    }
}

impl CameraConfig {
    pub fn capture_options(&self) -> CaptureOptions {
        CaptureOptions {
            allow_editing: self.allow_editing,
            quality: self.quality,
            want_base64: self.base64,
        }
    }
}

impl Config {
    /// Parse a config file
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&source)
    }

    /// Apply an explicit API address over whatever the file said
    pub fn apply_overrides(&mut self, api_url: Option<String>) {
        if let Some(url) = api_url.filter(|url| !url.trim().is_empty()) {
            self.api.base_url = url;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_http_url(&self.api.base_url)?;
        if self.location.enabled && self.location.mode == LocationMode::Lookup {
            check_http_url(&self.location.lookup_url)?;
        }
        if !(self.camera.quality > 0.0 && self.camera.quality <= 1.0) {
            return Err(ConfigError::InvalidQuality(self.camera.quality));
        }
        Ok(())
    }
}

fn check_http_url(url: &str) -> Result<(), ConfigError> {
    match Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        _ => Err(ConfigError::InvalidUrl(url.to_string())),
    }
}

/// Get the path where the config file should live
fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        return Some(PathBuf::from(path));
    }

    let mut path = dirs::config_dir()?;
    path.push("place-reporter");
    path.push("config.toml");
    Some(path)
}

/// Load the configuration for this run
///
/// Never fails: problems are logged and the defaults used instead.
pub fn load() -> Config {
    let mut config = match config_path() {
        Some(path) if path.exists() => match Config::load_from(&path) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config");
                config
            }
            Err(err) => {
                tracing::warn!(error = %err, "ignoring config file, using defaults");
                Config::default()
            }
        },
        _ => Config::default(),
    };

    config.apply_overrides(std::env::var(API_URL_ENV).ok());
    if let Err(err) = config.validate() {
        tracing::warn!(error = %err, "invalid {} override, using defaults", API_URL_ENV);
        config.api = ApiConfig::default();
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config = Config::from_toml(
            r#"
            [api]
            base_url = "http://192.168.1.20:3000"

            [camera]
            quality = 0.8
            base64 = false
            "#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "http://192.168.1.20:3000");
        assert_eq!(config.api.timeout_secs, None);
        assert_eq!(config.location, LocationConfig::default());

        let options = config.camera.capture_options();
        assert_eq!(options.quality, 0.8);
        assert!(!options.want_base64);
        assert!(options.allow_editing);
    }

    #[test]
    fn test_fixed_location() {
        let config = Config::from_toml(
            r#"
            [location]
            mode = "fixed"
            latitude = 40.712
            longitude = -74.006
            lookup_url = "unused"
            "#,
        )
        .unwrap();
        assert_eq!(config.location.mode, LocationMode::Fixed);
        assert_eq!(config.location.latitude, 40.712);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            Config::from_toml("[api]\nbase_url = \"ftp://host\""),
            Err(ConfigError::InvalidUrl(_))
        ));
        assert!(matches!(
            Config::from_toml("[camera]\nquality = 0.0"),
            Err(ConfigError::InvalidQuality(_))
        ));
        assert!(matches!(
            Config::from_toml("[camera]\nquality = 1.5"),
            Err(ConfigError::InvalidQuality(_))
        ));
        assert!(matches!(Config::from_toml("[api\n"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_api_url_override() {
        let mut config = Config::default();
        config.apply_overrides(Some("https://places.example.com".to_string()));
        assert_eq!(config.api.base_url, "https://places.example.com");

        config.apply_overrides(Some("  ".to_string()));
        config.apply_overrides(None);
        assert_eq!(config.api.base_url, "https://places.example.com");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api]\ntimeout_secs = 5").unwrap();
        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.api.timeout_secs, Some(5));

        let missing = Config::load_from(Path::new("/nonexistent/place-reporter.toml"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }
}
