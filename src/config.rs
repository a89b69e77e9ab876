/// Service configuration.
///
/// Settings merge in three layers, later layers winning:
///   1. built-in defaults,
///   2. an optional `tempmon.toml` file,
///   3. environment variables (`.env` is honored via dotenv).
///
/// The API credential is intentionally optional at load time: the dataset
/// analysis path never needs it, and the live-reading path reports a
/// missing key as an input error only when a fetch is actually attempted.

use std::path::Path;

use serde::Deserialize;

use crate::model::TempError;

/// Default OpenWeatherMap API root.
pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Environment variable holding the API credential.
pub const API_KEY_ENV: &str = "OWM_API_KEY";

/// Resolved service configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// OpenWeatherMap API key, if configured.
    pub api_key: Option<String>,
    /// Weather API root, overridable for testing against a local server.
    pub base_url: String,
    /// Worker count for parallel per-city analysis. `None` means available
    /// parallelism.
    pub workers: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            workers: None,
        }
    }
}

/// File-level settings, all optional.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    api_key: Option<String>,
    base_url: Option<String>,
    workers: Option<usize>,
}

impl Config {
    /// Load configuration: defaults, then `tempmon.toml` in the working
    /// directory if present, then environment.
    pub fn load() -> Result<Config, TempError> {
        Config::load_from(Path::new("tempmon.toml"))
    }

    /// Same as `load`, with an explicit file path for tests.
    pub fn load_from(path: &Path) -> Result<Config, TempError> {
        dotenv::dotenv().ok();

        let mut config = Config::default();

        if path.exists() {
            let text = std::fs::read_to_string(path).map_err(|e| {
                TempError::Input(format!("reading {}: {}", path.display(), e))
            })?;
            let file: FileConfig = toml::from_str(&text).map_err(|e| {
                TempError::Input(format!("parsing {}: {}", path.display(), e))
            })?;
            if let Some(key) = file.api_key {
                config.api_key = Some(key);
            }
            if let Some(base) = file.base_url {
                config.base_url = base;
            }
            if let Some(workers) = file.workers {
                config.workers = Some(workers);
            }
        }

        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                config.api_key = Some(key.trim().to_string());
            }
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_key, None);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.workers, None);
    }

    #[test]
    fn test_file_settings_override_defaults() {
        let file: FileConfig =
            toml::from_str("base_url = \"http://localhost:9001\"\nworkers = 4\n").unwrap();
        assert_eq!(file.base_url.as_deref(), Some("http://localhost:9001"));
        assert_eq!(file.workers, Some(4));
        assert_eq!(file.api_key, None);
    }

    #[test]
    fn test_malformed_file_is_an_input_error() {
        let result: Result<FileConfig, _> = toml::from_str("workers = \"many\"");
        assert!(result.is_err());
    }
}
