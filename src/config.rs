//! Application-level configuration loading: progress file location and the
//! resubmission penalty window.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::state::timer::DEFAULT_PENALTY_SECONDS;

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "PUZZLE_HUNT_BACK_CONFIG_PATH";
/// Default location of the progress document written by the file store.
const DEFAULT_DATA_PATH: &str = "data/progress.json";

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    data_path: PathBuf,
    penalty_seconds: u32,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to the
    /// baked-in defaults when the file is missing or unreadable.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        data_path = %config.data_path.display(),
                        penalty_seconds = config.penalty_seconds,
                        "loaded configuration"
                    );
                    config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Location of the progress document written by the file store.
    pub fn data_path(&self) -> &PathBuf {
        &self.data_path
    }

    /// Penalty window after a wrong guess, in seconds.
    pub fn penalty_seconds(&self) -> u32 {
        self.penalty_seconds
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            penalty_seconds: DEFAULT_PENALTY_SECONDS,
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    #[serde(default)]
    data_path: Option<PathBuf>,
    #[serde(default)]
    penalty_seconds: Option<u32>,
}

impl From<RawConfig> for AppConfig {
    fn from(raw: RawConfig) -> Self {
        let defaults = AppConfig::default();
        let penalty_seconds = match raw.penalty_seconds {
            // A zero-length penalty would never gate anything; refuse it.
            Some(0) => {
                warn!("penalty_seconds must be positive; using the default");
                defaults.penalty_seconds
            }
            Some(seconds) => seconds,
            None => defaults.penalty_seconds,
        };
        Self {
            data_path: raw.data_path.unwrap_or(defaults.data_path),
            penalty_seconds,
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_config_fills_missing_fields_with_defaults() {
        let raw: RawConfig = serde_json::from_str("{}").unwrap();
        let config: AppConfig = raw.into();
        assert_eq!(config.data_path(), &PathBuf::from(DEFAULT_DATA_PATH));
        assert_eq!(config.penalty_seconds(), DEFAULT_PENALTY_SECONDS);
    }

    #[test]
    fn raw_config_rejects_zero_penalty() {
        let raw: RawConfig = serde_json::from_str(r#"{"penalty_seconds": 0}"#).unwrap();
        let config: AppConfig = raw.into();
        assert_eq!(config.penalty_seconds(), DEFAULT_PENALTY_SECONDS);
    }

    #[test]
    fn raw_config_honors_overrides() {
        let raw: RawConfig =
            serde_json::from_str(r#"{"data_path": "/tmp/hunt.json", "penalty_seconds": 90}"#)
                .unwrap();
        let config: AppConfig = raw.into();
        assert_eq!(config.data_path(), &PathBuf::from("/tmp/hunt.json"));
        assert_eq!(config.penalty_seconds(), 90);
    }
}
