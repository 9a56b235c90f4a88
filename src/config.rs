use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_SUCCESS_CLEAR_MS: u64 = 5_000;
pub const DEFAULT_INFO_CLEAR_MS: u64 = 5_000;

const BASE_URL_ENV: &str = "USERBOARD_BASE_URL";

#[derive(Deserialize, Serialize, Default, Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: Option<String>,
    pub timeout_ms: Option<u64>,
    pub success_clear_ms: Option<u64>,
    pub info_clear_ms: Option<u64>,
    #[serde(skip)]
    base_url_flag: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let contents =
            std::fs::read_to_string(&config_path).map_err(|e| AppError::ConfigRead {
                path: config_path.clone(),
                source: e,
            })?;

        Self::parse(&contents).map_err(|e| AppError::ConfigParse {
            path: config_path,
            source: e,
        })
    }

    pub fn parse(contents: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn config_path() -> Result<PathBuf> {
        ProjectDirs::from("", "", "userboard")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .ok_or(AppError::NoConfigDir)
    }

    /// Apply command-line overrides on top of the file values.
    pub fn with_overrides(mut self, base_url: Option<String>, timeout_ms: Option<u64>) -> Self {
        if base_url.is_some() {
            self.base_url_flag = base_url;
        }
        if timeout_ms.is_some() {
            self.timeout_ms = timeout_ms;
        }
        self
    }

    /// Base URL: `--base-url`, then the env var, then the config file.
    pub fn base_url(&self) -> String {
        let env = std::env::var(BASE_URL_ENV).ok();
        self.resolve_base_url(env)
    }

    fn resolve_base_url(&self, env: Option<String>) -> String {
        let raw = self
            .base_url_flag
            .clone()
            .or(env)
            .or_else(|| self.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        raw.trim_end_matches('/').to_string()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS))
    }

    pub fn success_clear(&self) -> Duration {
        Duration::from_millis(self.success_clear_ms.unwrap_or(DEFAULT_SUCCESS_CLEAR_MS))
    }

    pub fn info_clear(&self) -> Duration {
        Duration::from_millis(self.info_clear_ms.unwrap_or(DEFAULT_INFO_CLEAR_MS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_file_is_empty() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.resolve_base_url(None), DEFAULT_BASE_URL);
        assert_eq!(config.timeout(), Duration::from_millis(10_000));
        assert_eq!(config.success_clear(), Duration::from_millis(5_000));
        assert_eq!(config.info_clear(), Duration::from_millis(5_000));
    }

    #[test]
    fn parses_all_keys() {
        let config = Config::parse(
            r#"
base_url = "http://10.0.2.252:5000/"
timeout_ms = 3000
success_clear_ms = 8000
info_clear_ms = 6000
"#,
        )
        .unwrap();
        assert_eq!(config.resolve_base_url(None), "http://10.0.2.252:5000");
        assert_eq!(config.timeout(), Duration::from_millis(3000));
        assert_eq!(config.success_clear(), Duration::from_millis(8000));
        assert_eq!(config.info_clear(), Duration::from_millis(6000));
    }

    #[test]
    fn rejects_wrong_types() {
        assert!(Config::parse("timeout_ms = \"soon\"").is_err());
    }

    #[test]
    fn base_url_precedence_is_flag_env_file() {
        let file = Config {
            base_url: Some("http://file:3".into()),
            ..Config::default()
        };
        assert_eq!(file.resolve_base_url(None), "http://file:3");
        assert_eq!(
            file.resolve_base_url(Some("http://env:1".into())),
            "http://env:1"
        );

        let explicit = Config::default().with_overrides(Some("http://flag:2".into()), None);
        assert_eq!(
            explicit.resolve_base_url(Some("http://env:1".into())),
            "http://flag:2"
        );
    }

    #[test]
    fn overrides_leave_unset_values_alone() {
        let config = Config {
            timeout_ms: Some(1234),
            ..Config::default()
        }
        .with_overrides(None, None);
        assert_eq!(config.timeout_ms, Some(1234));
    }
}
