//! Configuration loading
//!
//! Settings come from an optional TOML file. Lookup order: explicit path
//! (`--config`), then the `PAYOUT_CONFIG` environment variable, then
//! `<config_home>/payout/config.toml`. Only the last one may be absent, in
//! which case the defaults apply.
//!
//! ```toml
//! [scrape]
//! url = "https://smart-lab.ru/dividends/"
//! timeout_secs = 30      # 0 disables the timeout
//! user_agent = "payout/0.1"
//! strict_markup = false
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::ConfigError;
use crate::scraping::DIVIDENDS_URL;

const CONFIG_ENV_VAR: &str = "PAYOUT_CONFIG";
const CONFIG_FILENAME: &str = "config.toml";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub scrape: ScrapeConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScrapeConfig {
    pub url: String,
    pub timeout_secs: u64,
    pub user_agent: Option<String>,
    pub strict_markup: bool,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            url: DIVIDENDS_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
            strict_markup: false,
        }
    }
}

impl ScrapeConfig {
    pub fn timeout(&self) -> Option<Duration> {
        match self.timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

impl Config {
    /// Resolve and load the configuration file, see the module docs for
    /// the lookup order.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return Self::from_file(Path::new(&path));
        }
        match default_config_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dir_spec::config_home().map(|dir| dir.join("payout").join(CONFIG_FILENAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.scrape.url, "https://smart-lab.ru/dividends/");
        assert_eq!(config.scrape.timeout(), Some(Duration::from_secs(30)));
        assert!(config.scrape.user_agent.is_none());
        assert!(!config.scrape.strict_markup);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::from_toml("[scrape]\nstrict_markup = true\ntimeout_secs = 0\n").unwrap();
        assert!(config.scrape.strict_markup);
        assert_eq!(config.scrape.timeout(), None);
        assert_eq!(config.scrape.url, DIVIDENDS_URL);
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(Config::from_toml("[scrape]\nretries = 3\n").is_err());
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[scrape]\nurl = \"http://localhost:8080/dividends/\"\nuser_agent = \"payout-test\"\n",
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.scrape.url, "http://localhost:8080/dividends/");
        assert_eq!(config.scrape.user_agent.as_deref(), Some("payout-test"));
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let dir = TempDir::new().unwrap();
        let result = Config::load(Some(&dir.path().join("missing.toml")));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[scrape\n").unwrap();

        let err = Config::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("config.toml"));
    }
}
