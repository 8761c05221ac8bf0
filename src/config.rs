//! Client configuration
//!
//! Defines how the client reaches the judge service:
//! - Base URL and the problem submitted to by default
//! - Poll cadence and optional poll deadline
//! - Per-request timeout and the tunnel-host header quirk

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;
use crate::poller::PollOptions;

/// Judge service the client talks to when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "https://diphycercal-aurore-introrsely.ngrok-free.dev";

/// Problem submitted to when none is given
pub const DEFAULT_PROBLEM_ID: &str = "ahc001";

/// Complete client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JudgeConfig {
    /// Judge service base URL
    pub base_url: String,
    /// Problem id sent as `pid`
    pub problem_id: String,
    /// Delay between result polls
    pub poll_interval_ms: u64,
    /// Timeout for each individual HTTP request
    pub request_timeout_secs: u64,
    /// Give up polling after this long; unbounded when unset
    pub poll_deadline_secs: Option<u64>,
    /// Send `ngrok-skip-browser-warning: true` on every request
    pub skip_browser_warning: bool,
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            problem_id: DEFAULT_PROBLEM_ID.to_string(),
            poll_interval_ms: 1000,
            request_timeout_secs: 30,
            poll_deadline_secs: None,
            skip_browser_warning: true,
        }
    }
}

impl JudgeConfig {
    /// Parse a TOML document; absent keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: JudgeConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Load from `path` if given, defaults otherwise
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| ConfigError::Invalid(format!("base_url '{}': {}", self.base_url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(format!(
                "base_url must be http or https, got '{}'",
                url.scheme()
            )));
        }
        if self.problem_id.trim().is_empty() {
            return Err(ConfigError::Invalid("problem_id must not be empty".into()));
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid("poll_interval_ms must be > 0".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be > 0".into(),
            ));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn poll_deadline(&self) -> Option<Duration> {
        self.poll_deadline_secs.map(Duration::from_secs)
    }

    pub fn poll_options(&self) -> PollOptions {
        PollOptions {
            interval: self.poll_interval(),
            deadline: self.poll_deadline(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = JudgeConfig::default();
        assert_eq!(config.problem_id, "ahc001");
        assert_eq!(config.poll_interval(), Duration::from_millis(1000));
        assert!(config.poll_deadline().is_none());
        assert!(config.skip_browser_warning);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = JudgeConfig::from_toml_str(
            r#"
            base_url = "http://localhost:8000"
            poll_deadline_secs = 120
            "#,
        )
        .unwrap();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.poll_deadline(), Some(Duration::from_secs(120)));
        assert_eq!(config.problem_id, DEFAULT_PROBLEM_ID);
        assert_eq!(config.poll_interval_ms, 1000);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(JudgeConfig::from_toml_str(r#"base_url = "not a url""#).is_err());
        assert!(JudgeConfig::from_toml_str(r#"base_url = "ftp://judge""#).is_err());
        assert!(JudgeConfig::from_toml_str("poll_interval_ms = 0").is_err());
        assert!(JudgeConfig::from_toml_str("request_timeout_secs = 0").is_err());
        assert!(JudgeConfig::from_toml_str(r#"problem_id = " ""#).is_err());
        assert!(matches!(
            JudgeConfig::from_toml_str("poll_interval_ms = \"fast\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "problem_id = \"ahc002\"").unwrap();
        writeln!(file, "skip_browser_warning = false").unwrap();

        let config = JudgeConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.problem_id, "ahc002");
        assert!(!config.skip_browser_warning);

        assert_eq!(JudgeConfig::load(None).unwrap(), JudgeConfig::default());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = JudgeConfig::from_file(Path::new("/nonexistent/judge.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
