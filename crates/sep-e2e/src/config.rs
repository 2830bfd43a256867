//! Run configuration.
//!
//! Precedence, lowest first: defaults, a YAML file, environment variables.
//! The CLI applies its own flags on top.

use crate::cdp::BrowserConfig;
use crate::result::{E2eError, E2eResult};
use crate::wait::{WaitOptions, DEFAULT_POLL_INTERVAL_MS, DEFAULT_WAIT_TIMEOUT_MS};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Sandbox base URL override
pub const ENV_BASE_URL: &str = "SEP_E2E_BASE_URL";
/// Wait timeout override in milliseconds
pub const ENV_TIMEOUT_MS: &str = "SEP_E2E_TIMEOUT_MS";
/// Poll interval override in milliseconds
pub const ENV_POLL_MS: &str = "SEP_E2E_POLL_MS";
/// Headless flag override (`true`/`false`/`1`/`0`)
pub const ENV_HEADLESS: &str = "SEP_E2E_HEADLESS";
/// Chromium executable override
pub const ENV_CHROMIUM_PATH: &str = "CHROMIUM_PATH";

/// Default sandbox base URL
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Effective configuration of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct E2eConfig {
    /// Base URL the sandbox routes are appended to
    pub base_url: String,
    /// Default wait timeout
    pub timeout_ms: u64,
    /// Poll interval of waits
    pub poll_ms: u64,
    /// Browser launch settings
    pub browser: BrowserConfig,
}

impl Default for E2eConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_ms: DEFAULT_POLL_INTERVAL_MS,
            browser: BrowserConfig::default(),
        }
    }
}

impl E2eConfig {
    /// Parse a YAML document; missing keys keep their defaults
    pub fn from_yaml(yaml: &str) -> E2eResult<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> E2eResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading config");
        Self::from_yaml(&std::fs::read_to_string(path)?)
    }

    /// Defaults, then `path` if given, then the process environment
    pub fn load(path: Option<&Path>) -> E2eResult<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.with_env(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an environment lookup
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> E2eResult<Self> {
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(ms) = lookup(ENV_TIMEOUT_MS) {
            self.timeout_ms = parse_ms(ENV_TIMEOUT_MS, &ms)?;
        }
        if let Some(ms) = lookup(ENV_POLL_MS) {
            self.poll_ms = parse_ms(ENV_POLL_MS, &ms)?;
        }
        if let Some(flag) = lookup(ENV_HEADLESS) {
            self.browser.headless = parse_flag(ENV_HEADLESS, &flag)?;
        }
        if let Some(path) = lookup(ENV_CHROMIUM_PATH) {
            self.browser.chromium_path = Some(path);
        }
        self.validate()?;
        Ok(self)
    }

    /// Reject values no run can work with
    pub fn validate(&self) -> E2eResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(E2eError::config("base_url must not be empty"));
        }
        if self.poll_ms == 0 {
            return Err(E2eError::config("poll_ms must be positive"));
        }
        if self.poll_ms > self.timeout_ms {
            return Err(E2eError::config(format!(
                "poll_ms ({}) exceeds timeout_ms ({})",
                self.poll_ms, self.timeout_ms
            )));
        }
        Ok(())
    }

    /// Wait options for the session
    #[must_use]
    pub fn wait_options(&self) -> WaitOptions {
        WaitOptions::new()
            .with_timeout(self.timeout_ms)
            .with_poll_interval(self.poll_ms)
    }

    /// Pretty YAML, as printed by `sep-e2e config`
    pub fn to_yaml(&self) -> E2eResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }
}

fn parse_ms(key: &str, value: &str) -> E2eResult<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| E2eError::config(format!("{key}: '{value}' is not a number of milliseconds")))
}

fn parse_flag(key: &str, value: &str) -> E2eResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(E2eError::config(format!("{key}: '{value}' is not a boolean"))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    mod file_tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let config = E2eConfig::default();
            assert_eq!(config.base_url, DEFAULT_BASE_URL);
            assert_eq!(config.timeout_ms, 10_000);
            assert!(config.browser.headless);
        }

        #[test]
        fn test_load_partial_file() {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            writeln!(file, "base_url: http://sandbox:8080\nbrowser:\n  headless: false").unwrap();
            let config = E2eConfig::from_file(file.path()).unwrap();
            assert_eq!(config.base_url, "http://sandbox:8080");
            assert!(!config.browser.headless);
            assert_eq!(config.poll_ms, DEFAULT_POLL_INTERVAL_MS);
        }

        #[test]
        fn test_missing_file_is_io_error() {
            let dir = tempfile::tempdir().unwrap();
            let err = E2eConfig::from_file(dir.path().join("absent.yaml")).unwrap_err();
            assert!(matches!(err, E2eError::Io(_)));
        }

        #[test]
        fn test_invalid_values_rejected() {
            assert!(matches!(
                E2eConfig::from_yaml("poll_ms: 0"),
                Err(E2eError::Config { .. })
            ));
            assert!(matches!(
                E2eConfig::from_yaml("timeout_ms: [1]"),
                Err(E2eError::Yaml(_))
            ));
        }

        #[test]
        fn test_yaml_output_reloads() {
            let config = E2eConfig::default();
            let reloaded = E2eConfig::from_yaml(&config.to_yaml().unwrap()).unwrap();
            assert_eq!(reloaded, config);
        }
    }

    mod env_tests {
        use super::*;

        #[test]
        fn test_env_overrides_file() {
            let config = E2eConfig::from_yaml("base_url: http://file:1\ntimeout_ms: 500")
                .unwrap()
                .with_env(env(&[
                    (ENV_BASE_URL, "http://env:2"),
                    (ENV_HEADLESS, "0"),
                    (ENV_CHROMIUM_PATH, "/opt/chromium"),
                ]))
                .unwrap();
            assert_eq!(config.base_url, "http://env:2");
            assert_eq!(config.timeout_ms, 500);
            assert!(!config.browser.headless);
            assert_eq!(config.browser.chromium_path.as_deref(), Some("/opt/chromium"));
        }

        #[test]
        fn test_bad_env_values() {
            let err = E2eConfig::default()
                .with_env(env(&[(ENV_TIMEOUT_MS, "soon")]))
                .unwrap_err();
            assert!(err.to_string().contains(ENV_TIMEOUT_MS));
            assert!(E2eConfig::default()
                .with_env(env(&[(ENV_HEADLESS, "maybe")]))
                .is_err());
        }

        #[test]
        fn test_wait_options() {
            let config = E2eConfig::default()
                .with_env(env(&[(ENV_TIMEOUT_MS, "250"), (ENV_POLL_MS, "5")]))
                .unwrap();
            let options = config.wait_options();
            assert_eq!(options.timeout_ms, 250);
            assert_eq!(options.poll_interval_ms, 5);
        }
    }
}
