//! Suite configuration.
//!
//! Layered in this order, later layers winning:
//!
//! 1. built-in defaults
//! 2. optional YAML file
//! 3. environment (`SHOPCHECK_BASE_URL`, `SHOPCHECK_HEADLESS`, `CHROMIUM_PATH`)
//! 4. command-line flags, applied by the caller through the builder methods

use crate::artifacts::ArtifactDirs;
use crate::driver::DriverConfig;
use crate::locator::ProductLookup;
use crate::result::{SuiteError, SuiteResult};
use crate::wait::{WaitPolicy, ABSENCE_TIMEOUT_MS, DEFAULT_POLL_INTERVAL_MS, DEFAULT_TIMEOUT_MS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Storefront under test
pub const DEFAULT_BASE_URL: &str = "https://www.saucedemo.com/";

/// Base URL override
pub const ENV_BASE_URL: &str = "SHOPCHECK_BASE_URL";
/// Headless override (`true`/`false`, `1`/`0`, `yes`/`no`)
pub const ENV_HEADLESS: &str = "SHOPCHECK_HEADLESS";
/// Browser executable override
pub const ENV_CHROMIUM_PATH: &str = "CHROMIUM_PATH";

/// Configuration for one suite run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    /// Storefront root URL
    pub base_url: String,
    /// Run the browser without a window
    pub headless: bool,
    /// Browser window width
    pub window_width: u32,
    /// Browser window height
    pub window_height: u32,
    /// Browser executable override
    pub chromium_path: Option<PathBuf>,
    /// Default lookup timeout
    pub default_timeout_ms: u64,
    /// Timeout for checks where absence is expected
    pub absence_timeout_ms: u64,
    /// Lookup poll interval
    pub poll_interval_ms: u64,
    /// Artifact directories
    pub artifacts: ArtifactDirs,
    /// How product-by-name actions find their buttons
    pub product_lookup: ProductLookup,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            headless: true,
            window_width: 1920,
            window_height: 1080,
            chromium_path: None,
            default_timeout_ms: DEFAULT_TIMEOUT_MS,
            absence_timeout_ms: ABSENCE_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            artifacts: ArtifactDirs::default(),
            product_lookup: ProductLookup::default(),
        }
    }
}

impl SuiteConfig {
    /// Create config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse YAML. Missing fields keep their defaults.
    pub fn from_yaml(yaml: &str) -> SuiteResult<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a YAML file
    pub fn load(path: impl AsRef<Path>) -> SuiteResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            SuiteError::config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_yaml(&text)
    }

    /// Apply overrides from the process environment
    pub fn apply_env(self) -> SuiteResult<Self> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable source
    pub fn apply_env_from<F>(mut self, lookup: F) -> SuiteResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BASE_URL).filter(|v| !v.is_empty()) {
            self.base_url = url;
        }
        if let Some(raw) = lookup(ENV_HEADLESS) {
            self.headless = parse_bool(&raw).ok_or_else(|| {
                SuiteError::config(format!("{ENV_HEADLESS} must be true or false, got {raw:?}"))
            })?;
        }
        if let Some(path) = lookup(ENV_CHROMIUM_PATH).filter(|v| !v.is_empty()) {
            self.chromium_path = Some(PathBuf::from(path));
        }
        self.validate()?;
        Ok(self)
    }

    /// Check field consistency
    pub fn validate(&self) -> SuiteResult<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(SuiteError::config(format!(
                "base_url must be an http(s) URL, got {:?}",
                self.base_url
            )));
        }
        if self.poll_interval_ms == 0 {
            return Err(SuiteError::config("poll_interval_ms must be positive"));
        }
        if self.window_width == 0 || self.window_height == 0 {
            return Err(SuiteError::config("window size must be non-zero"));
        }
        Ok(())
    }

    /// Set base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set default lookup timeout
    #[must_use]
    pub const fn with_default_timeout_ms(mut self, ms: u64) -> Self {
        self.default_timeout_ms = ms;
        self
    }

    /// Set absence-check timeout
    #[must_use]
    pub const fn with_absence_timeout_ms(mut self, ms: u64) -> Self {
        self.absence_timeout_ms = ms;
        self
    }

    /// Set poll interval
    #[must_use]
    pub const fn with_poll_interval_ms(mut self, ms: u64) -> Self {
        self.poll_interval_ms = ms;
        self
    }

    /// Set artifact directories
    #[must_use]
    pub fn with_artifacts(mut self, artifacts: ArtifactDirs) -> Self {
        self.artifacts = artifacts;
        self
    }

    /// Set product lookup strategy
    #[must_use]
    pub const fn with_product_lookup(mut self, lookup: ProductLookup) -> Self {
        self.product_lookup = lookup;
        self
    }

    /// Set browser executable
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Policy for ordinary lookups
    #[must_use]
    pub const fn wait_policy(&self) -> WaitPolicy {
        WaitPolicy::from_millis(self.default_timeout_ms, self.poll_interval_ms)
    }

    /// Timeout for checks where absence is expected
    #[must_use]
    pub const fn absence_timeout(&self) -> Duration {
        Duration::from_millis(self.absence_timeout_ms)
    }

    /// Driver settings derived from this config
    #[must_use]
    pub fn driver_config(&self) -> DriverConfig {
        let mut config = DriverConfig::new()
            .headless(self.headless)
            .window(self.window_width, self.window_height)
            .implicit_wait(Duration::from_millis(self.default_timeout_ms));
        config.chromium_path.clone_from(&self.chromium_path);
        config
    }

    /// Absolute URL of a storefront page such as `inventory.html`
    #[must_use]
    pub fn url(&self, page: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            page.trim_start_matches('/')
        )
    }
}

/// Parse an environment flag such as `true`, `0` or `off`
#[must_use]
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    mod defaults_tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let config = SuiteConfig::default();
            assert_eq!(config.base_url, DEFAULT_BASE_URL);
            assert!(config.headless);
            assert_eq!(config.default_timeout_ms, 10_000);
            assert_eq!(config.absence_timeout_ms, 5_000);
            assert_eq!(config.poll_interval_ms, 500);
            assert_eq!(config.product_lookup, ProductLookup::DataTest);
            assert!(config.validate().is_ok());
        }

        #[test]
        fn test_policies() {
            let config = SuiteConfig::default();
            assert_eq!(config.wait_policy(), WaitPolicy::default());
            assert_eq!(config.absence_timeout(), Duration::from_secs(5));
        }

        #[test]
        fn test_driver_config() {
            let driver = SuiteConfig::default()
                .with_headless(false)
                .with_chromium_path("/opt/chromium")
                .driver_config();
            assert!(!driver.headless);
            assert_eq!(driver.window_width, 1920);
            assert_eq!(driver.chromium_path, Some(PathBuf::from("/opt/chromium")));
            assert_eq!(driver.implicit_wait, Duration::from_secs(10));
        }

        #[test]
        fn test_url_join() {
            let config = SuiteConfig::default();
            assert_eq!(
                config.url("inventory.html"),
                "https://www.saucedemo.com/inventory.html"
            );
            let config = config.with_base_url("http://localhost:3000");
            assert_eq!(config.url("/cart.html"), "http://localhost:3000/cart.html");
        }
    }

    mod yaml_tests {
        use super::*;

        #[test]
        fn test_partial_yaml() {
            let config = SuiteConfig::from_yaml(
                "base_url: http://localhost:8080/\nheadless: false\nproduct_lookup: structural\n",
            )
            .unwrap();
            assert_eq!(config.base_url, "http://localhost:8080/");
            assert!(!config.headless);
            assert_eq!(config.product_lookup, ProductLookup::Structural);
            assert_eq!(config.default_timeout_ms, 10_000);
        }

        #[test]
        fn test_invalid_yaml_value() {
            let err = SuiteConfig::from_yaml("poll_interval_ms: 0\n").unwrap_err();
            assert!(matches!(err, SuiteError::Config { .. }));
        }

        #[test]
        fn test_malformed_yaml() {
            let err = SuiteConfig::from_yaml("headless: [").unwrap_err();
            assert!(matches!(err, SuiteError::Yaml(_)));
        }

        #[test]
        fn test_load_file() {
            let tmp = TempDir::new().unwrap();
            let path = tmp.path().join("shopcheck.yaml");
            std::fs::write(&path, "default_timeout_ms: 2500\n").unwrap();
            let config = SuiteConfig::load(&path).unwrap();
            assert_eq!(config.default_timeout_ms, 2500);
        }

        #[test]
        fn test_load_missing_file() {
            let err = SuiteConfig::load("/nonexistent/shopcheck.yaml").unwrap_err();
            assert!(err.to_string().contains("cannot read"));
        }
    }

    mod env_tests {
        use super::*;

        #[test]
        fn test_env_overrides() {
            let config = SuiteConfig::default()
                .apply_env_from(env(&[
                    (ENV_BASE_URL, "http://127.0.0.1:9000/"),
                    (ENV_HEADLESS, "no"),
                    (ENV_CHROMIUM_PATH, "/usr/bin/chromium"),
                ]))
                .unwrap();
            assert_eq!(config.base_url, "http://127.0.0.1:9000/");
            assert!(!config.headless);
            assert_eq!(config.chromium_path, Some(PathBuf::from("/usr/bin/chromium")));
        }

        #[test]
        fn test_empty_env_is_ignored() {
            let config = SuiteConfig::default()
                .apply_env_from(env(&[(ENV_BASE_URL, "")]))
                .unwrap();
            assert_eq!(config.base_url, DEFAULT_BASE_URL);
        }

        #[test]
        fn test_bad_headless_value() {
            let err = SuiteConfig::default()
                .apply_env_from(env(&[(ENV_HEADLESS, "maybe")]))
                .unwrap_err();
            assert!(err.to_string().contains(ENV_HEADLESS));
        }

        #[test]
        fn test_bad_base_url() {
            let err = SuiteConfig::default()
                .apply_env_from(env(&[(ENV_BASE_URL, "saucedemo.com")]))
                .unwrap_err();
            assert!(matches!(err, SuiteError::Config { .. }));
        }
    }
}
