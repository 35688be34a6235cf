//! One test's browser session.

use crate::base_page::BasePage;
use crate::config::SuiteConfig;
use crate::driver::WebDriver;
use std::fmt;
use std::sync::Arc;

/// A driver handle bound to one test.
///
/// The lifecycle fixture owns the session; page objects borrow it and so can
/// never outlive the driver.
pub struct Session {
    driver: Box<dyn WebDriver>,
    config: Arc<SuiteConfig>,
    test_name: String,
}

impl Session {
    /// Bind a driver to a test
    #[must_use]
    pub fn new(
        driver: Box<dyn WebDriver>,
        config: Arc<SuiteConfig>,
        test_name: impl Into<String>,
    ) -> Self {
        Self {
            driver,
            config,
            test_name: test_name.into(),
        }
    }

    /// The driver
    #[must_use]
    pub fn driver(&self) -> &dyn WebDriver {
        self.driver.as_ref()
    }

    /// Suite configuration
    #[must_use]
    pub fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// Name of the running test
    #[must_use]
    pub fn test_name(&self) -> &str {
        &self.test_name
    }

    /// Base page primitives with the configured wait policy
    #[must_use]
    pub fn base_page(&self) -> BasePage<'_> {
        BasePage::new(self)
    }

    pub(crate) fn into_driver(self) -> Box<dyn WebDriver> {
        self.driver
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("test_name", &self.test_name)
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}
