//! Base page primitives shared by every page object.
//!
//! All element queries go through [`crate::wait`] with the session's
//! [`WaitPolicy`]. Two queries treat absence as a normal outcome instead of a
//! failure: [`BasePage::find_optional`] / [`BasePage::find_all_optional`]
//! return `None` / empty, and [`BasePage::is_displayed`] returns `false`.

use crate::artifacts::timestamped_name;
use crate::driver::{ElementHandle, WebDriver};
use crate::locator::Locator;
use crate::result::SuiteResult;
use crate::session::Session;
use crate::wait::{wait_for, wait_for_all, WaitCondition, WaitPolicy};
use std::path::PathBuf;
use std::time::Duration;

/// Explicit-wait element queries over a borrowed session
#[derive(Debug, Clone, Copy)]
pub struct BasePage<'s> {
    session: &'s Session,
    policy: WaitPolicy,
}

impl<'s> BasePage<'s> {
    /// Use the session's configured wait policy
    #[must_use]
    pub fn new(session: &'s Session) -> Self {
        Self {
            session,
            policy: session.config().wait_policy(),
        }
    }

    /// Override the wait policy
    #[must_use]
    pub const fn with_policy(mut self, policy: WaitPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Underlying session
    #[must_use]
    pub const fn session(&self) -> &'s Session {
        self.session
    }

    /// Active wait policy
    #[must_use]
    pub const fn policy(&self) -> WaitPolicy {
        self.policy
    }

    fn driver(&self) -> &'s dyn WebDriver {
        self.session.driver()
    }

    /// First match once present
    pub async fn find_element(&self, locator: &Locator) -> SuiteResult<ElementHandle> {
        wait_for(self.driver(), locator, WaitCondition::Present, self.policy).await
    }

    /// All matches once at least one is present
    pub async fn find_elements(&self, locator: &Locator) -> SuiteResult<Vec<ElementHandle>> {
        wait_for_all(self.driver(), locator, WaitCondition::Present, self.policy).await
    }

    /// First match within `timeout`, or `None` if nothing appears
    pub async fn find_optional(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> SuiteResult<Option<ElementHandle>> {
        let policy = self.policy.with_timeout(timeout);
        match wait_for(self.driver(), locator, WaitCondition::Present, policy).await {
            Ok(element) => Ok(Some(element)),
            Err(e) if e.is_timeout() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// All matches within `timeout`, or empty if nothing appears
    pub async fn find_all_optional(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> SuiteResult<Vec<ElementHandle>> {
        let policy = self.policy.with_timeout(timeout);
        match wait_for_all(self.driver(), locator, WaitCondition::Present, policy).await {
            Ok(elements) => Ok(elements),
            Err(e) if e.is_timeout() => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    /// Wait until clickable, then click
    pub async fn click(&self, locator: &Locator) -> SuiteResult<()> {
        let element = wait_for(self.driver(), locator, WaitCondition::Clickable, self.policy).await?;
        tracing::debug!(%locator, "click");
        self.driver().click(&element).await
    }

    /// Click an element that was already located
    pub async fn click_element(&self, element: &ElementHandle) -> SuiteResult<()> {
        tracing::debug!(locator = %element.locator, index = element.index, "click element");
        self.driver().click(element).await
    }

    /// Locate, clear, then type
    pub async fn enter_text(&self, locator: &Locator, text: &str) -> SuiteResult<()> {
        let element = self.find_element(locator).await?;
        tracing::debug!(%locator, chars = text.chars().count(), "enter text");
        self.driver().clear(&element).await?;
        self.driver().send_keys(&element, text).await
    }

    /// Visible text of the first match
    pub async fn get_text(&self, locator: &Locator) -> SuiteResult<String> {
        Ok(self.find_element(locator).await?.text)
    }

    /// Visible text of every match
    pub async fn get_texts(&self, locator: &Locator) -> SuiteResult<Vec<String>> {
        Ok(self
            .find_elements(locator)
            .await?
            .into_iter()
            .map(|e| e.text)
            .collect())
    }

    /// Whether a match becomes visible within `timeout`. Never fails.
    pub async fn is_displayed(&self, locator: &Locator, timeout: Duration) -> bool {
        let policy = self.policy.with_timeout(timeout);
        match wait_for(self.driver(), locator, WaitCondition::Visible, policy).await {
            Ok(_) => true,
            Err(e) if e.is_timeout() => false,
            Err(e) => {
                tracing::warn!(%locator, error = %e, "visibility check failed");
                false
            }
        }
    }

    /// Choose an option of a `<select>` by value
    pub async fn select_option(&self, locator: &Locator, value: &str) -> SuiteResult<()> {
        let element = wait_for(self.driver(), locator, WaitCondition::Clickable, self.policy).await?;
        tracing::debug!(%locator, value, "select option");
        self.driver().select_by_value(&element, value).await
    }

    /// Save a PNG as `<name>_<YYYYMMDD_HHMMSS>.png` in the screenshot directory
    pub async fn take_screenshot(&self, name: &str) -> SuiteResult<PathBuf> {
        let dir = &self.session.config().artifacts.screenshots;
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(timestamped_name(name, "png"));
        let png = self.driver().screenshot().await?;
        tokio::fs::write(&path, png).await?;
        tracing::info!(path = %path.display(), "Screenshot saved");
        Ok(path)
    }

    /// Load a URL
    pub async fn navigate(&self, url: &str) -> SuiteResult<()> {
        tracing::debug!(url, "navigate");
        self.driver().navigate(url).await
    }

    /// Current URL, no waiting
    pub async fn current_url(&self) -> SuiteResult<String> {
        self.driver().current_url().await
    }

    /// Document title, no waiting
    pub async fn page_title(&self) -> SuiteResult<String> {
        self.driver().title().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::ArtifactDirs;
    use crate::config::SuiteConfig;
    use crate::driver::{MockDriver, MockElement};
    use std::sync::Arc;
    use tempfile::TempDir;

    const FIELD: Locator = Locator::id("user-name");
    const BUTTON: Locator = Locator::id("login-button");
    const ERROR: Locator = Locator::css("h3[data-test='error']");

    fn session(driver: MockDriver, root: &std::path::Path) -> Session {
        let config = SuiteConfig::default()
            .with_default_timeout_ms(200)
            .with_poll_interval_ms(20)
            .with_artifacts(ArtifactDirs::under(root));
        Session::new(Box::new(driver), Arc::new(config), "base_page")
    }

    mod query_tests {
        use super::*;

        #[tokio::test]
        async fn test_find_element_times_out() {
            let tmp = TempDir::new().unwrap();
            let session = session(MockDriver::new(), tmp.path());
            let err = session.base_page().find_element(&FIELD).await.unwrap_err();
            assert!(err.is_timeout());
            assert!(err.to_string().contains("id=user-name"));
        }

        #[tokio::test]
        async fn test_find_optional_absent_is_none() {
            let tmp = TempDir::new().unwrap();
            let session = session(MockDriver::new(), tmp.path());
            let found = session
                .base_page()
                .find_optional(&FIELD, Duration::from_millis(50))
                .await
                .unwrap();
            assert!(found.is_none());
        }

        #[tokio::test]
        async fn test_find_all_optional_present() {
            let tmp = TempDir::new().unwrap();
            let items = Locator::class_name("cart_item");
            let driver = MockDriver::new()
                .with_element(items.clone(), "a")
                .with_element(items.clone(), "b");
            let session = session(driver, tmp.path());
            let found = session
                .base_page()
                .find_all_optional(&items, Duration::from_millis(50))
                .await
                .unwrap();
            assert_eq!(found.len(), 2);
        }

        #[tokio::test]
        async fn test_get_texts() {
            let tmp = TempDir::new().unwrap();
            let names = Locator::class_name("inventory_item_name");
            let driver = MockDriver::new()
                .with_element(names.clone(), "Sauce Labs Backpack")
                .with_element(names.clone(), "Sauce Labs Bike Light");
            let session = session(driver, tmp.path());
            let texts = session.base_page().get_texts(&names).await.unwrap();
            assert_eq!(texts, vec!["Sauce Labs Backpack", "Sauce Labs Bike Light"]);
        }
    }

    mod visibility_tests {
        use super::*;

        #[tokio::test]
        async fn test_is_displayed_absent_is_false_within_timeout() {
            let tmp = TempDir::new().unwrap();
            let session = session(MockDriver::new(), tmp.path());
            let start = std::time::Instant::now();
            let shown = session
                .base_page()
                .is_displayed(&ERROR, Duration::from_millis(100))
                .await;
            assert!(!shown);
            assert!(start.elapsed() < Duration::from_secs(2));
        }

        #[tokio::test]
        async fn test_is_displayed_hidden_is_false() {
            let tmp = TempDir::new().unwrap();
            let driver = MockDriver::new();
            driver.add_element(ERROR, MockElement::new("oops").hidden());
            let session = session(driver, tmp.path());
            assert!(
                !session
                    .base_page()
                    .is_displayed(&ERROR, Duration::from_millis(60))
                    .await
            );
        }

        #[tokio::test]
        async fn test_is_displayed_visible() {
            let tmp = TempDir::new().unwrap();
            let session = session(MockDriver::new().with_element(ERROR, "oops"), tmp.path());
            assert!(
                session
                    .base_page()
                    .is_displayed(&ERROR, Duration::from_millis(60))
                    .await
            );
        }
    }

    mod action_tests {
        use super::*;

        #[tokio::test]
        async fn test_click_waits_for_enabled() {
            let tmp = TempDir::new().unwrap();
            let driver = MockDriver::new();
            driver.add_element(BUTTON, MockElement::new("Login").disabled());
            let session = session(driver, tmp.path());
            let err = session.base_page().click(&BUTTON).await.unwrap_err();
            assert!(err.to_string().contains("clickable"));
        }

        #[tokio::test]
        async fn test_enter_text_clears_then_types() {
            let tmp = TempDir::new().unwrap();
            let driver = Arc::new(MockDriver::new().with_element(FIELD, ""));
            let config = SuiteConfig::default()
                .with_default_timeout_ms(200)
                .with_poll_interval_ms(20)
                .with_artifacts(ArtifactDirs::under(tmp.path()));
            let session = Session::new(Box::new(Arc::clone(&driver)), Arc::new(config), "typing");
            let page = session.base_page();

            page.enter_text(&FIELD, "standard_user").await.unwrap();
            assert_eq!(driver.value_of(&FIELD, 0).as_deref(), Some("standard_user"));
            page.enter_text(&FIELD, "problem_user").await.unwrap();
            assert_eq!(driver.value_of(&FIELD, 0).as_deref(), Some("problem_user"));

            let calls: Vec<String> = driver
                .history()
                .into_iter()
                .filter(|c| c.starts_with("clear") || c.starts_with("send_keys"))
                .collect();
            assert_eq!(
                calls,
                vec![
                    "clear:id=user-name[0]",
                    "send_keys:id=user-name[0]",
                    "clear:id=user-name[0]",
                    "send_keys:id=user-name[0]",
                ]
            );
        }

        #[tokio::test]
        async fn test_take_screenshot_creates_dir_and_file() {
            let tmp = TempDir::new().unwrap();
            let session = session(MockDriver::new(), tmp.path());
            let path = session.base_page().take_screenshot("home").await.unwrap();
            assert!(path.exists());
            assert!(path.starts_with(tmp.path().join("screenshots")));
            let file = path.file_name().unwrap().to_string_lossy().to_string();
            assert!(file.starts_with("home_"));
            assert!(file.ends_with(".png"));
        }

        #[tokio::test]
        async fn test_passthrough_queries() {
            let tmp = TempDir::new().unwrap();
            let driver = MockDriver::new();
            driver.set_title("Swag Labs");
            let session = session(driver, tmp.path());
            let page = session.base_page();
            page.navigate("https://www.saucedemo.com/").await.unwrap();
            assert_eq!(page.current_url().await.unwrap(), "https://www.saucedemo.com/");
            assert_eq!(page.page_title().await.unwrap(), "Swag Labs");
        }
    }
}
