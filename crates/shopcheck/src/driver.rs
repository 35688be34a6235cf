//! Browser automation seam.
//!
//! [`WebDriver`] is the one interface the page layer talks to. Two
//! implementations exist:
//!
//! - `ChromiumDriver` (feature `browser`): CDP via chromiumoxide
//! - [`crate::mock::MockStorefront`]: in-memory model of the storefront
//!
//! [`MockDriver`] below is a scriptable driver for exercising the wait and
//! base-page primitives in isolation.
//!
//! Lookups through the driver never wait. Polling lives in [`crate::wait`],
//! so every query goes through the same explicit wait policy regardless of the
//! backend.

use crate::locator::Locator;
use crate::result::{SuiteError, SuiteResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Snapshot of one matched element.
///
/// Actions address the element by `(locator, index)`. If the page changed and
/// that index no longer matches, the driver returns
/// [`SuiteError::StaleElement`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementHandle {
    /// Locator the element was found with
    pub locator: Locator,
    /// Position in the match list
    pub index: usize,
    /// Visible text
    pub text: String,
    /// Rendered and not hidden
    pub displayed: bool,
    /// Not disabled
    pub enabled: bool,
}

impl ElementHandle {
    /// Create a displayed, enabled handle
    #[must_use]
    pub fn new(locator: Locator, index: usize, text: impl Into<String>) -> Self {
        Self {
            locator,
            index,
            text: text.into(),
            displayed: true,
            enabled: true,
        }
    }

    /// Displayed and enabled
    #[must_use]
    pub const fn is_clickable(&self) -> bool {
        self.displayed && self.enabled
    }
}

/// Browser configuration for a driver session
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Run without a visible window
    pub headless: bool,
    /// Window width
    pub window_width: u32,
    /// Window height
    pub window_height: u32,
    /// Browser executable override
    pub chromium_path: Option<PathBuf>,
    /// Default lookup wait
    pub implicit_wait: Duration,
    /// Extra command-line switches
    pub args: Vec<String>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1920,
            window_height: 1080,
            chromium_path: None,
            implicit_wait: Duration::from_secs(10),
            args: Self::default_args(),
        }
    }
}

impl DriverConfig {
    /// Create new config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Switches every session is launched with
    #[must_use]
    pub fn default_args() -> Vec<String> {
        [
            "--no-sandbox",
            "--disable-dev-shm-usage",
            "--disable-gpu",
            "--start-maximized",
            "--log-level=3",
        ]
        .iter()
        .map(ToString::to_string)
        .collect()
    }

    /// Set headless mode
    #[must_use]
    pub const fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set window dimensions
    #[must_use]
    pub const fn window(mut self, width: u32, height: u32) -> Self {
        self.window_width = width;
        self.window_height = height;
        self
    }

    /// Set browser executable
    #[must_use]
    pub fn chromium_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Set default lookup wait
    #[must_use]
    pub const fn implicit_wait(mut self, wait: Duration) -> Self {
        self.implicit_wait = wait;
        self
    }

    /// Append a command-line switch
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }
}

/// One browser session.
///
/// Methods take `&self` so page objects can share a borrowed session.
#[async_trait]
pub trait WebDriver: Send + Sync {
    /// Load a URL
    async fn navigate(&self, url: &str) -> SuiteResult<()>;

    /// All current matches in document order. Never waits; no match is an
    /// empty vector.
    async fn find_all(&self, locator: &Locator) -> SuiteResult<Vec<ElementHandle>>;

    /// Click an element
    async fn click(&self, element: &ElementHandle) -> SuiteResult<()>;

    /// Clear an input's value
    async fn clear(&self, element: &ElementHandle) -> SuiteResult<()>;

    /// Type text into an element
    async fn send_keys(&self, element: &ElementHandle, text: &str) -> SuiteResult<()>;

    /// Choose the option with `value` in a `<select>`
    async fn select_by_value(&self, element: &ElementHandle, value: &str) -> SuiteResult<()>;

    /// PNG of the viewport
    async fn screenshot(&self) -> SuiteResult<Vec<u8>>;

    /// Current page URL
    async fn current_url(&self) -> SuiteResult<String>;

    /// Current document title
    async fn title(&self) -> SuiteResult<String>;

    /// End the session and release the browser
    async fn quit(&self) -> SuiteResult<()>;
}

/// Source of driver sessions
#[async_trait]
pub trait DriverProvider: Send + Sync {
    /// Start a new session.
    ///
    /// A browser that cannot be located or launched is
    /// [`SuiteError::Environment`].
    async fn get_driver(&self, headless: bool) -> SuiteResult<Box<dyn WebDriver>>;

    /// Short name for logs
    fn name(&self) -> &'static str;
}

/// Scripted element for [`MockDriver`]
#[derive(Debug, Clone)]
pub struct MockElement {
    /// Visible text
    pub text: String,
    /// Displayed flag
    pub displayed: bool,
    /// Enabled flag
    pub enabled: bool,
    /// Element is absent until this instant
    pub ready_at: Option<Instant>,
}

impl MockElement {
    /// Displayed, enabled element
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            displayed: true,
            enabled: true,
            ready_at: None,
        }
    }

    /// Present but not displayed
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.displayed = false;
        self
    }

    /// Present but disabled
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Appear only after `delay`
    #[must_use]
    pub fn after(mut self, delay: Duration) -> Self {
        self.ready_at = Some(Instant::now() + delay);
        self
    }
}

#[derive(Debug, Default)]
struct MockState {
    url: String,
    title: String,
    elements: HashMap<Locator, Vec<MockElement>>,
    values: HashMap<(Locator, usize), String>,
    screenshot: Option<Vec<u8>>,
    fail_screenshot: bool,
    call_history: Vec<String>,
}

/// Scriptable driver for unit tests
#[derive(Debug, Default)]
pub struct MockDriver {
    state: Mutex<MockState>,
}

impl MockDriver {
    /// Create new mock driver
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add an element under `locator`
    pub fn add_element(&self, locator: Locator, element: MockElement) {
        self.state()
            .elements
            .entry(locator)
            .or_default()
            .push(element);
    }

    /// Add a displayed, enabled element
    #[must_use]
    pub fn with_element(self, locator: Locator, text: &str) -> Self {
        self.add_element(locator, MockElement::new(text));
        self
    }

    /// Remove every element under `locator`
    pub fn remove_elements(&self, locator: &Locator) {
        self.state().elements.remove(locator);
    }

    /// Set the document title
    pub fn set_title(&self, title: impl Into<String>) {
        self.state().title = title.into();
    }

    /// Set screenshot bytes
    pub fn set_screenshot(&self, data: Vec<u8>) {
        self.state().screenshot = Some(data);
    }

    /// Make every screenshot call fail
    pub fn fail_screenshots(&self) {
        self.state().fail_screenshot = true;
    }

    /// Text typed into an element
    #[must_use]
    pub fn value_of(&self, locator: &Locator, index: usize) -> Option<String> {
        self.state().values.get(&(locator.clone(), index)).cloned()
    }

    /// Get call history
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.state().call_history.clone()
    }

    /// Check if method was called
    #[must_use]
    pub fn was_called(&self, method: &str) -> bool {
        self.state()
            .call_history
            .iter()
            .any(|c| c.starts_with(method))
    }

    fn record(&self, call: String) {
        self.state().call_history.push(call);
    }

    fn check_exists(&self, element: &ElementHandle) -> SuiteResult<()> {
        let now = Instant::now();
        let present = self
            .state()
            .elements
            .get(&element.locator)
            .map_or(0, |list| {
                list.iter()
                    .filter(|e| e.ready_at.map_or(true, |at| at <= now))
                    .count()
            });
        if element.index < present {
            Ok(())
        } else {
            Err(SuiteError::StaleElement {
                locator: element.locator.to_string(),
                index: element.index,
            })
        }
    }
}

#[async_trait]
impl WebDriver for MockDriver {
    async fn navigate(&self, url: &str) -> SuiteResult<()> {
        self.record(format!("navigate:{url}"));
        self.state().url = url.to_string();
        Ok(())
    }

    async fn find_all(&self, locator: &Locator) -> SuiteResult<Vec<ElementHandle>> {
        let now = Instant::now();
        let state = self.state();
        let Some(list) = state.elements.get(locator) else {
            return Ok(Vec::new());
        };
        Ok(list
            .iter()
            .filter(|e| e.ready_at.map_or(true, |at| at <= now))
            .enumerate()
            .map(|(index, e)| ElementHandle {
                locator: locator.clone(),
                index,
                text: e.text.clone(),
                displayed: e.displayed,
                enabled: e.enabled,
            })
            .collect())
    }

    async fn click(&self, element: &ElementHandle) -> SuiteResult<()> {
        self.check_exists(element)?;
        self.record(format!("click:{}[{}]", element.locator, element.index));
        Ok(())
    }

    async fn clear(&self, element: &ElementHandle) -> SuiteResult<()> {
        self.check_exists(element)?;
        self.record(format!("clear:{}[{}]", element.locator, element.index));
        self.state()
            .values
            .insert((element.locator.clone(), element.index), String::new());
        Ok(())
    }

    async fn send_keys(&self, element: &ElementHandle, text: &str) -> SuiteResult<()> {
        self.check_exists(element)?;
        self.record(format!("send_keys:{}[{}]", element.locator, element.index));
        self.state()
            .values
            .entry((element.locator.clone(), element.index))
            .or_default()
            .push_str(text);
        Ok(())
    }

    async fn select_by_value(&self, element: &ElementHandle, value: &str) -> SuiteResult<()> {
        self.check_exists(element)?;
        self.record(format!("select:{}={value}", element.locator));
        self.state()
            .values
            .insert((element.locator.clone(), element.index), value.to_string());
        Ok(())
    }

    async fn screenshot(&self) -> SuiteResult<Vec<u8>> {
        self.record("screenshot".to_string());
        let state = self.state();
        if state.fail_screenshot {
            return Err(SuiteError::Screenshot {
                message: "mock screenshot failure".to_string(),
            });
        }
        Ok(state
            .screenshot
            .clone()
            .unwrap_or_else(|| b"\x89PNG\r\n\x1a\n".to_vec()))
    }

    async fn current_url(&self) -> SuiteResult<String> {
        Ok(self.state().url.clone())
    }

    async fn title(&self) -> SuiteResult<String> {
        Ok(self.state().title.clone())
    }

    async fn quit(&self) -> SuiteResult<()> {
        self.record("quit".to_string());
        Ok(())
    }
}

/// A shared driver, so a test can keep a handle to a session the fixture owns
#[async_trait]
impl<D: WebDriver + ?Sized> WebDriver for Arc<D> {
    async fn navigate(&self, url: &str) -> SuiteResult<()> {
        (**self).navigate(url).await
    }

    async fn find_all(&self, locator: &Locator) -> SuiteResult<Vec<ElementHandle>> {
        (**self).find_all(locator).await
    }

    async fn click(&self, element: &ElementHandle) -> SuiteResult<()> {
        (**self).click(element).await
    }

    async fn clear(&self, element: &ElementHandle) -> SuiteResult<()> {
        (**self).clear(element).await
    }

    async fn send_keys(&self, element: &ElementHandle, text: &str) -> SuiteResult<()> {
        (**self).send_keys(element, text).await
    }

    async fn select_by_value(&self, element: &ElementHandle, value: &str) -> SuiteResult<()> {
        (**self).select_by_value(element, value).await
    }

    async fn screenshot(&self) -> SuiteResult<Vec<u8>> {
        (**self).screenshot().await
    }

    async fn current_url(&self) -> SuiteResult<String> {
        (**self).current_url().await
    }

    async fn title(&self) -> SuiteResult<String> {
        (**self).title().await
    }

    async fn quit(&self) -> SuiteResult<()> {
        (**self).quit().await
    }
}
