//! Chromium sessions over the Chrome DevTools Protocol.
//!
//! Compiled with the `browser` feature. Element snapshots are taken with a
//! single `Runtime.evaluate` per lookup; actions re-resolve the element by
//! `(locator, index)` through chromiumoxide's node queries.

use crate::driver::{DriverConfig, DriverProvider, ElementHandle, WebDriver};
use crate::locator::Locator;
use crate::result::{SuiteError, SuiteResult};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
use chromiumoxide::cdp::browser_protocol::page::{
    CaptureScreenshotFormat, CaptureScreenshotParams,
};
use chromiumoxide::element::Element as CdpElement;
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::page::Page as CdpPage;
use futures::StreamExt;
use serde::Deserialize;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

#[derive(Debug, Deserialize)]
struct RawElement {
    text: String,
    displayed: bool,
    enabled: bool,
}

/// One Chromium process with a single page
#[derive(Debug)]
pub struct ChromiumDriver {
    browser: Mutex<CdpBrowser>,
    page: CdpPage,
    handler: JoinHandle<()>,
}

impl ChromiumDriver {
    /// Launch Chromium and open a blank page
    ///
    /// # Errors
    ///
    /// [`SuiteError::Environment`] if the browser cannot be located or started
    pub async fn launch(config: &DriverConfig) -> SuiteResult<Self> {
        let mut builder = CdpConfig::builder()
            .window_size(config.window_width, config.window_height)
            .viewport(None::<Viewport>)
            .args(config.args.clone());

        if !config.headless {
            builder = builder.with_head();
        }

        if let Some(ref path) = config.chromium_path {
            builder = builder.chrome_executable(path);
        }

        let cdp_config = builder.build().map_err(|e| SuiteError::environment(e))?;

        let (browser, mut handler) = CdpBrowser::launch(cdp_config)
            .await
            .map_err(|e| SuiteError::environment(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                handler.abort();
                return Err(SuiteError::environment(e.to_string()));
            }
        };

        tracing::debug!(
            headless = config.headless,
            width = config.window_width,
            height = config.window_height,
            "chromium session started"
        );

        Ok(Self {
            browser: Mutex::new(browser),
            page,
            handler,
        })
    }

    async fn resolve(&self, element: &ElementHandle) -> SuiteResult<CdpElement> {
        let locator = &element.locator;
        let found = match locator.to_css() {
            Some(css) => self.page.find_elements(css).await,
            None => self.page.find_xpaths(locator.selector()).await,
        };
        pick_node(found, locator, element.index)
    }

    async fn call_on(&self, element: &ElementHandle, function: &str) -> SuiteResult<()> {
        self.resolve(element)
            .await?
            .call_js_fn(function, false)
            .await
            .map_err(|e| SuiteError::driver(e.to_string()))?;
        Ok(())
    }
}

/// The `index`-th node of a query result. A protocol error stays a driver
/// error; a short list means the element went stale.
fn pick_node<T, E: std::fmt::Display>(
    found: Result<Vec<T>, E>,
    locator: &Locator,
    index: usize,
) -> SuiteResult<T> {
    found
        .map_err(|e| SuiteError::driver(e.to_string()))?
        .into_iter()
        .nth(index)
        .ok_or_else(|| SuiteError::StaleElement {
            locator: locator.to_string(),
            index,
        })
}

fn snapshot_script(locator: &Locator) -> String {
    format!(
        "(() => {{ \
           const els = {}; \
           return els.map(e => {{ \
             const s = window.getComputedStyle(e); \
             const r = e.getBoundingClientRect(); \
             return {{ \
               text: (e.innerText ?? e.textContent ?? '').trim(), \
               displayed: s.display !== 'none' && s.visibility !== 'hidden' \
                 && (r.width > 0 || r.height > 0), \
               enabled: !e.disabled \
             }}; \
           }}); \
         }})()",
        locator.to_query_all()
    )
}

#[async_trait]
impl WebDriver for ChromiumDriver {
    async fn navigate(&self, url: &str) -> SuiteResult<()> {
        self.page
            .goto(url)
            .await
            .map_err(|e| SuiteError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn find_all(&self, locator: &Locator) -> SuiteResult<Vec<ElementHandle>> {
        let raw: Vec<RawElement> = self
            .page
            .evaluate(snapshot_script(locator))
            .await
            .map_err(|e| SuiteError::driver(e.to_string()))?
            .into_value()
            .map_err(|e| SuiteError::driver(e.to_string()))?;

        Ok(raw
            .into_iter()
            .enumerate()
            .map(|(index, r)| ElementHandle {
                locator: locator.clone(),
                index,
                text: r.text,
                displayed: r.displayed,
                enabled: r.enabled,
            })
            .collect())
    }

    async fn click(&self, element: &ElementHandle) -> SuiteResult<()> {
        self.resolve(element)
            .await?
            .click()
            .await
            .map_err(|e| SuiteError::driver(e.to_string()))?;
        Ok(())
    }

    async fn clear(&self, element: &ElementHandle) -> SuiteResult<()> {
        // Select then delete, so framework-controlled inputs see real key events.
        let node = self.resolve(element).await?;
        node.call_js_fn("function() { this.focus(); this.select(); }", false)
            .await
            .map_err(|e| SuiteError::driver(e.to_string()))?;
        node.press_key("Backspace")
            .await
            .map_err(|e| SuiteError::driver(e.to_string()))?;
        Ok(())
    }

    async fn send_keys(&self, element: &ElementHandle, text: &str) -> SuiteResult<()> {
        let node = self.resolve(element).await?;
        node.click()
            .await
            .map_err(|e| SuiteError::driver(e.to_string()))?;
        node.type_str(text)
            .await
            .map_err(|e| SuiteError::driver(e.to_string()))?;
        Ok(())
    }

    async fn select_by_value(&self, element: &ElementHandle, value: &str) -> SuiteResult<()> {
        let literal = serde_json::to_string(value)?;
        let function = format!(
            "function() {{ \
               const set = Object.getOwnPropertyDescriptor(HTMLSelectElement.prototype, 'value').set; \
               set.call(this, {literal}); \
               this.dispatchEvent(new Event('change', {{ bubbles: true }})); \
             }}"
        );
        self.call_on(element, &function).await
    }

    async fn screenshot(&self) -> SuiteResult<Vec<u8>> {
        let params = CaptureScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .build();

        let screenshot = self
            .page
            .execute(params)
            .await
            .map_err(|e| SuiteError::Screenshot {
                message: e.to_string(),
            })?;

        use base64::Engine;
        base64::engine::general_purpose::STANDARD
            .decode(&screenshot.data)
            .map_err(|e| SuiteError::Screenshot {
                message: e.to_string(),
            })
    }

    async fn current_url(&self) -> SuiteResult<String> {
        Ok(self
            .page
            .url()
            .await
            .map_err(|e| SuiteError::driver(e.to_string()))?
            .unwrap_or_default())
    }

    async fn title(&self) -> SuiteResult<String> {
        Ok(self
            .page
            .get_title()
            .await
            .map_err(|e| SuiteError::driver(e.to_string()))?
            .unwrap_or_default())
    }

    async fn quit(&self) -> SuiteResult<()> {
        let mut browser = self.browser.lock().await;
        let closed = browser
            .close()
            .await
            .map_err(|e| SuiteError::driver(e.to_string()));
        if closed.is_ok() {
            let _ = browser.wait().await;
        }
        self.handler.abort();
        tracing::debug!("chromium session closed");
        closed.map(|_| ())
    }
}

/// Launches a fresh Chromium per test
#[derive(Debug, Clone, Default)]
pub struct ChromiumProvider {
    config: DriverConfig,
}

impl ChromiumProvider {
    /// Create a provider from a base configuration
    #[must_use]
    pub const fn new(config: DriverConfig) -> Self {
        Self { config }
    }

    /// Base configuration
    #[must_use]
    pub const fn config(&self) -> &DriverConfig {
        &self.config
    }
}

#[async_trait]
impl DriverProvider for ChromiumProvider {
    async fn get_driver(&self, headless: bool) -> SuiteResult<Box<dyn WebDriver>> {
        let config = self.config.clone().headless(headless);
        let driver = ChromiumDriver::launch(&config).await?;
        Ok(Box::new(driver))
    }

    fn name(&self) -> &'static str {
        match self.config.chromium_path {
            Some(_) => "chromium (custom path)",
            None => "chromium",
        }
    }
}
