//! Explicit waits.
//!
//! Every element query polls the driver until a [`WaitCondition`] holds or the
//! [`WaitPolicy`] window expires. A single expiry is final; nothing retries a
//! timed-out wait.

use crate::driver::{ElementHandle, WebDriver};
use crate::locator::Locator;
use crate::result::{SuiteError, SuiteResult};
use std::fmt;
use std::time::{Duration, Instant};

/// Default lookup timeout (10 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Timeout for checks where absence is an expected outcome (5 seconds)
pub const ABSENCE_TIMEOUT_MS: u64 = 5_000;

/// Default polling interval (500ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

/// State an element must reach before a wait succeeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WaitCondition {
    /// Attached to the DOM
    Present,
    /// Present and displayed
    Visible,
    /// Displayed and enabled
    Clickable,
}

impl WaitCondition {
    /// Name used in timeout messages
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Visible => "visible",
            Self::Clickable => "clickable",
        }
    }

    /// Whether an element snapshot satisfies this condition
    #[must_use]
    pub const fn matches(&self, element: &ElementHandle) -> bool {
        match self {
            Self::Present => true,
            Self::Visible => element.displayed,
            Self::Clickable => element.is_clickable(),
        }
    }
}

impl fmt::Display for WaitCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Timeout and poll interval for one query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    /// Total wait window
    pub timeout: Duration,
    /// Delay between polls
    pub poll_interval: Duration,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

impl WaitPolicy {
    /// Create a policy with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Policy from millisecond values
    #[must_use]
    pub const fn from_millis(timeout_ms: u64, poll_interval_ms: u64) -> Self {
        Self {
            timeout: Duration::from_millis(timeout_ms),
            poll_interval: Duration::from_millis(poll_interval_ms),
        }
    }

    /// Same poll interval, different window
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set polling interval
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

/// Poll until at least one match satisfies `condition`.
///
/// Returns the satisfying matches in document order. The driver is queried at
/// least once, even with a zero timeout.
///
/// # Errors
///
/// [`SuiteError::LookupTimeout`] when the window expires; driver errors are
/// returned as-is.
pub async fn wait_for_all(
    driver: &dyn WebDriver,
    locator: &Locator,
    condition: WaitCondition,
    policy: WaitPolicy,
) -> SuiteResult<Vec<ElementHandle>> {
    let start = Instant::now();
    loop {
        let matched: Vec<ElementHandle> = driver
            .find_all(locator)
            .await?
            .into_iter()
            .filter(|e| condition.matches(e))
            .collect();
        if !matched.is_empty() {
            return Ok(matched);
        }

        let elapsed = start.elapsed();
        if elapsed >= policy.timeout {
            tracing::debug!(%locator, %condition, elapsed_ms = elapsed.as_millis() as u64, "wait expired");
            return Err(SuiteError::LookupTimeout {
                locator: locator.to_string(),
                condition: condition.to_string(),
                timeout: policy.timeout,
            });
        }
        tokio::time::sleep(policy.poll_interval.min(policy.timeout - elapsed)).await;
    }
}

/// Poll until the first match satisfies `condition`.
///
/// # Errors
///
/// See [`wait_for_all`].
pub async fn wait_for(
    driver: &dyn WebDriver,
    locator: &Locator,
    condition: WaitCondition,
    policy: WaitPolicy,
) -> SuiteResult<ElementHandle> {
    let mut matched = wait_for_all(driver, locator, condition, policy).await?;
    // wait_for_all never returns an empty list
    Ok(matched.swap_remove(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{MockDriver, MockElement};

    const BADGE: Locator = Locator::class_name("shopping_cart_badge");

    fn quick() -> WaitPolicy {
        WaitPolicy::from_millis(200, 20)
    }

    mod policy_tests {
        use super::*;

        #[test]
        fn test_default_policy() {
            let policy = WaitPolicy::default();
            assert_eq!(policy.timeout, Duration::from_secs(10));
            assert_eq!(policy.poll_interval, Duration::from_millis(500));
        }

        #[test]
        fn test_with_timeout_keeps_poll() {
            let policy = WaitPolicy::default().with_timeout(Duration::from_secs(5));
            assert_eq!(policy.timeout, Duration::from_secs(5));
            assert_eq!(policy.poll_interval, Duration::from_millis(500));
        }

        #[test]
        fn test_condition_names() {
            assert_eq!(WaitCondition::Present.to_string(), "present");
            assert_eq!(WaitCondition::Visible.to_string(), "visible");
            assert_eq!(WaitCondition::Clickable.to_string(), "clickable");
        }
    }

    mod wait_for_tests {
        use super::*;

        #[tokio::test]
        async fn test_immediate_match() {
            let driver = MockDriver::new().with_element(BADGE, "1");
            let found = wait_for(&driver, &BADGE, WaitCondition::Visible, quick())
                .await
                .unwrap();
            assert_eq!(found.text, "1");
        }

        #[tokio::test]
        async fn test_delayed_match_within_window() {
            let driver = MockDriver::new();
            driver.add_element(BADGE, MockElement::new("2").after(Duration::from_millis(60)));
            let found = wait_for(&driver, &BADGE, WaitCondition::Present, quick())
                .await
                .unwrap();
            assert_eq!(found.text, "2");
        }

        #[tokio::test]
        async fn test_timeout_when_absent() {
            let driver = MockDriver::new();
            let start = Instant::now();
            let err = wait_for(&driver, &BADGE, WaitCondition::Present, quick())
                .await
                .unwrap_err();
            assert!(err.is_timeout());
            assert!(start.elapsed() >= Duration::from_millis(200));
            assert!(start.elapsed() < Duration::from_secs(2));
        }

        #[tokio::test]
        async fn test_hidden_is_present_but_not_visible() {
            let driver = MockDriver::new();
            driver.add_element(BADGE, MockElement::new("1").hidden());
            assert!(wait_for(&driver, &BADGE, WaitCondition::Present, quick())
                .await
                .is_ok());
            let err = wait_for(&driver, &BADGE, WaitCondition::Visible, quick())
                .await
                .unwrap_err();
            assert!(err.to_string().contains("visible"));
        }

        #[tokio::test]
        async fn test_disabled_is_not_clickable() {
            let driver = MockDriver::new();
            driver.add_element(BADGE, MockElement::new("1").disabled());
            let err = wait_for(&driver, &BADGE, WaitCondition::Clickable, quick())
                .await
                .unwrap_err();
            assert!(err.is_timeout());
        }

        #[tokio::test]
        async fn test_zero_timeout_still_polls_once() {
            let driver = MockDriver::new().with_element(BADGE, "3");
            let policy = WaitPolicy::from_millis(0, 20);
            assert!(wait_for(&driver, &BADGE, WaitCondition::Present, policy)
                .await
                .is_ok());
        }

        #[tokio::test]
        async fn test_wait_for_all_filters_by_condition() {
            let items = Locator::class_name("cart_item");
            let driver = MockDriver::new();
            driver.add_element(items.clone(), MockElement::new("a"));
            driver.add_element(items.clone(), MockElement::new("b").hidden());
            driver.add_element(items.clone(), MockElement::new("c"));
            let visible = wait_for_all(&driver, &items, WaitCondition::Visible, quick())
                .await
                .unwrap();
            let texts: Vec<_> = visible.iter().map(|e| e.text.as_str()).collect();
            assert_eq!(texts, vec!["a", "c"]);
        }
    }
}
