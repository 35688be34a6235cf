//! Per-test lifecycle.
//!
//! ```text
//! Created -> DriverAcquired -> TestBodyRunning -> {Passed | Failed}
//!         -> TeardownScreenshotIfFailed -> DriverReleased -> Done
//! ```
//!
//! The body runs inside a wrapper that turns its result (or panic) into an
//! explicit [`TestOutcome`]. Teardown consumes that outcome: a failure gets
//! exactly one `FAILED_<test>_<timestamp>.png` before the driver is released,
//! a pass gets none. The driver is quit on both paths.

use crate::config::SuiteConfig;
use crate::driver::DriverProvider;
use crate::result::SuiteResult;
use crate::session::Session;
use futures::future::BoxFuture;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Points a test passes through, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    /// Fixture constructed
    Created,
    /// Browser session started
    DriverAcquired,
    /// Test body executing
    TestBodyRunning,
    /// Body returned `Ok`
    Passed,
    /// Body returned an error or panicked
    Failed,
    /// Failure screenshot step (no-op after a pass)
    TeardownScreenshotIfFailed,
    /// Browser session quit
    DriverReleased,
    /// Lifecycle finished
    Done,
}

/// Result of one test body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TestOutcome {
    /// Every expectation held
    Passed,
    /// An error was returned or the body panicked
    Failed {
        /// What went wrong
        reason: String,
    },
}

impl TestOutcome {
    /// Check if passed
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Failure reason, if any
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Passed => None,
            Self::Failed { reason } => Some(reason),
        }
    }
}

/// Record of one executed test
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestReport {
    /// Test name
    pub name: String,
    /// Pass or fail
    pub outcome: TestOutcome,
    /// Wall time from driver request to release
    #[serde(with = "duration_ms")]
    pub duration: Duration,
    /// Failure screenshot, if one was written
    pub screenshot: Option<PathBuf>,
    /// Lifecycle states visited
    pub states: Vec<LifecycleState>,
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

/// Acquires a session per test and guarantees teardown
#[derive(Clone)]
pub struct TestFixture {
    provider: Arc<dyn DriverProvider>,
    config: Arc<SuiteConfig>,
}

impl fmt::Debug for TestFixture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestFixture")
            .field("provider", &self.provider.name())
            .field("base_url", &self.config.base_url)
            .finish()
    }
}

impl TestFixture {
    /// Create a fixture over a driver provider
    #[must_use]
    pub fn new(provider: Arc<dyn DriverProvider>, config: Arc<SuiteConfig>) -> Self {
        Self { provider, config }
    }

    /// Suite configuration
    #[must_use]
    pub fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// Run one test body through the full lifecycle.
    ///
    /// # Errors
    ///
    /// Only when the driver cannot be acquired. A failing body is reported in
    /// the returned [`TestReport`], not as an error.
    pub async fn run<F>(&self, name: &str, body: F) -> SuiteResult<TestReport>
    where
        F: for<'s> FnOnce(&'s Session) -> BoxFuture<'s, SuiteResult<()>>,
    {
        let start = Instant::now();
        let mut states = vec![LifecycleState::Created];

        tracing::info!(test = name, "Initializing driver for test: {name}");
        let driver = match self.provider.get_driver(self.config.headless).await {
            Ok(driver) => driver,
            Err(e) => {
                tracing::error!(test = name, error = %e, "Driver setup failed");
                return Err(e);
            }
        };
        let session = Session::new(driver, Arc::clone(&self.config), name);
        states.push(LifecycleState::DriverAcquired);

        states.push(LifecycleState::TestBodyRunning);
        let outcome = execute(&session, body).await;
        states.push(if outcome.is_passed() {
            LifecycleState::Passed
        } else {
            LifecycleState::Failed
        });

        states.push(LifecycleState::TeardownScreenshotIfFailed);
        let screenshot = capture_failure(&session, &outcome).await;

        tracing::info!(test = name, "Closing driver for test: {name}");
        if let Err(e) = session.into_driver().quit().await {
            tracing::warn!(test = name, error = %e, "Driver quit failed");
        }
        states.push(LifecycleState::DriverReleased);
        states.push(LifecycleState::Done);

        Ok(TestReport {
            name: name.to_string(),
            outcome,
            duration: start.elapsed(),
            screenshot,
            states,
        })
    }
}

/// Run the body and fold its result or panic into an outcome
async fn execute<F>(session: &Session, body: F) -> TestOutcome
where
    F: for<'s> FnOnce(&'s Session) -> BoxFuture<'s, SuiteResult<()>>,
{
    let run = AssertUnwindSafe(async move { body(session).await });
    match run.catch_unwind().await {
        Ok(Ok(())) => TestOutcome::Passed,
        Ok(Err(e)) => TestOutcome::Failed {
            reason: e.to_string(),
        },
        Err(panic) => TestOutcome::Failed {
            reason: format!("panicked: {}", panic_message(panic.as_ref())),
        },
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

async fn capture_failure(session: &Session, outcome: &TestOutcome) -> Option<PathBuf> {
    let TestOutcome::Failed { reason } = outcome else {
        return None;
    };
    let name = session.test_name();
    tracing::error!(test = name, %reason, "Test failed: {name}");
    match session
        .base_page()
        .take_screenshot(&format!("FAILED_{name}"))
        .await
    {
        Ok(path) => Some(path),
        Err(e) => {
            tracing::error!(test = name, error = %e, "Failed to capture screenshot");
            None
        }
    }
}
