//! Scenario runner

use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::ProgressReporter;
use shopcheck::{Scenario, SuiteReport, TestFixture};
use std::time::{Duration, Instant};

/// Runs selected scenarios through a fixture and reports progress
#[derive(Debug)]
pub struct SuiteRunner {
    config: CliConfig,
    reporter: ProgressReporter,
}

impl SuiteRunner {
    /// Create a new runner
    #[must_use]
    pub fn new(config: CliConfig) -> Self {
        let reporter =
            ProgressReporter::new(config.color.should_color(), config.verbosity.is_quiet());
        Self { config, reporter }
    }

    /// Run scenarios in order.
    ///
    /// A scenario that fails is recorded and the run continues unless
    /// `fail_fast` is set. A driver that cannot be acquired aborts the run.
    ///
    /// # Errors
    ///
    /// Currently infallible; driver failures are folded into the report.
    pub async fn run(
        &mut self,
        fixture: &TestFixture,
        scenarios: &[Scenario],
        driver: &str,
    ) -> CliResult<SuiteReport> {
        let start = Instant::now();
        let mut report = SuiteReport::new(driver, fixture.config().base_url.clone());

        if scenarios.is_empty() {
            self.reporter.warning("No scenarios selected");
            report.finish(start.elapsed());
            return Ok(report);
        }

        tracing::info!(
            run_id = %report.run_id,
            driver,
            base_url = %report.base_url,
            count = scenarios.len(),
            "Starting suite run"
        );
        self.reporter.header("Running scenarios");
        self.reporter
            .start_progress(scenarios.len() as u64, "Starting...");

        for scenario in scenarios {
            let id = scenario.id();
            self.reporter.set_message(&id);
            tracing::info!(test = scenario.name, "Starting test: {}", scenario.name);

            let result = match fixture.run(scenario.name, scenario.run).await {
                Ok(result) => result,
                Err(e) => {
                    tracing::error!(test = scenario.name, error = %e, "Aborting run");
                    self.reporter.failure(&format!("{id}: {e}"));
                    report.abort(format!("{id}: {e}"));
                    break;
                }
            };
            self.reporter.increment(1);

            let passed = result.outcome.is_passed();
            if passed {
                tracing::info!(test = scenario.name, "Test passed: {}", scenario.name);
                self.reporter
                    .success(&format!("{id} ({}ms)", result.duration.as_millis()));
            } else {
                let reason = result.outcome.reason().unwrap_or("unknown");
                self.reporter.failure(&format!("{id}: {reason}"));
                if let Some(ref shot) = result.screenshot {
                    self.reporter
                        .info(&format!("screenshot: {}", shot.display()));
                }
            }
            report.push(result);

            if !passed && self.config.fail_fast {
                self.reporter.warning("Stopping after first failure");
                break;
            }
        }

        self.reporter.finish();
        report.finish(start.elapsed());

        let skipped = scenarios.len() - report.results.len();
        self.reporter.summary(
            report.passed(),
            report.failed(),
            skipped,
            Duration::from_millis(report.duration_ms),
        );
        tracing::info!(
            run_id = %report.run_id,
            passed = report.passed(),
            failed = report.failed(),
            skipped,
            "Suite run finished"
        );

        Ok(report)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::{ColorChoice, Verbosity};
    use futures::future::BoxFuture;
    use futures::FutureExt;
    use shopcheck::pages::HomePage;
    use shopcheck::{
        scenarios, ArtifactDirs, DriverProvider, MockProvider, Session, SuiteConfig, SuiteError,
        SuiteResult, WebDriver,
    };
    use std::sync::Arc;
    use tempfile::TempDir;

    fn quiet() -> CliConfig {
        CliConfig::new()
            .with_verbosity(Verbosity::Quiet)
            .with_color(ColorChoice::Never)
    }

    fn suite_config(tmp: &TempDir) -> SuiteConfig {
        SuiteConfig::default()
            .with_default_timeout_ms(1_000)
            .with_absence_timeout_ms(100)
            .with_poll_interval_ms(10)
            .with_artifacts(ArtifactDirs::under(tmp.path()))
    }

    fn mock_fixture(config: SuiteConfig) -> TestFixture {
        let provider = MockProvider::new(config.base_url.clone());
        TestFixture::new(Arc::new(provider), Arc::new(config))
    }

    fn badge_is_five(session: &Session) -> BoxFuture<'_, SuiteResult<()>> {
        async move {
            let count = HomePage::attach(session).cart_badge().await?;
            if count == Some(5) {
                Ok(())
            } else {
                Err(SuiteError::assertion(format!("badge was {count:?}")))
            }
        }
        .boxed()
    }

    fn failing(name: &'static str) -> Scenario {
        Scenario {
            suite: "custom",
            name,
            summary: "always fails",
            run: badge_is_five,
        }
    }

    #[derive(Debug)]
    struct NoBrowser;

    #[async_trait::async_trait]
    impl DriverProvider for NoBrowser {
        async fn get_driver(&self, _headless: bool) -> SuiteResult<Box<dyn WebDriver>> {
            Err(SuiteError::environment("no browser here"))
        }

        fn name(&self) -> &'static str {
            "none"
        }
    }

    mod suite_runner_tests {
        use super::*;

        #[tokio::test]
        async fn test_login_suite_passes() {
            let tmp = TempDir::new().unwrap();
            let fixture = mock_fixture(suite_config(&tmp));
            let selected = scenarios::select(Some("login::"));
            let report = SuiteRunner::new(quiet())
                .run(&fixture, &selected, "mock")
                .await
                .unwrap();
            assert_eq!(report.results.len(), selected.len());
            assert!(report.success());
            assert_eq!(report.driver, "mock");
        }

        #[tokio::test]
        async fn test_failure_continues_without_fail_fast() {
            let tmp = TempDir::new().unwrap();
            let fixture = mock_fixture(suite_config(&tmp));
            let selected = [failing("first_broken"), failing("second_broken")];
            let report = SuiteRunner::new(quiet())
                .run(&fixture, &selected, "mock")
                .await
                .unwrap();
            assert_eq!(report.failed(), 2);
            assert!(report.results.iter().all(|r| r.screenshot.is_some()));
        }

        #[tokio::test]
        async fn test_fail_fast_stops_after_first_failure() {
            let tmp = TempDir::new().unwrap();
            let fixture = mock_fixture(suite_config(&tmp));
            let selected = [failing("broken"), failing("never_run")];
            let report = SuiteRunner::new(quiet().with_fail_fast(true))
                .run(&fixture, &selected, "mock")
                .await
                .unwrap();
            assert_eq!(report.results.len(), 1);
            assert_eq!(report.results[0].name, "broken");
            assert!(!report.success());
        }

        #[tokio::test]
        async fn test_driver_failure_aborts() {
            let tmp = TempDir::new().unwrap();
            let fixture = TestFixture::new(Arc::new(NoBrowser), Arc::new(suite_config(&tmp)));
            let selected = scenarios::select(Some("login::"));
            let report = SuiteRunner::new(quiet())
                .run(&fixture, &selected, "none")
                .await
                .unwrap();
            assert!(report.results.is_empty());
            let reason = report.aborted.as_deref().unwrap();
            assert!(reason.contains("no browser here"));
            assert!(!report.success());
        }

        #[tokio::test]
        async fn test_empty_selection() {
            let tmp = TempDir::new().unwrap();
            let fixture = mock_fixture(suite_config(&tmp));
            let report = SuiteRunner::new(quiet())
                .run(&fixture, &[], "mock")
                .await
                .unwrap();
            assert!(report.results.is_empty());
            assert!(report.success());
        }
    }
}
