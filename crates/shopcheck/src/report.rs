//! Run-level JSON report.

use crate::artifacts::timestamped_name;
use crate::fixture::TestReport;
use crate::result::SuiteResult;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use uuid::Uuid;

/// Results of one suite run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Unique id of this run
    pub run_id: Uuid,
    /// When the run began
    pub started_at: DateTime<Local>,
    /// Driver provider name
    pub driver: String,
    /// Storefront under test
    pub base_url: String,
    /// Wall time of the whole run in milliseconds
    pub duration_ms: u64,
    /// Why the run stopped early, if it did
    pub aborted: Option<String>,
    /// Per-test records, in execution order
    pub results: Vec<TestReport>,
}

impl SuiteReport {
    /// Empty report stamped with a fresh run id
    #[must_use]
    pub fn new(driver: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Local::now(),
            driver: driver.into(),
            base_url: base_url.into(),
            duration_ms: 0,
            aborted: None,
            results: Vec::new(),
        }
    }

    /// Append a test record
    pub fn push(&mut self, report: TestReport) {
        self.results.push(report);
    }

    /// Mark the run as stopped early
    pub fn abort(&mut self, reason: impl Into<String>) {
        self.aborted = Some(reason.into());
    }

    /// Record the total wall time
    pub fn finish(&mut self, elapsed: Duration) {
        self.duration_ms = elapsed.as_millis() as u64;
    }

    /// Number of passed tests
    #[must_use]
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_passed()).count()
    }

    /// Number of failed tests
    #[must_use]
    pub fn failed(&self) -> usize {
        self.results.len() - self.passed()
    }

    /// Every test passed and the run was not aborted
    #[must_use]
    pub fn success(&self) -> bool {
        self.aborted.is_none() && self.failed() == 0
    }

    /// Failed test records
    pub fn failures(&self) -> impl Iterator<Item = &TestReport> {
        self.results.iter().filter(|r| !r.outcome.is_passed())
    }

    /// Write `report_<timestamp>.json` into `dir` and return its path
    pub fn write_json(&self, dir: &Path) -> SuiteResult<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(timestamped_name("report", "json"));
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;
        tracing::info!(
            path = %path.display(),
            passed = self.passed(),
            failed = self.failed(),
            "Report written"
        );
        Ok(path)
    }
}
