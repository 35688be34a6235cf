//! Run artifact directories and timestamped file names.

use crate::result::SuiteResult;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// `strftime` pattern shared by every artifact file name
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Local time formatted for artifact names
#[must_use]
pub fn timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// `<label>_<YYYYMMDD_HHMMSS>.<ext>`
#[must_use]
pub fn timestamped_name(label: &str, ext: &str) -> String {
    format!("{label}_{}.{ext}", timestamp())
}

/// Where reports, screenshots and logs are written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactDirs {
    /// JSON run reports
    pub reports: PathBuf,
    /// Screenshots, including failure captures
    pub screenshots: PathBuf,
    /// Execution logs
    pub logs: PathBuf,
}

impl Default for ArtifactDirs {
    fn default() -> Self {
        Self {
            reports: PathBuf::from("reports"),
            screenshots: PathBuf::from("screenshots"),
            logs: PathBuf::from("logs"),
        }
    }
}

impl ArtifactDirs {
    /// Default layout rooted at `root`
    #[must_use]
    pub fn under(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            reports: root.join("reports"),
            screenshots: root.join("screenshots"),
            logs: root.join("logs"),
        }
    }

    /// Create any missing directory. Returns the ones that were created.
    pub fn ensure(&self) -> SuiteResult<Vec<PathBuf>> {
        let mut created = Vec::new();
        for dir in [&self.reports, &self.screenshots, &self.logs] {
            if !dir.exists() {
                std::fs::create_dir_all(dir)?;
                tracing::info!(directory = %dir.display(), "Created directory");
                created.push(dir.clone());
            }
        }
        Ok(created)
    }
}
