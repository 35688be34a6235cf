//! Process-wide log setup.
//!
//! Call [`init`] once at start-up. It installs a `tracing` subscriber that
//! writes every event to stderr and to `logs/test_execution_<timestamp>.log`,
//! both with the line layout `YYYY-mm-dd HH:MM:SS LEVEL target: message`.
//! The level comes from `RUST_LOG` when set, otherwise from [`LogConfig`].

use crate::artifacts::timestamped_name;
use crate::result::SuiteResult;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Timestamp layout of each log line
pub const LOG_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

struct LocalTime;

impl FormatTime for LocalTime {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format(LOG_TIME_FORMAT))
    }
}

/// Where and how verbosely to log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Directory for the log file
    pub dir: PathBuf,
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
    /// Also write to stderr
    pub stderr: bool,
    /// Write the log file
    pub file: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("logs"),
            level: "info".to_string(),
            stderr: true,
            file: true,
        }
    }
}

impl LogConfig {
    /// Log file in `dir`
    #[must_use]
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ..Self::default()
        }
    }

    /// Set the fallback filter directive
    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// Enable or disable stderr output
    #[must_use]
    pub const fn with_stderr(mut self, stderr: bool) -> Self {
        self.stderr = stderr;
        self
    }

    /// Enable or disable the log file
    #[must_use]
    pub const fn with_file(mut self, file: bool) -> Self {
        self.file = file;
        self
    }
}

/// Handle returned by [`init`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSession {
    path: Option<PathBuf>,
    installed: bool,
}

impl LogSession {
    /// Log file of this run, if file logging is on
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// False when another subscriber was already installed
    #[must_use]
    pub const fn installed(&self) -> bool {
        self.installed
    }
}

/// Install the global subscriber.
///
/// A second call leaves the first subscriber in place and reports
/// `installed() == false`.
pub fn init(config: &LogConfig) -> SuiteResult<LogSession> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let (file_layer, path) = if config.file {
        std::fs::create_dir_all(&config.dir)?;
        let path = config.dir.join(timestamped_name("test_execution", "log"));
        let file = File::create(&path)?;
        let layer = fmt::layer()
            .with_ansi(false)
            .with_timer(LocalTime)
            .with_writer(Mutex::new(file));
        (Some(layer), Some(path))
    } else {
        (None, None)
    };

    let stderr_layer = config.stderr.then(|| {
        fmt::layer()
            .with_timer(LocalTime)
            .with_writer(std::io::stderr)
    });

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .is_ok();

    if installed {
        if let Some(ref path) = path {
            tracing::info!(file = %path.display(), "Logging initialized");
        }
    }
    Ok(LogSession { path, installed })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert_eq!(config.dir, PathBuf::from("logs"));
        assert_eq!(config.level, "info");
        assert!(config.stderr && config.file);
    }

    #[test]
    fn test_init_creates_log_file() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("logs");
        let session = init(&LogConfig::in_dir(&dir).with_stderr(false)).unwrap();
        let path = session.path().unwrap();
        assert!(path.exists());
        assert!(path.starts_with(&dir));
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("test_execution_"));
        assert!(name.ends_with(".log"));
    }

    #[test]
    fn test_second_init_is_tolerated() {
        let config = LogConfig::default().with_file(false).with_stderr(false);
        let _ = init(&config).unwrap();
        let again = init(&config).unwrap();
        assert!(!again.installed());
        assert!(again.path().is_none());
    }

    #[test]
    fn test_time_format() {
        let stamp = chrono::Local::now().format(LOG_TIME_FORMAT).to_string();
        assert_eq!(stamp.len(), 19);
        assert_eq!(&stamp[10..11], " ");
    }
}
