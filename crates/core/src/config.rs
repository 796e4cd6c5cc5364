//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services as an
//! `Arc<CoreConfig>`. Request handling never reads process-wide environment variables, which
//! keeps behaviour consistent across threads and test harnesses.

use crate::constants::{DEFAULT_BUSY_TIMEOUT_MS, DEFAULT_DATABASE_PATH};
use crate::{EmrError, EmrResult};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    database_path: PathBuf,
    busy_timeout: Duration,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `EmrError::InvalidInput` if `database_path` is empty or names an existing
    /// directory.
    pub fn new(database_path: PathBuf, busy_timeout: Duration) -> EmrResult<Self> {
        if database_path.as_os_str().is_empty() {
            return Err(EmrError::InvalidInput(
                "database path cannot be empty".into(),
            ));
        }
        if database_path.is_dir() {
            return Err(EmrError::InvalidInput(format!(
                "database path {} is a directory",
                database_path.display()
            )));
        }

        Ok(Self {
            database_path,
            busy_timeout,
        })
    }

    pub fn database_path(&self) -> &Path {
        &self.database_path
    }

    pub fn busy_timeout(&self) -> Duration {
        self.busy_timeout
    }
}

/// Resolve the database path from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_DATABASE_PATH`].
pub fn database_path_from_env_value(value: Option<String>) -> PathBuf {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH))
}

/// Parse the SQLite busy timeout (milliseconds) from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default timeout.
pub fn busy_timeout_from_env_value(value: Option<String>) -> EmrResult<Duration> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    match value {
        None => Ok(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS)),
        Some(v) => v.parse::<u64>().map(Duration::from_millis).map_err(|_| {
            EmrError::InvalidInput(format!(
                "busy timeout must be a whole number of milliseconds, got {v:?}"
            ))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_path_falls_back_to_default_for_blank_values() {
        assert_eq!(
            database_path_from_env_value(None),
            PathBuf::from(DEFAULT_DATABASE_PATH)
        );
        assert_eq!(
            database_path_from_env_value(Some("   ".into())),
            PathBuf::from(DEFAULT_DATABASE_PATH)
        );
        assert_eq!(
            database_path_from_env_value(Some(" /var/lib/emr/emr.db ".into())),
            PathBuf::from("/var/lib/emr/emr.db")
        );
    }

    #[test]
    fn busy_timeout_parses_milliseconds() {
        assert_eq!(
            busy_timeout_from_env_value(None).unwrap(),
            Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS)
        );
        assert_eq!(
            busy_timeout_from_env_value(Some("250".into())).unwrap(),
            Duration::from_millis(250)
        );
        let err = busy_timeout_from_env_value(Some("soon".into())).unwrap_err();
        assert!(matches!(err, EmrError::InvalidInput(msg) if msg.contains("milliseconds")));
    }

    #[test]
    fn new_rejects_directories() {
        let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let err = CoreConfig::new(dir.path().to_path_buf(), Duration::from_secs(1))
            .expect_err("directory should be rejected");
        assert!(matches!(err, EmrError::InvalidInput(msg) if msg.contains("is a directory")));
    }
}
