//! Environment-driven runtime configuration.
//!
//! | Variable | Default |
//! |---|---|
//! | `TONGUETAG_DB_PATH` | `<temp dir>/tonguetag.sqlite3` |
//! | `TONGUETAG_LOG_LEVEL` | `debug` (debug builds) / `info` (release) |
//! | `TONGUETAG_LOG_DIR` | unset: file logging disabled |
//!
//! Blank values are treated as unset.

use crate::logging::{default_log_level, init_logging, normalize_level, LoggingError};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "TONGUETAG_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "TONGUETAG_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "TONGUETAG_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "tonguetag.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    /// Normalized level name.
    pub log_level: &'static str,
    pub log_dir: Option<PathBuf>,
}

impl CoreConfig {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Result<Self, LoggingError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, LoggingError> {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db_path = non_blank(ENV_DB_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));
        let log_level = match non_blank(ENV_LOG_LEVEL) {
            Some(level) => normalize_level(&level)?,
            None => default_log_level(),
        };
        let log_dir = non_blank(ENV_LOG_DIR).map(PathBuf::from);

        Ok(Self {
            db_path,
            log_level,
            log_dir,
        })
    }

    /// Starts file logging when a log directory is configured.
    ///
    /// Returns `Ok(false)` when logging stays disabled.
    pub fn init_logging(&self) -> Result<bool, LoggingError> {
        match self.log_dir.as_deref() {
            Some(dir) => init_logging(self.log_level, dir).map(|()| true),
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CoreConfig, ENV_DB_PATH, ENV_LOG_DIR, ENV_LOG_LEVEL};
    use crate::logging::{default_log_level, LoggingError};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn config_from(pairs: &[(&str, &str)]) -> Result<CoreConfig, LoggingError> {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        CoreConfig::from_lookup(|key| values.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset_or_blank() {
        let config = config_from(&[(ENV_DB_PATH, "  "), (ENV_LOG_DIR, "")]).unwrap();
        assert!(config.db_path.ends_with("tonguetag.sqlite3"));
        assert_eq!(config.log_level, default_log_level());
        assert_eq!(config.log_dir, None);
        assert!(!config.init_logging().unwrap());
    }

    #[test]
    fn explicit_values_are_trimmed_and_normalized() {
        let config = config_from(&[
            (ENV_DB_PATH, " /var/lib/tonguetag/data.sqlite3 "),
            (ENV_LOG_LEVEL, "WARNING"),
            (ENV_LOG_DIR, "/var/log/tonguetag"),
        ])
        .unwrap();
        assert_eq!(
            config.db_path,
            PathBuf::from("/var/lib/tonguetag/data.sqlite3")
        );
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/tonguetag")));
    }

    #[test]
    fn unknown_level_is_rejected() {
        let err = config_from(&[(ENV_LOG_LEVEL, "loud")]).unwrap_err();
        assert_eq!(err, LoggingError::UnsupportedLevel("loud".to_string()));
    }
}
