//! Handle configuration.

use crate::monitor::MonitorConfig;
use serde::Deserialize;
use std::path::PathBuf;

/// Database file used when no path is given.
pub const DEFAULT_DB_PATH: &str = "test.db";

/// Settings for opening a [`Handle`](crate::Handle).
///
/// Every field has a default, so a partial TOML/JSON document deserializes.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HandleConfig {
    /// Path of the database file.
    pub path: PathBuf,
    /// Echo every extracted row of every collecting query to stdout.
    pub verbose: bool,
    /// Query monitoring settings.
    pub monitor: MonitorConfig,
    /// Emit every statement through `tracing` (target `liteorm.sql`).
    pub log_sql: bool,
}

impl Default for HandleConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DB_PATH),
            verbose: false,
            monitor: MonitorConfig::default(),
            log_sql: false,
        }
    }
}

impl HandleConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn monitor(mut self, monitor: MonitorConfig) -> Self {
        self.monitor = monitor;
        self
    }

    pub fn log_sql(mut self, log_sql: bool) -> Self {
        self.log_sql = log_sql;
        self
    }
}
