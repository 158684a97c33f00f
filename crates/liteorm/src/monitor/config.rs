use serde::{Deserialize, Deserializer};
use std::time::Duration;

/// Monitoring switches, read from `[monitor]` as `enabled` and `slow_query_ms`.
///
/// Off by default: hooks still run, monitors hear nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    #[serde(rename = "enabled")]
    pub monitoring_enabled: bool,
    #[serde(rename = "slow_query_ms", deserialize_with = "from_millis")]
    pub slow_query_threshold: Option<Duration>,
}

impl MonitorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enable_monitoring(mut self) -> Self {
        self.monitoring_enabled = true;
        self
    }

    pub fn disable_monitoring(mut self) -> Self {
        self.monitoring_enabled = false;
        self
    }

    /// Statements taking longer than `threshold` also reach `on_slow`.
    pub fn with_slow_query_threshold(mut self, threshold: Duration) -> Self {
        self.slow_query_threshold = Some(threshold);
        self
    }

    pub(crate) fn is_slow(&self, elapsed: Duration) -> bool {
        self.slow_query_threshold.is_some_and(|limit| elapsed > limit)
    }
}

fn from_millis<'de, D: Deserializer<'de>>(de: D) -> Result<Option<Duration>, D::Error> {
    Ok(Option::<u64>::deserialize(de)?.map(Duration::from_millis))
}
