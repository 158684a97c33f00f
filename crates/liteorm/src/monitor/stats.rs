use super::types::{Outcome, StatementContext, StatementKind, StatementMonitor};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Counters kept by [`StatsMonitor`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatementStats {
    pub total: u64,
    pub failed: u64,
    pub selects: u64,
    pub inserts: u64,
    pub updates: u64,
    pub deletes: u64,
    /// CREATE, DROP and ALTER statements.
    pub schema_changes: u64,
    pub total_time: Duration,
    /// The longest statement seen and how long it took.
    pub slowest: Option<(Duration, String)>,
}

impl StatementStats {
    pub fn average_time(&self) -> Duration {
        match u32::try_from(self.total) {
            Ok(0) => Duration::ZERO,
            Ok(n) => self.total_time / n,
            Err(_) => Duration::ZERO,
        }
    }

    fn record(&mut self, ctx: &StatementContext, elapsed: Duration, outcome: &Outcome) {
        self.total += 1;
        self.total_time = self.total_time.saturating_add(elapsed);
        if outcome.is_failure() {
            self.failed += 1;
        }

        match ctx.kind {
            StatementKind::Select => self.selects += 1,
            StatementKind::Insert => self.inserts += 1,
            StatementKind::Update => self.updates += 1,
            StatementKind::Delete => self.deletes += 1,
            StatementKind::Schema => self.schema_changes += 1,
            StatementKind::Pragma | StatementKind::Other => {}
        }

        if self.slowest.as_ref().is_none_or(|(max, _)| elapsed > *max) {
            self.slowest = Some((elapsed, ctx.sql.clone()));
        }
    }
}

/// Tallies statements per kind. Share it through an `Arc` to read the
/// numbers while the handle keeps reporting.
#[derive(Debug, Default)]
pub struct StatsMonitor {
    inner: Mutex<StatementStats>,
}

impl StatsMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// A snapshot of the counters.
    pub fn stats(&self) -> StatementStats {
        self.lock().clone()
    }

    pub fn reset(&self) {
        *self.lock() = StatementStats::default();
    }

    fn lock(&self) -> MutexGuard<'_, StatementStats> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StatementMonitor for StatsMonitor {
    fn on_complete(&self, ctx: &StatementContext, elapsed: Duration, outcome: &Outcome) {
        self.lock().record(ctx, elapsed, outcome);
    }
}
