//! Statement hooks and monitors.
//!
//! Every statement a [`Handle`](crate::Handle) runs passes through its
//! [`Instrumentation`]: hooks see it first and may veto it, then the
//! monitor (once enabled) gets its timing and [`Outcome`].
//!
//! ```rust,ignore
//! use liteorm::{Handle, MonitorConfig, StatsMonitor};
//! use std::sync::Arc;
//!
//! let mut db = Handle::open("app.db")?;
//! let stats = Arc::new(StatsMonitor::new());
//! db.set_monitor_config(MonitorConfig::new().enable_monitoring());
//! db.set_monitor_arc(stats.clone());
//! // ...
//! println!("{} selects", stats.stats().selects);
//! ```

mod config;
mod instrumentation;
mod stats;
mod tracing_hook;
mod types;


pub use config::MonitorConfig;
pub use instrumentation::Instrumentation;
pub use stats::{StatementStats, StatsMonitor};
pub use tracing_hook::TracingSqlHook;
pub use types::{Outcome, StatementContext, StatementHook, StatementKind, StatementMonitor};

/// Cut `sql` to at most `max_bytes` without splitting a character.
pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}
