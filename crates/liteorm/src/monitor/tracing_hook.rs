use super::truncate_sql_bytes;
use super::types::{Outcome, StatementContext, StatementHook};
use std::time::Duration;

/// Logs each statement to `tracing` under the `liteorm.sql` target.
///
/// Statements go out at `DEBUG` before they run and failures at `WARN`
/// after. Installed by `HandleConfig::log_sql`.
#[derive(Debug, Clone)]
pub struct TracingSqlHook {
    /// Byte limit for logged SQL. `None` logs it whole.
    pub max_sql_len: Option<usize>,
}

impl Default for TracingSqlHook {
    fn default() -> Self {
        Self {
            max_sql_len: Some(200),
        }
    }
}

impl TracingSqlHook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_sql_len(mut self, len: Option<usize>) -> Self {
        self.max_sql_len = len;
        self
    }

    fn shown<'a>(&self, sql: &'a str) -> std::borrow::Cow<'a, str> {
        match self.max_sql_len {
            Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)).into(),
            _ => sql.into(),
        }
    }
}

impl StatementHook for TracingSqlHook {
    fn before(&self, ctx: &StatementContext) -> Result<(), String> {
        tracing::debug!(
            target: "liteorm.sql",
            kind = ?ctx.kind,
            tag = ctx.label(),
            fields = ?ctx.fields,
            params = ctx.param_count,
            sql = %self.shown(&ctx.sql),
        );
        Ok(())
    }

    fn after(&self, ctx: &StatementContext, elapsed: Duration, outcome: &Outcome) {
        if let Outcome::Failed(message) = outcome {
            tracing::warn!(
                target: "liteorm.sql",
                tag = ctx.label(),
                ?elapsed,
                error = %message,
                sql = %self.shown(&ctx.sql),
                "statement failed"
            );
        }
    }
}
