use super::config::MonitorConfig;
use super::types::{Outcome, StatementContext, StatementHook, StatementMonitor};
use crate::error::{OrmError, OrmResult};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// The hooks, monitor and settings a handle applies around each statement.
#[derive(Clone, Default)]
pub struct Instrumentation {
    config: MonitorConfig,
    monitor: Option<Arc<dyn StatementMonitor>>,
    hooks: Vec<Arc<dyn StatementHook>>,
}

impl fmt::Debug for Instrumentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instrumentation")
            .field("config", &self.config)
            .field("has_monitor", &self.monitor.is_some())
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

impl Instrumentation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: MonitorConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the monitor.
    pub fn with_monitor<M: StatementMonitor + 'static>(self, monitor: M) -> Self {
        self.with_monitor_arc(Arc::new(monitor))
    }

    pub fn with_monitor_arc(mut self, monitor: Arc<dyn StatementMonitor>) -> Self {
        self.monitor = Some(monitor);
        self
    }

    /// Append a hook. Hooks run in the order they were added.
    pub fn add_hook<H: StatementHook + 'static>(self, hook: H) -> Self {
        self.add_hook_arc(Arc::new(hook))
    }

    pub fn add_hook_arc(mut self, hook: Arc<dyn StatementHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut MonitorConfig {
        &mut self.config
    }

    /// Ask every hook, then tell the monitor the statement is starting.
    /// The first veto becomes a validation error.
    pub(crate) fn begin(&self, ctx: &StatementContext) -> OrmResult<()> {
        for hook in &self.hooks {
            hook.before(ctx).map_err(|reason| {
                let err = OrmError::validation(format!("statement aborted by hook: {reason}"));
                tracing::warn!(
                    target: "liteorm",
                    tag = ctx.label(),
                    error = %err,
                    "statement vetoed"
                );
                err
            })?;
        }
        if let Some(monitor) = self.active_monitor() {
            monitor.on_start(ctx);
        }
        Ok(())
    }

    pub(crate) fn finish(&self, ctx: &StatementContext, elapsed: Duration, outcome: &Outcome) {
        for hook in &self.hooks {
            hook.after(ctx, elapsed, outcome);
        }
        let Some(monitor) = self.active_monitor() else {
            return;
        };
        monitor.on_complete(ctx, elapsed, outcome);
        if self.config.is_slow(elapsed) {
            monitor.on_slow(ctx, elapsed);
        }
    }

    fn active_monitor(&self) -> Option<&Arc<dyn StatementMonitor>> {
        self.monitor
            .as_ref()
            .filter(|_| self.config.monitoring_enabled)
    }
}
