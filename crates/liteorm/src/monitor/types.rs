use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// What kind of SQLite statement is running, read from its leading keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
    /// `CREATE`, `DROP` or `ALTER`.
    Schema,
    /// Catalog lookups (`PRAGMA table_info`).
    Pragma,
    Other,
}

impl StatementKind {
    pub fn of(sql: &str) -> Self {
        let word = sql
            .trim_start_matches(|c: char| c.is_whitespace() || c == '(')
            .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .next()
            .unwrap_or_default()
            .to_ascii_uppercase();

        match word.as_str() {
            "SELECT" | "WITH" | "VALUES" => Self::Select,
            "INSERT" | "REPLACE" => Self::Insert,
            "UPDATE" => Self::Update,
            "DELETE" => Self::Delete,
            "CREATE" | "DROP" | "ALTER" => Self::Schema,
            "PRAGMA" => Self::Pragma,
            _ => Self::Other,
        }
    }

    /// Statements whose effect `sqlite3_changes` reports.
    pub fn changes_rows(self) -> bool {
        matches!(self, Self::Insert | Self::Update | Self::Delete)
    }
}

/// One statement on its way to the engine.
#[derive(Debug, Clone)]
pub struct StatementContext {
    pub sql: String,
    pub kind: StatementKind,
    /// Values bound to `?N` placeholders.
    pub param_count: usize,
    /// The handle operation that issued the statement, e.g. `"insert"`.
    pub tag: Option<String>,
    pub fields: BTreeMap<String, String>,
}

impl StatementContext {
    pub fn new(sql: &str, param_count: usize) -> Self {
        Self {
            sql: sql.to_string(),
            kind: StatementKind::of(sql),
            param_count,
            tag: None,
            fields: BTreeMap::new(),
        }
    }

    /// The tag, or `-` when the statement was issued directly.
    pub fn label(&self) -> &str {
        self.tag.as_deref().unwrap_or("-")
    }
}

const MAX_FAILURE_LEN: usize = 512;

/// How a statement ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Result rows stepped through.
    Rows(usize),
    /// Rows inserted, updated or deleted.
    Changed(u64),
    /// Engine error text, cut to 512 bytes.
    Failed(String),
}

impl Outcome {
    pub fn failed(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.len() <= MAX_FAILURE_LEN {
            return Self::Failed(message);
        }
        Self::Failed(format!(
            "{}...",
            super::truncate_sql_bytes(&message, MAX_FAILURE_LEN)
        ))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rows(n) => write!(f, "{n} rows"),
            Self::Changed(n) => write!(f, "{n} changed"),
            Self::Failed(e) => write!(f, "failed: {e}"),
        }
    }
}

/// Receives timing for every statement once monitoring is enabled.
pub trait StatementMonitor: Send + Sync {
    fn on_start(&self, _ctx: &StatementContext) {}

    fn on_complete(&self, ctx: &StatementContext, elapsed: Duration, outcome: &Outcome);

    /// Runs after `on_complete` when `elapsed` is over the slow threshold.
    fn on_slow(&self, _ctx: &StatementContext, _elapsed: Duration) {}
}

/// Runs around every statement, whether or not monitoring is enabled.
///
/// A hook can veto a statement but never change its text: the SQL that
/// reaches the engine is always the SQL the builders validated.
pub trait StatementHook: Send + Sync {
    /// Returning `Err(reason)` aborts the statement before it is prepared.
    fn before(&self, _ctx: &StatementContext) -> Result<(), String> {
        Ok(())
    }

    fn after(&self, _ctx: &StatementContext, _elapsed: Duration, _outcome: &Outcome) {}
}
