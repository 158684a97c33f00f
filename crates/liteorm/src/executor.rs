//! The only code path that talks to SQLite.
//!
//! Every statement, with or without bound parameters and with or without
//! row extraction, goes through the same prepare/step loop. The prepared
//! statement is owned by the loop and finalized when it goes out of scope,
//! on success and on every error path.

use crate::clause;
use crate::error::{OrmError, OrmResult};
use crate::monitor::{Instrumentation, Outcome, StatementContext};
use crate::schema::CatalogSource;
use rusqlite::types::{ToSql, ValueRef};
use rusqlite::{Connection, Params};
use std::collections::BTreeMap;
use std::time::Instant;

/// Column holding the name in `PRAGMA table_info` output.
const TABLE_INFO_NAME: usize = 1;
/// Column holding the declared type in `PRAGMA table_info` output.
const TABLE_INFO_TYPE: usize = 2;

/// Runs SQL text against a borrowed connection.
pub struct QueryExecutor<'a> {
    conn: &'a Connection,
    instrumentation: &'a Instrumentation,
    verbose: bool,
    tag: Option<String>,
    fields: BTreeMap<String, String>,
}

impl<'a> QueryExecutor<'a> {
    pub fn new(conn: &'a Connection, instrumentation: &'a Instrumentation) -> Self {
        Self {
            conn,
            instrumentation,
            verbose: false,
            tag: None,
            fields: BTreeMap::new(),
        }
    }

    /// Tag every statement run through this executor, for monitors and hooks.
    pub fn tagged(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Attach a structured field to every statement's [`StatementContext`].
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Echo every extracted row to stdout, values separated by two spaces.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Run a statement that produces no extracted values.
    ///
    /// Returns the number of rows changed for INSERT/UPDATE/DELETE and `0`
    /// for everything else.
    pub fn execute(&self, sql: &str) -> OrmResult<u64> {
        let mut sink = Vec::new();
        self.run(sql, [], 0, &[], &mut sink, false)
    }

    /// Run a statement with positional parameters bound to `?1, ?2, ...`.
    pub fn execute_bound(&self, sql: &str, params: &[&dyn ToSql]) -> OrmResult<u64> {
        let mut sink = Vec::new();
        self.run(sql, params, params.len(), &[], &mut sink, false)
    }

    /// Run a query and flatten the requested columns of every row.
    ///
    /// For each row, the text of each column in `indexes` is appended in
    /// order. NULL cells are skipped, so callers can only rebuild row
    /// boundaries by chunking when the selected columns are never NULL.
    pub fn execute_and_collect(&self, sql: &str, indexes: &[usize]) -> OrmResult<Vec<String>> {
        let mut out = Vec::new();
        self.collect_into(sql, indexes, &mut out)?;
        Ok(out)
    }

    /// Same as [`execute_and_collect`](Self::execute_and_collect), writing
    /// into a caller buffer. The buffer is cleared first and left empty on
    /// error.
    pub fn collect_into(
        &self,
        sql: &str,
        indexes: &[usize],
        out: &mut Vec<String>,
    ) -> OrmResult<()> {
        self.run(sql, [], 0, indexes, out, self.verbose)?;
        Ok(())
    }

    fn run<P: Params>(
        &self,
        sql: &str,
        params: P,
        param_count: usize,
        indexes: &[usize],
        out: &mut Vec<String>,
        echo: bool,
    ) -> OrmResult<u64> {
        out.clear();

        let mut ctx = StatementContext::new(sql, param_count);
        ctx.tag.clone_from(&self.tag);
        ctx.fields.clone_from(&self.fields);
        self.instrumentation.begin(&ctx)?;

        let start = Instant::now();
        let stepped = self.step_rows(&ctx.sql, params, indexes, out, echo);
        let elapsed = start.elapsed();

        match stepped {
            Ok(rows) => {
                let (changed, outcome) = if ctx.kind.changes_rows() {
                    let changed = self.conn.changes();
                    (changed, Outcome::Changed(changed))
                } else {
                    (0, Outcome::Rows(rows))
                };
                self.instrumentation.finish(&ctx, elapsed, &outcome);
                Ok(changed)
            }
            Err(err) => {
                out.clear();
                self.instrumentation
                    .finish(&ctx, elapsed, &Outcome::failed(err.to_string()));
                tracing::error!(
                    target: "liteorm",
                    sql = %ctx.sql,
                    error = %err,
                    "statement failed"
                );
                Err(OrmError::from_engine_error(err))
            }
        }
    }

    fn step_rows<P: Params>(
        &self,
        sql: &str,
        params: P,
        indexes: &[usize],
        out: &mut Vec<String>,
        echo: bool,
    ) -> rusqlite::Result<usize> {
        let mut stmt = self.conn.prepare(sql)?;
        let width = stmt.column_count();
        let mut rows = stmt.query(params)?;
        let mut count = 0;

        while let Some(row) = rows.next()? {
            count += 1;
            let first = out.len();
            // Indexes past the last result column read as NULL.
            for &idx in indexes.iter().filter(|&&idx| idx < width) {
                if let Some(text) = cell_text(row.get_ref(idx)?) {
                    out.push(text);
                }
            }
            if echo && !indexes.is_empty() {
                println!("{}", out[first..].join("  "));
            }
        }

        Ok(count)
    }
}

fn cell_text(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(r) => Some(real_text(r)),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Some(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

/// Render a REAL the way `sqlite3_column_text` does (`%!.15g`).
///
/// Fifteen significant digits with trailing zeros dropped, a `.0` kept on
/// whole mantissas, and exponent form below 1e-4 or from 1e15 up.
fn real_text(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    let sign = if value < 0.0 { "-" } else { "" };
    let value = value.abs();
    if value.is_infinite() {
        return format!("{sign}Inf");
    }
    if value == 0.0 {
        return "0.0".to_string();
    }

    // `{:.14e}` rounds to 15 significant digits: "d.dddddddddddddde<exp>".
    let sci = format!("{value:.14e}");
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let digits = digits.trim_end_matches('0');
    let (lead, rest) = digits.split_at(1);

    if !(-4..15).contains(&exp) {
        let rest = if rest.is_empty() { "0" } else { rest };
        let exp_sign = if exp < 0 { '-' } else { '+' };
        return format!("{sign}{lead}.{rest}e{exp_sign}{:02}", exp.abs());
    }

    let (int_part, frac_part) = if exp < 0 {
        let zeros = "0".repeat(exp.unsigned_abs() as usize - 1);
        ("0".to_string(), format!("{zeros}{digits}"))
    } else {
        let point = exp as usize + 1;
        let padded = format!("{digits:0<point$}");
        let (int_part, frac_part) = padded.split_at(point);
        (int_part.to_string(), frac_part.to_string())
    };
    let frac_part = if frac_part.is_empty() { "0" } else { frac_part.as_str() };
    format!("{sign}{int_part}.{frac_part}")
}

impl CatalogSource for QueryExecutor<'_> {
    fn table_names(&self) -> OrmResult<Vec<String>> {
        let sql = format!(
            "SELECT name FROM sqlite_master{} ORDER BY name;",
            clause::where_clause(&clause::type_is("table"))
        );
        let mut names = Vec::new();
        self.run(&sql, [], 0, &[0], &mut names, false)?;
        Ok(names)
    }

    fn column_names(&self, table: &str) -> OrmResult<Vec<String>> {
        let mut names = Vec::new();
        let sql = format!("{};", clause::table_info(table));
        self.run(&sql, [], 0, &[TABLE_INFO_NAME], &mut names, false)?;
        Ok(names)
    }

    fn declared_types(&self, table: &str) -> OrmResult<Vec<String>> {
        let mut types = Vec::new();
        let sql = format!("{};", clause::table_info(table));
        self.run(&sql, [], 0, &[TABLE_INFO_TYPE], &mut types, false)?;
        Ok(types)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::{MonitorConfig, StatementHook, StatementKind, StatsMonitor};
    use std::sync::Arc;

    fn seeded() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE T (ID INT PRIMARY KEY NOT NULL, SCORE REAL, NOTE TEXT);
             INSERT INTO T VALUES (1, 2.5, 'a');
             INSERT INTO T VALUES (2, 3.0, NULL);",
        )
        .unwrap();
        conn
    }

    #[test]
    fn test_collect_flattens_rows_and_skips_nulls() {
        let conn = seeded();
        let inst = Instrumentation::new();
        let exec = QueryExecutor::new(&conn, &inst);

        let values = exec
            .execute_and_collect("SELECT * FROM T ORDER BY ID;", &[0, 1, 2])
            .unwrap();
        assert_eq!(values, vec!["1", "2.5", "a", "2", "3.0"]);
    }

    #[test]
    fn test_out_of_range_index_reads_as_null() {
        let conn = seeded();
        let inst = Instrumentation::new();
        let exec = QueryExecutor::new(&conn, &inst);

        let values = exec
            .execute_and_collect("SELECT ID FROM T ORDER BY ID;", &[0, 1])
            .unwrap();
        assert_eq!(values, vec!["1", "2"]);
    }

    #[test]
    fn test_collect_into_clears_buffer() {
        let conn = seeded();
        let inst = Instrumentation::new();
        let exec = QueryExecutor::new(&conn, &inst);

        let mut out = vec!["stale".to_string()];
        exec.collect_into("SELECT ID FROM T WHERE ID = 2;", &[0], &mut out)
            .unwrap();
        assert_eq!(out, vec!["2"]);

        let mut out = vec!["stale".to_string()];
        assert!(exec.collect_into("SELECT nope FROM T;", &[0], &mut out).is_err());
        assert!(out.is_empty());
    }

    #[test]
    fn test_execute_reports_changes_for_mutations_only() {
        let conn = seeded();
        let inst = Instrumentation::new();
        let exec = QueryExecutor::new(&conn, &inst);

        assert_eq!(exec.execute("UPDATE T SET NOTE = 'x';").unwrap(), 2);
        assert_eq!(exec.execute("CREATE TABLE U (A INT);").unwrap(), 0);
        assert_eq!(exec.execute("DELETE FROM T WHERE ID = 1;").unwrap(), 1);
    }

    #[test]
    fn test_engine_errors_carry_message() {
        let conn = seeded();
        let inst = Instrumentation::new();
        let exec = QueryExecutor::new(&conn, &inst);

        let err = exec.execute("SELEC * FROM T;").unwrap_err();
        assert!(err.is_engine_error());
        assert!(err.to_string().contains("syntax error"));

        let err = exec.execute("INSERT INTO T VALUES (1, 0.0, 'dup');").unwrap_err();
        assert!(err.is_unique_violation());
    }

    #[test]
    fn test_bound_parameters() {
        let conn = seeded();
        let inst = Instrumentation::new();
        let exec = QueryExecutor::new(&conn, &inst);

        let changed = exec
            .execute_bound(
                "INSERT INTO T (ID, NOTE) VALUES (?1, ?2);",
                rusqlite::params![3, "it's quoted"],
            )
            .unwrap();
        assert_eq!(changed, 1);
        let notes = exec
            .execute_and_collect("SELECT NOTE FROM T WHERE ID = 3;", &[0])
            .unwrap();
        assert_eq!(notes, vec!["it's quoted"]);
    }

    #[test]
    fn test_real_text_follows_engine_format() {
        assert_eq!(real_text(2.5), "2.5");
        assert_eq!(real_text(3.0), "3.0");
        assert_eq!(real_text(0.1 + 0.2), "0.3");
        assert_eq!(real_text(1e15), "1.0e+15");
        assert_eq!(real_text(123456789012345.0), "123456789012345.0");
        assert_eq!(real_text(-1234.5), "-1234.5");
        assert_eq!(real_text(0.0001), "0.0001");
        assert_eq!(real_text(0.00001), "1.0e-05");
        assert_eq!(real_text(1.0 / 3.0), "0.333333333333333");
        assert_eq!(real_text(-0.0), "0.0");
        assert_eq!(real_text(f64::NEG_INFINITY), "-Inf");
    }

    #[test]
    fn test_real_cells_match_cast_as_text() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE R (ID INT, X REAL);
             INSERT INTO R VALUES (1, 0.1);
             UPDATE R SET X = X + 0.2;
             INSERT INTO R VALUES (2, 1000000000000000);
             INSERT INTO R VALUES (3, 2.5);
             INSERT INTO R VALUES (4, 1.0 / 3.0);
             INSERT INTO R VALUES (5, -0.00001);
             INSERT INTO R VALUES (6, 42);",
        )
        .unwrap();
        let inst = Instrumentation::new();
        let exec = QueryExecutor::new(&conn, &inst);

        let pairs = exec
            .execute_and_collect("SELECT X, CAST(X AS TEXT) FROM R ORDER BY ID;", &[0, 1])
            .unwrap();
        assert_eq!(pairs.len(), 12);
        for pair in pairs.chunks(2) {
            assert_eq!(pair[0], pair[1]);
        }
        assert_eq!(pairs[0], "0.3");
        assert_eq!(pairs[2], "1.0e+15");
    }

    #[test]
    fn test_catalog_queries() {
        let conn = seeded();
        let inst = Instrumentation::new();
        let exec = QueryExecutor::new(&conn, &inst);

        assert_eq!(exec.table_names().unwrap(), vec!["T"]);
        assert_eq!(exec.column_names("T").unwrap(), vec!["ID", "SCORE", "NOTE"]);
        assert_eq!(exec.declared_types("T").unwrap(), vec!["INT", "REAL", "TEXT"]);
    }

    struct Deny;

    impl StatementHook for Deny {
        fn before(&self, ctx: &StatementContext) -> Result<(), String> {
            if ctx.kind == StatementKind::Delete {
                Err("deletes disabled".into())
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn test_hook_abort_never_reaches_engine() {
        let conn = seeded();
        let stats = Arc::new(StatsMonitor::new());
        let inst = Instrumentation::new()
            .with_config(MonitorConfig::new().enable_monitoring())
            .with_monitor_arc(stats.clone())
            .add_hook(Deny);
        let exec = QueryExecutor::new(&conn, &inst);

        let err = exec.execute("DELETE FROM T;").unwrap_err();
        assert!(err.is_validation_error());
        assert!(err.to_string().contains("deletes disabled"));
        assert_eq!(stats.stats().total, 0);

        let count = exec
            .execute_and_collect("SELECT COUNT(*) FROM T;", &[0])
            .unwrap();
        assert_eq!(count, vec!["2"]);
        assert_eq!(stats.stats().selects, 1);
    }
}
