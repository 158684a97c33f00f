//! Optional SQL fragment rendering.
//!
//! Every renderer returns an empty string when its input is absent, so the
//! results can be concatenated unconditionally. Fragments that follow another
//! part of a statement carry their own leading space.
//!
//! # Example
//! ```ignore
//! use liteorm::clause::{self, Order};
//!
//! let sql = format!(
//!     "SELECT * FROM CONNECTIONS{}{}{};",
//!     clause::where_clause("AGE > 30"),
//!     clause::order_by(&["AGE"], Order::Desc),
//!     clause::limit(10),
//! );
//! assert_eq!(sql, "SELECT * FROM CONNECTIONS WHERE AGE > 30 ORDER BY AGE DESC LIMIT 10;");
//! ```

use crate::error::{OrmError, OrmResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sort direction for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Order {
    #[default]
    Asc,
    Desc,
}

impl Order {
    pub fn as_str(self) -> &'static str {
        match self {
            Order::Asc => "ASC",
            Order::Desc => "DESC",
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Order {
    type Err = OrmError;

    /// Accepts `ASC` or `DESC` in any letter case. Anything else is rejected.
    fn from_str(s: &str) -> OrmResult<Self> {
        match s.to_ascii_uppercase().as_str() {
            "ASC" => Ok(Order::Asc),
            "DESC" => Ok(Order::Desc),
            _ => Err(OrmError::validation(format!(
                "order direction must be either \"ASC\" or \"DESC\", not \"{s}\""
            ))),
        }
    }
}

/// Comma-joined list: `a, b, c`.
pub fn field_list<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parenthesized list with a leading space: ` (a, b, c)`.
pub fn column_list<S: AsRef<str>>(fields: &[S]) -> String {
    if fields.is_empty() {
        return String::new();
    }
    format!(" ({})", field_list(fields))
}

pub fn where_clause(condition: &str) -> String {
    keyword_clause("WHERE", condition)
}

pub fn group_by<S: AsRef<str>>(columns: &[S]) -> String {
    keyword_clause("GROUP BY", &field_list(columns))
}

pub fn having(condition: &str) -> String {
    keyword_clause("HAVING", condition)
}

/// ` ORDER BY a, b DIR`, or nothing when no columns are given.
pub fn order_by<S: AsRef<str>>(columns: &[S], order: Order) -> String {
    if columns.is_empty() {
        return String::new();
    }
    format!(" ORDER BY {} {}", field_list(columns), order)
}

/// Rendered only for a strictly positive count.
pub fn limit(n: i64) -> String {
    positive_clause("LIMIT", n)
}

/// Rendered only for a strictly positive count.
pub fn offset(n: i64) -> String {
    positive_clause("OFFSET", n)
}

/// Length modifier for column definitions, e.g. `CHAR(50)`.
pub fn length(n: u32) -> String {
    format!("({n})")
}

pub fn like(pattern: &str) -> String {
    format!(" LIKE '{pattern}'")
}

pub fn glob(pattern: &str) -> String {
    format!(" GLOB '{pattern}'")
}

/// Catalog pragma listing the columns of `table` (cid, name, type, notnull, dflt_value, pk).
pub fn table_info(table: &str) -> String {
    format!("PRAGMA table_info({table})")
}

/// `type='<kind>'` predicate for `sqlite_master` lookups.
pub fn type_is(kind: &str) -> String {
    format!("type='{kind}'")
}

fn keyword_clause(keyword: &str, body: &str) -> String {
    if body.is_empty() {
        String::new()
    } else {
        format!(" {keyword} {body}")
    }
}

fn positive_clause(keyword: &str, n: i64) -> String {
    if n > 0 {
        format!(" {keyword} {n}")
    } else {
        String::new()
    }
}

/// Column-definition vocabulary for [`crate::builder::CreateTableBuilder`] fields.
pub mod data {
    pub const INT: &str = "INT";
    pub const INTEGER: &str = "INTEGER";
    pub const CHAR: &str = "CHAR";
    pub const TEXT: &str = "TEXT";
    pub const REAL: &str = "REAL";
    pub const BLOB: &str = "BLOB";
    pub const NUMERIC: &str = "NUMERIC";
    pub const NOT_NULL: &str = "NOT NULL";
    pub const NULL: &str = "NULL";
    pub const PRIMARY_KEY: &str = "PRIMARY KEY";
    pub const UNIQUE: &str = "UNIQUE";
}
