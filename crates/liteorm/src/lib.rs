//! # liteorm
//!
//! A schema-aware statement composer for SQLite.
//!
//! ## Features
//!
//! - **Structured inputs**: create/drop, insert, delete, update and select from typed arguments
//! - **Schema cache**: each [`Handle`] keeps table layouts in memory, refreshed on demand
//! - **Affinity checks**: literals are checked against their column's affinity before any SQL
//!   is sent
//! - **Sparse inserts**: omitted values leave their column out of the statement
//! - **Safe defaults**: DELETE requires a condition, UPDATE requires SET
//! - **Query monitoring**: timing, logging and hooks around every statement
//!
//! ## Example
//!
//! ```ignore
//! use liteorm::{Handle, SelectSpec};
//!
//! let mut db = Handle::open("people.db")?;
//! db.create_table(
//!     "CONNECTIONS",
//!     [
//!         ("ID", "INT PRIMARY KEY NOT NULL"),
//!         ("AGE", "INT NOT NULL"),
//!         ("PHONE", "INT NULL"),
//!         ("NAME", "CHAR(50) NOT NULL"),
//!     ],
//! )?;
//!
//! db.insert_record("CONNECTIONS", ["1", "32", "665", "ANTHON33"])?;
//! db.insert_record("CONNECTIONS", ["2", "43", "", "Julia"])?;
//!
//! let names = db.select_records(&SelectSpec::new("CONNECTIONS").fields(["NAME"]))?;
//! assert_eq!(names, ["ANTHON33", "Julia"]);
//! # Ok::<(), liteorm::OrmError>(())
//! ```
//!
//! Every failure comes back as an [`OrmError`]: connection errors and
//! validation errors are raised locally, engine errors only after SQLite
//! has seen the statement.

pub mod affinity;
pub mod builder;
pub mod clause;
pub mod config;
pub mod error;
pub mod executor;
pub mod handle;
pub mod monitor;
pub mod schema;

pub use affinity::Affinity;
pub use builder::{
    CreateTableBuilder, DeleteBuilder, DropTableBuilder, FieldDescription, FieldValue,
    InsertBuilder, MutationBuilder, Projection, SelectBuilder, SelectSpec, SqlBuilder,
    UpdateBuilder,
};
pub use clause::Order;
pub use config::HandleConfig;
pub use error::{OrmError, OrmResult};
pub use executor::QueryExecutor;
pub use handle::Handle;
pub use monitor::{
    Instrumentation, MonitorConfig, Outcome, StatementContext, StatementHook, StatementKind,
    StatementMonitor, StatementStats, StatsMonitor, TracingSqlHook,
};
pub use schema::{CatalogSource, SchemaCache};
