//! The database handle.
//!
//! A [`Handle`] owns one SQLite connection (open or closed) and the schema
//! cache built from it. Every statement-issuing operation checks the
//! connection first and fails with a connection error before touching the
//! cache or the engine.

use crate::affinity::Affinity;
use crate::builder::{
    CreateTableBuilder, DeleteBuilder, DropTableBuilder, FieldDescription, FieldValue,
    InsertBuilder, MutationBuilder, SelectBuilder, SelectSpec, SqlBuilder, UpdateBuilder,
};
use crate::config::{DEFAULT_DB_PATH, HandleConfig};
use crate::error::{OrmError, OrmResult};
use crate::executor::QueryExecutor;
use crate::monitor::{
    Instrumentation, MonitorConfig, StatementHook, StatementMonitor, TracingSqlHook,
};
use crate::schema::{CatalogSource, SchemaCache};
use rusqlite::Connection;
use rusqlite::types::ToSql;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A connection to one database file plus its cached schema.
pub struct Handle {
    path: PathBuf,
    conn: Option<Connection>,
    schema: SchemaCache,
    verbose: bool,
    instrumentation: Instrumentation,
}

impl Handle {
    /// Open (creating if needed) the database at `path` and load its schema.
    pub fn open(path: impl AsRef<Path>) -> OrmResult<Self> {
        Self::with_config(HandleConfig::new(path.as_ref()))
    }

    /// Open `test.db` in the working directory.
    pub fn open_default() -> OrmResult<Self> {
        Self::open(DEFAULT_DB_PATH)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> OrmResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(PathBuf::from(":memory:"), conn, &HandleConfig::default())
    }

    /// Open the database described by `config`.
    pub fn with_config(config: HandleConfig) -> OrmResult<Self> {
        let conn = Connection::open(&config.path).map_err(|err| {
            tracing::error!(
                target: "liteorm",
                path = %config.path.display(),
                error = %err,
                "cannot open database"
            );
            OrmError::from(err)
        })?;
        Self::from_connection(config.path.clone(), conn, &config)
    }

    fn from_connection(path: PathBuf, conn: Connection, config: &HandleConfig) -> OrmResult<Self> {
        let mut instrumentation = Instrumentation::new().with_config(config.monitor.clone());
        if config.log_sql {
            instrumentation = instrumentation.add_hook(TracingSqlHook::new());
        }

        let mut handle = Self {
            path,
            conn: Some(conn),
            schema: SchemaCache::new(),
            verbose: config.verbose,
            instrumentation,
        };
        handle.load_schema()?;
        tracing::info!(
            target: "liteorm",
            path = %handle.path.display(),
            tables = handle.schema.len(),
            "database opened"
        );
        Ok(handle)
    }

    // ==================== Connection ====================

    /// Reopen a closed handle and reload its schema.
    ///
    /// Fails with a connection error if the handle is already connected.
    pub fn connect(&mut self) -> OrmResult<()> {
        if self.conn.is_some() {
            return Err(OrmError::connection(format!(
                "{} is already connected",
                self.path.display()
            )));
        }
        self.conn = Some(Connection::open(&self.path)?);
        tracing::info!(target: "liteorm", path = %self.path.display(), "database reconnected");
        self.load_schema()
    }

    /// Close the connection. Closing a closed handle is a no-op.
    ///
    /// The schema cache is kept and reloaded on the next [`connect`](Self::connect).
    pub fn close(&mut self) {
        let Some(conn) = self.conn.take() else {
            return;
        };
        if let Err((_conn, err)) = conn.close() {
            tracing::warn!(
                target: "liteorm",
                path = %self.path.display(),
                error = %err,
                "close reported an error; connection dropped"
            );
        }
        tracing::info!(target: "liteorm", path = %self.path.display(), "database closed");
    }

    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rebuild the schema cache from the catalog, picking up tables created
    /// or dropped through other connections.
    pub fn refresh(&mut self) -> OrmResult<()> {
        let conn = connected(&self.conn, "refresh")?;
        let exec = QueryExecutor::new(conn, &self.instrumentation);
        self.schema.refresh(&exec)
    }

    fn load_schema(&mut self) -> OrmResult<()> {
        let conn = connected(&self.conn, "load schema")?;
        let exec = QueryExecutor::new(conn, &self.instrumentation);
        self.schema.load(&exec)
    }

    fn executor(&self, op: &str) -> OrmResult<QueryExecutor<'_>> {
        let conn = connected(&self.conn, op)?;
        Ok(QueryExecutor::new(conn, &self.instrumentation)
            .verbose(self.verbose)
            .tagged(op))
    }

    fn table_executor(&self, op: &str, table: &str) -> OrmResult<QueryExecutor<'_>> {
        Ok(self.executor(op)?.with_field("table", table))
    }

    /// Cached fields of a table this handle knows about.
    fn known_fields(&self, table: &str) -> OrmResult<&[String]> {
        self.schema
            .fields_of(table)
            .map_err(|_| OrmError::validation(format!("no such table: {table}")))
    }

    // ==================== Structure ====================

    /// Create a table and add it to the schema cache.
    pub fn create_table<I, F>(&mut self, table: &str, fields: I) -> OrmResult<()>
    where
        I: IntoIterator<Item = F>,
        F: Into<FieldDescription>,
    {
        let exec = self.table_executor("create table", table)?;
        let mut builder = CreateTableBuilder::new(table);
        builder.fields(fields);
        builder
            .execute(&exec)
            .inspect_err(|err| warn_rejected("create table", table, err))?;

        self.schema.register_table(table, builder.field_names());
        tracing::info!(target: "liteorm", table, "table created");
        Ok(())
    }

    /// Drop a table. It leaves the schema cache only once the engine has
    /// dropped it.
    pub fn drop_table(&mut self, table: &str) -> OrmResult<()> {
        let exec = self.table_executor("drop table", table)?;
        DropTableBuilder::new(table)
            .execute(&exec)
            .inspect_err(|err| warn_rejected("drop table", table, err))?;

        self.schema.unregister_table(table);
        tracing::info!(target: "liteorm", table, "table dropped");
        Ok(())
    }

    // ==================== Data ====================

    /// Insert one record given positionally, one value per cached field.
    ///
    /// Empty strings (or [`FieldValue::Omitted`]) leave their column out.
    /// Returns the number of rows inserted.
    pub fn insert_record<I, V>(&self, table: &str, values: I) -> OrmResult<u64>
    where
        I: IntoIterator<Item = V>,
        V: Into<FieldValue>,
    {
        let exec = self.table_executor("insert", table)?;
        let builder = self
            .prepare_insert(&exec, table, values)
            .inspect_err(|err| warn_rejected("insert", table, err))?;
        builder.execute(&exec)
    }

    /// Like [`insert_record`](Self::insert_record), but values are bound as
    /// parameters instead of being written into the SQL text.
    pub fn insert_record_bound<I, V>(&self, table: &str, values: I) -> OrmResult<u64>
    where
        I: IntoIterator<Item = V>,
        V: Into<FieldValue>,
    {
        let exec = self.table_executor("insert", table)?;
        let (sql, params) = self
            .prepare_insert(&exec, table, values)
            .and_then(|builder| builder.build_bound())
            .inspect_err(|err| warn_rejected("insert", table, err))?;
        let params: Vec<&dyn ToSql> = params.iter().map(|v| v as &dyn ToSql).collect();
        exec.execute_bound(&sql, &params)
    }

    fn prepare_insert<I, V>(
        &self,
        exec: &QueryExecutor<'_>,
        table: &str,
        values: I,
    ) -> OrmResult<InsertBuilder>
    where
        I: IntoIterator<Item = V>,
        V: Into<FieldValue>,
    {
        let fields = self.known_fields(table)?;
        let mut builder = InsertBuilder::new(table);
        builder.columns(fields.iter().cloned()).values(values);
        // Arity is checked before the catalog round trip.
        builder.check_arity()?;
        builder.declared_types(exec.declared_types(table)?);
        builder.validate()?;
        Ok(builder)
    }

    /// Delete the rows matching `condition`, or every row for `"all"`.
    pub fn delete_records(&self, table: &str, condition: &str) -> OrmResult<u64> {
        let exec = self.table_executor("delete", table)?;
        self.known_fields(table)
            .and_then(|_| {
                let mut builder = DeleteBuilder::new(table);
                builder.condition(condition);
                builder.validate()?;
                Ok(builder)
            })
            .inspect_err(|err| warn_rejected("delete", table, err))?
            .execute(&exec)
    }

    /// Apply `column = value` assignments to the rows matching `condition`
    /// (every row when empty).
    pub fn update_table<I, C, V>(
        &self,
        table: &str,
        assignments: I,
        condition: &str,
    ) -> OrmResult<u64>
    where
        I: IntoIterator<Item = (C, V)>,
        C: Into<String>,
        V: Into<String>,
    {
        let exec = self.table_executor("update", table)?;
        self.known_fields(table)
            .and_then(|_| {
                let mut builder = UpdateBuilder::new(table);
                builder.set_all(assignments).condition(condition);
                builder.validate()?;
                Ok(builder)
            })
            .inspect_err(|err| warn_rejected("update", table, err))?
            .execute(&exec)
    }

    /// Run a SELECT and return the requested values of every row, flattened.
    pub fn select_records(&self, spec: &SelectSpec) -> OrmResult<Vec<String>> {
        let exec = self.table_executor("select", &spec.table)?;
        let width = self
            .known_fields(&spec.table)
            .inspect_err(|err| warn_rejected("select", &spec.table, err))?
            .len();

        let mut builder = SelectBuilder::new(spec.clone());
        builder.table_width(width);
        builder
            .validate()
            .inspect_err(|err| warn_rejected("select", &spec.table, err))?;
        builder.fetch(&exec)
    }

    /// Positional form of [`select_records`](Self::select_records).
    #[allow(clippy::too_many_arguments)]
    pub fn select(
        &self,
        table: &str,
        fields: &[&str],
        distinct: bool,
        where_cond: &str,
        group_by: &[&str],
        having_cond: &str,
        order_by: &[&str],
        order_type: &str,
        limit: i64,
        offset: i64,
    ) -> OrmResult<Vec<String>> {
        let spec = SelectSpec::new(table)
            .fields(fields.iter().copied())
            .distinct(distinct)
            .where_cond(where_cond)
            .group_by(group_by.iter().copied())
            .having(having_cond)
            .order_by(order_by.iter().copied())
            .order_type(order_type)
            .limit(limit)
            .offset(offset);
        self.select_records(&spec)
    }

    // ==================== Raw SQL ====================

    /// Run arbitrary SQL and collect the given result columns.
    ///
    /// Structural changes made this way are not mirrored into the schema
    /// cache; call [`refresh`](Self::refresh) afterwards.
    pub fn execute_query(
        &self,
        sql: &str,
        indexes: &[usize],
        verbose: bool,
    ) -> OrmResult<Vec<String>> {
        let exec = self.executor("execute query")?;
        exec.verbose(verbose || self.verbose)
            .execute_and_collect(sql, indexes)
    }

    /// Run arbitrary SQL for its side effect; returns rows changed.
    pub fn execute(&self, sql: &str) -> OrmResult<u64> {
        self.executor("execute")?.execute(sql)
    }

    /// Run arbitrary SQL with positional parameters bound to `?1, ?2, ...`.
    pub fn execute_bound(&self, sql: &str, params: &[&dyn ToSql]) -> OrmResult<u64> {
        self.executor("execute")?.execute_bound(sql, params)
    }

    // ==================== Affinity ====================

    /// Affinity SQLite gives a column declared as `declared_type`.
    pub fn affinity(declared_type: &str) -> Affinity {
        Affinity::from_declared_type(declared_type)
    }

    /// Whether `literal` can be stored unquoted under `affinity`.
    pub fn is_value_affined(affinity: Affinity, literal: &str) -> bool {
        affinity.accepts(literal)
    }

    // ==================== Schema ====================

    /// Cached field names of `table`, in declaration order.
    pub fn fields(&self, table: &str) -> OrmResult<&[String]> {
        self.schema.fields_of(table)
    }

    pub fn table_names(&self) -> Vec<String> {
        self.schema.table_names()
    }

    pub fn num_tables(&self) -> usize {
        self.schema.len()
    }

    pub fn schema(&self) -> &SchemaCache {
        &self.schema
    }

    // ==================== Instrumentation ====================

    /// Replace the query monitor. Takes effect once monitoring is enabled.
    pub fn set_monitor<M: StatementMonitor + 'static>(&mut self, monitor: M) {
        self.instrumentation = std::mem::take(&mut self.instrumentation).with_monitor(monitor);
    }

    /// Like [`set_monitor`](Self::set_monitor), keeping a shared reference
    /// the caller can still read.
    pub fn set_monitor_arc(&mut self, monitor: Arc<dyn StatementMonitor>) {
        self.instrumentation = std::mem::take(&mut self.instrumentation).with_monitor_arc(monitor);
    }

    /// Add a hook run around every statement.
    pub fn add_hook<H: StatementHook + 'static>(&mut self, hook: H) {
        self.instrumentation = std::mem::take(&mut self.instrumentation).add_hook(hook);
    }

    pub fn set_monitor_config(&mut self, config: MonitorConfig) {
        *self.instrumentation.config_mut() = config;
    }

    pub fn instrumentation(&self) -> &Instrumentation {
        &self.instrumentation
    }
}

fn connected<'a>(conn: &'a Option<Connection>, op: &str) -> OrmResult<&'a Connection> {
    conn.as_ref().ok_or_else(|| {
        tracing::warn!(target: "liteorm", op, "database is not connected");
        OrmError::connection(format!("database is not connected, {op} aborted"))
    })
}

fn warn_rejected(op: &str, table: &str, err: &OrmError) {
    if !err.is_engine_error() {
        tracing::warn!(target: "liteorm", op, table, error = %err, "operation rejected");
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("path", &self.path)
            .field("connected", &self.is_connected())
            .field("tables", &self.schema.len())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Database: {} ({})",
            self.path.display(),
            if self.is_connected() { "connected" } else { "closed" }
        )?;
        write!(f, "{}", self.schema)
    }
}
