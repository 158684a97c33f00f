//! In-memory snapshot of the database catalog.
//!
//! [`SchemaCache`] maps each table name to its column names in declaration
//! order. It is populated from a [`CatalogSource`] and kept in sync
//! incrementally after CREATE/DROP statements issued through the same handle.
//! Changes made by other connections are only picked up by an explicit
//! [`SchemaCache::refresh`].

use crate::error::{OrmError, OrmResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Prefix of the engine's own bookkeeping tables.
const INTERNAL_TABLE_PREFIX: &str = "sqlite_";

/// Read access to the engine catalog.
pub trait CatalogSource {
    /// Names of all user tables, ordered by name.
    fn table_names(&self) -> OrmResult<Vec<String>>;

    /// Column names of `table` in declaration order.
    fn column_names(&self, table: &str) -> OrmResult<Vec<String>>;

    /// Declared column types of `table` in declaration order. Columns declared
    /// without a type yield an empty string.
    fn declared_types(&self, table: &str) -> OrmResult<Vec<String>>;
}

/// Per-handle snapshot of table names to ordered column names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaCache {
    tables: BTreeMap<String, Vec<String>>,
    /// When the snapshot was last rebuilt from the catalog.
    loaded_at: Option<DateTime<Utc>>,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the cache from the catalog.
    ///
    /// The new snapshot is assembled aside and swapped in only once every
    /// table has been read. On error the previous snapshot is left untouched.
    pub fn load(&mut self, catalog: &impl CatalogSource) -> OrmResult<()> {
        let mut tables = BTreeMap::new();

        for name in catalog.table_names()? {
            if name.starts_with(INTERNAL_TABLE_PREFIX) {
                continue;
            }
            let columns = catalog.column_names(&name).map_err(|err| {
                tracing::error!(
                    target: "liteorm",
                    table = %name,
                    error = %err,
                    "failed to load columns"
                );
                err
            })?;
            tables.insert(name, columns);
        }

        self.tables = tables;
        self.loaded_at = Some(Utc::now());
        tracing::debug!(target: "liteorm", tables = self.tables.len(), "schema cache loaded");
        Ok(())
    }

    /// Replace every entry with the current catalog contents.
    ///
    /// Use this on a long-lived handle to observe tables created or dropped
    /// through other connections. Stale entries are discarded, not merged.
    pub fn refresh(&mut self, catalog: &impl CatalogSource) -> OrmResult<()> {
        let before = self.tables.len();
        self.load(catalog)?;
        tracing::info!(
            target: "liteorm",
            before,
            after = self.tables.len(),
            "schema cache refreshed"
        );
        Ok(())
    }

    /// Record a table the caller just created.
    pub fn register_table(&mut self, name: impl Into<String>, fields: Vec<String>) {
        let name = name.into();
        tracing::debug!(
            target: "liteorm",
            table = %name,
            fields = fields.len(),
            "table registered"
        );
        self.tables.insert(name, fields);
    }

    /// Forget a table the caller just dropped. Returns whether it was cached.
    pub fn unregister_table(&mut self, name: &str) -> bool {
        let removed = self.tables.remove(name).is_some();
        if removed {
            tracing::debug!(target: "liteorm", table = %name, "table unregistered");
        }
        removed
    }

    /// Ordered column names of `table`.
    pub fn fields_of(&self, table: &str) -> OrmResult<&[String]> {
        self.tables
            .get(table)
            .map(Vec::as_slice)
            .ok_or_else(|| OrmError::not_found(format!("no such table: {table}")))
    }

    pub fn exists(&self, table: &str) -> bool {
        self.tables.contains_key(table)
    }

    /// Cached table names in ascending order.
    pub fn table_names(&self) -> Vec<String> {
        self.tables.keys().cloned().collect()
    }

    /// Iterate `(table, fields)` pairs in ascending table order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.tables
            .iter()
            .map(|(name, fields)| (name.as_str(), fields.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    /// Serialize the snapshot as pretty-printed JSON.
    pub fn to_json(&self) -> OrmResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for SchemaCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Number of tables: {}", self.tables.len())?;
        for (name, fields) in &self.tables {
            writeln!(f, "  {name} ({} fields): {}", fields.len(), fields.join(", "))?;
        }
        Ok(())
    }
}
