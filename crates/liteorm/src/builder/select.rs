use super::traits::SqlBuilder;
use crate::clause::{self, Order};
use crate::error::{OrmError, OrmResult};
use crate::executor::QueryExecutor;

/// Wildcard field.
pub const ALL_FIELDS: &str = "*";

/// What a SELECT returns.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Projection {
    /// `*`: every column of the table, in declaration order.
    #[default]
    All,
    /// Explicit expressions, read back in the given order.
    Columns(Vec<String>),
}

impl Projection {
    /// Build from a field list. A sole `"*"` is the wildcard.
    pub fn from_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        if fields.len() == 1 && fields[0] == ALL_FIELDS {
            Projection::All
        } else {
            Projection::Columns(fields)
        }
    }
}

/// Everything needed to compose one SELECT.
///
/// `limit` and `offset` at or below zero mean unconstrained. `order_type`
/// is kept as given and must read `ASC` or `DESC` (any case) when the
/// statement is built, whether or not `order_by` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectSpec {
    pub table: String,
    pub fields: Projection,
    pub distinct: bool,
    pub where_cond: String,
    pub group_by: Vec<String>,
    pub having_cond: String,
    pub order_by: Vec<String>,
    pub order_type: String,
    pub limit: i64,
    pub offset: i64,
}

impl SelectSpec {
    /// `SELECT * FROM table` with no clauses.
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            fields: Projection::All,
            distinct: false,
            where_cond: String::new(),
            group_by: Vec::new(),
            having_cond: String::new(),
            order_by: Vec::new(),
            order_type: Order::Asc.to_string(),
            limit: 0,
            offset: 0,
        }
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Projection::from_fields(fields);
        self
    }

    pub fn distinct(mut self, distinct: bool) -> Self {
        self.distinct = distinct;
        self
    }

    pub fn where_cond(mut self, condition: &str) -> Self {
        self.where_cond = condition.to_string();
        self
    }

    pub fn group_by<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_by = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn having(mut self, condition: &str) -> Self {
        self.having_cond = condition.to_string();
        self
    }

    pub fn order_by<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.order_by = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn order_type(mut self, order: &str) -> Self {
        self.order_type = order.to_string();
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }
}

/// SELECT builder.
///
/// Knows how many columns the table has so a wildcard projection can be
/// turned into explicit positions for the executor.
#[derive(Debug, Clone)]
pub struct SelectBuilder {
    spec: SelectSpec,
    table_width: usize,
}

impl SelectBuilder {
    pub fn new(spec: SelectSpec) -> Self {
        Self {
            spec,
            table_width: 0,
        }
    }

    /// Number of columns of the target table, from the schema cache.
    pub fn table_width(&mut self, width: usize) -> &mut Self {
        self.table_width = width;
        self
    }

    pub fn spec(&self) -> &SelectSpec {
        &self.spec
    }

    /// Result positions to extract from every row.
    pub fn column_indexes(&self) -> Vec<usize> {
        match &self.spec.fields {
            Projection::All => (0..self.table_width).collect(),
            Projection::Columns(columns) => (0..columns.len()).collect(),
        }
    }

    fn order(&self) -> OrmResult<Order> {
        self.spec.order_type.parse()
    }

    /// Validate, build and run; returns the flattened values.
    pub fn fetch(&self, exec: &QueryExecutor<'_>) -> OrmResult<Vec<String>> {
        let sql = self.build()?;
        exec.execute_and_collect(&sql, &self.column_indexes())
    }
}

impl SqlBuilder for SelectBuilder {
    fn build_sql(&self) -> String {
        let spec = &self.spec;
        let fields = match &spec.fields {
            Projection::All => ALL_FIELDS.to_string(),
            Projection::Columns(columns) => clause::field_list(columns),
        };
        let order = self.order().unwrap_or_default();

        format!(
            "SELECT {}{} FROM {}{}{}{}{}{}{};",
            if spec.distinct { "DISTINCT " } else { "" },
            fields,
            spec.table,
            clause::where_clause(&spec.where_cond),
            clause::group_by(&spec.group_by),
            clause::having(&spec.having_cond),
            clause::order_by(&spec.order_by, order),
            clause::limit(spec.limit),
            clause::offset(spec.offset),
        )
    }

    fn validate(&self) -> OrmResult<()> {
        self.order()?;
        if let Projection::Columns(columns) = &self.spec.fields {
            if columns.is_empty() || columns.iter().any(|c| c.trim().is_empty()) {
                return Err(OrmError::validation(format!(
                    "SelectBuilder: empty field in select from {}",
                    self.spec.table
                )));
            }
        }
        Ok(())
    }
}
