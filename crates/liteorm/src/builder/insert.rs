use super::traits::{MutationBuilder, SqlBuilder};
use crate::affinity::Affinity;
use crate::clause;
use crate::error::{OrmError, OrmResult};
use rusqlite::types::Value;

/// One positional value of a record.
///
/// `Omitted` leaves the column out of the statement so the engine applies
/// its default (NULL for nullable columns). Converting from `""` yields
/// `Omitted`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Present(String),
    Omitted,
}

impl FieldValue {
    pub fn as_present(&self) -> Option<&str> {
        match self {
            FieldValue::Present(value) => Some(value),
            FieldValue::Omitted => None,
        }
    }

    pub fn is_omitted(&self) -> bool {
        matches!(self, FieldValue::Omitted)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            FieldValue::Omitted
        } else {
            FieldValue::Present(value.to_string())
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        if value.is_empty() {
            FieldValue::Omitted
        } else {
            FieldValue::Present(value)
        }
    }
}

impl From<&String> for FieldValue {
    fn from(value: &String) -> Self {
        FieldValue::from(value.as_str())
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Omitted, Into::into)
    }
}

/// INSERT builder for one positional record.
///
/// Values line up with the table columns. Every present value is checked
/// against the affinity of its column's declared type before any SQL is
/// produced; one mismatch rejects the whole record.
#[derive(Debug, Clone)]
pub struct InsertBuilder {
    table: String,
    columns: Vec<String>,
    declared_types: Vec<String>,
    values: Vec<FieldValue>,
}

impl InsertBuilder {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            columns: Vec::new(),
            declared_types: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Table column names in declaration order.
    pub fn columns<I, S>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Declared column types, aligned with [`columns`](Self::columns).
    pub fn declared_types<I, S>(&mut self, types: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.declared_types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Append one value.
    pub fn value(&mut self, value: impl Into<FieldValue>) -> &mut Self {
        self.values.push(value.into());
        self
    }

    /// Append values in column order.
    pub fn values<I, V>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<FieldValue>,
    {
        self.values.extend(values.into_iter().map(Into::into));
        self
    }

    fn affinities(&self) -> impl Iterator<Item = Affinity> + '_ {
        self.declared_types
            .iter()
            .map(|t| Affinity::from_declared_type(t))
    }

    /// `(column, affinity, literal)` for every present value.
    fn present(&self) -> impl Iterator<Item = (&str, Affinity, &str)> + '_ {
        self.columns
            .iter()
            .zip(self.affinities())
            .zip(&self.values)
            .filter_map(|((column, affinity), value)| {
                value
                    .as_present()
                    .map(|literal| (column.as_str(), affinity, literal))
            })
    }

    /// Fail unless there is exactly one value per column.
    pub fn check_arity(&self) -> OrmResult<()> {
        if self.values.len() != self.columns.len() {
            return Err(OrmError::validation(format!(
                "number of values ({}) differs from number of fields ({}) in {}",
                self.values.len(),
                self.columns.len(),
                self.table
            )));
        }
        Ok(())
    }

    fn has_omitted(&self) -> bool {
        self.values.iter().any(FieldValue::is_omitted)
    }

    /// Render with `?N` placeholders and return the values to bind.
    ///
    /// The column list is always explicit. Literals are converted to the
    /// storage class of their column's affinity.
    pub fn build_bound(&self) -> OrmResult<(String, Vec<Value>)> {
        self.validate()?;

        let mut columns = Vec::new();
        let mut placeholders = Vec::new();
        let mut params = Vec::new();
        for (idx, (column, affinity, literal)) in self.present().enumerate() {
            columns.push(column);
            placeholders.push(format!("?{}", idx + 1));
            params.push(bind_value(affinity, literal));
        }

        let sql = format!(
            "INSERT INTO {}{} VALUES ({});",
            self.table,
            clause::column_list(&columns),
            placeholders.join(", ")
        );
        Ok((sql, params))
    }
}

fn render_literal(affinity: Affinity, literal: &str) -> String {
    if affinity.is_quoted() {
        format!("'{literal}'")
    } else {
        literal.to_string()
    }
}

fn bind_value(affinity: Affinity, literal: &str) -> Value {
    let as_real = || literal.replace(',', ".").parse::<f64>().ok().map(Value::Real);
    let converted = match affinity {
        Affinity::Integer => literal.parse::<i64>().ok().map(Value::Integer),
        Affinity::Real => as_real(),
        Affinity::Numeric => literal
            .parse::<i64>()
            .ok()
            .map(Value::Integer)
            .or_else(as_real),
        Affinity::Null => Some(Value::Null),
        Affinity::Text | Affinity::Blob => None,
    };
    converted.unwrap_or_else(|| Value::Text(literal.to_string()))
}

impl SqlBuilder for InsertBuilder {
    fn build_sql(&self) -> String {
        let values = self
            .present()
            .map(|(_, affinity, literal)| render_literal(affinity, literal))
            .collect::<Vec<_>>();

        // Column list only when something was left out.
        let columns = if self.has_omitted() {
            let names = self.present().map(|(column, _, _)| column).collect::<Vec<_>>();
            clause::column_list(&names)
        } else {
            String::new()
        };

        format!(
            "INSERT INTO {}{} VALUES ({});",
            self.table,
            columns,
            values.join(", ")
        )
    }

    fn validate(&self) -> OrmResult<()> {
        self.check_arity()?;
        if self.declared_types.len() != self.columns.len() {
            return Err(OrmError::validation(format!(
                "{} declares {} column types for {} cached fields; refresh the schema",
                self.table,
                self.declared_types.len(),
                self.columns.len()
            )));
        }
        if self.values.iter().all(FieldValue::is_omitted) {
            return Err(OrmError::validation(format!(
                "no values given for {}",
                self.table
            )));
        }

        for (idx, (value, affinity)) in self.values.iter().zip(self.affinities()).enumerate() {
            if let Some(literal) = value.as_present() {
                if !affinity.accepts(literal) {
                    return Err(OrmError::validation(format!(
                        "type error in value {idx} ('{literal}') for {}.{}: expected {affinity} affinity",
                        self.table, self.columns[idx]
                    )));
                }
            }
        }
        Ok(())
    }
}

impl MutationBuilder for InsertBuilder {}
