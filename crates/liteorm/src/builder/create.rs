use super::traits::{MutationBuilder, SqlBuilder};
use crate::error::{OrmError, OrmResult};

/// A column definition: name plus type and constraint text.
///
/// Only the name outlives table creation; it is what the schema cache keeps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescription {
    pub name: String,
    /// e.g. `INT PRIMARY KEY NOT NULL`
    pub spec: String,
}

impl FieldDescription {
    pub fn new(name: impl Into<String>, spec: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            spec: spec.into(),
        }
    }
}

impl<N: Into<String>, S: Into<String>> From<(N, S)> for FieldDescription {
    fn from((name, spec): (N, S)) -> Self {
        Self::new(name, spec)
    }
}

/// CREATE TABLE builder.
#[derive(Debug, Clone)]
pub struct CreateTableBuilder {
    table: String,
    fields: Vec<FieldDescription>,
}

impl CreateTableBuilder {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            fields: Vec::new(),
        }
    }

    /// Append one column definition.
    pub fn field(&mut self, name: &str, spec: &str) -> &mut Self {
        self.fields.push(FieldDescription::new(name, spec));
        self
    }

    /// Append column definitions in order.
    pub fn fields<I, F>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = F>,
        F: Into<FieldDescription>,
    {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Column names in declaration order.
    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

impl SqlBuilder for CreateTableBuilder {
    fn build_sql(&self) -> String {
        let columns = self
            .fields
            .iter()
            .map(|f| {
                if f.spec.is_empty() {
                    f.name.clone()
                } else {
                    format!("{} {}", f.name, f.spec)
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!("CREATE TABLE {} ({});", self.table, columns)
    }

    fn validate(&self) -> OrmResult<()> {
        if self.table.trim().is_empty() {
            return Err(OrmError::validation("CreateTableBuilder: table name cannot be empty"));
        }
        if self.fields.is_empty() {
            return Err(OrmError::validation(format!(
                "CreateTableBuilder: table {} needs at least one field",
                self.table
            )));
        }
        if let Some(field) = self.fields.iter().find(|f| f.name.trim().is_empty()) {
            return Err(OrmError::validation(format!(
                "CreateTableBuilder: unnamed field with spec '{}'",
                field.spec
            )));
        }
        Ok(())
    }
}

impl MutationBuilder for CreateTableBuilder {}
