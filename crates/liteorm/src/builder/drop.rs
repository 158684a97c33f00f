use super::traits::{MutationBuilder, SqlBuilder};
use crate::error::{OrmError, OrmResult};

/// DROP TABLE builder.
#[derive(Debug, Clone)]
pub struct DropTableBuilder {
    table: String,
}

impl DropTableBuilder {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
        }
    }
}

impl SqlBuilder for DropTableBuilder {
    fn build_sql(&self) -> String {
        format!("DROP TABLE {};", self.table)
    }

    fn validate(&self) -> OrmResult<()> {
        if self.table.trim().is_empty() {
            return Err(OrmError::validation("DropTableBuilder: table name cannot be empty"));
        }
        Ok(())
    }
}

impl MutationBuilder for DropTableBuilder {}
