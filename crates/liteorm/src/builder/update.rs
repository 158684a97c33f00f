use super::traits::{MutationBuilder, SqlBuilder};
use crate::affinity::Affinity;
use crate::clause;
use crate::error::{OrmError, OrmResult};

/// UPDATE builder.
///
/// Values are classified without looking at the column: anything NUMERIC or
/// the NULL keyword is written bare, everything else is single-quoted.
#[derive(Debug, Clone)]
pub struct UpdateBuilder {
    table: String,
    assignments: Vec<(String, String)>,
    condition: String,
}

impl UpdateBuilder {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            assignments: Vec::new(),
            condition: String::new(),
        }
    }

    /// Add `column = value`.
    pub fn set(&mut self, column: &str, value: &str) -> &mut Self {
        self.assignments
            .push((column.to_string(), value.to_string()));
        self
    }

    /// Add assignments in order.
    pub fn set_all<I, C, V>(&mut self, assignments: I) -> &mut Self
    where
        I: IntoIterator<Item = (C, V)>,
        C: Into<String>,
        V: Into<String>,
    {
        self.assignments
            .extend(assignments.into_iter().map(|(c, v)| (c.into(), v.into())));
        self
    }

    /// WHERE predicate, verbatim. Empty means every row.
    pub fn condition(&mut self, condition: &str) -> &mut Self {
        self.condition = condition.to_string();
        self
    }
}

fn render_update_value(value: &str) -> String {
    if Affinity::Numeric.accepts(value) || Affinity::Null.accepts(value) {
        value.to_string()
    } else {
        format!("'{value}'")
    }
}

impl SqlBuilder for UpdateBuilder {
    fn build_sql(&self) -> String {
        let assignments = self
            .assignments
            .iter()
            .map(|(column, value)| format!("{column} = {}", render_update_value(value)))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "UPDATE {} SET {}{};",
            self.table,
            assignments,
            clause::where_clause(&self.condition)
        )
    }

    fn validate(&self) -> OrmResult<()> {
        if self.assignments.is_empty() {
            return Err(OrmError::Validation(
                "UpdateBuilder: SET clause cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl MutationBuilder for UpdateBuilder {}
