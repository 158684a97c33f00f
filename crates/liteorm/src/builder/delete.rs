use super::traits::{MutationBuilder, SqlBuilder};
use crate::clause;
use crate::error::{OrmError, OrmResult};

/// Condition string meaning "every row".
pub const DELETE_ALL: &str = "all";

/// DELETE builder.
///
/// A condition is required unless deleting every row was asked for, either
/// with [`allow_delete_all`](Self::allow_delete_all) or by passing
/// [`DELETE_ALL`] as the condition.
///
/// Any other condition is rendered verbatim, except the empty one: it is a
/// validation error here instead of being sent as `DELETE FROM t WHERE ;`
/// for the engine to reject with a syntax error.
#[derive(Debug, Clone)]
pub struct DeleteBuilder {
    table: String,
    condition: String,
    allow_delete_all: bool,
}

impl DeleteBuilder {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            condition: String::new(),
            allow_delete_all: false,
        }
    }

    /// Set the WHERE predicate, verbatim. `"all"` clears it and allows a
    /// full-table delete.
    pub fn condition(&mut self, condition: &str) -> &mut Self {
        if condition == DELETE_ALL {
            self.condition.clear();
            self.allow_delete_all = true;
        } else {
            self.condition = condition.to_string();
        }
        self
    }

    /// Allow deleting every row (no WHERE clause).
    pub fn allow_delete_all(&mut self, allow: bool) -> &mut Self {
        self.allow_delete_all = allow;
        self
    }
}

impl SqlBuilder for DeleteBuilder {
    fn build_sql(&self) -> String {
        format!(
            "DELETE FROM {}{};",
            self.table,
            clause::where_clause(&self.condition)
        )
    }

    fn validate(&self) -> OrmResult<()> {
        if self.condition.is_empty() && !self.allow_delete_all {
            return Err(OrmError::validation(format!(
                "DeleteBuilder: no condition given for {}; use \"{DELETE_ALL}\" to delete every row",
                self.table
            )));
        }
        Ok(())
    }
}

impl MutationBuilder for DeleteBuilder {}
