use crate::error::OrmResult;
use crate::executor::QueryExecutor;

/// Base trait for SQL builders.
pub trait SqlBuilder {
    /// Build the SQL string without checking preconditions.
    fn build_sql(&self) -> String;

    /// Debug helper.
    fn to_sql(&self) -> String {
        self.build_sql()
    }

    /// Validate builder state.
    fn validate(&self) -> OrmResult<()> {
        Ok(())
    }

    /// Validate, then build. Nothing is rendered for an invalid builder.
    fn build(&self) -> OrmResult<String> {
        self.validate()?;
        Ok(self.build_sql())
    }
}

/// Trait for statements run for their side effect (DDL, INSERT/UPDATE/DELETE).
pub trait MutationBuilder: SqlBuilder {
    /// Execute and return the number of rows changed.
    fn execute(&self, exec: &QueryExecutor<'_>) -> OrmResult<u64> {
        let sql = self.build()?;
        exec.execute(&sql)
    }
}
