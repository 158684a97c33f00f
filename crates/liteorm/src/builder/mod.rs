//! Statement composition.
//!
//! One builder per statement shape. Builders only render text; the
//! [`Handle`](crate::Handle) supplies schema information and runs them.
//!
//! ## Design
//!
//! - Values are interpolated as SQL literals, quoted by affinity. Use
//!   [`InsertBuilder::build_bound`] for placeholder-based inserts.
//! - Safe defaults: DELETE requires a condition (unless explicitly allowed);
//!   UPDATE requires SET.
//! - Precondition failures surface from [`SqlBuilder::validate`] as
//!   validation errors, before anything is sent to the engine.

pub mod create;
pub mod delete;
pub mod drop;
pub mod insert;
pub mod select;
pub mod traits;
pub mod update;

pub use create::{CreateTableBuilder, FieldDescription};
pub use delete::{DELETE_ALL, DeleteBuilder};
pub use drop::DropTableBuilder;
pub use insert::{FieldValue, InsertBuilder};
pub use select::{ALL_FIELDS, Projection, SelectBuilder, SelectSpec};
pub use traits::{MutationBuilder, SqlBuilder};
pub use update::UpdateBuilder;

#[cfg(test)]
mod tests;
