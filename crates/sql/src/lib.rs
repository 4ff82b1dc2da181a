//! dbal_sql: turns column/value maps into parameterized SQL.
//!
//! Nothing here touches a database. Table and column names are validated
//! before they are spliced into text; values only ever become `?`
//! placeholders plus a parameter list in the same order.

mod error;
mod fields;
mod ident;
mod statement;

pub use error::SqlError;
pub use fields::{FieldSpec, Fields, FilterSpec};
pub use ident::{Identifier, MAX_IDENTIFIER_LEN};
pub use statement::{
    Joiner, PLACEHOLDER, Statement, count, delete, delete_all, insert, render_filter,
    render_insert, select, update, update_all,
};
