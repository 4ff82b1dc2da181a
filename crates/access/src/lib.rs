//! dbal_access: a small, synchronous CRUD layer over SQLite and MySQL.
//!
//! ```no_run
//! use dbal_access::{ConnectionConfig, DataAccess, Fields};
//!
//! # fn main() -> Result<(), dbal_access::DbError> {
//! let mut db = DataAccess::new(ConnectionConfig::sqlite("app.db")?);
//! db.execute("CREATE TABLE IF NOT EXISTS items (id INTEGER PRIMARY KEY, name TEXT, value INTEGER)")?;
//! db.insert("items", &Fields::new().with("name", "x").with("value", 5))?;
//! let row = db.fetch_one("items", &Fields::new().with("name", "x"))?;
//! assert_eq!(row.and_then(|r| r.get("value").cloned()), Some(5.into()));
//! # Ok(())
//! # }
//! ```
//!
//! Each backend sits behind a cargo feature (`sqlite`, `mysql`, both on by
//! default). Asking for a backend whose feature is off fails at connect time
//! with [`DbError::UnsupportedBackend`].
//!
//! The API blocks; do not call it from inside an async runtime.

#[cfg(not(any(feature = "sqlite", feature = "mysql")))]
compile_error!("dbal_access needs at least one backend feature: `sqlite` or `mysql`");

mod access;
mod config;
pub mod drivers;
mod error;
mod row;

pub use access::DataAccess;
pub use config::{Backend, ConnectionConfig};
pub use dbal_sql::{
    FieldSpec, Fields, FilterSpec, Joiner, SqlError, Statement, render_filter, render_insert,
};
pub use drivers::Connection;
pub use error::{DbError, ErrorKind};
pub use row::Row;
pub use serde_json::Value;
