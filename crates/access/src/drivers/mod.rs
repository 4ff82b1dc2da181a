#[cfg(feature = "mysql")]
pub mod mysql;
#[cfg(feature = "sqlite")]
pub mod sqlite;

use crate::{Backend, ConnectionConfig, DbError};
use once_cell::sync::OnceCell;
use serde_json::Value;
use std::future::Future;
use tokio::runtime::Runtime;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>, // row-major
}

/// Outcome of a statement that returns no rows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Executed {
    pub rows_affected: u64,
    /// Row id the backend last assigned on this connection; `None` when it reports 0.
    pub last_row_id: Option<i64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fetch {
    All,
    One,
}

/// What a backend must provide. Every call blocks until the backend answers.
pub trait Driver: Send + Sync + 'static {
    type Connection: Send;

    fn connect(config: &ConnectionConfig) -> Result<Self::Connection, sqlx::Error>;
    fn begin(conn: &mut Self::Connection) -> Result<(), sqlx::Error>;
    fn commit(conn: &mut Self::Connection) -> Result<(), sqlx::Error>;
    fn rollback(conn: &mut Self::Connection) -> Result<(), sqlx::Error>;
    fn execute(
        conn: &mut Self::Connection,
        sql: &str,
        params: &[Value],
    ) -> Result<Executed, sqlx::Error>;
    fn query(
        conn: &mut Self::Connection,
        sql: &str,
        params: &[Value],
        fetch: Fetch,
    ) -> Result<QueryResult, sqlx::Error>;
    fn close(conn: Self::Connection) -> Result<(), sqlx::Error>;
}

static RT: OnceCell<Runtime> = OnceCell::new();

/// Drive `fut` to completion on the shared current-thread runtime.
///
/// Must not be called from inside another tokio runtime.
pub(crate) fn block_on<F, T>(fut: F) -> Result<T, sqlx::Error>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    let rt = RT.get_or_try_init(|| {
        tokio::runtime::Builder::new_current_thread()
            .enable_io()
            .enable_time()
            .build()
    })?;
    rt.block_on(fut)
}

/// An open connection to whichever backend the config named.
pub enum Connection {
    #[cfg(feature = "sqlite")]
    Sqlite(<sqlite::Driver as Driver>::Connection),
    #[cfg(feature = "mysql")]
    MySql(<mysql::Driver as Driver>::Connection),
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Connection").field(&self.backend()).finish()
    }
}

impl Connection {
    pub(crate) fn open(config: &ConnectionConfig) -> Result<Self, DbError> {
        match config.backend() {
            #[cfg(feature = "sqlite")]
            Backend::Sqlite => sqlite::Driver::connect(config)
                .map(Connection::Sqlite)
                .map_err(DbError::connect),
            #[cfg(feature = "mysql")]
            Backend::MySql => mysql::Driver::connect(config)
                .map(Connection::MySql)
                .map_err(DbError::connect),
            #[allow(unreachable_patterns)]
            other => Err(DbError::UnsupportedBackend(format!(
                "{other} driver not available in this build"
            ))),
        }
    }

    pub fn backend(&self) -> Backend {
        match *self {
            #[cfg(feature = "sqlite")]
            Connection::Sqlite(_) => Backend::Sqlite,
            #[cfg(feature = "mysql")]
            Connection::MySql(_) => Backend::MySql,
        }
    }

    pub(crate) fn begin(&mut self) -> Result<(), sqlx::Error> {
        match self {
            #[cfg(feature = "sqlite")]
            Connection::Sqlite(c) => sqlite::Driver::begin(c),
            #[cfg(feature = "mysql")]
            Connection::MySql(c) => mysql::Driver::begin(c),
        }
    }

    pub(crate) fn commit(&mut self) -> Result<(), sqlx::Error> {
        match self {
            #[cfg(feature = "sqlite")]
            Connection::Sqlite(c) => sqlite::Driver::commit(c),
            #[cfg(feature = "mysql")]
            Connection::MySql(c) => mysql::Driver::commit(c),
        }
    }

    pub(crate) fn rollback(&mut self) -> Result<(), sqlx::Error> {
        match self {
            #[cfg(feature = "sqlite")]
            Connection::Sqlite(c) => sqlite::Driver::rollback(c),
            #[cfg(feature = "mysql")]
            Connection::MySql(c) => mysql::Driver::rollback(c),
        }
    }

    pub(crate) fn execute(&mut self, sql: &str, params: &[Value]) -> Result<Executed, sqlx::Error> {
        match self {
            #[cfg(feature = "sqlite")]
            Connection::Sqlite(c) => sqlite::Driver::execute(c, sql, params),
            #[cfg(feature = "mysql")]
            Connection::MySql(c) => mysql::Driver::execute(c, sql, params),
        }
    }

    pub(crate) fn query(
        &mut self,
        sql: &str,
        params: &[Value],
        fetch: Fetch,
    ) -> Result<QueryResult, sqlx::Error> {
        match self {
            #[cfg(feature = "sqlite")]
            Connection::Sqlite(c) => sqlite::Driver::query(c, sql, params, fetch),
            #[cfg(feature = "mysql")]
            Connection::MySql(c) => mysql::Driver::query(c, sql, params, fetch),
        }
    }

    /// Close the connection politely. Dropping it also closes it.
    pub fn close(self) -> Result<(), DbError> {
        let res = match self {
            #[cfg(feature = "sqlite")]
            Connection::Sqlite(c) => sqlite::Driver::close(c),
            #[cfg(feature = "mysql")]
            Connection::MySql(c) => mysql::Driver::close(c),
        };
        res.map_err(DbError::connect)
    }
}

/// Row id as reported by the backend, with 0 meaning "none assigned".
pub(crate) fn row_id(id: i64) -> Option<i64> {
    (id != 0).then_some(id)
}
