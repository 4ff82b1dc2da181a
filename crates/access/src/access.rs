use crate::drivers::{Connection, Executed, Fetch, QueryResult};
use crate::{ConnectionConfig, DbError, Row};
use dbal_sql::{Fields, Statement};
use std::sync::Arc;
use tracing::{debug, warn};

/// A handle to one database, offering one-shot CRUD operations.
///
/// Nothing is kept open between calls: every operation connects, runs a
/// single statement inside its own transaction, commits (or rolls back on
/// failure) and drops the connection. The only state carried across calls
/// is the last insert id, which is why writes take `&mut self`.
#[derive(Debug)]
pub struct DataAccess {
    config: ConnectionConfig,
    last_insert_id: Option<i64>,
}

impl DataAccess {
    pub fn new(config: ConnectionConfig) -> Self {
        Self {
            config,
            last_insert_id: None,
        }
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Open a fresh connection to the configured backend.
    pub fn connect(&self) -> Result<Connection, DbError> {
        debug!(
            backend = %self.config.backend(),
            database = self.config.database(),
            "connecting"
        );
        Connection::open(&self.config)
    }

    /// Run literal SQL with no parameters.
    pub fn execute(&mut self, sql: &str) -> Result<(), DbError> {
        let stmt = Statement::raw(sql)?;
        self.write(&stmt).map(|_| ())
    }

    /// All rows of `table` matching `filters`, with `extra_sql` (ORDER BY,
    /// LIMIT, ...) appended verbatim. Empty filters match every row.
    ///
    /// `extra_sql` is not escaped; only pass text written by the program.
    pub fn fetch_all(
        &self,
        table: &str,
        filters: &Fields,
        extra_sql: &str,
    ) -> Result<Vec<Row>, DbError> {
        let stmt = dbal_sql::select(table, filters, extra_sql)?;
        let result = self.read(&stmt, Fetch::All)?;
        Ok(into_rows(result))
    }

    /// First row of `table` matching `filters`, if any.
    pub fn fetch_one(&self, table: &str, filters: &Fields) -> Result<Option<Row>, DbError> {
        let stmt = dbal_sql::select(table, filters, "")?;
        let result = self.read(&stmt, Fetch::One)?;
        Ok(into_rows(result).into_iter().next())
    }

    /// Insert one row and remember the id the backend assigned.
    pub fn insert(&mut self, table: &str, fields: &Fields) -> Result<(), DbError> {
        let stmt = dbal_sql::insert(table, fields)?;
        self.write(&stmt).map(|_| ())
    }

    /// Update rows matching `filters`; returns the number of rows changed.
    ///
    /// Empty filters are refused. Use [`DataAccess::update_all`] to rewrite
    /// every row on purpose.
    pub fn update(
        &mut self,
        table: &str,
        fields: &Fields,
        filters: &Fields,
    ) -> Result<u64, DbError> {
        let stmt = dbal_sql::update(table, fields, filters)?;
        self.write(&stmt).map(|done| done.rows_affected)
    }

    /// Update every row of `table`.
    pub fn update_all(&mut self, table: &str, fields: &Fields) -> Result<u64, DbError> {
        let stmt = dbal_sql::update_all(table, fields)?;
        warn!(table, "updating every row");
        self.write(&stmt).map(|done| done.rows_affected)
    }

    /// Delete rows matching `filters`; empty filters are refused.
    pub fn delete(&mut self, table: &str, filters: &Fields) -> Result<u64, DbError> {
        let stmt = dbal_sql::delete(table, filters)?;
        self.write(&stmt).map(|done| done.rows_affected)
    }

    /// Delete every row of `table`.
    pub fn delete_all(&mut self, table: &str) -> Result<u64, DbError> {
        let stmt = dbal_sql::delete_all(table)?;
        warn!(table, "deleting every row");
        self.write(&stmt).map(|done| done.rows_affected)
    }

    /// Id recorded by the most recent write, `None` before any write or when
    /// the last write assigned none.
    pub fn last_insert_id(&self) -> Option<i64> {
        self.last_insert_id
    }

    /// Number of rows of `table` matching `filters`. Never negative.
    pub fn count(&self, table: &str, filters: &Fields) -> Result<u64, DbError> {
        let stmt = dbal_sql::count(table, filters)?;
        let result = self.read(&stmt, Fetch::One)?;
        let n = result
            .rows
            .first()
            .and_then(|row| row.first())
            .and_then(|v| v.as_i64())
            .unwrap_or(0);
        Ok(u64::try_from(n).unwrap_or(0))
    }

    fn write(&mut self, stmt: &Statement) -> Result<Executed, DbError> {
        let done = self.transact(stmt, |conn| conn.execute(&stmt.sql, &stmt.params))?;
        self.last_insert_id = done.last_row_id;
        debug!(
            rows_affected = done.rows_affected,
            last_insert_id = ?done.last_row_id,
            "statement committed"
        );
        Ok(done)
    }

    fn read(&self, stmt: &Statement, fetch: Fetch) -> Result<QueryResult, DbError> {
        self.transact(stmt, |conn| conn.query(&stmt.sql, &stmt.params, fetch))
    }

    /// connect → BEGIN → `op` → COMMIT, or ROLLBACK if anything after BEGIN fails.
    fn transact<T>(
        &self,
        stmt: &Statement,
        op: impl FnOnce(&mut Connection) -> Result<T, sqlx::Error>,
    ) -> Result<T, DbError> {
        debug!(sql = %stmt.sql, params = stmt.params.len(), "executing");
        let mut conn = self.connect()?;
        conn.begin().map_err(DbError::connect)?;

        let outcome = op(&mut conn).and_then(|value| conn.commit().map(|()| value));
        match outcome {
            Ok(value) => {
                close_quietly(conn);
                Ok(value)
            }
            Err(err) => {
                warn!(error = %err, sql = %stmt.sql, "statement failed, rolling back");
                let rolled_back = match conn.rollback() {
                    Ok(()) => true,
                    Err(rb) => {
                        warn!(error = %rb, "rollback failed");
                        false
                    }
                };
                close_quietly(conn);
                Err(DbError::failed(err, rolled_back))
            }
        }
    }
}

fn close_quietly(conn: Connection) {
    if let Err(err) = conn.close() {
        debug!(error = %err, "closing connection failed");
    }
}

fn into_rows(result: QueryResult) -> Vec<Row> {
    let columns: Arc<[String]> = result.columns.into();
    result
        .rows
        .into_iter()
        .map(|values| Row::new(Arc::clone(&columns), values))
        .collect()
}
