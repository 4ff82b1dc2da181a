use super::{Executed, Fetch, QueryResult, block_on, row_id};
use crate::ConnectionConfig;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::Value;
use sqlx::sqlite::{Sqlite, SqliteArguments, SqliteConnectOptions, SqliteConnection, SqliteRow};
use sqlx::{Column, ConnectOptions, Connection, Executor, Row, TypeInfo, ValueRef};

pub struct Driver;

impl super::Driver for Driver {
    type Connection = SqliteConnection;

    fn connect(config: &ConnectionConfig) -> Result<Self::Connection, sqlx::Error> {
        // The file is created on first use, like the sqlite3 CLI does.
        let options = SqliteConnectOptions::new()
            .filename(config.database())
            .create_if_missing(true);
        block_on(async move { options.connect().await })
    }

    fn begin(conn: &mut Self::Connection) -> Result<(), sqlx::Error> {
        block_on(async move { conn.execute("BEGIN").await.map(|_| ()) })
    }

    fn commit(conn: &mut Self::Connection) -> Result<(), sqlx::Error> {
        block_on(async move { conn.execute("COMMIT").await.map(|_| ()) })
    }

    fn rollback(conn: &mut Self::Connection) -> Result<(), sqlx::Error> {
        block_on(async move { conn.execute("ROLLBACK").await.map(|_| ()) })
    }

    fn execute(
        conn: &mut Self::Connection,
        sql: &str,
        params: &[Value],
    ) -> Result<Executed, sqlx::Error> {
        block_on(async move {
            let mut q = sqlx::query(sql);
            for v in params {
                q = bind_sqlite(q, v)?;
            }
            let done = q.execute(&mut *conn).await?;
            Ok(Executed {
                rows_affected: done.rows_affected(),
                last_row_id: row_id(done.last_insert_rowid()),
            })
        })
    }

    fn query(
        conn: &mut Self::Connection,
        sql: &str,
        params: &[Value],
        fetch: Fetch,
    ) -> Result<QueryResult, sqlx::Error> {
        block_on(async move {
            let mut q = sqlx::query(sql);
            for v in params {
                q = bind_sqlite(q, v)?;
            }
            let rows = match fetch {
                Fetch::All => q.fetch_all(&mut *conn).await?,
                Fetch::One => q.fetch_optional(&mut *conn).await?.into_iter().collect(),
            };
            let columns: Vec<String> = rows
                .first()
                .map(|r| r.columns().iter().map(|c| c.name().to_string()).collect())
                .unwrap_or_default();
            let out_rows = rows
                .iter()
                .map(|r| {
                    (0..columns.len())
                        .map(|i| decode(r, i))
                        .collect::<Result<Vec<_>, _>>()
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(QueryResult {
                columns,
                rows: out_rows,
            })
        })
    }

    fn close(conn: Self::Connection) -> Result<(), sqlx::Error> {
        block_on(conn.close())
    }
}

/// Bind one JSON value. SQLite integers are signed 64-bit, so a larger
/// unsigned value is refused rather than rounded through a float.
fn bind_sqlite<'q>(
    q: sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>,
    v: &Value,
) -> Result<sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>, sqlx::Error> {
    let q = match v {
        Value::Null => q.bind::<Option<String>>(None),
        Value::Bool(b) => q.bind(*b as i64),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(u) = n.as_u64() {
                return Err(sqlx::Error::Encode(
                    format!("{u} does not fit in a SQLite INTEGER").into(),
                ));
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s.clone()),
        other => q.bind(other.to_string()),
    };
    Ok(q)
}

/// SQLite is dynamically typed, so decode by the storage class of the value itself.
fn decode(row: &SqliteRow, i: usize) -> Result<Value, sqlx::Error> {
    let raw = row.try_get_raw(i)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let storage = raw.type_info().name().to_string();
    match storage.as_str() {
        "INTEGER" => row.try_get::<i64, _>(i).map(Value::from),
        "REAL" => row.try_get::<f64, _>(i).map(Value::from),
        "BLOB" => row
            .try_get::<Vec<u8>, _>(i)
            .map(|b| Value::from(BASE64.encode(b))),
        _ => row.try_get::<String, _>(i).map(Value::from),
    }
}
