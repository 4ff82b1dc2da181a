use super::{Executed, Fetch, QueryResult, block_on, row_id};
use crate::ConnectionConfig;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use secrecy::ExposeSecret;
use serde_json::Value;
use sqlx::mysql::{MySql, MySqlArguments, MySqlConnectOptions, MySqlConnection, MySqlRow};
use sqlx::types::chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use sqlx::types::{Decimal, JsonValue};
use sqlx::{Column, ConnectOptions, Connection, Executor, Row, TypeInfo, ValueRef};

pub struct Driver;

/// Host used when the config names none.
pub const DEFAULT_HOST: &str = "localhost";

pub(crate) fn connect_options(config: &ConnectionConfig) -> MySqlConnectOptions {
    let mut options = MySqlConnectOptions::new()
        .host(config.host().unwrap_or(DEFAULT_HOST))
        .database(config.database());
    if let Some(port) = config.port() {
        options = options.port(port);
    }
    if let Some(user) = config.user() {
        options = options.username(user);
    }
    if let Some(password) = config.password() {
        options = options.password(password.expose_secret());
    }
    options
}

impl super::Driver for Driver {
    type Connection = MySqlConnection;

    fn connect(config: &ConnectionConfig) -> Result<Self::Connection, sqlx::Error> {
        let options = connect_options(config);
        block_on(async move { options.connect().await })
    }

    // Plain strings go over the text protocol; START TRANSACTION cannot be prepared.
    fn begin(conn: &mut Self::Connection) -> Result<(), sqlx::Error> {
        block_on(async move { conn.execute("START TRANSACTION").await.map(|_| ()) })
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
                q = bind_mysql(q, v);
            }
            let done = q.execute(&mut *conn).await?;
            Ok(Executed {
                rows_affected: done.rows_affected(),
                last_row_id: i64::try_from(done.last_insert_id()).ok().and_then(row_id),
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
                q = bind_mysql(q, v);
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

fn bind_mysql<'q>(
    q: sqlx::query::Query<'q, MySql, MySqlArguments>,
    v: &Value,
) -> sqlx::query::Query<'q, MySql, MySqlArguments> {
    match v {
        Value::Null => q.bind::<Option<String>>(None),
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(u) = n.as_u64() {
                q.bind(u)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s.clone()),
        other => q.bind(other.to_string()),
    }
}

/// MySQL columns are statically typed; try the common Rust types in turn.
///
/// DECIMAL comes back as text so no digits are lost. A column none of these
/// types accepts is an error, never a silent NULL.
fn decode(row: &MySqlRow, i: usize) -> Result<Value, sqlx::Error> {
    let raw = row.try_get_raw(i)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let type_name = raw.type_info().name().to_string();

    row.try_get::<i64, _>(i)
        .map(Value::from)
        .or_else(|_| row.try_get::<u64, _>(i).map(Value::from))
        .or_else(|_| row.try_get::<f64, _>(i).map(Value::from))
        .or_else(|_| row.try_get::<f32, _>(i).map(Value::from))
        .or_else(|_| row.try_get::<Decimal, _>(i).map(|d| Value::from(d.to_string())))
        .or_else(|_| row.try_get::<String, _>(i).map(Value::from))
        .or_else(|_| row.try_get::<JsonValue, _>(i))
        .or_else(|_| {
            row.try_get::<NaiveDateTime, _>(i)
                .map(|t| Value::from(t.to_string()))
        })
        .or_else(|_| row.try_get::<NaiveDate, _>(i).map(|d| Value::from(d.to_string())))
        .or_else(|_| row.try_get::<NaiveTime, _>(i).map(|t| Value::from(t.to_string())))
        .or_else(|_| {
            row.try_get::<Vec<u8>, _>(i)
                .map(|b| Value::from(BASE64.encode(b)))
        })
        .map_err(|_| sqlx::Error::ColumnDecode {
            index: i.to_string(),
            source: format!("unsupported MySQL column type {type_name}").into(),
        })
}
