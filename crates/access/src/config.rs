use crate::DbError;
use secrecy::SecretString;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Database engines a [`ConnectionConfig`] can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    Sqlite,
    MySql,
}

impl Backend {
    /// Tag as written in configuration (`SQLite`, `MySQL`).
    pub fn as_str(self) -> &'static str {
        match self {
            Backend::Sqlite => "SQLite",
            Backend::MySql => "MySQL",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("sqlite") {
            Ok(Backend::Sqlite)
        } else if s.eq_ignore_ascii_case("mysql") {
            Ok(Backend::MySql)
        } else {
            Err(DbError::UnsupportedBackend(s.to_string()))
        }
    }
}

/// Where and how to connect. Fixed once built.
///
/// For SQLite `database` is a file path (created on first use); for MySQL it
/// is the schema name on `host`.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    backend: Backend,
    database: String,
    host: Option<String>,
    port: Option<u16>,
    user: Option<String>,
    password: Option<SecretString>,
}

impl ConnectionConfig {
    pub fn new(backend: Backend, database: impl Into<String>) -> Result<Self, DbError> {
        let database = database.into();
        if database.trim().is_empty() {
            return Err(DbError::Configuration(
                "no database name specified".to_string(),
            ));
        }
        Ok(Self {
            backend,
            database,
            host: None,
            port: None,
            user: None,
            password: None,
        })
    }

    /// Build from loosely typed input, e.g. a backend tag read from a file.
    ///
    /// A missing tag or name is a configuration error; an unrecognised tag
    /// is [`DbError::UnsupportedBackend`].
    pub fn from_parts(backend: Option<&str>, database: Option<&str>) -> Result<Self, DbError> {
        let (Some(backend), Some(database)) = (backend, database) else {
            return Err(DbError::Configuration(
                "no database type or name specified".to_string(),
            ));
        };
        Self::new(backend.parse()?, database)
    }

    /// SQLite database file at `path`.
    pub fn sqlite<P: AsRef<Path>>(path: P) -> Result<Self, DbError> {
        Self::new(Backend::Sqlite, path.as_ref().to_string_lossy())
    }

    pub fn set_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn set_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn set_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn set_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(SecretString::from(password.into()));
        self
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn password(&self) -> Option<&SecretString> {
        self.password.as_ref()
    }
}
