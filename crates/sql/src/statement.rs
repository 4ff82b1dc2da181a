use crate::{Fields, Identifier, SqlError};
use serde_json::Value;

/// Positional placeholder used by both SQLite and MySQL.
pub const PLACEHOLDER: &str = "?";

/// How rendered `col = ?` terms are joined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Joiner {
    #[default]
    And,
    Or,
    /// `SET` lists in updates.
    Comma,
}

impl Joiner {
    pub fn as_str(self) -> &'static str {
        match self {
            Joiner::And => " AND ",
            Joiner::Or => " OR ",
            Joiner::Comma => ", ",
        }
    }
}

/// SQL text with the parameters for its placeholders, in placeholder order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Statement {
    /// Literal SQL with no parameters.
    pub fn raw(sql: &str) -> Result<Self, SqlError> {
        if sql.trim().is_empty() {
            return Err(SqlError::MissingSql);
        }
        Ok(Self {
            sql: sql.to_string(),
            params: Vec::new(),
        })
    }

    pub fn placeholder_count(&self) -> usize {
        self.sql.matches(PLACEHOLDER).count()
    }

    fn push_where(&mut self, filters: &Fields) -> Result<(), SqlError> {
        if filters.is_empty() {
            return Ok(());
        }
        let clause = render_filter(filters, Joiner::And)?;
        self.sql.push_str(" WHERE ");
        self.sql.push_str(&clause.sql);
        self.params.extend(clause.params);
        Ok(())
    }
}

/// Render `a = ? AND b = ?` and the matching values.
///
/// Empty filters render to an empty statement; callers decide whether that
/// means "no WHERE clause" or is an error.
pub fn render_filter(filters: &Fields, joiner: Joiner) -> Result<Statement, SqlError> {
    let mut terms = Vec::with_capacity(filters.len());
    let mut params = Vec::with_capacity(filters.len());
    for (column, value) in filters {
        let column = Identifier::parse(column)?;
        terms.push(format!("{column} = {PLACEHOLDER}"));
        params.push(value.clone());
    }
    Ok(Statement {
        sql: terms.join(joiner.as_str()),
        params,
    })
}

/// Render `(a, b) VALUES (?, ?)` and the matching values.
pub fn render_insert(fields: &Fields) -> Result<Statement, SqlError> {
    if fields.is_empty() {
        return Err(SqlError::EmptyFields("insert"));
    }
    let mut columns = Vec::with_capacity(fields.len());
    let mut params = Vec::with_capacity(fields.len());
    for (column, value) in fields {
        columns.push(Identifier::parse(column)?.to_string());
        params.push(value.clone());
    }
    let placeholders = vec![PLACEHOLDER; columns.len()].join(", ");
    Ok(Statement {
        sql: format!("({}) VALUES ({placeholders})", columns.join(", ")),
        params,
    })
}

/// `SELECT * FROM table [WHERE ...] [extra]`.
///
/// `extra` is appended verbatim (ORDER BY, LIMIT, ...) and must come from
/// trusted code, never from user input.
pub fn select(table: &str, filters: &Fields, extra: &str) -> Result<Statement, SqlError> {
    let table = Identifier::parse(table)?;
    let mut stmt = Statement {
        sql: format!("SELECT * FROM {table}"),
        params: Vec::new(),
    };
    stmt.push_where(filters)?;
    let extra = extra.trim_end();
    if !extra.trim_start().is_empty() {
        if !extra.starts_with(char::is_whitespace) {
            stmt.sql.push(' ');
        }
        stmt.sql.push_str(extra);
    }
    Ok(stmt)
}

/// `SELECT COUNT(*) FROM table [WHERE ...]`.
pub fn count(table: &str, filters: &Fields) -> Result<Statement, SqlError> {
    let table = Identifier::parse(table)?;
    let mut stmt = Statement {
        sql: format!("SELECT COUNT(*) FROM {table}"),
        params: Vec::new(),
    };
    stmt.push_where(filters)?;
    Ok(stmt)
}

pub fn insert(table: &str, fields: &Fields) -> Result<Statement, SqlError> {
    let table = Identifier::parse(table)?;
    let body = render_insert(fields)?;
    Ok(Statement {
        sql: format!("INSERT INTO {table} {}", body.sql),
        params: body.params,
    })
}

/// `UPDATE table SET ... WHERE ...`; refuses empty filters.
pub fn update(table: &str, fields: &Fields, filters: &Fields) -> Result<Statement, SqlError> {
    let mut stmt = update_all(table, fields)?;
    if filters.is_empty() {
        return Err(SqlError::UnfilteredWrite("update"));
    }
    stmt.push_where(filters)?;
    Ok(stmt)
}

/// `UPDATE table SET ...` with no WHERE clause: every row is rewritten.
pub fn update_all(table: &str, fields: &Fields) -> Result<Statement, SqlError> {
    let table = Identifier::parse(table)?;
    if fields.is_empty() {
        return Err(SqlError::EmptyFields("update"));
    }
    let set = render_filter(fields, Joiner::Comma)?;
    Ok(Statement {
        sql: format!("UPDATE {table} SET {}", set.sql),
        params: set.params,
    })
}

/// `DELETE FROM table WHERE ...`; refuses empty filters.
pub fn delete(table: &str, filters: &Fields) -> Result<Statement, SqlError> {
    let mut stmt = delete_all(table)?;
    if filters.is_empty() {
        return Err(SqlError::UnfilteredWrite("delete"));
    }
    stmt.push_where(filters)?;
    Ok(stmt)
}

/// `DELETE FROM table`: every row is removed.
pub fn delete_all(table: &str) -> Result<Statement, SqlError> {
    let table = Identifier::parse(table)?;
    Ok(Statement {
        sql: format!("DELETE FROM {table}"),
        params: Vec::new(),
    })
}
