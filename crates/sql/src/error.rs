use thiserror::Error;

/// Problems found while turning caller input into SQL text.
///
/// These are all caught before a connection is opened.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SqlError {
    /// Table or column name was empty.
    #[error("table or column not specified")]
    MissingIdentifier,

    /// Table or column name failed validation.
    #[error("invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    /// Raw SQL text was empty.
    #[error("there was no SQL to be parsed")]
    MissingSql,

    /// An insert or update was given no columns.
    #[error("{0} needs at least one field")]
    EmptyFields(&'static str),

    /// An update or delete was given no filters; use the `_all` variant instead.
    #[error("{0} without filters would touch every row; use {0}_all")]
    UnfilteredWrite(&'static str),
}
