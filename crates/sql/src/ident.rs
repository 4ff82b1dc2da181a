use crate::SqlError;
use std::fmt;

/// Longest identifier part accepted (MySQL's limit; SQLite has none).
pub const MAX_IDENTIFIER_LEN: usize = 64;

/// A table or column name that is safe to splice into SQL text.
///
/// Values always travel as bound parameters, but names cannot, so every name
/// is checked against `[A-Za-z_][A-Za-z0-9_]*`, optionally qualified once as
/// `schema.table`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(String);

impl Identifier {
    pub fn parse(name: &str) -> Result<Self, SqlError> {
        if name.is_empty() {
            return Err(SqlError::MissingIdentifier);
        }

        let mut parts = 0;
        for part in name.split('.') {
            parts += 1;
            if parts > 2 || !is_valid_part(part) {
                return Err(SqlError::InvalidIdentifier(name.to_string()));
            }
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_valid_part(part: &str) -> bool {
    let mut chars = part.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    part.len() <= MAX_IDENTIFIER_LEN
        && (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for Identifier {
    type Error = SqlError;

    fn try_from(name: &str) -> Result<Self, Self::Error> {
        Self::parse(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_and_qualified_names() {
        for name in ["users", "_tmp", "Table_2", "main.users"] {
            assert_eq!(Identifier::parse(name).unwrap().as_str(), name);
        }
    }

    #[test]
    fn rejects_injection_attempts() {
        for name in [
            "users; DROP TABLE users",
            "users--",
            "a b",
            "1abc",
            "a.b.c",
            ".users",
            "users.",
            "na\u{00ef}ve",
            "`users`",
        ] {
            assert!(
                matches!(Identifier::parse(name), Err(SqlError::InvalidIdentifier(_))),
                "{name} should be rejected"
            );
        }
    }

    #[test]
    fn empty_name_is_missing() {
        assert!(matches!(
            Identifier::parse(""),
            Err(SqlError::MissingIdentifier)
        ));
    }

    #[test]
    fn length_limit_applies_per_part() {
        let long = "a".repeat(MAX_IDENTIFIER_LEN);
        assert!(Identifier::parse(&long).is_ok());
        assert!(Identifier::parse(&format!("{long}.{long}")).is_ok());
        assert!(Identifier::parse(&format!("{long}a")).is_err());
    }
}
