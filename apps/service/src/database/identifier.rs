use std::fmt;

use thiserror::Error;

/// PostgreSQL truncates identifiers longer than this
const MAX_IDENTIFIER_LEN: usize = 63;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableNameError {
    #[error("Table name cannot be empty")]
    Empty,
    #[error("Table name '{0}' is longer than {max} bytes", max = MAX_IDENTIFIER_LEN)]
    TooLong(String),
    #[error(
        "Table name '{0}' must start with a letter or underscore and contain only ASCII \
         letters, digits and underscores"
    )]
    InvalidCharacters(String),
}

/// A results table name that is safe to splice into SQL.
///
/// Table names come from configuration and cannot be bound as query
/// parameters, so they are restricted to plain identifiers and always
/// emitted double-quoted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableName(String);

impl TableName {
    pub fn new(raw: &str) -> Result<Self, TableNameError> {
        let name = raw.trim();

        if name.is_empty() {
            return Err(TableNameError::Empty);
        }
        if name.len() > MAX_IDENTIFIER_LEN {
            return Err(TableNameError::TooLong(name.to_string()));
        }

        let mut chars = name.chars();
        let valid_start = chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
        let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid_start || !valid_rest {
            return Err(TableNameError::InvalidCharacters(name.to_string()));
        }

        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Quoted form for use in SQL text
    pub fn quoted(&self) -> String {
        format!("\"{}\"", self.0)
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
