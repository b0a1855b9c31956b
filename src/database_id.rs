//! The identifier type for stored transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Error;

/// An opaque identifier for a transaction, generated by the store on creation.
///
/// IDs are random (v4) UUIDs and are serialized in their hyphenated form,
/// e.g. "67e55044-10b1-426f-9247-bb680e5fe0c8".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(Uuid);

impl TransactionId {
    /// Generate a new, random ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for TransactionId {
    type Err = Error;

    /// Parse an ID from a request path.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidTransactionId] if `s` is not a UUID.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| Error::InvalidTransactionId(s.to_owned()))
    }
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl ToSql for TransactionId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl FromSql for TransactionId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;

        Uuid::parse_str(text)
            .map(Self)
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

#[cfg(test)]
mod tests {
    use crate::Error;

    use super::TransactionId;

    #[test]
    fn parses_hyphenated_uuid() {
        let id = TransactionId::new();

        let parsed = id.to_string().parse::<TransactionId>();

        assert_eq!(parsed, Ok(id));
    }

    #[test]
    fn rejects_malformed_id() {
        let result = "not-an-id".parse::<TransactionId>();

        assert_eq!(
            result,
            Err(Error::InvalidTransactionId("not-an-id".to_owned()))
        );
    }

    #[test]
    fn rejects_object_id_style_hex() {
        // 24 hex digits is a valid document-store ID elsewhere, but not here.
        let result = "65b1f0c2a1b2c3d4e5f60718".parse::<TransactionId>();

        assert!(matches!(result, Err(Error::InvalidTransactionId(_))));
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = TransactionId::new();

        let json = serde_json::to_value(id).unwrap();

        assert_eq!(json, serde_json::Value::String(id.to_string()));
    }
}
