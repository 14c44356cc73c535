use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt, str::FromStr};

/// Identifies a table by its schema and name.
///
/// Renders and parses as `schema.table`. The schema part ends at the first dot, so table
/// names may contain dots but schema names may not.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TablePath {
    schema: String,
    table: String,
}

impl TablePath {
    pub fn new(schema: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            table: table.into(),
        }
    }

    /// The schema the table lives in.
    pub fn schema_name(&self) -> &str {
        &self.schema
    }

    /// The name of the table in the database.
    pub fn table_name(&self) -> &str {
        &self.table
    }
}

impl fmt::Display for TablePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.table)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(r#""{0}" is not a table path (expected `schema.table`)"#)]
pub struct TablePathParseError(String);

impl FromStr for TablePath {
    type Err = TablePathParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('.') {
            Some((schema, table)) if !schema.is_empty() && !table.is_empty() => Ok(Self::new(schema, table)),
            _ => Err(TablePathParseError(s.to_string())),
        }
    }
}

impl Serialize for TablePath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TablePath {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        FromStr::from_str(&s).map_err(serde::de::Error::custom)
    }
}
