use crate::TablePath;
use serde::{Deserialize, Serialize};

/// The primary key of a table. A table without a key has no member columns.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryKeyDescriptor {
    pub name: String,
    /// Member column names, in key order.
    pub columns: Vec<String>,
    /// The key is inferred by convention instead of declared in the database.
    #[serde(default)]
    pub pseudo: bool,
}

impl PrimaryKeyDescriptor {
    pub fn new<I>(name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            pseudo: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|member| member == column)
    }
}

/// A foreign key, seen from the table declaring it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossReferenceDescriptor {
    pub name: String,
    /// Columns of the declaring table, in key order.
    pub columns: Vec<String>,
    /// The referenced table.
    pub references: TablePath,
    /// Columns of the referenced table, matching `columns` position by position.
    pub ref_columns: Vec<String>,
    #[serde(default)]
    pub pseudo: bool,
}

impl CrossReferenceDescriptor {
    pub fn new<I, J>(name: impl Into<String>, columns: I, references: TablePath, ref_columns: J) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        J: IntoIterator,
        J::Item: Into<String>,
    {
        Self {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            references,
            ref_columns: ref_columns.into_iter().map(Into::into).collect(),
            pseudo: false,
        }
    }
}
