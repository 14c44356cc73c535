use crate::{ColumnDescriptor, CrossReferenceDescriptor, PrimaryKeyDescriptor, TablePath};
use serde::{Deserialize, Serialize};
use std::{io, path::PathBuf};

/// Descriptive information about a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableInfo {
    pub name: String,
    /// The table type as the database reports it, e.g. `TABLE` or `VIEW`.
    pub kind: String,
    pub remarks: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("unknown schema `{0}`")]
    UnknownSchema(String),
    #[error("unknown table `{0}`")]
    UnknownTable(TablePath),
    #[error("table `{0}` is defined more than once")]
    DuplicateTable(TablePath),
    #[error("two columns of `{table}` claim ordinal position {position}")]
    DuplicateOrdinal { table: TablePath, position: u32 },
    #[error("could not read schema definition {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("could not parse schema definition: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Read access to the tables of a database.
///
/// Implementations must answer consistently for the duration of one generation run.
/// Caching is the caller's concern, see [`crate::RelationshipFactory`].
pub trait SchemaMetadata {
    /// All tables of a schema, in a stable order.
    fn tables(&self, schema: &str) -> Result<Vec<TablePath>, MetadataError>;

    fn table_info(&self, path: &TablePath) -> Result<TableInfo, MetadataError>;

    /// Columns of a table, in ordinal order.
    fn columns(&self, path: &TablePath) -> Result<Vec<ColumnDescriptor>, MetadataError>;

    fn primary_key(&self, path: &TablePath) -> Result<PrimaryKeyDescriptor, MetadataError>;

    /// Foreign keys declared on a table.
    fn cross_references(&self, path: &TablePath) -> Result<Vec<CrossReferenceDescriptor>, MetadataError>;

    /// An identifier of the database the metadata was read from, stored next to the
    /// generated code.
    fn stored_identifier(&self) -> String;
}

impl<M> SchemaMetadata for &M
where
    M: SchemaMetadata + ?Sized,
{
    fn tables(&self, schema: &str) -> Result<Vec<TablePath>, MetadataError> {
        (**self).tables(schema)
    }

    fn table_info(&self, path: &TablePath) -> Result<TableInfo, MetadataError> {
        (**self).table_info(path)
    }

    fn columns(&self, path: &TablePath) -> Result<Vec<ColumnDescriptor>, MetadataError> {
        (**self).columns(path)
    }

    fn primary_key(&self, path: &TablePath) -> Result<PrimaryKeyDescriptor, MetadataError> {
        (**self).primary_key(path)
    }

    fn cross_references(&self, path: &TablePath) -> Result<Vec<CrossReferenceDescriptor>, MetadataError> {
        (**self).cross_references(path)
    }

    fn stored_identifier(&self) -> String {
        (**self).stored_identifier()
    }
}
