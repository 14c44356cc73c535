//! Relational schema model consumed by the table facade generator.
//!
//! The generator never talks to a database directly. It reads tables, columns and keys
//! through the [`SchemaMetadata`] trait, and walks foreign keys through the trees built by
//! [`RelationshipFactory`]. [`SchemaDefinition`] is a serialized implementation of the
//! provider, loaded from a JSON definition file.

mod column;
mod definition;
mod keys;
mod metadata;
mod relationship;
mod table_path;

pub use column::{ColumnDescriptor, TypeDescriptor, TypeKind};
pub use definition::{SchemaDefinition, TableDefinition};
pub use keys::{CrossReferenceDescriptor, PrimaryKeyDescriptor};
pub use metadata::{MetadataError, SchemaMetadata, TableInfo};
pub use relationship::{Relationship, RelationshipFactory};
pub use table_path::{TablePath, TablePathParseError};
