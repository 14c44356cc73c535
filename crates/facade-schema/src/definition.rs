use crate::{
    ColumnDescriptor, CrossReferenceDescriptor, MetadataError, PrimaryKeyDescriptor, SchemaMetadata, TableInfo,
    TablePath,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, path::Path};

/// A serialized description of a database: its schemas, tables, columns and keys.
///
/// Stands in for a live database connection. Tables keep the order they were defined in,
/// columns are sorted by ordinal position and carry the primary key flag derived from the
/// key's member list.
#[derive(Debug, Clone, Default)]
pub struct SchemaDefinition {
    identifier: String,
    /// Schema name to the tables defined in it, in definition order.
    schemas: IndexMap<String, Vec<TablePath>>,
    tables: IndexMap<TablePath, TableDefinition>,
}

/// One table in a [`SchemaDefinition`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableDefinition {
    pub name: String,
    #[serde(default = "default_table_kind")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    #[serde(default)]
    pub columns: Vec<ColumnDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<PrimaryKeyDescriptor>,
    #[serde(default)]
    pub foreign_keys: Vec<CrossReferenceDescriptor>,
}

impl TableDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: default_table_kind(),
            remarks: None,
            columns: Vec::new(),
            primary_key: None,
            foreign_keys: Vec::new(),
        }
    }

    #[must_use]
    pub fn column(mut self, column: ColumnDescriptor) -> Self {
        self.columns.push(column);
        self
    }

    #[must_use]
    pub fn primary_key(mut self, primary_key: PrimaryKeyDescriptor) -> Self {
        self.primary_key = Some(primary_key);
        self
    }

    #[must_use]
    pub fn foreign_key(mut self, foreign_key: CrossReferenceDescriptor) -> Self {
        self.foreign_keys.push(foreign_key);
        self
    }

    /// Gives columns without an ordinal the lowest unused positions, in definition order, and
    /// sorts columns by position. Two columns claiming the same position are rejected.
    fn normalize(&mut self, path: &TablePath) -> Result<(), MetadataError> {
        let mut taken = BTreeSet::new();

        for column in &self.columns {
            if column.ordinal_position != 0 && !taken.insert(column.ordinal_position) {
                return Err(MetadataError::DuplicateOrdinal {
                    table: path.clone(),
                    position: column.ordinal_position,
                });
            }
        }

        let mut free = (1..).filter(|position| !taken.contains(position));

        for column in self.columns.iter_mut().filter(|column| column.ordinal_position == 0) {
            column.ordinal_position = free.next().unwrap_or_default();
        }

        self.columns.sort_by_key(|column| column.ordinal_position);

        if let Some(primary_key) = &self.primary_key {
            for column in &mut self.columns {
                column.primary_key = primary_key.contains(&column.name);
            }
        }

        Ok(())
    }
}

fn default_table_kind() -> String {
    String::from("TABLE")
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct DefinitionFile {
    identifier: String,
    #[serde(default)]
    schemas: Vec<SchemaFile>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SchemaFile {
    name: String,
    #[serde(default)]
    tables: Vec<TableDefinition>,
}

impl SchemaDefinition {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            ..Default::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, MetadataError> {
        let file: DefinitionFile = serde_json::from_str(json)?;
        let mut definition = Self::new(file.identifier);

        for schema in file.schemas {
            definition.push_schema(&schema.name);

            for table in schema.tables {
                definition.push_table(&schema.name, table)?;
            }
        }

        Ok(definition)
    }

    pub fn from_path(path: &Path) -> Result<Self, MetadataError> {
        let json = std::fs::read_to_string(path).map_err(|source| MetadataError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let definition = Self::from_json(&json)?;

        tracing::debug!(
            "Loaded {} tables in {} schemas from {}",
            definition.tables.len(),
            definition.schemas.len(),
            path.display()
        );

        Ok(definition)
    }

    /// Declares a schema, which may stay empty.
    pub fn push_schema(&mut self, schema: &str) {
        self.schemas.entry(schema.to_string()).or_default();
    }

    /// Adds a table to a schema, declaring the schema if needed.
    pub fn push_table(&mut self, schema: &str, mut table: TableDefinition) -> Result<TablePath, MetadataError> {
        let path = TablePath::new(schema, table.name.clone());

        if self.tables.contains_key(&path) {
            return Err(MetadataError::DuplicateTable(path));
        }

        table.normalize(&path)?;

        self.schemas.entry(schema.to_string()).or_default().push(path.clone());
        self.tables.insert(path.clone(), table);

        Ok(path)
    }

    fn table(&self, path: &TablePath) -> Result<&TableDefinition, MetadataError> {
        self.tables
            .get(path)
            .ok_or_else(|| MetadataError::UnknownTable(path.clone()))
    }
}

impl SchemaMetadata for SchemaDefinition {
    fn tables(&self, schema: &str) -> Result<Vec<TablePath>, MetadataError> {
        self.schemas
            .get(schema)
            .cloned()
            .ok_or_else(|| MetadataError::UnknownSchema(schema.to_string()))
    }

    fn table_info(&self, path: &TablePath) -> Result<TableInfo, MetadataError> {
        let table = self.table(path)?;

        Ok(TableInfo {
            name: table.name.clone(),
            kind: table.kind.clone(),
            remarks: table.remarks.clone(),
        })
    }

    fn columns(&self, path: &TablePath) -> Result<Vec<ColumnDescriptor>, MetadataError> {
        Ok(self.table(path)?.columns.clone())
    }

    fn primary_key(&self, path: &TablePath) -> Result<PrimaryKeyDescriptor, MetadataError> {
        Ok(self.table(path)?.primary_key.clone().unwrap_or_default())
    }

    fn cross_references(&self, path: &TablePath) -> Result<Vec<CrossReferenceDescriptor>, MetadataError> {
        Ok(self.table(path)?.foreign_keys.clone())
    }

    fn stored_identifier(&self) -> String {
        self.identifier.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TypeDescriptor;
    use indoc::indoc;

    const DEFINITION: &str = indoc! {r#"
        {
          "identifier": "shop",
          "schemas": [
            {
              "name": "public",
              "tables": [
                {
                  "name": "orders",
                  "remarks": "customer orders",
                  "columns": [
                    { "name": "note", "type": { "name": "String" }, "ordinal_position": 3 },
                    { "name": "id", "type": { "name": "i64", "numeric": true }, "not_null": true },
                    { "name": "total", "type": { "name": "f64", "numeric": true }, "not_null": true }
                  ],
                  "primary_key": { "name": "orders_pkey", "columns": ["id"] },
                  "foreign_keys": [
                    {
                      "name": "orders_customer_fkey",
                      "columns": ["customer_id"],
                      "references": "public.customers",
                      "ref_columns": ["id"]
                    }
                  ]
                },
                { "name": "customers", "kind": "VIEW" }
              ]
            },
            { "name": "empty" }
          ]
        }
    "#};

    #[test]
    fn loads_tables_in_definition_order() {
        let definition = SchemaDefinition::from_json(DEFINITION).unwrap();

        let tables = definition.tables("public").unwrap();
        assert_eq!(
            tables,
            vec![TablePath::new("public", "orders"), TablePath::new("public", "customers")]
        );
        assert!(definition.tables("empty").unwrap().is_empty());
        assert_eq!(definition.stored_identifier(), "shop");
    }

    #[test]
    fn columns_are_sorted_and_flagged() {
        let definition = SchemaDefinition::from_json(DEFINITION).unwrap();
        let columns = definition.columns(&TablePath::new("public", "orders")).unwrap();

        let summary = columns
            .iter()
            .map(|column| (column.name.as_str(), column.ordinal_position, column.primary_key))
            .collect::<Vec<_>>();

        assert_eq!(summary, vec![("id", 1, true), ("total", 2, false), ("note", 3, false)]);
        assert_eq!(columns[0].ty, TypeDescriptor::primitive("i64").numeric());
    }

    #[test]
    fn missing_key_is_empty() {
        let definition = SchemaDefinition::from_json(DEFINITION).unwrap();
        let customers = TablePath::new("public", "customers");

        assert!(definition.primary_key(&customers).unwrap().is_empty());
        assert_eq!(definition.table_info(&customers).unwrap().kind, "VIEW");
    }

    #[test]
    fn unknown_lookups_fail() {
        let definition = SchemaDefinition::from_json(DEFINITION).unwrap();

        let error = definition.tables("private").unwrap_err();
        insta::assert_snapshot!(error, @"unknown schema `private`");

        let error = definition.columns(&TablePath::new("public", "missing")).unwrap_err();
        insta::assert_snapshot!(error, @"unknown table `public.missing`");
    }

    #[test]
    fn duplicate_tables_are_rejected() {
        let mut definition = SchemaDefinition::new("dup");
        definition.push_table("public", TableDefinition::new("orders")).unwrap();

        let error = definition
            .push_table("public", TableDefinition::new("orders"))
            .unwrap_err();

        assert!(matches!(error, MetadataError::DuplicateTable(path) if path.table_name() == "orders"));
    }

    #[test]
    fn implicit_ordinals_fill_free_positions() {
        let mut first = ColumnDescriptor::new("first", TypeDescriptor::primitive("i64"));
        first.ordinal_position = 2;

        let table = TableDefinition::new("events")
            .column(ColumnDescriptor::new("second", TypeDescriptor::primitive("i64")))
            .column(first)
            .column(ColumnDescriptor::new("third", TypeDescriptor::primitive("i64")));

        let mut definition = SchemaDefinition::new("ordinals");
        let path = definition.push_table("public", table).unwrap();

        let positions = definition
            .columns(&path)
            .unwrap()
            .into_iter()
            .map(|column| (column.name, column.ordinal_position))
            .collect::<Vec<_>>();

        assert_eq!(
            positions,
            vec![
                (String::from("second"), 1),
                (String::from("first"), 2),
                (String::from("third"), 3)
            ]
        );
    }

    #[test]
    fn repeated_ordinals_are_rejected() {
        let mut left = ColumnDescriptor::new("left", TypeDescriptor::primitive("i64"));
        left.ordinal_position = 1;
        let mut right = ColumnDescriptor::new("right", TypeDescriptor::primitive("i64"));
        right.ordinal_position = 1;

        let mut definition = SchemaDefinition::new("ordinals");
        let error = definition
            .push_table("public", TableDefinition::new("pair").column(left).column(right))
            .unwrap_err();

        insta::assert_snapshot!(error, @"two columns of `public.pair` claim ordinal position 1");
    }
}
