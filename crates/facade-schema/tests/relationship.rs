#![allow(unused_crate_dependencies)]

use facade_schema::{
    ColumnDescriptor, CrossReferenceDescriptor, MetadataError, PrimaryKeyDescriptor, Relationship,
    RelationshipFactory, SchemaDefinition, SchemaMetadata, TableDefinition, TableInfo, TablePath, TypeDescriptor,
};
use std::cell::Cell;

fn table(name: &str, references: &[(&str, &str)]) -> TableDefinition {
    let mut table = TableDefinition::new(name)
        .column(ColumnDescriptor::new("id", TypeDescriptor::primitive("i64").numeric()).not_null())
        .primary_key(PrimaryKeyDescriptor::new(format!("{name}_pkey"), ["id"]));

    for (fk, target) in references {
        table = table.foreign_key(CrossReferenceDescriptor::new(
            *fk,
            [format!("{target}_id")],
            TablePath::new("public", *target),
            ["id"],
        ));
    }

    table
}

fn render(relationship: &Relationship) -> String {
    fn walk(relationship: &Relationship, depth: usize, out: &mut String) {
        let via = relationship
            .cross_reference()
            .map(|fk| format!(" via {}", fk.name))
            .unwrap_or_default();

        out.push_str(&format!("{}{}{via}\n", "  ".repeat(depth), relationship.path()));

        for child in relationship.children() {
            walk(child, depth + 1, out);
        }
    }

    let mut out = String::new();
    walk(relationship, 0, &mut out);
    out
}

#[test]
fn cyclic_references_terminate() {
    let mut definition = SchemaDefinition::new("cycle");
    definition.push_table("public", table("a", &[("a_b_fkey", "b")])).unwrap();
    definition.push_table("public", table("b", &[("b_a_fkey", "a")])).unwrap();

    let mut factory = RelationshipFactory::new(definition);
    let root = factory.resolve(&TablePath::new("public", "a")).unwrap();

    assert!(root.is_root());
    insta::assert_snapshot!(render(&root), @r###"
    public.a
      public.b via a_b_fkey
        public.a via b_a_fkey
    "###);
}

#[test]
fn self_reference_is_a_leaf() {
    let mut definition = SchemaDefinition::new("self");
    definition
        .push_table("public", table("employee", &[("employee_manager_fkey", "employee")]))
        .unwrap();

    let mut factory = RelationshipFactory::new(definition);
    let root = factory.resolve(&TablePath::new("public", "employee")).unwrap();

    assert_eq!(root.node_count(), 2);
    assert!(root.children()[0].children().is_empty());
}

#[test]
fn diamond_expands_each_table_once() {
    let mut definition = SchemaDefinition::new("diamond");
    definition
        .push_table("public", table("orders", &[("orders_customer_fkey", "customer"), ("orders_shop_fkey", "shop")]))
        .unwrap();
    definition
        .push_table("public", table("customer", &[("customer_region_fkey", "region")]))
        .unwrap();
    definition
        .push_table("public", table("shop", &[("shop_region_fkey", "region")]))
        .unwrap();
    definition
        .push_table("public", table("region", &[("region_customer_fkey", "customer")]))
        .unwrap();

    let mut factory = RelationshipFactory::new(definition);
    let root = factory.resolve(&TablePath::new("public", "orders")).unwrap();

    insta::assert_snapshot!(render(&root), @r###"
    public.orders
      public.customer via orders_customer_fkey
        public.region via customer_region_fkey
          public.customer via region_customer_fkey
      public.shop via orders_shop_fkey
        public.region via shop_region_fkey
    "###);
}

#[test]
fn unknown_reference_fails() {
    let mut definition = SchemaDefinition::new("dangling");
    definition
        .push_table("public", table("orders", &[("orders_ghost_fkey", "ghost")]))
        .unwrap();

    let mut factory = RelationshipFactory::new(definition);
    let error = factory.resolve(&TablePath::new("public", "orders")).unwrap_err();

    assert!(matches!(error, MetadataError::UnknownTable(path) if path.table_name() == "ghost"));
}

/// Counts how often each table is read from the wrapped provider.
struct Counting {
    inner: SchemaDefinition,
    reads: Cell<usize>,
}

impl SchemaMetadata for Counting {
    fn tables(&self, schema: &str) -> Result<Vec<TablePath>, MetadataError> {
        self.inner.tables(schema)
    }

    fn table_info(&self, path: &TablePath) -> Result<TableInfo, MetadataError> {
        self.reads.set(self.reads.get() + 1);
        self.inner.table_info(path)
    }

    fn columns(&self, path: &TablePath) -> Result<Vec<ColumnDescriptor>, MetadataError> {
        self.inner.columns(path)
    }

    fn primary_key(&self, path: &TablePath) -> Result<PrimaryKeyDescriptor, MetadataError> {
        self.inner.primary_key(path)
    }

    fn cross_references(&self, path: &TablePath) -> Result<Vec<CrossReferenceDescriptor>, MetadataError> {
        self.inner.cross_references(path)
    }

    fn stored_identifier(&self) -> String {
        self.inner.stored_identifier()
    }
}

#[test]
fn descriptions_survive_cache_release() {
    let mut definition = SchemaDefinition::new("cache");
    definition.push_table("public", table("a", &[("a_b_fkey", "b")])).unwrap();
    definition.push_table("public", table("b", &[])).unwrap();

    let counting = Counting {
        inner: definition,
        reads: Cell::new(0),
    };

    let mut factory = RelationshipFactory::new(&counting);
    let a = TablePath::new("public", "a");

    let first = factory.resolve(&a).unwrap();
    let second = factory.resolve(&a).unwrap();
    assert!(std::sync::Arc::ptr_eq(&first, &second));

    factory.clear_cache();

    let third = factory.resolve(&a).unwrap();
    assert!(!std::sync::Arc::ptr_eq(&first, &third));

    factory.resolve(&TablePath::new("public", "b")).unwrap();

    assert_eq!(counting.reads.get(), 2);
}
