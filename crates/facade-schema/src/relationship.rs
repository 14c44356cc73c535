use crate::{ColumnDescriptor, CrossReferenceDescriptor, MetadataError, PrimaryKeyDescriptor, SchemaMetadata, TableInfo, TablePath};
use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

/// Everything the metadata provider knows about one table.
#[derive(Debug, Clone, PartialEq, Eq)]
struct TableDescription {
    path: TablePath,
    info: TableInfo,
    /// In ordinal order.
    columns: Vec<ColumnDescriptor>,
    primary_key: PrimaryKeyDescriptor,
    cross_references: Vec<CrossReferenceDescriptor>,
}

/// A node in a foreign key tree.
///
/// The root is the table being generated. Every other node is a table referenced by its
/// parent, together with the foreign key it was reached through. A table already expanded
/// elsewhere in the same tree appears as a leaf, which keeps trees of cyclic schemas finite.
#[derive(Debug, Clone)]
pub struct Relationship {
    description: Arc<TableDescription>,
    cross_reference: Option<CrossReferenceDescriptor>,
    children: Vec<Relationship>,
}

impl Relationship {
    pub fn path(&self) -> &TablePath {
        &self.description.path
    }

    pub fn info(&self) -> &TableInfo {
        &self.description.info
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.description.columns
    }

    pub fn primary_key(&self) -> &PrimaryKeyDescriptor {
        &self.description.primary_key
    }

    /// The foreign key leading from the parent node to this one. `None` for the root.
    pub fn cross_reference(&self) -> Option<&CrossReferenceDescriptor> {
        self.cross_reference.as_ref()
    }

    pub fn children(&self) -> &[Relationship] {
        &self.children
    }

    pub fn is_root(&self) -> bool {
        self.cross_reference.is_none()
    }

    /// Number of nodes in the tree, this one included.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Relationship::node_count).sum::<usize>()
    }
}

/// Builds foreign key trees from a metadata provider.
///
/// Holds two caches. Table descriptions are read from the provider once per table and kept
/// for the lifetime of the factory. Resolved trees are kept until [`Self::clear_cache`].
pub struct RelationshipFactory<M> {
    metadata: M,
    descriptions: HashMap<TablePath, Arc<TableDescription>>,
    relationships: HashMap<TablePath, Arc<Relationship>>,
}

impl<M: SchemaMetadata> RelationshipFactory<M> {
    pub fn new(metadata: M) -> Self {
        Self {
            metadata,
            descriptions: HashMap::new(),
            relationships: HashMap::new(),
        }
    }

    pub fn metadata(&self) -> &M {
        &self.metadata
    }

    /// The tree rooted at `path`, built on first request.
    pub fn resolve(&mut self, path: &TablePath) -> Result<Arc<Relationship>, MetadataError> {
        if let Some(relationship) = self.relationships.get(path) {
            return Ok(relationship.clone());
        }

        let mut expanded = HashSet::from([path.clone()]);
        let description = self.describe(path)?;
        let children = self.expand(&description, &mut expanded)?;

        let relationship = Arc::new(Relationship {
            description,
            cross_reference: None,
            children,
        });

        self.relationships.insert(path.clone(), relationship.clone());

        Ok(relationship)
    }

    /// Drops resolved trees. Table descriptions stay cached.
    pub fn clear_cache(&mut self) {
        tracing::debug!("Releasing {} cached relationship trees", self.relationships.len());
        self.relationships.clear();
    }

    fn expand(
        &mut self,
        parent: &TableDescription,
        expanded: &mut HashSet<TablePath>,
    ) -> Result<Vec<Relationship>, MetadataError> {
        let mut children = Vec::with_capacity(parent.cross_references.len());

        for cross_reference in &parent.cross_references {
            let description = self.describe(&cross_reference.references)?;

            let grandchildren = if expanded.insert(cross_reference.references.clone()) {
                self.expand(&description, expanded)?
            } else {
                Vec::new()
            };

            children.push(Relationship {
                description,
                cross_reference: Some(cross_reference.clone()),
                children: grandchildren,
            });
        }

        Ok(children)
    }

    fn describe(&mut self, path: &TablePath) -> Result<Arc<TableDescription>, MetadataError> {
        if let Some(description) = self.descriptions.get(path) {
            return Ok(description.clone());
        }

        let description = Arc::new(TableDescription {
            path: path.clone(),
            info: self.metadata.table_info(path)?,
            columns: self.metadata.columns(path)?,
            primary_key: self.metadata.primary_key(path)?,
            cross_references: self.metadata.cross_references(path)?,
        });

        self.descriptions.insert(path.clone(), description.clone());

        Ok(description)
    }
}
