use super::{
    scanner::{tokenize, TokenKind},
    Template, TemplateError,
};
use indexmap::IndexMap;
use std::{fmt, path::Path};

const BUNDLED: &str = include_str!("../../templates/table_facade.rs.tmpl");

/// The reusable slices of a master template.
///
/// Variants are listed in extraction order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FragmentKind {
    ColumnNamesPart,
    PrimaryKeyPart,
    ForeignKeysPart,
    RowPropertyAccessorPart,
    RowRelationshipPart,
    ColumnPart1,
    ColumnPart2,
    TableRelationshipPart,
}

impl FragmentKind {
    pub const ALL: [FragmentKind; 8] = [
        FragmentKind::ColumnNamesPart,
        FragmentKind::PrimaryKeyPart,
        FragmentKind::ForeignKeysPart,
        FragmentKind::RowPropertyAccessorPart,
        FragmentKind::RowRelationshipPart,
        FragmentKind::ColumnPart1,
        FragmentKind::ColumnPart2,
        FragmentKind::TableRelationshipPart,
    ];

    /// The key embedded in the fragment's delimiters.
    pub fn key(self) -> &'static str {
        match self {
            FragmentKind::ColumnNamesPart => "ColumnNamesPart",
            FragmentKind::PrimaryKeyPart => "PrimaryKeyPart",
            FragmentKind::ForeignKeysPart => "ForeignKeysPart",
            FragmentKind::RowPropertyAccessorPart => "RowPropertyAccessorPart",
            FragmentKind::RowRelationshipPart => "RowRelationshipPart",
            FragmentKind::ColumnPart1 => "ColumnPart1",
            FragmentKind::ColumnPart2 => "ColumnPart2",
            FragmentKind::TableRelationshipPart => "TableRelationshipPart",
        }
    }

    /// The root template placeholder the rendered fragments are spliced into.
    pub fn block_placeholder(self) -> &'static str {
        match self {
            FragmentKind::ColumnNamesPart => "COLUMN_NAMES_PART",
            FragmentKind::PrimaryKeyPart => "PRIMARY_KEY_PART",
            FragmentKind::ForeignKeysPart => "FOREIGN_KEYS_PART",
            FragmentKind::RowPropertyAccessorPart => "ROW_PROPERTY_ACCESSOR_PART",
            FragmentKind::RowRelationshipPart => "ROW_RELATIONSHIP_PART",
            FragmentKind::ColumnPart1 => "COLUMN_PART1",
            FragmentKind::ColumnPart2 => "COLUMN_PART2",
            FragmentKind::TableRelationshipPart => "TABLE_RELATIONSHIP_PART",
        }
    }
}

impl fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Pulls the fragment delimited by two `/*==key==*/` markers out of `source`.
///
/// Returns the text strictly between the markers, and the source with both markers and the
/// enclosed text removed.
pub fn extract(source: &str, key: &str) -> Result<(String, String), TemplateError> {
    let markers = tokenize(source)
        .into_iter()
        .filter(|token| token.kind == TokenKind::Fragment(key))
        .map(|token| token.span)
        .collect::<Vec<_>>();

    let (open, close) = match markers.as_slice() {
        [open, close] => (open, close),
        [] => return Err(TemplateError::MissingFragment { key: key.to_string() }),
        [_] => return Err(TemplateError::UnpairedFragment { key: key.to_string() }),
        more => {
            return Err(TemplateError::RepeatedFragment {
                key: key.to_string(),
                count: more.len(),
            })
        }
    };

    let fragment = source[open.end..close.start].to_string();
    let remainder = [&source[..open.start], &source[close.end..]].concat();

    Ok((fragment, remainder))
}

/// A master template sliced into its root template and fragments.
///
/// Loaded once and shared read-only by every generation.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    root: Template,
    fragments: IndexMap<FragmentKind, Template>,
}

impl TemplateStore {
    /// The master template compiled into this crate.
    pub fn bundled() -> Result<Self, TemplateError> {
        Self::from_source(BUNDLED)
    }

    pub fn from_path(path: &Path) -> Result<Self, TemplateError> {
        let source = std::fs::read_to_string(path).map_err(|source| TemplateError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_source(&source)
    }

    pub fn from_source(source: &str) -> Result<Self, TemplateError> {
        let mut remainder = source.to_string();
        let mut fragments = IndexMap::with_capacity(FragmentKind::ALL.len());

        for kind in FragmentKind::ALL {
            let (fragment, rest) = extract(&remainder, kind.key())?;
            fragments.insert(kind, Template::parse(&fragment)?);
            remainder = rest;
        }

        let root = Template::parse(&remainder)?;

        tracing::debug!("Loaded master template with {} fragments", fragments.len());

        Ok(Self { root, fragments })
    }

    pub fn root(&self) -> &Template {
        &self.root
    }

    pub fn fragment(&self, kind: FragmentKind) -> &Template {
        // Every kind is inserted on construction.
        &self.fragments[&kind]
    }
}
