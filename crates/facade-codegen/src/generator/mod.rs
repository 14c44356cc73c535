mod comment;
mod names;

pub use names::{is_generatable_table_name, schema_module, unit_file_name};

use crate::{Arguments, CodeFormatter, DefaultCodeFormatter, FormatError, FragmentKind, GeneratorConfig, TemplateStore};
use facade_schema::{ColumnDescriptor, Relationship, TablePath, TypeDescriptor};
use indexmap::{IndexMap, IndexSet};
use itertools::Itertools;

const INDENT: &str = "    ";
const PRIMARY_KEY_IMPORT: &str = "use facade_runtime::PrimaryKey;";
const FOREIGN_KEY_IMPORT: &str = "use facade_runtime::ForeignKey;";
/// Methods of the generated `Assist` that relationship methods must not shadow.
const RESERVED_RELATIONSHIP_NAMES: &[&str] = &["new"];

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("`{name}` is not a legal identifier")]
    IllegalName { name: String },
    #[error("`{path}` is not the root of its relationship tree")]
    NotRoot { path: TablePath },
    #[error(transparent)]
    Format(#[from] FormatError),
}

/// Renders one source file per table from a [`TemplateStore`].
pub struct UnitGenerator<F = DefaultCodeFormatter> {
    templates: TemplateStore,
    config: GeneratorConfig,
    code_formatter: F,
}

impl UnitGenerator {
    pub fn new(templates: TemplateStore, config: GeneratorConfig) -> Self {
        Self::with_code_formatter(templates, config, DefaultCodeFormatter)
    }
}

impl<F: CodeFormatter> UnitGenerator<F> {
    pub fn with_code_formatter(templates: TemplateStore, config: GeneratorConfig, code_formatter: F) -> Self {
        Self {
            templates,
            config,
            code_formatter,
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Rust path of the module holding the facades of `schema`.
    pub fn module_path(&self, schema: &str) -> String {
        format!("{}::{}", self.config.root_module, schema_module(schema))
    }

    /// Generates the source of the table at the root of `relationship`.
    pub fn generate(&self, relationship: &Relationship) -> Result<String, GenerateError> {
        if !relationship.is_root() {
            return Err(GenerateError::NotRoot {
                path: relationship.path().clone(),
            });
        }

        let target = relationship.path();
        let table = target.table_name();

        if !is_generatable_table_name(table) {
            tracing::warn!("invalid name: {table}");
            return Err(GenerateError::IllegalName { name: table.to_string() });
        }

        let package = self.module_path(target.schema_name());
        let mut imports = IndexSet::new();
        let mut blocks = IndexMap::new();

        self.render_columns(relationship, &package, &mut blocks)?;

        let primary_key = relationship.primary_key();

        let primary_key_part = if primary_key.is_empty() {
            String::new()
        } else {
            let mut arguments = Arguments::new();
            arguments
                .set("PK", comment::escape(Some(primary_key.name.as_str())))
                .set("PK_COLUMNS", quoted(&primary_key.columns))
                .set("PSEUDO", primary_key.pseudo.to_string());

            imports.insert(PRIMARY_KEY_IMPORT);

            self.code_formatter
                .format_primary_key_part(self.templates.fragment(FragmentKind::PrimaryKeyPart), &arguments)?
        };

        blocks.insert(FragmentKind::PrimaryKeyPart, primary_key_part);

        self.render_relationships(relationship, &package, &mut blocks)?;

        let has_relationships = !relationship.children().is_empty();

        if has_relationships {
            imports.insert(FOREIGN_KEY_IMPORT);
        }

        let template = self.templates.root().erase(has_relationships);
        let info = relationship.info();

        let mut arguments = Arguments::new();
        arguments
            .set("PACKAGE", package.as_str())
            .set("SCHEMA", comment::escape(Some(target.schema_name())))
            .set("TABLE", table)
            .set("IMPORTS", imports.iter().map(|import| format!("{import}\n")).join(""))
            .set("PARENT", self.config.facade_parent.as_str())
            .set("ROW_PARENT", self.config.row_parent.as_str())
            .set(
                "TABLE_COMMENT",
                comment::decorate(&comment::table_comment(info, target), "", "//!"),
            )
            .set("TYPE", info.kind.as_str())
            .set("REMARKS", comment::escape(info.remarks.as_deref()));

        for (kind, block) in blocks {
            arguments.set(kind.block_placeholder(), block);
        }

        Ok(self.code_formatter.format(&template, &arguments)?)
    }

    fn render_columns(
        &self,
        relationship: &Relationship,
        package: &str,
        blocks: &mut IndexMap<FragmentKind, String>,
    ) -> Result<(), GenerateError> {
        let mut column_names = String::new();
        let mut accessors = String::new();
        let mut fields = String::new();
        let mut initializers = String::new();

        for column in relationship.columns() {
            let arguments = self.column_arguments(column, package, relationship.path().table_name())?;

            column_names.push_str(&self.code_formatter.format_column_names_part(
                self.templates.fragment(FragmentKind::ColumnNamesPart),
                &arguments,
            )?);

            accessors.push_str(&self.code_formatter.format_row_property_accessor_part(
                self.templates.fragment(FragmentKind::RowPropertyAccessorPart),
                &arguments,
            )?);

            fields.push_str(
                &self
                    .code_formatter
                    .format_column_part1(self.templates.fragment(FragmentKind::ColumnPart1), &arguments)?,
            );

            initializers.push_str(
                &self
                    .code_formatter
                    .format_column_part2(self.templates.fragment(FragmentKind::ColumnPart2), &arguments)?,
            );
        }

        blocks.insert(FragmentKind::ColumnNamesPart, column_names);
        blocks.insert(FragmentKind::RowPropertyAccessorPart, accessors);
        blocks.insert(FragmentKind::ColumnPart1, fields);
        blocks.insert(FragmentKind::ColumnPart2, initializers);

        Ok(())
    }

    fn column_arguments(&self, column: &ColumnDescriptor, package: &str, table: &str) -> Result<Arguments, GenerateError> {
        let type_name = self.rendered_type(&column.ty);

        let cast = if column.ty.is_object() {
            String::new()
        } else {
            format!("::<{type_name}>")
        };

        let column_name = names::safe(&column.name)?;

        let (null_check, return_type, suffix, optional) = if !self.config.null_guard {
            (String::new(), type_name.clone(), ".unwrap_or_default()", false)
        } else if column.not_null || column.primary_key {
            let message = comment::escape(Some(format!("{} must not be null", column.name).as_str()));

            (
                format!("assert!(value.is_some(), \"{message}\");\n{INDENT}{INDENT}{INDENT}"),
                type_name.clone(),
                ".unwrap_or_default()",
                false,
            )
        } else {
            (String::new(), format!("Option<{type_name}>"), "", true)
        };

        let column_comment = comment::column_comment(column);

        let mut arguments = Arguments::new();
        arguments
            .set("PACKAGE", package)
            .set("TABLE", table)
            .set("COLUMN", column_name.as_str())
            .set("CONSTANT", names::constant(&column_name))
            .set("METHOD", column_name.as_str())
            .set("TYPE", type_name)
            .set("CAST", cast)
            .set("COMMENT_1", comment::decorate(&column_comment, INDENT, "///"))
            .set("COMMENT_2", comment::decorate(&column_comment, &INDENT.repeat(2), "///"))
            .set("NULL_CHECK", null_check)
            .set("RETURN_TYPE", return_type)
            .set("SUFFIX", suffix)
            .set("OPTIONAL", optional.to_string())
            .set("DB_TYPE", column.db_type.to_string())
            .set("TYPE_NAME", comment::escape(Some(column.type_name.as_str())))
            .set("SIZE", column.size.to_string())
            .set("HAS_DECIMAL_DIGITS", column.has_decimal_digits().to_string())
            .set("DECIMAL_DIGITS", column.decimal_digits.unwrap_or_default().to_string())
            .set("REMARKS", comment::escape(column.remarks.as_deref()))
            .set_optional(
                "DEFAULT",
                column.default_value.as_deref().map(|value| comment::escape(Some(value))),
            )
            .set("ORDINAL_POSITION", column.ordinal_position.to_string())
            .set("NOT_NULL", column.not_null.to_string());

        Ok(arguments)
    }

    fn render_relationships(
        &self,
        relationship: &Relationship,
        package: &str,
        blocks: &mut IndexMap<FragmentKind, String>,
    ) -> Result<(), GenerateError> {
        let duplicates = duplicate_checker(relationship);
        let mut relationship_names = IndexSet::new();

        let mut foreign_keys = String::new();
        let mut row_relationships = String::new();
        let mut table_relationships = String::new();

        for child in relationship.children() {
            let Some(cross_reference) = child.cross_reference() else {
                continue;
            };

            let child_path = child.path();
            let child_table = child_path.table_name();
            let foreign_key = cross_reference.name.as_str();

            let relationship_name = if duplicates.get(child_table).copied().unwrap_or_default() {
                names::sanitize(&format!("{child_table}__{foreign_key}"))
            } else {
                names::sanitize(child_table)
            };

            if RESERVED_RELATIONSHIP_NAMES.contains(&relationship_name.as_str())
                || !relationship_names.insert(relationship_name.clone())
            {
                tracing::warn!("relationship name {relationship_name} is already taken");
                return Err(GenerateError::IllegalName { name: relationship_name });
            }

            let mut arguments = Arguments::new();
            arguments
                .set("PACKAGE", package)
                .set("TABLE", relationship.path().table_name())
                .set("REFERENCE_PACKAGE", self.module_path(child_path.schema_name()))
                .set("REFERENCE", child_table)
                .set("REFERENCE_PATH", comment::escape(Some(&child_path.to_string())))
                .set("FK", comment::escape(Some(foreign_key)))
                .set("FK_CONSTANT", names::constant(&names::sanitize(foreign_key)))
                .set("FK_COLUMNS", cross_reference.columns.join(", "))
                .set("ANNOTATION_FK_COLUMNS", quoted(&cross_reference.columns))
                .set("REF_COLUMNS", quoted(&cross_reference.ref_columns))
                .set("PSEUDO", cross_reference.pseudo.to_string())
                .set("METHOD", format!("related_{relationship_name}"))
                .set("RELATIONSHIP", relationship_name);

            foreign_keys.push_str(
                &self
                    .code_formatter
                    .format_foreign_keys_part(self.templates.fragment(FragmentKind::ForeignKeysPart), &arguments)?,
            );

            row_relationships.push_str(&self.code_formatter.format_row_relationship_part(
                self.templates.fragment(FragmentKind::RowRelationshipPart),
                &arguments,
            )?);

            table_relationships.push_str(&self.code_formatter.format_table_relationship_part(
                self.templates.fragment(FragmentKind::TableRelationshipPart),
                &arguments,
            )?);
        }

        blocks.insert(FragmentKind::ForeignKeysPart, foreign_keys);
        blocks.insert(FragmentKind::RowRelationshipPart, row_relationships);
        blocks.insert(FragmentKind::TableRelationshipPart, table_relationships);

        Ok(())
    }

    /// The type a column value is exposed as.
    fn rendered_type(&self, ty: &TypeDescriptor) -> String {
        let name = if self.config.unify_numeric && ty.numeric {
            self.config.numeric_type.as_str()
        } else if ty.is_array() || ty.is_object() {
            ty.name.as_str()
        } else {
            ty.wrapper.as_deref().unwrap_or(&ty.name)
        };

        if ty.is_array() {
            format!("Vec<{name}>")
        } else {
            name.to_string()
        }
    }
}

/// Child table name to whether more than one child references it.
fn duplicate_checker(relationship: &Relationship) -> IndexMap<&str, bool> {
    let mut checker = IndexMap::new();

    for child in relationship.children() {
        checker
            .entry(child.path().table_name())
            .and_modify(|duplicated| *duplicated = true)
            .or_insert(false);
    }

    checker
}

fn quoted(names: &[String]) -> String {
    names.iter().map(|name| format!("\"{}\"", name.escape_debug())).join(", ")
}
