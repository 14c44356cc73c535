//! Generates one Rust facade module per database table.
//!
//! A master template is split into named fragments by a [`TemplateStore`]. The
//! [`UnitGenerator`] renders them with the [`Arguments`] derived from a table's relationship
//! tree, and a [`FacadeBuilder`] persists the results through a [`UnitStore`].
//! [`GenerationQueue`] follows foreign keys so that referenced tables are generated too.

mod arguments;
mod build;
mod code_formatter;
mod config;
mod database_info;
mod generator;
mod source_formatter;
mod store;
mod template;

pub use arguments::Arguments;
pub use build::{BuildError, BuildReport, FacadeBuilder, GenerationQueue, QueueState, UnitOutcome};
pub use code_formatter::{CodeFormatter, DefaultCodeFormatter};
pub use config::{ConfigError, GeneratorConfig};
pub use database_info::{DatabaseInfo, DatabaseInfoError};
pub use generator::{is_generatable_table_name, schema_module, unit_file_name, GenerateError, UnitGenerator};
pub use source_formatter::SourceFormatter;
pub use store::{FileSystemStore, StoreError, UnitId, UnitStore};
pub use template::{extract, FormatError, FragmentKind, Template, TemplateError, TemplateStore};
