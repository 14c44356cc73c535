use facade_schema::{ColumnDescriptor, TableInfo, TablePath};
use itertools::Itertools;

/// Escapes text for a Rust string literal. Absent text is empty.
pub(super) fn escape(text: Option<&str>) -> String {
    text.map(|text| text.escape_debug().to_string()).unwrap_or_default()
}

/// Renders each line of `base` as a doc comment line with the given indentation and
/// comment marker, e.g. `///` or `//!`. Blank lines are dropped.
pub(super) fn decorate(base: &str, indent: &str, marker: &str) -> String {
    base.lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .format_with("\n", |line, f| f(&format_args!("{indent}{marker} {line}")))
        .to_string()
}

pub(super) fn table_comment(info: &TableInfo, path: &TablePath) -> String {
    [
        format!("schema: {}", path.schema_name()),
        format!("name: {}", info.name),
        format!("type: {}", info.kind),
        format!("remarks: {}", trimmed(info.remarks.as_deref())),
    ]
    .join("\n")
}

pub(super) fn column_comment(column: &ColumnDescriptor) -> String {
    let size = match column.decimal_digits {
        Some(digits) if digits != 0 => format!("({}, {digits})", column.size),
        _ => format!("({})", column.size),
    };

    [
        format!("name: {}", column.name),
        format!("remarks: {}", trimmed(column.remarks.as_deref())),
        format!("type: {}{size}", column.type_name),
        format!("not null: {}", column.not_null),
    ]
    .join("\n")
}

fn trimmed(text: Option<&str>) -> &str {
    text.map(str::trim).unwrap_or_default()
}
