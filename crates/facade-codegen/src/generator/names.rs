//! Naming rules for generated modules and items.

use super::GenerateError;

/// Whether `name` can be used as-is as a Rust identifier. Keywords and `_` can't.
pub fn is_generatable_table_name(name: &str) -> bool {
    syn::parse_str::<syn::Ident>(name).is_ok()
}

/// File name of the unit generated for a table.
pub fn unit_file_name(table: &str) -> Result<String, GenerateError> {
    check_name(table)?;
    Ok(format!("{table}.rs"))
}

/// Module name for a schema: lower-cased, with characters outside `[a-z0-9_]` replaced by
/// `_`, and prefixed with `_` when that still is not an identifier.
pub fn schema_module(schema: &str) -> String {
    let module = schema
        .chars()
        .map(|c| match c.to_ascii_lowercase() {
            c @ ('a'..='z' | '0'..='9' | '_') => c,
            _ => '_',
        })
        .collect::<String>();

    prefixed_if_illegal(module)
}

pub(super) fn check_name(name: &str) -> Result<(), GenerateError> {
    if is_generatable_table_name(name) {
        Ok(())
    } else {
        Err(GenerateError::IllegalName { name: name.to_string() })
    }
}

/// A column name usable as an identifier, prefixed with `_` when needed.
pub(super) fn safe(name: &str) -> Result<String, GenerateError> {
    if is_generatable_table_name(name) {
        return Ok(name.to_string());
    }

    let prefixed = format!("_{name}");
    check_name(&prefixed)?;

    Ok(prefixed)
}

/// Forces `name` into an identifier by replacing what does not fit. Used for names that
/// only ever appear as parts of generated identifiers, such as foreign key names.
pub(super) fn sanitize(name: &str) -> String {
    let name = name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect::<String>();

    prefixed_if_illegal(name)
}

pub(super) fn constant(name: &str) -> String {
    name.to_uppercase()
}

fn prefixed_if_illegal(name: String) -> String {
    if is_generatable_table_name(&name) {
        name
    } else {
        format!("_{name}")
    }
}
