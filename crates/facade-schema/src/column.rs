use serde::{Deserialize, Serialize};

/// The shape of a column's value type.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// A scalar with a fixed native representation, such as `i64` or `bool`.
    #[default]
    Primitive,
    /// A list of values; the descriptor's name is the element type.
    Array,
    /// Anything else, rendered by name without a typed accessor.
    Object,
}

/// Describes the type a column value is exposed as in generated code.
///
/// Supplied by the schema layer. The generator renders it, it never inspects it further.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeDescriptor {
    #[serde(default)]
    pub kind: TypeKind,
    /// Canonical type name. For arrays this is the element type.
    pub name: String,
    /// Name used for a primitive when the value can be absent, replacing `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrapper: Option<String>,
    /// Marks number-like types, collapsed into one type when numeric unification is enabled.
    #[serde(default)]
    pub numeric: bool,
}

impl TypeDescriptor {
    pub fn primitive(name: impl Into<String>) -> Self {
        Self::with_kind(TypeKind::Primitive, name)
    }

    pub fn array(element: impl Into<String>) -> Self {
        Self::with_kind(TypeKind::Array, element)
    }

    pub fn object(name: impl Into<String>) -> Self {
        Self::with_kind(TypeKind::Object, name)
    }

    #[must_use]
    pub fn numeric(mut self) -> Self {
        self.numeric = true;
        self
    }

    #[must_use]
    pub fn with_wrapper(mut self, wrapper: impl Into<String>) -> Self {
        self.wrapper = Some(wrapper.into());
        self
    }

    pub fn is_array(&self) -> bool {
        self.kind == TypeKind::Array
    }

    pub fn is_object(&self) -> bool {
        self.kind == TypeKind::Object
    }

    fn with_kind(kind: TypeKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            wrapper: None,
            numeric: false,
        }
    }
}

/// A column of a table, as reported by the metadata provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeDescriptor,
    /// Database type code, in the numbering of the underlying driver.
    #[serde(default)]
    pub db_type: i32,
    /// Database type name, such as `int8` or `varchar`.
    #[serde(default)]
    pub type_name: String,
    #[serde(default)]
    pub size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimal_digits: Option<u32>,
    #[serde(default)]
    pub not_null: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    /// 1-based position of the column in its table. Zero means "not given".
    #[serde(default)]
    pub ordinal_position: u32,
    /// Whether the column is a member of the table's primary key.
    #[serde(default)]
    pub primary_key: bool,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            ty,
            db_type: 0,
            type_name: String::new(),
            size: 0,
            decimal_digits: None,
            not_null: false,
            default_value: None,
            remarks: None,
            ordinal_position: 0,
            primary_key: false,
        }
    }

    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    #[must_use]
    pub fn with_type_name(mut self, type_name: impl Into<String>, db_type: i32, size: u32) -> Self {
        self.type_name = type_name.into();
        self.db_type = db_type;
        self.size = size;
        self
    }

    #[must_use]
    pub fn with_default(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = Some(default_value.into());
        self
    }

    #[must_use]
    pub fn with_remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = Some(remarks.into());
        self
    }

    pub fn has_decimal_digits(&self) -> bool {
        self.decimal_digits.is_some()
    }
}
