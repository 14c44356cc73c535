use crate::generator::{schema_module, unit_file_name, GenerateError};
use encoding_rs::Encoding;
use facade_schema::TablePath;
use std::{
    fmt, io,
    io::Write as _,
    path::PathBuf,
};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("unknown charset `{0}`")]
    UnknownCharset(String),
    #[error("`{unit}` contains characters that cannot be written as {charset}")]
    Unencodable { unit: UnitId, charset: &'static str },
    #[error("`{unit}` is not valid {charset}")]
    Undecodable { unit: UnitId, charset: &'static str },
    #[error("could not read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("could not write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Address of one persisted unit: the module path it belongs to and its file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnitId {
    modules: Vec<String>,
    file_name: String,
}

impl UnitId {
    pub fn new(modules: Vec<String>, file_name: impl Into<String>) -> Self {
        Self {
            modules,
            file_name: file_name.into(),
        }
    }

    /// The unit generated for `path`, below the given root module segments.
    pub fn for_table(root_modules: &[String], path: &TablePath) -> Result<Self, GenerateError> {
        let mut modules = root_modules.to_vec();
        modules.push(schema_module(path.schema_name()));

        Ok(Self::new(modules, unit_file_name(path.table_name())?))
    }

    pub fn modules(&self) -> &[String] {
        &self.modules
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Path of the unit relative to the store root.
    pub fn relative_path(&self) -> PathBuf {
        self.modules.iter().chain(Some(&self.file_name)).collect()
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for module in &self.modules {
            write!(f, "{module}/")?;
        }

        f.write_str(&self.file_name)
    }
}

/// Where generated units are persisted.
pub trait UnitStore {
    fn exists(&self, unit: &UnitId) -> Result<bool, StoreError>;

    fn load(&self, unit: &UnitId) -> Result<String, StoreError>;

    /// Persists `text`, replacing any previous version of the unit.
    fn write(&self, unit: &UnitId, text: &str) -> Result<(), StoreError>;

    /// Whether the persisted unit holds exactly `text`.
    fn is_current(&self, unit: &UnitId, text: &str) -> Result<bool, StoreError> {
        Ok(self.exists(unit)? && self.load(unit)? == text)
    }
}

impl<S: UnitStore + ?Sized> UnitStore for &S {
    fn exists(&self, unit: &UnitId) -> Result<bool, StoreError> {
        (**self).exists(unit)
    }

    fn load(&self, unit: &UnitId) -> Result<String, StoreError> {
        (**self).load(unit)
    }

    fn write(&self, unit: &UnitId, text: &str) -> Result<(), StoreError> {
        (**self).write(unit, text)
    }

    fn is_current(&self, unit: &UnitId, text: &str) -> Result<bool, StoreError> {
        (**self).is_current(unit, text)
    }
}

/// Stores units as files below a root directory, encoded in one character set.
///
/// Writes go to a temporary file in the target directory first, which then replaces the
/// unit, so a unit is never left half written.
#[derive(Debug, Clone)]
pub struct FileSystemStore {
    root: PathBuf,
    encoding: &'static Encoding,
}

impl FileSystemStore {
    /// `charset` is a WHATWG encoding label such as `utf-8`, `shift_jis` or `latin1`.
    pub fn new(root: impl Into<PathBuf>, charset: &str) -> Result<Self, StoreError> {
        let encoding =
            Encoding::for_label(charset.trim().as_bytes()).ok_or_else(|| StoreError::UnknownCharset(charset.to_string()))?;

        Ok(Self {
            root: root.into(),
            // UTF-16 labels resolve to encodings that can only decode.
            encoding: encoding.output_encoding(),
        })
    }

    pub fn charset(&self) -> &'static str {
        self.encoding.name()
    }

    pub fn path_of(&self, unit: &UnitId) -> PathBuf {
        self.root.join(unit.relative_path())
    }

    fn encode(&self, unit: &UnitId, text: &str) -> Result<Vec<u8>, StoreError> {
        let (bytes, _, unmappable) = self.encoding.encode(text);

        if unmappable {
            return Err(StoreError::Unencodable {
                unit: unit.clone(),
                charset: self.encoding.name(),
            });
        }

        Ok(bytes.into_owned())
    }

    fn read_bytes(&self, unit: &UnitId) -> Result<Vec<u8>, StoreError> {
        let path = self.path_of(unit);
        std::fs::read(&path).map_err(|source| StoreError::Read { path, source })
    }
}

impl UnitStore for FileSystemStore {
    fn exists(&self, unit: &UnitId) -> Result<bool, StoreError> {
        let path = self.path_of(unit);
        path.try_exists().map_err(|source| StoreError::Read { path, source })
    }

    fn load(&self, unit: &UnitId) -> Result<String, StoreError> {
        let bytes = self.read_bytes(unit)?;

        self.encoding
            .decode_without_bom_handling_and_without_replacement(&bytes)
            .map(|text| text.into_owned())
            .ok_or_else(|| StoreError::Undecodable {
                unit: unit.clone(),
                charset: self.encoding.name(),
            })
    }

    fn write(&self, unit: &UnitId, text: &str) -> Result<(), StoreError> {
        let bytes = self.encode(unit, text)?;
        let path = self.path_of(unit);

        let directory = path.parent().unwrap_or(self.root.as_path());
        let write_error = |source: io::Error| StoreError::Write {
            path: path.clone(),
            source,
        };

        std::fs::create_dir_all(directory).map_err(write_error)?;

        let mut file = tempfile::NamedTempFile::new_in(directory).map_err(write_error)?;
        file.write_all(&bytes).map_err(write_error)?;
        file.persist(&path).map_err(|error| write_error(error.error))?;

        Ok(())
    }

    /// Compares encoded bytes, so text that encodes the same way counts as unchanged.
    fn is_current(&self, unit: &UnitId, text: &str) -> Result<bool, StoreError> {
        if !self.exists(unit)? {
            return Ok(false);
        }

        Ok(self.read_bytes(unit)? == self.encode(unit, text)?)
    }
}
