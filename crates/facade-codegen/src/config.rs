use serde::{Deserialize, Serialize};
use std::{io, path::Path};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read configuration {}: {source}", path.display())]
    Read { path: std::path::PathBuf, source: io::Error },
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Settings of one generation run, usually read from a TOML file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Rust path of the module all facades are generated under. A leading `crate` segment
    /// does not become a directory.
    pub root_module: String,
    /// Trait implemented by every table facade.
    pub facade_parent: String,
    /// Trait implemented by every row type.
    pub row_parent: String,
    /// Render every numeric column as `numeric_type`.
    pub unify_numeric: bool,
    pub numeric_type: String,
    /// Nullable columns get `Option` getters, not-null and key columns get checked setters.
    pub null_guard: bool,
    /// Label of the character set output is written in, e.g. `utf-8` or `shift_jis`.
    pub charset: String,
    /// Pipe generated code through `rustfmt`.
    pub rustfmt: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            root_module: String::from("crate::facade"),
            facade_parent: String::from("facade_runtime::TableFacade"),
            row_parent: String::from("facade_runtime::RowFacade"),
            unify_numeric: false,
            numeric_type: String::from("facade_runtime::Numeric"),
            null_guard: true,
            charset: String::from("utf-8"),
            rustfmt: false,
        }
    }
}

impl GeneratorConfig {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let toml = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(toml::from_str(&toml)?)
    }

    /// Module path segments below the crate root, e.g. `["facade"]` for `crate::facade`.
    pub fn root_module_segments(&self) -> Vec<String> {
        self.root_module
            .split("::")
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .skip_while(|segment| *segment == "crate")
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::GeneratorConfig;
    use indoc::indoc;

    #[test]
    fn empty_config_is_default() {
        let config: GeneratorConfig = toml::from_str("").unwrap();

        assert_eq!(config, GeneratorConfig::default());
    }

    #[test]
    fn partial_config() {
        let config: GeneratorConfig = toml::from_str(indoc! {r#"
            root_module = "crate::db::facades"
            unify_numeric = true
            charset = "shift_jis"
        "#})
        .unwrap();

        assert_eq!(config.root_module_segments(), vec!["db", "facades"]);
        assert!(config.unify_numeric);
        assert!(config.null_guard);
        assert_eq!(config.charset, "shift_jis");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let error = toml::from_str::<GeneratorConfig>("use_number_class = true").unwrap_err();

        assert!(error.to_string().contains("unknown field `use_number_class`"), "{error}");
    }

    #[test]
    fn root_module_outside_crate() {
        let config = GeneratorConfig {
            root_module: String::from("facades::generated"),
            ..Default::default()
        };

        assert_eq!(config.root_module_segments(), vec!["facades", "generated"]);
    }
}
