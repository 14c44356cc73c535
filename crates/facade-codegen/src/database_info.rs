use crate::{StoreError, UnitId, UnitStore};
use serde::{Deserialize, Serialize};

const FILE_NAME: &str = "database_info.toml";

#[derive(Debug, thiserror::Error)]
pub enum DatabaseInfoError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("could not serialize database info: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid database info: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Schema-wide facts stored next to the generated facades.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseInfo {
    /// Identifies the database the facades were generated from.
    pub stored_identifier: String,
    pub root_module: String,
}

impl DatabaseInfo {
    pub fn new(stored_identifier: impl Into<String>, root_module: impl Into<String>) -> Self {
        Self {
            stored_identifier: stored_identifier.into(),
            root_module: root_module.into(),
        }
    }

    /// Where the record lives: directly in the root module.
    pub fn unit_id(root_modules: &[String]) -> UnitId {
        UnitId::new(root_modules.to_vec(), FILE_NAME)
    }

    pub fn write(&self, store: &impl UnitStore, root_modules: &[String]) -> Result<(), DatabaseInfoError> {
        let unit = Self::unit_id(root_modules);
        store.write(&unit, &toml::to_string(self)?)?;

        tracing::debug!("Wrote database info to {unit}");

        Ok(())
    }

    /// The record of a previous run, if there is one.
    pub fn read(store: &impl UnitStore, root_modules: &[String]) -> Result<Option<Self>, DatabaseInfoError> {
        let unit = Self::unit_id(root_modules);

        if !store.exists(&unit)? {
            return Ok(None);
        }

        Ok(Some(toml::from_str(&store.load(&unit)?)?))
    }
}
