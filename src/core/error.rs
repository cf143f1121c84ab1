use thiserror::Error;

use crate::core::types::{HouseholdId, RegionId};

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Region already registered: {0:?}")]
    DuplicateId(RegionId),

    #[error("Unknown region: {0:?}")]
    UnknownRegion(RegionId),

    #[error("Household has no current region: {0:?}")]
    NotPlaced(HouseholdId),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ModelError>;
