use std::result;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MapgenError {
    #[error("unknown archetype id '{0}'")]
    UnknownArchetype(String),
    #[error("unknown template id '{0}'")]
    UnknownTemplate(String),
    #[error("unknown generation pass id '{0}'")]
    UnknownPass(String),
    #[error("building rotation must be 0..=3, got {0}")]
    InvalidRotation(u8),
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),
    #[error("invalid generation config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = result::Result<T, MapgenError>;
