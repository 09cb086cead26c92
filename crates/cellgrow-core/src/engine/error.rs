use thiserror::Error;

use super::config::ConfigError;
use crate::core::elements::UnknownElementError;
use crate::core::io::molfile::MolFileError;
use crate::core::models::error::ModelError;
use crate::core::symmetry::spacegroup::SpaceGroupError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid structure: {0}")]
    Model(#[from] ModelError),

    #[error("{source}")]
    UnknownElement {
        #[from]
        source: UnknownElementError,
    },

    #[error("Space group lookup failed: {0}")]
    SpaceGroup(#[from] SpaceGroupError),

    #[error("Failed to write molecule: {0}")]
    Output(#[from] MolFileError),
}
