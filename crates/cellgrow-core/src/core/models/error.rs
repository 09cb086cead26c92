use thiserror::Error;

/// Errors raised while constructing or validating structural models.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    /// The inputs cannot describe a valid crystal: a degenerate cell, a missing
    /// identity operator, a malformed operator triplet or a duplicated atom label.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// An atom carries coordinates or an occupancy the engine cannot work with.
    #[error("Invalid geometry for atom '{label}': {reason}")]
    InvalidGeometry { label: String, reason: String },
}
