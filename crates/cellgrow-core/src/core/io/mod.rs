//! Provides input/output for crystal structures and expanded molecules.
//!
//! Structures are read from a TOML description or extracted from an already
//! tokenized CIF data block; expanded molecules are written as minimal molfiles
//! for visualization tooling. The SHELX checksum used to validate report text
//! embedded in CIF files also lives here.

pub mod checksum;
pub mod cif;
pub mod molfile;
pub mod structure;
pub mod traits;
