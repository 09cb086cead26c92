//! # Symmetry Module
//!
//! Crystallographic symmetry in fractional space.
//!
//! - [`operator`] - Affine symmetry operators parsed from triplet notation (`"-x, y+1/2, -z"`)
//! - [`table`] - Identity-first, duplicate-free operator tables
//! - [`spacegroup`] - The narrow space-group lookup interface and a built-in table of common groups

pub mod operator;
pub mod spacegroup;
pub mod table;
