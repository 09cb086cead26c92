//! # Core Module
//!
//! Fundamental building blocks for crystallographic structure expansion.
//!
//! ## Architecture
//!
//! - **Structural Models** ([`models`]) - Unit cell, atoms, crystal structures and expanded molecules
//! - **Symmetry** ([`symmetry`]) - Symmetry operators, identity-first operator tables and space-group lookup
//! - **Chemical Knowledge** ([`elements`]) - Element symbols and the covalent radius table
//! - **File I/O** ([`io`]) - Structure input, molfile output, CIF-block extraction and checksums
//! - **Utilities** ([`utils`]) - Minimum-image folding and Euclidean helpers
//!
//! ## Scientific Foundation
//!
//! - **Triclinic metric** for distances computed directly in fractional space
//! - **Minimum-image convention** to find the nearest periodic copy of an atom
//! - **Covalent radii** summed and scaled as a bonding heuristic

pub mod elements;
pub mod io;
pub mod models;
pub mod symmetry;
pub mod utils;
