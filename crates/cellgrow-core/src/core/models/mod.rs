//! # Core Models Module
//!
//! Data structures describing a crystal structure before and after expansion.
//!
//! ## Key Components
//!
//! - [`cell`] - Unit cell constants, the triclinic metric and the orthogonalization matrix
//! - [`atom`] - Asymmetric-unit atoms with fractional coordinates and disorder information
//! - [`structure`] - A validated bundle of cell, symmetry table and atoms
//! - [`molecule`] - Expanded Cartesian atoms and their bonds
//! - [`error`] - Configuration and geometry errors raised while building models
//!
//! ## Usage
//!
//! ```ignore
//! use cellgrow::core::models::{atom::Atom, cell::UnitCell, structure::CrystalStructure};
//! use cellgrow::core::symmetry::table::SymmetryTable;
//!
//! let cell = UnitCell::new(10.0, 10.0, 10.0, 90.0, 90.0, 90.0)?;
//! let symmetry = SymmetryTable::from_triplets(&["x, y, z"], false)?;
//! let atoms = vec![Atom::new("C1", "C".into(), Point3::new(0.0, 0.0, 0.0))];
//! let structure = CrystalStructure::new(cell, symmetry, atoms)?;
//! ```

pub mod atom;
pub mod cell;
pub mod error;
pub mod molecule;
pub mod structure;
