//! # cellgrow Core Library
//!
//! A library for turning the symmetry-compressed description of a crystal structure
//! (unit cell, symmetry operators, asymmetric-unit atoms) into complete, chemically
//! connected molecules ready for visualization and bonding analysis.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`UnitCell`, `SymmetryTable`,
//!   `CrystalStructure`), the covalent radius table, geometry helpers and I/O
//!   (structure files, molfile output, the CIF-block adapter and the SHELX checksum).
//!
//! - **[`engine`]: The Logic Core.** The computational tasks: the shortest distance
//!   matrix, fragment labeling, symmetry completion, packing and bond derivation,
//!   together with their configuration, errors and progress reporting.
//!
//! - **[`workflows`]: The Public API.** Ties `engine` and `core` together into the
//!   complete structure-growing pipeline.

pub mod core;
pub mod engine;
pub mod workflows;
