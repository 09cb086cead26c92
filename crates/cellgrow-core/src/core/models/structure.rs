use super::atom::Atom;
use super::cell::UnitCell;
use super::error::ModelError;
use crate::core::symmetry::table::SymmetryTable;
use std::collections::HashSet;

/// A validated crystal structure: unit cell, symmetry table and asymmetric-unit atoms.
///
/// Atom indices used throughout the engine refer to positions in [`Self::atoms`].
#[derive(Debug, Clone, PartialEq)]
pub struct CrystalStructure {
    cell: UnitCell,
    symmetry: SymmetryTable,
    atoms: Vec<Atom>,
}

impl CrystalStructure {
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidGeometry`] for the first atom failing
    /// [`Atom::validate`] and [`ModelError::Configuration`] for a duplicated label.
    pub fn new(
        cell: UnitCell,
        symmetry: SymmetryTable,
        atoms: Vec<Atom>,
    ) -> Result<Self, ModelError> {
        let mut labels = HashSet::with_capacity(atoms.len());
        for atom in &atoms {
            atom.validate()?;
            if !labels.insert(atom.label.as_str()) {
                return Err(ModelError::Configuration(format!(
                    "duplicate atom label '{}' in asymmetric unit",
                    atom.label
                )));
            }
        }
        Ok(Self {
            cell,
            symmetry,
            atoms,
        })
    }

    pub fn cell(&self) -> &UnitCell {
        &self.cell
    }

    pub fn symmetry(&self) -> &SymmetryTable {
        &self.symmetry
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn has_hydrogens(&self) -> bool {
        self.atoms.iter().any(|a| a.element.is_hydrogen())
    }

    pub fn has_disorder(&self) -> bool {
        self.atoms.iter().any(|a| a.disorder_group != 0)
    }
}
