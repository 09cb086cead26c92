use crate::core::elements::Element;
use nalgebra::Point3;
use std::fmt;

/// Where an expanded atom came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtomOrigin {
    /// An atom of the asymmetric unit itself.
    Asymmetric,
    /// A copy generated by applying a symmetry operator and a lattice translation.
    SymmetryGenerated {
        symmetry_index: usize,
        translation: [i32; 3],
    },
}

impl AtomOrigin {
    pub fn is_generated(&self) -> bool {
        matches!(self, AtomOrigin::SymmetryGenerated { .. })
    }
}

impl fmt::Display for AtomOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AtomOrigin::Asymmetric => f.write_str("asymmetric"),
            AtomOrigin::SymmetryGenerated {
                symmetry_index,
                translation: [h, k, l],
            } => write!(f, "symmgen {}_{}{}{}", symmetry_index + 1, 5 + h, 5 + k, 5 + l),
        }
    }
}

/// An atom of the expanded structure with Cartesian coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct PackedAtom {
    pub label: String,
    pub element: Element,
    /// Cartesian position in Ångström.
    pub position: Point3<f64>,
    /// Fractional position the Cartesian one was derived from.
    pub fractional: Point3<f64>,
    pub disorder_group: i32,
    pub occupancy: f64,
    pub u_iso: Option<f64>,
    /// Index of the asymmetric-unit atom this atom is (a copy of).
    pub source_index: usize,
    pub origin: AtomOrigin,
}

/// A bond between two atoms of a [`Molecule`], as zero-based indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Bond {
    pub atom1: usize,
    pub atom2: usize,
}

impl Bond {
    pub fn new(atom1: usize, atom2: usize) -> Self {
        Self { atom1, atom2 }
    }

    /// The same bond with the lower index first.
    pub fn normalized(self) -> Self {
        Self {
            atom1: self.atom1.min(self.atom2),
            atom2: self.atom1.max(self.atom2),
        }
    }
}

/// Expanded Cartesian atoms plus their bond list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Molecule {
    pub atoms: Vec<PackedAtom>,
    pub bonds: Vec<Bond>,
}

impl Molecule {
    pub fn new(atoms: Vec<PackedAtom>, bonds: Vec<Bond>) -> Self {
        Self { atoms, bonds }
    }

    pub fn generated_atom_count(&self) -> usize {
        self.atoms.iter().filter(|a| a.origin.is_generated()).count()
    }
}
