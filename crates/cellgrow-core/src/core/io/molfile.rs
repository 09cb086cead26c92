use crate::core::io::traits::MoleculeFile;
use crate::core::models::molecule::Molecule;
use std::io::{self, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MolFileError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Inconsistent data: {0}")]
    Inconsistency(String),
}

/// Minimal molfile writer for visualization tooling.
///
/// The layout is a blank header, a `{atoms:>5}{bonds:>5}` count line, one
/// `X Y Z Element` line per atom, one line per bond with 1-based indices and bond
/// order 1, and an `M  END` / `$$$$` footer. It deliberately deviates from the
/// V2000 column widths and is not meant for exchange with cheminformatics software.
pub struct MolFile;

impl MolFile {
    /// Renders the molecule into a string.
    ///
    /// # Errors
    ///
    /// Returns [`MolFileError::Inconsistency`] when a bond references a missing atom.
    pub fn render(molecule: &Molecule) -> Result<String, MolFileError> {
        let mut buffer = Vec::new();
        Self::write_to(molecule, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    fn check_bonds(molecule: &Molecule) -> Result<(), MolFileError> {
        let n = molecule.atoms.len();
        for bond in &molecule.bonds {
            if bond.atom1 >= n || bond.atom2 >= n {
                return Err(MolFileError::Inconsistency(format!(
                    "Bond {}-{} references an atom outside 0..{}",
                    bond.atom1, bond.atom2, n
                )));
            }
            if bond.atom1 == bond.atom2 {
                return Err(MolFileError::Inconsistency(format!(
                    "Bond connects atom {} to itself",
                    bond.atom1
                )));
            }
        }
        Ok(())
    }
}

impl MoleculeFile for MolFile {
    type Error = MolFileError;

    fn write_to(molecule: &Molecule, writer: &mut impl Write) -> Result<(), Self::Error> {
        Self::check_bonds(molecule)?;

        write!(writer, "\n\n\n")?;
        writeln!(
            writer,
            "{:>5}{:>5}",
            molecule.atoms.len(),
            molecule.bonds.len()
        )?;

        let atom_lines: Vec<String> = molecule
            .atoms
            .iter()
            .map(|atom| {
                format!(
                    "{:>10.4}{:>10.4}{:>10.4} {:<2}",
                    atom.position.x,
                    atom.position.y,
                    atom.position.z,
                    atom.element.symbol()
                )
            })
            .collect();
        writeln!(writer, "{}", atom_lines.join("\n"))?;

        let bond_lines: Vec<String> = molecule
            .bonds
            .iter()
            .map(|bond| format!("{:>4}{:>4}  1  0  0  0  0", bond.atom1 + 1, bond.atom2 + 1))
            .collect();
        writeln!(writer, "{}", bond_lines.join("\n"))?;

        write!(writer, "M  END\n$$$$")?;
        Ok(())
    }
}
