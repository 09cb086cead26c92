use crate::core::models::molecule::Molecule;
use crate::core::models::structure::CrystalStructure;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Defines the interface for crystal structure file formats.
///
/// Implementors parse a unit cell, symmetry operators and asymmetric-unit atoms into a
/// validated [`CrystalStructure`] and serialize one back.
pub trait StructureFile {
    /// The error type for I/O operations.
    type Error: Error + From<io::Error>;

    /// Reads a crystal structure from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails, the described structure is invalid, or I/O
    /// operations encounter issues.
    fn read_from(reader: &mut impl BufRead) -> Result<CrystalStructure, Self::Error>;

    /// Writes a crystal structure to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    fn write_to(structure: &CrystalStructure, writer: &mut impl Write)
    -> Result<(), Self::Error>;

    /// Reads a crystal structure from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<CrystalStructure, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    /// Writes a crystal structure to a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_to_path<P: AsRef<Path>>(
        structure: &CrystalStructure,
        path: P,
    ) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(structure, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

/// Defines the interface for output formats of expanded molecules.
pub trait MoleculeFile {
    /// The error type for I/O operations.
    type Error: Error + From<io::Error>;

    /// Writes a molecule (atoms and bonds) to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if the molecule is inconsistent or writing fails.
    fn write_to(molecule: &Molecule, writer: &mut impl Write) -> Result<(), Self::Error>;

    /// Writes a molecule to a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_to_path<P: AsRef<Path>>(molecule: &Molecule, path: P) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(molecule, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
