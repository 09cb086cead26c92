use crate::core::elements::Element;
use crate::core::io::traits::StructureFile;
use crate::core::models::atom::Atom;
use crate::core::models::cell::UnitCell;
use crate::core::models::error::ModelError;
use crate::core::models::structure::CrystalStructure;
use crate::core::symmetry::table::SymmetryTable;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StructureFileError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("TOML serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Invalid structure: {0}")]
    Model(#[from] ModelError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct StructureDocument {
    cell: CellSection,
    symmetry: SymmetrySection,
    #[serde(default)]
    atoms: Vec<AtomRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct CellSection {
    a: f64,
    b: f64,
    c: f64,
    alpha: f64,
    beta: f64,
    gamma: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct SymmetrySection {
    operators: Vec<String>,
    #[serde(default)]
    centric: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct AtomRecord {
    label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    element: Option<String>,
    x: f64,
    y: f64,
    z: f64,
    #[serde(default)]
    disorder_group: i32,
    #[serde(default = "full_occupancy")]
    occupancy: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    u_iso: Option<f64>,
}

fn full_occupancy() -> f64 {
    1.0
}

impl AtomRecord {
    fn into_atom(self) -> Atom {
        let element = match self.element.as_deref() {
            Some(symbol) if !symbol.trim().is_empty() => Element::new(symbol),
            _ => Element::from_label(&self.label),
        };
        let atom = Atom::new(&self.label, element, Point3::new(self.x, self.y, self.z))
            .with_disorder_group(self.disorder_group)
            .with_occupancy(self.occupancy);
        match self.u_iso {
            Some(u) => atom.with_u_iso(u),
            None => atom,
        }
    }

    fn from_atom(atom: &Atom) -> Self {
        Self {
            label: atom.label.clone(),
            element: Some(atom.element.symbol().to_string()),
            x: atom.position.x,
            y: atom.position.y,
            z: atom.position.z,
            disorder_group: atom.disorder_group,
            occupancy: atom.occupancy,
            u_iso: atom.u_iso,
        }
    }
}

/// TOML description of a crystal structure.
///
/// ```toml
/// [cell]
/// a = 10.0
/// b = 10.0
/// c = 10.0
/// alpha = 90.0
/// beta = 90.0
/// gamma = 90.0
///
/// [symmetry]
/// operators = ["x, y, z", "-x, y+1/2, -z+1/2"]
/// centric = true
///
/// [[atoms]]
/// label = "C1"
/// x = 0.1
/// y = 0.2
/// z = 0.3
/// disorder-group = 0
/// occupancy = 1.0
/// ```
///
/// `element` is optional and derived from the label when absent.
pub struct TomlStructureFile;

impl TomlStructureFile {
    /// Parses a structure from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`StructureFileError::Parse`] for malformed TOML or unknown keys and
    /// [`StructureFileError::Model`] when the described structure is invalid.
    pub fn parse(content: &str) -> Result<CrystalStructure, StructureFileError> {
        let document: StructureDocument = toml::from_str(content)?;
        let CellSection {
            a,
            b,
            c,
            alpha,
            beta,
            gamma,
        } = document.cell;
        let cell = UnitCell::new(a, b, c, alpha, beta, gamma)?;
        let symmetry = SymmetryTable::from_triplets(
            &document.symmetry.operators,
            document.symmetry.centric,
        )?;
        let atoms = document
            .atoms
            .into_iter()
            .map(AtomRecord::into_atom)
            .collect();
        Ok(CrystalStructure::new(cell, symmetry, atoms)?)
    }

    /// Serializes a structure to TOML text.
    ///
    /// The operator list is written in full, so the `centric` flag is always false on
    /// output.
    ///
    /// # Errors
    ///
    /// Returns [`StructureFileError::Serialize`] if TOML serialization fails.
    pub fn render(structure: &CrystalStructure) -> Result<String, StructureFileError> {
        let (a, b, c) = structure.cell().lengths();
        let (alpha, beta, gamma) = structure.cell().angles();
        let document = StructureDocument {
            cell: CellSection {
                a,
                b,
                c,
                alpha,
                beta,
                gamma,
            },
            symmetry: SymmetrySection {
                operators: structure.symmetry().iter().map(|op| op.to_string()).collect(),
                centric: false,
            },
            atoms: structure.atoms().iter().map(AtomRecord::from_atom).collect(),
        };
        Ok(toml::to_string(&document)?)
    }
}

impl StructureFile for TomlStructureFile {
    type Error = StructureFileError;

    fn read_from(reader: &mut impl BufRead) -> Result<CrystalStructure, Self::Error> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        Self::parse(&content)
    }

    fn write_to(
        structure: &CrystalStructure,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        writer.write_all(Self::render(structure)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[cell]
a = 7.5
b = 8.25
c = 12.0
alpha = 90.0
beta = 101.5
gamma = 90.0

[symmetry]
operators = ["x, y, z", "-x, y+1/2, -z+1/2"]
centric = true

[[atoms]]
label = "Cl1"
x = 0.1
y = 0.2
z = 0.3

[[atoms]]
label = "O1A"
element = "O2-"
x = 0.4
y = 0.5
z = 0.6
disorder-group = 1
occupancy = 0.6
u-iso = 0.035
"#;

    #[test]
    fn parse_reads_cell_symmetry_and_atoms() {
        let structure = TomlStructureFile::parse(SAMPLE).unwrap();
        assert_eq!(structure.cell().lengths(), (7.5, 8.25, 12.0));
        assert_eq!(structure.symmetry().len(), 3);
        assert!(structure.symmetry().is_centrosymmetric());

        let atoms = structure.atoms();
        assert_eq!(atoms.len(), 2);
        assert_eq!(atoms[0].element.symbol(), "Cl");
        assert_eq!(atoms[0].disorder_group, 0);
        assert_eq!(atoms[0].occupancy, 1.0);
        assert_eq!(atoms[1].element.symbol(), "O");
        assert_eq!(atoms[1].disorder_group, 1);
        assert_eq!(atoms[1].occupancy, 0.6);
        assert_eq!(atoms[1].u_iso, Some(0.035));
    }

    #[test]
    fn parse_rejects_unknown_keys() {
        let content = SAMPLE.replace("centric = true", "centric = true\nhall = \"-P 2ybc\"");
        let err = TomlStructureFile::parse(&content).unwrap_err();
        assert!(matches!(err, StructureFileError::Parse(_)));
    }

    #[test]
    fn parse_rejects_degenerate_cell() {
        let content = SAMPLE.replace("a = 7.5", "a = 0.0");
        let err = TomlStructureFile::parse(&content).unwrap_err();
        assert!(matches!(
            err,
            StructureFileError::Model(ModelError::Configuration(_))
        ));
    }

    #[test]
    fn parse_rejects_operator_list_without_identity() {
        let content = SAMPLE.replace("\"x, y, z\", ", "");
        let err = TomlStructureFile::parse(&content).unwrap_err();
        assert!(matches!(err, StructureFileError::Model(_)));
    }

    #[test]
    fn rendered_structure_reads_back_identically() {
        let structure = TomlStructureFile::parse(SAMPLE).unwrap();
        let rendered = TomlStructureFile::render(&structure).unwrap();
        let reparsed = TomlStructureFile::parse(&rendered).unwrap();
        assert_eq!(reparsed, structure);
    }

    #[test]
    fn read_from_path_loads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let structure = TomlStructureFile::read_from_path(file.path()).unwrap();
        assert_eq!(structure.atom_count(), 2);
    }
}
