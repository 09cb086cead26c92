pub mod checksum;
pub mod grow;
pub mod info;

use crate::error::{CliError, Result};
use cellgrow::core::elements::radii::CovalentRadii;
use cellgrow::core::io::structure::TomlStructureFile;
use cellgrow::core::io::traits::StructureFile;
use cellgrow::core::models::structure::CrystalStructure;
use std::path::Path;
use tracing::info;

fn read_structure(path: &Path) -> Result<CrystalStructure> {
    info!("Loading input structure from {:?}", path);
    TomlStructureFile::read_from_path(path).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })
}

fn load_radii(path: Option<&Path>) -> Result<CovalentRadii> {
    match path {
        Some(path) => {
            info!("Loading covalent radius overrides from {:?}", path);
            CovalentRadii::load_overrides(path).map_err(|e| CliError::FileParsing {
                path: path.to_path_buf(),
                source: e.into(),
            })
        }
        None => Ok(CovalentRadii::new()),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    /// Two-atom asymmetric unit that grows into four atoms across an inversion centre.
    pub const DIMER: &str = r#"
[cell]
a = 10.0
b = 10.0
c = 10.0
alpha = 90.0
beta = 90.0
gamma = 90.0

[symmetry]
operators = ["x, y, z"]
centric = true

[[atoms]]
label = "C1"
x = 0.077
y = 0.0
z = 0.0

[[atoms]]
label = "H1"
x = 0.112
y = 0.1
z = 0.0
"#;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn read_structure_wraps_parse_failures_with_the_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "[cell]\na = 1.0\n").unwrap();
        match read_structure(&path) {
            Err(CliError::FileParsing { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected a parsing error, got {:?}", other),
        }
    }

    #[test]
    fn load_radii_applies_csv_overrides() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("radii.csv");
        fs::write(&path, "element,radius\nC,0.9\n").unwrap();
        let radii = load_radii(Some(&path)).unwrap();
        let carbon = cellgrow::core::elements::Element::new("C");
        assert_eq!(radii.radius(&carbon).unwrap(), 0.9);
    }

    #[test]
    fn load_radii_defaults_to_builtin_table() {
        assert_eq!(load_radii(None).unwrap(), CovalentRadii::new());
    }
}
