use super::{Element, UnknownElementError};
use phf::{Map, phf_map};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

static COVALENT_RADII: Map<&'static str, f64> = phf_map! {
    "H" => 0.32, "D" => 0.32, "He" => 0.46,
    "Li" => 1.33, "Be" => 1.02, "B" => 0.85, "C" => 0.77, "N" => 0.70, "O" => 0.66,
    "F" => 0.64, "Ne" => 0.67,
    "Na" => 1.55, "Mg" => 1.39, "Al" => 1.26, "Si" => 1.16, "P" => 1.10, "S" => 1.03,
    "Cl" => 0.99, "Ar" => 0.96,
    "K" => 1.96, "Ca" => 1.71, "Sc" => 1.48, "Ti" => 1.36, "V" => 1.34, "Cr" => 1.22,
    "Mn" => 1.19, "Fe" => 1.16, "Co" => 1.11, "Ni" => 1.10, "Cu" => 1.12, "Zn" => 1.18,
    "Ga" => 1.24, "Ge" => 1.21, "As" => 1.21, "Se" => 1.16, "Br" => 1.14, "Kr" => 1.17,
    "Rb" => 2.10, "Sr" => 1.85, "Y" => 1.63, "Zr" => 1.54, "Nb" => 1.47, "Mo" => 1.38,
    "Tc" => 1.28, "Ru" => 1.25, "Rh" => 1.25, "Pd" => 1.20, "Ag" => 1.28, "Cd" => 1.36,
    "In" => 1.42, "Sn" => 1.40, "Sb" => 1.40, "Te" => 1.36, "I" => 1.33, "Xe" => 1.31,
    "Cs" => 2.32, "Ba" => 1.96, "La" => 1.80, "Ce" => 1.63, "Pr" => 1.76, "Nd" => 1.74,
    "Pm" => 1.73, "Sm" => 1.72, "Eu" => 1.68, "Gd" => 1.69, "Tb" => 1.68, "Dy" => 1.67,
    "Ho" => 1.66, "Er" => 1.65, "Tm" => 1.64, "Yb" => 1.70, "Lu" => 1.62,
    "Hf" => 1.52, "Ta" => 1.46, "W" => 1.37, "Re" => 1.31, "Os" => 1.29, "Ir" => 1.22,
    "Pt" => 1.23, "Au" => 1.24, "Hg" => 1.33, "Tl" => 1.44, "Pb" => 1.44, "Bi" => 1.51,
    "Po" => 1.45, "At" => 1.47, "Rn" => 1.42,
    "Fr" => 2.23, "Ra" => 2.01, "Ac" => 1.86, "Th" => 1.75, "Pa" => 1.69, "U" => 1.70,
    "Np" => 1.71, "Pu" => 1.72, "Am" => 1.66, "Cm" => 1.66,
};

/// Looks up the built-in covalent radius (Å) of an element.
pub fn default_radius(element: &Element) -> Option<f64> {
    COVALENT_RADII.get(element.symbol()).copied()
}

#[derive(Debug, Error)]
pub enum RadiiLoadError {
    #[error("CSV parsing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
    #[error("Invalid radius {radius} for element '{element}' in '{path}'")]
    InvalidRadius {
        path: String,
        element: String,
        radius: f64,
    },
}

#[derive(Debug, Deserialize)]
struct RadiusRecord {
    element: String,
    radius: f64,
}

/// Covalent radius table: the built-in values plus optional per-element overrides.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CovalentRadii {
    overrides: HashMap<Element, f64>,
}

impl CovalentRadii {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads overrides from a CSV file with `element,radius` columns.
    ///
    /// # Errors
    ///
    /// Returns [`RadiiLoadError`] if the file cannot be parsed or a radius is not a
    /// strictly positive number.
    pub fn load_overrides(path: &Path) -> Result<Self, RadiiLoadError> {
        let path_str = path.to_string_lossy().to_string();
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| RadiiLoadError::Csv {
                path: path_str.clone(),
                source: e,
            })?;

        let mut radii = Self::new();
        for result in reader.deserialize::<RadiusRecord>() {
            let record = result.map_err(|e| RadiiLoadError::Csv {
                path: path_str.clone(),
                source: e,
            })?;
            if !record.radius.is_finite() || record.radius <= 0.0 {
                return Err(RadiiLoadError::InvalidRadius {
                    path: path_str,
                    element: record.element,
                    radius: record.radius,
                });
            }
            radii.set(Element::new(&record.element), record.radius);
        }
        Ok(radii)
    }

    pub fn set(&mut self, element: Element, radius: f64) {
        self.overrides.insert(element, radius);
    }

    /// Covalent radius of `element` in Ångström, overrides first.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownElementError`] if neither the overrides nor the built-in table
    /// know the element.
    pub fn radius(&self, element: &Element) -> Result<f64, UnknownElementError> {
        self.overrides
            .get(element)
            .copied()
            .or_else(|| default_radius(element))
            .ok_or_else(|| UnknownElementError {
                symbol: element.symbol().to_string(),
            })
    }

    /// Sum of the covalent radii of two elements.
    pub fn radius_sum(&self, a: &Element, b: &Element) -> Result<f64, UnknownElementError> {
        Ok(self.radius(a)? + self.radius(b)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn radius_returns_builtin_values() {
        let radii = CovalentRadii::new();
        assert_eq!(radii.radius(&Element::new("C")), Ok(0.77));
        assert_eq!(radii.radius(&Element::new("cl")), Ok(0.99));
    }

    #[test]
    fn radius_of_unknown_element_is_an_error() {
        let radii = CovalentRadii::new();
        let err = radii.radius(&Element::new("Xx")).unwrap_err();
        assert_eq!(err.symbol, "Xx");
        assert!(radii.radius(&Element::new("")).is_err());
    }

    #[test]
    fn every_builtin_radius_is_strictly_positive() {
        for (symbol, radius) in COVALENT_RADII.entries() {
            assert!(*radius > 0.0, "radius of {} must be positive", symbol);
        }
    }

    #[test]
    fn overrides_take_precedence_over_builtin_values() {
        let mut radii = CovalentRadii::new();
        radii.set(Element::new("C"), 0.75);
        assert_eq!(radii.radius(&Element::new("C")), Ok(0.75));
        assert_eq!(radii.radius(&Element::new("N")), Ok(0.70));
    }

    #[test]
    fn radius_sum_adds_both_radii() {
        let radii = CovalentRadii::new();
        let sum = radii
            .radius_sum(&Element::new("C"), &Element::new("O"))
            .unwrap();
        assert!((sum - 1.43).abs() < 1e-12);
    }

    #[test]
    fn load_overrides_reads_csv_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("radii.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "element,radius").unwrap();
        writeln!(file, "Xx, 1.50").unwrap();
        writeln!(file, "C, 0.76").unwrap();

        let radii = CovalentRadii::load_overrides(&path).unwrap();
        assert_eq!(radii.radius(&Element::new("Xx")), Ok(1.50));
        assert_eq!(radii.radius(&Element::new("C")), Ok(0.76));
    }

    #[test]
    fn load_overrides_rejects_non_positive_radius() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("radii.csv");
        std::fs::write(&path, "element,radius\nC,0.0\n").unwrap();

        let result = CovalentRadii::load_overrides(&path);
        assert!(matches!(result, Err(RadiiLoadError::InvalidRadius { .. })));
    }

    #[test]
    fn load_overrides_fails_for_missing_file() {
        let result = CovalentRadii::load_overrides(Path::new("/definitely/not/here.csv"));
        assert!(matches!(result, Err(RadiiLoadError::Csv { .. })));
    }
}
