use super::error::ModelError;
use crate::core::elements::Element;
use nalgebra::Point3;

/// Largest accepted magnitude of a fractional coordinate.
///
/// Asymmetric-unit coordinates normally lie in or near [0, 1); anything this far out
/// is a unit mix-up (Cartesian values fed as fractional) rather than a real position.
pub const MAX_FRACTIONAL_COORDINATE: f64 = 1000.0;

/// An atom of the asymmetric unit.
///
/// Atoms are immutable records. Per-atom results computed by the engine (fragment
/// membership, symmetry provenance) live in separate owned structures indexed by the
/// atom's position in [`CrystalStructure::atoms`](super::structure::CrystalStructure).
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Unique label within the asymmetric unit (e.g. "C1", "O2A").
    pub label: String,
    pub element: Element,
    /// Fractional coordinates.
    pub position: Point3<f64>,
    /// Disorder group; 0 means the atom is not disordered.
    pub disorder_group: i32,
    /// Site occupancy in (0, 1].
    pub occupancy: f64,
    /// Isotropic displacement parameter, if known.
    pub u_iso: Option<f64>,
}

impl Atom {
    /// Creates a fully occupied, ordered atom without displacement information.
    pub fn new(label: &str, element: Element, position: Point3<f64>) -> Self {
        Self {
            label: label.to_string(),
            element,
            position,
            disorder_group: 0,
            occupancy: 1.0,
            u_iso: None,
        }
    }

    pub fn with_disorder_group(mut self, group: i32) -> Self {
        self.disorder_group = group;
        self
    }

    pub fn with_occupancy(mut self, occupancy: f64) -> Self {
        self.occupancy = occupancy;
        self
    }

    pub fn with_u_iso(mut self, u_iso: f64) -> Self {
        self.u_iso = Some(u_iso);
        self
    }

    /// Checks that coordinates are finite and in range and that the occupancy is in (0, 1].
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidGeometry`] describing the first offending value.
    pub fn validate(&self) -> Result<(), ModelError> {
        let invalid = |reason: String| ModelError::InvalidGeometry {
            label: self.label.clone(),
            reason,
        };
        for (axis, value) in ["x", "y", "z"].iter().zip(self.position.iter()) {
            if !value.is_finite() {
                return Err(invalid(format!("{} coordinate is not finite", axis)));
            }
            if value.abs() > MAX_FRACTIONAL_COORDINATE {
                return Err(invalid(format!(
                    "{} coordinate {} is out of range for a fractional position",
                    axis, value
                )));
            }
        }
        if !self.occupancy.is_finite() || self.occupancy <= 0.0 || self.occupancy > 1.0 {
            return Err(invalid(format!(
                "occupancy {} is outside (0, 1]",
                self.occupancy
            )));
        }
        Ok(())
    }
}

/// Whether two disorder groups may be bonded to each other.
///
/// Ordered atoms (group 0) are compatible with everything; two disordered atoms are
/// compatible only when they belong to the same group.
#[inline]
pub fn disorder_compatible(a: i32, b: i32) -> bool {
    a == 0 || b == 0 || a == b
}

#[cfg(test)]
mod tests {
    use super::*;

    fn carbon() -> Atom {
        Atom::new("C1", Element::new("C"), Point3::new(0.1, 0.2, 0.3))
    }

    #[test]
    fn new_atom_has_expected_defaults() {
        let atom = carbon();
        assert_eq!(atom.label, "C1");
        assert_eq!(atom.element.symbol(), "C");
        assert_eq!(atom.disorder_group, 0);
        assert_eq!(atom.occupancy, 1.0);
        assert_eq!(atom.u_iso, None);
    }

    #[test]
    fn builder_methods_set_optional_fields() {
        let atom = carbon()
            .with_disorder_group(2)
            .with_occupancy(0.5)
            .with_u_iso(0.031);
        assert_eq!(atom.disorder_group, 2);
        assert_eq!(atom.occupancy, 0.5);
        assert_eq!(atom.u_iso, Some(0.031));
    }

    #[test]
    fn validate_accepts_regular_atom() {
        assert!(carbon().validate().is_ok());
    }

    #[test]
    fn validate_rejects_non_finite_coordinates() {
        let mut atom = carbon();
        atom.position.y = f64::NAN;
        let err = atom.validate().unwrap_err();
        assert!(matches!(err, ModelError::InvalidGeometry { ref label, .. } if label == "C1"));

        atom.position.y = f64::INFINITY;
        assert!(atom.validate().is_err());
    }

    #[test]
    fn validate_rejects_out_of_range_coordinates() {
        let mut atom = carbon();
        atom.position.z = 5.0e4;
        assert!(atom.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_occupancy() {
        assert!(carbon().with_occupancy(0.0).validate().is_err());
        assert!(carbon().with_occupancy(1.5).validate().is_err());
        assert!(carbon().with_occupancy(-0.5).validate().is_err());
        assert!(carbon().with_occupancy(1.0).validate().is_ok());
    }

    #[test]
    fn disorder_compatibility_follows_group_rules() {
        assert!(disorder_compatible(0, 0));
        assert!(disorder_compatible(0, 2));
        assert!(disorder_compatible(1, 0));
        assert!(disorder_compatible(1, 1));
        assert!(!disorder_compatible(1, 2));
        assert!(!disorder_compatible(-1, 2));
    }
}
