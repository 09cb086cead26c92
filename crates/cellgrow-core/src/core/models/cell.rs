use super::error::ModelError;
use nalgebra::{Matrix3, Point3, Vector3};

/// Crystallographic unit cell with precomputed metric terms.
///
/// The cell is immutable once constructed. Besides the six constants it caches the
/// cross terms of the triclinic metric (`a·b·cosγ`, `a·c·cosβ`, `b·c·cosα`), the
/// squared lengths, the volume and the fractional-to-Cartesian matrix, so that every
/// distance evaluation in the engine is a handful of multiplications.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitCell {
    a: f64,
    b: f64,
    c: f64,
    alpha: f64,
    beta: f64,
    gamma: f64,
    volume: f64,
    aga: f64,
    bbe: f64,
    cal: f64,
    asq: f64,
    bsq: f64,
    csq: f64,
    orthogonalization: Matrix3<f64>,
}

impl UnitCell {
    /// Builds a unit cell from edge lengths (Å) and angles (degrees).
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Configuration`] if a length is not strictly positive, an
    /// angle lies outside the open interval (0, 180), or the angles cannot close a
    /// parallelepiped (non-positive volume).
    pub fn new(
        a: f64,
        b: f64,
        c: f64,
        alpha: f64,
        beta: f64,
        gamma: f64,
    ) -> Result<Self, ModelError> {
        for (name, value) in [("a", a), ("b", b), ("c", c)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ModelError::Configuration(format!(
                    "cell length {} must be positive, got {}",
                    name, value
                )));
            }
        }
        for (name, value) in [("alpha", alpha), ("beta", beta), ("gamma", gamma)] {
            if !value.is_finite() || value <= 0.0 || value >= 180.0 {
                return Err(ModelError::Configuration(format!(
                    "cell angle {} must lie in (0, 180) degrees, got {}",
                    name, value
                )));
            }
        }

        let (cos_al, cos_be, cos_ga) = (
            alpha.to_radians().cos(),
            beta.to_radians().cos(),
            gamma.to_radians().cos(),
        );
        let sin_ga = gamma.to_radians().sin();

        let radicand =
            1.0 - cos_al * cos_al - cos_be * cos_be - cos_ga * cos_ga + 2.0 * cos_al * cos_be * cos_ga;
        if radicand <= 0.0 {
            return Err(ModelError::Configuration(format!(
                "cell angles ({}, {}, {}) do not describe a valid cell",
                alpha, beta, gamma
            )));
        }
        let volume = a * b * c * radicand.sqrt();

        #[rustfmt::skip]
        let orthogonalization = Matrix3::new(
            a,   b * cos_ga,  c * cos_be,
            0.0, b * sin_ga,  c * (cos_al - cos_be * cos_ga) / sin_ga,
            0.0, 0.0,         volume / (a * b * sin_ga),
        );

        Ok(Self {
            a,
            b,
            c,
            alpha,
            beta,
            gamma,
            volume,
            aga: a * b * cos_ga,
            bbe: a * c * cos_be,
            cal: b * c * cos_al,
            asq: a * a,
            bsq: b * b,
            csq: c * c,
            orthogonalization,
        })
    }

    /// Edge lengths `(a, b, c)` in Ångström.
    pub fn lengths(&self) -> (f64, f64, f64) {
        (self.a, self.b, self.c)
    }

    /// Angles `(alpha, beta, gamma)` in degrees.
    pub fn angles(&self) -> (f64, f64, f64) {
        (self.alpha, self.beta, self.gamma)
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// The fractional-to-Cartesian matrix (a along x, b in the xy plane).
    pub fn orthogonalization(&self) -> &Matrix3<f64> {
        &self.orthogonalization
    }

    /// Real-space length of a displacement given in fractional coordinates.
    ///
    /// Uses only squares and bilinear cross terms of the components, so the result
    /// does not depend on the sign convention of the displacement.
    #[inline]
    pub fn vector_length(&self, d: &Vector3<f64>) -> f64 {
        let cross = 2.0 * (d.x * d.y * self.aga + d.x * d.z * self.bbe + d.y * d.z * self.cal);
        (d.x * d.x * self.asq + d.y * d.y * self.bsq + d.z * d.z * self.csq + cross).sqrt()
    }

    /// Converts a fractional position to orthogonal Cartesian coordinates.
    #[inline]
    pub fn to_cartesian(&self, frac: &Point3<f64>) -> Point3<f64> {
        Point3::from(self.orthogonalization * frac.coords)
    }
}
