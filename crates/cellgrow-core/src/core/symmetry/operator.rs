use crate::core::models::error::ModelError;
use nalgebra::{Matrix3, Point3, Vector3};
use std::fmt;
use std::str::FromStr;

const TRANSLATION_TOLERANCE: f64 = 1e-6;
const FRACTION_DENOMINATORS: [i64; 6] = [2, 3, 4, 6, 8, 12];

/// An affine symmetry operation in fractional space: `x' = R·x + t`.
///
/// The rotation part has entries in {-1, 0, 1}; the translation holds rational
/// fractions of a lattice vector.
#[derive(Debug, Clone)]
pub struct SymmetryOperator {
    pub matrix: Matrix3<f64>,
    pub translation: Vector3<f64>,
    /// Set on the inversion operator added for structures asserted centrosymmetric.
    pub centric: bool,
}

impl SymmetryOperator {
    pub fn identity() -> Self {
        Self {
            matrix: Matrix3::identity(),
            translation: Vector3::zeros(),
            centric: false,
        }
    }

    pub fn inversion() -> Self {
        Self {
            matrix: -Matrix3::identity(),
            translation: Vector3::zeros(),
            centric: true,
        }
    }

    /// Parses a triplet such as `"-x+1/2, y, -z"` or `"1/2+X,1/2-Y,Z"`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Configuration`] if the triplet does not have exactly three
    /// components or a component contains anything but signed axes and numbers.
    pub fn parse(triplet: &str) -> Result<Self, ModelError> {
        let components: Vec<&str> = triplet.split(',').collect();
        if components.len() != 3 {
            return Err(malformed(triplet, "expected three comma-separated components"));
        }

        let mut matrix = Matrix3::zeros();
        let mut translation = Vector3::zeros();
        for (row, component) in components.iter().enumerate() {
            let (coefficients, shift) = parse_component(component)
                .map_err(|reason| malformed(triplet, &reason))?;
            for col in 0..3 {
                matrix[(row, col)] = coefficients[col];
            }
            translation[row] = shift;
        }

        Ok(Self {
            matrix,
            translation,
            centric: false,
        })
    }

    /// Maps a fractional position through the operator.
    #[inline]
    pub fn apply(&self, frac: &Point3<f64>) -> Point3<f64> {
        Point3::from(self.matrix * frac.coords + self.translation)
    }

    pub fn is_identity(&self) -> bool {
        self.matrix == Matrix3::identity() && translation_is_lattice(&self.translation)
    }

    /// True for a pure inversion through the origin (`-x, -y, -z`).
    pub fn is_inversion(&self) -> bool {
        self.matrix == -Matrix3::identity() && translation_is_lattice(&self.translation)
    }

    /// True when the rotation part is `-1`, whatever the translation.
    pub fn has_inverting_rotation(&self) -> bool {
        self.matrix == -Matrix3::identity()
    }
}

impl PartialEq for SymmetryOperator {
    /// Operators are equal when their rotations match and their translations agree
    /// modulo a lattice vector.
    fn eq(&self, other: &Self) -> bool {
        self.matrix == other.matrix && translation_is_lattice(&(self.translation - other.translation))
    }
}

impl FromStr for SymmetryOperator {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SymmetryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: Vec<String> = (0..3)
            .map(|row| {
                let mut out = String::new();
                for (col, axis) in ['x', 'y', 'z'].iter().enumerate() {
                    let coefficient = self.matrix[(row, col)];
                    if coefficient > 0.0 {
                        if !out.is_empty() {
                            out.push('+');
                        }
                        out.push(*axis);
                    } else if coefficient < 0.0 {
                        out.push('-');
                        out.push(*axis);
                    }
                }
                let shift = self.translation[row];
                if shift.abs() > TRANSLATION_TOLERANCE {
                    if shift > 0.0 && !out.is_empty() {
                        out.push('+');
                    }
                    out.push_str(&format_fraction(shift));
                }
                if out.is_empty() {
                    out.push('0');
                }
                out
            })
            .collect();
        write!(f, "{}", rows.join(", "))
    }
}

fn malformed(triplet: &str, reason: &str) -> ModelError {
    ModelError::Configuration(format!(
        "malformed symmetry operator '{}': {}",
        triplet.trim(),
        reason
    ))
}

fn translation_is_lattice(t: &Vector3<f64>) -> bool {
    t.iter()
        .all(|v| (v - v.round()).abs() < TRANSLATION_TOLERANCE)
}

fn format_fraction(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let magnitude = value.abs();
    if (magnitude - magnitude.round()).abs() < TRANSLATION_TOLERANCE {
        return format!("{}{}", sign, magnitude.round() as i64);
    }
    for denominator in FRACTION_DENOMINATORS {
        let numerator = magnitude * denominator as f64;
        if (numerator - numerator.round()).abs() < TRANSLATION_TOLERANCE {
            return format!("{}{}/{}", sign, numerator.round() as i64, denominator);
        }
    }
    format!("{}{}", sign, magnitude)
}

/// Parses one component of a triplet into axis coefficients and a translation.
fn parse_component(component: &str) -> Result<([f64; 3], f64), String> {
    let chars: Vec<char> = component.chars().filter(|c| !c.is_whitespace()).collect();
    if chars.is_empty() {
        return Err("empty component".to_string());
    }

    let mut coefficients = [0.0f64; 3];
    let mut translation = 0.0;
    let mut i = 0;

    while i < chars.len() {
        let sign = match chars[i] {
            '-' => {
                i += 1;
                -1.0
            }
            '+' => {
                i += 1;
                1.0
            }
            _ => 1.0,
        };
        let Some(&c) = chars.get(i) else {
            return Err("dangling sign".to_string());
        };

        match c.to_ascii_lowercase() {
            axis @ ('x' | 'y' | 'z') => {
                let col = (axis as u8 - b'x') as usize;
                if coefficients[col] != 0.0 {
                    return Err(format!("axis '{}' appears twice", axis));
                }
                coefficients[col] = sign;
                i += 1;
            }
            d if d.is_ascii_digit() || d == '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.' || chars[i] == '/')
                {
                    i += 1;
                }
                let literal: String = chars[start..i].iter().collect();
                translation += sign * parse_number(&literal)?;
            }
            other => return Err(format!("unexpected character '{}'", other)),
        }
    }

    Ok((coefficients, translation))
}

fn parse_number(literal: &str) -> Result<f64, String> {
    let invalid = || format!("invalid number '{}'", literal);
    match literal.split_once('/') {
        Some((numerator, denominator)) => {
            let n: f64 = numerator.parse().map_err(|_| invalid())?;
            let d: f64 = denominator.parse().map_err(|_| invalid())?;
            if d == 0.0 {
                return Err(invalid());
            }
            Ok(n / d)
        }
        None => literal.parse().map_err(|_| invalid()),
    }
}
