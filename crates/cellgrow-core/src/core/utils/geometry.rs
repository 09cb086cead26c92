use nalgebra::{Point3, Vector3};

/// Folds a fractional displacement `from - to` into the minimum-image cell.
///
/// Returns the folded displacement (each component in [-0.5, 0.5)) together with the
/// floor that was subtracted. The floor is the integer lattice shift that separates
/// `from` from the periodic copy closest to `to`.
#[inline]
pub fn minimum_image(from: &Point3<f64>, to: &Point3<f64>) -> (Vector3<f64>, Vector3<f64>) {
    let half = Vector3::repeat(0.5);
    let d = from - to + half;
    let floor = d.map(f64::floor);
    (d - floor - half, floor)
}

/// Converts a floored fractional shift into the lattice translation that undoes it.
#[inline]
pub fn lattice_translation(floor: &Vector3<f64>) -> [i32; 3] {
    [-floor.x as i32, -floor.y as i32, -floor.z as i32]
}

#[inline]
pub fn translation_vector(translation: &[i32; 3]) -> Vector3<f64> {
    Vector3::new(
        translation[0] as f64,
        translation[1] as f64,
        translation[2] as f64,
    )
}

/// Plain Euclidean distance between Cartesian points.
#[inline]
pub fn distance(a: &Point3<f64>, b: &Point3<f64>) -> f64 {
    (a - b).norm()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimum_image_folds_far_copy_to_near_one() {
        let (folded, floor) = minimum_image(&Point3::new(0.9, 0.0, 0.0), &Point3::new(0.0, 0.0, 0.0));
        assert!((folded.x + 0.1).abs() < 1e-12);
        assert_eq!(floor, Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(lattice_translation(&floor), [-1, 0, 0]);
    }

    #[test]
    fn minimum_image_leaves_close_displacement_unchanged() {
        let (folded, floor) = minimum_image(&Point3::new(0.3, 0.2, 0.1), &Point3::new(0.2, 0.25, 0.1));
        assert!((folded - Vector3::new(0.1, -0.05, 0.0)).norm() < 1e-12);
        assert_eq!(floor, Vector3::zeros());
    }

    #[test]
    fn minimum_image_handles_negative_and_large_offsets() {
        let (folded, floor) = minimum_image(&Point3::new(-2.2, 3.4, 0.0), &Point3::new(0.0, 0.0, 0.0));
        assert!((folded - Vector3::new(-0.2, 0.4, 0.0)).norm() < 1e-12);
        assert_eq!(lattice_translation(&floor), [2, -3, 0]);
    }

    #[test]
    fn distance_is_euclidean() {
        let d = distance(&Point3::new(0.0, 0.0, 0.0), &Point3::new(3.0, 4.0, 0.0));
        assert!((d - 5.0).abs() < 1e-12);
    }
}
