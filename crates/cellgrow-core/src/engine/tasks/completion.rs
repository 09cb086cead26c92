use crate::core::models::atom::disorder_compatible;
use crate::core::models::structure::CrystalStructure;
use crate::core::symmetry::table::IDENTITY_INDEX;
use crate::core::utils::geometry::{lattice_translation, minimum_image};
use crate::engine::config::CompletionConfig;
use crate::engine::tasks::fragments::FragmentAssignment;
use crate::engine::tasks::sdm::ShortestDistanceMatrix;
use itertools::Itertools;
use tracing::{debug, instrument};

/// A symmetry image needed to complete a fragment.
///
/// Applying operator `symmetry_index` followed by the lattice `translation` to every
/// atom of `fragment` produces the copy bonded across a cell or operator boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NeededImage {
    pub symmetry_index: usize,
    pub translation: [i32; 3],
    pub fragment: usize,
}

/// Determines the symmetry images that bring bonded partners into contact.
///
/// For every covalent pair and every operator, the image of `atom1` is folded onto
/// `atom2`. The untranslated identity is skipped. An image is needed when it lies
/// farther than `min_image_offset` (it is not the atom itself) and no farther than
/// the bond's distance plus `bond_tolerance`; pairs of hydrogen-class atoms use the
/// absolute `hydrogen_cutoff` instead. Images are returned once each, in the order
/// first found.
#[instrument(skip_all, name = "symmetry_completion_task")]
pub fn run(
    structure: &CrystalStructure,
    sdm: &ShortestDistanceMatrix,
    fragments: &FragmentAssignment,
    config: &CompletionConfig,
) -> Vec<NeededImage> {
    let atoms = structure.atoms();
    let cell = structure.cell();
    let mut found = Vec::new();

    for item in sdm.covalent() {
        let (a, b) = (&atoms[item.atom1], &atoms[item.atom2]);
        if !disorder_compatible(a.disorder_group, b.disorder_group) {
            continue;
        }
        let fragment = fragments.fragment_of(item.atom1);
        if config
            .max_grown_fragments
            .is_some_and(|max| fragment > max)
        {
            continue;
        }
        let threshold = if a.element.is_hydrogen() && b.element.is_hydrogen() {
            config.hydrogen_cutoff
        } else {
            item.distance + config.bond_tolerance
        };

        for (index, op) in structure.symmetry().iter().enumerate() {
            let (folded, floor) = minimum_image(&op.apply(&a.position), &b.position);
            let translation = lattice_translation(&floor);
            if index == IDENTITY_INDEX && translation == [0, 0, 0] {
                continue;
            }
            let d = cell.vector_length(&folded);
            if d > config.min_image_offset && d <= threshold {
                found.push(NeededImage {
                    symmetry_index: index,
                    translation,
                    fragment,
                });
            }
        }
    }

    let images: Vec<NeededImage> = found.into_iter().unique().collect();
    debug!(images = images.len(), "Symmetry completion resolved.");
    images
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::elements::Element;
    use crate::core::elements::radii::CovalentRadii;
    use crate::core::models::atom::Atom;
    use crate::core::models::cell::UnitCell;
    use crate::core::symmetry::table::SymmetryTable;
    use crate::engine::config::{SdmConfig, UnknownElementPolicy};
    use crate::engine::progress::ProgressReporter;
    use crate::engine::tasks::sdm::SdmItem;
    use crate::engine::tasks::{fragments, sdm};
    use nalgebra::Point3;

    fn resolve(ops: &[&str], atoms: Vec<Atom>, config: &CompletionConfig) -> Vec<NeededImage> {
        let cell = UnitCell::new(10.0, 10.0, 10.0, 90.0, 90.0, 90.0).unwrap();
        let table = SymmetryTable::from_triplets(ops, false).unwrap();
        let structure = CrystalStructure::new(cell, table, atoms).unwrap();
        let matrix = sdm::run(
            &structure,
            &CovalentRadii::new(),
            &SdmConfig::default(),
            UnknownElementPolicy::NonBonding,
            &ProgressReporter::new(),
        )
        .unwrap();
        let assignment = fragments::run(structure.atom_count(), &matrix);
        run(&structure, &matrix, &assignment, config)
    }

    fn carbon(label: &str, x: f64, y: f64, z: f64) -> Atom {
        Atom::new(label, Element::new("C"), Point3::new(x, y, z))
    }

    #[test]
    fn bond_within_the_cell_needs_no_image() {
        let images = resolve(
            &["x, y, z"],
            vec![carbon("C1", 0.4, 0.5, 0.5), carbon("C2", 0.55, 0.5, 0.5)],
            &CompletionConfig::default(),
        );
        assert!(images.is_empty());
    }

    #[test]
    fn bond_across_the_cell_face_needs_translated_copies() {
        let images = resolve(
            &["x, y, z"],
            vec![carbon("C1", 0.02, 0.5, 0.5), carbon("C2", 0.87, 0.5, 0.5)],
            &CompletionConfig::default(),
        );
        assert_eq!(images.len(), 2);
        for translation in [[1, 0, 0], [-1, 0, 0]] {
            assert!(images.contains(&NeededImage {
                symmetry_index: IDENTITY_INDEX,
                translation,
                fragment: 1,
            }));
        }
    }

    #[test]
    fn bond_to_own_inversion_image_needs_the_inversion() {
        let images = resolve(
            &["x, y, z", "-x, -y, -z"],
            vec![carbon("C1", 0.077, 0.0, 0.0)],
            &CompletionConfig::default(),
        );
        assert_eq!(
            images,
            vec![NeededImage {
                symmetry_index: 1,
                translation: [0, 0, 0],
                fragment: 1,
            }]
        );
    }

    #[test]
    fn images_are_deduplicated() {
        let images = resolve(
            &["x, y, z", "-x, -y, -z"],
            vec![
                carbon("C1", 0.077, 0.0, 0.0),
                carbon("C2", 0.077, 0.154, 0.0),
            ],
            &CompletionConfig::default(),
        );
        let unique: std::collections::HashSet<_> = images.iter().collect();
        assert_eq!(unique.len(), images.len());
        assert!(images.contains(&NeededImage {
            symmetry_index: 1,
            translation: [0, 0, 0],
            fragment: 1,
        }));
    }

    /// A lone hydrogen at (0.07, 0, 0) under inversion, with a covalent self-contact
    /// whose recorded distance is shorter than the real 1.4 Å image.
    fn hydrogen_self_contact() -> (CrystalStructure, ShortestDistanceMatrix, FragmentAssignment) {
        let cell = UnitCell::new(10.0, 10.0, 10.0, 90.0, 90.0, 90.0).unwrap();
        let table = SymmetryTable::from_triplets(&["x, y, z", "-x, -y, -z"], false).unwrap();
        let atoms = vec![Atom::new("H1", Element::new("H"), Point3::new(0.07, 0.0, 0.0))];
        let structure = CrystalStructure::new(cell, table, atoms).unwrap();
        let matrix = ShortestDistanceMatrix::from_items(vec![SdmItem {
            atom1: 0,
            atom2: 0,
            distance: 1.0,
            symmetry_index: 1,
            covalent: true,
        }]);
        let assignment = fragments::run(structure.atom_count(), &matrix);
        (structure, matrix, assignment)
    }

    fn inversion_image_distance(structure: &CrystalStructure) -> f64 {
        let atom = &structure.atoms()[0];
        let op = structure.symmetry().get(1).unwrap();
        let (folded, _) = minimum_image(&op.apply(&atom.position), &atom.position);
        structure.cell().vector_length(&folded)
    }

    #[test]
    fn hydrogen_pairs_use_the_absolute_cutoff() {
        let (structure, matrix, assignment) = hydrogen_self_contact();
        let inversion = NeededImage {
            symmetry_index: 1,
            translation: [0, 0, 0],
            fragment: 1,
        };

        let images = run(&structure, &matrix, &assignment, &CompletionConfig::default());
        assert_eq!(images, vec![inversion]);

        let tight = CompletionConfig {
            hydrogen_cutoff: 1.3,
            bond_tolerance: 5.0,
            ..CompletionConfig::default()
        };
        assert!(run(&structure, &matrix, &assignment, &tight).is_empty());
    }

    #[test]
    fn image_exactly_at_the_threshold_is_needed() {
        let (structure, matrix, assignment) = hydrogen_self_contact();
        let d = inversion_image_distance(&structure);
        assert!((d - 1.4).abs() < 1e-9);

        let at_threshold = CompletionConfig {
            hydrogen_cutoff: d,
            ..CompletionConfig::default()
        };
        assert_eq!(run(&structure, &matrix, &assignment, &at_threshold).len(), 1);

        let just_below = CompletionConfig {
            hydrogen_cutoff: d - 1e-9,
            ..CompletionConfig::default()
        };
        assert!(run(&structure, &matrix, &assignment, &just_below).is_empty());
    }

    #[test]
    fn fragment_cap_skips_higher_fragments() {
        let atoms = vec![
            carbon("C1", 0.4, 0.5, 0.5),
            carbon("C2", 0.02, 0.1, 0.1),
            carbon("C3", 0.87, 0.1, 0.1),
        ];
        let all = resolve(&["x, y, z"], atoms.clone(), &CompletionConfig::default());
        assert!(all.iter().all(|image| image.fragment == 2));
        assert!(!all.is_empty());

        let capped = CompletionConfig {
            max_grown_fragments: Some(1),
            ..CompletionConfig::default()
        };
        assert!(resolve(&["x, y, z"], atoms, &capped).is_empty());
    }
}
