use crate::core::models::molecule::{AtomOrigin, PackedAtom};
use crate::core::models::structure::CrystalStructure;
use crate::core::utils::geometry::translation_vector;
use crate::engine::config::PackingConfig;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::tasks::completion::NeededImage;
use crate::engine::tasks::fragments::FragmentAssignment;
use kiddo::{KdTree, SquaredEuclidean};
use nalgebra::Point3;
use tracing::{debug, info, instrument};

/// Occupancies closer than this are considered equal when suppressing duplicates.
const OCCUPANCY_TOLERANCE: f64 = 1e-6;

/// Converts the asymmetric unit to Cartesian atoms without any symmetry expansion.
pub fn asymmetric_atoms(structure: &CrystalStructure) -> Vec<PackedAtom> {
    let cell = structure.cell();
    structure
        .atoms()
        .iter()
        .enumerate()
        .map(|(index, atom)| PackedAtom {
            label: atom.label.clone(),
            element: atom.element.clone(),
            position: cell.to_cartesian(&atom.position),
            fractional: atom.position,
            disorder_group: atom.disorder_group,
            occupancy: atom.occupancy,
            u_iso: atom.u_iso,
            source_index: index,
            origin: AtomOrigin::Asymmetric,
        })
        .collect()
}

/// Applies the needed symmetry images and returns the expanded Cartesian atom list.
///
/// The asymmetric-unit atoms come first, followed by generated copies in the order
/// of `images` and, within an image, of atom index. A copy is dropped when an atom
/// already in the list with the same occupancy lies within `duplicate_tolerance` of
/// it, so repeated or overlapping images never add the same atom twice.
#[instrument(skip_all, name = "packing_task")]
pub fn run(
    structure: &CrystalStructure,
    fragments: &FragmentAssignment,
    images: &[NeededImage],
    config: &PackingConfig,
    reporter: &ProgressReporter,
) -> Vec<PackedAtom> {
    let cell = structure.cell();
    let mut packed = asymmetric_atoms(structure);

    let mut tree: KdTree<f64, 3> = KdTree::new();
    for (index, atom) in packed.iter().enumerate() {
        tree.add(&as_array(&atom.position), index as u64);
    }
    let tolerance_sq = config.duplicate_tolerance * config.duplicate_tolerance;

    info!(images = images.len(), "Packing symmetry images.");
    reporter.report(Progress::TaskStart {
        total_steps: images.len() as u64,
    });

    let mut suppressed = 0usize;
    for image in images {
        let Some(op) = structure.symmetry().get(image.symmetry_index) else {
            reporter.report(Progress::TaskIncrement);
            continue;
        };
        let shift = translation_vector(&image.translation);
        for source_index in fragments.members(image.fragment) {
            let atom = &structure.atoms()[source_index];
            let fractional: Point3<f64> = op.apply(&atom.position) + shift;
            let position = cell.to_cartesian(&fractional);
            let query = as_array(&position);

            let duplicate = tree
                .within_unsorted::<SquaredEuclidean>(&query, tolerance_sq)
                .iter()
                .any(|neighbour| {
                    let existing = &packed[neighbour.item as usize];
                    neighbour.distance < tolerance_sq
                        && (existing.occupancy - atom.occupancy).abs() < OCCUPANCY_TOLERANCE
                });
            if duplicate {
                suppressed += 1;
                continue;
            }

            tree.add(&query, packed.len() as u64);
            packed.push(PackedAtom {
                label: atom.label.clone(),
                element: atom.element.clone(),
                position,
                fractional,
                disorder_group: atom.disorder_group,
                occupancy: atom.occupancy,
                u_iso: atom.u_iso,
                source_index,
                origin: AtomOrigin::SymmetryGenerated {
                    symmetry_index: image.symmetry_index,
                    translation: image.translation,
                },
            });
        }
        reporter.report(Progress::TaskIncrement);
    }
    reporter.report(Progress::TaskFinish);

    debug!(
        atoms = packed.len(),
        generated = packed.len() - structure.atom_count(),
        suppressed,
        "Packing complete."
    );
    packed
}

fn as_array(p: &Point3<f64>) -> [f64; 3] {
    [p.x, p.y, p.z]
}
