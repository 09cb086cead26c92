use crate::core::elements::radii::CovalentRadii;
use crate::core::models::atom::disorder_compatible;
use crate::core::models::molecule::{Bond, PackedAtom};
use crate::engine::config::{BondConfig, UnknownElementPolicy};
use crate::engine::error::EngineError;
use crate::engine::utils::radii::resolve_radii;
use kiddo::{KdTree, SquaredEuclidean};
use tracing::{debug, instrument};

/// Derives a bond list from Cartesian positions and covalent radii.
///
/// Two atoms are bonded when their distance is below the radius sum plus
/// `extra_bond_length`. Pairs farther apart than `screen_cutoff`, pairs sharing a
/// label, pairs of hydrogen-class atoms and pairs from different disorder groups are
/// never bonded; atoms without a radius are non-bonding under
/// [`UnknownElementPolicy::NonBonding`]. Bonds are returned with the lower index first,
/// sorted by `(atom1, atom2)`.
///
/// # Errors
///
/// Returns [`EngineError::UnknownElement`] when an element has no radius and `policy`
/// is [`UnknownElementPolicy::Abort`].
#[instrument(skip_all, name = "bond_derivation_task")]
pub fn run(
    atoms: &[PackedAtom],
    radii: &CovalentRadii,
    config: &BondConfig,
    policy: UnknownElementPolicy,
) -> Result<Vec<Bond>, EngineError> {
    let atom_radii = resolve_radii(atoms.iter().map(|a| &a.element), radii, policy)?;

    let mut tree: KdTree<f64, 3> = KdTree::new();
    for (index, atom) in atoms.iter().enumerate() {
        tree.add(&[atom.position.x, atom.position.y, atom.position.z], index as u64);
    }
    let screen_sq = config.screen_cutoff * config.screen_cutoff;

    let mut bonds = Vec::new();
    for (i, a) in atoms.iter().enumerate() {
        let Some(r1) = atom_radii[i] else {
            continue;
        };
        let query = [a.position.x, a.position.y, a.position.z];
        for neighbour in tree.within_unsorted::<SquaredEuclidean>(&query, screen_sq) {
            let j = neighbour.item as usize;
            if j <= i {
                continue;
            }
            let b = &atoms[j];
            let Some(r2) = atom_radii[j] else {
                continue;
            };
            if a.label == b.label
                || (a.element.is_hydrogen() && b.element.is_hydrogen())
                || !disorder_compatible(a.disorder_group, b.disorder_group)
            {
                continue;
            }
            let d = neighbour.distance.sqrt();
            if d <= config.screen_cutoff && d < r1 + r2 + config.extra_bond_length {
                bonds.push(Bond::new(i, j));
            }
        }
    }
    bonds.sort_unstable();

    debug!(atoms = atoms.len(), bonds = bonds.len(), "Bond derivation complete.");
    Ok(bonds)
}
