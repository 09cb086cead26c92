use crate::core::elements::radii::CovalentRadii;
use crate::core::models::atom::disorder_compatible;
use crate::core::models::structure::CrystalStructure;
use crate::core::symmetry::table::IDENTITY_INDEX;
use crate::core::utils::geometry::minimum_image;
use crate::engine::config::{SdmConfig, UnknownElementPolicy};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::utils::radii::resolve_radii;
use tracing::{debug, info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Shortest periodic distance between two asymmetric-unit atoms.
///
/// `atom1` is the atom the winning symmetry operator was applied to. Two items are
/// equal when they describe the same unordered pair, regardless of distance.
#[derive(Debug, Clone, Copy)]
pub struct SdmItem {
    pub atom1: usize,
    pub atom2: usize,
    /// Shortest image distance in Å, including the tie-break epsilon for
    /// non-identity operators.
    pub distance: f64,
    pub symmetry_index: usize,
    pub covalent: bool,
}

impl SdmItem {
    /// The pair with the lower index first.
    pub fn pair(&self) -> (usize, usize) {
        (self.atom1.min(self.atom2), self.atom1.max(self.atom2))
    }
}

impl PartialEq for SdmItem {
    fn eq(&self, other: &Self) -> bool {
        self.pair() == other.pair()
    }
}

impl Eq for SdmItem {}

/// All atom pairs with an image inside the search cutoff, sorted by distance.
#[derive(Debug, Clone, Default)]
pub struct ShortestDistanceMatrix {
    items: Vec<SdmItem>,
}

impl ShortestDistanceMatrix {
    #[cfg(test)]
    pub(crate) fn from_items(items: Vec<SdmItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[SdmItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn covalent(&self) -> impl Iterator<Item = &SdmItem> {
        self.items.iter().filter(|item| item.covalent)
    }

    /// The entry for the ordered pair `(atom1, atom2)`, if it lies within the cutoff.
    pub fn get(&self, atom1: usize, atom2: usize) -> Option<&SdmItem> {
        self.items
            .iter()
            .find(|item| item.atom1 == atom1 && item.atom2 == atom2)
    }
}

/// Computes the shortest distance matrix of the asymmetric unit.
///
/// Every ordered pair `(i, j)`, including `i == j`, is searched over all symmetry
/// operators: operator `n` is applied to atom `i` and the displacement to atom `j` is
/// folded into the minimum image. The shortest image above the noise floor wins;
/// non-identity operators carry a small epsilon so the identity wins exact ties, and
/// among other operators the lowest index wins. Pairs with no image inside the search
/// cutoff are dropped.
///
/// A pair is covalent when both elements have radii, they are not both hydrogen-class,
/// their disorder groups are compatible, and the distance is below the scaled radius
/// sum.
///
/// # Errors
///
/// Returns [`EngineError::UnknownElement`] when an element has no radius and `policy`
/// is [`UnknownElementPolicy::Abort`].
#[instrument(skip_all, name = "sdm_task")]
pub fn run(
    structure: &CrystalStructure,
    radii: &CovalentRadii,
    config: &SdmConfig,
    policy: UnknownElementPolicy,
    reporter: &ProgressReporter,
) -> Result<ShortestDistanceMatrix, EngineError> {
    let atoms = structure.atoms();
    let n = atoms.len();
    info!(
        atoms = n,
        operators = structure.symmetry().len(),
        "Computing shortest distance matrix."
    );

    let atom_radii = resolve_radii(atoms.iter().map(|a| &a.element), radii, policy)?;

    reporter.report(Progress::TaskStart {
        total_steps: n as u64,
    });

    #[cfg(not(feature = "parallel"))]
    let rows_iter = 0..n;

    #[cfg(feature = "parallel")]
    let rows_iter = (0..n).into_par_iter();

    let rows: Vec<Vec<SdmItem>> = rows_iter
        .map(|i| {
            let row = (0..n)
                .filter_map(|j| shortest_image(structure, &atom_radii, config, i, j))
                .collect();
            reporter.report(Progress::TaskIncrement);
            row
        })
        .collect();

    reporter.report(Progress::TaskFinish);

    let mut items: Vec<SdmItem> = rows.into_iter().flatten().collect();
    items.sort_by(|a, b| a.distance.total_cmp(&b.distance));

    let covalent = items.iter().filter(|item| item.covalent).count();
    debug!(pairs = items.len(), covalent, "Shortest distance matrix complete.");

    Ok(ShortestDistanceMatrix { items })
}

fn shortest_image(
    structure: &CrystalStructure,
    atom_radii: &[Option<f64>],
    config: &SdmConfig,
    i: usize,
    j: usize,
) -> Option<SdmItem> {
    let atoms = structure.atoms();
    let cell = structure.cell();
    let (a, b) = (&atoms[i], &atoms[j]);

    let mut best: Option<(f64, usize)> = None;
    for (index, op) in structure.symmetry().iter().enumerate() {
        let (folded, _) = minimum_image(&op.apply(&a.position), &b.position);
        let mut d = cell.vector_length(&folded);
        if index != IDENTITY_INDEX {
            d += config.tie_break_epsilon;
        }
        if d > config.noise_floor && best.is_none_or(|(shortest, _)| d < shortest) {
            best = Some((d, index));
        }
    }

    let (distance, symmetry_index) = best?;
    if distance > config.search_cutoff {
        return None;
    }

    let covalent = match (atom_radii[i], atom_radii[j]) {
        (Some(r1), Some(r2)) => {
            !(a.element.is_hydrogen() && b.element.is_hydrogen())
                && disorder_compatible(a.disorder_group, b.disorder_group)
                && distance < (r1 + r2) * config.bond_scale
        }
        _ => false,
    };

    Some(SdmItem {
        atom1: i,
        atom2: j,
        distance,
        symmetry_index,
        covalent,
    })
}
