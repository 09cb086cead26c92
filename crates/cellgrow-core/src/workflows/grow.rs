use crate::core::elements::radii::CovalentRadii;
use crate::core::io::molfile::MolFile;
use crate::core::models::molecule::{Bond, Molecule, PackedAtom};
use crate::core::models::structure::CrystalStructure;
use crate::core::symmetry::spacegroup::{SpaceGroupError, SpaceGroupInfo, SpaceGroupLookup};
use crate::engine::config::GrowConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::tasks::completion::NeededImage;
use crate::engine::tasks::fragments::FragmentAssignment;
use crate::engine::tasks::sdm::ShortestDistanceMatrix;
use crate::engine::tasks::{bonds, completion, fragments, packing, sdm};
use tracing::{debug, info, instrument};

/// Everything computed while growing a structure.
#[derive(Debug, Clone)]
pub struct GrowResult {
    /// Expanded Cartesian atoms and their bonds.
    pub molecule: Molecule,
    pub sdm: ShortestDistanceMatrix,
    pub fragments: FragmentAssignment,
    pub needed_images: Vec<NeededImage>,
}

#[instrument(skip_all, name = "grow_workflow")]
pub fn run(
    structure: &CrystalStructure,
    radii: &CovalentRadii,
    config: &GrowConfig,
    reporter: &ProgressReporter,
) -> Result<GrowResult, EngineError> {
    info!(
        atoms = structure.atom_count(),
        operators = structure.symmetry().len(),
        "Growing structure."
    );

    let matrix = reporter.phase("Shortest Distances", || {
        sdm::run(
            structure,
            radii,
            &config.sdm,
            config.unknown_elements,
            reporter,
        )
    })?;

    let assignment = reporter.phase("Fragments", || {
        let assignment = fragments::run(structure.atom_count(), &matrix);
        reporter.report(Progress::Message(format!(
            "{} fragment(s) in the asymmetric unit",
            assignment.count()
        )));
        assignment
    });

    let needed_images = reporter.phase("Symmetry Completion", || {
        completion::run(structure, &matrix, &assignment, &config.completion)
    });

    let atoms = reporter.phase("Packing", || {
        packing::run(
            structure,
            &assignment,
            &needed_images,
            &config.packing,
            reporter,
        )
    });

    let bond_list = reporter.phase("Bonds", || {
        bonds::run(&atoms, radii, &config.bonds, config.unknown_elements)
    })?;

    let molecule = Molecule::new(atoms, bond_list);
    info!(
        atoms = molecule.atoms.len(),
        generated = molecule.generated_atom_count(),
        bonds = molecule.bonds.len(),
        "Grow workflow complete."
    );

    Ok(GrowResult {
        molecule,
        sdm: matrix,
        fragments: assignment,
        needed_images,
    })
}

/// The asymmetric unit in Cartesian coordinates with derived bonds, without any
/// symmetry expansion.
///
/// # Errors
///
/// Returns [`EngineError::UnknownElement`] under the abort policy.
pub fn asymmetric_unit(
    structure: &CrystalStructure,
    radii: &CovalentRadii,
    config: &GrowConfig,
) -> Result<Molecule, EngineError> {
    let atoms = packing::asymmetric_atoms(structure);
    let bond_list = bonds::run(&atoms, radii, &config.bonds, config.unknown_elements)?;
    Ok(Molecule::new(atoms, bond_list))
}

/// Renders atoms as a molfile, deriving bonds when none are supplied.
///
/// # Errors
///
/// Returns [`EngineError::Output`] when a supplied bond references a missing atom and
/// [`EngineError::UnknownElement`] under the abort policy.
pub fn molfile(
    atoms: &[PackedAtom],
    bonds: Option<&[Bond]>,
    radii: &CovalentRadii,
    config: &GrowConfig,
) -> Result<String, EngineError> {
    let bond_list = match bonds {
        Some(explicit) => explicit.to_vec(),
        None => bonds::run(atoms, radii, &config.bonds, config.unknown_elements)?,
    };
    let molecule = Molecule::new(atoms.to_vec(), bond_list);
    Ok(MolFile::render(&molecule)?)
}

/// Overview of a structure before growing it.
#[derive(Debug, Clone)]
pub struct StructureSummary {
    pub atom_count: usize,
    pub operator_count: usize,
    pub volume: f64,
    pub centrosymmetric: bool,
    pub has_hydrogens: bool,
    pub has_disorder: bool,
    /// `None` when no known space group matches the operators.
    pub space_group: Option<SpaceGroupInfo>,
    pub fragment_count: usize,
}

/// Summarizes a structure: cell volume, symmetry, space group and fragment count.
///
/// An operator set no group matches leaves the space group empty.
///
/// # Errors
///
/// Returns [`EngineError::SpaceGroup`] when the operators match several space groups
/// and [`EngineError::UnknownElement`] under the abort policy.
#[instrument(skip_all, name = "summary_workflow")]
pub fn summarize(
    structure: &CrystalStructure,
    lookup: &impl SpaceGroupLookup,
    radii: &CovalentRadii,
    config: &GrowConfig,
) -> Result<StructureSummary, EngineError> {
    let space_group = match lookup.identify(structure.symmetry()) {
        Ok(info) => Some(info),
        Err(SpaceGroupError::NotFound { operator_count }) => {
            debug!(operator_count, "No space group matches the operator set.");
            None
        }
        Err(e) => return Err(e.into()),
    };

    let matrix = sdm::run(
        structure,
        radii,
        &config.sdm,
        config.unknown_elements,
        &ProgressReporter::new(),
    )?;
    let assignment = fragments::run(structure.atom_count(), &matrix);

    Ok(StructureSummary {
        atom_count: structure.atom_count(),
        operator_count: structure.symmetry().len(),
        volume: structure.cell().volume(),
        centrosymmetric: structure.symmetry().is_centrosymmetric(),
        has_hydrogens: structure.has_hydrogens(),
        has_disorder: structure.has_disorder(),
        space_group,
        fragment_count: assignment.count(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::elements::Element;
    use crate::core::models::atom::Atom;
    use crate::core::models::cell::UnitCell;
    use crate::core::models::molecule::AtomOrigin;
    use crate::core::symmetry::spacegroup::CommonSpaceGroups;
    use crate::core::symmetry::table::SymmetryTable;
    use nalgebra::Point3;
    use std::sync::Mutex;

    /// Ethane-like C2 unit sitting on an inversion centre at the origin.
    fn centrosymmetric_dimer() -> CrystalStructure {
        let cell = UnitCell::new(10.0, 10.0, 10.0, 90.0, 90.0, 90.0).unwrap();
        let table = SymmetryTable::from_triplets(&["x, y, z"], true).unwrap();
        let atoms = vec![
            Atom::new("C1", Element::new("C"), Point3::new(0.077, 0.0, 0.0)),
            Atom::new("H1", Element::new("H"), Point3::new(0.112, 0.1, 0.0)),
        ];
        CrystalStructure::new(cell, table, atoms).unwrap()
    }

    #[test]
    fn grow_completes_molecule_across_inversion_centre() {
        let structure = centrosymmetric_dimer();
        let result = run(
            &structure,
            &CovalentRadii::new(),
            &GrowConfig::default(),
            &ProgressReporter::new(),
        )
        .unwrap();

        assert_eq!(result.fragments.count(), 1);
        let molecule = &result.molecule;
        assert_eq!(molecule.atoms.len(), 4);
        assert_eq!(molecule.generated_atom_count(), 2);

        let c1_copy = &molecule.atoms[2];
        assert_eq!(c1_copy.label, "C1");
        assert!((c1_copy.position - Point3::new(-0.77, 0.0, 0.0)).norm() < 1e-9);
        assert_eq!(
            c1_copy.origin,
            AtomOrigin::SymmetryGenerated {
                symmetry_index: 1,
                translation: [0, 0, 0],
            }
        );

        // C1-C1' shares a label and is never bonded.
        assert_eq!(molecule.bonds, vec![Bond::new(0, 1), Bond::new(2, 3)]);
    }

    #[test]
    fn grow_reports_phases_in_order() {
        let phases = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if let Progress::PhaseStart { name } = event {
                phases.lock().unwrap().push(name);
            }
        }));
        run(
            &centrosymmetric_dimer(),
            &CovalentRadii::new(),
            &GrowConfig::default(),
            &reporter,
        )
        .unwrap();
        drop(reporter);
        assert_eq!(
            phases.into_inner().unwrap(),
            vec![
                "Shortest Distances",
                "Fragments",
                "Symmetry Completion",
                "Packing",
                "Bonds"
            ]
        );
    }

    #[test]
    fn growing_twice_gives_identical_results() {
        let structure = centrosymmetric_dimer();
        let grow = || {
            run(
                &structure,
                &CovalentRadii::new(),
                &GrowConfig::default(),
                &ProgressReporter::new(),
            )
            .unwrap()
            .molecule
        };
        assert_eq!(grow(), grow());
    }

    #[test]
    fn asymmetric_unit_skips_expansion() {
        let structure = centrosymmetric_dimer();
        let molecule =
            asymmetric_unit(&structure, &CovalentRadii::new(), &GrowConfig::default()).unwrap();
        assert_eq!(molecule.atoms.len(), 2);
        assert_eq!(molecule.generated_atom_count(), 0);
        assert_eq!(molecule.bonds, vec![Bond::new(0, 1)]);
    }

    #[test]
    fn molfile_derives_bonds_only_when_absent() {
        let structure = centrosymmetric_dimer();
        let atoms = packing::asymmetric_atoms(&structure);
        let radii = CovalentRadii::new();
        let config = GrowConfig::default();

        let derived = molfile(&atoms, None, &radii, &config).unwrap();
        assert!(derived.starts_with("\n\n\n    2    1\n"));

        let explicit = molfile(&atoms, Some(&[]), &radii, &config).unwrap();
        assert!(explicit.starts_with("\n\n\n    2    0\n"));

        let broken = molfile(&atoms, Some(&[Bond::new(0, 7)]), &radii, &config);
        assert!(matches!(broken, Err(EngineError::Output(_))));
    }

    #[test]
    fn summarize_reports_symmetry_and_fragments() {
        let summary = summarize(
            &centrosymmetric_dimer(),
            &CommonSpaceGroups::new(),
            &CovalentRadii::new(),
            &GrowConfig::default(),
        )
        .unwrap();
        assert_eq!(summary.atom_count, 2);
        assert_eq!(summary.operator_count, 2);
        assert!((summary.volume - 1000.0).abs() < 1e-9);
        assert!(summary.centrosymmetric);
        assert!(summary.has_hydrogens);
        assert!(!summary.has_disorder);
        assert_eq!(summary.space_group.map(|sg| sg.number), Some(2));
        assert_eq!(summary.fragment_count, 1);
    }

    #[test]
    fn summarize_surfaces_ambiguous_space_group() {
        let cell = UnitCell::new(10.0, 10.0, 10.0, 90.0, 90.0, 90.0).unwrap();
        let table = SymmetryTable::from_triplets(
            &["x, y, z", "-x+1/2, y, -z", "-x, -y, -z", "x+1/2, -y, z"],
            false,
        )
        .unwrap();
        let structure = CrystalStructure::new(cell, table, Vec::new()).unwrap();
        let err = summarize(
            &structure,
            &CommonSpaceGroups::new(),
            &CovalentRadii::new(),
            &GrowConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            EngineError::SpaceGroup(SpaceGroupError::Ambiguous { .. })
        ));
    }
}
