use super::{load_radii, read_structure};
use crate::cli::GrowArgs;
use crate::config::PartialGrowConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use cellgrow::{
    core::io::{molfile::MolFile, traits::MoleculeFile},
    core::models::molecule::{Molecule, PackedAtom},
    engine::progress::ProgressReporter,
    workflows,
};
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

/// One row of the packed-atom CSV table.
#[derive(Debug, Serialize)]
struct AtomRow<'a> {
    label: &'a str,
    element: &'a str,
    x: f64,
    y: f64,
    z: f64,
    disorder_group: i32,
    occupancy: f64,
    origin: String,
}

impl<'a> From<&'a PackedAtom> for AtomRow<'a> {
    fn from(atom: &'a PackedAtom) -> Self {
        Self {
            label: &atom.label,
            element: atom.element.symbol(),
            x: atom.position.x,
            y: atom.position.y,
            z: atom.position.z,
            disorder_group: atom.disorder_group,
            occupancy: atom.occupancy,
            origin: atom.origin.to_string(),
        }
    }
}

pub fn run(args: GrowArgs) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let config = PartialGrowConfig::load(args.config.as_deref())?.merge_with_cli(&args)?;
    let radii = load_radii(args.radii.as_deref())?;
    let structure = read_structure(&args.input)?;

    let molecule = if args.no_grow {
        info!("Skipping symmetry expansion (--no-grow).");
        workflows::grow::asymmetric_unit(&structure, &radii, &config)?
    } else {
        let progress_handler = CliProgressHandler::new();
        let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

        println!("Growing structure...");
        info!("Invoking the core grow workflow...");
        let result = workflows::grow::run(&structure, &radii, &config, &reporter)?;
        info!(
            fragments = result.fragments.count(),
            images = result.needed_images.len(),
            "Workflow finished."
        );
        result.molecule
    };

    if molecule.bonds.is_empty() && molecule.atoms.len() > 1 {
        warn!("No bonds were derived; check the covalent radii and cell parameters.");
    }

    info!("Writing molfile to {:?}", &args.output);
    MolFile::write_to_path(&molecule, &args.output).map_err(|e| CliError::Output {
        path: args.output.clone(),
        source: e.into(),
    })?;
    println!(
        "✓ {} atom(s), {} bond(s) written to: {}",
        molecule.atoms.len(),
        molecule.bonds.len(),
        args.output.display()
    );

    if let Some(csv_path) = &args.atoms_csv {
        write_atoms_csv(&molecule, csv_path)?;
        println!("  Atom table written to: {}", csv_path.display());
    }

    Ok(())
}

fn write_atoms_csv(molecule: &Molecule, path: &Path) -> Result<()> {
    info!("Writing packed-atom table to {:?}", path);
    let output_error = |e: csv::Error| CliError::Output {
        path: path.to_path_buf(),
        source: e.into(),
    };
    let mut writer = csv::Writer::from_path(path).map_err(output_error)?;
    for atom in &molecule.atoms {
        writer.serialize(AtomRow::from(atom)).map_err(output_error)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use crate::commands::fixtures::DIMER;
    use clap::Parser;
    use std::fs;
    use tempfile::tempdir;

    fn grow_args(argv: &[&str]) -> GrowArgs {
        let mut full = vec!["cellgrow", "grow"];
        full.extend_from_slice(argv);
        match Cli::parse_from(full).command {
            Commands::Grow(args) => args,
            other => panic!("expected 'grow' subcommand, got {:?}", other),
        }
    }

    #[test]
    fn grow_writes_expanded_molfile_and_atom_table() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("dimer.toml");
        let output = dir.path().join("dimer.mol");
        let table = dir.path().join("atoms.csv");
        fs::write(&input, DIMER).unwrap();

        run(grow_args(&[
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--atoms-csv",
            table.to_str().unwrap(),
        ]))
        .unwrap();

        let molfile = fs::read_to_string(&output).unwrap();
        assert!(molfile.starts_with("\n\n\n    4    2\n"));
        assert!(molfile.ends_with("M  END\n$$$$"));

        let csv = fs::read_to_string(&table).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "label,element,x,y,z,disorder_group,occupancy,origin"
        );
        assert_eq!(lines.len(), 5);
        assert!(lines[1].starts_with("C1,C,"));
        assert!(lines[1].ends_with(",asymmetric"));
        assert!(lines[3].ends_with(",symmgen 2_555"));
    }

    #[test]
    fn no_grow_writes_the_asymmetric_unit_only() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("dimer.toml");
        let output = dir.path().join("asu.mol");
        fs::write(&input, DIMER).unwrap();

        run(grow_args(&[
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--no-grow",
        ]))
        .unwrap();

        let molfile = fs::read_to_string(&output).unwrap();
        assert!(molfile.starts_with("\n\n\n    2    1\n"));
    }

    #[test]
    fn invalid_override_fails_before_reading_input() {
        let result = run(grow_args(&[
            "-i",
            "/nonexistent/in.toml",
            "-o",
            "/nonexistent/out.mol",
            "-S",
            "sdm.search-cutoff=0",
        ]));
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn missing_input_is_a_parsing_error() {
        let dir = tempdir().unwrap();
        let result = run(grow_args(&[
            "-i",
            dir.path().join("missing.toml").to_str().unwrap(),
            "-o",
            dir.path().join("out.mol").to_str().unwrap(),
        ]));
        assert!(matches!(result, Err(CliError::FileParsing { .. })));
    }

    #[test]
    fn unwritable_output_is_an_output_error() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("dimer.toml");
        fs::write(&input, DIMER).unwrap();
        let result = run(grow_args(&[
            "-i",
            input.to_str().unwrap(),
            "-o",
            dir.path().join("missing/out.mol").to_str().unwrap(),
            "--no-grow",
        ]));
        assert!(matches!(result, Err(CliError::Output { .. })));
    }
}
