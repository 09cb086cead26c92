use super::{load_radii, read_structure};
use crate::cli::InfoArgs;
use crate::error::Result;
use cellgrow::core::models::structure::CrystalStructure;
use cellgrow::core::symmetry::spacegroup::CommonSpaceGroups;
use cellgrow::engine::config::GrowConfig;
use cellgrow::workflows::grow::{self, StructureSummary};
use std::fmt::Write;
use tracing::info;

pub fn run(args: InfoArgs) -> Result<()> {
    let radii = load_radii(args.radii.as_deref())?;
    let structure = read_structure(&args.input)?;

    info!("Summarizing structure...");
    let summary = grow::summarize(
        &structure,
        &CommonSpaceGroups::new(),
        &radii,
        &GrowConfig::default(),
    )?;

    print!("{}", render(&structure, &summary));
    Ok(())
}

fn render(structure: &CrystalStructure, summary: &StructureSummary) -> String {
    let (a, b, c) = structure.cell().lengths();
    let (alpha, beta, gamma) = structure.cell().angles();
    let yes_no = |flag: bool| if flag { "yes" } else { "no" };

    let mut out = String::new();
    let _ = writeln!(out, "Cell:            {a:.4} {b:.4} {c:.4}  {alpha:.2} {beta:.2} {gamma:.2}");
    let _ = writeln!(out, "Volume:          {:.2} Å³", summary.volume);
    let _ = writeln!(out, "Operators:       {}", summary.operator_count);
    let _ = writeln!(out, "Centrosymmetric: {}", yes_no(summary.centrosymmetric));
    match &summary.space_group {
        Some(group) => {
            let _ = writeln!(
                out,
                "Space group:     {} (No. {}, {}){}",
                group.hermann_mauguin,
                group.number,
                group.crystal_system,
                if group.exact { "" } else { ", non-standard origin" }
            );
        }
        None => {
            let _ = writeln!(out, "Space group:     unknown");
        }
    }
    let _ = writeln!(out, "Atoms:           {}", summary.atom_count);
    let _ = writeln!(out, "Hydrogens:       {}", yes_no(summary.has_hydrogens));
    let _ = writeln!(out, "Disorder:        {}", yes_no(summary.has_disorder));
    let _ = writeln!(out, "Fragments:       {}", summary.fragment_count);
    out
}
