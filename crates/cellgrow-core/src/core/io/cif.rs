//! Builds crystal structures from tokenized CIF data blocks.
//!
//! CIF grammar is handled by an external parser; this module only needs the two
//! accessors of [`CifBlock`]. Values are taken as the parser returns them, without
//! quotes or text-field delimiters.

use super::checksum::shelx_checksum;
use crate::core::elements::Element;
use crate::core::models::atom::Atom;
use crate::core::models::cell::UnitCell;
use crate::core::models::error::ModelError;
use crate::core::models::structure::CrystalStructure;
use crate::core::symmetry::table::SymmetryTable;
use nalgebra::Point3;
use thiserror::Error;
use tracing::{debug, warn};

/// Read access to one data block of a parsed CIF document.
pub trait CifBlock {
    /// The value of a non-looped item.
    fn value(&self, tag: &str) -> Option<&str>;

    /// All values of a looped item, in loop order.
    fn loop_column(&self, tag: &str) -> Option<Vec<&str>>;
}

#[derive(Debug, Error)]
pub enum CifExtractError {
    #[error("Missing required item '{0}'")]
    MissingTag(String),
    #[error("Invalid number '{value}' for item '{tag}'")]
    InvalidNumber { tag: String, value: String },
    #[error("Loop column '{tag}' has {found} values, expected {expected}")]
    LoopLengthMismatch {
        tag: String,
        expected: usize,
        found: usize,
    },
    #[error("Invalid structure: {0}")]
    Model(#[from] ModelError),
}

const CELL_TAGS: [&str; 6] = [
    "_cell_length_a",
    "_cell_length_b",
    "_cell_length_c",
    "_cell_angle_alpha",
    "_cell_angle_beta",
    "_cell_angle_gamma",
];

const SYMOP_TAGS: [&str; 2] = [
    "_space_group_symop_operation_xyz",
    "_symmetry_equiv_pos_as_xyz",
];

/// `?` (unknown) and `.` (inapplicable) mark missing values.
fn is_missing(raw: &str) -> bool {
    matches!(raw.trim(), "" | "?" | ".")
}

/// Parses a CIF number, dropping a trailing standard uncertainty such as `(5)`.
///
/// Returns `Ok(None)` for missing values.
pub fn parse_number(tag: &str, raw: &str) -> Result<Option<f64>, CifExtractError> {
    if is_missing(raw) {
        return Ok(None);
    }
    let trimmed = raw.trim();
    let number = trimmed.split('(').next().unwrap_or(trimmed);
    number
        .parse::<f64>()
        .map(Some)
        .map_err(|_| CifExtractError::InvalidNumber {
            tag: tag.to_string(),
            value: raw.to_string(),
        })
}

fn required_number(block: &impl CifBlock, tag: &str) -> Result<f64, CifExtractError> {
    let raw = block
        .value(tag)
        .ok_or_else(|| CifExtractError::MissingTag(tag.to_string()))?;
    parse_number(tag, raw)?.ok_or_else(|| CifExtractError::MissingTag(tag.to_string()))
}

/// Reads the symmetry operator triplets, preferring the current dictionary name over
/// the deprecated one.
pub fn symmetry_operators(block: &impl CifBlock) -> Option<Vec<String>> {
    SYMOP_TAGS.iter().find_map(|tag| {
        block
            .loop_column(tag)
            .or_else(|| block.value(tag).map(|v| vec![v]))
            .map(|ops| ops.into_iter().map(str::to_string).collect())
    })
}

struct AtomSiteColumns<'a> {
    labels: Vec<&'a str>,
    types: Option<Vec<&'a str>>,
    x: Vec<&'a str>,
    y: Vec<&'a str>,
    z: Vec<&'a str>,
    disorder: Option<Vec<&'a str>>,
    occupancy: Option<Vec<&'a str>>,
    u_iso: Option<Vec<&'a str>>,
}

impl<'a> AtomSiteColumns<'a> {
    fn read(block: &'a impl CifBlock) -> Result<Self, CifExtractError> {
        let required = |tag: &str| {
            block
                .loop_column(tag)
                .ok_or_else(|| CifExtractError::MissingTag(tag.to_string()))
        };
        let columns = Self {
            labels: required("_atom_site_label")?,
            types: block.loop_column("_atom_site_type_symbol"),
            x: required("_atom_site_fract_x")?,
            y: required("_atom_site_fract_y")?,
            z: required("_atom_site_fract_z")?,
            disorder: block.loop_column("_atom_site_disorder_group"),
            occupancy: block.loop_column("_atom_site_occupancy"),
            u_iso: block.loop_column("_atom_site_U_iso_or_equiv"),
        };
        columns.check_lengths()?;
        Ok(columns)
    }

    fn check_lengths(&self) -> Result<(), CifExtractError> {
        let expected = self.labels.len();
        let columns: [(&str, Option<usize>); 7] = [
            ("_atom_site_type_symbol", self.types.as_ref().map(Vec::len)),
            ("_atom_site_fract_x", Some(self.x.len())),
            ("_atom_site_fract_y", Some(self.y.len())),
            ("_atom_site_fract_z", Some(self.z.len())),
            ("_atom_site_disorder_group", self.disorder.as_ref().map(Vec::len)),
            ("_atom_site_occupancy", self.occupancy.as_ref().map(Vec::len)),
            ("_atom_site_U_iso_or_equiv", self.u_iso.as_ref().map(Vec::len)),
        ];
        for (tag, len) in columns {
            if let Some(found) = len.filter(|&found| found != expected) {
                return Err(CifExtractError::LoopLengthMismatch {
                    tag: tag.to_string(),
                    expected,
                    found,
                });
            }
        }
        Ok(())
    }

    fn atom(&self, i: usize) -> Result<Atom, CifExtractError> {
        let label = self.labels[i];
        let element = match self.types.as_ref().map(|t| t[i]) {
            Some(symbol) if !is_missing(symbol) => Element::new(symbol),
            _ => Element::from_label(label),
        };
        let coordinate = |tag: &str, raw: &str| -> Result<f64, CifExtractError> {
            parse_number(tag, raw)?.ok_or_else(|| CifExtractError::InvalidNumber {
                tag: tag.to_string(),
                value: raw.to_string(),
            })
        };
        let position = Point3::new(
            coordinate("_atom_site_fract_x", self.x[i])?,
            coordinate("_atom_site_fract_y", self.y[i])?,
            coordinate("_atom_site_fract_z", self.z[i])?,
        );

        let disorder_group = match self.disorder.as_ref().map(|d| d[i]) {
            Some(raw) if !is_missing(raw) => {
                raw.trim()
                    .parse::<i32>()
                    .map_err(|_| CifExtractError::InvalidNumber {
                        tag: "_atom_site_disorder_group".to_string(),
                        value: raw.to_string(),
                    })?
            }
            _ => 0,
        };
        let occupancy = match self.occupancy.as_ref().map(|o| o[i]) {
            Some(raw) => parse_number("_atom_site_occupancy", raw)?.unwrap_or(1.0),
            None => 1.0,
        };
        let u_iso = match self.u_iso.as_ref().map(|u| u[i]) {
            Some(raw) => parse_number("_atom_site_U_iso_or_equiv", raw)?,
            None => None,
        };

        let atom = Atom::new(label, element, position)
            .with_disorder_group(disorder_group)
            .with_occupancy(occupancy);
        Ok(match u_iso {
            Some(u) => atom.with_u_iso(u),
            None => atom,
        })
    }
}

/// Builds a [`CrystalStructure`] from a CIF data block.
///
/// `centric` asserts a centrosymmetric structure whose operator list omits the
/// inversion; see [`SymmetryTable::from_triplets`].
///
/// # Errors
///
/// Returns [`CifExtractError::MissingTag`] when cell parameters, symmetry operators or
/// the required atom-site columns are absent, [`CifExtractError::InvalidNumber`] for
/// unparsable values, [`CifExtractError::LoopLengthMismatch`] for ragged atom-site
/// loops and [`CifExtractError::Model`] when the resulting structure is invalid.
pub fn extract_structure(
    block: &impl CifBlock,
    centric: bool,
) -> Result<CrystalStructure, CifExtractError> {
    let [a, b, c, alpha, beta, gamma] = CELL_TAGS.map(|tag| required_number(block, tag));
    let cell = UnitCell::new(a?, b?, c?, alpha?, beta?, gamma?)?;

    let operators = symmetry_operators(block)
        .ok_or_else(|| CifExtractError::MissingTag(SYMOP_TAGS[0].to_string()))?;
    let symmetry = SymmetryTable::from_triplets(&operators, centric)?;

    let columns = AtomSiteColumns::read(block)?;
    let atoms = (0..columns.labels.len())
        .map(|i| columns.atom(i))
        .collect::<Result<Vec<_>, _>>()?;
    debug!(
        atoms = atoms.len(),
        operators = symmetry.len(),
        "Extracted structure from CIF block."
    );

    Ok(CrystalStructure::new(cell, symmetry, atoms)?)
}

/// Result of comparing an embedded file's recorded checksum with the computed one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumCheck {
    /// Item holding the embedded file, e.g. `_shelx_res_file`.
    pub file_tag: &'static str,
    /// The recorded checksum, if present and numeric.
    pub recorded: Option<u32>,
    pub calculated: u32,
}

impl ChecksumCheck {
    pub fn is_match(&self) -> bool {
        self.recorded == Some(self.calculated)
    }
}

const EMBEDDED_FILES: [(&str, &str); 2] = [
    ("_shelx_res_file", "_shelx_res_checksum"),
    ("_shelx_hkl_file", "_shelx_hkl_checksum"),
];

/// Verifies the SHELX checksums of the res and hkl files embedded in a block.
///
/// Only embedded files that are present are checked. Mismatches are logged and
/// returned, never raised.
pub fn verify_checksums(block: &impl CifBlock) -> Vec<ChecksumCheck> {
    EMBEDDED_FILES
        .iter()
        .filter_map(|&(file_tag, checksum_tag)| {
            let content = block.value(file_tag).filter(|c| !is_missing(c))?;
            let recorded = block
                .value(checksum_tag)
                .and_then(|raw| raw.trim().parse::<u32>().ok());
            let check = ChecksumCheck {
                file_tag,
                recorded,
                calculated: shelx_checksum(content),
            };
            if !check.is_match() {
                warn!(
                    file = file_tag,
                    recorded = ?check.recorded,
                    calculated = check.calculated,
                    "Embedded file checksum does not match."
                );
            }
            Some(check)
        })
        .collect()
}
