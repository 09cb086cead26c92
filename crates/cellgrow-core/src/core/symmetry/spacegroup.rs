use super::operator::SymmetryOperator;
use super::table::SymmetryTable;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpaceGroupError {
    #[error("Operator set matches several space groups: {}", candidates.join(", "))]
    Ambiguous { candidates: Vec<String> },
    #[error("No known space group matches the {operator_count} given operators")]
    NotFound { operator_count: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CrystalSystem {
    Triclinic,
    Monoclinic,
    Orthorhombic,
    Tetragonal,
    Trigonal,
    Hexagonal,
    Cubic,
}

impl fmt::Display for CrystalSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CrystalSystem::Triclinic => "triclinic",
            CrystalSystem::Monoclinic => "monoclinic",
            CrystalSystem::Orthorhombic => "orthorhombic",
            CrystalSystem::Tetragonal => "tetragonal",
            CrystalSystem::Trigonal => "trigonal",
            CrystalSystem::Hexagonal => "hexagonal",
            CrystalSystem::Cubic => "cubic",
        };
        f.write_str(name)
    }
}

/// Description of a space group identified from an operator set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpaceGroupInfo {
    /// Hermann-Mauguin symbol, e.g. "P 1 21/c 1".
    pub hermann_mauguin: String,
    /// International Tables number.
    pub number: u16,
    pub crystal_system: CrystalSystem,
    pub centrosymmetric: bool,
    /// False when the match was made on rotation parts only (non-standard origin).
    pub exact: bool,
}

/// Identifies the space group generated by a set of symmetry operators.
pub trait SpaceGroupLookup {
    /// # Errors
    ///
    /// Returns [`SpaceGroupError::Ambiguous`] when several groups fit equally well and
    /// [`SpaceGroupError::NotFound`] when none does. Lookups are deterministic and are
    /// never retried.
    fn identify(&self, table: &SymmetryTable) -> Result<SpaceGroupInfo, SpaceGroupError>;
}

struct SpaceGroupEntry {
    hermann_mauguin: &'static str,
    number: u16,
    crystal_system: CrystalSystem,
    operators: &'static [&'static str],
}

static COMMON_SPACE_GROUPS: &[SpaceGroupEntry] = &[
    SpaceGroupEntry {
        hermann_mauguin: "P 1",
        number: 1,
        crystal_system: CrystalSystem::Triclinic,
        operators: &["x, y, z"],
    },
    SpaceGroupEntry {
        hermann_mauguin: "P -1",
        number: 2,
        crystal_system: CrystalSystem::Triclinic,
        operators: &["x, y, z", "-x, -y, -z"],
    },
    SpaceGroupEntry {
        hermann_mauguin: "P 1 21 1",
        number: 4,
        crystal_system: CrystalSystem::Monoclinic,
        operators: &["x, y, z", "-x, y+1/2, -z"],
    },
    SpaceGroupEntry {
        hermann_mauguin: "C 1 2 1",
        number: 5,
        crystal_system: CrystalSystem::Monoclinic,
        operators: &["x, y, z", "-x, y, -z", "x+1/2, y+1/2, z", "-x+1/2, y+1/2, -z"],
    },
    SpaceGroupEntry {
        hermann_mauguin: "C 1 c 1",
        number: 9,
        crystal_system: CrystalSystem::Monoclinic,
        operators: &[
            "x, y, z",
            "x, -y, z+1/2",
            "x+1/2, y+1/2, z",
            "x+1/2, -y+1/2, z+1/2",
        ],
    },
    SpaceGroupEntry {
        hermann_mauguin: "P 1 21/c 1",
        number: 14,
        crystal_system: CrystalSystem::Monoclinic,
        operators: &["x, y, z", "-x, y+1/2, -z+1/2", "-x, -y, -z", "x, -y+1/2, z+1/2"],
    },
    SpaceGroupEntry {
        hermann_mauguin: "P 1 21/n 1",
        number: 14,
        crystal_system: CrystalSystem::Monoclinic,
        operators: &[
            "x, y, z",
            "-x+1/2, y+1/2, -z+1/2",
            "-x, -y, -z",
            "x+1/2, -y+1/2, z+1/2",
        ],
    },
    SpaceGroupEntry {
        hermann_mauguin: "C 1 2/c 1",
        number: 15,
        crystal_system: CrystalSystem::Monoclinic,
        operators: &[
            "x, y, z",
            "-x, y, -z+1/2",
            "x+1/2, y+1/2, z",
            "-x+1/2, y+1/2, -z+1/2",
            "-x, -y, -z",
            "x, -y, z+1/2",
            "-x+1/2, -y+1/2, -z",
            "x+1/2, -y+1/2, z+1/2",
        ],
    },
    SpaceGroupEntry {
        hermann_mauguin: "P 21 21 21",
        number: 19,
        crystal_system: CrystalSystem::Orthorhombic,
        operators: &[
            "x, y, z",
            "-x+1/2, -y, z+1/2",
            "-x, y+1/2, -z+1/2",
            "x+1/2, -y+1/2, -z",
        ],
    },
    SpaceGroupEntry {
        hermann_mauguin: "P n a 21",
        number: 33,
        crystal_system: CrystalSystem::Orthorhombic,
        operators: &[
            "x, y, z",
            "-x, -y, z+1/2",
            "x+1/2, -y+1/2, z",
            "-x+1/2, y+1/2, z+1/2",
        ],
    },
    SpaceGroupEntry {
        hermann_mauguin: "P b c a",
        number: 61,
        crystal_system: CrystalSystem::Orthorhombic,
        operators: &[
            "x, y, z",
            "-x+1/2, -y, z+1/2",
            "-x, y+1/2, -z+1/2",
            "x+1/2, -y+1/2, -z",
            "-x, -y, -z",
            "x+1/2, y, -z+1/2",
            "x, -y+1/2, z+1/2",
            "-x+1/2, y+1/2, z",
        ],
    },
    SpaceGroupEntry {
        hermann_mauguin: "P n m a",
        number: 62,
        crystal_system: CrystalSystem::Orthorhombic,
        operators: &[
            "x, y, z",
            "-x+1/2, -y, z+1/2",
            "-x, y+1/2, -z",
            "x+1/2, -y+1/2, -z+1/2",
            "-x, -y, -z",
            "x+1/2, y, -z+1/2",
            "x, -y+1/2, z",
            "-x+1/2, y+1/2, z+1/2",
        ],
    },
];

/// Built-in lookup over the space groups most frequent in small-molecule crystallography.
///
/// An exact operator-set match (translations compared modulo lattice vectors) wins.
/// Otherwise groups whose rotation parts match are candidates: one candidate is
/// reported as an inexact match, several raise [`SpaceGroupError::Ambiguous`].
#[derive(Debug, Default, Clone, Copy)]
pub struct CommonSpaceGroups;

impl CommonSpaceGroups {
    pub fn new() -> Self {
        Self
    }

    fn entry_table(entry: &SpaceGroupEntry) -> Option<SymmetryTable> {
        SymmetryTable::from_triplets(entry.operators, false).ok()
    }

    fn info(entry: &SpaceGroupEntry, table: &SymmetryTable, exact: bool) -> SpaceGroupInfo {
        SpaceGroupInfo {
            hermann_mauguin: entry.hermann_mauguin.to_string(),
            number: entry.number,
            crystal_system: entry.crystal_system,
            centrosymmetric: table.is_centrosymmetric(),
            exact,
        }
    }
}

impl SpaceGroupLookup for CommonSpaceGroups {
    fn identify(&self, table: &SymmetryTable) -> Result<SpaceGroupInfo, SpaceGroupError> {
        let known: Vec<(&SpaceGroupEntry, SymmetryTable)> = COMMON_SPACE_GROUPS
            .iter()
            .filter_map(|entry| Self::entry_table(entry).map(|t| (entry, t)))
            .collect();

        if let Some((entry, reference)) = known
            .iter()
            .find(|(_, reference)| same_operator_set(table, reference))
        {
            return Ok(Self::info(entry, reference, true));
        }

        let candidates: Vec<&(&SpaceGroupEntry, SymmetryTable)> = known
            .iter()
            .filter(|(_, reference)| same_rotation_parts(table, reference))
            .collect();

        match candidates.as_slice() {
            [] => Err(SpaceGroupError::NotFound {
                operator_count: table.len(),
            }),
            [(entry, reference)] => Ok(Self::info(entry, reference, false)),
            many => Err(SpaceGroupError::Ambiguous {
                candidates: many
                    .iter()
                    .map(|(entry, _)| entry.hermann_mauguin.to_string())
                    .collect(),
            }),
        }
    }
}

fn same_operator_set(a: &SymmetryTable, b: &SymmetryTable) -> bool {
    a.len() == b.len() && a.iter().all(|op| b.operators().contains(op))
}

fn same_rotation_parts(a: &SymmetryTable, b: &SymmetryTable) -> bool {
    let count = |table: &SymmetryTable, op: &SymmetryOperator| {
        table.iter().filter(|other| other.matrix == op.matrix).count()
    };
    a.len() == b.len() && a.iter().all(|op| count(a, op) == count(b, op))
}
