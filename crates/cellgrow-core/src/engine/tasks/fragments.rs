use crate::engine::tasks::sdm::ShortestDistanceMatrix;
use std::collections::VecDeque;
use tracing::{debug, instrument};

/// Fragment membership of every asymmetric-unit atom.
///
/// Fragment ids start at 1 and are numbered in order of their lowest atom index.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FragmentAssignment {
    fragment_of: Vec<usize>,
    count: usize,
}

impl FragmentAssignment {
    /// Fragment id of an atom.
    pub fn fragment_of(&self, atom: usize) -> usize {
        self.fragment_of[atom]
    }

    /// Fragment ids indexed by atom.
    pub fn assignments(&self) -> &[usize] {
        &self.fragment_of
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Atom indices belonging to `fragment`, ascending.
    pub fn members(&self, fragment: usize) -> Vec<usize> {
        self.fragment_of
            .iter()
            .enumerate()
            .filter_map(|(atom, &f)| (f == fragment).then_some(atom))
            .collect()
    }
}

/// Partitions atoms into connected components of the covalent bond graph.
///
/// The lowest unlabeled atom seeds the next fragment, which is flooded completely
/// before the following seed is picked. Atoms without covalent partners become
/// singleton fragments.
#[instrument(skip_all, name = "fragment_labeling_task")]
pub fn run(atom_count: usize, sdm: &ShortestDistanceMatrix) -> FragmentAssignment {
    let mut neighbors: Vec<Vec<usize>> = vec![Vec::new(); atom_count];
    for item in sdm.covalent() {
        if item.atom1 != item.atom2 {
            neighbors[item.atom1].push(item.atom2);
            neighbors[item.atom2].push(item.atom1);
        }
    }

    let mut fragment_of = vec![0usize; atom_count];
    let mut count = 0;
    let mut queue = VecDeque::new();
    for seed in 0..atom_count {
        if fragment_of[seed] != 0 {
            continue;
        }
        count += 1;
        fragment_of[seed] = count;
        queue.push_back(seed);
        while let Some(atom) = queue.pop_front() {
            for &next in &neighbors[atom] {
                if fragment_of[next] == 0 {
                    fragment_of[next] = count;
                    queue.push_back(next);
                }
            }
        }
    }

    debug!(atoms = atom_count, fragments = count, "Fragment labeling complete.");
    FragmentAssignment { fragment_of, count }
}
