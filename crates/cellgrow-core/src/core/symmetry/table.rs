use super::operator::SymmetryOperator;
use crate::core::models::error::ModelError;
use std::ops::Index;

/// Index of the identity operator in every [`SymmetryTable`].
pub const IDENTITY_INDEX: usize = 0;

/// An ordered, duplicate-free list of symmetry operators whose first entry is the identity.
///
/// The engine breaks distance ties in favour of the lowest operator index, so the
/// identity-first ordering is part of the table's contract and enforced on construction.
#[derive(Debug, Clone, PartialEq)]
pub struct SymmetryTable {
    operators: Vec<SymmetryOperator>,
}

impl SymmetryTable {
    /// Builds a table from operators in their given order.
    ///
    /// The identity is moved to the front if it appears elsewhere, and later duplicates
    /// of an operator (equal modulo lattice translations) are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Configuration`] if `operators` is empty or does not contain
    /// the identity.
    pub fn new(operators: Vec<SymmetryOperator>) -> Result<Self, ModelError> {
        if operators.is_empty() {
            return Err(ModelError::Configuration(
                "symmetry operator list is empty; the identity operator must be supplied".into(),
            ));
        }
        let Some(identity_pos) = operators.iter().position(SymmetryOperator::is_identity) else {
            return Err(ModelError::Configuration(
                "symmetry operator list does not contain the identity operator".into(),
            ));
        };

        let mut ordered: Vec<SymmetryOperator> = Vec::with_capacity(operators.len());
        ordered.push(SymmetryOperator::identity());
        for (i, op) in operators.into_iter().enumerate() {
            if i == identity_pos || ordered.contains(&op) {
                continue;
            }
            ordered.push(op);
        }

        Ok(Self { operators: ordered })
    }

    /// Parses triplet strings into a table, optionally appending the inversion operator.
    ///
    /// `centric` asserts a centrosymmetric structure whose operator list only holds the
    /// non-centrosymmetric half; the inversion `-x, -y, -z` is then added (flagged
    /// `centric`) unless the list already contains it.
    ///
    /// # Errors
    ///
    /// Propagates parse failures and the construction errors of [`SymmetryTable::new`].
    pub fn from_triplets<S: AsRef<str>>(triplets: &[S], centric: bool) -> Result<Self, ModelError> {
        let operators = triplets
            .iter()
            .map(|t| SymmetryOperator::parse(t.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        let table = Self::new(operators)?;
        Ok(if centric { table.with_inversion() } else { table })
    }

    /// Returns the table extended by the inversion operator if it is not already present.
    pub fn with_inversion(mut self) -> Self {
        let inversion = SymmetryOperator::inversion();
        if !self.operators.contains(&inversion) {
            self.operators.push(inversion);
        }
        self
    }

    pub fn identity(&self) -> &SymmetryOperator {
        &self.operators[IDENTITY_INDEX]
    }

    pub fn operators(&self) -> &[SymmetryOperator] {
        &self.operators
    }

    pub fn get(&self, index: usize) -> Option<&SymmetryOperator> {
        self.operators.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SymmetryOperator> {
        self.operators.iter()
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    /// Always false: a table holds at least the identity.
    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    /// Whether any operator has the rotation part `-1` (an inversion centre exists).
    pub fn is_centrosymmetric(&self) -> bool {
        self.operators
            .iter()
            .any(SymmetryOperator::has_inverting_rotation)
    }
}

impl Index<usize> for SymmetryTable {
    type Output = SymmetryOperator;

    fn index(&self, index: usize) -> &Self::Output {
        &self.operators[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_empty_operator_list() {
        let result = SymmetryTable::new(Vec::new());
        assert!(matches!(result, Err(ModelError::Configuration(_))));
    }

    #[test]
    fn new_rejects_list_without_identity() {
        let result = SymmetryTable::from_triplets(&["-x, -y, -z"], false);
        assert!(matches!(result, Err(ModelError::Configuration(_))));
    }

    #[test]
    fn identity_is_moved_to_the_front() {
        let table = SymmetryTable::from_triplets(&["-x, y+1/2, -z", "x, y, z"], false).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table[IDENTITY_INDEX].is_identity());
        assert_eq!(table[1].to_string(), "-x, y+1/2, -z");
    }

    #[test]
    fn duplicate_operators_are_dropped() {
        let table =
            SymmetryTable::from_triplets(&["x, y, z", "-x, -y, -z", "-x+1, -y, -z", "x+1, y, z"], false)
                .unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn centric_flag_appends_inversion_once() {
        let table = SymmetryTable::from_triplets(&["x, y, z", "-x, y+1/2, -z+1/2"], true).unwrap();
        assert_eq!(table.len(), 3);
        assert!(table[2].is_inversion());
        assert!(table[2].centric);
        assert!(table.is_centrosymmetric());

        let already = SymmetryTable::from_triplets(&["x, y, z", "-x, -y, -z"], true).unwrap();
        assert_eq!(already.len(), 2);
    }

    #[test]
    fn is_centrosymmetric_detects_shifted_inversion_centres() {
        let table = SymmetryTable::from_triplets(&["x, y, z", "-x+1/2, -y+1/2, -z"], false).unwrap();
        assert!(table.is_centrosymmetric());
        let p21 = SymmetryTable::from_triplets(&["x, y, z", "-x, y+1/2, -z"], false).unwrap();
        assert!(!p21.is_centrosymmetric());
    }
}
