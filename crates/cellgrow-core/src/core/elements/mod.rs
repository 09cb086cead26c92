//! # Elements Module
//!
//! Chemical element symbols and the covalent radius table used for bond detection.
//!
//! - [`Element`] - A normalized element symbol (`"CL"`, `"cl"` and `"Cl1-"` all become `"Cl"`)
//! - [`radii`] - Static covalent radii with optional per-element overrides from CSV

pub mod radii;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Raised when an element has no entry in the covalent radius table.
///
/// Callers decide whether this is fatal; the engine treats such atoms as non-bonding.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown element '{symbol}': no covalent radius available")]
pub struct UnknownElementError {
    pub symbol: String,
}

/// A chemical element identified by its normalized symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Element(String);

impl Element {
    /// Normalizes a raw type symbol into an element.
    ///
    /// Only the leading alphabetic run is kept (charges, digits and suffixes such as
    /// `"O2-"` or `"C1A"` are dropped) and at most two letters are retained, with the
    /// first upper-cased and the second lower-cased.
    pub fn new(raw: &str) -> Self {
        let letters: String = raw
            .trim()
            .chars()
            .take_while(|c| c.is_ascii_alphabetic())
            .take(2)
            .collect();
        let mut chars = letters.chars();
        let symbol = match chars.next() {
            Some(first) => {
                let mut s = first.to_ascii_uppercase().to_string();
                s.extend(chars.map(|c| c.to_ascii_lowercase()));
                s
            }
            None => String::new(),
        };
        Self(symbol)
    }

    /// Derives an element from an atom label such as `"C12"` or `"Cl1"`.
    ///
    /// Two-letter symbols are preferred when the radius table knows them, so `"Cl1"`
    /// resolves to chlorine; otherwise the first letter is used.
    pub fn from_label(label: &str) -> Self {
        let two = Self::new(label);
        if two.0.len() == 2 && radii::default_radius(&two).is_some() {
            return two;
        }
        Self::new(&label.chars().take(1).collect::<String>())
    }

    pub fn symbol(&self) -> &str {
        &self.0
    }

    /// Hydrogen-class atoms (H and its isotope D) follow special bonding rules.
    pub fn is_hydrogen(&self) -> bool {
        matches!(self.0.as_str(), "H" | "D")
    }
}

impl From<&str> for Element {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for Element {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

impl From<Element> for String {
    fn from(element: Element) -> Self {
        element.0
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_normalizes_case_and_strips_charges() {
        assert_eq!(Element::new("CL").symbol(), "Cl");
        assert_eq!(Element::new("cl").symbol(), "Cl");
        assert_eq!(Element::new("O2-").symbol(), "O");
        assert_eq!(Element::new("Fe3+").symbol(), "Fe");
        assert_eq!(Element::new(" c ").symbol(), "C");
    }

    #[test]
    fn new_of_empty_or_numeric_input_is_empty() {
        assert_eq!(Element::new("").symbol(), "");
        assert_eq!(Element::new("12").symbol(), "");
    }

    #[test]
    fn from_label_prefers_known_two_letter_symbols() {
        assert_eq!(Element::from_label("Cl1").symbol(), "Cl");
        assert_eq!(Element::from_label("C12").symbol(), "C");
        assert_eq!(Element::from_label("H1A").symbol(), "H");
        assert_eq!(Element::from_label("Nb2").symbol(), "Nb");
    }

    #[test]
    fn hydrogen_class_includes_deuterium() {
        assert!(Element::new("H").is_hydrogen());
        assert!(Element::new("D").is_hydrogen());
        assert!(!Element::new("He").is_hydrogen());
        assert!(!Element::new("C").is_hydrogen());
    }
}
