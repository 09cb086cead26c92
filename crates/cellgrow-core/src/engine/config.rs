use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Invalid value {value} for parameter '{name}': {requirement}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        requirement: &'static str,
    },
}

/// What to do with atoms whose element has no covalent radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownElementPolicy {
    /// Treat the atom as non-bonding and log one warning per element.
    #[default]
    NonBonding,
    /// Abort with [`UnknownElementError`](crate::core::elements::UnknownElementError).
    Abort,
}

/// Shortest distance matrix parameters (Å unless noted).
#[derive(Debug, Clone, PartialEq)]
pub struct SdmConfig {
    /// Pairs whose shortest image distance exceeds this are dropped.
    pub search_cutoff: f64,
    /// Image distances at or below this are self-coincidences and ignored.
    pub noise_floor: f64,
    /// Added to distances from non-identity operators so the identity wins ties.
    pub tie_break_epsilon: f64,
    /// Factor applied to the covalent radius sum (dimensionless).
    pub bond_scale: f64,
}

impl Default for SdmConfig {
    fn default() -> Self {
        Self {
            search_cutoff: 4.0,
            noise_floor: 0.01,
            tie_break_epsilon: 1e-4,
            bond_scale: 1.2,
        }
    }
}

/// Symmetry-completion parameters (Å unless noted).
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionConfig {
    /// Slack added to a bond's distance when matching its symmetry images.
    pub bond_tolerance: f64,
    /// Absolute image-distance limit for pairs of hydrogen-class atoms.
    ///
    /// The shortest-distance pass never marks an H–H pair covalent, so this only
    /// takes effect for matrices whose covalent H–H items come from the caller.
    pub hydrogen_cutoff: f64,
    /// Images closer than this are the atom itself.
    pub min_image_offset: f64,
    /// Only fragments with ids up to this value are grown.
    pub max_grown_fragments: Option<usize>,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            bond_tolerance: 0.2,
            hydrogen_cutoff: 1.8,
            min_image_offset: 0.001,
            max_grown_fragments: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PackingConfig {
    /// Generated atoms closer than this to an atom of equal occupancy are duplicates.
    pub duplicate_tolerance: f64,
}

impl Default for PackingConfig {
    fn default() -> Self {
        Self {
            duplicate_tolerance: 0.2,
        }
    }
}

/// Bond derivation over expanded Cartesian atoms.
#[derive(Debug, Clone, PartialEq)]
pub struct BondConfig {
    /// Added to the covalent radius sum.
    pub extra_bond_length: f64,
    /// Pairs farther apart are never considered.
    pub screen_cutoff: f64,
}

impl Default for BondConfig {
    fn default() -> Self {
        Self {
            extra_bond_length: 0.48,
            screen_cutoff: 4.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GrowConfig {
    pub sdm: SdmConfig,
    pub completion: CompletionConfig,
    pub packing: PackingConfig,
    pub bonds: BondConfig,
    pub unknown_elements: UnknownElementPolicy,
}

#[derive(Default)]
pub struct GrowConfigBuilder {
    search_cutoff: Option<f64>,
    noise_floor: Option<f64>,
    tie_break_epsilon: Option<f64>,
    bond_scale: Option<f64>,
    bond_tolerance: Option<f64>,
    hydrogen_cutoff: Option<f64>,
    min_image_offset: Option<f64>,
    max_grown_fragments: Option<usize>,
    duplicate_tolerance: Option<f64>,
    extra_bond_length: Option<f64>,
    bond_screen_cutoff: Option<f64>,
    unknown_elements: Option<UnknownElementPolicy>,
}

impl GrowConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search_cutoff(mut self, cutoff: f64) -> Self {
        self.search_cutoff = Some(cutoff);
        self
    }
    pub fn noise_floor(mut self, floor: f64) -> Self {
        self.noise_floor = Some(floor);
        self
    }
    pub fn tie_break_epsilon(mut self, epsilon: f64) -> Self {
        self.tie_break_epsilon = Some(epsilon);
        self
    }
    pub fn bond_scale(mut self, scale: f64) -> Self {
        self.bond_scale = Some(scale);
        self
    }
    pub fn bond_tolerance(mut self, tolerance: f64) -> Self {
        self.bond_tolerance = Some(tolerance);
        self
    }
    pub fn hydrogen_cutoff(mut self, cutoff: f64) -> Self {
        self.hydrogen_cutoff = Some(cutoff);
        self
    }
    pub fn min_image_offset(mut self, offset: f64) -> Self {
        self.min_image_offset = Some(offset);
        self
    }
    pub fn max_grown_fragments(mut self, max: usize) -> Self {
        self.max_grown_fragments = Some(max);
        self
    }
    pub fn duplicate_tolerance(mut self, tolerance: f64) -> Self {
        self.duplicate_tolerance = Some(tolerance);
        self
    }
    pub fn extra_bond_length(mut self, extra: f64) -> Self {
        self.extra_bond_length = Some(extra);
        self
    }
    pub fn bond_screen_cutoff(mut self, cutoff: f64) -> Self {
        self.bond_screen_cutoff = Some(cutoff);
        self
    }
    pub fn unknown_elements(mut self, policy: UnknownElementPolicy) -> Self {
        self.unknown_elements = Some(policy);
        self
    }

    /// Builds the configuration, filling unset parameters with their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidParameter`] for non-finite values, negative
    /// tolerances, non-positive cutoffs or scales, and a noise floor that is not below
    /// the search cutoff.
    pub fn build(self) -> Result<GrowConfig, ConfigError> {
        let defaults = GrowConfig::default();

        let sdm = SdmConfig {
            search_cutoff: positive(
                "search_cutoff",
                self.search_cutoff.unwrap_or(defaults.sdm.search_cutoff),
            )?,
            noise_floor: non_negative(
                "noise_floor",
                self.noise_floor.unwrap_or(defaults.sdm.noise_floor),
            )?,
            tie_break_epsilon: non_negative(
                "tie_break_epsilon",
                self.tie_break_epsilon
                    .unwrap_or(defaults.sdm.tie_break_epsilon),
            )?,
            bond_scale: positive(
                "bond_scale",
                self.bond_scale.unwrap_or(defaults.sdm.bond_scale),
            )?,
        };
        if sdm.noise_floor >= sdm.search_cutoff {
            return Err(ConfigError::InvalidParameter {
                name: "noise_floor",
                value: sdm.noise_floor,
                requirement: "must be below search_cutoff",
            });
        }

        let completion = CompletionConfig {
            bond_tolerance: non_negative(
                "bond_tolerance",
                self.bond_tolerance
                    .unwrap_or(defaults.completion.bond_tolerance),
            )?,
            hydrogen_cutoff: positive(
                "hydrogen_cutoff",
                self.hydrogen_cutoff
                    .unwrap_or(defaults.completion.hydrogen_cutoff),
            )?,
            min_image_offset: non_negative(
                "min_image_offset",
                self.min_image_offset
                    .unwrap_or(defaults.completion.min_image_offset),
            )?,
            max_grown_fragments: self
                .max_grown_fragments
                .or(defaults.completion.max_grown_fragments),
        };

        let packing = PackingConfig {
            duplicate_tolerance: non_negative(
                "duplicate_tolerance",
                self.duplicate_tolerance
                    .unwrap_or(defaults.packing.duplicate_tolerance),
            )?,
        };

        let bonds = BondConfig {
            extra_bond_length: non_negative(
                "extra_bond_length",
                self.extra_bond_length
                    .unwrap_or(defaults.bonds.extra_bond_length),
            )?,
            screen_cutoff: positive(
                "bond_screen_cutoff",
                self.bond_screen_cutoff
                    .unwrap_or(defaults.bonds.screen_cutoff),
            )?,
        };

        Ok(GrowConfig {
            sdm,
            completion,
            packing,
            bonds,
            unknown_elements: self.unknown_elements.unwrap_or(defaults.unknown_elements),
        })
    }
}

fn positive(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            value,
            requirement: "must be finite and greater than zero",
        })
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            value,
            requirement: "must be finite and not negative",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_without_overrides_yields_defaults() {
        let config = GrowConfigBuilder::new().build().unwrap();
        assert_eq!(config, GrowConfig::default());
        assert_eq!(config.sdm.search_cutoff, 4.0);
        assert_eq!(config.sdm.tie_break_epsilon, 1e-4);
        assert_eq!(config.packing.duplicate_tolerance, 0.2);
        assert_eq!(config.bonds.extra_bond_length, 0.48);
        assert_eq!(config.completion.max_grown_fragments, None);
        assert_eq!(config.unknown_elements, UnknownElementPolicy::NonBonding);
    }

    #[test]
    fn builder_applies_overrides() {
        let config = GrowConfigBuilder::new()
            .bond_scale(1.1)
            .duplicate_tolerance(0.3)
            .max_grown_fragments(6)
            .unknown_elements(UnknownElementPolicy::Abort)
            .build()
            .unwrap();
        assert_eq!(config.sdm.bond_scale, 1.1);
        assert_eq!(config.packing.duplicate_tolerance, 0.3);
        assert_eq!(config.completion.max_grown_fragments, Some(6));
        assert_eq!(config.unknown_elements, UnknownElementPolicy::Abort);
    }

    #[test]
    fn builder_rejects_negative_tolerance() {
        let err = GrowConfigBuilder::new()
            .bond_tolerance(-0.1)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParameter { name: "bond_tolerance", .. }
        ));
    }

    #[test]
    fn builder_rejects_non_finite_cutoff() {
        let err = GrowConfigBuilder::new()
            .search_cutoff(f64::NAN)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParameter { name: "search_cutoff", .. }
        ));
    }

    #[test]
    fn builder_rejects_noise_floor_above_cutoff() {
        let err = GrowConfigBuilder::new()
            .search_cutoff(2.0)
            .noise_floor(2.5)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParameter { name: "noise_floor", .. }
        ));
    }
}
