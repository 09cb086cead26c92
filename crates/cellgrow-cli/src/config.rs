use crate::cli::GrowArgs;
use crate::error::{CliError, Result};
use cellgrow::engine::config as core_config;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialSdmConfig {
    search_cutoff: Option<f64>,
    noise_floor: Option<f64>,
    tie_break_epsilon: Option<f64>,
    bond_scale: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialCompletionConfig {
    bond_tolerance: Option<f64>,
    hydrogen_cutoff: Option<f64>,
    min_image_offset: Option<f64>,
    max_grown_fragments: Option<usize>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialPackingConfig {
    duplicate_tolerance: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialMolfileConfig {
    extra_bond_length: Option<f64>,
    bond_screen_cutoff: Option<f64>,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
enum PartialUnknownElementPolicy {
    NonBonding,
    Abort,
}

impl From<PartialUnknownElementPolicy> for core_config::UnknownElementPolicy {
    fn from(p: PartialUnknownElementPolicy) -> Self {
        match p {
            PartialUnknownElementPolicy::NonBonding => Self::NonBonding,
            PartialUnknownElementPolicy::Abort => Self::Abort,
        }
    }
}

/// The `grow` configuration as read from a TOML file: every field optional.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PartialGrowConfig {
    unknown_elements: Option<PartialUnknownElementPolicy>,
    sdm: Option<PartialSdmConfig>,
    completion: Option<PartialCompletionConfig>,
    packing: Option<PartialPackingConfig>,
    molfile: Option<PartialMolfileConfig>,
}

impl PartialGrowConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Loads the file named by `--config`, or starts from an empty configuration.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Applies `-S` overrides and dedicated flags, then builds the validated core
    /// configuration. Unset values fall back to the core defaults.
    pub fn merge_with_cli(mut self, args: &GrowArgs) -> Result<core_config::GrowConfig> {
        self.apply_set_values(&args.set_values)?;

        let mut builder = core_config::GrowConfigBuilder::new();

        if let Some(sdm) = self.sdm.take() {
            if let Some(v) = sdm.search_cutoff {
                builder = builder.search_cutoff(v);
            }
            if let Some(v) = sdm.noise_floor {
                builder = builder.noise_floor(v);
            }
            if let Some(v) = sdm.tie_break_epsilon {
                builder = builder.tie_break_epsilon(v);
            }
            if let Some(v) = sdm.bond_scale {
                builder = builder.bond_scale(v);
            }
        }

        if let Some(completion) = self.completion.take() {
            if let Some(v) = completion.bond_tolerance {
                builder = builder.bond_tolerance(v);
            }
            if let Some(v) = completion.hydrogen_cutoff {
                builder = builder.hydrogen_cutoff(v);
            }
            if let Some(v) = completion.min_image_offset {
                builder = builder.min_image_offset(v);
            }
            if let Some(v) = completion.max_grown_fragments {
                builder = builder.max_grown_fragments(v);
            }
        }

        if let Some(v) = self.packing.take().and_then(|p| p.duplicate_tolerance) {
            builder = builder.duplicate_tolerance(v);
        }

        if let Some(molfile) = self.molfile.take() {
            if let Some(v) = molfile.extra_bond_length {
                builder = builder.extra_bond_length(v);
            }
            if let Some(v) = molfile.bond_screen_cutoff {
                builder = builder.bond_screen_cutoff(v);
            }
        }

        let policy = if args.strict_elements {
            core_config::UnknownElementPolicy::Abort
        } else {
            self.unknown_elements
                .map(Into::into)
                .unwrap_or_default()
        };
        builder = builder.unknown_elements(policy);

        builder.build().map_err(|e| CliError::Config(e.to_string()))
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value_str)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };

            match key {
                "unknown-elements" => {
                    self.unknown_elements = Some(match value_str {
                        "non-bonding" => PartialUnknownElementPolicy::NonBonding,
                        "abort" => PartialUnknownElementPolicy::Abort,
                        _ => {
                            return Err(CliError::Config(format!(
                                "Invalid value for {}: {} (expected 'non-bonding' or 'abort')",
                                key, value_str
                            )));
                        }
                    });
                }
                "sdm.search-cutoff" => {
                    self.sdm.get_or_insert_with(Default::default).search_cutoff =
                        Some(parse_value(key, value_str)?);
                }
                "sdm.noise-floor" => {
                    self.sdm.get_or_insert_with(Default::default).noise_floor =
                        Some(parse_value(key, value_str)?);
                }
                "sdm.tie-break-epsilon" => {
                    self.sdm.get_or_insert_with(Default::default).tie_break_epsilon =
                        Some(parse_value(key, value_str)?);
                }
                "sdm.bond-scale" => {
                    self.sdm.get_or_insert_with(Default::default).bond_scale =
                        Some(parse_value(key, value_str)?);
                }
                "completion.bond-tolerance" => {
                    self.completion
                        .get_or_insert_with(Default::default)
                        .bond_tolerance = Some(parse_value(key, value_str)?);
                }
                "completion.hydrogen-cutoff" => {
                    self.completion
                        .get_or_insert_with(Default::default)
                        .hydrogen_cutoff = Some(parse_value(key, value_str)?);
                }
                "completion.min-image-offset" => {
                    self.completion
                        .get_or_insert_with(Default::default)
                        .min_image_offset = Some(parse_value(key, value_str)?);
                }
                "completion.max-grown-fragments" => {
                    self.completion
                        .get_or_insert_with(Default::default)
                        .max_grown_fragments = Some(parse_value(key, value_str)?);
                }
                "packing.duplicate-tolerance" => {
                    self.packing
                        .get_or_insert_with(Default::default)
                        .duplicate_tolerance = Some(parse_value(key, value_str)?);
                }
                "molfile.extra-bond-length" => {
                    self.molfile
                        .get_or_insert_with(Default::default)
                        .extra_bond_length = Some(parse_value(key, value_str)?);
                }
                "molfile.bond-screen-cutoff" => {
                    self.molfile
                        .get_or_insert_with(Default::default)
                        .bond_screen_cutoff = Some(parse_value(key, value_str)?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid value for {}: {}", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use cellgrow::engine::config::{GrowConfig, UnknownElementPolicy};
    use clap::Parser;
    use std::fs;
    use tempfile::tempdir;

    fn grow_args(extra: &[&str]) -> GrowArgs {
        let mut argv = vec!["cellgrow", "grow", "-i", "in.toml", "-o", "out.mol"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Commands::Grow(args) => args,
            other => panic!("expected 'grow' subcommand, got {:?}", other),
        }
    }

    #[test]
    fn empty_configuration_yields_core_defaults() {
        let config = PartialGrowConfig::default()
            .merge_with_cli(&grow_args(&[]))
            .unwrap();
        assert_eq!(config, GrowConfig::default());
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("grow.toml");
        fs::write(
            &path,
            r#"
            unknown-elements = "abort"

            [sdm]
            search-cutoff = 5.5

            [completion]
            max-grown-fragments = 6

            [molfile]
            extra-bond-length = 0.4
            "#,
        )
        .unwrap();

        let config = PartialGrowConfig::from_file(&path)
            .unwrap()
            .merge_with_cli(&grow_args(&[]))
            .unwrap();
        assert_eq!(config.sdm.search_cutoff, 5.5);
        assert_eq!(config.sdm.noise_floor, 0.01);
        assert_eq!(config.completion.max_grown_fragments, Some(6));
        assert_eq!(config.bonds.extra_bond_length, 0.4);
        assert_eq!(config.unknown_elements, UnknownElementPolicy::Abort);
    }

    #[test]
    fn set_values_override_file_values() {
        let partial = PartialGrowConfig::from_toml("[packing]\nduplicate-tolerance = 0.5\n").unwrap();
        let config = partial
            .merge_with_cli(&grow_args(&[
                "-S",
                "packing.duplicate-tolerance=0.3",
                "-S",
                "completion.hydrogen-cutoff=2.0",
            ]))
            .unwrap();
        assert_eq!(config.packing.duplicate_tolerance, 0.3);
        assert_eq!(config.completion.hydrogen_cutoff, 2.0);
    }

    #[test]
    fn strict_elements_flag_wins_over_file() {
        let partial = PartialGrowConfig::from_toml("unknown-elements = \"non-bonding\"\n").unwrap();
        let config = partial
            .merge_with_cli(&grow_args(&["--strict-elements"]))
            .unwrap();
        assert_eq!(config.unknown_elements, UnknownElementPolicy::Abort);
    }

    #[test]
    fn unknown_file_fields_are_rejected() {
        assert!(PartialGrowConfig::from_toml("[sdm]\ncutoff = 3.0\n").is_err());
        assert!(PartialGrowConfig::from_toml("[symmetry]\n").is_err());
    }

    #[test]
    fn malformed_set_values_are_config_errors() {
        for bad in ["sdm.search-cutoff", "sdm.search-cutoff=abc", "sdm.unknown=1.0"] {
            let result = PartialGrowConfig::default().merge_with_cli(&grow_args(&["-S", bad]));
            assert!(matches!(result, Err(CliError::Config(_))), "{bad}");
        }
    }

    #[test]
    fn invalid_parameter_values_are_rejected_by_the_builder() {
        let result = PartialGrowConfig::default()
            .merge_with_cli(&grow_args(&["-S", "packing.duplicate-tolerance=-1"]));
        match result {
            Err(CliError::Config(msg)) => assert!(msg.contains("duplicate_tolerance")),
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = PartialGrowConfig::load(Some(Path::new("/nonexistent/grow.toml")));
        assert!(matches!(result, Err(CliError::Io(_))));
    }
}
