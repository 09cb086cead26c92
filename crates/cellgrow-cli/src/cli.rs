use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "cellgrow - Grow complete molecules from the asymmetric unit of a crystal structure.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Expand a structure by symmetry into complete molecules and write a molfile.
    Grow(GrowArgs),
    /// Print an overview of a structure: cell, symmetry, space group and fragments.
    Info(InfoArgs),
    /// Compute the SHELX checksum of a text file.
    Checksum(ChecksumArgs),
}

/// Arguments for the `grow` subcommand.
#[derive(Args, Debug)]
pub struct GrowArgs {
    /// Path to the input structure file (TOML).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path for the output molfile.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Path to an optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// CSV file (`element,radius`) overriding built-in covalent radii.
    #[arg(long, value_name = "PATH")]
    pub radii: Option<PathBuf>,

    /// Write the asymmetric unit only, without symmetry expansion.
    #[arg(long)]
    pub no_grow: bool,

    /// Also write the expanded atoms as a CSV table.
    #[arg(long, value_name = "PATH")]
    pub atoms_csv: Option<PathBuf>,

    /// Abort on elements without a covalent radius instead of treating them as non-bonding.
    #[arg(long)]
    pub strict_elements: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S packing.duplicate-tolerance=0.3
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `info` subcommand.
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Path to the input structure file (TOML).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// CSV file (`element,radius`) overriding built-in covalent radii.
    #[arg(long, value_name = "PATH")]
    pub radii: Option<PathBuf>,
}

/// Arguments for the `checksum` subcommand.
#[derive(Args, Debug)]
pub struct ChecksumArgs {
    /// Text file to digest.
    #[arg(required = true, value_name = "FILE")]
    pub file: PathBuf,

    /// Checksum recorded alongside the text; a mismatch is reported.
    #[arg(long, value_name = "NUM")]
    pub expected: Option<u32>,

    /// Digest the ASCII characters only instead of the Windows-1250 encoding.
    #[arg(long)]
    pub ascii: bool,
}
