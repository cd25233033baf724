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
    about = "cmfeat - Coulomb matrix and eigen-spectrum featurization of molecular geometries.",
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

    /// Set the number of threads for parallel featurization.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Featurize XYZ geometries into Coulomb matrices or eigen-spectra, written as CSV.
    Featurize(FeaturizeArgs),
    /// Print atom counts and Coulomb matrix diagonals of XYZ geometries.
    Inspect(InspectArgs),
}

/// Arguments for the `featurize` subcommand.
#[derive(Args, Debug)]
pub struct FeaturizeArgs {
    // --- Core Arguments ---
    /// Input XYZ files; every frame of a file is one conformer of the same molecule.
    #[arg(short, long, required = true, num_args(1..), value_name = "PATH")]
    pub input: Vec<PathBuf>,

    /// Path for the output CSV file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Featurizer Overrides ---
    /// Featurizer to run: 'matrix' or 'eigen'.
    #[arg(short, long, value_name = "KIND")]
    pub kind: Option<String>,

    /// Size the output is padded to; molecules with more atoms fail.
    #[arg(short = 'n', long, value_name = "INT")]
    pub max_atoms: Option<usize>,

    #[command(flatten)]
    pub hydrogens: HydrogenHandling,

    /// Emit only the upper triangle (diagonal included), flattened row-major.
    #[arg(long, overrides_with = "no_upper_triangular")]
    pub upper_triangular: bool,
    /// Emit the full matrix, overriding the config file.
    #[arg(long, overrides_with = "upper_triangular")]
    pub no_upper_triangular: bool,

    /// Unit of the input coordinates: 'angstrom' or 'bohr'.
    #[arg(short, long, value_name = "UNIT")]
    pub unit: Option<String>,

    // --- Randomization Overrides ---
    /// Emit randomly permuted variants of each matrix.
    #[arg(short, long)]
    pub randomize: bool,

    /// Number of randomized variants per conformer.
    #[arg(long, value_name = "INT")]
    pub num_samples: Option<usize>,

    /// Permutation strategy: 'uniform', 'row-norm' or 'row-norm@SIGMA'.
    #[arg(long, value_name = "STRATEGY")]
    pub strategy: Option<String>,

    /// Seed for reproducible randomized output.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    /// Also emit the input-order matrix ahead of the randomized variants.
    #[arg(long, overrides_with = "no_include_unpermuted")]
    pub include_unpermuted: bool,
    /// Emit only the randomized variants, overriding the config file.
    #[arg(long, overrides_with = "include_unpermuted")]
    pub no_include_unpermuted: bool,

    // --- Error Handling ---
    /// Skip molecules that cannot be featurized instead of aborting.
    #[arg(long, overrides_with = "no_skip_failed")]
    pub skip_failed: bool,
    /// Abort on the first molecule that fails, overriding the config file.
    #[arg(long, overrides_with = "skip_failed")]
    pub no_skip_failed: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S randomization.num-samples=5
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Mutually exclusive flags for hydrogen handling.
#[derive(Args, Debug, Clone, Copy, Default)]
#[group(required = false, multiple = false)]
pub struct HydrogenHandling {
    /// Drop hydrogens before building the matrix.
    #[arg(long)]
    pub remove_hydrogens: bool,
    /// Keep hydrogens, overriding the config file.
    #[arg(long)]
    pub keep_hydrogens: bool,
}

/// Arguments for the `inspect` subcommand.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Input XYZ files.
    #[arg(short, long, required = true, num_args(1..), value_name = "PATH")]
    pub input: Vec<PathBuf>,

    /// Unit of the input coordinates: 'angstrom' or 'bohr'.
    #[arg(short, long, value_name = "UNIT")]
    pub unit: Option<String>,

    /// Flag molecules whose atom count exceeds this capacity.
    #[arg(short = 'n', long, value_name = "INT")]
    pub max_atoms: Option<usize>,
}
