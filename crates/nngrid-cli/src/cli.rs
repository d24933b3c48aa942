use clap::Parser;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    name = "nngrid",
    version,
    about = "nngrid - Multi-channel atom density grids for scoring protein-ligand poses.",
    help_template = HELP_TEMPLATE,
)]
pub struct Cli {
    #[command(flatten)]
    pub grid: GridArgs,

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

#[derive(clap::Args, Debug, Default)]
pub struct GridArgs {
    // --- Inputs ---
    /// Receptor structure in BGF format; its first structure is gridded once.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub receptor: PathBuf,

    /// Ligand poses in BGF format, one structure per END-terminated block.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub ligand: PathBuf,

    /// Prefix for every output file.
    #[arg(short, long, required = true, value_name = "BASE")]
    pub output: String,

    /// Optional run configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Grid Overrides ---
    /// Grid center in Angstroms. Defaults to the ligand's first pose centroid.
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true)]
    pub center: Option<Vec<f64>>,

    /// Side length of the cubic grid in Angstroms.
    #[arg(short, long, value_name = "FLOAT")]
    pub dimension: Option<f64>,

    /// Spacing between grid points in Angstroms.
    #[arg(long, value_name = "FLOAT")]
    pub resolution: Option<f64>,

    /// Use hard-sphere occupancy instead of the smoothed density.
    #[arg(long)]
    pub binary: bool,

    // --- Types and Channels ---
    /// Atom type table in TOML format, replacing the built-in XS types.
    #[arg(long, value_name = "PATH")]
    pub types: Option<PathBuf>,

    /// Channel map for receptor atoms (one channel per line).
    #[arg(long, value_name = "PATH")]
    pub receptor_map: Option<PathBuf>,

    /// Channel map for ligand atoms (one channel per line).
    #[arg(long, value_name = "PATH")]
    pub ligand_map: Option<PathBuf>,

    // --- Outputs ---
    /// Also write one AutoDock map file per channel for every pose.
    #[arg(long)]
    pub map: bool,

    /// Skip the packed binary output.
    #[arg(long)]
    pub no_binmap: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S grid.resolution=0.375
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}
