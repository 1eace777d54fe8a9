// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// CLI arguments parser.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(after_help = r#"Examples:
    pose-relabel reshape -i flat.json -o split.json --individuals resident,intruder --strip-prefix
    pose-relabel reshape -i flat.json -o split.json --individuals a,b --keypoints nose,left_ear,right_ear
    pose-relabel clean -i split.json -o clean.json --conf 0.9 --max-gap 25 --window 7 --min-periods 2
    pose-relabel info -i clean.json
    pose-relabel trajectory -i clean.json --individual resident --keypoint nose --start 0 --end 60"#)]
pub struct Cli {
    #[command(subcommand)]
    /// Subcommand to execute.
    pub command: Commands,

    /// Show verbose output
    #[arg(long, global = true, default_value_t = true, action = clap::ArgAction::Set)]
    pub verbose: bool,
}

/// Commands for the CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Split a flat keypoint axis into individuals x keypoints
    Reshape(ReshapeArgs),
    /// Confidence filter, interpolate and median-smooth a dataset
    Clean(CleanArgs),
    /// Print dimensions, names, metadata and data quality of a dataset
    Info(InfoArgs),
    /// Export the trajectory of one keypoint as JSON
    Trajectory(TrajectoryArgs),
}

/// Arguments for the reshape command.
#[derive(Args, Debug)]
pub struct ReshapeArgs {
    /// Input dataset (JSON)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output dataset (JSON)
    #[arg(short, long)]
    pub output: PathBuf,

    /// Individual names, in the order their keypoint blocks appear
    #[arg(long, value_delimiter = ',', required = true)]
    pub individuals: Vec<String>,

    /// Keypoint names of each individual
    #[arg(long, value_delimiter = ',', required_unless_present = "strip_prefix")]
    pub keypoints: Vec<String>,

    /// Derive keypoint names by stripping the `<individual>_` prefix of the flat names
    #[arg(long, default_value_t = false, conflicts_with = "keypoints")]
    pub strip_prefix: bool,
}

/// Arguments for the clean command.
#[derive(Args, Debug)]
pub struct CleanArgs {
    /// Input dataset (JSON)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output dataset (JSON)
    #[arg(short, long)]
    pub output: PathBuf,

    /// Confidence threshold
    #[arg(long, default_value_t = 0.9)]
    pub conf: f64,

    /// Longest run of missing frames to interpolate
    #[arg(long, default_value_t = 25)]
    pub max_gap: usize,

    /// Interpolate gaps of any length (overrides --max-gap)
    #[arg(long, default_value_t = false)]
    pub fill_all_gaps: bool,

    /// Rolling median window, in frames
    #[arg(long, default_value_t = 7)]
    pub window: usize,

    /// Minimum valid frames in a window
    #[arg(long, default_value_t = 2)]
    pub min_periods: usize,
}

/// Arguments for the info command.
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Input dataset (JSON)
    #[arg(short, long)]
    pub input: PathBuf,
}

/// Arguments for the trajectory command.
#[derive(Args, Debug)]
pub struct TrajectoryArgs {
    /// Input dataset (JSON)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Individual to export
    #[arg(long)]
    pub individual: String,

    /// Keypoint to export
    #[arg(long)]
    pub keypoint: String,

    /// Start of the time interval (inclusive)
    #[arg(long, requires = "end")]
    pub start: Option<f64>,

    /// End of the time interval (inclusive)
    #[arg(long, requires = "start")]
    pub end: Option<f64>,

    /// Output file; prints to stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
