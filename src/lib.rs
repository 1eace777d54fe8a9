// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

#![allow(clippy::multiple_crate_versions)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! # Pose Relabel
//!
//! Reshape, relabel and clean animal-pose tracking datasets.
//!
//! Trackers trained on a single animal are often run on footage with several
//! animals by listing every animal's bodyparts as separate keypoints
//! (`resident_nose`, ..., `intruder_nose`, ...). The resulting dataset has one
//! "individual" whose keypoint axis really holds `N x K` entries. This crate
//! splits that axis back into `N` individuals with `K` keypoints each, and
//! provides the cleaning and selection steps that usually follow.
//!
//! ## Quick Start (Library)
//!
//! ```no_run
//! use pose_relabel::{CleaningConfig, clean, load_dataset, reshape_individuals, save_dataset};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let flat = load_dataset("session_flat.json")?;
//!
//!     // First 10 flat keypoints belong to the resident, the next 10 to the intruder
//!     let keypoints = ["nose", "left_ear", "right_ear", "neck", "left_hip",
//!                      "right_hip", "tail_base", "tail_mid", "tail_end", "body_center"];
//!     let split = reshape_individuals(&flat, &["resident", "intruder"], &keypoints)?;
//!
//!     let cleaned = clean(&split, &CleaningConfig::default())?;
//!     save_dataset(&cleaned, "session.json")?;
//!     Ok(())
//! }
//! ```
//!
//! ## CLI Usage
//!
//! ```bash
//! # Split the flat axis, deriving keypoint names from the `<individual>_` prefixes
//! pose-relabel reshape -i flat.json -o split.json --individuals resident,intruder --strip-prefix
//!
//! # Confidence filter, interpolate and smooth with the default parameters
//! pose-relabel clean -i split.json -o clean.json
//!
//! # Summary and a single keypoint trajectory
//! pose-relabel info -i clean.json
//! pose-relabel trajectory -i clean.json --individual resident --keypoint nose --start 0 --end 60
//! ```
//!
//! **Clean Options:**
//!
//! | Option | Description | Default |
//! |--------|-------------|---------|
//! | `--conf` | Confidence threshold | `0.9` |
//! | `--max-gap` | Longest interpolated gap, in frames | `25` |
//! | `--window` | Rolling median window, in frames | `7` |
//! | `--min-periods` | Minimum valid frames per window | `2` |
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`dataset`] | [`PoseDataset`] container and its validating constructor |
//! | [`reshape`] | Multi-individual reshape and relabel |
//! | [`clean`] | [`CleaningConfig`] and the filter / interpolate / smooth steps |
//! | [`analysis`] | [`Trajectory`], percentiles and [`PolarHistogram`] |
//! | [`io`] | JSON load and save |
//! | [`error`] | Error types ([`PoseError`], [`Result`]) |
//! | [`cli`] | Command-line interface |

// Modules
pub mod analysis;
pub mod clean;
pub mod cli;
pub mod dataset;
pub mod error;
pub mod io;
pub mod reshape;

// Re-export main types for convenience
pub use analysis::{PolarHistogram, Trajectory, nan_percentiles};
pub use clean::{CleaningConfig, clean, filter_by_confidence, interpolate_over_time, median_filter};
pub use dataset::{DatasetAttrs, PoseDataset};
pub use error::{PoseError, Result};
pub use io::{load_dataset, save_dataset};
pub use reshape::{SOURCE_SOFTWARE, keypoint_names_from_prefixed, reshape_individuals};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
