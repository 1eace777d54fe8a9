// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Selection and summary statistics for plotting.
//!
//! Nothing here draws; these are the numbers behind trajectory scatter plots,
//! percentile-annotated histograms and polar orientation histograms.

use std::f64::consts::{PI, TAU};

use ndarray::{Array1, s};

use crate::dataset::PoseDataset;
use crate::error::{PoseError, Result};

/// Default percentiles marked on histograms.
pub const DEFAULT_PERCENTILES: [f64; 3] = [25.0, 50.0, 75.0];

/// Default width of polar histogram bins, in degrees.
pub const DEFAULT_BIN_WIDTH_DEG: f64 = 15.0;

/// Largest number of polar histogram bins (a 0.001 degree width).
pub const MAX_POLAR_BINS: usize = 360_000;

/// Path of one keypoint of one individual through time.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    /// Individual the trajectory belongs to.
    pub individual: String,
    /// Tracked keypoint.
    pub keypoint: String,
    /// Time coordinate of every sample.
    pub time: Array1<f64>,
    /// X coordinates, in pixels.
    pub x: Array1<f64>,
    /// Y coordinates, in pixels.
    pub y: Array1<f64>,
}

impl Trajectory {
    /// Extract a trajectory, optionally restricted to `[start, end]`.
    ///
    /// # Arguments
    ///
    /// * `ds` - Source dataset.
    /// * `individual` - Name along the individuals axis.
    /// * `keypoint` - Name along the keypoints axis.
    /// * `time_interval` - Inclusive `(start, end)` in time-coordinate units.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::UnknownLabel`] for missing names and
    /// [`PoseError::ConfigError`] for an invalid interval.
    pub fn extract(
        ds: &PoseDataset,
        individual: &str,
        keypoint: &str,
        time_interval: Option<(f64, f64)>,
    ) -> Result<Self> {
        let frames = match time_interval {
            Some((start, end)) => ds.time_range(start, end)?,
            None => 0..ds.n_frames(),
        };

        let xy = ds.select(individual, keypoint)?;
        Ok(Self {
            individual: individual.to_string(),
            keypoint: keypoint.to_string(),
            time: ds.time_coords().slice(s![frames.clone()]).to_owned(),
            x: xy.slice(s![frames.clone(), 0]).to_owned(),
            y: xy.slice(s![frames, 1]).to_owned(),
        })
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Check if the trajectory has no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

/// Percentiles of `values`, ignoring NaNs.
///
/// Uses linear interpolation between the two nearest order statistics. If no
/// value is finite every percentile is NaN.
///
/// # Errors
///
/// Returns [`PoseError::ConfigError`] if a percentile lies outside `[0, 100]`.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn nan_percentiles(values: &[f64], percentiles: &[f64]) -> Result<Vec<f64>> {
    if let Some(&p) = percentiles.iter().find(|p| !(0.0..=100.0).contains(*p)) {
        return Err(PoseError::ConfigError(format!(
            "percentile {p} is outside [0, 100]"
        )));
    }

    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if sorted.is_empty() {
        return Ok(vec![f64::NAN; percentiles.len()]);
    }
    sorted.sort_by(f64::total_cmp);

    let last = (sorted.len() - 1) as f64;
    Ok(percentiles
        .iter()
        .map(|p| {
            let rank = p / 100.0 * last;
            let lo = rank.floor() as usize;
            let hi = rank.ceil() as usize;
            if hi == lo {
                sorted[lo]
            } else {
                sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
            }
        })
        .collect())
}

/// Density histogram of angles over `[-pi, pi]`.
///
/// An angle of 0 means the subject is straight ahead of the reference
/// heading, positive angles are to its left and +-pi directly behind.
#[derive(Debug, Clone, PartialEq)]
pub struct PolarHistogram {
    /// Bin edges in radians, `n_bins + 1` values from `-pi` to `pi`.
    pub edges: Vec<f64>,
    /// Raw count per bin.
    pub counts: Vec<usize>,
    /// Probability density per bin; integrates to 1 over the circle.
    pub density: Vec<f64>,
}

impl PolarHistogram {
    /// Bin `angles` (radians) into bins of `bin_width_deg` degrees.
    ///
    /// NaNs and angles outside `[-pi, pi]` are skipped. The last bin is
    /// closed on the right so `pi` itself is counted.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::ConfigError`] if the bin width is not in `(0, 360]`
    /// or would produce more than [`MAX_POLAR_BINS`] bins.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn from_angles(angles: &[f64], bin_width_deg: f64) -> Result<Self> {
        if !(bin_width_deg > 0.0 && bin_width_deg <= 360.0) {
            return Err(PoseError::ConfigError(format!(
                "bin width must be in (0, 360] degrees, got {bin_width_deg}"
            )));
        }
        let n_bins = 360.0 / bin_width_deg;
        if n_bins > MAX_POLAR_BINS as f64 {
            return Err(PoseError::ConfigError(format!(
                "bin width {bin_width_deg} gives more than {MAX_POLAR_BINS} bins"
            )));
        }
        let n_bins = n_bins as usize;
        let width = TAU / n_bins as f64;
        let edges: Vec<f64> = (0..=n_bins).map(|i| (i as f64).mul_add(width, -PI)).collect();

        let mut counts = vec![0usize; n_bins];
        for &angle in angles {
            if !(-PI..=PI).contains(&angle) {
                continue;
            }
            let idx = (((angle + PI) / width) as usize).min(n_bins - 1);
            counts[idx] += 1;
        }

        let total: usize = counts.iter().sum();
        let density = counts
            .iter()
            .map(|&c| {
                if total == 0 {
                    0.0
                } else {
                    c as f64 / (total as f64 * width)
                }
            })
            .collect();

        Ok(Self {
            edges,
            counts,
            density,
        })
    }

    /// Number of bins.
    #[must_use]
    pub fn n_bins(&self) -> usize {
        self.counts.len()
    }

    /// Angular offset placing 0 at the top of a polar plot.
    #[must_use]
    pub const fn theta_offset() -> f64 {
        std::f64::consts::FRAC_PI_2
    }

    /// Tick positions in radians, every 45 degrees starting at 0.
    #[must_use]
    pub fn tick_positions() -> Vec<f64> {
        (0..8_u8).map(|i| f64::from(i) * PI / 4.0).collect()
    }

    /// Tick labels matching [`Self::tick_positions`], in signed degrees.
    #[must_use]
    pub fn tick_labels() -> Vec<String> {
        [0, 45, 90, 135, 180, -135, -90, -45]
            .iter()
            .map(|deg| format!("{deg}\u{b0}"))
            .collect()
    }
}
