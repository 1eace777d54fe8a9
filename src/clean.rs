// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Cleaning pipeline for pose datasets.
//!
//! Three steps are applied in a fixed order on a copy of the input:
//!
//! 1. [`filter_by_confidence`] drops low-confidence points (sets them to NaN).
//! 2. [`interpolate_over_time`] fills short gaps by linear interpolation.
//! 3. [`median_filter`] smooths each series with a centred rolling median.
//!
//! [`CleaningConfig`] holds the parameters of all three steps.

use ndarray::{ArrayViewMut1, Axis, Zip};

use crate::dataset::PoseDataset;
use crate::error::{PoseError, Result};
use crate::verbose;

/// Parameters of the cleaning pipeline.
///
/// # Example
///
/// ```rust
/// use pose_relabel::CleaningConfig;
///
/// let config = CleaningConfig::new()
///     .with_confidence(0.8)
///     .with_max_gap(Some(10))
///     .with_window(5)
///     .with_min_periods(Some(3));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CleaningConfig {
    /// Points with confidence below this value are set to NaN.
    pub confidence_threshold: f64,
    /// Longest run of consecutive NaN frames that interpolation fills.
    /// `None` fills gaps of any length.
    pub max_gap: Option<usize>,
    /// Rolling median window, in frames.
    pub window: usize,
    /// Minimum number of valid samples in a window to produce a value.
    /// `None` requires a full window.
    pub min_periods: Option<usize>,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.9,
            max_gap: Some(25),
            window: 7,
            min_periods: Some(2),
        }
    }
}

impl CleaningConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the confidence threshold.
    #[must_use]
    pub const fn with_confidence(mut self, threshold: f64) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    /// Set the maximum interpolated gap, in frames.
    #[must_use]
    pub const fn with_max_gap(mut self, max_gap: Option<usize>) -> Self {
        self.max_gap = max_gap;
        self
    }

    /// Set the rolling median window, in frames.
    #[must_use]
    pub const fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    /// Set the minimum number of valid samples per window.
    #[must_use]
    pub const fn with_min_periods(mut self, min_periods: Option<usize>) -> Self {
        self.min_periods = min_periods;
        self
    }

    /// Check the parameters for consistency.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::ConfigError`] if the threshold is NaN, the window
    /// is zero, or `min_periods` exceeds the window.
    pub fn validate(&self) -> Result<()> {
        if self.confidence_threshold.is_nan() {
            return Err(PoseError::ConfigError(
                "confidence threshold must be a number".to_string(),
            ));
        }
        check_window(self.window, self.min_periods)
    }
}

/// Run the full cleaning pipeline on a copy of `ds`.
///
/// # Errors
///
/// Returns [`PoseError::ConfigError`] if `config` is invalid.
pub fn clean(ds: &PoseDataset, config: &CleaningConfig) -> Result<PoseDataset> {
    config.validate()?;

    let filtered = filter_by_confidence(ds, config.confidence_threshold);
    verbose!(
        "Confidence filter ({}): {:.1}% of positions missing",
        config.confidence_threshold,
        nan_fraction(&filtered) * 100.0
    );

    let interpolated = interpolate_over_time(&filtered, config.max_gap);
    verbose!(
        "Interpolation (max gap {}): {:.1}% of positions missing",
        config
            .max_gap
            .map_or_else(|| "none".to_string(), |g| g.to_string()),
        nan_fraction(&interpolated) * 100.0
    );

    let smoothed = median_filter(&interpolated, config.window, config.min_periods)?;
    verbose!(
        "Median filter (window {}): {:.1}% of positions missing",
        config.window,
        nan_fraction(&smoothed) * 100.0
    );

    Ok(smoothed)
}

/// Set positions to NaN wherever confidence is below `threshold` or NaN.
///
/// The confidence array itself is left unchanged.
#[must_use]
pub fn filter_by_confidence(ds: &PoseDataset, threshold: f64) -> PoseDataset {
    let mut out = ds.clone();
    Zip::from(out.position_mut().lanes_mut(Axis(3)))
        .and(ds.confidence())
        .for_each(|mut point, &conf| {
            if conf.is_nan() || conf < threshold {
                point.fill(f64::NAN);
            }
        });
    out
}

/// Fill NaN gaps of every position series by linear interpolation over time.
///
/// Only gaps enclosed by valid samples are filled. A gap is filled when it
/// spans at most `max_gap` frames; `None` fills every interior gap. Leading
/// and trailing NaNs are kept.
#[must_use]
pub fn interpolate_over_time(ds: &PoseDataset, max_gap: Option<usize>) -> PoseDataset {
    let mut out = ds.clone();
    for series in out.position_mut().lanes_mut(Axis(0)) {
        interpolate_series(series, max_gap);
    }
    out
}

/// Smooth every position series with a centred rolling median.
///
/// NaNs inside a window are ignored. A frame whose window holds fewer than
/// `min_periods` valid samples (a full `window` when `None`) becomes NaN.
///
/// # Errors
///
/// Returns [`PoseError::ConfigError`] if `window` is zero or `min_periods`
/// exceeds it.
pub fn median_filter(
    ds: &PoseDataset,
    window: usize,
    min_periods: Option<usize>,
) -> Result<PoseDataset> {
    check_window(window, min_periods)?;
    let min_periods = min_periods.unwrap_or(window);

    let mut out = ds.clone();
    for series in out.position_mut().lanes_mut(Axis(0)) {
        rolling_median(series, window, min_periods);
    }
    Ok(out)
}

/// Fraction of position values that are NaN.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn nan_fraction(ds: &PoseDataset) -> f64 {
    let total = ds.position().len();
    if total == 0 {
        return 0.0;
    }
    let missing = ds.position().iter().filter(|v| v.is_nan()).count();
    missing as f64 / total as f64
}

fn check_window(window: usize, min_periods: Option<usize>) -> Result<()> {
    if window == 0 {
        return Err(PoseError::ConfigError(
            "median filter window must be at least 1 frame".to_string(),
        ));
    }
    if let Some(min_periods) = min_periods {
        if min_periods > window {
            return Err(PoseError::ConfigError(format!(
                "min_periods ({min_periods}) must not exceed the window ({window})"
            )));
        }
    }
    Ok(())
}

#[allow(clippy::cast_precision_loss)]
fn interpolate_series(mut series: ArrayViewMut1<'_, f64>, max_gap: Option<usize>) {
    let mut last_valid: Option<usize> = None;
    for t in 0..series.len() {
        if series[t].is_nan() {
            continue;
        }
        if let Some(prev) = last_valid {
            let gap = t - prev - 1;
            if gap > 0 && max_gap.is_none_or(|max| gap <= max) {
                let (a, b) = (series[prev], series[t]);
                let span = (t - prev) as f64;
                for j in prev + 1..t {
                    series[j] = a + (b - a) * (j - prev) as f64 / span;
                }
            }
        }
        last_valid = Some(t);
    }
}

fn rolling_median(mut series: ArrayViewMut1<'_, f64>, window: usize, min_periods: usize) {
    let source = series.to_vec();
    let n = source.len();
    // Even windows lean forward by one frame.
    let after = window / 2;
    let before = window - 1 - after;

    let mut buf = Vec::with_capacity(window);
    for t in 0..n {
        buf.clear();
        let lo = t.saturating_sub(before);
        let hi = (t + after).min(n.saturating_sub(1));
        buf.extend(source[lo..=hi].iter().copied().filter(|v| !v.is_nan()));

        series[t] = if buf.is_empty() || buf.len() < min_periods {
            f64::NAN
        } else {
            median(&mut buf)
        };
    }
}

fn median(values: &mut [f64]) -> f64 {
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}
