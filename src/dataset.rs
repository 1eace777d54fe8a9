// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Pose dataset container.
//!
//! A [`PoseDataset`] holds two aligned arrays indexed by
//! `(time, individuals, keypoints, space)`:
//!
//! - `position` with shape `(T, I, K, S)`, the keypoint coordinates.
//! - `confidence` with shape `(T, I, K)`, the per-point tracker score.
//!
//! Individual and keypoint names label the second and third axes, and
//! [`DatasetAttrs`] carries the frame rate and provenance metadata.

use std::collections::HashSet;
use std::ops::Range;

use ndarray::{Array, Array1, Array2, Array3, Array4, Dimension, IxDyn, s};
use serde::{Deserialize, Serialize};

use crate::error::{PoseError, Result};

/// Labels of the space axis for 2-D data.
pub const SPACE_2D: [&str; 2] = ["x", "y"];
/// Labels of the space axis for 3-D data.
pub const SPACE_3D: [&str; 3] = ["x", "y", "z"];

/// Dataset-level metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetAttrs {
    /// Frames per second of the recording, if known.
    pub fps: Option<f64>,
    /// File the data was loaded from.
    pub source_file: Option<String>,
    /// Software that produced the data (e.g. `DeepLabCut`).
    pub source_software: Option<String>,
}

impl DatasetAttrs {
    /// Create empty attributes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the frame rate.
    #[must_use]
    pub const fn with_fps(mut self, fps: f64) -> Self {
        self.fps = Some(fps);
        self
    }

    /// Set the source file.
    #[must_use]
    pub fn with_source_file(mut self, source_file: impl Into<String>) -> Self {
        self.source_file = Some(source_file.into());
        self
    }

    /// Set the source software tag.
    #[must_use]
    pub fn with_source_software(mut self, source_software: impl Into<String>) -> Self {
        self.source_software = Some(source_software.into());
        self
    }
}

/// Flattened array with its shape; NaN is stored as `None` so that it
/// survives formats without a NaN literal.
#[derive(Serialize, Deserialize)]
struct ArrayRecord {
    shape: Vec<usize>,
    data: Vec<Option<f64>>,
}

impl ArrayRecord {
    fn from_array<D: Dimension>(array: &Array<f64, D>) -> Self {
        Self {
            shape: array.shape().to_vec(),
            data: array.iter().map(|&v| (!v.is_nan()).then_some(v)).collect(),
        }
    }

    fn into_array<D: Dimension>(self) -> Result<Array<f64, D>> {
        let data: Vec<f64> = self.data.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect();
        Ok(Array::from_shape_vec(IxDyn(&self.shape), data)?.into_dimensionality::<D>()?)
    }
}

/// Serialized form of a dataset, validated on the way in.
#[derive(Serialize, Deserialize)]
struct DatasetRecord {
    position: ArrayRecord,
    confidence: ArrayRecord,
    individuals: Vec<String>,
    keypoints: Vec<String>,
    #[serde(default)]
    attrs: DatasetAttrs,
}

impl From<PoseDataset> for DatasetRecord {
    fn from(ds: PoseDataset) -> Self {
        Self {
            position: ArrayRecord::from_array(&ds.position),
            confidence: ArrayRecord::from_array(&ds.confidence),
            individuals: ds.individuals,
            keypoints: ds.keypoints,
            attrs: ds.attrs,
        }
    }
}

impl TryFrom<DatasetRecord> for PoseDataset {
    type Error = PoseError;

    fn try_from(record: DatasetRecord) -> Result<Self> {
        Self::from_arrays(
            record.position.into_array()?,
            record.confidence.into_array()?,
            record.individuals,
            record.keypoints,
            record.attrs,
        )
    }
}

/// Time-indexed keypoint coordinates and confidence scores for one or more
/// tracked individuals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "DatasetRecord", try_from = "DatasetRecord")]
pub struct PoseDataset {
    position: Array4<f64>,
    confidence: Array3<f64>,
    individuals: Vec<String>,
    keypoints: Vec<String>,
    space: Vec<String>,
    /// Dataset-level metadata.
    pub attrs: DatasetAttrs,
}

impl PoseDataset {
    /// Build a dataset from raw arrays, names and metadata.
    ///
    /// # Arguments
    ///
    /// * `position` - Coordinates with shape `(time, individuals, keypoints, space)`.
    /// * `confidence` - Scores with shape `(time, individuals, keypoints)`.
    /// * `individuals` - One name per entry of the individuals axis.
    /// * `keypoints` - One name per entry of the keypoints axis.
    /// * `attrs` - Frame rate and provenance metadata.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::InvalidDataset`] if the arrays are not aligned, the
    /// label counts do not match the axes, the space axis is not 2 or 3 wide,
    /// or `fps` is not a positive finite number. Returns
    /// [`PoseError::InvalidNames`] for empty or duplicated names.
    pub fn from_arrays(
        position: Array4<f64>,
        confidence: Array3<f64>,
        individuals: Vec<String>,
        keypoints: Vec<String>,
        attrs: DatasetAttrs,
    ) -> Result<Self> {
        let shape = position.shape();
        if &shape[..3] != confidence.shape() {
            return Err(PoseError::InvalidDataset(format!(
                "position shape {:?} does not align with confidence shape {:?}",
                shape,
                confidence.shape()
            )));
        }
        if individuals.len() != shape[1] {
            return Err(PoseError::InvalidDataset(format!(
                "{} individual names for an individuals axis of length {}",
                individuals.len(),
                shape[1]
            )));
        }
        if keypoints.len() != shape[2] {
            return Err(PoseError::InvalidDataset(format!(
                "{} keypoint names for a keypoints axis of length {}",
                keypoints.len(),
                shape[2]
            )));
        }
        validate_names("individuals", &individuals)?;
        validate_names("keypoints", &keypoints)?;

        let space: Vec<String> = match shape[3] {
            2 => SPACE_2D.iter().map(|&s| s.to_string()).collect(),
            3 => SPACE_3D.iter().map(|&s| s.to_string()).collect(),
            n => {
                return Err(PoseError::InvalidDataset(format!(
                    "space axis must have 2 or 3 entries, got {n}"
                )));
            }
        };

        if let Some(fps) = attrs.fps {
            if !fps.is_finite() || fps <= 0.0 {
                return Err(PoseError::InvalidDataset(format!(
                    "fps must be a positive number, got {fps}"
                )));
            }
        }

        Ok(Self {
            position,
            confidence,
            individuals,
            keypoints,
            space,
            attrs,
        })
    }

    /// Keypoint coordinates, shape `(time, individuals, keypoints, space)`.
    #[must_use]
    pub const fn position(&self) -> &Array4<f64> {
        &self.position
    }

    /// Mutable access to the coordinates. Values may change, the shape may not.
    pub(crate) fn position_mut(&mut self) -> &mut Array4<f64> {
        &mut self.position
    }

    /// Confidence scores, shape `(time, individuals, keypoints)`.
    #[must_use]
    pub const fn confidence(&self) -> &Array3<f64> {
        &self.confidence
    }

    /// Names along the individuals axis.
    #[must_use]
    pub fn individuals(&self) -> &[String] {
        &self.individuals
    }

    /// Names along the keypoints axis.
    #[must_use]
    pub fn keypoints(&self) -> &[String] {
        &self.keypoints
    }

    /// Labels along the space axis (`x`, `y` and optionally `z`).
    #[must_use]
    pub fn space(&self) -> &[String] {
        &self.space
    }

    /// Number of frames.
    #[must_use]
    pub fn n_frames(&self) -> usize {
        self.position.shape()[0]
    }

    /// Number of individuals.
    #[must_use]
    pub fn n_individuals(&self) -> usize {
        self.position.shape()[1]
    }

    /// Number of keypoints per individual.
    #[must_use]
    pub fn n_keypoints(&self) -> usize {
        self.position.shape()[2]
    }

    /// Number of spatial dimensions.
    #[must_use]
    pub fn n_space(&self) -> usize {
        self.position.shape()[3]
    }

    /// Time coordinate of every frame: seconds when `fps` is known, frame
    /// indices otherwise.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn time_coords(&self) -> Array1<f64> {
        let fps = self.attrs.fps.unwrap_or(1.0);
        Array1::from_iter((0..self.n_frames()).map(|t| t as f64 / fps))
    }

    /// Position of `name` along the individuals axis.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::UnknownLabel`] if there is no such individual.
    pub fn individual_index(&self, name: &str) -> Result<usize> {
        lookup("individuals", &self.individuals, name)
    }

    /// Position of `name` along the keypoints axis.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::UnknownLabel`] if there is no such keypoint.
    pub fn keypoint_index(&self, name: &str) -> Result<usize> {
        lookup("keypoints", &self.keypoints, name)
    }

    /// Coordinates of one keypoint of one individual, shape `(time, space)`.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::UnknownLabel`] if either name is missing.
    pub fn select(&self, individual: &str, keypoint: &str) -> Result<Array2<f64>> {
        let i = self.individual_index(individual)?;
        let k = self.keypoint_index(keypoint)?;
        Ok(self.position.slice(s![.., i, k, ..]).to_owned())
    }

    /// Confidence series of one keypoint of one individual.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::UnknownLabel`] if either name is missing.
    pub fn select_confidence(&self, individual: &str, keypoint: &str) -> Result<Array1<f64>> {
        let i = self.individual_index(individual)?;
        let k = self.keypoint_index(keypoint)?;
        Ok(self.confidence.slice(s![.., i, k]).to_owned())
    }

    /// Index range of the frames whose time coordinate lies within `[start, end]`.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::ConfigError`] if `start > end` or either bound is NaN.
    pub fn time_range(&self, start: f64, end: f64) -> Result<Range<usize>> {
        if start.is_nan() || end.is_nan() || start > end {
            return Err(PoseError::ConfigError(format!(
                "invalid time interval [{start}, {end}]"
            )));
        }
        let time = self.time_coords();
        let lo = time.iter().position(|&t| t >= start).unwrap_or(time.len());
        let hi = time.iter().rposition(|&t| t <= end).map_or(lo, |i| (i + 1).max(lo));
        Ok(lo..hi)
    }

    /// Frames whose time coordinate lies within `[start, end]`.
    ///
    /// The result is a standalone dataset, so its time coordinates restart at
    /// zero. Use [`Self::time_range`] to keep track of the source frames.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::ConfigError`] if `start > end` or either bound is NaN.
    pub fn time_slice(&self, start: f64, end: f64) -> Result<Self> {
        let frames = self.time_range(start, end)?;
        Ok(Self {
            position: self.position.slice(s![frames.clone(), .., .., ..]).to_owned(),
            confidence: self.confidence.slice(s![frames, .., ..]).to_owned(),
            individuals: self.individuals.clone(),
            keypoints: self.keypoints.clone(),
            space: self.space.clone(),
            attrs: self.attrs.clone(),
        })
    }
}

/// Reject empty name lists, empty names and duplicates.
pub(crate) fn validate_names(dim: &str, names: &[String]) -> Result<()> {
    if names.is_empty() {
        return Err(PoseError::InvalidNames(format!("{dim} must not be empty")));
    }
    let mut seen = HashSet::with_capacity(names.len());
    for name in names {
        if name.is_empty() {
            return Err(PoseError::InvalidNames(format!("{dim} contains an empty name")));
        }
        if !seen.insert(name.as_str()) {
            return Err(PoseError::InvalidNames(format!(
                "{dim} contains '{name}' more than once"
            )));
        }
    }
    Ok(())
}

fn lookup(dim: &'static str, names: &[String], name: &str) -> Result<usize> {
    names
        .iter()
        .position(|n| n == name)
        .ok_or_else(|| PoseError::UnknownLabel {
            dim,
            label: name.to_string(),
        })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Dataset with `position[t, i, k, d] = 100*t + 10*i + 2*k + d` and unit confidence.
    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn sample_dataset(frames: usize, inds: usize, kpts: usize) -> PoseDataset {
        let position = Array4::from_shape_fn((frames, inds, kpts, 2), |(t, i, k, d)| {
            (100 * t + 10 * i + 2 * k + d) as f64
        });
        let confidence = Array3::ones((frames, inds, kpts));
        PoseDataset::from_arrays(
            position,
            confidence,
            (0..inds).map(|i| format!("ind{i}")).collect(),
            (0..kpts).map(|k| format!("kpt{k}")).collect(),
            DatasetAttrs::new().with_fps(50.0).with_source_file("session.csv"),
        )
        .unwrap()
    }

    #[test]
    fn test_from_arrays_dimensions() {
        let ds = sample_dataset(4, 2, 3);
        assert_eq!(ds.n_frames(), 4);
        assert_eq!(ds.n_individuals(), 2);
        assert_eq!(ds.n_keypoints(), 3);
        assert_eq!(ds.n_space(), 2);
        assert_eq!(ds.space(), ["x", "y"]);
    }

    #[test]
    fn test_from_arrays_rejects_misaligned_confidence() {
        let err = PoseDataset::from_arrays(
            Array4::zeros((4, 1, 3, 2)),
            Array3::zeros((4, 1, 2)),
            vec!["a".into()],
            vec!["k0".into(), "k1".into(), "k2".into()],
            DatasetAttrs::new(),
        )
        .unwrap_err();
        assert!(matches!(err, PoseError::InvalidDataset(_)));
    }

    #[test]
    fn test_from_arrays_rejects_bad_labels() {
        let err = PoseDataset::from_arrays(
            Array4::zeros((4, 1, 2, 2)),
            Array3::zeros((4, 1, 2)),
            vec!["a".into()],
            vec!["nose".into(), "nose".into()],
            DatasetAttrs::new(),
        )
        .unwrap_err();
        assert!(matches!(err, PoseError::InvalidNames(_)));

        let err = PoseDataset::from_arrays(
            Array4::zeros((4, 1, 2, 4)),
            Array3::zeros((4, 1, 2)),
            vec!["a".into()],
            vec!["nose".into(), "tail".into()],
            DatasetAttrs::new(),
        )
        .unwrap_err();
        assert!(matches!(err, PoseError::InvalidDataset(_)));
    }

    #[test]
    fn test_from_arrays_rejects_bad_fps() {
        let err = PoseDataset::from_arrays(
            Array4::zeros((1, 1, 1, 3)),
            Array3::zeros((1, 1, 1)),
            vec!["a".into()],
            vec!["nose".into()],
            DatasetAttrs::new().with_fps(0.0),
        )
        .unwrap_err();
        assert!(matches!(err, PoseError::InvalidDataset(_)));
    }

    #[test]
    fn test_time_coords() {
        let ds = sample_dataset(3, 1, 1);
        let time = ds.time_coords();
        assert!((time[1] - 0.02).abs() < f64::EPSILON);
        assert!((time[2] - 0.04).abs() < f64::EPSILON);
    }

    #[test]
    fn test_select() {
        let ds = sample_dataset(3, 2, 3);
        let xy = ds.select("ind1", "kpt2").unwrap();
        assert_eq!(xy.shape(), &[3, 2]);
        assert!((xy[[2, 0]] - 214.0).abs() < f64::EPSILON);
        assert!((xy[[2, 1]] - 215.0).abs() < f64::EPSILON);

        let err = ds.select("ind7", "kpt2").unwrap_err();
        assert!(matches!(err, PoseError::UnknownLabel { dim: "individuals", .. }));
    }

    #[test]
    #[allow(clippy::cast_precision_loss)]
    fn test_select_confidence() {
        let mut ds = sample_dataset(4, 2, 3);
        ds.confidence
            .indexed_iter_mut()
            .for_each(|((t, i, k), c)| *c = (t * 100 + i * 10 + k) as f64 / 1000.0);

        let conf = ds.select_confidence("ind1", "kpt2").unwrap();
        assert_eq!(conf.len(), 4);
        assert!((conf[0] - 0.012).abs() < 1e-12);
        assert!((conf[3] - 0.312).abs() < 1e-12);

        let err = ds.select_confidence("ind0", "tail").unwrap_err();
        assert!(matches!(
            err,
            PoseError::UnknownLabel { dim: "keypoints", ref label } if label == "tail"
        ));
        let err = ds.select_confidence("ind9", "kpt0").unwrap_err();
        assert!(matches!(err, PoseError::UnknownLabel { dim: "individuals", .. }));
    }

    #[test]
    fn test_time_slice() {
        let ds = sample_dataset(10, 1, 1);
        let sliced = ds.time_slice(0.04, 0.1).unwrap();
        assert_eq!(sliced.n_frames(), 4);
        assert!((sliced.position()[[0, 0, 0, 0]] - 200.0).abs() < f64::EPSILON);

        assert_eq!(ds.time_range(0.04, 0.1).unwrap(), 2..6);

        let empty = ds.time_slice(5.0, 6.0).unwrap();
        assert_eq!(empty.n_frames(), 0);

        assert!(ds.time_slice(1.0, 0.0).is_err());
    }
}
