// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Multi-individual reshape and relabel.
//!
//! Single-animal DeepLabCut projects are often reused on footage with several
//! animals by listing every animal's keypoints as separate bodyparts
//! (`resident_nose`, ..., `intruder_nose`, ...). The loaded dataset then has a
//! single individual whose keypoint axis holds `N x K` entries. This module
//! splits that axis back into `N` individuals with `K` keypoints each.

use crate::dataset::{DatasetAttrs, PoseDataset, validate_names};
use crate::error::{PoseError, Result};

/// Source software tag written on reshaped datasets.
pub const SOURCE_SOFTWARE: &str = "DeepLabCut";

/// Split the combined individual x keypoint axis into separate axes.
///
/// The source's individuals and keypoints axes are read as one flat axis of
/// length `L = n_individuals * n_keypoints` in row-major order, and regrouped
/// so that
///
/// ```text
/// output.position[t, i, k, :] == input.position[t, 0, i * K + k, :]
/// ```
///
/// for a single-individual source. The confidence array is regrouped the same
/// way. No numeric transformation is applied.
///
/// # Precondition
///
/// Every individual's keypoints must be laid out identically and
/// contiguously along the flat axis, in the order given by `keypoint_names`:
/// the first `K` entries belong to `individual_names[0]`, the next `K` to
/// `individual_names[1]`, and so on. This is not checked against the source's
/// keypoint names; ordering is taken from the caller as-is.
///
/// # Arguments
///
/// * `ds` - The flat dataset. It is not modified.
/// * `individual_names` - Names of the `N` true individuals, in flat-axis order.
/// * `keypoint_names` - Names of the `K` keypoints of each individual.
///
/// # Returns
///
/// * A new dataset of shape `(T, N, K, S)` with the source's `fps` and
///   `source_file`, and `source_software` set to [`SOURCE_SOFTWARE`].
///
/// # Errors
///
/// * [`PoseError::InvalidNames`] if either name list is empty or has duplicates.
/// * [`PoseError::ShapeMismatch`] if `N * K != L`. Nothing is allocated in
///   that case.
///
/// # Example
///
/// ```rust
/// use ndarray::{Array3, Array4};
/// use pose_relabel::{DatasetAttrs, PoseDataset, reshape_individuals};
///
/// # fn main() -> pose_relabel::Result<()> {
/// let flat = PoseDataset::from_arrays(
///     Array4::zeros((5, 1, 4, 2)),
///     Array3::ones((5, 1, 4)),
///     vec!["individual_0".to_string()],
///     ["a_nose", "a_tail", "b_nose", "b_tail"].map(String::from).to_vec(),
///     DatasetAttrs::new().with_fps(30.0),
/// )?;
///
/// let split = reshape_individuals(&flat, &["a", "b"], &["nose", "tail"])?;
/// assert_eq!(split.position().shape(), &[5, 2, 2, 2]);
/// # Ok(())
/// # }
/// ```
pub fn reshape_individuals<I, K>(
    ds: &PoseDataset,
    individual_names: &[I],
    keypoint_names: &[K],
) -> Result<PoseDataset>
where
    I: AsRef<str>,
    K: AsRef<str>,
{
    let individuals: Vec<String> = individual_names.iter().map(|n| n.as_ref().to_string()).collect();
    let keypoints: Vec<String> = keypoint_names.iter().map(|n| n.as_ref().to_string()).collect();
    validate_names("individuals", &individuals)?;
    validate_names("keypoints", &keypoints)?;

    let flat_len = ds.n_individuals() * ds.n_keypoints();
    if individuals.len() * keypoints.len() != flat_len {
        return Err(PoseError::ShapeMismatch {
            flat_len,
            n_individuals: individuals.len(),
            n_keypoints: keypoints.len(),
        });
    }

    let n_frames = ds.n_frames();
    let n_space = ds.n_space();
    let new_shape = (n_frames, individuals.len(), keypoints.len(), n_space);

    // Row-major regrouping; a standard-layout copy keeps this valid for views
    // that arrive transposed or sliced.
    let position = ds
        .position()
        .as_standard_layout()
        .into_owned()
        .into_shape_with_order(new_shape)?;
    let confidence = ds
        .confidence()
        .as_standard_layout()
        .into_owned()
        .into_shape_with_order((new_shape.0, new_shape.1, new_shape.2))?;

    let attrs = DatasetAttrs {
        fps: ds.attrs.fps,
        source_file: ds.attrs.source_file.clone(),
        source_software: Some(SOURCE_SOFTWARE.to_string()),
    };

    PoseDataset::from_arrays(position, confidence, individuals, keypoints, attrs)
}

/// Derive canonical keypoint names from prefixed flat names.
///
/// Takes the first `L / n_individuals` names of the flat keypoint axis and
/// strips everything up to and including the first `_`, so
/// `resident_nose` becomes `nose` and `resident_left_ear` becomes `left_ear`.
/// Names without an underscore are kept as they are.
///
/// # Errors
///
/// Returns [`PoseError::ConfigError`] if `n_individuals` is zero, and
/// [`PoseError::ShapeMismatch`] if it does not divide the number of names.
pub fn keypoint_names_from_prefixed(
    flat_names: &[String],
    n_individuals: usize,
) -> Result<Vec<String>> {
    if n_individuals == 0 {
        return Err(PoseError::ConfigError(
            "number of individuals must be at least 1".to_string(),
        ));
    }
    if flat_names.len() % n_individuals != 0 {
        return Err(PoseError::ShapeMismatch {
            flat_len: flat_names.len(),
            n_individuals,
            n_keypoints: flat_names.len() / n_individuals,
        });
    }

    let per_individual = flat_names.len() / n_individuals;
    Ok(flat_names[..per_individual]
        .iter()
        .map(|name| {
            name.split_once('_')
                .map_or_else(|| name.clone(), |(_, rest)| rest.to_string())
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::sample_dataset;
    use ndarray::{Array3, Array4, s};

    fn flat_dataset() -> PoseDataset {
        // 100 frames, 20 flat keypoints, values 0..3999 in row-major order
        #[allow(clippy::cast_precision_loss)]
        let position = Array4::from_shape_fn((100, 1, 20, 2), |(t, _, k, d)| {
            (t * 40 + k * 2 + d) as f64
        });
        let confidence = Array3::from_shape_fn((100, 1, 20), |(t, _, k)| {
            #[allow(clippy::cast_precision_loss)]
            let v = (t * 20 + k) as f64;
            v / 2000.0
        });
        PoseDataset::from_arrays(
            position,
            confidence,
            vec!["individual_0".to_string()],
            (0..20).map(|k| format!("kpt{k}")).collect(),
            DatasetAttrs::new()
                .with_fps(50.0)
                .with_source_file("session.csv")
                .with_source_software("SLEAP"),
        )
        .unwrap()
    }

    fn kpt_names(n: usize) -> Vec<String> {
        (0..n).map(|k| format!("kpt{k}")).collect()
    }

    #[test]
    fn test_reshape_shape() {
        let ds = flat_dataset();
        let out = reshape_individuals(&ds, &["resident", "intruder"], &kpt_names(10)).unwrap();
        assert_eq!(out.position().shape(), &[100, 2, 10, 2]);
        assert_eq!(out.confidence().shape(), &[100, 2, 10]);
        assert_eq!(out.individuals(), ["resident", "intruder"]);
        assert_eq!(out.keypoints().len(), 10);
    }

    #[test]
    fn test_reshape_blocks() {
        let ds = flat_dataset();
        let out = reshape_individuals(&ds, &["resident", "intruder"], &kpt_names(10)).unwrap();
        assert_eq!(
            out.position().slice(s![.., 0, .., ..]),
            ds.position().slice(s![.., 0, 0..10, ..])
        );
        assert_eq!(
            out.position().slice(s![.., 1, .., ..]),
            ds.position().slice(s![.., 0, 10..20, ..])
        );
        assert_eq!(
            out.confidence().slice(s![.., 1, ..]),
            ds.confidence().slice(s![.., 0, 10..20])
        );
    }

    #[test]
    fn test_reshape_order_mapping() {
        let ds = flat_dataset();
        for (n, k) in [(1, 20), (2, 10), (4, 5), (5, 4), (20, 1)] {
            let inds: Vec<String> = (0..n).map(|i| format!("ind{i}")).collect();
            let out = reshape_individuals(&ds, &inds, &kpt_names(k)).unwrap();
            assert_eq!(out.position().len(), ds.position().len());
            for t in [0, 37, 99] {
                for i in 0..n {
                    for kk in 0..k {
                        assert_eq!(
                            out.position().slice(s![t, i, kk, ..]),
                            ds.position().slice(s![t, 0, i * k + kk, ..])
                        );
                        assert_eq!(
                            out.confidence()[[t, i, kk]].to_bits(),
                            ds.confidence()[[t, 0, i * k + kk]].to_bits()
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_reshape_metadata() {
        let ds = flat_dataset();
        let out = reshape_individuals(&ds, &["resident", "intruder"], &kpt_names(10)).unwrap();
        assert_eq!(out.attrs.fps, Some(50.0));
        assert_eq!(out.attrs.source_file.as_deref(), Some("session.csv"));
        assert_eq!(out.attrs.source_software.as_deref(), Some(SOURCE_SOFTWARE));
    }

    #[test]
    fn test_reshape_leaves_input_untouched() {
        let ds = flat_dataset();
        let before = ds.clone();
        let _ = reshape_individuals(&ds, &["resident", "intruder"], &kpt_names(10)).unwrap();
        assert_eq!(ds, before);
    }

    #[test]
    fn test_reshape_mismatch() {
        let ds = flat_dataset();
        let err = reshape_individuals(&ds, &["resident", "intruder"], &kpt_names(9)).unwrap_err();
        assert!(matches!(
            err,
            PoseError::ShapeMismatch {
                flat_len: 20,
                n_individuals: 2,
                n_keypoints: 9
            }
        ));
    }

    #[test]
    fn test_reshape_rejects_empty_names() {
        let ds = flat_dataset();
        let none: [&str; 0] = [];
        let err = reshape_individuals(&ds, &none, &kpt_names(10)).unwrap_err();
        assert!(matches!(err, PoseError::InvalidNames(_)));
    }

    #[test]
    fn test_reshape_multi_individual_source() {
        // (2 individuals x 3 keypoints) regrouped as (3 x 2)
        let ds = sample_dataset(2, 2, 3);
        let out = reshape_individuals(&ds, &["a", "b", "c"], &["p", "q"]).unwrap();
        assert_eq!(out.position().shape(), &[2, 3, 2, 2]);
        // flat index 3 = source (ind1, kpt0) -> output (b, q)
        assert_eq!(
            out.position().slice(s![1, 1, 1, ..]),
            ds.position().slice(s![1, 1, 0, ..])
        );
    }

    #[test]
    fn test_keypoint_names_from_prefixed() {
        let flat: Vec<String> = ["resident_nose", "resident_left_ear", "intruder_nose", "intruder_left_ear"]
            .map(String::from)
            .to_vec();
        let names = keypoint_names_from_prefixed(&flat, 2).unwrap();
        assert_eq!(names, ["nose", "left_ear"]);

        assert!(keypoint_names_from_prefixed(&flat, 3).is_err());
        assert!(keypoint_names_from_prefixed(&flat, 0).is_err());
    }
}
