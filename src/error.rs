// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Error types for the pose dataset library.

use std::fmt;

/// Result type alias for dataset operations.
pub type Result<T> = std::result::Result<T, PoseError>;

/// Main error type for the pose dataset library.
#[derive(Debug)]
pub enum PoseError {
    /// Requested (individuals x keypoints) split does not cover the flat axis.
    ShapeMismatch {
        /// Length of the combined individual x keypoint axis in the source.
        flat_len: usize,
        /// Number of individual names supplied.
        n_individuals: usize,
        /// Number of keypoint names supplied.
        n_keypoints: usize,
    },
    /// Low-level array reshape failure.
    Shape(ndarray::ShapeError),
    /// Arrays or labels handed to the dataset constructor are inconsistent.
    InvalidDataset(String),
    /// Empty or duplicated individual/keypoint names.
    InvalidNames(String),
    /// A selection referenced an individual or keypoint that does not exist.
    UnknownLabel {
        /// Coordinate the label was looked up in (`individuals` or `keypoints`).
        dim: &'static str,
        /// The missing label.
        label: String,
    },
    /// Invalid configuration provided.
    ConfigError(String),
    /// Wrapped `std::io::Error`.
    Io(std::io::Error),
    /// Dataset (de)serialization error.
    Serialization(serde_json::Error),
}

impl fmt::Display for PoseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShapeMismatch {
                flat_len,
                n_individuals,
                n_keypoints,
            } => write!(
                f,
                "Shape mismatch: cannot split a keypoint axis of length {flat_len} into \
                 {n_individuals} individuals x {n_keypoints} keypoints ({} != {flat_len})",
                n_individuals * n_keypoints
            ),
            Self::Shape(err) => write!(f, "Shape error: {err}"),
            Self::InvalidDataset(msg) => write!(f, "Invalid dataset: {msg}"),
            Self::InvalidNames(msg) => write!(f, "Invalid names: {msg}"),
            Self::UnknownLabel { dim, label } => write!(f, "Unknown label '{label}' in {dim}"),
            Self::ConfigError(msg) => write!(f, "Config error: {msg}"),
            Self::Io(err) => write!(f, "IO error: {err}"),
            Self::Serialization(err) => write!(f, "Serialization error: {err}"),
        }
    }
}

impl std::error::Error for PoseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Shape(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Serialization(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PoseError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<ndarray::ShapeError> for PoseError {
    fn from(err: ndarray::ShapeError) -> Self {
        Self::Shape(err)
    }
}

impl From<serde_json::Error> for PoseError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PoseError::ShapeMismatch {
            flat_len: 20,
            n_individuals: 2,
            n_keypoints: 9,
        };
        assert_eq!(
            err.to_string(),
            "Shape mismatch: cannot split a keypoint axis of length 20 into 2 individuals x 9 \
             keypoints (18 != 20)"
        );

        let err = PoseError::UnknownLabel {
            dim: "keypoints",
            label: "tail".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown label 'tail' in keypoints");
    }

    #[test]
    fn test_error_source() {
        use std::error::Error;

        let err = PoseError::from(std::io::Error::other("boom"));
        assert!(err.source().is_some());

        let err = PoseError::ConfigError("window".to_string());
        assert!(err.source().is_none());
    }
}
