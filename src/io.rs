// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Dataset persistence.
//!
//! Datasets are stored as JSON: each array as `{"shape": [...], "data": [...]}`
//! in row-major order, then the individual and keypoint names and the
//! attributes. Missing (NaN) values are written as `null`.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::dataset::PoseDataset;
use crate::error::Result;

/// Load a dataset saved by [`save_dataset`].
///
/// The arrays and names are validated exactly as in
/// [`PoseDataset::from_arrays`].
///
/// # Errors
///
/// Returns an IO error if the file cannot be read, or a serialization error
/// if it is not a valid dataset.
pub fn load_dataset<P: AsRef<Path>>(path: P) -> Result<PoseDataset> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Save a dataset as JSON, creating parent directories as needed.
///
/// # Errors
///
/// Returns an IO or serialization error if writing fails.
pub fn save_dataset<P: AsRef<Path>>(ds: &PoseDataset, path: P) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, ds)?;
    writer.flush()?;
    Ok(())
}
