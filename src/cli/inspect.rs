// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use std::fs;

use crate::analysis::{DEFAULT_PERCENTILES, Trajectory, nan_percentiles};
use crate::cli::args::{InfoArgs, TrajectoryArgs};
use crate::clean::nan_fraction;
use crate::dataset::PoseDataset;
use crate::error::Result;
use crate::io::load_dataset;
use crate::{field, info, section, success};

/// Run the `info` command.
///
/// # Errors
///
/// Returns an error if the input cannot be loaded.
pub fn run_info(args: &InfoArgs) -> Result<()> {
    let ds = load_dataset(&args.input)?;
    section!("{}", args.input.display());
    print_summary(&ds)?;
    Ok(())
}

fn print_summary(ds: &PoseDataset) -> Result<()> {
    field!("frames", "{}", ds.n_frames());
    field!("individuals", "{}", ds.individuals().join(", "));
    field!("keypoints", "{}", ds.keypoints().join(", "));
    field!("space", "{}", ds.space().join(", "));
    field!(
        "fps",
        "{}",
        ds.attrs.fps.map_or_else(|| "unknown".to_string(), |fps| fps.to_string())
    );
    field!("source file", "{}", ds.attrs.source_file.as_deref().unwrap_or("-"));
    field!("software", "{}", ds.attrs.source_software.as_deref().unwrap_or("-"));
    field!("missing", "{:.1}%", nan_fraction(ds) * 100.0);

    info!("");
    info!("Confidence percentiles (25/50/75):");
    for individual in ds.individuals() {
        for keypoint in ds.keypoints() {
            let conf = ds.select_confidence(individual, keypoint)?.to_vec();
            let p = nan_percentiles(&conf, &DEFAULT_PERCENTILES)?;
            info!(
                "  {individual}/{keypoint}: {:.3} / {:.3} / {:.3}",
                p[0], p[1], p[2]
            );
        }
    }
    Ok(())
}

/// Run the `trajectory` command.
///
/// # Errors
///
/// Returns an error if the input cannot be loaded, a name is unknown, or the
/// output cannot be written.
pub fn run_trajectory(args: &TrajectoryArgs) -> Result<()> {
    let ds = load_dataset(&args.input)?;
    let interval = args.start.zip(args.end);
    let traj = Trajectory::extract(&ds, &args.individual, &args.keypoint, interval)?;

    let record = serde_json::json!({
        "individual": &traj.individual,
        "keypoint": &traj.keypoint,
        "time": traj.time.to_vec(),
        "x": finite_or_null(&traj.x.to_vec()),
        "y": finite_or_null(&traj.y.to_vec()),
    });

    match &args.output {
        Some(path) => {
            fs::write(path, serde_json::to_string_pretty(&record)?)?;
            success!(
                "Saved {} samples of {}/{} to {}",
                traj.len(),
                traj.individual,
                traj.keypoint,
                path.display()
            );
        }
        None => println!("{record}"),
    }
    Ok(())
}

/// JSON has no NaN or infinity, so non-finite samples become `null`.
fn finite_or_null(values: &[f64]) -> Vec<Option<f64>> {
    values.iter().map(|&v| v.is_finite().then_some(v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::sample_dataset;
    use crate::io::save_dataset;

    #[test]
    fn test_run_info() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("ds.json");
        save_dataset(&sample_dataset(5, 2, 2), &input).unwrap();
        run_info(&InfoArgs { input }).unwrap();
    }

    #[test]
    fn test_run_trajectory() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("ds.json");
        let output = dir.path().join("traj.json");
        save_dataset(&sample_dataset(10, 2, 2), &input).unwrap();

        run_trajectory(&TrajectoryArgs {
            input,
            individual: "ind1".to_string(),
            keypoint: "kpt1".to_string(),
            start: Some(0.02),
            end: Some(0.04),
            output: Some(output.clone()),
        })
        .unwrap();

        let record: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(record["x"].as_array().unwrap().len(), 2);
        assert_eq!(record["x"][0].as_f64(), Some(112.0));
        assert_eq!(record["keypoint"], "kpt1");
    }

    #[test]
    fn test_finite_or_null() {
        let values = [1.5, f64::NAN, f64::INFINITY, f64::NEG_INFINITY, -2.0];
        assert_eq!(
            finite_or_null(&values),
            vec![Some(1.5), None, None, None, Some(-2.0)]
        );
    }
}
