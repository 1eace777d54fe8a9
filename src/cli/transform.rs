// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use crate::cli::args::{CleanArgs, ReshapeArgs};
use crate::clean::{CleaningConfig, clean, nan_fraction};
use crate::error::Result;
use crate::io::{load_dataset, save_dataset};
use crate::reshape::{keypoint_names_from_prefixed, reshape_individuals};
use crate::{section, success, verbose, warn};

/// Run the `reshape` command.
///
/// # Errors
///
/// Returns an error if the input cannot be loaded, the names do not fit the
/// flat axis, or the output cannot be written.
pub fn run_reshape(args: &ReshapeArgs) -> Result<()> {
    let ds = load_dataset(&args.input)?;
    section!("Reshape {}", args.input.display());

    if ds.n_individuals() > 1 {
        warn!(
            "input already has {} individuals; their keypoint blocks are read in order",
            ds.n_individuals()
        );
    }

    let keypoints = if args.strip_prefix {
        let names = keypoint_names_from_prefixed(ds.keypoints(), args.individuals.len())?;
        verbose!("Derived keypoint names: {}", names.join(", "));
        names
    } else {
        args.keypoints.clone()
    };

    let out = reshape_individuals(&ds, &args.individuals, &keypoints)?;
    verbose!(
        "{} frames x {} keypoints -> {} individuals x {} keypoints",
        ds.n_frames(),
        ds.n_individuals() * ds.n_keypoints(),
        out.n_individuals(),
        out.n_keypoints()
    );

    save_dataset(&out, &args.output)?;
    success!("Saved reshaped dataset to {}", args.output.display());
    Ok(())
}

/// Run the `clean` command.
///
/// # Errors
///
/// Returns an error if the input cannot be loaded, the parameters are
/// invalid, or the output cannot be written.
pub fn run_clean(args: &CleanArgs) -> Result<()> {
    let config = CleaningConfig::new()
        .with_confidence(args.conf)
        .with_max_gap((!args.fill_all_gaps).then_some(args.max_gap))
        .with_window(args.window)
        .with_min_periods(Some(args.min_periods));
    config.validate()?;

    let ds = load_dataset(&args.input)?;
    section!("Clean {}", args.input.display());
    verbose!(
        "Input: {:.1}% of positions missing",
        nan_fraction(&ds) * 100.0
    );

    let out = clean(&ds, &config)?;
    save_dataset(&out, &args.output)?;
    success!("Saved cleaned dataset to {}", args.output.display());
    Ok(())
}
