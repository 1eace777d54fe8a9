// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use std::process;

use clap::Parser;

use pose_relabel::cli::args::{Cli, Commands};
use pose_relabel::cli::inspect::{run_info, run_trajectory};
use pose_relabel::cli::logging::set_verbose;
use pose_relabel::cli::transform::{run_clean, run_reshape};

fn main() {
    let cli = Cli::parse();
    set_verbose(cli.verbose);

    let result = match &cli.command {
        Commands::Reshape(args) => run_reshape(args),
        Commands::Clean(args) => run_clean(args),
        Commands::Info(args) => run_info(args),
        Commands::Trajectory(args) => run_trajectory(args),
    };

    if let Err(e) = result {
        pose_relabel::error!("{e}");
        process::exit(1);
    }
}
