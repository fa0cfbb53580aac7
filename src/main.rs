use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use sysml2rdf::cli::{self, Args};

fn main() -> ExitCode {
    let args = Args::parse();
    cli::init_tracing(&args.log_level);

    info!(log_level = %args.log_level, "Starting sysml2rdf");

    if let Err(err) = cli::run(&args) {
        error!("Conversion failed: {err}");
        eprintln!("error: {err}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
