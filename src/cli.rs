//! Command-line arguments and the conversion run.
//!
//! The binary parses [`Args`], installs a stderr subscriber through
//! [`init_tracing`] and hands over to [`run`].

use std::path::PathBuf;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::error::ConvertError;

/// Convert an XMI model to RDF Turtle
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input XMI file
    #[arg(long, value_name = "PATH")]
    pub input_sysml: PathBuf,

    /// Path to the output Turtle file
    #[arg(long, value_name = "PATH")]
    pub output_rdf: PathBuf,

    /// Print the extracted elements as JSON before mapping
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to configuration file (JSON)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

/// Install the stderr subscriber. `RUST_LOG` takes precedence over `level`.
///
/// Safe to call more than once; later calls leave the first subscriber in
/// place.
pub fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::try_new(level).unwrap_or_else(|_| {
            eprintln!("Invalid log level: {level}. Using 'warn' instead.");
            EnvFilter::new("warn")
        })
    });

    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init();
}

/// Run one conversion as described by `args`.
pub fn run(args: &Args) -> Result<(), ConvertError> {
    debug!(?args, "Parsed arguments");
    let config = Config::load(args.config.as_deref())?;

    let store = crate::parse_sysml_file(&args.input_sysml, &config)?;
    if args.verbose {
        println!("{}", serde_json::to_string_pretty(&store.summary())?);
    }

    let graph = crate::create_rdf_model(&store, &config);
    crate::write_turtle_file(&graph, &args.output_rdf)?;

    info!(
        input = %args.input_sysml.display(),
        output = %args.output_rdf.display(),
        triples = graph.len(),
        "Conversion complete"
    );
    Ok(())
}
