//! Command implementation for the HURDAT2 analyzer CLI
//!
//! Sets up logging, opens input and output, and drives a
//! [`TrackProcessor`] over the input with an optional progress bar.

use crate::cli::args::Args;
use crate::constants::{LOG_TARGET, PROGRESS_TEMPLATE};
use crate::processor::{ProcessingStats, TrackProcessor};
use crate::report::sink_for;
use anyhow::{Context, Result, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use tracing::{debug, info};

/// Set up structured logging on stderr
pub fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}={}", LOG_TARGET, log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

fn create_progress_bar(total_bytes: u64) -> Result<ProgressBar> {
    let pb = ProgressBar::new(total_bytes);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(PROGRESS_TEMPLATE)
            .context("Invalid progress bar template")?
            .progress_chars("#>-"),
    );
    pb.set_message("reading best-track records");
    Ok(pb)
}

/// Run the analysis described by `args`
pub fn run(args: &Args) -> Result<ProcessingStats> {
    let config = args.to_config();
    config
        .validate()
        .context("Invalid analysis configuration")?;
    debug!("Analysis configuration: {:?}", config);

    if !config.report.color {
        colored::control::set_override(false);
    }

    let output: Box<dyn Write> = match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    let mut sink = sink_for(&config.report, output);
    let processor = TrackProcessor::new(&config.geodesy);

    let stats = match args.input_path() {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open input file {}", path.display()))?;
            let total_bytes = file.metadata().map(|m| m.len()).unwrap_or(0);
            info!("Reading {} ({} bytes)", path.display(), total_bytes);

            let result = if config.report.show_progress {
                let pb = create_progress_bar(total_bytes)?;
                let result = processor.run_reader(BufReader::new(pb.wrap_read(file)), sink.as_mut());
                pb.finish_and_clear();
                result
            } else {
                processor.run_reader(BufReader::new(file), sink.as_mut())
            };

            result.with_context(|| format!("Failed to analyze {}", path.display()))?
        }
        None => {
            info!("Reading best-track records from standard input");
            processor
                .run_reader(io::stdin().lock(), sink.as_mut())
                .context("Failed to analyze standard input")?
        }
    };

    if let Some(path) = &args.output {
        info!("Report written to {}", path.display());
    }

    Ok(stats)
}
