//! Command-line argument definitions for the HURDAT2 analyzer
//!
//! Defines the CLI with the clap derive API and maps parsed arguments onto
//! an [`AnalysisConfig`].

use crate::config::{AnalysisConfig, GeodesyConfig, ReportFormat};
use crate::constants::{DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE, STDIN_MARKER};
use clap::Parser;
use std::path::{Path, PathBuf};

/// CLI arguments for the HURDAT2 best-track analyzer
///
/// Reads a HURDAT2 best-track dataset, reports per-storm track statistics
/// and tests whether storms head toward their largest wind-radius quadrant.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "hurdat-analyzer",
    version,
    about = "Storm track statistics and wind-radii heading analysis for HURDAT2 data",
    long_about = "Streams a HURDAT2 best-track file, computing for every storm its landfalls, \
                  peak sustained wind, track length and propagation speeds on the WGS-84 \
                  ellipsoid, then summarizes storms and hurricanes per year and how often a \
                  storm's heading pointed into the quadrant holding its largest wind radius."
)]
pub struct Args {
    /// Best-track input file
    ///
    /// Use '-' or omit to read from standard input.
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Report format
    #[arg(
        short = 'f',
        long = "format",
        value_enum,
        default_value_t = ReportFormat::Human,
        help = "Report format"
    )]
    pub format: ReportFormat,

    /// Write the report to a file instead of stdout
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Only print the dataset summary
    #[arg(long = "summary-only")]
    pub summary_only: bool,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Iteration limit for the geodesic solver
    #[arg(
        long = "max-iterations",
        value_name = "N",
        default_value_t = DEFAULT_MAX_ITERATIONS
    )]
    pub max_iterations: usize,

    /// Convergence tolerance for the geodesic solver, in radians
    #[arg(long = "tolerance", value_name = "EPS", default_value_t = DEFAULT_TOLERANCE)]
    pub tolerance: f64,

    /// Hide the progress bar
    #[arg(long = "no-progress")]
    pub no_progress: bool,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    ///
    /// Only show errors. Overrides verbose settings.
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

impl Args {
    /// Get the log level based on verbosity settings
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Input file path, or `None` when reading standard input
    pub fn input_path(&self) -> Option<&Path> {
        self.input
            .as_deref()
            .filter(|path| path.as_os_str() != STDIN_MARKER)
    }

    /// Progress bars only make sense for sized file input
    pub fn show_progress(&self) -> bool {
        !self.quiet && !self.no_progress && self.input_path().is_some()
    }

    /// Build the analysis configuration
    pub fn to_config(&self) -> AnalysisConfig {
        let geodesy = GeodesyConfig::default()
            .with_max_iterations(self.max_iterations)
            .with_tolerance(self.tolerance);

        let mut config = AnalysisConfig::default()
            .with_geodesy(geodesy)
            .with_format(self.format)
            .with_progress(self.show_progress());

        if self.summary_only {
            config = config.with_summary_only();
        }
        if self.no_color || self.output.is_some() {
            config = config.without_color();
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("hurdat-analyzer").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]);
        assert_eq!(args.input_path(), None);
        assert_eq!(args.format, ReportFormat::Human);
        assert_eq!(args.get_log_level(), "warn");
        assert!(!args.show_progress());

        let config = args.to_config();
        assert_eq!(config.geodesy.max_iterations, DEFAULT_MAX_ITERATIONS);
        assert_eq!(config.geodesy.tolerance, DEFAULT_TOLERANCE);
        assert!(config.report.color);
        assert!(!config.report.summary_only);
    }

    #[test]
    fn test_dash_reads_stdin() {
        let args = parse(&["-"]);
        assert_eq!(args.input_path(), None);
        assert!(!args.show_progress());
    }

    #[test]
    fn test_file_input_shows_progress() {
        let args = parse(&["hurdat2.txt"]);
        assert_eq!(args.input_path(), Some(Path::new("hurdat2.txt")));
        assert!(args.show_progress());

        assert!(!parse(&["hurdat2.txt", "--no-progress"]).show_progress());
        assert!(!parse(&["hurdat2.txt", "-q"]).show_progress());
    }

    #[test]
    fn test_log_levels() {
        assert_eq!(parse(&["-v"]).get_log_level(), "info");
        assert_eq!(parse(&["-vv"]).get_log_level(), "debug");
        assert_eq!(parse(&["-vvvv"]).get_log_level(), "trace");
        assert_eq!(parse(&["-q"]).get_log_level(), "error");
        assert!(Args::try_parse_from(["hurdat-analyzer", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_report_options() {
        let config = parse(&[
            "-f",
            "json",
            "--summary-only",
            "--max-iterations",
            "50",
            "--tolerance",
            "1e-9",
        ])
        .to_config();

        assert_eq!(config.report.format, ReportFormat::Json);
        assert!(config.report.summary_only);
        assert_eq!(config.geodesy.max_iterations, 50);
        assert_eq!(config.geodesy.tolerance, 1e-9);
    }

    #[test]
    fn test_file_output_disables_color() {
        assert!(!parse(&["-o", "report.txt"]).to_config().report.color);
        assert!(!parse(&["--no-color"]).to_config().report.color);
    }
}
