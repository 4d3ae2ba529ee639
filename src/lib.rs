//! HURDAT2 Analyzer Library
//!
//! A Rust library for analyzing HURDAT2 Atlantic and Pacific hurricane
//! best-track datasets.
//!
//! This library provides tools for:
//! - Parsing HURDAT2 storm header and observation records
//! - Computing ellipsoidal distances and initial bearings with Vincenty's
//!   inverse method
//! - Aggregating per-storm track statistics: landfalls, peak wind, track
//!   length and propagation speeds
//! - Testing whether a storm heads toward the quadrant holding its largest
//!   wind radius
//! - Summarizing storms and hurricanes per year across a dataset
//! - Rendering results as a console report or a JSON document

pub mod cli;
pub mod config;
pub mod constants;
pub mod dataset;
pub mod error;
pub mod geodesy;
pub mod hypothesis;
pub mod models;
pub mod parser;
pub mod processor;
pub mod report;
pub mod track;

// Re-export commonly used types
pub use config::{AnalysisConfig, GeodesyConfig, ReportConfig, ReportFormat};
pub use dataset::DatasetAggregator;
pub use error::{AnalysisError, Result};
pub use geodesy::{Ellipsoid, GeodesicSolver, distance_and_bearing, flip_direction, to_point};
pub use models::{
    DatasetSummary, GeoPoint, HypothesisOutcome, LegOutcome, Observation, Storm, StormHeader,
    StormSummary, WindRadii,
};
pub use processor::{ProcessingStats, TrackProcessor};
pub use report::{CollectingSink, ConsoleReport, JsonReport, ReportSink};
pub use track::TrackAggregator;
