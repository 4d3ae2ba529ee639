//! Configuration management and validation.
//!
//! Provides configuration structures for the geodesic solver and for
//! report output, with defaults matching the HURDAT2 analysis conventions.

use crate::constants::{DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE};
use crate::error::{AnalysisError, Result};
use crate::geodesy::Ellipsoid;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Geodesic solver configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeodesyConfig {
    /// Reference ellipsoid for distance and bearing
    pub ellipsoid: Ellipsoid,

    /// Iteration limit before the inverse solver gives up
    pub max_iterations: usize,

    /// Convergence threshold on lambda, in radians
    pub tolerance: f64,
}

impl Default for GeodesyConfig {
    fn default() -> Self {
        Self {
            ellipsoid: Ellipsoid::WGS84,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl GeodesyConfig {
    pub fn with_ellipsoid(mut self, ellipsoid: Ellipsoid) -> Self {
        self.ellipsoid = ellipsoid;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}

/// Report output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum ReportFormat {
    /// Human-readable console report
    #[default]
    Human,
    /// Single JSON document for scripting
    Json,
}

/// Report output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    pub format: ReportFormat,

    /// Suppress per-storm sections and print only the dataset summary
    pub summary_only: bool,

    /// Colorize human-readable output
    pub color: bool,

    /// Show a progress bar while reading input
    pub show_progress: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: ReportFormat::Human,
            summary_only: false,
            color: true,
            show_progress: false,
        }
    }
}

/// Top-level configuration for an analysis run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub geodesy: GeodesyConfig,
    pub report: ReportConfig,
}

impl AnalysisConfig {
    pub fn with_geodesy(mut self, geodesy: GeodesyConfig) -> Self {
        self.geodesy = geodesy;
        self
    }

    pub fn with_format(mut self, format: ReportFormat) -> Self {
        self.report.format = format;
        self
    }

    pub fn with_summary_only(mut self) -> Self {
        self.report.summary_only = true;
        self
    }

    pub fn without_color(mut self) -> Self {
        self.report.color = false;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.report.show_progress = show_progress;
        self
    }

    /// Check that solver parameters are usable
    pub fn validate(&self) -> Result<()> {
        let geodesy = &self.geodesy;

        if geodesy.max_iterations == 0 {
            return Err(AnalysisError::configuration(
                "max_iterations must be greater than zero",
            ));
        }

        if !(geodesy.tolerance.is_finite() && geodesy.tolerance > 0.0) {
            return Err(AnalysisError::configuration(format!(
                "tolerance must be a positive finite number, got {}",
                geodesy.tolerance
            )));
        }

        if !(geodesy.ellipsoid.semi_major_axis.is_finite()
            && geodesy.ellipsoid.semi_major_axis > 0.0)
        {
            return Err(AnalysisError::configuration(format!(
                "semi-major axis must be positive, got {}",
                geodesy.ellipsoid.semi_major_axis
            )));
        }

        // Infinite inverse flattening is a sphere
        if geodesy.ellipsoid.inverse_flattening.is_nan()
            || geodesy.ellipsoid.inverse_flattening <= 1.0
        {
            return Err(AnalysisError::configuration(format!(
                "inverse flattening must exceed 1, got {}",
                geodesy.ellipsoid.inverse_flattening
            )));
        }

        debug!(
            "Configuration valid: {} iterations, tolerance {:e}, format {:?}",
            geodesy.max_iterations, geodesy.tolerance, self.report.format
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AnalysisConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.geodesy.ellipsoid, Ellipsoid::WGS84);
        assert_eq!(config.report.format, ReportFormat::Human);
        assert!(!config.report.summary_only);
    }

    #[test]
    fn test_builders() {
        let config = AnalysisConfig::default()
            .with_format(ReportFormat::Json)
            .with_summary_only()
            .without_color()
            .with_progress(true)
            .with_geodesy(GeodesyConfig::default().with_max_iterations(50));

        assert_eq!(config.report.format, ReportFormat::Json);
        assert!(config.report.summary_only);
        assert!(!config.report.color);
        assert!(config.report.show_progress);
        assert_eq!(config.geodesy.max_iterations, 50);
    }

    #[test]
    fn test_invalid_solver_parameters() {
        let config = AnalysisConfig::default()
            .with_geodesy(GeodesyConfig::default().with_max_iterations(0));
        assert!(matches!(
            config.validate(),
            Err(AnalysisError::Configuration { .. })
        ));

        let config =
            AnalysisConfig::default().with_geodesy(GeodesyConfig::default().with_tolerance(-1.0));
        assert!(config.validate().is_err());

        let config = AnalysisConfig::default().with_geodesy(
            GeodesyConfig::default().with_ellipsoid(Ellipsoid {
                semi_major_axis: 6_378_137.0,
                inverse_flattening: 0.5,
            }),
        );
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sphere_is_accepted() {
        let config = AnalysisConfig::default().with_geodesy(
            GeodesyConfig::default().with_ellipsoid(Ellipsoid {
                semi_major_axis: 6_371_000.0,
                inverse_flattening: f64::INFINITY,
            }),
        );
        assert!(config.validate().is_ok());
    }
}
