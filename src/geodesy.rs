//! Ellipsoidal geodesy for storm tracks.
//!
//! Converts hemisphere-suffixed coordinate fields into signed points and
//! solves the inverse geodesic problem (distance and initial bearing between
//! two points) with Vincenty's iterative formulae.

use crate::config::GeodesyConfig;
use crate::constants::{
    DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE, METERS_PER_NAUTICAL_MILE, WGS84_INVERSE_FLATTENING,
    WGS84_SEMI_MAJOR_AXIS,
};
use crate::error::{AnalysisError, Result};
use crate::models::{GeoPoint, Hemisphere};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::trace;

/// Reference ellipsoid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ellipsoid {
    /// Equatorial radius in meters
    pub semi_major_axis: f64,
    pub inverse_flattening: f64,
}

impl Ellipsoid {
    pub const WGS84: Ellipsoid = Ellipsoid {
        semi_major_axis: WGS84_SEMI_MAJOR_AXIS,
        inverse_flattening: WGS84_INVERSE_FLATTENING,
    };

    pub fn flattening(&self) -> f64 {
        1.0 / self.inverse_flattening
    }

    /// Polar radius in meters
    pub fn semi_minor_axis(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.flattening())
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Self::WGS84
    }
}

/// Return the opposite compass letter.
///
/// Accepts exactly `E`, `W`, `N` and `S`; anything else is an
/// `InvalidDirection` error.
pub fn flip_direction(direction: char) -> Result<char> {
    Hemisphere::from_char(direction).map(|h| h.flip().as_char())
}

/// Split a coordinate field into magnitude and optional hemisphere letter
fn parse_coordinate(field: &str) -> Result<(f64, Option<Hemisphere>)> {
    let field = field.trim();
    let (number, hemisphere) = match field.chars().last() {
        Some(c) if c.is_ascii_alphabetic() => {
            (&field[..field.len() - 1], Some(Hemisphere::from_char(c)?))
        }
        Some(_) => (field, None),
        None => return Err(AnalysisError::format("Empty coordinate field")),
    };

    let magnitude = number.trim().parse::<f64>().map_err(|e| {
        AnalysisError::format(format!("Invalid coordinate '{}': {}", field, e))
    })?;

    if !magnitude.is_finite() {
        return Err(AnalysisError::format(format!(
            "Invalid coordinate '{}': not a finite number",
            field
        )));
    }

    Ok((magnitude, hemisphere))
}

/// Signed longitude from a raw field, reflecting readings beyond 180 degrees
/// into the opposite hemisphere.
fn signed_longitude(field: &str) -> Result<f64> {
    match parse_coordinate(field)? {
        (magnitude, Some(hemisphere)) => {
            if hemisphere.is_latitude() {
                return Err(AnalysisError::format(format!(
                    "Longitude '{}' carries latitude hemisphere {}",
                    field.trim(),
                    hemisphere
                )));
            }
            let (magnitude, hemisphere) = if magnitude > 180.0 {
                trace!("Reflecting longitude {}{}", magnitude, hemisphere);
                (360.0 - magnitude, hemisphere.flip())
            } else {
                (magnitude, hemisphere)
            };
            Ok(magnitude * hemisphere.sign())
        }
        (value, None) if value > 180.0 => Ok(value - 360.0),
        (value, None) if value < -180.0 => Ok(value + 360.0),
        (value, None) => Ok(value),
    }
}

fn signed_latitude(field: &str) -> Result<f64> {
    match parse_coordinate(field)? {
        (magnitude, Some(hemisphere)) => {
            if !hemisphere.is_latitude() {
                return Err(AnalysisError::format(format!(
                    "Latitude '{}' carries longitude hemisphere {}",
                    field.trim(),
                    hemisphere
                )));
            }
            Ok(magnitude * hemisphere.sign())
        }
        (value, None) => Ok(value),
    }
}

/// Build a point from latitude and longitude fields such as `"25.6N"` and
/// `"82.1W"`. Bare signed numbers are accepted as well.
pub fn to_point(lat_field: &str, lon_field: &str) -> Result<GeoPoint> {
    GeoPoint::new(signed_latitude(lat_field)?, signed_longitude(lon_field)?)
}

/// Inverse geodesic solver on a reference ellipsoid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeodesicSolver {
    ellipsoid: Ellipsoid,
    max_iterations: usize,
    tolerance: f64,
}

impl Default for GeodesicSolver {
    fn default() -> Self {
        Self {
            ellipsoid: Ellipsoid::WGS84,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl GeodesicSolver {
    pub fn new(config: &GeodesyConfig) -> Self {
        Self {
            ellipsoid: config.ellipsoid,
            max_iterations: config.max_iterations,
            tolerance: config.tolerance,
        }
    }

    /// Distance in nautical miles and initial bearing in degrees [0, 360)
    /// from `from` to `to`.
    ///
    /// Identical points yield `(0, 0)` without running the solver.
    pub fn distance_and_bearing(&self, from: &GeoPoint, to: &GeoPoint) -> Result<(f64, f64)> {
        if from == to {
            return Ok((0.0, 0.0));
        }

        let (meters, bearing) = self.inverse(from, to)?;
        Ok((meters / METERS_PER_NAUTICAL_MILE, bearing))
    }

    /// Vincenty inverse: distance in meters and initial bearing in degrees
    fn inverse(&self, from: &GeoPoint, to: &GeoPoint) -> Result<(f64, f64)> {
        let a = self.ellipsoid.semi_major_axis;
        let f = self.ellipsoid.flattening();
        let b = self.ellipsoid.semi_minor_axis();

        // Shortest longitude difference, so legs across the antimeridian stay short
        let l = ((to.longitude - from.longitude).to_radians() + PI).rem_euclid(2.0 * PI) - PI;
        let u1 = ((1.0 - f) * from.latitude.to_radians().tan()).atan();
        let u2 = ((1.0 - f) * to.latitude.to_radians().tan()).atan();
        let (sin_u1, cos_u1) = u1.sin_cos();
        let (sin_u2, cos_u2) = u2.sin_cos();

        let mut lambda = l;
        let mut iterations = 0;

        let (sin_lambda, cos_lambda, sin_sigma, cos_sigma, sigma, cos_sq_alpha, cos_2sigma_m) = loop {
            let (sin_lambda, cos_lambda) = lambda.sin_cos();
            let sin_sigma = ((cos_u2 * sin_lambda).powi(2)
                + (cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda).powi(2))
            .sqrt();

            // Coincident after reduction to the auxiliary sphere
            if sin_sigma == 0.0 {
                return Ok((0.0, 0.0));
            }

            let cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
            let sigma = sin_sigma.atan2(cos_sigma);
            let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
            let cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;

            // Equatorial geodesics have cos²α = 0
            let cos_2sigma_m = if cos_sq_alpha != 0.0 {
                cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha
            } else {
                0.0
            };

            let c = f / 16.0 * cos_sq_alpha * (4.0 + f * (4.0 - 3.0 * cos_sq_alpha));
            let previous = lambda;
            lambda = l
                + (1.0 - c)
                    * f
                    * sin_alpha
                    * (sigma
                        + c * sin_sigma
                            * (cos_2sigma_m
                                + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));

            iterations += 1;
            if (lambda - previous).abs() <= self.tolerance {
                break (
                    sin_lambda,
                    cos_lambda,
                    sin_sigma,
                    cos_sigma,
                    sigma,
                    cos_sq_alpha,
                    cos_2sigma_m,
                );
            }

            if iterations >= self.max_iterations || lambda.abs() > PI {
                return Err(AnalysisError::GeodesicConvergence {
                    from: from.to_string(),
                    to: to.to_string(),
                    iterations,
                });
            }
        };

        trace!("Vincenty converged after {} iterations", iterations);

        let u_sq = cos_sq_alpha * (a * a - b * b) / (b * b);
        let big_a =
            1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
        let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));
        let delta_sigma = big_b
            * sin_sigma
            * (cos_2sigma_m
                + big_b / 4.0
                    * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)
                        - big_b / 6.0
                            * cos_2sigma_m
                            * (-3.0 + 4.0 * sin_sigma * sin_sigma)
                            * (-3.0 + 4.0 * cos_2sigma_m * cos_2sigma_m)));

        let distance = b * big_a * (sigma - delta_sigma);

        let alpha1 = (cos_u2 * sin_lambda).atan2(cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda);

        Ok((distance, normalize_bearing(alpha1.to_degrees())))
    }
}

/// Map any angle in degrees into [0, 360)
fn normalize_bearing(degrees: f64) -> f64 {
    let bearing = degrees.rem_euclid(360.0);
    if bearing >= 360.0 { 0.0 } else { bearing }
}

/// Distance (nautical miles) and initial bearing (degrees) on WGS-84
pub fn distance_and_bearing(from: &GeoPoint, to: &GeoPoint) -> Result<(f64, f64)> {
    GeodesicSolver::default().distance_and_bearing(from, to)
}
