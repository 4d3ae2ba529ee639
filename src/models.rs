//! Core data structures for best-track analysis.
//!
//! Defines geographic points, parsed observation records, storm headers,
//! per-leg hypothesis outcomes and the per-storm and dataset-wide summaries
//! handed to report sinks.

use crate::constants::{QUADRANT_COUNT, RADIUS_NO_DATA, observation_fields::RADII_COUNT};
use crate::error::{AnalysisError, Result};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Geography
// =============================================================================

/// Compass hemisphere letter attached to a coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hemisphere {
    North,
    South,
    East,
    West,
}

impl Hemisphere {
    /// Parse a hemisphere letter, failing on anything outside {N,S,E,W}
    pub fn from_char(c: char) -> Result<Self> {
        match c {
            'N' => Ok(Self::North),
            'S' => Ok(Self::South),
            'E' => Ok(Self::East),
            'W' => Ok(Self::West),
            other => Err(AnalysisError::InvalidDirection {
                value: other.to_string(),
            }),
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Self::North => 'N',
            Self::South => 'S',
            Self::East => 'E',
            Self::West => 'W',
        }
    }

    /// The opposite hemisphere on the same axis
    pub fn flip(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
        }
    }

    pub fn is_latitude(self) -> bool {
        matches!(self, Self::North | Self::South)
    }

    /// Southern and western hemispheres carry negative signed degrees
    pub fn sign(self) -> f64 {
        match self {
            Self::North | Self::East => 1.0,
            Self::South | Self::West => -1.0,
        }
    }
}

impl fmt::Display for Hemisphere {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A position on the earth in signed decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a point, validating coordinate ranges
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(AnalysisError::format(format!(
                "Invalid latitude {}: must be between -90 and 90 degrees",
                latitude
            )));
        }

        if !(-180.0..=180.0).contains(&longitude) {
            return Err(AnalysisError::format(format!(
                "Invalid longitude {}: must be between -180 and 180 degrees",
                longitude
            )));
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ns = if self.latitude < 0.0 { 'S' } else { 'N' };
        let ew = if self.longitude < 0.0 { 'W' } else { 'E' };
        write!(
            f,
            "{:.2}{}, {:.2}{}",
            self.latitude.abs(),
            ns,
            self.longitude.abs(),
            ew
        )
    }
}

// =============================================================================
// Wind Radii
// =============================================================================

/// One wind-radius field: either a measured extent in nautical miles or no data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RadiusReading {
    Measured(i32),
    NoData,
}

impl RadiusReading {
    /// Interpret a raw field value, mapping the -999 sentinel to `NoData`
    pub fn from_raw(value: i32) -> Self {
        if value == RADIUS_NO_DATA {
            Self::NoData
        } else {
            Self::Measured(value)
        }
    }

    pub fn value(self) -> Option<i32> {
        match self {
            Self::Measured(v) => Some(v),
            Self::NoData => None,
        }
    }
}

/// The twelve wind-radii readings of an observation.
///
/// Ordered as three wind-speed thresholds (34, 50, 64 kt), each with the
/// quadrants NE, SE, SW, NW. Position `i` therefore lies in quadrant `i % 4`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindRadii {
    readings: [RadiusReading; RADII_COUNT],
}

impl WindRadii {
    pub fn new(readings: [RadiusReading; RADII_COUNT]) -> Self {
        Self { readings }
    }

    /// Build from raw integers, as they appear in the record
    pub fn from_raw(values: [i32; RADII_COUNT]) -> Self {
        Self {
            readings: values.map(RadiusReading::from_raw),
        }
    }

    /// Radii with every field missing
    pub fn no_data() -> Self {
        Self {
            readings: [RadiusReading::NoData; RADII_COUNT],
        }
    }

    pub fn readings(&self) -> &[RadiusReading; RADII_COUNT] {
        &self.readings
    }

    /// The largest measured reading, or `NoData` when nothing was measured
    pub fn max_reading(&self) -> RadiusReading {
        self.readings
            .iter()
            .filter_map(|r| r.value())
            .max()
            .map_or(RadiusReading::NoData, RadiusReading::Measured)
    }

    /// Positions (0..12) of every reading tied for the maximum
    pub fn max_indices(&self) -> Vec<usize> {
        match self.max_reading() {
            RadiusReading::NoData => Vec::new(),
            max => self
                .readings
                .iter()
                .enumerate()
                .filter(|(_, r)| **r == max)
                .map(|(i, _)| i)
                .collect(),
        }
    }
}

/// Compass quadrant of a wind-radius reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Quadrant {
    NorthEast = 0,
    SouthEast = 1,
    SouthWest = 2,
    NorthWest = 3,
}

impl Quadrant {
    /// Quadrant of a position in the wind-radii vector
    pub fn from_radius_index(index: usize) -> Self {
        match index % QUADRANT_COUNT {
            0 => Self::NorthEast,
            1 => Self::SouthEast,
            2 => Self::SouthWest,
            _ => Self::NorthWest,
        }
    }

    /// Quadrant for a 90-degree heading bucket (0..4)
    pub fn from_bucket(bucket: usize) -> Option<Self> {
        match bucket {
            0 => Some(Self::NorthEast),
            1 => Some(Self::SouthEast),
            2 => Some(Self::SouthWest),
            3 => Some(Self::NorthWest),
            _ => None,
        }
    }
}

// =============================================================================
// Parsed Records
// =============================================================================

/// Storm header line: identifier, optional name and declared fix count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StormHeader {
    pub id: String,

    /// Absent when the storm was recorded as UNNAMED
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub declared_count: Option<usize>,
}

/// A single best-track fix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Combined date and time of the fix
    pub timestamp: NaiveDateTime,

    /// Raw YYYYMMDD date field
    pub date: String,

    /// Raw HHMM time field
    pub time: String,

    /// Record identifier (e.g. "L" for landfall), empty when absent
    pub record_id: String,

    /// System status code (e.g. "HU", "TS", "EX")
    pub status: String,

    pub position: GeoPoint,

    /// Maximum sustained wind in knots
    pub max_wind: i32,

    pub wind_radii: WindRadii,
}

impl Observation {
    pub fn is_landfall(&self) -> bool {
        self.record_id == crate::constants::LANDFALL_RECORD_ID
    }

    pub fn is_hurricane(&self) -> bool {
        self.status == crate::constants::HURRICANE_STATUS
    }

    pub fn year(&self) -> i32 {
        self.timestamp.year()
    }

    pub fn day(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

/// A complete storm: header plus its fixes in chronological order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Storm {
    pub header: StormHeader,
    pub observations: Vec<Observation>,
}

// =============================================================================
// Hypothesis Outcomes
// =============================================================================

/// Result of checking a heading against the max-radius quadrants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HypothesisOutcome {
    /// The heading falls in a quadrant holding the maximum radius
    Confirmed,
    /// The heading does not fall in any max-radius quadrant
    Inapplicable,
}

/// Why a leg was excluded from the hypothesis tally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkipReason {
    /// Every wind-radius field was -999
    NoRadiiData,
    /// The largest wind radius was 0
    NoWindExtent,
    /// Bearing was exactly 0, which includes legs with no motion
    ZeroBearing,
}

/// Per-leg outcome: either checked, or skipped for lack of signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LegOutcome {
    Evaluated(HypothesisOutcome),
    Skipped(SkipReason),
}

/// One transition between consecutive fixes of a storm
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    pub distance_nm: f64,
    pub bearing: f64,
    pub elapsed_hours: f64,

    /// Distance over elapsed time; `None` when no time elapsed
    pub speed_kt: Option<f64>,

    pub outcome: LegOutcome,
}

/// Running counts of leg outcomes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeTally {
    pub confirmed: usize,
    pub inapplicable: usize,
    pub skipped: usize,
}

impl OutcomeTally {
    pub fn record(&mut self, outcome: LegOutcome) {
        match outcome {
            LegOutcome::Evaluated(HypothesisOutcome::Confirmed) => self.confirmed += 1,
            LegOutcome::Evaluated(HypothesisOutcome::Inapplicable) => self.inapplicable += 1,
            LegOutcome::Skipped(_) => self.skipped += 1,
        }
    }

    pub fn merge(&mut self, other: &OutcomeTally) {
        self.confirmed += other.confirmed;
        self.inapplicable += other.inapplicable;
        self.skipped += other.skipped;
    }

    /// Legs whose outcome was determinable
    pub fn evaluated(&self) -> usize {
        self.confirmed + self.inapplicable
    }

    pub fn total_legs(&self) -> usize {
        self.evaluated() + self.skipped
    }

    /// Percentage of evaluated legs that confirmed the hypothesis
    pub fn confirmation_rate(&self) -> Option<f64> {
        match self.evaluated() {
            0 => None,
            n => Some(self.confirmed as f64 / n as f64 * 100.0),
        }
    }
}

impl<'a> FromIterator<&'a LegOutcome> for OutcomeTally {
    fn from_iter<I: IntoIterator<Item = &'a LegOutcome>>(iter: I) -> Self {
        let mut tally = Self::default();
        for outcome in iter {
            tally.record(*outcome);
        }
        tally
    }
}

// =============================================================================
// Summaries
// =============================================================================

/// Highest sustained wind of a storm and when it was first reached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakWind {
    pub knots: i32,
    pub date: String,
    pub time: String,
    pub timestamp: NaiveDateTime,
}

/// Statistics for a single storm track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StormSummary {
    pub header: StormHeader,

    /// Year of the first fix
    pub year: i32,

    pub observation_count: usize,
    pub landfall_count: usize,

    /// Absent when no fix recorded a positive wind
    pub peak_wind: Option<PeakWind>,

    pub start: NaiveDate,
    pub end: NaiveDate,

    pub total_distance_nm: f64,
    pub max_speed_kt: f64,
    pub mean_speed_kt: f64,

    pub outcomes: Vec<LegOutcome>,
    pub reached_hurricane: bool,
}

impl StormSummary {
    /// Whether the header's declared fix count agrees with the fixes seen.
    /// Headers without a declared count always match.
    pub fn declared_count_matches(&self) -> bool {
        self.header
            .declared_count
            .is_none_or(|declared| declared == self.observation_count)
    }

    pub fn tally(&self) -> OutcomeTally {
        self.outcomes.iter().collect()
    }

    /// Number of days from the first to the last fix
    pub fn duration_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

/// Storm and hurricane counts for one year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearlyCounts {
    pub year: i32,
    pub storms: usize,
    pub hurricanes: usize,
}

/// Dataset-wide results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    /// Every year from the earliest to the latest storm, ascending
    pub years: Vec<YearlyCounts>,

    pub total_storms: usize,
    pub tally: OutcomeTally,

    /// Percentage of evaluated legs confirming the hypothesis
    pub confirmation_rate: f64,
}

impl DatasetSummary {
    pub fn total_hurricanes(&self) -> usize {
        self.years.iter().map(|y| y.hurricanes).sum()
    }

    pub fn year(&self, year: i32) -> Option<&YearlyCounts> {
        self.years.iter().find(|y| y.year == year)
    }
}
