//! Application constants for the HURDAT2 analyzer
//!
//! This module contains the fixed field layout of best-track records,
//! sentinel values, geodetic parameters and report defaults used
//! throughout the analyzer.

// =============================================================================
// Best-Track Record Layout
// =============================================================================

/// Field positions within a storm header line
pub mod header_fields {
    /// Storm identifier (e.g. "AL092004")
    pub const ID: usize = 0;

    /// Storm name, or "UNNAMED"
    pub const NAME: usize = 1;

    /// Number of observation lines the header declares
    pub const DECLARED_COUNT: usize = 2;

    /// Minimum number of fields a header line must carry
    pub const MIN_FIELDS: usize = 2;
}

/// Field positions within an observation line
pub mod observation_fields {
    /// Date in YYYYMMDD form
    pub const DATE: usize = 0;

    /// Time in HHMM form
    pub const TIME: usize = 1;

    /// Record identifier ("L" marks a landfall)
    pub const RECORD_ID: usize = 2;

    /// System status ("HU" marks hurricane intensity)
    pub const STATUS: usize = 3;

    /// Latitude with hemisphere suffix
    pub const LATITUDE: usize = 4;

    /// Longitude with hemisphere suffix
    pub const LONGITUDE: usize = 5;

    /// Maximum sustained wind in knots
    pub const MAX_WIND: usize = 6;

    /// First of the twelve wind-radii fields
    pub const RADII_START: usize = 8;

    /// Number of wind-radii fields (3 thresholds x 4 quadrants)
    pub const RADII_COUNT: usize = 12;

    /// Minimum number of fields an observation line must carry
    pub const MIN_FIELDS: usize = RADII_START + RADII_COUNT;
}

/// Name recorded for storms that were never named
pub const UNNAMED_STORM: &str = "UNNAMED";

/// Record identifier that marks a landfall fix
pub const LANDFALL_RECORD_ID: &str = "L";

/// Status code for hurricane intensity
pub const HURRICANE_STATUS: &str = "HU";

/// Combined date+time key format used for elapsed-time computation
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M";

/// Date-only format of field 0
pub const DATE_FORMAT: &str = "%Y%m%d";

// =============================================================================
// Sentinel Values
// =============================================================================

/// Wind-radius value recorded when no measurement exists
pub const RADIUS_NO_DATA: i32 = -999;

/// Wind-radius value meaning no extent was recorded for the threshold
pub const RADIUS_NO_EXTENT: i32 = 0;

/// Bearing reported for legs with no motion between fixes
pub const STATIONARY_BEARING: f64 = 0.0;

// =============================================================================
// Geodesy
// =============================================================================

/// Meters in one international nautical mile
pub const METERS_PER_NAUTICAL_MILE: f64 = 1852.0;

/// WGS-84 semi-major axis in meters
pub const WGS84_SEMI_MAJOR_AXIS: f64 = 6_378_137.0;

/// WGS-84 inverse flattening
pub const WGS84_INVERSE_FLATTENING: f64 = 298.257_223_563;

/// Default iteration limit for the Vincenty inverse solver
pub const DEFAULT_MAX_ITERATIONS: usize = 200;

/// Default convergence tolerance on lambda (radians)
pub const DEFAULT_TOLERANCE: f64 = 1e-12;

/// Degrees covered by one compass quadrant
pub const QUADRANT_SPAN_DEGREES: f64 = 90.0;

/// Number of compass quadrants per wind-radii threshold
pub const QUADRANT_COUNT: usize = 4;

// =============================================================================
// Report Defaults
// =============================================================================

/// Decimal places for distances in the human report
pub const DISTANCE_PRECISION: usize = 2;

/// Decimal places for propagation speeds in the human report
pub const SPEED_PRECISION: usize = 4;

/// Decimal places for the confirmation rate
pub const RATE_PRECISION: usize = 2;

/// Log target used in the default tracing filter
pub const LOG_TARGET: &str = "hurdat_analyzer";

// =============================================================================
// CLI Defaults
// =============================================================================

/// Input argument that selects standard input
pub const STDIN_MARKER: &str = "-";

/// Template for the input progress bar
pub const PROGRESS_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({percent}%) {msg} ETA: {eta}";

/// UTF-8 byte order mark some editors prepend to text files
pub const BYTE_ORDER_MARK: char = '\u{feff}';
