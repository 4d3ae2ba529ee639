//! Error handling for best-track analysis.
//!
//! Every condition here is fatal for the run: a malformed record
//! invalidates the whole analysis. Sentinel readings are not errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid record format at line {line}: {reason}")]
    Format { line: usize, reason: String },

    #[error("Invalid or unsupported direction '{value}' given")]
    InvalidDirection { value: String },

    #[error("Cannot compute elapsed time from timestamp '{value}': {source}")]
    ElapsedTime {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("No leg in the dataset produced a determinable hypothesis outcome")]
    NoData,

    #[error("Geodesic solver did not converge after {iterations} iterations between {from} and {to}")]
    GeodesicConvergence {
        from: String,
        to: String,
        iterations: usize,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl AnalysisError {
    /// Create a format error without a known line number
    pub fn format(reason: impl Into<String>) -> Self {
        Self::Format {
            line: 0,
            reason: reason.into(),
        }
    }

    /// Attach a 1-based line number to a format error
    pub fn at_line(self, line: usize) -> Self {
        match self {
            Self::Format { reason, .. } => Self::Format { line, reason },
            other => other,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
