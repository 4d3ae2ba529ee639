//! Best-track record parsing.
//!
//! Turns one raw HURDAT2 line into either a [`StormHeader`] or an
//! [`Observation`]. Lines are comma separated; header lines start with a
//! letter and observation lines with a digit.

use crate::constants::{
    TIMESTAMP_FORMAT, UNNAMED_STORM, header_fields,
    observation_fields::{self, RADII_COUNT, RADII_START},
};
use crate::error::{AnalysisError, Result};
use crate::geodesy::to_point;
use crate::models::{Observation, StormHeader, WindRadii};
use chrono::NaiveDateTime;

/// What kind of record a raw line holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Header,
    Observation,
    Blank,
    Unrecognized,
}

/// Classify a line by its first character
pub fn classify(line: &str) -> LineKind {
    match line.chars().next() {
        Some(c) if c.is_alphabetic() => LineKind::Header,
        Some(c) if c.is_ascii_digit() => LineKind::Observation,
        _ if line.trim().is_empty() => LineKind::Blank,
        _ => LineKind::Unrecognized,
    }
}

fn split_fields(line: &str) -> Vec<&str> {
    line.split(',').map(str::trim).collect()
}

/// Parse a storm header line such as `AL092004, CHARLEY, 20,`
pub fn parse_header(line: &str) -> Result<StormHeader> {
    let fields = split_fields(line);
    if fields.len() < header_fields::MIN_FIELDS {
        return Err(AnalysisError::format(format!(
            "Header has {} field(s), expected at least {}",
            fields.len(),
            header_fields::MIN_FIELDS
        )));
    }

    let id = fields[header_fields::ID];
    if id.is_empty() {
        return Err(AnalysisError::format("Header has an empty storm id"));
    }

    let name = match fields[header_fields::NAME] {
        "" | UNNAMED_STORM => None,
        name => Some(name.to_string()),
    };

    let declared_count = match fields.get(header_fields::DECLARED_COUNT) {
        None | Some(&"") => None,
        Some(value) => Some(value.parse::<usize>().map_err(|e| {
            AnalysisError::format(format!("Invalid declared count '{}': {}", value, e))
        })?),
    };

    Ok(StormHeader {
        id: id.to_string(),
        name,
        declared_count,
    })
}

/// Parse the combined `YYYYMMDD` + `HHMM` key into a timestamp
pub fn parse_timestamp(date: &str, time: &str) -> Result<NaiveDateTime> {
    let key = format!("{}{}", date, time);
    NaiveDateTime::parse_from_str(&key, TIMESTAMP_FORMAT)
        .map_err(|source| AnalysisError::ElapsedTime { value: key, source })
}

fn parse_int(fields: &[&str], index: usize, name: &str) -> Result<i32> {
    let value = fields[index];
    value.parse::<i32>().map_err(|e| {
        AnalysisError::format(format!(
            "Invalid {} '{}' in field {}: {}",
            name, value, index, e
        ))
    })
}

/// Parse an observation line such as
/// `20040813, 1945, L, HU, 26.6N, 82.2W, 130, 942, 120, ...`
pub fn parse_observation(line: &str) -> Result<Observation> {
    let fields = split_fields(line);
    if fields.len() < observation_fields::MIN_FIELDS {
        return Err(AnalysisError::format(format!(
            "Observation has {} field(s), expected at least {}",
            fields.len(),
            observation_fields::MIN_FIELDS
        )));
    }

    let date = fields[observation_fields::DATE];
    let time = fields[observation_fields::TIME];
    let timestamp = parse_timestamp(date, time)?;

    let position = to_point(
        fields[observation_fields::LATITUDE],
        fields[observation_fields::LONGITUDE],
    )?;

    let max_wind = parse_int(&fields, observation_fields::MAX_WIND, "max wind")?;

    let mut radii = [0i32; RADII_COUNT];
    for (offset, slot) in radii.iter_mut().enumerate() {
        *slot = parse_int(&fields, RADII_START + offset, "wind radius")?;
    }

    Ok(Observation {
        timestamp,
        date: date.to_string(),
        time: time.to_string(),
        record_id: fields[observation_fields::RECORD_ID].to_string(),
        status: fields[observation_fields::STATUS].to_string(),
        position,
        max_wind,
        wind_radii: WindRadii::from_raw(radii),
    })
}
