//! Per-storm track aggregation.
//!
//! Streams one storm's fixes in order, computing each leg's distance,
//! bearing, propagation speed and hypothesis outcome, and finalizes a
//! [`StormSummary`] when the storm ends.

use crate::error::{AnalysisError, Result};
use crate::geodesy::GeodesicSolver;
use crate::hypothesis::evaluate_leg;
use crate::models::{Leg, Observation, PeakWind, Storm, StormHeader, StormSummary};
use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, warn};

/// Absolute time between two fixes in hours
pub fn elapsed_hours(previous: &NaiveDateTime, next: &NaiveDateTime) -> f64 {
    (*next - *previous).num_seconds().abs() as f64 / 3600.0
}

/// Incremental builder for a [`StormSummary`]
#[derive(Debug, Clone)]
pub struct TrackAggregator {
    solver: GeodesicSolver,
    header: StormHeader,
    start: NaiveDate,
    year: i32,
    previous: Observation,
    observation_count: usize,
    landfall_count: usize,
    peak_wind: Option<PeakWind>,
    reached_hurricane: bool,
    total_distance_nm: f64,
    speeds: Vec<f64>,
    legs: Vec<Leg>,
}

impl TrackAggregator {
    /// Start a track at its first fix
    pub fn new(solver: GeodesicSolver, header: StormHeader, first: Observation) -> Self {
        let mut aggregator = Self {
            solver,
            header,
            start: first.day(),
            year: first.year(),
            previous: first.clone(),
            observation_count: 0,
            landfall_count: 0,
            peak_wind: None,
            reached_hurricane: false,
            total_distance_nm: 0.0,
            speeds: Vec::new(),
            legs: Vec::new(),
        };
        aggregator.absorb(&first);
        aggregator
    }

    /// Update fix-level statistics: peak wind, landfalls, intensity
    fn absorb(&mut self, observation: &Observation) {
        self.observation_count += 1;

        let current_peak = self.peak_wind.as_ref().map_or(0, |p| p.knots);
        if observation.max_wind > current_peak {
            self.peak_wind = Some(PeakWind {
                knots: observation.max_wind,
                date: observation.date.clone(),
                time: observation.time.clone(),
                timestamp: observation.timestamp,
            });
        }

        if observation.is_landfall() {
            self.landfall_count += 1;
        }

        if observation.is_hurricane() {
            self.reached_hurricane = true;
        }
    }

    /// Add the next fix, returning the leg from the previous one
    pub fn push(&mut self, next: Observation) -> Result<Leg> {
        if next.timestamp < self.previous.timestamp {
            warn!(
                "Storm {}: fix {} {} precedes previous fix {} {}",
                self.header.id, next.date, next.time, self.previous.date, self.previous.time
            );
        }

        let hours = elapsed_hours(&self.previous.timestamp, &next.timestamp);
        let (distance_nm, bearing) = self
            .solver
            .distance_and_bearing(&self.previous.position, &next.position)?;

        let speed_kt = if hours > 0.0 {
            Some(distance_nm / hours)
        } else {
            debug!(
                "Storm {}: no time elapsed at {} {}, leg excluded from speeds",
                self.header.id, next.date, next.time
            );
            None
        };

        // Radii are read from the fix the leg departs
        let outcome = evaluate_leg(&self.previous.wind_radii, bearing);

        let leg = Leg {
            distance_nm,
            bearing,
            elapsed_hours: hours,
            speed_kt,
            outcome,
        };

        self.total_distance_nm += distance_nm;
        if let Some(speed) = speed_kt {
            self.speeds.push(speed);
        }
        self.legs.push(leg);

        self.absorb(&next);
        self.previous = next;

        Ok(leg)
    }

    /// Finalize the storm's summary
    pub fn finish(self) -> StormSummary {
        let max_speed_kt = self.speeds.iter().copied().fold(0.0, f64::max);
        let mean_speed_kt = if self.speeds.is_empty() {
            0.0
        } else {
            self.speeds.iter().sum::<f64>() / self.speeds.len() as f64
        };

        let summary = StormSummary {
            header: self.header,
            year: self.year,
            observation_count: self.observation_count,
            landfall_count: self.landfall_count,
            peak_wind: self.peak_wind,
            start: self.start,
            end: self.previous.day(),
            total_distance_nm: self.total_distance_nm,
            max_speed_kt,
            mean_speed_kt,
            outcomes: self.legs.iter().map(|leg| leg.outcome).collect(),
            reached_hurricane: self.reached_hurricane,
        };

        if !summary.declared_count_matches() {
            warn!(
                "Storm {} declares {:?} fixes but {} were read",
                summary.header.id, summary.header.declared_count, summary.observation_count
            );
        }

        debug!(
            "Storm {} finished: {} fixes, {:.2} nm, {} legs",
            summary.header.id,
            summary.observation_count,
            summary.total_distance_nm,
            summary.outcomes.len()
        );

        summary
    }
}

/// Summarize a fully materialized storm
pub fn summarize_storm(solver: GeodesicSolver, storm: &Storm) -> Result<StormSummary> {
    let mut observations = storm.observations.iter().cloned();
    let first = observations.next().ok_or_else(|| {
        AnalysisError::format(format!("Storm {} has no observations", storm.header.id))
    })?;

    let mut aggregator = TrackAggregator::new(solver, storm.header.clone(), first);
    for observation in observations {
        aggregator.push(observation)?;
    }

    Ok(aggregator.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GeoPoint, HypothesisOutcome, LegOutcome, SkipReason, WindRadii};
    use crate::parser::parse_timestamp;

    fn header() -> StormHeader {
        StormHeader {
            id: "AL012001".to_string(),
            name: Some("ALLISON".to_string()),
            declared_count: None,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn observation(
        date: &str,
        time: &str,
        lat: f64,
        lon: f64,
        wind: i32,
        status: &str,
        record_id: &str,
        radii: WindRadii,
    ) -> Observation {
        Observation {
            timestamp: parse_timestamp(date, time).unwrap(),
            date: date.to_string(),
            time: time.to_string(),
            record_id: record_id.to_string(),
            status: status.to_string(),
            position: GeoPoint::new(lat, lon).unwrap(),
            max_wind: wind,
            wind_radii: radii,
        }
    }

    fn northeast_radii() -> WindRadii {
        WindRadii::from_raw([150, 90, 60, 70, 60, 50, 35, 30, 40, 25, 20, 20])
    }

    #[test]
    fn test_elapsed_hours_is_absolute() {
        let a = parse_timestamp("20040813", "1200").unwrap();
        let b = parse_timestamp("20040813", "1800").unwrap();
        assert_eq!(elapsed_hours(&a, &b), 6.0);
        assert_eq!(elapsed_hours(&b, &a), 6.0);

        let c = parse_timestamp("20040815", "1800").unwrap();
        assert_eq!(elapsed_hours(&a, &c), 54.0);
    }

    #[test]
    fn test_single_observation_storm() {
        let first = observation("20010605", "1200", 28.0, -94.8, 45, "TS", "", WindRadii::no_data());
        let summary = TrackAggregator::new(GeodesicSolver::default(), header(), first).finish();

        assert_eq!(summary.start, summary.end);
        assert_eq!(summary.total_distance_nm, 0.0);
        assert_eq!(summary.max_speed_kt, 0.0);
        assert_eq!(summary.mean_speed_kt, 0.0);
        assert!(summary.outcomes.is_empty());
        assert_eq!(summary.observation_count, 1);
        assert_eq!(summary.year, 2001);
        assert_eq!(summary.peak_wind.unwrap().knots, 45);
    }

    #[test]
    fn test_track_statistics() {
        let radii = northeast_radii();
        let fixes = vec![
            observation("20010605", "0000", 28.0, -94.8, 45, "TS", "", radii.clone()),
            observation("20010605", "0600", 28.0, -95.4, 65, "HU", "", radii.clone()),
            observation("20010605", "1200", 28.0, -96.0, 70, "HU", "L", radii.clone()),
            observation("20010606", "0000", 28.1, -96.5, 70, "HU", "", radii),
        ];

        let storm = Storm {
            header: header(),
            observations: fixes,
        };
        let summary = summarize_storm(GeodesicSolver::default(), &storm).unwrap();

        assert_eq!(summary.observation_count, 4);
        assert_eq!(summary.landfall_count, 1);
        assert!(summary.reached_hurricane);
        assert_eq!(summary.start.to_string(), "2001-06-05");
        assert_eq!(summary.end.to_string(), "2001-06-06");

        // Peak keeps the first fix that reached it
        let peak = summary.peak_wind.unwrap();
        assert_eq!(peak.knots, 70);
        assert_eq!(peak.time, "1200");

        let expected_distance = 31.866_663_793 * 2.0 + 27.209_412_949;
        assert!((summary.total_distance_nm - expected_distance).abs() < 1e-6);

        // Speeds: 31.87/6, 31.87/6, 27.21/12
        assert!((summary.max_speed_kt - 31.866_663_793 / 6.0).abs() < 1e-6);
        let expected_mean = (31.866_663_793 / 6.0 * 2.0 + 27.209_412_949 / 12.0) / 3.0;
        assert!((summary.mean_speed_kt - expected_mean).abs() < 1e-6);

        // Westward legs: buckets (3, 0) hit the north-east maximum
        assert_eq!(summary.outcomes.len(), 3);
        assert!(
            summary
                .outcomes
                .iter()
                .all(|o| *o == LegOutcome::Evaluated(HypothesisOutcome::Confirmed))
        );
    }

    #[test]
    fn test_outcome_uses_departing_fix_radii() {
        let first = observation("20010605", "0000", 28.0, -94.8, 45, "TS", "", WindRadii::no_data());
        let mut aggregator = TrackAggregator::new(GeodesicSolver::default(), header(), first);

        let second = observation("20010605", "0600", 28.0, -95.4, 65, "HU", "", northeast_radii());
        let leg = aggregator.push(second).unwrap();
        assert_eq!(leg.outcome, LegOutcome::Skipped(SkipReason::NoRadiiData));

        let third = observation("20010605", "1200", 28.0, -96.0, 65, "HU", "", WindRadii::no_data());
        let leg = aggregator.push(third).unwrap();
        assert_eq!(leg.outcome, LegOutcome::Evaluated(HypothesisOutcome::Confirmed));
    }

    #[test]
    fn test_stationary_leg() {
        let radii = northeast_radii();
        let first = observation("20010605", "0000", 28.0, -94.8, 45, "TS", "", radii.clone());
        let mut aggregator = TrackAggregator::new(GeodesicSolver::default(), header(), first);

        let leg = aggregator
            .push(observation("20010605", "0600", 28.0, -94.8, 45, "TS", "", radii))
            .unwrap();

        assert_eq!(leg.distance_nm, 0.0);
        assert_eq!(leg.bearing, 0.0);
        assert_eq!(leg.speed_kt, Some(0.0));
        assert_eq!(leg.outcome, LegOutcome::Skipped(SkipReason::ZeroBearing));
    }

    #[test]
    fn test_zero_elapsed_time_excluded_from_speeds() {
        let radii = northeast_radii();
        let first = observation("20010605", "0000", 28.0, -94.8, 45, "TS", "", radii.clone());
        let mut aggregator = TrackAggregator::new(GeodesicSolver::default(), header(), first);

        let leg = aggregator
            .push(observation("20010605", "0000", 28.0, -95.4, 45, "TS", "L", radii.clone()))
            .unwrap();
        assert_eq!(leg.speed_kt, None);

        aggregator
            .push(observation("20010605", "0600", 28.0, -96.0, 45, "TS", "", radii))
            .unwrap();

        let summary = aggregator.finish();
        assert_eq!(summary.outcomes.len(), 2);
        assert!((summary.max_speed_kt - 31.866_663_793 / 6.0).abs() < 1e-6);
        assert_eq!(summary.max_speed_kt, summary.mean_speed_kt);
    }

    #[test]
    fn test_no_positive_wind_has_no_peak() {
        let first = observation("18510625", "0000", 28.0, -94.8, -99, "TS", "", WindRadii::no_data());
        let summary = TrackAggregator::new(GeodesicSolver::default(), header(), first).finish();
        assert!(summary.peak_wind.is_none());
    }

    #[test]
    fn test_summarize_empty_storm_fails() {
        let storm = Storm {
            header: header(),
            observations: Vec::new(),
        };
        assert!(matches!(
            summarize_storm(GeodesicSolver::default(), &storm),
            Err(AnalysisError::Format { .. })
        ));
    }
}
