//! Streaming best-track processor.
//!
//! Drives a single pass over the input lines with an explicit two-state
//! machine: waiting for a storm header, or inside a storm accumulating
//! fixes until the next header or end of input. Each finished storm is
//! summarized, reported, and folded into the dataset aggregate.

use crate::config::GeodesyConfig;
use crate::constants::BYTE_ORDER_MARK;
use crate::dataset::DatasetAggregator;
use crate::error::{AnalysisError, Result};
use crate::geodesy::GeodesicSolver;
use crate::models::StormHeader;
use crate::parser::{LineKind, classify, parse_header, parse_observation};
use crate::report::ReportSink;
use crate::track::TrackAggregator;
use serde::Serialize;
use std::io::{self, BufRead};
use std::time::Instant;
use tracing::{debug, info};

/// Counters for one processing run
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProcessingStats {
    pub lines_read: usize,
    pub blank_lines: usize,
    pub storms: usize,
    pub observations: usize,
    pub legs: usize,
    pub processing_time_ms: u128,
}

/// Parser state between lines
enum ParseState {
    /// Before the first header, or never again once a storm has started
    ExpectHeader,
    /// A header was read and its first fix has not arrived yet
    ExpectFirstObservation { header: StormHeader },
    /// Inside a storm; the next line is a fix or the next header
    InStorm(Box<TrackAggregator>),
}

/// Single-pass processor over a best-track line source
#[derive(Debug, Clone, Default)]
pub struct TrackProcessor {
    solver: GeodesicSolver,
}

impl TrackProcessor {
    pub fn new(config: &GeodesyConfig) -> Self {
        Self {
            solver: GeodesicSolver::new(config),
        }
    }

    /// Process every line from a buffered reader
    pub fn run_reader<R: BufRead>(
        &self,
        reader: R,
        sink: &mut dyn ReportSink,
    ) -> Result<ProcessingStats> {
        self.run(reader.lines(), sink)
    }

    /// Process a line sequence, reporting each storm and then the dataset
    pub fn run<I>(&self, lines: I, sink: &mut dyn ReportSink) -> Result<ProcessingStats>
    where
        I: IntoIterator<Item = io::Result<String>>,
    {
        let start_time = Instant::now();
        let mut stats = ProcessingStats::default();
        let mut dataset = DatasetAggregator::new();
        let mut state = ParseState::ExpectHeader;
        let mut line_number = 0;

        for line in lines {
            line_number += 1;
            let line = line?;
            stats.lines_read += 1;

            let mut line = line.trim_end_matches('\r');
            if line_number == 1 {
                line = line.strip_prefix(BYTE_ORDER_MARK).unwrap_or(line);
            }
            state = self
                .step(state, line, &mut dataset, sink, &mut stats)
                .map_err(|e| {
                    debug!("Processing stopped at line {}: {}", line_number, e);
                    e.at_line(line_number)
                })?;
        }

        match state {
            ParseState::ExpectHeader => {}
            ParseState::ExpectFirstObservation { header } => {
                return Err(empty_storm(&header).at_line(line_number));
            }
            ParseState::InStorm(track) => {
                self.finish_storm(*track, &mut dataset, sink, &mut stats)?;
            }
        }

        let summary = dataset.finalize()?;
        sink.dataset(&summary)?;

        stats.processing_time_ms = start_time.elapsed().as_millis();
        info!(
            "Processed {} lines: {} storms, {} fixes, {} legs in {}ms",
            stats.lines_read,
            stats.storms,
            stats.observations,
            stats.legs,
            stats.processing_time_ms
        );

        Ok(stats)
    }

    fn step(
        &self,
        state: ParseState,
        line: &str,
        dataset: &mut DatasetAggregator,
        sink: &mut dyn ReportSink,
        stats: &mut ProcessingStats,
    ) -> Result<ParseState> {
        match (classify(line), state) {
            (LineKind::Blank, state) => {
                stats.blank_lines += 1;
                Ok(state)
            }
            (LineKind::Unrecognized, _) => Err(AnalysisError::format(format!(
                "Unrecognized record '{}'",
                line
            ))),
            (LineKind::Header, ParseState::ExpectHeader) => self.begin_storm(line),
            (LineKind::Header, ParseState::ExpectFirstObservation { header }) => {
                Err(empty_storm(&header))
            }
            (LineKind::Header, ParseState::InStorm(track)) => {
                self.finish_storm(*track, dataset, sink, stats)?;
                self.begin_storm(line)
            }
            (LineKind::Observation, ParseState::ExpectHeader) => Err(AnalysisError::format(
                "Observation found before any storm header",
            )),
            (LineKind::Observation, ParseState::ExpectFirstObservation { header }) => {
                let first = parse_observation(line)?;
                stats.observations += 1;
                Ok(ParseState::InStorm(Box::new(TrackAggregator::new(
                    self.solver,
                    header,
                    first,
                ))))
            }
            (LineKind::Observation, ParseState::InStorm(mut track)) => {
                track.push(parse_observation(line)?)?;
                stats.observations += 1;
                stats.legs += 1;
                Ok(ParseState::InStorm(track))
            }
        }
    }

    fn begin_storm(&self, line: &str) -> Result<ParseState> {
        let header = parse_header(line)?;
        debug!("Starting storm {} ({:?})", header.id, header.name);
        Ok(ParseState::ExpectFirstObservation { header })
    }

    fn finish_storm(
        &self,
        track: TrackAggregator,
        dataset: &mut DatasetAggregator,
        sink: &mut dyn ReportSink,
        stats: &mut ProcessingStats,
    ) -> Result<()> {
        let summary = track.finish();
        dataset.record(&summary);
        stats.storms += 1;
        sink.storm(&summary)
    }
}

fn empty_storm(header: &StormHeader) -> AnalysisError {
    AnalysisError::format(format!("Storm {} has no observations", header.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::CollectingSink;

    const TWO_STORMS: &str = "\
AL012001,            ALLISON,      3,
20010605, 0000,  , TS, 28.0N,  94.8W,  45, 1005,  100,   60,   40,   40,    0,    0,    0,    0,    0,    0,    0,    0,
20010605, 0600,  , HU, 28.0N,  95.4W,  65, 1000,  100,   60,   40,   40,    0,    0,    0,    0,    0,    0,    0,    0,
20010605, 1200, L, HU, 28.0N,  96.0W,  70,  998, -999, -999, -999, -999, -999, -999, -999, -999, -999, -999, -999, -999,

AL022003,            UNNAMED,      1,
20030710, 1800,  , TS, 15.0N,  50.0W,  40, 1008,    0,    0,    0,    0,    0,    0,    0,    0,    0,    0,    0,    0,
";

    fn lines(text: &str) -> Vec<io::Result<String>> {
        text.lines().map(|l| Ok(l.to_string())).collect()
    }

    #[test]
    fn test_two_storm_run() {
        let mut sink = CollectingSink::default();
        let stats = TrackProcessor::default()
            .run(lines(TWO_STORMS), &mut sink)
            .unwrap();

        assert_eq!(stats.storms, 2);
        assert_eq!(stats.observations, 4);
        assert_eq!(stats.legs, 2);
        assert_eq!(stats.blank_lines, 1);

        assert_eq!(sink.storms.len(), 2);
        let allison = &sink.storms[0];
        assert_eq!(allison.header.name.as_deref(), Some("ALLISON"));
        assert_eq!(allison.landfall_count, 1);
        assert!(allison.reached_hurricane);
        assert_eq!(allison.outcomes.len(), 2);

        let unnamed = &sink.storms[1];
        assert_eq!(unnamed.header.name, None);
        assert!(unnamed.outcomes.is_empty());

        let dataset = sink.dataset.unwrap();
        let years: Vec<(i32, usize, usize)> = dataset
            .years
            .iter()
            .map(|y| (y.year, y.storms, y.hurricanes))
            .collect();
        assert_eq!(years, vec![(2001, 1, 1), (2002, 0, 0), (2003, 1, 0)]);
        assert_eq!(dataset.tally.confirmed, 2);
        assert_eq!(dataset.confirmation_rate, 100.0);
    }

    #[test]
    fn test_crlf_line_endings() {
        let text = TWO_STORMS.replace('\n', "\r\n");
        let mut sink = CollectingSink::default();
        TrackProcessor::default()
            .run(text.split('\n').map(|l| Ok(l.to_string())), &mut sink)
            .unwrap();
        assert_eq!(sink.storms.len(), 2);
    }

    #[test]
    fn test_storm_crossing_antimeridian() {
        let text = "\
EP142015,            PACIFIC,      3,
20150901, 0000,  , HU, 10.0N, 179.5E,  90,  970,   60,  120,   60,   60,    0,    0,    0,    0,    0,    0,    0,    0,
20150901, 0600,  , HU, 10.0N, 179.5W,  95,  965,   60,  120,   60,   60,    0,    0,    0,    0,    0,    0,    0,    0,
20150901, 1200,  , HU, 10.0N, 190.0E, 100,  960,   60,  120,   60,   60,    0,    0,    0,    0,    0,    0,    0,    0,
";
        let mut sink = CollectingSink::default();
        let stats = TrackProcessor::default()
            .run(lines(text), &mut sink)
            .unwrap();
        assert_eq!(stats.legs, 2);

        let storm = &sink.storms[0];
        assert!((storm.total_distance_nm - 621.585_965).abs() < 1e-4);
        assert!((storm.max_speed_kt - 562.385_467 / 6.0).abs() < 1e-4);

        // Eastward headings fall in the south-east quadrant holding the maximum
        let dataset = sink.dataset.unwrap();
        assert_eq!(dataset.tally.confirmed, 2);
        assert_eq!(dataset.confirmation_rate, 100.0);
    }

    #[test]
    fn test_leading_byte_order_mark() {
        let text = format!("\u{feff}{}", TWO_STORMS);
        let mut sink = CollectingSink::default();
        let stats = TrackProcessor::default()
            .run(lines(&text), &mut sink)
            .unwrap();
        assert_eq!(stats.storms, 2);
        assert_eq!(sink.storms[0].header.id, "AL012001");
    }

    #[test]
    fn test_observation_before_header() {
        let text = "20010605, 0000,  , TS, 28.0N,  94.8W,  45, 1005,  100,   60,   40,   40,    0,    0,    0,    0,    0,    0,    0,    0,\n";
        let result = TrackProcessor::default().run(lines(text), &mut CollectingSink::default());
        assert!(matches!(result, Err(AnalysisError::Format { line: 1, .. })));
    }

    #[test]
    fn test_header_without_observations() {
        let text = "AL012001, ALLISON, 0,\nAL022001, BARRY, 1,\n";
        let result = TrackProcessor::default().run(lines(text), &mut CollectingSink::default());
        assert!(matches!(result, Err(AnalysisError::Format { line: 2, .. })));

        let text = "AL012001, ALLISON, 0,\n";
        let result = TrackProcessor::default().run(lines(text), &mut CollectingSink::default());
        assert!(matches!(result, Err(AnalysisError::Format { line: 1, .. })));
    }

    #[test]
    fn test_unrecognized_line() {
        let text = format!("{}# trailing comment\n", TWO_STORMS);
        let result = TrackProcessor::default().run(lines(&text), &mut CollectingSink::default());
        assert!(matches!(result, Err(AnalysisError::Format { line: 8, .. })));
    }

    #[test]
    fn test_malformed_observation_aborts_run() {
        let text = TWO_STORMS.replace("95.4W", "95.4Q");
        let mut sink = CollectingSink::default();
        let result = TrackProcessor::default().run(lines(&text), &mut sink);
        assert!(matches!(result, Err(AnalysisError::InvalidDirection { .. })));
        assert!(sink.storms.is_empty());
        assert!(sink.dataset.is_none());
    }

    #[test]
    fn test_no_usable_legs_is_no_data() {
        let text = "\
AL022003,            UNNAMED,      2,
20030710, 1800,  , TS, 15.0N,  50.0W,  40, 1008,    0,    0,    0,    0,    0,    0,    0,    0,    0,    0,    0,    0,
20030711, 0000,  , TS, 15.5N,  51.0W,  40, 1008,    0,    0,    0,    0,    0,    0,    0,    0,    0,    0,    0,    0,
";
        let mut sink = CollectingSink::default();
        let result = TrackProcessor::default().run(lines(text), &mut sink);
        assert!(matches!(result, Err(AnalysisError::NoData)));
        assert_eq!(sink.storms.len(), 1);
    }

    #[test]
    fn test_io_error_propagates() {
        let input = vec![
            Ok("AL012001, ALLISON, 1,".to_string()),
            Err(io::Error::new(io::ErrorKind::UnexpectedEof, "truncated")),
        ];
        let result = TrackProcessor::default().run(input, &mut CollectingSink::default());
        assert!(matches!(result, Err(AnalysisError::Io(_))));
    }
}
