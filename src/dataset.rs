//! Dataset-wide aggregation.
//!
//! Accumulates storm summaries into yearly storm and hurricane counts and a
//! global hypothesis tally. Accumulation is order independent, so partial
//! aggregators can be merged.

use crate::error::{AnalysisError, Result};
use crate::models::{DatasetSummary, OutcomeTally, StormSummary, YearlyCounts};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Stateful accumulator over [`StormSummary`] values
#[derive(Debug, Clone, Default)]
pub struct DatasetAggregator {
    storms_by_year: BTreeMap<i32, usize>,
    hurricanes_by_year: BTreeMap<i32, usize>,
    tally: OutcomeTally,
    total_storms: usize,
}

impl DatasetAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one storm
    pub fn record(&mut self, summary: &StormSummary) {
        *self.storms_by_year.entry(summary.year).or_default() += 1;
        if summary.reached_hurricane {
            *self.hurricanes_by_year.entry(summary.year).or_default() += 1;
        }

        for outcome in &summary.outcomes {
            self.tally.record(*outcome);
        }
        self.total_storms += 1;

        debug!(
            "Recorded storm {} ({}): {} storms so far",
            summary.header.id, summary.year, self.total_storms
        );
    }

    /// Fold another aggregator's counts into this one
    pub fn merge(&mut self, other: &DatasetAggregator) {
        for (year, count) in &other.storms_by_year {
            *self.storms_by_year.entry(*year).or_default() += count;
        }
        for (year, count) in &other.hurricanes_by_year {
            *self.hurricanes_by_year.entry(*year).or_default() += count;
        }
        self.tally.merge(&other.tally);
        self.total_storms += other.total_storms;
    }

    pub fn total_storms(&self) -> usize {
        self.total_storms
    }

    pub fn tally(&self) -> &OutcomeTally {
        &self.tally
    }

    /// Counts for every year from the earliest to the latest storm
    pub fn yearly_counts(&self) -> Vec<YearlyCounts> {
        let (Some(first), Some(last)) = (
            self.storms_by_year.keys().next(),
            self.storms_by_year.keys().next_back(),
        ) else {
            return Vec::new();
        };

        (*first..=*last)
            .map(|year| YearlyCounts {
                year,
                storms: self.storms_by_year.get(&year).copied().unwrap_or(0),
                hurricanes: self.hurricanes_by_year.get(&year).copied().unwrap_or(0),
            })
            .collect()
    }

    /// Produce the dataset summary.
    ///
    /// Fails with `NoData` when no leg produced a determinable outcome.
    pub fn finalize(&self) -> Result<DatasetSummary> {
        let confirmation_rate = self.tally.confirmation_rate().ok_or(AnalysisError::NoData)?;

        info!(
            "Dataset finalized: {} storms, {} legs evaluated, {:.2}% confirmed",
            self.total_storms,
            self.tally.evaluated(),
            confirmation_rate
        );

        Ok(DatasetSummary {
            years: self.yearly_counts(),
            total_storms: self.total_storms,
            tally: self.tally,
            confirmation_rate,
        })
    }
}
