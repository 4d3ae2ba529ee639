//! Report sinks for storm and dataset results.
//!
//! The analysis core hands every finished [`StormSummary`] and the final
//! [`DatasetSummary`] to a [`ReportSink`]. Sinks here render a console
//! report, a JSON document, or keep results in memory.

use crate::config::{ReportConfig, ReportFormat};
use crate::constants::{DATE_FORMAT, DISTANCE_PRECISION, RATE_PRECISION, SPEED_PRECISION};
use crate::error::Result;
use crate::models::{DatasetSummary, StormSummary};
use colored::*;
use serde::Serialize;
use std::io::Write;

/// Destination for analysis results
pub trait ReportSink {
    /// Called once per storm, in input order
    fn storm(&mut self, summary: &StormSummary) -> Result<()>;

    /// Called once after the last storm
    fn dataset(&mut self, summary: &DatasetSummary) -> Result<()>;
}

/// Build the sink selected by the report configuration
pub fn sink_for<'a>(config: &ReportConfig, writer: Box<dyn Write + 'a>) -> Box<dyn ReportSink + 'a> {
    match config.format {
        ReportFormat::Human => Box::new(ConsoleReport::new(writer, config)),
        ReportFormat::Json => Box::new(JsonReport::new(writer, config)),
    }
}

/// Optional coloring for console output
#[derive(Debug, Clone, Copy)]
struct Painter {
    color: bool,
}

impl Painter {
    fn label(self, text: &str) -> String {
        if self.color {
            text.bright_cyan().to_string()
        } else {
            text.to_string()
        }
    }

    fn heading(self, text: &str) -> String {
        if self.color {
            text.bright_green().bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn value(self, text: String) -> String {
        if self.color {
            text.bright_white().bold().to_string()
        } else {
            text
        }
    }
}

/// Human-readable report
pub struct ConsoleReport<W: Write> {
    writer: W,
    summary_only: bool,
    painter: Painter,
}

impl<W: Write> ConsoleReport<W> {
    pub fn new(writer: W, config: &ReportConfig) -> Self {
        Self {
            writer,
            summary_only: config.summary_only,
            painter: Painter {
                color: config.color,
            },
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ReportSink for ConsoleReport<W> {
    fn storm(&mut self, summary: &StormSummary) -> Result<()> {
        if self.summary_only {
            return Ok(());
        }

        let p = self.painter;
        let header = &summary.header;
        writeln!(
            self.writer,
            "{} {}",
            p.label("Storm System ID:"),
            p.value(header.id.clone())
        )?;
        if let Some(name) = &header.name {
            writeln!(self.writer, "{} {}", p.label("Storm System Name:"), name)?;
        }
        writeln!(
            self.writer,
            "{} {}",
            p.label("Landfall:"),
            summary.landfall_count
        )?;

        let peak = match &summary.peak_wind {
            Some(peak) => format!("{}  Date: {} Time: {}", peak.knots, peak.date, peak.time),
            None => "n/a".to_string(),
        };
        writeln!(
            self.writer,
            "{} {}",
            p.label("Highest Maximum sustained wind (in knots):"),
            peak
        )?;

        writeln!(
            self.writer,
            "{} {}",
            p.label("Start:"),
            summary.start.format(DATE_FORMAT)
        )?;
        writeln!(
            self.writer,
            "{} {}",
            p.label("End:"),
            summary.end.format(DATE_FORMAT)
        )?;
        writeln!(
            self.writer,
            "{} {:.*}",
            p.label("Total Distance:"),
            DISTANCE_PRECISION,
            summary.total_distance_nm
        )?;

        if summary.outcomes.is_empty() {
            writeln!(self.writer, "{} 0", p.label("Maximum propagation speed:"))?;
            writeln!(self.writer, "{} 0", p.label("Mean propagation speed:"))?;
        } else {
            writeln!(
                self.writer,
                "{} {:.*}",
                p.label("Maximum propagation speed:"),
                SPEED_PRECISION,
                summary.max_speed_kt
            )?;
            writeln!(
                self.writer,
                "{} {:.*}",
                p.label("Mean propagation speed:"),
                SPEED_PRECISION,
                summary.mean_speed_kt
            )?;
        }
        writeln!(self.writer)?;

        Ok(())
    }

    fn dataset(&mut self, summary: &DatasetSummary) -> Result<()> {
        let p = self.painter;
        writeln!(
            self.writer,
            "{}",
            p.heading("--------------------SUMMARY--------------------")
        )?;

        for year in &summary.years {
            writeln!(
                self.writer,
                "{} {} : {}",
                p.label("Total number of storms tracked in"),
                year.year,
                year.storms
            )?;
            writeln!(
                self.writer,
                "{} {} : {}",
                p.label("Total number of hurricanes tracked in"),
                year.year,
                year.hurricanes
            )?;
            writeln!(self.writer)?;
        }

        writeln!(
            self.writer,
            "{}",
            p.heading("------------------------------------------------")
        )?;
        let rate = format!("{:.*}%", RATE_PRECISION, summary.confirmation_rate);
        writeln!(
            self.writer,
            "{} of the time the hypothesis was true.",
            p.value(rate)
        )?;
        self.writer.flush()?;

        Ok(())
    }
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    storms: Option<&'a [StormSummary]>,
    summary: &'a DatasetSummary,
}

/// Single JSON document written when the dataset is complete
pub struct JsonReport<W: Write> {
    writer: W,
    summary_only: bool,
    storms: Vec<StormSummary>,
}

impl<W: Write> JsonReport<W> {
    pub fn new(writer: W, config: &ReportConfig) -> Self {
        Self {
            writer,
            summary_only: config.summary_only,
            storms: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ReportSink for JsonReport<W> {
    fn storm(&mut self, summary: &StormSummary) -> Result<()> {
        if !self.summary_only {
            self.storms.push(summary.clone());
        }
        Ok(())
    }

    fn dataset(&mut self, summary: &DatasetSummary) -> Result<()> {
        let document = JsonDocument {
            storms: (!self.summary_only).then_some(self.storms.as_slice()),
            summary,
        };
        serde_json::to_writer_pretty(&mut self.writer, &document)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Keeps every result in memory
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub storms: Vec<StormSummary>,
    pub dataset: Option<DatasetSummary>,
}

impl ReportSink for CollectingSink {
    fn storm(&mut self, summary: &StormSummary) -> Result<()> {
        self.storms.push(summary.clone());
        Ok(())
    }

    fn dataset(&mut self, summary: &DatasetSummary) -> Result<()> {
        self.dataset = Some(summary.clone());
        Ok(())
    }
}
