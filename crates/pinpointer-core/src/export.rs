//! Serializable report of a session: metadata, per-trial errors and
//! statistics.
//!
//! The payload is the only contract with whatever persists or renders the
//! results. It performs no file I/O itself; `write_csv` accepts any writer.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::frame::MeasurementFrame;
use crate::session::{Session, SkippedTrial};
use crate::stats::{ErrorDimension, SessionStatistics};
use crate::trial::{Point, Trial};

pub const CSV_TRIAL_HEADER: &str =
    "trial_index,target_x,target_y,measured_x,measured_y,error_x,error_y,error_radial";
pub const CSV_SUMMARY_HEADER: &str = "dimension,count,mean,stddev,variance,min,max";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionMetadata {
    pub target: Point,
    pub trial_count: usize,
    #[serde(default)]
    pub skipped_count: usize,
    #[serde(default)]
    pub frame: Option<MeasurementFrame>,
}

/// One exported trial row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrialRecord {
    pub index: u32,
    pub target: Point,
    pub measured: Point,
    pub error_x: f64,
    pub error_y: f64,
    pub error_radial: f64,
    /// Capture label; JSON only, the CSV columns stay fixed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl From<&Trial> for TrialRecord {
    fn from(t: &Trial) -> Self {
        Self {
            index: t.index(),
            target: t.target(),
            measured: t.measured(),
            error_x: t.error_x(),
            error_y: t.error_y(),
            error_radial: t.error_radial(),
            label: t.label().map(str::to_owned),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExportPayload {
    pub session: SessionMetadata,
    pub trials: Vec<TrialRecord>,
    #[serde(default)]
    pub skipped: Vec<SkippedTrial>,
    pub statistics: SessionStatistics,
}

/// Assemble the export payload for `session` and its computed `stats`.
pub fn export_payload(session: &Session, stats: &SessionStatistics) -> ExportPayload {
    ExportPayload {
        session: SessionMetadata {
            target: session.target(),
            trial_count: session.len(),
            skipped_count: session.skipped().len(),
            frame: session.frame().copied(),
        },
        trials: session.trials().iter().map(TrialRecord::from).collect(),
        skipped: session.skipped().to_vec(),
        statistics: *stats,
    }
}

impl ExportPayload {
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write the tabular form: one row per trial, a blank line, then one
    /// summary row per error dimension.
    pub fn write_csv<W: Write>(&self, mut out: W) -> io::Result<()> {
        writeln!(out, "{CSV_TRIAL_HEADER}")?;
        for t in &self.trials {
            writeln!(
                out,
                "{},{},{},{},{},{},{},{}",
                t.index,
                t.target.x,
                t.target.y,
                t.measured.x,
                t.measured.y,
                t.error_x,
                t.error_y,
                t.error_radial
            )?;
        }

        writeln!(out)?;
        writeln!(out, "{CSV_SUMMARY_HEADER}")?;
        for dim in ErrorDimension::ALL {
            let s = self.statistics.get(dim);
            writeln!(
                out,
                "{},{},{},{},{},{},{}",
                dim.name(),
                s.count,
                s.mean,
                s.std_dev,
                s.variance,
                s.min,
                s.max
            )?;
        }
        out.flush()
    }
}
