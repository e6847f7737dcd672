//! JSON session files and report writers.

use std::{
    fs,
    io::BufWriter,
    path::{Path, PathBuf},
};

use pinpointer_core::{
    compute_statistics, export_payload, AxisOrientation, ExportPayload, MeasurementFrame,
    PinpointError, Point, ScaleCalibration, Session, SkipReason,
};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

#[derive(thiserror::Error, Debug)]
pub enum PinpointerIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Core(#[from] PinpointError),
    #[error("axis orientation index {0} is out of range (expected 0..=3)")]
    InvalidOrientation(usize),
}

/// Axis orientation, by name (`"right_up"`) or picker index (`0..=3`).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OrientationSpec {
    Named(AxisOrientation),
    Index(usize),
}

impl Default for OrientationSpec {
    fn default() -> Self {
        Self::Named(AxisOrientation::default())
    }
}

impl OrientationSpec {
    pub fn resolve(self) -> Result<AxisOrientation, PinpointerIoError> {
        match self {
            OrientationSpec::Named(o) => Ok(o),
            OrientationSpec::Index(i) => {
                AxisOrientation::from_index(i).ok_or(PinpointerIoError::InvalidOrientation(i))
            }
        }
    }
}

/// Real-world scale: a known factor, or two reference points a known
/// distance apart.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScaleSpec {
    Factor {
        factor: f64,
    },
    Reference {
        reference_distance: f64,
        reference_points: [Point; 2],
    },
}

impl ScaleSpec {
    pub fn resolve(self) -> Result<ScaleCalibration, PinpointError> {
        match self {
            ScaleSpec::Factor { factor } => ScaleCalibration::from_factor(factor),
            ScaleSpec::Reference {
                reference_distance,
                reference_points: [a, b],
            } => ScaleCalibration::from_reference(reference_distance, a, b),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameSpec {
    #[serde(default)]
    pub orientation: OrientationSpec,
    #[serde(default)]
    pub scale: Option<ScaleSpec>,
}

impl FrameSpec {
    pub fn resolve(&self) -> Result<MeasurementFrame, PinpointerIoError> {
        let orientation = self.orientation.resolve()?;
        let scale = match self.scale {
            Some(spec) => spec.resolve()?,
            None => ScaleCalibration::identity(),
        };
        Ok(MeasurementFrame::new(orientation, scale))
    }
}

/// One captured trial: either a measured point or a skip marker. `label`
/// names the capture (usually the image file) and is carried into the report.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TrialEntry {
    Measured {
        index: u32,
        measured: Point,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },
    Skipped {
        index: u32,
        skipped: SkipReason,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },
}

/// Captured session, as written by the capture front end.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionFile {
    pub target: Point,
    #[serde(default)]
    pub frame: Option<FrameSpec>,
    #[serde(default)]
    pub trials: Vec<TrialEntry>,
}

impl SessionFile {
    /// Load a JSON session file from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, PinpointerIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this session file to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), PinpointerIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Build an open session, mapping points through the frame if present.
    pub fn into_session(&self) -> Result<Session, PinpointerIoError> {
        let mut session = match &self.frame {
            Some(spec) => Session::with_frame(self.target, spec.resolve()?)?,
            None => Session::new(self.target)?,
        };
        for entry in &self.trials {
            match entry {
                TrialEntry::Measured {
                    index,
                    measured,
                    label,
                } => {
                    session.record_raw_labeled(*measured, *index, label.clone())?;
                }
                TrialEntry::Skipped {
                    index,
                    skipped,
                    label,
                } => session.skip_labeled(*index, *skipped, label.clone())?,
            }
        }
        Ok(session)
    }
}

/// Load a session file, compute its statistics and build the report.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))
)]
pub fn analyze_session_file(path: impl AsRef<Path>) -> Result<ExportPayload, PinpointerIoError> {
    let file = SessionFile::load_json(path)?;
    let mut session = file.into_session()?;
    let stats = compute_statistics(&mut session)?;
    log::info!(
        "analyzed {} trials: mean radial error {:.4}",
        stats.radial.count,
        stats.radial.mean
    );
    Ok(export_payload(&session, &stats))
}

/// `<dir>/<stem>_report.json` next to the session file.
pub fn default_report_path(session_path: &Path) -> PathBuf {
    let stem = session_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "session".to_string());
    session_path.with_file_name(format!("{stem}_report.json"))
}

/// Write the report to disk as pretty JSON.
pub fn write_report_json(
    payload: &ExportPayload,
    path: impl AsRef<Path>,
) -> Result<(), PinpointerIoError> {
    fs::write(path, payload.to_json_pretty()?)?;
    Ok(())
}

/// Load a report previously written by [`write_report_json`].
pub fn load_report_json(path: impl AsRef<Path>) -> Result<ExportPayload, PinpointerIoError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Write the report in its tabular CSV form.
pub fn write_report_csv(
    payload: &ExportPayload,
    path: impl AsRef<Path>,
) -> Result<(), PinpointerIoError> {
    let file = fs::File::create(path)?;
    payload.write_csv(BufWriter::new(file))?;
    Ok(())
}
