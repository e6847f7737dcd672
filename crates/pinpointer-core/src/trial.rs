use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::error::PinpointError;
use crate::export::TrialRecord;

/// A location in the shared 2D analysis space.
pub type Point = Point2<f64>;

pub(crate) fn ensure_finite(p: &Point) -> Result<(), PinpointError> {
    if p.x.is_finite() && p.y.is_finite() {
        Ok(())
    } else {
        Err(PinpointError::InvalidCoordinate { x: p.x, y: p.y })
    }
}

/// One measured observation against a target, with its errors cached at
/// construction.
///
/// Deserializing goes through [`record_trial`]: the cached error fields of
/// the input are recomputed from its points, never trusted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TrialRecord")]
pub struct Trial {
    index: u32,
    measured: Point,
    target: Point,
    error_x: f64,
    error_y: f64,
    error_radial: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<String>,
}

impl Trial {
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn measured(&self) -> Point {
        self.measured
    }

    pub fn target(&self) -> Point {
        self.target
    }

    /// Signed `measured.x - target.x`.
    pub fn error_x(&self) -> f64 {
        self.error_x
    }

    /// Signed `measured.y - target.y`.
    pub fn error_y(&self) -> f64 {
        self.error_y
    }

    /// Euclidean distance between measured and target; always `>= 0`.
    pub fn error_radial(&self) -> f64 {
        self.error_radial
    }

    /// `(error_x, error_y, error_radial)`.
    pub fn errors(&self) -> [f64; 3] {
        [self.error_x, self.error_y, self.error_radial]
    }

    /// Capture label, e.g. the image file the measurement was taken from.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn with_label(mut self, label: Option<String>) -> Self {
        self.label = label;
        self
    }

    /// Recompute the cached errors from the stored points.
    pub(crate) fn rederive(self) -> Result<Trial, PinpointError> {
        Ok(record_trial(self.measured, self.target, self.index)?.with_label(self.label))
    }
}

impl TryFrom<TrialRecord> for Trial {
    type Error = PinpointError;

    fn try_from(record: TrialRecord) -> Result<Self, Self::Error> {
        Ok(record_trial(record.measured, record.target, record.index)?.with_label(record.label))
    }
}

/// Build a trial from a measured point and a target point.
///
/// Both points must be finite, and so must every derived error: offsets
/// beyond the `f64` range fail with [`PinpointError::OffsetOverflow`]. The
/// result depends only on the inputs.
pub fn record_trial(measured: Point, target: Point, index: u32) -> Result<Trial, PinpointError> {
    ensure_finite(&measured)?;
    ensure_finite(&target)?;

    let error_x = measured.x - target.x;
    let error_y = measured.y - target.y;
    // 0 only for a zero offset.
    let error_radial = error_x.hypot(error_y);
    if !(error_x.is_finite() && error_y.is_finite() && error_radial.is_finite()) {
        return Err(PinpointError::OffsetOverflow);
    }

    Ok(Trial {
        index,
        measured,
        target,
        error_x,
        error_y,
        error_radial,
        label: None,
    })
}
