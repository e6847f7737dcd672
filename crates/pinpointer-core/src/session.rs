//! Ordered trial collection sharing one target.
//!
//! A session starts `Open` and accepts appends. The first successful
//! statistics computation moves it to `Closed`, after which every append is
//! rejected so reported statistics always describe the final trial set.

use serde::{Deserialize, Serialize};

use crate::error::PinpointError;
use crate::frame::MeasurementFrame;
use crate::trial::{ensure_finite, record_trial, Point, Trial};

/// Lifecycle state of a [`Session`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Open,
    Closed,
}

/// Why a captured trial produced no usable measurement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// No capture exists for this trial.
    NoImage,
    /// The object landed outside the capture area.
    OutOfBounds,
}

/// A trial slot that is kept in the record but excluded from statistics.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedTrial {
    pub index: u32,
    pub reason: SkipReason,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Session {
    target: Point,
    frame: Option<MeasurementFrame>,
    trials: Vec<Trial>,
    skipped: Vec<SkippedTrial>,
    last_index: Option<u32>,
    state: SessionState,
}

impl Session {
    /// Create an empty, open session around a target in analysis coordinates.
    pub fn new(target: Point) -> Result<Self, PinpointError> {
        ensure_finite(&target)?;
        Ok(Self {
            target,
            frame: None,
            trials: Vec::new(),
            skipped: Vec::new(),
            last_index: None,
            state: SessionState::Open,
        })
    }

    /// Create a session whose points are captured in raw coordinates and
    /// mapped through `frame`. `raw_target` is mapped the same way.
    pub fn with_frame(raw_target: Point, frame: MeasurementFrame) -> Result<Self, PinpointError> {
        let mut session = Self::new(frame.to_frame(raw_target)?)?;
        session.frame = Some(frame);
        Ok(session)
    }

    pub fn target(&self) -> Point {
        self.target
    }

    pub fn frame(&self) -> Option<&MeasurementFrame> {
        self.frame.as_ref()
    }

    pub fn trials(&self) -> &[Trial] {
        &self.trials
    }

    pub fn skipped(&self) -> &[SkippedTrial] {
        &self.skipped
    }

    /// Number of recorded trials (skipped slots excluded).
    pub fn len(&self) -> usize {
        self.trials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trials.is_empty()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_closed(&self) -> bool {
        self.state == SessionState::Closed
    }

    /// Record a measurement against the session target.
    ///
    /// On error the session is left untouched.
    pub fn record_trial(&mut self, measured: Point, index: u32) -> Result<&Trial, PinpointError> {
        self.record_labeled(measured, index, None)
    }

    /// [`Session::record_trial`] with a capture label attached to the trial.
    pub fn record_labeled(
        &mut self,
        measured: Point,
        index: u32,
        label: Option<String>,
    ) -> Result<&Trial, PinpointError> {
        self.check_append(index)?;
        let trial = record_trial(measured, self.target, index)?.with_label(label);
        Ok(self.append(trial))
    }

    /// Record a measurement given in raw capture coordinates. Without a frame
    /// this is the same as [`Session::record_trial`].
    pub fn record_raw(&mut self, raw_measured: Point, index: u32) -> Result<&Trial, PinpointError> {
        self.record_raw_labeled(raw_measured, index, None)
    }

    pub fn record_raw_labeled(
        &mut self,
        raw_measured: Point,
        index: u32,
        label: Option<String>,
    ) -> Result<&Trial, PinpointError> {
        let measured = match &self.frame {
            Some(frame) => frame.to_frame(raw_measured)?,
            None => raw_measured,
        };
        self.record_labeled(measured, index, label)
    }

    /// Append a trial built elsewhere; its target must be the session target.
    ///
    /// The cached errors are recomputed from the trial's points.
    pub fn push_trial(&mut self, trial: Trial) -> Result<&Trial, PinpointError> {
        self.check_append(trial.index())?;
        if trial.target() != self.target {
            return Err(PinpointError::TargetMismatch);
        }
        let trial = trial.rederive()?;
        Ok(self.append(trial))
    }

    /// Reserve `index` for a trial without a usable measurement.
    pub fn skip_trial(&mut self, index: u32, reason: SkipReason) -> Result<(), PinpointError> {
        self.skip_labeled(index, reason, None)
    }

    pub fn skip_labeled(
        &mut self,
        index: u32,
        reason: SkipReason,
        label: Option<String>,
    ) -> Result<(), PinpointError> {
        self.check_append(index)?;
        log::warn!("trial {index} skipped ({reason:?})");
        self.skipped.push(SkippedTrial {
            index,
            reason,
            label,
        });
        self.last_index = Some(index);
        Ok(())
    }

    pub(crate) fn close(&mut self) {
        if self.state == SessionState::Open {
            log::info!(
                "session closed with {} trials ({} skipped)",
                self.trials.len(),
                self.skipped.len()
            );
            self.state = SessionState::Closed;
        }
    }

    fn append(&mut self, trial: Trial) -> &Trial {
        log::debug!(
            "trial {}: error_x={:.4} error_y={:.4} radial={:.4}",
            trial.index(),
            trial.error_x(),
            trial.error_y(),
            trial.error_radial()
        );
        self.last_index = Some(trial.index());
        self.trials.push(trial);
        &self.trials[self.trials.len() - 1]
    }

    fn contains_index(&self, index: u32) -> bool {
        self.trials
            .binary_search_by_key(&index, Trial::index)
            .is_ok()
            || self
                .skipped
                .binary_search_by_key(&index, |s| s.index)
                .is_ok()
    }

    fn check_append(&self, index: u32) -> Result<(), PinpointError> {
        if self.state == SessionState::Closed {
            return Err(PinpointError::SessionClosed);
        }
        if self.contains_index(index) {
            return Err(PinpointError::DuplicateIndex { index });
        }
        match self.last_index {
            Some(last) if index < last => Err(PinpointError::NonMonotonicIndex { index, last }),
            _ => Ok(()),
        }
    }
}
