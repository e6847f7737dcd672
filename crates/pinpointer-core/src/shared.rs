//! Thread-safe session handle for hosts that capture and export concurrently.
//!
//! One mutex guards both the trial list and the `Open -> Closed` transition,
//! so an export never observes a half-appended trial and no append can slip
//! in after statistics were reported.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::PinpointError;
use crate::export::{export_payload, ExportPayload};
use crate::session::{Session, SkipReason};
use crate::stats::{compute_statistics, SessionStatistics};
use crate::trial::{Point, Trial};

#[derive(Clone, Debug)]
pub struct SharedSession {
    inner: Arc<Mutex<Session>>,
}

impl SharedSession {
    pub fn new(session: Session) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Session>, PinpointError> {
        self.inner.lock().map_err(|_| PinpointError::LockPoisoned)
    }

    pub fn record_trial(&self, measured: Point, index: u32) -> Result<Trial, PinpointError> {
        self.lock()?.record_trial(measured, index).cloned()
    }

    pub fn record_raw(&self, raw_measured: Point, index: u32) -> Result<Trial, PinpointError> {
        self.lock()?.record_raw(raw_measured, index).cloned()
    }

    pub fn skip_trial(&self, index: u32, reason: SkipReason) -> Result<(), PinpointError> {
        self.lock()?.skip_trial(index, reason)
    }

    pub fn compute_statistics(&self) -> Result<SessionStatistics, PinpointError> {
        compute_statistics(&mut *self.lock()?)
    }

    /// Compute statistics and build the payload under one lock acquisition.
    pub fn export(&self) -> Result<ExportPayload, PinpointError> {
        let mut session = self.lock()?;
        let stats = compute_statistics(&mut session)?;
        Ok(export_payload(&session, &stats))
    }

    pub fn snapshot(&self) -> Result<Session, PinpointError> {
        Ok(self.lock()?.clone())
    }

    pub fn is_closed(&self) -> Result<bool, PinpointError> {
        Ok(self.lock()?.is_closed())
    }
}

impl From<Session> for SharedSession {
    fn from(session: Session) -> Self {
        Self::new(session)
    }
}
