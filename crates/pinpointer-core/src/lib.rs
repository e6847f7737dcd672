//! Positional error measurement and per-session error statistics.
//!
//! The crate is purely numeric and does no file I/O:
//! - [`record_trial`] turns a measured point and a target point into a
//!   [`Trial`] with cached x, y and radial errors,
//! - a [`Session`] collects trials against one target and closes once
//!   statistics are reported,
//! - [`compute_statistics`] summarizes each error dimension,
//! - [`export_payload`] builds the serializable report.
//!
//! A [`MeasurementFrame`] maps raw capture coordinates (image pixels) into
//! oriented, real-world units before recording.
//!
//! Progress is reported through the `log` macros; installing a logger is left
//! to the application.
//!
//! ```
//! use nalgebra::Point2;
//! use pinpointer_core::{compute_statistics, Session};
//!
//! let mut session = Session::new(Point2::new(0.0, 0.0))?;
//! session.record_trial(Point2::new(1.0, 2.0), 0)?;
//! session.record_trial(Point2::new(-1.0, 0.0), 1)?;
//!
//! let stats = compute_statistics(&mut session)?;
//! assert_eq!(stats.x.mean, 0.0);
//! assert_eq!(stats.x.std_dev, 1.0);
//! assert!(session.is_closed());
//! # Ok::<(), pinpointer_core::PinpointError>(())
//! ```

mod error;
mod export;
mod frame;
mod session;
mod shared;
mod stats;
mod trial;

pub use error::PinpointError;
pub use export::{
    export_payload, ExportPayload, SessionMetadata, TrialRecord, CSV_SUMMARY_HEADER,
    CSV_TRIAL_HEADER,
};
pub use frame::{AxisOrientation, MeasurementFrame, ScaleCalibration};
pub use session::{Session, SessionState, SkipReason, SkippedTrial};
pub use shared::SharedSession;
pub use stats::{compute_statistics, ErrorDimension, ErrorStatistics, SessionStatistics};
pub use trial::{record_trial, Point, Trial};
