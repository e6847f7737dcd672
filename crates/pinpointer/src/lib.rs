//! Facade crate for PinPointer, a motor skill acquisition error analysis tool.
//!
//! This crate provides:
//! - re-exports of the numeric core (`pinpointer-core`): trials, sessions,
//!   measurement frames, statistics and the export payload
//! - JSON session-file loading and JSON/CSV report writers in [`io`]
//! - (feature `cli`) the `pinpointer` command-line binary
//!
//! ## Quickstart
//!
//! ```no_run
//! use pinpointer::io::{analyze_session_file, write_report_csv};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let report = analyze_session_file("session.json")?;
//! println!("mean radial error: {:.2}", report.statistics.radial.mean);
//! write_report_csv(&report, "session.csv")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Session file
//!
//! ```json
//! {
//!   "target": [412.0, 318.5],
//!   "frame": {
//!     "orientation": "right_up",
//!     "scale": { "reference_distance": 50.0, "reference_points": [[10, 10], [10, 510]] }
//!   },
//!   "trials": [
//!     { "index": 0, "measured": [430.0, 300.0], "label": "IMG_0412.jpg" },
//!     { "index": 1, "skipped": "out_of_bounds" }
//!   ]
//! }
//! ```
//!
//! `frame` is optional; without it raw coordinates are used unchanged.
//! `label` is optional and is copied into the JSON report.

pub use pinpointer_core as core;

pub use pinpointer_core::{
    compute_statistics, export_payload, record_trial, AxisOrientation, ErrorStatistics,
    ExportPayload, MeasurementFrame, PinpointError, Point, ScaleCalibration, Session,
    SessionStatistics, SharedSession, SkipReason, Trial,
};

pub mod io;
