//! `rollcall-recon` — attendance reconciliation engine.
//!
//! Pure engine crate: receives a parsed meeting report and a registration
//! source, returns a reconciliation report. No CLI or IO dependencies —
//! the network client plugs in through [`engine::AttendanceApi`].

pub mod engine;
pub mod model;

pub use engine::{reconcile, AttendanceApi, ReconcileOptions, ReconcileReport};
pub use model::{matches, Attendance, AttendanceStatus, Meeting, Registration, SourceAttendee};
