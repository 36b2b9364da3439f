//! Attendance-report parsers.
//!
//! One submodule per supported meeting platform export format. Each
//! parser turns a report file into a [`Meeting`]: the event code, the
//! session start, and the de-duplicated attendee list.

pub mod butter;

use std::path::Path;

use clap::ValueEnum;
use rollcall_recon::Meeting;

/// Supported attendance-report formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Butter attendance report CSV export.
    Butter,
}

/// Report parsing failures. All fatal.
#[derive(Debug)]
pub enum ReportError {
    /// The report's room name carries no event code and none was given
    /// on the command line.
    EventCodeNotFound,
    /// I/O, CSV, or metadata parse failure.
    Processing(String),
}

impl std::fmt::Display for ReportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportError::EventCodeNotFound => write!(
                f,
                "The event code could not be found in the report's room name"
            ),
            ReportError::Processing(msg) => {
                write!(f, "Failed to process the attendance report: {}", msg)
            }
        }
    }
}

impl std::error::Error for ReportError {}

/// Parse an attendance report in the given format.
///
/// `event_code_hint` overrides whatever code the report itself carries.
pub fn get_attendees(
    format: ReportFormat,
    path: &Path,
    event_code_hint: Option<&str>,
) -> Result<Meeting, ReportError> {
    match format {
        ReportFormat::Butter => butter::get_attendees(path, event_code_hint),
    }
}
