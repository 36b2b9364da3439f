//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success                                  |
//! | 1       | Universal        | General error (unspecified)              |
//! | 2       | Universal        | CLI usage error (bad args, missing file) |
//! | 10-14   | arlo             | Arlo API / credential codes              |
//! | 15      | report           | Attendance report parsing                |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

use rollcall_arlo::ArloError;

use crate::parse::ReportError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Arlo (10-14)
// =============================================================================

/// No credentials: nothing stored and no env override.
pub const EXIT_NO_CREDENTIALS: u8 = 10;

/// Credentials rejected by the API (401). The stored pair is forgotten.
pub const EXIT_AUTH: u8 = 11;

/// Transport failure, unexpected HTTP status, or malformed response.
pub const EXIT_API: u8 = 12;

/// No event carries the requested event code.
pub const EXIT_EVENT_NOT_FOUND: u8 = 13;

/// The event has no session on the requested date.
pub const EXIT_SESSION_NOT_FOUND: u8 = 14;

// =============================================================================
// Report (15)
// =============================================================================

/// Attendance report could not be parsed.
pub const EXIT_REPORT: u8 = 15;

// =============================================================================
// Error-to-code mapping
// =============================================================================

/// Map an ArloError to its exit code.
pub fn arlo_exit_code(err: &ArloError) -> u8 {
    match err {
        ArloError::CredentialsNotFound => EXIT_NO_CREDENTIALS,
        ArloError::AuthenticationFailed => EXIT_AUTH,
        ArloError::ApiCommunicationFailure(_) => EXIT_API,
        ArloError::MalformedResponse(_) => EXIT_API,
        ArloError::EventNotFound(_) => EXIT_EVENT_NOT_FOUND,
        ArloError::SessionNotFound(_) => EXIT_SESSION_NOT_FOUND,
    }
}

/// Map a ReportError to its exit code.
pub fn report_exit_code(err: &ReportError) -> u8 {
    match err {
        ReportError::EventCodeNotFound => EXIT_REPORT,
        ReportError::Processing(_) => EXIT_REPORT,
    }
}
