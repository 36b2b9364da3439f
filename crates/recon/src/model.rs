use chrono::NaiveDateTime;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Attendance state
// ---------------------------------------------------------------------------

/// Tri-state attendance flag carried by both sides of a match.
///
/// `Unknown` is reserved for registrations whose update call failed; it is
/// deliberately distinct from `Absent` so a partial failure never reads as
/// "confirmed did not attend".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Attendance {
    #[default]
    Absent,
    Present,
    Unknown,
}

impl std::fmt::Display for Attendance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Absent => write!(f, "absent"),
            Self::Present => write!(f, "present"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Wire values accepted by the registration attendance field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AttendanceStatus {
    Attended,
    DidNotAttend,
    Unknown,
}

impl AttendanceStatus {
    /// The exact string the remote API expects.
    pub fn wire_value(&self) -> &'static str {
        match self {
            Self::Attended => "Attended",
            Self::DidNotAttend => "DidNotAttend",
            Self::Unknown => "Unknown",
        }
    }
}

// ---------------------------------------------------------------------------
// Report side (meeting platform)
// ---------------------------------------------------------------------------

/// One attendee row from the meeting platform's attendance report.
#[derive(Debug, Clone)]
pub struct SourceAttendee {
    pub name: String,
    pub email: String,
    /// Total minutes spent in the session (duplicate rows pre-merged).
    pub session_duration: f64,
    pub attendance: Attendance,
}

impl SourceAttendee {
    pub fn new(name: impl Into<String>, email: impl Into<String>, session_duration: f64) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            session_duration,
            attendance: Attendance::Absent,
        }
    }
}

/// A parsed attendance report: which event, when, and who showed up.
#[derive(Debug, Clone)]
pub struct Meeting {
    pub event_code: String,
    pub start_date: NaiveDateTime,
    /// Sorted by name for deterministic processing. Order does not affect
    /// matching correctness.
    pub attendees: Vec<SourceAttendee>,
}

impl Meeting {
    /// Sort attendees by name (case-insensitive), then email for ties.
    pub fn sort_attendees(&mut self) {
        self.attendees.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.email.cmp(&b.email))
        });
    }
}

// ---------------------------------------------------------------------------
// Registration side (event management platform)
// ---------------------------------------------------------------------------

/// One registration fetched from the remote platform. Transient — built per
/// reconciliation run, never persisted.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    /// Endpoint for the partial update of this registration's attendance
    /// field. Never empty.
    pub reg_href: String,
    pub attendance: Attendance,
}

impl Registration {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        reg_href: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            reg_href: reg_href.into(),
            attendance: Attendance::Absent,
        }
    }
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

/// The equality relation between a registration and a report attendee:
/// case-insensitive name match OR case-insensitive email match.
pub fn matches(registration: &Registration, attendee: &SourceAttendee) -> bool {
    registration.name.to_lowercase() == attendee.name.to_lowercase()
        || registration.email.to_lowercase() == attendee.email.to_lowercase()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn reg(name: &str, email: &str) -> Registration {
        Registration::new(name, email, "href")
    }

    fn att(name: &str, email: &str) -> SourceAttendee {
        SourceAttendee::new(name, email, 60.0)
    }

    #[test]
    fn test_matches_name_case_insensitive() {
        assert!(matches(&reg("Ada", "ada@x.com"), &att("ADA", "other@x.com")));
    }

    #[test]
    fn test_matches_email_case_insensitive() {
        assert!(matches(&reg("X", "a@x.com"), &att("Y", "A@X.COM")));
    }

    #[test]
    fn test_matches_neither() {
        assert!(!matches(&reg("X", "a@x.com"), &att("Y", "b@x.com")));
    }

    #[test]
    fn test_attendance_default_is_absent() {
        assert_eq!(Attendance::default(), Attendance::Absent);
        assert_eq!(reg("a", "b").attendance, Attendance::Absent);
        assert_eq!(att("a", "b").attendance, Attendance::Absent);
    }

    #[test]
    fn test_status_wire_values() {
        assert_eq!(AttendanceStatus::Attended.wire_value(), "Attended");
        assert_eq!(AttendanceStatus::DidNotAttend.wire_value(), "DidNotAttend");
        assert_eq!(AttendanceStatus::Unknown.wire_value(), "Unknown");
    }

    #[test]
    fn test_sort_attendees_by_name() {
        let mut meeting = Meeting {
            event_code: "CK24ABC".into(),
            start_date: chrono::NaiveDate::from_ymd_opt(2024, 9, 8)
                .unwrap()
                .and_hms_opt(18, 30, 0)
                .unwrap(),
            attendees: vec![
                att("maya Angelou", "maya@example.com"),
                att("Ada Lovelace", "ada@example.com"),
                att("Grace Hopper", "grace@example.com"),
            ],
        };
        meeting.sort_attendees();
        let names: Vec<&str> = meeting.attendees.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["Ada Lovelace", "Grace Hopper", "maya Angelou"]);
    }
}
