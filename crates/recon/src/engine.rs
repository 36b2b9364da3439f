use chrono::NaiveDate;
use serde::Serialize;

use crate::model::{matches, Attendance, AttendanceStatus, Meeting};
use crate::model::Registration;

// ---------------------------------------------------------------------------
// Seam to the remote platform
// ---------------------------------------------------------------------------

/// The registration source the engine drives. Implemented by the HTTP
/// client; faked in tests.
pub trait AttendanceApi {
    type Error;

    /// Resolve the event and session, then return its registrations in
    /// wire order. Cancelled registrations are already filtered out.
    fn registrations(
        &mut self,
        event_code: &str,
        session_date: NaiveDate,
    ) -> Result<Vec<Registration>, Self::Error>;

    /// Issue the partial update for one registration. `false` on any
    /// failure — update failures are per-record, never fatal.
    fn update_attendance(&mut self, reg_href: &str, status: AttendanceStatus) -> bool;
}

// ---------------------------------------------------------------------------
// Options and report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct ReconcileOptions {
    /// Minimum minutes in the session to count as present. The gate is
    /// strict: a duration equal to the minimum does not count.
    pub min_duration: f64,
    /// Skip registrations with no present attendee entirely (no update,
    /// no report row).
    pub skip_absent: bool,
    /// Compute statuses but issue no updates.
    pub dry_run: bool,
}

/// One processed registration, in encounter order.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationRow {
    pub name: String,
    pub email: String,
    pub attendance: Attendance,
}

/// A report attendee that never matched any registration.
#[derive(Debug, Clone, Serialize)]
pub struct UnregisteredRow {
    pub name: String,
    pub email: String,
    pub session_duration: f64,
    /// True when the attendee's duration did not clear the minimum, i.e.
    /// a match would not have counted anyway.
    pub below_threshold: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconcileReport {
    pub registrations: Vec<RegistrationRow>,
    pub unregistered: Vec<UnregisteredRow>,
}

impl ReconcileReport {
    /// Registrations whose update failed this run.
    pub fn failed_updates(&self) -> impl Iterator<Item = &RegistrationRow> {
        self.registrations
            .iter()
            .filter(|r| r.attendance == Attendance::Unknown)
    }
}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

/// Reconcile a parsed meeting report against the remote registrations and
/// push attendance statuses.
///
/// Marks matched attendees on both sides (the unregistered table is
/// computed from the report side afterwards), applies the duration gate,
/// and isolates per-record update failures as [`Attendance::Unknown`] so
/// one failed PATCH never aborts the batch.
pub fn reconcile<A: AttendanceApi>(
    api: &mut A,
    meeting: &mut Meeting,
    opts: &ReconcileOptions,
) -> Result<ReconcileReport, A::Error> {
    let mut registrations =
        api.registrations(&meeting.event_code, meeting.start_date.date())?;

    let mut rows = Vec::with_capacity(registrations.len());
    for reg in &mut registrations {
        // The duration gate decides presence, not matching: an attendee at
        // or below the minimum stays absent even on a name/email match.
        if let Some(idx) = meeting.attendees.iter().position(|a| matches(reg, a)) {
            if meeting.attendees[idx].session_duration > opts.min_duration {
                meeting.attendees[idx].attendance = Attendance::Present;
                reg.attendance = Attendance::Present;
            }
        }

        let present = reg.attendance == Attendance::Present;
        if opts.skip_absent && !present {
            continue;
        }

        if !opts.dry_run {
            let status = if present {
                AttendanceStatus::Attended
            } else {
                AttendanceStatus::DidNotAttend
            };
            if !api.update_attendance(&reg.reg_href, status) {
                reg.attendance = Attendance::Unknown;
            }
        }

        rows.push(RegistrationRow {
            name: reg.name.clone(),
            email: reg.email.clone(),
            attendance: reg.attendance,
        });
    }

    let unregistered = meeting
        .attendees
        .iter()
        .filter(|a| a.attendance == Attendance::Absent)
        .map(|a| UnregisteredRow {
            name: a.name.clone(),
            email: a.email.clone(),
            session_duration: a.session_duration,
            below_threshold: a.session_duration <= opts.min_duration,
        })
        .collect();

    Ok(ReconcileReport {
        registrations: rows,
        unregistered,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SourceAttendee;
    use std::collections::VecDeque;

    /// Scripted in-memory registration source.
    struct FakeApi {
        regs: Vec<Registration>,
        /// Scripted results for successive update calls; empty = always ok.
        update_results: VecDeque<bool>,
        update_calls: Vec<(String, AttendanceStatus)>,
    }

    impl FakeApi {
        fn new(regs: Vec<Registration>) -> Self {
            Self {
                regs,
                update_results: VecDeque::new(),
                update_calls: Vec::new(),
            }
        }

        fn with_update_results(mut self, results: &[bool]) -> Self {
            self.update_results = results.iter().copied().collect();
            self
        }
    }

    impl AttendanceApi for FakeApi {
        type Error = std::convert::Infallible;

        fn registrations(
            &mut self,
            _event_code: &str,
            _session_date: NaiveDate,
        ) -> Result<Vec<Registration>, Self::Error> {
            Ok(self.regs.clone())
        }

        fn update_attendance(&mut self, reg_href: &str, status: AttendanceStatus) -> bool {
            self.update_calls.push((reg_href.to_string(), status));
            self.update_results.pop_front().unwrap_or(true)
        }
    }

    fn test_meeting() -> Meeting {
        Meeting {
            event_code: "CK24ABC".into(),
            start_date: NaiveDate::from_ymd_opt(2024, 9, 8)
                .unwrap()
                .and_hms_opt(18, 30, 0)
                .unwrap(),
            attendees: vec![
                SourceAttendee::new("Amelia Earhart", "amelia@example.com", 110.0),
                SourceAttendee::new("Maya Angelou", "maya@example.com", 60.0),
            ],
        }
    }

    fn run(
        api: &mut FakeApi,
        meeting: &mut Meeting,
        opts: &ReconcileOptions,
    ) -> ReconcileReport {
        reconcile(api, meeting, opts).unwrap()
    }

    #[test]
    fn test_matched_attendee_marked_and_updated() {
        let mut api = FakeApi::new(vec![Registration::new(
            "Maya Angelou",
            "maya@example.com",
            "href1",
        )]);
        let mut meeting = test_meeting();

        let report = run(&mut api, &mut meeting, &ReconcileOptions::default());

        assert_eq!(
            api.update_calls,
            vec![("href1".to_string(), AttendanceStatus::Attended)]
        );
        assert_eq!(report.registrations.len(), 1);
        assert_eq!(report.registrations[0].attendance, Attendance::Present);
        // Both sides marked: Maya is not in the unregistered table.
        assert!(report.unregistered.iter().all(|u| u.name != "Maya Angelou"));
    }

    #[test]
    fn test_unmatched_registration_marked_absent() {
        let mut api = FakeApi::new(vec![Registration::new(
            "Edith Clarke",
            "edith@example.com",
            "href1",
        )]);
        let mut meeting = test_meeting();

        let report = run(&mut api, &mut meeting, &ReconcileOptions::default());

        assert_eq!(
            api.update_calls,
            vec![("href1".to_string(), AttendanceStatus::DidNotAttend)]
        );
        assert_eq!(report.registrations[0].attendance, Attendance::Absent);
    }

    #[test]
    fn test_min_duration_gate_is_strict() {
        // Maya matched but only 60 of the required >90 minutes.
        let mut api = FakeApi::new(vec![Registration::new(
            "Maya Angelou",
            "maya@example.com",
            "href1",
        )]);
        let mut meeting = test_meeting();

        let report = run(
            &mut api,
            &mut meeting,
            &ReconcileOptions {
                min_duration: 90.0,
                ..Default::default()
            },
        );

        assert_eq!(
            api.update_calls,
            vec![("href1".to_string(), AttendanceStatus::DidNotAttend)]
        );
        assert_eq!(report.registrations[0].attendance, Attendance::Absent);
        // The gated attendee shows up as unregistered, flagged below threshold.
        let maya = report
            .unregistered
            .iter()
            .find(|u| u.name == "Maya Angelou")
            .unwrap();
        assert!(maya.below_threshold);
    }

    #[test]
    fn test_duration_equal_to_minimum_does_not_count() {
        let mut api = FakeApi::new(vec![Registration::new(
            "Maya Angelou",
            "maya@example.com",
            "href1",
        )]);
        let mut meeting = test_meeting();

        run(
            &mut api,
            &mut meeting,
            &ReconcileOptions {
                min_duration: 60.0,
                ..Default::default()
            },
        );

        assert_eq!(api.update_calls[0].1, AttendanceStatus::DidNotAttend);
    }

    #[test]
    fn test_skip_absent_drops_row_and_update() {
        let mut api = FakeApi::new(vec![Registration::new(
            "Joyce Aylard",
            "joyce@example.com",
            "href1",
        )]);
        let mut meeting = test_meeting();

        let report = run(
            &mut api,
            &mut meeting,
            &ReconcileOptions {
                skip_absent: true,
                ..Default::default()
            },
        );

        assert!(api.update_calls.is_empty());
        assert!(report.registrations.is_empty());
    }

    #[test]
    fn test_dry_run_reports_computed_status_without_updates() {
        let mut api = FakeApi::new(vec![Registration::new(
            "Amelia Earhart",
            "amelia@example.com",
            "href1",
        )]);
        let mut meeting = test_meeting();

        let report = run(
            &mut api,
            &mut meeting,
            &ReconcileOptions {
                dry_run: true,
                ..Default::default()
            },
        );

        assert!(api.update_calls.is_empty());
        assert_eq!(report.registrations[0].attendance, Attendance::Present);
    }

    #[test]
    fn test_unmatched_attendee_listed_as_unregistered() {
        let mut api = FakeApi::new(vec![Registration::new(
            "Maya Angelou",
            "maya@example.com",
            "href1",
        )]);
        let mut meeting = test_meeting();

        let report = run(&mut api, &mut meeting, &ReconcileOptions::default());

        assert_eq!(report.unregistered.len(), 1);
        let amelia = &report.unregistered[0];
        assert_eq!(amelia.name, "Amelia Earhart");
        assert!(!amelia.below_threshold);
        assert_eq!(meeting.attendees[1].attendance, Attendance::Present);
        assert_eq!(meeting.attendees[0].attendance, Attendance::Absent);
    }

    #[test]
    fn test_failed_update_isolated_to_one_record() {
        let mut api = FakeApi::new(vec![
            Registration::new("Maya Angelou", "maya@example.com", "href1"),
            Registration::new("Amelia Earhart", "amelia@example.com", "href2"),
        ])
        .with_update_results(&[true, false]);
        let mut meeting = test_meeting();

        let report = run(&mut api, &mut meeting, &ReconcileOptions::default());

        // Both updates attempted despite the second failing.
        assert_eq!(
            api.update_calls,
            vec![
                ("href1".to_string(), AttendanceStatus::Attended),
                ("href2".to_string(), AttendanceStatus::Attended),
            ]
        );
        assert_eq!(report.registrations[0].attendance, Attendance::Present);
        assert_eq!(report.registrations[1].attendance, Attendance::Unknown);
        assert_eq!(report.failed_updates().count(), 1);
    }

    #[test]
    fn test_failed_update_then_subsequent_record_processed() {
        let mut api = FakeApi::new(vec![
            Registration::new("Maya Angelou", "maya@example.com", "href1"),
            Registration::new("Amelia Earhart", "amelia@example.com", "href2"),
        ])
        .with_update_results(&[false, true]);
        let mut meeting = test_meeting();

        let report = run(&mut api, &mut meeting, &ReconcileOptions::default());

        assert_eq!(report.registrations[0].attendance, Attendance::Unknown);
        assert_eq!(report.registrations[1].attendance, Attendance::Present);
    }

    #[test]
    fn test_rows_in_encounter_order() {
        let mut api = FakeApi::new(vec![
            Registration::new("Zelda", "z@example.com", "h1"),
            Registration::new("Alice", "a@example.com", "h2"),
            Registration::new("Mina", "m@example.com", "h3"),
        ]);
        let mut meeting = test_meeting();

        let report = run(&mut api, &mut meeting, &ReconcileOptions::default());

        let names: Vec<&str> = report
            .registrations
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(names, ["Zelda", "Alice", "Mina"]);
    }
}
