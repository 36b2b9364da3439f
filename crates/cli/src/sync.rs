//! `rollcall sync` — parse a report, reconcile against Arlo, print results.

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveTime};
use rollcall_arlo::ArloClient;
use rollcall_recon::{reconcile, Attendance, ReconcileOptions, ReconcileReport};

use crate::login;
use crate::parse::{self, ReportFormat};
use crate::progress::Spinner;
use crate::CliError;

#[allow(clippy::too_many_arguments)]
pub fn cmd_sync(
    attendee_file: PathBuf,
    format: ReportFormat,
    platform: String,
    event_code: Option<String>,
    date: Option<NaiveDate>,
    min_duration: f64,
    skip_absent: bool,
    dry_run: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let mut meeting = parse::get_attendees(format, &attendee_file, event_code.as_deref())
        .map_err(CliError::report)?;
    if let Some(date) = date {
        meeting.start_date = date.and_time(NaiveTime::MIN);
    }
    let session_date = meeting.start_date.date();

    let store = login::default_store()?;
    let mut client = ArloClient::for_platform(&platform, store).map_err(CliError::arlo)?;

    // Resolving the names here also warms the client's caches, so the
    // reconcile pass below resolves ids without refetching.
    let event_name = client
        .event_name(&meeting.event_code)
        .map_err(CliError::arlo)?;
    let session_name = client
        .session_name(&meeting.event_code, session_date)
        .map_err(CliError::arlo)?;
    if !quiet {
        eprintln!("Event:   {} ({})", event_name, meeting.event_code);
        eprintln!("Session: {} ({})", session_name, session_date);
    }

    let opts = ReconcileOptions {
        min_duration,
        skip_absent,
        dry_run,
    };
    let spinner = (!quiet).then(|| Spinner::start("Reconciling attendance"));
    let report = reconcile(&mut client, &mut meeting, &opts).map_err(CliError::arlo)?;
    drop(spinner);

    render_report(&report);

    for failed in report.failed_updates() {
        eprintln!(
            "warning: failed to update attendance for {} <{}>",
            failed.name, failed.email
        );
    }
    if dry_run {
        eprintln!("note: dry run, no attendance was updated");
    }

    Ok(())
}

fn render_report(report: &ReconcileReport) {
    let name_w = column_width(
        report
            .registrations
            .iter()
            .map(|r| r.name.as_str())
            .chain(report.unregistered.iter().map(|u| u.name.as_str())),
    );
    let email_w = column_width(
        report
            .registrations
            .iter()
            .map(|r| r.email.as_str())
            .chain(report.unregistered.iter().map(|u| u.email.as_str())),
    );

    println!("Registrations ({}):", report.registrations.len());
    for row in &report.registrations {
        let status = match row.attendance {
            Attendance::Present => "attended",
            Attendance::Absent => "did not attend",
            Attendance::Unknown => "update failed",
        };
        println!(
            "  {:<name_w$}  {:<email_w$}  {}",
            row.name, row.email, status
        );
    }

    if !report.unregistered.is_empty() {
        println!();
        println!(
            "In the report but not registered ({}):",
            report.unregistered.len()
        );
        for row in &report.unregistered {
            let note = if row.below_threshold {
                "  (below minimum duration)"
            } else {
                ""
            };
            println!(
                "  {:<name_w$}  {:<email_w$}  {:>6.1} min{}",
                row.name, row.email, row.session_duration, note
            );
        }
    }
}

fn column_width<'a>(values: impl Iterator<Item = &'a str>) -> usize {
    values.map(|v| v.chars().count()).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_width_over_both_tables() {
        let values = ["Ada", "Grace Hopper", "maya"];
        assert_eq!(column_width(values.into_iter()), 12);
        assert_eq!(column_width(std::iter::empty()), 0);
    }
}
