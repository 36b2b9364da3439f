//! Butter attendance report parser.
//!
//! Butter's CSV export starts with six metadata lines (room name,
//! generation info, session start/end, totals) followed by the attendee
//! table. The room name ends with the event code, so a report usually
//! identifies its own event.

use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDateTime;
use rollcall_recon::{Meeting, SourceAttendee};
use serde::Deserialize;

use super::ReportError;

const METADATA_LINES: usize = 6;
const EVENT_CODE_PREFIX: &str = "CK";
const START_PREFIX: &str = "Started at: ";
// Example: Sep 08 2024 - 06:30 PM
const START_FORMAT: &str = "%b %d %Y - %I:%M %p";

#[derive(Debug, Deserialize)]
struct Row {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Email")]
    email: String,
    #[serde(rename = "Duration in session (minutes)")]
    duration: f64,
    #[serde(rename = "Type")]
    kind: String,
}

/// Parse a Butter attendance report into a [`Meeting`].
///
/// Rows for temporary hosts and zero-duration joins are dropped; rows
/// sharing an email are merged by summing their durations (rejoining a
/// session produces one row per join).
pub fn get_attendees(path: &Path, event_code_hint: Option<&str>) -> Result<Meeting, ReportError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| ReportError::Processing(format!("{}: {}", path.display(), e)))?;

    let mut lines = contents.lines();
    let metadata: Vec<&str> = lines.by_ref().take(METADATA_LINES).collect();
    if metadata.len() < METADATA_LINES {
        return Err(ReportError::Processing(format!(
            "expected {} metadata lines before the attendee table",
            METADATA_LINES
        )));
    }
    let (event_code, start_date) = extract_metadata(&metadata, event_code_hint)?;

    let body = lines.collect::<Vec<&str>>().join("\n");
    let mut attendees: Vec<SourceAttendee> = Vec::new();
    let mut by_email: HashMap<String, usize> = HashMap::new();

    let mut reader = csv::Reader::from_reader(body.as_bytes());
    for row in reader.deserialize::<Row>() {
        let row = row.map_err(|e| ReportError::Processing(e.to_string()))?;
        if row.kind == "temp-host" || row.duration == 0.0 {
            continue;
        }
        match by_email.get(&row.email) {
            Some(&idx) => attendees[idx].session_duration += row.duration,
            None => {
                by_email.insert(row.email.clone(), attendees.len());
                attendees.push(SourceAttendee::new(row.name, row.email, row.duration));
            }
        }
    }

    let mut meeting = Meeting {
        event_code,
        start_date,
        attendees,
    };
    meeting.sort_attendees();
    Ok(meeting)
}

/// Pull the event code (line 1, trailing `CK...` token of the room name)
/// and the session start (line 3) out of the metadata block. A hint from
/// the command line wins over the room name.
fn extract_metadata(
    metadata: &[&str],
    event_code_hint: Option<&str>,
) -> Result<(String, NaiveDateTime), ReportError> {
    // Room names may contain commas, which the export quotes.
    let room = metadata[0].replace([',', '"'], "");
    let room = room.trim();
    let event_code = match event_code_hint {
        Some(code) => code.to_string(),
        None => match room.find(EVENT_CODE_PREFIX) {
            Some(idx) => room[idx..].to_string(),
            None => return Err(ReportError::EventCodeNotFound),
        },
    };

    let started = metadata[2].replace([',', '"'], "");
    let date_str = started.trim().trim_start_matches(START_PREFIX);
    let start_date = NaiveDateTime::parse_from_str(date_str, START_FORMAT).map_err(|e| {
        ReportError::Processing(format!("bad session start {:?}: {}", date_str, e))
    })?;

    Ok((event_code, start_date))
}
