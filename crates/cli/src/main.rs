// rollcall CLI - reconcile meeting attendance reports against Arlo

mod exit_codes;
mod login;
mod parse;
mod progress;
mod sync;

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rollcall_arlo::ArloError;

use exit_codes::EXIT_SUCCESS;
use parse::{ReportError, ReportFormat};

#[derive(Parser)]
#[command(name = "rollcall")]
#[command(about = "Push meeting-platform attendance reports to Arlo registrations")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile an attendance report and update Arlo registrations
    #[command(after_help = "\
Examples:
  rollcall sync report.csv
  rollcall sync report.csv --min-duration 90 --skip-absent
  rollcall sync report.csv --event-code CK24ABC --date 2024-09-08
  rollcall sync report.csv --dry-run")]
    Sync {
        /// Attendance report exported from the meeting platform
        attendee_file: PathBuf,

        /// Format of the attendance report
        #[arg(long, short = 'f', value_enum, default_value = "butter")]
        format: ReportFormat,

        /// Arlo platform subdomain ({subdomain}.arlo.co)
        #[arg(long, default_value = "codefirstgirls")]
        platform: String,

        /// Event code (overrides the code found in the report)
        #[arg(long)]
        event_code: Option<String>,

        /// Session date, YYYY-MM-DD (overrides the report's start date)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Minimum minutes in the session to count as attended
        #[arg(long, default_value_t = 0.0)]
        min_duration: f64,

        /// Only mark attendance, never mark absence
        #[arg(long)]
        skip_absent: bool,

        /// Compute and report without updating Arlo
        #[arg(long)]
        dry_run: bool,

        /// Suppress progress output
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Store Arlo credentials for later runs
    Login {
        /// Arlo username (prompted for when omitted)
        #[arg(long, short = 'u')]
        username: Option<String>,
    },

    /// Delete stored Arlo credentials
    Logout,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Sync {
            attendee_file,
            format,
            platform,
            event_code,
            date,
            min_duration,
            skip_absent,
            dry_run,
            quiet,
        } => sync::cmd_sync(
            attendee_file,
            format,
            platform,
            event_code,
            date,
            min_duration,
            skip_absent,
            dry_run,
            quiet,
        ),
        Commands::Login { username } => login::cmd_login(username),
        Commands::Logout => login::cmd_logout(),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError {
            code,
            message,
            hint,
        }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    /// Create error from an Arlo client error with its exit code.
    pub fn arlo(err: ArloError) -> Self {
        let code = exit_codes::arlo_exit_code(&err);
        let hint = match &err {
            ArloError::CredentialsNotFound => {
                Some("run `rollcall login` to store credentials".to_string())
            }
            ArloError::AuthenticationFailed => {
                Some("run `rollcall login` to store a new password".to_string())
            }
            ArloError::EventNotFound(_) => {
                Some("pass --event-code if the report's room name is wrong".to_string())
            }
            ArloError::SessionNotFound(_) => {
                Some("pass --date if the report's start date is wrong".to_string())
            }
            _ => None,
        };
        Self {
            code,
            message: err.to_string(),
            hint,
        }
    }

    /// Create error from a report parsing error with its exit code.
    pub fn report(err: ReportError) -> Self {
        let hint = match &err {
            ReportError::EventCodeNotFound => {
                Some("use --event-code to name the event explicitly".to_string())
            }
            ReportError::Processing(_) => None,
        };
        Self {
            code: exit_codes::report_exit_code(&err),
            message: err.to_string(),
            hint,
        }
    }
}
