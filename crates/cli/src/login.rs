//! `rollcall login` / `rollcall logout` — manage stored Arlo credentials.

use std::io::{self, Write};

use rollcall_arlo::{CredentialStore, Credentials, PASSWORD_ENV, USERNAME_ENV};

use crate::exit_codes::{EXIT_ERROR, EXIT_USAGE};
use crate::CliError;

pub fn cmd_login(username: Option<String>) -> Result<(), CliError> {
    // Resolve each half: flag > env > interactive prompt
    let username = match username {
        Some(u) => u,
        None => match std::env::var(USERNAME_ENV) {
            Ok(u) if !u.trim().is_empty() => u.trim().to_string(),
            _ => prompt("Arlo username")?,
        },
    };

    let password = match std::env::var(PASSWORD_ENV) {
        Ok(p) if !p.trim().is_empty() => p.trim().to_string(),
        _ => prompt("Arlo password")?,
    };

    let store = default_store()?;
    store
        .save(&Credentials { username, password })
        .map_err(|e| CliError {
            code: EXIT_ERROR,
            message: e,
            hint: None,
        })?;

    eprintln!("Credentials saved to {}", store.path().display());
    Ok(())
}

pub fn cmd_logout() -> Result<(), CliError> {
    let store = default_store()?;
    store.delete().map_err(|e| CliError {
        code: EXIT_ERROR,
        message: e,
        hint: None,
    })?;
    eprintln!("Stored credentials removed");
    Ok(())
}

pub(crate) fn default_store() -> Result<CredentialStore, CliError> {
    CredentialStore::default_location().ok_or_else(|| CliError {
        code: EXIT_ERROR,
        message: "No user config directory on this platform".into(),
        hint: None,
    })
}

fn prompt(label: &str) -> Result<String, CliError> {
    if !atty::is(atty::Stream::Stdin) {
        return Err(CliError {
            code: EXIT_USAGE,
            message: format!("{} not provided and stdin is not a TTY", label),
            hint: Some(format!(
                "set {} / {} or run interactively",
                USERNAME_ENV, PASSWORD_ENV
            )),
        });
    }

    eprint!("{}: ", label);
    io::stderr().flush().ok();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).map_err(|e| CliError {
        code: EXIT_ERROR,
        message: e.to_string(),
        hint: None,
    })?;

    let trimmed = buf.trim().to_string();
    if trimmed.is_empty() {
        return Err(CliError {
            code: EXIT_USAGE,
            message: format!("No {} provided", label.to_lowercase()),
            hint: None,
        });
    }
    Ok(trimmed)
}
