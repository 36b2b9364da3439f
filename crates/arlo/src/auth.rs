//! Credential storage.
//!
//! Reads/writes ~/.config/rollcall/credentials.json (0600 on Unix).
//! `ROLLCALL_USER` / `ROLLCALL_PASS` override the stored pair, which keeps
//! CI runs away from the credentials file entirely.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::client::ArloError;

pub const USERNAME_ENV: &str = "ROLLCALL_USER";
pub const PASSWORD_ENV: &str = "ROLLCALL_PASS";

/// An Arlo username/password pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Location of the credentials file. The client deletes the file when the
/// API rejects the pair, so a stale password is never retried forever.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Store under the user config dir. `None` when the platform has no
    /// config directory at all.
    pub fn default_location() -> Option<Self> {
        dirs::config_dir().map(|c| Self {
            path: c.join("rollcall/credentials.json"),
        })
    }

    /// Store at an explicit path (tests).
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Load saved credentials. Returns None if absent or unreadable.
    pub fn load(&self) -> Option<Credentials> {
        let contents = std::fs::read_to_string(&self.path).ok()?;
        serde_json::from_str(&contents).ok()
    }

    /// Save credentials, creating the parent directory if needed.
    /// Sets 0600 permissions on Unix.
    pub fn save(&self, creds: &Credentials) -> Result<(), String> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let contents = serde_json::to_string_pretty(creds)
            .map_err(|e| format!("Failed to serialize credentials: {}", e))?;

        std::fs::write(&self.path, &contents)
            .map_err(|e| format!("Failed to write credentials file: {}", e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.path, permissions)
                .map_err(|e| format!("Failed to set file permissions: {}", e))?;
        }

        Ok(())
    }

    /// Delete saved credentials. A missing file is not an error.
    pub fn delete(&self) -> Result<(), String> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)
                .map_err(|e| format!("Failed to delete credentials file: {}", e))?;
        }
        Ok(())
    }
}

/// Resolve credentials: environment pair > stored file > error.
pub fn resolve_credentials(store: &CredentialStore) -> Result<Credentials, ArloError> {
    if let (Ok(username), Ok(password)) =
        (std::env::var(USERNAME_ENV), std::env::var(PASSWORD_ENV))
    {
        if !username.trim().is_empty() && !password.trim().is_empty() {
            return Ok(Credentials {
                username: username.trim().to_string(),
                password: password.trim().to_string(),
            });
        }
    }

    store.load().ok_or(ArloError::CredentialsNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::at(dir.path().join("credentials.json"));

        let creds = Credentials {
            username: "trainer@example.com".into(),
            password: "hunter2".into(),
        };
        store.save(&creds).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.username, "trainer@example.com");
        assert_eq!(loaded.password, "hunter2");
    }

    #[cfg(unix)]
    #[test]
    fn test_credentials_file_is_0600() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::at(dir.path().join("credentials.json"));
        store
            .save(&Credentials {
                username: "u".into(),
                password: "p".into(),
            })
            .unwrap();

        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::at(dir.path().join("credentials.json"));

        store.delete().unwrap();
        store
            .save(&Credentials {
                username: "u".into(),
                password: "p".into(),
            })
            .unwrap();
        store.delete().unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn test_load_rejects_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, "not json").unwrap();

        let store = CredentialStore::at(path);
        assert!(store.load().is_none());
    }

    #[test]
    fn test_resolve_missing_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::at(dir.path().join("credentials.json"));

        // Env overrides are absent in the test environment.
        std::env::remove_var(USERNAME_ENV);
        std::env::remove_var(PASSWORD_ENV);

        let err = resolve_credentials(&store).unwrap_err();
        assert!(matches!(err, ArloError::CredentialsNotFound));
    }
}
