use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The signed-in user's profile plus bearer token, as returned by the
/// auth endpoints and persisted between invocations.
#[derive(Clone, Debug)]
pub struct Session {
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    pub token: SecretString,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("could not read session file `{path}`: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("could not write session file `{path}`: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("could not parse session file `{path}`: {source}")]
    Parse { path: PathBuf, source: serde_json::Error },
}

/// On-disk shape, kept byte-compatible with the original client's
/// `userInfo` slot: `{ name, email, isAdmin, token }`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionFile {
    name: String,
    email: String,
    #[serde(default)]
    is_admin: bool,
    token: String,
}

/// Owns the single session slot. Constructed once from config and passed
/// explicitly to every command; there is no ambient global lookup.
#[derive(Clone, Debug)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(None)` when no one is signed in (file absent).
    pub fn load(&self) -> Result<Option<Session>, SessionError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(source) if source.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(SessionError::Read { path: self.path.clone(), source }),
        };

        let file: SessionFile = serde_json::from_str(&raw)
            .map_err(|source| SessionError::Parse { path: self.path.clone(), source })?;

        Ok(Some(Session {
            name: file.name,
            email: file.email,
            is_admin: file.is_admin,
            token: file.token.into(),
        }))
    }

    pub fn save(&self, session: &Session) -> Result<(), SessionError> {
        let file = SessionFile {
            name: session.name.clone(),
            email: session.email.clone(),
            is_admin: session.is_admin,
            token: session.token.expose_secret().to_string(),
        };
        let payload = serde_json::to_string_pretty(&file)
            .map_err(|source| SessionError::Parse { path: self.path.clone(), source })?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|source| SessionError::Write { path: self.path.clone(), source })?;
            }
        }
        fs::write(&self.path, payload)
            .map_err(|source| SessionError::Write { path: self.path.clone(), source })
    }

    /// Sign-out teardown. Idempotent: clearing an absent session is fine.
    pub fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(source) if source.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(SessionError::Write { path: self.path.clone(), source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::{Session, SessionStore};

    fn session() -> Session {
        Session {
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            is_admin: true,
            token: "tok-secret-value".to_string().into(),
        }
    }

    #[test]
    fn load_returns_none_when_signed_out() {
        let dir = TempDir::new().expect("temp dir");
        let store = SessionStore::new(dir.path().join("session.json"));

        assert!(store.load().expect("load should succeed").is_none());
    }

    #[test]
    fn save_then_load_round_trips_the_profile() {
        let dir = TempDir::new().expect("temp dir");
        let store = SessionStore::new(dir.path().join("nested/session.json"));

        store.save(&session()).expect("save should succeed");
        let loaded = store.load().expect("load should succeed").expect("session present");

        assert_eq!(loaded.name, "Jane");
        assert_eq!(loaded.email, "jane@example.com");
        assert!(loaded.is_admin);
        use secrecy::ExposeSecret;
        assert_eq!(loaded.token.expose_secret(), "tok-secret-value");
    }

    #[test]
    fn the_file_keeps_the_original_wire_keys() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("session.json");
        let store = SessionStore::new(&path);

        store.save(&session()).expect("save should succeed");
        let raw = std::fs::read_to_string(&path).expect("file should exist");
        let value: serde_json::Value = serde_json::from_str(&raw).expect("valid json");

        assert_eq!(value["isAdmin"], true);
        assert!(value["token"].is_string());
    }

    #[test]
    fn clear_is_idempotent() {
        let dir = TempDir::new().expect("temp dir");
        let store = SessionStore::new(dir.path().join("session.json"));

        store.save(&session()).expect("save should succeed");
        store.clear().expect("first clear");
        store.clear().expect("second clear is a no-op");

        assert!(store.load().expect("load should succeed").is_none());
    }

    #[test]
    fn debug_output_does_not_leak_the_token() {
        let debug = format!("{:?}", session());
        assert!(!debug.contains("tok-secret-value"));
    }
}
