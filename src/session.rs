use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Trainer,
    Client,
}

/// The persisted sign-in state: bearer token plus the identity it belongs to.
///
/// This is the CLI counterpart of browser local storage. It is loaded once at
/// startup and handed to the use cases explicitly; nothing else re-derives
/// identity on its own. A missing session is not an error: flows that need a
/// client or trainer identifier degrade to a silent no-op.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Session {
    pub token: String,
    pub role: Role,
    pub user_id: u32,
}

impl Session {
    /// The backend client identifier, when signed in as a client.
    pub fn client_id(&self) -> Option<u32> {
        (self.role == Role::Client).then_some(self.user_id)
    }

    /// The backend trainer identifier, when signed in as a trainer.
    pub fn trainer_id(&self) -> Option<u32> {
        (self.role == Role::Trainer).then_some(self.user_id)
    }

    /// Reads the session file. An absent file yields `None`.
    pub fn load(path: &Path) -> Result<Option<Session>> {
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(path)?;
        let session = toml::from_str(&raw)
            .map_err(|e| AppError::Session(format!("malformed session file: {}", e)))?;
        Ok(Some(session))
    }

    /// Writes the session file, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(self)
            .map_err(|e| AppError::Session(format!("failed to encode session: {}", e)))?;
        fs::write(path, raw)?;
        Ok(())
    }

    /// Removes the session file. A missing file is fine.
    pub fn clear(path: &Path) -> Result<()> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_session_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("session.toml");

        let session = Session {
            token: "abc.def.ghi".to_string(),
            role: Role::Client,
            user_id: 42,
        };
        session.save(&path).unwrap();

        let loaded = Session::load(&path).unwrap().unwrap();
        assert_eq!(loaded, session);
        assert_eq!(loaded.client_id(), Some(42));
        assert_eq!(loaded.trainer_id(), None);
    }

    #[test]
    fn test_load_absent_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.toml");
        assert!(Session::load(&path).unwrap().is_none());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.toml");

        let session = Session {
            token: "t".to_string(),
            role: Role::Trainer,
            user_id: 7,
        };
        session.save(&path).unwrap();

        Session::clear(&path).unwrap();
        Session::clear(&path).unwrap();
        assert!(Session::load(&path).unwrap().is_none());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.toml");
        fs::write(&path, "not = [valid").unwrap();

        assert!(matches!(
            Session::load(&path),
            Err(AppError::Session(_))
        ));
    }
}
