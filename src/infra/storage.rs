//! Persisted session storage.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use crate::application::ports::{SessionStorage, StorageError};
use crate::domain::session::Session;

/// Session kept as a JSON document on disk, surviving process restarts.
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl SessionStorage for FileSessionStorage {
    fn load(&self) -> Result<Option<Session>, StorageError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        if text.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&text)
            .map(Some)
            .map_err(|err| StorageError::Corrupt(format!("{}: {err}", self.path.display())))
    }

    /// Written to a sibling temp file and renamed over the target, so
    /// readers see either the old session or the new one.
    fn save(&self, session: &Session) -> Result<(), StorageError> {
        let dir = self.dir();
        fs::create_dir_all(dir)?;

        let json = serde_json::to_vec_pretty(session)
            .map_err(|err| StorageError::Corrupt(err.to_string()))?;

        let mut builder = tempfile::Builder::new();
        builder.prefix(".session").suffix(".tmp");
        #[cfg(unix)]
        builder.permissions(owner_only());
        let mut file = builder.tempfile_in(dir)?;
        file.write_all(&json)?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|err| err.error)?;

        debug!(path = %self.path.display(), "session persisted");
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// The file holds a bearer token: owner read/write only, from creation on.
#[cfg(unix)]
fn owner_only() -> fs::Permissions {
    use std::os::unix::fs::PermissionsExt;

    fs::Permissions::from_mode(0o600)
}

/// Process-local storage, for embedding and tests.
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    session: Mutex<Option<Session>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session: Mutex::new(Some(session)),
        }
    }
}

impl SessionStorage for MemorySessionStorage {
    fn load(&self) -> Result<Option<Session>, StorageError> {
        Ok(self
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, session: &Session) -> Result<(), StorageError> {
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::session::UserIdentity;

    #[test]
    fn missing_file_is_no_session() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = FileSessionStorage::new(dir.path().join("session.json"));
        assert!(storage.load().expect("load").is_none());
        storage.clear().expect("clear twice is fine");
        storage.clear().expect("clear twice is fine");
    }

    #[test]
    fn saved_session_reloads() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = FileSessionStorage::new(dir.path().join("nested/session.json"));
        let user = UserIdentity {
            username: Some("ada".into()),
            ..Default::default()
        };
        storage
            .save(&Session::new("tok-1", user.clone()))
            .expect("save");

        let loaded = storage.load().expect("load").expect("session");
        assert_eq!(loaded.token.as_deref(), Some("tok-1"));
        assert_eq!(loaded.user, Some(user));

        storage.clear().expect("clear");
        assert!(storage.load().expect("load").is_none());
    }

    #[test]
    fn save_replaces_the_file_and_leaves_no_temp_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.json");
        let storage = FileSessionStorage::new(&path);

        storage
            .save(&Session::new("tok-1", UserIdentity::default()))
            .expect("first save");
        storage
            .save(&Session::new("tok-2", UserIdentity::default()))
            .expect("second save");

        let loaded = storage.load().expect("load").expect("session");
        assert_eq!(loaded.token.as_deref(), Some("tok-2"));

        let names: Vec<_> = fs::read_dir(dir.path())
            .expect("read dir")
            .map(|entry| entry.expect("entry").file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("session.json")]);
    }

    #[cfg(unix)]
    #[test]
    fn saved_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.json");
        FileSessionStorage::new(&path)
            .save(&Session::new("tok-1", UserIdentity::default()))
            .expect("save");

        let mode = fs::metadata(&path).expect("metadata").permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn garbage_is_reported_as_corrupt() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").expect("write");

        let err = FileSessionStorage::new(path).load().expect_err("corrupt");
        assert!(matches!(err, StorageError::Corrupt(_)));
    }
}
