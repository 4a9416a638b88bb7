//! Durable client-side key/value storage for the persisted credential.
//!
//! Only [`crate::SessionStore`] reads or writes through these backends.

use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no platform data directory available for credential storage")]
    NoDataDir,

    #[error("invalid storage key {0:?}")]
    InvalidKey(String),
}

/// String slots keyed by name, in the spirit of browser `localStorage`.
pub trait CredentialStorage: Send + Sync + fmt::Debug {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove the slot entirely. Removing a missing slot is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-process storage; lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(slots.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.remove(key);
        Ok(())
    }
}

/// One file per key inside a private directory.
///
/// Writes go through a temporary file and a rename so a crash never leaves a
/// half-written token behind.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `<platform data dir>/tenantdesk`, e.g. `~/.local/share/tenantdesk`.
    pub fn default_location() -> Result<Self, StorageError> {
        let base = dirs::data_dir().ok_or(StorageError::NoDataDir)?;
        Ok(Self::new(base.join("tenantdesk")))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(key))
    }
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl CredentialStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.slot_path(key)?;
        match std::fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&path)(e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key)?;
        std::fs::create_dir_all(&self.dir).map_err(io_error(&self.dir))?;

        let tmp = self.dir.join(format!(".{key}.tmp"));
        write_private(&tmp, value).map_err(io_error(&tmp))?;
        std::fs::rename(&tmp, &path).map_err(io_error(&path))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(&path)(e)),
        }
    }
}

#[cfg(unix)]
fn write_private(path: &Path, value: &str) -> io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::OpenOptionsExt;

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.write_all(value.as_bytes())?;
    file.sync_all()
}

#[cfg(not(unix))]
fn write_private(path: &Path, value: &str) -> io::Result<()> {
    std::fs::write(path, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("tenantdesk-storage-{}", uuid::Uuid::now_v7()))
    }

    #[test]
    fn memory_slots_are_independent() {
        let storage = MemoryStorage::new();
        storage.set("a", "1").unwrap();
        storage.set("b", "2").unwrap();
        storage.remove("a").unwrap();

        assert_eq!(storage.get("a").unwrap(), None);
        assert_eq!(storage.get("b").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn file_slot_lifecycle() {
        let dir = scratch_dir();
        let storage = FileStorage::new(&dir);

        assert_eq!(storage.get("access_token").unwrap(), None);

        storage.set("access_token", "first").unwrap();
        storage.set("access_token", "second").unwrap();
        assert_eq!(storage.get("access_token").unwrap().as_deref(), Some("second"));

        storage.remove("access_token").unwrap();
        assert!(!dir.join("access_token").exists());
        storage.remove("access_token").unwrap();

        let _ = std::fs::remove_dir_all(dir);
    }

    #[cfg(unix)]
    #[test]
    fn file_slot_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = scratch_dir();
        let storage = FileStorage::new(&dir);
        storage.set("access_token", "secret").unwrap();

        let mode = std::fs::metadata(dir.join("access_token"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn path_like_keys_are_rejected() {
        let storage = FileStorage::new(scratch_dir());
        assert!(matches!(
            storage.set("../escape", "x"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(storage.get(".hidden"), Err(StorageError::InvalidKey(_))));
    }
}
