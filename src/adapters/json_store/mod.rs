//! JSON file adapter: Implementation of `UserRegistry`.
//!
//! Users are kept in a single JSON array of
//! `{"fullname", "username", "password"}` objects, written with
//! four-space indentation.
//!
//! # Concurrency
//!
//! All reads and writes go through one `Mutex`, so the duplicate check and
//! the append of a registration happen in the same critical section. Writes
//! replace the file atomically (temp file then rename). A poisoned lock is
//! reported as `StorageError::LockPoisoned` rather than panicking.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::Serialize;

use crate::domain::UserRecord;
use crate::ports::UserRegistry;

/// Error type for storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("User file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("User file is malformed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Username already registered: {0}")]
    DuplicateUsername(String),

    #[error("User store lock poisoned")]
    LockPoisoned,
}

/// Flat-file user registry.
pub struct JsonUserStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonUserStore {
    /// Open the registry at `path`, creating an empty one if absent.
    ///
    /// # Errors
    /// Returns error if the file cannot be created or is not a user array.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let store = Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        };

        if store.path.exists() {
            let users = store.read_users()?;
            tracing::info!("User registry opened with {} account(s)", users.len());
        } else {
            store.write_users(&[])?;
            tracing::info!("Created empty user registry at {:?}", store.path);
        }
        Ok(store)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn guard(&self) -> Result<MutexGuard<'_, ()>, StorageError> {
        self.lock.lock().map_err(|_| StorageError::LockPoisoned)
    }

    fn read_users(&self) -> Result<Vec<UserRecord>, StorageError> {
        let content = fs::read(&self.path)?;
        if content.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_slice(&content)?)
    }

    fn write_users(&self, users: &[UserRecord]) -> Result<(), StorageError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        users.serialize(&mut ser)?;

        let tmp = self.path.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(&buf)?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl UserRegistry for JsonUserStore {
    type Error = StorageError;

    fn find_matching(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<UserRecord>, Self::Error> {
        let _guard = self.guard()?;
        Ok(self
            .read_users()?
            .into_iter()
            .find(|u| u.matches(username, password)))
    }

    fn append(&self, user: UserRecord) -> Result<(), Self::Error> {
        let _guard = self.guard()?;
        let mut users = self.read_users()?;
        if users.iter().any(|u| u.username == user.username) {
            return Err(StorageError::DuplicateUsername(user.username));
        }
        users.push(user);
        self.write_users(&users)?;
        tracing::debug!("User registry now holds {} account(s)", users.len());
        Ok(())
    }

    fn all(&self) -> Result<Vec<UserRecord>, Self::Error> {
        let _guard = self.guard()?;
        self.read_users()
    }
}
