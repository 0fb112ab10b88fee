//! User registry port: Trait for registered-user persistence.
//!
//! This trait abstracts the backing store (a flat JSON file) from the
//! account use cases, so it can be swapped without touching callers.

use crate::domain::UserRecord;

/// Trait for user record storage.
pub trait UserRegistry: Send + Sync {
    /// Error type for storage operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// First record whose username and password both match exactly.
    ///
    /// Every record is considered, so a hand-edited file holding the same
    /// username twice still authenticates either password.
    ///
    /// # Errors
    /// Returns error if the store cannot be read.
    fn find_matching(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<UserRecord>, Self::Error>;

    /// Append a record, rejecting a username that is already taken.
    ///
    /// The uniqueness check and the write happen atomically.
    ///
    /// # Errors
    /// Returns error if the username exists or the store cannot be written.
    fn append(&self, record: UserRecord) -> Result<(), Self::Error>;

    /// All records in insertion order.
    ///
    /// # Errors
    /// Returns error if the store cannot be read.
    fn all(&self) -> Result<Vec<UserRecord>, Self::Error>;
}
