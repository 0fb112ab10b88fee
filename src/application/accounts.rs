//! Account service: registration and login against the user registry.

use std::sync::Arc;

use crate::adapters::StorageError;
use crate::domain::UserRecord;
use crate::ports::UserRegistry;
use crate::CardioError;

/// Service for registering and authenticating web users.
pub struct AccountService<R>
where
    R: UserRegistry,
{
    registry: Arc<R>,
}

impl<R> AccountService<R>
where
    R: UserRegistry,
    R::Error: Into<StorageError>,
{
    /// Create a new account service.
    pub fn new(registry: Arc<R>) -> Self {
        Self { registry }
    }

    /// Register a new user.
    ///
    /// # Errors
    /// Returns `InvalidInput` if a field is empty, `DuplicateUsername` if the
    /// username is taken (the registry is left unchanged), or a storage error.
    pub fn register(
        &self,
        fullname: &str,
        username: &str,
        password: &str,
    ) -> Result<UserRecord, CardioError> {
        for (name, value) in [
            ("fullname", fullname),
            ("username", username),
            ("password", password),
        ] {
            if value.is_empty() {
                return Err(CardioError::InvalidInput(format!("{name} is required")));
            }
        }

        let record = UserRecord::new(fullname, username, password);
        match self.registry.append(record.clone()).map_err(Into::into) {
            Ok(()) => {
                tracing::info!("Registered new account");
                Ok(record)
            }
            Err(StorageError::DuplicateUsername(_)) => {
                tracing::info!("Registration rejected: username taken");
                Err(CardioError::DuplicateUsername)
            }
            Err(e) => Err(CardioError::Storage(e)),
        }
    }

    /// Authenticate by exact username and password match against any record.
    ///
    /// # Errors
    /// Returns `InvalidCredentials` when no record matches, or a storage error.
    pub fn login(&self, username: &str, password: &str) -> Result<UserRecord, CardioError> {
        let found = self
            .registry
            .find_matching(username, password)
            .map_err(|e| CardioError::Storage(e.into()))?;

        match found {
            Some(user) => {
                tracing::info!("Login succeeded");
                Ok(user)
            }
            _ => {
                tracing::info!("Login rejected");
                Err(CardioError::InvalidCredentials)
            }
        }
    }
}
