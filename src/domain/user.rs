//! Registered user records (web variant).

use serde::{Deserialize, Serialize};

/// A registered user as stored in the flat-file registry.
///
/// The password is stored and compared in plaintext; hardening is out of scope.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub fullname: String,
    pub username: String,
    pub password: String,
}

impl UserRecord {
    #[must_use]
    pub fn new(
        fullname: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            fullname: fullname.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// Exact string comparison of both username and password.
    #[must_use]
    pub fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}

// Keep passwords out of `{:?}` output (logs, panics).
impl std::fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRecord")
            .field("fullname", &self.fullname)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_is_exact() {
        let user = UserRecord::new("Ada Lovelace", "ada", "secret");
        assert!(user.matches("ada", "secret"));
        assert!(!user.matches("ada", "Secret"));
        assert!(!user.matches("Ada", "secret"));
        assert!(!user.matches("ada", "secret "));
    }

    #[test]
    fn test_debug_redacts_password() {
        let user = UserRecord::new("Ada Lovelace", "ada", "hunter2");
        let shown = format!("{user:?}");
        assert!(shown.contains("ada"));
        assert!(!shown.contains("hunter2"));
    }
}
