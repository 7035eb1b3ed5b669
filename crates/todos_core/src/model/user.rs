//! Credential directory used by backends without a `users` table.

use std::collections::BTreeMap;

/// Username to stored password hash mapping.
///
/// Hashes are opaque to this type; verification belongs to
/// `crate::auth::PasswordVerifier`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserCredentials {
    hashes: BTreeMap<String, String>,
}

impl UserCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers or replaces the stored hash for `username`.
    pub fn insert(&mut self, username: impl Into<String>, password_hash: impl Into<String>) {
        self.hashes.insert(username.into(), password_hash.into());
    }

    pub fn hash_for(&self, username: &str) -> Option<&str> {
        self.hashes.get(username).map(String::as_str)
    }
}

impl<U, H> FromIterator<(U, H)> for UserCredentials
where
    U: Into<String>,
    H: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (U, H)>>(iter: I) -> Self {
        let mut credentials = Self::new();
        for (username, hash) in iter {
            credentials.insert(username, hash);
        }
        credentials
    }
}
