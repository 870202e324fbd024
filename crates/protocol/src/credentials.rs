//! Login credentials as they travel on the wire.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Username plus the SHA-256 hex digest of the password.
///
/// The plaintext password never leaves [`Credentials::from_plaintext`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn from_plaintext(username: impl Into<String>, password: &str) -> Self {
        Self {
            username: username.into(),
            password: digest_password(password),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<digest>")
            .finish()
    }
}

/// Lowercase hex SHA-256 of the UTF-8 password
pub fn digest_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}
