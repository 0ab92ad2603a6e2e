//! Credentials and the password digest.
//!
//! Passwords are stored as an unsalted, lowercase-hex SHA-256 digest in
//! `users.password_hash`. Stores opened on a `users` table without that
//! column refuse to start rather than guess at its layout. The unsalted
//! digest is a known weakness: identical passwords produce
//! identical hashes and the digest is fast to brute-force. A rebuild that
//! can migrate the `users` table should switch to a salted, slow KDF such
//! as argon2.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A row of the `users` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
  pub username:      String,
  pub password_hash: String,
}

impl Credential {
  pub fn new(username: impl Into<String>, password: &str) -> Self {
    Self { username: username.into(), password_hash: hash_password(password) }
  }

  pub fn matches(&self, password: &str) -> bool {
    self.password_hash == hash_password(password)
  }
}

/// Lowercase hex SHA-256 of the password's UTF-8 bytes.
pub fn hash_password(password: &str) -> String {
  hex::encode(Sha256::digest(password.as_bytes()))
}
