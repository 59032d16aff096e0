//! Account credential verification against the catalog's user accounts.
//!
//! Passwords are stored as lowercase hex SHA-256 digests in the catalog file;
//! nothing here ever holds a plaintext password beyond the request that
//! carried it.

use common::model::User;
use sha2::{Digest, Sha256};

use crate::catalog::CatalogStore;

/// Lowercase hex SHA-256 digest of `password`.
pub fn password_digest(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Returns `true` if `candidate` matches the user's stored digest.
pub fn verify_password(user: &User, candidate: &str) -> bool {
    password_digest(candidate) == user.password_sha256.to_lowercase()
}

/// Resolve `username` and verify `password` against the stored digest.
///
/// Returns the matching [`User`] on success, `None` for an unknown username
/// or a wrong password — the caller cannot tell which.
pub fn authenticate(catalog: &CatalogStore, username: &str, password: &str) -> Option<User> {
    let user = catalog.user_by_username(username)?;
    verify_password(&user, password).then_some(user)
}
