//! Password hashing port.
//!
//! Hashing is CPU-bound; async callers run it on the blocking pool.

use crate::domain::foundation::DomainError;

pub trait PasswordHasher: Send + Sync {
    /// Hashes `password` with a fresh salt into a self-describing string.
    fn hash(&self, password: &str) -> Result<String, DomainError>;

    /// Returns true when `password` matches `hash`. Malformed hashes never match.
    fn verify(&self, password: &str, hash: &str) -> bool;
}
