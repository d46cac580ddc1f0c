//! Registered candidate.

use std::fmt;

use crate::domain::foundation::{AuthenticatedUser, Timestamp, UserId};

/// A stored account. `password_hash` is a PHC string and never leaves the
/// server.
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub created_at: Timestamp,
}

impl User {
    /// Identity carried by the session token issued for this account.
    pub fn to_authenticated(&self) -> AuthenticatedUser {
        AuthenticatedUser::new(self.id, Some(self.email.clone()), Some(self.name.clone()))
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("name", &self.name)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

/// Validated registration data, ready to be stored.
#[derive(Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password_hash: String,
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("email", &self.email)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
