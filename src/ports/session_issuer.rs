//! Session issuing port.
//!
//! Counterpart of [`super::SessionValidator`]: tokens minted here must be
//! accepted by the validator of the same deployment.

use crate::domain::foundation::{AuthError, AuthenticatedUser};

pub trait SessionIssuer: Send + Sync {
    /// Mints a bearer token for `user`.
    fn issue(&self, user: &AuthenticatedUser) -> Result<String, AuthError>;
}
