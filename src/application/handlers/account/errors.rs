//! Failures of account operations.

use thiserror::Error;

use crate::domain::foundation::{AuthError, DomainError, ErrorCode, UserId, ValidationError};

/// Errors from account handlers.
#[derive(Debug, Clone, Error)]
pub enum AccountError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Email already registered")]
    EmailTaken,

    /// Unknown email or wrong password. The two are indistinguishable.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// A valid session for an account that no longer exists.
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    #[error("Session could not be issued: {0}")]
    Session(AuthError),

    #[error("Storage error: {0}")]
    Storage(DomainError),
}

impl AccountError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            AccountError::Validation(_) => "VALIDATION_FAILED",
            AccountError::EmailTaken => "EMAIL_TAKEN",
            AccountError::InvalidCredentials => "INVALID_CREDENTIALS",
            AccountError::UserNotFound(_) => "USER_NOT_FOUND",
            AccountError::Session(_) => "AUTH_UNAVAILABLE",
            AccountError::Storage(_) => "STORAGE_ERROR",
        }
    }
}

impl From<DomainError> for AccountError {
    fn from(err: DomainError) -> Self {
        match err.code() {
            ErrorCode::EmailTaken => AccountError::EmailTaken,
            _ => AccountError::Storage(err),
        }
    }
}

impl From<AuthError> for AccountError {
    fn from(err: AuthError) -> Self {
        AccountError::Session(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_email_maps_to_email_taken() {
        let err: AccountError =
            DomainError::new(ErrorCode::EmailTaken, "ana@example.com").into();
        assert_eq!(err.code(), "EMAIL_TAKEN");
    }

    #[test]
    fn other_domain_failures_map_to_storage() {
        let err: AccountError = DomainError::database("connection refused").into();
        assert!(matches!(err, AccountError::Storage(_)));
    }
}
