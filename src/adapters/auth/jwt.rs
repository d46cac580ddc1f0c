//! HS256 JWT session service.
//!
//! Issues and validates the bearer tokens carried by every API call. The
//! subject claim holds the numeric user id; `email` and `name` feed the
//! candidate name shown in reports.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::{SessionIssuer, SessionValidator};

/// Claims carried by Evalio session tokens.
#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    /// User id, as a decimal string
    sub: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,

    /// Expiry (Unix epoch seconds)
    exp: i64,

    /// Issued at (Unix epoch seconds)
    iat: i64,
}

/// Symmetric-key token service.
pub struct JwtSessionService {
    secret: Secret<String>,
    token_expiry: Duration,
}

impl JwtSessionService {
    /// Creates a service signing with `secret`; tokens live for `token_expiry`.
    pub fn new(secret: impl Into<String>, token_expiry: Duration) -> Self {
        Self {
            secret: Secret::new(secret.into()),
            token_expiry,
        }
    }

    fn decode_claims(&self, token: &str) -> Result<SessionClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);

        decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(self.secret.expose_secret().as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| {
            use jsonwebtoken::errors::ErrorKind;
            match e.kind() {
                ErrorKind::ExpiredSignature => {
                    tracing::debug!("Token expired");
                    AuthError::TokenExpired
                }
                _ => {
                    tracing::debug!(error = %e, "Token validation failed");
                    AuthError::InvalidToken
                }
            }
        })
    }
}

impl SessionIssuer for JwtSessionService {
    fn issue(&self, user: &AuthenticatedUser) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            name: user.display_name.clone(),
            exp: (now + self.token_expiry).timestamp(),
            iat: now.timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.expose_secret().as_bytes()),
        )
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to sign session token");
            AuthError::service_unavailable("token signing failed")
        })
    }
}

#[async_trait]
impl SessionValidator for JwtSessionService {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let claims = self.decode_claims(token)?;

        // Subjects must be positive integers
        let user_id = claims
            .sub
            .parse::<i64>()
            .ok()
            .and_then(|raw| UserId::new(raw).ok())
            .ok_or_else(|| {
                tracing::warn!(sub = %claims.sub, "Invalid user id in token");
                AuthError::InvalidToken
            })?;

        Ok(AuthenticatedUser::new(user_id, claims.email, claims.name))
    }
}

impl std::fmt::Debug for JwtSessionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSessionService")
            .field("token_expiry", &self.token_expiry)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn service() -> JwtSessionService {
        JwtSessionService::new(SECRET, Duration::minutes(60))
    }

    fn user() -> AuthenticatedUser {
        AuthenticatedUser::new(
            UserId::new(42).unwrap(),
            Some("ana@example.com".to_string()),
            Some("Ana López".to_string()),
        )
    }

    fn sign(claims: &SessionClaims, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn issued_token_validates_to_same_user() {
        let svc = service();
        let token = svc.issue(&user()).unwrap();

        let validated = svc.validate(&token).await.unwrap();

        assert_eq!(validated, user());
    }

    #[tokio::test]
    async fn token_signed_with_other_secret_is_invalid() {
        let other = JwtSessionService::new("ffffffffffffffffffffffffffffffff", Duration::minutes(5));
        let token = other.issue(&user()).unwrap();

        assert_eq!(service().validate(&token).await, Err(AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn expired_token_is_reported_as_expired() {
        let past = Utc::now() - Duration::hours(2);
        let claims = SessionClaims {
            sub: "42".into(),
            email: None,
            name: None,
            exp: (past + Duration::minutes(1)).timestamp(),
            iat: past.timestamp(),
        };

        let result = service().validate(&sign(&claims, SECRET)).await;

        assert_eq!(result, Err(AuthError::TokenExpired));
    }

    #[tokio::test]
    async fn non_numeric_subject_is_invalid() {
        let claims = SessionClaims {
            sub: "user-abc".into(),
            email: None,
            name: None,
            exp: (Utc::now() + Duration::minutes(5)).timestamp(),
            iat: Utc::now().timestamp(),
        };

        let result = service().validate(&sign(&claims, SECRET)).await;

        assert_eq!(result, Err(AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn garbage_is_invalid() {
        assert_eq!(service().validate("not.a.jwt").await, Err(AuthError::InvalidToken));
    }

    #[test]
    fn debug_does_not_print_secret() {
        assert!(!format!("{:?}", service()).contains(SECRET));
    }
}
