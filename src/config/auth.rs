//! Authentication configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Shortest accepted HS256 signing secret.
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// Session token configuration (HS256 JWT)
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HMAC signing secret
    #[serde(default)]
    pub jwt_secret: String,

    /// Token lifetime in minutes
    #[serde(default = "default_token_expiry")]
    pub token_expiry_minutes: u64,
}

impl AuthConfig {
    /// Get token lifetime as Duration
    pub fn token_expiry(&self) -> Duration {
        Duration::from_secs(self.token_expiry_minutes * 60)
    }

    /// Validate authentication configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.jwt_secret.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__JWT_SECRET"));
        }
        if self.jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ValidationError::JwtSecretTooShort(MIN_JWT_SECRET_LEN));
        }
        if self.token_expiry_minutes == 0 {
            return Err(ValidationError::InvalidTokenExpiry);
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_expiry_minutes: default_token_expiry(),
        }
    }
}

fn default_token_expiry() -> u64 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_config_defaults() {
        let config = AuthConfig::default();
        assert_eq!(config.token_expiry_minutes, 60);
        assert_eq!(config.token_expiry(), Duration::from_secs(3600));
    }

    #[test]
    fn test_validation_missing_secret() {
        assert_eq!(
            AuthConfig::default().validate(),
            Err(ValidationError::MissingRequired("AUTH__JWT_SECRET"))
        );
    }

    #[test]
    fn test_validation_short_secret() {
        let config = AuthConfig {
            jwt_secret: "too-short".to_string(),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::JwtSecretTooShort(32)));
    }

    #[test]
    fn test_validation_zero_expiry() {
        let config = AuthConfig {
            jwt_secret: "x".repeat(32),
            token_expiry_minutes: 0,
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidTokenExpiry));
    }

    #[test]
    fn test_validation_valid_config() {
        let config = AuthConfig {
            jwt_secret: "a-very-long-development-secret-value-123".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
