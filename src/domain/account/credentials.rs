//! Registration field rules.
//!
//! Emails are trimmed and lowercased so lookups are case-insensitive.
//! Names are letters and spaces only; passwords need a letter and a digit.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::foundation::ValidationError;

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 128;
pub const MIN_NAME_LENGTH: usize = 2;
pub const MAX_NAME_LENGTH: usize = 120;
const MAX_EMAIL_LENGTH: usize = 255;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s.]+$").expect("valid email regex"));

/// Trims, lowercases and checks the shape of an email address.
pub fn normalize_email(raw: &str) -> Result<String, ValidationError> {
    let email = raw.trim().to_lowercase();
    if email.is_empty() {
        return Err(ValidationError::empty_field("email"));
    }
    if email.chars().count() > MAX_EMAIL_LENGTH || !EMAIL_PATTERN.is_match(&email) {
        return Err(ValidationError::invalid_format("email", "not a valid email address"));
    }
    Ok(email)
}

/// Checks length and composition. The password itself is never altered.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    let len = password.chars().count();
    if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&len) {
        return Err(ValidationError::out_of_range(
            "password",
            MIN_PASSWORD_LENGTH as i32,
            MAX_PASSWORD_LENGTH as i32,
            len as i32,
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::invalid_format("password", "must contain a digit"));
    }
    if !password.chars().any(char::is_alphabetic) {
        return Err(ValidationError::invalid_format("password", "must contain a letter"));
    }
    Ok(())
}

/// Trims a display name and checks it holds only letters and spaces.
pub fn normalize_name(raw: &str) -> Result<String, ValidationError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ValidationError::empty_field("nombre"));
    }
    let len = name.chars().count();
    if !(MIN_NAME_LENGTH..=MAX_NAME_LENGTH).contains(&len) {
        return Err(ValidationError::out_of_range(
            "nombre",
            MIN_NAME_LENGTH as i32,
            MAX_NAME_LENGTH as i32,
            len as i32,
        ));
    }
    if !name.chars().all(|c| c.is_alphabetic() || c.is_whitespace()) {
        return Err(ValidationError::invalid_format(
            "nombre",
            "only letters and spaces are allowed",
        ));
    }
    Ok(name.to_string())
}
