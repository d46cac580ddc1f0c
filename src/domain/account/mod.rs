//! Account module - registered candidates and credential rules.

mod credentials;
mod user;

pub use credentials::{
    normalize_email, normalize_name, validate_password, MAX_NAME_LENGTH, MAX_PASSWORD_LENGTH,
    MIN_NAME_LENGTH, MIN_PASSWORD_LENGTH,
};
pub use user::{NewUser, User};
