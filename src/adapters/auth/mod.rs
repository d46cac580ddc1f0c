//! Authentication adapters.
//!
//! - `jwt` - HS256 tokens signed with the configured secret
//! - `mock` - fixed tokens for tests
//! - `password` - Argon2id credential hashing

mod jwt;
mod mock;
mod password;

pub use jwt::JwtSessionService;
pub use mock::MockSessionValidator;
pub use password::Argon2PasswordHasher;
