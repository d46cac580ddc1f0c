//! Account handlers.
//!
//! Registration, login and session lookup for candidates.

mod errors;
mod get_current_user;
mod login;
mod register;

pub use errors::AccountError;
pub use get_current_user::{GetCurrentUserHandler, GetCurrentUserQuery};
pub use login::{LoginCommand, LoginHandler};
pub use register::{AuthSession, RegisterCommand, RegisterHandler};
