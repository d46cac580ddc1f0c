//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `account` - Registered candidates and credential rules
//! - `foundation` - Shared domain primitives (IDs, timestamps, auth, errors)
//! - `interview` - Conversations, turns, metadata extraction and ratings
//! - `sanitization` - Input screening and report post-processing

pub mod account;
pub mod foundation;
pub mod interview;
pub mod sanitization;
