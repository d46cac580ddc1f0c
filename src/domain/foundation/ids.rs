//! Strongly-typed identifier value objects.
//!
//! Identifiers are opaque integers assigned by the persistence layer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use super::ValidationError;

/// Identifier of an account holder (candidate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Creates a UserId, rejecting non-positive values.
    pub fn new(id: i64) -> Result<Self, ValidationError> {
        if id < 1 {
            return Err(ValidationError::invalid_format("user_id", "must be positive"));
        }
        Ok(Self(id))
    }

    /// Returns the raw integer value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// Identifier of an interview conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(i64);

impl ConversationId {
    /// Wraps a raw id produced by the store.
    pub fn from_raw(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw integer value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ConversationId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// Identifier of a single conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TurnId(i64);

impl TurnId {
    /// Wraps a raw id produced by the store.
    pub fn from_raw(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw integer value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for TurnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
