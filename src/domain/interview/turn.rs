//! Conversation turns.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{ConversationId, Timestamp, TurnId, ValidationError};

/// Author of a turn.
///
/// Persisted with the storage tags `USER` and `IA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sender {
    #[serde(rename = "USER")]
    User,
    #[serde(rename = "IA")]
    Model,
}

impl Sender {
    /// Storage tag for this sender.
    pub fn as_tag(&self) -> &'static str {
        match self {
            Sender::User => "USER",
            Sender::Model => "IA",
        }
    }

    pub fn is_user(&self) -> bool {
        matches!(self, Sender::User)
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

impl FromStr for Sender {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USER" => Ok(Sender::User),
            "IA" | "MODEL" | "ASSISTANT" => Ok(Sender::Model),
            other => Err(ValidationError::invalid_format(
                "sender",
                format!("unknown sender tag '{}'", other),
            )),
        }
    }
}

/// One immutable message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub id: TurnId,
    pub conversation_id: ConversationId,
    pub sender: Sender,
    pub content: String,
    pub created_at: Timestamp,
}

impl Turn {
    pub fn is_from_user(&self) -> bool {
        self.sender.is_user()
    }
}
