//! Conversation entity and its status lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{ConversationId, Timestamp, UserId, ValidationError};

/// Title given to conversations created without one.
pub const DEFAULT_TITLE: &str = "Nuevo Chat";

/// Maximum title length in characters.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Lifecycle status of an interview conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConversationStatus {
    #[default]
    Active,
    Completed,
}

impl ConversationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationStatus::Active => "active",
            ConversationStatus::Completed => "completed",
        }
    }

    /// Returns true if this is the terminal status for the reply protocol.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ConversationStatus::Completed)
    }
}

impl fmt::Display for ConversationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConversationStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(ConversationStatus::Active),
            "completed" => Ok(ConversationStatus::Completed),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("expected 'active' or 'completed', got '{}'", other),
            )),
        }
    }
}

/// An interview conversation owned by one candidate.
///
/// `completed_at` is `Some` exactly when `status` is `Completed`. The
/// mutators below are the only way to change either field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    pub owner_id: UserId,
    pub title: String,
    status: ConversationStatus,
    pub created_at: Timestamp,
    pub last_message_at: Timestamp,
    completed_at: Option<Timestamp>,
}

impl Conversation {
    /// Creates a fresh active conversation.
    pub fn new(id: ConversationId, owner_id: UserId, title: String, now: Timestamp) -> Self {
        Self {
            id,
            owner_id,
            title,
            status: ConversationStatus::Active,
            created_at: now,
            last_message_at: now,
            completed_at: None,
        }
    }

    /// Rebuilds a conversation from storage, repairing a broken status invariant.
    pub fn reconstitute(
        id: ConversationId,
        owner_id: UserId,
        title: String,
        status: ConversationStatus,
        created_at: Timestamp,
        last_message_at: Timestamp,
        completed_at: Option<Timestamp>,
    ) -> Self {
        let completed_at = match status {
            ConversationStatus::Active => None,
            ConversationStatus::Completed => Some(completed_at.unwrap_or(last_message_at)),
        };
        Self {
            id,
            owner_id,
            title,
            status,
            created_at,
            last_message_at,
            completed_at,
        }
    }

    pub fn status(&self) -> ConversationStatus {
        self.status
    }

    pub fn completed_at(&self) -> Option<Timestamp> {
        self.completed_at
    }

    pub fn is_owned_by(&self, user: &UserId) -> bool {
        self.owner_id == *user
    }

    /// Returns true if new reply exchanges may be appended.
    pub fn accepts_replies(&self) -> bool {
        !self.status.is_terminal()
    }

    /// Marks the interview completed. A repeated call keeps the first
    /// completion time.
    pub fn mark_completed(&mut self, now: Timestamp) {
        if self.completed_at.is_none() {
            self.completed_at = Some(now);
        }
        self.status = ConversationStatus::Completed;
    }

    /// Returns the conversation to the active status.
    pub fn reopen(&mut self) {
        self.status = ConversationStatus::Active;
        self.completed_at = None;
    }

    /// Forced status edit from the management API.
    pub fn set_status(&mut self, status: ConversationStatus, now: Timestamp) {
        match status {
            ConversationStatus::Active => self.reopen(),
            ConversationStatus::Completed => self.mark_completed(now),
        }
    }

    /// Records activity on the conversation.
    pub fn touch(&mut self, now: Timestamp) {
        self.last_message_at = now;
    }

    /// Renames the conversation after validating the new title.
    pub fn rename(&mut self, title: &str) -> Result<(), ValidationError> {
        self.title = validate_title(title)?;
        Ok(())
    }
}

/// Trims and checks a title, substituting the default when absent.
pub fn normalize_title(title: Option<&str>) -> Result<String, ValidationError> {
    match title.map(str::trim) {
        None | Some("") => Ok(DEFAULT_TITLE.to_string()),
        Some(t) => validate_title(t),
    }
}

fn validate_title(title: &str) -> Result<String, ValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::empty_field("title"));
    }
    let len = trimmed.chars().count();
    if len > MAX_TITLE_LENGTH {
        return Err(ValidationError::out_of_range(
            "title",
            1,
            MAX_TITLE_LENGTH as i32,
            len as i32,
        ));
    }
    Ok(trimmed.to_string())
}
