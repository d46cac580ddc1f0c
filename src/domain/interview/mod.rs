//! Interview module - conversations, turns and what is derived from them.

mod conversation;
mod metadata;
mod rating;
mod turn;

pub use conversation::{
    normalize_title, Conversation, ConversationStatus, DEFAULT_TITLE, MAX_TITLE_LENGTH,
};
pub use metadata::{
    AcademicLevel, InterviewDuration, InterviewMetadata, MetadataExtractor, RoleLevel,
    TrainingCycle, DEFAULT_EXTRACTION_WINDOW, UNSPECIFIED,
};
pub use rating::EmployabilityRating;
pub use turn::{Sender, Turn};
