//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.
//!
//! - `interview` - reply, report and initialization exchanges
//! - `chat` - conversation management
//! - `account` - registration, login and session lookup

pub mod account;
pub mod chat;
pub mod interview;

pub use account::{
    AccountError, AuthSession, GetCurrentUserHandler, GetCurrentUserQuery, LoginCommand,
    LoginHandler, RegisterCommand, RegisterHandler,
};
pub use chat::{
    ChatError, CreateChatCommand, CreateChatHandler, DeleteChatCommand, DeleteChatHandler,
    GetChatHandler, GetChatQuery, ListChatsHandler, ListChatsQuery, ListMessagesHandler,
    ListMessagesQuery, RenameChatCommand, RenameChatHandler, SetChatStatusCommand,
    SetChatStatusHandler,
};
pub use interview::{
    build_history, ExchangeError, GenerateReportCommand, GenerateReportHandler,
    GenerateReportResult, InitializeInterviewCommand, InitializeInterviewHandler,
    InitializeInterviewResult, SendReplyCommand, SendReplyHandler, SendReplyResult,
};
