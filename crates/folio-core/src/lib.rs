pub mod chat;
pub mod extract;
pub mod greeting;
pub mod prompt;
pub mod sanitize;

pub use chat::{ChatReply, ChatRequest, ErrorBody, HistoryEntry};
pub use extract::extract_text;
pub use greeting::is_greeting;
pub use prompt::build_prompt;
pub use sanitize::sanitize;
