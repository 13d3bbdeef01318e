//! Wire types exchanged between the portfolio page and the proxy.

use serde::{Deserialize, Serialize};

/// One prior turn of the conversation, as tracked by the browser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryEntry {
    pub role: String,
    pub content: String,
}

/// Inbound chat request.
///
/// Every field is optional on the wire; missing fields decode as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatRequest {
    /// Model hint from the client. Accepted for compatibility; the upstream
    /// endpoint URL decides the model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub prompt: String,
    /// Profile text the answer must be grounded in.
    pub context: String,
    pub history: Vec<HistoryEntry>,
}

/// Successful response body: `{ "reply": "..." }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}

impl ChatReply {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

/// Failure response body: `{ "error": "..." }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
