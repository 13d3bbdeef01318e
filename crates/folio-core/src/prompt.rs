//! Prompt assembly for the upstream model.
//!
//! The generation endpoint takes a single user text, so the instruction,
//! profile context, history and question are flattened into one document.

use crate::chat::{ChatRequest, HistoryEntry};

/// Instruction prepended to every upstream prompt.
pub const SYSTEM_INSTRUCTION: &str = "\
You are an assistant that answers questions about the user's resume and portfolio. \
Use ONLY the provided profile context and conversation history to answer. \
Provide concise, relevant answers: maximum 3 short sentences or up to 3 bullet points. \
If the answer is not present in the context, reply with \"I don't know.\" \
Return plain text only; do not wrap the answer in JSON or other markup.";

/// Build the full upstream prompt text for a chat request.
///
/// Sections, separated by a blank line:
///
/// ```text
/// System Instruction:
/// ...
///
/// Profile Context:
/// ...
///
/// Conversation history:
/// role: content
///
/// User Question:
/// ...
/// ```
pub fn build_prompt(req: &ChatRequest) -> String {
    [
        format!("System Instruction:\n{SYSTEM_INSTRUCTION}"),
        format!("Profile Context:\n{}", req.context),
        format!("Conversation history:\n{}", format_history(&req.history)),
        format!("User Question:\n{}", req.prompt),
    ]
    .join("\n\n")
}

fn format_history(history: &[HistoryEntry]) -> String {
    history
        .iter()
        .map(|h| format!("{}: {}", h.role, h.content))
        .collect::<Vec<_>>()
        .join("\n")
}
