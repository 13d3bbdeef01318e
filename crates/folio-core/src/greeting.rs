//! Greeting short-circuit: trivial salutations are answered locally.

use std::sync::LazyLock;

use regex::Regex;

/// Canned reply for a bare greeting.
pub const DEFAULT_GREETING_REPLY: &str =
    "Hello \u{2014} ask me about Athar's skills, recent projects, experience, or contact information.";

static GREETING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:hi|hello|hey|hey there|hello there|good morning|good afternoon|good evening)[.!]?$",
    )
    .expect("greeting pattern")
});

/// True if the whole prompt is a bare greeting such as `"Hello!"` or
/// `"good morning"`. Surrounding whitespace and case are ignored.
pub fn is_greeting(prompt: &str) -> bool {
    GREETING.is_match(&prompt.trim().to_lowercase())
}
