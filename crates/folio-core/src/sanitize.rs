//! Reply sanitisation: turns whatever the model said into a short, display-safe reply.
//!
//! The output is plain printable ASCII (plus newlines), has any leading
//! greeting removed, and holds at most [`MAX_SENTENCES`] sentence-like
//! segments. It is never empty: [`FALLBACK_REPLY`] stands in when nothing
//! usable is left.
//!
//! One exception to the ASCII rule: text capped at [`MAX_REPLY_CHARS`] ends
//! in a single `\u{2026}` so the result stays within one character of the
//! cap. Sanitising such a reply again turns the ellipsis into a trailing
//! space, which is trimmed away.

use std::sync::LazyLock;

use regex::Regex;

/// Reply used when the model produced nothing displayable.
pub const FALLBACK_REPLY: &str = "I don't know.";

/// Sentence-like segments kept in a reply.
pub const MAX_SENTENCES: usize = 3;

/// Character cap applied when sentence segmentation yields nothing.
pub const MAX_REPLY_CHARS: usize = 450;

const ELLIPSIS: char = '\u{2026}';

static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{2,}").expect("blank-line pattern"));

static NON_PRINTABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\x20-\x7E\n]").expect("non-printable pattern"));

static INLINE_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]{2,}").expect("inline-space pattern"));

static LEADING_GREETING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:hi|hello|hey|greetings)[.,!\s-]+").expect("greeting pattern")
});

/// A run of non-terminators followed by at most one `.`, `!` or `?`.
static SENTENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^.!?]+[.!?]?").expect("sentence pattern"));

/// Sanitise raw model text into the final user-facing reply.
///
/// # Algorithm
///
/// 1. Empty input → [`FALLBACK_REPLY`]
/// 2. Normalise line endings, collapse blank-line runs, replace anything
///    outside printable ASCII with a space, squeeze and trim each line
/// 3. Strip one leading greeting (`hi`, `hello`, `hey`, `greetings`) and the
///    punctuation after it
/// 4. Keep the first [`MAX_SENTENCES`] segments; if there are none, cap the
///    text at [`MAX_REPLY_CHARS`] characters plus an ellipsis
/// 5. Empty result → [`FALLBACK_REPLY`]
pub fn sanitize(raw: &str) -> String {
    if raw.is_empty() {
        return FALLBACK_REPLY.to_string();
    }

    let text = normalise(raw);
    // One greeting per pass: "Hello. Hi. ..." keeps "Hi." until sanitised again.
    let text = strip_greeting(&text);

    let mut reply = first_sentences(text, MAX_SENTENCES);
    if reply.is_empty() {
        reply = truncate(text, MAX_REPLY_CHARS);
    }

    if reply.is_empty() {
        FALLBACK_REPLY.to_string()
    } else {
        reply
    }
}

fn normalise(raw: &str) -> String {
    let text = raw.replace("\r\n", "\n").replace('\r', "\n");
    let text = BLANK_LINES.replace_all(text.trim(), "\n\n");
    let text = NON_PRINTABLE.replace_all(&text, " ");

    let lines: Vec<String> = text
        .split('\n')
        .map(|line| INLINE_SPACE.replace_all(line, " ").trim().to_string())
        .collect();
    let text = lines.join("\n");

    // Lines blanked by the character filter can form new blank-line runs.
    BLANK_LINES.replace_all(text.trim(), "\n\n").into_owned()
}

fn strip_greeting(text: &str) -> &str {
    match LEADING_GREETING.find(text) {
        Some(m) => &text[m.end()..],
        None => text,
    }
}

fn first_sentences(text: &str, limit: usize) -> String {
    let text = text.trim();
    let mut segments = SENTENCE
        .find_iter(text)
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .peekable();

    // Pure punctuation has no segments; the caller caps it by length instead.
    if segments.peek().is_none() {
        return String::new();
    }

    segments.take(limit).collect::<Vec<_>>().join(" ")
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => {
            let mut out = text[..end].trim_end().to_string();
            out.push(ELLIPSIS);
            out
        }
        None => text.to_string(),
    }
}
