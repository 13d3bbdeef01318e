//! Best-effort text extraction from generation API responses.
//!
//! Upstream response shapes drift between providers and API versions, so the
//! extractor never trusts a single schema. Known layouts are tried from most
//! to least specific, and the first one that yields text wins:
//!
//! 1. `candidates[]` (Generative Language / Gemini)
//! 2. `output[].content[]` (older output arrays)
//! 3. `content.parts[]`
//! 4. `choices[]` (OpenAI-style)
//! 5. top-level `reply`, `text`, `output.text`
//! 6. every leaf string in the document
//! 7. the document itself, serialised

use std::collections::HashSet;

use serde_json::Value;
use tracing::debug;

const LINE: &str = "\n";
const BLANK_LINE: &str = "\n\n";

/// Pull the most plausible human-readable text out of an upstream response.
///
/// Never fails: `null` yields an empty string, a bare string is returned
/// unchanged, and a document with no text at all is returned as JSON.
pub fn extract_text(response: &Value) -> String {
    match response {
        Value::Null => return String::new(),
        Value::String(s) => return s.clone(),
        _ => {}
    }

    let strategies: [(&str, fn(&Value) -> Option<String>); 6] = [
        ("candidates", from_candidates),
        ("output", from_output_array),
        ("content.parts", from_content_parts),
        ("choices", from_choices),
        ("simple-field", from_simple_fields),
        ("leaf-strings", from_leaf_strings),
    ];

    for (layout, strategy) in strategies {
        if let Some(text) = strategy(response) {
            debug!(layout, chars = text.len(), "extracted upstream text");
            return text;
        }
    }

    debug!("no text found in upstream response, serialising it");
    serialise(response)
}

/// Collect every leaf string under `value` in traversal order.
///
/// Array elements and object values are visited in document order; keys are
/// ignored. Strings are trimmed and blank ones skipped, numbers and booleans
/// are stringified, nulls are dropped. Containers already visited are skipped.
pub fn collect_leaf_strings(value: &Value) -> Vec<String> {
    let mut collector = LeafCollector::default();
    collector.visit(value);
    collector.leaves
}

#[derive(Default)]
struct LeafCollector {
    /// Identity of every container entered so far.
    seen: HashSet<*const Value>,
    leaves: Vec<String>,
}

impl LeafCollector {
    fn visit(&mut self, value: &Value) {
        match value {
            Value::Null => {}
            Value::Bool(b) => self.leaves.push(b.to_string()),
            Value::Number(n) => self.leaves.push(n.to_string()),
            Value::String(s) => {
                let s = s.trim();
                if !s.is_empty() {
                    self.leaves.push(s.to_string());
                }
            }
            Value::Array(items) => {
                if self.enter(value) {
                    for item in items {
                        self.visit(item);
                    }
                }
            }
            Value::Object(map) => {
                if self.enter(value) {
                    for item in map.values() {
                        self.visit(item);
                    }
                }
            }
        }
    }

    /// Returns `false` if this container was already visited.
    fn enter(&mut self, value: &Value) -> bool {
        self.seen.insert(value as *const Value)
    }
}

// ── Layout strategies ──

fn from_candidates(response: &Value) -> Option<String> {
    let candidates = non_empty_array(response, "candidates")?;
    let texts: Vec<String> = candidates
        .iter()
        .map(candidate_text)
        .filter(|t| !t.is_empty())
        .collect();
    non_empty(texts.join(BLANK_LINE))
}

fn candidate_text(candidate: &Value) -> String {
    if let Value::String(s) = candidate {
        return s.clone();
    }

    match candidate.get("content") {
        Some(Value::Array(items)) => return join_texts(items, Element::TextOrString, LINE),
        Some(Value::String(s)) if !s.is_empty() => return s.clone(),
        Some(content) => {
            if let Some(parts) = array_field(content, "parts") {
                return join_texts(parts, Element::TextField, LINE);
            }
        }
        None => {}
    }

    if let Some(output) = candidate.get("output") {
        if let Some(items) = array_field(output, "content") {
            return join_texts(items, Element::TextField, LINE);
        }
        if let Value::String(s) = output {
            return s.clone();
        }
    }

    collect_leaf_strings(candidate).join(LINE)
}

fn from_output_array(response: &Value) -> Option<String> {
    let outputs = non_empty_array(response, "output")?;
    let texts: Vec<String> = outputs
        .iter()
        .filter_map(|output| array_field(output, "content"))
        .map(|items| join_texts(items, Element::TextOrString, LINE))
        .filter(|t| !t.is_empty())
        .collect();
    non_empty(texts.join(BLANK_LINE))
}

fn from_content_parts(response: &Value) -> Option<String> {
    let parts = array_field(response.get("content")?, "parts")?;
    non_empty(join_texts(parts, Element::TextField, LINE))
}

fn from_choices(response: &Value) -> Option<String> {
    let choices = non_empty_array(response, "choices")?;

    for choice in choices {
        let content = choice.get("message").and_then(|m| m.get("content"));

        // `message.content.parts[]`, or `message.content[]` used directly as parts.
        let parts = content
            .and_then(|c| array_field(c, "parts"))
            .or_else(|| content.and_then(Value::as_array));
        if let Some(parts) = parts {
            let text = join_texts(parts, Element::TextOrString, BLANK_LINE);
            if !text.is_empty() {
                return Some(text);
            }
        }

        if let Some(text) = str_field(choice, "text").and_then(non_blank) {
            return Some(text.to_string());
        }
        if let Some(text) = content.and_then(Value::as_str).and_then(non_blank) {
            return Some(text.to_string());
        }
    }

    None
}

fn from_simple_fields(response: &Value) -> Option<String> {
    str_field(response, "reply")
        .and_then(non_blank)
        .or_else(|| str_field(response, "text").and_then(non_blank))
        .or_else(|| {
            response
                .get("output")
                .and_then(|output| str_field(output, "text"))
                .and_then(non_blank)
        })
        .map(str::to_string)
}

fn from_leaf_strings(response: &Value) -> Option<String> {
    let joined = collect_leaf_strings(response).join(LINE);
    non_blank(&joined).map(str::to_string)
}

fn serialise(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}

// ── Shape predicates ──

/// How an array element contributes text when joining.
#[derive(Debug, Clone, Copy)]
enum Element {
    /// Only the element's `text` field.
    TextField,
    /// The element's `text` field, or the element itself if it is a string.
    TextOrString,
}

fn element_text(item: &Value, element: Element) -> Option<&str> {
    match (item, element) {
        (Value::String(s), Element::TextOrString) => Some(s),
        _ => str_field(item, "text"),
    }
}

fn join_texts(items: &[Value], element: Element, separator: &str) -> String {
    items
        .iter()
        .filter_map(|item| element_text(item, element))
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

fn array_field<'a>(value: &'a Value, key: &str) -> Option<&'a Vec<Value>> {
    value.get(key)?.as_array()
}

fn non_empty_array<'a>(value: &'a Value, key: &str) -> Option<&'a Vec<Value>> {
    array_field(value, key).filter(|items| !items.is_empty())
}

fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key)?.as_str()
}

fn non_blank(s: &str) -> Option<&str> {
    let s = s.trim();
    (!s.is_empty()).then_some(s)
}

fn non_empty(s: String) -> Option<String> {
    (!s.is_empty()).then_some(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn gemini_candidate_parts() {
        let resp = json!({
            "candidates": [{ "content": { "parts": [{ "text": "Answer A" }], "role": "model" } }]
        });
        assert_eq!(extract_text(&resp), "Answer A");
    }

    #[test]
    fn candidate_parts_joined_by_newline() {
        let resp = json!({
            "candidates": [{ "content": { "parts": [{ "text": "one" }, { "inlineData": {} }, { "text": "two" }] } }]
        });
        assert_eq!(extract_text(&resp), "one\ntwo");
    }

    #[test]
    fn candidate_output_content() {
        let resp = json!({
            "candidates": [{ "output": { "content": [{ "text": "X" }, { "text": "Y" }] } }]
        });
        assert_eq!(extract_text(&resp), "X\nY");
    }

    #[test]
    fn candidate_content_array_accepts_strings() {
        let resp = json!({ "candidates": [{ "content": ["raw", { "text": "typed" }] }] });
        assert_eq!(extract_text(&resp), "raw\ntyped");
    }

    #[test]
    fn candidate_string_forms() {
        let resp = json!({
            "candidates": ["bare", { "content": "as content" }, { "output": "as output" }]
        });
        assert_eq!(extract_text(&resp), "bare\n\nas content\n\nas output");
    }

    #[test]
    fn unknown_candidate_shape_collects_leaves() {
        let resp = json!({
            "candidates": [{ "message": { "body": "first", "extra": ["second", 3, true, null] } }]
        });
        assert_eq!(extract_text(&resp), "first\nsecond\n3\ntrue");
    }

    #[test]
    fn empty_candidates_fall_through() {
        let resp = json!({
            "candidates": [{ "content": { "parts": [] } }],
            "reply": "from reply"
        });
        assert_eq!(extract_text(&resp), "from reply");
    }

    #[test]
    fn candidates_win_over_later_layouts() {
        let resp = json!({
            "candidates": [{ "content": { "parts": [{ "text": "primary" }] } }],
            "choices": [{ "text": "secondary" }],
            "reply": "tertiary"
        });
        assert_eq!(extract_text(&resp), "primary");
    }

    #[test]
    fn output_array_layout() {
        let resp = json!({
            "output": [
                { "content": [{ "text": "a" }, "b"] },
                { "type": "reasoning" },
                { "content": [{ "text": "c" }] }
            ]
        });
        assert_eq!(extract_text(&resp), "a\nb\n\nc");
    }

    #[test]
    fn top_level_content_parts() {
        let resp = json!({ "content": { "parts": [{ "text": "p1" }, { "text": "p2" }] } });
        assert_eq!(extract_text(&resp), "p1\np2");
    }

    #[test]
    fn openai_plain_message_content() {
        let resp = json!({ "choices": [{ "message": { "content": "plain answer" } }] });
        assert_eq!(extract_text(&resp), "plain answer");
    }

    #[test]
    fn openai_content_parts_use_blank_line() {
        let resp = json!({
            "choices": [{ "message": { "content": { "parts": ["one", { "text": "two" }] } } }]
        });
        assert_eq!(extract_text(&resp), "one\n\ntwo");
    }

    #[test]
    fn openai_completion_text_trimmed() {
        let resp = json!({ "choices": [{ "text": "  completion  " }] });
        assert_eq!(extract_text(&resp), "completion");
    }

    #[test]
    fn choices_scan_past_blank_entries() {
        let resp = json!({
            "choices": [
                { "message": { "content": "   " } },
                { "message": { "content": "second choice" } }
            ]
        });
        assert_eq!(extract_text(&resp), "second choice");
    }

    #[test]
    fn simple_fields_in_priority_order() {
        assert_eq!(extract_text(&json!({ "reply": " r ", "text": "t" })), "r");
        assert_eq!(extract_text(&json!({ "reply": "", "text": "t" })), "t");
        assert_eq!(extract_text(&json!({ "output": { "text": "o" } })), "o");
    }

    #[test]
    fn nested_leaf_strings() {
        let resp = json!({ "foo": { "bar": ["a", "b"] } });
        assert_eq!(extract_text(&resp), "a\nb");
    }

    #[test]
    fn leaf_order_follows_document() {
        let resp = json!({ "zeta": "first", "alpha": "second" });
        assert_eq!(extract_text(&resp), "first\nsecond");
    }

    #[test]
    fn bare_string_unchanged() {
        assert_eq!(extract_text(&json!("  spaced  ")), "  spaced  ");
    }

    #[test]
    fn null_is_empty() {
        assert_eq!(extract_text(&Value::Null), "");
    }

    #[test]
    fn scalars_are_stringified() {
        assert_eq!(extract_text(&json!(42)), "42");
        assert_eq!(extract_text(&json!(false)), "false");
    }

    #[test]
    fn textless_document_is_serialised() {
        assert_eq!(extract_text(&json!({})), "{}");
        assert_eq!(extract_text(&json!({ "a": null, "b": [] })), r#"{"a":null,"b":[]}"#);
    }

    #[test]
    fn leaf_collector_skips_blank_strings() {
        let leaves = collect_leaf_strings(&json!(["", "  ", " x ", [[1.5]]]));
        assert_eq!(leaves, vec!["x", "1.5"]);
    }

    #[test]
    fn leaf_collector_visits_each_container_once() {
        let mut collector = LeafCollector::default();
        let value = json!({ "k": ["v"] });
        collector.visit(&value);
        collector.visit(&value);
        assert_eq!(collector.leaves, vec!["v"]);
    }
}
