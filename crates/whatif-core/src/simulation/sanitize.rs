//! Decision and narrative sanitizing plus the content safety gate

use regex::Regex;
use std::sync::LazyLock;

/// Longest decision kept before truncation
pub const MAX_DECISION_CHARS: usize = 500;

static SELF_HARM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(suicide|self[- ]?harm)\b").expect("Invalid self-harm regex")
});

static SCRIPT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script.*?>.*?</script>").expect("Invalid script regex"));

static JAVASCRIPT_SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)javascript:").expect("Invalid scheme regex"));

/// Escape HTML, cap the length and collapse whitespace runs
///
/// Truncated input is marked with a trailing `...`.
pub fn sanitize_decision(decision: &str) -> String {
    let escaped = escape_html(decision);
    let capped = if escaped.chars().count() > MAX_DECISION_CHARS {
        let mut head: String = escaped.chars().take(MAX_DECISION_CHARS).collect();
        head.push_str("...");
        head
    } else {
        escaped
    };
    capped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Make provider-generated text safe to render
///
/// Drops `<script>` blocks and `javascript:` schemes, then escapes what is
/// left as HTML.
pub fn sanitize_output(text: &str) -> String {
    let without_scripts = SCRIPT_BLOCK.replace_all(text, "");
    let without_schemes = JAVASCRIPT_SCHEME.replace_all(&without_scripts, "");
    escape_html(&without_schemes)
}

/// Returns the reason if `text` must not be simulated
pub fn check_content_safety(text: &str) -> Option<&'static str> {
    SELF_HARM.is_match(text).then_some("self-harm content")
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
