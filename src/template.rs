//! `{{KEY}}` placeholder substitution for the page and script templates.

use std::collections::BTreeMap;

pub type Values = BTreeMap<&'static str, String>;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Replaces every `{{KEY}}` whose key is present in `values`.
///
/// The template is scanned once from left to right and each token is matched
/// on its whole key, so `{{NAME}}` never touches `{{PERSON_NAME}}`. Unknown
/// keys and an unterminated `{{` are copied through unchanged. Substituted
/// text is not scanned again.
pub fn render(template: &str, values: &Values) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find(OPEN) {
        output.push_str(&rest[..start]);
        let after_open = &rest[start + OPEN.len()..];

        let Some(end) = after_open.find(CLOSE) else {
            output.push_str(&rest[start..]);
            return output;
        };

        let key = &after_open[..end];
        match values.get(key) {
            Some(value) => {
                output.push_str(value);
                rest = &after_open[end + CLOSE.len()..];
            }
            None => {
                // Emit only the opening braces so a real token nested
                // after them (e.g. `{{{{KEY}}`) still gets a chance.
                output.push_str(OPEN);
                rest = after_open;
            }
        }
    }

    output.push_str(rest);
    output
}

pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escapes text for use inside a single or double quoted JS string literal.
pub fn escape_js(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '<' => out.push_str("\\u003c"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            _ => out.push(ch),
        }
    }
    out
}
