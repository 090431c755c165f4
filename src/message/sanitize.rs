//! Escaping of user-supplied text before it enters the relay template.
//!
//! The relay substitutes parameters into an HTML email template, so angle
//! brackets and backticks are removed outright and the characters that can
//! break out of attribute values are replaced with entities.

/// Sanitize one free-text value. Leading and trailing whitespace is trimmed.
pub fn sanitize_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.trim().chars() {
        match c {
            '<' | '>' | '`' => {}
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Sanitize an optional value, substituting `fallback` when nothing is left.
pub fn sanitize_or(value: Option<&str>, fallback: &str) -> String {
    let cleaned = value.map(sanitize_text).unwrap_or_default();
    if cleaned.trim().is_empty() {
        fallback.to_string()
    } else {
        cleaned
    }
}
