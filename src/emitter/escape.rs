// src/emitter/escape.rs

//! Escape text into Rust string literals.

/// Render `s` as a double-quoted Rust string literal.
///
/// `\`, `"`, newline, carriage return, tab and NUL use their short escapes.
/// Other control characters, and DEL, become `\u{XX}`. Every other
/// character, including all non-ASCII text, is kept verbatim so the literal
/// reads like the input.
pub fn rust_str_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            c if c.is_control() => {
                out.push_str(&format!("\\u{{{:02X}}}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');

    out
}
