//! Quoted path literal extraction.
//!
//! A quoted path literal is a run of path-safe characters (`A-Z a-z 0-9 . / _ - @`)
//! with a `'` or `"` on both sides. The two quotes need not match, and each quote
//! can close one literal and open the next, so `'foo'bar'` yields both `foo` and `bar`.

use super::*;

fn is_path_safe(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'.' | b'/' | b'_' | b'-' | b'@')
}

fn is_quote(byte: u8) -> bool {
    matches!(byte, b'\'' | b'"')
}

pub(crate) fn is_path_safe_key(key: &str) -> bool {
    PATH_SAFE_KEY_RE.is_match(key)
}

pub(crate) fn quoted_literals(source: &str) -> Vec<&str> {
    let bytes = source.as_bytes();
    let mut out = Vec::new();

    for (open, _) in bytes.iter().enumerate().filter(|(_, b)| is_quote(**b)) {
        let start = open + 1;
        let mut end = start;
        while end < bytes.len() && is_path_safe(bytes[end]) {
            end += 1;
        }

        // Both delimiters and every byte in between are ASCII, so the slice
        // boundaries are char boundaries.
        if end < bytes.len() && is_quote(bytes[end]) {
            out.push(&source[start..end]);
        }
    }

    out
}

/// First quoted path literal in `source` that ends with `key`.
pub(crate) fn literal_ending_with<'s>(source: &'s str, key: &str) -> Option<&'s str> {
    if !source.contains(key) {
        return None;
    }

    quoted_literals(source)
        .into_iter()
        .find(|literal| literal.ends_with(key))
}
