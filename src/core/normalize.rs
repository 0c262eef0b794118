// File: src/core/normalize.rs

/// Canonical form used on both sides of every comparison: lower-cased with
/// leading and trailing whitespace removed.
pub fn normalize(text: &str) -> String {
    text.to_lowercase().trim().to_string()
}
