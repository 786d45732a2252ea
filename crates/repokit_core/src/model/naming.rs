//! Naming conventions shared by model resolution and finder dispatch.
//!
//! # Invariants
//! - `snake_case` is idempotent on lowercase input.
//! - Only names accepted by `is_identifier` are ever interpolated into SQL.

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));
static IDENTIFIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier regex"));

/// Converts a camel/studly-case name to lower snake case.
///
/// Every uppercase character that follows another character gets a `_`
/// in front, so `EmailAddress` -> `email_address` and `UserID` -> `user_i_d`.
/// Whitespace separates words: `blog post` -> `blog_post`.
pub fn snake_case(value: &str) -> String {
    if value.chars().all(char::is_lowercase) {
        return value.to_string();
    }

    let compact: String = WHITESPACE_RE
        .split(value)
        .map(capitalize_first)
        .collect();
    let mut snake = String::with_capacity(compact.len() + 4);
    for (index, ch) in compact.chars().enumerate() {
        if index > 0 && ch.is_uppercase() {
            snake.push('_');
        }
        snake.extend(ch.to_lowercase());
    }
    snake
}

fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Returns whether `value` is a plain SQL identifier.
pub fn is_identifier(value: &str) -> bool {
    IDENTIFIER_RE.is_match(value)
}
