//! Log sanitization utilities
//!
//! Keeps API secrets out of logs and stops large response bodies
//! (full record listings, member lists) from flooding debug output.

/// Maximum number of bytes of a body to include in log output.
const TRUNCATE_LIMIT: usize = 256;

/// Number of trailing characters of a secret left visible by [`mask_secret`].
const VISIBLE_SECRET_TAIL: usize = 4;

/// Largest char boundary at or below `index`.
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    (0..=index).rev().find(|i| s.is_char_boundary(*i)).unwrap_or(0)
}

/// Truncate a response body for logging.
///
/// Bodies within the limit are returned unchanged; longer ones keep their
/// head and note the full length.
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        return s.to_string();
    }
    format!(
        "{}... [truncated, total {} bytes]",
        &s[..floor_char_boundary(s, TRUNCATE_LIMIT)],
        s.len()
    )
}

/// Mask a secret, keeping only its last few characters.
///
/// Short secrets are masked entirely.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= VISIBLE_SECRET_TAIL * 2 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - VISIBLE_SECRET_TAIL..].iter().collect();
    format!("{}{tail}", "*".repeat(chars.len() - VISIBLE_SECRET_TAIL))
}
