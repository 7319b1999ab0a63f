//! Slug derivation.
//!
//! Slugs are the public, URL-safe identifiers consumers use to address
//! categories, tags and posts. They are derived once from the title and never
//! rewritten afterwards.

use unicode_normalization::UnicodeNormalization;

/// Derive a slug from a title.
///
/// The title is NFKD-normalised and reduced to ASCII, lowercased, and every
/// run of whitespace or dashes becomes a single `-`. Characters other than
/// `[a-z0-9_-]` are dropped and leading/trailing separators are trimmed.
pub fn slugify(input: &str) -> String {
    let ascii: String = input.nfkd().filter(char::is_ascii).collect();
    let lowered = ascii.to_lowercase();

    let mut out = String::with_capacity(lowered.len());
    let mut pending_dash = false;

    for ch in lowered.trim().chars() {
        if ch.is_whitespace() || ch == '-' {
            pending_dash = true;
            continue;
        }
        if !(ch.is_ascii_alphanumeric() || ch == '_') {
            continue;
        }
        if pending_dash && !out.is_empty() {
            out.push('-');
        }
        pending_dash = false;
        out.push(ch);
    }

    out.trim_matches(|c| c == '-' || c == '_').to_string()
}
