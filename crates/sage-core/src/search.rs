//! Search contracts shared by every store implementation.

use serde::{Deserialize, Serialize};

/// Similarity a trigram match must exceed, on a 0..1 scale.
pub const TRIGRAM_THRESHOLD: f64 = 0.1;

/// Optional search features of the active store.
///
/// Probed once when the store is opened; strategies consult this instead of
/// looking at engine names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Native linguistic full-text search.
    pub full_text: bool,
    /// Trigram similarity scoring.
    pub trigram: bool,
}

impl Capabilities {
    /// A store with neither optional feature.
    pub const fn basic() -> Self {
        Self {
            full_text: false,
            trigram: false,
        }
    }
}

/// A non-blank, trimmed search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm(String);

impl SearchTerm {
    /// Parse raw user input. Blank input means "no search applied".
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `%term%` pattern for a case-insensitive LIKE against lowercased text,
    /// with `\` as the escape character.
    pub fn contains_pattern(&self) -> String {
        format!("%{}%", escape_like(&self.0.to_lowercase()))
    }
}

/// Escape LIKE wildcards (`%`, `_`) and the escape character itself.
pub fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
