//! Plate text normalization.
//!
//! # Responsibility
//! - Map raw plate input to the canonical key used for dedup and lookup.
//!
//! # Invariants
//! - Pure and deterministic: no I/O, no locale dependence.
//! - Only letters, digits and their combining marks survive; every other
//!   character is formatting.
//! - Output is NFC, so composed and decomposed spellings share one key.
//! - Letters keep their script. No look-alike folding across alphabets.
//! - Empty output is the sole "invalid input" signal.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static NON_IDENTITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{L}\p{M}\p{N}]+").expect("valid plate separator regex"));

/// Returns the canonical key for a raw plate string.
///
/// Case, whitespace and separators (`-`, `.`, `/`, `_`, `·`, ...) are dropped.
/// Returns an empty string when nothing identifying remains.
/// Accents are part of identity: `É1` and `E1` are different plates.
pub fn normalize_plate(raw: &str) -> String {
    let stripped = NON_IDENTITY_RE.replace_all(raw, "");
    // A lone combining mark identifies nothing.
    if !stripped.chars().any(char::is_alphanumeric) {
        return String::new();
    }
    stripped.to_uppercase().nfc().collect()
}
