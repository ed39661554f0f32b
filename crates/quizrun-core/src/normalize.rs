//! Question-text cleanup.
//!
//! Banks often number their questions inline ("Câu 12. ..."). When the session
//! shuffles questions those numbers become misleading, so the presentation
//! layer can strip them at render time. Stored records are never modified.

use std::sync::LazyLock;

use regex::Regex;

/// Leading ordinal marker: "câu", whitespace, digits, then `:` or `.`.
static ORDINAL_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i:câu)\s+\d+[:.]\s*").expect("ordinal prefix pattern is valid")
});

/// Strip a leading "Câu N." marker and surrounding whitespace.
///
/// Text without a marker comes back trimmed and otherwise unchanged. Nothing
/// past the leading marker is touched. Back-to-back markers are all removed so
/// that cleaning is idempotent.
pub fn clean(text: &str) -> String {
    let mut rest = text.trim_start();
    while let Some(found) = ORDINAL_PREFIX.find(rest) {
        rest = rest[found.end()..].trim_start();
    }
    rest.trim_end().to_string()
}

/// Apply [`clean`] only when cleanup is enabled.
pub fn display_text(text: &str, clean_enabled: bool) -> String {
    if clean_enabled {
        clean(text)
    } else {
        text.to_string()
    }
}
