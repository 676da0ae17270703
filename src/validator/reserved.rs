//! Reserved-word table shared by enum-variant and identifier checks.
//! See spec.md §4.5 "Enums" and GLOSSARY "Reserved word".
//!
//! The table is split across the corpus into a mandatory set (hard error)
//! and an advisory set (lint warning) — spec.md §9 "Open questions" directs
//! treating the intersection as mandatory and the union as advisory.

/// Word, substitution hint.
const MANDATORY: &[(&str, &str)] = &[
    ("create", "add"),
    ("update", "modify"),
    ("delete", "remove"),
    ("email", "mail"),
    ("submitted", "sent"),
];

/// Advisory-only collisions: lint warnings, never errors. Kept separate so
/// growing this list can't silently turn a warning into a hard failure.
const ADVISORY: &[(&str, &str)] = &[
    ("read", "view"),
    ("list", "items"),
    ("new", "pending"),
    ("id", "key"),
];

pub fn mandatory_hint(word: &str) -> Option<&'static str> {
    MANDATORY
        .iter()
        .find(|(w, _)| *w == word)
        .map(|(_, hint)| *hint)
}

pub fn advisory_hint(word: &str) -> Option<&'static str> {
    ADVISORY
        .iter()
        .find(|(w, _)| *w == word)
        .map(|(_, hint)| *hint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_mandatory_reserved_words() {
        assert_eq!(mandatory_hint("submitted"), Some("sent"));
        assert_eq!(mandatory_hint("open"), None);
    }
}
