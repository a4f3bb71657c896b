//! Shared helpers for the expansion integration tests.

#![allow(dead_code)]

use custom_codable::macros::{plugin_registry, MacroRegistry};
use custom_codable::syntax::{SourceFile, Span};
use difference::{Changeset, Difference};

pub fn registry() -> &'static MacroRegistry {
    plugin_registry().expect("built-in macros register without duplicates")
}

pub fn source(text: &str) -> SourceFile {
    SourceFile::new("test.swift", text)
}

/// Span of the first occurrence of `needle` in `text`.
pub fn span_of(text: &str, needle: &str) -> Span {
    let start = text
        .find(needle)
        .unwrap_or_else(|| panic!("{needle:?} does not occur in {text:?}"));
    Span::new(start, start + needle.len())
}

/// Fails with a line diff when `actual` differs from `expected`.
pub fn assert_expansion(actual: &str, expected: &str) {
    if actual == expected {
        return;
    }
    let changeset = Changeset::new(expected, actual, "\n");
    let mut report = String::from("expansion mismatch (-expected +actual):\n");
    for diff in &changeset.diffs {
        let (marker, text) = match diff {
            Difference::Same(text) => (' ', text),
            Difference::Add(text) => ('+', text),
            Difference::Rem(text) => ('-', text),
        };
        for line in text.lines() {
            report.push(marker);
            report.push_str(line);
            report.push('\n');
        }
    }
    panic!("{report}");
}
