//! Built-in expansion rules.
//!
//! Each submodule owns a family of macros and exposes one constructor per
//! macro returning its [`MacroDef`]: the public signature plus the rule
//! for each role it plays. Rules are stateless; everything they need
//! arrives through their arguments and the [`MacroExpansionContext`].
//!
//! [`MacroExpansionContext`]: crate::macros::MacroExpansionContext

use crate::macros::types::MacroDef;

pub mod broadcast;
pub mod codable;
pub mod completion;
pub mod declaration;
pub mod dictionary_storage;
pub mod expression;
pub mod extension;

/// Every macro the plugin provides, in the order the plugin lists them.
pub fn definitions() -> Vec<MacroDef> {
    vec![
        expression::stringify(),
        expression::url(),
        codable::custom_codable(),
        codable::codable_key(),
        declaration::declare_static_value(),
        declaration::constant(),
        completion::add_completion_handler(),
        dictionary_storage::dictionary_storage_property(),
        extension::equatable(),
        broadcast::objc_members(),
        broadcast::member_deprecated(),
        dictionary_storage::dictionary_storage(),
    ]
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::syntax::{SourceFile, Span};

    /// Span of the first occurrence of `needle` in `text`.
    pub fn span_of(text: &str, needle: &str) -> Span {
        let start = text.find(needle).unwrap_or_else(|| panic!("{needle:?} not in source"));
        Span::new(start, start + needle.len())
    }

    pub fn source(text: &str) -> SourceFile {
        SourceFile::new("test.swift", text)
    }
}
