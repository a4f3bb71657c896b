//! Macro registry for storage and lookup of macro definitions.
//!
//! # Error Handling
//!
//! Registration errors are reported as [`RegistryError`]. A lookup miss is not
//! an error here: [`MacroRegistry::lookup`] returns `None` and the caller
//! decides what an unregistered name means.
//!
//! # Features
//! - Register and look up macros by name (case-sensitive).
//! - No two entries share a name: registering a taken name is an error.
//! - [`plugin_registry`] exposes the process-wide table of built-in macros,
//!   built once on first use and read-only afterwards.
//!
//! # Summary Table
//! | Method              | Overwrites | Error on Duplicate | Notes                 |
//! |---------------------|------------|--------------------|-----------------------|
//! | register_or_error   | No         | Yes                | Used by the plugin    |
//! | lookup/contains     | N/A        | N/A                | Case-sensitive lookup |
//!
//! # See Also
//! - [`MacroDef`](crate::macros::types::MacroDef)
//! - [`MacroSignature`](crate::macros::signature::MacroSignature)

use std::collections::HashMap;

use miette::Diagnostic;
use once_cell::sync::Lazy;
use thiserror::Error;

use crate::macros::rules;
use crate::macros::types::MacroDef;

/// Failure to build or extend a registry.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum RegistryError {
    #[error("macro '{0}' is already registered")]
    #[diagnostic(
        code(custom_codable::registry::duplicate),
        help("every macro name in a plugin must be unique")
    )]
    Duplicate(String),
}

/// Name-keyed table of macro definitions.
///
/// Stores macro definitions by name. Names are case-sensitive.
///
/// # Thread Safety
/// Not synchronised. The shared instance behind [`plugin_registry`] is never
/// mutated after construction, so `&'static MacroRegistry` is freely shared.
///
/// # Example
/// ```rust
/// use custom_codable::macros::{plugin_registry, MacroRole};
/// let registry = plugin_registry().unwrap();
/// let stringify = registry.lookup("stringify").unwrap();
/// assert!(stringify.rule_for(MacroRole::Expression).is_some());
/// assert!(registry.lookup("Stringify").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MacroRegistry {
    macros: HashMap<String, MacroDef>,
}

impl MacroRegistry {
    /// Creates a new, empty macro registry.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use custom_codable::macros::MacroRegistry;
    /// let registry = MacroRegistry::new();
    /// assert!(registry.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `def`, returning an error if its name is already taken.
    ///
    /// # Errors
    /// Returns [`RegistryError::Duplicate`] if a macro with this name is already registered.
    ///
    /// # Example
    /// ```rust
    /// use custom_codable::macros::{rules, MacroRegistry};
    /// let mut reg = MacroRegistry::new();
    /// reg.register_or_error(rules::expression::stringify()).unwrap();
    /// assert!(reg.register_or_error(rules::expression::stringify()).is_err());
    /// ```
    pub fn register_or_error(&mut self, def: MacroDef) -> Result<(), RegistryError> {
        if self.macros.contains_key(def.name()) {
            return Err(RegistryError::Duplicate(def.name().to_string()));
        }
        tracing::trace!(name = def.name(), "registering macro");
        self.macros.insert(def.name().to_string(), def);
        Ok(())
    }

    /// Looks up a macro by exact, case-sensitive name.
    pub fn lookup(&self, name: &str) -> Option<&MacroDef> {
        self.macros.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.macros.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.macros.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macros.is_empty()
    }

    /// All registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.macros.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Definitions in name order.
    pub fn iter(&self) -> impl Iterator<Item = &MacroDef> {
        self.names()
            .into_iter()
            .filter_map(move |name| self.macros.get(name))
    }
}

// ============================================================================
// PLUGIN REGISTRY
// ============================================================================

/// Builds a registry holding every built-in macro.
///
/// # Errors
/// Fails if two built-in definitions share a name.
pub fn build_plugin_registry() -> Result<MacroRegistry, RegistryError> {
    let mut registry = MacroRegistry::new();
    for def in rules::definitions() {
        registry.register_or_error(def)?;
    }
    tracing::debug!(count = registry.len(), "plugin registry built");
    Ok(registry)
}

static PLUGIN_REGISTRY: Lazy<Result<MacroRegistry, RegistryError>> = Lazy::new(build_plugin_registry);

/// The process-wide registry of built-in macros.
pub fn plugin_registry() -> Result<&'static MacroRegistry, RegistryError> {
    (*PLUGIN_REGISTRY).as_ref().map_err(Clone::clone)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::macros::rules::expression;

    #[test]
    fn register_or_error_rejects_duplicates() {
        let mut registry = MacroRegistry::new();
        registry.register_or_error(expression::url()).unwrap();
        let err = registry.register_or_error(expression::url()).unwrap_err();
        assert_eq!(err, RegistryError::Duplicate("URL".into()));
    }

    #[test]
    fn refused_duplicate_keeps_the_first_definition() {
        let mut registry = MacroRegistry::new();
        registry.register_or_error(expression::stringify()).unwrap();
        assert!(registry.register_or_error(expression::stringify()).is_err());
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("stringify"));
    }

    #[test]
    fn names_are_sorted() {
        let registry = build_plugin_registry().unwrap();
        let names = registry.names();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
        assert_eq!(
            registry.iter().map(MacroDef::name).collect::<Vec<_>>(),
            names
        );
    }
}
