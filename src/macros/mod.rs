//! # Macro Expansion System
//!
//! This module holds the compile-time transformations and everything needed
//! to drive them: the rules, the pattern matchers they share, the public
//! signatures the host reads, the registry and the expander.
//!
//! ## Core Principles
//!
//! - **Syntactic Only**: rules see parsed syntax and nothing else. No type
//!   information, no name resolution, no evaluation.
//! - **Produce, never edit**: a rule returns freshly built nodes or a
//!   diagnostic. Input nodes are borrowed read-only.
//! - **Stateless**: each invocation gets its own [`MacroExpansionContext`];
//!   no rule carries data from one site to the next.
//!
//! **INVARIANT:** every produced node carries the span of the invocation that
//! produced it, so diagnostics on expanded code point at the macro site.
//!
//! ## Roles
//!
//! | Role              | Written as     | Produces                          |
//! |-------------------|----------------|-----------------------------------|
//! | expression        | `#name(args)`  | a replacement expression          |
//! | declaration       | `#name(args)`  | new declarations                  |
//! | member            | `@Name` on type| new members                       |
//! | memberAttribute   | `@Name` on type| attributes for each member        |
//! | accessor          | `@Name` on var | `get`/`set` accessors             |
//! | peer              | `@Name` on decl| sibling declarations              |
//! | extension         | `@Name` on type| `extension T: P {}` declarations  |

pub mod context;
pub mod expander;
pub mod matchers;
pub mod registry;
pub mod rules;
pub mod signature;
pub mod types;

pub use context::MacroExpansionContext;
pub use expander::{Expanded, Expander, MAX_EXPANSION_DEPTH};
pub use registry::{build_plugin_registry, plugin_registry, MacroRegistry, RegistryError};
pub use signature::{IntroducedName, MacroParameter, MacroSignature, RoleDeclaration, MACRO_MODULE};
pub use types::{
    AttachedExpansion, ExpansionResult, FreestandingExpansion, MacroDef, MacroFn, MacroRole,
    MemberAttributes, RuleResult,
};
