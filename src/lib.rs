//! # custom-codable
//!
//! A macro expansion engine for a Swift-like host. The host compiler parses
//! source, hands each macro invocation site to this crate as a syntax tree,
//! and splices the nodes that come back into its own tree.
//!
//! - [`syntax`]: the node model, builders and the surface-text renderer.
//! - [`macros`]: the twelve expansion rules, their public signatures, the
//!   plugin registry and the [`macros::Expander`] driver.
//! - [`errors`]: per-site diagnostics and fatal contract violations.
//! - [`cli`]: the `custom-codable` binary.
//!
//! ```rust
//! use custom_codable::macros::{plugin_registry, Expander, FreestandingExpansion, MacroRole};
//! use custom_codable::syntax::{Expr, FreestandingMacro, SourceFile, Span, Spanned, Argument};
//!
//! let source = SourceFile::new("main.swift", "#stringify(x)");
//! let x = Spanned::new(Expr::Identifier("x".into()), Span::new(11, 12));
//! let invocation = Spanned::new(
//!     FreestandingMacro { name: "stringify".into(), arguments: vec![Argument::unlabeled(x)] },
//!     Span::new(0, 13),
//! );
//! let registry = plugin_registry().unwrap();
//! let result = Expander::new(registry)
//!     .expand_freestanding(&invocation, MacroRole::Expression, &source)
//!     .unwrap();
//! match result.syntax() {
//!     Some(FreestandingExpansion::Expression(expr)) => assert_eq!(expr.to_string(), r#"(x, "x")"#),
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```

pub use crate::errors::{ContractViolation, ExpansionError, MacroDiagnostic};

pub mod cli;
pub mod errors;
pub mod macros;
pub mod syntax;
