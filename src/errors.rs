//! Error handling for macro expansion.
//!
//! There are two failure channels and they are never mixed:
//!
//! - [`MacroDiagnostic`]: a user-facing, source-located error. It fails one
//!   invocation site only; every other site still expands.
//! - [`ContractViolation`]: the host broke its side of the contract (for
//!   example it invoked a macro with an argument count its declaration
//!   rules out). It aborts the whole expansion batch.
//!
//! Rules return [`ExpansionError`], the sum of both, so they can use `?`
//! regardless of which channel a failure belongs to.

use std::fmt;

use miette::{Diagnostic, LabeledSpan, NamedSource, Report};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::macros::MacroRole;
use crate::syntax::Span;

// ============================================================================
// DIAGNOSTIC KINDS
// ============================================================================

/// Every diagnostic the engine can produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticKind {
    // CodingKeys synthesis
    NoArgument,
    RequiresStructOrClass,
    MissingKeyName,

    // Completion-handler peer
    RequiresFunction,
    NoReturn,

    // URL literal
    UrlRequiresStaticString,
    MalformedUrl { literal: String },

    // Named constant
    ConstantRequiresStaticString,
    InvalidIdentifier { text: String },

    // Dictionary-backed storage
    RequiresTypedProperty,
    KeyRequiresStaticString,

    // Invocation checks performed before a rule runs
    ArityMismatch {
        macro_name: String,
        expected: String,
        found: usize,
    },
    RoleNotSupported {
        macro_name: String,
        role: MacroRole,
    },
}

/// Coarse grouping of diagnostic kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticFamily {
    /// The attached construct has the wrong kind or an empty member list.
    Structural,
    /// The attached construct has the right kind but the wrong shape.
    Shape,
    /// A literal argument is not static or does not validate.
    Literal,
    /// The invocation itself does not fit the macro's declaration.
    Invocation,
}

impl DiagnosticKind {
    /// Diagnostic domain, shared by the kinds of one macro.
    pub const fn domain(&self) -> &'static str {
        match self {
            Self::NoArgument | Self::RequiresStructOrClass | Self::MissingKeyName => {
                "CodingKeysMacro"
            }
            Self::RequiresFunction | Self::NoReturn => "AddCompletionMacro",
            Self::UrlRequiresStaticString | Self::MalformedUrl { .. } => "URLMacro",
            Self::ConstantRequiresStaticString | Self::InvalidIdentifier { .. } => "ConstantMacro",
            Self::RequiresTypedProperty | Self::KeyRequiresStaticString => {
                "DictionaryStorageMacro"
            }
            Self::ArityMismatch { .. } | Self::RoleNotSupported { .. } => "MacroExpansion",
        }
    }

    /// Variant identifier, stable across releases.
    pub const fn id(&self) -> &'static str {
        match self {
            Self::NoArgument => "noArgument",
            Self::RequiresStructOrClass => "requiresStructOrClass",
            Self::MissingKeyName => "missingKeyName",
            Self::RequiresFunction => "requiresFunction",
            Self::NoReturn => "noReturn",
            Self::UrlRequiresStaticString
            | Self::ConstantRequiresStaticString
            | Self::KeyRequiresStaticString => "requiresStaticString",
            Self::MalformedUrl { .. } => "malformedURL",
            Self::InvalidIdentifier { .. } => "invalidIdentifier",
            Self::RequiresTypedProperty => "requiresTypedProperty",
            Self::ArityMismatch { .. } => "arityMismatch",
            Self::RoleNotSupported { .. } => "roleNotSupported",
        }
    }

    /// `domain.id`, the code tooling filters on.
    pub fn code(&self) -> String {
        format!("{}.{}", self.domain(), self.id())
    }

    pub fn family(&self) -> DiagnosticFamily {
        match self {
            Self::NoArgument | Self::RequiresStructOrClass | Self::RequiresFunction => {
                DiagnosticFamily::Structural
            }
            Self::MissingKeyName | Self::NoReturn | Self::RequiresTypedProperty => {
                DiagnosticFamily::Shape
            }
            Self::UrlRequiresStaticString
            | Self::MalformedUrl { .. }
            | Self::ConstantRequiresStaticString
            | Self::KeyRequiresStaticString
            | Self::InvalidIdentifier { .. } => DiagnosticFamily::Literal,
            Self::ArityMismatch { .. } | Self::RoleNotSupported { .. } => {
                DiagnosticFamily::Invocation
            }
        }
    }

    fn primary_label(&self) -> &'static str {
        match self.family() {
            DiagnosticFamily::Structural => "macro attached here",
            DiagnosticFamily::Shape => "declaration has the wrong shape",
            DiagnosticFamily::Literal => "literal required here",
            DiagnosticFamily::Invocation => "invoked here",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoArgument => write!(f, "Cannot find argument"),
            Self::RequiresStructOrClass => {
                write!(f, "'CodingKeys' macro can only be applied to struct.")
            }
            Self::MissingKeyName => write!(f, "'CodableKey' requires a name argument"),
            Self::RequiresFunction => {
                write!(f, "'AddCompletion' macro can only be applied to function.")
            }
            Self::NoReturn => write!(f, "'AddCompletion' macro requires a return value."),
            Self::UrlRequiresStaticString => write!(f, "#URL requires a static string literal"),
            Self::MalformedUrl { literal } => write!(f, "malformed url: {}", literal),
            Self::ConstantRequiresStaticString => {
                write!(f, "#Constant requires a static string literal")
            }
            Self::InvalidIdentifier { text } => {
                write!(f, "'{}' does not produce a valid identifier", text)
            }
            Self::RequiresTypedProperty => write!(
                f,
                "'DictionaryStorageProperty' requires a stored property with a type annotation"
            ),
            Self::KeyRequiresStaticString => write!(
                f,
                "'DictionaryStorageProperty' key must be a static string literal or nil"
            ),
            Self::ArityMismatch {
                macro_name,
                expected,
                found,
            } => write!(
                f,
                "macro '{}' expects {} argument(s), found {}",
                macro_name, expected, found
            ),
            Self::RoleNotSupported { macro_name, role } => {
                write!(f, "macro '{}' cannot be used as {} macro", macro_name, role)
            }
        }
    }
}

// ============================================================================
// DIAGNOSTICS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A diagnostic attached to the syntax node that caused it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroDiagnostic {
    pub kind: DiagnosticKind,
    pub span: Span,
    pub severity: Severity,
    pub help: Option<String>,
}

impl MacroDiagnostic {
    /// An error-severity diagnostic at `span`.
    pub fn error(kind: DiagnosticKind, span: Span) -> Self {
        Self {
            kind,
            span,
            severity: Severity::Error,
            help: None,
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn code(&self) -> String {
        self.kind.code()
    }

    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    /// Wraps the diagnostic in a `miette` report rendered against `source`.
    pub fn into_report(self, source: NamedSource<String>) -> Report {
        Report::new(self).with_source_code(source)
    }
}

impl fmt::Display for MacroDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}

impl std::error::Error for MacroDiagnostic {}

impl Diagnostic for MacroDiagnostic {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.kind.code()))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(match self.severity {
            Severity::Error => miette::Severity::Error,
            Severity::Warning => miette::Severity::Warning,
        })
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn fmt::Display + 'a>)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let label = LabeledSpan::new_with_span(
            Some(self.kind.primary_label().to_string()),
            self.span,
        );
        Some(Box::new(std::iter::once(label)))
    }
}

// ============================================================================
// CONTRACT VIOLATIONS
// ============================================================================

/// The host invoked the engine in a way its own contract rules out.
///
/// This is an engine or host bug, never a user error.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("contract violation in macro '{macro_name}': {message}")]
#[diagnostic(
    code(custom_codable::contract_violation),
    help("This indicates a bug in the host compiler or the macro engine, not in the code being compiled.")
)]
pub struct ContractViolation {
    pub macro_name: String,
    pub message: String,
}

impl ContractViolation {
    pub fn new(macro_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            macro_name: macro_name.into(),
            message: message.into(),
        }
    }
}

/// Failure of a single rule invocation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExpansionError {
    #[error(transparent)]
    Diagnostic(#[from] MacroDiagnostic),
    #[error(transparent)]
    Contract(#[from] ContractViolation),
}

// ============================================================================
// REPORTING
// ============================================================================

/// Context-aware diagnostic creation.
pub trait DiagnosticReporting {
    /// Builds a diagnostic of `kind` at `span`.
    fn report(&self, kind: DiagnosticKind, span: Span) -> MacroDiagnostic;

    /// Builds a contract violation carrying `message`.
    fn contract_violation(&self, message: &str) -> ContractViolation;

    fn requires_static_string(&self, kind: DiagnosticKind, span: Span) -> ExpansionError {
        self.report(kind, span)
            .with_help("pass a plain string literal without interpolation")
            .into()
    }
}

/// Prints a diagnostic with full `miette` rendering against `source`.
pub fn print_diagnostic(diagnostic: MacroDiagnostic, source: NamedSource<String>) {
    let report = diagnostic.into_report(source);
    eprintln!("{report:?}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_domain_dot_id() {
        assert_eq!(
            DiagnosticKind::RequiresStructOrClass.code(),
            "CodingKeysMacro.requiresStructOrClass"
        );
        assert_eq!(DiagnosticKind::NoReturn.code(), "AddCompletionMacro.noReturn");
        assert_eq!(
            DiagnosticKind::MalformedUrl {
                literal: "x".into()
            }
            .code(),
            "URLMacro.malformedURL"
        );
    }

    #[test]
    fn diagnostics_default_to_error_severity() {
        let diagnostic = MacroDiagnostic::error(DiagnosticKind::NoArgument, Span::new(0, 3));
        assert_eq!(diagnostic.severity, Severity::Error);
        assert_eq!(diagnostic.message(), "Cannot find argument");
        assert_eq!(
            Diagnostic::severity(&diagnostic),
            Some(miette::Severity::Error)
        );
    }

    #[test]
    fn families_split_structural_from_shape() {
        assert_eq!(
            DiagnosticKind::RequiresFunction.family(),
            DiagnosticFamily::Structural
        );
        assert_eq!(DiagnosticKind::NoReturn.family(), DiagnosticFamily::Shape);
    }

    #[test]
    fn contract_violation_converts_into_expansion_error() {
        let err: ExpansionError = ContractViolation::new("stringify", "no arguments").into();
        assert!(matches!(err, ExpansionError::Contract(_)));
        assert_eq!(
            err.to_string(),
            "contract violation in macro 'stringify': no arguments"
        );
    }
}
