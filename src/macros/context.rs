//! Per-invocation expansion context.

use crate::errors::{ContractViolation, DiagnosticKind, DiagnosticReporting, MacroDiagnostic};
use crate::syntax::{SourceFile, SourceLocation, Span};

/// Created fresh by the expander for every invocation site and dropped when
/// the rule returns. Gives rules read access to the source text, location
/// queries, fresh names, and diagnostic construction.
#[derive(Debug)]
pub struct MacroExpansionContext<'a> {
    source: &'a SourceFile,
    macro_name: &'a str,
    invocation: Span,
    unique_names: usize,
}

impl<'a> MacroExpansionContext<'a> {
    pub fn new(source: &'a SourceFile, macro_name: &'a str, invocation: Span) -> Self {
        Self {
            source,
            macro_name,
            invocation,
            unique_names: 0,
        }
    }

    pub fn macro_name(&self) -> &str {
        self.macro_name
    }

    /// Span of the `#name(...)` or `@Name(...)` node being expanded.
    pub fn invocation_span(&self) -> Span {
        self.invocation
    }

    /// Verbatim source text under `span`.
    pub fn source_text(&self, span: Span) -> Option<&'a str> {
        self.source.slice(span)
    }

    pub fn location(&self, span: Span) -> SourceLocation {
        self.source.location(span.start)
    }

    /// A name that cannot collide with user code or with any other name
    /// produced by this context.
    ///
    /// ```rust
    /// use custom_codable::macros::MacroExpansionContext;
    /// use custom_codable::syntax::{SourceFile, Span};
    /// let file = SourceFile::new("main.swift", "");
    /// let mut ctx = MacroExpansionContext::new(&file, "demo", Span::default());
    /// assert_eq!(ctx.make_unique_name("result"), "__macro_local_6resultfMu_");
    /// assert_eq!(ctx.make_unique_name("result"), "__macro_local_6resultfMu0_");
    /// ```
    pub fn make_unique_name(&mut self, base: &str) -> String {
        let suffix = match self.unique_names {
            0 => String::new(),
            n => (n - 1).to_string(),
        };
        self.unique_names += 1;
        format!("__macro_local_{}{}fMu{}_", base.len(), base, suffix)
    }
}

impl DiagnosticReporting for MacroExpansionContext<'_> {
    fn report(&self, kind: DiagnosticKind, span: Span) -> MacroDiagnostic {
        tracing::debug!(
            macro_name = self.macro_name,
            code = %kind.code(),
            line = self.location(span).line,
            "diagnostic emitted"
        );
        MacroDiagnostic::error(kind, span)
    }

    fn contract_violation(&self, message: &str) -> ContractViolation {
        tracing::error!(macro_name = self.macro_name, message, "contract violation");
        ContractViolation::new(self.macro_name, message)
    }
}
