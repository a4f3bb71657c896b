//! Syntax tree model for the macro engine.
//!
//! The host compiler owns parsing. Everything in this module is the shape in
//! which it hands an already-parsed fragment to the engine: expressions,
//! types, patterns, attributes, accessors, statements and declarations, each
//! wrapped in a [`Spanned`] so diagnostics can point back at source text.
//!
//! **INVARIANT:** rules never mutate a node in place. Every expansion builds
//! new nodes (see [`builder`]) and re-wraps them with the span of the macro
//! invocation that produced them.

// ============================================================================
// IMPORTS
// ============================================================================

use miette::{NamedSource, SourceSpan};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub mod builder;
pub mod decl;
pub mod expr;
pub mod render;
pub mod types;

pub use decl::{
    AccessorBlock, AccessorDecl, AccessorKind, AccessorNode, Attribute, AttributeNode,
    BindingKeyword, Decl, DeclNode, EnumCaseDecl, EnumCaseElement, ExtensionDecl, FunctionDecl,
    Modifier, Parameter, Pattern, PatternBinding, PatternNode, Stmt, TypeDecl, TypeKind,
    VariableDecl,
};
pub use expr::{
    Argument, CastKind, Expr, ExprNode, FreestandingMacro, MacroInvocation, StringLiteral,
    StringSegment,
};
pub use types::{TypeNode, TypeSyntax};

// ============================================================================
// SPANS
// ============================================================================

/// Byte range of a node in the host's source file.
///
/// # Examples
///
/// ```rust
/// use custom_codable::syntax::Span;
/// let span = Span::new(3, 8);
/// assert_eq!(span.len(), 5);
/// assert!(!span.is_empty());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Smallest span covering both `self` and `other`.
    pub fn join(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl From<Span> for SourceSpan {
    fn from(span: Span) -> Self {
        SourceSpan::from(span.start..span.end)
    }
}

/// Wrapper carrying a source span with any node value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spanned<T> {
    pub value: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(value: T, span: Span) -> Self {
        Self { value, span }
    }
}

// ============================================================================
// SOURCE FILES
// ============================================================================

/// 1-based line and column of a byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

/// The text a syntax tree was parsed from.
///
/// Spans index into `text`. The engine only reads it: verbatim text for
/// `#stringify`, line/column queries, and diagnostic rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    name: String,
    text: Arc<str>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, text: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Text covered by `span`, or `None` if the span is out of bounds or
    /// does not fall on character boundaries.
    pub fn slice(&self, span: Span) -> Option<&str> {
        self.text.get(span.start..span.end)
    }

    /// Line and column of `offset`. Offsets past the end clamp to the end.
    pub fn location(&self, offset: usize) -> SourceLocation {
        let offset = offset.min(self.text.len());
        let before = &self.text[..floor_char_boundary(&self.text, offset)];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        SourceLocation {
            line,
            column: before[line_start..].chars().count() + 1,
        }
    }

    /// Source handle for `miette` reports.
    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(self.name.clone(), self.text.to_string())
    }
}

fn floor_char_boundary(text: &str, mut offset: usize) -> usize {
    while offset > 0 && !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}
