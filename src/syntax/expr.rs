//! Expression nodes.

use serde::{Deserialize, Serialize};

use super::decl::Stmt;
use super::types::TypeNode;
use super::Spanned;

pub type ExprNode = Spanned<Expr>;

/// A freestanding `#name(args)` invocation, wrapped with its span.
pub type MacroInvocation = Spanned<FreestandingMacro>;

/// Closed set of expression shapes the host can hand over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Identifier(String),
    /// A bare token with no expression meaning of its own, such as the `*`
    /// in an availability list.
    Token(String),
    IntegerLiteral(String),
    FloatLiteral(String),
    BooleanLiteral(bool),
    NilLiteral,
    StringLiteral(StringLiteral),
    ArrayLiteral(Vec<ExprNode>),
    DictionaryLiteral(Vec<(ExprNode, ExprNode)>),
    Tuple(Vec<Argument>),
    /// `(expr)`. Keeps the host's grouping, since operators render without
    /// precedence-aware parentheses.
    Paren(Box<ExprNode>),
    Binary {
        lhs: Box<ExprNode>,
        operator: String,
        rhs: Box<ExprNode>,
    },
    Prefix {
        operator: String,
        operand: Box<ExprNode>,
    },
    /// `base.name`, or `.name` when `base` is absent.
    MemberAccess {
        base: Option<Box<ExprNode>>,
        name: String,
    },
    Call {
        callee: Box<ExprNode>,
        #[serde(default)]
        arguments: Vec<Argument>,
        #[serde(default)]
        trailing_closure: Option<Box<ExprNode>>,
    },
    Subscript {
        base: Box<ExprNode>,
        arguments: Vec<Argument>,
    },
    ForceUnwrap(Box<ExprNode>),
    Cast {
        expr: Box<ExprNode>,
        kind: CastKind,
        ty: TypeNode,
    },
    Await(Box<ExprNode>),
    Assignment {
        target: Box<ExprNode>,
        value: Box<ExprNode>,
    },
    Closure(Vec<Stmt>),
    MacroExpansion(FreestandingMacro),
}

/// `as`, `as?` or `as!`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CastKind {
    Plain,
    Conditional,
    Forced,
}

impl CastKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CastKind::Plain => "as",
            CastKind::Conditional => "as?",
            CastKind::Forced => "as!",
        }
    }
}

/// An optionally labelled argument in a call, tuple, subscript or attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Argument {
    #[serde(default)]
    pub label: Option<String>,
    pub expr: ExprNode,
}

impl Argument {
    pub fn unlabeled(expr: ExprNode) -> Self {
        Self { label: None, expr }
    }

    pub fn labeled(label: impl Into<String>, expr: ExprNode) -> Self {
        Self {
            label: Some(label.into()),
            expr,
        }
    }
}

/// `#name(arguments)` as written at expression or declaration position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreestandingMacro {
    pub name: String,
    #[serde(default)]
    pub arguments: Vec<Argument>,
}

// ============================================================================
// STRING LITERALS
// ============================================================================

/// A string literal split into its segments.
///
/// Text segments hold content exactly as written between the quotes, escape
/// sequences included, so rendering a parsed literal reproduces its source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringLiteral {
    pub segments: Vec<StringSegment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StringSegment {
    Text(String),
    /// `\(expr)`; holds the interpolated expression's source text.
    Interpolation(String),
}

impl StringLiteral {
    /// Builds a single-segment literal whose runtime value is `value`.
    ///
    /// ```rust
    /// use custom_codable::syntax::{StringLiteral, StringSegment};
    /// let lit = StringLiteral::from_value(r#"say "hi" \o/"#);
    /// assert_eq!(
    ///     lit.segments,
    ///     vec![StringSegment::Text(r#"say \"hi\" \\o/"#.to_string())]
    /// );
    /// ```
    pub fn from_value(value: &str) -> Self {
        let mut escaped = String::with_capacity(value.len());
        for ch in value.chars() {
            match ch {
                '\\' => escaped.push_str("\\\\"),
                '"' => escaped.push_str("\\\""),
                '\n' => escaped.push_str("\\n"),
                '\r' => escaped.push_str("\\r"),
                '\t' => escaped.push_str("\\t"),
                '\0' => escaped.push_str("\\0"),
                other => escaped.push(other),
            }
        }
        Self {
            segments: vec![StringSegment::Text(escaped)],
        }
    }

    /// The content of a literal with exactly one plain text segment.
    pub fn static_text(&self) -> Option<&str> {
        match self.segments.as_slice() {
            [StringSegment::Text(text)] => Some(text),
            _ => None,
        }
    }
}
