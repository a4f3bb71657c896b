//! Constructors for syntax fragments.
//!
//! Rules build their output through these helpers rather than by formatting
//! text, so expansions stay structured values that tests can inspect.

use super::decl::{
    AccessorDecl, AccessorKind, AccessorNode, Attribute, AttributeNode, BindingKeyword, Decl,
    DeclNode, EnumCaseDecl, EnumCaseElement, ExtensionDecl, FunctionDecl, Modifier, Parameter,
    Pattern, PatternBinding, Stmt, TypeDecl, TypeKind, VariableDecl,
};
use super::expr::{Argument, CastKind, Expr, ExprNode, StringLiteral, StringSegment};
use super::types::{TypeNode, TypeSyntax};
use super::{Span, Spanned};

// ----------------------------------------------------------------------------
// Expressions
// ----------------------------------------------------------------------------

pub fn ident(name: &str, span: Span) -> ExprNode {
    Spanned::new(Expr::Identifier(name.to_string()), span)
}

pub fn token(text: &str, span: Span) -> ExprNode {
    Spanned::new(Expr::Token(text.to_string()), span)
}

/// A string literal whose runtime value is `value`.
pub fn string_literal(value: &str, span: Span) -> ExprNode {
    Spanned::new(Expr::StringLiteral(StringLiteral::from_value(value)), span)
}

/// A string literal whose content is `text` exactly as it should appear
/// between the quotes.
pub fn raw_string_literal(text: &str, span: Span) -> ExprNode {
    Spanned::new(
        Expr::StringLiteral(StringLiteral {
            segments: vec![StringSegment::Text(text.to_string())],
        }),
        span,
    )
}

pub fn member(base: ExprNode, name: &str, span: Span) -> ExprNode {
    Spanned::new(
        Expr::MemberAccess {
            base: Some(Box::new(base)),
            name: name.to_string(),
        },
        span,
    )
}

pub fn call(callee: ExprNode, arguments: Vec<Argument>, span: Span) -> ExprNode {
    Spanned::new(
        Expr::Call {
            callee: Box::new(callee),
            arguments,
            trailing_closure: None,
        },
        span,
    )
}

/// `callee { statements }`.
pub fn call_with_closure(callee: ExprNode, statements: Vec<Stmt>, span: Span) -> ExprNode {
    Spanned::new(
        Expr::Call {
            callee: Box::new(callee),
            arguments: Vec::new(),
            trailing_closure: Some(Box::new(Spanned::new(Expr::Closure(statements), span))),
        },
        span,
    )
}

pub fn tuple(elements: Vec<ExprNode>, span: Span) -> ExprNode {
    Spanned::new(
        Expr::Tuple(elements.into_iter().map(Argument::unlabeled).collect()),
        span,
    )
}

pub fn paren(expr: ExprNode, span: Span) -> ExprNode {
    Spanned::new(Expr::Paren(Box::new(expr)), span)
}

pub fn subscript(base: ExprNode, index: ExprNode, span: Span) -> ExprNode {
    Spanned::new(
        Expr::Subscript {
            base: Box::new(base),
            arguments: vec![Argument::unlabeled(index)],
        },
        span,
    )
}

pub fn force_unwrap(expr: ExprNode, span: Span) -> ExprNode {
    Spanned::new(Expr::ForceUnwrap(Box::new(expr)), span)
}

pub fn forced_cast(expr: ExprNode, ty: TypeNode, span: Span) -> ExprNode {
    Spanned::new(
        Expr::Cast {
            expr: Box::new(expr),
            kind: CastKind::Forced,
            ty,
        },
        span,
    )
}

pub fn await_expr(expr: ExprNode, span: Span) -> ExprNode {
    Spanned::new(Expr::Await(Box::new(expr)), span)
}

pub fn assign(target: ExprNode, value: ExprNode, span: Span) -> ExprNode {
    Spanned::new(
        Expr::Assignment {
            target: Box::new(target),
            value: Box::new(value),
        },
        span,
    )
}

// ----------------------------------------------------------------------------
// Types and attributes
// ----------------------------------------------------------------------------

pub fn named_type(name: &str, span: Span) -> TypeNode {
    Spanned::new(TypeSyntax::named(name), span)
}

/// `[key: value]`.
pub fn dictionary_type(key: TypeNode, value: TypeNode, span: Span) -> TypeNode {
    Spanned::new(
        TypeSyntax::Dictionary {
            key: Box::new(key),
            value: Box::new(value),
        },
        span,
    )
}

/// `@attr1 @attr2 (parameters) -> result`.
pub fn closure_type(
    attributes: &[&str],
    parameters: Vec<TypeNode>,
    result: TypeNode,
    span: Span,
) -> TypeNode {
    let function = Spanned::new(
        TypeSyntax::Function {
            parameters,
            is_async: false,
            result: Box::new(result),
        },
        span,
    );
    if attributes.is_empty() {
        return function;
    }
    Spanned::new(
        TypeSyntax::Attributed {
            attributes: attributes.iter().map(|a| a.to_string()).collect(),
            base: Box::new(function),
        },
        span,
    )
}

pub fn attribute(name: &str, arguments: Option<Vec<Argument>>, span: Span) -> AttributeNode {
    Spanned::new(
        Attribute {
            name: name.to_string(),
            arguments,
        },
        span,
    )
}

// ----------------------------------------------------------------------------
// Declarations
// ----------------------------------------------------------------------------

pub fn type_decl(
    kind: TypeKind,
    name: &str,
    inheritance: Vec<TypeNode>,
    members: Vec<DeclNode>,
    span: Span,
) -> DeclNode {
    Spanned::new(
        Decl::Type(TypeDecl {
            attributes: Vec::new(),
            modifiers: Vec::new(),
            kind,
            name: name.to_string(),
            inheritance,
            members,
        }),
        span,
    )
}

pub fn extension(extended_type: TypeNode, inheritance: Vec<TypeNode>, span: Span) -> DeclNode {
    Spanned::new(
        Decl::Extension(ExtensionDecl {
            attributes: Vec::new(),
            modifiers: Vec::new(),
            extended_type,
            inheritance,
            members: Vec::new(),
        }),
        span,
    )
}

/// A single-binding variable declaration.
pub fn variable(
    modifiers: Vec<Modifier>,
    keyword: BindingKeyword,
    name: &str,
    type_annotation: Option<TypeNode>,
    initializer: Option<ExprNode>,
    span: Span,
) -> DeclNode {
    Spanned::new(
        Decl::Variable(VariableDecl {
            attributes: Vec::new(),
            modifiers,
            keyword,
            bindings: vec![PatternBinding {
                pattern: Spanned::new(Pattern::Identifier(name.to_string()), span),
                type_annotation,
                initializer,
                accessors: None,
            }],
        }),
        span,
    )
}

/// `var name: Type = initializer` with no modifiers.
pub fn stored_var(
    name: &str,
    type_annotation: Option<TypeNode>,
    initializer: Option<ExprNode>,
    span: Span,
) -> DeclNode {
    variable(
        Vec::new(),
        BindingKeyword::Var,
        name,
        type_annotation,
        initializer,
        span,
    )
}

pub fn enum_case(name: &str, raw_value: Option<ExprNode>, span: Span) -> DeclNode {
    Spanned::new(
        Decl::EnumCase(EnumCaseDecl {
            attributes: Vec::new(),
            elements: vec![EnumCaseElement {
                name: name.to_string(),
                raw_value,
            }],
        }),
        span,
    )
}

pub fn function(
    name: &str,
    parameters: Vec<Parameter>,
    is_async: bool,
    return_type: Option<TypeNode>,
    body: Option<Vec<Stmt>>,
    span: Span,
) -> DeclNode {
    Spanned::new(
        Decl::Function(FunctionDecl {
            attributes: Vec::new(),
            modifiers: Vec::new(),
            name: name.to_string(),
            parameters,
            is_async,
            return_type,
            body,
        }),
        span,
    )
}

pub fn parameter(first_name: &str, ty: TypeNode) -> Parameter {
    Parameter {
        first_name: first_name.to_string(),
        second_name: None,
        ty,
        default_value: None,
    }
}

pub fn accessor(kind: AccessorKind, body: Vec<Stmt>, span: Span) -> AccessorNode {
    Spanned::new(AccessorDecl { kind, body }, span)
}

/// Returns `decl` with `attributes` written in front of it.
pub fn with_attributes(decl: DeclNode, attributes: Vec<AttributeNode>) -> DeclNode {
    let mut all = attributes;
    all.extend(decl.value.attributes().iter().cloned());
    Spanned::new(decl.value.with_attributes(all), decl.span)
}
