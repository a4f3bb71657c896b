//! Pattern matchers shared by the expansion rules.
//!
//! Every function here is a total, side-effect-free query over syntax nodes.
//! `None` means the pattern did not match; callers decide whether that is a
//! diagnostic, a skip, or a contract violation.

use crate::syntax::{
    AttributeNode, Decl, DeclNode, ExprNode, Expr, Modifier, Pattern, TypeKind, TypeNode,
    TypeSyntax,
};

/// Name and declared type of a stored property.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StoredProperty<'a> {
    pub name: &'a str,
    pub declared_type: Option<&'a TypeNode>,
}

/// Shape of a function declaration, as far as the rules care.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionShape<'a> {
    pub name: &'a str,
    pub parameter_count: usize,
    pub is_async: bool,
    /// Set only when the return type is a plain named type.
    pub return_type_name: Option<&'a str>,
}

/// Matches an instance `var`/`let` whose first binding is a plain
/// identifier and that has storage (no `get`/`set` block).
pub fn as_stored_property(decl: &DeclNode) -> Option<StoredProperty<'_>> {
    let Decl::Variable(variable) = &decl.value else {
        return None;
    };
    if variable
        .modifiers
        .iter()
        .any(|m| matches!(m, Modifier::Static | Modifier::Class))
    {
        return None;
    }
    let binding = variable.bindings.first()?;
    let Pattern::Identifier(name) = &binding.pattern.value else {
        return None;
    };
    if binding.accessors.as_ref().is_some_and(|a| a.is_computed()) {
        return None;
    }
    Some(StoredProperty {
        name,
        declared_type: binding.type_annotation.as_ref(),
    })
}

/// First attribute in `attributes` whose name is exactly `name`.
pub fn first_attribute_named<'a>(
    attributes: &'a [AttributeNode],
    name: &str,
) -> Option<&'a AttributeNode> {
    attributes.iter().find(|attribute| attribute.value.name == name)
}

/// Expression of the attribute's first argument, whatever its label.
pub fn first_argument_expression(attribute: &AttributeNode) -> Option<&ExprNode> {
    attribute
        .value
        .arguments
        .as_ref()?
        .first()
        .map(|argument| &argument.expr)
}

/// Content of a string literal with exactly one plain text segment.
/// Interpolated or multi-segment literals do not match.
pub fn string_literal_content(expr: &ExprNode) -> Option<&str> {
    match &expr.value {
        Expr::StringLiteral(literal) => literal.static_text(),
        _ => None,
    }
}

pub fn as_function_decl(decl: &DeclNode) -> Option<FunctionShape<'_>> {
    let Decl::Function(function) = &decl.value else {
        return None;
    };
    Some(FunctionShape {
        name: &function.name,
        parameter_count: function.parameters.len(),
        is_async: function.is_async,
        return_type_name: function.return_type.as_ref().and_then(identifier_type_name),
    })
}

/// Name of a plain named type such as `String` or `Array<Int>`.
pub fn identifier_type_name(ty: &TypeNode) -> Option<&str> {
    match &ty.value {
        TypeSyntax::Identifier { name, .. } => Some(name),
        _ => None,
    }
}

pub fn is_struct_or_class(decl: &DeclNode) -> bool {
    matches!(
        &decl.value,
        Decl::Type(t) if matches!(t.kind, TypeKind::Struct | TypeKind::Class)
    )
}
