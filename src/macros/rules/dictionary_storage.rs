//! Dictionary-backed storage.
//!
//! `@DictionaryStorage` on a type adds a `dictionary` member and marks every
//! stored property with `@DictionaryStorageProperty`, which in turn replaces
//! the property's storage with accessors reading and writing that
//! dictionary.

use crate::errors::{DiagnosticKind, DiagnosticReporting};
use crate::macros::context::MacroExpansionContext;
use crate::macros::matchers::{
    as_stored_property, first_argument_expression, first_attribute_named, identifier_type_name,
    string_literal_content,
};
use crate::macros::signature::{IntroducedName, MacroParameter, MacroSignature, RoleDeclaration};
use crate::macros::types::{MacroDef, MacroFn, MacroRole, RuleResult};
use crate::syntax::builder::{
    accessor, assign, attribute, dictionary_type, force_unwrap, forced_cast, ident, named_type,
    raw_string_literal, stored_var, subscript,
};
use crate::syntax::{AccessorKind, AccessorNode, AttributeNode, DeclNode, Expr, Spanned, Stmt};

pub const STORAGE_MEMBER: &str = "dictionary";
pub const PROPERTY_MACRO: &str = "DictionaryStorageProperty";

pub fn dictionary_storage_property() -> MacroDef {
    MacroDef::new(
        MacroSignature::new(PROPERTY_MACRO, "DictionaryStoragePropertyMacro")
            .parameter(MacroParameter::labeled("key", "String?").with_default("nil"))
            .role(RoleDeclaration::new(MacroRole::Accessor)),
        vec![MacroFn::Accessor(expand_accessors)],
    )
}

pub fn dictionary_storage() -> MacroDef {
    MacroDef::new(
        MacroSignature::new("DictionaryStorage", "DictionaryStorageMacro")
            .role(
                RoleDeclaration::new(MacroRole::Member)
                    .names([IntroducedName::Named(STORAGE_MEMBER)]),
            )
            .role(RoleDeclaration::new(MacroRole::MemberAttribute)),
        // Member first: the storage must exist before the accessors that use it.
        vec![
            MacroFn::Member(expand_storage),
            MacroFn::MemberAttribute(expand_member_attributes),
        ],
    )
}

fn expand_accessors(
    attribute: &AttributeNode,
    decl: &DeclNode,
    ctx: &mut MacroExpansionContext,
) -> RuleResult<Vec<AccessorNode>> {
    let typed = as_stored_property(decl).and_then(|property| {
        let ty = property.declared_type?;
        identifier_type_name(ty).map(|_| (property.name, ty))
    });
    let Some((name, ty)) = typed else {
        return Err(ctx
            .report(DiagnosticKind::RequiresTypedProperty, attribute.span)
            .into());
    };
    let key = match first_argument_expression(attribute) {
        None => name,
        Some(expr) if matches!(expr.value, Expr::NilLiteral) => name,
        Some(expr) => string_literal_content(expr).ok_or_else(|| {
            ctx.requires_static_string(DiagnosticKind::KeyRequiresStaticString, expr.span)
        })?,
    };

    let span = ctx.invocation_span();
    let entry = || {
        subscript(
            ident(STORAGE_MEMBER, span),
            raw_string_literal(key, span),
            span,
        )
    };
    let getter = forced_cast(force_unwrap(entry(), span), ty.clone(), span);
    let setter = assign(entry(), ident("newValue", span), span);
    Ok(vec![
        accessor(AccessorKind::Get, vec![Stmt::Expr(getter)], span),
        accessor(AccessorKind::Set, vec![Stmt::Expr(setter)], span),
    ])
}

fn expand_storage(
    _attribute: &AttributeNode,
    _decl: &DeclNode,
    ctx: &mut MacroExpansionContext,
) -> RuleResult<Vec<DeclNode>> {
    let span = ctx.invocation_span();
    let ty = dictionary_type(named_type("String", span), named_type("Any", span), span);
    let empty = Spanned::new(Expr::DictionaryLiteral(Vec::new()), span);
    Ok(vec![stored_var(STORAGE_MEMBER, Some(ty), Some(empty), span)])
}

fn expand_member_attributes(
    _attribute: &AttributeNode,
    _decl: &DeclNode,
    member: &DeclNode,
    ctx: &mut MacroExpansionContext,
) -> RuleResult<Vec<AttributeNode>> {
    if as_stored_property(member).is_none()
        || first_attribute_named(member.value.attributes(), PROPERTY_MACRO).is_some()
    {
        return Ok(Vec::new());
    }
    Ok(vec![attribute(PROPERTY_MACRO, None, ctx.invocation_span())])
}
