//! `@CustomCodable` and its per-property companion `@CodableKey`.
//!
//! `@CustomCodable` synthesises a `CodingKeys` enum with one case per stored
//! property, in declaration order. A property marked `@CodableKey(name: "X")`
//! gets the raw value `"X"`; every other case keeps the property name.
//! `@CodableKey` itself expands to nothing; it only exists to be read.

use crate::errors::{DiagnosticKind, DiagnosticReporting};
use crate::macros::context::MacroExpansionContext;
use crate::macros::matchers::{
    as_stored_property, first_argument_expression, first_attribute_named, is_struct_or_class,
};
use crate::macros::signature::{IntroducedName, MacroParameter, MacroSignature, RoleDeclaration};
use crate::macros::types::{MacroDef, MacroFn, MacroRole, RuleResult};
use crate::syntax::builder::{enum_case, named_type, type_decl};
use crate::syntax::{AttributeNode, DeclNode, TypeKind};

pub const CODING_KEYS: &str = "CodingKeys";
pub const CODABLE_KEY: &str = "CodableKey";

pub fn custom_codable() -> MacroDef {
    MacroDef::new(
        MacroSignature::new("CustomCodable", "CustomCodable").role(
            RoleDeclaration::new(MacroRole::Member).names([IntroducedName::Named(CODING_KEYS)]),
        ),
        vec![MacroFn::Member(expand_coding_keys)],
    )
}

pub fn codable_key() -> MacroDef {
    MacroDef::new(
        MacroSignature::new(CODABLE_KEY, "CustomCodingKeyMacro")
            .parameter(MacroParameter::labeled("name", "String"))
            .role(RoleDeclaration::new(MacroRole::Peer)),
        vec![MacroFn::Peer(expand_codable_key)],
    )
}

fn expand_coding_keys(
    attribute: &AttributeNode,
    decl: &DeclNode,
    ctx: &mut MacroExpansionContext,
) -> RuleResult<Vec<DeclNode>> {
    let members = decl.value.members().unwrap_or(&[]);
    if members.is_empty() {
        return Err(ctx.report(DiagnosticKind::NoArgument, attribute.span).into());
    }
    if !is_struct_or_class(decl) {
        return Err(ctx
            .report(DiagnosticKind::RequiresStructOrClass, attribute.span)
            .into());
    }

    let span = ctx.invocation_span();
    let mut cases = Vec::with_capacity(members.len());
    for member in members {
        let Some(property) = as_stored_property(member) else {
            continue;
        };
        let raw_value = match first_attribute_named(member.value.attributes(), CODABLE_KEY) {
            Some(key) => {
                let name = first_argument_expression(key)
                    .ok_or_else(|| ctx.report(DiagnosticKind::MissingKeyName, key.span))?;
                Some(name.clone())
            }
            None => None,
        };
        cases.push(enum_case(property.name, raw_value, span));
    }
    if cases.is_empty() {
        return Err(ctx.report(DiagnosticKind::NoArgument, attribute.span).into());
    }

    tracing::trace!(cases = cases.len(), "synthesised CodingKeys");
    Ok(vec![type_decl(
        TypeKind::Enum,
        CODING_KEYS,
        vec![named_type("String", span), named_type("CodingKey", span)],
        cases,
        span,
    )])
}

fn expand_codable_key(
    _attribute: &AttributeNode,
    _decl: &DeclNode,
    _ctx: &mut MacroExpansionContext,
) -> RuleResult<Vec<DeclNode>> {
    Ok(Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ExpansionError;
    use crate::macros::rules::test_support::source;
    use crate::syntax::builder::{attribute, named_type, raw_string_literal, stored_var, with_attributes};
    use crate::syntax::{Argument, Span};

    const S: Span = Span { start: 0, end: 0 };

    fn run(decl: &DeclNode) -> RuleResult<Vec<DeclNode>> {
        let file = source("");
        let attr = attribute("CustomCodable", None, S);
        let mut ctx = MacroExpansionContext::new(&file, "CustomCodable", S);
        expand_coding_keys(&attr, decl, &mut ctx)
    }

    fn diagnostic_code(result: RuleResult<Vec<DeclNode>>) -> String {
        match result {
            Err(ExpansionError::Diagnostic(d)) => d.code(),
            other => panic!("expected diagnostic, got {other:?}"),
        }
    }

    fn renamed(name: &str, key: &str) -> DeclNode {
        with_attributes(
            stored_var(name, Some(named_type("String", S)), None, S),
            vec![attribute(
                CODABLE_KEY,
                Some(vec![Argument::labeled("name", raw_string_literal(key, S))]),
                S,
            )],
        )
    }

    #[test]
    fn cases_follow_declaration_order_with_overrides() {
        let decl = type_decl(
            TypeKind::Struct,
            "CustomCodableString",
            vec![named_type("Decodable", S)],
            vec![
                renamed("propertyWithOtherName", "OtherName"),
                stored_var("propertyWithSameName", Some(named_type("Bool", S)), None, S),
            ],
            S,
        );
        let out = run(&decl).unwrap();
        assert_eq!(
            out[0].to_string(),
            "enum CodingKeys: String, CodingKey {\n    \
             case propertyWithOtherName = \"OtherName\"\n    \
             case propertyWithSameName\n}"
        );
    }

    #[test]
    fn empty_member_list_reports_no_argument() {
        let decl = type_decl(TypeKind::Struct, "Empty", vec![], vec![], S);
        assert_eq!(diagnostic_code(run(&decl)), "CodingKeysMacro.noArgument");
    }

    #[test]
    fn enum_target_reports_requires_struct_or_class() {
        let decl = type_decl(
            TypeKind::Enum,
            "Direction",
            vec![],
            vec![enum_case("north", None, S)],
            S,
        );
        assert_eq!(
            diagnostic_code(run(&decl)),
            "CodingKeysMacro.requiresStructOrClass"
        );
    }

    #[test]
    fn type_without_stored_properties_reports_no_argument() {
        let nested = type_decl(TypeKind::Struct, "Inner", vec![], vec![], S);
        let decl = type_decl(TypeKind::Class, "Outer", vec![], vec![nested], S);
        assert_eq!(diagnostic_code(run(&decl)), "CodingKeysMacro.noArgument");
    }

    #[test]
    fn codable_key_without_argument_reports_missing_key_name() {
        let bare = with_attributes(
            stored_var("title", Some(named_type("String", S)), None, S),
            vec![attribute(CODABLE_KEY, None, S)],
        );
        let decl = type_decl(TypeKind::Struct, "Post", vec![], vec![bare], S);
        assert_eq!(diagnostic_code(run(&decl)), "CodingKeysMacro.missingKeyName");
    }

    #[test]
    fn codable_key_expands_to_nothing() {
        let file = source("");
        let attr = attribute(CODABLE_KEY, None, S);
        let decl = renamed("a", "b");
        let mut ctx = MacroExpansionContext::new(&file, CODABLE_KEY, S);
        assert!(expand_codable_key(&attr, &decl, &mut ctx).unwrap().is_empty());
    }
}
