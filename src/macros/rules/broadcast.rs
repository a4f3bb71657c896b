//! Member-attribute macros that stamp the same attribute on every member.

use crate::macros::context::MacroExpansionContext;
use crate::macros::signature::{MacroSignature, RoleDeclaration};
use crate::macros::types::{MacroDef, MacroFn, MacroRole, RuleResult};
use crate::syntax::builder::{attribute, ident, token};
use crate::syntax::{Argument, AttributeNode, DeclNode};

/// `@MemberDeprecated`: adds `@available(*, deprecated)` to each member.
pub fn member_deprecated() -> MacroDef {
    MacroDef::new(
        MacroSignature::new("MemberDeprecated", "MemberDeprecatedMacro")
            .role(RoleDeclaration::new(MacroRole::MemberAttribute)),
        vec![MacroFn::MemberAttribute(expand_deprecated)],
    )
}

/// `@ObjCMembers`: adds `@objc` to each member.
pub fn objc_members() -> MacroDef {
    MacroDef::new(
        MacroSignature::new("ObjCMembers", "ObjCMembersMacro")
            .role(RoleDeclaration::new(MacroRole::MemberAttribute)),
        vec![MacroFn::MemberAttribute(expand_objc)],
    )
}

fn expand_deprecated(
    _attribute: &AttributeNode,
    _decl: &DeclNode,
    _member: &DeclNode,
    ctx: &mut MacroExpansionContext,
) -> RuleResult<Vec<AttributeNode>> {
    let span = ctx.invocation_span();
    let arguments = vec![
        Argument::unlabeled(token("*", span)),
        Argument::unlabeled(ident("deprecated", span)),
    ];
    Ok(vec![attribute("available", Some(arguments), span)])
}

fn expand_objc(
    _attribute: &AttributeNode,
    _decl: &DeclNode,
    _member: &DeclNode,
    ctx: &mut MacroExpansionContext,
) -> RuleResult<Vec<AttributeNode>> {
    Ok(vec![attribute("objc", None, ctx.invocation_span())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::macros::rules::test_support::source;
    use crate::syntax::builder::{enum_case, function, named_type, stored_var, type_decl};
    use crate::syntax::{Span, TypeKind};

    const S: Span = Span { start: 0, end: 0 };

    #[test]
    fn every_member_kind_gets_exactly_one_attribute() {
        let file = source("");
        let attr = attribute("MemberDeprecated", None, S);
        let members = vec![
            stored_var("a", Some(named_type("Int", S)), None, S),
            function("f", vec![], false, None, Some(vec![]), S),
            enum_case("x", None, S),
        ];
        let decl = type_decl(TypeKind::Struct, "T", vec![], members.clone(), S);
        for member in &members {
            let mut ctx = MacroExpansionContext::new(&file, "MemberDeprecated", S);
            let deprecated = expand_deprecated(&attr, &decl, member, &mut ctx).unwrap();
            assert_eq!(deprecated.len(), 1);
            assert_eq!(deprecated[0].to_string(), "@available(*, deprecated)");

            let mut ctx = MacroExpansionContext::new(&file, "ObjCMembers", S);
            let objc = expand_objc(&attr, &decl, member, &mut ctx).unwrap();
            assert_eq!(objc.len(), 1);
            assert_eq!(objc[0].to_string(), "@objc");
        }
    }
}
