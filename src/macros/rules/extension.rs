//! `@equatable`: conforms the attached type to `Equatable` through an empty
//! extension, leaving the host to synthesise `==`.

use crate::macros::context::MacroExpansionContext;
use crate::macros::signature::{MacroSignature, RoleDeclaration};
use crate::macros::types::{MacroDef, MacroFn, MacroRole, RuleResult};
use crate::syntax::builder::{extension, named_type};
use crate::syntax::{AttributeNode, DeclNode, TypeNode};

const EQUATABLE: &str = "Equatable";

pub fn equatable() -> MacroDef {
    MacroDef::new(
        MacroSignature::new("equatable", "EquatableExtensionMacro")
            .role(RoleDeclaration::new(MacroRole::Extension).conformances(&[EQUATABLE])),
        vec![MacroFn::Extension(expand_equatable)],
    )
}

fn expand_equatable(
    _attribute: &AttributeNode,
    _decl: &DeclNode,
    ty: &TypeNode,
    _protocols: &[TypeNode],
    ctx: &mut MacroExpansionContext,
) -> RuleResult<Vec<DeclNode>> {
    let span = ctx.invocation_span();
    Ok(vec![extension(
        ty.clone(),
        vec![named_type(EQUATABLE, span)],
        span,
    )])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::macros::rules::test_support::source;
    use crate::syntax::builder::{attribute, type_decl};
    use crate::syntax::{Span, TypeKind};

    const S: Span = Span { start: 0, end: 0 };

    #[test]
    fn emits_empty_conformance_extension() {
        let file = source("");
        let mut ctx = MacroExpansionContext::new(&file, "equatable", S);
        let decl = type_decl(TypeKind::Struct, "Point", vec![], vec![], S);
        let out = expand_equatable(
            &attribute("equatable", None, S),
            &decl,
            &named_type("Point", S),
            &[named_type(EQUATABLE, S)],
            &mut ctx,
        )
        .unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].to_string(), "extension Point: Equatable {}");
    }
}
