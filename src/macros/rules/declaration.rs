//! Freestanding declaration macros: `#declareStaticValue` and `#Constant`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{DiagnosticKind, DiagnosticReporting};
use crate::macros::context::MacroExpansionContext;
use crate::macros::matchers::string_literal_content;
use crate::macros::signature::{IntroducedName, MacroParameter, MacroSignature, RoleDeclaration};
use crate::macros::types::{MacroDef, MacroFn, MacroRole, RuleResult};
use crate::syntax::builder::{type_decl, variable};
use crate::syntax::{BindingKeyword, DeclNode, MacroInvocation, Modifier, TypeKind};

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is a valid regex")
});

/// `#declareStaticValue(E)` → `struct Const { static let value = E }`.
pub fn declare_static_value() -> MacroDef {
    MacroDef::new(
        MacroSignature::new("declareStaticValue", "StaticLetMacro")
            .generic("T")
            .parameter(MacroParameter::unlabeled("value", "T"))
            .role(
                RoleDeclaration::new(MacroRole::Declaration)
                    .names([IntroducedName::Named("Const")]),
            ),
        vec![MacroFn::Declaration(expand_static_value)],
    )
}

/// `#Constant("app_icon")` → `public static var appIcon = "app_icon"`.
pub fn constant() -> MacroDef {
    MacroDef::new(
        MacroSignature::new("Constant", "ConstantMacro")
            .parameter(MacroParameter::unlabeled("value", "String"))
            .role(RoleDeclaration::new(MacroRole::Declaration).names([IntroducedName::Arbitrary])),
        vec![MacroFn::Declaration(expand_constant)],
    )
}

fn expand_static_value(
    node: &MacroInvocation,
    ctx: &mut MacroExpansionContext,
) -> RuleResult<Vec<DeclNode>> {
    let argument = node
        .value
        .arguments
        .first()
        .ok_or_else(|| ctx.contract_violation("expected one value argument"))?;
    let span = ctx.invocation_span();
    let value = variable(
        vec![Modifier::Static],
        BindingKeyword::Let,
        "value",
        None,
        Some(argument.expr.clone()),
        span,
    );
    Ok(vec![type_decl(TypeKind::Struct, "Const", vec![], vec![value], span)])
}

fn expand_constant(
    node: &MacroInvocation,
    ctx: &mut MacroExpansionContext,
) -> RuleResult<Vec<DeclNode>> {
    let argument = node
        .value
        .arguments
        .first()
        .ok_or_else(|| ctx.contract_violation("expected one string literal argument"))?;
    let Some(text) = string_literal_content(&argument.expr) else {
        return Err(ctx.requires_static_string(
            DiagnosticKind::ConstantRequiresStaticString,
            argument.expr.span,
        ));
    };
    let name = camel_case(text);
    if !IDENTIFIER.is_match(&name) {
        let kind = DiagnosticKind::InvalidIdentifier {
            text: text.to_string(),
        };
        return Err(ctx.report(kind, argument.expr.span).into());
    }
    let span = ctx.invocation_span();
    Ok(vec![variable(
        vec![Modifier::Public, Modifier::Static],
        BindingKeyword::Var,
        &name,
        None,
        Some(argument.expr.clone()),
        span,
    )])
}

/// Converts `snake_case` text to `camelCase`.
///
/// Empty segments are dropped. The first segment is lowercased; every later
/// segment gets an uppercase first letter and a lowercase remainder.
///
/// ```rust
/// use custom_codable::macros::rules::declaration::camel_case;
/// assert_eq!(camel_case("app_icon"), "appIcon");
/// assert_eq!(camel_case("ERROR_TIP"), "errorTip");
/// assert_eq!(camel_case("__empty__image"), "emptyImage");
/// ```
pub fn camel_case(snake: &str) -> String {
    snake
        .split('_')
        .filter(|segment| !segment.is_empty())
        .enumerate()
        .map(|(i, segment)| {
            if i == 0 {
                segment.to_lowercase()
            } else {
                capitalize(segment)
            }
        })
        .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
