//! Freestanding expression macros: `#stringify` and `#URL`.

use url::Url;

use crate::errors::{DiagnosticKind, DiagnosticReporting};
use crate::macros::context::MacroExpansionContext;
use crate::macros::matchers::string_literal_content;
use crate::macros::signature::{MacroParameter, MacroSignature, RoleDeclaration};
use crate::macros::types::{MacroDef, MacroFn, MacroRole, RuleResult};
use crate::syntax::builder::{call, force_unwrap, ident, string_literal, tuple};
use crate::syntax::{Argument, ExprNode, MacroInvocation};

/// `#stringify(value)` → `(value, "<source text of value>")`.
pub fn stringify() -> MacroDef {
    MacroDef::new(
        MacroSignature::new("stringify", "StringifyMacro")
            .generic("T")
            .parameter(MacroParameter::unlabeled("value", "T"))
            .returns("(T, String)")
            .role(RoleDeclaration::new(MacroRole::Expression)),
        vec![MacroFn::Expression(expand_stringify)],
    )
}

/// `#URL("https://...")` → `URL(string: "https://...")!`, validated at
/// expansion time so the unwrap cannot fail at run time.
pub fn url() -> MacroDef {
    MacroDef::new(
        MacroSignature::new("URL", "URLMacro")
            .parameter(MacroParameter::unlabeled("stringLiteral", "String"))
            .returns("URL")
            .role(RoleDeclaration::new(MacroRole::Expression)),
        vec![MacroFn::Expression(expand_url)],
    )
}

fn expand_stringify(
    node: &MacroInvocation,
    ctx: &mut MacroExpansionContext,
) -> RuleResult<ExprNode> {
    let argument = node
        .value
        .arguments
        .first()
        .ok_or_else(|| ctx.contract_violation("the macro does not have any arguments"))?;
    // The verbatim text, not a re-rendering of the node.
    let text = ctx
        .source_text(argument.expr.span)
        .ok_or_else(|| ctx.contract_violation("argument span lies outside the source file"))?;
    let span = ctx.invocation_span();
    Ok(tuple(
        vec![argument.expr.clone(), string_literal(text, argument.expr.span)],
        span,
    ))
}

fn expand_url(node: &MacroInvocation, ctx: &mut MacroExpansionContext) -> RuleResult<ExprNode> {
    let span = ctx.invocation_span();
    let Some(argument) = node.value.arguments.first() else {
        return Err(ctx.requires_static_string(DiagnosticKind::UrlRequiresStaticString, span));
    };
    let Some(text) = string_literal_content(&argument.expr) else {
        return Err(ctx.requires_static_string(
            DiagnosticKind::UrlRequiresStaticString,
            argument.expr.span,
        ));
    };
    if let Err(err) = Url::parse(text) {
        tracing::debug!(literal = text, error = %err, "rejected url literal");
        let kind = DiagnosticKind::MalformedUrl {
            literal: argument.expr.to_string(),
        };
        return Err(ctx
            .report(kind, argument.expr.span)
            .with_help(format!("URL parser reported: {}", err))
            .into());
    }
    let construct = call(
        ident("URL", span),
        vec![Argument::labeled("string", argument.expr.clone())],
        span,
    );
    Ok(force_unwrap(construct, span))
}
