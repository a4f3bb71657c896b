//! `@AddCompletionHandler`: a callback-based overload of an async function.

use crate::errors::{DiagnosticKind, DiagnosticReporting};
use crate::macros::context::MacroExpansionContext;
use crate::macros::matchers::{as_function_decl, FunctionShape};
use crate::macros::signature::{IntroducedName, MacroSignature, RoleDeclaration};
use crate::macros::types::{MacroDef, MacroFn, MacroRole, RuleResult};
use crate::syntax::builder::{
    await_expr, call, call_with_closure, closure_type, function, ident, member, named_type,
    parameter,
};
use crate::syntax::{Argument, AttributeNode, DeclNode, Stmt};

const COMPLETION_PARAMETER: &str = "onCompletion";

pub fn add_completion_handler() -> MacroDef {
    MacroDef::new(
        MacroSignature::new("AddCompletionHandler", "AddCompletionHandlerMacro")
            .role(RoleDeclaration::new(MacroRole::Peer).names([IntroducedName::Overloaded])),
        vec![MacroFn::Peer(expand_completion_handler)],
    )
}

/// For `func f() async -> T` produces
///
/// ```text
/// func f(onCompletion: @escaping @Sendable (T) -> Void) {
///     Task.detached {
///         onCompletion(await f())
///     }
/// }
/// ```
fn expand_completion_handler(
    attribute: &AttributeNode,
    decl: &DeclNode,
    ctx: &mut MacroExpansionContext,
) -> RuleResult<Vec<DeclNode>> {
    let Some(shape) = as_function_decl(decl) else {
        return Err(ctx
            .report(DiagnosticKind::RequiresFunction, attribute.span)
            .into());
    };
    let FunctionShape {
        name,
        parameter_count: 0,
        is_async: true,
        return_type_name: Some(return_type),
    } = shape
    else {
        return Err(ctx
            .report(DiagnosticKind::NoReturn, attribute.span)
            .with_help("the function must take no parameters, be `async` and return a named type")
            .into());
    };

    let span = ctx.invocation_span();
    let callback = closure_type(
        &["escaping", "Sendable"],
        vec![named_type(return_type, span)],
        named_type("Void", span),
        span,
    );
    let result = await_expr(call(ident(name, span), vec![], span), span);
    let deliver = call(
        ident(COMPLETION_PARAMETER, span),
        vec![Argument::unlabeled(result)],
        span,
    );
    let task = call_with_closure(
        member(ident("Task", span), "detached", span),
        vec![Stmt::Expr(deliver)],
        span,
    );
    Ok(vec![function(
        name,
        vec![parameter(COMPLETION_PARAMETER, callback)],
        false,
        None,
        Some(vec![Stmt::Expr(task)]),
        span,
    )])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ExpansionError;
    use crate::macros::rules::test_support::source;
    use crate::syntax::builder::{attribute, stored_var};
    use crate::syntax::Span;

    const S: Span = Span { start: 0, end: 0 };

    fn run(decl: &DeclNode) -> RuleResult<Vec<DeclNode>> {
        let file = source("");
        let attr = attribute("AddCompletionHandler", None, S);
        let mut ctx = MacroExpansionContext::new(&file, "AddCompletionHandler", S);
        expand_completion_handler(&attr, decl, &mut ctx)
    }

    fn diagnostic_code(decl: &DeclNode) -> String {
        match run(decl) {
            Err(ExpansionError::Diagnostic(d)) => d.code(),
            other => panic!("expected diagnostic, got {other:?}"),
        }
    }

    #[test]
    fn generates_detached_task_overload() {
        let decl = function("fetchData", vec![], true, Some(named_type("Data", S)), Some(vec![]), S);
        let out = run(&decl).unwrap();
        assert_eq!(
            out[0].to_string(),
            "func fetchData(onCompletion: @escaping @Sendable (Data) -> Void) {\n    \
             Task.detached {\n        \
             onCompletion(await fetchData())\n    \
             }\n}"
        );
    }

    #[test]
    fn non_function_reports_requires_function() {
        let decl = stored_var("value", Some(named_type("Int", S)), None, S);
        assert_eq!(diagnostic_code(&decl), "AddCompletionMacro.requiresFunction");
    }

    #[test]
    fn wrong_shapes_report_no_return() {
        let with_parameter = function(
            "load",
            vec![parameter("id", named_type("Int", S))],
            true,
            Some(named_type("Data", S)),
            None,
            S,
        );
        let synchronous = function("load", vec![], false, Some(named_type("Data", S)), None, S);
        let no_return = function("load", vec![], true, None, None, S);
        for decl in [with_parameter, synchronous, no_return] {
            assert_eq!(diagnostic_code(&decl), "AddCompletionMacro.noReturn");
        }
    }
}
