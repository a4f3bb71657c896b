//! Diagnostics and contract violations surfaced through the `Expander`.

mod common;

use common::{registry, source, span_of};
use custom_codable::errors::{DiagnosticKind, MacroDiagnostic};
use custom_codable::macros::{Expander, ExpansionResult, MacroRole};
use custom_codable::syntax::builder::{
    attribute, enum_case, function, ident, named_type, raw_string_literal, stored_var, type_decl,
    with_attributes,
};
use custom_codable::syntax::{
    Argument, DeclNode, Expr, FreestandingMacro, MacroInvocation, SourceFile, Span, Spanned,
    StringLiteral, StringSegment, TypeKind,
};

fn invocation(name: &str, arguments: Vec<Argument>, span: Span) -> MacroInvocation {
    Spanned::new(
        FreestandingMacro {
            name: name.to_string(),
            arguments,
        },
        span,
    )
}

fn freestanding_diagnostic(
    node: &MacroInvocation,
    role: MacroRole,
    file: &SourceFile,
) -> MacroDiagnostic {
    match Expander::new(registry())
        .expand_freestanding(node, role, file)
        .expect("no contract violation")
    {
        ExpansionResult::Diagnostic(diagnostic) => diagnostic,
        ExpansionResult::Syntax(syntax) => panic!("expected a diagnostic, got {syntax:?}"),
    }
}

fn declaration_codes(decl: &DeclNode, file: &SourceFile) -> Vec<String> {
    Expander::new(registry())
        .expand_declaration(decl, file)
        .expect("no contract violation")
        .diagnostics
        .iter()
        .map(MacroDiagnostic::code)
        .collect()
}

// ============================================================================
// CodingKeys
// ============================================================================

#[test]
fn custom_codable_on_an_enum_is_rejected_and_left_in_place() {
    let text = "@CustomCodable\nenum Direction {\n    case north\n}";
    let file = source(text);
    let decl = with_attributes(
        type_decl(
            TypeKind::Enum,
            "Direction",
            vec![],
            vec![enum_case("north", None, span_of(text, "case north"))],
            span_of(text, text),
        ),
        vec![attribute("CustomCodable", None, span_of(text, "@CustomCodable"))],
    );

    let expanded = Expander::new(registry())
        .expand_declaration(&decl, &file)
        .unwrap();
    assert_eq!(expanded.diagnostics.len(), 1);
    let diagnostic = &expanded.diagnostics[0];
    assert_eq!(diagnostic.kind, DiagnosticKind::RequiresStructOrClass);
    assert_eq!(diagnostic.span, span_of(text, "@CustomCodable"));
    assert_eq!(
        diagnostic.message(),
        "'CodingKeys' macro can only be applied to struct."
    );
    // The failed site is not expanded.
    assert_eq!(expanded.to_string(), text);
}

#[test]
fn custom_codable_on_an_empty_struct_has_no_argument() {
    let text = "@CustomCodable\nstruct Empty {}";
    let file = source(text);
    let decl = with_attributes(
        type_decl(TypeKind::Struct, "Empty", vec![], vec![], span_of(text, text)),
        vec![attribute("CustomCodable", None, span_of(text, "@CustomCodable"))],
    );
    assert_eq!(
        declaration_codes(&decl, &file),
        vec!["CodingKeysMacro.noArgument"]
    );
}

#[test]
fn codable_key_without_a_name_is_reported_by_both_sites() {
    let text = "@CustomCodable\nstruct S {\n    @CodableKey\n    var x: Int\n}";
    let file = source(text);
    let member = with_attributes(
        stored_var("x", Some(named_type("Int", span_of(text, "Int"))), None, span_of(text, "var x: Int")),
        vec![attribute("CodableKey", None, span_of(text, "@CodableKey"))],
    );
    let decl = with_attributes(
        type_decl(TypeKind::Struct, "S", vec![], vec![member], span_of(text, text)),
        vec![attribute("CustomCodable", None, span_of(text, "@CustomCodable"))],
    );
    assert_eq!(
        declaration_codes(&decl, &file),
        vec!["CodingKeysMacro.missingKeyName", "MacroExpansion.arityMismatch"]
    );
}

// ============================================================================
// Completion handlers
// ============================================================================

#[test]
fn completion_handler_requires_a_function() {
    let text = "@AddCompletionHandler\nvar value: Int";
    let file = source(text);
    let decl = with_attributes(
        stored_var("value", Some(named_type("Int", span_of(text, "Int"))), None, span_of(text, "var value: Int")),
        vec![attribute("AddCompletionHandler", None, span_of(text, "@AddCompletionHandler"))],
    );
    assert_eq!(
        declaration_codes(&decl, &file),
        vec!["AddCompletionMacro.requiresFunction"]
    );
}

#[test]
fn completion_handler_requires_an_async_value() {
    let text = "@AddCompletionHandler\nfunc refresh() {}";
    let file = source(text);
    let decl = with_attributes(
        function("refresh", vec![], false, None, Some(vec![]), span_of(text, "func refresh() {}")),
        vec![attribute("AddCompletionHandler", None, span_of(text, "@AddCompletionHandler"))],
    );
    let expanded = Expander::new(registry())
        .expand_declaration(&decl, &file)
        .unwrap();
    assert_eq!(expanded.diagnostics[0].code(), "AddCompletionMacro.noReturn");
    assert!(expanded.diagnostics[0].help.is_some());
    // No peer was produced.
    assert_eq!(expanded.items.len(), 1);
}

// ============================================================================
// Literals
// ============================================================================

#[test]
fn url_rejects_interpolated_and_malformed_literals() {
    let text = r#"#URL("https://\(host)/")"#;
    let file = source(text);
    let interpolated = Spanned::new(
        Expr::StringLiteral(StringLiteral {
            segments: vec![
                StringSegment::Text("https://".into()),
                StringSegment::Interpolation("host".into()),
                StringSegment::Text("/".into()),
            ],
        }),
        span_of(text, r#""https://\(host)/""#),
    );
    let node = invocation("URL", vec![Argument::unlabeled(interpolated)], span_of(text, text));
    assert_eq!(
        freestanding_diagnostic(&node, MacroRole::Expression, &file).code(),
        "URLMacro.requiresStaticString"
    );

    let text = r#"#URL("https://exa mple.com")"#;
    let file = source(text);
    let literal = raw_string_literal("https://exa mple.com", span_of(text, r#""https://exa mple.com""#));
    let node = invocation("URL", vec![Argument::unlabeled(literal)], span_of(text, text));
    let diagnostic = freestanding_diagnostic(&node, MacroRole::Expression, &file);
    assert_eq!(diagnostic.code(), "URLMacro.malformedURL");
    assert_eq!(diagnostic.message(), r#"malformed url: "https://exa mple.com""#);
}

#[test]
fn constant_rejects_text_that_is_not_an_identifier() {
    let text = r#"#Constant("1st_place")"#;
    let file = source(text);
    let literal = raw_string_literal("1st_place", span_of(text, r#""1st_place""#));
    let node = invocation("Constant", vec![Argument::unlabeled(literal)], span_of(text, text));
    let diagnostic = freestanding_diagnostic(&node, MacroRole::Declaration, &file);
    assert_eq!(diagnostic.code(), "ConstantMacro.invalidIdentifier");
}

// ============================================================================
// Invocation checks
// ============================================================================

#[test]
fn extra_arguments_are_an_arity_mismatch() {
    let text = "#stringify(a, b)";
    let file = source(text);
    let node = invocation(
        "stringify",
        vec![
            Argument::unlabeled(ident("a", span_of(text, "a"))),
            Argument::unlabeled(ident("b", span_of(text, "b"))),
        ],
        span_of(text, text),
    );
    let diagnostic = freestanding_diagnostic(&node, MacroRole::Expression, &file);
    assert_eq!(
        diagnostic.kind,
        DiagnosticKind::ArityMismatch {
            macro_name: "stringify".into(),
            expected: "1".into(),
            found: 2,
        }
    );
}

#[test]
fn expression_macro_used_as_declaration_is_role_not_supported() {
    let text = "#stringify(a)";
    let file = source(text);
    let node = invocation(
        "stringify",
        vec![Argument::unlabeled(ident("a", span_of(text, "a")))],
        span_of(text, text),
    );
    let diagnostic = freestanding_diagnostic(&node, MacroRole::Declaration, &file);
    assert_eq!(diagnostic.code(), "MacroExpansion.roleNotSupported");
}

#[test]
fn unknown_macro_is_a_contract_violation() {
    let text = "#nowhere()";
    let file = source(text);
    let node = invocation("nowhere", vec![], span_of(text, text));
    let err = Expander::new(registry())
        .expand_freestanding(&node, MacroRole::Expression, &file)
        .unwrap_err();
    assert_eq!(err.macro_name, "nowhere");
}

#[test]
fn one_failing_site_does_not_stop_the_others() {
    let text = "@CustomCodable\nstruct Job {\n    @AddCompletionHandler\n    var id: Int\n}";
    let file = source(text);
    let member = with_attributes(
        stored_var("id", Some(named_type("Int", span_of(text, "Int"))), None, span_of(text, "var id: Int")),
        vec![attribute("AddCompletionHandler", None, span_of(text, "@AddCompletionHandler"))],
    );
    let decl = with_attributes(
        type_decl(TypeKind::Struct, "Job", vec![], vec![member], span_of(text, text)),
        vec![attribute("CustomCodable", None, span_of(text, "@CustomCodable"))],
    );
    let expanded = Expander::new(registry())
        .expand_declaration(&decl, &file)
        .unwrap();
    assert_eq!(
        expanded
            .diagnostics
            .iter()
            .map(MacroDiagnostic::code)
            .collect::<Vec<_>>(),
        vec!["AddCompletionMacro.requiresFunction"]
    );
    assert!(expanded.to_string().contains("enum CodingKeys: String, CodingKey"));
}

#[test]
fn reports_render_against_the_source() {
    let text = "@CustomCodable\nenum E {\n    case a\n}";
    let file = source(text);
    let diagnostic = MacroDiagnostic::error(
        DiagnosticKind::RequiresStructOrClass,
        span_of(text, "@CustomCodable"),
    );
    let rendered = format!("{:?}", diagnostic.into_report(file.named_source()));
    assert!(rendered.contains("'CodingKeys' macro can only be applied to struct."));
}
