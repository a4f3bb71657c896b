//! Renders syntax nodes back to surface text.
//!
//! Output uses four-space indentation, puts each attribute on its own line,
//! and separates a multi-line member from its neighbours with a blank line.
//! Expansion tests compare this text against expected literals.

use std::fmt;

use super::decl::{
    AccessorBlock, AccessorDecl, Attribute, Decl, EnumCaseDecl, FunctionDecl, Modifier,
    Parameter, Pattern, PatternBinding, Stmt, VariableDecl,
};
use super::expr::{Argument, Expr, FreestandingMacro, StringLiteral, StringSegment};
use super::types::TypeSyntax;
use super::{DeclNode, Spanned};

const INDENT: &str = "    ";

struct Printer {
    out: String,
    depth: usize,
}

impl Printer {
    fn new() -> Self {
        Self {
            out: String::new(),
            depth: 0,
        }
    }

    fn push(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn newline(&mut self) {
        self.out.push('\n');
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
    }

    /// Writes `{`, the indented lines produced by `body`, then `}`.
    /// An empty body renders as `{}`.
    fn block<T>(&mut self, items: &[T], mut write: impl FnMut(&mut Self, &T)) {
        if items.is_empty() {
            self.push("{}");
            return;
        }
        self.push("{");
        self.depth += 1;
        for item in items {
            self.newline();
            write(self, item);
        }
        self.depth -= 1;
        self.newline();
        self.push("}");
    }

    fn member_block(&mut self, members: &[DeclNode]) {
        if members.is_empty() {
            self.push("{}");
            return;
        }
        self.push("{");
        self.depth += 1;
        let mut previous_multiline = false;
        for (i, member) in members.iter().enumerate() {
            let start = self.out.len();
            self.newline();
            let text_start = self.out.len();
            self.decl(&member.value);
            let multiline = self.out[text_start..].contains('\n');
            // The separating blank line depends on the member just written.
            if i > 0 && (multiline || previous_multiline) {
                self.out.insert(start, '\n');
            }
            previous_multiline = multiline;
        }
        self.depth -= 1;
        self.newline();
        self.push("}");
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Identifier(name) | Expr::Token(name) => self.push(name),
            Expr::IntegerLiteral(text) | Expr::FloatLiteral(text) => self.push(text),
            Expr::BooleanLiteral(value) => self.push(if *value { "true" } else { "false" }),
            Expr::NilLiteral => self.push("nil"),
            Expr::StringLiteral(literal) => self.string(literal),
            Expr::ArrayLiteral(items) => {
                self.push("[");
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    self.expr(&item.value);
                }
                self.push("]");
            }
            Expr::DictionaryLiteral(entries) => {
                if entries.is_empty() {
                    self.push("[:]");
                    return;
                }
                self.push("[");
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    self.expr(&key.value);
                    self.push(": ");
                    self.expr(&value.value);
                }
                self.push("]");
            }
            Expr::Tuple(elements) => {
                self.push("(");
                self.arguments(elements);
                self.push(")");
            }
            Expr::Paren(inner) => {
                self.push("(");
                self.expr(&inner.value);
                self.push(")");
            }
            Expr::Binary { lhs, operator, rhs } => {
                self.expr(&lhs.value);
                self.push(" ");
                self.push(operator);
                self.push(" ");
                self.expr(&rhs.value);
            }
            Expr::Prefix { operator, operand } => {
                self.push(operator);
                self.expr(&operand.value);
            }
            Expr::MemberAccess { base, name } => {
                if let Some(base) = base {
                    self.expr(&base.value);
                }
                self.push(".");
                self.push(name);
            }
            Expr::Call {
                callee,
                arguments,
                trailing_closure,
            } => {
                self.expr(&callee.value);
                if !arguments.is_empty() || trailing_closure.is_none() {
                    self.push("(");
                    self.arguments(arguments);
                    self.push(")");
                }
                if let Some(closure) = trailing_closure {
                    self.push(" ");
                    self.expr(&closure.value);
                }
            }
            Expr::Subscript { base, arguments } => {
                self.expr(&base.value);
                self.push("[");
                self.arguments(arguments);
                self.push("]");
            }
            Expr::ForceUnwrap(inner) => {
                self.expr(&inner.value);
                self.push("!");
            }
            Expr::Cast { expr, kind, ty } => {
                self.expr(&expr.value);
                self.push(" ");
                self.push(kind.as_str());
                self.push(" ");
                self.ty(&ty.value);
            }
            Expr::Await(inner) => {
                self.push("await ");
                self.expr(&inner.value);
            }
            Expr::Assignment { target, value } => {
                self.expr(&target.value);
                self.push(" = ");
                self.expr(&value.value);
            }
            Expr::Closure(statements) => self.block(statements, |p, s| p.stmt(s)),
            Expr::MacroExpansion(invocation) => self.freestanding(invocation),
        }
    }

    fn string(&mut self, literal: &StringLiteral) {
        self.push("\"");
        for segment in &literal.segments {
            match segment {
                StringSegment::Text(text) => self.push(text),
                StringSegment::Interpolation(source) => {
                    self.push("\\(");
                    self.push(source);
                    self.push(")");
                }
            }
        }
        self.push("\"");
    }

    fn arguments(&mut self, arguments: &[Argument]) {
        for (i, argument) in arguments.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            if let Some(label) = &argument.label {
                self.push(label);
                self.push(": ");
            }
            self.expr(&argument.expr.value);
        }
    }

    fn freestanding(&mut self, invocation: &FreestandingMacro) {
        self.push("#");
        self.push(&invocation.name);
        self.push("(");
        self.arguments(&invocation.arguments);
        self.push(")");
    }

    // ------------------------------------------------------------------
    // Types
    // ------------------------------------------------------------------

    fn ty(&mut self, ty: &TypeSyntax) {
        match ty {
            TypeSyntax::Identifier {
                name,
                generic_arguments,
            } => {
                self.push(name);
                if !generic_arguments.is_empty() {
                    self.push("<");
                    self.type_list(generic_arguments);
                    self.push(">");
                }
            }
            TypeSyntax::Optional(inner) => {
                self.ty(&inner.value);
                self.push("?");
            }
            TypeSyntax::Array(element) => {
                self.push("[");
                self.ty(&element.value);
                self.push("]");
            }
            TypeSyntax::Dictionary { key, value } => {
                self.push("[");
                self.ty(&key.value);
                self.push(": ");
                self.ty(&value.value);
                self.push("]");
            }
            TypeSyntax::Tuple(elements) => {
                self.push("(");
                self.type_list(elements);
                self.push(")");
            }
            TypeSyntax::Function {
                parameters,
                is_async,
                result,
            } => {
                self.push("(");
                self.type_list(parameters);
                self.push(")");
                if *is_async {
                    self.push(" async");
                }
                self.push(" -> ");
                self.ty(&result.value);
            }
            TypeSyntax::Attributed { attributes, base } => {
                for attribute in attributes {
                    self.push("@");
                    self.push(attribute);
                    self.push(" ");
                }
                self.ty(&base.value);
            }
        }
    }

    fn type_list(&mut self, types: &[Spanned<TypeSyntax>]) {
        for (i, ty) in types.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.ty(&ty.value);
        }
    }

    fn inheritance(&mut self, inheritance: &[Spanned<TypeSyntax>]) {
        if !inheritance.is_empty() {
            self.push(": ");
            self.type_list(inheritance);
        }
    }

    // ------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------

    fn attribute(&mut self, attribute: &Attribute) {
        self.push("@");
        self.push(&attribute.name);
        if let Some(arguments) = &attribute.arguments {
            self.push("(");
            self.arguments(arguments);
            self.push(")");
        }
    }

    fn leading(&mut self, attributes: &[Spanned<Attribute>], modifiers: &[Modifier]) {
        for attribute in attributes {
            self.attribute(&attribute.value);
            self.newline();
        }
        for modifier in modifiers {
            self.push(modifier.as_str());
            self.push(" ");
        }
    }

    fn decl(&mut self, decl: &Decl) {
        match decl {
            Decl::Type(d) => {
                self.leading(&d.attributes, &d.modifiers);
                self.push(d.kind.keyword());
                self.push(" ");
                self.push(&d.name);
                self.inheritance(&d.inheritance);
                self.push(" ");
                self.member_block(&d.members);
            }
            Decl::Extension(d) => {
                self.leading(&d.attributes, &d.modifiers);
                self.push("extension ");
                self.ty(&d.extended_type.value);
                self.inheritance(&d.inheritance);
                self.push(" ");
                self.member_block(&d.members);
            }
            Decl::Variable(d) => self.variable(d),
            Decl::Function(d) => self.function(d),
            Decl::EnumCase(d) => self.enum_case(d),
            Decl::MacroExpansion(invocation) => self.freestanding(invocation),
        }
    }

    fn variable(&mut self, decl: &VariableDecl) {
        self.leading(&decl.attributes, &decl.modifiers);
        self.push(match decl.keyword {
            super::BindingKeyword::Let => "let ",
            super::BindingKeyword::Var => "var ",
        });
        for (i, binding) in decl.bindings.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.binding(binding);
        }
    }

    fn binding(&mut self, binding: &PatternBinding) {
        self.pattern(&binding.pattern.value);
        if let Some(ty) = &binding.type_annotation {
            self.push(": ");
            self.ty(&ty.value);
        }
        if let Some(initializer) = &binding.initializer {
            self.push(" = ");
            self.expr(&initializer.value);
        }
        match &binding.accessors {
            Some(AccessorBlock::Getter(statements)) => {
                self.push(" ");
                self.block(statements, |p, s| p.stmt(s));
            }
            Some(AccessorBlock::Accessors(accessors)) => {
                self.push(" ");
                self.block(accessors, |p, a| p.accessor(&a.value));
            }
            None => {}
        }
    }

    fn pattern(&mut self, pattern: &Pattern) {
        match pattern {
            Pattern::Identifier(name) => self.push(name),
            Pattern::Wildcard => self.push("_"),
            Pattern::Tuple(elements) => {
                self.push("(");
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    self.pattern(&element.value);
                }
                self.push(")");
            }
        }
    }

    fn accessor(&mut self, accessor: &AccessorDecl) {
        self.push(accessor.kind.keyword());
        self.push(" ");
        self.block(&accessor.body, |p, s| p.stmt(s));
    }

    fn function(&mut self, decl: &FunctionDecl) {
        self.leading(&decl.attributes, &decl.modifiers);
        self.push("func ");
        self.push(&decl.name);
        self.push("(");
        for (i, parameter) in decl.parameters.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.parameter(parameter);
        }
        self.push(")");
        if decl.is_async {
            self.push(" async");
        }
        if let Some(ty) = &decl.return_type {
            self.push(" -> ");
            self.ty(&ty.value);
        }
        if let Some(body) = &decl.body {
            self.push(" ");
            self.block(body, |p, s| p.stmt(s));
        }
    }

    fn parameter(&mut self, parameter: &Parameter) {
        self.push(&parameter.first_name);
        if let Some(second) = &parameter.second_name {
            self.push(" ");
            self.push(second);
        }
        self.push(": ");
        self.ty(&parameter.ty.value);
        if let Some(default) = &parameter.default_value {
            self.push(" = ");
            self.expr(&default.value);
        }
    }

    fn enum_case(&mut self, decl: &EnumCaseDecl) {
        self.leading(&decl.attributes, &[]);
        self.push("case ");
        for (i, element) in decl.elements.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.push(&element.name);
            if let Some(raw) = &element.raw_value {
                self.push(" = ");
                self.expr(&raw.value);
            }
        }
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expr(expr) => self.expr(&expr.value),
            Stmt::Decl(decl) => self.decl(&decl.value),
            Stmt::Return(value) => {
                self.push("return");
                if let Some(value) = value {
                    self.push(" ");
                    self.expr(&value.value);
                }
            }
        }
    }
}

// ============================================================================
// DISPLAY IMPLEMENTATIONS
// ============================================================================

macro_rules! display_via {
    ($ty:ty, $method:ident) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let mut printer = Printer::new();
                printer.$method(self);
                f.write_str(&printer.out)
            }
        }
    };
}

display_via!(Expr, expr);
display_via!(TypeSyntax, ty);
display_via!(Attribute, attribute);
display_via!(Decl, decl);
display_via!(AccessorDecl, accessor);
display_via!(Stmt, stmt);

impl<T: fmt::Display> fmt::Display for Spanned<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::builder::*;
    use crate::syntax::Span;

    const S: Span = Span { start: 0, end: 0 };

    #[test]
    fn renders_call_with_trailing_closure_without_parentheses() {
        let call = call_with_closure(
            member(ident("Task", S), "detached", S),
            vec![Stmt::Expr(call(ident("run", S), vec![], S))],
            S,
        );
        assert_eq!(call.to_string(), "Task.detached {\n    run()\n}");
    }

    #[test]
    fn separates_multiline_members_with_blank_line() {
        let inner = type_decl(
            crate::syntax::TypeKind::Enum,
            "Keys",
            vec![],
            vec![enum_case("a", None, S)],
            S,
        );
        let outer = type_decl(
            crate::syntax::TypeKind::Struct,
            "Outer",
            vec![],
            vec![stored_var("x", Some(named_type("Int", S)), None, S), inner],
            S,
        );
        assert_eq!(
            outer.to_string(),
            "struct Outer {\n    var x: Int\n\n    enum Keys {\n        case a\n    }\n}"
        );
    }

    #[test]
    fn deep_member_nesting_renders_each_level_once() {
        let mut decl = type_decl(crate::syntax::TypeKind::Struct, "Leaf", vec![], vec![], S);
        for level in 0..48 {
            decl = type_decl(
                crate::syntax::TypeKind::Struct,
                &format!("Level{level}"),
                vec![],
                vec![stored_var("x", Some(named_type("Int", S)), None, S), decl],
                S,
            );
        }
        let text = decl.to_string();
        assert!(text.starts_with("struct Level47 {\n    var x: Int\n\n    struct Level46 {"));
        assert_eq!(text.matches("struct ").count(), 49);
        assert!(text.contains(&format!("{}struct Leaf {{}}", INDENT.repeat(48))));
    }

    #[test]
    fn parenthesised_operands_keep_their_grouping() {
        let sum = Spanned::new(
            Expr::Binary {
                lhs: Box::new(ident("a", S)),
                operator: "+".into(),
                rhs: Box::new(ident("b", S)),
            },
            S,
        );
        let product = Spanned::new(
            Expr::Binary {
                lhs: Box::new(paren(sum, S)),
                operator: "*".into(),
                rhs: Box::new(ident("c", S)),
            },
            S,
        );
        assert_eq!(product.to_string(), "(a + b) * c");
        assert_eq!(force_unwrap(paren(ident("x", S), S), S).to_string(), "(x)!");
    }

    #[test]
    fn empty_dictionary_literal_renders_with_colon() {
        let expr = Spanned::new(Expr::DictionaryLiteral(vec![]), S);
        assert_eq!(expr.to_string(), "[:]");
    }
}
