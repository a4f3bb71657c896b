//! Host-side expansion driver.
//!
//! The [`Expander`] plays the part of the compiler at an invocation site: it
//! resolves the macro in a [`MacroRegistry`], checks the invocation against
//! the macro's declared signature, creates a fresh [`MacroExpansionContext`]
//! and dispatches to the rule for the role in play.
//!
//! ## Error Handling
//!
//! - A diagnostic fails its own site only. [`ExpansionResult::Diagnostic`]
//!   carries it back and the remaining sites still expand.
//! - A [`ContractViolation`] aborts the whole call and is returned as `Err`.
//!
//! ## Splicing
//!
//! [`Expander::expand_declaration`] simulates the host end to end: it expands
//! every registered attribute on a declaration, strips those attributes,
//! splices the produced members, accessors and peers into a new tree,
//! recurses into members (including attributes just added by member-attribute
//! roles) and collects extensions at the outermost level. A site that fails
//! is left unexpanded in the output.

use serde::Serialize;
use std::fmt;

use crate::errors::{ContractViolation, DiagnosticKind, DiagnosticReporting, ExpansionError, MacroDiagnostic};
use crate::macros::context::MacroExpansionContext;
use crate::macros::registry::MacroRegistry;
use crate::macros::types::{
    AttachedExpansion, ExpansionResult, FreestandingExpansion, MacroDef, MacroFn, MacroRole,
    MemberAttributes, RuleResult,
};
use crate::syntax::builder::named_type;
use crate::syntax::{
    AccessorBlock, Argument, AttributeNode, Decl, DeclNode, Expr, ExprNode, FreestandingMacro,
    MacroInvocation, SourceFile, Span, Spanned, Stmt, TypeNode, TypeSyntax,
};

/// Deepest chain of macro output containing further macro sites.
pub const MAX_EXPANSION_DEPTH: usize = 64;

/// Output of [`Expander::expand_declaration`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expanded {
    /// The rewritten declaration, its peers, then any extensions.
    pub items: Vec<DeclNode>,
    pub diagnostics: Vec<MacroDiagnostic>,
}

impl Expanded {
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

impl fmt::Display for Expanded {
    /// Items rendered as source, separated by blank lines.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str("\n\n")?;
            }
            write!(f, "{}", item)?;
        }
        Ok(())
    }
}

/// Mutable state threaded through one `expand_declaration` call.
struct Walk<'s> {
    source: &'s SourceFile,
    depth: usize,
    diagnostics: Vec<MacroDiagnostic>,
    extensions: Vec<DeclNode>,
}

pub struct Expander<'r> {
    registry: &'r MacroRegistry,
    expand_expressions: bool,
}

impl<'r> Expander<'r> {
    pub fn new(registry: &'r MacroRegistry) -> Self {
        Self {
            registry,
            expand_expressions: true,
        }
    }

    /// Whether `expand_declaration` also expands `#macro(...)` expressions in
    /// initializers, bodies and default values. On by default.
    pub fn expand_expressions(mut self, enabled: bool) -> Self {
        self.expand_expressions = enabled;
        self
    }

    fn lookup(&self, name: &str) -> Result<&'r MacroDef, ContractViolation> {
        self.registry
            .lookup(name)
            .ok_or_else(|| ContractViolation::new(name, "macro is not registered"))
    }

    // ========================================================================
    // SINGLE SITES
    // ========================================================================

    /// Expands one `#name(...)` invocation in `role`.
    ///
    /// # Errors
    /// A [`ContractViolation`] when the macro is unknown, `role` is not a
    /// freestanding role, or the rule itself reports one.
    pub fn expand_freestanding(
        &self,
        invocation: &MacroInvocation,
        role: MacroRole,
        source: &SourceFile,
    ) -> Result<ExpansionResult<FreestandingExpansion>, ContractViolation> {
        let name = invocation.value.name.as_str();
        let def = self.lookup(name)?;
        if !role.is_freestanding() {
            return Err(ContractViolation::new(
                name,
                format!("'{}' is not a freestanding role", role),
            ));
        }
        let mut ctx = MacroExpansionContext::new(source, def.name(), invocation.span);
        tracing::debug!(macro_name = name, %role, "expanding freestanding macro");

        let Some(rule) = def.rule_for(role) else {
            return Ok(role_not_supported(def, role, invocation.span, &ctx));
        };
        if let Some(diagnostic) = check_arity(def, invocation.value.arguments.len(), invocation.span, &ctx) {
            return Ok(ExpansionResult::Diagnostic(diagnostic));
        }
        let produced = match rule {
            MacroFn::Expression(f) => f(invocation, &mut ctx).map(FreestandingExpansion::Expression),
            MacroFn::Declaration(f) => {
                f(invocation, &mut ctx).map(FreestandingExpansion::Declarations)
            }
            // `rule_for` only returns rules of the requested role.
            _ => return Ok(role_not_supported(def, role, invocation.span, &ctx)),
        };
        settle(name, produced)
    }

    /// Runs every attached role of the macro named by `attribute` against
    /// `decl` and gathers what they produce.
    ///
    /// The site is atomic: if any role reports a diagnostic, nothing produced
    /// by the other roles is kept.
    pub fn expand_attached(
        &self,
        attribute: &AttributeNode,
        decl: &DeclNode,
        source: &SourceFile,
    ) -> Result<ExpansionResult<AttachedExpansion>, ContractViolation> {
        let name = attribute.value.name.as_str();
        let def = self.lookup(name)?;
        let mut ctx = MacroExpansionContext::new(source, def.name(), attribute.span);
        tracing::debug!(
            macro_name = name,
            target = decl.value.kind_name(),
            "expanding attached macro"
        );

        if !def.is_attached() {
            let role = natural_attached_role(decl);
            return Ok(role_not_supported(def, role, attribute.span, &ctx));
        }
        if let Some(role) = def.roles().find(|role| !role.can_attach_to(decl)) {
            return Ok(role_not_supported(def, role, attribute.span, &ctx));
        }
        if let Some(diagnostic) = check_arity(def, attribute.value.argument_count(), attribute.span, &ctx) {
            return Ok(ExpansionResult::Diagnostic(diagnostic));
        }
        let produced = run_attached_rules(def, attribute, decl, &mut ctx);
        settle(name, produced)
    }

    // ========================================================================
    // WHOLE DECLARATIONS
    // ========================================================================

    /// Expands every registered macro site in `decl` and returns the
    /// rewritten tree with all diagnostics.
    ///
    /// # Errors
    /// The first [`ContractViolation`] met anywhere in the tree.
    pub fn expand_declaration(
        &self,
        decl: &DeclNode,
        source: &SourceFile,
    ) -> Result<Expanded, ContractViolation> {
        let mut walk = Walk {
            source,
            depth: 0,
            diagnostics: Vec::new(),
            extensions: Vec::new(),
        };
        let mut items = self.expand_decl(decl, &mut walk)?;
        items.append(&mut walk.extensions);
        tracing::debug!(
            items = items.len(),
            diagnostics = walk.diagnostics.len(),
            "declaration expanded"
        );
        Ok(Expanded {
            items,
            diagnostics: walk.diagnostics,
        })
    }

    /// Runs `f` one level deeper, failing once the nesting limit is hit.
    fn nested<'s, T>(
        &self,
        walk: &mut Walk<'s>,
        f: impl FnOnce(&mut Walk<'s>) -> Result<T, ContractViolation>,
    ) -> Result<T, ContractViolation> {
        if walk.depth >= MAX_EXPANSION_DEPTH {
            return Err(ContractViolation::new(
                "<expander>",
                format!("macro expansion nested deeper than {}", MAX_EXPANSION_DEPTH),
            ));
        }
        walk.depth += 1;
        let result = f(walk);
        walk.depth -= 1;
        result
    }

    fn expand_decl(
        &self,
        decl: &DeclNode,
        walk: &mut Walk<'_>,
    ) -> Result<Vec<DeclNode>, ContractViolation> {
        if let Decl::MacroExpansion(invocation) = &decl.value {
            return self.expand_declaration_macro(invocation, decl, &[], walk);
        }

        let mut kept = Vec::new();
        let mut produced = AttachedExpansion::default();
        for attribute in decl.value.attributes() {
            if !self.registry.contains(&attribute.value.name) {
                kept.push(attribute.clone());
                continue;
            }
            match self.expand_attached(attribute, decl, walk.source)? {
                ExpansionResult::Syntax(expansion) => produced.append(expansion),
                ExpansionResult::Diagnostic(diagnostic) => {
                    walk.diagnostics.push(diagnostic);
                    kept.push(attribute.clone());
                }
            }
        }

        let mut value = decl.value.with_attributes(kept);
        let AttachedExpansion {
            members,
            member_attributes,
            accessors,
            peers,
            extensions,
        } = produced;
        if let Some(list) = value.members_mut() {
            let inherited = apply_member_attributes(list, member_attributes);
            let original = std::mem::take(list);
            for (member, inherited) in original.iter().zip(&inherited) {
                let expanded = match &member.value {
                    Decl::MacroExpansion(invocation) => {
                        self.expand_declaration_macro(invocation, member, inherited, walk)?
                    }
                    _ => self.expand_decl(member, walk)?,
                };
                list.extend(expanded);
            }
            for member in &members {
                list.extend(self.nested(walk, |walk| self.expand_decl(member, walk))?);
            }
        }
        if !accessors.is_empty() {
            if let Decl::Variable(variable) = &mut value {
                if let Some(binding) = variable.bindings.first_mut() {
                    binding.accessors = Some(AccessorBlock::Accessors(accessors));
                }
            }
        }
        if self.expand_expressions {
            value = self.expand_decl_expressions(value, walk)?;
        }

        let mut items = vec![Spanned::new(value, decl.span)];
        for peer in &peers {
            items.extend(self.nested(walk, |walk| self.expand_decl(peer, walk))?);
        }
        for extension in &extensions {
            let expanded = self.nested(walk, |walk| self.expand_decl(extension, walk))?;
            walk.extensions.extend(expanded);
        }
        Ok(items)
    }

    /// Expands a `#name(...)` declaration site. `inherited` holds attributes
    /// a member-attribute role gave the site; they go first on every
    /// declaration the macro produces.
    fn expand_declaration_macro(
        &self,
        invocation: &FreestandingMacro,
        decl: &DeclNode,
        inherited: &[AttributeNode],
        walk: &mut Walk<'_>,
    ) -> Result<Vec<DeclNode>, ContractViolation> {
        if !self.registry.contains(&invocation.name) {
            return Ok(vec![decl.clone()]);
        }
        let node = Spanned::new(invocation.clone(), decl.span);
        match self.expand_freestanding(&node, MacroRole::Declaration, walk.source)? {
            ExpansionResult::Syntax(FreestandingExpansion::Declarations(decls)) => {
                let mut items = Vec::with_capacity(decls.len());
                for produced in decls {
                    let produced = prepend_attributes(produced, inherited);
                    items.extend(self.nested(walk, |walk| self.expand_decl(&produced, walk))?);
                }
                Ok(items)
            }
            // Declaration-role expansion never yields an expression.
            ExpansionResult::Syntax(FreestandingExpansion::Expression(_)) => Ok(vec![decl.clone()]),
            ExpansionResult::Diagnostic(diagnostic) => {
                walk.diagnostics.push(diagnostic);
                Ok(vec![decl.clone()])
            }
        }
    }

    // ========================================================================
    // EXPRESSIONS INSIDE DECLARATIONS
    // ========================================================================

    fn expand_decl_expressions(
        &self,
        mut decl: Decl,
        walk: &mut Walk<'_>,
    ) -> Result<Decl, ContractViolation> {
        match &mut decl {
            Decl::Variable(variable) => {
                for binding in &mut variable.bindings {
                    if let Some(initializer) = &binding.initializer {
                        binding.initializer = Some(self.expand_expr(initializer, walk)?);
                    }
                    match &mut binding.accessors {
                        Some(AccessorBlock::Getter(body)) => *body = self.expand_stmts(body, walk)?,
                        Some(AccessorBlock::Accessors(accessors)) => {
                            for accessor in accessors {
                                accessor.value.body = self.expand_stmts(&accessor.value.body, walk)?;
                            }
                        }
                        None => {}
                    }
                }
            }
            Decl::Function(function) => {
                for parameter in &mut function.parameters {
                    if let Some(default) = &parameter.default_value {
                        parameter.default_value = Some(self.expand_expr(default, walk)?);
                    }
                }
                if let Some(body) = &function.body {
                    function.body = Some(self.expand_stmts(body, walk)?);
                }
            }
            Decl::EnumCase(case) => {
                for element in &mut case.elements {
                    if let Some(raw) = &element.raw_value {
                        element.raw_value = Some(self.expand_expr(raw, walk)?);
                    }
                }
            }
            Decl::Type(_) | Decl::Extension(_) | Decl::MacroExpansion(_) => {}
        }
        Ok(decl)
    }

    fn expand_stmts(
        &self,
        stmts: &[Stmt],
        walk: &mut Walk<'_>,
    ) -> Result<Vec<Stmt>, ContractViolation> {
        let mut out = Vec::with_capacity(stmts.len());
        for stmt in stmts {
            match stmt {
                Stmt::Expr(expr) => out.push(Stmt::Expr(self.expand_expr(expr, walk)?)),
                Stmt::Return(Some(expr)) => out.push(Stmt::Return(Some(self.expand_expr(expr, walk)?))),
                Stmt::Return(None) => out.push(Stmt::Return(None)),
                Stmt::Decl(decl) => {
                    let expanded = self.expand_decl(decl, walk)?;
                    out.extend(expanded.into_iter().map(Stmt::Decl));
                }
            }
        }
        Ok(out)
    }

    fn expand_expr(&self, expr: &ExprNode, walk: &mut Walk<'_>) -> Result<ExprNode, ContractViolation> {
        let value = match &expr.value {
            Expr::MacroExpansion(invocation) => {
                return self.expand_expression_macro(invocation, expr, walk)
            }
            Expr::ArrayLiteral(items) => Expr::ArrayLiteral(self.expand_exprs(items, walk)?),
            Expr::DictionaryLiteral(entries) => {
                let mut out = Vec::with_capacity(entries.len());
                for (key, value) in entries {
                    out.push((self.expand_expr(key, walk)?, self.expand_expr(value, walk)?));
                }
                Expr::DictionaryLiteral(out)
            }
            Expr::Tuple(elements) => Expr::Tuple(self.expand_arguments(elements, walk)?),
            Expr::Paren(inner) => Expr::Paren(self.expand_boxed(inner, walk)?),
            Expr::Binary { lhs, operator, rhs } => Expr::Binary {
                lhs: self.expand_boxed(lhs, walk)?,
                operator: operator.clone(),
                rhs: self.expand_boxed(rhs, walk)?,
            },
            Expr::Prefix { operator, operand } => Expr::Prefix {
                operator: operator.clone(),
                operand: self.expand_boxed(operand, walk)?,
            },
            Expr::MemberAccess { base, name } => Expr::MemberAccess {
                base: match base {
                    Some(base) => Some(self.expand_boxed(base, walk)?),
                    None => None,
                },
                name: name.clone(),
            },
            Expr::Call {
                callee,
                arguments,
                trailing_closure,
            } => Expr::Call {
                callee: self.expand_boxed(callee, walk)?,
                arguments: self.expand_arguments(arguments, walk)?,
                trailing_closure: match trailing_closure {
                    Some(closure) => Some(self.expand_boxed(closure, walk)?),
                    None => None,
                },
            },
            Expr::Subscript { base, arguments } => Expr::Subscript {
                base: self.expand_boxed(base, walk)?,
                arguments: self.expand_arguments(arguments, walk)?,
            },
            Expr::ForceUnwrap(inner) => Expr::ForceUnwrap(self.expand_boxed(inner, walk)?),
            Expr::Cast { expr: inner, kind, ty } => Expr::Cast {
                expr: self.expand_boxed(inner, walk)?,
                kind: *kind,
                ty: ty.clone(),
            },
            Expr::Await(inner) => Expr::Await(self.expand_boxed(inner, walk)?),
            Expr::Assignment { target, value } => Expr::Assignment {
                target: self.expand_boxed(target, walk)?,
                value: self.expand_boxed(value, walk)?,
            },
            Expr::Closure(body) => Expr::Closure(self.expand_stmts(body, walk)?),
            Expr::Identifier(_)
            | Expr::Token(_)
            | Expr::IntegerLiteral(_)
            | Expr::FloatLiteral(_)
            | Expr::BooleanLiteral(_)
            | Expr::NilLiteral
            | Expr::StringLiteral(_) => return Ok(expr.clone()),
        };
        Ok(Spanned::new(value, expr.span))
    }

    fn expand_boxed(
        &self,
        expr: &ExprNode,
        walk: &mut Walk<'_>,
    ) -> Result<Box<ExprNode>, ContractViolation> {
        self.expand_expr(expr, walk).map(Box::new)
    }

    fn expand_exprs(
        &self,
        exprs: &[ExprNode],
        walk: &mut Walk<'_>,
    ) -> Result<Vec<ExprNode>, ContractViolation> {
        exprs.iter().map(|expr| self.expand_expr(expr, walk)).collect()
    }

    fn expand_arguments(
        &self,
        arguments: &[Argument],
        walk: &mut Walk<'_>,
    ) -> Result<Vec<Argument>, ContractViolation> {
        arguments
            .iter()
            .map(|argument| {
                Ok(Argument {
                    label: argument.label.clone(),
                    expr: self.expand_expr(&argument.expr, walk)?,
                })
            })
            .collect()
    }

    fn expand_expression_macro(
        &self,
        invocation: &FreestandingMacro,
        expr: &ExprNode,
        walk: &mut Walk<'_>,
    ) -> Result<ExprNode, ContractViolation> {
        if !self.registry.contains(&invocation.name) {
            return Ok(expr.clone());
        }
        let node = Spanned::new(invocation.clone(), expr.span);
        match self.expand_freestanding(&node, MacroRole::Expression, walk.source)? {
            ExpansionResult::Syntax(FreestandingExpansion::Expression(produced)) => {
                self.nested(walk, |walk| self.expand_expr(&produced, walk))
            }
            ExpansionResult::Syntax(FreestandingExpansion::Declarations(_)) => Ok(expr.clone()),
            ExpansionResult::Diagnostic(diagnostic) => {
                walk.diagnostics.push(diagnostic);
                Ok(expr.clone())
            }
        }
    }
}

// ============================================================================
// HELPERS
// ============================================================================

fn settle<T>(
    macro_name: &str,
    produced: RuleResult<T>,
) -> Result<ExpansionResult<T>, ContractViolation> {
    match produced {
        Ok(syntax) => {
            tracing::trace!(macro_name, "expansion produced syntax");
            Ok(ExpansionResult::Syntax(syntax))
        }
        Err(ExpansionError::Diagnostic(diagnostic)) => {
            tracing::debug!(macro_name, code = %diagnostic.code(), "expansion diagnosed");
            Ok(ExpansionResult::Diagnostic(diagnostic))
        }
        Err(ExpansionError::Contract(violation)) => Err(violation),
    }
}

fn check_arity(
    def: &MacroDef,
    found: usize,
    span: Span,
    ctx: &MacroExpansionContext,
) -> Option<MacroDiagnostic> {
    if def.signature.accepts_argument_count(found) {
        return None;
    }
    let kind = DiagnosticKind::ArityMismatch {
        macro_name: def.name().to_string(),
        expected: def.signature.expected_arguments(),
        found,
    };
    Some(ctx.report(kind, span))
}

fn role_not_supported<T>(
    def: &MacroDef,
    role: MacroRole,
    span: Span,
    ctx: &MacroExpansionContext,
) -> ExpansionResult<T> {
    let kind = DiagnosticKind::RoleNotSupported {
        macro_name: def.name().to_string(),
        role,
    };
    let roles: Vec<&str> = def.roles().map(|role| role.as_str()).collect();
    ExpansionResult::Diagnostic(
        ctx.report(kind, span)
            .with_help(format!("'{}' supports: {}", def.name(), roles.join(", "))),
    )
}

/// The role an attribute on `decl` would most naturally play.
fn natural_attached_role(decl: &DeclNode) -> MacroRole {
    match &decl.value {
        Decl::Type(_) | Decl::Extension(_) => MacroRole::Member,
        Decl::Variable(_) => MacroRole::Accessor,
        _ => MacroRole::Peer,
    }
}

fn run_attached_rules(
    def: &MacroDef,
    attribute: &AttributeNode,
    decl: &DeclNode,
    ctx: &mut MacroExpansionContext,
) -> RuleResult<AttachedExpansion> {
    let mut expansion = AttachedExpansion::default();
    for rule in &def.rules {
        match *rule {
            MacroFn::Member(f) => expansion.members.extend(f(attribute, decl, ctx)?),
            MacroFn::MemberAttribute(f) => {
                let members = decl.value.members().unwrap_or(&[]);
                for (member_index, member) in members.iter().enumerate() {
                    let attributes = f(attribute, decl, member, ctx)?;
                    if !attributes.is_empty() {
                        expansion.member_attributes.push(MemberAttributes {
                            member_index,
                            attributes,
                        });
                    }
                }
            }
            MacroFn::Accessor(f) => expansion.accessors.extend(f(attribute, decl, ctx)?),
            MacroFn::Peer(f) => expansion.peers.extend(f(attribute, decl, ctx)?),
            MacroFn::Extension(f) => {
                let Some(ty) = extended_type(decl) else {
                    continue;
                };
                let protocols = missing_conformances(def, decl);
                expansion
                    .extensions
                    .extend(f(attribute, decl, &ty, &protocols, ctx)?);
            }
            MacroFn::Expression(_) | MacroFn::Declaration(_) => {}
        }
    }
    Ok(expansion)
}

fn extended_type(decl: &DeclNode) -> Option<TypeNode> {
    match &decl.value {
        Decl::Type(t) => Some(named_type(&t.name, decl.span)),
        _ => None,
    }
}

/// Declared conformances the type does not already list.
fn missing_conformances(def: &MacroDef, decl: &DeclNode) -> Vec<TypeNode> {
    let inherited: Vec<&str> = match &decl.value {
        Decl::Type(t) => t
            .inheritance
            .iter()
            .filter_map(|ty| match &ty.value {
                TypeSyntax::Identifier { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };
    def.signature
        .conformances()
        .iter()
        .filter(|protocol| !inherited.contains(*protocol))
        .map(|protocol| named_type(protocol, decl.span))
        .collect()
}

/// Appends each member's added attributes. A `#name(...)` member cannot
/// carry attributes itself, so its additions are returned by index and handed
/// to the declarations it expands into.
fn apply_member_attributes(
    members: &mut [DeclNode],
    additions: Vec<MemberAttributes>,
) -> Vec<Vec<AttributeNode>> {
    let mut inherited = vec![Vec::new(); members.len()];
    for MemberAttributes {
        member_index,
        attributes,
    } in additions
    {
        let Some(member) = members.get_mut(member_index) else {
            continue;
        };
        if let Decl::MacroExpansion(_) = member.value {
            inherited[member_index].extend(attributes);
            continue;
        }
        let mut all = member.value.attributes().to_vec();
        all.extend(attributes);
        member.value = member.value.with_attributes(all);
    }
    inherited
}

fn prepend_attributes(decl: DeclNode, inherited: &[AttributeNode]) -> DeclNode {
    if inherited.is_empty() {
        return decl;
    }
    let mut all = inherited.to_vec();
    all.extend_from_slice(decl.value.attributes());
    Spanned::new(decl.value.with_attributes(all), decl.span)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::macros::registry::build_plugin_registry;
    use crate::syntax::builder::{attribute, function, stored_var, type_decl};
    use crate::syntax::TypeKind;

    const S: Span = Span { start: 0, end: 0 };

    #[test]
    fn unknown_macro_is_a_contract_violation() {
        let registry = build_plugin_registry().unwrap();
        let expander = Expander::new(&registry);
        let file = SourceFile::new("t.swift", "");
        let node = Spanned::new(
            FreestandingMacro {
                name: "nope".into(),
                arguments: vec![],
            },
            S,
        );
        let err = expander
            .expand_freestanding(&node, MacroRole::Expression, &file)
            .unwrap_err();
        assert_eq!(err.macro_name, "nope");
    }

    #[test]
    fn attached_role_on_wrong_target_is_diagnosed() {
        let registry = build_plugin_registry().unwrap();
        let expander = Expander::new(&registry);
        let file = SourceFile::new("t.swift", "");
        let decl = function("f", vec![], false, None, Some(vec![]), S);
        let result = expander
            .expand_attached(&attribute("CustomCodable", None, S), &decl, &file)
            .unwrap();
        let diagnostic = result.diagnostic().unwrap();
        assert_eq!(diagnostic.code(), "MacroExpansion.roleNotSupported");
    }

    #[test]
    fn member_attributes_are_recorded_per_index() {
        let registry = build_plugin_registry().unwrap();
        let expander = Expander::new(&registry);
        let file = SourceFile::new("t.swift", "");
        let decl = type_decl(
            TypeKind::Class,
            "Model",
            vec![],
            vec![
                stored_var("a", Some(named_type("Int", S)), None, S),
                function("f", vec![], false, None, Some(vec![]), S),
            ],
            S,
        );
        let result = expander
            .expand_attached(&attribute("ObjCMembers", None, S), &decl, &file)
            .unwrap();
        let expansion = result.syntax().unwrap();
        let indices: Vec<usize> = expansion
            .member_attributes
            .iter()
            .map(|m| m.member_index)
            .collect();
        assert_eq!(indices, vec![0, 1]);
    }

    #[test]
    fn nesting_limit_is_enforced() {
        let registry = build_plugin_registry().unwrap();
        let expander = Expander::new(&registry);
        let file = SourceFile::new("t.swift", "");
        let mut walk = Walk {
            source: &file,
            depth: MAX_EXPANSION_DEPTH,
            diagnostics: Vec::new(),
            extensions: Vec::new(),
        };
        assert!(expander.nested(&mut walk, |_| Ok(())).is_err());
        walk.depth = 0;
        assert!(expander.nested(&mut walk, |_| Ok(())).is_ok());
        assert_eq!(walk.depth, 0);
    }
}
