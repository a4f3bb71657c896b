//! Fundamental types of the macro system.
//!
//! This module has no dependencies on other macro modules apart from the
//! expansion context and the public surface, making it the foundation layer.
//!
//! ## Ownership
//!
//! - Rule functions are plain function pointers, cheaply copyable.
//! - `MacroDef` owns its signature and the rule for each role it plays.
//! - Expansion results own freshly built nodes; nothing borrows from input.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{ExpansionError, MacroDiagnostic};
use crate::macros::context::MacroExpansionContext;
use crate::macros::signature::MacroSignature;
use crate::syntax::{AccessorNode, AttributeNode, DeclNode, ExprNode, MacroInvocation, TypeNode};

/// Result type every rule returns.
pub type RuleResult<T> = Result<T, ExpansionError>;

/// Where and how a macro attaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MacroRole {
    Expression,
    Declaration,
    Member,
    MemberAttribute,
    Accessor,
    Peer,
    Extension,
}

impl MacroRole {
    /// Role keyword as written in `@freestanding(...)` / `@attached(...)`.
    pub fn as_str(&self) -> &'static str {
        match self {
            MacroRole::Expression => "expression",
            MacroRole::Declaration => "declaration",
            MacroRole::Member => "member",
            MacroRole::MemberAttribute => "memberAttribute",
            MacroRole::Accessor => "accessor",
            MacroRole::Peer => "peer",
            MacroRole::Extension => "extension",
        }
    }

    /// Freestanding roles are invoked with `#name`, the rest with `@Name`.
    pub fn is_freestanding(&self) -> bool {
        matches!(self, MacroRole::Expression | MacroRole::Declaration)
    }

    /// Whether a macro in this role may attach to `decl`.
    pub fn can_attach_to(&self, decl: &DeclNode) -> bool {
        use crate::syntax::Decl;
        match self {
            MacroRole::Expression | MacroRole::Declaration => false,
            MacroRole::Member | MacroRole::MemberAttribute => decl.value.is_group(),
            MacroRole::Extension => matches!(decl.value, Decl::Type(_)),
            MacroRole::Accessor => matches!(decl.value, Decl::Variable(_)),
            MacroRole::Peer => !matches!(decl.value, Decl::MacroExpansion(_)),
        }
    }
}

impl fmt::Display for MacroRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// RULE FUNCTION TYPES
// ============================================================================

/// `#name(args)` at expression position → replacement expression.
pub type ExpressionFn = fn(&MacroInvocation, &mut MacroExpansionContext) -> RuleResult<ExprNode>;

/// `#name(args)` at declaration position → new declarations.
pub type DeclarationFn =
    fn(&MacroInvocation, &mut MacroExpansionContext) -> RuleResult<Vec<DeclNode>>;

/// `@Name` on a type → new members.
pub type MemberFn =
    fn(&AttributeNode, &DeclNode, &mut MacroExpansionContext) -> RuleResult<Vec<DeclNode>>;

/// `@Name` on a type → attributes for one existing member (the last argument).
pub type MemberAttributeFn = fn(
    &AttributeNode,
    &DeclNode,
    &DeclNode,
    &mut MacroExpansionContext,
) -> RuleResult<Vec<AttributeNode>>;

/// `@Name` on a stored property → accessors.
pub type AccessorFn =
    fn(&AttributeNode, &DeclNode, &mut MacroExpansionContext) -> RuleResult<Vec<AccessorNode>>;

/// `@Name` on any declaration → sibling declarations.
pub type PeerFn =
    fn(&AttributeNode, &DeclNode, &mut MacroExpansionContext) -> RuleResult<Vec<DeclNode>>;

/// `@Name` on a type → extensions of `type` for the missing `protocols`.
pub type ExtensionFn = fn(
    &AttributeNode,
    &DeclNode,
    &TypeNode,
    &[TypeNode],
    &mut MacroExpansionContext,
) -> RuleResult<Vec<DeclNode>>;

/// The rule a macro runs in one of its roles.
#[derive(Clone, Copy)]
pub enum MacroFn {
    Expression(ExpressionFn),
    Declaration(DeclarationFn),
    Member(MemberFn),
    MemberAttribute(MemberAttributeFn),
    Accessor(AccessorFn),
    Peer(PeerFn),
    Extension(ExtensionFn),
}

impl fmt::Debug for MacroFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MacroFn::{:?}", self.role())
    }
}

impl MacroFn {
    pub fn role(&self) -> MacroRole {
        match self {
            MacroFn::Expression(_) => MacroRole::Expression,
            MacroFn::Declaration(_) => MacroRole::Declaration,
            MacroFn::Member(_) => MacroRole::Member,
            MacroFn::MemberAttribute(_) => MacroRole::MemberAttribute,
            MacroFn::Accessor(_) => MacroRole::Accessor,
            MacroFn::Peer(_) => MacroRole::Peer,
            MacroFn::Extension(_) => MacroRole::Extension,
        }
    }
}

/// A registered macro: its public declaration and its rule per role.
///
/// Rules are listed in the order the expander runs them. A macro that plays
/// both the member and member-attribute roles lists `Member` first so the
/// storage it adds exists before attributes referencing it are applied.
#[derive(Debug, Clone)]
pub struct MacroDef {
    pub signature: MacroSignature,
    pub rules: Vec<MacroFn>,
}

impl MacroDef {
    pub fn new(signature: MacroSignature, rules: Vec<MacroFn>) -> Self {
        Self { signature, rules }
    }

    pub fn name(&self) -> &'static str {
        self.signature.name
    }

    pub fn roles(&self) -> impl Iterator<Item = MacroRole> + '_ {
        self.rules.iter().map(MacroFn::role)
    }

    pub fn rule_for(&self, role: MacroRole) -> Option<MacroFn> {
        self.rules.iter().copied().find(|rule| rule.role() == role)
    }

    /// True when every role is attached (invoked as `@Name`).
    pub fn is_attached(&self) -> bool {
        self.roles().all(|role| !role.is_freestanding())
    }
}

// ============================================================================
// EXPANSION RESULTS
// ============================================================================

/// Outcome of one invocation site: new syntax or a diagnostic, never both.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ExpansionResult<T> {
    Syntax(T),
    Diagnostic(MacroDiagnostic),
}

impl<T> ExpansionResult<T> {
    pub fn syntax(&self) -> Option<&T> {
        match self {
            ExpansionResult::Syntax(syntax) => Some(syntax),
            ExpansionResult::Diagnostic(_) => None,
        }
    }

    pub fn diagnostic(&self) -> Option<&MacroDiagnostic> {
        match self {
            ExpansionResult::Syntax(_) => None,
            ExpansionResult::Diagnostic(diagnostic) => Some(diagnostic),
        }
    }
}

/// Nodes produced by a freestanding macro.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FreestandingExpansion {
    Expression(ExprNode),
    Declarations(Vec<DeclNode>),
}

/// Attributes a member-attribute rule adds to the member at `member_index`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberAttributes {
    pub member_index: usize,
    pub attributes: Vec<AttributeNode>,
}

/// Everything one attached macro produced across all of its roles.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AttachedExpansion {
    pub members: Vec<DeclNode>,
    pub member_attributes: Vec<MemberAttributes>,
    pub accessors: Vec<AccessorNode>,
    pub peers: Vec<DeclNode>,
    pub extensions: Vec<DeclNode>,
}

impl AttachedExpansion {
    /// Moves everything `other` produced into `self`, keeping order.
    pub fn append(&mut self, mut other: AttachedExpansion) {
        self.members.append(&mut other.members);
        self.member_attributes.append(&mut other.member_attributes);
        self.accessors.append(&mut other.accessors);
        self.peers.append(&mut other.peers);
        self.extensions.append(&mut other.extensions);
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
            && self.member_attributes.iter().all(|m| m.attributes.is_empty())
            && self.accessors.is_empty()
            && self.peers.is_empty()
            && self.extensions.is_empty()
    }
}
