//! Declaration, attribute, accessor and statement nodes.

use serde::{Deserialize, Serialize};

use super::expr::{Argument, ExprNode, FreestandingMacro};
use super::types::TypeNode;
use super::Spanned;

pub type DeclNode = Spanned<Decl>;
pub type AttributeNode = Spanned<Attribute>;
pub type AccessorNode = Spanned<AccessorDecl>;
pub type PatternNode = Spanned<Pattern>;

// ============================================================================
// ATTRIBUTES AND MODIFIERS
// ============================================================================

/// `@name` or `@name(arguments)`.
///
/// `arguments` is `None` when no parentheses were written, which is distinct
/// from an empty argument list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    #[serde(default)]
    pub arguments: Option<Vec<Argument>>,
}

impl Attribute {
    pub fn argument_count(&self) -> usize {
        self.arguments.as_ref().map_or(0, Vec::len)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Public,
    Internal,
    Fileprivate,
    Private,
    Open,
    Static,
    Class,
    Final,
    Lazy,
    Mutating,
    Override,
}

impl Modifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Modifier::Public => "public",
            Modifier::Internal => "internal",
            Modifier::Fileprivate => "fileprivate",
            Modifier::Private => "private",
            Modifier::Open => "open",
            Modifier::Static => "static",
            Modifier::Class => "class",
            Modifier::Final => "final",
            Modifier::Lazy => "lazy",
            Modifier::Mutating => "mutating",
            Modifier::Override => "override",
        }
    }
}

// ============================================================================
// DECLARATIONS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Decl {
    Type(TypeDecl),
    Extension(ExtensionDecl),
    Variable(VariableDecl),
    Function(FunctionDecl),
    EnumCase(EnumCaseDecl),
    /// A freestanding macro at declaration position.
    MacroExpansion(FreestandingMacro),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeKind {
    Struct,
    Class,
    Enum,
    Actor,
    Protocol,
}

impl TypeKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            TypeKind::Struct => "struct",
            TypeKind::Class => "class",
            TypeKind::Enum => "enum",
            TypeKind::Actor => "actor",
            TypeKind::Protocol => "protocol",
        }
    }
}

/// A nominal type declaration with a member block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDecl {
    #[serde(default)]
    pub attributes: Vec<AttributeNode>,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    pub kind: TypeKind,
    pub name: String,
    #[serde(default)]
    pub inheritance: Vec<TypeNode>,
    #[serde(default)]
    pub members: Vec<DeclNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtensionDecl {
    #[serde(default)]
    pub attributes: Vec<AttributeNode>,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    pub extended_type: TypeNode,
    #[serde(default)]
    pub inheritance: Vec<TypeNode>,
    #[serde(default)]
    pub members: Vec<DeclNode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingKeyword {
    Let,
    Var,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDecl {
    #[serde(default)]
    pub attributes: Vec<AttributeNode>,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    pub keyword: BindingKeyword,
    pub bindings: Vec<PatternBinding>,
}

/// One `pattern: Type = initializer { accessors }` entry of a variable declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternBinding {
    pub pattern: PatternNode,
    #[serde(default)]
    pub type_annotation: Option<TypeNode>,
    #[serde(default)]
    pub initializer: Option<ExprNode>,
    #[serde(default)]
    pub accessors: Option<AccessorBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Pattern {
    Identifier(String),
    Wildcard,
    Tuple(Vec<PatternNode>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AccessorBlock {
    /// `{ statements }`, an implicit getter.
    Getter(Vec<Stmt>),
    Accessors(Vec<AccessorNode>),
}

impl AccessorBlock {
    /// True when the block makes the property computed rather than observed.
    pub fn is_computed(&self) -> bool {
        match self {
            AccessorBlock::Getter(_) => true,
            AccessorBlock::Accessors(accessors) => accessors
                .iter()
                .any(|a| matches!(a.value.kind, AccessorKind::Get | AccessorKind::Set)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessorDecl {
    pub kind: AccessorKind,
    #[serde(default)]
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AccessorKind {
    Get,
    Set,
    WillSet,
    DidSet,
}

impl AccessorKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            AccessorKind::Get => "get",
            AccessorKind::Set => "set",
            AccessorKind::WillSet => "willSet",
            AccessorKind::DidSet => "didSet",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDecl {
    #[serde(default)]
    pub attributes: Vec<AttributeNode>,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub is_async: bool,
    #[serde(default)]
    pub return_type: Option<TypeNode>,
    #[serde(default)]
    pub body: Option<Vec<Stmt>>,
}

/// `first second: Type = default`. `second` is absent when one name serves
/// as both argument label and parameter name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub first_name: String,
    #[serde(default)]
    pub second_name: Option<String>,
    pub ty: TypeNode,
    #[serde(default)]
    pub default_value: Option<ExprNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumCaseDecl {
    #[serde(default)]
    pub attributes: Vec<AttributeNode>,
    pub elements: Vec<EnumCaseElement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumCaseElement {
    pub name: String,
    #[serde(default)]
    pub raw_value: Option<ExprNode>,
}

// ============================================================================
// STATEMENTS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    Expr(ExprNode),
    Decl(DeclNode),
    Return(Option<ExprNode>),
}

// ============================================================================
// ACCESSORS OVER DECLARATIONS
// ============================================================================

impl Decl {
    /// Attributes written on this declaration.
    pub fn attributes(&self) -> &[AttributeNode] {
        match self {
            Decl::Type(d) => &d.attributes,
            Decl::Extension(d) => &d.attributes,
            Decl::Variable(d) => &d.attributes,
            Decl::Function(d) => &d.attributes,
            Decl::EnumCase(d) => &d.attributes,
            Decl::MacroExpansion(_) => &[],
        }
    }

    /// Returns a copy of this declaration carrying `attributes` instead.
    pub fn with_attributes(&self, attributes: Vec<AttributeNode>) -> Decl {
        let mut decl = self.clone();
        match &mut decl {
            Decl::Type(d) => d.attributes = attributes,
            Decl::Extension(d) => d.attributes = attributes,
            Decl::Variable(d) => d.attributes = attributes,
            Decl::Function(d) => d.attributes = attributes,
            Decl::EnumCase(d) => d.attributes = attributes,
            Decl::MacroExpansion(_) => {}
        }
        decl
    }

    /// Member block of a type or extension.
    pub fn members(&self) -> Option<&[DeclNode]> {
        match self {
            Decl::Type(d) => Some(&d.members),
            Decl::Extension(d) => Some(&d.members),
            _ => None,
        }
    }

    pub fn members_mut(&mut self) -> Option<&mut Vec<DeclNode>> {
        match self {
            Decl::Type(d) => Some(&mut d.members),
            Decl::Extension(d) => Some(&mut d.members),
            _ => None,
        }
    }

    /// True for declarations that own a member block.
    pub fn is_group(&self) -> bool {
        self.members().is_some()
    }

    /// Short description used in logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Decl::Type(d) => d.kind.keyword(),
            Decl::Extension(_) => "extension",
            Decl::Variable(_) => "variable",
            Decl::Function(_) => "function",
            Decl::EnumCase(_) => "enum case",
            Decl::MacroExpansion(_) => "macro expansion",
        }
    }
}
