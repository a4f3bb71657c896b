//! Type annotation nodes.

use serde::{Deserialize, Serialize};

use super::Spanned;

pub type TypeNode = Spanned<TypeSyntax>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeSyntax {
    /// A plain named type such as `String` or `Array<Int>`.
    Identifier {
        name: String,
        #[serde(default)]
        generic_arguments: Vec<TypeNode>,
    },
    Optional(Box<TypeNode>),
    Array(Box<TypeNode>),
    Dictionary {
        key: Box<TypeNode>,
        value: Box<TypeNode>,
    },
    Tuple(Vec<TypeNode>),
    Function {
        parameters: Vec<TypeNode>,
        #[serde(default)]
        is_async: bool,
        result: Box<TypeNode>,
    },
    /// A type preceded by type attributes, e.g. `@escaping @Sendable (T) -> Void`.
    Attributed {
        attributes: Vec<String>,
        base: Box<TypeNode>,
    },
}

impl TypeSyntax {
    pub fn named(name: impl Into<String>) -> Self {
        TypeSyntax::Identifier {
            name: name.into(),
            generic_arguments: Vec::new(),
        }
    }
}
