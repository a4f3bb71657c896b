//! JSON expansion requests read by `custom-codable expand`.
//!
//! A request carries the source text the host parsed and one syntax tree
//! taken from it:
//!
//! ```json
//! {
//!   "source": "#stringify(a + b)",
//!   "item": { "kind": "freestanding", "role": "expression", "invocation": { ... } }
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{ContractViolation, MacroDiagnostic};
use crate::macros::{Expanded, Expander, ExpansionResult, FreestandingExpansion, MacroRole};
use crate::syntax::{DeclNode, MacroInvocation, SourceFile};

#[derive(Debug, Clone, Deserialize)]
pub struct ExpansionRequestFile {
    pub source: String,
    /// File name shown in diagnostics. Defaults to the request's own path.
    #[serde(default)]
    pub name: Option<String>,
    pub item: RequestItem,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RequestItem {
    Freestanding {
        invocation: MacroInvocation,
        role: MacroRole,
    },
    Declaration {
        declaration: DeclNode,
    },
}

/// What one request expanded to.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RequestOutcome {
    Freestanding {
        result: ExpansionResult<FreestandingExpansion>,
    },
    Declaration {
        expanded: Expanded,
    },
}

impl ExpansionRequestFile {
    pub fn source_file(&self, path: &Path) -> SourceFile {
        let name = self
            .name
            .clone()
            .unwrap_or_else(|| path.display().to_string());
        SourceFile::new(name, self.source.as_str())
    }

    pub fn expand(
        &self,
        expander: &Expander<'_>,
        source: &SourceFile,
    ) -> Result<RequestOutcome, ContractViolation> {
        match &self.item {
            RequestItem::Freestanding { invocation, role } => Ok(RequestOutcome::Freestanding {
                result: expander.expand_freestanding(invocation, *role, source)?,
            }),
            RequestItem::Declaration { declaration } => Ok(RequestOutcome::Declaration {
                expanded: expander.expand_declaration(declaration, source)?,
            }),
        }
    }
}

impl RequestOutcome {
    /// Source text of the produced syntax. `None` when a freestanding site
    /// failed and produced nothing.
    pub fn rendered(&self) -> Option<String> {
        match self {
            RequestOutcome::Freestanding { result } => match result.syntax()? {
                FreestandingExpansion::Expression(expr) => Some(expr.to_string()),
                FreestandingExpansion::Declarations(decls) => Some(
                    decls
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join("\n\n"),
                ),
            },
            RequestOutcome::Declaration { expanded } => Some(expanded.to_string()),
        }
    }

    pub fn diagnostics(&self) -> Vec<&MacroDiagnostic> {
        match self {
            RequestOutcome::Freestanding { result } => result.diagnostic().into_iter().collect(),
            RequestOutcome::Declaration { expanded } => expanded.diagnostics.iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::macros::plugin_registry;

    const STRINGIFY: &str = r##"{
        "source": "#stringify(x)",
        "name": "main.swift",
        "item": {
            "kind": "freestanding",
            "role": "expression",
            "invocation": {
                "value": {
                    "name": "stringify",
                    "arguments": [
                        { "expr": { "value": { "Identifier": "x" }, "span": { "start": 11, "end": 12 } } }
                    ]
                },
                "span": { "start": 0, "end": 13 }
            }
        }
    }"##;

    #[test]
    fn freestanding_request_expands_and_renders() {
        let request: ExpansionRequestFile = serde_json::from_str(STRINGIFY).unwrap();
        let source = request.source_file(Path::new("request.json"));
        assert_eq!(source.name(), "main.swift");

        let expander = Expander::new(plugin_registry().unwrap());
        let outcome = request.expand(&expander, &source).unwrap();
        assert_eq!(outcome.rendered().as_deref(), Some(r#"(x, "x")"#));
        assert!(outcome.diagnostics().is_empty());
    }

    #[test]
    fn declaration_request_uses_path_when_unnamed() {
        let json = r#"{
            "source": "struct A {}",
            "item": {
                "kind": "declaration",
                "declaration": {
                    "value": { "Type": { "kind": "Struct", "name": "A" } },
                    "span": { "start": 0, "end": 11 }
                }
            }
        }"#;
        let request: ExpansionRequestFile = serde_json::from_str(json).unwrap();
        let source = request.source_file(Path::new("a.json"));
        assert_eq!(source.name(), "a.json");

        let expander = Expander::new(plugin_registry().unwrap());
        let outcome = request.expand(&expander, &source).unwrap();
        assert_eq!(outcome.rendered().as_deref(), Some("struct A {}"));
    }
}
