//! Public macro surface.
//!
//! A [`MacroSignature`] is what the host sees before any rule runs: the
//! macro's name, its parameter and return shape, the roles it plays and the
//! names each role may introduce. Rendering one produces the declaration a
//! library would publish, e.g.
//!
//! ```text
//! @attached(member, names: named(CodingKeys))
//! public macro CustomCodable() = #externalMacro(module: "CustomCodableMacros", type: "CustomCodable")
//! ```

use std::fmt;

use crate::macros::types::MacroRole;

/// Module name the host resolves `#externalMacro` references against.
pub const MACRO_MODULE: &str = "CustomCodableMacros";

/// One declared parameter, e.g. `_ value: T` or `name: String`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroParameter {
    /// Argument label; `None` renders as `_`.
    pub label: Option<&'static str>,
    pub name: &'static str,
    pub ty: &'static str,
    pub default_value: Option<&'static str>,
}

impl MacroParameter {
    pub const fn unlabeled(name: &'static str, ty: &'static str) -> Self {
        Self {
            label: None,
            name,
            ty,
            default_value: None,
        }
    }

    pub const fn labeled(name: &'static str, ty: &'static str) -> Self {
        Self {
            label: Some(name),
            name,
            ty,
            default_value: None,
        }
    }

    pub const fn with_default(mut self, value: &'static str) -> Self {
        self.default_value = Some(value);
        self
    }
}

/// A name a role may introduce into the program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntroducedName {
    /// A fixed, statically known name.
    Named(&'static str),
    /// Overloads of the declaration the macro is attached to.
    Overloaded,
    /// Names only known after the rule runs.
    Arbitrary,
}

impl fmt::Display for IntroducedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntroducedName::Named(name) => write!(f, "named({})", name),
            IntroducedName::Overloaded => f.write_str("overloaded"),
            IntroducedName::Arbitrary => f.write_str("arbitrary"),
        }
    }
}

/// One role as declared on the macro.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleDeclaration {
    pub role: MacroRole,
    pub names: Vec<IntroducedName>,
    /// Protocols an extension role conforms the type to.
    pub conformances: Vec<&'static str>,
}

impl RoleDeclaration {
    pub fn new(role: MacroRole) -> Self {
        Self {
            role,
            names: Vec::new(),
            conformances: Vec::new(),
        }
    }

    pub fn names(mut self, names: impl IntoIterator<Item = IntroducedName>) -> Self {
        self.names.extend(names);
        self
    }

    pub fn conformances(mut self, protocols: &[&'static str]) -> Self {
        self.conformances.extend_from_slice(protocols);
        self
    }
}

impl fmt::Display for RoleDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let style = if self.role.is_freestanding() {
            "freestanding"
        } else {
            "attached"
        };
        write!(f, "@{}({}", style, self.role)?;
        if !self.conformances.is_empty() {
            write!(f, ", conformances: {}", self.conformances.join(", "))?;
        }
        if !self.names.is_empty() {
            let names: Vec<String> = self.names.iter().map(ToString::to_string).collect();
            write!(f, ", names: {}", names.join(", "))?;
        }
        f.write_str(")")
    }
}

/// Declared surface of a macro.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroSignature {
    pub name: &'static str,
    pub generics: Vec<&'static str>,
    pub parameters: Vec<MacroParameter>,
    pub result: Option<&'static str>,
    pub roles: Vec<RoleDeclaration>,
    /// Implementation type the host links the declaration to.
    pub type_name: &'static str,
}

impl MacroSignature {
    pub fn new(name: &'static str, type_name: &'static str) -> Self {
        Self {
            name,
            generics: Vec::new(),
            parameters: Vec::new(),
            result: None,
            roles: Vec::new(),
            type_name,
        }
    }

    pub fn generic(mut self, parameter: &'static str) -> Self {
        self.generics.push(parameter);
        self
    }

    pub fn parameter(mut self, parameter: MacroParameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn returns(mut self, result: &'static str) -> Self {
        self.result = Some(result);
        self
    }

    pub fn role(mut self, role: RoleDeclaration) -> Self {
        self.roles.push(role);
        self
    }

    pub fn required_arguments(&self) -> usize {
        self.parameters
            .iter()
            .filter(|p| p.default_value.is_none())
            .count()
    }

    /// Whether an invocation with `count` arguments fits the parameter list.
    pub fn accepts_argument_count(&self, count: usize) -> bool {
        (self.required_arguments()..=self.parameters.len()).contains(&count)
    }

    /// Human-readable expected argument count, e.g. `1` or `0...1`.
    pub fn expected_arguments(&self) -> String {
        let required = self.required_arguments();
        let total = self.parameters.len();
        if required == total {
            total.to_string()
        } else {
            format!("{}...{}", required, total)
        }
    }

    pub fn introduced_names(&self, role: MacroRole) -> &[IntroducedName] {
        self.roles
            .iter()
            .find(|r| r.role == role)
            .map(|r| r.names.as_slice())
            .unwrap_or(&[])
    }

    pub fn conformances(&self) -> &[&'static str] {
        self.roles
            .iter()
            .find(|r| r.role == MacroRole::Extension)
            .map(|r| r.conformances.as_slice())
            .unwrap_or(&[])
    }
}

impl fmt::Display for MacroSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for role in &self.roles {
            writeln!(f, "{}", role)?;
        }
        write!(f, "public macro {}", self.name)?;
        if !self.generics.is_empty() {
            write!(f, "<{}>", self.generics.join(", "))?;
        }
        f.write_str("(")?;
        for (i, parameter) in self.parameters.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match parameter.label {
                Some(label) if label == parameter.name => write!(f, "{}", label)?,
                Some(label) => write!(f, "{} {}", label, parameter.name)?,
                None => write!(f, "_ {}", parameter.name)?,
            }
            write!(f, ": {}", parameter.ty)?;
            if let Some(default) = parameter.default_value {
                write!(f, " = {}", default)?;
            }
        }
        f.write_str(")")?;
        if let Some(result) = self.result {
            write!(f, " -> {}", result)?;
        }
        write!(
            f,
            " = #externalMacro(module: \"{}\", type: \"{}\")",
            MACRO_MODULE, self.type_name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_freestanding_expression_declaration() {
        let signature = MacroSignature::new("stringify", "StringifyMacro")
            .generic("T")
            .parameter(MacroParameter::unlabeled("value", "T"))
            .returns("(T, String)")
            .role(RoleDeclaration::new(MacroRole::Expression));
        assert_eq!(
            signature.to_string(),
            "@freestanding(expression)\npublic macro stringify<T>(_ value: T) -> (T, String) = \
             #externalMacro(module: \"CustomCodableMacros\", type: \"StringifyMacro\")"
        );
    }

    #[test]
    fn renders_each_attached_role_on_its_own_line() {
        let signature = MacroSignature::new("DictionaryStorage", "DictionaryStorageMacro")
            .role(
                RoleDeclaration::new(MacroRole::Member)
                    .names([IntroducedName::Named("dictionary")]),
            )
            .role(RoleDeclaration::new(MacroRole::MemberAttribute));
        let text = signature.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "@attached(member, names: named(dictionary))");
        assert_eq!(lines[1], "@attached(memberAttribute)");
        assert!(lines[2].starts_with("public macro DictionaryStorage()"));
    }

    #[test]
    fn defaulted_parameters_widen_accepted_arity() {
        let signature = MacroSignature::new("DictionaryStorageProperty", "X")
            .parameter(MacroParameter::labeled("key", "String?").with_default("nil"));
        assert!(signature.accepts_argument_count(0));
        assert!(signature.accepts_argument_count(1));
        assert!(!signature.accepts_argument_count(2));
        assert_eq!(signature.expected_arguments(), "0...1");
    }
}
