//! Fatal errors abort a conversion; warnings never do.
use std::fmt;

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// A `$ref` pointer that does not resolve inside the root document.
    #[error("unresolved $ref '{reference}' at '{path}'")]
    Reference { reference: String, path: String },

    /// Two wire names collapse onto one identifier.
    #[error("naming collision in '{owner}': '{first}' and '{second}' both map to '{identifier}'")]
    NamingCollision {
        owner: String,
        identifier: String,
        first: String,
        second: String,
    },

    #[error("unsupported schema at '{path}': {detail}")]
    UnsupportedSchemaKind { path: String, detail: String },

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("invalid tool list: {0}")]
    InvalidToolList(String),
}

impl SchemaError {
    pub(crate) fn unsupported(path: &str, detail: impl Into<String>) -> Self {
        SchemaError::UnsupportedSchemaKind { path: path.to_string(), detail: detail.into() }
    }
}

pub type Result<T, E = SchemaError> = std::result::Result<T, E>;

/// Non-fatal events collected during a conversion or render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    AnonymousName { name: String },
    AdditionalProperties { path: String },
    UnresolvedCycle { name: String, reference: String },
    SkippedField { class: String, field: String },
    AnyType { context: String },
    NonIntegerConst { path: String, value: String },
    /// one name, two different bodies
    NameReused { name: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::AnonymousName { name } => write!(f, "Assigning anonymous name '{name}'"),
            Warning::AdditionalProperties { path } => {
                write!(f, "Schema at '{path}' uses 'additionalProperties: true'")
            }
            Warning::UnresolvedCycle { name, reference } => {
                write!(f, "Could not find BamlClassModel '{name}' to cache for $ref '{reference}'")
            }
            Warning::SkippedField { class, field } => {
                write!(f, "Property '{field}' in class '{class}' was marked as skip and is omitted")
            }
            Warning::AnyType { context } => {
                write!(f, "Type 'any' at '{context}' has no direct equivalent; mapping to string")
            }
            Warning::NonIntegerConst { path, value } => {
                write!(f, "Const {value} at '{path}' has no literal form; mapping to float")
            }
            Warning::NameReused { name } => {
                write!(f, "Name '{name}' is used by more than one distinct model")
            }
        }
    }
}

/// Push onto the sink and log it.
pub(crate) fn emit(sink: &mut Vec<Warning>, warning: Warning) {
    tracing::warn!("{warning}");
    sink.push(warning);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warning_messages() {
        let w = Warning::AnonymousName { name: "AnonymousEnum1".into() };
        assert_eq!(w.to_string(), "Assigning anonymous name 'AnonymousEnum1'");
        let w = Warning::UnresolvedCycle { name: "Node".into(), reference: "#".into() };
        assert_eq!(w.to_string(), "Could not find BamlClassModel 'Node' to cache for $ref '#'");
        let w = Warning::AdditionalProperties { path: "#/properties/metadata".into() };
        assert_eq!(w.to_string(), "Schema at '#/properties/metadata' uses 'additionalProperties: true'");
        let w = Warning::NonIntegerConst { path: "#/properties/ratio".into(), value: "1.5".into() };
        assert_eq!(w.to_string(), "Const 1.5 at '#/properties/ratio' has no literal form; mapping to float");
        let w = Warning::NameReused { name: "Node".into() };
        assert_eq!(w.to_string(), "Name 'Node' is used by more than one distinct model");
    }

    #[test]
    fn error_messages_name_the_location() {
        let e = SchemaError::Reference { reference: "#/$defs/Nope".into(), path: "#/properties/x".into() };
        assert_eq!(e.to_string(), "unresolved $ref '#/$defs/Nope' at '#/properties/x'");
    }
}
