// Strongly-typed IR for codegen. No serde_json::Value here.
//
// Built once per conversion by the walker, read-only afterwards. Types point at
// classes/enums by name only, so forward and circular references are fine.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseKind {
    String,
    Int,
    Float,
    Bool,
    Null,
    Any,
    LiteralString,
    LiteralInt,
    LiteralBool,
    List,
    Union,
    ClassRef,
    EnumRef,
}

/// The payload of a [`TypeDescriptor`]. Each kind carries exactly the data it
/// needs, so "one payload per kind" cannot be violated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "of", rename_all = "snake_case")]
pub enum TypeKind {
    String,
    Int,
    Float,
    Bool,
    Null,
    Any,
    LiteralString(String),
    LiteralInt(i64),
    LiteralBool(bool),
    List(Box<TypeDescriptor>),
    Union(Vec<TypeDescriptor>),
    ClassRef(String),
    EnumRef(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LiteralValue<'a> {
    String(&'a str),
    Int(i64),
    Bool(bool),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeDescriptor {
    #[serde(flatten)]
    pub kind: TypeKind,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_optional: bool,
}

impl TypeDescriptor {
    pub fn new(kind: TypeKind) -> Self { Self { kind, is_optional: false } }
    pub fn string() -> Self { Self::new(TypeKind::String) }
    pub fn int() -> Self { Self::new(TypeKind::Int) }
    pub fn float() -> Self { Self::new(TypeKind::Float) }
    pub fn bool() -> Self { Self::new(TypeKind::Bool) }
    pub fn null() -> Self { Self::new(TypeKind::Null) }
    pub fn any() -> Self { Self::new(TypeKind::Any) }
    pub fn list(item: TypeDescriptor) -> Self { Self::new(TypeKind::List(Box::new(item))) }
    pub fn union(members: Vec<TypeDescriptor>) -> Self { Self::new(TypeKind::Union(members)) }
    pub fn class_ref(name: impl Into<String>) -> Self { Self::new(TypeKind::ClassRef(name.into())) }
    pub fn enum_ref(name: impl Into<String>) -> Self { Self::new(TypeKind::EnumRef(name.into())) }

    pub fn optional(mut self) -> Self {
        self.is_optional = true;
        self
    }

    pub fn with_optional(mut self, optional: bool) -> Self {
        self.is_optional = self.is_optional || optional;
        self
    }

    pub fn base_kind(&self) -> BaseKind {
        match &self.kind {
            TypeKind::String => BaseKind::String,
            TypeKind::Int => BaseKind::Int,
            TypeKind::Float => BaseKind::Float,
            TypeKind::Bool => BaseKind::Bool,
            TypeKind::Null => BaseKind::Null,
            TypeKind::Any => BaseKind::Any,
            TypeKind::LiteralString(_) => BaseKind::LiteralString,
            TypeKind::LiteralInt(_) => BaseKind::LiteralInt,
            TypeKind::LiteralBool(_) => BaseKind::LiteralBool,
            TypeKind::List(_) => BaseKind::List,
            TypeKind::Union(_) => BaseKind::Union,
            TypeKind::ClassRef(_) => BaseKind::ClassRef,
            TypeKind::EnumRef(_) => BaseKind::EnumRef,
        }
    }

    /// `null` and `is_optional` both mean "may be absent".
    pub fn may_be_absent(&self) -> bool {
        self.is_optional || matches!(self.kind, TypeKind::Null)
    }

    pub fn item_type(&self) -> Option<&TypeDescriptor> {
        match &self.kind {
            TypeKind::List(item) => Some(item.as_ref()),
            _ => None,
        }
    }

    pub fn union_members(&self) -> Option<&[TypeDescriptor]> {
        match &self.kind {
            TypeKind::Union(members) => Some(members.as_slice()),
            _ => None,
        }
    }

    pub fn literal_value(&self) -> Option<LiteralValue<'_>> {
        match &self.kind {
            TypeKind::LiteralString(s) => Some(LiteralValue::String(s)),
            TypeKind::LiteralInt(i) => Some(LiteralValue::Int(*i)),
            TypeKind::LiteralBool(b) => Some(LiteralValue::Bool(*b)),
            _ => None,
        }
    }

    pub fn referenced_name(&self) -> Option<&str> {
        match &self.kind {
            TypeKind::ClassRef(name) | TypeKind::EnumRef(name) => Some(name.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldModel {
    pub name: String,
    pub type_info: TypeDescriptor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub skip: bool,
}

impl FieldModel {
    pub fn new(name: impl Into<String>, type_info: TypeDescriptor) -> Self {
        Self { name: name.into(), type_info, description: None, alias: None, skip: false }
    }
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }
    pub fn with_alias(mut self, alias: Option<String>) -> Self {
        self.alias = alias;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassModel {
    pub name: String,
    pub properties: Vec<FieldModel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl ClassModel {
    pub fn new(name: impl Into<String>, properties: Vec<FieldModel>) -> Self {
        Self { name: name.into(), properties, description: None, alias: None }
    }
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }
    pub fn with_alias(mut self, alias: Option<String>) -> Self {
        self.alias = alias;
        self
    }
    pub fn field(&self, name: &str) -> Option<&FieldModel> {
        self.properties.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumValueModel {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub skip: bool,
}

impl EnumValueModel {
    pub fn new(name: impl Into<String>, alias: Option<String>) -> Self {
        Self { name: name.into(), alias, description: None, skip: false }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumModel {
    pub name: String,
    pub values: Vec<EnumValueModel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl EnumModel {
    pub fn new(name: impl Into<String>, values: Vec<EnumValueModel>) -> Self {
        Self { name: name.into(), values, description: None, alias: None }
    }
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum Model {
    Class(ClassModel),
    Enum(EnumModel),
}

impl Model {
    pub fn name(&self) -> &str {
        match self {
            Model::Class(c) => c.name.as_str(),
            Model::Enum(e) => e.name.as_str(),
        }
    }
    pub fn as_class(&self) -> Option<&ClassModel> {
        match self {
            Model::Class(c) => Some(c),
            Model::Enum(_) => None,
        }
    }
    pub fn as_enum(&self) -> Option<&EnumModel> {
        match self {
            Model::Enum(e) => Some(e),
            Model::Class(_) => None,
        }
    }
}

impl From<ClassModel> for Model {
    fn from(c: ClassModel) -> Self { Model::Class(c) }
}

impl From<EnumModel> for Model {
    fn from(e: EnumModel) -> Self { Model::Enum(e) }
}

/// Keep the first model per (kind, name). The walker emits duplicates on
/// purpose; callers that need one model per name use this.
pub fn dedupe_models(models: Vec<Model>) -> Vec<Model> {
    let mut seen = std::collections::HashSet::<(bool, String)>::new();
    models
        .into_iter()
        .filter(|m| seen.insert((matches!(m, Model::Class(_)), m.name().to_string())))
        .collect()
}
