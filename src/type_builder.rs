//! IR → calls against a type-construction capability.
//!
//! Traversal and construction are split: [`plan`] turns the models into a flat
//! list of [`BuildCommand`]s without touching any builder, [`apply`] replays
//! them against anything implementing [`TypeBuilder`]. Class and enum
//! references become [`FieldType::Named`], resolved by name on the builder's
//! side, so construction order does not matter.
use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{self, Warning};
use crate::ir::{ClassModel, EnumModel, Model, TypeDescriptor, TypeKind};

/// Type expression understood by a builder.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "of", rename_all = "snake_case")]
pub enum FieldType {
    String,
    Int,
    Float,
    Bool,
    LiteralString(String),
    LiteralInt(i64),
    LiteralBool(bool),
    List(Box<FieldType>),
    Union(Vec<FieldType>),
    Named(String),
    Optional(Box<FieldType>),
}

impl FieldType {
    pub fn optional(self) -> Self {
        match self {
            already @ FieldType::Optional(_) => already,
            other => FieldType::Optional(Box::new(other)),
        }
    }

    /// Every `Named` target inside this expression.
    pub fn named_targets(&self) -> Vec<&str> {
        match self {
            FieldType::Named(name) => vec![name.as_str()],
            FieldType::List(inner) | FieldType::Optional(inner) => inner.named_targets(),
            FieldType::Union(members) => members.iter().flat_map(FieldType::named_targets).collect(),
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum BuildCommand {
    AddClass { name: String },
    ClassDescription { class: String, text: String },
    ClassAlias { class: String, alias: String },
    AddProperty { class: String, name: String, ty: FieldType },
    PropertyDescription { class: String, property: String, text: String },
    PropertyAlias { class: String, property: String, alias: String },
    AddEnum { name: String },
    EnumDescription { name: String, text: String },
    EnumAlias { name: String, alias: String },
    AddValue { enum_name: String, value: String },
    ValueDescription { enum_name: String, value: String, text: String },
    ValueAlias { enum_name: String, value: String, alias: String },
    ValueSkip { enum_name: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Plan {
    pub commands: Vec<BuildCommand>,
    pub warnings: Vec<Warning>,
}

// ------------------------------ Planning ---------------------------------- //

pub fn plan(models: &[Model]) -> Plan {
    let mut out = Plan::default();
    for model in models {
        match model {
            Model::Class(class) => plan_class(class, &mut out),
            Model::Enum(enum_) => plan_enum(enum_, &mut out),
        }
    }
    out
}

fn plan_class(class: &ClassModel, out: &mut Plan) {
    let name = &class.name;
    out.commands.push(BuildCommand::AddClass { name: name.clone() });
    if let Some(text) = &class.description {
        out.commands.push(BuildCommand::ClassDescription { class: name.clone(), text: text.clone() });
    }
    if let Some(alias) = &class.alias {
        out.commands.push(BuildCommand::ClassAlias { class: name.clone(), alias: alias.clone() });
    }
    for prop in &class.properties {
        if prop.skip {
            error::emit(&mut out.warnings, Warning::SkippedField { class: name.clone(), field: prop.name.clone() });
            continue;
        }
        let context = format!("{name}.{}", prop.name);
        let ty = field_type(&prop.type_info, &context, &mut out.warnings);
        out.commands.push(BuildCommand::AddProperty { class: name.clone(), name: prop.name.clone(), ty });
        if let Some(text) = &prop.description {
            out.commands.push(BuildCommand::PropertyDescription {
                class: name.clone(),
                property: prop.name.clone(),
                text: text.clone(),
            });
        }
        if let Some(alias) = &prop.alias {
            out.commands.push(BuildCommand::PropertyAlias {
                class: name.clone(),
                property: prop.name.clone(),
                alias: alias.clone(),
            });
        }
    }
}

fn plan_enum(enum_: &EnumModel, out: &mut Plan) {
    let name = &enum_.name;
    out.commands.push(BuildCommand::AddEnum { name: name.clone() });
    if let Some(text) = &enum_.description {
        out.commands.push(BuildCommand::EnumDescription { name: name.clone(), text: text.clone() });
    }
    if let Some(alias) = &enum_.alias {
        out.commands.push(BuildCommand::EnumAlias { name: name.clone(), alias: alias.clone() });
    }
    for value in &enum_.values {
        out.commands.push(BuildCommand::AddValue { enum_name: name.clone(), value: value.name.clone() });
        if value.skip {
            out.commands.push(BuildCommand::ValueSkip { enum_name: name.clone(), value: value.name.clone() });
        }
        if let Some(text) = &value.description {
            out.commands.push(BuildCommand::ValueDescription {
                enum_name: name.clone(),
                value: value.name.clone(),
                text: text.clone(),
            });
        }
        if let Some(alias) = &value.alias {
            out.commands.push(BuildCommand::ValueAlias {
                enum_name: name.clone(),
                value: value.name.clone(),
                alias: alias.clone(),
            });
        }
    }
}

/// `null` has no standalone builder type: it becomes an optional string.
pub fn field_type(ty: &TypeDescriptor, context: &str, warnings: &mut Vec<Warning>) -> FieldType {
    let base = match &ty.kind {
        TypeKind::String => FieldType::String,
        TypeKind::Int => FieldType::Int,
        TypeKind::Float => FieldType::Float,
        TypeKind::Bool => FieldType::Bool,
        TypeKind::Null => return FieldType::String.optional(),
        TypeKind::Any => {
            error::emit(warnings, Warning::AnyType { context: context.to_string() });
            FieldType::String
        }
        TypeKind::LiteralString(s) => FieldType::LiteralString(s.clone()),
        TypeKind::LiteralInt(i) => FieldType::LiteralInt(*i),
        TypeKind::LiteralBool(b) => FieldType::LiteralBool(*b),
        TypeKind::List(item) => FieldType::List(Box::new(field_type(item, context, warnings))),
        TypeKind::Union(members) => {
            FieldType::Union(members.iter().map(|m| field_type(m, context, warnings)).collect())
        }
        TypeKind::ClassRef(name) | TypeKind::EnumRef(name) => FieldType::Named(name.clone()),
    };
    if ty.is_optional { base.optional() } else { base }
}

// ------------------------------ Capability -------------------------------- //

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum BuildError {
    #[error("no class named '{0}'")]
    UnknownClass(String),
    #[error("no enum named '{0}'")]
    UnknownEnum(String),
    #[error("class '{class}' has no property '{property}'")]
    UnknownProperty { class: String, property: String },
    #[error("enum '{enum_name}' has no value '{value}'")]
    UnknownValue { enum_name: String, value: String },
    #[error("'{owner}' refers to undefined type '{target}'")]
    DanglingReference { owner: String, target: String },
}

/// The external type-construction capability. Implementations look types up
/// by name, so a `Named` type may precede its definition.
pub trait TypeBuilder {
    type Error: From<BuildError>;

    fn add_class(&mut self, name: &str) -> Result<(), Self::Error>;
    fn class_description(&mut self, class: &str, text: &str) -> Result<(), Self::Error>;
    fn class_alias(&mut self, class: &str, alias: &str) -> Result<(), Self::Error>;
    fn add_property(&mut self, class: &str, name: &str, ty: &FieldType) -> Result<(), Self::Error>;
    fn property_description(&mut self, class: &str, property: &str, text: &str) -> Result<(), Self::Error>;
    fn property_alias(&mut self, class: &str, property: &str, alias: &str) -> Result<(), Self::Error>;

    fn add_enum(&mut self, name: &str) -> Result<(), Self::Error>;
    fn enum_description(&mut self, name: &str, text: &str) -> Result<(), Self::Error>;
    fn enum_alias(&mut self, name: &str, alias: &str) -> Result<(), Self::Error>;
    fn add_value(&mut self, enum_name: &str, value: &str) -> Result<(), Self::Error>;
    fn value_description(&mut self, enum_name: &str, value: &str, text: &str) -> Result<(), Self::Error>;
    fn value_alias(&mut self, enum_name: &str, value: &str, alias: &str) -> Result<(), Self::Error>;
    fn value_skip(&mut self, enum_name: &str, value: &str) -> Result<(), Self::Error>;
}

pub fn apply<B: TypeBuilder>(commands: &[BuildCommand], builder: &mut B) -> Result<(), B::Error> {
    for command in commands {
        match command {
            BuildCommand::AddClass { name } => builder.add_class(name)?,
            BuildCommand::ClassDescription { class, text } => builder.class_description(class, text)?,
            BuildCommand::ClassAlias { class, alias } => builder.class_alias(class, alias)?,
            BuildCommand::AddProperty { class, name, ty } => builder.add_property(class, name, ty)?,
            BuildCommand::PropertyDescription { class, property, text } => {
                builder.property_description(class, property, text)?
            }
            BuildCommand::PropertyAlias { class, property, alias } => builder.property_alias(class, property, alias)?,
            BuildCommand::AddEnum { name } => builder.add_enum(name)?,
            BuildCommand::EnumDescription { name, text } => builder.enum_description(name, text)?,
            BuildCommand::EnumAlias { name, alias } => builder.enum_alias(name, alias)?,
            BuildCommand::AddValue { enum_name, value } => builder.add_value(enum_name, value)?,
            BuildCommand::ValueDescription { enum_name, value, text } => {
                builder.value_description(enum_name, value, text)?
            }
            BuildCommand::ValueAlias { enum_name, value, alias } => builder.value_alias(enum_name, value, alias)?,
            BuildCommand::ValueSkip { enum_name, value } => builder.value_skip(enum_name, value)?,
        }
    }
    Ok(())
}

/// Plan and apply in one step; returns the planning warnings.
pub fn configure<B: TypeBuilder>(models: &[Model], builder: &mut B) -> Result<Vec<Warning>, B::Error> {
    let Plan { commands, warnings } = plan(models);
    apply(&commands, builder)?;
    Ok(warnings)
}

// --------------------------- In-memory registry --------------------------- //

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PropertyDef {
    pub ty: Option<FieldType>,
    pub description: Option<String>,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClassDef {
    pub description: Option<String>,
    pub alias: Option<String>,
    pub properties: IndexMap<String, PropertyDef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValueDef {
    pub description: Option<String>,
    pub alias: Option<String>,
    pub skip: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnumDef {
    pub description: Option<String>,
    pub alias: Option<String>,
    pub values: IndexMap<String, ValueDef>,
}

/// Name-indexed [`TypeBuilder`]. Adding a name twice starts that type over.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TypeRegistry {
    pub classes: IndexMap<String, ClassDef>,
    pub enums: IndexMap<String, EnumDef>,
}

impl TypeRegistry {
    pub fn new() -> Self { Self::default() }

    /// Check every `Named` type against the registered classes and enums.
    pub fn finish(&self) -> Result<(), BuildError> {
        for (class_name, class) in &self.classes {
            for (prop_name, prop) in &class.properties {
                let Some(ty) = &prop.ty else { continue };
                for target in ty.named_targets() {
                    if !self.classes.contains_key(target) && !self.enums.contains_key(target) {
                        return Err(BuildError::DanglingReference {
                            owner: format!("{class_name}.{prop_name}"),
                            target: target.to_string(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    fn class_mut(&mut self, class: &str) -> Result<&mut ClassDef, BuildError> {
        self.classes.get_mut(class).ok_or_else(|| BuildError::UnknownClass(class.to_string()))
    }

    fn property_mut(&mut self, class: &str, property: &str) -> Result<&mut PropertyDef, BuildError> {
        self.class_mut(class)?.properties.get_mut(property).ok_or_else(|| BuildError::UnknownProperty {
            class: class.to_string(),
            property: property.to_string(),
        })
    }

    fn enum_mut(&mut self, name: &str) -> Result<&mut EnumDef, BuildError> {
        self.enums.get_mut(name).ok_or_else(|| BuildError::UnknownEnum(name.to_string()))
    }

    fn value_mut(&mut self, enum_name: &str, value: &str) -> Result<&mut ValueDef, BuildError> {
        self.enum_mut(enum_name)?.values.get_mut(value).ok_or_else(|| BuildError::UnknownValue {
            enum_name: enum_name.to_string(),
            value: value.to_string(),
        })
    }
}

impl TypeBuilder for TypeRegistry {
    type Error = BuildError;

    fn add_class(&mut self, name: &str) -> Result<(), BuildError> {
        self.classes.insert(name.to_string(), ClassDef::default());
        Ok(())
    }

    fn class_description(&mut self, class: &str, text: &str) -> Result<(), BuildError> {
        self.class_mut(class)?.description = Some(text.to_string());
        Ok(())
    }

    fn class_alias(&mut self, class: &str, alias: &str) -> Result<(), BuildError> {
        self.class_mut(class)?.alias = Some(alias.to_string());
        Ok(())
    }

    fn add_property(&mut self, class: &str, name: &str, ty: &FieldType) -> Result<(), BuildError> {
        let prop = PropertyDef { ty: Some(ty.clone()), ..PropertyDef::default() };
        self.class_mut(class)?.properties.insert(name.to_string(), prop);
        Ok(())
    }

    fn property_description(&mut self, class: &str, property: &str, text: &str) -> Result<(), BuildError> {
        self.property_mut(class, property)?.description = Some(text.to_string());
        Ok(())
    }

    fn property_alias(&mut self, class: &str, property: &str, alias: &str) -> Result<(), BuildError> {
        self.property_mut(class, property)?.alias = Some(alias.to_string());
        Ok(())
    }

    fn add_enum(&mut self, name: &str) -> Result<(), BuildError> {
        self.enums.insert(name.to_string(), EnumDef::default());
        Ok(())
    }

    fn enum_description(&mut self, name: &str, text: &str) -> Result<(), BuildError> {
        self.enum_mut(name)?.description = Some(text.to_string());
        Ok(())
    }

    fn enum_alias(&mut self, name: &str, alias: &str) -> Result<(), BuildError> {
        self.enum_mut(name)?.alias = Some(alias.to_string());
        Ok(())
    }

    fn add_value(&mut self, enum_name: &str, value: &str) -> Result<(), BuildError> {
        self.enum_mut(enum_name)?.values.insert(value.to_string(), ValueDef::default());
        Ok(())
    }

    fn value_description(&mut self, enum_name: &str, value: &str, text: &str) -> Result<(), BuildError> {
        self.value_mut(enum_name, value)?.description = Some(text.to_string());
        Ok(())
    }

    fn value_alias(&mut self, enum_name: &str, value: &str, alias: &str) -> Result<(), BuildError> {
        self.value_mut(enum_name, value)?.alias = Some(alias.to_string());
        Ok(())
    }

    fn value_skip(&mut self, enum_name: &str, value: &str) -> Result<(), BuildError> {
        self.value_mut(enum_name, value)?.skip = true;
        Ok(())
    }
}
