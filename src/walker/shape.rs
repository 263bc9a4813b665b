//! One closed classification per schema node, computed before branching.
use serde_json::{Map, Value};

use crate::ir::TypeDescriptor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scalar {
    String,
    Int,
    Float,
    Bool,
}

impl Scalar {
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "string" | "str" => Some(Scalar::String),
            "integer" | "int" => Some(Scalar::Int),
            "number" | "float" => Some(Scalar::Float),
            "boolean" | "bool" => Some(Scalar::Bool),
            _ => None,
        }
    }

    pub fn descriptor(self) -> TypeDescriptor {
        match self {
            Scalar::String => TypeDescriptor::string(),
            Scalar::Int => TypeDescriptor::int(),
            Scalar::Float => TypeDescriptor::float(),
            Scalar::Bool => TypeDescriptor::bool(),
        }
    }
}

#[derive(Debug)]
pub enum SchemaShape<'s> {
    /// the `false` schema: nothing is allowed here
    Skip,
    Any,
    Null,
    Ref(&'s str),
    /// `allOf` with a single member
    Single(&'s Value),
    Union { keyword: &'static str, members: &'s [Value] },
    Const(&'s Value),
    Enum(&'s [Value]),
    Object(&'s Map<String, Value>),
    Array(Option<&'s Value>),
    Scalar(Scalar),
    ScalarUnion(Vec<Scalar>),
}

#[derive(Debug)]
pub struct Classified<'s> {
    pub shape: SchemaShape<'s>,
    /// `type` listed `"null"` next to something else
    pub nullable: bool,
}

impl<'s> From<SchemaShape<'s>> for Classified<'s> {
    fn from(shape: SchemaShape<'s>) -> Self { Classified { shape, nullable: false } }
}

/// Decide what a node is. The `Err` string is a human-readable reason.
pub fn classify(schema: &Value) -> Result<Classified<'_>, String> {
    let map = match schema {
        Value::Bool(true) => return Ok(SchemaShape::Any.into()),
        Value::Bool(false) => return Ok(SchemaShape::Skip.into()),
        Value::Object(map) => map,
        other => return Err(format!("expected a schema object, found `{other}`")),
    };

    if let Some(reference) = map.get("$ref") {
        return match reference.as_str() {
            Some(r) => Ok(SchemaShape::Ref(r).into()),
            None => Err("'$ref' must be a string".into()),
        };
    }

    let ty = map.get("type");

    if ty.is_none() && !map.contains_key("properties") {
        if let Some(Value::Array(members)) = map.get("allOf") {
            if let [only] = members.as_slice() {
                return Ok(SchemaShape::Single(only).into());
            }
            return Err("'allOf' with more than one member is not supported".into());
        }
        for keyword in ["anyOf", "oneOf"] {
            if let Some(members) = map.get(keyword) {
                let members = members
                    .as_array()
                    .ok_or_else(|| format!("'{keyword}' must be an array"))?;
                return Ok(SchemaShape::Union { keyword, members }.into());
            }
        }
    }

    if let Some(value) = map.get("const") {
        return Ok(SchemaShape::Const(value).into());
    }

    match ty {
        None => Ok(infer_untyped(map).into()),
        Some(Value::String(name)) => shape_for(name, map, false).map(Into::into),
        Some(Value::Array(names)) => {
            let mut nullable = false;
            let mut rest = Vec::new();
            for name in names {
                match name.as_str() {
                    Some("null") => nullable = true,
                    Some(name) => rest.push(name),
                    None => return Err(format!("'type' entries must be strings, found `{name}`")),
                }
            }
            let shape = match rest.as_slice() {
                [] => SchemaShape::Null,
                // nullable scalar: `enum` does not apply to the shorthand
                [one] => shape_for(one, map, nullable)?,
                many => SchemaShape::ScalarUnion(
                    many.iter()
                        .map(|name| {
                            Scalar::from_type_name(name)
                                .ok_or_else(|| format!("type '{name}' cannot appear in a type list"))
                        })
                        .collect::<Result<_, _>>()?,
                ),
            };
            Ok(Classified { shape, nullable })
        }
        Some(other) => Err(format!("'type' must be a string or array, found `{other}`")),
    }
}

fn shape_for<'s>(name: &str, map: &'s Map<String, Value>, ignore_enum: bool) -> Result<SchemaShape<'s>, String> {
    if let Some(scalar) = Scalar::from_type_name(name) {
        if scalar == Scalar::String && !ignore_enum {
            if let Some(Value::Array(values)) = map.get("enum") {
                return Ok(SchemaShape::Enum(values));
            }
        }
        return Ok(SchemaShape::Scalar(scalar));
    }
    match name {
        "object" => Ok(SchemaShape::Object(map)),
        "array" => Ok(SchemaShape::Array(map.get("items"))),
        "null" => Ok(SchemaShape::Null),
        other => Err(format!("unknown type '{other}'")),
    }
}

fn infer_untyped(map: &Map<String, Value>) -> SchemaShape<'_> {
    if map.contains_key("properties") {
        return SchemaShape::Object(map);
    }
    if map.contains_key("items") {
        return SchemaShape::Array(map.get("items"));
    }
    match map.get("enum") {
        Some(Value::Array(values)) if values.iter().all(|v| v.is_string() || v.is_null()) => {
            SchemaShape::Enum(values)
        }
        _ => SchemaShape::Any,
    }
}
