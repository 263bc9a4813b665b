//! JSON Schema → IR walker.
//!
//! Recursive descent over a fully materialized schema document. One walker per
//! conversion: the `$ref` cache, the in-progress set and the anonymous-name
//! counter all live here, never in globals.
//!
//! Emission policy:
//! - a class takes the list slot it had when first reached; its nested models
//!   follow it (the class itself is only built once its fields are done);
//! - every root `$defs` entry is converted up front without touching the
//!   `$ref` cache, so a definition that is also referenced shows up twice;
//! - a `$ref` reached while its own target object is still being built becomes
//!   a by-name `class_ref` (the name that object was given) plus a warning; a
//!   cycle through anything other than an object is an error.
pub mod pointer;
pub mod shape;

use std::collections::{HashMap, HashSet};

use serde_json::{Map, Value};

use crate::error::{self, Result, SchemaError, Warning};
use crate::ir::{
    ClassModel, EnumModel, EnumValueModel, FieldModel, Model, TypeDescriptor, TypeKind,
};
use crate::names::{self, Case};
use shape::{Classified, SchemaShape};

const ANONYMOUS_CLASS: &str = "AnonymousClass";
const ANONYMOUS_ENUM: &str = "AnonymousEnum";

// ------------------------------- Output ----------------------------------- //

#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    /// flat, in emission order, duplicates included
    pub models: Vec<Model>,
    /// type of the root node itself
    pub root: TypeDescriptor,
    pub warnings: Vec<Warning>,
}

impl Conversion {
    pub fn into_models(self) -> Vec<Model> { self.models }
}

// ------------------------------- Walker ----------------------------------- //

/// Where a node sits in the document.
#[derive(Debug, Clone)]
struct Site {
    path: String,
    hint: Option<String>,
    root: bool,
}

impl Site {
    fn root() -> Self {
        Site { path: pointer::ROOT.to_string(), hint: None, root: true }
    }

    fn at(path: impl Into<String>, hint: Option<String>) -> Self {
        Site { path: path.into(), hint, root: false }
    }

    fn child(&self, segment: &str) -> Self {
        Site::at(format!("{}/{segment}", self.path), None)
    }

    fn with_hint(mut self, hint: Option<String>) -> Self {
        self.hint = hint;
        self
    }
}

pub struct SchemaWalker<'r> {
    document: &'r Value,
    root_class_name: String,
    models: Vec<Model>,
    cache: HashMap<String, TypeDescriptor>,
    resolving: HashSet<String>,
    /// objects under construction: path → class name
    building: HashMap<String, String>,
    anonymous: usize,
    warnings: Vec<Warning>,
}

impl<'r> SchemaWalker<'r> {
    pub fn new(document: &'r Value, root_class_name: &str) -> Self {
        Self {
            document,
            root_class_name: names::pascal(root_class_name),
            models: Vec::new(),
            cache: HashMap::new(),
            resolving: HashSet::new(),
            building: HashMap::new(),
            anonymous: 0,
            warnings: Vec::new(),
        }
    }

    pub fn run(mut self) -> Result<Conversion> {
        let document = self.document;
        self.resolving.insert(pointer::ROOT.to_string());

        for (path, definition) in pointer::definitions(document) {
            let hint = pointer::last_segment(&path);
            self.resolving.insert(path.clone());
            self.convert_node(definition, &Site::at(path.clone(), hint))?;
            self.resolving.remove(&path);
        }

        let root = self.convert_node(document, &Site::root())?;
        tracing::debug!(models = self.models.len(), warnings = self.warnings.len(), "conversion finished");
        Ok(Conversion { models: self.models, root, warnings: self.warnings })
    }

    fn convert_node(&mut self, schema: &'r Value, site: &Site) -> Result<TypeDescriptor> {
        let Classified { shape, nullable } =
            shape::classify(schema).map_err(|detail| SchemaError::unsupported(&site.path, detail))?;
        tracing::trace!(path = %site.path, ?shape, "node");

        let ty = match shape {
            SchemaShape::Skip | SchemaShape::Any => TypeDescriptor::any(),
            SchemaShape::Null => TypeDescriptor::null(),
            SchemaShape::Ref(reference) => self.convert_ref(reference, site)?,
            // the lone member stands in for this node, path included
            SchemaShape::Single(inner) => self.convert_node(inner, site)?,
            SchemaShape::Union { keyword, members } => self.convert_union(keyword, members, site)?,
            SchemaShape::Const(value) => self.convert_const(value, site)?,
            SchemaShape::Enum(values) => self.convert_enum(schema, values, site)?,
            SchemaShape::Object(map) => self.convert_object(map, site)?,
            SchemaShape::Array(items) => {
                let item = match items {
                    Some(items) => {
                        let item_site = site.child("items").with_hint(site.hint.clone());
                        self.convert_node(items, &item_site)?
                    }
                    None => TypeDescriptor::any(),
                };
                TypeDescriptor::list(item)
            }
            SchemaShape::Scalar(scalar) => scalar.descriptor(),
            SchemaShape::ScalarUnion(scalars) => {
                TypeDescriptor::union(scalars.into_iter().map(|s| s.descriptor()).collect())
            }
        };

        Ok(ty.with_optional(nullable))
    }

    fn convert_ref(&mut self, reference: &str, site: &Site) -> Result<TypeDescriptor> {
        if let Some(cached) = self.cache.get(reference) {
            return Ok(cached.clone());
        }

        let target = pointer::resolve(self.document, reference).ok_or_else(|| SchemaError::Reference {
            reference: reference.to_string(),
            path: site.path.clone(),
        })?;

        if self.resolving.contains(reference) || self.building.contains_key(reference) {
            let name = self.cycle_name(reference)?;
            self.warn(Warning::UnresolvedCycle { name: name.clone(), reference: reference.to_string() });
            return Ok(TypeDescriptor::class_ref(name));
        }

        self.resolving.insert(reference.to_string());
        let result = self.convert_node(target, &Site::at(reference, pointer::last_segment(reference)));
        self.resolving.remove(reference);

        let ty = result?;
        self.cache.insert(reference.to_string(), ty.clone());
        Ok(ty)
    }

    fn convert_union(&mut self, keyword: &str, members: &'r [Value], site: &Site) -> Result<TypeDescriptor> {
        let mut arms = Vec::with_capacity(members.len());
        let mut had_null = false;
        for (i, member) in members.iter().enumerate() {
            let ty = self.convert_node(member, &site.child(&format!("{keyword}/{i}")))?;
            if matches!(ty.kind, TypeKind::Null) {
                had_null = true;
            } else {
                arms.push(ty);
            }
        }
        let core = match arms.len() {
            0 => TypeDescriptor::null(),
            1 => arms.remove(0),
            _ => TypeDescriptor::union(arms),
        };
        Ok(core.with_optional(had_null))
    }

    fn convert_enum(&mut self, schema: &Value, literals: &[Value], site: &Site) -> Result<TypeDescriptor> {
        let (name, alias) = match title(schema).and_then(pascal_title) {
            Some(titled) => titled,
            None => (self.anonymous_name(ANONYMOUS_ENUM), None),
        };

        let mut values = Vec::with_capacity(literals.len());
        let mut seen = HashMap::<String, String>::new();
        let mut optional = false;
        for literal in literals {
            let raw = match literal {
                Value::Null => {
                    optional = true;
                    continue;
                }
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                other => {
                    return Err(SchemaError::unsupported(&site.path, format!("enum literal `{other}` is not a scalar")));
                }
            };
            let (identifier, alias) = names::resolve(&raw, Case::Pascal);
            if identifier.is_empty() {
                return Err(SchemaError::unsupported(
                    &site.path,
                    format!("enum literal '{raw}' has no identifier characters"),
                ));
            }
            match seen.get(&identifier) {
                Some(first) if *first == raw => continue,
                Some(first) => {
                    return Err(SchemaError::NamingCollision {
                        owner: name,
                        identifier,
                        first: first.clone(),
                        second: raw,
                    });
                }
                None => {
                    seen.insert(identifier.clone(), raw);
                }
            }
            values.push(EnumValueModel::new(identifier, alias));
        }

        let mut model = EnumModel::new(name.clone(), values).with_description(description(schema));
        model.alias = alias;
        let slot = self.models.len();
        self.place(slot, model.into());
        Ok(TypeDescriptor::enum_ref(name).with_optional(optional))
    }

    fn convert_object(&mut self, map: &'r Map<String, Value>, site: &Site) -> Result<TypeDescriptor> {
        let title = map.get("title").and_then(Value::as_str);
        let (name, alias) = if site.root && !self.root_class_name.is_empty() {
            let name = self.root_class_name.clone();
            let alias = title.filter(|t| *t != name).map(str::to_string);
            (name, alias)
        } else if let Some(titled) = title.and_then(pascal_title) {
            titled
        } else if let Some(hinted) = site.hint.as_deref().map(names::pascal).filter(|n| !n.is_empty()) {
            (hinted, None)
        } else {
            (self.anonymous_name(ANONYMOUS_CLASS), None)
        };

        if map.get("additionalProperties") == Some(&Value::Bool(true)) {
            self.warn(Warning::AdditionalProperties { path: site.path.clone() });
        }

        let slot = self.models.len();
        self.building.insert(site.path.clone(), name.clone());
        let fields = self.convert_properties(map, &name, site);
        self.building.remove(&site.path);
        let fields = fields?;

        let class = ClassModel::new(name.clone(), fields)
            .with_description(description_of(map))
            .with_alias(alias);
        self.place(slot, class.into());
        Ok(TypeDescriptor::class_ref(name))
    }

    fn convert_properties(
        &mut self,
        map: &'r Map<String, Value>,
        name: &str,
        site: &Site,
    ) -> Result<Vec<FieldModel>> {
        let required: HashSet<&str> = map
            .get("required")
            .and_then(Value::as_array)
            .map(|keys| keys.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        let mut fields = Vec::new();
        let mut seen = HashMap::<String, &str>::new();

        if let Some(properties) = map.get("properties") {
            let properties = properties
                .as_object()
                .ok_or_else(|| SchemaError::unsupported(&site.path, "'properties' must be an object"))?;

            for (key, property) in properties {
                let child = site.child(&format!("properties/{}", pointer::escape(key))).with_hint(Some(key.clone()));
                let (field_name, field_alias) = names::resolve(key, Case::Camel);
                if field_name.is_empty() {
                    return Err(SchemaError::unsupported(
                        &child.path,
                        format!("property '{key}' has no identifier characters"),
                    ));
                }
                if let Some(first) = seen.insert(field_name.clone(), key) {
                    return Err(SchemaError::NamingCollision {
                        owner: name.to_string(),
                        identifier: field_name,
                        first: first.to_string(),
                        second: key.clone(),
                    });
                }

                let ty = self.convert_node(property, &child)?;
                let mut field = FieldModel::new(field_name, ty.with_optional(!required.contains(key.as_str())))
                    .with_description(description(property))
                    .with_alias(field_alias);
                field.skip = matches!(property, Value::Bool(false));
                fields.push(field);
            }
        }
        Ok(fields)
    }

    /// Only literals with a BAML spelling survive; other numbers widen to float.
    fn convert_const(&mut self, value: &Value, site: &Site) -> Result<TypeDescriptor> {
        let kind = match value {
            Value::String(s) => TypeKind::LiteralString(s.clone()),
            Value::Bool(b) => TypeKind::LiteralBool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => TypeKind::LiteralInt(i),
                None => {
                    self.warn(Warning::NonIntegerConst { path: site.path.clone(), value: n.to_string() });
                    TypeKind::Float
                }
            },
            Value::Null => TypeKind::Null,
            other => return Err(SchemaError::unsupported(&site.path, format!("const `{other}` is not a scalar"))),
        };
        Ok(TypeDescriptor::new(kind))
    }

    /// The name a `$ref` cycle points back to: whatever the object under
    /// construction at that path was called.
    fn cycle_name(&self, reference: &str) -> Result<String> {
        self.building.get(reference).cloned().ok_or_else(|| {
            SchemaError::unsupported(reference, "$ref cycle through a schema that is not an object")
        })
    }

    fn place(&mut self, slot: usize, model: Model) {
        let clash = self.models.iter().any(|m| {
            m.name() == model.name() && matches!(m, Model::Class(_)) == matches!(model, Model::Class(_)) && *m != model
        });
        if clash {
            self.warn(Warning::NameReused { name: model.name().to_string() });
        }
        self.models.insert(slot, model);
    }

    fn anonymous_name(&mut self, prefix: &str) -> String {
        self.anonymous += 1;
        let name = format!("{prefix}{}", self.anonymous);
        self.warn(Warning::AnonymousName { name: name.clone() });
        name
    }

    fn warn(&mut self, warning: Warning) {
        error::emit(&mut self.warnings, warning);
    }
}

// ------------------------------ Helpers ----------------------------------- //

fn title(schema: &Value) -> Option<&str> {
    schema.get("title").and_then(Value::as_str)
}

fn description(schema: &Value) -> Option<String> {
    schema.get("description").and_then(Value::as_str).map(str::to_string)
}

fn description_of(map: &Map<String, Value>) -> Option<String> {
    map.get("description").and_then(Value::as_str).map(str::to_string)
}

/// `Pascal(title)`, unless nothing of the title survives.
fn pascal_title(title: &str) -> Option<(String, Option<String>)> {
    let (name, alias) = names::resolve(title, Case::Pascal);
    (!name.is_empty()).then_some((name, alias))
}

// ------------------------------- Front API -------------------------------- //

/// Convert `document` into IR models; the root object (if any) is named after
/// `root_class_name`. Errors abort the whole call.
pub fn convert(document: &Value, root_class_name: &str) -> Result<Conversion> {
    SchemaWalker::new(document, root_class_name).run()
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::BaseKind;
    use serde_json::json;

    fn class<'a>(c: &'a Conversion, i: usize) -> &'a ClassModel {
        c.models[i].as_class().expect("class model")
    }

    fn names_of(c: &Conversion) -> Vec<&str> {
        c.models.iter().map(Model::name).collect()
    }

    #[test]
    fn scalar_roots_emit_nothing() {
        let c = convert(&json!({"type": "string"}), "SimpleString").unwrap();
        assert!(c.models.is_empty());
        assert_eq!(c.root, TypeDescriptor::string());

        let c = convert(&json!({"type": ["string", "null"]}), "OptionalString").unwrap();
        assert!(c.models.is_empty());
        assert_eq!(c.root, TypeDescriptor::string().optional());
    }

    #[test]
    fn anonymous_root_enum() {
        let c = convert(&json!({"type": "string", "enum": ["a", "b-c", "d"]}), "StringEnum").unwrap();
        let e = c.models[0].as_enum().unwrap();
        assert_eq!(e.name, "AnonymousEnum1");
        let got: Vec<(&str, Option<&str>)> =
            e.values.iter().map(|v| (v.name.as_str(), v.alias.as_deref())).collect();
        assert_eq!(got, [("A", Some("a")), ("BC", Some("b-c")), ("D", Some("d"))]);
        assert_eq!(c.warnings, [Warning::AnonymousName { name: "AnonymousEnum1".into() }]);
        assert_eq!(c.root, TypeDescriptor::enum_ref("AnonymousEnum1"));
    }

    #[test]
    fn root_name_wins_over_title() {
        let schema = json!({
            "title": "calculateArguments",
            "type": "object",
            "properties": {"expression": {"title": "Expression", "type": "string"}},
            "required": ["expression"]
        });
        let c = convert(&schema, "calculate_expression").unwrap();
        let root = class(&c, 0);
        assert_eq!(root.name, "CalculateExpression");
        assert_eq!(root.alias.as_deref(), Some("calculateArguments"));
        assert_eq!(root.properties, [FieldModel::new("expression", TypeDescriptor::string())]);
    }

    #[test]
    fn fields_get_camel_names_aliases_and_optionality() {
        let schema = json!({
            "type": "object",
            "properties": {
                "date_from": {"type": "string"},
                "query": {"type": "string", "description": "search text"},
            },
            "required": ["query"]
        });
        let c = convert(&schema, "search_papers").unwrap();
        let root = class(&c, 0);
        assert_eq!(root.name, "SearchPapers");
        assert_eq!(root.properties[0].name, "dateFrom");
        assert_eq!(root.properties[0].alias.as_deref(), Some("date_from"));
        assert!(root.properties[0].type_info.is_optional);
        assert_eq!(root.properties[1].description.as_deref(), Some("search text"));
        assert!(!root.properties[1].type_info.is_optional);
    }

    #[test]
    fn self_reference_is_a_named_forward_ref() {
        let schema = json!({
            "title": "Node",
            "type": "object",
            "properties": {"value": {"type": "integer"}, "next": {"$ref": "#"}}
        });
        let c = convert(&schema, "Node").unwrap();
        assert_eq!(c.models.len(), 1);
        let next = class(&c, 0).field("next").unwrap();
        assert_eq!(next.type_info, TypeDescriptor::class_ref("Node").optional());
        assert_eq!(
            c.warnings,
            [Warning::UnresolvedCycle { name: "Node".into(), reference: "#".into() }]
        );
    }

    #[test]
    fn nested_classes_follow_their_parent() {
        let schema = json!({
            "type": "object",
            "properties": {
                "inner": {"type": "object", "properties": {"leaf": {"type": "object", "properties": {}}}},
                "other": {"type": "object", "title": "Other"}
            }
        });
        let c = convert(&schema, "Outer").unwrap();
        assert_eq!(names_of(&c), ["Outer", "Inner", "Leaf", "Other"]);
    }

    #[test]
    fn defs_are_emitted_up_front_and_again_on_first_ref() {
        let schema = json!({
            "type": "object",
            "properties": {
                "home": {"$ref": "#/$defs/Address"},
                "previous": {"type": "array", "items": {"$ref": "#/$defs/Address"}}
            },
            "$defs": {"Address": {"type": "object", "properties": {"street": {"type": "string"}}}}
        });
        let c = convert(&schema, "Person").unwrap();
        assert_eq!(names_of(&c), ["Address", "Person", "Address"]);
        assert_eq!(c.models[0], c.models[2]);
        let person = class(&c, 1);
        assert_eq!(
            person.field("previous").unwrap().type_info,
            TypeDescriptor::list(TypeDescriptor::class_ref("Address")).optional()
        );
    }

    #[test]
    fn ref_to_primitive_is_inlined() {
        let schema = json!({
            "type": "object",
            "properties": {"name": {"$ref": "#/$defs/name_def"}},
            "$defs": {"name_def": {"type": "string"}}
        });
        let c = convert(&schema, "RefToPrimitive").unwrap();
        assert_eq!(c.models.len(), 1);
        assert_eq!(class(&c, 0).properties[0].type_info, TypeDescriptor::string().optional());
    }

    #[test]
    fn union_drops_null_and_emits_members_flat() {
        let schema = json!({
            "type": "object",
            "properties": {
                "value": {"anyOf": [{"type": "string"}, {"type": "object", "title": "Box", "properties": {}}, {"type": "null"}]},
                "single": {"oneOf": [{"type": "integer"}, {"type": "null"}]}
            },
            "required": ["value", "single"]
        });
        let c = convert(&schema, "Holder").unwrap();
        assert_eq!(names_of(&c), ["Holder", "Box"]);
        let holder = class(&c, 0);
        let value = &holder.field("value").unwrap().type_info;
        assert_eq!(value.base_kind(), BaseKind::Union);
        assert!(value.is_optional);
        assert_eq!(value.union_members().unwrap(), [TypeDescriptor::string(), TypeDescriptor::class_ref("Box")]);
        assert_eq!(holder.field("single").unwrap().type_info, TypeDescriptor::int().optional());
    }

    #[test]
    fn additional_properties_warns_and_keeps_declared_fields() {
        let schema = json!({
            "type": "object",
            "properties": {
                "metadata": {"type": "object", "additionalProperties": true},
                "extra": {"type": "object", "additionalProperties": true, "properties": {"k": {"type": "string"}}}
            }
        });
        let c = convert(&schema, "Root").unwrap();
        assert_eq!(names_of(&c), ["Root", "Metadata", "Extra"]);
        assert!(class(&c, 1).properties.is_empty());
        assert_eq!(class(&c, 2).properties.len(), 1);
        assert_eq!(
            c.warnings[0].to_string(),
            "Schema at '#/properties/metadata' uses 'additionalProperties: true'"
        );
    }

    #[test]
    fn anonymous_counter_is_shared() {
        let schema = json!({
            "type": "array",
            "items": {"anyOf": [
                {"type": "object", "properties": {}},
                {"type": "string", "enum": ["x"]},
                {"type": "object", "properties": {}}
            ]}
        });
        let c = convert(&schema, "Root").unwrap();
        assert_eq!(names_of(&c), ["AnonymousClass1", "AnonymousEnum2", "AnonymousClass3"]);
        assert_eq!(c.warnings.len(), 3);
    }

    #[test]
    fn array_items_take_the_property_hint() {
        let schema = json!({
            "type": "object",
            "properties": {"line_items": {"type": "array", "items": {"type": "object", "properties": {"sku": {"type": "string"}}}}}
        });
        let c = convert(&schema, "Order").unwrap();
        assert_eq!(names_of(&c), ["Order", "LineItems"]);
    }

    #[test]
    fn const_becomes_literal() {
        let schema = json!({
            "type": "object",
            "properties": {
                "kind": {"type": "string", "const": "calc"},
                "version": {"const": 2},
                "enabled": {"const": true}
            }
        });
        let c = convert(&schema, "Lit").unwrap();
        let lit = class(&c, 0);
        assert_eq!(lit.properties[0].type_info.kind, TypeKind::LiteralString("calc".into()));
        assert_eq!(lit.properties[1].type_info.kind, TypeKind::LiteralInt(2));
        assert_eq!(lit.properties[2].type_info.kind, TypeKind::LiteralBool(true));
    }

    #[test]
    fn false_property_is_skipped() {
        let schema = json!({"type": "object", "properties": {"legacy": false, "free": true}});
        let c = convert(&schema, "S").unwrap();
        let s = class(&c, 0);
        assert!(s.properties[0].skip);
        assert!(!s.properties[1].skip);
        assert_eq!(s.properties[1].type_info.base_kind(), BaseKind::Any);
    }

    #[test]
    fn nullable_enum_literal_makes_ref_optional() {
        let schema = json!({"type": "object", "properties": {"mode": {"title": "Mode", "enum": ["on", "off", null]}}, "required": ["mode"]});
        let c = convert(&schema, "S").unwrap();
        assert_eq!(class(&c, 0).properties[0].type_info, TypeDescriptor::enum_ref("Mode").optional());
        assert_eq!(c.models[1].as_enum().unwrap().values.len(), 2);
    }

    #[test]
    fn enum_collision_is_an_error() {
        let schema = json!({"type": "string", "title": "Dup", "enum": ["a-b", "a_b"]});
        let err = convert(&schema, "X").unwrap_err();
        assert!(matches!(err, SchemaError::NamingCollision { ref identifier, .. } if identifier == "AB"));
    }

    #[test]
    fn field_collision_is_an_error() {
        let schema = json!({"type": "object", "properties": {"date_from": {}, "dateFrom": {}}});
        assert!(matches!(convert(&schema, "X"), Err(SchemaError::NamingCollision { .. })));
    }

    #[test]
    fn missing_ref_is_an_error() {
        let schema = json!({"type": "object", "properties": {"a": {"$ref": "#/$defs/Nope"}}});
        let err = convert(&schema, "X").unwrap_err();
        assert!(matches!(err, SchemaError::Reference { ref reference, ref path }
            if reference == "#/$defs/Nope" && path == "#/properties/a"));
    }

    #[test]
    fn unsupported_type_is_an_error() {
        let schema = json!({"type": "object", "properties": {"a": {"type": "tuple"}}});
        assert!(matches!(convert(&schema, "X"), Err(SchemaError::UnsupportedSchemaKind { .. })));
    }

    #[test]
    fn mutual_recursion_through_defs_terminates() {
        let schema = json!({
            "$defs": {
                "Tree": {"type": "object", "properties": {"children": {"type": "array", "items": {"$ref": "#/$defs/Tree"}}}}
            },
            "$ref": "#/$defs/Tree"
        });
        let c = convert(&schema, "Root").unwrap();
        assert!(c.models.iter().all(|m| m.name() == "Tree"));
        assert!(c.warnings.iter().any(|w| matches!(w, Warning::UnresolvedCycle { name, .. } if name == "Tree")));
        assert_eq!(c.root, TypeDescriptor::class_ref("Tree"));
    }

    #[test]
    fn conversion_is_deterministic() {
        let schema = json!({
            "type": "object",
            "properties": {
                "a": {"type": "object", "properties": {"b": {"enum": ["x", "y"]}}},
                "c": {"type": "array", "items": {"type": "object", "properties": {}}}
            }
        });
        assert_eq!(convert(&schema, "R").unwrap(), convert(&schema, "R").unwrap());
    }

    #[test]
    fn self_reference_through_a_non_object_root_is_an_error() {
        let schema = json!({
            "type": "array",
            "items": {"type": "object", "properties": {"children": {"$ref": "#"}}}
        });
        let err = convert(&schema, "Forest").unwrap_err();
        assert!(matches!(err, SchemaError::UnsupportedSchemaKind { ref path, .. } if path == "#"));
    }

    #[test]
    fn cycle_uses_the_name_given_to_the_object() {
        let schema = json!({
            "type": "object",
            "properties": {
                "branch": {
                    "type": "object",
                    "properties": {"parent": {"$ref": "#/properties/branch"}}
                }
            }
        });
        let c = convert(&schema, "Root").unwrap();
        assert_eq!(names_of(&c), ["Root", "Branch"]);
        assert_eq!(class(&c, 1).properties[0].type_info, TypeDescriptor::class_ref("Branch").optional());
    }

    #[test]
    fn property_without_identifier_characters_is_an_error() {
        let schema = json!({"type": "object", "properties": {"$": {"type": "string"}}});
        let err = convert(&schema, "X").unwrap_err();
        assert!(matches!(err, SchemaError::UnsupportedSchemaKind { ref path, .. } if path == "#/properties/$"));
    }

    #[test]
    fn unusable_title_falls_back_to_hint_then_anonymous() {
        let schema = json!({
            "type": "object",
            "properties": {
                "nested": {"type": "object", "title": "***", "properties": {}},
                "mode": {"title": "!!", "enum": ["on"]}
            }
        });
        let c = convert(&schema, "Root").unwrap();
        assert_eq!(names_of(&c), ["Root", "Nested", "AnonymousEnum1"]);
        assert_eq!(class(&c, 1).alias, None);
    }

    #[test]
    fn non_integer_const_widens_to_float() {
        let schema = json!({"type": "object", "properties": {"ratio": {"const": 1.5}}});
        let c = convert(&schema, "X").unwrap();
        assert_eq!(class(&c, 0).properties[0].type_info, TypeDescriptor::float().optional());
        assert_eq!(
            c.warnings,
            [Warning::NonIntegerConst { path: "#/properties/ratio".into(), value: "1.5".into() }]
        );
    }

    #[test]
    fn reused_name_with_a_different_body_warns() {
        let schema = json!({
            "type": "object",
            "properties": {"node": {"type": "object", "properties": {"label": {"type": "string"}}}}
        });
        let c = convert(&schema, "Node").unwrap();
        assert_eq!(names_of(&c), ["Node", "Node"]);
        assert_eq!(c.warnings, [Warning::NameReused { name: "Node".into() }]);
    }
}
