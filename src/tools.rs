//! Tool lists → one discriminated class per tool.
//!
//! Each tool becomes a synthetic object schema: a required literal field
//! holding the tool's name (tool description attached) and, when the tool
//! declares input parameters, a required field whose schema is exactly that
//! input schema. The synthetic schema then goes through the ordinary walker.
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::error::{Result, SchemaError, Warning};
use crate::ir::{ClassModel, FieldModel, Model, TypeDescriptor};
use crate::names::{self, Case};
use crate::path_de;
use crate::walker;

/// One entry of an MCP-style tool list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, rename = "inputSchema", alias = "input_schema", skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<Value>,
}

impl ToolDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        ToolDescriptor { name: name.into(), description: None, input_schema: None }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_input_schema(mut self, schema: Value) -> Self {
        self.input_schema = Some(schema);
        self
    }
}

// ------------------------------ Configuration ----------------------------- //

pub type Namer = Arc<dyn Fn(&ToolDescriptor) -> String + Send + Sync>;

#[derive(Clone)]
pub struct ToolAdapterConfig {
    pub tool_name_field: String,
    pub tool_args_field: String,
    /// value of the literal discriminator
    pub tool_name: Namer,
    pub tool_class: Namer,
    pub args_class: Namer,
}

impl Default for ToolAdapterConfig {
    fn default() -> Self {
        ToolAdapterConfig {
            tool_name_field: "name".to_string(),
            tool_args_field: "arguments".to_string(),
            tool_name: Arc::new(|tool| tool.name.clone()),
            tool_class: Arc::new(|tool| format!("{}Tool", names::pascal(&tool.name))),
            args_class: Arc::new(|tool| format!("{}Arguments", names::pascal(&tool.name))),
        }
    }
}

impl fmt::Debug for ToolAdapterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolAdapterConfig")
            .field("tool_name_field", &self.tool_name_field)
            .field("tool_args_field", &self.tool_args_field)
            .finish_non_exhaustive()
    }
}

impl ToolAdapterConfig {
    pub fn with_tool_name_field(mut self, field: impl Into<String>) -> Self {
        self.tool_name_field = field.into();
        self
    }

    pub fn with_tool_args_field(mut self, field: impl Into<String>) -> Self {
        self.tool_args_field = field.into();
        self
    }

    pub fn with_tool_name(mut self, f: impl Fn(&ToolDescriptor) -> String + Send + Sync + 'static) -> Self {
        self.tool_name = Arc::new(f);
        self
    }

    pub fn with_tool_class(mut self, f: impl Fn(&ToolDescriptor) -> String + Send + Sync + 'static) -> Self {
        self.tool_class = Arc::new(f);
        self
    }

    pub fn with_args_class(mut self, f: impl Fn(&ToolDescriptor) -> String + Send + Sync + 'static) -> Self {
        self.args_class = Arc::new(f);
        self
    }

    fn validate(&self) -> Result<()> {
        let name_field = names::camel(&self.tool_name_field);
        if name_field.is_empty() || names::camel(&self.tool_args_field).is_empty() {
            return Err(SchemaError::Configuration("tool field names must contain identifier characters".into()));
        }
        if name_field == names::camel(&self.tool_args_field) {
            return Err(SchemaError::Configuration(format!(
                "tool_name_field '{}' and tool_args_field '{}' name the same field",
                self.tool_name_field, self.tool_args_field
            )));
        }
        Ok(())
    }
}

/// File-loadable part of the adapter configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolAdapterSettings {
    pub tool_name_field: String,
    pub tool_args_field: String,
    pub selection: ToolSelection,
}

impl Default for ToolAdapterSettings {
    fn default() -> Self {
        let config = ToolAdapterConfig::default();
        ToolAdapterSettings {
            tool_name_field: config.tool_name_field,
            tool_args_field: config.tool_args_field,
            selection: ToolSelection::default(),
        }
    }
}

impl ToolAdapterSettings {
    pub fn into_config(self) -> ToolAdapterConfig {
        ToolAdapterConfig::default()
            .with_tool_name_field(self.tool_name_field)
            .with_tool_args_field(self.tool_args_field)
    }
}

// -------------------------------- Adapter --------------------------------- //

#[derive(Debug, Clone, PartialEq)]
pub struct ToolSet {
    /// every tool's models, tools in input order
    pub models: Vec<Model>,
    /// one `class_ref` per tool, naming its wrapper class
    pub tools: Vec<TypeDescriptor>,
    pub warnings: Vec<Warning>,
}

#[derive(Debug, Clone, Default)]
pub struct ToolSchemaAdapter {
    config: ToolAdapterConfig,
}

impl ToolSchemaAdapter {
    pub fn new(config: ToolAdapterConfig) -> Self { ToolSchemaAdapter { config } }

    pub fn config(&self) -> &ToolAdapterConfig { &self.config }

    /// The synthetic wrapper schema for one tool.
    pub fn tool_schema(&self, tool: &ToolDescriptor) -> Result<Value> {
        self.config.validate()?;
        let name_field = &self.config.tool_name_field;
        let args_field = &self.config.tool_args_field;

        let mut discriminator = json!({"type": "string", "const": (self.config.tool_name)(tool)});
        if let Some(description) = &tool.description {
            discriminator["description"] = Value::String(description.clone());
        }

        let mut properties = Map::new();
        properties.insert(name_field.clone(), discriminator);
        let mut required = vec![Value::String(name_field.clone())];
        let mut root = Map::new();

        if let Some(input) = &tool.input_schema {
            let mut args = input.clone();
            let home = format!("{}/properties/{}", walker::pointer::ROOT, walker::pointer::escape(args_field));
            rebase_refs(&mut args, &home);
            if let Value::Object(args_map) = &mut args {
                for container in ["$defs", "definitions"] {
                    if let Some(defs) = args_map.remove(container) {
                        root.insert(container.to_string(), defs);
                    }
                }
                args_map.insert("title".into(), Value::String((self.config.args_class)(tool)));
            }
            properties.insert(args_field.clone(), args);
            required.push(Value::String(args_field.clone()));
        }

        root.insert("type".into(), Value::String("object".into()));
        root.insert("properties".into(), Value::Object(properties));
        root.insert("required".into(), Value::Array(required));
        Ok(Value::Object(root))
    }

    pub fn convert_tool(&self, tool: &ToolDescriptor) -> Result<walker::Conversion> {
        let schema = self.tool_schema(tool)?;
        let class_name = (self.config.tool_class)(tool);
        tracing::debug!(tool = %tool.name, class = %class_name, "converting tool");
        walker::convert(&schema, &class_name)
    }

    /// Convert every tool and concatenate the results in input order.
    pub fn convert_tools(&self, tools: &[ToolDescriptor]) -> Result<ToolSet> {
        let mut set = ToolSet { models: Vec::new(), tools: Vec::with_capacity(tools.len()), warnings: Vec::new() };
        for tool in tools {
            let conversion = self.convert_tool(tool)?;
            set.models.extend(conversion.models);
            set.tools.push(conversion.root);
            set.warnings.extend(conversion.warnings);
        }
        Ok(set)
    }

    /// Entry point for a whole document of the form `{"tools": [...]}`.
    pub fn convert_document(&self, document: &Value) -> Result<ToolSet> {
        let tools = document
            .get("tools")
            .ok_or_else(|| SchemaError::Configuration("tool list document has no 'tools' key".into()))?;
        let tools: Vec<ToolDescriptor> = path_de::from_value_with_path(tools)
            .map_err(|err| SchemaError::InvalidToolList(format!("tools{}", path_suffix(&err.path, &err.message))))?;
        self.convert_tools(&tools)
    }
}

fn path_suffix(path: &str, message: &str) -> String {
    match path {
        "" | "." => format!(": {message}"),
        p if p.starts_with('[') => format!("{p}: {message}"),
        p => format!(".{p}: {message}"),
    }
}

// ------------------------------- Selection -------------------------------- //

/// Output class that lets a caller pick one or more tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolSelection {
    pub tools_field: String,
    pub can_select_many: bool,
    pub class_name: String,
}

impl Default for ToolSelection {
    fn default() -> Self {
        ToolSelection { tools_field: "intents".into(), can_select_many: true, class_name: "NextSteps".into() }
    }
}

impl ToolSelection {
    /// Union of the tool classes; a list of it when several may be picked.
    pub fn selection_type(&self, tools: &[TypeDescriptor]) -> Result<TypeDescriptor> {
        let choice = match tools {
            [] => return Err(SchemaError::Configuration("tool selection needs at least one tool".into())),
            [only] => only.clone(),
            many => TypeDescriptor::union(many.to_vec()),
        };
        Ok(if self.can_select_many { TypeDescriptor::list(choice) } else { choice })
    }

    pub fn selection_class(&self, tools: &[TypeDescriptor]) -> Result<ClassModel> {
        let (field, alias) = names::resolve(&self.tools_field, Case::Camel);
        if field.is_empty() {
            return Err(SchemaError::Configuration(format!("tools_field '{}' is not a usable name", self.tools_field)));
        }
        let (class_name, class_alias) = names::resolve(&self.class_name, Case::Pascal);
        let field = FieldModel::new(field, self.selection_type(tools)?).with_alias(alias);
        Ok(ClassModel::new(class_name, vec![field]).with_alias(class_alias))
    }

    /// Instruction line that precedes the output format in a prompt.
    pub fn output_format_prefix(&self, id_field: &str) -> String {
        let how_many = if self.can_select_many { "one or multiple" } else { "one" };
        format!("What are the next steps?\n\nAnswer in JSON format with {how_many} of the following {id_field}s\n\n")
    }
}

/// Point local `$ref`s of an input schema at its new home inside the wrapper.
/// Definitions are hoisted to the wrapper root, so refs into them stay put.
fn rebase_refs(schema: &mut Value, prefix: &str) {
    match schema {
        Value::Object(map) => {
            for (key, value) in map.iter_mut() {
                match value {
                    Value::String(reference) if key == "$ref" => {
                        if let Some(rebased) = rebase(reference, prefix) {
                            *reference = rebased;
                        }
                    }
                    other => rebase_refs(other, prefix),
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(|item| rebase_refs(item, prefix)),
        _ => {}
    }
}

fn rebase(reference: &str, prefix: &str) -> Option<String> {
    let rest = reference.strip_prefix(walker::pointer::ROOT)?;
    let hoisted = ["/$defs", "/definitions"]
        .iter()
        .any(|container| rest == *container || rest.starts_with(&format!("{container}/")));
    (!hoisted).then(|| format!("{prefix}{rest}"))
}
