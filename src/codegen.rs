//! IR → BAML source text.
//!
//! Pure projection of the models in the order given; the source schema is
//! never consulted. Skipped fields are left out, skipped enum values keep an
//! `@skip` marker.
use crate::error::{self, Warning};
use crate::ir::{ClassModel, EnumModel, Model, TypeDescriptor, TypeKind};

const INDENT: &str = "  ";

#[derive(Debug, Default)]
pub struct Codegen {
    blocks: Vec<String>,
    warnings: Vec<Warning>,
}

impl Codegen {
    pub fn new() -> Self { Self::default() }

    pub fn emit(&mut self, models: &[Model]) {
        for model in models {
            self.emit_model(model);
        }
    }

    pub fn emit_model(&mut self, model: &Model) {
        let block = match model {
            Model::Class(class) => self.class_block(class),
            Model::Enum(enum_) => enum_block(enum_),
        };
        self.blocks.push(block);
    }

    pub fn warnings(&self) -> &[Warning] { &self.warnings }

    /// Blocks separated by one blank line, each ending in a newline.
    pub fn into_string(self) -> String { self.blocks.join("\n") }

    fn class_block(&mut self, class: &ClassModel) -> String {
        let mut out = format!("class {} {{\n", class.name);
        for field in &class.properties {
            if field.skip {
                self.warn(Warning::SkippedField { class: class.name.clone(), field: field.name.clone() });
                continue;
            }
            let context = format!("{}.{}", class.name, field.name);
            let ty = self.render_type(&field.type_info, &context);
            out.push_str(&format!("{INDENT}{} {ty}", field.name));
            if let Some(description) = &field.description {
                out.push_str(&format!(" @description({})", raw_string(description)));
            }
            if let Some(alias) = &field.alias {
                out.push_str(&format!(" @alias({})", quoted(alias)));
            }
            out.push('\n');
        }
        block_attributes(&mut out, class.description.as_deref(), class.alias.as_deref());
        out.push_str("}\n");
        out
    }

    pub fn render_type(&mut self, ty: &TypeDescriptor, context: &str) -> String {
        let base = match &ty.kind {
            TypeKind::String => "str".to_string(),
            TypeKind::Int => "int".to_string(),
            TypeKind::Float => "float".to_string(),
            TypeKind::Bool => "bool".to_string(),
            TypeKind::Null => return "null".to_string(),
            TypeKind::Any => {
                self.warn(Warning::AnyType { context: context.to_string() });
                "str".to_string()
            }
            TypeKind::LiteralString(s) => quoted(s),
            TypeKind::LiteralInt(i) => i.to_string(),
            TypeKind::LiteralBool(b) => b.to_string(),
            TypeKind::List(item) => {
                let item_src = self.render_type(item, context);
                format!("{}[]", grouped(item, item_src))
            }
            TypeKind::Union(members) => members
                .iter()
                .map(|m| self.render_type(m, context))
                .collect::<Vec<_>>()
                .join(" | "),
            TypeKind::ClassRef(name) | TypeKind::EnumRef(name) => name.clone(),
        };
        if ty.is_optional {
            let wrapped = matches!(ty.kind, TypeKind::Union(_));
            if wrapped { format!("({base})?") } else { format!("{base}?") }
        } else {
            base
        }
    }

    fn warn(&mut self, warning: Warning) {
        error::emit(&mut self.warnings, warning);
    }
}

fn enum_block(enum_: &EnumModel) -> String {
    let mut out = format!("enum {} {{\n", enum_.name);
    for value in &enum_.values {
        out.push_str(INDENT);
        out.push_str(&value.name);
        if let Some(alias) = &value.alias {
            out.push_str(&format!(" @alias({})", quoted(alias)));
        }
        if let Some(description) = &value.description {
            out.push_str(&format!(" @description({})", raw_string(description)));
        }
        if value.skip {
            out.push_str(" @skip");
        }
        out.push('\n');
    }
    block_attributes(&mut out, enum_.description.as_deref(), enum_.alias.as_deref());
    out.push_str("}\n");
    out
}

fn block_attributes(out: &mut String, description: Option<&str>, alias: Option<&str>) {
    if let Some(description) = description {
        out.push_str(&format!("{INDENT}@@description({})\n", raw_string(description)));
    }
    if let Some(alias) = alias {
        out.push_str(&format!("{INDENT}@@alias({})\n", quoted(alias)));
    }
}

// list items that are unions or optional need parentheses
fn grouped(item: &TypeDescriptor, src: String) -> String {
    let bare_union = matches!(item.kind, TypeKind::Union(_)) && !item.is_optional;
    if bare_union || (item.is_optional && !matches!(item.kind, TypeKind::Null)) {
        format!("({src})")
    } else {
        src
    }
}

fn quoted(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{s}\""))
}

/// `#"..."#`, with more hashes when the text itself contains `"#`.
fn raw_string(s: &str) -> String {
    let mut hashes = 1;
    while s.contains(&format!("\"{}", "#".repeat(hashes))) {
        hashes += 1;
    }
    let h = "#".repeat(hashes);
    format!("{h}\"{s}\"{h}")
}

/// Render a whole model list in one go.
pub fn render(models: &[Model]) -> (String, Vec<Warning>) {
    let mut cg = Codegen::new();
    cg.emit(models);
    let warnings = cg.warnings.clone();
    (cg.into_string(), warnings)
}
