//! CLI: JSON Schema / tool lists → (BAML | IR | builder plan)
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow, bail};
use clap::{ArgAction, Args, Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;
use serde::Serialize;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use schema_baml::tools::{ToolAdapterSettings, ToolSchemaAdapter, ToolSelection};
use schema_baml::{Model, TypeDescriptor, Warning, codegen, ir, path_de, type_builder, walker};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// convert JSON Schema documents or MCP tool lists into BAML data models
#[derive(Parser, Debug)]
#[command(name = "schema-baml", version)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,

    /// more log output (-v info, -vv debug, -vvv trace); RUST_LOG wins when set
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// convert JSON Schema documents to BAML source
    Baml(BamlOut),
    /// convert tool lists (`{"tools": [...]}`) to BAML source
    Tools(ToolsOut),
    /// dump the intermediate model list as JSON
    Ir(DumpOut),
    /// dump the type-builder command plan as JSON
    Plan(DumpOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// JSON Pointer selecting the schema inside each document (e.g. /components/schemas/User)
    #[arg(long)]
    json_pointer: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(Args, Debug, Clone)]
struct SchemaSettings {
    /// root class name (defaults to each input's file stem)
    #[arg(long)]
    root_class: Option<String>,
}

#[derive(Args, Debug, Clone)]
struct ToolSettings {
    /// tool adapter settings file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// also emit the class used to select among the tools
    #[arg(long)]
    selection: bool,
}

#[derive(clap::Parser, Debug)]
struct BamlOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    schema_settings: SchemaSettings,

    /// keep only the first model of each name
    #[arg(long)]
    dedupe: bool,

    /// output .baml file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct ToolsOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    tool_settings: ToolSettings,

    /// keep only the first model of each name
    #[arg(long)]
    dedupe: bool,

    /// output .baml file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct DumpOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// read inputs as tool lists instead of schemas
    #[arg(long)]
    tools: bool,

    #[command(flatten)]
    schema_settings: SchemaSettings,

    #[command(flatten)]
    tool_settings: ToolSettings,

    /// keep only the first model of each name
    #[arg(long)]
    dedupe: bool,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

enum Source<'a> {
    Schema(&'a SchemaSettings),
    Tools(&'a ToolSettings),
}

/// One input file after conversion.
struct Converted {
    source: PathBuf,
    models: Vec<Model>,
    roots: Vec<TypeDescriptor>,
    warnings: Vec<Warning>,
    prompt_prefix: Option<String>,
}

#[derive(Serialize)]
struct IrDump<'a> {
    source: String,
    roots: &'a [TypeDescriptor],
    models: &'a [Model],
}

#[derive(Serialize)]
struct PlanDump {
    source: String,
    commands: Vec<type_builder::BuildCommand>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    /// Read and parse every input in parallel, applying `--json-pointer`.
    fn load(&self) -> anyhow::Result<Vec<(PathBuf, Value)>> {
        let source_paths = resolve_file_path_patterns(&self.input).context("failed to resolve input file paths")?;
        source_paths
            .into_par_iter()
            .map(|source_path| {
                let source = std::fs::read(&source_path)
                    .with_context(|| format!("failed to read source file {}", source_path.display()))?;
                let json_value = serde_json::from_slice::<Value>(&source)
                    .with_context(|| format!("failed to parse JSON source file {}", source_path.display()))?;
                let json_value = match self.json_pointer.as_deref() {
                    None => json_value,
                    Some(pointer) => json_value.pointer(pointer).cloned().ok_or_else(|| {
                        anyhow!("JSON pointer '{pointer}' selects nothing in {}", source_path.display())
                    })?,
                };
                Ok((source_path, json_value))
            })
            .collect()
    }
}

impl ToolSettings {
    fn load(&self) -> anyhow::Result<ToolAdapterSettings> {
        let Some(path) = self.config.as_ref() else {
            return Ok(ToolAdapterSettings::default());
        };
        let bytes = std::fs::read(path).with_context(|| format!("failed to read config {}", path.display()))?;
        path_de::from_slice_with_path(&bytes).with_context(|| format!("invalid config {}", path.display()))
    }
}

impl Source<'_> {
    fn convert_all(&self, input_settings: &InputSettings, dedupe: bool) -> anyhow::Result<Vec<Converted>> {
        let documents = input_settings.load()?;
        let tooling = match self {
            Source::Schema(_) => None,
            Source::Tools(settings) => {
                let loaded = settings.load()?;
                let selection = settings.selection.then(|| loaded.selection.clone());
                let id_field = loaded.tool_name_field.clone();
                Some((ToolSchemaAdapter::new(loaded.into_config()), selection, id_field))
            }
        };
        tracing::info!(inputs = documents.len(), "converting");

        documents
            .par_iter()
            .map(|(source, document)| {
                let mut converted = match (self, &tooling) {
                    (Source::Tools(_), Some((adapter, selection, id_field))) => {
                        convert_tools(source, document, adapter, selection.as_ref(), id_field)?
                    }
                    (Source::Schema(settings), _) => convert_schema(source, document, settings)?,
                    (Source::Tools(_), None) => bail!("tool adapter was not configured"),
                };
                if dedupe {
                    converted.models = ir::dedupe_models(converted.models);
                }
                Ok(converted)
            })
            .collect()
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    /// Library warnings are collected and printed by `run`, so the library's
    /// own `warn` events stay below the default level.
    pub fn init_logging(&self) {
        let default = match self.verbose {
            0 => "warn,schema_baml=error",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    pub fn run(&self) -> anyhow::Result<()> {
        match &self.cmd {
            Command::Baml(target) => {
                let converted =
                    Source::Schema(&target.schema_settings).convert_all(&target.input_settings, target.dedupe)?;
                write_output(target.out.as_deref(), &render_baml(&converted))
            }
            Command::Tools(target) => {
                let converted =
                    Source::Tools(&target.tool_settings).convert_all(&target.input_settings, target.dedupe)?;
                write_output(target.out.as_deref(), &render_baml(&converted))
            }
            Command::Ir(target) => {
                let converted = target.source().convert_all(&target.input_settings, target.dedupe)?;
                let dump: Vec<IrDump> = converted
                    .iter()
                    .map(|c| {
                        report_warnings(&c.source, &c.warnings);
                        IrDump { source: c.source.display().to_string(), roots: &c.roots, models: &c.models }
                    })
                    .collect();
                let src = serde_json::to_string_pretty(&dump).context("failed to serialize IR")?;
                write_output(target.out.as_deref(), &format!("{src}\n"))
            }
            Command::Plan(target) => {
                let converted = target.source().convert_all(&target.input_settings, target.dedupe)?;
                let dump: Vec<PlanDump> = converted
                    .iter()
                    .map(|c| {
                        let plan = type_builder::plan(&c.models);
                        report_warnings(&c.source, &c.warnings);
                        report_warnings(&c.source, &plan.warnings);
                        PlanDump { source: c.source.display().to_string(), commands: plan.commands }
                    })
                    .collect();
                let src = serde_json::to_string_pretty(&dump).context("failed to serialize builder plan")?;
                write_output(target.out.as_deref(), &format!("{src}\n"))
            }
        }
    }
}

impl DumpOut {
    fn source(&self) -> Source<'_> {
        if self.tools { Source::Tools(&self.tool_settings) } else { Source::Schema(&self.schema_settings) }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn convert_schema(source: &Path, document: &Value, settings: &SchemaSettings) -> anyhow::Result<Converted> {
    let root_class = settings.root_class.clone().unwrap_or_else(|| default_root_class(source));
    let conversion = walker::convert(document, &root_class)
        .with_context(|| format!("failed to convert {}", source.display()))?;
    Ok(Converted {
        source: source.to_path_buf(),
        models: conversion.models,
        roots: vec![conversion.root],
        warnings: conversion.warnings,
        prompt_prefix: None,
    })
}

fn convert_tools(
    source: &Path,
    document: &Value,
    adapter: &ToolSchemaAdapter,
    selection: Option<&ToolSelection>,
    id_field: &str,
) -> anyhow::Result<Converted> {
    let mut set = adapter
        .convert_document(document)
        .with_context(|| format!("failed to convert tool list {}", source.display()))?;
    let mut prompt_prefix = None;
    if let Some(selection) = selection {
        let class = selection.selection_class(&set.tools).with_context(|| format!("in {}", source.display()))?;
        set.models.push(class.into());
        prompt_prefix = Some(selection.output_format_prefix(id_field));
    }
    Ok(Converted { source: source.to_path_buf(), models: set.models, roots: set.tools, warnings: set.warnings, prompt_prefix })
}

/// `user.schema.json` → `user`
fn default_root_class(source: &Path) -> String {
    source
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.split('.').next())
        .filter(|stem| !stem.is_empty())
        .unwrap_or("Root")
        .to_string()
}

fn render_baml(converted: &[Converted]) -> String {
    let mut sections = Vec::with_capacity(converted.len());
    for c in converted {
        report_warnings(&c.source, &c.warnings);
        let (src, warnings) = codegen::render(&c.models);
        report_warnings(&c.source, &warnings);

        let mut section = String::new();
        if converted.len() > 1 {
            section.push_str(&format!("// {}\n\n", c.source.display()));
        }
        if let Some(prefix) = &c.prompt_prefix {
            for line in prefix.trim_end().lines() {
                section.push_str(&format!("// {line}\n").replace("// \n", "//\n"));
            }
            section.push('\n');
        }
        section.push_str(&src);
        sections.push(section);
    }
    sections.join("\n")
}

fn report_warnings(source: &Path, warnings: &[Warning]) {
    for warning in warnings {
        eprintln!("{}: {}: {warning}", "warning".yellow().bold(), source.display().to_string().dimmed());
    }
}

fn write_output(out: Option<&Path>, content: &str) -> anyhow::Result<()> {
    let Some(out) = out else {
        print!("{content}");
        return Ok(());
    };
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(out, content).with_context(|| format!("failed to write {}", out.display()))
}

fn resolve_file_path_patterns<I>(patterns: I) -> anyhow::Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern).with_context(|| format!("bad glob pattern: {pattern}"))? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_class_from_file_name() {
        assert_eq!(default_root_class(Path::new("schemas/user_profile.schema.json")), "user_profile");
        assert_eq!(default_root_class(Path::new(".json")), "Root");
    }

    #[test]
    fn parses_subcommands() {
        let cli = CommandLineInterface::try_parse_from([
            "schema-baml", "tools", "-i", "tools.json", "--selection", "--dedupe", "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.cmd, Command::Tools(ToolsOut { dedupe: true, .. })));
    }

    #[test]
    fn prompt_prefix_becomes_comments() {
        let converted = Converted {
            source: PathBuf::from("t.json"),
            models: Vec::new(),
            roots: Vec::new(),
            warnings: Vec::new(),
            prompt_prefix: Some(ToolSelection::default().output_format_prefix("intent")),
        };
        let src = render_baml(&[converted]);
        assert!(src.starts_with("// What are the next steps?\n//\n// Answer in JSON format"));
    }
}
