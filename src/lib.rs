//! JSON Schema (and MCP tool lists) → BAML data models.
//!
//! ```text
//! schema ──walker──▶ [Model] ──codegen──────▶ BAML source
//!                            └──type_builder──▶ builder calls
//! tools ──tools (synthetic schema per tool)──▶ walker
//! ```
pub mod codegen;
pub mod error;
pub mod ir;
pub mod names;
pub mod path_de;
pub mod tools;
pub mod type_builder;
pub mod walker;

pub use codegen::{Codegen, render};
pub use error::{Result, SchemaError, Warning};
pub use ir::{ClassModel, EnumModel, EnumValueModel, FieldModel, Model, TypeDescriptor, TypeKind};
pub use tools::{ToolAdapterConfig, ToolDescriptor, ToolSchemaAdapter, ToolSelection};
pub use type_builder::{BuildCommand, FieldType, TypeBuilder, TypeRegistry};
pub use walker::{Conversion, convert};
