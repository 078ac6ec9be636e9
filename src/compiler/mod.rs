//! Compiles a loaded document into callable tool descriptors.
//!
//! Compilation runs once, synchronously, and either yields a descriptor for
//! every operation in the document or fails as a whole — a tool is never
//! silently skipped. Registration with a transport is a separate pass over
//! the returned list.

use std::sync::Arc;

use tracing::debug;

use crate::document::{Operation, Parameter, ParameterLocation, Spec};
use crate::error::{GantryError, Result};
use crate::schema::JsonSchema;

/// The immutable compiled form of one operation.
///
/// Created once during compilation and shared read-only across every
/// subsequent invocation.
#[derive(Clone)]
pub struct ToolDescriptor {
    /// Stable tool name: the operation id, or `{method}_{cleaned path}`.
    pub name: String,

    /// Human description: the summary, or `{METHOD} {path}`.
    pub description: String,

    /// Compiled input schema (object; parameters plus flattened body fields).
    pub input_schema: JsonSchema,

    /// Lower-case HTTP method name.
    pub method: String,

    /// Path template with `{name}` placeholders.
    pub path: String,

    /// Base address the path is joined onto.
    pub base_url: String,

    /// The source operation, kept for request building at call time.
    pub operation: Arc<dyn Operation>,
}

impl std::fmt::Debug for ToolDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("method", &self.method)
            .field("path", &self.path)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Walk every path/operation pair and compile a descriptor for each.
pub fn compile_tools(spec: &dyn Spec) -> Result<Vec<ToolDescriptor>> {
    let base_url = spec.base_url();
    let mut tools = Vec::new();

    for entry in spec.paths() {
        let path = entry.template().to_string();
        for (method, operation) in entry.operations() {
            let name = derive_tool_name(method, &path, &operation.operation_id());
            let description = derive_description(method, &path, &operation.summary());

            let input_schema = build_input_schema(operation.as_ref())
                .map_err(|err| GantryError::compile(method, &path, err))?;

            debug!(tool = %name, method, path = %path, "compiled tool");
            tools.push(ToolDescriptor {
                name,
                description,
                input_schema,
                method: method.to_string(),
                path: path.clone(),
                base_url: base_url.clone(),
                operation: Arc::from(operation),
            });
        }
    }

    Ok(tools)
}

/// Tool name: explicit operation id when present, else the method joined
/// with the path stripped of `/`, `{`, `}`. A root path contributes nothing
/// and collapses to the bare method name.
pub fn derive_tool_name(method: &str, path: &str, operation_id: &str) -> String {
    if !operation_id.is_empty() {
        return operation_id.to_string();
    }

    let cleaned: String = path
        .replace('/', "_")
        .chars()
        .filter(|c| *c != '{' && *c != '}')
        .collect();
    let cleaned = cleaned.trim_matches('_');

    if cleaned.is_empty() {
        method.to_string()
    } else {
        format!("{method}_{cleaned}")
    }
}

fn derive_description(method: &str, path: &str, summary: &str) -> String {
    if summary.is_empty() {
        format!("{} {}", method.to_uppercase(), path)
    } else {
        summary.to_string()
    }
}

/// Build the tool's input schema from an operation.
///
/// Non-body parameters become properties; the request-body schema's
/// top-level object properties are flattened in as siblings (callers supply
/// body fields alongside path/query parameters, not under a `body` key).
/// Required lists from both sources concatenate without dedup.
pub fn build_input_schema(operation: &dyn Operation) -> Result<JsonSchema> {
    let mut schema = JsonSchema::object();

    for param in operation.parameters() {
        if param.location() == ParameterLocation::Body {
            continue;
        }

        schema
            .properties
            .insert(param.name().to_string(), parameter_schema(param.as_ref()));
        if param.required() {
            schema.required.push(param.name().to_string());
        }
    }

    if let Some(body) = operation.request_body() {
        if let Some(body_schema) = body.json_schema()? {
            for (name, prop) in body_schema.properties {
                schema.properties.insert(name, prop);
            }
            schema.required.extend(body_schema.required);
        }
    }

    Ok(schema)
}

/// Schema for one non-body parameter: the attached schema object when one
/// exists, else a synthesized one from the declared type/format.
fn parameter_schema(param: &dyn Parameter) -> JsonSchema {
    if let Some(schema) = param.schema() {
        return schema;
    }

    let description = match param.description() {
        Some(text) => text.to_string(),
        None => format!(
            "{} parameter: {}",
            capitalize(param.location().as_str()),
            param.name()
        ),
    };

    JsonSchema {
        schema_type: Some(param.type_name()),
        format: param.format(),
        description: Some(description),
        ..JsonSchema::default()
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
