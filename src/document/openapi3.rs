//! Modern dialect: OpenAPI 3.x documents.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;

use super::{Operation, Parameter, ParameterLocation, PathEntry, RequestBody, Spec};
use crate::error::{GantryError, Result};
use crate::schema::{JsonSchema, RawSchema};

const JSON_CONTENT_TYPE: &str = "application/json";

/// Raw OpenAPI 3.x document as deserialized from JSON or YAML.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawOpenApi {
    #[serde(default)]
    pub(crate) openapi: String,

    info: Option<RawInfo>,

    #[serde(default)]
    servers: Vec<RawServer>,

    paths: Option<BTreeMap<String, RawPathItem>>,
}

impl RawOpenApi {
    /// Structural validation gate used by the loader.
    ///
    /// Parsing alone is too permissive: a legacy document deserializes
    /// cleanly into this shape with every field absent. Only a document
    /// carrying a 3.x version marker, an info block, and a paths table is
    /// accepted as the modern dialect.
    pub(crate) fn is_structurally_valid(&self) -> bool {
        self.openapi.starts_with('3') && self.info.is_some() && self.paths.is_some()
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawInfo {
    #[serde(default)]
    title: String,
}

#[derive(Debug, Deserialize)]
struct RawServer {
    #[serde(default)]
    url: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawPathItem {
    get: Option<RawOperation>,
    put: Option<RawOperation>,
    post: Option<RawOperation>,
    delete: Option<RawOperation>,
    options: Option<RawOperation>,
    head: Option<RawOperation>,
    patch: Option<RawOperation>,
    trace: Option<RawOperation>,

    #[serde(default)]
    parameters: Vec<RawParameter>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RawOperation {
    #[serde(default, rename = "operationId")]
    operation_id: String,

    #[serde(default)]
    summary: String,

    #[serde(default)]
    parameters: Vec<RawParameter>,

    #[serde(rename = "requestBody")]
    request_body: Option<RawRequestBody>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RawParameter {
    #[serde(default)]
    name: String,

    #[serde(default, rename = "in")]
    location: String,

    #[serde(default)]
    description: String,

    #[serde(default)]
    required: bool,

    schema: Option<RawSchema>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RawRequestBody {
    #[serde(default)]
    content: BTreeMap<String, RawMediaType>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RawMediaType {
    schema: Option<RawSchema>,
}

/// A loaded OpenAPI 3.x document.
#[derive(Debug)]
pub struct OpenApiDocument {
    raw: Arc<RawOpenApi>,
}

impl OpenApiDocument {
    pub(crate) fn new(raw: RawOpenApi) -> Self {
        Self { raw: Arc::new(raw) }
    }
}

impl Spec for OpenApiDocument {
    fn version(&self) -> String {
        self.raw.openapi.clone()
    }

    fn title(&self) -> String {
        self.raw
            .info
            .as_ref()
            .map(|info| info.title.clone())
            .unwrap_or_default()
    }

    fn base_url(&self) -> String {
        self.raw
            .servers
            .first()
            .filter(|server| !server.url.is_empty())
            .map(|server| server.url.clone())
            .unwrap_or_else(|| "http://localhost:8080".to_string())
    }

    fn paths(&self) -> Vec<Box<dyn PathEntry>> {
        let Some(paths) = self.raw.paths.as_ref() else {
            return Vec::new();
        };

        paths
            .keys()
            .map(|template| {
                Box::new(OpenApiPathEntry {
                    raw: Arc::clone(&self.raw),
                    template: template.clone(),
                }) as Box<dyn PathEntry>
            })
            .collect()
    }
}

struct OpenApiPathEntry {
    raw: Arc<RawOpenApi>,
    template: String,
}

impl PathEntry for OpenApiPathEntry {
    fn template(&self) -> &str {
        &self.template
    }

    fn operations(&self) -> Vec<(&'static str, Box<dyn Operation>)> {
        let Some(item) = self
            .raw
            .paths
            .as_ref()
            .and_then(|paths| paths.get(&self.template))
        else {
            return Vec::new();
        };

        // The 8 methods the modern dialect supports, trace included.
        let slots: [(&'static str, &Option<RawOperation>); 8] = [
            ("get", &item.get),
            ("put", &item.put),
            ("post", &item.post),
            ("delete", &item.delete),
            ("options", &item.options),
            ("head", &item.head),
            ("patch", &item.patch),
            ("trace", &item.trace),
        ];

        slots
            .into_iter()
            .filter_map(|(method, op)| {
                op.as_ref().map(|op| {
                    let operation = OpenApiOperation {
                        op: op.clone(),
                        path_parameters: item.parameters.clone(),
                    };
                    (method, Box::new(operation) as Box<dyn Operation>)
                })
            })
            .collect()
    }
}

struct OpenApiOperation {
    op: RawOperation,
    path_parameters: Vec<RawParameter>,
}

impl Operation for OpenApiOperation {
    fn operation_id(&self) -> String {
        self.op.operation_id.clone()
    }

    fn summary(&self) -> String {
        self.op.summary.clone()
    }

    fn parameters(&self) -> Vec<Box<dyn Parameter>> {
        self.path_parameters
            .iter()
            .chain(self.op.parameters.iter())
            .map(|param| {
                Box::new(OpenApiParameter {
                    param: param.clone(),
                }) as Box<dyn Parameter>
            })
            .collect()
    }

    fn request_body(&self) -> Option<Box<dyn RequestBody>> {
        self.op.request_body.as_ref().map(|body| {
            Box::new(OpenApiRequestBody { body: body.clone() }) as Box<dyn RequestBody>
        })
    }
}

struct OpenApiParameter {
    param: RawParameter,
}

impl Parameter for OpenApiParameter {
    fn name(&self) -> &str {
        &self.param.name
    }

    fn location(&self) -> ParameterLocation {
        ParameterLocation::parse(&self.param.location)
    }

    fn description(&self) -> Option<&str> {
        if self.param.description.is_empty() {
            None
        } else {
            Some(&self.param.description)
        }
    }

    fn required(&self) -> bool {
        self.param.required
    }

    fn type_name(&self) -> String {
        self.param
            .schema
            .as_ref()
            .and_then(|schema| schema.schema_type.clone())
            .unwrap_or_else(|| "string".to_string())
    }

    fn format(&self) -> Option<String> {
        self.param
            .schema
            .as_ref()
            .and_then(|schema| schema.format.clone())
    }

    fn schema(&self) -> Option<JsonSchema> {
        self.param
            .schema
            .as_ref()
            .filter(|schema| schema.reference.is_none())
            .map(RawSchema::to_schema)
    }
}

struct OpenApiRequestBody {
    body: RawRequestBody,
}

impl RequestBody for OpenApiRequestBody {
    fn json_schema(&self) -> Result<Option<JsonSchema>> {
        if self.body.content.is_empty() {
            return Ok(None);
        }

        let Some(media) = self.body.content.get(JSON_CONTENT_TYPE) else {
            return Err(GantryError::MissingJsonContent);
        };

        Ok(media
            .schema
            .as_ref()
            .filter(|schema| schema.reference.is_none())
            .map(RawSchema::to_schema))
    }
}
