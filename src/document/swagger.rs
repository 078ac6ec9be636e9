//! Legacy dialect: Swagger 2.0 documents.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;

use super::{Operation, Parameter, ParameterLocation, PathEntry, RequestBody, Spec};
use crate::error::{GantryError, Result};
use crate::schema::{JsonSchema, RawSchema};

const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// Raw Swagger 2.0 document as deserialized from JSON.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawSwagger {
    #[serde(default)]
    pub(crate) swagger: String,

    #[serde(default)]
    info: RawInfo,

    #[serde(default)]
    host: String,

    #[serde(default, rename = "basePath")]
    base_path: String,

    #[serde(default)]
    schemes: Vec<String>,

    #[serde(default)]
    paths: BTreeMap<String, RawPathItem>,

    #[serde(default)]
    definitions: BTreeMap<String, RawSchema>,
}

#[derive(Debug, Default, Deserialize)]
struct RawInfo {
    #[serde(default)]
    title: String,
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

    #[serde(rename = "type")]
    param_type: Option<String>,

    format: Option<String>,

    schema: Option<RawSchema>,
}

/// A loaded Swagger 2.0 document.
#[derive(Debug)]
pub struct SwaggerDocument {
    raw: Arc<RawSwagger>,
}

impl SwaggerDocument {
    pub(crate) fn new(raw: RawSwagger) -> Self {
        Self { raw: Arc::new(raw) }
    }
}

impl Spec for SwaggerDocument {
    fn version(&self) -> String {
        self.raw.swagger.clone()
    }

    fn title(&self) -> String {
        self.raw.info.title.clone()
    }

    fn base_url(&self) -> String {
        let scheme = self
            .raw
            .schemes
            .first()
            .map(String::as_str)
            .unwrap_or("http");
        let host = if self.raw.host.is_empty() {
            "localhost:8080"
        } else {
            &self.raw.host
        };
        format!("{scheme}://{host}{}", self.raw.base_path)
    }

    fn paths(&self) -> Vec<Box<dyn PathEntry>> {
        self.raw
            .paths
            .keys()
            .map(|template| {
                Box::new(SwaggerPathEntry {
                    raw: Arc::clone(&self.raw),
                    template: template.clone(),
                }) as Box<dyn PathEntry>
            })
            .collect()
    }
}

struct SwaggerPathEntry {
    raw: Arc<RawSwagger>,
    template: String,
}

impl PathEntry for SwaggerPathEntry {
    fn template(&self) -> &str {
        &self.template
    }

    fn operations(&self) -> Vec<(&'static str, Box<dyn Operation>)> {
        let Some(item) = self.raw.paths.get(&self.template) else {
            return Vec::new();
        };

        // The 7 methods the legacy dialect supports.
        let slots: [(&'static str, &Option<RawOperation>); 7] = [
            ("get", &item.get),
            ("put", &item.put),
            ("post", &item.post),
            ("delete", &item.delete),
            ("options", &item.options),
            ("head", &item.head),
            ("patch", &item.patch),
        ];

        slots
            .into_iter()
            .filter_map(|(method, op)| {
                op.as_ref().map(|op| {
                    let operation = SwaggerOperation {
                        op: op.clone(),
                        path_parameters: item.parameters.clone(),
                        raw: Arc::clone(&self.raw),
                    };
                    (method, Box::new(operation) as Box<dyn Operation>)
                })
            })
            .collect()
    }
}

struct SwaggerOperation {
    op: RawOperation,
    path_parameters: Vec<RawParameter>,
    raw: Arc<RawSwagger>,
}

impl Operation for SwaggerOperation {
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
                Box::new(SwaggerParameter {
                    param: param.clone(),
                }) as Box<dyn Parameter>
            })
            .collect()
    }

    fn request_body(&self) -> Option<Box<dyn RequestBody>> {
        // The legacy dialect models the body as an `in: body` parameter.
        // Operation-level declarations win over path-level ones.
        self.op
            .parameters
            .iter()
            .chain(self.path_parameters.iter())
            .find(|param| param.location == "body")
            .map(|param| {
                Box::new(SwaggerRequestBody {
                    param: param.clone(),
                    raw: Arc::clone(&self.raw),
                }) as Box<dyn RequestBody>
            })
    }
}

struct SwaggerParameter {
    param: RawParameter,
}

impl Parameter for SwaggerParameter {
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
            .param_type
            .clone()
            .unwrap_or_else(|| "string".to_string())
    }

    fn format(&self) -> Option<String> {
        self.param.format.clone()
    }

    fn schema(&self) -> Option<JsonSchema> {
        self.param
            .schema
            .as_ref()
            .filter(|schema| schema.reference.is_none())
            .map(RawSchema::to_schema)
    }
}

struct SwaggerRequestBody {
    param: RawParameter,
    raw: Arc<RawSwagger>,
}

impl RequestBody for SwaggerRequestBody {
    fn json_schema(&self) -> Result<Option<JsonSchema>> {
        let Some(schema) = self.param.schema.as_ref() else {
            return Ok(None);
        };

        if let Some(reference) = schema.reference.as_deref() {
            let name = reference.trim_start_matches(DEFINITIONS_PREFIX);
            return match self.raw.definitions.get(name) {
                Some(target) => Ok(Some(target.to_schema())),
                None => Err(GantryError::UnresolvedReference(reference.to_string())),
            };
        }

        Ok(Some(schema.to_schema()))
    }
}
