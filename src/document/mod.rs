//! Version-agnostic abstraction over API description documents.
//!
//! Two incompatible dialects are supported: Swagger 2.0 ("legacy") and
//! OpenAPI 3.x ("modern"). Each implements the same trait set so nothing
//! downstream ever branches on dialect. Implementations hand out owned
//! trait objects backed by an `Arc` of the parsed document, so a loaded
//! [`Spec`] can be shared across concurrent invocations without lifetimes
//! leaking into the contract.

pub mod loader;
pub mod openapi3;
pub mod swagger;

use crate::error::Result;
use crate::schema::JsonSchema;

/// Where a declared parameter is injected into the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    /// Legacy dialect only: the parameter *is* the request body.
    Body,
    /// Anything the document declares that we do not inject (e.g. formData).
    Other,
}

impl ParameterLocation {
    pub fn parse(value: &str) -> Self {
        match value {
            "path" => Self::Path,
            "query" => Self::Query,
            "header" => Self::Header,
            "body" => Self::Body,
            _ => Self::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Query => "query",
            Self::Header => "header",
            Self::Body => "body",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A loaded description document.
pub trait Spec: Send + Sync + std::fmt::Debug {
    /// Dialect version string (`swagger` or `openapi` field).
    fn version(&self) -> String;

    /// Document title from the info block.
    fn title(&self) -> String;

    /// Base address with dialect-specific defaults applied.
    fn base_url(&self) -> String;

    /// Every path template in the document.
    fn paths(&self) -> Vec<Box<dyn PathEntry>>;
}

/// One path template and the operations declared under it.
pub trait PathEntry: Send + Sync {
    /// The path template, e.g. `/users/{id}`.
    fn template(&self) -> &str;

    /// Declared (method, operation) pairs; methods the document does not
    /// define are omitted.
    fn operations(&self) -> Vec<(&'static str, Box<dyn Operation>)>;
}

/// One HTTP-method-specific action on a path.
pub trait Operation: Send + Sync {
    /// Explicit operation identifier; empty when the document omits it.
    fn operation_id(&self) -> String;

    /// Human summary; empty when the document omits it.
    fn summary(&self) -> String;

    /// Path-level parameters first, then operation-level, no dedup.
    fn parameters(&self) -> Vec<Box<dyn Parameter>>;

    /// The request body descriptor, when the operation declares one.
    fn request_body(&self) -> Option<Box<dyn RequestBody>>;
}

/// A declared parameter.
pub trait Parameter: Send + Sync {
    fn name(&self) -> &str;

    fn location(&self) -> ParameterLocation;

    fn description(&self) -> Option<&str>;

    fn required(&self) -> bool;

    /// Declared type name, defaulting to `string`.
    fn type_name(&self) -> String;

    fn format(&self) -> Option<String>;

    /// Nested schema object, when one is attached.
    fn schema(&self) -> Option<JsonSchema>;
}

/// A JSON-shaped request-body descriptor.
pub trait RequestBody: Send + Sync {
    /// Resolve to a schema. `Ok(None)` means the body carries no usable
    /// schema; an unresolvable reference is a hard error.
    fn json_schema(&self) -> Result<Option<JsonSchema>>;
}
