//! Error types for Gantry.

use thiserror::Error;

/// Primary error type for all Gantry operations.
#[derive(Error, Debug)]
pub enum GantryError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("failed to read specification: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to fetch specification: HTTP status {0}")]
    FetchStatus(u16),

    #[error("unsupported or invalid API specification")]
    UnsupportedDocument,

    #[error("could not resolve schema reference: {0}")]
    UnresolvedReference(String),

    #[error("no application/json content-type found for request body")]
    MissingJsonContent,

    #[error("failed to generate input schema for {method} {path}: {source}")]
    Compile {
        method: String,
        path: String,
        #[source]
        source: Box<GantryError>,
    },

    #[error("missing required path parameters: [{}]", .0.join(", "))]
    MissingPathParameters(Vec<String>),

    #[error("invalid request URL: {0}")]
    InvalidUrl(String),

    #[error("invalid header {name}: {message}")]
    InvalidHeader { name: String, message: String },

    #[error("invalid HTTP method: {0}")]
    InvalidMethod(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("transport error: {0}")]
    Transport(String),
}

impl GantryError {
    /// Wrap a schema-generation failure with the operation it belongs to.
    pub fn compile(method: impl Into<String>, path: impl Into<String>, source: GantryError) -> Self {
        Self::Compile {
            method: method.into(),
            path: path.into(),
            source: Box::new(source),
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, GantryError>;
