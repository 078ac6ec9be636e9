//! Dialect detection and document loading.

use tracing::debug;

use super::openapi3::{OpenApiDocument, RawOpenApi};
use super::swagger::{RawSwagger, SwaggerDocument};
use super::Spec;
use crate::error::{GantryError, Result};

/// Detect the dialect of a raw document and parse it.
///
/// Strict order: modern dialect first (parse *and* structural validation —
/// the modern shape deserializes legacy JSON without erroring, so a parse
/// success alone is not a match), then legacy as JSON gated on a non-empty
/// `swagger` marker, then YAML re-encoded to JSON and the legacy gate again.
pub fn load_document(data: &[u8]) -> Result<Box<dyn Spec>> {
    if let Some(raw) = try_modern(data) {
        debug!(version = %raw.openapi, "loaded modern dialect document");
        return Ok(Box::new(OpenApiDocument::new(raw)));
    }

    if let Ok(raw) = serde_json::from_slice::<RawSwagger>(data) {
        if !raw.swagger.is_empty() {
            debug!(version = %raw.swagger, "loaded legacy dialect document");
            return Ok(Box::new(SwaggerDocument::new(raw)));
        }
    }

    if let Ok(value) = serde_yaml::from_slice::<serde_json::Value>(data) {
        if let Ok(raw) = serde_json::from_value::<RawSwagger>(value) {
            if !raw.swagger.is_empty() {
                debug!(version = %raw.swagger, "loaded legacy dialect document from YAML");
                return Ok(Box::new(SwaggerDocument::new(raw)));
            }
        }
    }

    Err(GantryError::UnsupportedDocument)
}

fn try_modern(data: &[u8]) -> Option<RawOpenApi> {
    if let Ok(raw) = serde_json::from_slice::<RawOpenApi>(data) {
        if raw.is_structurally_valid() {
            return Some(raw);
        }
    }
    if let Ok(raw) = serde_yaml::from_slice::<RawOpenApi>(data) {
        if raw.is_structurally_valid() {
            return Some(raw);
        }
    }
    None
}

/// Load raw document bytes from a local file path or an `http(s)://` URL,
/// then detect and parse the dialect.
pub async fn load_from_source(source: &str) -> Result<Box<dyn Spec>> {
    let data = if source.starts_with("http://") || source.starts_with("https://") {
        fetch_from_url(source).await?
    } else {
        tokio::fs::read(source).await?
    };

    load_document(&data)
}

async fn fetch_from_url(url: &str) -> Result<Vec<u8>> {
    let response = reqwest::get(url).await?;
    if !response.status().is_success() {
        return Err(GantryError::FetchStatus(response.status().as_u16()));
    }
    Ok(response.bytes().await?.to_vec())
}
