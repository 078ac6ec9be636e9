//! Invocation engine: turns a compiled tool plus a concrete input into one
//! HTTP request and normalizes the response.
//!
//! Nothing here persists state across calls. The [`Invoker`] owns the one
//! shared HTTP client (connection reuse); every call allocates its own URL,
//! header set, and body buffer, and the returned future can be dropped to
//! abandon the in-flight request.

use std::collections::BTreeMap;
use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, Url};
use serde::Serialize;
use tracing::debug;

use crate::compiler::ToolDescriptor;
use crate::document::{Operation, ParameterLocation};
use crate::error::{GantryError, Result};

/// Flat name → value mapping supplied fresh on every call.
pub type InvocationInput = serde_json::Map<String, serde_json::Value>;

/// Normalized result of one invocation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InvocationOutput {
    pub status_code: u16,

    /// Decoded JSON body; absent when the response body is missing or is
    /// not valid JSON (never an error — the status code still matters).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,

    /// Response headers, first value per name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn path_placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{([^}]+)\}").expect("placeholder regex compiles"))
}

/// Executes compiled tools against their upstream API.
///
/// Holds the single shared HTTP client and the externally supplied static
/// headers merged into every outbound call. Safe to share across concurrent
/// invocations.
pub struct Invoker {
    client: reqwest::Client,
    extra_headers: HeaderMap,
}

impl Invoker {
    /// Build an invoker with its own pooled client and a set of static
    /// headers applied last on every call.
    pub fn new(extra_headers: HeaderMap) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .pool_max_idle_per_host(10)
            .build()?;
        Ok(Self {
            client,
            extra_headers,
        })
    }

    /// One call: build the request from the descriptor and input, dispatch
    /// it, and normalize the response.
    ///
    /// A 4xx/5xx response is a successful invocation; only request-building
    /// problems and transport failures return `Err`.
    pub async fn invoke(
        &self,
        tool: &ToolDescriptor,
        input: &InvocationInput,
    ) -> Result<InvocationOutput> {
        let mut url = build_url(&tool.base_url, &tool.path, input)?;
        apply_query_parameters(&mut url, tool.operation.as_ref(), input);

        let body = build_request_body(tool.operation.as_ref(), input)?;
        let headers = self.build_headers(tool.operation.as_ref(), input, body.is_some())?;

        let method = Method::from_bytes(tool.method.to_uppercase().as_bytes())
            .map_err(|_| GantryError::InvalidMethod(tool.method.clone()))?;

        debug!(tool = %tool.name, %method, url = %url, "dispatching invocation");

        let mut request = self.client.request(method, url).headers(headers);
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request.send().await?;
        Ok(normalize_response(response).await)
    }

    /// Engine headers first, declared header parameters from input next,
    /// caller-supplied static headers appended last (repeats allowed).
    fn build_headers(
        &self,
        operation: &dyn Operation,
        input: &InvocationInput,
        has_body: bool,
    ) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        if has_body {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        for param in operation.parameters() {
            if param.location() != ParameterLocation::Header {
                continue;
            }
            let Some(value) = input.get(param.name()) else {
                continue;
            };
            let name = HeaderName::from_bytes(param.name().as_bytes()).map_err(|err| {
                GantryError::InvalidHeader {
                    name: param.name().to_string(),
                    message: err.to_string(),
                }
            })?;
            let value = HeaderValue::from_str(&stringify(value)).map_err(|err| {
                GantryError::InvalidHeader {
                    name: param.name().to_string(),
                    message: err.to_string(),
                }
            })?;
            headers.insert(name, value);
        }

        for (name, value) in &self.extra_headers {
            headers.append(name.clone(), value.clone());
        }

        Ok(headers)
    }
}

/// Substitute every `{name}` placeholder and join onto the base address.
///
/// Substitution is attempted for all placeholders before failing, so the
/// error carries the complete list of missing names in one pass.
pub(crate) fn build_url(base_url: &str, path: &str, input: &InvocationInput) -> Result<Url> {
    let mut missing = Vec::new();

    let substituted = path_placeholder_regex().replace_all(path, |captures: &regex::Captures| {
        let name = &captures[1];
        match input.get(name) {
            Some(value) => stringify(value),
            None => {
                missing.push(name.to_string());
                captures[0].to_string()
            }
        }
    });

    if !missing.is_empty() {
        return Err(GantryError::MissingPathParameters(missing));
    }

    let full = format!("{}{}", base_url.trim_end_matches('/'), substituted);
    Url::parse(&full).map_err(|err| GantryError::InvalidUrl(format!("{full}: {err}")))
}

/// Set declared query parameters from the input. The final query string is
/// rebuilt from a sorted mapping, so wire order is lexicographic by name
/// regardless of declaration order.
pub(crate) fn apply_query_parameters(
    url: &mut Url,
    operation: &dyn Operation,
    input: &InvocationInput,
) {
    let mut pairs: BTreeMap<String, String> = url.query_pairs().into_owned().collect();

    for param in operation.parameters() {
        if param.location() != ParameterLocation::Query {
            continue;
        }
        if let Some(value) = input.get(param.name()) {
            pairs.insert(param.name().to_string(), stringify(value));
        }
    }

    if pairs.is_empty() {
        return;
    }

    let mut query = url.query_pairs_mut();
    query.clear();
    for (name, value) in &pairs {
        query.append_pair(name, value);
    }
}

/// Build the JSON body, or `None` when the operation declares no request
/// body. Top-level body-schema properties take the input value, else the
/// schema default, else are omitted entirely.
pub(crate) fn build_request_body(
    operation: &dyn Operation,
    input: &InvocationInput,
) -> Result<Option<Vec<u8>>> {
    let Some(request_body) = operation.request_body() else {
        return Ok(None);
    };

    let mut body = serde_json::Map::new();

    if let Some(schema) = request_body.json_schema()? {
        if schema.is_object() {
            for (name, prop) in &schema.properties {
                if let Some(value) = input.get(name) {
                    body.insert(name.clone(), value.clone());
                } else if let Some(default) = &prop.default {
                    body.insert(name.clone(), default.clone());
                }
            }
        }
    }

    Ok(Some(serde_json::to_vec(&serde_json::Value::Object(body))?))
}

/// Default stringification for path, query, and header values: strings
/// render bare, numbers and booleans via their JSON form, structures as
/// compact JSON.
pub(crate) fn stringify(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Copy the status code verbatim, retain the first value per header name,
/// and decode the body as opaque JSON — decode failure degrades to an
/// absent body rather than masking the status code.
async fn normalize_response(response: reqwest::Response) -> InvocationOutput {
    let status_code = response.status().as_u16();

    let mut headers = BTreeMap::new();
    for (name, value) in response.headers() {
        if let Ok(text) = value.to_str() {
            headers
                .entry(name.as_str().to_string())
                .or_insert_with(|| text.to_string());
        }
    }

    let body = match response.bytes().await {
        Ok(bytes) => serde_json::from_slice(&bytes).ok(),
        Err(_) => None,
    };

    InvocationOutput {
        status_code,
        body,
        headers,
        error: None,
    }
}
